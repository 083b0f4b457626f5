//! Plain-text rendering of outline documents for terminal review.

use crate::model::outline::{OutlineDocumentSet, OutlineNode};
use std::sync::Arc;

const WITH_CONTENT: char = '●';
const BLANK_CONTENT: char = '○';

fn content_symbol(node: &OutlineNode) -> char {
    if node.has_blank_content() {
        BLANK_CONTENT
    } else {
        WITH_CONTENT
    }
}

/// Renders every file as a titled tree in display order.
///
/// Example output:
/// ```text
/// [商务文件]
/// ○ 一、资格文件
/// ├── ● 投标函
/// └── ○ 报价表
/// ```
pub fn render_document(doc: &OutlineDocumentSet) -> String {
    let mut output = String::new();
    for file in &doc.files {
        output.push('[');
        output.push_str(&file.name);
        output.push_str("]\n");
        for (i, node) in file.items.iter().enumerate() {
            let is_last = i == file.items.len() - 1;
            render_node(&mut output, node, "", is_last, true);
        }
    }
    output
}

fn render_node(
    output: &mut String,
    node: &Arc<OutlineNode>,
    prefix: &str,
    is_last: bool,
    is_root: bool,
) {
    if !is_root {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
    }
    output.push(content_symbol(node));
    output.push(' ');
    output.push_str(&node.title);
    output.push('\n');

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{prefix}{continuation}")
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}
