//! Outline normalization and legacy migration.
//!
//! # Responsibility
//! - Turn any raw outline shape into one canonical `OutlineDocumentSet`.
//! - Backfill blank `contentFormat` values from the template resolver.
//!
//! # Invariants
//! - Normalization is total: it never returns an error.
//! - The result always holds at least one file and every file at least one
//!   root node.
//! - Non-blank `contentFormat` values are never overwritten.
//! - Normalizing an already normalized document returns it unchanged.

pub mod raw;

use crate::model::outline::{OutlineDocumentSet, OutlineFile, OutlineNode};
use crate::template::{builtin_resolver, TemplateResolver};
use log::info;
use std::sync::Arc;

pub use raw::{RawOutline, DOCUMENT_DIRECTORY_KEY};

/// Name of the commercial bundle.
pub const COMMERCIAL_FILE_NAME: &str = "商务文件";
/// Name of the technical bundle.
pub const TECHNICAL_FILE_NAME: &str = "技术文件";

/// Which user-facing label the generated placeholder text uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    /// Bid-document format view.
    Format,
    /// Bid-document directory view.
    #[default]
    Directory,
}

impl NormalizeMode {
    /// Chinese label embedded in placeholder summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Format => "格式",
            Self::Directory => "目录",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Directory => "directory",
        }
    }

    /// Parses `format`/`directory`, ignoring case and surrounding spaces.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "format" => Some(Self::Format),
            "directory" => Some(Self::Directory),
            _ => None,
        }
    }
}

/// Placeholder summary used by the skeleton document.
pub fn skeleton_summary(mode: NormalizeMode) -> String {
    format!("请根据招标文件要求补充投标文件{}。", mode.label())
}

/// Summary generated for migrated legacy outlines.
pub fn legacy_summary(file_count: usize) -> String {
    format!("根据招标文件要求，投标文件共包含{file_count}个部分。")
}

/// Minimal renderable document: one commercial file with one chapter.
pub fn skeleton(mode: NormalizeMode) -> OutlineDocumentSet {
    OutlineDocumentSet::new(
        skeleton_summary(mode),
        [OutlineFile::new(
            COMMERCIAL_FILE_NAME,
            [OutlineNode::default_root()],
        )],
    )
}

/// Normalizes `raw` with the built-in template resolver.
pub fn normalize(raw: RawOutline, mode: NormalizeMode) -> OutlineDocumentSet {
    normalize_with(raw, mode, builtin_resolver())
}

/// Normalizes `raw` with a caller-provided template resolver.
pub fn normalize_with(
    raw: RawOutline,
    mode: NormalizeMode,
    resolver: &TemplateResolver,
) -> OutlineDocumentSet {
    let source = raw.kind();
    let doc = match raw {
        RawOutline::Missing => skeleton(mode),
        RawOutline::Canonical(doc) => normalize_canonical(doc, mode, resolver),
        RawOutline::LegacyFlat {
            commercial,
            technical,
        } => migrate_legacy(&commercial, &technical, mode, resolver),
    };

    info!(
        "event=outline_normalize module=normalize status=ok source={} mode={} file_count={} node_count={}",
        source,
        mode.as_str(),
        doc.files.len(),
        doc.node_count()
    );
    doc
}

fn normalize_canonical(
    mut doc: OutlineDocumentSet,
    mode: NormalizeMode,
    resolver: &TemplateResolver,
) -> OutlineDocumentSet {
    for file in &mut doc.files {
        if let Some(items) = backfill_forest(&file.items, resolver) {
            Arc::make_mut(file).items = items;
        }
    }

    if !doc.is_renderable() {
        return skeleton(mode);
    }
    doc
}

/// Backfills a forest, returning `None` when no node changed.
///
/// Each title is resolved once. Unchanged subtrees keep their `Arc`, so an
/// already normalized document is returned without cloning any node.
fn backfill_forest(
    nodes: &[Arc<OutlineNode>],
    resolver: &TemplateResolver,
) -> Option<Vec<Arc<OutlineNode>>> {
    let mut changed: Option<Vec<Arc<OutlineNode>>> = None;
    for (index, node) in nodes.iter().enumerate() {
        if let Some(next) = backfill_node(node, resolver) {
            changed.get_or_insert_with(|| nodes.to_vec())[index] = next;
        }
    }
    changed
}

fn backfill_node(node: &OutlineNode, resolver: &TemplateResolver) -> Option<Arc<OutlineNode>> {
    let content = backfill_value(node, resolver);
    let children = backfill_forest(&node.children, resolver);
    if content.is_none() && children.is_none() {
        return None;
    }

    let mut next = node.clone();
    if let Some(content) = content {
        next.content_format = content;
    }
    if let Some(children) = children {
        next.children = children;
    }
    Some(Arc::new(next))
}

/// Template text for a blank node, when it differs from the current value.
fn backfill_value(node: &OutlineNode, resolver: &TemplateResolver) -> Option<String> {
    if !node.has_blank_content() {
        return None;
    }
    let resolved = resolver.resolve(&node.title);
    (resolved != node.content_format).then_some(resolved)
}

fn migrate_legacy(
    commercial: &str,
    technical: &str,
    mode: NormalizeMode,
    resolver: &TemplateResolver,
) -> OutlineDocumentSet {
    let files = [
        (COMMERCIAL_FILE_NAME, commercial),
        (TECHNICAL_FILE_NAME, technical),
    ]
    .into_iter()
    .filter_map(|(name, text)| {
        let items = flat_nodes(text, resolver);
        (!items.is_empty()).then(|| OutlineFile::new(name, items))
    })
    .collect::<Vec<_>>();

    if files.is_empty() {
        return skeleton(mode);
    }
    OutlineDocumentSet::new(legacy_summary(files.len()), files)
}

fn flat_nodes(text: &str, resolver: &TemplateResolver) -> Vec<OutlineNode> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| OutlineNode::new(line, "").with_content(resolver.resolve(line)))
        .collect()
}
