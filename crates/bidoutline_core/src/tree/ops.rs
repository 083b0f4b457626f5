//! Path-addressed read and copy-on-write mutation operations.
//!
//! # Responsibility
//! - Resolve `(file_index, path)` addresses to nodes.
//! - Produce a new document per mutation while sharing untouched subtrees.
//!
//! # Invariants
//! - Input documents are never mutated; `Arc::make_mut` clones exactly the
//!   file and node spine along the addressed path.
//! - A path is valid only when every index is in bounds at its depth.
//! - A document never drops below one file through `remove_file`.

use crate::model::outline::{OutlineDocumentSet, OutlineFile, OutlineNode, OutlinePath};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Result type used by outline tree operations.
pub type OutlineResult<T> = Result<T, OutlineError>;

/// Errors from outline tree operations.
///
/// Both variants indicate a caller bug such as a stale path kept after an
/// earlier structural edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineError {
    /// File index is out of range.
    FileNotFound(usize),
    /// Some index along the path is out of range, or the path is empty.
    PathNotFound {
        file_index: usize,
        path: OutlinePath,
    },
}

impl Display for OutlineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(index) => write!(f, "outline file not found: {index}"),
            Self::PathNotFound { file_index, path } => {
                write!(f, "outline path not found: file {file_index} path {path}")
            }
        }
    }
}

impl Error for OutlineError {}

/// Editable text fields of one outline node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineField {
    Title,
    Description,
    ContentFormat,
}

impl OutlineField {
    /// Wire name of the field in the persisted JSON shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::ContentFormat => "contentFormat",
        }
    }

    /// Parses a wire name produced by `as_str`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "contentFormat" => Some(Self::ContentFormat),
            _ => None,
        }
    }
}

/// Outcome of `remove_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveFileOutcome {
    /// File removed; carries the new document.
    Removed(OutlineDocumentSet),
    /// Removal refused because the document holds a single file; carries the
    /// unchanged document.
    Rejected(OutlineDocumentSet),
}

impl RemoveFileOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }

    pub fn into_document(self) -> OutlineDocumentSet {
        match self {
            Self::Removed(doc) | Self::Rejected(doc) => doc,
        }
    }
}

/// Returns the node addressed by `path` inside file `file_index`.
pub fn get_node<'doc>(
    doc: &'doc OutlineDocumentSet,
    file_index: usize,
    path: &OutlinePath,
) -> OutlineResult<&'doc OutlineNode> {
    let file = doc
        .file(file_index)
        .ok_or(OutlineError::FileNotFound(file_index))?;
    let not_found = || path_not_found(file_index, path);
    let (first, rest) = path.as_slice().split_first().ok_or_else(not_found)?;

    let mut node = file.item(*first).ok_or_else(not_found)?;
    for index in rest {
        node = node.child(*index).ok_or_else(not_found)?;
    }
    Ok(node)
}

/// Replaces one text field of the addressed node.
pub fn set_field(
    doc: &OutlineDocumentSet,
    file_index: usize,
    path: &OutlinePath,
    field: OutlineField,
    value: impl Into<String>,
) -> OutlineResult<OutlineDocumentSet> {
    let mut next = doc.clone();
    let node = node_mut(&mut next, file_index, path)?;
    let value = value.into();
    match field {
        OutlineField::Title => node.title = value,
        OutlineField::Description => node.description = value,
        OutlineField::ContentFormat => node.content_format = value,
    }
    Ok(next)
}

/// Appends a child under the addressed node.
///
/// Uses `OutlineNode::default_child()` when `new_node` is `None`. Returns the
/// new document and the path of the inserted child.
pub fn add_child(
    doc: &OutlineDocumentSet,
    file_index: usize,
    path: &OutlinePath,
    new_node: Option<OutlineNode>,
) -> OutlineResult<(OutlineDocumentSet, OutlinePath)> {
    let mut next = doc.clone();
    let parent = node_mut(&mut next, file_index, path)?;
    parent
        .children
        .push(Arc::new(new_node.unwrap_or_else(OutlineNode::default_child)));
    let child_path = path.child(parent.children.len() - 1);
    Ok((next, child_path))
}

/// Appends a root chapter to file `file_index`.
///
/// Uses `OutlineNode::default_root()` when `new_node` is `None`.
pub fn add_root_node(
    doc: &OutlineDocumentSet,
    file_index: usize,
    new_node: Option<OutlineNode>,
) -> OutlineResult<(OutlineDocumentSet, OutlinePath)> {
    let mut next = doc.clone();
    let file = file_mut(&mut next, file_index)?;
    file.items
        .push(Arc::new(new_node.unwrap_or_else(OutlineNode::default_root)));
    let root_path = OutlinePath::from(vec![file.items.len() - 1]);
    Ok((next, root_path))
}

/// Removes the addressed node together with its subtree.
///
/// Removing the last root of a file leaves `items` empty; the next
/// normalization pass restores the skeleton.
pub fn remove_node(
    doc: &OutlineDocumentSet,
    file_index: usize,
    path: &OutlinePath,
) -> OutlineResult<OutlineDocumentSet> {
    let (parent_path, index) = path
        .split_last()
        .ok_or_else(|| path_not_found(file_index, path))?;

    let mut next = doc.clone();
    let siblings = if parent_path.is_empty() {
        &mut file_mut(&mut next, file_index)?.items
    } else {
        let parent_path = OutlinePath::from(parent_path);
        &mut node_mut(&mut next, file_index, &parent_path)
            .map_err(|err| match err {
                OutlineError::PathNotFound { .. } => path_not_found(file_index, path),
                other => other,
            })?
            .children
    };

    if index >= siblings.len() {
        return Err(path_not_found(file_index, path));
    }
    siblings.remove(index);
    Ok(next)
}

/// Appends a new file holding `initial_node` as its only root.
pub fn add_file(
    doc: &OutlineDocumentSet,
    name: impl Into<String>,
    initial_node: OutlineNode,
) -> OutlineDocumentSet {
    let mut next = doc.clone();
    next.files
        .push(Arc::new(OutlineFile::new(name, [initial_node])));
    next
}

/// Removes file `file_index` unless it is the only file left.
pub fn remove_file(
    doc: &OutlineDocumentSet,
    file_index: usize,
) -> OutlineResult<RemoveFileOutcome> {
    if doc.files.len() <= 1 {
        debug!(
            "event=outline_remove_file module=tree status=rejected file_index={} file_count={}",
            file_index,
            doc.files.len()
        );
        return Ok(RemoveFileOutcome::Rejected(doc.clone()));
    }
    if file_index >= doc.files.len() {
        return Err(OutlineError::FileNotFound(file_index));
    }

    let mut next = doc.clone();
    next.files.remove(file_index);
    Ok(RemoveFileOutcome::Removed(next))
}

/// Renames file `file_index`.
pub fn rename_file(
    doc: &OutlineDocumentSet,
    file_index: usize,
    name: impl Into<String>,
) -> OutlineResult<OutlineDocumentSet> {
    let mut next = doc.clone();
    file_mut(&mut next, file_index)?.name = name.into();
    Ok(next)
}

/// Replaces the document summary.
pub fn set_summary(doc: &OutlineDocumentSet, summary: impl Into<String>) -> OutlineDocumentSet {
    let mut next = doc.clone();
    next.summary = summary.into();
    next
}

fn file_mut(doc: &mut OutlineDocumentSet, file_index: usize) -> OutlineResult<&mut OutlineFile> {
    doc.files
        .get_mut(file_index)
        .map(Arc::make_mut)
        .ok_or(OutlineError::FileNotFound(file_index))
}

fn node_mut<'doc>(
    doc: &'doc mut OutlineDocumentSet,
    file_index: usize,
    path: &OutlinePath,
) -> OutlineResult<&'doc mut OutlineNode> {
    // Validate against the shared tree first so an invalid path clones nothing.
    get_node(doc, file_index, path)?;

    let not_found = || path_not_found(file_index, path);
    let (first, rest) = path.as_slice().split_first().ok_or_else(not_found)?;
    let file = file_mut(doc, file_index)?;
    let mut node = Arc::make_mut(file.items.get_mut(*first).ok_or_else(not_found)?);
    for index in rest {
        let next = node.children.get_mut(*index).ok_or_else(not_found)?;
        node = Arc::make_mut(next);
    }
    Ok(node)
}

fn path_not_found(file_index: usize, path: &OutlinePath) -> OutlineError {
    OutlineError::PathNotFound {
        file_index,
        path: path.clone(),
    }
}
