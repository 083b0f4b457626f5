//! Outline domain model.
//!
//! # Responsibility
//! - Define the canonical chapter tree persisted for one bid project.
//! - Keep the wire shape (`contentFormat`, optional `children`) stable for
//!   documents already stored by earlier releases.
//!
//! # Invariants
//! - Child order is display/print order and is never re-sorted.
//! - Absent `children` and `children = []` are equivalent.
//! - `null` decodes like an absent field.
//! - Subtrees are shared through `Arc`; mutation paths clone only the spine
//!   they touch.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Stable identifier of the project owning one outline document.
pub type ProjectId = Uuid;

/// Title used for a freshly inserted root chapter.
pub const DEFAULT_ROOT_TITLE: &str = "第一章";
/// Title used for a freshly inserted child section.
pub const DEFAULT_CHILD_TITLE: &str = "新增章节";
/// Description placeholder shown until the user fills it in.
pub const DEFAULT_DESCRIPTION: &str = "请输入说明";

/// One chapter or section of a bid-document outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineNode {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Formatted boilerplate text, opaque to this crate beyond blank checks.
    #[serde(rename = "contentFormat", deserialize_with = "null_as_default")]
    pub content_format: String,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub children: Vec<Arc<OutlineNode>>,
}

impl OutlineNode {
    /// Creates a leaf node with empty content.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            content_format: String::new(),
            children: Vec::new(),
        }
    }

    /// Default node appended by "add root chapter".
    pub fn default_root() -> Self {
        Self::new(DEFAULT_ROOT_TITLE, DEFAULT_DESCRIPTION)
    }

    /// Default node appended by "add child section".
    pub fn default_child() -> Self {
        Self::new(DEFAULT_CHILD_TITLE, DEFAULT_DESCRIPTION)
    }

    /// Builder-style helper for content.
    pub fn with_content(mut self, content_format: impl Into<String>) -> Self {
        self.content_format = content_format.into();
        self
    }

    /// Builder-style helper for children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = OutlineNode>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    /// Returns whether `content_format` is absent or whitespace only.
    pub fn has_blank_content(&self) -> bool {
        self.content_format.trim().is_empty()
    }

    /// Returns child node at `index`, if any.
    pub fn child(&self, index: usize) -> Option<&OutlineNode> {
        self.children.get(index).map(Arc::as_ref)
    }
}

/// One top-level submission bundle, e.g. the commercial file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineFile {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Arc<OutlineNode>>,
}

impl OutlineFile {
    pub fn new(name: impl Into<String>, items: impl IntoIterator<Item = OutlineNode>) -> Self {
        Self {
            name: name.into(),
            items: items.into_iter().map(Arc::new).collect(),
        }
    }

    /// Returns root node at `index`, if any.
    pub fn item(&self, index: usize) -> Option<&OutlineNode> {
        self.items.get(index).map(Arc::as_ref)
    }
}

/// Canonical persisted outline for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineDocumentSet {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub files: Vec<Arc<OutlineFile>>,
}

impl OutlineDocumentSet {
    pub fn new(summary: impl Into<String>, files: impl IntoIterator<Item = OutlineFile>) -> Self {
        Self {
            summary: summary.into(),
            files: files.into_iter().map(Arc::new).collect(),
        }
    }

    /// Returns file at `index`, if any.
    pub fn file(&self, index: usize) -> Option<&OutlineFile> {
        self.files.get(index).map(Arc::as_ref)
    }

    /// Returns whether at least one file exists and no file is empty.
    pub fn is_renderable(&self) -> bool {
        !self.files.is_empty() && self.files.iter().all(|file| !file.items.is_empty())
    }

    /// Visits every node in pre-order, file by file.
    ///
    /// The visitor receives the file index, the node path and the node.
    pub fn walk_preorder<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &OutlinePath, &OutlineNode),
    {
        for (file_index, file) in self.files.iter().enumerate() {
            let mut path = OutlinePath::root();
            walk_nodes(&file.items, file_index, &mut path, &mut visit);
        }
    }

    /// Counts nodes across all files, nested children included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk_preorder(|_, _, _| count += 1);
        count
    }
}

fn walk_nodes<F>(nodes: &[Arc<OutlineNode>], file_index: usize, path: &mut OutlinePath, visit: &mut F)
where
    F: FnMut(usize, &OutlinePath, &OutlineNode),
{
    for (index, node) in nodes.iter().enumerate() {
        path.push(index);
        visit(file_index, &*path, &**node);
        walk_nodes(&node.children, file_index, path, visit);
        path.pop();
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Index path addressing one node inside a file's forest.
///
/// The first index selects a root in `OutlineFile::items`; every following
/// index selects a child of the node reached so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutlinePath(Vec<usize>);

impl OutlinePath {
    /// Empty path. Addresses no node on its own.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path extended by one child index.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Splits into parent path and last index. `None` for the empty path.
    pub fn split_last(&self) -> Option<(&[usize], usize)> {
        self.0
            .split_last()
            .map(|(last, parent)| (parent, *last))
    }

    fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl From<Vec<usize>> for OutlinePath {
    fn from(value: Vec<usize>) -> Self {
        Self(value)
    }
}

impl From<&[usize]> for OutlinePath {
    fn from(value: &[usize]) -> Self {
        Self(value.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for OutlinePath {
    fn from(value: [usize; N]) -> Self {
        Self(value.to_vec())
    }
}

impl Display for OutlinePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (position, index) in self.0.iter().enumerate() {
            if position > 0 {
                write!(f, ",")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, "]")
    }
}
