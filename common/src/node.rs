//! Nodes of the box tree: files and directories.

use crate::{box_path::BoxPath, identifier::Identifier};

/// Index of a [DirNode] inside [crate::embed_box::EmbedBox::dirs].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DirId(pub usize);

/// Single embedded file.
///
/// Created once per file during the tree walk and never changed afterwards.
/// Owned by its parent [DirNode].
#[derive(Debug)]
pub struct FileNode {
    /// Stable, run-unique identifier, eg. `file7`.
    pub identifier: Identifier,
    /// Path relative to `box` root, eg. `assets/style.css`.
    pub path: BoxPath,
    /// Last modification time of the source file, unix seconds.
    pub mod_time: i64,
    /// Placeholder token standing in for file content until the resolve
    /// pass. It encodes absolute path of the source file.
    pub content_placeholder: String,
}

/// Single embedded directory, including `box` root (with empty path).
#[derive(Debug)]
pub struct DirNode {
    /// Stable, run-unique identifier, eg. `dir3`.
    pub identifier: Identifier,
    /// Path relative to `box` root, empty for root.
    pub path: BoxPath,
    /// Last modification time of the source directory, unix seconds.
    pub mod_time: i64,

    /// Files directly inside this directory, in walk order.
    pub child_files: Vec<FileNode>,
    /// Directories directly inside this directory, in walk order.
    pub child_dirs: Vec<DirId>,
}
impl DirNode {
    /// Creates directory without children.
    pub fn new(
        identifier: Identifier,
        path: BoxPath,
        mod_time: i64,
    ) -> Self {
        Self {
            identifier,
            path,
            mod_time,
            child_files: Vec::new(),
            child_dirs: Vec::new(),
        }
    }
}
