//! Embed box is the root entity, a tree of directories and files.

use crate::{
    box_path::BoxPath,
    node::{DirId, DirNode, FileNode},
};
use std::{collections::HashMap, path::PathBuf};

/// [EmbedBox] represents one embedded directory tree, requested under a
/// logical name.
///
/// [EmbedBox] is built once by the packer tree builder and then only read.
/// Directories are stored in [Self::dirs] in walk order, the root always
/// being the first one. Children are linked by [DirId], files are owned by
/// their parent directory.
#[derive(Debug)]
pub struct EmbedBox {
    /// Name under which consuming program requests the box.
    pub name: String,
    /// Absolute source directory of the box.
    pub source_path: PathBuf,
    /// Last modification time of the root directory, unix seconds.
    pub mod_time: i64,

    /// All directories, indexed by [DirId]. Root is at index 0.
    pub dirs: Vec<DirNode>,
    /// Directories by their path.
    pub dirs_by_path: HashMap<BoxPath, DirId>,
}
impl EmbedBox {
    /// [DirId] of the root directory.
    pub const ROOT: DirId = DirId(0);

    /// Root directory (with empty path).
    pub fn root(&self) -> &DirNode {
        &self.dirs[Self::ROOT.0]
    }

    /// Directory by its id.
    ///
    /// # Panics
    ///
    /// Panics if `dir_id` does not come from this box.
    pub fn dir(
        &self,
        dir_id: DirId,
    ) -> &DirNode {
        &self.dirs[dir_id.0]
    }

    /// Directory by path relative to box root, eg. `assets/css`.
    pub fn dir_by_path(
        &self,
        path: &str,
    ) -> Option<&DirNode> {
        let dir_id = *self.dirs_by_path.get(path)?;
        Some(self.dir(dir_id))
    }

    /// Child directories of `dir`, in stored order.
    pub fn child_dirs<'a>(
        &'a self,
        dir: &'a DirNode,
    ) -> impl Iterator<Item = &'a DirNode> + 'a {
        dir.child_dirs.iter().map(|dir_id| self.dir(*dir_id))
    }

    /// All files of all directories.
    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.dirs.iter().flat_map(|dir| dir.child_files.iter())
    }

    /// File by path relative to box root, eg. `assets/css/style.css`.
    pub fn file_by_path(
        &self,
        path: &str,
    ) -> Option<&FileNode> {
        let path = BoxPath::from_string(path.to_owned());
        let parent = self.dir_by_path(&path.parent()?)?;
        parent.child_files.iter().find(|file| file.path == path)
    }

    /// Number of files in the box.
    pub fn files_count(&self) -> usize {
        self.dirs.iter().map(|dir| dir.child_files.len()).sum()
    }
}
