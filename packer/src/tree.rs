//! Tree builder. Contains [build], walking a box root directory into an
//! [EmbedBox], and [Builder], assembling the box node by node.

use crate::{
    box_path,
    common::{
        box_path::BoxPath,
        embed_box::EmbedBox,
        identifier::{IdentifierGenerator, NodeKind},
        node::{DirId, DirNode, FileNode},
    },
    error::Error,
    placeholder,
};
use std::{
    collections::{HashMap, hash_map},
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};
use walkdir::{DirEntry, WalkDir};

/// Settings for [build] function.
///
/// If not sure what to set here, use [Default].
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Visit directory entries sorted by file name. Gives the same output
    /// regardless of filesystem listing order. If disabled, raw listing order
    /// is kept.
    pub sort_by_name: bool,
}
impl Default for BuildOptions {
    fn default() -> Self {
        Self { sort_by_name: true }
    }
}

/// Builder for [EmbedBox]. Inside it keeps the directories created so far,
/// indexed by their [BoxPath], so children can be attached to parents in
/// constant time.
///
/// Directories must be added before their contents (pre-order), which is
/// what directory walk gives.
#[derive(Debug)]
pub struct Builder<'g> {
    identifier_generator: &'g IdentifierGenerator,

    name: String,
    source_path: PathBuf,
    mod_time: i64,

    dirs: Vec<DirNode>,
    dirs_by_path: HashMap<BoxPath, DirId>,
}
impl<'g> Builder<'g> {
    /// Creates builder with root directory only.
    pub fn new(
        identifier_generator: &'g IdentifierGenerator,
        name: String,
        source_path: PathBuf,
        mod_time: i64,
    ) -> Self {
        let root = DirNode::new(
            identifier_generator.next(NodeKind::Dir),
            BoxPath::root(),
            mod_time,
        );

        let dirs = vec![root];
        let dirs_by_path = HashMap::from([(BoxPath::root(), EmbedBox::ROOT)]);

        Self {
            identifier_generator,
            name,
            source_path,
            mod_time,
            dirs,
            dirs_by_path,
        }
    }

    /// Adds directory under `path`. Parent directory must already exist.
    pub fn dir_add(
        &mut self,
        path: BoxPath,
        mod_time: i64,
    ) -> Result<DirId, Error> {
        let parent_id = self
            .parent_id(&path)
            .ok_or_else(|| Error::MissingParent {
                path: self.source_path.join(path.as_str()),
            })?;

        let dir_id = DirId(self.dirs.len());
        match self.dirs_by_path.entry(path.clone()) {
            hash_map::Entry::Occupied(_) => {
                return Err(Error::DuplicatePath {
                    path: self.source_path.join(path.as_str()),
                });
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(dir_id);
            }
        }

        let identifier = self.identifier_generator.next(NodeKind::Dir);
        self.dirs.push(DirNode::new(identifier, path, mod_time));
        self.dirs[parent_id.0].child_dirs.push(dir_id);

        Ok(dir_id)
    }

    /// Adds file under `path`, with content to be read from `source_path`.
    /// Parent directory must already exist.
    pub fn file_add(
        &mut self,
        path: BoxPath,
        mod_time: i64,
        source_path: &Path,
    ) -> Result<(), Error> {
        let parent_id = self.parent_id(&path).ok_or_else(|| Error::OrphanFile {
            path: source_path.to_path_buf(),
        })?;

        let content_placeholder = placeholder::emit(source_path)?;
        let identifier = self.identifier_generator.next(NodeKind::File);

        self.dirs[parent_id.0].child_files.push(FileNode {
            identifier,
            path,
            mod_time,
            content_placeholder,
        });

        Ok(())
    }

    fn parent_id(
        &self,
        path: &BoxPath,
    ) -> Option<DirId> {
        let parent = path.parent()?;
        self.dirs_by_path.get(&parent).copied()
    }

    /// Finalizes the builder, returning built [EmbedBox].
    pub fn finalize(self) -> EmbedBox {
        EmbedBox {
            name: self.name,
            source_path: self.source_path,
            mod_time: self.mod_time,
            dirs: self.dirs,
            dirs_by_path: self.dirs_by_path,
        }
    }
}

/// Walks directory at `path` and builds [EmbedBox] named `name`.
///
/// If `path` is a symbolic link, it is resolved once. Symbolic links beneath
/// the root are not followed: links to files are embedded as files (content
/// read through the link), links to directories are skipped. Other special
/// files (sockets, devices, ...) are skipped. No file content is read here,
/// files get placeholders instead.
///
/// All node identifiers are taken from `identifier_generator`, which should
/// be shared by all boxes of a generation run.
///
/// # Examples
///
/// ```no_run
/// # use std::path::Path;
/// # use static_box_packer::{
/// #     common::identifier::IdentifierGenerator,
/// #     tree::{build, BuildOptions},
/// # };
/// #
/// # fn main() -> Result<(), static_box_packer::error::Error> {
/// let identifier_generator = IdentifierGenerator::new();
/// let embed_box = build(
///     "assets",
///     Path::new("./assets"),
///     &identifier_generator,
///     &BuildOptions::default(),
/// )?;
/// println!("{} files", embed_box.files_count());
/// # Ok(())
/// # }
/// ```
pub fn build(
    name: &str,
    path: &Path,
    identifier_generator: &IdentifierGenerator,
    options: &BuildOptions,
) -> Result<EmbedBox, Error> {
    let discovery_error = |source| Error::Discovery {
        name: name.to_owned(),
        path: path.to_path_buf(),
        source,
    };

    // follow root link (if any) once, make absolute
    let root_path = dunce::canonicalize(path).map_err(discovery_error)?;
    let root_metadata = fs::metadata(&root_path).map_err(discovery_error)?;
    if !root_metadata.is_dir() {
        return Err(Error::NotADirectory {
            name: name.to_owned(),
            path: root_path,
        });
    }

    log::info!("embedding box {:?} from {}", name, root_path.display());

    let mut builder = Builder::new(
        identifier_generator,
        name.to_owned(),
        root_path.clone(),
        mod_time_from_system_time(root_metadata.modified().ok()),
    );

    let mut walk_dir = WalkDir::new(&root_path).follow_links(false);
    if options.sort_by_name {
        walk_dir = walk_dir.sort_by_file_name();
    }

    for entry in walk_dir {
        let entry = entry.map_err(|source| Error::Walk {
            name: name.to_owned(),
            source,
        })?;

        // root was already added by the builder
        if entry.depth() == 0 {
            continue;
        }

        entry_add(&mut builder, &root_path, &entry)?;
    }

    Ok(builder.finalize())
}

/// Adds single walked entry to `builder`.
fn entry_add(
    builder: &mut Builder<'_>,
    root_path: &Path,
    entry: &DirEntry,
) -> Result<(), Error> {
    let entry_path = entry.path();

    // strip prefix, so entry_path is relative to box root
    let root_relative_path = entry_path
        .strip_prefix(root_path)
        .map_err(|_| Error::OrphanFile {
            path: entry_path.to_path_buf(),
        })?;
    let path = box_path::from_root_relative_path(root_relative_path)?;

    let file_type = entry.file_type();
    if file_type.is_dir() {
        let mod_time = mod_time_from_entry(entry, entry_path)?;
        log::debug!("includes dir: {:?}", path.as_str());
        builder.dir_add(path, mod_time)?;
    } else if file_type.is_file() {
        let mod_time = mod_time_from_entry(entry, entry_path)?;
        log::debug!("includes file: {:?}", path.as_str());
        builder.file_add(path, mod_time, entry_path)?;
    } else if file_type.is_symlink() {
        // we do not follow links below root, but files behind them can be
        // read as usual
        let metadata = fs::metadata(entry_path).map_err(|source| Error::Metadata {
            path: entry_path.to_path_buf(),
            source,
        })?;
        if metadata.is_file() {
            log::debug!("includes file (link): {:?}", path.as_str());
            let mod_time = mod_time_from_system_time(metadata.modified().ok());
            builder.file_add(path, mod_time, entry_path)?;
        } else {
            log::warn!(
                "skipping link to directory {}, links below box root are not followed",
                entry_path.display()
            );
        }
    } else {
        log::warn!(
            "skipping {}, only regular files and directories can be embedded",
            entry_path.display()
        );
    }

    Ok(())
}

fn mod_time_from_entry(
    entry: &DirEntry,
    entry_path: &Path,
) -> Result<i64, Error> {
    let metadata = entry.metadata().map_err(|error| Error::Metadata {
        path: entry_path.to_path_buf(),
        source: error.into(),
    })?;
    Ok(mod_time_from_system_time(metadata.modified().ok()))
}

/// Converts to unix seconds. Missing time (not supported by platform) gives 0.
fn mod_time_from_system_time(system_time: Option<SystemTime>) -> i64 {
    let system_time = match system_time {
        Some(system_time) => system_time,
        None => return 0,
    };

    match system_time.duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_secs() as i64,
        // before epoch, round towards negative infinity
        Err(error) => {
            let duration = error.duration();
            let seconds = -(duration.as_secs() as i64);
            if duration.subsec_nanos() > 0 {
                seconds - 1
            } else {
                seconds
            }
        }
    }
}
