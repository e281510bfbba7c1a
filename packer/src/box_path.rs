//! Box path helpers. Contains [from_root_relative_path] that creates box
//! paths from fs paths.

use crate::{common::box_path::BoxPath, error::Error};
use std::path::{Component, Path};

/// Creates box path (eg. "dir1/dir2/file.html") from fs path relative to box
/// root (eg. "dir1\\dir2\\file.html" on windows).
///
/// Empty path (the root itself) gives root box path. Only normal components
/// are accepted, `..` or prefixes would escape the root and are reported as
/// [Error::OrphanFile].
///
/// # Examples
///
/// ```
/// # use std::path::PathBuf;
/// # use static_box_packer::box_path::from_root_relative_path;
/// #
/// assert_eq!(
///     from_root_relative_path(&PathBuf::from("path/to/file.txt")).unwrap().as_str(),
///     "path/to/file.txt",
/// );
/// assert!(from_root_relative_path(&PathBuf::from("")).unwrap().is_root());
/// ```
pub fn from_root_relative_path(root_relative_path: &Path) -> Result<BoxPath, Error> {
    // list of path components, eg. ["dir1", "dir2", "file.bin"]
    let segments = root_relative_path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .map(|component| {
            // we cannot handle things like '/' or '..' here
            if !matches!(component, Component::Normal(_)) {
                return Err(Error::OrphanFile {
                    path: root_relative_path.to_path_buf(),
                });
            }

            component.as_os_str().to_str().ok_or_else(|| Error::NonUtf8Path {
                path: root_relative_path.to_path_buf(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(BoxPath::from_segments(segments))
}
