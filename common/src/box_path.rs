//! Box path contains custom type for representing path inside a `box`.

use std::{borrow::Borrow, fmt, ops::Deref};

/// Separator used between segments of [BoxPath], regardless of host path
/// convention.
pub const SEPARATOR: char = '/';

/// [BoxPath] represents path of a file or directory relative to the `box`
/// root, eg. `assets/css/style.css`.
///
/// Segments are always separated with `/`, there is no leading or trailing
/// separator. The box root itself is represented by an empty path.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BoxPath {
    inner: String,
}
impl BoxPath {
    /// Construct path from string representation. Refer to [self] for details.
    /// Leading and trailing separators are stripped.
    pub fn from_string(inner: String) -> Self {
        let trimmed = inner.trim_matches(SEPARATOR);
        let inner = if trimmed.len() == inner.len() {
            inner
        } else {
            trimmed.to_owned()
        };

        Self { inner }
    }

    /// Constructs path from its segments, eg. `["assets", "style.css"]`.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let inner = itertools::join(segments, "/");
        Self::from_string(inner)
    }

    /// Path of the `box` root (empty string).
    pub fn root() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Whether this is the `box` root.
    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns path of the containing directory, by stripping last segment.
    ///
    /// For single segment paths this is the root, for the root itself this is
    /// [None].
    pub fn parent(&self) -> Option<BoxPath> {
        if self.is_root() {
            return None;
        }

        let parent = match self.inner.rsplit_once(SEPARATOR) {
            Some((parent, _name)) => Self {
                inner: parent.to_owned(),
            },
            None => Self::root(),
        };
        Some(parent)
    }

    /// Last segment of the path, empty for root.
    pub fn name(&self) -> &str {
        match self.inner.rsplit_once(SEPARATOR) {
            Some((_parent, name)) => name,
            None => &self.inner,
        }
    }

    /// Iterates over path segments. Root has no segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
    }

    /// Returns inner string.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

// to allow searching in HashMap directly by relative path (which is str)
impl Deref for BoxPath {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl Borrow<str> for BoxPath {
    fn borrow(&self) -> &str {
        self.inner.as_str()
    }
}
impl fmt::Display for BoxPath {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.inner)
    }
}
