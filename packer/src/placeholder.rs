//! Content placeholder helpers. Contains [emit], creating placeholder token
//! for a source file, and [Segments], splitting rendered text into verbatim
//! parts and placeholders.
//!
//! Placeholder token is `{@`, followed by absolute source path escaped with
//! the literal grammar (with `@` always escaped), followed by `@}`. Token is
//! put in place of file content during render, so expensive content
//! processing is postponed until the output is streamed.

use crate::{error::Error, literal};
use memchr::memmem;
use static_box_common::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN, PLACEHOLDER_RESERVED};
use std::path::{Path, PathBuf};

/// Creates placeholder token for file at `path`.
///
/// Path must be valid utf-8.
///
/// # Examples
///
/// ```
/// # use static_box_packer::placeholder::emit;
/// # use std::path::Path;
/// assert_eq!(
///     emit(Path::new("/data/a \"quoted\"@name.txt")).unwrap(),
///     "{@/data/a \\\"quoted\\\"\\x40name.txt@}"
/// );
/// ```
pub fn emit(path: &Path) -> Result<String, Error> {
    let path = path.to_str().ok_or_else(|| Error::NonUtf8Path {
        path: path.to_path_buf(),
    })?;

    let path_escaped = literal::escape_to_string(path.as_bytes(), &[PLACEHOLDER_RESERVED]);

    let mut token =
        String::with_capacity(PLACEHOLDER_OPEN.len() + path_escaped.len() + PLACEHOLDER_CLOSE.len());
    token.push_str(PLACEHOLDER_OPEN);
    token.push_str(&path_escaped);
    token.push_str(PLACEHOLDER_CLOSE);

    Ok(token)
}

/// Part of rendered text, as yielded by [Segments].
#[derive(PartialEq, Eq, Debug)]
pub enum Segment<'a> {
    /// Text to be copied to output as is.
    Verbatim(&'a [u8]),
    /// Placeholder, with delimiters stripped. Still escaped, see
    /// [Segment::path].
    Placeholder(&'a [u8]),
}
impl Segment<'_> {
    /// For [Segment::Placeholder] decodes source path it refers to.
    pub fn path(&self) -> Result<Option<PathBuf>, Error> {
        let escaped = match self {
            Segment::Verbatim(_) => return Ok(None),
            Segment::Placeholder(escaped) => *escaped,
        };

        let malformed = |reason: String| Error::MalformedPlaceholder {
            token: String::from_utf8_lossy(escaped).into_owned(),
            reason,
        };

        let escaped = std::str::from_utf8(escaped).map_err(|error| malformed(error.to_string()))?;
        let path = literal::unquote(escaped).map_err(|error| malformed(error.to_string()))?;
        let path = String::from_utf8(path).map_err(|error| malformed(error.to_string()))?;

        Ok(Some(PathBuf::from(path)))
    }
}

/// Iterator over [Segment]s of rendered text.
///
/// Yields `Err` if an opening delimiter is not followed by a closing one.
/// Empty verbatim segments are skipped.
///
/// # Examples
///
/// ```
/// # use static_box_packer::placeholder::{Segment, Segments};
/// let segments = Segments::new(b"a = \"{@/x.txt@}\"")
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
///
/// assert_eq!(
///     segments,
///     [
///         Segment::Verbatim(b"a = \""),
///         Segment::Placeholder(b"/x.txt"),
///         Segment::Verbatim(b"\""),
///     ]
/// );
/// ```
pub struct Segments<'a> {
    rest: &'a [u8],
    pending: Option<&'a [u8]>,
    open_finder: memmem::Finder<'static>,
    close_finder: memmem::Finder<'static>,
}
impl<'a> Segments<'a> {
    /// Starts scanning `text`.
    pub fn new(text: &'a [u8]) -> Self {
        Self {
            rest: text,
            pending: None,
            open_finder: memmem::Finder::new(PLACEHOLDER_OPEN.as_bytes()),
            close_finder: memmem::Finder::new(PLACEHOLDER_CLOSE.as_bytes()),
        }
    }
}
impl<'a> Iterator for Segments<'a> {
    type Item = Result<Segment<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(placeholder) = self.pending.take() {
            return Some(Ok(Segment::Placeholder(placeholder)));
        }
        if self.rest.is_empty() {
            return None;
        }

        let open = match self.open_finder.find(self.rest) {
            Some(open) => open,
            None => {
                let verbatim = self.rest;
                self.rest = &[];
                return Some(Ok(Segment::Verbatim(verbatim)));
            }
        };

        let inner_start = open + PLACEHOLDER_OPEN.len();
        let close = match self.close_finder.find(&self.rest[inner_start..]) {
            Some(close) => inner_start + close,
            None if open > 0 => {
                // text before the broken token comes first, error on next call
                let verbatim = &self.rest[..open];
                self.rest = &self.rest[open..];
                return Some(Ok(Segment::Verbatim(verbatim)));
            }
            None => {
                let token = String::from_utf8_lossy(&self.rest[open..]).into_owned();
                self.rest = &[];
                return Some(Err(Error::MalformedPlaceholder {
                    token,
                    reason: "missing closing delimiter".to_owned(),
                }));
            }
        };

        let verbatim = &self.rest[..open];
        let placeholder = &self.rest[inner_start..close];
        self.rest = &self.rest[close + PLACEHOLDER_CLOSE.len()..];

        if verbatim.is_empty() {
            return Some(Ok(Segment::Placeholder(placeholder)));
        }
        self.pending = Some(placeholder);
        Some(Ok(Segment::Verbatim(verbatim)))
    }
}
