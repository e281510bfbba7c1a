//! Resolve pass. Contains [fill], replacing every placeholder of rendered
//! text with escaped content of the file it refers to.

use crate::{
    encoder::{EncodeError, StreamEncoder},
    error::Error,
    placeholder::{Segment, Segments},
};
use std::{
    fs,
    io::{self, Write},
    path::Path,
};

/// Source of file content for [fill].
///
/// Filesystem is the usual one ([FsContentSource]), tests may provide
/// content from memory.
pub trait ContentSource {
    /// Reader of single file content.
    type Reader: io::Read;

    /// Opens file at `path` for reading. Reader is dropped (closed) as soon as
    /// its content is escaped, or on error.
    fn open(
        &mut self,
        path: &Path,
    ) -> io::Result<Self::Reader>;
}

/// [ContentSource] reading files from the filesystem.
#[derive(Debug, Default)]
pub struct FsContentSource;
impl ContentSource for FsContentSource {
    type Reader = fs::File;

    fn open(
        &mut self,
        path: &Path,
    ) -> io::Result<Self::Reader> {
        fs::File::open(path)
    }
}

/// Counters collected by [fill].
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct FillSummary {
    /// Number of placeholders replaced.
    pub placeholders: usize,
    /// Bytes copied verbatim from rendered text.
    pub verbatim_bytes: u64,
    /// Bytes of escaped content written in place of placeholders.
    pub content_bytes: u64,
}

/// Copies `text` into `writer`, replacing each placeholder with escaped
/// content of referenced file, read from `source` with `encoder`.
///
/// Files are processed one at a time, each opened, streamed and closed before
/// the next placeholder is looked at.
///
/// # Examples
///
/// ```
/// # use static_box_packer::{
/// #     encoder::StreamEncoder,
/// #     fill::{fill, ContentSource},
/// #     placeholder,
/// # };
/// # use std::{io, path::Path};
/// #
/// struct Memory;
/// impl ContentSource for Memory {
///     type Reader = &'static [u8];
///
///     fn open(&mut self, _path: &Path) -> io::Result<Self::Reader> {
///         Ok(&b"hello\"world"[..])
///     }
/// }
///
/// let text = format!("content = \"{}\"", placeholder::emit(Path::new("/a.txt")).unwrap());
///
/// let mut output = Vec::new();
/// fill(text.as_bytes(), &mut Memory, &mut StreamEncoder::new(), &mut output).unwrap();
///
/// assert_eq!(output, b"content = \"hello\\\"world\"");
/// ```
pub fn fill<S: ContentSource, W: Write>(
    text: &[u8],
    source: &mut S,
    encoder: &mut StreamEncoder,
    writer: &mut W,
) -> Result<FillSummary, Error> {
    let mut summary = FillSummary::default();

    for segment in Segments::new(text) {
        let segment = segment?;
        match segment {
            Segment::Verbatim(verbatim) => {
                writer.write_all(verbatim).map_err(Error::Output)?;
                summary.verbatim_bytes += verbatim.len() as u64;
            }
            Segment::Placeholder(_) => {
                let path = match segment.path()? {
                    Some(path) => path,
                    None => continue,
                };
                log::trace!("resolving content of {}", path.display());

                let encode_io_error = |error| Error::EncodeIo {
                    path: path.clone(),
                    source: error,
                };

                let reader = source.open(&path).map_err(encode_io_error)?;
                let written = encoder
                    .encode(reader, &mut *writer)
                    .map_err(|error| match error {
                        EncodeError::Read(error) => encode_io_error(error),
                        EncodeError::Write(error) => Error::Output(error),
                    })?;

                summary.placeholders += 1;
                summary.content_bytes += written as u64;
            }
        }
    }

    Ok(summary)
}
