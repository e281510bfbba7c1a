//! Output helpers. Contains [Sink], the buffered, byte counting destination
//! of generated source, and [store_file], writing it atomically to fs.

use crate::error::Error;
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};
use tempfile::Builder;

/// Capacity of the output buffer.
pub const BUFFER_CAPACITY: usize = 100 * 1024;

/// Buffered destination of generated source.
///
/// All writes (verbatim copies and escaped content) go through a single large
/// buffer. Nothing is considered written until [Sink::finish] flushed it.
pub struct Sink<W: Write> {
    inner: BufWriter<Counter<W>>,
}
impl<W: Write> Sink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self::with_capacity(BUFFER_CAPACITY, writer)
    }

    /// Wraps `writer` using buffer of given `capacity`.
    pub fn with_capacity(
        capacity: usize,
        writer: W,
    ) -> Self {
        let inner = BufWriter::with_capacity(capacity, Counter { inner: writer, written: 0 });
        Self { inner }
    }

    /// Flushes all buffered data, returning the destination writer and total
    /// number of bytes written to it.
    pub fn finish(self) -> Result<(W, u64), Error> {
        let counter = self
            .inner
            .into_inner()
            .map_err(|error| Error::Output(error.into_error()))?;

        let Counter { mut inner, written } = counter;
        inner.flush().map_err(Error::Output)?;

        Ok((inner, written))
    }
}
impl<W: Write> Write for Sink<W> {
    fn write(
        &mut self,
        buffer: &[u8],
    ) -> io::Result<usize> {
        self.inner.write(buffer)
    }

    fn write_all(
        &mut self,
        buffer: &[u8],
    ) -> io::Result<()> {
        self.inner.write_all(buffer)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writer counting bytes passed to the destination.
struct Counter<W: Write> {
    inner: W,
    written: u64,
}
impl<W: Write> Write for Counter<W> {
    fn write(
        &mut self,
        buffer: &[u8],
    ) -> io::Result<usize> {
        let written = self.inner.write(buffer)?;
        self.written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes file at `path` using `write` callback.
///
/// Content is written to a temporary file next to `path`, flushed and synced,
/// and only then renamed to `path`. On any error the temporary file is
/// removed and `path` is left untouched, so a partially written file is never
/// observable.
///
/// An existing destination keeps its permissions. A new one gets the default
/// permissions of newly created files (`0o666` minus umask on unix).
pub fn store_file<T>(
    path: &Path,
    write: impl FnOnce(&mut Sink<&mut fs::File>) -> Result<T, Error>,
) -> Result<(T, u64), Error> {
    let directory = match path.parent() {
        Some(directory) if !directory.as_os_str().is_empty() => directory,
        _ => Path::new("."),
    };

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        // masked by umask on creation, like any new file
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut file = builder.tempfile_in(directory).map_err(Error::Output)?;

    match fs::metadata(path) {
        Ok(metadata) => file
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(Error::Output)?,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(Error::Output(error)),
    }

    let mut sink = Sink::new(file.as_file_mut());
    let result = write(&mut sink)?;
    let (inner, written) = sink.finish()?;
    inner.sync_all().map_err(Error::Output)?;

    file.persist(path).map_err(|error| Error::Output(error.error))?;

    Ok((result, written))
}
