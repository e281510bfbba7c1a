//! Streaming literal encoder. Contains [StreamEncoder], turning arbitrary
//! byte stream into escaped literal body with bounded memory.

use crate::literal::{Escape, UTF8_CHAR_WIDTH_MAX};
use std::io;
use thiserror::Error;

/// Default capacity of the read buffer.
pub const BUFFER_CAPACITY_DEFAULT: usize = 100 * 1024;
/// Smallest accepted capacity of the read buffer. Must leave room for a whole
/// character in the unconsumed tail plus space for refilling.
pub const BUFFER_CAPACITY_MIN: usize = UTF8_CHAR_WIDTH_MAX + 4;

/// Error of [StreamEncoder::encode]. Read and write side failures are kept
/// apart, as they are reported differently.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Reading the source failed.
    #[error("read failed")]
    Read(#[source] io::Error),
    /// Writing escaped output failed.
    #[error("write failed")]
    Write(#[source] io::Error),
}

/// Streaming encoder escaping content read from a [io::Read] into a
/// [io::Write], using single fixed-size buffer.
///
/// The buffer holds `consumed` bytes already escaped, followed by
/// `filled - consumed` bytes read but not yet escaped. Whenever fewer than
/// [UTF8_CHAR_WIDTH_MAX] unconsumed bytes are left and the source is not
/// exhausted, the tail is moved to the front and the rest of the buffer is
/// refilled. So a character is only ever decoded with all its continuation
/// bytes present (or with end of input confirmed), no matter where source
/// reads split it.
///
/// Per source the encoder goes through: reading (need more data), decoding
/// (enough bytes in window), emitting (escape written), and then back to
/// decoding or reading, until end of input is reached with nothing left
/// unconsumed. Any read or write error ends encoding.
///
/// Encoder may be reused for many sources, the buffer is allocated once.
///
/// # Examples
///
/// ```
/// # use static_box_packer::encoder::StreamEncoder;
/// let mut encoder = StreamEncoder::new();
/// let mut output = Vec::new();
///
/// let written = encoder.encode(&b"hello\"world\n"[..], &mut output).unwrap();
///
/// assert_eq!(output, b"hello\\\"world\\n");
/// assert_eq!(written, output.len());
/// ```
#[derive(Debug)]
pub struct StreamEncoder {
    buffer: Box<[u8]>,
    consumed: usize,
    filled: usize,
    exhausted: bool,
}
impl StreamEncoder {
    /// Creates encoder with [BUFFER_CAPACITY_DEFAULT] buffer.
    pub fn new() -> Self {
        Self::with_capacity(BUFFER_CAPACITY_DEFAULT)
    }

    /// Creates encoder with buffer of given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is less than [BUFFER_CAPACITY_MIN].
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity >= BUFFER_CAPACITY_MIN,
            "buffer capacity must be at least {BUFFER_CAPACITY_MIN}, got {capacity}"
        );

        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            consumed: 0,
            filled: 0,
            exhausted: false,
        }
    }

    /// Capacity of the read buffer. It never changes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Escapes whole `reader` content into `writer`.
    ///
    /// Returns number of bytes written (length of escaped output, not of the
    /// input).
    pub fn encode<R: io::Read, W: io::Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<usize, EncodeError> {
        self.consumed = 0;
        self.filled = 0;
        self.exhausted = false;

        let mut written = 0;
        loop {
            if self.unconsumed() < UTF8_CHAR_WIDTH_MAX && !self.exhausted {
                self.refill(&mut reader).map_err(EncodeError::Read)?;
            }
            if self.unconsumed() == 0 {
                debug_assert!(self.exhausted);
                break;
            }

            let window_end = (self.consumed + UTF8_CHAR_WIDTH_MAX).min(self.filled);
            let (escape, width) = Escape::next(&self.buffer[self.consumed..window_end]);

            written += escape.write_to(&mut writer).map_err(EncodeError::Write)?;
            self.consumed += width;
        }

        Ok(written)
    }

    fn unconsumed(&self) -> usize {
        self.filled - self.consumed
    }

    /// Moves unconsumed tail to the front and reads until there is at least a
    /// full character worth of data or the source is exhausted.
    fn refill<R: io::Read>(
        &mut self,
        reader: &mut R,
    ) -> io::Result<()> {
        self.buffer.copy_within(self.consumed..self.filled, 0);
        self.filled -= self.consumed;
        self.consumed = 0;

        while self.filled < UTF8_CHAR_WIDTH_MAX {
            match reader.read(&mut self.buffer[self.filled..]) {
                Ok(0) => {
                    self.exhausted = true;
                    break;
                }
                Ok(read) => {
                    self.filled += read;
                }
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => return Err(error),
            }
        }

        Ok(())
    }
}
