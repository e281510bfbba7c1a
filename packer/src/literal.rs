//! String literal escape grammar. Contains [Escape], the escaped form of a
//! single character, [escape_to_string] for short values and [unquote], the
//! parser reading escaped text back into bytes.
//!
//! The grammar is the interpreted string literal grammar of Go:
//! - `\\` and `\"`,
//! - `\a \b \f \n \r \t \v`,
//! - `\xHH` for bytes that are not valid utf-8 and for low control bytes,
//! - `\uHHHH` for other non-printable characters below `0x10000`,
//! - `\UHHHHHHHH` for non-printable characters above.
//!
//! Every other (printable) character is written verbatim, so escaped text is
//! always valid utf-8.

use bstr::decode_utf8;
use std::{io, str::Chars};
use thiserror::Error;
use unicode_general_category::{GeneralCategory, get_general_category};

/// Maximum length of utf-8 encoded character.
pub const UTF8_CHAR_WIDTH_MAX: usize = 4;
/// Maximum length of single escape sequence (`\UHHHHHHHH`).
pub const ESCAPE_WIDTH_MAX: usize = 10;
/// Highest valid unicode code point.
pub const CODE_POINT_MAX: u32 = 0x10FFFF;
/// Substituted for code points that can not be represented.
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";

/// Escaped form of a single character (or a single invalid byte).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Escape {
    /// Printable character, written as is (in its original utf-8 form).
    Verbatim(char),
    /// Two character escape, `\` followed by given ascii character, eg. `n`
    /// for `\n` or `"` for `\"`.
    Short(u8),
    /// Escaped byte, `\xHH`.
    Byte(u8),
    /// Escaped code point below `0x10000`, `\uHHHH`.
    Unicode4(u16),
    /// Escaped code point, `\UHHHHHHHH`.
    Unicode8(u32),
}
impl Escape {
    /// Decodes first character of `window` and classifies it.
    ///
    /// Returns the [Escape] and number of input bytes it covers (1 to 4).
    /// `window` must not be empty and should contain at least
    /// [UTF8_CHAR_WIDTH_MAX] bytes, unless input ends sooner. Otherwise a
    /// truncated multi-byte character will be taken for invalid bytes.
    pub fn next(window: &[u8]) -> (Self, usize) {
        debug_assert!(!window.is_empty());

        match decode_utf8(window) {
            (Some(character), width) => (Self::from_char(character), width),
            // invalid sequence, we always consume just the first byte
            (None, _) => (Self::Byte(window[0]), 1),
        }
    }

    /// Classifies valid character.
    pub fn from_char(character: char) -> Self {
        match character {
            '"' | '\\' => Self::Short(character as u8),
            character if is_printable(character) => Self::Verbatim(character),
            '\x07' => Self::Short(b'a'),
            '\x08' => Self::Short(b'b'),
            '\x0C' => Self::Short(b'f'),
            '\n' => Self::Short(b'n'),
            '\r' => Self::Short(b'r'),
            '\t' => Self::Short(b't'),
            '\x0B' => Self::Short(b'v'),
            character if character < ' ' => Self::Byte(character as u8),
            character => Self::from_code_point(character as u32),
        }
    }

    /// Fixed width escape for non-printable code point. Code points above
    /// [CODE_POINT_MAX] are replaced with [REPLACEMENT_CHARACTER].
    pub fn from_code_point(mut code_point: u32) -> Self {
        if code_point > CODE_POINT_MAX {
            code_point = REPLACEMENT_CHARACTER;
        }
        match u16::try_from(code_point) {
            Ok(code_point) => Self::Unicode4(code_point),
            Err(_) => Self::Unicode8(code_point),
        }
    }

    /// Number of output bytes this escape takes.
    pub fn width(&self) -> usize {
        match self {
            Self::Verbatim(character) => character.len_utf8(),
            Self::Short(_) => 2,
            Self::Byte(_) => 4,
            Self::Unicode4(_) => 6,
            Self::Unicode8(_) => 10,
        }
    }

    /// Encodes into `buffer`, returning the used part.
    pub fn encode<'b>(
        &self,
        buffer: &'b mut [u8; ESCAPE_WIDTH_MAX],
    ) -> &'b [u8] {
        let length = match *self {
            Self::Verbatim(character) => character.encode_utf8(buffer).len(),
            Self::Short(short) => {
                buffer[0] = b'\\';
                buffer[1] = short;
                2
            }
            Self::Byte(byte) => {
                buffer[..2].copy_from_slice(b"\\x");
                hex_encode(byte as u32, &mut buffer[2..4]);
                4
            }
            Self::Unicode4(code_point) => {
                buffer[..2].copy_from_slice(b"\\u");
                hex_encode(code_point as u32, &mut buffer[2..6]);
                6
            }
            Self::Unicode8(code_point) => {
                buffer[..2].copy_from_slice(b"\\U");
                hex_encode(code_point, &mut buffer[2..10]);
                10
            }
        };
        &buffer[..length]
    }

    /// Writes escaped form into `writer`, returns number of bytes written.
    pub fn write_to<W: io::Write>(
        &self,
        writer: &mut W,
    ) -> io::Result<usize> {
        let mut buffer = [0u8; ESCAPE_WIDTH_MAX];
        let encoded = self.encode(&mut buffer);
        writer.write_all(encoded)?;
        Ok(encoded.len())
    }

    /// Appends escaped form to `target`.
    pub fn push_to(
        &self,
        target: &mut String,
    ) {
        match *self {
            Self::Verbatim(character) => target.push(character),
            _ => {
                // all non-verbatim escapes are ascii
                let mut buffer = [0u8; ESCAPE_WIDTH_MAX];
                target.extend(self.encode(&mut buffer).iter().map(|byte| *byte as char));
            }
        }
    }
}

/// Writes lowercase hex digits of `value` filling whole `target`.
fn hex_encode(
    value: u32,
    target: &mut [u8],
) {
    let digits = target.len();
    for (index, digit) in target.iter_mut().enumerate() {
        let shift = 4 * (digits - 1 - index);
        *digit = LOWER_HEX[((value >> shift) & 0xF) as usize];
    }
}

/// Reports whether `character` is printed verbatim inside a literal.
///
/// Printable are letters, marks, numbers, punctuation, symbols (general
/// categories L, M, N, P, S) and the ascii space. Everything else, including
/// unassigned code points, is escaped.
pub fn is_printable(character: char) -> bool {
    if character == ' ' {
        return true;
    }

    !matches!(
        get_general_category(character),
        GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

/// Escapes `content` as literal body (without surrounding quotes).
///
/// Characters listed in `reserved` (ascii only) are always written as
/// `\xHH`, even if printable. This is used for placeholder paths and template
/// values, so they can never contain placeholder delimiters.
///
/// # Examples
///
/// ```
/// # use static_box_packer::literal::escape_to_string;
/// assert_eq!(escape_to_string(b"a\"b\n\xff", &[]), "a\\\"b\\n\\xff");
/// assert_eq!(escape_to_string(b"user@host", b"@"), "user\\x40host");
/// ```
pub fn escape_to_string(
    content: &[u8],
    reserved: &[u8],
) -> String {
    let mut target = String::with_capacity(content.len());

    let mut position = 0;
    while position < content.len() {
        let window_end = (position + UTF8_CHAR_WIDTH_MAX).min(content.len());
        let (mut escape, width) = Escape::next(&content[position..window_end]);

        if let Escape::Verbatim(character) = escape
            && character.is_ascii()
            && reserved.contains(&(character as u8))
        {
            escape = Escape::Byte(character as u8);
        }

        escape.push_to(&mut target);
        position += width;
    }

    target
}

/// Error returned by [unquote].
#[derive(Error, PartialEq, Eq, Debug)]
pub enum UnquoteError {
    /// Text ends in the middle of escape sequence.
    #[error("unexpected end of literal inside escape sequence")]
    UnexpectedEnd,
    /// Escape sequence not defined by the grammar.
    #[error("unknown escape sequence \\{0}")]
    UnknownEscape(char),
    /// Hex digits of escape sequence are malformed.
    #[error("invalid hex digits in escape sequence: {0:?}")]
    InvalidHex(String),
    /// `\u` or `\U` escape names surrogate or out of range code point.
    #[error("invalid code point {0:#x} in escape sequence")]
    InvalidCodePoint(u32),
    /// Quote or newline found unescaped.
    #[error("character {0:?} must be escaped")]
    Unescaped(char),
}

/// Parses literal body (without surrounding quotes) back into bytes.
///
/// This is the inverse of escaping: for any content, unquoting its escaped
/// form yields exactly the original bytes.
///
/// # Examples
///
/// ```
/// # use static_box_packer::literal::unquote;
/// assert_eq!(unquote("hello\\\"world\\xff").unwrap(), b"hello\"world\xff");
/// assert_eq!(unquote("\\u20ac").unwrap(), "\u{20ac}".as_bytes());
/// assert!(unquote("\\q").is_err());
/// ```
pub fn unquote(literal: &str) -> Result<Vec<u8>, UnquoteError> {
    let mut content = Vec::with_capacity(literal.len());

    let mut characters = literal.chars();
    while let Some(character) = characters.next() {
        match character {
            '\\' => {}
            '"' | '\n' => return Err(UnquoteError::Unescaped(character)),
            character => {
                let mut buffer = [0u8; UTF8_CHAR_WIDTH_MAX];
                content.extend_from_slice(character.encode_utf8(&mut buffer).as_bytes());
                continue;
            }
        }

        let escaped = characters.next().ok_or(UnquoteError::UnexpectedEnd)?;
        match escaped {
            '\\' => content.push(b'\\'),
            '"' => content.push(b'"'),
            'a' => content.push(0x07),
            'b' => content.push(0x08),
            'f' => content.push(0x0C),
            'n' => content.push(b'\n'),
            'r' => content.push(b'\r'),
            't' => content.push(b'\t'),
            'v' => content.push(0x0B),
            'x' => {
                let byte = hex_decode(&mut characters, 2)?;
                content.push(byte as u8);
            }
            'u' | 'U' => {
                let digits = if escaped == 'u' { 4 } else { 8 };
                let code_point = hex_decode(&mut characters, digits)?;
                let character =
                    char::from_u32(code_point).ok_or(UnquoteError::InvalidCodePoint(code_point))?;
                let mut buffer = [0u8; UTF8_CHAR_WIDTH_MAX];
                content.extend_from_slice(character.encode_utf8(&mut buffer).as_bytes());
            }
            escaped => return Err(UnquoteError::UnknownEscape(escaped)),
        }
    }

    Ok(content)
}

/// Reads exactly `digits` hex digits.
fn hex_decode(
    characters: &mut Chars<'_>,
    digits: usize,
) -> Result<u32, UnquoteError> {
    let hex = characters.take(digits).collect::<String>();
    if hex.chars().count() != digits {
        return Err(UnquoteError::UnexpectedEnd);
    }
    if !hex.chars().all(|digit| digit.is_ascii_hexdigit()) {
        return Err(UnquoteError::InvalidHex(hex));
    }

    u32::from_str_radix(&hex, 16).map_err(|_| UnquoteError::InvalidHex(hex))
}
