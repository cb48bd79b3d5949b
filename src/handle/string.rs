use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::lex::is_control_byte;
use crate::source::ByteSource;

use super::HandleCore;

/// A JSON string.
pub struct StringHandle<R> {
    pub(crate) core: HandleCore<R>,
}

impl<R: Read + Seek> StringHandle<R> {
    pub(crate) fn new(core: HandleCore<R>) -> Self {
        Self { core }
    }

    /// The byte offset of this value's first byte (the opening quote).
    pub fn start_offset(&self) -> u64 {
        self.core.start_offset
    }

    /// Returns a fresh, lazy, non-restartable iterator over this string's
    /// decoded characters, starting from the opening quote. Each call
    /// produces an independent scan from the start of the string; a given
    /// `Characters` instance can only be driven forward once.
    pub fn characters(&self) -> Characters<'_, R> {
        Characters { handle: self, pos: self.core.start_offset, started: false, done: false }
    }

    /// Forces recognition of the string, advancing the cursor past its
    /// closing quote without retaining the decoded text.
    pub fn parse(&self) -> Result<()> {
        if self.core.is_loaded() {
            return Ok(());
        }
        for ch in self.characters() {
            ch?;
        }
        Ok(())
    }

    /// Decodes the full string into an owned `String`.
    pub fn decode(&self) -> Result<String> {
        let mut out = String::new();
        for ch in self.characters() {
            out.push(ch?);
        }
        Ok(out)
    }
}

/// A lazy, forward-only iterator over the decoded characters of a
/// [`StringHandle`]. Each call to `next` reads and decodes exactly one
/// source character, so a caller that only needs a prefix of a long string
/// never pays for the rest of it.
pub struct Characters<'h, R> {
    handle: &'h StringHandle<R>,
    pos: u64,
    started: bool,
    done: bool,
}

impl<'h, R: Read + Seek> Iterator for Characters<'h, R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Result<char>> {
        if self.done {
            return None;
        }
        let mut src = self.handle.core.source.borrow_mut();
        if let Err(e) = src.seek_absolute(self.pos) {
            self.done = true;
            return Some(Err(e));
        }
        if !self.started {
            match src.read_byte() {
                Ok(b'"') => self.started = true,
                Ok(_) => {
                    self.done = true;
                    return Some(Err(Error::Logic("string handle did not start with a quote")));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        let pos_before = src.tell();
        let b = match src.read_byte() {
            Ok(b) => b,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        if is_control_byte(b) {
            self.done = true;
            return Some(Err(Error::ControlByteInString(pos_before)));
        }
        if b == b'"' {
            self.done = true;
            self.handle.core.set_end_offset(src.tell());
            return None;
        }
        if b == b'\\' {
            return Some(match decode_escape(&mut src, pos_before) {
                Ok(ch) => {
                    self.pos = src.tell();
                    Ok(ch)
                }
                Err(e) => {
                    self.done = true;
                    Err(e)
                }
            });
        }

        match decode_utf8_scalar(&mut src, b, pos_before) {
            Ok(ch) => {
                self.pos = src.tell();
                Some(Ok(ch))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn decode_utf8_scalar<R: Read + Seek>(src: &mut ByteSource<R>, first: u8, pos: u64) -> Result<char> {
    let extra = if first < 0x80 {
        0
    } else if first & 0xE0 == 0xC0 {
        1
    } else if first & 0xF0 == 0xE0 {
        2
    } else if first & 0xF8 == 0xF0 {
        3
    } else {
        return Err(Error::UnexpectedByte { byte: first, pos });
    };

    let mut buf = vec![first];
    if extra > 0 {
        buf.extend(src.read(extra, true)?);
    }
    let s = std::str::from_utf8(&buf).map_err(|_| Error::UnexpectedByte { byte: first, pos })?;
    Ok(s.chars().next().expect("from_utf8 succeeded on a non-empty buffer"))
}

fn decode_escape<R: Read + Seek>(src: &mut ByteSource<R>, pos: u64) -> Result<char> {
    let b = src.read_byte()?;
    Ok(match b {
        b'"' => '"',
        b'\\' => '\\',
        b'/' => '/',
        b'b' => '\u{0008}',
        b'f' => '\u{000C}',
        b'n' => '\n',
        b'r' => '\r',
        b't' => '\t',
        b'u' => return decode_unicode_escape(src, pos),
        _ => return Err(Error::InvalidEscape(pos)),
    })
}

fn read_hex4<R: Read + Seek>(src: &mut ByteSource<R>, pos: u64) -> Result<u16> {
    let bytes = src.read(4, true)?;
    let s = std::str::from_utf8(&bytes).map_err(|_| Error::InvalidUnicodeEscape(pos))?;
    u16::from_str_radix(s, 16).map_err(|_| Error::InvalidUnicodeEscape(pos))
}

fn decode_unicode_escape<R: Read + Seek>(src: &mut ByteSource<R>, pos: u64) -> Result<char> {
    let unit = read_hex4(src, pos)?;
    if (0xD800..=0xDBFF).contains(&unit) {
        let b1 = src.read_byte()?;
        let b2 = src.read_byte()?;
        if b1 != b'\\' || b2 != b'u' {
            return Err(Error::InvalidSurrogate(pos));
        }
        let low = read_hex4(src, pos)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(Error::InvalidSurrogate(pos));
        }
        let code = 0x10000u32 + (((unit as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00);
        char::from_u32(code).ok_or(Error::Logic("surrogate pair decoded to an invalid code point"))
    } else if (0xDC00..=0xDFFF).contains(&unit) {
        Err(Error::InvalidSurrogate(pos))
    } else {
        char::from_u32(unit as u32).ok_or(Error::InvalidUnicodeEscape(pos))
    }
}

#[cfg(test)]
mod tests {
    use crate::load;
    use std::io::Cursor;

    fn decode(text: &str) -> crate::error::Result<String> {
        let h = load(Cursor::new(text.as_bytes().to_vec())).unwrap();
        h.as_string().unwrap().decode()
    }

    #[test]
    fn plain_ascii() {
        assert_eq!(decode(r#""hello""#).unwrap(), "hello");
    }

    #[test]
    fn basic_escapes() {
        assert_eq!(decode(r#""a\tb\nc\"d""#).unwrap(), "a\tb\nc\"d");
    }

    #[test]
    fn unicode_escape() {
        assert_eq!(decode("\"\\u0041\"").unwrap(), "A");
    }

    #[test]
    fn surrogate_pair() {
        // U+1F600 GRINNING FACE
        assert_eq!(decode(r#""😀""#).unwrap(), "\u{1F600}");
    }

    #[test]
    fn lone_high_surrogate_fails() {
        assert!(decode(r#""\ud83d""#).is_err());
    }

    #[test]
    fn lone_low_surrogate_fails() {
        assert!(decode(r#""\ude00""#).is_err());
    }

    #[test]
    fn control_byte_fails() {
        let h = load(Cursor::new(b"\"a\x01b\"".to_vec())).unwrap();
        assert!(h.as_string().unwrap().decode().is_err());
    }

    #[test]
    fn embedded_utf8_passes_through() {
        assert_eq!(decode("\"caf\u{e9}\"").unwrap(), "caf\u{e9}");
    }

    #[test]
    fn characters_is_lazy_and_independent_per_call() {
        let h = load(Cursor::new(br#""abc""#.to_vec())).unwrap();
        let s = h.as_string().unwrap();
        let first: Option<char> = s.characters().next().map(|r| r.unwrap());
        assert_eq!(first, Some('a'));
        // A fresh call restarts from the beginning.
        assert_eq!(s.decode().unwrap(), "abc");
    }
}
