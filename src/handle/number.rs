use std::cell::{Cell, RefCell};
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::source::ByteSource;

use super::HandleCore;

/// A decoded JSON number: small and integral numbers stay exact as
/// [`Number::Int`], everything else (fractional, exponent, or
/// integer-overflowing) becomes [`Number::Float`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Widens to `f64`, losslessly for [`Number::Float`] and with the usual
    /// `i64 -> f64` rounding for [`Number::Int`].
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

fn is_terminator(b: u8) -> bool {
    matches!(b, b',' | b']' | b'}' | b' ' | b'\t' | b'\r' | b'\n')
}

/// A JSON number.
pub struct NumberHandle<R> {
    pub(crate) core: HandleCore<R>,
    raw: RefCell<String>,
    value: Cell<Option<Number>>,
}

impl<R: Read + Seek> NumberHandle<R> {
    pub(crate) fn new(core: HandleCore<R>) -> Self {
        Self { core, raw: RefCell::new(String::new()), value: Cell::new(None) }
    }

    /// The byte offset of this value's first byte.
    pub fn start_offset(&self) -> u64 {
        self.core.start_offset
    }

    /// Forces recognition of the number, advancing the cursor past it.
    pub fn parse(&self) -> Result<()> {
        if self.core.is_loaded() {
            return Ok(());
        }
        let (text, end) = {
            let mut src = self.core.source.borrow_mut();
            scan_number(&mut src, self.core.start_offset)?
        };
        let value = decode_number(&text)?;
        self.core.set_end_offset(end);
        *self.raw.borrow_mut() = text;
        self.value.set(Some(value));
        Ok(())
    }

    /// The exact source text of the number, unaffected by how it decodes.
    pub fn raw_text(&self) -> Result<String> {
        self.parse()?;
        Ok(self.raw.borrow().clone())
    }

    /// The decoded value, parsing if necessary.
    pub fn value(&self) -> Result<Number> {
        self.parse()?;
        Ok(self.value.get().expect("parse() sets value on success"))
    }
}

fn scan_number<R: Read + Seek>(src: &mut ByteSource<R>, start: u64) -> Result<(String, u64)> {
    src.seek_absolute(start)?;
    let mut raw = Vec::new();

    if let Some(b'-') = src.peek()? {
        raw.push(src.read_byte()?);
    }

    let mut digits = 0usize;
    while let Some(b) = src.peek()? {
        if b.is_ascii_digit() {
            raw.push(src.read_byte()?);
            digits += 1;
        } else {
            break;
        }
    }
    if digits == 0 {
        let pos = src.tell();
        return Err(match src.peek()? {
            None => Error::UnexpectedEof(pos),
            Some(b) => Error::UnexpectedByte { byte: b, pos },
        });
    }

    if let Some(b'.') = src.peek()? {
        raw.push(src.read_byte()?);
        require_digit(src)?;
        while let Some(b) = src.peek()? {
            if b.is_ascii_digit() {
                raw.push(src.read_byte()?);
            } else {
                break;
            }
        }
    }

    if let Some(b) = src.peek()? {
        if b == b'e' || b == b'E' {
            raw.push(src.read_byte()?);
            if let Some(s) = src.peek()? {
                if s == b'+' || s == b'-' {
                    raw.push(src.read_byte()?);
                }
            }
            require_digit(src)?;
            while let Some(d) = src.peek()? {
                if d.is_ascii_digit() {
                    raw.push(src.read_byte()?);
                } else {
                    break;
                }
            }
        }
    }

    if let Some(b) = src.peek()? {
        if !is_terminator(b) {
            return Err(Error::UnexpectedByte { byte: b, pos: src.tell() });
        }
    }

    let end = src.tell();
    let text = String::from_utf8(raw).map_err(|_| Error::Logic("number text was not valid UTF-8"))?;
    Ok((text, end))
}

fn require_digit<R: Read + Seek>(src: &mut ByteSource<R>) -> Result<()> {
    match src.peek()? {
        Some(b) if b.is_ascii_digit() => Ok(()),
        Some(b) => Err(Error::UnexpectedByte { byte: b, pos: src.tell() }),
        None => Err(Error::UnexpectedEof(src.tell())),
    }
}

fn decode_number(text: &str) -> Result<Number> {
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Number::Int(i));
        }
    }
    text.parse::<f64>()
        .map(Number::Float)
        .map_err(|_| Error::Logic("number text failed to parse as a float"))
}
