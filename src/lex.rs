//! Shared lexical primitives used by multiple recognisers.

use std::io::{Read, Seek};

use crate::error::Result;
use crate::source::ByteSource;

pub(crate) fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

pub(crate) fn is_control_byte(b: u8) -> bool {
    b < 0x20
}

pub(crate) fn skip_whitespace<R: Read + Seek>(src: &mut ByteSource<R>) -> Result<()> {
    while let Some(b) = src.peek()? {
        if !is_json_whitespace(b) {
            break;
        }
        src.read_byte()?;
    }
    Ok(())
}
