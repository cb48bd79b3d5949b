use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::lex::skip_whitespace;
use crate::source::ByteSource;

pub(crate) enum Separator {
    Comma,
    Close,
}

/// Consumes whatever follows a container element: whitespace, then either a
/// comma (itself followed by a whitespace skip and a trailing-comma check)
/// or the container's closing byte. Shared by array and object walkers,
/// which differ only in the closing byte and which error variants they
/// report.
pub(crate) fn after_element<R: Read + Seek>(
    src: &mut ByteSource<R>,
    close: u8,
    trailing_comma: impl FnOnce(u64) -> Error,
    expected: impl FnOnce(u64) -> Error,
) -> Result<Separator> {
    skip_whitespace(src)?;
    let pos = src.tell();
    let b = src.read_byte()?;
    if b == b',' {
        skip_whitespace(src)?;
        if let Some(next) = src.peek()? {
            if next == close {
                return Err(trailing_comma(src.tell()));
            }
        }
        Ok(Separator::Comma)
    } else if b == close {
        Ok(Separator::Close)
    } else {
        Err(expected(pos))
    }
}
