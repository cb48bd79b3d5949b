use std::io::{Read, Seek};

use crate::error::{Error, Result};

use super::HandleCore;

/// A `null` JSON literal.
pub struct NullHandle<R> {
    pub(crate) core: HandleCore<R>,
}

impl<R: Read + Seek> NullHandle<R> {
    pub(crate) fn new(core: HandleCore<R>) -> Self {
        Self { core }
    }

    /// The byte offset of this value's first byte.
    pub fn start_offset(&self) -> u64 {
        self.core.start_offset
    }

    /// Forces recognition of the `null` literal, advancing the cursor
    /// past it. Idempotent once this handle is loaded.
    pub fn parse(&self) -> Result<()> {
        if self.core.is_loaded() {
            return Ok(());
        }
        let end = {
            let mut src = self.core.source.borrow_mut();
            src.seek_absolute(self.core.start_offset)?;
            let bytes = src.read(4, true)?;
            if bytes != b"null" {
                return Err(Error::InvalidLiteral(self.core.start_offset));
            }
            src.tell()
        };
        self.core.set_end_offset(end);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::load;
    use std::io::Cursor;

    #[test]
    fn parses_null() {
        let handle = load(Cursor::new(b"null".to_vec())).unwrap();
        let null = handle.as_null().unwrap();
        null.parse().unwrap();
        assert_eq!(handle.end_offset(), Some(4));
    }

    #[test]
    fn rejects_near_miss() {
        let handle = load(Cursor::new(b"nul1".to_vec())).unwrap();
        let null = handle.as_null().unwrap();
        assert!(null.parse().is_err());
    }
}
