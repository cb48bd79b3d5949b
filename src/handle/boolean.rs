use std::cell::Cell;
use std::io::{Read, Seek};

use crate::error::{Error, Result};

use super::HandleCore;

/// A `true` or `false` JSON literal.
pub struct BooleanHandle<R> {
    pub(crate) core: HandleCore<R>,
    value: Cell<Option<bool>>,
}

impl<R: Read + Seek> BooleanHandle<R> {
    pub(crate) fn new(core: HandleCore<R>) -> Self {
        Self { core, value: Cell::new(None) }
    }

    /// The byte offset of this value's first byte.
    pub fn start_offset(&self) -> u64 {
        self.core.start_offset
    }

    /// Forces recognition of the literal, advancing the cursor past it.
    pub fn parse(&self) -> Result<()> {
        if self.core.is_loaded() {
            return Ok(());
        }
        let (end, decoded) = {
            let mut src = self.core.source.borrow_mut();
            src.seek_absolute(self.core.start_offset)?;
            let first = src.read_byte()?;
            match first {
                b't' => {
                    let rest = src.read(3, true)?;
                    if rest != b"rue" {
                        return Err(Error::InvalidLiteral(self.core.start_offset));
                    }
                    (src.tell(), true)
                }
                b'f' => {
                    let rest = src.read(4, true)?;
                    if rest != b"alse" {
                        return Err(Error::InvalidLiteral(self.core.start_offset));
                    }
                    (src.tell(), false)
                }
                _ => return Err(Error::Logic("boolean handle did not start with 't' or 'f'")),
            }
        };
        self.core.set_end_offset(end);
        self.value.set(Some(decoded));
        Ok(())
    }

    /// The decoded value, parsing if necessary.
    pub fn value(&self) -> Result<bool> {
        self.parse()?;
        Ok(self.value.get().expect("parse() sets value on success"))
    }
}

#[cfg(test)]
mod tests {
    use crate::load;
    use std::io::Cursor;

    #[test]
    fn parses_true_and_false() {
        let h = load(Cursor::new(b"true".to_vec())).unwrap();
        assert!(h.as_boolean().unwrap().value().unwrap());

        let h = load(Cursor::new(b"false".to_vec())).unwrap();
        assert!(!h.as_boolean().unwrap().value().unwrap());
    }

    #[test]
    fn rejects_bad_literal() {
        let h = load(Cursor::new(b"trux".to_vec())).unwrap();
        assert!(h.as_boolean().unwrap().value().is_err());
    }
}
