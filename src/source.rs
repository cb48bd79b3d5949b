//! Seek-based adapter over an arbitrary `Read + Seek` byte source.
//!
//! Every [`crate::Handle`] shares one `ByteSource` through an
//! `Rc<RefCell<_>>` (see [`crate::handle`]); only one handle may be
//! actively reading at a time, which is why this type is not `Send`.

use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};

pub(crate) struct ByteSource<R> {
    inner: R,
    pos: u64,
}

impl<R: Read + Seek> ByteSource<R> {
    pub(crate) fn new(mut inner: R) -> Result<Self> {
        let pos = inner.stream_position()?;
        Ok(Self { inner, pos })
    }

    pub(crate) fn tell(&self) -> u64 {
        self.pos
    }

    pub(crate) fn seek_absolute(&mut self, pos: u64) -> Result<()> {
        self.pos = self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Reads up to `n` bytes. If fewer than `n` bytes are available before
    /// EOF: returns the short read when `require_all` is false, or fails
    /// with [`Error::UnexpectedEof`] when `require_all` is true.
    pub(crate) fn read(&mut self, n: usize, require_all: bool) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let mut filled = 0;
        while filled < n {
            let read = self.inner.read(&mut buf[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        self.pos += filled as u64;
        if filled < n {
            buf.truncate(filled);
            if require_all {
                return Err(Error::UnexpectedEof(self.pos));
            }
        }
        Ok(buf)
    }

    pub(crate) fn read_byte(&mut self) -> Result<u8> {
        let bytes = self.read(1, true)?;
        Ok(bytes[0])
    }

    /// Returns the next byte without consuming it, or `None` at EOF.
    pub(crate) fn peek(&mut self) -> Result<Option<u8>> {
        let bytes = self.read(1, false)?;
        if bytes.is_empty() {
            Ok(None)
        } else {
            self.seek_absolute(self.pos - 1)?;
            Ok(Some(bytes[0]))
        }
    }

    pub(crate) fn eof(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_none())
    }
}
