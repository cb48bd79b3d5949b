use std::cell::RefCell;
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::lex::skip_whitespace;

use super::container::{after_element, Separator};
use super::{dispatch, Handle, HandleCore};

#[derive(Clone, Copy)]
enum Progress {
    NotStarted,
    /// The next element to process starts at `offset`; it has not been
    /// dispatched yet this round.
    Ready { index: usize, offset: u64 },
    /// The element at `offset` (index `index`) was dispatched and handed to
    /// a caller; it still needs to be force-parsed and its separator read
    /// before the walk can continue.
    Pending { index: usize, offset: u64 },
    Done { total: usize },
}

/// A JSON array.
pub struct ArrayHandle<R> {
    pub(crate) core: HandleCore<R>,
    state: RefCell<Progress>,
    cache: RefCell<Vec<u64>>,
}

impl<R: Read + Seek> ArrayHandle<R> {
    pub(crate) fn new(core: HandleCore<R>) -> Self {
        Self { core, state: RefCell::new(Progress::NotStarted), cache: RefCell::new(Vec::new()) }
    }

    /// The byte offset of this value's first byte.
    pub fn start_offset(&self) -> u64 {
        self.core.start_offset
    }

    /// A fresh iterator over `(index, element)` pairs. Each call to `iter`
    /// starts its own walk from this array's first element, independent of
    /// any previous iteration or random access performed on this handle.
    pub fn iter(&self) -> ArrayIter<'_, R> {
        ArrayIter { handle: self, state: RefCell::new(Progress::NotStarted) }
    }

    /// The element at `index`, or `None` if the array is shorter than
    /// `index + 1`. Cache hits seek directly to a previously-recorded
    /// offset; misses resume the forward walk from wherever it last
    /// stopped.
    pub fn at(&self, index: usize) -> Result<Option<Handle<R>>> {
        if self.core.use_cache {
            if let Some(&offset) = self.cache.borrow().get(index) {
                return dispatch_at(&self.core, offset).map(Some);
            }
            if let Progress::Done { .. } = *self.state.borrow() {
                return Ok(None);
            }
        } else {
            // Without a cache there is no record of offsets already passed,
            // so random access always restarts the walk from the beginning.
            *self.state.borrow_mut() = Progress::NotStarted;
        }
        let found = self.drive(&self.state, |i| i == index)?;
        Ok(found.map(|(_, h)| h))
    }

    /// Whether an element exists at `index`.
    pub fn has(&self, index: usize) -> Result<bool> {
        Ok(self.at(index)?.is_some())
    }

    /// The number of elements, forcing a full walk if not already known.
    pub fn len(&self) -> Result<usize> {
        self.drive(&self.state, |_| false)?;
        match *self.state.borrow() {
            Progress::Done { total } => Ok(total),
            _ => unreachable!("drive() always reaches Done when the predicate never matches"),
        }
    }

    /// Forces full recognition of this array, advancing the cursor past it.
    pub fn parse(&self) -> Result<()> {
        self.len().map(|_| ())
    }

    fn open(&self, state: &RefCell<Progress>) -> Result<()> {
        let mut src = self.core.source.borrow_mut();
        src.seek_absolute(self.core.start_offset)?;
        let opening = src.read_byte()?;
        debug_assert_eq!(opening, b'[');
        skip_whitespace(&mut src)?;
        match src.peek()? {
            Some(b']') => {
                src.read_byte()?;
                let end = src.tell();
                drop(src);
                self.core.set_end_offset(end);
                *state.borrow_mut() = Progress::Done { total: 0 };
            }
            _ => {
                let offset = src.tell();
                drop(src);
                *state.borrow_mut() = Progress::Ready { index: 0, offset };
            }
        }
        Ok(())
    }

    /// Force-parses the element at `offset` (re-dispatching a fresh handle
    /// for it) and reads the separator that follows, advancing state to
    /// `Ready` for the next element or to `Done`.
    fn advance_past(&self, state: &RefCell<Progress>, index: usize, offset: u64) -> Result<()> {
        let child = dispatch_at(&self.core, offset)?;
        child.parse()?;
        let end = child.end_offset().expect("parse() always sets end_offset on success");
        let mut src = self.core.source.borrow_mut();
        src.seek_absolute(end)?;
        match after_element(&mut src, b']', Error::TrailingComma, Error::ExpectedCommaOrArrayEnd)? {
            Separator::Comma => {
                let next = src.tell();
                drop(src);
                *state.borrow_mut() = Progress::Ready { index: index + 1, offset: next };
            }
            Separator::Close => {
                let end = src.tell();
                drop(src);
                self.core.set_end_offset(end);
                *state.borrow_mut() = Progress::Done { total: index + 1 };
            }
        }
        Ok(())
    }

    /// Drives `state` forward until `is_target` accepts the current index
    /// (in which case that element is dispatched, cached, and returned
    /// without being force-parsed) or the array ends. Called both against
    /// this handle's own resumable state (for `at`/`len`/`parse`) and
    /// against an iterator's independent state (for `iter`).
    fn drive(
        &self,
        state: &RefCell<Progress>,
        mut is_target: impl FnMut(usize) -> bool,
    ) -> Result<Option<(usize, Handle<R>)>> {
        loop {
            let snapshot = *state.borrow();
            match snapshot {
                Progress::NotStarted => self.open(state)?,
                Progress::Pending { index, offset } => self.advance_past(state, index, offset)?,
                Progress::Done { .. } => return Ok(None),
                Progress::Ready { index, offset } => {
                    if self.core.use_cache {
                        let mut cache = self.cache.borrow_mut();
                        if cache.len() == index {
                            cache.push(offset);
                        }
                    }
                    if is_target(index) {
                        let child = dispatch_at(&self.core, offset)?;
                        *state.borrow_mut() = Progress::Pending { index, offset };
                        return Ok(Some((index, child)));
                    }
                    self.advance_past(state, index, offset)?;
                }
            }
        }
    }
}

fn dispatch_at<R: Read + Seek>(core: &HandleCore<R>, offset: u64) -> Result<Handle<R>> {
    core.source.borrow_mut().seek_absolute(offset)?;
    dispatch(core.source.clone(), core.use_cache)
}

/// Iterator over `(index, element)` pairs of an [`ArrayHandle`], walking
/// its own independent `Progress` starting at the array's first element.
pub struct ArrayIter<'h, R> {
    handle: &'h ArrayHandle<R>,
    state: RefCell<Progress>,
}

impl<'h, R: Read + Seek> Iterator for ArrayIter<'h, R> {
    type Item = Result<(usize, Handle<R>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.handle.drive(&self.state, |_| true).transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::handle::Number;
    use crate::load;
    use std::io::Cursor;

    fn array(text: &str) -> crate::handle::Handle<Cursor<Vec<u8>>> {
        load(Cursor::new(text.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn empty_array() {
        let h = array("[]");
        let a = h.as_array().unwrap();
        assert_eq!(a.len().unwrap(), 0);
        assert!(a.at(0).unwrap().is_none());
    }

    #[test]
    fn iterates_in_order() {
        let h = array("[1, 2, 3]");
        let a = h.as_array().unwrap();
        let values: Vec<i64> = a
            .iter()
            .map(|item| {
                let (_, child) = item.unwrap();
                match child.as_number().unwrap().value().unwrap() {
                    Number::Int(i) => i,
                    Number::Float(f) => f as i64,
                }
            })
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn random_access_after_partial_iteration() {
        let h = array(r#"["a", "b", "c"]"#);
        let a = h.as_array().unwrap();
        let (idx, first) = a.iter().next().unwrap().unwrap();
        assert_eq!(idx, 0);
        assert_eq!(first.as_string().unwrap().decode().unwrap(), "a");
        // Random access for an index not yet walked should still work.
        let third = a.at(2).unwrap().unwrap();
        assert_eq!(third.as_string().unwrap().decode().unwrap(), "c");
        assert_eq!(a.len().unwrap(), 3);
    }

    #[test]
    fn reiterating_starts_from_the_beginning() {
        let h = array("[1, 2, 3]");
        let a = h.as_array().unwrap();
        assert_eq!(a.iter().count(), 3);
        // A second, independent iterator still sees every element, even
        // though the first iterator already walked the array to `Done`.
        let values: Vec<usize> = a.iter().map(|item| item.unwrap().0).collect();
        assert_eq!(values, vec![0, 1, 2]);
    }

    #[test]
    fn out_of_range_is_none() {
        let h = array("[1, 2]");
        let a = h.as_array().unwrap();
        assert!(a.at(5).unwrap().is_none());
    }

    #[test]
    fn trailing_comma_rejected() {
        let h = array("[1, 2,]");
        let a = h.as_array().unwrap();
        assert!(a.len().is_err());
    }

    #[test]
    fn nested_arrays_decode() {
        let h = array("[[1, 2], [3]]");
        let value = h.decode(true).unwrap();
        match value {
            crate::Value::Array(outer) => {
                assert_eq!(outer.len(), 2);
            }
            other => panic!("expected array, got {other:?}"),
        }
    }
}
