use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::lex::skip_whitespace;

use super::container::{after_element, Separator};
use super::{dispatch, Handle, HandleCore};

#[derive(Clone)]
enum Progress {
    NotStarted,
    /// The next property's key starts at `offset`; it has not been read
    /// yet this round.
    Ready { index: usize, offset: u64 },
    /// The property at `index` was read (key decoded, value dispatched at
    /// `offset`) and the value handed to a caller; it still needs to be
    /// force-parsed and its separator read before the walk can continue.
    Pending { index: usize, offset: u64 },
    Done { total: usize },
}

/// A JSON object.
///
/// Produced by a reader over a byte source: objects here are read-only.
/// [`ObjectHandle::set`] and [`ObjectHandle::remove`] always fail with
/// [`Error::ReadOnly`]; build a mutable structure by decoding into a
/// [`crate::Value`] first.
pub struct ObjectHandle<R> {
    pub(crate) core: HandleCore<R>,
    state: RefCell<Progress>,
    cache: RefCell<HashMap<String, u64>>,
}

impl<R: Read + Seek> ObjectHandle<R> {
    pub(crate) fn new(core: HandleCore<R>) -> Self {
        Self { core, state: RefCell::new(Progress::NotStarted), cache: RefCell::new(HashMap::new()) }
    }

    /// The byte offset of this value's first byte.
    pub fn start_offset(&self) -> u64 {
        self.core.start_offset
    }

    /// A fresh iterator over `(key, value)` pairs, in source order. Each
    /// call to `iter` starts its own walk from this object's first
    /// property, independent of any previous iteration or random access
    /// performed on this handle.
    pub fn iter(&self) -> ObjectIter<'_, R> {
        ObjectIter { handle: self, state: RefCell::new(Progress::NotStarted) }
    }

    /// The value for `key`, or `None` if absent. When a key occurs more
    /// than once, the last occurrence wins, matching how the cache is
    /// populated as the object is walked. Cache hits seek directly to the
    /// recorded value offset; misses resume the forward walk from wherever
    /// it last stopped.
    pub fn get(&self, key: &str) -> Result<Option<Handle<R>>> {
        if self.core.use_cache {
            if let Some(&offset) = self.cache.borrow().get(key) {
                return dispatch_at(&self.core, offset).map(Some);
            }
            if let Progress::Done { .. } = *self.state.borrow() {
                return Ok(None);
            }
        } else {
            *self.state.borrow_mut() = Progress::NotStarted;
        }
        let found = self.drive(&self.state, |k| k == key)?;
        Ok(found.map(|(_, h)| h))
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// The number of properties, forcing a full walk if not already known.
    /// Counts every property occurrence, including repeated keys: `{"a":
    /// 1, "a": 2}` has a `len()` of 2, even though [`Self::get`] and
    /// [`decode`](crate::handle::Handle::decode) resolve `"a"` to the last
    /// occurrence only.
    pub fn len(&self) -> Result<usize> {
        self.drive(&self.state, |_| false)?;
        match *self.state.borrow() {
            Progress::Done { total } => Ok(total),
            _ => unreachable!("drive() always reaches Done when the predicate never matches"),
        }
    }

    /// Forces full recognition of this object, advancing the cursor past
    /// it.
    pub fn parse(&self) -> Result<()> {
        self.len().map(|_| ())
    }

    /// Objects produced by this reader are read-only.
    pub fn set(&self, _key: &str, _value: Handle<R>) -> Result<()> {
        Err(Error::ReadOnly)
    }

    /// Objects produced by this reader are read-only.
    pub fn remove(&self, _key: &str) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn open(&self, state: &RefCell<Progress>) -> Result<()> {
        let mut src = self.core.source.borrow_mut();
        src.seek_absolute(self.core.start_offset)?;
        let opening = src.read_byte()?;
        debug_assert_eq!(opening, b'{');
        skip_whitespace(&mut src)?;
        match src.peek()? {
            Some(b'}') => {
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

    /// Reads a property key at `offset`: the key must be a JSON string,
    /// followed by `:`. Returns the decoded key and the offset of the
    /// value that follows.
    fn read_key(&self, offset: u64) -> Result<(String, u64)> {
        let key_handle = dispatch_at(&self.core, offset)?;
        let key = match &key_handle {
            Handle::String(s) => s.decode()?,
            _ => return Err(Error::NonStringKey(offset)),
        };
        let mut src = self.core.source.borrow_mut();
        skip_whitespace(&mut src)?;
        let colon_pos = src.tell();
        if src.read_byte()? != b':' {
            return Err(Error::ExpectedColon(colon_pos));
        }
        skip_whitespace(&mut src)?;
        let value_offset = src.tell();
        Ok((key, value_offset))
    }

    fn advance_past(&self, state: &RefCell<Progress>, index: usize, value_offset: u64) -> Result<()> {
        let child = dispatch_at(&self.core, value_offset)?;
        child.parse()?;
        let end = child.end_offset().expect("parse() always sets end_offset on success");
        let mut src = self.core.source.borrow_mut();
        src.seek_absolute(end)?;
        match after_element(&mut src, b'}', Error::TrailingComma, Error::ExpectedCommaOrObjectEnd)? {
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

    /// Drives `state` forward until `is_target` accepts the current key (in
    /// which case that property's value is dispatched, cached, and returned
    /// without being force-parsed) or the object ends. Called both against
    /// this handle's own resumable state (for `get`/`len`/`parse`) and
    /// against an iterator's independent state (for `iter`).
    fn drive(
        &self,
        state: &RefCell<Progress>,
        mut is_target: impl FnMut(&str) -> bool,
    ) -> Result<Option<(String, Handle<R>)>> {
        loop {
            let snapshot = state.borrow().clone();
            match snapshot {
                Progress::NotStarted => self.open(state)?,
                Progress::Pending { index, offset } => self.advance_past(state, index, offset)?,
                Progress::Done { .. } => return Ok(None),
                Progress::Ready { index, offset } => {
                    let (key, value_offset) = self.read_key(offset)?;
                    if self.core.use_cache {
                        self.cache.borrow_mut().insert(key.clone(), value_offset);
                    }
                    if is_target(&key) {
                        let child = dispatch_at(&self.core, value_offset)?;
                        *state.borrow_mut() = Progress::Pending { index, offset: value_offset };
                        return Ok(Some((key, child)));
                    }
                    self.advance_past(state, index, value_offset)?;
                }
            }
        }
    }
}

fn dispatch_at<R: Read + Seek>(core: &HandleCore<R>, offset: u64) -> Result<Handle<R>> {
    core.source.borrow_mut().seek_absolute(offset)?;
    dispatch(core.source.clone(), core.use_cache)
}

/// Iterator over `(key, value)` pairs of an [`ObjectHandle`], in source
/// order, walking its own independent `Progress` starting at the object's
/// first property.
pub struct ObjectIter<'h, R> {
    handle: &'h ObjectHandle<R>,
    state: RefCell<Progress>,
}

impl<'h, R: Read + Seek> Iterator for ObjectIter<'h, R> {
    type Item = Result<(String, Handle<R>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.handle.drive(&self.state, |_| true).transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::load;
    use std::io::Cursor;

    fn object(text: &str) -> crate::handle::Handle<Cursor<Vec<u8>>> {
        load(Cursor::new(text.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn empty_object() {
        let h = object("{}");
        let o = h.as_object().unwrap();
        assert_eq!(o.len().unwrap(), 0);
        assert!(!o.has("anything").unwrap());
    }

    #[test]
    fn get_then_has_resumes_scan() {
        let h = object(r#"{"a": 1, "b": 2}"#);
        let o = h.as_object().unwrap();
        let a = o.get("a").unwrap().unwrap();
        assert_eq!(a.as_number().unwrap().value().unwrap().as_f64(), 1.0);
        assert!(o.has("b").unwrap());
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let h = object(r#"{"a": 1, "a": 2}"#);
        let o = h.as_object().unwrap();
        // len() forces a full walk first, which populates the cache with
        // each key's last occurrence. len() itself counts every
        // occurrence, not distinct keys.
        assert_eq!(o.len().unwrap(), 2);
        let a = o.get("a").unwrap().unwrap();
        assert_eq!(a.as_number().unwrap().value().unwrap().as_f64(), 2.0);
    }

    #[test]
    fn reiterating_starts_from_the_beginning() {
        let h = object(r#"{"x": 1, "y": 2}"#);
        let o = h.as_object().unwrap();
        assert_eq!(o.iter().count(), 2);
        let keys: Vec<String> = o.iter().map(|e| e.unwrap().0).collect();
        assert_eq!(keys, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn missing_key_scans_to_end() {
        let h = object(r#"{"a": 1, "b": 2}"#);
        let o = h.as_object().unwrap();
        assert!(!o.has("z").unwrap());
    }

    #[test]
    fn non_string_key_errors() {
        let h = object(r#"{1: 2}"#);
        let o = h.as_object().unwrap();
        assert!(o.len().is_err());
    }

    #[test]
    fn iterates_in_source_order() {
        let h = object(r#"{"x": 1, "y": 2}"#);
        let o = h.as_object().unwrap();
        let keys: Vec<String> = o.iter().map(|e| e.unwrap().0).collect();
        assert_eq!(keys, vec!["x".to_string(), "y".to_string()]);
    }
}
