//! Handles: lazy, offset-addressed views over a single JSON value.

mod array;
mod boolean;
mod container;
mod null;
mod number;
mod object;
mod string;

pub use array::{ArrayHandle, ArrayIter};
pub use boolean::BooleanHandle;
pub use null::NullHandle;
pub use number::{Number, NumberHandle};
pub use object::{ObjectHandle, ObjectIter};
pub use string::{Characters, StringHandle};

use std::cell::{Cell, RefCell};
use std::io::{Read, Seek};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::lex::skip_whitespace;
use crate::options::ReaderOptions;
use crate::source::ByteSource;
use crate::value::Value;

/// State shared by every variant of [`Handle`]: the byte source, this
/// value's start offset, and its end offset once known.
///
/// `Rc<RefCell<_>>` is the idiom this crate uses throughout for state
/// shared between sibling handles that all navigate the same underlying
/// cursor; it is also why this crate is single-threaded only.
pub(crate) struct HandleCore<R> {
    pub(crate) source: Rc<RefCell<ByteSource<R>>>,
    pub(crate) start_offset: u64,
    pub(crate) end_offset: Cell<Option<u64>>,
    pub(crate) use_cache: bool,
}

impl<R> HandleCore<R> {
    pub(crate) fn is_loaded(&self) -> bool {
        self.end_offset.get().is_some()
    }

    /// Sets the end offset, but only the first time: once a handle is
    /// loaded its end offset never changes.
    pub(crate) fn set_end_offset(&self, end: u64) {
        if self.end_offset.get().is_none() {
            self.end_offset.set(Some(end));
        }
    }
}

/// A single JSON value located at a known offset in a shared byte source.
///
/// A `Handle` does not own the bytes it describes; it borrows the source
/// through an `Rc<RefCell<_>>` shared with every other handle derived from
/// the same [`load`] call. Navigating one handle moves the shared cursor,
/// so interleave reads from sibling handles deliberately, not by accident.
///
/// Use [`Handle::as_array`], [`Handle::as_object`], [`Handle::as_string`],
/// and friends to reach the variant-specific navigation methods.
pub enum Handle<R> {
    Null(NullHandle<R>),
    Boolean(BooleanHandle<R>),
    Number(NumberHandle<R>),
    String(StringHandle<R>),
    Array(ArrayHandle<R>),
    Object(ObjectHandle<R>),
}

impl<R: Read + Seek> Handle<R> {
    /// The byte offset of this value's first byte.
    pub fn start_offset(&self) -> u64 {
        match self {
            Handle::Null(h) => h.core.start_offset,
            Handle::Boolean(h) => h.core.start_offset,
            Handle::Number(h) => h.core.start_offset,
            Handle::String(h) => h.core.start_offset,
            Handle::Array(h) => h.core.start_offset,
            Handle::Object(h) => h.core.start_offset,
        }
    }

    /// The byte offset one past this value's last byte, once it has been
    /// parsed; `None` beforehand.
    pub fn end_offset(&self) -> Option<u64> {
        match self {
            Handle::Null(h) => h.core.end_offset.get(),
            Handle::Boolean(h) => h.core.end_offset.get(),
            Handle::Number(h) => h.core.end_offset.get(),
            Handle::String(h) => h.core.end_offset.get(),
            Handle::Array(h) => h.core.end_offset.get(),
            Handle::Object(h) => h.core.end_offset.get(),
        }
    }

    /// Forces full recognition of this value, advancing the shared cursor
    /// past it. For containers and strings this drives their lazy walk to
    /// completion; for scalars it simply matches the literal or grammar.
    pub fn parse(&self) -> Result<()> {
        match self {
            Handle::Null(h) => h.parse(),
            Handle::Boolean(h) => h.parse(),
            Handle::Number(h) => h.parse(),
            Handle::String(h) => h.parse(),
            Handle::Array(h) => h.parse(),
            Handle::Object(h) => h.parse(),
        }
    }

    /// Recursively materialises this value, and every descendant, into an
    /// in-memory [`Value`]. `associative_objects` selects whether nested
    /// objects decode to [`Value::Object`] (last-duplicate-wins map) or
    /// [`Value::Record`] (order- and duplicate-preserving list).
    pub fn decode(&self, associative_objects: bool) -> Result<Value> {
        crate::decode::decode(self, associative_objects)
    }

    pub fn as_null(&self) -> Option<&NullHandle<R>> {
        match self {
            Handle::Null(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&BooleanHandle<R>> {
        match self {
            Handle::Boolean(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumberHandle<R>> {
        match self {
            Handle::Number(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringHandle<R>> {
        match self {
            Handle::String(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayHandle<R>> {
        match self {
            Handle::Array(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectHandle<R>> {
        match self {
            Handle::Object(h) => Some(h),
            _ => None,
        }
    }
}

/// Begins reading a JSON value from `source`, using the default
/// [`ReaderOptions`] (caching enabled).
///
/// `source` is consumed by value; wrap it in an `Rc`/clone it beforehand if
/// you need to retain access to it yourself (the returned handle already
/// holds the only reference it needs).
pub fn load<R: Read + Seek>(source: R) -> Result<Handle<R>> {
    load_with_options(source, ReaderOptions::default())
}

/// Begins reading a JSON value from `source` with explicit
/// [`ReaderOptions`].
pub fn load_with_options<R: Read + Seek>(source: R, options: ReaderOptions) -> Result<Handle<R>> {
    let mut byte_source = ByteSource::new(source)?;
    if byte_source.eof()? {
        return Err(Error::SourceUnusable("source is empty"));
    }
    let shared = Rc::new(RefCell::new(byte_source));
    dispatch(shared, options.use_cache)
}

/// Dispatches the value whose first byte sits at (or after skippable
/// whitespace from) the source's current cursor position, without
/// consuming anything beyond recognising which variant it is.
pub(crate) fn dispatch<R: Read + Seek>(
    source: Rc<RefCell<ByteSource<R>>>,
    use_cache: bool,
) -> Result<Handle<R>> {
    {
        let mut src = source.borrow_mut();
        skip_whitespace(&mut src)?;
    }
    let (first, pos) = {
        let mut src = source.borrow_mut();
        let pos = src.tell();
        (src.peek()?, pos)
    };
    let Some(byte) = first else {
        return Err(Error::UnexpectedEof(pos));
    };
    let core = HandleCore { source: source.clone(), start_offset: pos, end_offset: Cell::new(None), use_cache };
    let handle = match byte {
        b'{' => Handle::Object(ObjectHandle::new(core)),
        b'[' => Handle::Array(ArrayHandle::new(core)),
        b'"' => Handle::String(StringHandle::new(core)),
        b't' | b'f' => Handle::Boolean(BooleanHandle::new(core)),
        b'n' => Handle::Null(NullHandle::new(core)),
        b'-' | b'0'..=b'9' => Handle::Number(NumberHandle::new(core)),
        other => return Err(Error::UnexpectedByte { byte: other, pos }),
    };
    Ok(handle)
}
