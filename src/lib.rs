//! A lazy, seek-based JSON reader.
//!
//! [`load`] wraps any `Read + Seek` byte source and returns a [`Handle`]
//! pointing at the single JSON value found there. A handle does not parse
//! eagerly: scalars are recognised on first access, strings are streamed
//! character by character, and arrays/objects walk their children only as
//! far as a caller asks, by seeking back and forth over the shared byte
//! source rather than materialising anything upfront.
//!
//! ```no_run
//! use std::io::Cursor;
//!
//! let handle = lazyjson::load(Cursor::new(br#"{"name": "ada", "tags": ["x", "y"]}"#.to_vec()))?;
//! let object = handle.as_object().expect("top-level value is an object");
//! if let Some(name) = object.get("name")? {
//!     println!("{}", name.as_string().unwrap().decode()?);
//! }
//! # Ok::<(), lazyjson::Error>(())
//! ```
//!
//! Call [`Handle::decode`] to materialise a value (and everything beneath
//! it) into an owned [`Value`] tree in one step when laziness isn't needed.

mod decode;
mod error;
mod handle;
mod lex;
mod options;
mod source;
mod value;

pub use error::{Error, Result};
pub use handle::{
    load, load_with_options, ArrayHandle, ArrayIter, BooleanHandle, Characters, Handle, NullHandle, Number,
    NumberHandle, ObjectHandle, ObjectIter, StringHandle,
};
pub use options::ReaderOptions;
pub use value::Value;
