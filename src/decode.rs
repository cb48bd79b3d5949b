//! Recursive decode of a [`crate::Handle`] into a [`Value`].

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use crate::error::Result;
use crate::handle::Handle;
use crate::value::Value;

pub(crate) fn decode<R: Read + Seek>(handle: &Handle<R>, associative_objects: bool) -> Result<Value> {
    Ok(match handle {
        Handle::Null(_) => Value::Null,
        Handle::Boolean(h) => Value::Boolean(h.value()?),
        Handle::Number(h) => Value::Number(h.value()?),
        Handle::String(h) => Value::String(h.decode()?),
        Handle::Array(h) => {
            let mut items = Vec::new();
            for entry in h.iter() {
                let (_, child) = entry?;
                items.push(decode(&child, associative_objects)?);
            }
            Value::Array(items)
        }
        Handle::Object(h) => {
            if associative_objects {
                let mut map = BTreeMap::new();
                for entry in h.iter() {
                    let (key, child) = entry?;
                    map.insert(key, decode(&child, associative_objects)?);
                }
                Value::Object(map)
            } else {
                let mut record = Vec::new();
                for entry in h.iter() {
                    let (key, child) = entry?;
                    record.push((key, decode(&child, associative_objects)?));
                }
                Value::Record(record)
            }
        }
    })
}
