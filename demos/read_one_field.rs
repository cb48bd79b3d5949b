//! Reads a single field out of a JSON document without decoding the rest
//! of it. Pass a path to a JSON file as the only argument; defaults to
//! reading a small built-in document.

use std::env;
use std::fs::File;
use std::io::Cursor;

const FALLBACK: &[u8] = br#"{"name": "ada", "tags": ["math", "computing"], "active": true}"#;

fn main() -> Result<(), lazyjson::Error> {
    let path = env::args().nth(1);
    let handle = match &path {
        Some(path) => {
            println!("reading {path}");
            lazyjson::load(File::open(path)?)?
        }
        None => {
            println!("no path given, reading the built-in fallback document");
            lazyjson::load(Cursor::new(FALLBACK.to_vec()))?
        }
    };

    let object = handle.as_object().ok_or(lazyjson::Error::Logic("top-level value is not an object"))?;

    match object.get("name")? {
        Some(name) => {
            let decoded = name.as_string().ok_or(lazyjson::Error::Logic("`name` is not a string"))?.decode()?;
            println!("name = {decoded}");
        }
        None => eprintln!("no `name` field found"),
    }

    // Other fields, such as `tags` and `active`, were never touched: only
    // the bytes needed to reach `name` were read.
    Ok(())
}
