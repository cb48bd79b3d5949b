//! End-to-end scenarios exercising the reader's public surface.

use std::io::Cursor;

use lazyjson::{load, load_with_options, Error, Number, ReaderOptions, Value};
use rstest::rstest;

fn load_str(text: &str) -> lazyjson::Handle<Cursor<Vec<u8>>> {
    load(Cursor::new(text.as_bytes().to_vec())).expect("valid document should load")
}

#[rstest]
#[case("null")]
#[case("true")]
#[case("false")]
#[case("0")]
#[case("-12.5e3")]
#[case(r#""hi""#)]
#[case("[]")]
#[case("{}")]
#[case(r#"{"a": [1, 2, {"b": null}], "c": "d"}"#)]
fn well_formed_documents_decode(#[case] text: &str) {
    let handle = load_str(text);
    handle.decode(true).expect("should decode without error");
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("tru")]
#[case("[1, 2,]")]
#[case("{\"a\": 1,}")]
#[case(r#"{1: 2}"#)]
#[case(r#""\ud800""#)]
#[case(r#""\ud800A""#)]
#[case("01.")]
#[case("[1 2]")]
#[case(r#"{"a" 1}"#)]
fn malformed_documents_fail(#[case] text: &str) {
    let result = load(Cursor::new(text.as_bytes().to_vec())).and_then(|h| h.decode(true));
    assert!(result.is_err(), "expected {text:?} to fail");
}

#[test]
fn object_get_then_has_resumes_the_scan() {
    let handle = load_str(r#"{"a": 1, "b": 2}"#);
    let object = handle.as_object().unwrap();
    assert!(object.get("a").unwrap().is_some());
    assert!(object.has("b").unwrap());
}

#[test]
fn duplicate_object_keys_last_one_wins() {
    let handle = load_str(r#"{"k": 1, "k": 2, "k": 3}"#);
    let value = handle.decode(true).unwrap();
    match value {
        Value::Object(map) => assert_eq!(map.get("k"), Some(&Value::Number(Number::Int(3)))),
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn record_mode_preserves_order_and_duplicates() {
    let handle = load_str(r#"{"k": 1, "k": 2}"#);
    let value = handle.decode(false).unwrap();
    match value {
        Value::Record(entries) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].0, "k");
            assert_eq!(entries[1].0, "k");
        }
        other => panic!("expected record, got {other:?}"),
    }
}

#[test]
fn array_random_access_after_partial_iteration() {
    let handle = load_str("[10, 20, 30, 40]");
    let array = handle.as_array().unwrap();
    let mut iterator = array.iter();
    let (idx, first) = iterator.next().unwrap().unwrap();
    assert_eq!(idx, 0);
    assert_eq!(first.as_number().unwrap().value().unwrap(), Number::Int(10));

    let third = array.at(2).unwrap().unwrap();
    assert_eq!(third.as_number().unwrap().value().unwrap(), Number::Int(30));
    assert_eq!(array.len().unwrap(), 4);
}

#[test]
fn string_streaming_can_stop_before_the_end() {
    let handle = load_str(r#""abcdefghij""#);
    let string = handle.as_string().unwrap();
    let prefix: String = string.characters().take(3).map(|c| c.unwrap()).collect();
    assert_eq!(prefix, "abc");
}

#[test]
fn raw_number_text_survives_decoding() {
    let handle = load_str("1.500");
    let number = handle.as_number().unwrap();
    assert_eq!(number.raw_text().unwrap(), "1.500");
    assert_eq!(number.value().unwrap(), Number::Float(1.5));
}

#[test]
fn large_integer_overflows_to_float() {
    let handle = load_str("123456789012345678901234567890");
    let number = handle.as_number().unwrap();
    assert!(matches!(number.value().unwrap(), Number::Float(_)));
}

#[test]
fn surrogate_pair_decodes_to_supplementary_plane_char() {
    let handle = load_str(r#""😀""#);
    assert_eq!(handle.as_string().unwrap().decode().unwrap(), "\u{1F600}");
}

#[test]
fn empty_source_fails_with_source_unusable() {
    let err = load(Cursor::new(Vec::<u8>::new())).unwrap_err();
    assert!(matches!(err, Error::SourceUnusable(_)));
}

#[test]
fn caching_disabled_still_supports_single_pass_iteration() {
    let handle = load_with_options(
        Cursor::new(br#"[1, 2, 3, 4, 5]"#.to_vec()),
        ReaderOptions { use_cache: false },
    )
    .unwrap();
    let array = handle.as_array().unwrap();
    let total: i64 = array
        .iter()
        .map(|item| match item.unwrap().1.as_number().unwrap().value().unwrap() {
            Number::Int(i) => i,
            Number::Float(f) => f as i64,
        })
        .sum();
    assert_eq!(total, 15);
}

#[test]
fn object_values_are_read_only() {
    let handle = load_str(r#"{"a": 1}"#);
    let object = handle.as_object().unwrap();
    assert!(matches!(object.remove("a"), Err(Error::ReadOnly)));
}
