//! Pattern matching and typed capture against live request paths.

use turnout::{extract, Request, Slot};

#[test]
fn captures_final_segment_as_text() {
    let mut value = String::new();
    assert!(extract("/a/b/c", "/a/b/*", &mut [Slot::Text(&mut value)]));
    assert_eq!(value, "c");
}

#[test]
fn diverging_literal_chunk_is_no_match() {
    let mut value = String::new();
    assert!(!extract("/a/x/c", "/a/b/*", &mut [Slot::Text(&mut value)]));
    assert_eq!(value, "", "slot must stay untouched when the literal diverges");
}

#[test]
fn parses_i32_segment() {
    let mut value = 0i32;
    assert!(extract("/1", "/*", &mut [Slot::I32(&mut value)]));
    assert_eq!(value, 1);
}

#[test]
fn i32_range_overflow_is_no_match() {
    let mut value = 0i32;
    assert!(!extract("/9999999999", "/*", &mut [Slot::I32(&mut value)]));
    assert_eq!(value, 0);
}

#[test]
fn wide_integers_take_what_i32_cannot() {
    let mut wide = 0i64;
    assert!(extract("/9999999999", "/*", &mut [Slot::I64(&mut wide)]));
    assert_eq!(wide, 9_999_999_999);

    let mut native = 0isize;
    assert!(extract("/-12", "/*", &mut [Slot::Int(&mut native)]));
    assert_eq!(native, -12);
}

#[test]
fn decodes_base64_segment() {
    let mut raw = Vec::new();
    assert!(extract("/YQ==", "/*", &mut [Slot::Bytes(&mut raw)]));
    assert_eq!(raw, vec![b'a']);
}

#[test]
fn bad_base64_is_no_match() {
    let mut raw = Vec::new();
    assert!(!extract("/%%%", "/*", &mut [Slot::Bytes(&mut raw)]));
    assert!(raw.is_empty());
}

#[test]
fn text_value_survives_a_path_round_trip() {
    let mut out = String::new();
    for original in ["plain", "with-dashes", "dots.and.more", "123abc"] {
        let path = format!("/items/{original}");
        assert!(extract(&path, "/items/*", &mut [Slot::Text(&mut out)]));
        assert_eq!(out, original);
    }
}

#[test]
fn integer_boundaries_round_trip() {
    let mut value = 0i32;
    for original in [i32::MIN, -1, 0, 1, i32::MAX] {
        let path = format!("/n/{original}");
        assert!(extract(&path, "/n/*", &mut [Slot::I32(&mut value)]));
        assert_eq!(value, original);
    }
}

#[test]
fn bytes_round_trip_through_base64() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let mut out = Vec::new();
    for original in [b"hello".to_vec(), vec![0u8, 255, 7], Vec::new()] {
        let path = format!("/blob/{}", STANDARD.encode(&original));
        assert!(extract(&path, "/blob/*", &mut [Slot::Bytes(&mut out)]));
        assert_eq!(out, original);
    }
}

#[test]
fn multiple_slots_fill_in_pattern_order() {
    let mut owner = String::new();
    let mut id = 0i64;
    assert!(extract(
        "/repos/octocat/id/99",
        "/repos/*/id/*",
        &mut [Slot::Text(&mut owner), Slot::I64(&mut id)]
    ));
    assert_eq!(owner, "octocat");
    assert_eq!(id, 99);
}

#[test]
fn trailing_unconsumed_path_is_no_match() {
    let mut value = String::new();
    assert!(!extract("/a/b/c/d", "/a/b/*", &mut [Slot::Text(&mut value)]));
}

#[test]
fn extract_reads_the_request_path() {
    let req = Request::get("/users/31337/avatar");
    let mut id = 0i64;
    assert!(req.extract("/users/*/avatar", &mut [Slot::I64(&mut id)]));
    assert_eq!(id, 31337);
}

#[test]
#[should_panic(expected = "wildcard")]
fn slot_arity_mismatch_is_a_caller_bug() {
    let mut a = String::new();
    let mut b = String::new();
    extract(
        "/one/two",
        "/one/*",
        &mut [Slot::Text(&mut a), Slot::Text(&mut b)],
    );
}
