//! Comprehensive tests for the parser and tokenizer
//!
//! Covers:
//! - Escape decoding, including surrogate pairs
//! - Zero-copy string views into the input
//! - Depth limit boundaries
//! - Grammar strictness and error offsets
//! - Duplicate key retention

use arjson::{Arena, ErrorCode, JsonStr, Node, NodeKind, ParseConfig, parse, parse_with_config};

fn parse_err(input: &[u8]) -> arjson::ParseError {
    let arena = Arena::new();
    parse(input, &arena).unwrap_err()
}

fn nested_arrays(depth: usize) -> String {
    format!("{}{}", "[".repeat(depth), "]".repeat(depth))
}

// === Escape Tests ===

#[test]
fn test_simple_escapes_decode() {
    let arena = Arena::new();
    let root = parse(br#""\n\t\r\b\f\"\\\/""#, &arena).unwrap();
    let content = root.as_str().unwrap();
    assert_eq!(content.as_bytes(), b"\n\t\r\x08\x0c\"\\/");
    assert_eq!(content.len(), 8);
}

#[test]
fn test_unicode_escapes_decode() {
    let arena = Arena::new();
    let root = parse(br#""\u0048\u0065\u006C\u006C\u006F""#, &arena).unwrap();
    assert_eq!(root.as_str(), Ok("Hello"));
}

#[test]
fn test_surrogate_pair_decodes_to_four_bytes() {
    let arena = Arena::new();
    let root = parse(br#""\uD83D\uDE00""#, &arena).unwrap();
    assert_eq!(root.as_str().unwrap().as_bytes(), &[0xF0, 0x9F, 0x98, 0x80]);
}

#[test]
fn test_escape_errors() {
    assert_eq!(parse_err(br#""\x""#).code, ErrorCode::InvalidEscape);
    assert_eq!(parse_err(br#""\u00G0""#).code, ErrorCode::InvalidEscape);
    assert_eq!(parse_err(br#""\uD800""#).code, ErrorCode::InvalidEscape);
    assert_eq!(parse_err(br#""\uDC00""#).code, ErrorCode::InvalidEscape);
    assert_eq!(parse_err(br#""\uD800\n""#).code, ErrorCode::InvalidEscape);
}

#[test]
fn test_unterminated_string_reports_start() {
    let err = parse_err(br#"{"key": "value"#);
    assert_eq!(err.code, ErrorCode::InvalidString);
    assert_eq!(err.offset, 8);
}

#[test]
fn test_raw_utf8_passes_through() {
    let arena = Arena::new();
    let root = parse("\"héllo wörld ✓\"".as_bytes(), &arena).unwrap();
    assert_eq!(root.as_str(), Ok("héllo wörld ✓"));
}

// === Zero-Copy Tests ===

#[test]
fn test_unescaped_strings_alias_input() {
    let arena = Arena::new();
    let input = br#"{"name": "value", "list": ["a", "bc"]}"#;
    let root = parse(input, &arena).unwrap();

    let range = input.as_ptr_range();
    let mut strings = Vec::new();
    for (key, value) in root.pairs() {
        strings.push(key);
        strings.extend(value.iter().filter_map(|n| n.as_str().ok()));
        strings.extend(value.as_str().ok());
    }
    assert_eq!(strings, vec!["name", "value", "list", "a", "bc"]);
    for s in strings {
        assert!(range.contains(&s.as_ptr()), "{s:?} was copied");
    }

    // Pointer identity for a specific value
    let value = root.get_key("name").unwrap().as_str().unwrap();
    assert_eq!(value.as_ptr(), input[10..].as_ptr());
}

#[test]
fn test_escaped_strings_live_in_arena() {
    let arena = Arena::new();
    let input = br#"["plain", "esc\u0041ped"]"#;
    let root = parse(input, &arena).unwrap();

    let plain = root.get(0).unwrap().as_json_str().unwrap();
    let escaped = root.get(1).unwrap().as_json_str().unwrap();
    assert!(matches!(plain, JsonStr::Borrowed("plain")));
    assert!(matches!(escaped, JsonStr::Arena("escAped")));
    assert!(!input.as_ptr_range().contains(&escaped.as_str().as_ptr()));
}

// === Depth Limit Tests ===

#[test]
fn test_depth_256_succeeds() {
    let arena = Arena::new();
    let input = nested_arrays(256);
    let root = parse(input.as_bytes(), &arena).unwrap();
    assert!(root.is_array());
}

#[test]
fn test_depth_257_fails() {
    let err = parse_err(nested_arrays(257).as_bytes());
    assert_eq!(err.code, ErrorCode::TooDeep);
    assert_eq!(err.offset, 257);
}

#[test]
fn test_unclosed_brackets_fail_too_deep() {
    let err = parse_err("[".repeat(257).as_bytes());
    assert_eq!(err.code, ErrorCode::TooDeep);
}

#[test]
fn test_mixed_nesting_counts_objects() {
    let mut input = String::new();
    for _ in 0..128 {
        input.push_str(r#"{"k":["#);
    }
    input.push('1');
    for _ in 0..128 {
        input.push_str("]}");
    }
    let arena = Arena::new();
    assert!(parse(input.as_bytes(), &arena).is_ok());

    let config = ParseConfig::default().with_max_depth(255);
    let err = parse_with_config(input.as_bytes(), &arena, config).unwrap_err();
    assert_eq!(err.code, ErrorCode::TooDeep);
}

#[test]
fn test_strict_and_permissive_presets() {
    let arena = Arena::new();
    let input = nested_arrays(100);
    assert!(parse_with_config(input.as_bytes(), &arena, ParseConfig::strict()).is_err());
    assert!(parse_with_config(input.as_bytes(), &arena, ParseConfig::permissive()).is_ok());
}

// === Grammar Tests ===

#[test]
fn test_object_with_non_string_key_fails() {
    assert_eq!(parse_err(b"{1,2}").code, ErrorCode::UnexpectedToken);
}

#[test]
fn test_trailing_comma_fails() {
    assert_eq!(parse_err(b"[1,]").code, ErrorCode::ExpectedValue);
    assert_eq!(parse_err(br#"{"a":1,}"#).code, ErrorCode::UnexpectedToken);
}

#[test]
fn test_trailing_content_offset() {
    let err = parse_err(b"1 2");
    assert_eq!(err.code, ErrorCode::UnexpectedToken);
    assert_eq!(err.offset, 2);

    let err = parse_err(b"{} []");
    assert_eq!(err.code, ErrorCode::UnexpectedToken);
    assert_eq!(err.offset, 3);
}

#[test]
fn test_error_offsets() {
    let cases: &[(&[u8], ErrorCode, usize)] = &[
        (b"", ErrorCode::ExpectedValue, 0),
        (b"   ", ErrorCode::ExpectedValue, 3),
        (b"[1 2]", ErrorCode::ExpectedComma, 3),
        (br#"{"a" 1}"#, ErrorCode::UnexpectedToken, 5),
        (br#"{"a":}"#, ErrorCode::ExpectedValue, 5),
        (b"[nul]", ErrorCode::InvalidToken, 1),
        (b"[+1]", ErrorCode::InvalidToken, 1),
        (b"[01]", ErrorCode::ExpectedComma, 2),
        (b"[1.]", ErrorCode::InvalidNumber, 1),
        (b"[1e999]", ErrorCode::InvalidNumber, 1),
        (b"[1}", ErrorCode::ExpectedComma, 2),
        (b"{\"a\":1]", ErrorCode::ExpectedComma, 6),
    ];
    for &(input, code, offset) in cases {
        let err = parse_err(input);
        assert_eq!(
            (err.code, err.offset),
            (code, offset),
            "input {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_whitespace_around_root() {
    let arena = Arena::new();
    let root = parse(b" \t\r\n[ 1 , 2 ]\n ", &arena).unwrap();
    assert_eq!(root.len(), Ok(2));
}

// === Duplicate Keys ===

#[test]
fn test_duplicate_keys_preserved_in_order() {
    let arena = Arena::new();
    let root = parse(br#"{"a":1,"a":2}"#, &arena).unwrap();
    let pairs = root.as_object().unwrap();

    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].key, "a");
    assert_eq!(pairs[1].key, "a");
    assert_eq!(pairs[0].value.as_number(), Ok(1.0));
    assert_eq!(pairs[1].value.as_number(), Ok(2.0));

    // Lookup returns the last match, get_all every match
    assert_eq!(root.get_key("a").unwrap().as_number(), Ok(2.0));
    assert_eq!(root.get_all("a").unwrap().count(), 2);
}

// === Scenario ===

#[test]
fn test_config_document() {
    let arena = Arena::new();
    let root = parse(
        br#"{"port": 8080, "features": ["auth","api"]}"#,
        &arena,
    )
    .unwrap();

    assert_eq!(root.kind(), NodeKind::Object);
    assert_eq!(root.get_key("port").unwrap().as_number(), Ok(8080.0));

    let features = root.get_key("features").unwrap();
    let names: Vec<&str> = features.iter().map(|n| n.as_str().unwrap()).collect();
    assert_eq!(names, vec!["auth", "api"]);

    assert!(matches!(root.get_key("missing"), Err(arjson::AccessError::KeyNotFound(_))));
    assert!(matches!(features.get(5), Err(arjson::AccessError::OutOfBounds { index: 5, len: 2 })));
}

#[test]
fn test_number_values() {
    let arena = Arena::new();
    let root = parse(b"[0, -0, 1.5, -2e3, 1E-2, 123456789012345678, 0.1]", &arena).unwrap();
    let values: Vec<f64> = root.iter().map(|n| n.as_number().unwrap()).collect();
    assert_eq!(
        values,
        vec![0.0, -0.0, 1.5, -2000.0, 0.01, 123456789012345678.0, 0.1]
    );
    assert!(values[1].is_sign_negative());
}

#[test]
fn test_trees_from_separate_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let arena = Arena::new();
                let input = format!(r#"{{"thread": {i}}}"#);
                let root = parse(input.as_bytes(), &arena).unwrap();
                root.get_key("thread").unwrap().as_number().unwrap()
            })
        })
        .collect();
    let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_node_is_plain_value() {
    let arena = Arena::new();
    let root = parse(b"[true]", &arena).unwrap();
    let copy: Node<'_> = *root;
    assert_eq!(copy, *root);
}
