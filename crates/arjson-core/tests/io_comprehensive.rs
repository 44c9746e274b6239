//! Comprehensive tests for reading documents from files and readers

use arjson::{Arena, Error, ErrorCode, read_file_to_arena, read_to_arena};
use std::path::PathBuf;

struct TempFile(PathBuf);

impl TempFile {
    fn new(name: &str, contents: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!("arjson-io-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        Self(path)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn test_read_file_parses_document() {
    let file = TempFile::new("config.json", br#"{"port": 8080, "name": "svc"}"#);
    let arena = Arena::new();
    let root = read_file_to_arena(&file.0, &arena).unwrap();

    assert_eq!(root.get_key("port").unwrap().as_number(), Ok(8080.0));
    assert_eq!(root.get_key("name").unwrap().as_str(), Ok("svc"));
}

#[test]
fn test_file_bytes_live_in_arena() {
    let file = TempFile::new("zero-copy.json", br#"["borrowed"]"#);
    let arena = Arena::new();
    let root = read_file_to_arena(&file.0, &arena).unwrap();
    drop(file);

    // String views point into the arena copy of the file
    let content = root.get(0).unwrap().as_json_str().unwrap();
    assert!(content.is_borrowed());
    assert_eq!(content.as_str(), "borrowed");
    assert!(arena.stats().bytes_allocated >= 12);
}

#[test]
fn test_read_file_parse_error_keeps_offset() {
    let file = TempFile::new("broken.json", b"{\"a\": [1, 2,]}");
    let arena = Arena::new();
    let err = read_file_to_arena(&file.0, &arena).unwrap_err();

    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.code(), Some(ErrorCode::ExpectedValue));
    assert_eq!(err.offset(), Some(12));
}

#[test]
fn test_missing_file_is_io_error() {
    let arena = Arena::new();
    let path = std::env::temp_dir().join("arjson-io-definitely-missing.json");
    let err = read_file_to_arena(&path, &arena).unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::Io));
    assert_eq!(err.offset(), None);
    match err {
        Error::Io { path: reported, source } => {
            assert_eq!(reported, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_directory_is_io_error() {
    let arena = Arena::new();
    let err = read_file_to_arena(std::env::temp_dir(), &arena).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Io));
}

#[test]
fn test_empty_file_expects_value() {
    let file = TempFile::new("empty.json", b"");
    let arena = Arena::new();
    let err = read_file_to_arena(&file.0, &arena).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ExpectedValue));
}

#[test]
fn test_read_from_cursor() {
    let arena = Arena::new();
    let reader = std::io::Cursor::new(b"[true, false, null]".to_vec());
    let root = read_to_arena(reader, &arena).unwrap();
    assert_eq!(root.len(), Ok(3));
}

#[test]
fn test_failing_reader() {
    struct Broken;
    impl std::io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("wire cut"))
        }
    }

    let arena = Arena::new();
    let err = read_to_arena(Broken, &arena).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Io));
    assert!(err.to_string().contains("wire cut"));
}
