//! Error types for parsing, tree access and file reading

use crate::parser::value::NodeKind;
use std::path::PathBuf;

/// Result type alias for arjson operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Result of a parse call
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result of a node accessor
pub type AccessResult<T> = std::result::Result<T, AccessError>;

/// Classification of a failed parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Byte that cannot start a token, or a misspelled keyword
    InvalidToken,
    /// Unterminated string or a string that is not valid UTF-8
    InvalidString,
    /// Malformed backslash escape or surrogate pair
    InvalidEscape,
    /// Malformed or out-of-range number
    InvalidNumber,
    /// A value was required but another token was found
    ExpectedValue,
    /// Array elements or object members not separated by `,`
    ExpectedComma,
    /// Token not allowed at this point, including trailing content
    UnexpectedToken,
    /// Container nesting exceeded the configured depth
    TooDeep,
    /// Input too large to be addressed in memory
    OutOfMemory,
    /// Input could not be opened or read
    Io,
}

impl ErrorCode {
    /// Default description of the error class
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidToken => "invalid token",
            Self::InvalidString => "invalid string",
            Self::InvalidEscape => "invalid escape sequence",
            Self::InvalidNumber => "invalid number format",
            Self::ExpectedValue => "expected value",
            Self::ExpectedComma => "expected ','",
            Self::UnexpectedToken => "unexpected token",
            Self::TooDeep => "nesting too deep",
            Self::OutOfMemory => "out of memory",
            Self::Io => "I/O failure",
        }
    }
}

/// First syntax or structural problem found in the input
///
/// Parsing stops at the first error; no partial tree is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    /// Error class
    pub code: ErrorCode,
    /// Byte offset into the input
    pub offset: usize,
    /// Static description
    pub message: &'static str,
}

impl ParseError {
    /// Create an error with the default message of its code
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self {
            code,
            offset,
            message: code.message(),
        }
    }

    /// Create an error with a more specific message
    pub const fn with_message(code: ErrorCode, offset: usize, message: &'static str) -> Self {
        Self {
            code,
            offset,
            message,
        }
    }
}

/// Failed lookup or conversion on a [`Node`](crate::Node)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Requested variant does not match the node
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Variant the caller asked for
        expected: NodeKind,
        /// Variant the node actually holds
        actual: NodeKind,
    },

    /// Array index past the end
    #[error("index {index} out of bounds for array of length {len}")]
    OutOfBounds {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Object has no member with this key
    #[error("key not found: {0:?}")]
    KeyNotFound(String),
}

/// Main error type for arjson operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid JSON input
    #[error("Invalid JSON: {0}")]
    Parse(#[from] ParseError),

    /// Tree access failed
    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    /// Input file could not be opened or read
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

impl Error {
    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Error code for errors raised while producing a tree
    ///
    /// Access errors happen after parsing and carry no code.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Parse(err) => Some(err.code),
            Self::Io { .. } => Some(ErrorCode::Io),
            Self::Access(_) => None,
        }
    }

    /// Byte offset of a parse error
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Parse(err) => Some(err.offset),
            _ => None,
        }
    }
}
