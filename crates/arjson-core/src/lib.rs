//! # arjson
//!
//! Arena-backed, single-pass JSON parser and serializer.
//!
//! Every node of a parsed tree lives in an [`Arena`] and is freed in bulk
//! when the arena is dropped or reset. Strings without escape sequences are
//! zero-copy views into the input; the parsed tree borrows both.
//!
//! ```
//! use arjson::{Arena, parse_str, write};
//!
//! let arena = Arena::new();
//! let root = parse_str(r#"{"port": 8080, "features": ["auth", "api"]}"#, &arena)?;
//!
//! assert_eq!(root.get_key("port")?.as_number()?, 8080.0);
//! assert_eq!(root.get_key("features")?.len()?, 2);
//! assert_eq!(write(root, false), r#"{"port":8080,"features":["auth","api"]}"#);
//! # Ok::<(), arjson::Error>(())
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod builder;
pub mod config;
pub mod error;
pub mod io;
pub mod memory;
pub mod parser;
pub mod security;
pub mod stats;
pub mod writer;

pub use builder::{
    ArrayBuilder, IntoNode, ObjectBuilder, build_array_from, make_bool, make_null, make_number,
    make_string,
};
pub use config::{DEFAULT_INDENT, DEFAULT_MAX_DEPTH, ParseConfig, WriterConfig};
pub use error::{AccessError, AccessResult, Error, ErrorCode, ParseError, ParseResult, Result};
pub use io::{read_file_to_arena, read_to_arena};
pub use memory::{Arena, ArenaStats};
pub use parser::{
    JsonStr, Node, NodeKind, Pair, Parser, Token, TokenKind, Tokenizer, parse, parse_str,
    parse_with_config,
};
pub use security::DepthTracker;
pub use stats::NodeStats;
pub use writer::{Writer, write};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        AccessError, Arena, ArrayBuilder, Error, ErrorCode, JsonStr, Node, NodeKind,
        ObjectBuilder, ParseConfig, ParseError, Result, Writer, WriterConfig, parse, parse_str,
        write,
    };
}
