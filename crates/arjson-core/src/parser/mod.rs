//! Recursive-descent JSON parser building arena-allocated trees
//!
//! The parser pulls tokens from a [`Tokenizer`] with one token of lookahead
//! and allocates every node in the caller's [`Arena`]. The first error aborts
//! the parse; no partial tree is returned.
//!
//! # Lifetimes
//!
//! Strings without escape sequences are zero-copy views into the input
//! ([`JsonStr::Borrowed`]); escaped strings are unescaped into the arena
//! ([`JsonStr::Arena`]). The returned tree therefore borrows both the arena
//! and the input buffer for `'a`, and the compiler rejects dropping either
//! one while the tree is alive.
//!
//! # Resource limits
//!
//! Nesting is capped by [`ParseConfig::max_depth`] (256 by default). Total
//! memory is not bounded: callers parsing untrusted input should limit the
//! input size before calling [`parse`].

pub mod tokenizer;
pub mod value;

pub use tokenizer::{Token, TokenKind, Tokenizer};
pub use value::{JsonStr, Node, NodeKind, Pair};

use crate::{
    config::ParseConfig,
    error::{ErrorCode, ParseError, ParseResult},
    memory::Arena,
    security::DepthTracker,
};
use smallvec::SmallVec;

/// Parse `input` into a tree allocated in `arena`
pub fn parse<'a>(input: &'a [u8], arena: &'a Arena) -> ParseResult<&'a Node<'a>> {
    Parser::new(input, arena).parse()
}

/// Parse a string slice into a tree allocated in `arena`
pub fn parse_str<'a>(input: &'a str, arena: &'a Arena) -> ParseResult<&'a Node<'a>> {
    parse(input.as_bytes(), arena)
}

/// Parse with custom limits
pub fn parse_with_config<'a>(
    input: &'a [u8],
    arena: &'a Arena,
    config: ParseConfig,
) -> ParseResult<&'a Node<'a>> {
    Parser::with_config(input, arena, config).parse()
}

/// Single-use parser over one input buffer
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    arena: &'a Arena,
    lookahead: Option<Token<'a>>,
    depth: DepthTracker,
}

impl<'a> Parser<'a> {
    /// Create parser with default configuration
    pub fn new(input: &'a [u8], arena: &'a Arena) -> Self {
        Self::with_config(input, arena, ParseConfig::default())
    }

    /// Create parser with custom configuration
    pub fn with_config(input: &'a [u8], arena: &'a Arena, config: ParseConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(input, arena),
            arena,
            lookahead: None,
            depth: DepthTracker::from_config(&config),
        }
    }

    /// Parse exactly one value followed by end of input
    pub fn parse(mut self) -> ParseResult<&'a Node<'a>> {
        let result = self.parse_document();
        match &result {
            Ok(_) => tracing::trace!(bytes = self.tokenizer.position(), "parse complete"),
            Err(err) => tracing::debug!(
                code = ?err.code,
                offset = err.offset,
                message = err.message,
                "parse failed"
            ),
        }
        result
    }

    fn parse_document(&mut self) -> ParseResult<&'a Node<'a>> {
        let root = self.parse_value()?;
        let token = self.peek()?;
        if token.kind != TokenKind::End {
            return Err(ParseError::with_message(
                ErrorCode::UnexpectedToken,
                token.offset,
                "unexpected content after root value",
            ));
        }
        Ok(root)
    }

    fn peek(&mut self) -> ParseResult<Token<'a>> {
        if let Some(token) = self.lookahead {
            return Ok(token);
        }
        let token = self.tokenizer.next_token()?;
        self.lookahead = Some(token);
        Ok(token)
    }

    fn consume(&mut self) {
        self.lookahead = None;
    }

    fn expect(&mut self, kind: TokenKind, message: &'static str) -> ParseResult<Token<'a>> {
        let token = self.peek()?;
        if token.kind != kind {
            return Err(ParseError::with_message(
                ErrorCode::UnexpectedToken,
                token.offset,
                message,
            ));
        }
        self.consume();
        Ok(token)
    }

    fn alloc(&self, node: Node<'a>) -> &'a Node<'a> {
        let arena: &'a Arena = self.arena;
        arena.alloc_value(node)
    }

    fn parse_value(&mut self) -> ParseResult<&'a Node<'a>> {
        let token = self.peek()?;
        let node = match token.kind {
            TokenKind::Null => Node::Null,
            TokenKind::True => Node::Bool(true),
            TokenKind::False => Node::Bool(false),
            TokenKind::Number => Node::Number(parse_number(&token)?),
            TokenKind::String => Node::String(string_value(&token)),
            TokenKind::LeftBracket => return self.parse_array(),
            TokenKind::LeftBrace => return self.parse_object(),
            _ => return Err(ParseError::new(ErrorCode::ExpectedValue, token.offset)),
        };
        self.consume();
        Ok(self.alloc(node))
    }

    fn parse_array(&mut self) -> ParseResult<&'a Node<'a>> {
        self.depth.enter(self.tokenizer.position())?;
        self.expect(TokenKind::LeftBracket, "expected '['")?;

        if self.peek()?.kind == TokenKind::RightBracket {
            self.consume();
            self.depth.exit();
            return Ok(self.alloc(Node::Array(&[])));
        }

        let mut elements: SmallVec<[&'a Node<'a>; 16]> = SmallVec::new();
        loop {
            elements.push(self.parse_value()?);

            let token = self.peek()?;
            match token.kind {
                TokenKind::RightBracket => {
                    self.consume();
                    break;
                }
                TokenKind::Comma => self.consume(),
                _ => return Err(ParseError::new(ErrorCode::ExpectedComma, token.offset)),
            }
        }
        self.depth.exit();

        let arena: &'a Arena = self.arena;
        let items = arena.alloc_slice_copy(&elements);
        Ok(self.alloc(Node::Array(items)))
    }

    fn parse_object(&mut self) -> ParseResult<&'a Node<'a>> {
        self.depth.enter(self.tokenizer.position())?;
        self.expect(TokenKind::LeftBrace, "expected '{'")?;

        if self.peek()?.kind == TokenKind::RightBrace {
            self.consume();
            self.depth.exit();
            return Ok(self.alloc(Node::Object(&[])));
        }

        let mut pairs: SmallVec<[Pair<'a>; 8]> = SmallVec::new();
        loop {
            let key = self.expect(TokenKind::String, "expected string key")?;
            self.expect(TokenKind::Colon, "expected ':' after object key")?;
            let value = self.parse_value()?;
            // Duplicate keys are kept as separate members
            pairs.push(Pair {
                key: string_value(&key),
                value,
            });

            let token = self.peek()?;
            match token.kind {
                TokenKind::RightBrace => {
                    self.consume();
                    break;
                }
                TokenKind::Comma => self.consume(),
                _ => return Err(ParseError::new(ErrorCode::ExpectedComma, token.offset)),
            }
        }
        self.depth.exit();

        let arena: &'a Arena = self.arena;
        let members = arena.alloc_slice_copy(&pairs);
        Ok(self.alloc(Node::Object(members)))
    }
}

fn parse_number(token: &Token<'_>) -> ParseResult<f64> {
    token
        .text
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ParseError::new(ErrorCode::InvalidNumber, token.offset))
}

fn string_value<'a>(token: &Token<'a>) -> JsonStr<'a> {
    let content = token.string_content();
    if token.escaped {
        JsonStr::Arena(content)
    } else {
        JsonStr::Borrowed(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        let arena = Arena::new();
        assert!(parse_str("null", &arena).unwrap().is_null());
        assert_eq!(parse_str("true", &arena).unwrap().as_bool(), Ok(true));
        assert_eq!(parse_str(" false ", &arena).unwrap().as_bool(), Ok(false));
        assert_eq!(parse_str("123.45", &arena).unwrap().as_number(), Ok(123.45));
        assert_eq!(parse_str("-0.5e2", &arena).unwrap().as_number(), Ok(-50.0));
        assert_eq!(parse_str("\"hi\"", &arena).unwrap().as_str(), Ok("hi"));
    }

    #[test]
    fn test_parse_nested() {
        let arena = Arena::new();
        let root = parse_str(r#"{"a": [1, {"b": null}], "c": {}}"#, &arena).unwrap();
        let a = root.get_key("a").unwrap();
        assert_eq!(a.len(), Ok(2));
        assert!(a.get(1).unwrap().get_key("b").unwrap().is_null());
        assert_eq!(root.get_key("c").unwrap().len(), Ok(0));
    }

    #[test]
    fn test_empty_containers() {
        let arena = Arena::new();
        assert_eq!(parse_str("[]", &arena).unwrap().len(), Ok(0));
        assert_eq!(parse_str("{ }", &arena).unwrap().len(), Ok(0));
        assert_eq!(parse_str("[[]]", &arena).unwrap().len(), Ok(1));
    }

    #[test]
    fn test_trailing_content() {
        let arena = Arena::new();
        let err = parse_str("1 2", &arena).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedToken);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_grammar_errors() {
        let arena = Arena::new();
        let code = |input: &str| parse_str(input, &arena).unwrap_err().code;

        assert_eq!(code(""), ErrorCode::ExpectedValue);
        assert_eq!(code("[1,]"), ErrorCode::ExpectedValue);
        assert_eq!(code("[1 2]"), ErrorCode::ExpectedComma);
        assert_eq!(code("{\"a\":1 \"b\":2}"), ErrorCode::ExpectedComma);
        assert_eq!(code("{1,2}"), ErrorCode::UnexpectedToken);
        assert_eq!(code("{\"a\" 1}"), ErrorCode::UnexpectedToken);
        assert_eq!(code("[1"), ErrorCode::ExpectedComma);
        assert_eq!(code("]"), ErrorCode::ExpectedValue);
    }

    #[test]
    fn test_out_of_range_number() {
        let arena = Arena::new();
        let err = parse_str("[1e400]", &arena).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidNumber);
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn test_depth_limit_config() {
        let arena = Arena::new();
        let config = ParseConfig::default().with_max_depth(2);
        assert!(parse_with_config(b"[[1]]", &arena, config).is_ok());
        let err = parse_with_config(b"[[[1]]]", &arena, config).unwrap_err();
        assert_eq!(err.code, ErrorCode::TooDeep);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_escaped_key_storage() {
        let arena = Arena::new();
        let root = parse_str(r#"{"plain": 1, "\u0065scaped": 2}"#, &arena).unwrap();
        let pairs = root.as_object().unwrap();
        assert!(pairs[0].key.is_borrowed());
        assert!(!pairs[1].key.is_borrowed());
        assert_eq!(pairs[1].key, "escaped");
    }
}
