//! Lexical scanner producing one token at a time
//!
//! Strings are scanned in two passes. The first pass finds the closing quote
//! and notes whether any backslash occurs. Without escapes the token text is
//! a slice of the input, quotes included, and nothing is allocated. With
//! escapes the content is unescaped into an arena buffer framed by synthetic
//! quotes, so the parser can strip the delimiters the same way in both cases.

use crate::{
    error::{ErrorCode, ParseError, ParseResult},
    memory::Arena,
};
use memchr::memchr2;
use std::str::{self, Utf8Error};

/// Token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input
    End,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    String,
    Number,
    True,
    False,
    Null,
}

/// Lexical token
///
/// `text` borrows either the input buffer or arena storage; string tokens
/// keep their surrounding quotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the first character of the token
    pub offset: usize,
    /// String token was unescaped into arena storage
    pub escaped: bool,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Self {
            kind,
            text,
            offset,
            escaped: false,
        }
    }

    /// Content between the delimiters of a string token
    ///
    /// Strips exactly one leading and one trailing byte when the text is at
    /// least two bytes long.
    pub fn string_content(&self) -> &'a str {
        let text = self.text;
        if text.len() >= 2 {
            &text[1..text.len() - 1]
        } else {
            text
        }
    }
}

/// Byte-offset cursor over an input buffer
pub struct Tokenizer<'a> {
    input: &'a [u8],
    pos: usize,
    arena: &'a Arena,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer that unescapes strings into `arena`
    pub fn new(input: &'a [u8], arena: &'a Arena) -> Self {
        Self {
            input,
            pos: 0,
            arena,
        }
    }

    /// Current scan position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if the whole input has been consumed
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Scan the next token
    pub fn next_token(&mut self) -> ParseResult<Token<'a>> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(&byte) = self.input.get(start) else {
            return Ok(Token::new(TokenKind::End, "", start));
        };

        match byte {
            b'{' => Ok(self.single(TokenKind::LeftBrace, "{")),
            b'}' => Ok(self.single(TokenKind::RightBrace, "}")),
            b'[' => Ok(self.single(TokenKind::LeftBracket, "[")),
            b']' => Ok(self.single(TokenKind::RightBracket, "]")),
            b':' => Ok(self.single(TokenKind::Colon, ":")),
            b',' => Ok(self.single(TokenKind::Comma, ",")),
            b'"' => self.read_string(),
            b't' => self.read_keyword("true", TokenKind::True),
            b'f' => self.read_keyword("false", TokenKind::False),
            b'n' => self.read_keyword("null", TokenKind::Null),
            b'-' | b'0'..=b'9' => self.read_number(),
            _ => Err(ParseError::new(ErrorCode::InvalidToken, start)),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.input.get(self.pos) {
            self.pos += 1;
        }
    }

    fn single(&mut self, kind: TokenKind, text: &'static str) -> Token<'a> {
        let token = Token::new(kind, text, self.pos);
        self.pos += 1;
        token
    }

    fn read_keyword(&mut self, keyword: &'static str, kind: TokenKind) -> ParseResult<Token<'a>> {
        let start = self.pos;
        let end = start + keyword.len();
        if self.input.get(start..end) != Some(keyword.as_bytes()) {
            return Err(ParseError::new(ErrorCode::InvalidToken, start));
        }
        self.pos = end;
        Ok(Token::new(kind, keyword, start))
    }

    fn read_number(&mut self) -> ParseResult<Token<'a>> {
        let start = self.pos;
        let invalid = || ParseError::new(ErrorCode::InvalidNumber, start);

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }

        // Integer part: a single zero or a run without leading zero
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(invalid()),
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            self.skip_digits();
        }

        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            self.skip_digits();
        }

        let text = str::from_utf8(&self.input[start..self.pos]).map_err(|_| invalid())?;
        Ok(Token::new(TokenKind::Number, text, start))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn read_string(&mut self) -> ParseResult<Token<'a>> {
        let start = self.pos;
        let input = self.input;

        // Pass 1: locate the closing quote
        let mut scan = start + 1;
        let mut has_escapes = false;
        let end = loop {
            let Some(found) = memchr2(b'"', b'\\', &input[scan..]) else {
                return Err(ParseError::new(ErrorCode::InvalidString, start));
            };
            let at = scan + found;
            if input[at] == b'"' {
                break at;
            }
            has_escapes = true;
            if at + 1 >= input.len() {
                return Err(ParseError::with_message(
                    ErrorCode::InvalidEscape,
                    at + 1,
                    "incomplete escape sequence",
                ));
            }
            scan = at + 2;
        };
        self.pos = end + 1;

        if !has_escapes {
            let text = str::from_utf8(&input[start..=end]).map_err(|e| utf8_error(start, e))?;
            return Ok(Token::new(TokenKind::String, text, start));
        }

        let text = self.unescape(start, end)?;
        Ok(Token {
            kind: TokenKind::String,
            text,
            offset: start,
            escaped: true,
        })
    }

    /// Pass 2: translate escapes of `input[start + 1..end]` into the arena
    fn unescape(&self, start: usize, end: usize) -> ParseResult<&'a str> {
        let content_start = start + 1;
        let content = &self.input[content_start..end];
        str::from_utf8(content).map_err(|e| utf8_error(content_start, e))?;

        // Unescaping never grows the content: every escape is at least as
        // long as the UTF-8 it produces.
        let arena: &'a Arena = self.arena;
        let buffer = arena.alloc_bytes(content.len() + 2);
        buffer[0] = b'"';
        let mut out = 1;
        let mut i = 0;

        while i < content.len() {
            let byte = content[i];
            if byte != b'\\' {
                buffer[out] = byte;
                out += 1;
                i += 1;
                continue;
            }

            // Pass 1 guarantees a character after every backslash
            let unescaped = match content[i + 1] {
                b'"' => b'"',
                b'\\' => b'\\',
                b'/' => b'/',
                b'b' => 0x08,
                b'f' => 0x0C,
                b'n' => b'\n',
                b'r' => b'\r',
                b't' => b'\t',
                b'u' => {
                    let (ch, consumed) = decode_unicode(content, i, content_start)?;
                    out += ch.encode_utf8(&mut buffer[out..]).len();
                    i += consumed;
                    continue;
                }
                _ => {
                    return Err(ParseError::with_message(
                        ErrorCode::InvalidEscape,
                        content_start + i + 1,
                        "unknown escape sequence",
                    ));
                }
            };
            buffer[out] = unescaped;
            out += 1;
            i += 2;
        }

        buffer[out] = b'"';
        out += 1;

        let filled: &'a [u8] = buffer;
        str::from_utf8(&filled[..out]).map_err(|e| utf8_error(start, e))
    }
}

/// Decode `\uXXXX` (or a surrogate pair) at `content[i]`
///
/// Returns the character and the number of input bytes consumed.
fn decode_unicode(content: &[u8], i: usize, base: usize) -> ParseResult<(char, usize)> {
    let escape_error = |at: usize, message: &'static str| {
        ParseError::with_message(ErrorCode::InvalidEscape, base + at, message)
    };

    let high = read_hex4(content, i + 2)
        .ok_or_else(|| escape_error(i + 2, "invalid unicode escape sequence"))?;

    let (codepoint, consumed) = match high {
        0xD800..=0xDBFF => {
            let low_at = i + 6;
            if content.get(low_at..low_at + 2) != Some(b"\\u".as_slice()) {
                return Err(escape_error(low_at, "missing low surrogate"));
            }
            let low = read_hex4(content, low_at + 2)
                .ok_or_else(|| escape_error(low_at + 2, "invalid unicode escape sequence"))?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(escape_error(low_at + 2, "invalid low surrogate"));
            }
            (0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00), 12)
        }
        0xDC00..=0xDFFF => return Err(escape_error(i + 2, "unpaired low surrogate")),
        _ => (high, 6),
    };

    let ch = char::from_u32(codepoint).ok_or_else(|| escape_error(i, "invalid codepoint"))?;
    Ok((ch, consumed))
}

fn read_hex4(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at + 4)?
        .iter()
        .try_fold(0u32, |acc, &b| Some((acc << 4) | char::from(b).to_digit(16)?))
}

fn utf8_error(base: usize, err: Utf8Error) -> ParseError {
    ParseError::with_message(
        ErrorCode::InvalidString,
        base + err.valid_up_to(),
        "invalid UTF-8 in string",
    )
}
