//! Tree-to-text serialization
//!
//! Compact output contains no whitespace at all. Pretty output puts every
//! element and member on its own line, indented by [`WriterConfig::indent`]
//! spaces per level, with a single space after `:`. Empty containers stay
//! `[]` / `{}` in both modes.

use crate::{config::WriterConfig, parser::value::Node};
use std::io;

/// Serialize `root`, optionally pretty-printed with two-space indent
pub fn write(root: &Node<'_>, pretty: bool) -> String {
    Writer::new(pretty).write(root)
}

/// JSON serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct Writer {
    config: WriterConfig,
}

impl Writer {
    /// Compact or two-space pretty writer
    pub fn new(pretty: bool) -> Self {
        let config = if pretty {
            WriterConfig::pretty()
        } else {
            WriterConfig::compact()
        };
        Self { config }
    }

    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Render a tree into a new string
    pub fn write(&self, root: &Node<'_>) -> String {
        let mut out = String::with_capacity(1024);
        self.write_node(root, 0, &mut out);
        out
    }

    /// Render a tree into any byte sink
    pub fn write_to<W: io::Write>(&self, root: &Node<'_>, mut sink: W) -> io::Result<()> {
        sink.write_all(self.write(root).as_bytes())?;
        sink.flush()
    }

    fn write_node(&self, node: &Node<'_>, depth: usize, out: &mut String) {
        match *node {
            Node::Null => out.push_str("null"),
            Node::Bool(b) => out.push_str(if b { "true" } else { "false" }),
            Node::Number(n) => write_number(n, out),
            Node::String(s) => write_string(s.as_str(), out),
            Node::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.newline_indent(depth + 1, out);
                    self.write_node(item, depth + 1, out);
                }
                if !items.is_empty() {
                    self.newline_indent(depth, out);
                }
                out.push(']');
            }
            Node::Object(pairs) => {
                out.push('{');
                for (i, pair) in pairs.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.newline_indent(depth + 1, out);
                    write_string(pair.key.as_str(), out);
                    out.push_str(if self.config.pretty { ": " } else { ":" });
                    self.write_node(pair.value, depth + 1, out);
                }
                if !pairs.is_empty() {
                    self.newline_indent(depth, out);
                }
                out.push('}');
            }
        }
    }

    fn newline_indent(&self, depth: usize, out: &mut String) {
        if self.config.pretty {
            out.push('\n');
            out.extend(std::iter::repeat_n(' ', depth * self.config.indent));
        }
    }
}

/// Shortest round-trip digits; exponent form outside `[1e-6, 1e21)`
fn write_number(value: f64, out: &mut String) {
    if !value.is_finite() {
        // JSON has no representation for NaN or infinities
        out.push_str("null");
        return;
    }
    let magnitude = value.abs();
    let text = if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        format!("{value:e}")
    } else {
        value.to_string()
    };
    out.push_str(&text);
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Quote and escape a string; non-ASCII passes through unchanged
fn write_string(value: &str, out: &mut String) {
    out.push('"');
    let mut start = 0;
    for (i, byte) in value.bytes().enumerate() {
        let escape = match byte {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            0x08 => "\\b",
            0x0C => "\\f",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x00..=0x1F => "",
            _ => continue,
        };
        // Escaped bytes are ASCII, so `start..i` is always a char boundary
        out.push_str(&value[start..i]);
        if escape.is_empty() {
            out.push_str("\\u00");
            out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
            out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0F)]));
        } else {
            out.push_str(escape);
        }
        start = i + 1;
    }
    out.push_str(&value[start..]);
    out.push('"');
}
