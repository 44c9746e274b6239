//! Parser and writer configuration

/// Maximum container nesting accepted by default
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Spaces per nesting level in pretty output by default
pub const DEFAULT_INDENT: usize = 2;

/// Parser limits
///
/// The parser recurses once per nested container, so `max_depth` bounds its
/// stack usage. The default of 256 fits comfortably in a 2 MiB thread stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Deepest array/object nesting accepted; deeper input fails with `TooDeep`
    pub max_depth: usize,
}

impl ParseConfig {
    /// Tight limit for small untrusted payloads
    pub const fn strict() -> Self {
        Self { max_depth: 64 }
    }

    /// Deep documents; run on a thread with at least 8 MiB of stack
    pub const fn permissive() -> Self {
        Self { max_depth: 1024 }
    }

    /// Override the depth limit
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Writer output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// Multi-line output with indentation
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set
    pub indent: usize,
}

impl WriterConfig {
    /// No whitespace at all
    pub const fn compact() -> Self {
        Self {
            pretty: false,
            indent: DEFAULT_INDENT,
        }
    }

    /// One member per line, two-space indent
    pub const fn pretty() -> Self {
        Self {
            pretty: true,
            indent: DEFAULT_INDENT,
        }
    }

    /// Override the indent width
    pub const fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self::compact()
    }
}
