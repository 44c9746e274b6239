//! Nesting depth enforcement

use crate::{
    config::{DEFAULT_MAX_DEPTH, ParseConfig},
    error::{ErrorCode, ParseError, ParseResult},
};

/// JSON depth tracker for preventing stack overflow
///
/// Incremented before descending into a container and decremented after it
/// closes. The check happens before any recursion, so a hostile input is
/// rejected with `TooDeep` instead of exhausting the stack.
#[derive(Debug, Clone)]
pub struct DepthTracker {
    current_depth: usize,
    max_depth: usize,
}

impl DepthTracker {
    /// Create depth tracker from parser config
    pub fn from_config(config: &ParseConfig) -> Self {
        Self::with_max_depth(config.max_depth)
    }

    /// Create a new depth tracker with custom limit
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            current_depth: 0,
            max_depth,
        }
    }

    /// Enter a new nesting level (array/object)
    ///
    /// `offset` is reported when the limit is exceeded.
    pub fn enter(&mut self, offset: usize) -> ParseResult<()> {
        if self.current_depth >= self.max_depth {
            return Err(ParseError::new(ErrorCode::TooDeep, offset));
        }
        self.current_depth += 1;
        Ok(())
    }

    /// Exit a nesting level
    pub fn exit(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }

    /// Get current depth
    pub fn current_depth(&self) -> usize {
        self.current_depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for DepthTracker {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_tracker() {
        let mut tracker = DepthTracker::with_max_depth(64);

        assert_eq!(tracker.current_depth(), 0);

        assert!(tracker.enter(0).is_ok());
        assert_eq!(tracker.current_depth(), 1);

        assert!(tracker.enter(1).is_ok());
        assert_eq!(tracker.current_depth(), 2);

        tracker.exit();
        assert_eq!(tracker.current_depth(), 1);

        tracker.exit();
        tracker.exit();
        assert_eq!(tracker.current_depth(), 0);
    }

    #[test]
    fn test_depth_tracker_limit() {
        let mut tracker = DepthTracker::with_max_depth(2);

        assert!(tracker.enter(0).is_ok());
        assert!(tracker.enter(1).is_ok());
        let err = tracker.enter(2).unwrap_err();
        assert_eq!(err.code, ErrorCode::TooDeep);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_depth_tracker_from_config() {
        let config = ParseConfig::strict();
        let mut tracker = DepthTracker::from_config(&config);

        for depth in 0..config.max_depth {
            assert!(tracker.enter(depth).is_ok());
        }
        assert!(tracker.enter(config.max_depth).is_err());
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(DepthTracker::default().max_depth(), 256);
    }
}
