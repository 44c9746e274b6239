//! Memory management for parsed trees

pub mod arena;

pub use arena::{Arena, ArenaStats};
