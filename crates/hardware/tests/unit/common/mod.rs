//! Tests for shared types.

/// Tag/set/offset split.
pub mod address;
