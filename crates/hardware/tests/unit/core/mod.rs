//! Tests for the processor core.
