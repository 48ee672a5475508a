//! Tests for the MIPS32 encoding helpers.


/// Field extraction.
pub mod fields;
