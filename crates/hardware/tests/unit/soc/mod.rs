//! Functional main memory.
