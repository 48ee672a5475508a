//! Tests for the simulation context.
