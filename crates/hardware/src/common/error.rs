//! Simulator error definitions.
//!
//! Only conditions a caller can act on are errors: bad configuration, an unreadable or
//! malformed program image, and a store that reached the data cache without its block
//! resident. Cache misses, MSHR exhaustion and branch mispredictions are normal timing
//! events and never surface here. Broken structural invariants (a full set with no LRU
//! victim) are logic bugs and abort via `unreachable!`.

use thiserror::Error;

/// Errors produced by the timing simulator.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value failed validation.
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        /// Dotted path of the offending field (e.g. `cache.l1d.sets`).
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A program file could not be read.
    #[error("failed to read program: {0}")]
    Io(#[from] std::io::Error),

    /// A program line did not hold a hexadecimal instruction word.
    #[error("malformed program word on line {line}: {text:?}")]
    MalformedProgram {
        /// 1-based line number in the program text.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// A store reached the data cache for a block that is not resident.
    ///
    /// The memory stage always completes a load of the target word before storing,
    /// so this indicates the hierarchy was driven out of order.
    #[error("store to {addr:#010x} but its block is not resident in L1D")]
    StoreNotResident {
        /// Word-aligned store address.
        addr: u32,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimError>;
