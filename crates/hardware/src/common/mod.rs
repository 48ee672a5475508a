//! Common utilities and types used throughout the timing simulator.
//!
//! This module provides the building blocks shared by the pipeline and the memory
//! hierarchy. It includes:
//! 1. **Address Decomposition:** One named tag/set/offset split per cache geometry.
//! 2. **Constants:** Architectural widths, latencies and well-known register indices.
//! 3. **Error Handling:** The crate error type and result alias.
//! 4. **Register Management:** The 32-entry register file plus HI/LO.

/// Address decomposition for set-associative caches.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use addr::AddressLayout;
pub use error::{Result, SimError};
pub use reg::RegisterFile;
