//! Instruction pipeline implementation.
//!
//! This module contains the five-stage in-order pipeline and the engine that clocks it.
//! It includes the following components:
//! 1. **Engine:** Per-run machine state, the cycle loop and misprediction recovery.
//! 2. **Hazards:** Operand bypassing and load-use stall detection.
//! 3. **Latches:** Single-entry slots between stages and the in-flight op record.
//! 4. **Signals:** Control signals generated during instruction decoding.
//! 5. **Stages:** Fetch, Decode, Execute, Memory, and Writeback.
//! 6. **Traits:** Common interfaces for pipeline stages and latches.

/// Machine state and the per-cycle driver.
pub mod engine;

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Inter-stage pipeline latches (IF/ID, ID/EX, EX/MEM, MEM/WB).
pub mod latches;

/// Control signals generated during instruction decode.
pub mod signals;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

/// Traits for pipeline stage components.
pub mod traits;
