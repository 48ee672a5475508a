//! Pipeline stage implementations.
//!
//! This module contains the individual implementations for the five stages of the
//! instruction pipeline. It includes:
//! 1. **Fetch:** Reads the instruction word through L1I and follows the branch prediction.
//! 2. **Decode:** Extracts fields and classifies operands, destinations and operation.
//! 3. **Execute:** Resolves operands with bypassing, computes results, resolves branches.
//! 4. **Memory:** Performs loads and stores through L1D, waiting out misses.
//! 5. **Writeback:** Commits results to the register file and detects the halt syscall.
//!
//! Every stage moves its op forward only into an empty latch.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

use crate::common::error::Result;
use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::traits::PipelineStage;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry point (IF stage).
pub use fetch::fetch_stage;
/// Memory stage entry point (MEM stage).
pub use memory::mem_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::wb_stage;

/// Instruction fetch.
#[derive(Debug)]
pub struct Fetch;

/// Instruction decode.
#[derive(Debug)]
pub struct Decode;

/// Execute.
#[derive(Debug)]
pub struct Execute;

/// Memory access.
#[derive(Debug)]
pub struct Memory;

/// Writeback.
#[derive(Debug)]
pub struct Writeback;

impl PipelineStage for Fetch {
    const NAME: &'static str = "IF";

    fn tick(engine: &mut PipelineEngine) -> Result<()> {
        fetch_stage(engine);
        Ok(())
    }
}

impl PipelineStage for Decode {
    const NAME: &'static str = "ID";

    fn tick(engine: &mut PipelineEngine) -> Result<()> {
        decode_stage(engine);
        Ok(())
    }
}

impl PipelineStage for Execute {
    const NAME: &'static str = "EX";

    fn tick(engine: &mut PipelineEngine) -> Result<()> {
        execute_stage(engine);
        Ok(())
    }
}

impl PipelineStage for Memory {
    const NAME: &'static str = "MEM";

    fn tick(engine: &mut PipelineEngine) -> Result<()> {
        mem_stage(engine)
    }
}

impl PipelineStage for Writeback {
    const NAME: &'static str = "WB";

    fn tick(engine: &mut PipelineEngine) -> Result<()> {
        wb_stage(engine);
        Ok(())
    }
}
