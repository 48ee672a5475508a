//! Stage and latch interfaces.
//!
//! Every stage is a zero-sized type whose `tick` runs once per clock against the
//! whole engine; the engine names the stage in its trace span. Latches expose only
//! what recovery needs: emptiness and flushing.

use crate::common::error::Result;
use crate::core::pipeline::engine::PipelineEngine;

/// One of the five pipeline stages.
pub trait PipelineStage {
    /// Label for trace output (`"IF"`, `"ID"`, ...).
    const NAME: &'static str;

    /// Runs the stage for the current cycle.
    ///
    /// # Errors
    ///
    /// Only the memory stage can fail, when a store finds its block absent from L1D.
    fn tick(engine: &mut PipelineEngine) -> Result<()>;
}

/// A slot between two stages.
pub trait PipelineLatch {
    /// Drops the held op, if any.
    fn flush(&mut self);

    /// `true` when the slot holds no op and the upstream stage may write it.
    fn is_empty(&self) -> bool;
}
