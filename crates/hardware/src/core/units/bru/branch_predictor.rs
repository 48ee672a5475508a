//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait consulted by fetch and trained by
//! execute, together with the `Prediction` fetch records inside each in-flight op so
//! execute can compare it against the resolved outcome.

/// What fetch believed about the instruction at a PC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Prediction {
    /// The target buffer held an entry for this PC.
    pub is_branch: bool,
    /// Predicted taken.
    pub taken: bool,
    /// PC fetch continued from (the stored target if taken, else `pc + 4`).
    pub next_pc: u32,
}

/// Trait for branch prediction algorithms.
pub trait BranchPredictor {
    /// Predicts the next fetch PC for the instruction at `pc`.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter being fetched.
    ///
    /// # Returns
    ///
    /// The prediction fetch follows and records in the op.
    fn predict(&self, pc: u32) -> Prediction;

    /// Trains the direction predictor with a resolved conditional branch.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch.
    /// * `taken` - Whether the branch was taken.
    fn update_direction(&mut self, pc: u32, taken: bool);

    /// Records the resolved destination of any branch or jump.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch.
    /// * `target` - Resolved branch destination (the taken path, whether or not it was taken).
    /// * `unconditional` - The instruction always transfers control.
    fn update_target(&mut self, pc: u32, target: u32, unconditional: bool);
}
