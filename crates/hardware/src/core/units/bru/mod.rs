//! Branch prediction unit (BRU).
//!
//! Fetch asks the predictor for the next PC; execute trains it once the branch
//! resolves. The predictor is a gshare direction predictor in front of a
//! direct-mapped branch target buffer (BTB).

pub use self::branch_predictor::{BranchPredictor, Prediction};

/// Branch predictor trait and the prediction record.
pub mod branch_predictor;

/// Branch Target Buffer for storing predicted branch targets.
pub mod btb;

/// Global history branch predictor (gshare algorithm).
pub mod gshare;
