//! Package stopmove implements the stop/move classifiers and the statistics
//! used to summarise and evaluate their output
pub mod cbsmot;
pub mod count;
pub mod evaluate;
pub mod gbsmot;
pub mod posmit;

#[cfg(test)]
mod gbsmot_test;

pub use count::TrajectoryStats;
pub use evaluate::{ClassificationStats, evaluate};
pub use posmit::{PosmitOutcome, PosmitParams};
