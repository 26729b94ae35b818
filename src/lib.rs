//! Stop/move classification of spatio-temporal trajectories
//!
//! Three classifiers label every point of a trajectory as a stop or a move:
//! CB-SMoT ([`stopmove::cbsmot`]), GB-SMoT ([`stopmove::gbsmot`]) and POSMIT
//! ([`stopmove::posmit`]). [`stopmove::evaluate`] compares a labelling against
//! ground truth and [`stopmove::count`] summarises one.
pub mod error;
pub mod numeric;
pub mod stopmove;
pub mod trajectory;

pub use error::{Error, Result};
pub use trajectory::{Mode, Point, StopTrajectory, Trajectory};
