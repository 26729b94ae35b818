//! Package trajectory implements the spatio-temporal model: points, trajectories,
//! stop/move labelled trajectories, geographic regions and projection
pub mod point;
pub mod projection;
pub mod region;

#[cfg(test)]
mod point_test;

pub use point::{Mode, Point, StopTrajectory, Trajectory};
pub use projection::{DEGREE_RAD, EARTH_R, Equirectangular, distance_euclidean};
pub use region::Region;
