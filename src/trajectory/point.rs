//! Package trajectory holds the spatio-temporal model the classifiers work on

use bitvec::prelude::*;

use super::projection::{Equirectangular, distance_euclidean};
use super::region::Region;
use crate::error::{Error, Result};

/// How the coordinates of a trajectory are to be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `[x, y]` in a linear unit (metres)
    Cartesian,
    /// `[lat, lon]` in degrees
    Geographic,
}

/// Point represents one timestamped position of a trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// `[x, y]` or `[lat, lon]` depending on the trajectory [`Mode`]
    pub coords: [f64; 2],
    /// Timestamp in milliseconds
    pub time: i64,
}

impl Point {
    pub fn new(c0: f64, c1: f64, time: i64) -> Self {
        Point {
            coords: [c0, c1],
            time,
        }
    }
}

/// Ordered, index-addressable sequence of points
///
/// Timestamps never decrease. Projected cartesian coordinates are cached at
/// construction, so [`Trajectory::distance`] is cheap regardless of mode.
#[derive(Debug, Clone)]
pub struct Trajectory {
    points: Vec<Point>,
    mode: Mode,
    projection: Equirectangular,
    xy: Vec<[f64; 2]>,
}

impl Trajectory {
    /// Creates a trajectory with a projection suited to its mode
    ///
    /// Geographic trajectories are projected about the centre of their
    /// bounding box, cartesian ones use the origin as reference.
    pub fn new(points: Vec<Point>, mode: Mode) -> Result<Self> {
        let projection = match mode {
            Mode::Geographic => raw_bounds(&points)
                .map(|b| {
                    let [lat, lon] = b.center();
                    Equirectangular::new(lat, lon)
                })
                .unwrap_or_default(),
            Mode::Cartesian => Equirectangular::default(),
        };
        Self::with_projection(points, mode, projection)
    }

    /// Creates a trajectory using the given projection
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if a coordinate is NaN or infinite
    /// - [`Error::NonMonotonicTime`] if a timestamp is smaller than its predecessor
    pub fn with_projection(
        points: Vec<Point>,
        mode: Mode,
        projection: Equirectangular,
    ) -> Result<Self> {
        if let Some(i) = points
            .iter()
            .position(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(Error::invalid(
                "coords",
                format!("{:?} at index {i}", points[i].coords),
                "coordinates must be finite",
            ));
        }
        if let Some(i) = points.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(Error::NonMonotonicTime { index: i + 1 });
        }

        let xy = points
            .iter()
            .map(|p| match mode {
                Mode::Cartesian => p.coords,
                Mode::Geographic => projection.geographic_to_cartesian(p.coords[0], p.coords[1]),
            })
            .collect();

        Ok(Trajectory {
            points,
            mode,
            projection,
            xy,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn projection(&self) -> &Equirectangular {
        &self.projection
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, i: usize) -> &Point {
        &self.points[i]
    }

    /// Timestamp of point `i` in milliseconds
    pub fn time(&self, i: usize) -> i64 {
        self.points[i].time
    }

    /// Milliseconds elapsed between point `from` and point `to`
    pub fn elapsed_millis(&self, from: usize, to: usize) -> i64 {
        self.time(to) - self.time(from)
    }

    /// Cartesian `[x, y]` of point `i`
    pub fn cartesian(&self, i: usize) -> [f64; 2] {
        self.xy[i]
    }

    /// Geographic `[lat, lon]` of point `i`
    pub fn geographic(&self, i: usize) -> [f64; 2] {
        match self.mode {
            Mode::Geographic => self.points[i].coords,
            Mode::Cartesian => self.projection.cartesian_to_geographic(self.xy[i]),
        }
    }

    /// Euclidean distance between points `i` and `j` in cartesian space
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        distance_euclidean(&self.xy[i], &self.xy[j])
    }

    /// Geographic bounding box, `None` for an empty trajectory
    pub fn geo_bounds(&self) -> Option<Region> {
        let mut iter = (0..self.len()).map(|i| self.geographic(i));
        let [lat, lon] = iter.next()?;
        let mut bounds = Region::new(lat, lat, lon, lon);
        for [lat, lon] in iter {
            bounds.extend(lat, lon);
        }
        Some(bounds)
    }
}

/// Bounding box over the raw coordinates, used before a projection exists
fn raw_bounds(points: &[Point]) -> Option<Region> {
    let (first, rest) = points.split_first()?;
    let mut bounds = Region::new(
        first.coords[0],
        first.coords[0],
        first.coords[1],
        first.coords[1],
    );
    for p in rest {
        bounds.extend(p.coords[0], p.coords[1]);
    }
    Some(bounds)
}

/// Trajectory whose points additionally carry a stop/move label
#[derive(Debug, Clone)]
pub struct StopTrajectory {
    trajectory: Trajectory,
    stopped: BitVec,
}

impl StopTrajectory {
    /// Copies `trajectory` and labels every point as moving
    pub fn all_moving(trajectory: &Trajectory) -> Self {
        StopTrajectory {
            trajectory: trajectory.clone(),
            stopped: bitvec![0; trajectory.len()],
        }
    }

    /// Attaches externally supplied labels, e.g. ground truth
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] if there is not exactly one label per point
    pub fn from_labels(trajectory: Trajectory, labels: &[bool]) -> Result<Self> {
        if labels.len() != trajectory.len() {
            return Err(Error::SizeMismatch {
                expected: trajectory.len(),
                actual: labels.len(),
            });
        }
        let stopped = labels.iter().copied().collect();
        Ok(StopTrajectory {
            trajectory,
            stopped,
        })
    }

    pub(crate) fn set_stopped(&mut self, i: usize, is_stopped: bool) {
        self.stopped.set(i, is_stopped);
    }

    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn is_stopped(&self, i: usize) -> bool {
        self.stopped[i]
    }

    /// Labels in index order, `true` for stops
    pub fn labels(&self) -> impl Iterator<Item = bool> + '_ {
        self.stopped.iter().by_vals()
    }

    /// Number of points labelled as stops
    pub fn n_stops(&self) -> usize {
        self.stopped.count_ones()
    }
}
