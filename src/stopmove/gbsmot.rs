//! GB-SMoT finds stops by checking whether consecutive trajectory points stay
//! inside the same geographic region for long enough.
//!
//! Based on "A Model for Enriching Trajectories with Semantic Geographical
//! Information" (Alvares et al.). Regions are either supplied by the caller or
//! taken from a uniform grid laid over the trajectory.

use std::collections::BTreeMap;

use bitvec::prelude::*;
use tracing::{debug, trace};

use crate::error::{Error, Result, ensure_len};
use crate::trajectory::{Region, StopTrajectory, Trajectory};

/// Classifies points as stops when they stay in one grid cell of side
/// `region_size` for at least `min_duration_millis`
///
/// See [`build_regions`] and [`classify_with_regions`].
pub fn classify(
    traj: &Trajectory,
    region_size: f64,
    min_duration_millis: i64,
) -> Result<StopTrajectory> {
    let regions = build_regions(traj, region_size)?;
    classify_with_regions(traj, &regions, min_duration_millis)
}

/// Lays a grid of `region_size` square cells (cartesian units) over the
/// trajectory's bounding box and returns the occupied cells as geographic
/// regions, ordered by grid column then row
///
/// # Errors
///
/// - [`Error::InvalidParameter`] unless `region_size` is a positive number
/// - [`Error::TooShort`] for trajectories of fewer than two points
pub fn build_regions(traj: &Trajectory, region_size: f64) -> Result<Vec<Region>> {
    if !region_size.is_finite() || region_size <= 0.0 {
        return Err(Error::invalid(
            "region_size",
            region_size,
            "must be a positive distance",
        ));
    }
    ensure_len(traj.len(), 2)?;
    let Some(study_region) = traj.geo_bounds() else {
        return Ok(Vec::new());
    };

    let projection = traj.projection();
    let bottom_left =
        projection.geographic_to_cartesian(study_region.min_lat(), study_region.min_lon());

    // sparse grid, keyed by (column, row)
    let mut cells: BTreeMap<(u64, u64), Region> = BTreeMap::new();
    for i in 0..traj.len() {
        let [lat, lon] = traj.geographic(i);
        let xy = projection.geographic_to_cartesian(lat, lon);
        let cell = grid_cell(xy, bottom_left, region_size);
        let region = cells.entry(cell).or_insert_with(|| {
            let min_x = bottom_left[0] + region_size * cell.0 as f64;
            let min_y = bottom_left[1] + region_size * cell.1 as f64;
            let min = projection.cartesian_to_geographic([min_x, min_y]);
            let max =
                projection.cartesian_to_geographic([min_x + region_size, min_y + region_size]);
            Region::new(min[0], max[0], min[1], max[1])
        });
        // absorb projection round-off so a cell always holds the points that made it
        region.extend(lat, lon);
    }

    debug!(regions = cells.len(), region_size, "built GB-SMoT regions");
    Ok(cells.into_values().collect())
}

fn grid_cell(xy: [f64; 2], bottom_left: [f64; 2], region_size: f64) -> (u64, u64) {
    let dx = (xy[0] - bottom_left[0]).abs();
    let dy = (xy[1] - bottom_left[1]).abs();
    (
        (dx / region_size).floor() as u64,
        (dy / region_size).floor() as u64,
    )
}

/// Labels contiguous runs of points as stops when they stay within one of
/// `regions` for at least `min_duration_millis`, otherwise as moves
///
/// Points outside every region are moves. Every point is labelled exactly
/// once and the output keeps the input order.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `min_duration_millis` is negative
/// - [`Error::TooShort`] for trajectories of fewer than two points
pub fn classify_with_regions(
    traj: &Trajectory,
    regions: &[Region],
    min_duration_millis: i64,
) -> Result<StopTrajectory> {
    if min_duration_millis < 0 {
        return Err(Error::invalid(
            "min_duration_millis",
            min_duration_millis,
            "must not be negative",
        ));
    }
    ensure_len(traj.len(), 2)?;

    debug!(
        points = traj.len(),
        regions = regions.len(),
        min_duration_millis,
        "running GB-SMoT"
    );

    let mut output = StopTrajectory::all_moving(traj);
    let mut outside = bitvec![0; traj.len()];
    let mut visit = RegionVisit::default();
    let last = traj.len() - 1;

    let mut i = 0;
    while i <= last {
        let [lat, lon] = traj.geographic(i);
        let Some(entry_region) = enveloping_region(regions, lat, lon) else {
            // outside every region: a move, sweep state untouched
            outside.set(i, true);
            i += 1;
            continue;
        };

        let current = visit.current;
        let (end_of_visit, same_region) = match current {
            Some(current) if current.contains(entry_region) => {
                visit.exit = i;
                (i == last, true)
            }
            Some(_) => (true, false),
            None => {
                visit = RegionVisit {
                    current: Some(*entry_region),
                    enter: i,
                    exit: i,
                };
                (i == last, true)
            }
        };

        if end_of_visit {
            visit.close(traj, min_duration_millis, &outside, &mut output);
            visit = RegionVisit::default();

            // re-do the current index against its own region
            if !same_region {
                continue;
            }
        }
        i += 1;
    }

    // trailing points outside every region leave a visit open
    if visit.current.is_some() {
        visit.close(traj, min_duration_millis, &outside, &mut output);
    }

    debug!(stops = output.n_stops(), "GB-SMoT done");
    Ok(output)
}

/// Sweep state: the region being visited and the first/last index inside it
#[derive(Debug, Default)]
struct RegionVisit {
    current: Option<Region>,
    enter: usize,
    exit: usize,
}

impl RegionVisit {
    /// Labels the visited points as stops if the visit lasted long enough,
    /// points already passed through as outside every region stay moves
    fn close(
        &self,
        traj: &Trajectory,
        min_duration_millis: i64,
        outside: &BitSlice,
        output: &mut StopTrajectory,
    ) {
        let was_stopped = traj.elapsed_millis(self.enter, self.exit) >= min_duration_millis;
        trace!(
            enter = self.enter,
            exit = self.exit,
            was_stopped,
            "region visit ended"
        );
        for j in self.enter..=self.exit {
            if !outside[j] {
                output.set_stopped(j, was_stopped);
            }
        }
    }
}

/// First region, in declaration order, containing `(lat, lon)`
fn enveloping_region(regions: &[Region], lat: f64, lon: f64) -> Option<&Region> {
    regions.iter().find(|r| r.contains_point(lat, lon))
}
