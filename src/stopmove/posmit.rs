//! POSMIT: probabilistic stop classification
//!
//! Every point is assumed to be a stop and gets a probability from how close
//! its index neighbours stay to it in space. Neighbours are weighted by a
//! gaussian kernel over their index offset, spatial closeness is scored by a
//! gaussian kernel over distance relative to the stop variance.

use std::sync::LazyLock;

use tracing::debug;

use crate::error::{Error, Result, ensure_len};
use crate::numeric::maths::{self, kernel};
use crate::numeric::{kmeans, kneedle};
use crate::trajectory::{StopTrajectory, Trajectory};

/// Neighbours with an index weight below `kernel(3)` are not sampled
static CUTOFF: LazyLock<f64> = LazyLock::new(|| kernel(3.0));

/// Displacements above this are assumed to be moves when estimating the
/// stop variance
pub const DEFAULT_MAX_STOP_VARIANCE: f64 = 20.0;

/// Parameters of [`classify`], `None` means estimate from the trajectory
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PosmitParams {
    /// Index neighbours sampled either side of a point (roughly)
    pub search_radius: Option<usize>,
    /// Displacement a true stop is still allowed to have
    pub stop_variance: Option<f64>,
    /// Minimum stop probability of a stop
    pub min_stop_probability: Option<f64>,
}

/// Result of [`classify`] along with the parameters that were used
#[derive(Debug, Clone)]
pub struct PosmitOutcome {
    pub search_radius: usize,
    pub stop_variance: f64,
    pub min_stop_probability: f64,
    pub probabilities: Vec<f64>,
    pub stops: StopTrajectory,
}

/// Runs POSMIT end to end, estimating whatever `params` leaves out
///
/// Estimation order is stop variance, then search radius (which depends on
/// it), then the probability threshold (which depends on the scores).
pub fn classify(traj: &Trajectory, params: &PosmitParams) -> Result<PosmitOutcome> {
    if let Some(v) = params.stop_variance {
        if !v.is_finite() || v <= 0.0 {
            return Err(Error::invalid("stop_variance", v, "must be greater than zero"));
        }
    }
    if params.search_radius == Some(0) {
        return Err(Error::invalid("search_radius", 0, "must be one or greater"));
    }
    if let Some(pr) = params.min_stop_probability {
        check_probability(pr)?;
    }
    ensure_len(traj.len(), 2)?;

    let stop_variance = match params.stop_variance {
        Some(v) => v,
        None => estimate_stop_variance(traj)?,
    };
    let search_radius = match params.search_radius {
        Some(r) => r,
        None => estimate_search_radius(traj, stop_variance)?,
    };
    let probabilities = score(traj, search_radius, stop_variance)?;
    let min_stop_probability = match params.min_stop_probability {
        Some(pr) => pr,
        None => estimate_min_stop_pr(&probabilities)?,
    };
    let stops = to_stop_trajectory(traj, &probabilities, min_stop_probability)?;

    debug!(
        search_radius,
        stop_variance,
        min_stop_probability,
        stops = stops.n_stops(),
        "POSMIT done"
    );
    Ok(PosmitOutcome {
        search_radius,
        stop_variance,
        min_stop_probability,
        probabilities,
        stops,
    })
}

/// Computes a stop probability in `[0, 1]` for every point
///
/// # Arguments
///
/// * `search_radius` - Index offset at which the neighbour weight is `kernel(1)`;
///   neighbours up to three radii away are sampled
/// * `stop_variance` - Distance at which spatial similarity is `kernel(1)`;
///   zero makes every similarity zero
pub fn score(traj: &Trajectory, search_radius: usize, stop_variance: f64) -> Result<Vec<f64>> {
    if search_radius == 0 {
        return Err(Error::invalid("search_radius", 0, "must be one or greater"));
    }
    if !stop_variance.is_finite() || stop_variance < 0.0 {
        return Err(Error::invalid(
            "stop_variance",
            stop_variance,
            "must be a non-negative distance",
        ));
    }
    ensure_len(traj.len(), 2)?;

    debug!(
        points = traj.len(),
        search_radius, stop_variance, "scoring POSMIT stop probabilities"
    );
    Ok((0..traj.len())
        .map(|center| stop_probability(traj, center, search_radius, stop_variance))
        .collect())
}

/// Index-weight-weighted mean of the spatial similarity of the neighbours
/// of `center`
fn stop_probability(
    traj: &Trajectory,
    center: usize,
    search_radius: usize,
    stop_variance: f64,
) -> f64 {
    let last = traj.len() - 1;
    let mut sum_weights = 0.0;
    let mut sum_index_weight = 0.0;

    // left and right sides are independent, each stops at the cutoff or the boundary
    for left in [true, false] {
        for offset in 1.. {
            let idx = if left {
                center.checked_sub(offset)
            } else {
                Some(center + offset).filter(|&i| i <= last)
            };
            let Some(idx) = idx else { break };

            let index_weight = kernel(offset as f64 / search_radius as f64);
            if index_weight < *CUTOFF {
                break;
            }
            sum_weights += index_weight * similarity(traj.distance(center, idx), stop_variance);
            sum_index_weight += index_weight;
        }
    }

    if sum_index_weight == 0.0 {
        return 0.0;
    }
    sum_weights / sum_index_weight
}

fn similarity(displacement: f64, stop_variance: f64) -> f64 {
    if stop_variance == 0.0 {
        return 0.0;
    }
    kernel(displacement / stop_variance)
}

/// Labels points whose probability is at least `min_stop_probability` as stops
///
/// # Errors
///
/// - [`Error::SizeMismatch`] unless there is one probability per point
/// - [`Error::InvalidParameter`] if `min_stop_probability` is outside `[0, 1]`
pub fn to_stop_trajectory(
    traj: &Trajectory,
    probabilities: &[f64],
    min_stop_probability: f64,
) -> Result<StopTrajectory> {
    check_probability(min_stop_probability)?;
    if probabilities.len() != traj.len() {
        return Err(Error::SizeMismatch {
            expected: traj.len(),
            actual: probabilities.len(),
        });
    }

    let mut output = StopTrajectory::all_moving(traj);
    for (i, &pr) in probabilities.iter().enumerate() {
        output.set_stopped(i, pr >= min_stop_probability);
    }
    Ok(output)
}

fn check_probability(pr: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&pr) {
        return Err(Error::invalid(
            "min_stop_probability",
            pr,
            "must be between 0 and 1",
        ));
    }
    Ok(())
}

/// Estimates the displacement between consecutive points of a true stop,
/// assuming stop displacements lie in `(0, 20]`
pub fn estimate_stop_variance(traj: &Trajectory) -> Result<f64> {
    estimate_stop_variance_within(traj, DEFAULT_MAX_STOP_VARIANCE)
}

/// Estimates the stop variance as the knee of the sorted consecutive
/// displacements lying in `(0, max_stop_variance]`
///
/// # Errors
///
/// - [`Error::TooShort`] for trajectories of fewer than two points
/// - [`Error::Degenerate`] if no displacement lies in range
pub fn estimate_stop_variance_within(traj: &Trajectory, max_stop_variance: f64) -> Result<f64> {
    if max_stop_variance.is_nan() || max_stop_variance <= 0.0 {
        return Err(Error::invalid(
            "max_stop_variance",
            max_stop_variance,
            "must be greater than zero",
        ));
    }
    ensure_len(traj.len(), 2)?;

    let displacements: Vec<f64> = (1..traj.len())
        .map(|i| traj.distance(i - 1, i))
        .filter(|&d| d > 0.0 && d <= max_stop_variance)
        .collect();
    if displacements.is_empty() {
        return Err(Error::Degenerate(format!(
            "no displacement in (0, {max_stop_variance}] to estimate a stop variance from"
        )));
    }

    let stop_variance = kneedle::detect_all(&displacements)?;
    debug!(
        candidates = displacements.len(),
        stop_variance, "estimated stop variance"
    );
    Ok(stop_variance)
}

/// Estimates the search radius as half the mean length of the runs of
/// consecutive points whose displacement stays within `stop_variance`
///
/// Returns at least one; one when there is no such run.
pub fn estimate_search_radius(traj: &Trajectory, stop_variance: f64) -> Result<usize> {
    if stop_variance.is_nan() || stop_variance < 0.0 {
        return Err(Error::invalid(
            "stop_variance",
            stop_variance,
            "must be a non-negative distance",
        ));
    }
    ensure_len(traj.len(), 2)?;

    let mut chunk_sizes = Vec::new();
    let mut cur_chunk = 1usize;
    for i in 1..traj.len() {
        if traj.distance(i - 1, i) <= stop_variance {
            cur_chunk += 1;
        } else {
            if cur_chunk > 1 {
                chunk_sizes.push(cur_chunk as f64);
            }
            cur_chunk = 1;
        }
    }
    if cur_chunk > 1 {
        chunk_sizes.push(cur_chunk as f64);
    }

    let radius = match maths::mean(&chunk_sizes) {
        Some(mean) => ((mean * 0.5).round() as usize).max(1),
        None => 1,
    };
    debug!(chunks = chunk_sizes.len(), radius, "estimated search radius");
    Ok(radius)
}

/// Estimates the probability threshold separating stops from moves
///
/// The probabilities are split into two k-means clusters; the threshold is
/// halfway between the top of the lower cluster and the bottom of the upper.
///
/// # Errors
///
/// [`Error::InvalidParameter`] if there are fewer than two distinct probabilities
pub fn estimate_min_stop_pr(probabilities: &[f64]) -> Result<f64> {
    let clusters = kmeans::cluster(probabilities, 2)?;
    let lower_max = clusters[0].max();
    let upper_min = clusters[1].min();
    Ok(lower_max + (upper_min - lower_max) * 0.5)
}
