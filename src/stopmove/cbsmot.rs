use bitvec::prelude::*;
use tracing::debug;

use crate::error::{Error, Result, ensure_len};
use crate::trajectory::{StopTrajectory, Trajectory};

// CB-SMoT, after "A Clustering-based Approach for Discovering Interesting
// Places in Trajectories" (Palma et al.), unknown stops only:
//
// CBSMoT(T, eps, minTime)
//    for each unprocessed index P of T, slowest first
//       [L, R] = neighbourhood(P, eps)
//       if L == R, skip P
//       repeat
//          L = left end of neighbourhood(L, eps)
//          R = right end of neighbourhood(R, eps)
//       until neither L nor R moved
//       if time(R) - time(L) >= minTime
//          mark [L, R] as stops and as processed
//
// neighbourhood(P, eps)
//    walk left and right from P while the summed step distances stay <= eps

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Classifies each point of `traj` as a stop or a move
///
/// A point is a stop when it belongs to a "linear neighbourhood" (points
/// reachable along the trajectory within `eps` of accumulated distance) that
/// lasts at least `min_duration_millis`.
///
/// # Arguments
///
/// * `traj` - Trajectory to classify, at least two points
/// * `eps` - Distance budget of a neighbourhood, in trajectory units
/// * `min_duration_millis` - Minimum duration of a stop
///
/// # Returns
///
/// A stop trajectory of the same length; points outside every qualifying
/// neighbourhood are moves
pub fn classify(traj: &Trajectory, eps: f64, min_duration_millis: i64) -> Result<StopTrajectory> {
    if !eps.is_finite() || eps < 0.0 {
        return Err(Error::invalid("eps", eps, "must be a non-negative distance"));
    }
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
        eps, min_duration_millis, "running CB-SMoT"
    );

    let mut output = StopTrajectory::all_moving(traj);
    let mut processed = bitvec![0; traj.len()];

    for idx in indices_by_speed(traj) {
        if processed[idx] {
            continue;
        }

        let (mut left, mut right) = (
            expand(traj, idx, eps, Side::Left),
            expand(traj, idx, eps, Side::Right),
        );
        if left == right {
            continue;
        }

        // grow at the extremes, each side with a fresh budget
        let (mut grow_left, mut grow_right) = (true, true);
        while grow_left || grow_right {
            if grow_left {
                let next = expand(traj, left, eps, Side::Left);
                grow_left = next != left;
                left = next;
            }
            if grow_right {
                let next = expand(traj, right, eps, Side::Right);
                grow_right = next != right;
                right = next;
            }
        }

        if traj.elapsed_millis(left, right) >= min_duration_millis {
            for i in left..=right {
                processed.set(i, true);
                output.set_stopped(i, true);
            }
        }
    }

    debug!(stops = output.n_stops(), "CB-SMoT done");
    Ok(output)
}

/// Walks from `idx` towards `side` while the summed distance stays within
/// `eps`, returning the last index reached
fn expand(traj: &Trajectory, idx: usize, eps: f64, side: Side) -> usize {
    let last = traj.len() - 1;
    let mut cur = idx;
    let mut total = 0.0;

    loop {
        let next = match side {
            Side::Left if cur > 0 => cur - 1,
            Side::Right if cur < last => cur + 1,
            _ => return cur,
        };
        total += traj.distance(cur, next);
        if total.is_nan() || total > eps {
            return cur;
        }
        cur = next;
    }
}

/// Point indices sorted by instantaneous speed, slowest first
///
/// Speed of the first point is zero. The sort is stable, so equal speeds keep
/// index order.
fn indices_by_speed(traj: &Trajectory) -> Vec<usize> {
    let speeds: Vec<f64> = (0..traj.len()).map(|i| speed(traj, i)).collect();
    let mut indices: Vec<usize> = (0..traj.len()).collect();
    indices.sort_by(|&a, &b| speeds[a].total_cmp(&speeds[b]));
    indices
}

/// Distance per millisecond from the previous point
fn speed(traj: &Trajectory, i: usize) -> f64 {
    if i == 0 {
        return 0.0;
    }
    let dist = traj.distance(i - 1, i);
    dist / traj.elapsed_millis(i - 1, i) as f64
}
