//! Knee/elbow detection in the spirit of "Finding a Kneedle in a Haystack:
//! Detecting Knee Points in System Behavior" (Satopaa et al.)
//!
//! The signal is sorted, min-max normalised and has its normalised rank
//! subtracted, which turns the knee into the extremum of a 2-D curve. The
//! knee is the curve point farthest from the chord joining its endpoints.

use crate::error::{Error, Result};

/// Finds the knee of the values lying in `[lo, hi]`
///
/// # Returns
///
/// The original (pre-normalisation) value at the knee
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if a bound is NaN or `lo > hi`
/// - [`Error::Degenerate`] if no value lies in range
pub fn detect(values: &[f64], lo: f64, hi: f64) -> Result<f64> {
    if lo.is_nan() || hi.is_nan() || lo > hi {
        return Err(Error::invalid(
            "range",
            format!("[{lo}, {hi}]"),
            "bounds must be ordered numbers",
        ));
    }

    let mut signal: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| (lo..=hi).contains(v))
        .collect();
    if signal.is_empty() {
        return Err(Error::Degenerate(format!(
            "no values in [{lo}, {hi}] to find a knee in"
        )));
    }
    signal.sort_by(f64::total_cmp);

    let idx = knee_index(&normalise(&signal));
    Ok(signal[idx])
}

/// Finds the knee of all values, see [`detect`]
pub fn detect_all(values: &[f64]) -> Result<f64> {
    detect(values, f64::NEG_INFINITY, f64::INFINITY)
}

/// Turns a sorted signal into the curve `(i / n, norm(v_i) - i / n)`
fn normalise(sorted: &[f64]) -> Vec<[f64; 2]> {
    let n = sorted.len() as f64;
    let min = sorted[0];
    let range = sorted[sorted.len() - 1] - min;

    sorted
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = i as f64 / n;
            let y = if range > 0.0 { (v - min) / range } else { 0.0 };
            [x, y - x]
        })
        .collect()
}

/// Index of the point with the greatest perpendicular distance to the chord
/// between the first and last points; first one wins on ties
fn knee_index(curve: &[[f64; 2]]) -> usize {
    let first = curve[0];
    let last = curve[curve.len() - 1];
    let dir = [last[0] - first[0], last[1] - first[1]];
    let dir_len_sq = dir[0] * dir[0] + dir[1] * dir[1];
    if dir_len_sq == 0.0 {
        return 0;
    }

    let mut best_idx = 0;
    let mut best_dist = 0.0;
    for (i, p) in curve.iter().enumerate() {
        let rel = [p[0] - first[0], p[1] - first[1]];
        let t = (rel[0] * dir[0] + rel[1] * dir[1]) / dir_len_sq;
        let proj = [first[0] + t * dir[0], first[1] + t * dir[1]];
        let dx = p[0] - proj[0];
        let dy = p[1] - proj[1];
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }
    best_idx
}
