//! Descriptive statistics of a stop/move labelled trajectory

use std::fmt;

use crate::error::{Result, ensure_len};
use crate::numeric::maths;
use crate::trajectory::StopTrajectory;

/// Label counts, episode counts and sampling intervals of one trajectory
///
/// An episode is a maximal run of consecutive points sharing a label.
/// Durations and intervals are whole seconds, truncated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryStats {
    pub n_stops: usize,
    pub n_moves: usize,
    pub n_stop_episodes: usize,
    pub n_move_episodes: usize,
    pub duration_seconds: i64,
    pub min_interval_seconds: i64,
    pub max_interval_seconds: i64,
    /// Most common interval, the shortest one on ties
    pub modal_interval_seconds: i64,
    pub mean_interval_seconds: f64,
}

impl TrajectoryStats {
    /// # Errors
    ///
    /// [`crate::Error::TooShort`] for trajectories of fewer than two points
    pub fn compute(traj: &StopTrajectory) -> Result<Self> {
        ensure_len(traj.len(), 2)?;

        let mut n_stops = 0;
        let mut n_stop_episodes = 0;
        let mut n_move_episodes = 0;
        let mut previous = None;
        for stopped in traj.labels() {
            if stopped {
                n_stops += 1;
            }
            if previous != Some(stopped) {
                if stopped {
                    n_stop_episodes += 1;
                } else {
                    n_move_episodes += 1;
                }
            }
            previous = Some(stopped);
        }

        let points = traj.trajectory();
        let intervals: Vec<i64> = (1..points.len())
            .map(|i| points.elapsed_millis(i - 1, i) / 1000)
            .collect();
        let as_f64: Vec<f64> = intervals.iter().map(|&s| s as f64).collect();

        Ok(TrajectoryStats {
            n_stops,
            n_moves: traj.len() - n_stops,
            n_stop_episodes,
            n_move_episodes,
            duration_seconds: points.elapsed_millis(0, points.len() - 1) / 1000,
            min_interval_seconds: intervals.iter().copied().min().unwrap_or_default(),
            max_interval_seconds: intervals.iter().copied().max().unwrap_or_default(),
            modal_interval_seconds: maths::mode(&intervals).unwrap_or_default(),
            mean_interval_seconds: maths::mean(&as_f64).unwrap_or_default(),
        })
    }

    /// `(label, value)` pairs in report order
    pub fn as_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Stops", self.n_stops.to_string()),
            ("Moves", self.n_moves.to_string()),
            ("Stop episodes", self.n_stop_episodes.to_string()),
            ("Move episodes", self.n_move_episodes.to_string()),
            ("Trajectory duration(s)", self.duration_seconds.to_string()),
            (
                "Minimum recording interval(s)",
                self.min_interval_seconds.to_string(),
            ),
            (
                "Maximum recording interval(s)",
                self.max_interval_seconds.to_string(),
            ),
            (
                "Modal recording interval(s)",
                self.modal_interval_seconds.to_string(),
            ),
            (
                "Mean recording interval(s)",
                format!("{:.2}", self.mean_interval_seconds),
            ),
        ]
    }
}

impl fmt::Display for TrajectoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.as_rows();
        let last = rows.len() - 1;
        for (i, (label, value)) in rows.iter().enumerate() {
            write!(f, "{label}: {value}")?;
            if i < last {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
