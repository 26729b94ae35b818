//! Accuracy of a stop/move labelling measured against ground truth, STOP
//! being the positive class

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::trajectory::StopTrajectory;

/// Confusion tallies of one [`evaluate`] call and the rates derived from them
///
/// Ratios with a zero denominator are reported as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassificationStats {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    /// Points the computed labelling calls stops
    pub n_stops: usize,
    /// Points the computed labelling calls moves
    pub n_moves: usize,

    pub precision: f64,
    pub true_positive_rate: f64,
    pub true_negative_rate: f64,
    pub false_positive_rate: f64,
    pub false_negative_rate: f64,
    pub accuracy: f64,
    pub f_score: f64,
    /// Matthews correlation coefficient
    pub mcc: f64,
    pub informedness: f64,
}

/// Compares `computed` labels against `truth` point by point
///
/// # Errors
///
/// [`Error::SizeMismatch`] if the two labellings differ in length
pub fn evaluate(truth: &StopTrajectory, computed: &StopTrajectory) -> Result<ClassificationStats> {
    if truth.len() != computed.len() {
        return Err(Error::SizeMismatch {
            expected: truth.len(),
            actual: computed.len(),
        });
    }

    let mut stats = ClassificationStats::default();
    for (truth_stopped, computed_stopped) in truth.labels().zip(computed.labels()) {
        if computed_stopped {
            stats.n_stops += 1;
        } else {
            stats.n_moves += 1;
        }
        match (computed_stopped, truth_stopped) {
            (true, true) => stats.true_positive += 1,
            (false, false) => stats.true_negative += 1,
            (true, false) => stats.false_positive += 1,
            (false, true) => stats.false_negative += 1,
        }
    }
    stats.derive_rates();

    debug!(
        tp = stats.true_positive,
        tn = stats.true_negative,
        fp = stats.false_positive,
        fn_ = stats.false_negative,
        "evaluated classification"
    );
    Ok(stats)
}

impl ClassificationStats {
    fn derive_rates(&mut self) {
        let tp = self.true_positive as f64;
        let tn = self.true_negative as f64;
        let fp = self.false_positive as f64;
        let fn_ = self.false_negative as f64;

        self.precision = ratio(tp, tp + fp);
        self.true_positive_rate = ratio(tp, tp + fn_);
        self.true_negative_rate = ratio(tn, tn + fp);
        self.false_positive_rate = ratio(fp, fp + tn);
        self.false_negative_rate = ratio(fn_, tp + fn_);
        self.accuracy = ratio(tp + tn, tp + tn + fp + fn_);
        self.f_score = ratio(
            2.0 * self.precision * self.true_positive_rate,
            self.precision + self.true_positive_rate,
        );

        let mcc = ratio(
            tp * tn - fp * fn_,
            ((tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_)).sqrt(),
        );
        self.mcc = if mcc.is_nan() { 0.0 } else { mcc };
        self.informedness = self.true_positive_rate + self.true_negative_rate - 1.0;
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

impl fmt::Display for ClassificationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "True positive: {}", self.true_positive)?;
        writeln!(f, "True negative: {}", self.true_negative)?;
        writeln!(f, "False positive: {}", self.false_positive)?;
        writeln!(f, "False negative: {}", self.false_negative)?;
        writeln!(f, "Precision: {:.4}", self.precision)?;
        writeln!(f, "True positive rate: {:.4}", self.true_positive_rate)?;
        writeln!(f, "True negative rate: {:.4}", self.true_negative_rate)?;
        writeln!(f, "False positive rate: {:.4}", self.false_positive_rate)?;
        writeln!(f, "False negative rate: {:.4}", self.false_negative_rate)?;
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f, "F-score: {:.4}", self.f_score)?;
        writeln!(f, "MCC: {:.4}", self.mcc)?;
        writeln!(f, "Informedness: {:.4}", self.informedness)?;
        writeln!(f, "# stops: {}", self.n_stops)?;
        write!(f, "# moves: {}", self.n_moves)
    }
}
