use tracing::trace;

use super::maths;
use crate::error::{Error, Result};

// Lloyd's algorithm specialised to scalars
// (from <https://en.wikipedia.org/wiki/K-means_clustering#Standard_algorithm>):
//
// kMeans(D, k)
//    split D by position into k contiguous partitions, centroid = mean
//    repeat
//       for each cluster C, for each value v in C
//          if the centroid of another cluster C' is strictly closer to v
//             move v to the closest such C'
//       if anything moved, recompute every centroid
//    until a pass moves nothing

/// Cluster represents one group found by [`cluster`]
#[derive(Debug, Clone, Default)]
pub struct Cluster {
    values: Vec<f64>,
    centroid: f64,
}

impl Cluster {
    fn update(&mut self) {
        self.centroid = maths::mean(&self.values).unwrap_or(f64::NAN);
    }

    fn check_non_empty(&self) {
        if self.values.is_empty() {
            panic!("empty cluster");
        }
    }

    /// Values assigned to this cluster, in no particular order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Centroid of the cluster
    ///
    /// # Panics
    ///
    /// Panics if the cluster is empty
    pub fn mean(&self) -> f64 {
        self.check_non_empty();
        self.centroid
    }

    /// Population standard deviation of the cluster values
    ///
    /// # Panics
    ///
    /// Panics if the cluster is empty
    pub fn std(&self) -> f64 {
        self.check_non_empty();
        maths::std_dev(&self.values).unwrap_or(f64::NAN)
    }

    /// # Panics
    ///
    /// Panics if the cluster is empty
    pub fn min(&self) -> f64 {
        self.check_non_empty();
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// # Panics
    ///
    /// Panics if the cluster is empty
    pub fn max(&self) -> f64 {
        self.check_non_empty();
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Clusters scalar values into `k` groups using Lloyd's algorithm
///
/// # Arguments
///
/// * `values` - Values to cluster, in any order
/// * `k` - Number of clusters to find
///
/// # Returns
///
/// `k` non-empty clusters ordered by ascending mean; together they hold
/// every input value exactly once.
///
/// # Errors
///
/// [`Error::InvalidParameter`] if `k` is zero, a value is not finite, or `k`
/// exceeds the number of distinct values
pub fn cluster(values: &[f64], k: usize) -> Result<Vec<Cluster>> {
    if k == 0 {
        return Err(Error::invalid("k", k, "at least one cluster is required"));
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(Error::invalid("values", v, "all values must be finite"));
    }
    let distinct = count_distinct(values);
    if k > distinct {
        return Err(Error::invalid(
            "k",
            k,
            format!("only {distinct} distinct values to cluster"),
        ));
    }

    let n = values.len();
    let mut clusters = vec![Cluster::default(); k];
    for (i, &v) in values.iter().enumerate() {
        clusters[i * k / n].values.push(v);
    }
    for c in clusters.iter_mut() {
        c.update();
    }

    let mut passes = 0;
    loop {
        passes += 1;
        let mut reassigned = false;
        for i in 0..k {
            if reassign(&mut clusters, i) {
                reassigned = true;
            }
        }
        if !reassigned {
            break;
        }
        for c in clusters.iter_mut() {
            c.update();
        }
    }
    trace!(n, k, passes, "k-means converged");

    clusters.sort_by(|a, b| a.centroid.total_cmp(&b.centroid));
    Ok(clusters)
}

/// Moves every value of `clusters[idx]` that is strictly closer to another
/// centroid into the closest such cluster. The last value of a cluster stays.
///
/// Returns true if any value moved
fn reassign(clusters: &mut [Cluster], idx: usize) -> bool {
    let centroids: Vec<f64> = clusters.iter().map(|c| c.centroid).collect();
    let own = centroids[idx];
    let values = std::mem::take(&mut clusters[idx].values);
    let n_values = values.len();

    let mut kept = Vec::with_capacity(n_values);
    let mut moved = false;
    for (pos, value) in values.into_iter().enumerate() {
        let mut best_dist = (own - value).abs();
        let mut better = None;
        for (j, &centroid) in centroids.iter().enumerate() {
            if j == idx {
                continue;
            }
            let dist = (centroid - value).abs();
            if dist < best_dist {
                best_dist = dist;
                better = Some(j);
            }
        }

        // values still to be seen in this cluster, current one excluded
        let remaining = n_values - pos - 1;
        match better {
            Some(j) if kept.len() + remaining > 0 => {
                clusters[j].values.push(value);
                moved = true;
            }
            _ => kept.push(value),
        }
    }
    clusters[idx].values = kept;
    moved
}

fn count_distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}
