//! Package numeric implements the dependency-free numeric primitives used for
//! parameter estimation: univariate k-means, Kneedle and a few statistics helpers
pub mod kmeans;
pub mod kneedle;
pub mod maths;

#[cfg(test)]
mod maths_test;

pub use kmeans::{Cluster, cluster};
pub use kneedle::{detect, detect_all};
