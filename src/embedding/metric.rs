//! Distance and correlation metrics between embedding vectors

use crate::error::EmbeddingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar comparison between two element vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// L2 norm of the difference.
    Euclidean,
    /// L1 norm of the difference.
    Manhattan,
    /// L∞ norm of the difference.
    Chebyshev,
    /// Pearson correlation coefficient across dimensions.
    Pearson,
}

impl Metric {
    /// The three distance metrics, in their canonical order.
    pub const DISTANCES: [Metric; 3] = [Metric::Euclidean, Metric::Manhattan, Metric::Chebyshev];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Manhattan => "manhattan",
            Metric::Chebyshev => "chebyshev",
            Metric::Pearson => "pearson",
        }
    }

    /// True for the norm-based metrics, false for correlation.
    pub fn is_distance(&self) -> bool {
        !matches!(self, Metric::Pearson)
    }

    /// Apply the metric to two equal-length vectors.
    pub fn compute(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Metric::Euclidean => euclidean(a, b),
            Metric::Manhattan => manhattan(a, b),
            Metric::Chebyshev => chebyshev(a, b),
            Metric::Pearson => pearson(a, b),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "manhattan" => Ok(Metric::Manhattan),
            "chebyshev" => Ok(Metric::Chebyshev),
            "pearson" => Ok(Metric::Pearson),
            _ => Err(EmbeddingError::UnsupportedMetric(s.to_string())),
        }
    }
}

/// sqrt(Σ (aᵢ − bᵢ)²)
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Σ |aᵢ − bᵢ|
pub fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// max |aᵢ − bᵢ|
pub fn chebyshev(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Pearson correlation of two vectors treated as paired samples.
///
/// Identical vectors correlate at exactly 1.0. Otherwise, if either vector
/// has zero variance the coefficient is undefined and 0.0 is returned.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    if a == b && !a.is_empty() {
        return 1.0;
    }

    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }

    let mean_a = a[..n].iter().sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a[..n].iter().zip(&b[..n]) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (cov / denom).clamp(-1.0, 1.0)
}
