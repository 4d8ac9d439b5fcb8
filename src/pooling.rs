//! Pooling statistics that turn a composition into one feature vector
//!
//! Each statistic reduces the vectors of the elements present in a
//! composition to a single vector of the store's dimension, coordinate by
//! coordinate. `sum` weights by raw atom counts; every other statistic weights
//! by fractional abundance and is therefore independent of formula scale.
//!
//! | stat | per-coordinate value |
//! |------|----------------------|
//! | `sum` | Σ cᵢ·vᵢ |
//! | `mean` | Σ wᵢ·vᵢ |
//! | `variance` | Σ wᵢ·(vᵢ − mean)² |
//! | `minpool` | min vᵢ |
//! | `maxpool` | max vᵢ |
//! | `range` | maxpool − minpool |
//! | `geometric_mean` | exp(Σ wᵢ·ln vᵢ) |
//! | `harmonic_mean` | 1 / Σ(wᵢ / vᵢ) |

use crate::composition::Composition;
use crate::embedding::EmbeddingStore;
use crate::error::{EmbeddingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A per-coordinate reduction over the elements of a composition.
///
/// Deserializes through [`FromStr`], so configuration files accept the same
/// case-insensitive names and aliases as the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PoolingStat {
    #[serde(rename = "sum")]
    Sum,
    #[serde(rename = "mean")]
    Mean,
    #[serde(rename = "variance")]
    Variance,
    #[serde(rename = "minpool")]
    MinPool,
    #[serde(rename = "maxpool")]
    MaxPool,
    #[serde(rename = "range")]
    Range,
    #[serde(rename = "geometric_mean")]
    GeometricMean,
    #[serde(rename = "harmonic_mean")]
    HarmonicMean,
}

impl PoolingStat {
    /// Every statistic, in the order they are documented.
    pub const ALL: [PoolingStat; 8] = [
        PoolingStat::Sum,
        PoolingStat::Mean,
        PoolingStat::Variance,
        PoolingStat::MinPool,
        PoolingStat::MaxPool,
        PoolingStat::Range,
        PoolingStat::GeometricMean,
        PoolingStat::HarmonicMean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PoolingStat::Sum => "sum",
            PoolingStat::Mean => "mean",
            PoolingStat::Variance => "variance",
            PoolingStat::MinPool => "minpool",
            PoolingStat::MaxPool => "maxpool",
            PoolingStat::Range => "range",
            PoolingStat::GeometricMean => "geometric_mean",
            PoolingStat::HarmonicMean => "harmonic_mean",
        }
    }

    /// Parse a list of statistic names, failing on the first unknown one.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<PoolingStat>> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }

    fn pool(&self, formula: &str, members: &[Member<'_>], dim: usize) -> Result<Vec<f64>> {
        match self {
            PoolingStat::Sum => Ok(weighted_sum(members, dim, |m| m.count)),
            PoolingStat::Mean => Ok(weighted_sum(members, dim, |m| m.weight)),
            PoolingStat::Variance => Ok(variance(members, dim)),
            PoolingStat::MinPool => Ok(fold(members, dim, f64::INFINITY, f64::min)),
            PoolingStat::MaxPool => Ok(fold(members, dim, f64::NEG_INFINITY, f64::max)),
            PoolingStat::Range => {
                let max = fold(members, dim, f64::NEG_INFINITY, f64::max);
                let min = fold(members, dim, f64::INFINITY, f64::min);
                Ok(max.iter().zip(&min).map(|(hi, lo)| hi - lo).collect())
            }
            PoolingStat::GeometricMean => geometric_mean(members, dim),
            PoolingStat::HarmonicMean => harmonic_mean(formula, members, dim),
        }
    }
}

impl fmt::Display for PoolingStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for PoolingStat {
    type Error = EmbeddingError;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

impl FromStr for PoolingStat {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(PoolingStat::Sum),
            "mean" => Ok(PoolingStat::Mean),
            "variance" => Ok(PoolingStat::Variance),
            "minpool" | "min" => Ok(PoolingStat::MinPool),
            "maxpool" | "max" => Ok(PoolingStat::MaxPool),
            "range" => Ok(PoolingStat::Range),
            "geometric_mean" => Ok(PoolingStat::GeometricMean),
            "harmonic_mean" => Ok(PoolingStat::HarmonicMean),
            _ => Err(EmbeddingError::UnknownStat(s.to_string())),
        }
    }
}

/// One element of a composition with its vector and weights.
struct Member<'a> {
    element: &'a str,
    count: f64,
    weight: f64,
    vector: &'a [f64],
}

fn weighted_sum(members: &[Member<'_>], dim: usize, weight: impl Fn(&Member<'_>) -> f64) -> Vec<f64> {
    (0..dim)
        .map(|d| members.iter().map(|m| weight(m) * m.vector[d]).sum())
        .collect()
}

fn variance(members: &[Member<'_>], dim: usize) -> Vec<f64> {
    let mean = weighted_sum(members, dim, |m| m.weight);
    (0..dim)
        .map(|d| {
            members
                .iter()
                .map(|m| m.weight * (m.vector[d] - mean[d]).powi(2))
                .sum()
        })
        .collect()
}

fn fold(members: &[Member<'_>], dim: usize, init: f64, op: fn(f64, f64) -> f64) -> Vec<f64> {
    (0..dim)
        .map(|d| members.iter().map(|m| m.vector[d]).fold(init, op))
        .collect()
}

fn geometric_mean(members: &[Member<'_>], dim: usize) -> Result<Vec<f64>> {
    (0..dim)
        .map(|d| {
            let mut log_sum = 0.0;
            for m in members {
                let value = m.vector[d];
                if value <= 0.0 {
                    return Err(EmbeddingError::NonPositiveValue {
                        element: m.element.to_string(),
                        dimension: d,
                        value,
                    });
                }
                log_sum += m.weight * value.ln();
            }
            Ok(log_sum.exp())
        })
        .collect()
}

/// Reciprocals of mixed-sign values can cancel; a zero sum is reported
/// against the whole formula rather than one element.
fn harmonic_mean(formula: &str, members: &[Member<'_>], dim: usize) -> Result<Vec<f64>> {
    (0..dim)
        .map(|d| {
            let mut reciprocal_sum = 0.0;
            for m in members {
                let value = m.vector[d];
                if value == 0.0 {
                    return Err(EmbeddingError::DivisionByZero {
                        element: m.element.to_string(),
                        dimension: d,
                    });
                }
                reciprocal_sum += m.weight / value;
            }
            if reciprocal_sum == 0.0 {
                return Err(EmbeddingError::DivisionByZero {
                    element: formula.to_string(),
                    dimension: d,
                });
            }
            Ok(1.0 / reciprocal_sum)
        })
        .collect()
}

/// Pool the vectors of `composition`'s elements into one feature vector.
///
/// The result has length `store.dim() * stats.len()`: one block of `dim`
/// values per statistic, in the order given. Fails with
/// [`EmbeddingError::UnknownElement`] if an element is missing from `store`.
///
/// # Examples
///
/// ```
/// use element_embeddings::{Composition, EmbeddingStore, PoolingStat};
///
/// let store = EmbeddingStore::from_vectors(
///     "toy",
///     vec![("Fe", vec![1.0, 2.0]), ("O", vec![3.0, 4.0])],
/// )
/// .unwrap();
/// let fe2o3 = Composition::new("Fe2O3").unwrap();
/// let features = fe2o3
///     .feature_vector(&store, &[PoolingStat::Mean, PoolingStat::Sum])
///     .unwrap();
/// assert_eq!(features.len(), 4);
/// assert!((features[0] - 2.2).abs() < 1e-12);
/// assert_eq!(features[2], 11.0);
/// ```
pub fn feature_vector(
    composition: &Composition,
    store: &EmbeddingStore,
    stats: &[PoolingStat],
) -> Result<Vec<f64>> {
    let members = composition
        .counts()
        .iter()
        .map(|(element, &count)| {
            Ok(Member {
                element,
                count,
                weight: composition
                    .fractions()
                    .get(element)
                    .copied()
                    .ok_or_else(|| EmbeddingError::UnknownElement(element.clone()))?,
                vector: store.vector(element)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let dim = store.dim();
    let mut features = Vec::with_capacity(dim * stats.len());
    for stat in stats {
        features.extend(stat.pool(composition.formula(), &members, dim)?);
    }
    Ok(features)
}

/// [`feature_vector`] with statistics given by name.
pub fn feature_vector_by_name<S: AsRef<str>>(
    composition: &Composition,
    store: &EmbeddingStore,
    stats: &[S],
) -> Result<Vec<f64>> {
    let stats = PoolingStat::parse_list(stats)?;
    feature_vector(composition, store, &stats)
}

/// Column labels matching [`feature_vector`]'s layout, e.g. `mean_0`.
pub fn feature_labels(store: &EmbeddingStore, stats: &[PoolingStat]) -> Vec<String> {
    stats
        .iter()
        .flat_map(|stat| (0..store.dim()).map(move |d| format!("{stat}_{d}")))
        .collect()
}
