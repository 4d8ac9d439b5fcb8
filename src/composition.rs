//! Compositions: parsed counts, fractional abundances and atom totals

use crate::embedding::EmbeddingStore;
use crate::error::{EmbeddingError, Result};
use crate::formula::{atom_count, parse_formula, ElementCounts};
use crate::pooling::{feature_vector, PoolingStat};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that fractions sum to one.
pub const FRACTION_TOLERANCE: f64 = 1e-9;

/// Convert element counts into fractional abundances.
///
/// Every value becomes `count / total`. Fails with
/// [`EmbeddingError::EmptyComposition`] when `counts` is empty or sums to zero.
///
/// # Examples
///
/// ```
/// use element_embeddings::composition::fractional_composition;
/// use element_embeddings::formula::parse_formula;
///
/// let fractions = fractional_composition(&parse_formula("CsPbI3").unwrap()).unwrap();
/// assert!((fractions["I"] - 0.6).abs() < 1e-12);
/// ```
pub fn fractional_composition(counts: &ElementCounts) -> Result<ElementCounts> {
    let total = atom_count(counts);
    if counts.is_empty() || total == 0.0 {
        return Err(EmbeddingError::EmptyComposition);
    }

    Ok(counts
        .iter()
        .map(|(element, count)| (element.clone(), count / total))
        .collect())
}

/// A parsed formula with its raw and fractional composition.
///
/// Owns no vectors; feature vectors are computed against a borrowed
/// [`EmbeddingStore`].
///
/// Deserialization reads only `formula` and `counts` and rebuilds the rest
/// through [`Composition::from_counts`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComposition")]
pub struct Composition {
    formula: String,
    counts: ElementCounts,
    fractions: ElementCounts,
    natoms: f64,
}

/// Serialized form accepted on input.
#[derive(Deserialize)]
struct RawComposition {
    formula: String,
    counts: ElementCounts,
}

impl TryFrom<RawComposition> for Composition {
    type Error = EmbeddingError;

    fn try_from(raw: RawComposition) -> Result<Self> {
        Self::from_counts(&raw.formula, raw.counts)
    }
}

impl Composition {
    /// Parse and normalise a formula.
    ///
    /// # Examples
    ///
    /// ```
    /// use element_embeddings::Composition;
    ///
    /// let fe2o3 = Composition::new("Fe2O3").unwrap();
    /// assert_eq!(fe2o3.natoms(), 5.0);
    /// assert!((fe2o3.fractions()["Fe"] - 0.4).abs() < 1e-12);
    /// ```
    pub fn new(formula: &str) -> Result<Self> {
        let counts = parse_formula(formula)?;
        Self::from_counts(formula, counts)
    }

    /// Build a composition from counts parsed elsewhere.
    ///
    /// Counts must be strictly positive and finite.
    pub fn from_counts(formula: &str, counts: ElementCounts) -> Result<Self> {
        if let Some((element, count)) = counts.iter().find(|(_, c)| !(c.is_finite() && **c > 0.0)) {
            return Err(EmbeddingError::FormulaParse {
                formula: formula.to_string(),
                position: 0,
                reason: format!("count for {element} must be positive, got {count}"),
            });
        }

        let fractions = fractional_composition(&counts)?;
        let natoms = atom_count(&counts);
        Ok(Self {
            formula: formula.to_string(),
            counts,
            fractions,
            natoms,
        })
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Raw element counts.
    pub fn counts(&self) -> &ElementCounts {
        &self.counts
    }

    /// Fractional abundances, summing to one.
    pub fn fractions(&self) -> &ElementCounts {
        &self.fractions
    }

    /// Total number of atoms in one formula unit.
    pub fn natoms(&self) -> f64 {
        self.natoms
    }

    /// Iterate over the elements present, in symbol order.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Pooled feature vector of this composition against `store`.
    pub fn feature_vector(&self, store: &EmbeddingStore, stats: &[PoolingStat]) -> Result<Vec<f64>> {
        feature_vector(self, store, stats)
    }
}
