//! Batch featurisation
//!
//! Turns a list of formulas into a list of feature vectors against one
//! store. Per-formula failures are either collected next to the successful
//! rows or, in strict mode, returned as the batch error.

use crate::composition::Composition;
use crate::embedding::EmbeddingStore;
use crate::error::{EmbeddingError, Result};
use crate::pooling::PoolingStat;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How a batch reacts to failures and whether it may fan out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Abort on the first failing formula instead of collecting failures.
    pub strict: bool,
    /// Spread formulas over the rayon pool when the `parallel` feature is on.
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            strict: false,
            parallel: true,
        }
    }
}

impl BatchOptions {
    /// Fail the whole batch on the first bad formula.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Process formulas one after another on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}

/// Feature vector of one formula, tagged with its input position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub index: usize,
    pub formula: String,
    pub features: Vec<f64>,
}

/// A formula that could not be featurised.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchFailure {
    pub index: usize,
    pub formula: String,
    pub error: EmbeddingError,
}

impl BatchFailure {
    /// Stable name of the underlying error kind.
    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

/// Outcome of a non-strict batch: successes and failures, each in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchResult {
    pub rows: Vec<FeatureRow>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    /// Number of formulas the batch was given.
    pub fn len(&self) -> usize {
        self.rows.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// One slot per input formula, `None` where featurisation failed.
    pub fn aligned(&self) -> Vec<Option<Vec<f64>>> {
        let mut slots = vec![None; self.len()];
        for row in &self.rows {
            slots[row.index] = Some(row.features.clone());
        }
        slots
    }
}

/// Feature vector of a single formula.
pub fn featurise_one(formula: &str, store: &EmbeddingStore, stats: &[PoolingStat]) -> Result<Vec<f64>> {
    Composition::new(formula)?.feature_vector(store, stats)
}

/// Featurise every formula in `formulas` against `store`.
///
/// Rows and failures come back in input order whether or not the batch ran
/// in parallel. With `options.strict` the first failure in input order is
/// returned as the error instead.
///
/// # Examples
///
/// ```
/// use element_embeddings::{featurise, BatchOptions, EmbeddingStore, PoolingStat};
///
/// let store = EmbeddingStore::from_vectors(
///     "toy",
///     vec![("Fe", vec![1.0]), ("O", vec![3.0])],
/// )
/// .unwrap();
/// let result = featurise(&["Fe2O3", "FeO", "Fe$"], &store, &[PoolingStat::Mean], &BatchOptions::default()).unwrap();
/// assert_eq!(result.rows.len(), 2);
/// assert_eq!(result.failures[0].index, 2);
/// ```
pub fn featurise<S>(
    formulas: &[S],
    store: &EmbeddingStore,
    stats: &[PoolingStat],
    options: &BatchOptions,
) -> Result<BatchResult>
where
    S: AsRef<str> + Sync,
{
    let outcomes = compute(formulas, store, stats, options.parallel);

    let mut result = BatchResult::default();
    for (index, (formula, outcome)) in formulas.iter().zip(outcomes).enumerate() {
        let formula = formula.as_ref();
        match outcome {
            Ok(features) => result.rows.push(FeatureRow {
                index,
                formula: formula.to_string(),
                features,
            }),
            Err(error) if options.strict => return Err(error),
            Err(error) => {
                warn!(index, formula, kind = error.kind(), %error, "skipping formula");
                result.failures.push(BatchFailure {
                    index,
                    formula: formula.to_string(),
                    error,
                });
            }
        }
    }

    info!(
        store = store.name(),
        rows = result.rows.len(),
        failures = result.failures.len(),
        "featurised batch"
    );
    Ok(result)
}

#[cfg(feature = "parallel")]
fn compute<S>(formulas: &[S], store: &EmbeddingStore, stats: &[PoolingStat], parallel: bool) -> Vec<Result<Vec<f64>>>
where
    S: AsRef<str> + Sync,
{
    if parallel {
        use rayon::prelude::*;
        formulas
            .par_iter()
            .map(|f| featurise_one(f.as_ref(), store, stats))
            .collect()
    } else {
        sequential(formulas, store, stats)
    }
}

#[cfg(not(feature = "parallel"))]
fn compute<S>(formulas: &[S], store: &EmbeddingStore, stats: &[PoolingStat], _parallel: bool) -> Vec<Result<Vec<f64>>>
where
    S: AsRef<str> + Sync,
{
    sequential(formulas, store, stats)
}

fn sequential<S: AsRef<str>>(formulas: &[S], store: &EmbeddingStore, stats: &[PoolingStat]) -> Vec<Result<Vec<f64>>> {
    formulas
        .iter()
        .map(|f| featurise_one(f.as_ref(), store, stats))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EmbeddingStore {
        EmbeddingStore::from_vectors(
            "toy",
            vec![("Fe", vec![1.0, 2.0]), ("O", vec![3.0, 4.0]), ("Li", vec![0.5, 0.5])],
        )
        .unwrap()
    }

    #[test]
    fn test_rows_in_input_order() {
        let formulas = ["Fe2O3", "Li2O", "FeO"];
        for options in [BatchOptions::default(), BatchOptions::sequential()] {
            let result = featurise(&formulas, &store(), &[PoolingStat::Mean], &options).unwrap();
            assert!(result.is_complete());
            let order: Vec<_> = result.rows.iter().map(|r| r.formula.as_str()).collect();
            assert_eq!(order, formulas);
            assert_eq!(result.rows[2].features, vec![2.0, 3.0]);
        }
    }

    #[test]
    fn test_failures_are_collected() {
        let formulas = vec!["Fe2O3".to_string(), "FeS".to_string(), "Li2O".to_string()];
        let result = featurise(&formulas, &store(), &[PoolingStat::Sum], &BatchOptions::default()).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].index, 1);
        assert_eq!(result.failures[0].kind(), "unknown_element");

        let aligned = result.aligned();
        assert!(aligned[0].is_some());
        assert!(aligned[1].is_none());
        assert_eq!(aligned[2], Some(vec![4.0, 5.0]));
    }

    #[test]
    fn test_strict_returns_first_failure() {
        let formulas = ["Fe2O3", "Fe(O", "FeS"];
        let err = featurise(&formulas, &store(), &[PoolingStat::Mean], &BatchOptions::strict()).unwrap_err();
        assert_eq!(err.kind(), "formula_parse");
    }

    #[test]
    fn test_empty_batch() {
        let formulas: [&str; 0] = [];
        let result = featurise(&formulas, &store(), &[PoolingStat::Mean], &BatchOptions::default()).unwrap();
        assert!(result.is_empty());
        assert!(result.aligned().is_empty());
    }

    #[test]
    fn test_featurise_one() {
        assert_eq!(
            featurise_one("", &store(), &[PoolingStat::Mean]),
            Err(EmbeddingError::EmptyComposition)
        );
        assert_eq!(featurise_one("Li", &store(), &[PoolingStat::MaxPool]).unwrap(), vec![0.5, 0.5]);
    }
}
