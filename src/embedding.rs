//! Element embedding store
//!
//! An [`EmbeddingStore`] owns one vector per element, all of the same
//! dimension. Stores are immutable once built: [`EmbeddingStore::without`]
//! returns a fresh store and leaves the original untouched, so compositions
//! and pair tables can share a store freely.

pub mod export;
pub mod metric;
pub mod pairs;
pub mod preset;

use crate::error::{EmbeddingError, Result};
use crate::periodic::{ElementGroup, MendeleevTable};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

pub use metric::Metric;
pub use pairs::{CorrelationRow, CorrelationTable, PairRow, PairTable, PivotTable, RankedElement};
pub use preset::{DirectoryPresets, InMemoryPresets, PresetResolver, PresetVectors};

/// Validated mapping of element symbols to fixed-length vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingStore {
    name: String,
    elements: Vec<String>,
    vectors: HashMap<String, Vec<f64>>,
    dim: usize,
    citation: Vec<String>,
}

impl EmbeddingStore {
    /// Build a store from `(element, vector)` pairs.
    ///
    /// The element order of `entries` becomes the store's element list. Every
    /// vector must have the length of the first one, and no element may appear
    /// twice. An empty input produces an empty store with `dim == 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use element_embeddings::EmbeddingStore;
    ///
    /// let store = EmbeddingStore::from_vectors(
    ///     "toy",
    ///     vec![("H", vec![1.0, 0.0]), ("O", vec![0.0, 1.0])],
    /// )
    /// .unwrap();
    /// assert_eq!(store.dim(), 2);
    /// assert_eq!(store.element_list(), ["H", "O"]);
    ///
    /// let bad = EmbeddingStore::from_vectors("bad", vec![("H", vec![1.0]), ("O", vec![0.0, 1.0])]);
    /// assert!(bad.is_err());
    /// ```
    pub fn from_vectors<I, S>(name: impl Into<String>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let name = name.into();
        let mut elements = Vec::new();
        let mut vectors = HashMap::new();
        let mut dim = None;

        for (element, vector) in entries {
            let element = element.into();
            let expected = *dim.get_or_insert(vector.len());
            if vector.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    element,
                    expected,
                    found: vector.len(),
                });
            }
            if vectors.contains_key(&element) {
                return Err(EmbeddingError::DuplicateElement(element));
            }
            elements.push(element.clone());
            vectors.insert(element, vector);
        }

        let dim = dim.unwrap_or(0);
        debug!(name = %name, elements = elements.len(), dim, "built embedding store");

        Ok(Self {
            name,
            elements,
            vectors,
            dim,
            citation: Vec::new(),
        })
    }

    /// Load a named preset through `resolver`, carrying its citation along.
    pub fn load(name: &str, resolver: &dyn PresetResolver) -> Result<Self> {
        let entries = resolver.resolve(name)?;
        Ok(Self::from_vectors(name, entries)?.with_citation(resolver.citation(name)))
    }

    /// Replace the references to cite when using this store.
    pub fn with_citation<S: Into<String>>(mut self, citation: impl IntoIterator<Item = S>) -> Self {
        self.citation = citation.into_iter().map(Into::into).collect();
        self
    }

    /// References for the embedding this store holds; empty when unknown.
    pub fn citation(&self) -> &[String] {
        &self.citation
    }

    /// Name of the preset or mapping this store was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length shared by every vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in the order they were supplied.
    pub fn element_list(&self) -> &[String] {
        &self.elements
    }

    pub fn contains(&self, element: &str) -> bool {
        self.vectors.contains_key(element)
    }

    /// Vector for `element`.
    pub fn vector(&self, element: &str) -> Result<&[f64]> {
        self.vectors
            .get(element)
            .map(Vec::as_slice)
            .ok_or_else(|| EmbeddingError::UnknownElement(element.to_string()))
    }

    /// New store without the given elements.
    ///
    /// Fails with [`EmbeddingError::UnknownElement`] if any of them is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use element_embeddings::EmbeddingStore;
    ///
    /// let store = EmbeddingStore::from_vectors(
    ///     "toy",
    ///     vec![("H", vec![1.0]), ("He", vec![2.0]), ("Li", vec![3.0])],
    /// )
    /// .unwrap();
    /// let smaller = store.without(["H"]).unwrap();
    /// assert_eq!(smaller.element_list(), ["He", "Li"]);
    /// assert_eq!(store.len(), 3);
    /// ```
    pub fn without<I, S>(&self, elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = HashSet::new();
        for element in elements {
            let element = element.as_ref();
            if !self.contains(element) {
                return Err(EmbeddingError::UnknownElement(element.to_string()));
            }
            removed.insert(element.to_string());
        }

        let elements: Vec<String> = self
            .elements
            .iter()
            .filter(|e| !removed.contains(*e))
            .cloned()
            .collect();
        let vectors = elements
            .iter()
            .map(|e| (e.clone(), self.vectors[e].clone()))
            .collect();

        debug!(name = %self.name, removed = removed.len(), remaining = elements.len(), "derived embedding store");

        Ok(Self {
            name: self.name.clone(),
            elements,
            vectors,
            dim: self.dim,
            citation: self.citation.clone(),
        })
    }

    /// Distance between two elements under a norm-based metric.
    ///
    /// [`Metric::Pearson`] is a correlation, not a distance, and is rejected
    /// with [`EmbeddingError::UnsupportedMetric`].
    pub fn distance(&self, a: &str, b: &str, metric: Metric) -> Result<f64> {
        if !metric.is_distance() {
            return Err(EmbeddingError::UnsupportedMetric(metric.name().to_string()));
        }
        self.metric_value(a, b, metric)
    }

    /// [`distance`](Self::distance) with the metric given by name.
    pub fn distance_by_name(&self, a: &str, b: &str, metric: &str) -> Result<f64> {
        self.distance(a, b, metric.parse()?)
    }

    /// Pearson correlation between two elements' vectors.
    pub fn correlation(&self, a: &str, b: &str) -> Result<f64> {
        self.metric_value(a, b, Metric::Pearson)
    }

    /// Value of any supported metric for the pair `(a, b)`.
    pub fn metric_value(&self, a: &str, b: &str, metric: Metric) -> Result<f64> {
        let va = self.vector(a)?;
        let vb = self.vector(b)?;
        Ok(metric.compute(va, vb))
    }

    /// Chemical category of every element in the store.
    pub fn element_groups(&self, table: &MendeleevTable) -> Result<BTreeMap<String, ElementGroup>> {
        self.elements
            .iter()
            .map(|e| {
                table
                    .group(e)
                    .map(|g| (e.clone(), g))
                    .ok_or_else(|| EmbeddingError::UnknownElement(e.clone()))
            })
            .collect()
    }
}
