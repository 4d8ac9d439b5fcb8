//! element-embeddings - Compositional Featurisation
//! 
//! Copyright (c) 2025 Element Embeddings Contributors
//! Licensed under MIT License
//! 
//! Represents chemical elements as fixed-length vectors and builds feature
//! vectors for compositions by pooling the vectors of their elements.
//!
//! The pipeline runs in four steps:
//! - [`formula`] parses a formula such as `Ca3(PO4)2` into element counts
//! - [`composition`] normalises the counts to fractional abundances
//! - [`embedding`] holds the per-element vectors and pairwise metrics
//! - [`pooling`] and [`featurise`] reduce compositions to feature vectors
//!
//! ```
//! use element_embeddings::{Composition, EmbeddingStore, PoolingStat};
//!
//! let store = EmbeddingStore::from_vectors(
//!     "toy",
//!     vec![("Li", vec![1.0, 0.0]), ("O", vec![0.0, 1.0])],
//! )
//! .unwrap();
//! let li2o = Composition::new("Li2O").unwrap();
//! let features = li2o.feature_vector(&store, &[PoolingStat::Mean]).unwrap();
//! assert!((features[0] - 2.0 / 3.0).abs() < 1e-12);
//! ```

pub mod cli;
pub mod composition;
pub mod config;
pub mod embedding;
pub mod error;
pub mod featurise;
pub mod formula;
pub mod periodic;
pub mod pooling;

// Re-export main types for convenience
pub use composition::{fractional_composition, Composition};
pub use config::FeaturiserConfig;
pub use embedding::export::{ElementRow, ExportFormat};
pub use embedding::{
    CorrelationRow, CorrelationTable, DirectoryPresets, EmbeddingStore, InMemoryPresets, Metric,
    PairRow, PairTable, PivotTable, PresetResolver, RankedElement,
};
pub use error::{EmbeddingError, Result};
pub use featurise::{featurise, featurise_one, BatchFailure, BatchOptions, BatchResult, FeatureRow};
pub use formula::{parse_formula, ElementCounts};
pub use periodic::{ElementGroup, MendeleevTable, PeriodicTable};
pub use pooling::{feature_labels, feature_vector, PoolingStat};
