//! Error types shared by every stage of the featurisation pipeline.

use thiserror::Error;

/// Errors raised while parsing formulas, building stores or pooling vectors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    /// The formula is not syntactically well formed.
    #[error("cannot parse formula {formula:?} at position {position}: {reason}")]
    FormulaParse {
        /// The formula as supplied by the caller.
        formula: String,
        /// Byte offset of the offending character.
        position: usize,
        /// Human readable description of the problem.
        reason: String,
    },

    /// A composition with no atoms cannot be normalised.
    #[error("composition is empty")]
    EmptyComposition,

    /// Vectors of a store do not share one length.
    #[error("dimension mismatch for {element}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Element whose vector disagrees with the first one seen.
        element: String,
        /// Dimension established by the first vector.
        expected: usize,
        /// Dimension of the offending vector.
        found: usize,
    },

    /// The same element appears twice in a source mapping.
    #[error("element {0} appears more than once")]
    DuplicateElement(String),

    /// Symbol absent from a store or unknown to the periodic table.
    #[error("unknown element {0}")]
    UnknownElement(String),

    /// Metric name not supported by the requested operation.
    #[error("unsupported metric {0:?}")]
    UnsupportedMetric(String),

    /// Statistic name not recognised.
    #[error("unknown statistic {0:?}")]
    UnknownStat(String),

    /// Geometric mean is undefined for zero or negative coordinates.
    #[error("non-positive value {value} for {element} at dimension {dimension}")]
    NonPositiveValue {
        element: String,
        dimension: usize,
        value: f64,
    },

    /// Harmonic mean divides by every coordinate and by their weighted sum.
    #[error("harmonic mean divides by zero for {element} at dimension {dimension}")]
    DivisionByZero {
        /// Element with a zero coordinate, or the whole formula when the
        /// weighted reciprocals cancel out.
        element: String,
        dimension: usize,
    },

    /// No preset with this name is known to the resolver.
    #[error("unknown embedding preset {0:?}")]
    UnknownPreset(String),

    /// A preset exists but could not be read.
    #[error("failed to load preset {name:?}: {reason}")]
    Preset { name: String, reason: String },

    /// A configuration file could not be read or decoded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Export to an interchange format failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

impl EmbeddingError {
    /// Short stable name of the error kind, used in batch failure reports.
    pub fn kind(&self) -> &'static str {
        match self {
            EmbeddingError::FormulaParse { .. } => "formula_parse",
            EmbeddingError::EmptyComposition => "empty_composition",
            EmbeddingError::DimensionMismatch { .. } => "dimension_mismatch",
            EmbeddingError::DuplicateElement(_) => "duplicate_element",
            EmbeddingError::UnknownElement(_) => "unknown_element",
            EmbeddingError::UnsupportedMetric(_) => "unsupported_metric",
            EmbeddingError::UnknownStat(_) => "unknown_stat",
            EmbeddingError::NonPositiveValue { .. } => "non_positive_value",
            EmbeddingError::DivisionByZero { .. } => "division_by_zero",
            EmbeddingError::UnknownPreset(_) => "unknown_preset",
            EmbeddingError::Preset { .. } => "preset",
            EmbeddingError::Config(_) => "config",
            EmbeddingError::Serialization(_) => "serialization",
        }
    }
}
