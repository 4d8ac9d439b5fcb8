//! Shared fixtures for integration tests

#![allow(dead_code)]

use element_embeddings::{EmbeddingStore, InMemoryPresets};

/// Dimension of the fixture store, matching the magpie preset.
pub const DIM: usize = 21;

/// Elements covered by the fixture store.
pub const ELEMENTS: &[&str] = &[
    "H", "Li", "Na", "O", "P", "Cl", "Ca", "Ti", "Fe", "Zr", "Sr", "I", "Cs", "La", "Pb",
];

/// Deterministic strictly positive vector for the `i`-th fixture element.
pub fn vector(i: usize) -> Vec<f64> {
    (0..DIM)
        .map(|d| 1.0 + ((i * 7 + d * 3) % 11) as f64 / 10.0 + d as f64 * 0.01 + i as f64 * 0.001)
        .collect()
}

pub fn entries() -> Vec<(&'static str, Vec<f64>)> {
    ELEMENTS.iter().enumerate().map(|(i, &e)| (e, vector(i))).collect()
}

pub fn store() -> EmbeddingStore {
    EmbeddingStore::from_vectors("fixture", entries()).unwrap()
}

pub fn presets() -> InMemoryPresets {
    InMemoryPresets::new().with_preset("fixture", entries())
}

pub fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}
