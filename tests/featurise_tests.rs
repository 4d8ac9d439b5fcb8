//! Feature vectors and batch featurisation

mod common;

use common::{assert_close, DIM};
use element_embeddings::{
    feature_labels, featurise, BatchOptions, Composition, DirectoryPresets, EmbeddingError,
    EmbeddingStore, ExportFormat, FeaturiserConfig, PoolingStat,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_all_stats_length() {
    let store = common::store();
    let comp = Composition::new("Li7La3ZrO12").unwrap();
    let features = comp.feature_vector(&store, &PoolingStat::ALL).unwrap();
    assert_eq!(features.len(), 168);
    assert_eq!(feature_labels(&store, &PoolingStat::ALL).len(), 168);
    assert!(features.iter().all(|v| v.is_finite()));
}

#[test]
fn test_single_element_pools_to_its_vector() {
    let store = common::store();
    let fe = store.vector("Fe").unwrap().to_vec();
    let comp = Composition::new("Fe").unwrap();

    for stat in [
        PoolingStat::Mean,
        PoolingStat::MinPool,
        PoolingStat::MaxPool,
        PoolingStat::GeometricMean,
        PoolingStat::HarmonicMean,
    ] {
        let pooled = comp.feature_vector(&store, &[stat]).unwrap();
        for (p, v) in pooled.iter().zip(&fe) {
            assert_close(*p, *v);
        }
    }
    let variance = comp.feature_vector(&store, &[PoolingStat::Variance]).unwrap();
    assert!(variance.iter().all(|v| *v == 0.0));
}

#[test]
fn test_means_are_ordered() {
    let store = common::store();
    let comp = Composition::new("CsPbI3").unwrap();
    let features = comp
        .feature_vector(
            &store,
            &[PoolingStat::HarmonicMean, PoolingStat::GeometricMean, PoolingStat::Mean],
        )
        .unwrap();
    for d in 0..DIM {
        let (h, g, m) = (features[d], features[DIM + d], features[2 * DIM + d]);
        assert!(h <= g + 1e-12 && g <= m + 1e-12, "dimension {d}: {h} {g} {m}");
    }
}

#[test]
fn test_unknown_element_in_composition() {
    let comp = Composition::new("UO2").unwrap();
    assert_eq!(
        comp.feature_vector(&common::store(), &[PoolingStat::Mean]),
        Err(EmbeddingError::UnknownElement("U".to_string()))
    );
}

#[test]
fn test_batch_of_valid_formulas() {
    let formulas = ["Fe2O3", "CsPbI3", "Li7La3ZrO12"];
    let result = featurise(
        &formulas,
        &common::store(),
        &[PoolingStat::Mean, PoolingStat::Sum],
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(result.rows.len(), 3);
    assert!(result.failures.is_empty());
    for (i, row) in result.rows.iter().enumerate() {
        assert_eq!(row.index, i);
        assert_eq!(row.formula, formulas[i]);
        assert_eq!(row.features.len(), 2 * DIM);
    }
}

#[test]
fn test_batch_with_bad_formula() {
    let formulas = ["Fe2O3", "Fe2O)", "SrTiO3"];
    let store = common::store();
    let stats = [PoolingStat::Mean];

    let result = featurise(&formulas, &store, &stats, &BatchOptions::default()).unwrap();
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].formula, "Fe2O)");
    assert_eq!(result.rows[1].formula, "SrTiO3");

    let err = featurise(&formulas, &store, &stats, &BatchOptions::strict()).unwrap_err();
    assert_eq!(err.kind(), "formula_parse");
}

#[test]
fn test_parallel_matches_sequential() {
    let formulas: Vec<String> = ["Fe2O3", "CsPbI3", "Li7La3ZrO12", "NaCl", "Ca3(PO4)2", "XyZ", "TiO2"]
        .iter()
        .cycle()
        .take(70)
        .map(|f| f.to_string())
        .collect();
    let store = common::store();
    let stats = PoolingStat::ALL;

    let parallel = featurise(&formulas, &store, &stats, &BatchOptions::default()).unwrap();
    let sequential = featurise(&formulas, &store, &stats, &BatchOptions::sequential()).unwrap();
    assert_eq!(parallel, sequential);
    assert_eq!(parallel.failures.len(), 10);
}

#[test]
fn test_config_driven_run() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fixture.csv"), common::store().export(ExportFormat::Csv).unwrap()).unwrap();
    let config_path = dir.path().join("featuriser.json");
    fs::write(
        &config_path,
        format!(
            r#"{{"preset": "fixture", "data_dir": {:?}, "stats": ["mean", "range"], "strict": true}}"#,
            dir.path().display().to_string()
        ),
    )
    .unwrap();

    let config = FeaturiserConfig::from_json_file(&config_path).unwrap();
    let store = EmbeddingStore::load(&config.preset, &DirectoryPresets::new(config.data_dir())).unwrap();
    let result = featurise(&["NaCl", "SrTiO3"], &store, &config.stats, &config.batch_options()).unwrap();
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0].features.len(), 2 * DIM);

    assert!(featurise(&["NaCl", "Na?"], &store, &config.stats, &config.batch_options()).is_err());
}
