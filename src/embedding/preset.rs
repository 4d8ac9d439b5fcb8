//! Preset resolution
//!
//! Stores are built from named presets through a [`PresetResolver`], which is
//! passed in explicitly. [`InMemoryPresets`] serves tests and callers that
//! already hold their data; [`DirectoryPresets`] reads JSON or CSV files from
//! a data directory.

use crate::error::{EmbeddingError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered `(element, vector)` pairs as delivered by a resolver.
pub type PresetVectors = Vec<(String, Vec<f64>)>;

/// References for the built-in presets.
const CITATIONS: &[(&str, &[&str])] = &[
    (
        "magpie",
        &["Ward, L., Agrawal, A., Choudhary, A. & Wolverton, C. A general-purpose machine learning framework for predicting properties of inorganic materials. npj Comput. Mater. 2, 16028 (2016)."],
    ),
    (
        "mat2vec",
        &["Tshitoyan, V. et al. Unsupervised word embeddings capture latent knowledge from materials science literature. Nature 571, 95-98 (2019)."],
    ),
    (
        "matscholar",
        &["Weston, L. et al. Named entity recognition and normalization applied to large-scale information extraction from the materials science literature. J. Chem. Inf. Model. 59, 3692-3702 (2019)."],
    ),
    (
        "megnet16",
        &["Chen, C., Ye, W., Zuo, Y., Zheng, C. & Ong, S. P. Graph networks as a universal machine learning framework for molecules and crystals. Chem. Mater. 31, 3564-3572 (2019)."],
    ),
    (
        "oliynyk",
        &["Oliynyk, A. O. et al. High-throughput machine-learning-driven synthesis of full-Heusler compounds. Chem. Mater. 28, 7324-7331 (2016)."],
    ),
    (
        "skipatom",
        &["Antunes, L. M., Grau-Crespo, R. & Butler, K. T. Distributed representations of atoms and materials for machine learning. npj Comput. Mater. 8, 44 (2022)."],
    ),
];

/// References for a built-in preset, `None` for names it does not know.
pub fn citation(preset: &str) -> Option<&'static [&'static str]> {
    CITATIONS
        .iter()
        .find(|(name, _)| *name == preset)
        .map(|&(_, refs)| refs)
}

/// Source of named embedding presets.
pub trait PresetResolver {
    /// Raw vectors for the preset `name`.
    fn resolve(&self, name: &str) -> Result<PresetVectors>;

    /// References to cite when using the preset `name`.
    fn citation(&self, name: &str) -> Vec<String> {
        builtin_citation(name)
    }
}

fn builtin_citation(name: &str) -> Vec<String> {
    citation(name)
        .unwrap_or_default()
        .iter()
        .map(|r| r.to_string())
        .collect()
}

/// Presets held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPresets {
    presets: HashMap<String, PresetVectors>,
    citations: HashMap<String, Vec<String>>,
}

impl InMemoryPresets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `vectors` under `name`, replacing any previous preset.
    pub fn with_preset<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        vectors: impl IntoIterator<Item = (S, Vec<f64>)>,
    ) -> Self {
        self.insert(name, vectors);
        self
    }

    pub fn insert<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        vectors: impl IntoIterator<Item = (S, Vec<f64>)>,
    ) {
        let vectors = vectors.into_iter().map(|(e, v)| (e.into(), v)).collect();
        self.presets.insert(name.into(), vectors);
    }

    /// Attach references to the preset `name`, overriding the built-in ones.
    pub fn with_citation<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        citation: impl IntoIterator<Item = S>,
    ) -> Self {
        self.citations
            .insert(name.into(), citation.into_iter().map(Into::into).collect());
        self
    }
}

impl PresetResolver for InMemoryPresets {
    fn resolve(&self, name: &str) -> Result<PresetVectors> {
        self.presets
            .get(name)
            .cloned()
            .ok_or_else(|| EmbeddingError::UnknownPreset(name.to_string()))
    }

    fn citation(&self, name: &str) -> Vec<String> {
        match self.citations.get(name) {
            Some(refs) => refs.clone(),
            None => builtin_citation(name),
        }
    }
}

/// Preset names whose data files carry a different stem.
const FILE_ALIASES: &[(&str, &str)] = &[
    ("matscholar", "matscholar-embedding"),
    ("skipatom", "skipatom_20201009_induced"),
];

/// Padding entry shipped with some presets; never an element.
const NULL_KEY: &str = "Null";

/// Presets stored as files in a data directory.
///
/// A preset `name` is looked up as `<root>/<stem>.json` and then
/// `<root>/<stem>.csv`, where `stem` is `name` or its file alias.
///
/// JSON files hold an object mapping element symbols to arrays of numbers.
/// CSV files have a header row whose first column is `element`, followed by
/// one row per element. Empty names, names with a path separator and names
/// containing `..` are rejected, so lookups never leave `root`.
#[derive(Clone, Debug)]
pub struct DirectoryPresets {
    root: PathBuf,
}

impl DirectoryPresets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn stem(name: &str) -> &str {
        FILE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |&(_, stem)| stem)
    }

    fn read(&self, name: &str, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| EmbeddingError::Preset {
            name: name.to_string(),
            reason: format!("{}: {e}", path.display()),
        })
    }
}

impl PresetResolver for DirectoryPresets {
    fn resolve(&self, name: &str) -> Result<PresetVectors> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(preset_error(name, "preset names cannot contain path components"));
        }
        let stem = Self::stem(name);

        let json = self.root.join(format!("{stem}.json"));
        if json.is_file() {
            debug!(preset = name, path = %json.display(), "loading JSON preset");
            return parse_json_preset(name, &self.read(name, &json)?);
        }

        let csv = self.root.join(format!("{stem}.csv"));
        if csv.is_file() {
            debug!(preset = name, path = %csv.display(), "loading CSV preset");
            return parse_csv_preset(name, &self.read(name, &csv)?);
        }

        Err(EmbeddingError::UnknownPreset(name.to_string()))
    }
}

fn preset_error(name: &str, reason: impl Into<String>) -> EmbeddingError {
    EmbeddingError::Preset {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Parse a JSON object of element → number array, keeping file order.
pub fn parse_json_preset(name: &str, text: &str) -> Result<PresetVectors> {
    let object: serde_json::Map<String, Value> =
        serde_json::from_str(text).map_err(|e| preset_error(name, e.to_string()))?;

    object
        .into_iter()
        .filter(|(element, _)| element != NULL_KEY)
        .map(|(element, value)| {
            let vector: Vec<f64> = serde_json::from_value(value)
                .map_err(|e| preset_error(name, format!("vector for {element}: {e}")))?;
            Ok((element, vector))
        })
        .collect()
}

/// Parse CSV with an `element` first column and one numeric column per dimension.
pub fn parse_csv_preset(name: &str, text: &str) -> Result<PresetVectors> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines.next().ok_or_else(|| preset_error(name, "empty CSV file"))?;
    if header.split(',').next().map(str::trim) != Some("element") {
        return Err(preset_error(name, "first CSV column must be 'element'"));
    }

    let mut vectors = Vec::new();
    for (number, line) in lines {
        let mut fields = line.split(',').map(str::trim);
        let element = fields.next().unwrap_or_default().to_string();
        if element == NULL_KEY {
            continue;
        }
        let vector = fields
            .map(|f| {
                f.parse::<f64>()
                    .map_err(|_| preset_error(name, format!("line {}: invalid number {f:?}", number + 1)))
            })
            .collect::<Result<Vec<f64>>>()?;
        vectors.push((element, vector));
    }
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingStore;

    #[test]
    fn test_in_memory_presets() {
        let presets = InMemoryPresets::new().with_preset("toy", vec![("H", vec![1.0, 2.0])]);
        let store = EmbeddingStore::load("toy", &presets).unwrap();
        assert_eq!(store.name(), "toy");
        assert_eq!(store.dim(), 2);
        assert_eq!(
            EmbeddingStore::load("magpie", &presets),
            Err(EmbeddingError::UnknownPreset("magpie".to_string()))
        );
    }

    #[test]
    fn test_json_keeps_file_order_and_drops_null() {
        let text = r#"{"O": [1, 2], "Null": [0, 0], "H": [3.5, 4]}"#;
        let vectors = parse_json_preset("toy", text).unwrap();
        assert_eq!(
            vectors,
            vec![("O".to_string(), vec![1.0, 2.0]), ("H".to_string(), vec![3.5, 4.0])]
        );
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            parse_json_preset("toy", "[1, 2]"),
            Err(EmbeddingError::Preset { .. })
        ));
        assert!(matches!(
            parse_json_preset("toy", r#"{"H": ["a"]}"#),
            Err(EmbeddingError::Preset { .. })
        ));
    }

    #[test]
    fn test_csv_preset() {
        let text = "element,0,1\nH,1.0,2.0\nHe, 3 ,4\n\n";
        let vectors = parse_csv_preset("toy", text).unwrap();
        assert_eq!(
            vectors,
            vec![("H".to_string(), vec![1.0, 2.0]), ("He".to_string(), vec![3.0, 4.0])]
        );
    }

    #[test]
    fn test_csv_errors() {
        assert!(parse_csv_preset("toy", "").is_err());
        assert!(parse_csv_preset("toy", "symbol,0\nH,1").is_err());
        let err = parse_csv_preset("toy", "element,0\nH,x").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(DirectoryPresets::stem("matscholar"), "matscholar-embedding");
        assert_eq!(DirectoryPresets::stem("skipatom"), "skipatom_20201009_induced");
        assert_eq!(DirectoryPresets::stem("magpie"), "magpie");
    }

    #[test]
    fn test_directory_rejects_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(dir.path().join("outside.json"), r#"{"H": [1.0]}"#).unwrap();
        fs::write(data.join("toy.json"), r#"{"H": [1.0]}"#).unwrap();

        let presets = DirectoryPresets::new(&data);
        assert!(presets.resolve("toy").is_ok());
        for name in ["../outside", "sub/toy", "sub\\toy", "..", ""] {
            let err = presets.resolve(name).unwrap_err();
            assert_eq!(err.kind(), "preset", "{name:?}");
        }
    }

    #[test]
    fn test_builtin_citations() {
        for preset in ["magpie", "mat2vec", "matscholar", "megnet16", "oliynyk", "skipatom"] {
            let refs = citation(preset).unwrap();
            assert!(!refs.is_empty());
        }
        assert!(citation("magpie").unwrap()[0].contains("Ward"));
        assert_eq!(citation("toy"), None);
    }

    #[test]
    fn test_store_carries_citation() {
        let presets = InMemoryPresets::new()
            .with_preset("mat2vec", vec![("H", vec![1.0])])
            .with_preset("toy", vec![("H", vec![1.0])])
            .with_preset("own", vec![("H", vec![1.0])])
            .with_citation("own", ["Doe, J. Own vectors (2024)."]);

        let store = EmbeddingStore::load("mat2vec", &presets).unwrap();
        assert!(store.citation()[0].contains("Nature 571"));
        assert_eq!(store.without(["H"]).unwrap().citation(), store.citation());

        assert!(EmbeddingStore::load("toy", &presets).unwrap().citation().is_empty());
        assert_eq!(
            EmbeddingStore::load("own", &presets).unwrap().citation(),
            ["Doe, J. Own vectors (2024)."]
        );

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("magpie.csv"), "element,0\nH,1.0\n").unwrap();
        let store = EmbeddingStore::load("magpie", &DirectoryPresets::new(dir.path())).unwrap();
        assert!(store.citation()[0].contains("npj Comput. Mater. 2"));
    }
}
