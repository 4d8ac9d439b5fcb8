//! Interchange forms of a store: nested mapping, flat rows, JSON and CSV
//!
//! Writing the strings to disk is left to the caller.

use super::EmbeddingStore;
use crate::error::{EmbeddingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;

/// One element and its vector, the flat tabular form of a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementRow {
    pub element: String,
    pub values: Vec<f64>,
}

/// Text formats a store can be exported to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(EmbeddingError::Serialization(format!("unknown export format {other:?}"))),
        }
    }
}

impl EmbeddingStore {
    /// Nested mapping form: element → vector, sorted by symbol.
    pub fn to_mapping(&self) -> BTreeMap<String, Vec<f64>> {
        self.element_list()
            .iter()
            .map(|e| (e.clone(), self.vectors[e].clone()))
            .collect()
    }

    /// Flat tabular form, one row per element in element-list order.
    pub fn to_rows(&self) -> Vec<ElementRow> {
        self.element_list()
            .iter()
            .map(|e| ElementRow {
                element: e.clone(),
                values: self.vectors[e].clone(),
            })
            .collect()
    }

    /// Render the store as JSON or CSV text.
    ///
    /// JSON is an object of element → array; CSV has an `element` column
    /// followed by one column per dimension. Both forms can be read back by
    /// [`DirectoryPresets`](super::DirectoryPresets).
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => serde_json::to_string(&self.to_mapping())
                .map_err(|e| EmbeddingError::Serialization(e.to_string())),
            ExportFormat::Csv => Ok(self.to_csv()),
        }
    }

    fn to_csv(&self) -> String {
        let mut out = String::from("element");
        for d in 0..self.dim() {
            let _ = write!(out, ",{d}");
        }
        out.push('\n');
        for row in self.to_rows() {
            out.push_str(&row.element);
            for value in &row.values {
                let _ = write!(out, ",{value}");
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::preset::{parse_csv_preset, parse_json_preset};

    fn toy() -> EmbeddingStore {
        EmbeddingStore::from_vectors("toy", vec![("O", vec![1.5, -2.0]), ("H", vec![0.25, 3.0])]).unwrap()
    }

    #[test]
    fn test_mapping_and_rows() {
        let store = toy();
        let mapping = store.to_mapping();
        assert_eq!(mapping.keys().collect::<Vec<_>>(), ["H", "O"]);
        assert_eq!(mapping["O"], vec![1.5, -2.0]);

        let rows = store.to_rows();
        assert_eq!(rows[0].element, "O");
        assert_eq!(rows[1].values, vec![0.25, 3.0]);
    }

    #[test]
    fn test_csv_export() {
        let csv = toy().export(ExportFormat::Csv).unwrap();
        assert_eq!(csv, "element,0,1\nO,1.5,-2\nH,0.25,3\n");
        let parsed = parse_csv_preset("toy", &csv).unwrap();
        assert_eq!(parsed[0], ("O".to_string(), vec![1.5, -2.0]));
    }

    #[test]
    fn test_json_export() {
        let json = toy().export(ExportFormat::Json).unwrap();
        assert_eq!(json, r#"{"H":[0.25,3.0],"O":[1.5,-2.0]}"#);
        let parsed = parse_json_preset("toy", &json).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("parquet".parse::<ExportFormat>().is_err());
    }
}
