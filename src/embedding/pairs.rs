//! All-pairs element tables and their pivoted matrix form
//!
//! The long table enumerates combinations with replacement of the store's
//! elements and writes both `(A, B)` and `(B, A)` for distinct pairs, so a
//! store of `n` elements yields `n²` rows. Each row carries the Mendeleev
//! rank of both elements; [`pivot`] uses those ranks to lay the values out
//! as a square matrix in a canonical order.
//!
//! [`correlation_table`] is the same long table with Euclidean distance, its
//! reciprocal and Pearson correlation side by side.

use super::{metric, EmbeddingStore, Metric};
use crate::error::{EmbeddingError, Result};
use crate::periodic::PeriodicTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use tracing::debug;

/// An element paired with its Mendeleev rank.
///
/// Ordering is by rank first, then symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RankedElement {
    pub rank: u32,
    pub symbol: String,
}

/// One row of the long-format pair table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairRow {
    pub ele_1: String,
    pub ele_2: String,
    pub mend_1: RankedElement,
    pub mend_2: RankedElement,
    pub value: f64,
}

/// Long-format table of a metric over every element pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PairTable {
    metric: Metric,
    rows: Vec<PairRow>,
    #[serde(skip)]
    index: HashMap<String, HashMap<String, usize>>,
}

impl PairTable {
    /// Wrap `rows`, indexing them by ordered pair.
    pub fn new(metric: Metric, rows: Vec<PairRow>) -> Self {
        let mut index: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            index
                .entry(row.ele_1.clone())
                .or_default()
                .insert(row.ele_2.clone(), i);
        }
        Self { metric, rows, index }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn rows(&self) -> &[PairRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value recorded for the ordered pair `(a, b)`.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = *self.index.get(a)?.get(b)?;
        Some(self.rows[i].value)
    }

    /// Render as CSV with columns `ele_1,ele_2,mend_1,mend_2,<metric>`.
    pub fn to_csv(&self) -> String {
        let mut out = format!("ele_1,ele_2,mend_1,mend_2,{}\n", self.metric);
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{},{},{},{},{}",
                row.ele_1, row.ele_2, row.mend_1.rank, row.mend_2.rank, row.value
            );
        }
        out
    }
}

/// One row of the combined correlation table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRow {
    pub ele_1: String,
    pub ele_2: String,
    pub mend_1: RankedElement,
    pub mend_2: RankedElement,
    pub euclidean: f64,
    /// `1 / euclidean`; infinite for self-pairs and identical vectors.
    pub reciprocal_euclidean: f64,
    pub pearson: f64,
}

/// Long-format table with distance, reciprocal distance and correlation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationTable {
    pub rows: Vec<CorrelationRow>,
}

impl CorrelationTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV; infinite reciprocals are written as `inf`.
    pub fn to_csv(&self) -> String {
        let mut out =
            String::from("ele_1,ele_2,mend_1,mend_2,euclid_dist,reciprocal_euclid_dist,pearson_corr\n");
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{}",
                row.ele_1,
                row.ele_2,
                row.mend_1.rank,
                row.mend_2.rank,
                row.euclidean,
                row.reciprocal_euclidean,
                row.pearson
            );
        }
        out
    }
}

/// Square matrix of a metric, both axes sorted by Mendeleev rank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub metric: Metric,
    /// Row and column labels, shared by both axes.
    pub labels: Vec<RankedElement>,
    /// `values[i][j]` is the metric for `(labels[i], labels[j])`; `NaN` where
    /// the long table had no row.
    pub values: Vec<Vec<f64>>,
}

impl PivotTable {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn index_of(&self, symbol: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.symbol == symbol)
    }

    /// Cell for the row element `a` and column element `b`.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.values[self.index_of(a)?][self.index_of(b)?])
    }

    /// Render as CSV, first row and column holding element symbols.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("element");
        for label in &self.labels {
            let _ = write!(out, ",{}", label.symbol);
        }
        out.push('\n');
        for (label, row) in self.labels.iter().zip(&self.values) {
            out.push_str(&label.symbol);
            for value in row {
                let _ = write!(out, ",{value}");
            }
            out.push('\n');
        }
        out
    }
}

/// Unordered pairs with replacement, in element-list order.
///
/// For `n` elements this yields `n * (n + 1) / 2` pairs.
pub fn element_pairs(elements: &[String]) -> Vec<(&str, &str)> {
    let mut pairs = Vec::with_capacity(elements.len() * (elements.len() + 1) / 2);
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i..] {
            pairs.push((a.as_str(), b.as_str()));
        }
    }
    pairs
}

/// Evaluate `value` once per unordered pair and emit it for both orders.
///
/// Fails with [`EmbeddingError::UnknownElement`] if `table` cannot rank one
/// of the store's elements.
fn ranked_pairs<T: Clone>(
    store: &EmbeddingStore,
    table: &dyn PeriodicTable,
    mut value: impl FnMut(&str, &str) -> Result<T>,
) -> Result<Vec<(RankedElement, RankedElement, T)>> {
    let mut ranked = HashMap::with_capacity(store.len());
    for element in store.element_list() {
        let rank = table
            .mendeleev_rank(element)
            .ok_or_else(|| EmbeddingError::UnknownElement(element.clone()))?;
        ranked.insert(
            element.as_str(),
            RankedElement {
                rank,
                symbol: element.clone(),
            },
        );
    }

    let mut rows = Vec::with_capacity(store.len() * store.len());
    for (a, b) in element_pairs(store.element_list()) {
        let v = value(a, b)?;
        if a != b {
            rows.push((ranked[a].clone(), ranked[b].clone(), v.clone()));
            rows.push((ranked[b].clone(), ranked[a].clone(), v));
        } else {
            rows.push((ranked[a].clone(), ranked[b].clone(), v));
        }
    }
    Ok(rows)
}

/// Evaluate `metric` over every element pair of `store`.
pub fn all_pairs_table(
    store: &EmbeddingStore,
    metric: Metric,
    table: &dyn PeriodicTable,
) -> Result<PairTable> {
    let rows: Vec<PairRow> = ranked_pairs(store, table, |a, b| store.metric_value(a, b, metric))?
        .into_iter()
        .map(|(mend_1, mend_2, value)| PairRow {
            ele_1: mend_1.symbol.clone(),
            ele_2: mend_2.symbol.clone(),
            mend_1,
            mend_2,
            value,
        })
        .collect();

    debug!(metric = %metric, rows = rows.len(), "built pair table");
    Ok(PairTable::new(metric, rows))
}

/// Euclidean distance, its reciprocal and Pearson correlation for every
/// element pair of `store`.
pub fn correlation_table(store: &EmbeddingStore, table: &dyn PeriodicTable) -> Result<CorrelationTable> {
    let rows: Vec<CorrelationRow> = ranked_pairs(store, table, |a, b| {
        let (va, vb) = (store.vector(a)?, store.vector(b)?);
        Ok((metric::euclidean(va, vb), metric::pearson(va, vb)))
    })?
    .into_iter()
    .map(|(mend_1, mend_2, (euclidean, pearson))| CorrelationRow {
        ele_1: mend_1.symbol.clone(),
        ele_2: mend_2.symbol.clone(),
        mend_1,
        mend_2,
        euclidean,
        reciprocal_euclidean: euclidean.recip(),
        pearson,
    })
    .collect();

    debug!(rows = rows.len(), "built correlation table");
    Ok(CorrelationTable { rows })
}

/// Reshape a long pair table into a rank-sorted square matrix.
pub fn pivot(table: &PairTable) -> PivotTable {
    let labels: Vec<RankedElement> = table
        .rows()
        .iter()
        .flat_map(|r| [r.mend_1.clone(), r.mend_2.clone()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.symbol.as_str(), i))
        .collect();

    let mut values = vec![vec![f64::NAN; labels.len()]; labels.len()];
    for row in table.rows() {
        values[index[row.mend_1.symbol.as_str()]][index[row.mend_2.symbol.as_str()]] = row.value;
    }

    PivotTable {
        metric: table.metric(),
        labels,
        values,
    }
}

impl EmbeddingStore {
    /// Long-format table of `metric` over all element pairs.
    pub fn all_pairs_table(&self, metric: Metric, table: &dyn PeriodicTable) -> Result<PairTable> {
        all_pairs_table(self, metric, table)
    }

    /// Distance, reciprocal distance and correlation over all element pairs.
    pub fn correlation_table(&self, table: &dyn PeriodicTable) -> Result<CorrelationTable> {
        correlation_table(self, table)
    }

    /// Square matrix of `metric`, ordered by Mendeleev rank.
    pub fn pivot_table(&self, metric: Metric, table: &dyn PeriodicTable) -> Result<PivotTable> {
        Ok(pivot(&self.all_pairs_table(metric, table)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::periodic::MendeleevTable;

    fn five() -> EmbeddingStore {
        EmbeddingStore::from_vectors(
            "five",
            vec![
                ("H", vec![1.0, 0.0, 2.0]),
                ("Li", vec![0.5, 1.5, 2.5]),
                ("O", vec![3.0, 1.0, 0.0]),
                ("He", vec![0.0, 0.0, 1.0]),
                ("Fe", vec![2.0, 2.0, 2.5]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_element_pairs_count() {
        let store = five();
        let pairs = element_pairs(store.element_list());
        assert_eq!(pairs.len(), 15);
        assert_eq!(pairs[0], ("H", "H"));
        assert_eq!(pairs[1], ("H", "Li"));
        assert_eq!(pairs[14], ("Fe", "Fe"));
    }

    #[test]
    fn test_all_pairs_row_count() {
        let table = five().all_pairs_table(Metric::Euclidean, &MendeleevTable).unwrap();
        assert_eq!(table.len(), 25);
        let self_rows = table.rows().iter().filter(|r| r.ele_1 == r.ele_2).count();
        assert_eq!(self_rows, 5);
    }

    #[test]
    fn test_rows_are_symmetric() {
        for metric in [Metric::Euclidean, Metric::Manhattan, Metric::Chebyshev, Metric::Pearson] {
            let table = five().all_pairs_table(metric, &MendeleevTable).unwrap();
            for row in table.rows() {
                assert_eq!(table.get(&row.ele_2, &row.ele_1), Some(row.value));
            }
        }
    }

    #[test]
    fn test_rows_carry_ranks() {
        let table = five().all_pairs_table(Metric::Manhattan, &MendeleevTable).unwrap();
        let row = table.rows().iter().find(|r| r.ele_1 == "O" && r.ele_2 == "Li").unwrap();
        assert_eq!(row.mend_1, RankedElement { rank: 101, symbol: "O".into() });
        assert_eq!(row.mend_2, RankedElement { rank: 12, symbol: "Li".into() });
    }

    #[test]
    fn test_unrankable_element() {
        let store = EmbeddingStore::from_vectors("odd", vec![("H", vec![1.0]), ("Qq", vec![2.0])]).unwrap();
        assert_eq!(
            store.all_pairs_table(Metric::Euclidean, &MendeleevTable),
            Err(EmbeddingError::UnknownElement("Qq".to_string()))
        );
    }

    #[test]
    fn test_pivot_is_rank_ordered() {
        let pivot = five().pivot_table(Metric::Euclidean, &MendeleevTable).unwrap();
        let symbols: Vec<_> = pivot.labels.iter().map(|l| l.symbol.as_str()).collect();
        // He 1, Li 12, Fe 61, O 101, H 103
        assert_eq!(symbols, ["He", "Li", "Fe", "O", "H"]);
        assert_eq!(pivot.len(), 5);
        for i in 0..5 {
            assert_eq!(pivot.values[i][i], 0.0);
            for j in 0..5 {
                assert_eq!(pivot.values[i][j], pivot.values[j][i]);
                assert!(!pivot.values[i][j].is_nan());
            }
        }
        assert_eq!(pivot.get("H", "O"), five().distance("H", "O", Metric::Euclidean).ok());
    }

    #[test]
    fn test_pivot_independent_of_input_order() {
        let store = five();
        let mut reversed: Vec<_> = store
            .element_list()
            .iter()
            .map(|e| (e.clone(), store.vector(e).unwrap().to_vec()))
            .collect();
        reversed.reverse();
        let reversed = EmbeddingStore::from_vectors("rev", reversed).unwrap();

        let a = store.pivot_table(Metric::Pearson, &MendeleevTable).unwrap();
        let b = reversed.pivot_table(Metric::Pearson, &MendeleevTable).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn test_lookup_by_ordered_pair() {
        let table = five().all_pairs_table(Metric::Chebyshev, &MendeleevTable).unwrap();
        for row in table.rows() {
            assert_eq!(table.get(&row.ele_1, &row.ele_2), Some(row.value));
        }
        assert_eq!(table.get("H", "Xe"), None);
        assert_eq!(table.get("Xe", "H"), None);
        assert_eq!(table.metric(), Metric::Chebyshev);
    }

    #[test]
    fn test_correlation_table() {
        let store = five();
        let table = store.correlation_table(&MendeleevTable).unwrap();
        assert_eq!(table.len(), 25);

        let row = table.rows.iter().find(|r| r.ele_1 == "H" && r.ele_2 == "O").unwrap();
        let distance = store.distance("H", "O", Metric::Euclidean).unwrap();
        assert_eq!(row.euclidean, distance);
        assert_eq!(row.reciprocal_euclidean, 1.0 / distance);
        assert_eq!(row.pearson, store.correlation("H", "O").unwrap());
        assert_eq!(row.mend_1.rank, 103);

        let own = table.rows.iter().find(|r| r.ele_1 == "Fe" && r.ele_2 == "Fe").unwrap();
        assert_eq!(own.euclidean, 0.0);
        assert_eq!(own.reciprocal_euclidean, f64::INFINITY);
        assert_eq!(own.pearson, 1.0);
    }

    #[test]
    fn test_correlation_csv() {
        let store = EmbeddingStore::from_vectors("two", vec![("H", vec![0.0, 0.0]), ("He", vec![3.0, 4.0])]).unwrap();
        let csv = store.correlation_table(&MendeleevTable).unwrap().to_csv();
        assert!(csv.starts_with("ele_1,ele_2,mend_1,mend_2,euclid_dist,reciprocal_euclid_dist,pearson_corr\n"));
        assert!(csv.contains("H,H,103,103,0,inf,"));
        assert!(csv.contains("He,H,1,103,5,0.2,"));
        assert_eq!(csv.lines().count(), 5);
    }

    #[test]
    fn test_csv_rendering() {
        let store = EmbeddingStore::from_vectors("two", vec![("H", vec![0.0, 0.0]), ("He", vec![3.0, 4.0])]).unwrap();
        let table = store.all_pairs_table(Metric::Euclidean, &MendeleevTable).unwrap();
        let csv = table.to_csv();
        assert!(csv.starts_with("ele_1,ele_2,mend_1,mend_2,euclidean\n"));
        assert!(csv.contains("H,He,103,1,5\n"));
        assert_eq!(csv.lines().count(), 5);

        let pivot = pivot(&table).to_csv();
        assert_eq!(pivot, "element,He,H\nHe,0,5\nH,5,0\n");
    }
}
