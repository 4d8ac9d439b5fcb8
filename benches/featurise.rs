use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use element_embeddings::{
    featurise, BatchOptions, Composition, EmbeddingStore, MendeleevTable, Metric, PoolingStat,
};

const DIM: usize = 200;

/// Deterministic positive store over the first 60 elements of the table.
fn bench_store() -> EmbeddingStore {
    let entries = MendeleevTable.elements().iter().take(60).map(|e| {
        let vector = (0..DIM)
            .map(|d| 1.0 + ((e.number as usize * 31 + d * 17) % 97) as f64 / 97.0)
            .collect::<Vec<f64>>();
        (e.symbol, vector)
    });
    EmbeddingStore::from_vectors("bench", entries).unwrap()
}

fn bench_feature_vector(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_vector");
    let store = bench_store();
    let comp = Composition::new("Li7La3ZrO12").unwrap();

    group.bench_function("parse_formula", |bencher| {
        bencher.iter(|| Composition::new(black_box("Ca10(PO4)6(OH)2")))
    });

    group.bench_function("mean", |bencher| {
        bencher.iter(|| black_box(&comp).feature_vector(&store, &[PoolingStat::Mean]))
    });

    group.bench_function("all_stats", |bencher| {
        bencher.iter(|| black_box(&comp).feature_vector(&store, &PoolingStat::ALL))
    });

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let store = bench_store();
    let formulas: Vec<String> = ["Fe2O3", "Li7La3ZrO12", "CaTiO3", "NaCl", "Ca3(PO4)2"]
        .iter()
        .cycle()
        .take(1000)
        .map(|f| f.to_string())
        .collect();

    for (label, options) in [
        ("sequential", BatchOptions::sequential()),
        ("parallel", BatchOptions::default()),
    ] {
        group.bench_with_input(BenchmarkId::new("featurise_1000", label), &options, |bencher, options| {
            bencher.iter(|| featurise(black_box(formulas.as_slice()), &store, &PoolingStat::ALL, options))
        });
    }

    group.finish();
}

fn bench_pairs(c: &mut Criterion) {
    let store = bench_store();
    c.bench_function("pivot_table_pearson", |bencher| {
        bencher.iter(|| black_box(&store).pivot_table(Metric::Pearson, &MendeleevTable))
    });
}

criterion_group!(benches, bench_feature_vector, bench_batch, bench_pairs);
criterion_main!(benches);
