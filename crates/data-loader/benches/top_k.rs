use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{CatalogIndex, Movie, SimilarityMatrix};

/// Dense catalog of a few thousand titles
fn build_index(n: usize) -> CatalogIndex {
    let movies = (0..n as u32).map(|i| Movie::new(i, format!("Movie {}", i))).collect();
    let rows = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { 1.0 } else { ((i * 31 + j * 17) % 1000) as f32 / 1000.0 })
                .collect()
        })
        .collect();
    let matrix = SimilarityMatrix::from_rows(rows).expect("square matrix");
    CatalogIndex::new(movies, matrix).expect("matching dimensions")
}

fn bench_recommend(c: &mut Criterion) {
    let index = build_index(2000);

    c.bench_function("recommend_top5_2000", |b| {
        b.iter(|| index.recommend(black_box("Movie 1000")))
    });
}

criterion_group!(benches, bench_recommend);
criterion_main!(benches);
