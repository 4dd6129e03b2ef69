// Benchmarks for the TF-IDF recommendation engine, which rebuilds its
// vector space over the full catalog on every call
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use teashop_core::similarity::{recommend, TfidfVectorizer, RECOMMENDATION_LIMIT};

const STYLES: &[&str] = &["Iced", "Hot", "Blended", "Sparkling"];
const BASES: &[&str] = &[
    "Milk Tea", "Black Tea", "Green Tea", "Oolong", "Matcha Latte", "Espresso", "Cold Brew",
    "Coffee",
];
const TOPPINGS: &[&str] = &["Pearl", "Pudding", "Cheese Foam", "Aloe", "Grass Jelly"];

fn generate_catalog(size: usize) -> Vec<(i64, String)> {
    (0..size)
        .map(|i| {
            let name = format!(
                "{} {} {}",
                STYLES[i % STYLES.len()],
                BASES[i % BASES.len()],
                TOPPINGS[i % TOPPINGS.len()],
            );
            (i as i64 + 1, name)
        })
        .collect()
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");

    for size in [100, 500, 2000].iter() {
        let catalog = generate_catalog(*size);
        let target = catalog[size / 2].0;

        group.bench_with_input(BenchmarkId::new("catalog", size), size, |b, _| {
            b.iter(|| recommend(black_box(target), &catalog, RECOMMENDATION_LIMIT).unwrap())
        });
    }

    group.finish();
}

fn benchmark_fit(c: &mut Criterion) {
    let catalog = generate_catalog(500);
    let names: Vec<&str> = catalog.iter().map(|(_, n)| n.as_str()).collect();

    c.bench_function("tfidf_fit_500", |b| {
        b.iter(|| TfidfVectorizer::fit(black_box(&names)))
    });
}

criterion_group!(benches, benchmark_recommend, benchmark_fit);
criterion_main!(benches);
