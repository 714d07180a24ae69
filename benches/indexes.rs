//! Run these benches with `cargo bench --bench indexes -- --verbose`

use criterion::{criterion_group, criterion_main, Criterion};

mod utils;

criterion_main!(indexes_benches);

criterion_group!(
    indexes_benches,
    kindex_bench,
    showalter_index_bench,
    analyze_sounding_bench
);

fn kindex_bench(c: &mut Criterion) {
    let snds = utils::load_all_test_files();

    c.bench_function("kindex", |b| {
        b.iter(|| {
            for snd in &snds {
                let _x = sounding_stability::kindex(&snd).expect("oops");
            }
        });
    });
}

fn showalter_index_bench(c: &mut Criterion) {
    let snds = utils::load_all_test_files();

    c.bench_function("showalter_index", |b| {
        b.iter(|| {
            for snd in &snds {
                let _x = sounding_stability::showalter_index(&snd).expect("oops");
            }
        });
    });
}

fn analyze_sounding_bench(c: &mut Criterion) {
    let snds = utils::load_all_test_files();

    c.bench_function("analyze_sounding", |b| {
        b.iter(|| {
            for snd in &snds {
                let _x = sounding_stability::analyze_sounding(&snd).expect("oops");
            }
        });
    });
}
