//! Run these benches with `cargo bench --bench parcel_profile -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(200)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(parcel_profile_benches);

criterion_group!(
    name = parcel_profile_benches;
    config = build_tester();
    targets = lift_parcel_bench, lifted_temperature_bench, buoyancy_analysis_bench
);

fn lift_parcel_bench(c: &mut Criterion) {
    use sounding_stability::{Parcel, Sounding};

    let snds = utils::load_all_test_files().to_vec();

    let pairs: Vec<(Sounding, Parcel)> = snds
        .into_iter()
        .map(|snd| {
            let parcel = sounding_stability::surface_parcel(&snd).unwrap();
            (snd, parcel)
        })
        .collect();

    c.bench_function("lift_parcel", |b| {
        b.iter(|| {
            for (snd, parcel) in &pairs {
                let _x = sounding_stability::lift_parcel(*parcel, snd).expect("oops");
            }
        });
    });
}

fn lifted_temperature_bench(c: &mut Criterion) {
    use metfor::HectoPascal;

    let snds = utils::load_all_test_files();

    let parcels: Vec<_> = snds
        .iter()
        .map(|snd| sounding_stability::pressure_parcel(snd, HectoPascal(850.0)).unwrap())
        .collect();

    c.bench_function("lifted_temperature", |b| {
        b.iter(|| {
            for parcel in &parcels {
                let _x = sounding_stability::lifted_temperature(*parcel, HectoPascal(500.0))
                    .expect("oops");
            }
        });
    });
}

fn buoyancy_analysis_bench(c: &mut Criterion) {
    let snds = utils::load_all_test_files();

    let profiles: Vec<_> = snds
        .iter()
        .map(|snd| sounding_stability::parcel_profile(snd).unwrap())
        .collect();

    c.bench_function("buoyancy_analysis", |b| {
        b.iter(|| {
            for (snd, profile) in snds.iter().zip(&profiles) {
                let _x = sounding_stability::buoyancy_analysis(snd, profile).expect("oops");
            }
        });
    });
}
