//! Benchmarks for table construction and the level resolver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use driftisle_progression::curve::{CurveConfig, XpTable};

fn bench_build(c: &mut Criterion) {
    let config = CurveConfig::default();
    c.bench_function("xp_table_build", |b| {
        b.iter(|| XpTable::build(black_box(&config)).unwrap())
    });
}

fn bench_resolve(c: &mut Criterion) {
    let table = XpTable::build(&CurveConfig::default()).unwrap();
    let probes: Vec<u64> = (0..=100u64).map(|i| i * 1_000_000).collect();
    c.bench_function("level_for_xp", |b| {
        b.iter(|| {
            let mut sum = 0u32;
            for &xp in &probes {
                sum += table.level_for_xp(black_box(xp));
            }
            sum
        })
    });
}

criterion_group!(benches, bench_build, bench_resolve);
criterion_main!(benches);
