use std::time::{Duration, Instant};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use cubetimer::engine::scramble::ScrambleGenerator;
use cubetimer::engine::stats::SessionTimes;
use cubetimer::engine::stopwatch::Stopwatch;

fn bench_scramble(c: &mut Criterion) {
    let generator = ScrambleGenerator::new(20);
    let mut rng = SmallRng::seed_from_u64(7);

    c.bench_function("generate scramble (20 moves)", |b| {
        b.iter(|| generator.generate(black_box(&mut rng)))
    });

    let long = ScrambleGenerator::new(60);
    c.bench_function("generate + format scramble (60 moves)", |b| {
        b.iter(|| long.generate(black_box(&mut rng)).to_string())
    });
}

fn bench_summary(c: &mut Criterion) {
    let mut times = SessionTimes::default();
    for i in 0..1000 {
        times.push(8.0 + (i % 37) as f64 * 0.13);
    }

    c.bench_function("session summary (1000 solves)", |b| {
        b.iter(|| black_box(&times).summary())
    });
}

fn bench_sample(c: &mut Criterion) {
    let t0 = Instant::now();
    let mut stopwatch = Stopwatch::new(Duration::from_millis(10));
    stopwatch.start(t0);
    let mut offset = 0u64;

    c.bench_function("stopwatch sample", |b| {
        b.iter(|| {
            offset += 10;
            stopwatch.sample(black_box(t0 + Duration::from_millis(offset)))
        })
    });
}

criterion_group!(benches, bench_scramble, bench_summary, bench_sample);
criterion_main!(benches);
