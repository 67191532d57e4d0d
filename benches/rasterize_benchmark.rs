use criterion::{BenchmarkId, Criterion, Throughput};
use shull::{GridConfig, Mesh, Point2, Rasterizer, Sample};

use crate::benchmark_utilities::{uniform_distribution, SEED2};

pub fn rasterize_benchmark(c: &mut Criterion) {
    const RANGE: f64 = 1000.0;
    const NUM_ELEMENTS: usize = 2000;

    let mesh = Mesh::new(
        uniform_distribution(*SEED2, RANGE)
            .take(NUM_ELEMENTS)
            .collect::<Vec<_>>(),
    )
    .unwrap();

    let mut group = c.benchmark_group("rasterization");
    group.sample_size(10);
    for size in [32, 64, 128] {
        let config = GridConfig::new(
            size,
            size,
            Point2::new(-RANGE, -RANGE),
            Point2::new(RANGE, RANGE),
        )
        .unwrap();
        let rasterizer = Rasterizer::new(config).unwrap();

        group.throughput(Throughput::Elements(config.len() as u64));
        group.bench_with_input(BenchmarkId::new("square grid", size), &size, |b, _| {
            b.iter(|| rasterizer.rasterize(&mesh, Sample::value))
        });
    }
    group.finish();
}
