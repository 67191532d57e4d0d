use criterion::*;

use crate::benchmark_utilities::*;

pub fn build_benchmark(c: &mut Criterion) {
    use SampleDistribution::*;

    let mut group = c.benchmark_group("mesh construction");
    for sample_distribution in [Uniform, RandomWalk] {
        let config = BuildBenchConfig {
            sample_distribution,
        };
        config.apply(&mut group, &[1000, 2000, 5000, 10_000, 20_000]);
    }
    group.finish();
}
