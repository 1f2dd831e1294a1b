use criterion::Criterion;
use criterion::{criterion_group, criterion_main};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rustpod::pod::{covariance, decompose, project};
use rustpod::snapshots::SnapshotSet;

const POINTS: [usize; 3] = [1000, 4000, 16000];
const SNAPS: [usize; 3] = [50, 100, 200];

fn random_set(n_points: usize, n_snaps: usize) -> SnapshotSet {
    let components: Vec<Array2<f64>> = (0..2)
        .map(|_| Array2::random((n_points, n_snaps), Uniform::new(-1., 1.)))
        .collect();
    SnapshotSet::from_components(&components).unwrap()
}

pub fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decompose");
    group.significance_level(0.1).sample_size(10);
    for (n, m) in POINTS.iter().zip(SNAPS.iter()) {
        let set = random_set(*n, *m);
        let name = format!("Size: {} x {}", *n, *m);
        group.bench_function(&name, |b| b.iter(|| decompose(&covariance(&set)).unwrap()));
    }
    group.finish();
}

pub fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Modes");
    group.significance_level(0.1).sample_size(10);
    for (n, m) in POINTS.iter().zip(SNAPS.iter()) {
        let set = random_set(*n, *m);
        let basis = decompose(&covariance(&set)).unwrap();
        let name = format!("Size: {} x {}", *n, *m);
        group.bench_function(&name, |b| {
            b.iter(|| {
                let mut modes = project(&set, &basis.vectors).unwrap();
                modes.normalize().unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decompose, bench_modes);
criterion_main!(benches);
