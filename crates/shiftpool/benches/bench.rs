use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use shiftpool::Pool;
use std::hint::black_box;
use std::time::Instant;

// Number of jobs handed off per benchmark iteration
const TOTAL_JOBS: usize = 4096;

/// Benchmark rendezvous handoff throughput for the given worker counts
fn bench_handoff(c: &mut Criterion, group_name: &str, work: fn(u64) -> u64) {
    let mut group = c.benchmark_group(group_name);

    for num_workers in [1, 2, 4, 8, 16] {
        group.throughput(Throughput::Elements(TOTAL_JOBS as u64));
        group.bench_function(
            format!("elems/{TOTAL_JOBS}/workers/{num_workers}"),
            |b| {
                b.iter_custom(|iters| {
                    let pool = Pool::new(num_workers, move |_, job: u64| {
                        black_box(work(job));
                    })
                    .unwrap();

                    let start = Instant::now();
                    for _ in 0..iters {
                        for job in 0..TOTAL_JOBS as u64 {
                            pool.add_job(job).unwrap();
                        }
                    }
                    pool.stop().unwrap();

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

fn noop(job: u64) -> u64 {
    job
}

fn spin(job: u64) -> u64 {
    (0..256).fold(job, |acc, i| acc.wrapping_mul(31).wrapping_add(i))
}

fn benchmark_handoff_noop(c: &mut Criterion) {
    bench_handoff(c, "handoff/noop", noop);
}

fn benchmark_handoff_spin(c: &mut Criterion) {
    bench_handoff(c, "handoff/spin", spin);
}

criterion_group!(benches, benchmark_handoff_noop, benchmark_handoff_spin);
criterion_main!(benches);
