//! Matrix Multiplication Benchmark Comparison
//!
//! Compares the blocked routine against the naive reference oracle across
//! matrix sizes.
//!
//! # Usage:
//! ```bash
//! cargo bench --bench matmul
//!
//! # Run one size only
//! cargo bench --bench matmul -- matmul_256
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use matcheck::{blocked_matmul, init_random, reference_matmul, Buffer};

/// Create a seeded random square matrix.
fn create_matrix(n: usize, seed: u64) -> Buffer<u8> {
    let mut matrix = Buffer::new(n, n).expect("benchmark buffer allocation");
    init_random(&mut matrix, seed);
    matrix
}

/// Benchmark both implementations for a specific size - one group per size
fn bench_matmul_by_size(c: &mut Criterion) {
    let sizes = [64, 128, 256, 512];

    for n in sizes {
        let group_name = format!("matmul_{n}");
        let mut group = c.benchmark_group(&group_name);
        group.sample_size(20); // Reduce sample size for large matrices

        let a = create_matrix(n, 42);
        let b = create_matrix(n, 43);
        let mut c_blocked = Buffer::new(n, n).expect("benchmark buffer allocation");
        let mut c_ref = Buffer::new(n, n).expect("benchmark buffer allocation");

        group.bench_function("blocked", |bench| {
            bench.iter(|| {
                blocked_matmul(black_box(a.view()), black_box(b.view()), c_blocked.view_mut());
                black_box(&c_blocked);
            });
        });

        // O(N^3) with bounds checks; skip the largest size.
        if n <= 256 {
            group.bench_function("reference", |bench| {
                bench.iter(|| {
                    matcheck::init_buffer(&mut c_ref, 0);
                    reference_matmul(black_box(&a), black_box(&b), &mut c_ref)
                        .expect("square operands");
                    black_box(&c_ref);
                });
            });
        }

        group.finish();
    }
}

criterion_group!(benches, bench_matmul_by_size);
criterion_main!(benches);
