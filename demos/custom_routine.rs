//! Custom Routine Demonstration
//!
//! This example plugs three routines into the harness: the bundled blocked
//! GEMM, a hand-written loop with an off-by-one bug, and one that indexes out
//! of bounds. Only the first passes; the other two show how a numeric
//! mismatch and a contract violation are reported differently.

use matcheck::{run_suite, BlockedMatmul, MismatchPolicy, Named, TestCase};
use ndarray::{ArrayView2, ArrayViewMut2};

/// Skips the last k index.
fn short_loop(a: ArrayView2<'_, u8>, b: ArrayView2<'_, u8>, mut c: ArrayViewMut2<'_, u8>) {
    c.fill(0);
    let (m, k) = a.dim();
    for i in 0..m {
        for j in 0..b.ncols() {
            for p in 0..k - 1 {
                c[[i, j]] = c[[i, j]].wrapping_add(a[[i, p]].wrapping_mul(b[[p, j]]));
            }
        }
    }
}

/// Reads one row past the end of A.
fn overreach(a: ArrayView2<'_, u8>, _b: ArrayView2<'_, u8>, mut c: ArrayViewMut2<'_, u8>) {
    let m = a.nrows();
    c[[0, 0]] = a[[m, 0]];
}

fn main() {
    let cases = vec![TestCase::matmul(256), TestCase::random("matmul_random", 128, 7)];

    println!("Blocked routine:");
    print!("{}", run_suite(&cases, &BlockedMatmul, MismatchPolicy::Continue));

    println!("\nOff-by-one routine:");
    let report = run_suite(&cases, &Named::new("short_loop", short_loop), MismatchPolicy::Continue);
    print!("{}", report.render(true));

    println!("\nOut-of-bounds routine:");
    let report = run_suite(&cases, &Named::new("overreach", overreach), MismatchPolicy::Abort);
    print!("{}", report.render(true));
}
