//! Cache-blocked matrix multiplication over wrapping integer arithmetic.
//!
//! This is the optimised routine shipped with the harness. It follows the
//! GotoBLAS/BLIS loop structure:
//!
//! 1. Loop `pc` over the K dimension in `KC` steps.
//! 2. Loop `jc` over columns of C (and B) in `NC` steps, packing a `kc x nc`
//!    block of B into `NR`-wide row-major panels.
//! 3. Split C into `MC`-row blocks processed in parallel with rayon. Each
//!    block packs its `mc x kc` slice of A into `MR`-tall panels.
//! 4. An `MR x NR` micro-kernel multiplies one A panel by one B panel into a
//!    register tile, which is then added into C.
//!
//! All matrices are row-major, matching [`crate::Buffer`].

use std::cmp::min;

use ndarray::parallel::prelude::*;
use ndarray::{ArrayView2, ArrayViewMut2, Axis};

use crate::element::Element;
use crate::routine::MatmulRoutine;
use crate::{KC, MC, MR, NC, NR};

/// The bundled generated routine.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockedMatmul;

impl<T: Element> MatmulRoutine<T> for BlockedMatmul {
    fn name(&self) -> &str {
        "blocked"
    }

    fn matmul(&self, a: ArrayView2<'_, T>, b: ArrayView2<'_, T>, c: ArrayViewMut2<'_, T>) {
        blocked_matmul(a, b, c)
    }
}

/// Position and extent of one micro-tile of C.
#[derive(Debug, Clone, Copy)]
struct Tile {
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
}

/// Packs a `kc x nc` block of B starting at `B(pc, jc)`.
///
/// The block is split into `NR`-column panels. Each panel is stored row by
/// row, every row padded with zeros to `NR` elements:
///
/// ```text
/// p = 0:    [ B(pc+0, jc+0), ..., B(pc+0, jc+nr-1), 0, ..., 0 ]
/// ...
/// p = kc-1: [ B(pc+kc-1, jc+0), ..., B(pc+kc-1, jc+nr-1), 0, ..., 0 ]
/// ```
fn pack_block_b<T: Element>(b: &ArrayView2<'_, T>, pc: usize, jc: usize, kc: usize, nc: usize) -> Vec<T> {
    let panels = nc.div_ceil(NR);
    let mut packed = vec![T::zero(); panels * kc * NR];

    for (panel_idx, panel) in packed.chunks_mut(kc * NR).enumerate() {
        let j0 = panel_idx * NR;
        let nr = min(NR, nc - j0);
        for p in 0..kc {
            for j in 0..nr {
                panel[p * NR + j] = b[[pc + p, jc + j0 + j]];
            }
        }
    }

    packed
}

/// Packs an `mc x kc` block of A starting at `A(ic, pc)`.
///
/// The block is split into `MR`-row panels. For each depth index `p` a panel
/// holds the `mr` elements `A(ic+i, pc+p)` followed by zero padding to `MR`.
fn pack_block_a<T: Element>(a: &ArrayView2<'_, T>, ic: usize, pc: usize, mc: usize, kc: usize) -> Vec<T> {
    let panels = mc.div_ceil(MR);
    let mut packed = vec![T::zero(); panels * kc * MR];

    for (panel_idx, panel) in packed.chunks_mut(kc * MR).enumerate() {
        let i0 = panel_idx * MR;
        let mr = min(MR, mc - i0);
        for p in 0..kc {
            for i in 0..mr {
                panel[p * MR + i] = a[[ic + i0 + i, pc + p]];
            }
        }
    }

    packed
}

/// Multiplies one packed A panel by one packed B panel and adds the
/// `tile.rows x tile.cols` corner of the result into `c`.
#[inline(always)]
fn kernel_mr_nr<T: Element>(a_panel: &[T], b_panel: &[T], kc: usize, c: &mut ArrayViewMut2<'_, T>, tile: Tile) {
    let mut acc = [[T::zero(); NR]; MR];

    for p in 0..kc {
        let a_col = &a_panel[p * MR..(p + 1) * MR];
        let b_row = &b_panel[p * NR..(p + 1) * NR];
        for (acc_row, &a_ip) in acc.iter_mut().zip(a_col) {
            for (acc_ij, &b_pj) in acc_row.iter_mut().zip(b_row) {
                *acc_ij = acc_ij.mul_add_wrapping(a_ip, b_pj);
            }
        }
    }

    for (i, acc_row) in acc.iter().enumerate().take(tile.rows) {
        for (j, acc_ij) in acc_row.iter().enumerate().take(tile.cols) {
            let cell = &mut c[[tile.row + i, tile.col + j]];
            *cell = cell.wrapping_add(acc_ij);
        }
    }
}

/// Computes `C = A * B` with the blocked algorithm.
///
/// `c` is fully overwritten; its prior contents are irrelevant.
///
/// # Panics
///
/// Panics if `a.ncols() != b.nrows()` or `c` is not `a.nrows() x b.ncols()`.
pub fn blocked_matmul<T: Element>(a: ArrayView2<'_, T>, b: ArrayView2<'_, T>, mut c: ArrayViewMut2<'_, T>) {
    let (m, k) = a.dim();
    let (kb, n) = b.dim();
    assert_eq!(k, kb, "inner dimensions differ: A is {m}x{k}, B is {kb}x{n}");
    assert_eq!(c.dim(), (m, n), "C must be {m}x{n}");

    c.fill(T::zero());

    for pc in (0..k).step_by(KC) {
        let kc = min(KC, k - pc);

        for jc in (0..n).step_by(NC) {
            let nc = min(NC, n - jc);
            let block_b_packed = pack_block_b(&b, pc, jc, kc, nc);

            c.axis_chunks_iter_mut(Axis(0), MC)
                .into_par_iter()
                .enumerate()
                .for_each(|(i_idx, mut c_block)| {
                    let ic = i_idx * MC;
                    let mc = c_block.nrows();
                    let block_a_packed = pack_block_a(&a, ic, pc, mc, kc);

                    for (jr_idx, b_panel) in block_b_packed.chunks(kc * NR).enumerate() {
                        let nr = min(NR, nc - jr_idx * NR);
                        for (ir_idx, a_panel) in block_a_packed.chunks(kc * MR).enumerate() {
                            let tile = Tile {
                                row: ir_idx * MR,
                                col: jc + jr_idx * NR,
                                rows: min(MR, mc - ir_idx * MR),
                                cols: nr,
                            };
                            kernel_mr_nr(a_panel, b_panel, kc, &mut c_block, tile);
                        }
                    }
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::init::init_random;
    use crate::reference::reference_matmul;

    fn check_against_reference(m: usize, n: usize, k: usize, seed: u64) {
        let mut a: Buffer<u8> = Buffer::new(m, k).unwrap();
        let mut b: Buffer<u8> = Buffer::new(k, n).unwrap();
        init_random(&mut a, seed);
        init_random(&mut b, seed + 1);

        let mut c_blocked = Buffer::filled(m, n, 0xAB).unwrap();
        blocked_matmul(a.view(), b.view(), c_blocked.view_mut());

        let mut c_ref = Buffer::new(m, n).unwrap();
        reference_matmul(&a, &b, &mut c_ref).unwrap();

        assert_eq!(c_blocked, c_ref, "blocked != reference for {m}x{k} * {k}x{n}");
    }

    #[test]
    fn test_pack_block_b_pads_with_zeros() {
        // 2x3 block, NR-wide panels: columns beyond 3 are zero.
        let b = Buffer::from_rows(2, 3, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
        let packed = pack_block_b(&b.view(), 0, 0, 2, 3);

        assert_eq!(packed.len(), 2 * NR);
        assert_eq!(&packed[..3], &[1, 2, 3]);
        assert!(packed[3..NR].iter().all(|&v| v == 0));
        assert_eq!(&packed[NR..NR + 3], &[4, 5, 6]);
    }

    #[test]
    fn test_pack_block_a_transposes_panel() {
        // 2x2 block: for each depth p the panel holds column p of A.
        let a = Buffer::from_rows(2, 2, vec![1u8, 2, 3, 4]).unwrap();
        let packed = pack_block_a(&a.view(), 0, 0, 2, 2);

        assert_eq!(packed.len(), 2 * MR);
        assert_eq!(&packed[..2], &[1, 3]);
        assert!(packed[2..MR].iter().all(|&v| v == 0));
        assert_eq!(&packed[MR..MR + 2], &[2, 4]);
    }

    #[test]
    fn test_blocked_1x1() {
        check_against_reference(1, 1, 1, 1);
    }

    #[test]
    fn test_blocked_kernel_sized() {
        check_against_reference(MR, NR, 8, 2);
    }

    #[test]
    fn test_blocked_odd_dimensions() {
        check_against_reference(17, 13, 11, 3);
        check_against_reference(MR + 1, NR + 1, 3, 4);
    }

    #[test]
    fn test_blocked_crosses_every_block_edge() {
        check_against_reference(MC + 3, NC + 5, KC + 7, 5);
    }

    #[test]
    fn test_blocked_extreme_aspect_ratios() {
        check_against_reference(1, 300, 2, 6);
        check_against_reference(300, 1, 2, 7);
        check_against_reference(2, 2, 2000, 8);
    }

    #[test]
    fn test_blocked_zero_depth_yields_zeros() {
        let a: Buffer<u8> = Buffer::new(3, 0).unwrap();
        let b: Buffer<u8> = Buffer::new(0, 4).unwrap();
        let mut c = Buffer::filled(3, 4, 9u8).unwrap();

        blocked_matmul(a.view(), b.view(), c.view_mut());

        assert!(c.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_blocked_overwrites_stale_output() {
        let a = Buffer::filled(5, 5, 1u8).unwrap();
        let b = Buffer::filled(5, 5, 1u8).unwrap();
        let mut c = Buffer::filled(5, 5, 200u8).unwrap();

        blocked_matmul(a.view(), b.view(), c.view_mut());

        assert!(c.iter().all(|&v| v == 5));
    }

    #[test]
    fn test_blocked_wider_element() {
        let mut a: Buffer<u32> = Buffer::new(20, 30).unwrap();
        let mut b: Buffer<u32> = Buffer::new(30, 10).unwrap();
        init_random(&mut a, 10);
        init_random(&mut b, 11);

        let mut c_blocked = Buffer::new(20, 10).unwrap();
        BlockedMatmul.matmul(a.view(), b.view(), c_blocked.view_mut());
        let mut c_ref = Buffer::new(20, 10).unwrap();
        reference_matmul(&a, &b, &mut c_ref).unwrap();

        assert_eq!(c_blocked, c_ref);
    }

    #[test]
    #[should_panic(expected = "inner dimensions differ")]
    fn test_blocked_rejects_inner_mismatch() {
        let a: Buffer<u8> = Buffer::new(2, 3).unwrap();
        let b: Buffer<u8> = Buffer::new(2, 2).unwrap();
        let mut c: Buffer<u8> = Buffer::new(2, 2).unwrap();
        blocked_matmul(a.view(), b.view(), c.view_mut());
    }
}
