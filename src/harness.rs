//! Drives the initialize -> compute -> compare pipeline.
//!
//! Within a test case everything runs in program order on one thread: the
//! inputs are fully initialised before the routine runs, and the comparison
//! reads both outputs only after both producers have returned. Independent
//! cases may run in parallel, each owning its four buffers.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use chrono::Local;
use log::{debug, info, warn};
use rand::distr::{Distribution, StandardUniform};
use rayon::prelude::*;

use crate::buffer::Buffer;
use crate::compare::{compare_buffers, Comparison};
use crate::config::MismatchPolicy;
use crate::element::Element;
use crate::error::{contract_violation, Result};
use crate::init::{init_buffer, init_random};
use crate::reference::reference_matmul;
use crate::report::{Entry, Report};
use crate::routine::MatmulRoutine;

/// How the two input matrices are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<T = u8> {
    /// Every cell of A is `a`, every cell of B is `b`.
    Constant { a: T, b: T },
    /// A is drawn from `seed`, B from `seed + 1`.
    Random { seed: u64 },
}

/// One named N x N multiplication to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase<T = u8> {
    pub name: String,
    pub size: usize,
    pub input: Input<T>,
}

impl<T: Element> TestCase<T> {
    pub fn constant(name: impl Into<String>, size: usize, a: T, b: T) -> Self {
        TestCase {
            name: name.into(),
            size,
            input: Input::Constant { a, b },
        }
    }

    pub fn random(name: impl Into<String>, size: usize, seed: u64) -> Self {
        TestCase {
            name: name.into(),
            size,
            input: Input::Random { seed },
        }
    }

    fn inputs(&self) -> Result<(Buffer<T>, Buffer<T>)>
    where
        StandardUniform: Distribution<T>,
    {
        let n = self.size;
        let mut a = Buffer::new(n, n)?;
        let mut b = Buffer::new(n, n)?;
        match self.input {
            Input::Constant { a: va, b: vb } => {
                init_buffer(&mut a, va);
                init_buffer(&mut b, vb);
            }
            Input::Random { seed } => {
                init_random(&mut a, seed);
                init_random(&mut b, seed.wrapping_add(1));
            }
        }
        Ok((a, b))
    }
}

impl TestCase<u8> {
    /// The classic case: `u8` matrices of ones, so every cell of the product
    /// is `size mod 256`.
    pub fn matmul(size: usize) -> Self {
        TestCase::constant("matmul", size, 1, 1)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "routine panicked with a non-string payload".to_string()
    }
}

/// Calls `routine` on `(a, b, c)`, turning a panic into a contract violation.
fn invoke<T, R>(routine: &R, a: &Buffer<T>, b: &Buffer<T>, c: &mut Buffer<T>) -> Result<()>
where
    T: Element,
    R: MatmulRoutine<T> + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| {
        routine.matmul(a.view(), b.view(), c.view_mut())
    }))
    .map_err(|payload| contract_violation(routine.name(), panic_message(&*payload)))
}

/// Runs a single test case against `routine`.
///
/// The output handed to the routine is pre-filled with `T::max_value()`, so
/// a routine that fails to establish every cell shows up as a mismatch.
///
/// # Errors
///
/// - [`crate::HarnessError::Allocation`] if a buffer cannot be allocated.
/// - [`crate::HarnessError::ContractViolation`] if the routine panics.
/// - [`crate::HarnessError::ShapeMismatch`] if the outputs disagree in shape.
///
/// A numeric mismatch is returned as `Ok` with a failing outcome.
pub fn run_case<T, R>(case: &TestCase<T>, routine: &R) -> Result<Comparison<T>>
where
    T: Element,
    R: MatmulRoutine<T> + ?Sized,
    StandardUniform: Distribution<T>,
{
    let n = case.size;
    debug!("{}: allocating {n}x{n} inputs ({:?})", case.name, case.input);
    let (a, b) = case.inputs()?;

    let mut generated = Buffer::filled(n, n, T::max_value())?;
    let start = Instant::now();
    invoke(routine, &a, &b, &mut generated)?;
    debug!("{}: routine `{}` took {:.2?}", case.name, routine.name(), start.elapsed());

    let mut reference = Buffer::new(n, n)?;
    let start = Instant::now();
    reference_matmul(&a, &b, &mut reference)?;
    debug!("{}: reference took {:.2?}", case.name, start.elapsed());

    compare_buffers(&case.name, &generated, &reference)
}

/// Runs every case and collects the outcomes into a [`Report`].
///
/// Under [`MismatchPolicy::Continue`] cases run in parallel; entries keep the
/// order of `cases`. Under [`MismatchPolicy::Abort`] cases run in order and
/// the suite stops after the first case that does not pass.
pub fn run_suite<T, R>(cases: &[TestCase<T>], routine: &R, policy: MismatchPolicy) -> Report<T>
where
    T: Element,
    R: MatmulRoutine<T> + ?Sized,
    StandardUniform: Distribution<T>,
{
    let started_at = Local::now();
    let start = Instant::now();
    info!(
        "validating routine `{}` on {} case(s), policy {:?}",
        routine.name(),
        cases.len(),
        policy
    );

    let run = |case: &TestCase<T>| {
        let entry = Entry::new(case.name.clone(), run_case(case, routine));
        if let Err(e) = &entry.result {
            warn!("{}: {}", case.name, e);
        }
        entry
    };

    let entries: Vec<Entry<T>> = match policy {
        MismatchPolicy::Continue => cases.par_iter().map(run).collect(),
        MismatchPolicy::Abort => {
            let mut entries = Vec::with_capacity(cases.len());
            for case in cases {
                let entry = run(case);
                let stop = !entry.passed();
                entries.push(entry);
                if stop {
                    warn!("{}: did not pass, skipping remaining cases", case.name);
                    break;
                }
            }
            entries
        }
    };

    Report::new(entries, started_at, start.elapsed())
}
