//! Reference validation for matrix multiplication routines.
//!
//! The harness fills two N x N input buffers, runs a routine under test
//! ([`MatmulRoutine`]), recomputes the product with a naive triple loop
//! ([`reference_matmul`]), and compares the two results cell by cell
//! ([`compare_buffers`]). Arithmetic wraps modulo `2^bits` of the element
//! type, `u8` by default.
//!
//! ```rust,no_run
//! use matcheck::{run_case, BlockedMatmul, TestCase};
//!
//! let comparison = run_case(&TestCase::matmul(1000), &BlockedMatmul).unwrap();
//! println!("{comparison}");
//! ```

pub mod blocked;
pub mod buffer;
pub mod compare;
pub mod config;
pub mod element;
pub mod error;
pub mod harness;
pub mod init;
pub mod logging;
pub mod reference;
pub mod report;
pub mod routine;

pub use blocked::{blocked_matmul, BlockedMatmul};
pub use buffer::Buffer;
pub use compare::{compare_buffers, Comparison, Mismatch, Outcome};
pub use config::{ExitPolicy, HarnessConfig, MismatchPolicy};
pub use element::Element;
pub use error::{HarnessError, Result};
pub use harness::{run_case, run_suite, Input, TestCase};
pub use init::{init_buffer, init_random};
pub use reference::reference_matmul;
pub use report::{Entry, Report};
pub use routine::{MatmulRoutine, Named};

pub const MR: usize = 16;
pub const NR: usize = 4;

pub const MC: usize = MR * 8;
pub const NC: usize = NR * 32;
pub const KC: usize = 1024;
