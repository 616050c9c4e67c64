//! Dual-robot AX = YB hand-eye calibration.
//!
//! Recovers two homogeneous transforms `Hx` and `Hy` from least-squares
//! regression data (`rho1`, `rho2`, `R1`) produced by an upstream pose
//! regression stage. The recovery minimizes an upper bound `u` on
//! `||R1 * beta - rho1||^2`, written as a linear matrix inequality in
//! Schur-complement form and handed to the interior-point solver in
//! [`axyb_sdp`].
//!
//! Typical use goes through [`run_calibration`]:
//!
//! ```no_run
//! use axyb_calib::{run_calibration, CalibConfig, CalibInput};
//!
//! # fn main() -> Result<(), axyb_calib::CalibError> {
//! let input: CalibInput = /* load regression data */
//! # unimplemented!();
//! let report = run_calibration(&input, &CalibConfig::default())?;
//! println!("residual bound: {}", report.solution.error);
//! # Ok(())
//! # }
//! ```

/// Input data types and validation.
pub mod input;

/// Residual-bound LMI and SDP problem assembly.
pub mod formulation;

/// Solution types and unpacking.
pub mod solution;

/// End-to-end calibration entry point.
pub mod pipeline;

/// Synthetic regression data for tests and examples.
pub mod synthetic;

pub use input::{CalibError, CalibInput};
pub use pipeline::{run_calibration, CalibConfig, CalibReport};
pub use solution::CalibSolution;
