//! High-level entry crate for the `axyb-rs` calibration toolbox.
//!
//! Re-exports the pieces needed to run a dual-robot AX = YB hand-eye
//! calibration end to end:
//!
//! ```no_run
//! use axyb::{run_calibration, CalibConfig, CalibInput};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read_to_string("calib_input.json")?;
//! let input: CalibInput = serde_json::from_str(&data)?;
//!
//! let report = run_calibration(&input, &CalibConfig::default())?;
//! println!("Hx = {}", report.solution.hx);
//! println!("Hy = {}", report.solution.hy);
//! # Ok(())
//! # }
//! ```
//!
//! The layers underneath remain available for custom workflows:
//! [`axyb_core`] for the parameter layout, [`axyb_sdp`] for building and
//! solving LMI problems directly.

pub use axyb_calib::{
    run_calibration, synthetic, CalibConfig, CalibError, CalibInput, CalibReport, CalibSolution,
};
pub use axyb_core::{homogeneous, Mat3, Mat4, ParamBlocks, ParamLayout, Real, Vec3};
pub use axyb_sdp::{solve_sdp, Lmi, SdpOptions, SdpProblem, SdpReport};

/// Formulation helpers for building the calibration SDP by hand.
pub mod formulation {
    pub use axyb_calib::formulation::{build_problem, initial_point, residual_bound_lmi};
}
