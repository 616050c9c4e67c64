//! Linear matrix inequalities and a small dense semidefinite-programming
//! solver.
//!
//! An [`Lmi`] is an affine symmetric matrix `F(x) = F0 + sum_i x_i * F_i`
//! constrained to be positive semidefinite. An [`SdpProblem`] minimizes a
//! linear objective `c . x` subject to a list of such constraints, which is
//! the standard matrix-coefficient form consumed by interior-point SDP
//! solvers.
//!
//! [`solve_sdp`] implements a log-det barrier method with damped Newton
//! centering steps and a phase-I feasibility search. It targets small dense
//! problems (tens of variables, blocks of a few dozen rows), which is the
//! regime of the calibration workloads in this workspace.

/// Affine symmetric matrix constraints.
pub mod lmi;

/// Barrier interior-point solver.
pub mod solver;

pub use lmi::{Lmi, LmiError};
pub use solver::{solve_sdp, SdpError, SdpOptions, SdpProblem, SdpReport};
