//! End-to-end calibration: validate, formulate, solve, unpack.

use crate::formulation::{build_problem, initial_point};
use crate::input::{CalibError, CalibInput};
use crate::solution::CalibSolution;
use axyb_core::{ParamLayout, Real};
use axyb_sdp::{solve_sdp, SdpOptions};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// User-facing calibration options mapped onto the SDP solver settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalibConfig {
    /// Target duality-gap bound (if `None`, use solver default).
    pub gap_tol: Option<Real>,
    /// Maximum Newton iterations per centering run.
    pub max_newton_iters: Option<usize>,
    /// Maximum outer barrier iterations.
    pub max_outer_iters: Option<usize>,
}

impl CalibConfig {
    fn to_sdp_options(&self) -> SdpOptions {
        let mut opts = SdpOptions::default();
        if let Some(v) = self.gap_tol {
            opts.gap_tol = v;
        }
        if let Some(v) = self.max_newton_iters {
            opts.max_newton_iters = v;
        }
        if let Some(v) = self.max_outer_iters {
            opts.max_outer_iters = v;
        }
        opts
    }
}

/// Calibration output with solver statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibReport {
    pub solution: CalibSolution,
    /// Total Newton iterations spent by the solver.
    pub iterations: usize,
    /// Final duality-gap bound.
    pub gap: Real,
    pub converged: bool,
}

/// Run the full calibration on validated regression data.
pub fn run_calibration(
    input: &CalibInput,
    config: &CalibConfig,
) -> Result<CalibReport, CalibError> {
    input.validate()?;

    let layout = ParamLayout::default();
    let rho2_sqr = input.rho2_norm_sqr();
    debug!(
        "calibration: m={} residual rows, |rho2|^2={:.6e}",
        input.r1.nrows(),
        rho2_sqr
    );

    let problem = build_problem(&input.r1, &input.rho1, rho2_sqr, &layout)?;
    let x0 = initial_point(&input.rho1, rho2_sqr, &layout);

    let (x, report) = solve_sdp(&problem, Some(x0), &config.to_sdp_options())?;
    info!(
        "calibration solved: bound={:.6e} iterations={} converged={}",
        report.objective, report.iterations, report.converged
    );

    let solution = CalibSolution::from_solution_vector(&x, &layout)?;
    Ok(CalibReport {
        solution,
        iterations: report.iterations,
        gap: report.gap,
        converged: report.converged,
    })
}
