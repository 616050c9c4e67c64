//! Log-det barrier interior-point method for dense SDPs.
//!
//! Minimizes `c . x` subject to every [`Lmi`] in the problem being positive
//! semidefinite. Centering uses damped Newton steps with a backtracking line
//! search that keeps every constraint block positive definite (checked by
//! Cholesky). A phase-I search with an identity slack variable produces a
//! strictly feasible start when the caller cannot provide one.

use axyb_core::Real;
use log::debug;
use nalgebra::{Cholesky, DMatrix, DVector, Dyn, SymmetricEigen};
use thiserror::Error;

use crate::lmi::{Lmi, LmiError};

#[derive(Debug, Error)]
pub enum SdpError {
    #[error("problem has no LMI constraints")]
    NoConstraints,
    #[error("objective has {objective} coefficients but LMI {index} spans {lmi} variables")]
    VariableCountMismatch {
        index: usize,
        objective: usize,
        lmi: usize,
    },
    #[error("initial point has {got} entries, problem has {need} variables")]
    InitialPointSize { got: usize, need: usize },
    #[error("no strictly feasible point exists (phase-I slack {slack:.3e})")]
    Infeasible { slack: Real },
    #[error("factorization failed while computing a Newton step")]
    NumericalFailure,
    #[error(transparent)]
    Lmi(#[from] LmiError),
}

/// Linear objective plus a list of LMI constraints.
#[derive(Debug, Clone)]
pub struct SdpProblem {
    objective: DVector<Real>,
    lmis: Vec<Lmi>,
}

impl SdpProblem {
    pub fn new(objective: DVector<Real>, lmis: Vec<Lmi>) -> Result<Self, SdpError> {
        if lmis.is_empty() {
            return Err(SdpError::NoConstraints);
        }
        for (index, lmi) in lmis.iter().enumerate() {
            if lmi.num_vars() != objective.len() {
                return Err(SdpError::VariableCountMismatch {
                    index,
                    objective: objective.len(),
                    lmi: lmi.num_vars(),
                });
            }
        }
        Ok(Self { objective, lmis })
    }

    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    pub fn objective(&self) -> &DVector<Real> {
        &self.objective
    }

    pub fn lmis(&self) -> &[Lmi] {
        &self.lmis
    }
}

/// Barrier solver options.
#[derive(Debug, Clone)]
pub struct SdpOptions {
    /// Initial barrier parameter.
    pub t_init: Real,
    /// Barrier parameter growth factor per outer iteration.
    pub mu: Real,
    /// Target duality-gap bound (`total block dim / t`).
    pub gap_tol: Real,
    /// Newton decrement threshold (`lambda^2 / 2`) ending a centering run.
    pub newton_tol: Real,
    /// Maximum Newton iterations per centering run.
    pub max_newton_iters: usize,
    /// Maximum outer (barrier update) iterations.
    pub max_outer_iters: usize,
    /// Minimum eigenvalue margin required of a strictly feasible point.
    pub feasibility_margin: Real,
}

impl Default for SdpOptions {
    fn default() -> Self {
        Self {
            t_init: 1.0,
            mu: 10.0,
            gap_tol: 1e-7,
            newton_tol: 1e-10,
            max_newton_iters: 60,
            max_outer_iters: 60,
            feasibility_margin: 1e-9,
        }
    }
}

/// Outcome statistics of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SdpReport {
    /// Total Newton iterations across all centering runs.
    pub iterations: usize,
    /// Objective value at the returned point.
    pub objective: Real,
    /// Final duality-gap bound.
    pub gap: Real,
    /// Whether the gap tolerance was reached.
    pub converged: bool,
}

/// Minimize the problem objective subject to all LMIs being PSD.
///
/// `x0`, when given, is used as the starting point if it is strictly
/// feasible; otherwise a phase-I search runs first.
pub fn solve_sdp(
    problem: &SdpProblem,
    x0: Option<DVector<Real>>,
    opts: &SdpOptions,
) -> Result<(DVector<Real>, SdpReport), SdpError> {
    let n = problem.num_vars();
    if let Some(x0) = &x0 {
        if x0.len() != n {
            return Err(SdpError::InitialPointSize {
                got: x0.len(),
                need: n,
            });
        }
    }

    let start = match x0.filter(|x| cholesky_all(problem.lmis(), x).is_some()) {
        Some(x) => x,
        None => phase_one(problem, opts)?,
    };

    barrier_minimize(problem.lmis(), problem.objective(), start, opts, |_| false)
}

/// Find a strictly feasible point by minimizing an identity slack.
fn phase_one(problem: &SdpProblem, opts: &SdpOptions) -> Result<DVector<Real>, SdpError> {
    let n = problem.num_vars();
    let base = DVector::zeros(n);

    let mut worst = Real::INFINITY;
    for lmi in problem.lmis() {
        let eigs = SymmetricEigen::new(lmi.eval(&base)).eigenvalues;
        worst = worst.min(eigs.min());
    }
    if worst > opts.feasibility_margin {
        return Ok(base);
    }

    let mut aug: Vec<Lmi> = problem.lmis().iter().map(Lmi::with_identity_slack).collect();

    // Keep the phase-I objective bounded: s >= -scale as a 1x1 block.
    let scale = 1.0 - worst;
    let mut bound_coeffs = vec![DMatrix::zeros(1, 1); n + 1];
    bound_coeffs[n] = DMatrix::from_element(1, 1, 1.0);
    aug.push(Lmi::new(DMatrix::from_element(1, 1, scale), bound_coeffs)?);

    let mut c = DVector::zeros(n + 1);
    c[n] = 1.0;
    let mut x = DVector::zeros(n + 1);
    x[n] = scale;

    debug!("phase I: initial slack {:.3e}", x[n]);
    let margin = opts.feasibility_margin;
    let (x, _) = barrier_minimize(&aug, &c, x, opts, |x| x[x.len() - 1] < -margin)?;

    let slack = x[n];
    if slack >= 0.0 {
        return Err(SdpError::Infeasible { slack });
    }
    Ok(x.rows(0, n).into_owned())
}

/// Outer barrier loop: center, test the gap, sharpen `t`.
///
/// `stop_early` is consulted after every centering run; phase I uses it to
/// bail out as soon as the slack turns negative.
fn barrier_minimize(
    lmis: &[Lmi],
    c: &DVector<Real>,
    mut x: DVector<Real>,
    opts: &SdpOptions,
    mut stop_early: impl FnMut(&DVector<Real>) -> bool,
) -> Result<(DVector<Real>, SdpReport), SdpError> {
    let m_total: usize = lmis.iter().map(Lmi::dim).sum();
    let mut t = opts.t_init;
    let mut iterations = 0;
    let mut gap = m_total as Real / t;
    let mut converged = false;

    for outer in 0..opts.max_outer_iters {
        iterations += center(lmis, c, &mut x, t, opts)?;
        gap = m_total as Real / t;
        debug!(
            "barrier outer {}: t={:.3e} gap={:.3e} objective={:.6e}",
            outer,
            t,
            gap,
            c.dot(&x)
        );

        if stop_early(&x) {
            converged = true;
            break;
        }
        if gap <= opts.gap_tol {
            converged = true;
            break;
        }
        t *= opts.mu;
    }

    let report = SdpReport {
        iterations,
        objective: c.dot(&x),
        gap,
        converged,
    };
    Ok((x, report))
}

/// Damped Newton iterations for a fixed barrier parameter.
fn center(
    lmis: &[Lmi],
    c: &DVector<Real>,
    x: &mut DVector<Real>,
    t: Real,
    opts: &SdpOptions,
) -> Result<usize, SdpError> {
    let mut iters = 0;

    for _ in 0..opts.max_newton_iters {
        let (grad, hess) = gradient_hessian(lmis, c, x, t)?;
        let dir = newton_direction(&hess, &grad)?;
        let lambda2 = -grad.dot(&dir);
        if !(lambda2 > 2.0 * opts.newton_tol) {
            break;
        }

        let chols = cholesky_all(lmis, x).ok_or(SdpError::NumericalFailure)?;
        let phi0 = barrier_value(t, c, x, &chols);
        match line_search(lmis, c, x, &dir, &grad, t, phi0) {
            Some(next) => {
                *x = next;
                iters += 1;
            }
            None => break,
        }
    }

    Ok(iters)
}

/// Gradient and Hessian of `t * c.x - sum_k log det F_k(x)`.
///
/// Per block, with `F = L L^T`, uses `G_i = L^-1 F_i L^-T` so that the
/// gradient contribution is `-tr(G_i)` and the Hessian one is `tr(G_i G_j)`.
fn gradient_hessian(
    lmis: &[Lmi],
    c: &DVector<Real>,
    x: &DVector<Real>,
    t: Real,
) -> Result<(DVector<Real>, DMatrix<Real>), SdpError> {
    let n = x.len();
    let mut grad = c * t;
    let mut hess = DMatrix::<Real>::zeros(n, n);

    for lmi in lmis {
        let chol = Cholesky::new(lmi.eval(x)).ok_or(SdpError::NumericalFailure)?;
        let l = chol.l();

        let mut gs: Vec<DMatrix<Real>> = Vec::with_capacity(n);
        for i in 0..n {
            let half = l
                .solve_lower_triangular(lmi.coeff(i))
                .ok_or(SdpError::NumericalFailure)?;
            let g = l
                .solve_lower_triangular(&half.transpose())
                .ok_or(SdpError::NumericalFailure)?
                .transpose();
            grad[i] -= g.trace();
            gs.push(g);
        }

        // G_i is symmetric, so tr(G_i G_j) is the elementwise product sum.
        for i in 0..n {
            for j in i..n {
                let v = gs[i].component_mul(&gs[j]).sum();
                hess[(i, j)] += v;
                if i != j {
                    hess[(j, i)] += v;
                }
            }
        }
    }

    Ok((grad, hess))
}

/// Solve `H d = -g`, adding a diagonal ridge if the factorization fails.
fn newton_direction(
    hess: &DMatrix<Real>,
    grad: &DVector<Real>,
) -> Result<DVector<Real>, SdpError> {
    if let Some(chol) = Cholesky::new(hess.clone()) {
        return Ok(-chol.solve(grad));
    }

    let scale = 1.0 + hess.diagonal().amax();
    let mut ridge = 1e-12 * scale;
    for _ in 0..8 {
        let mut damped = hess.clone();
        for i in 0..damped.nrows() {
            damped[(i, i)] += ridge;
        }
        if let Some(chol) = Cholesky::new(damped) {
            return Ok(-chol.solve(grad));
        }
        ridge *= 10.0;
    }
    Err(SdpError::NumericalFailure)
}

/// Backtracking line search keeping every block positive definite and
/// enforcing an Armijo decrease of the barrier objective.
fn line_search(
    lmis: &[Lmi],
    c: &DVector<Real>,
    x: &DVector<Real>,
    dir: &DVector<Real>,
    grad: &DVector<Real>,
    t: Real,
    phi0: Real,
) -> Option<DVector<Real>> {
    let slope = grad.dot(dir);
    let mut alpha: Real = 1.0;

    for _ in 0..60 {
        let cand = x + dir * alpha;
        if let Some(chols) = cholesky_all(lmis, &cand) {
            let phi = barrier_value(t, c, &cand, &chols);
            if phi <= phi0 + 0.25 * alpha * slope {
                return Some(cand);
            }
        }
        alpha *= 0.5;
    }
    None
}

fn cholesky_all(lmis: &[Lmi], x: &DVector<Real>) -> Option<Vec<Cholesky<Real, Dyn>>> {
    lmis.iter().map(|lmi| Cholesky::new(lmi.eval(x))).collect()
}

fn log_det(chol: &Cholesky<Real, Dyn>) -> Real {
    2.0 * chol.l().diagonal().iter().map(|d| d.ln()).sum::<Real>()
}

fn barrier_value(
    t: Real,
    c: &DVector<Real>,
    x: &DVector<Real>,
    chols: &[Cholesky<Real, Dyn>],
) -> Real {
    t * c.dot(x) - chols.iter().map(log_det).sum::<Real>()
}
