//! Residual-bound LMI in Schur-complement form.
//!
//! The bound `||R1 * beta - rho1||^2 <= u - ||rho2||^2` is equivalent to
//!
//! ```text
//! [ u - ||rho2||^2   (R1 beta - rho1)^T ]
//! [ R1 beta - rho1          I_m         ]  >=  0
//! ```
//!
//! which is affine in `x = [u, beta]` and therefore a single LMI. Variable
//! positions come from the [`ParamLayout`], never from literal indices.

use crate::input::CalibError;
use axyb_core::{DMat, DVec, ParamLayout, Real};
use axyb_sdp::{Lmi, LmiError, SdpProblem};
use nalgebra::{DMatrix, DVector};

/// Build the Schur-complement LMI for the residual bound.
pub fn residual_bound_lmi(
    r1: &DMat,
    rho1: &DVec,
    rho2_norm_sqr: Real,
    layout: &ParamLayout,
) -> Result<Lmi, LmiError> {
    let m = r1.nrows();
    let dim = m + 1;
    let n = layout.num_vars();

    let mut constant = DMatrix::zeros(dim, dim);
    constant[(0, 0)] = -rho2_norm_sqr;
    for i in 0..m {
        constant[(0, 1 + i)] = -rho1[i];
        constant[(1 + i, 0)] = -rho1[i];
        constant[(1 + i, 1 + i)] = 1.0;
    }

    let mut coeffs = vec![DMatrix::zeros(dim, dim); n];
    coeffs[layout.error][(0, 0)] = 1.0;
    for j in 0..layout.beta_len() {
        let var = layout.var_of_beta(j);
        let col = r1.column(j);
        for i in 0..m {
            coeffs[var][(0, 1 + i)] = col[i];
            coeffs[var][(1 + i, 0)] = col[i];
        }
    }

    Lmi::new(constant, coeffs)
}

/// Assemble the full SDP: minimize `u` subject to the residual LMI.
pub fn build_problem(
    r1: &DMat,
    rho1: &DVec,
    rho2_norm_sqr: Real,
    layout: &ParamLayout,
) -> Result<SdpProblem, CalibError> {
    let lmi = residual_bound_lmi(r1, rho1, rho2_norm_sqr, layout)?;

    let mut objective = DVector::zeros(layout.num_vars());
    objective[layout.error] = 1.0;
    Ok(SdpProblem::new(objective, vec![lmi])?)
}

/// Strictly feasible starting point: `beta = 0` and `u` large enough that the
/// Schur complement stays positive.
pub fn initial_point(rho1: &DVec, rho2_norm_sqr: Real, layout: &ParamLayout) -> DVector<Real> {
    let mut x = DVector::zeros(layout.num_vars());
    x[layout.error] = rho2_norm_sqr + rho1.norm_squared() + 1.0;
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use axyb_core::{ParamBlocks, Real};
    use nalgebra::{Cholesky, Matrix3, Vector3};

    fn layout() -> ParamLayout {
        ParamLayout::default()
    }

    fn sample_blocks(error: Real) -> ParamBlocks {
        ParamBlocks {
            error,
            rx: Matrix3::new(0.9, -0.1, 0.0, 0.1, 0.9, 0.0, 0.0, 0.0, 1.0),
            ry: Matrix3::identity(),
            tx: Vector3::new(0.1, 0.2, -0.3),
            ty: Vector3::new(-0.05, 0.4, 0.0),
        }
    }

    #[test]
    fn lmi_matches_direct_block_evaluation() {
        let layout = layout();
        let r1 = DMat::from_fn(24, 24, |i, j| ((i * 7 + j * 3) % 11) as Real / 11.0);
        let rho1 = DVec::from_fn(24, |i, _| (i as Real) / 10.0 - 1.0);
        let rho2_sqr = 0.42;

        let lmi = residual_bound_lmi(&r1, &rho1, rho2_sqr, &layout).unwrap();
        assert_eq!(lmi.dim(), 25);
        assert_eq!(lmi.num_vars(), layout.num_vars());

        let blocks = sample_blocks(3.5);
        let x = layout.pack(&blocks);
        let f = lmi.eval(&x);

        // Residual from the packed beta slice.
        let beta = x.rows(1, 24).into_owned();
        let residual = &r1 * beta - &rho1;

        assert_relative_eq!(f[(0, 0)], blocks.error - rho2_sqr, epsilon = 1e-12);
        for i in 0..24 {
            assert_relative_eq!(f[(0, 1 + i)], residual[i], epsilon = 1e-12);
            assert_relative_eq!(f[(1 + i, 0)], residual[i], epsilon = 1e-12);
            assert_relative_eq!(f[(1 + i, 1 + i)], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn initial_point_is_strictly_feasible() {
        let layout = layout();
        let r1 = DMat::identity(24, 24);
        let rho1 = DVec::from_element(24, 0.5);
        let rho2_sqr = 2.0;

        let lmi = residual_bound_lmi(&r1, &rho1, rho2_sqr, &layout).unwrap();
        let x0 = initial_point(&rho1, rho2_sqr, &layout);
        assert!(Cholesky::new(lmi.eval(&x0)).is_some());
    }

    #[test]
    fn objective_selects_the_error_variable() {
        let layout = layout();
        let r1 = DMat::identity(24, 24);
        let rho1 = DVec::zeros(24);
        let problem = build_problem(&r1, &rho1, 0.0, &layout).unwrap();
        assert_eq!(problem.objective()[layout.error], 1.0);
        assert_eq!(problem.objective().sum(), 1.0);
    }
}
