use axyb_core::Real;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Relative tolerance used when checking that input matrices are symmetric.
const SYMMETRY_TOL: Real = 1e-9;

#[derive(Debug, Error)]
pub enum LmiError {
    #[error("constant block is {rows}x{cols}, expected a square matrix")]
    NotSquare { rows: usize, cols: usize },
    #[error("coefficient {index} is {rows}x{cols}, expected {dim}x{dim}")]
    CoeffShape {
        index: usize,
        rows: usize,
        cols: usize,
        dim: usize,
    },
    #[error("constant block is not symmetric")]
    AsymmetricConstant,
    #[error("coefficient {index} is not symmetric")]
    AsymmetricCoeff { index: usize },
}

/// Linear matrix inequality `F(x) = F0 + sum_i x_i * F_i >= 0` in
/// matrix-coefficient form.
///
/// All blocks are symmetric and share one dimension; the coefficient count
/// fixes the number of optimization variables the constraint spans.
#[derive(Debug, Clone)]
pub struct Lmi {
    constant: DMatrix<Real>,
    coeffs: Vec<DMatrix<Real>>,
}

fn is_symmetric(m: &DMatrix<Real>) -> bool {
    let scale = m.amax().max(1.0);
    for r in 0..m.nrows() {
        for c in (r + 1)..m.ncols() {
            if (m[(r, c)] - m[(c, r)]).abs() > SYMMETRY_TOL * scale {
                return false;
            }
        }
    }
    true
}

impl Lmi {
    /// Build an LMI from its constant block and per-variable coefficients.
    pub fn new(constant: DMatrix<Real>, coeffs: Vec<DMatrix<Real>>) -> Result<Self, LmiError> {
        let dim = constant.nrows();
        if constant.ncols() != dim {
            return Err(LmiError::NotSquare {
                rows: constant.nrows(),
                cols: constant.ncols(),
            });
        }
        if !is_symmetric(&constant) {
            return Err(LmiError::AsymmetricConstant);
        }

        for (index, coeff) in coeffs.iter().enumerate() {
            if coeff.nrows() != dim || coeff.ncols() != dim {
                return Err(LmiError::CoeffShape {
                    index,
                    rows: coeff.nrows(),
                    cols: coeff.ncols(),
                    dim,
                });
            }
            if !is_symmetric(coeff) {
                return Err(LmiError::AsymmetricCoeff { index });
            }
        }

        Ok(Self { constant, coeffs })
    }

    /// Side length of the constraint blocks.
    pub fn dim(&self) -> usize {
        self.constant.nrows()
    }

    /// Number of optimization variables this constraint spans.
    pub fn num_vars(&self) -> usize {
        self.coeffs.len()
    }

    pub fn constant(&self) -> &DMatrix<Real> {
        &self.constant
    }

    pub fn coeff(&self, i: usize) -> &DMatrix<Real> {
        &self.coeffs[i]
    }

    /// Evaluate `F(x)`.
    pub fn eval(&self, x: &DVector<Real>) -> DMatrix<Real> {
        debug_assert_eq!(x.len(), self.num_vars());
        let mut f = self.constant.clone();
        for (coeff, xi) in self.coeffs.iter().zip(x.iter()) {
            if *xi != 0.0 {
                f += coeff * *xi;
            }
        }
        f
    }

    /// Extend the constraint with one extra slack variable whose coefficient
    /// is the identity, turning `F(x) >= 0` into `F(x) + s*I >= 0`.
    ///
    /// Used by the phase-I feasibility search.
    pub(crate) fn with_identity_slack(&self) -> Self {
        let mut coeffs = self.coeffs.clone();
        coeffs.push(DMatrix::identity(self.dim(), self.dim()));
        Self {
            constant: self.constant.clone(),
            coeffs,
        }
    }
}
