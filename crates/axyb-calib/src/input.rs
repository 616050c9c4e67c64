use axyb_core::{LayoutError, Real, NUM_BETA};
use axyb_sdp::{LmiError, SdpError};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalibError {
    #[error("R1 must have {NUM_BETA} columns, got {got}")]
    BadRegressorWidth { got: usize },
    #[error("R1 has no rows")]
    EmptyRegressor,
    #[error("rho1 has {rho1} entries but R1 has {rows} rows")]
    ResidualSizeMismatch { rho1: usize, rows: usize },
    #[error("failed to assemble the residual LMI: {0}")]
    Lmi(#[from] LmiError),
    #[error("sdp solve failed: {0}")]
    Sdp(#[from] SdpError),
    #[error("solution vector is malformed: {0}")]
    Layout(#[from] LayoutError),
}

/// Regression data from the upstream least-squares stage.
///
/// Field names match the array names in the upstream exchange file
/// (`rho1`, `rho2`, `R1`). `rho2` only contributes through its squared norm,
/// which offsets the reported residual bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibInput {
    pub rho1: DVector<Real>,
    pub rho2: DVector<Real>,
    #[serde(rename = "R1")]
    pub r1: DMatrix<Real>,
}

impl CalibInput {
    /// Check the shape contract: `R1` is `m x 24` with `m == rho1.len()`.
    pub fn validate(&self) -> Result<(), CalibError> {
        if self.r1.nrows() == 0 {
            return Err(CalibError::EmptyRegressor);
        }
        if self.r1.ncols() != NUM_BETA {
            return Err(CalibError::BadRegressorWidth {
                got: self.r1.ncols(),
            });
        }
        if self.rho1.len() != self.r1.nrows() {
            return Err(CalibError::ResidualSizeMismatch {
                rho1: self.rho1.len(),
                rows: self.r1.nrows(),
            });
        }
        Ok(())
    }

    /// Squared norm of `rho2`, the constant offset of the residual bound.
    pub fn rho2_norm_sqr(&self) -> Real {
        self.rho2.norm_squared()
    }
}
