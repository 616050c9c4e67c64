//! Synthetic regression data with known ground truth.
//!
//! Builds a well-conditioned regressor `R1` and a right-hand side
//! `rho1 = R1 * beta*` from chosen transforms, so tests can check that the
//! solver recovers `beta*` and that the residual bound lands on
//! `||rho2||^2` (plus the noise floor, when noise is added).

use crate::input::CalibInput;
use axyb_core::{DMat, DVec, ParamBlocks, ParamLayout, Real, Vec3, NUM_BETA};
use nalgebra::Rotation3;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Synthetic input paired with the blocks that generated it.
#[derive(Debug, Clone)]
pub struct SyntheticCalib {
    pub input: CalibInput,
    /// Ground-truth blocks; `error` holds the expected residual bound.
    pub truth: ParamBlocks,
}

/// Strictly diagonally dominant 24x24 regressor.
///
/// Off-diagonal entries are kept small enough that every row and column is
/// dominated by the diagonal, so the matrix is invertible for every seed.
pub fn regressor(seed: u64) -> DMat {
    let mut rng = StdRng::seed_from_u64(seed);
    let spread = 0.4 / (NUM_BETA as Real - 1.0);

    DMat::from_fn(NUM_BETA, NUM_BETA, |i, j| {
        if i == j {
            2.0
        } else {
            rng.gen_range(-spread..spread)
        }
    })
}

/// Flatten ground-truth blocks into the beta ordering the regressor expects.
pub fn beta_of_blocks(layout: &ParamLayout, blocks: &ParamBlocks) -> DVec {
    let x = layout.pack(blocks);
    DVec::from_fn(layout.beta_len(), |j, _| x[layout.var_of_beta(j)])
}

/// Noise-free synthetic calibration problem.
pub fn nominal(seed: u64) -> SyntheticCalib {
    with_noise(seed, 0.0)
}

/// Synthetic calibration problem with uniform noise of half-width `noise`
/// added to `rho1`.
pub fn with_noise(seed: u64, noise: Real) -> SyntheticCalib {
    let layout = ParamLayout::default();
    let rho2 = DVec::from_vec(vec![0.3, -0.1, 0.2]);

    let mut truth = ParamBlocks {
        error: rho2.norm_squared(),
        rx: Rotation3::from_euler_angles(0.2, -0.4, 0.1).into_inner(),
        ry: Rotation3::from_euler_angles(-0.3, 0.15, 0.5).into_inner(),
        tx: Vec3::new(0.12, -0.05, 0.33),
        ty: Vec3::new(-0.21, 0.08, 0.1),
    };

    let r1 = regressor(seed);
    let beta = beta_of_blocks(&layout, &truth);
    let mut rho1 = &r1 * beta;

    if noise > 0.0 {
        // Separate stream so the regressor is identical with and without noise.
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        for v in rho1.iter_mut() {
            *v += rng.gen_range(-noise..noise);
        }
        // The achievable residual is no longer exactly zero.
        truth.error = Real::NAN;
    }

    SyntheticCalib {
        input: CalibInput { rho1, rho2, r1 },
        truth,
    }
}
