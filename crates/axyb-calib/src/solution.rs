use axyb_core::{LayoutError, Mat4, ParamBlocks, ParamLayout, Real};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Calibration result: residual bound and both homogeneous transforms.
///
/// JSON keys (`err`, `Hx`, `Hy`) match the downstream consumers' contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibSolution {
    #[serde(rename = "err")]
    pub error: Real,
    #[serde(rename = "Hx")]
    pub hx: Mat4,
    #[serde(rename = "Hy")]
    pub hy: Mat4,
}

impl CalibSolution {
    pub fn from_blocks(blocks: &ParamBlocks) -> Self {
        Self {
            error: blocks.error,
            hx: blocks.hx(),
            hy: blocks.hy(),
        }
    }

    /// Unpack a flat solver output vector (length >= 25) via the layout.
    pub fn from_solution_vector(
        x: &DVector<Real>,
        layout: &ParamLayout,
    ) -> Result<Self, LayoutError> {
        Ok(Self::from_blocks(&layout.unpack(x)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axyb_core::NUM_VARS;

    #[test]
    fn transforms_are_homogeneous_for_any_long_enough_vector() {
        let layout = ParamLayout::default();
        let x = DVector::from_fn(NUM_VARS + 5, |i, _| (i as Real) * 0.37 - 2.0);

        let sol = CalibSolution::from_solution_vector(&x, &layout).unwrap();
        for h in [&sol.hx, &sol.hy] {
            assert_eq!(h.nrows(), 4);
            assert_eq!(h.ncols(), 4);
            assert_eq!(h[(3, 0)], 0.0);
            assert_eq!(h[(3, 1)], 0.0);
            assert_eq!(h[(3, 2)], 0.0);
            assert_eq!(h[(3, 3)], 1.0);
        }
    }

    #[test]
    fn rotation_blocks_are_sliced_row_major() {
        let layout = ParamLayout::default();
        let mut x = DVector::zeros(NUM_VARS);
        // Rx slice gets 1..=9; row-major means the first row is (1, 2, 3).
        for k in 0..9 {
            x[layout.rx.start + k] = (k + 1) as Real;
        }

        let sol = CalibSolution::from_solution_vector(&x, &layout).unwrap();
        assert_eq!(sol.hx[(0, 0)], 1.0);
        assert_eq!(sol.hx[(0, 1)], 2.0);
        assert_eq!(sol.hx[(0, 2)], 3.0);
        assert_eq!(sol.hx[(1, 0)], 4.0);
        assert_eq!(sol.hx[(2, 2)], 9.0);
    }

    #[test]
    fn too_short_vector_is_an_error() {
        let layout = ParamLayout::default();
        let x = DVector::zeros(12);
        assert!(CalibSolution::from_solution_vector(&x, &layout).is_err());
    }

    #[test]
    fn json_round_trip_is_bit_exact() {
        // Values like 0.1 have no finite binary expansion; parsing the
        // written text must still restore the exact solver output.
        let layout = ParamLayout::default();
        let x = DVector::from_fn(NUM_VARS, |i, _| 0.1 + (i as Real) * 0.9027010963754604);

        let sol = CalibSolution::from_solution_vector(&x, &layout).unwrap();
        let json = serde_json::to_string_pretty(&sol).unwrap();
        let back: CalibSolution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sol);
    }

    #[test]
    fn json_uses_contract_output_keys() {
        let layout = ParamLayout::default();
        let x = DVector::zeros(NUM_VARS);
        let sol = CalibSolution::from_solution_vector(&x, &layout).unwrap();

        let json = serde_json::to_string(&sol).unwrap();
        assert!(json.contains("\"err\""));
        assert!(json.contains("\"Hx\""));
        assert!(json.contains("\"Hy\""));

        let back: CalibSolution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sol);
    }
}
