//! Offset table for the flat optimization vector.
//!
//! The SDP works on `x = [u, beta]` where `u` is the residual-bound scalar
//! and `beta` packs two 3x3 rotation blocks and two translations:
//!
//! `x = [u | Rx (9, row-major) | Ry (9, row-major) | tx (3) | ty (3)]`
//!
//! This ordering is an external contract inherited from the least-squares
//! stage that produces the regressor `R1`; it must match the column order of
//! `R1` exactly. Everything that needs an index into `x` asks the layout
//! instead of hard-coding positions.

use crate::math::{flatten_row_major, homogeneous, Mat3, Mat4, Real, Vec3};
use nalgebra::DVector;
use thiserror::Error;

/// Number of packed calibration parameters (two 3x3 blocks + two 3-vectors).
pub const NUM_BETA: usize = 24;

/// Total number of optimization variables (`u` + beta).
pub const NUM_VARS: usize = NUM_BETA + 1;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("solution vector has {got} entries, need at least {need}")]
    TooShort { got: usize, need: usize },
}

/// Contiguous slice of the flat vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: usize,
    pub len: usize,
}

impl BlockRange {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub const fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Named offsets of every block inside the flat vector `x`.
///
/// Declared once and threaded through both the LMI construction and the
/// solution unpacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    /// Index of the residual-bound scalar `u` (reported as `err`).
    pub error: usize,
    /// Rotation block of the X transform, row-major.
    pub rx: BlockRange,
    /// Rotation block of the Y transform, row-major.
    pub ry: BlockRange,
    /// Translation of the X transform.
    pub tx: BlockRange,
    /// Translation of the Y transform.
    pub ty: BlockRange,
}

impl Default for ParamLayout {
    fn default() -> Self {
        Self {
            error: 0,
            rx: BlockRange::new(1, 9),
            ry: BlockRange::new(10, 9),
            tx: BlockRange::new(19, 3),
            ty: BlockRange::new(22, 3),
        }
    }
}

impl ParamLayout {
    /// Total number of optimization variables covered by this layout.
    pub fn num_vars(&self) -> usize {
        NUM_VARS
    }

    /// Number of packed beta parameters (everything except `u`).
    pub fn beta_len(&self) -> usize {
        self.rx.len + self.ry.len + self.tx.len + self.ty.len
    }

    /// Map a beta position (a column of `R1`) to its index in `x`.
    ///
    /// Beta positions walk the blocks in declaration order: rx, ry, tx, ty.
    pub fn var_of_beta(&self, beta_idx: usize) -> usize {
        debug_assert!(beta_idx < self.beta_len());
        let mut offset = beta_idx;
        for block in [self.rx, self.ry, self.tx, self.ty] {
            if offset < block.len {
                return block.start + offset;
            }
            offset -= block.len;
        }
        unreachable!("beta index {beta_idx} out of range");
    }

    /// Pack named blocks into a full `x` vector (with `u` in its slot).
    pub fn pack(&self, blocks: &ParamBlocks) -> DVector<Real> {
        let mut x = DVector::zeros(self.num_vars());
        x[self.error] = blocks.error;

        for (flat, range) in [
            (flatten_row_major(&blocks.rx), self.rx),
            (flatten_row_major(&blocks.ry), self.ry),
        ] {
            for (k, v) in flat.iter().enumerate() {
                x[range.start + k] = *v;
            }
        }
        for (vec, range) in [(blocks.tx, self.tx), (blocks.ty, self.ty)] {
            for k in 0..range.len {
                x[range.start + k] = vec[k];
            }
        }
        x
    }

    /// Slice a flat solution vector into named blocks.
    ///
    /// Accepts any vector with at least [`NUM_VARS`] entries; trailing
    /// entries (e.g. solver slack variables) are ignored.
    pub fn unpack(&self, x: &DVector<Real>) -> Result<ParamBlocks, LayoutError> {
        if x.len() < self.num_vars() {
            return Err(LayoutError::TooShort {
                got: x.len(),
                need: self.num_vars(),
            });
        }

        // Row-major reshape of a 9-entry slice.
        let rot = |range: BlockRange| Mat3::from_fn(|r, c| x[range.start + 3 * r + c]);
        let tra = |range: BlockRange| Vec3::new(x[range.start], x[range.start + 1], x[range.start + 2]);

        Ok(ParamBlocks {
            error: x[self.error],
            rx: rot(self.rx),
            ry: rot(self.ry),
            tx: tra(self.tx),
            ty: tra(self.ty),
        })
    }
}

/// Named calibration parameter blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamBlocks {
    pub error: Real,
    pub rx: Mat3,
    pub ry: Mat3,
    pub tx: Vec3,
    pub ty: Vec3,
}

impl ParamBlocks {
    /// Homogeneous transform of the X side (`Hx`).
    pub fn hx(&self) -> Mat4 {
        homogeneous(&self.rx, &self.tx)
    }

    /// Homogeneous transform of the Y side (`Hy`).
    pub fn hy(&self) -> Mat4 {
        homogeneous(&self.ry, &self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_blocks() -> ParamBlocks {
        ParamBlocks {
            error: 0.25,
            rx: Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0),
            ry: Mat3::new(-1.0, 0.5, 0.0, 0.2, -2.0, 1.5, 3.0, 0.1, -0.4),
            tx: Vec3::new(0.1, 0.2, 0.3),
            ty: Vec3::new(-0.5, 0.0, 2.0),
        }
    }

    #[test]
    fn pack_unpack_round_trip() {
        let layout = ParamLayout::default();
        let blocks = sample_blocks();

        let x = layout.pack(&blocks);
        assert_eq!(x.len(), NUM_VARS);

        let back = layout.unpack(&x).unwrap();
        assert_eq!(back.error, blocks.error);
        assert_relative_eq!(back.rx, blocks.rx);
        assert_relative_eq!(back.ry, blocks.ry);
        assert_relative_eq!(back.tx, blocks.tx);
        assert_relative_eq!(back.ty, blocks.ty);
    }

    #[test]
    fn layout_matches_legacy_slicing() {
        // Historic contract: u at 0, Rx in 1..10, Ry in 10..19,
        // tx in 19..22, ty in 22..25.
        let layout = ParamLayout::default();
        assert_eq!(layout.error, 0);
        assert_eq!((layout.rx.start, layout.rx.end()), (1, 10));
        assert_eq!((layout.ry.start, layout.ry.end()), (10, 19));
        assert_eq!((layout.tx.start, layout.tx.end()), (19, 22));
        assert_eq!((layout.ty.start, layout.ty.end()), (22, 25));
    }

    #[test]
    fn var_of_beta_walks_blocks_in_order() {
        let layout = ParamLayout::default();
        for j in 0..layout.beta_len() {
            // Blocks are contiguous after `u`, so beta j lives at x[1 + j].
            assert_eq!(layout.var_of_beta(j), 1 + j);
        }
    }

    #[test]
    fn unpack_ignores_trailing_entries() {
        let layout = ParamLayout::default();
        let blocks = sample_blocks();
        let mut x = layout.pack(&blocks).iter().copied().collect::<Vec<_>>();
        x.extend_from_slice(&[42.0, 7.0]);

        let back = layout.unpack(&DVector::from_vec(x)).unwrap();
        assert_relative_eq!(back.rx, blocks.rx);
        assert_relative_eq!(back.ty, blocks.ty);
    }

    #[test]
    fn unpack_rejects_short_vectors() {
        let layout = ParamLayout::default();
        let x = DVector::zeros(10);
        assert!(matches!(
            layout.unpack(&x),
            Err(LayoutError::TooShort { got: 10, need: 25 })
        ));
    }
}
