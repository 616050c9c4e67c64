use nalgebra::{DMatrix, DVector, Isometry3, Matrix3, Matrix4, Vector3};

pub type Real = f64;

pub type Vec3 = Vector3<Real>;
pub type Mat3 = Matrix3<Real>;
pub type Mat4 = Matrix4<Real>;
pub type Iso3 = Isometry3<Real>;

pub type DVec = DVector<Real>;
pub type DMat = DMatrix<Real>;

/// Assemble a 4x4 homogeneous transform from a rotation block and a
/// translation column. The bottom row is always `[0, 0, 0, 1]`.
pub fn homogeneous(rot: &Mat3, tra: &Vec3) -> Mat4 {
    let mut h = Mat4::identity();
    h.fixed_view_mut::<3, 3>(0, 0).copy_from(rot);
    h.fixed_view_mut::<3, 1>(0, 3).copy_from(tra);
    h
}

/// Flatten a 3x3 matrix in row-major order.
pub fn flatten_row_major(m: &Mat3) -> [Real; 9] {
    let mut out = [0.0; 9];
    for r in 0..3 {
        for c in 0..3 {
            out[3 * r + c] = m[(r, c)];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn homogeneous_has_unit_bottom_row() {
        let rot = Mat3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let tra = Vec3::new(0.1, -0.2, 0.3);
        let h = homogeneous(&rot, &tra);

        for c in 0..3 {
            assert_eq!(h[(3, c)], 0.0);
        }
        assert_eq!(h[(3, 3)], 1.0);
        assert_relative_eq!(h.fixed_view::<3, 3>(0, 0).into_owned(), rot);
        assert_relative_eq!(h.fixed_view::<3, 1>(0, 3).into_owned(), tra);
    }

    #[test]
    fn flatten_is_row_major() {
        let m = Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        let flat = flatten_row_major(&m);
        assert_eq!(flat, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }
}
