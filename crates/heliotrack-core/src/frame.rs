//! Rigid placement of one coordinate frame relative to a parent frame.
//!
//! [`Frame`] wraps an [`Isometry3`] and exposes exactly the operations the
//! tracking core needs: construction from an explicit 4×4 row-major matrix
//! or from revolute-joint parameters, composition, and point/direction
//! transformation.  Composition is non-commutative; `a * b` applies `b`
//! in `a`'s frame (parent → child chaining).

use nalgebra::{
    Isometry3, Matrix3, Point3, Translation3, UnitQuaternion, UnitVector3, Vector3,
};

use crate::error::GeometryError;

/// Tolerance on the bottom row and rotation-block orthonormality when
/// accepting an explicit matrix.
const RIGID_TOL: f64 = 1e-9;

/// Position + orientation of a frame relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    iso: Isometry3<f64>,
}

impl Frame {
    /// The identity placement.
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    /// Pure translation.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            iso: Isometry3::translation(x, y, z),
        }
    }

    /// Placement of a revolute joint: rotation by `angle` (radians) about
    /// `axis`, then translation by `shift` into the parent frame.
    pub fn joint(shift: &Vector3<f64>, axis: &UnitVector3<f64>, angle: f64) -> Self {
        Self {
            iso: Isometry3::from_parts(
                Translation3::from(*shift),
                UnitQuaternion::from_axis_angle(axis, angle),
            ),
        }
    }

    /// Build a placement from an explicit 4×4 row-major matrix.
    ///
    /// # Errors
    ///
    /// [`GeometryError::NonAffineMatrix`] if the bottom row is not
    /// `[0, 0, 0, 1]`, and [`GeometryError::NonRigidRotation`] if the 3×3
    /// rotation block is not orthonormal within tolerance.
    pub fn from_matrix_rows(rows: [[f64; 4]; 4]) -> Result<Self, GeometryError> {
        let bottom = rows[3];
        if bottom[0].abs() > RIGID_TOL
            || bottom[1].abs() > RIGID_TOL
            || bottom[2].abs() > RIGID_TOL
            || (bottom[3] - 1.0).abs() > RIGID_TOL
        {
            return Err(GeometryError::NonAffineMatrix);
        }

        #[rustfmt::skip]
        let rot = Matrix3::new(
            rows[0][0], rows[0][1], rows[0][2],
            rows[1][0], rows[1][1], rows[1][2],
            rows[2][0], rows[2][1], rows[2][2],
        );

        let deviation = (rot * rot.transpose() - Matrix3::identity()).abs().max();
        if deviation > 1e-6 {
            return Err(GeometryError::NonRigidRotation { deviation });
        }

        let rotation = UnitQuaternion::from_matrix(&rot);
        let translation = Translation3::new(rows[0][3], rows[1][3], rows[2][3]);
        Ok(Self {
            iso: Isometry3::from_parts(translation, rotation),
        })
    }

    /// The inverse placement (child → parent).
    pub fn inverse(&self) -> Self {
        Self {
            iso: self.iso.inverse(),
        }
    }

    /// Apply the full affine transform to a point.
    pub fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.iso.transform_point(p)
    }

    /// Apply only the rotation part to a direction and re-normalize.
    pub fn transform_direction(&self, v: &Vector3<f64>) -> Vector3<f64> {
        (self.iso.rotation * v).normalize()
    }

    /// The underlying isometry.
    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.iso
    }
}

impl std::ops::Mul for Frame {
    type Output = Frame;

    fn mul(self, rhs: Frame) -> Frame {
        Frame {
            iso: self.iso * rhs.iso,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn unit_z() -> UnitVector3<f64> {
        UnitVector3::new_normalize(Vector3::z())
    }

    #[test]
    fn translation_moves_points_not_directions() {
        let t = Frame::translation(1.0, 2.0, 3.0);
        let p = t.transform_point(&Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-12);

        let v = t.transform_direction(&Vector3::x());
        assert_relative_eq!(v.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn joint_rotates_then_translates() {
        // Rotate 90 deg about Z, then shift +2 along X.
        let f = Frame::joint(&Vector3::new(2.0, 0.0, 0.0), &unit_z(), FRAC_PI_2);
        let p = f.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn compose_is_parent_child_order() {
        let a = Frame::translation(1.0, 0.0, 0.0);
        let b = Frame::joint(&Vector3::zeros(), &unit_z(), FRAC_PI_2);

        // a * b: rotate in b's frame, then shift by a.
        let p = (a * b).transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);

        // b * a: shift first, then rotate the shifted point.
        let q = (b * a).transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(q.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_round_trips_points() {
        let f = Frame::joint(&Vector3::new(0.3, -0.2, 1.1), &unit_z(), 0.7);
        let p = Point3::new(0.5, 0.4, -0.9);
        let back = f.inverse().transform_point(&f.transform_point(&p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-12);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-12);
    }

    #[test]
    fn from_matrix_rows_accepts_rigid_placement() {
        // 90 deg about Z with a translation.
        let f = Frame::from_matrix_rows([
            [0.0, -1.0, 0.0, 1.0],
            [1.0, 0.0, 0.0, 2.0],
            [0.0, 0.0, 1.0, 3.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();
        let p = f.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn from_matrix_rows_rejects_bad_bottom_row() {
        let err = Frame::from_matrix_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.1, 1.0],
        ])
        .unwrap_err();
        assert_eq!(err, GeometryError::NonAffineMatrix);
    }

    #[test]
    fn from_matrix_rows_rejects_scaled_rotation() {
        let err = Frame::from_matrix_rows([
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap_err();
        assert!(matches!(err, GeometryError::NonRigidRotation { .. }));
    }

    #[test]
    fn transform_direction_ignores_translation_and_normalizes() {
        let f = Frame::translation(5.0, 5.0, 5.0);
        let v = f.transform_direction(&Vector3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-12);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn frame_is_send_sync() {
        assert_send_sync::<Frame>();
    }
}
