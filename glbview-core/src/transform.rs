/// 4x4 homogeneous transforms: composition, rotation, projection and view
use nalgebra::{Matrix4 as NMatrix4, Point3, Quaternion, Rotation3, Unit, UnitQuaternion, Vector3};

use crate::error::MathError;
use crate::vector;

/// Column-major 4x4 matrix. Always a valid homogeneous transform;
/// construction yields the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    m: NMatrix4<f32>,
}

impl Matrix4 {
    pub fn new() -> Self {
        Self {
            m: NMatrix4::identity(),
        }
    }

    /// Reset to the identity
    pub fn identity(&mut self) -> &mut Self {
        self.m = NMatrix4::identity();
        self
    }

    /// Right-multiply by the rotation of `angle` radians about the axis
    /// `(x, y, z)`. The axis does not need to be normalized.
    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) -> Result<&mut Self, MathError> {
        let axis = Unit::try_new(Vector3::new(x, y, z), f32::EPSILON).ok_or(MathError::ZeroLength)?;
        let rotation = Rotation3::from_axis_angle(&axis, angle);
        self.m *= rotation.to_homogeneous();
        Ok(self)
    }

    /// Right-multiply by the rotation described by the quaternion
    /// `(x, y, z, w)`. Slightly denormalized input is renormalized.
    pub fn rotate_with_quaternion(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        w: f32,
    ) -> Result<&mut Self, MathError> {
        let q = Quaternion::new(w, x, y, z);
        let norm = q.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(MathError::ZeroLength);
        }
        self.m *= UnitQuaternion::from_quaternion(q).to_homogeneous();
        Ok(self)
    }

    /// Right-handed perspective projection with a vertical field of view in
    /// degrees, mapping depth to the OpenGL `[-1, 1]` clip range.
    pub fn perspective(
        fov_y_degrees: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Self, MathError> {
        let invalid = |reason: &str| MathError::InvalidProjection {
            reason: reason.to_string(),
        };
        if !(fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
            return Err(invalid("field of view must be within (0, 180) degrees"));
        }
        if !(aspect > 0.0) || !aspect.is_finite() {
            return Err(invalid("aspect ratio must be positive"));
        }
        if !(z_near > 0.0) || !z_far.is_finite() || z_near >= z_far {
            return Err(invalid("expected 0 < zNear < zFar"));
        }

        Ok(Self {
            m: NMatrix4::new_perspective(aspect, fov_y_degrees.to_radians(), z_near, z_far),
        })
    }

    /// View matrix for a camera at `eye` looking at `center`.
    ///
    /// Keeping `up` away from the view direction is the caller's job; a
    /// parallel pair is reported rather than producing an undefined
    /// orientation.
    pub fn look_at(
        eye: &vector::Vector3,
        center: &vector::Vector3,
        up: &vector::Vector3,
    ) -> Result<Self, MathError> {
        let eye = *eye.as_nalgebra();
        let center = *center.as_nalgebra();
        let up = *up.as_nalgebra();

        let direction = center - eye;
        let length = direction.norm();
        if length == 0.0 || !length.is_finite() {
            return Err(MathError::DegenerateView);
        }
        let up_length = up.norm();
        if up_length == 0.0 || direction.cross(&up).norm() <= f32::EPSILON * length * up_length {
            return Err(MathError::ParallelUp);
        }

        Ok(Self {
            m: NMatrix4::look_at_rh(&Point3::from(eye), &Point3::from(center), &up),
        })
    }

    /// `self = self * other`
    pub fn multiply_right(&mut self, other: &Matrix4) -> &mut Self {
        self.m *= other.m;
        self
    }

    /// Apply to a direction (w = 0)
    pub fn transform_vector(&self, v: &Vector3<f32>) -> Vector3<f32> {
        self.m.transform_vector(v)
    }

    pub fn inner(&self) -> &NMatrix4<f32> {
        &self.m
    }

    /// The 16 elements in column-major order, ready for upload
    pub fn as_slice(&self) -> &[f32] {
        self.m.as_slice()
    }

    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.m.as_slice());
        out
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::new()
    }
}

impl From<NMatrix4<f32>> for Matrix4 {
    fn from(m: NMatrix4<f32>) -> Self {
        Self { m }
    }
}

impl std::ops::Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        Matrix4 { m: self.m * rhs.m }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3 as V3;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn assert_close(a: &Matrix4, b: &Matrix4) {
        assert!((a.inner() - b.inner()).norm() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(*Matrix4::default().inner(), NMatrix4::identity());
    }

    #[test]
    fn test_identity_resets() {
        let mut m = Matrix4::new();
        m.rotate(1.0, 1.0, 1.0, 0.0).unwrap();
        m.identity();
        assert_eq!(m, Matrix4::new());
    }

    #[test]
    fn test_rotate_normalizes_axis() {
        let mut a = Matrix4::new();
        a.rotate(0.7, 0.0, 5.0, 0.0).unwrap();
        let mut b = Matrix4::new();
        b.rotate(0.7, 0.0, 1.0, 0.0).unwrap();
        assert_close(&a, &b);
    }

    #[test]
    fn test_rotate_zero_axis_fails() {
        let mut m = Matrix4::new();
        assert_eq!(m.rotate(1.0, 0.0, 0.0, 0.0).err(), Some(MathError::ZeroLength));
    }

    #[test]
    fn test_rotate_composes_on_the_right() {
        // Rx then Ry applied to a vector is Ry(Rx(v)) only when built as Ry * Rx.
        let mut m = Matrix4::new();
        m.rotate(FRAC_PI_2, 0.0, 1.0, 0.0).unwrap();
        m.rotate(FRAC_PI_2, 1.0, 0.0, 0.0).unwrap();

        let v = m.transform_vector(&Vector3::new(0.0, 1.0, 0.0));
        // Rx(90) takes +Y to +Z, then Ry(90) takes +Z to +X.
        assert!((v - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_quaternion_matches_axis_angle() {
        let half = PI / 4.0;
        let mut q = Matrix4::new();
        q.rotate_with_quaternion(0.0, half.sin(), 0.0, half.cos()).unwrap();

        let mut r = Matrix4::new();
        r.rotate(FRAC_PI_2, 0.0, 1.0, 0.0).unwrap();
        assert_close(&q, &r);
    }

    #[test]
    fn test_zero_quaternion_fails() {
        let mut m = Matrix4::new();
        assert!(m.rotate_with_quaternion(0.0, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_perspective() {
        let p = Matrix4::perspective(45.0, 1.5, 0.5, 1000.0).unwrap();
        let f = 1.0 / (45.0f32.to_radians() / 2.0).tan();
        assert!((p.inner()[(0, 0)] - f / 1.5).abs() < 1e-5);
        assert!((p.inner()[(1, 1)] - f).abs() < 1e-5);
        assert_eq!(p.inner()[(3, 2)], -1.0);
    }

    #[test]
    fn test_perspective_rejects_degenerate_input() {
        assert!(Matrix4::perspective(45.0, 0.0, 0.5, 100.0).is_err());
        assert!(Matrix4::perspective(45.0, -1.0, 0.5, 100.0).is_err());
        assert!(Matrix4::perspective(45.0, 1.0, 10.0, 10.0).is_err());
        assert!(Matrix4::perspective(45.0, 1.0, 10.0, 1.0).is_err());
        assert!(Matrix4::perspective(0.0, 1.0, 0.5, 100.0).is_err());
        assert!(Matrix4::perspective(f32::NAN, 1.0, 0.5, 100.0).is_err());
    }

    #[test]
    fn test_look_at_moves_center_onto_negative_z() {
        let eye = V3::new(0.0, 10.0, 8.0);
        let view = Matrix4::look_at(&eye, &V3::zeros(), &V3::unit_y()).unwrap();

        let mut center = V3::zeros();
        center.transform_point(&view);
        assert!(center.x().abs() < 1e-5);
        assert!(center.y().abs() < 1e-5);
        assert!((center.z() + eye.magnitude()).abs() < 1e-4);
    }

    #[test]
    fn test_look_at_degenerate_cases() {
        let p = V3::new(1.0, 2.0, 3.0);
        assert_eq!(
            Matrix4::look_at(&p, &p, &V3::unit_y()).err(),
            Some(MathError::DegenerateView)
        );
        assert_eq!(
            Matrix4::look_at(&V3::new(0.0, 5.0, 0.0), &V3::zeros(), &V3::unit_y()).err(),
            Some(MathError::ParallelUp)
        );
    }

    #[test]
    fn test_multiply_right_order() {
        let translate = Matrix4::from(NMatrix4::new_translation(&Vector3::new(1.0, 0.0, 0.0)));
        let mut rotate = Matrix4::new();
        rotate.rotate(FRAC_PI_2, 0.0, 0.0, 1.0).unwrap();

        let mut tr = translate;
        tr.multiply_right(&rotate);
        let mut rt = rotate;
        rt.multiply_right(&translate);
        assert_ne!(tr, rt);
        assert_close(&tr, &(translate * rotate));
    }

    #[test]
    fn test_as_slice_is_column_major() {
        let m = Matrix4::from(NMatrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(&m.as_slice()[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(m.to_cols_array()[15], 1.0);
    }
}
