/// Minimal 3D vector value type
///
/// Named operations (`add`, `subtract`, `scale`, `normalize`, `transform`)
/// mutate the receiver in place and return it for chaining. Use
/// [`Vector3::copy`] first when the original must be kept.
use nalgebra::{Point3, Vector3 as NVector3};

use crate::error::MathError;
use crate::transform::Matrix4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    v: NVector3<f32>,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            v: NVector3::new(x, y, z),
        }
    }

    pub fn zeros() -> Self {
        Self {
            v: NVector3::zeros(),
        }
    }

    pub fn unit_x() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn unit_y() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub fn unit_z() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn x(&self) -> f32 {
        self.v.x
    }

    pub fn y(&self) -> f32 {
        self.v.y
    }

    pub fn z(&self) -> f32 {
        self.v.z
    }

    /// Independent duplicate of this vector
    pub fn copy(&self) -> Self {
        *self
    }

    /// Pairwise addition, in place
    pub fn add(&mut self, other: &Vector3) -> &mut Self {
        self.v += other.v;
        self
    }

    /// Pairwise subtraction, in place
    pub fn subtract(&mut self, other: &Vector3) -> &mut Self {
        self.v -= other.v;
        self
    }

    /// Uniform multiply, in place
    pub fn scale(&mut self, k: f32) -> &mut Self {
        self.v *= k;
        self
    }

    /// Euclidean norm
    pub fn magnitude(&self) -> f32 {
        self.v.norm()
    }

    /// Divide by the magnitude, in place.
    ///
    /// Fails without touching the vector when the magnitude is zero or not
    /// finite.
    pub fn normalize(&mut self) -> Result<&mut Self, MathError> {
        let magnitude = self.magnitude();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Err(MathError::ZeroLength);
        }
        self.v /= magnitude;
        Ok(self)
    }

    pub fn dot(&self, other: &Vector3) -> f32 {
        self.v.dot(&other.v)
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Self {
            v: self.v.cross(&other.v),
        }
    }

    /// Unsigned angle to `other` in radians, in `[0, PI]`.
    ///
    /// The cosine is clamped to `[-1, 1]` so rounding never leaves the
    /// domain of `acos`.
    pub fn angle_between(&self, other: &Vector3) -> Result<f32, MathError> {
        let denominator = self.magnitude() * other.magnitude();
        if denominator == 0.0 || !denominator.is_finite() {
            return Err(MathError::ZeroLength);
        }
        let cosine = (self.dot(other) / denominator).clamp(-1.0, 1.0);
        Ok(cosine.acos())
    }

    /// Apply `matrix` to this vector as a direction (w = 0), in place.
    /// Translation has no effect.
    pub fn transform(&mut self, matrix: &Matrix4) -> &mut Self {
        self.v = matrix.transform_vector(&self.v);
        self
    }

    /// Apply `matrix` to this vector as a point (w = 1), in place, with the
    /// homogeneous divide.
    pub fn transform_point(&mut self, matrix: &Matrix4) -> &mut Self {
        self.v = matrix
            .inner()
            .transform_point(&Point3::from(self.v))
            .coords;
        self
    }

    pub fn is_finite(&self) -> bool {
        self.v.iter().all(|c| c.is_finite())
    }

    pub fn as_nalgebra(&self) -> &NVector3<f32> {
        &self.v
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.v.x, self.v.y, self.v.z]
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::zeros()
    }
}

impl From<NVector3<f32>> for Vector3 {
    fn from(v: NVector3<f32>) -> Self {
        Self { v }
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_mutating_ops_chain() {
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        v.add(&Vector3::new(1.0, 1.0, 1.0)).scale(2.0);
        assert_eq!(v, Vector3::new(4.0, 6.0, 8.0));

        v.subtract(&Vector3::new(4.0, 6.0, 8.0));
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn test_copy_is_independent() {
        let original = Vector3::new(1.0, 0.0, 0.0);
        let mut duplicate = original.copy();
        duplicate.scale(5.0);
        assert_eq!(original.x(), 1.0);
        assert_eq!(duplicate.x(), 5.0);
    }

    #[test]
    fn test_magnitude() {
        assert!((Vector3::new(3.0, 4.0, 0.0).magnitude() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_fails_and_keeps_value() {
        let mut v = Vector3::zeros();
        assert_eq!(v.normalize().err(), Some(MathError::ZeroLength));
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn test_angle_between() {
        let angle = Vector3::unit_x().angle_between(&Vector3::unit_z()).unwrap();
        assert!((angle - FRAC_PI_2).abs() < 1e-6);

        let angle = Vector3::unit_y()
            .angle_between(&Vector3::new(0.0, -3.0, 0.0))
            .unwrap();
        assert!((angle - std::f32::consts::PI).abs() < 1e-6);

        assert!(Vector3::zeros().angle_between(&Vector3::unit_x()).is_err());
    }

    #[test]
    fn test_transform_ignores_translation() {
        let mut m = Matrix4::new();
        m.multiply_right(&Matrix4::from(nalgebra::Matrix4::new_translation(
            &NVector3::new(10.0, 0.0, 0.0),
        )));

        let mut direction = Vector3::unit_z();
        direction.transform(&m);
        assert_eq!(direction, Vector3::unit_z());

        let mut point = Vector3::unit_z();
        point.transform_point(&m);
        assert_eq!(point, Vector3::new(10.0, 0.0, 1.0));
    }

    #[test]
    fn test_transform_rotates_direction() {
        let mut m = Matrix4::new();
        m.rotate(FRAC_PI_2, 0.0, 1.0, 0.0).unwrap();

        let mut v = Vector3::unit_z();
        v.transform(&m);
        assert!((v.x() - 1.0).abs() < 1e-6);
        assert!(v.z().abs() < 1e-6);
    }

    fn unit_vector() -> impl Strategy<Value = Vector3> {
        (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0)
            .prop_filter("non-zero", |(x, y, z)| x * x + y * y + z * z > 1e-4)
            .prop_map(|(x, y, z)| {
                let mut v = Vector3::new(x, y, z);
                v.normalize().unwrap();
                v
            })
    }

    proptest! {
        #[test]
        fn prop_angle_to_self_is_zero(v in unit_vector()) {
            let angle = v.angle_between(&v).unwrap();
            prop_assert!(angle.abs() < 2e-3, "angle = {}", angle);
        }

        #[test]
        fn prop_normalized_has_unit_length(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            z in -1000.0f32..1000.0,
        ) {
            prop_assume!(x.abs() + y.abs() + z.abs() > 1e-3);
            let mut v = Vector3::new(x, y, z);
            v.normalize().unwrap();
            prop_assert!((v.magnitude() - 1.0).abs() < 1e-5);
        }
    }
}
