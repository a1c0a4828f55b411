/// Vector helpers and sequential axis rotation
use nalgebra::{Matrix3, Point3, Vector3};

/// Component-wise `a - b`.
pub fn subtract(a: &Point3<f32>, b: &Point3<f32>) -> Vector3<f32> {
    a - b
}

/// Right-handed cross product.
pub fn cross(a: &Vector3<f32>, b: &Vector3<f32>) -> Vector3<f32> {
    a.cross(b)
}

/// Unit vector in the direction of `v`, or the zero vector when `v` has zero
/// (or non-finite) length. Tiny but non-zero vectors still normalize.
pub fn normalize_or_zero(v: &Vector3<f32>) -> Vector3<f32> {
    let length = v.norm();
    if length > 0.0 && length.is_finite() {
        v / length
    } else {
        Vector3::zeros()
    }
}

/// Unnormalized face normal of the triangle `(v0, v1, v2)`, following its winding.
pub fn face_normal(v0: &Point3<f32>, v1: &Point3<f32>, v2: &Point3<f32>) -> Vector3<f32> {
    cross(&subtract(v1, v0), &subtract(v2, v0))
}

/// Rotation angles around the X, Y and Z axes, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerDegrees {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerDegrees {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Precomputed per-axis matrices for one rotation.
///
/// The three matrices are applied one after another (X, then Y, then Z), each
/// to the output of the previous one. Computation happens in `f64`.
#[derive(Debug, Clone, Copy)]
pub struct AxisRotation {
    rx: Matrix3<f64>,
    ry: Matrix3<f64>,
    rz: Matrix3<f64>,
}

impl AxisRotation {
    pub fn from_degrees(angles: EulerDegrees) -> Self {
        let (sx, cx) = (angles.x as f64).to_radians().sin_cos();
        let (sy, cy) = (angles.y as f64).to_radians().sin_cos();
        let (sz, cz) = (angles.z as f64).to_radians().sin_cos();

        #[rustfmt::skip]
        let rx = Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, cx, -sx,
            0.0, sx, cx,
        );
        #[rustfmt::skip]
        let ry = Matrix3::new(
            cy, 0.0, sy,
            0.0, 1.0, 0.0,
            -sy, 0.0, cy,
        );
        #[rustfmt::skip]
        let rz = Matrix3::new(
            cz, -sz, 0.0,
            sz, cz, 0.0,
            0.0, 0.0, 1.0,
        );

        Self { rx, ry, rz }
    }

    /// Rotate `point` about `pivot`.
    pub fn apply(&self, point: &Point3<f32>, pivot: &Point3<f32>) -> Point3<f32> {
        let pivot = pivot.cast::<f64>();
        let local = point.cast::<f64>() - pivot;

        let after_x = self.rx * local;
        let after_y = self.ry * after_x;
        let after_z = self.rz * after_y;

        (pivot + after_z).cast::<f32>()
    }
}

/// Rotate `point` about `pivot` by `angles` (degrees), X then Y then Z.
pub fn rotate(point: &Point3<f32>, pivot: &Point3<f32>, angles: EulerDegrees) -> Point3<f32> {
    AxisRotation::from_degrees(angles).apply(point, pivot)
}
