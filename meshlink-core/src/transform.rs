/// Transformation matrices and the fixed xyz -> zxy change of basis
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Change of basis taking (x, y, z) to (z, x, y)
    pub fn xyz_to_zxy() -> Matrix3<f32> {
        Matrix3::new(
            0.0, 0.0, 1.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0,
        )
    }

    /// Inverse of [`Transform::xyz_to_zxy`]; a permutation, so its transpose
    pub fn zxy_to_xyz() -> Matrix3<f32> {
        Self::xyz_to_zxy().transpose()
    }
}

fn apply(matrix: &Matrix3<f32>, points: &[Point3<f32>]) -> Vec<Point3<f32>> {
    points.iter().map(|p| Point3::from(matrix * p.coords)).collect()
}

/// Re-express points so that new x = old z, new y = old x, new z = old y
pub fn xyz_to_zxy(points: &[Point3<f32>]) -> Vec<Point3<f32>> {
    apply(&Transform::xyz_to_zxy(), points)
}

/// Undo [`xyz_to_zxy`]
pub fn zxy_to_xyz(points: &[Point3<f32>]) -> Vec<Point3<f32>> {
    apply(&Transform::zxy_to_xyz(), points)
}
