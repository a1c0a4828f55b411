/// In-place translation, zoom and rotation of models
use nalgebra::{Point3, Vector3};

use crate::geometry::Model;
use crate::math::{AxisRotation, EulerDegrees};
use crate::registry::ModelRegistry;

impl Model {
    /// Shift the anchor and every vertex by `delta`. Normals are untouched.
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.anchor += delta;
        for vertex in self.vertices.chunks_exact_mut(3) {
            vertex[0] += delta.x;
            vertex[1] += delta.y;
            vertex[2] += delta.z;
        }
    }

    /// Multiply the anchor and every vertex scalar by `factor`.
    ///
    /// Scaling is about the world origin, so the anchor itself drifts toward
    /// or away from the origin and repeated calls compound.
    pub fn zoom(&mut self, factor: f32) {
        self.anchor.coords *= factor;
        for scalar in self.vertices.iter_mut() {
            *scalar *= factor;
        }
    }

    /// Rotate every vertex about the model's own anchor.
    pub fn rotate(&mut self, angles: EulerDegrees) {
        let pivot = self.anchor;
        self.rotate_about(&pivot, angles);
    }

    /// Rotate every vertex about an external `pivot`; the anchor is left as is.
    pub fn rotate_about(&mut self, pivot: &Point3<f32>, angles: EulerDegrees) {
        if angles.is_zero() {
            return;
        }
        let rotation = AxisRotation::from_degrees(angles);
        for vertex in self.vertices.chunks_exact_mut(3) {
            let p = rotation.apply(&Point3::new(vertex[0], vertex[1], vertex[2]), pivot);
            vertex.copy_from_slice(p.coords.as_slice());
        }
    }
}

/// Translate every registered model by `(dx, dy, dz)`.
pub fn move_all(registry: &mut ModelRegistry, dx: f32, dy: f32, dz: f32) {
    let delta = Vector3::new(dx, dy, dz);
    for model in registry.iter_mut() {
        model.translate(delta);
    }
}

/// Zoom every registered model by `factor` about the world origin.
pub fn zoom_all(registry: &mut ModelRegistry, factor: f32) {
    for model in registry.iter_mut() {
        model.zoom(factor);
    }
}

/// Rotate every registered model about a shared `pivot`.
pub fn rotate_all_about(registry: &mut ModelRegistry, pivot: &Point3<f32>, angles: EulerDegrees) {
    for model in registry.iter_mut() {
        model.rotate_about(pivot, angles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshData;

    const EPS: f32 = 1e-5;

    fn registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.append(Model::from_mesh(
            MeshData::cube(1.0),
            Point3::new(0.5, -0.25, 2.0),
            1.0,
        ));
        registry.append(Model::from_mesh(
            MeshData::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2]),
            Point3::new(-3.0, 1.0, 0.0),
            1.0,
        ));
        registry
    }

    fn snapshot(registry: &ModelRegistry) -> Vec<(Point3<f32>, Vec<f32>)> {
        registry
            .iter()
            .map(|m| (m.anchor, m.vertices().to_vec()))
            .collect()
    }

    fn assert_snapshots_close(a: &[(Point3<f32>, Vec<f32>)], b: &[(Point3<f32>, Vec<f32>)]) {
        assert_eq!(a.len(), b.len());
        for ((anchor_a, verts_a), (anchor_b, verts_b)) in a.iter().zip(b) {
            assert!((anchor_a - anchor_b).norm() < EPS);
            for (x, y) in verts_a.iter().zip(verts_b) {
                assert!((x - y).abs() < EPS, "{} != {}", x, y);
            }
        }
    }

    #[test]
    fn test_move_then_move_back_restores() {
        let mut registry = registry();
        let before = snapshot(&registry);

        move_all(&mut registry, 0.3, -1.5, 0.01);
        assert!((registry.iter().next().unwrap().anchor.x - 0.8).abs() < EPS);

        move_all(&mut registry, -0.3, 1.5, -0.01);
        assert_snapshots_close(&before, &snapshot(&registry));
    }

    #[test]
    fn test_move_keeps_anchor_offset_and_normals() {
        let mut registry = registry();
        let model = registry.iter().next().unwrap();
        let offset = model.vertex(0) - model.anchor;
        let normals = model.normals().to_vec();

        move_all(&mut registry, 1.0, 2.0, 3.0);

        let model = registry.iter().next().unwrap();
        assert!(((model.vertex(0) - model.anchor) - offset).norm() < EPS);
        assert_eq!(model.normals(), &normals[..]);
    }

    #[test]
    fn test_zoom_compounds() {
        let mut twice = registry();
        zoom_all(&mut twice, 1.01);
        zoom_all(&mut twice, 0.99);

        let mut once = registry();
        zoom_all(&mut once, 1.01 * 0.99);

        assert_snapshots_close(&snapshot(&twice), &snapshot(&once));
    }

    #[test]
    fn test_zoom_scales_anchor_about_origin() {
        let mut registry = registry();
        zoom_all(&mut registry, 2.0);
        let anchors: Vec<_> = registry.iter().map(|m| m.anchor).collect();
        assert_eq!(anchors[0], Point3::new(1.0, -0.5, 4.0));
        assert_eq!(anchors[1], Point3::new(-6.0, 2.0, 0.0));
    }

    #[test]
    fn test_rotate_about_own_anchor() {
        let mut model = Model::from_mesh(
            MeshData::new(vec![2.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 2.0, 0.0], vec![0, 1, 2]),
            Point3::new(1.0, 1.0, 0.0),
            1.0,
        );
        model.rotate(EulerDegrees::new(0.0, 0.0, 90.0));

        assert!((model.vertex(0) - Point3::new(1.0, 2.0, 0.0)).norm() < EPS);
        assert!((model.vertex(1) - Point3::new(1.0, 1.0, 0.0)).norm() < EPS);
        assert!((model.vertex(2) - Point3::new(0.0, 1.0, 0.0)).norm() < EPS);
        assert_eq!(model.anchor, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotate_about_external_pivot_leaves_anchor() {
        let mut registry = registry();
        let anchors: Vec<_> = registry.iter().map(|m| m.anchor).collect();
        let pivot = Point3::new(0.0, 0.0, -1.0);

        rotate_all_about(&mut registry, &pivot, EulerDegrees::new(0.0, 180.0, 0.0));

        let after: Vec<_> = registry.iter().map(|m| m.anchor).collect();
        assert_eq!(anchors, after);

        // (1,0,0) half-turned about Y through (0,0,-1) lands on (-1,0,-2)
        let triangle = registry.iter().nth(1).unwrap();
        assert!((triangle.vertex(1) - Point3::new(-1.0, 0.0, -2.0)).norm() < EPS);
    }
}
