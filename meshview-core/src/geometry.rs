/// Indexed triangle meshes and the models built from them
use log::{debug, warn};
use nalgebra::{Point3, Vector3};

use crate::math::{face_normal, normalize_or_zero};

/// Raw triangle geometry as produced by a parser.
///
/// `positions` is flattened `x, y, z` triples; each consecutive index triple
/// names one triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(positions: Vec<f32>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    pub fn position_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// First index that does not name a declared position, if any.
    pub fn find_invalid_index(&self) -> Option<u32> {
        let count = self.position_count();
        self.indices
            .iter()
            .copied()
            .find(|&index| index as usize >= count)
    }

    /// A cube centred on the origin with outward, counter-clockwise faces.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;

        #[rustfmt::skip]
        let positions = vec![
            -h, -h,  h,
             h, -h,  h,
             h,  h,  h,
            -h,  h,  h,
            -h, -h, -h,
             h, -h, -h,
             h,  h, -h,
            -h,  h, -h,
        ];

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2,  0, 2, 3, // front
            5, 4, 7,  5, 7, 6, // back
            3, 2, 6,  3, 6, 7, // top
            4, 5, 1,  4, 1, 0, // bottom
            1, 5, 6,  1, 6, 2, // right
            4, 0, 3,  4, 3, 7, // left
        ];

        Self { positions, indices }
    }
}

/// Accumulate face normals into per-vertex slots, then renormalize each slot.
///
/// Returns the flattened normals (one per vertex) and the number of degenerate
/// triangles, which contribute nothing. Every index must be in range.
pub fn compute_vertex_normals(positions: &[f32], indices: &[u32]) -> (Vec<f32>, usize) {
    let mut normals = vec![0.0f32; positions.len()];
    let mut degenerate = 0;

    for triangle in indices.chunks_exact(3) {
        let corners = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        let [v0, v1, v2] = corners.map(|i| point_at(positions, i));

        let normal = normalize_or_zero(&face_normal(&v0, &v1, &v2));
        if normal == Vector3::zeros() {
            degenerate += 1;
            continue;
        }

        for i in corners {
            normals[i * 3] += normal.x;
            normals[i * 3 + 1] += normal.y;
            normals[i * 3 + 2] += normal.z;
        }
    }

    for slot in normals.chunks_exact_mut(3) {
        let n = normalize_or_zero(&Vector3::new(slot[0], slot[1], slot[2]));
        slot.copy_from_slice(n.as_slice());
    }

    (normals, degenerate)
}

fn point_at(buffer: &[f32], vertex: usize) -> Point3<f32> {
    Point3::new(buffer[vertex * 3], buffer[vertex * 3 + 1], buffer[vertex * 3 + 2])
}

/// A loaded mesh positioned in the world.
///
/// `anchor` is the model's logical position. Move and zoom update it together
/// with the vertex buffer, so the offset between the two is preserved.
#[derive(Debug, Clone)]
pub struct Model {
    pub anchor: Point3<f32>,
    pub(crate) vertices: Vec<f32>,
    indices: Vec<u32>,
    normals: Vec<f32>,
}

impl Model {
    /// Build a model from parsed geometry.
    ///
    /// Every position scalar is divided by `division_factor` (about the world
    /// origin, not the anchor), then smooth vertex normals are computed.
    /// Indices must already be validated against the position count.
    pub fn from_mesh(mesh: MeshData, anchor: Point3<f32>, division_factor: f32) -> Self {
        let MeshData {
            positions: mut vertices,
            indices,
        } = mesh;

        if division_factor != 1.0 {
            for scalar in vertices.iter_mut() {
                *scalar /= division_factor;
            }
        }

        let (normals, degenerate) = compute_vertex_normals(&vertices, &indices);
        if degenerate > 0 {
            warn!(
                "{} of {} triangles are degenerate and contribute no normal",
                degenerate,
                indices.len() / 3
            );
        }
        debug!(
            "built model: {} vertices, {} triangles",
            vertices.len() / 3,
            indices.len() / 3
        );

        Self {
            anchor,
            vertices,
            indices,
            normals,
        }
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Number of vertex scalars (three per vertex).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of normal scalars (three per vertex).
    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    pub fn vertex(&self, i: usize) -> Point3<f32> {
        point_at(&self.vertices, i)
    }

    pub fn normal(&self, i: usize) -> Vector3<f32> {
        point_at(&self.normals, i).coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        // Two CCW triangles in the z = 0 plane sharing the 0-2 diagonal
        MeshData::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_single_triangle_normal() {
        let (normals, degenerate) = compute_vertex_normals(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            &[0, 1, 2],
        );
        assert_eq!(degenerate, 0);
        for n in normals.chunks_exact(3) {
            assert!((n[0]).abs() < 1e-6);
            assert!((n[1]).abs() < 1e-6);
            assert!((n[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cube_normals_are_unit_and_outward() {
        let model = Model::from_mesh(MeshData::cube(2.0), Point3::origin(), 1.0);
        assert_eq!(model.normal_count(), model.vertex_count());

        for i in 0..model.vertex_count() / 3 {
            let n = model.normal(i);
            assert!((n.norm() - 1.0).abs() < 1e-5);
            // Corner normals point away from the centre
            assert!(n.dot(&model.vertex(i).coords) > 0.0);
        }
    }

    #[test]
    fn test_shared_vertex_normal_is_averaged_once() {
        // Fold the quad so its two faces point along +z and +x.
        let mesh = MeshData::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2, 0, 2, 3],
        );
        let (normals, _) = compute_vertex_normals(&mesh.positions, &mesh.indices);

        let shared = Vector3::new(normals[0], normals[1], normals[2]);
        let expected = Vector3::new(1.0, 0.0, 1.0).normalize();
        assert!((shared - expected).norm() < 1e-5);

        let lone = Vector3::new(normals[3], normals[4], normals[5]);
        assert!((lone - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle_yields_zero_normal() {
        let (normals, degenerate) = compute_vertex_normals(
            &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
            &[0, 1, 2],
        );
        assert_eq!(degenerate, 1);
        assert!(normals.iter().all(|&n| n == 0.0));
    }

    #[test]
    fn test_division_factor_scales_about_origin() {
        let anchor = Point3::new(4.0, 4.0, 4.0);
        let full = Model::from_mesh(quad(), anchor, 1.0);
        let half = Model::from_mesh(quad(), anchor, 2.0);

        for (a, b) in full.vertices().iter().zip(half.vertices()) {
            assert_eq!(*a / 2.0, *b);
        }
        assert_eq!(half.anchor, anchor);
        assert_eq!(full.normals(), half.normals());
    }

    #[test]
    fn test_small_triangle_is_not_degenerate() {
        let (normals, degenerate) = compute_vertex_normals(
            &[0.0, 0.0, 0.0, 1e-4, 0.0, 0.0, 0.0, 1e-4, 0.0],
            &[0, 1, 2],
        );
        assert_eq!(degenerate, 0);
        for n in normals.chunks_exact(3) {
            let n = Vector3::new(n[0], n[1], n[2]);
            assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
        }
    }

    #[test]
    fn test_large_division_factor_keeps_unit_normals() {
        let model = Model::from_mesh(quad(), Point3::origin(), 10000.0);
        for i in 0..model.vertex_count() / 3 {
            assert!((model.normal(i).norm() - 1.0).abs() < 1e-5);
            assert!((model.normal(i).z - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_find_invalid_index() {
        let mut mesh = quad();
        assert_eq!(mesh.find_invalid_index(), None);
        mesh.indices.push(4);
        assert_eq!(mesh.find_invalid_index(), Some(4));
    }
}
