/// One-point perspective divide and render-ready model views
use crate::geometry::Model;

/// Smallest depth magnitude used as a divisor. Vertices sitting on the eye
/// plane (`z == -1`) are divided by this instead of zero.
pub const MIN_DISTANCE: f32 = 1e-4;

/// Apply the perspective divide to a copy of `vertices`.
///
/// Each `(x, y, z)` is scaled by `1 / (z + 1)`. The input is left untouched.
pub fn project(vertices: &[f32]) -> Vec<f32> {
    let mut projected = vertices.to_vec();
    project_in_place(&mut projected);
    projected
}

/// Apply the perspective divide to a working buffer.
pub fn project_in_place(vertices: &mut [f32]) {
    for vertex in vertices.chunks_exact_mut(3) {
        let scale = 1.0 / clamp_distance(vertex[2] + 1.0);
        vertex[0] *= scale;
        vertex[1] *= scale;
        vertex[2] *= scale;
    }
}

/// Keep the divisor at least `MIN_DISTANCE` away from zero, preserving its
/// sign. Negative distances (behind the eye) still flip the image.
fn clamp_distance(distance: f32) -> f32 {
    if distance.abs() >= MIN_DISTANCE {
        distance
    } else if distance < 0.0 {
        -MIN_DISTANCE
    } else {
        MIN_DISTANCE
    }
}

/// Map projected `x, y` in `[-1, 1]` to screen coordinates with `y` growing
/// downward.
pub fn screen_from_ndc(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    let screen_x = (x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - y) * 0.5 * height as f32;
    (screen_x, screen_y)
}

/// What a rendering backend needs to draw one model for one frame
#[derive(Debug, Clone)]
pub struct RenderView<'a> {
    vertices: Vec<f32>,
    indices: &'a [u32],
    normals: &'a [f32],
}

impl<'a> RenderView<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            vertices: project(model.vertices()),
            indices: model.indices(),
            normals: model.normals(),
        }
    }

    /// Projected vertex scalars.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &'a [u32] {
        self.indices
    }

    pub fn normals(&self) -> &'a [f32] {
        self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }
}
