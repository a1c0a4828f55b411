/// ASCII rasterizer for projected model views
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use meshview_core::projection::screen_from_ndc;
use meshview_core::RenderView;
use nalgebra::Vector3;
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Floor so that surfaces facing away from the light stay visible
const AMBIENT: f32 = 0.15;

/// Projected depth range kept for drawing. Points behind the eye project past
/// the far end, points hugging the eye plane past the near end.
const DEPTH_RANGE: std::ops::RangeInclusive<f32> = -1.0..=1.0;

/// One projected corner ready for rasterization
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    normal: Vector3<f32>,
}

/// Terminal cell buffer with a depth test
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    light: Vector3<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, light: Vector3<f32>) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            light,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; width * height];
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Rasterize every triangle of one model view.
    pub fn render_view(&mut self, view: &RenderView<'_>) {
        let vertices = view.vertices();
        let normals = view.normals();

        for triangle in view.indices().chunks_exact(3) {
            let mut corners = [None; 3];
            for (slot, &index) in corners.iter_mut().zip(triangle) {
                *slot = self.screen_vertex(vertices, normals, index as usize);
            }
            if let [Some(a), Some(b), Some(c)] = corners {
                self.rasterize_triangle([a, b, c]);
            }
        }
    }

    fn screen_vertex(&self, vertices: &[f32], normals: &[f32], index: usize) -> Option<ScreenVertex> {
        let at = index * 3;
        let (x, y, z) = (vertices[at], vertices[at + 1], vertices[at + 2]);
        // Off-screen x/y is fine; the bounding box is clipped when rasterizing
        if !x.is_finite() || !y.is_finite() || !DEPTH_RANGE.contains(&z) {
            return None;
        }

        let (sx, sy) = screen_from_ndc(x, y, self.width as u32, self.height as u32);
        let normal = Vector3::new(normals[at], normals[at + 1], normals[at + 2]);
        Some(ScreenVertex {
            x: sx,
            y: sy,
            depth: z,
            normal,
        })
    }

    fn rasterize_triangle(&mut self, [v0, v1, v2]: [ScreenVertex; 3]) {
        // Bounding box, clipped to the screen
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i32;
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(self.width as i32 - 1);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i32;
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), p) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    let normal = v0.normal * w0 + v1.normal * w1 + v2.normal * w2;
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = self.shade(&normal);
                }
            }
        }
    }

    fn shade(&self, normal: &Vector3<f32>) -> char {
        let facing = normal
            .try_normalize(f32::EPSILON)
            .map_or(0.0, |n| n.dot(&self.light).max(0.0));
        let brightness = AMBIENT + (1.0 - AMBIENT) * facing;

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
    }

    /// Character at a cell, for inspection.
    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.char_buffer.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for &c in row {
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    _ => Color::Cyan,
                };
                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Barycentric coordinates of `p` in the triangle, `None` when degenerate
fn barycentric(v0: (f32, f32), v1: (f32, f32), v2: (f32, f32), p: (f32, f32)) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);
    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    Some((w0, w1, 1.0 - w0 - w1))
}
