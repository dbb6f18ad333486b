//! Rasterizer with a reciprocal depth buffer
//!
//! Pixel coordinates live in the half-open rectangle `[0, width) x [0, height)`
//! with y growing downward. Every plotted pixel paints a `point_size` square
//! block on the surface but occupies a single depth cell.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use tracing::{debug, trace, warn};

use crate::color::Rgb;
use crate::config::RendererConfig;
use crate::depth::DepthBuffer;
use crate::dump::dump_to_file;
use crate::error::{Error, Result};
use crate::geometry::{barycentric, Polygon, SceneObject};
use crate::math::{Homogeneous, Matrix4, Vector3, Vector4};
use crate::shading::{AlternatingShader, Shader};
use crate::surface::PixelSurface;

/// Counters returned by `Renderer::render_object`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Polygons that reached rasterization.
    pub polygons: usize,
    /// Polygons dropped because a vertex mapped to infinity (w == 0).
    pub skipped: usize,
    /// Pixels that passed the depth test.
    pub pixels: usize,
}

pub struct Renderer<S: PixelSurface> {
    surface: S,
    width: usize,
    height: usize,
    depth: DepthBuffer,
    background: Rgb,
    wireframe: Rgb,
    selection: Rgb,
    point_size: usize,
    axis_length: f32,
    depth_dump: Option<PathBuf>,
    shader: Box<dyn Shader>,
}

impl<S: PixelSurface> Renderer<S> {
    pub fn new(surface: S, config: &RendererConfig) -> Result<Self> {
        check_viewport(config.width, config.height)?;
        debug!(width = config.width, height = config.height, "creating renderer");
        Ok(Self {
            surface,
            width: config.width,
            height: config.height,
            depth: DepthBuffer::new(config.width, config.height),
            background: config.background,
            wireframe: config.wireframe,
            selection: config.selection,
            point_size: config.point_size.max(1),
            axis_length: config.axis_length,
            depth_dump: config.depth_dump.clone(),
            shader: Box::new(AlternatingShader::default()),
        })
    }

    /// Resize the viewport and reallocate the depth buffer to match.
    pub fn set_viewport(&mut self, width: usize, height: usize) -> Result<()> {
        if let Err(e) = check_viewport(width, height) {
            warn!(width, height, "rejecting viewport");
            return Err(e);
        }
        self.width = width;
        self.height = height;
        self.depth = DepthBuffer::new(width, height);
        Ok(())
    }

    pub fn viewport(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn viewport_aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn background_color(&self) -> Rgb {
        self.background
    }

    pub fn set_background_color(&mut self, color: Rgb) {
        self.background = color;
    }

    pub fn wireframe_color(&self) -> Rgb {
        self.wireframe
    }

    pub fn set_wireframe_color(&mut self, color: Rgb) {
        self.wireframe = color;
    }

    pub fn selection_color(&self) -> Rgb {
        self.selection
    }

    pub fn set_selection_color(&mut self, color: Rgb) {
        self.selection = color;
    }

    /// Replace the fill color selection used by `render_object`.
    pub fn set_shader(&mut self, shader: impl Shader + 'static) {
        self.shader = Box::new(shader);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Swap in a new surface, returning the previous one.
    pub fn set_surface(&mut self, surface: S) -> S {
        std::mem::replace(&mut self.surface, surface)
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn clear_screen(&mut self) {
        self.surface.fill_all(self.background);
    }

    pub fn clear_depth_buffer(&mut self) {
        self.depth.clear();
    }

    /// Clear the surface and the depth buffer.
    pub fn begin_frame(&mut self) {
        self.clear_screen();
        self.clear_depth_buffer();
    }

    /// Map NDC x, y from `[-1, 1]` to `[0, width]` / `[0, height]`, flipping y.
    /// z passes through unchanged.
    pub fn ndc_to_viewport(&self, v: &Vector3) -> Vector3 {
        Vector3::new(
            (1.0 + v.x) * self.width as f32 / 2.0,
            (1.0 - v.y) * self.height as f32 / 2.0,
            v.z,
        )
    }

    /// Inverse of `ndc_to_viewport`.
    pub fn viewport_to_ndc(&self, v: &Vector3) -> Vector3 {
        Vector3::new(
            2.0 * v.x / self.width as f32 - 1.0,
            1.0 - 2.0 * v.y / self.height as f32,
            v.z,
        )
    }

    /// Draw the x, y and z axes of the space `transform` maps from.
    pub fn draw_axes(&mut self, transform: &Matrix4) -> usize {
        let len = self.axis_length;
        let Some(origin) = self.project(transform, &Vector4::point(0.0, 0.0, 0.0)) else {
            return 0;
        };
        let mut written = 0;
        for end in [
            Vector4::point(len, 0.0, 0.0),
            Vector4::point(0.0, len, 0.0),
            Vector4::point(0.0, 0.0, len),
        ] {
            if let Some(end) = self.project(transform, &end) {
                written += self.draw_line(&origin, &end);
            }
        }
        written
    }

    /// Bresenham line between two viewport-space points in the wireframe color.
    ///
    /// Depth is interpolated by the Euclidean distance travelled from `from`.
    /// Returns the number of pixels that passed the depth test.
    pub fn draw_line(&mut self, from: &Vector3, to: &Vector3) -> usize {
        self.draw_line_colored(from, to, self.wireframe)
    }

    pub fn draw_line_colored(&mut self, from: &Vector3, to: &Vector3, color: Rgb) -> usize {
        if !is_finite(from) || !is_finite(to) {
            trace!("skipping line with non-finite endpoint");
            return 0;
        }
        let p0 = pixel(from);
        let p1 = pixel(to);
        if p0 == p1 {
            return self.draw_point(p0.0, p0.1, from.z, color) as usize;
        }
        if self.outside_same_side(&[p0, p1]) {
            return 0;
        }

        // Walk from the lexicographically smaller endpoint so that both
        // orientations of a segment visit the same pixels.
        let (start, end) = if p0 <= p1 { (p0, p1) } else { (p1, p0) };
        let dx = end.0 as i128 - start.0 as i128;
        let dy = end.1 as i128 - start.1 as i128;
        let steep = dy.abs() > dx.abs();
        let ((major, major_delta), (minor, minor_delta), extent) = if steep {
            ((start.1 as i128, dy), (start.0 as i128, dx), self.height)
        } else {
            ((start.0 as i128, dx), (start.1 as i128, dy), self.width)
        };
        let run = major_delta.unsigned_abs();
        let rise = minor_delta.unsigned_abs();
        let (major_step, minor_step) = (major_delta.signum(), minor_delta.signum());

        let length = (to.x - from.x).hypot(to.y - from.y);
        let mut written = 0;
        for k in visible_steps(major, major_delta, extent as i128) {
            // Minor offset after k major steps, rounded half up. This is where
            // the incremental Bresenham error term lands, without walking the
            // off-screen prefix. run and rise fit in 64 bits, so k * rise
            // fits in u128.
            let scaled = k as u128 * rise;
            let offset = scaled / run + u128::from(2 * (scaled % run) >= run);
            let a = major + major_step * k;
            let b = minor + minor_step * offset as i128;
            let (x, y) = if steep { (b, a) } else { (a, b) };
            let (x, y) = (x as i64, y as i64);

            let travelled = (x as f32 - from.x).hypot(y as f32 - from.y);
            let t = (travelled / length).min(1.0);
            let z = (1.0 - t) * from.z + t * to.z;
            written += self.draw_point(x, y, z, color) as usize;
        }
        written
    }

    /// Depth-tested plot of a single pixel.
    ///
    /// Points with z <= 0 (on or behind the camera plane) or non-finite z
    /// cannot be depth tested and are dropped.
    pub fn draw_point(&mut self, x: i64, y: i64, z: f32, color: Rgb) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        if z.is_nan() || z <= 0.0 {
            return false;
        }
        let reciprocal = 1.0 / z;
        if !reciprocal.is_finite() {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if !self.depth.test_and_set(x, y, reciprocal) {
            return false;
        }
        self.surface
            .fill_block(x, y, self.point_size, self.point_size, color);
        true
    }

    /// Wireframe triangle.
    pub fn draw_polygon(&mut self, a: &Vector3, b: &Vector3, c: &Vector3) -> usize {
        self.draw_polygon_colored(a, b, c, self.wireframe)
    }

    pub fn draw_polygon_colored(&mut self, a: &Vector3, b: &Vector3, c: &Vector3, color: Rgb) -> usize {
        self.draw_line_colored(a, b, color)
            + self.draw_line_colored(b, c, color)
            + self.draw_line_colored(c, a, color)
    }

    /// Scanline fill of a viewport-space triangle with depth testing.
    ///
    /// Scanline bounds come from the vertices sorted by y; depth comes from
    /// barycentric weights against the vertices in their given order, dotted
    /// with those same vertices' z values.
    pub fn fill_polygon(
        &mut self,
        a: &Vector3,
        b: &Vector3,
        c: &Vector3,
        _normal: &Vector3,
        color: Rgb,
    ) -> usize {
        if a.y == b.y && a.y == c.y {
            return 0;
        }
        if !is_finite(a) || !is_finite(b) || !is_finite(c) {
            trace!("skipping fill with non-finite vertex");
            return 0;
        }
        let corners = [a, b, c].map(pixel);
        if self.outside_same_side(&corners) {
            return 0;
        }

        let mut sorted = [*a, *b, *c];
        sorted.sort_by(|p, q| p.y.total_cmp(&q.y));
        let [first, second, third] = sorted;

        let flat = [a, b, c].map(|v| Vector3::new(v.x, v.y, 0.0));
        let zs = Vector3::new(a.z, b.z, c.z);

        let total_height = (third.y - first.y).round() as i64;
        let lower_height = second.y - first.y;
        let upper_height = third.y - second.y;

        // Rows outside the viewport would be discarded pixel by pixel anyway.
        let i_start = ((-first.y).floor() as i64).max(0);
        let i_end = ((self.height as f32 - first.y).ceil() as i64).min(total_height);

        let mut written = 0;
        for i in i_start..=i_end {
            let fi = i as f32;
            let upper = fi > lower_height || second.y == first.y;
            let alpha = if total_height > 0 {
                fi / total_height as f32
            } else {
                0.0
            };
            let (segment_start, segment_end, offset, segment_height) = if upper {
                (second, third, lower_height, upper_height)
            } else {
                (first, second, 0.0, lower_height)
            };
            let beta = if segment_height > 0.0 {
                ((fi - offset) / segment_height).min(1.0)
            } else {
                1.0
            };

            let mut left = first + (third - first) * alpha.min(1.0);
            let mut right = segment_start + (segment_end - segment_start) * beta;
            if left.x > right.x {
                std::mem::swap(&mut left, &mut right);
            }

            let row_y = first.y + fi;
            let row = row_y.floor() as i64;
            let x_start = (left.x.floor() as i64).max(0);
            let x_end = (right.x.floor() as i64).min(self.width as i64 - 1);
            for x in x_start..=x_end {
                let p = Vector3::new(x as f32, row_y, 0.0);
                let weights = barycentric(&p, &flat[0], &flat[1], &flat[2]);
                let z = weights.dot(&zs);
                written += self.draw_point(x, row, z, color) as usize;
            }
        }
        written
    }

    /// Transform, project and rasterize every polygon of `object`.
    ///
    /// No culling or clipping happens; polygons with a vertex at infinity are
    /// skipped. Solid fills take their color from the shader.
    pub fn render_object(
        &mut self,
        object: &SceneObject,
        transform: &Matrix4,
        wireframe: bool,
        solid: bool,
    ) -> Result<RenderStats> {
        let mut stats = RenderStats::default();
        if wireframe || solid {
            for (index, polygon) in object.polygons.iter().enumerate() {
                let Some([a, b, c]) = self.project_polygon(&polygon.transformed(transform)) else {
                    trace!(index, "polygon vertex at infinity");
                    stats.skipped += 1;
                    continue;
                };
                if wireframe {
                    stats.pixels += self.draw_polygon(&a, &b, &c);
                }
                if solid {
                    let normal = polygon.normals[0];
                    let color = self.shader.shade(index, &normal);
                    stats.pixels += self.fill_polygon(&a, &b, &c, &normal, color);
                }
                stats.polygons += 1;
            }
        }
        debug!(
            polygons = stats.polygons,
            skipped = stats.skipped,
            pixels = stats.pixels,
            "rendered object"
        );

        if let Some(path) = &self.depth_dump {
            dump_to_file(&self.depth, path)?;
        }
        Ok(stats)
    }

    fn project(&self, transform: &Matrix4, v: &Vector4) -> Option<Vector3> {
        (transform * v)
            .from_homogeneous()
            .map(|ndc| self.ndc_to_viewport(&ndc))
    }

    fn project_polygon(&self, polygon: &Polygon) -> Option<[Vector3; 3]> {
        let [a, b, c] = &polygon.vertices;
        Some([
            self.ndc_to_viewport(&a.from_homogeneous()?),
            self.ndc_to_viewport(&b.from_homogeneous()?),
            self.ndc_to_viewport(&c.from_homogeneous()?),
        ])
    }

    /// True when every point lies beyond the same viewport edge.
    fn outside_same_side(&self, points: &[(i64, i64)]) -> bool {
        let (w, h) = (self.width as i64, self.height as i64);
        points.iter().all(|p| p.0 < 0)
            || points.iter().all(|p| p.1 < 0)
            || points.iter().all(|p| p.0 >= w)
            || points.iter().all(|p| p.1 >= h)
    }
}

fn check_viewport(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidViewport { width, height });
    }
    Ok(())
}

/// Pixel containing a viewport-space point. Coordinates beyond the i64 range
/// saturate.
fn pixel(v: &Vector3) -> (i64, i64) {
    (v.x.floor() as i64, v.y.floor() as i64)
}

/// Steps `k` in `0..=|delta|` for which `origin + k * signum(delta)` lies in
/// `[0, extent)`.
fn visible_steps(origin: i128, delta: i128, extent: i128) -> RangeInclusive<i128> {
    let (lo, hi) = if delta >= 0 {
        (-origin, extent - 1 - origin)
    } else {
        (origin - (extent - 1), origin)
    };
    lo.max(0)..=hi.min(delta.abs())
}

fn is_finite(v: &Vector3) -> bool {
    v.iter().all(|c| c.is_finite())
}
