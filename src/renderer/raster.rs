//! Triangle setup and per-band rasterization

use std::ops::AddAssign;

use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

use crate::color::{Blend, SourceOver};
use crate::framebuffer::Pixel;
use crate::geometry::{Dimensions, Plane};
use crate::mesh::Mesh;
use crate::scene::{Material, Side};

/// Vertices with a clip-space `w` at or below this are behind the eye
pub const W_EPSILON: f32 = 1e-5;

/// Counters collected while rasterizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: usize,
    pub triangles: usize,
    /// Fragments that passed every test
    pub fragments: usize,
    pub clipped: usize,
    pub stencil_failed: usize,
    pub depth_failed: usize,
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, rhs: RenderStats) {
        self.draw_calls += rhs.draw_calls;
        self.triangles += rhs.triangles;
        self.fragments += rhs.fragments;
        self.clipped += rhs.clipped;
        self.stencil_failed += rhs.stencil_failed;
        self.depth_failed += rhs.depth_failed;
    }
}

/// A vertex in screen space, with `y` pointing down
#[derive(Debug, Clone, Copy)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    /// Normalized device depth
    pub z: f32,
    /// Reciprocal of clip-space `w`
    pub inv_w: f32,
    /// World position divided by clip-space `w`, for perspective-correct interpolation
    pub world: Vector3<f32>,
}

/// A triangle ready for rasterization, always wound so that `area` is positive
#[derive(Debug, Clone, Copy)]
pub struct ScreenTriangle {
    pub vertices: [ScreenVertex; 3],
    /// Twice the signed screen-space area
    pub area: f32,
    pub front_facing: bool,
}

#[inline]
fn edge(a: &ScreenVertex, b: &ScreenVertex, x: f32, y: f32) -> f32 {
    (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)
}

/// Top and left edges own the pixels exactly on them, so shared edges are drawn once
#[inline]
fn is_top_left(a: &ScreenVertex, b: &ScreenVertex) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);

    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

fn project(position: &Point3<f32>, model: &Isometry3<f32>, view_projection: &Matrix4<f32>,
           dimensions: Dimensions) -> Option<ScreenVertex> {
    let world = model * position;
    let clip = view_projection * world.to_homogeneous();

    if clip.w <= W_EPSILON {
        return None;
    }

    let inv_w = 1.0 / clip.w;
    let ndc = clip.xyz() * inv_w;

    Some(ScreenVertex {
        x: (ndc.x + 1.0) * 0.5 * dimensions.width as f32,
        y: (1.0 - ndc.y) * 0.5 * dimensions.height as f32,
        z: ndc.z,
        inv_w,
        world: world.coords * inv_w,
    })
}

/// Projects every triangle of `mesh` and drops those culled by `side`.
///
/// Front faces are counter-clockwise in normalized device coordinates.
/// Triangles with any vertex behind the eye are skipped entirely.
pub fn setup_triangles(mesh: &Mesh,
                       model: &Isometry3<f32>,
                       view_projection: &Matrix4<f32>,
                       dimensions: Dimensions,
                       side: Side) -> Vec<ScreenTriangle> {
    let projected: Vec<Option<ScreenVertex>> = mesh.vertices().iter()
        .map(|v| project(&v.position, model, view_projection, dimensions))
        .collect();

    mesh.indices().chunks(3).filter_map(|tri| {
        let a = projected[tri[0]]?;
        let mut b = projected[tri[1]]?;
        let mut c = projected[tri[2]]?;

        let mut area = edge(&a, &b, c.x, c.y);

        if area == 0.0 {
            return None;
        }

        // screen space flips y, so counter-clockwise in NDC is negative here
        let front_facing = area < 0.0;

        if !side.accepts(front_facing) {
            return None;
        }

        if area < 0.0 {
            ::std::mem::swap(&mut b, &mut c);
            area = -area;
        }

        Some(ScreenTriangle { vertices: [a, b, c], area, front_facing })
    }).collect()
}

/// Everything a band needs to shade fragments of one draw call
#[derive(Clone, Copy)]
pub struct RasterArguments<'a> {
    pub width: u32,
    /// First framebuffer row covered by the band
    pub first_row: u32,
    pub material: &'a Material,
    /// Planes that discard fragments with negative signed distance
    pub clip_planes: &'a [Plane],
}

/// Rasterizes `triangles` into one horizontal band of the framebuffer
pub fn rasterize_band(args: RasterArguments, band: &mut [Pixel], triangles: &[ScreenTriangle]) -> RenderStats {
    let RasterArguments { width, first_row, material, clip_planes } = args;

    let mut stats = RenderStats::default();

    if width == 0 || band.is_empty() {
        return stats;
    }

    let rows = (band.len() / width as usize) as u32;
    let last_row = first_row + rows - 1;

    for triangle in triangles {
        let [a, b, c] = triangle.vertices;

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0);
        let max_x = a.x.max(b.x).max(c.x).ceil().min(width as f32 - 1.0);
        let min_y = a.y.min(b.y).min(c.y).floor().max(first_row as f32);
        let max_y = a.y.max(b.y).max(c.y).ceil().min(last_row as f32);

        if min_x > max_x || min_y > max_y {
            continue;
        }

        let owns = [is_top_left(&b, &c), is_top_left(&c, &a), is_top_left(&a, &b)];

        for y in min_y as u32..=max_y as u32 {
            let py = y as f32 + 0.5;

            for x in min_x as u32..=max_x as u32 {
                let px = x as f32 + 0.5;

                let w = [edge(&b, &c, px, py), edge(&c, &a, px, py), edge(&a, &b, px, py)];

                let inside = w.iter().zip(owns.iter()).all(|(&w, &owns)| w > 0.0 || (w == 0.0 && owns));

                if !inside {
                    continue;
                }

                let l = [w[0] / triangle.area, w[1] / triangle.area, w[2] / triangle.area];

                let z = l[0] * a.z + l[1] * b.z + l[2] * c.z;

                // near and far planes
                if z < -1.0 || z > 1.0 {
                    stats.clipped += 1;
                    continue;
                }

                let inv_w = l[0] * a.inv_w + l[1] * b.inv_w + l[2] * c.inv_w;
                let world = Point3::from((a.world * l[0] + b.world * l[1] + c.world * l[2]) / inv_w);

                let index = (y - first_row) as usize * width as usize + x as usize;

                shade_fragment(material, clip_planes, &mut band[index], z, &world, &mut stats);
            }
        }
    }

    stats
}

/// Runs a single fragment through clipping, stencil, depth and color stages, in that order
fn shade_fragment(material: &Material,
                  clip_planes: &[Plane],
                  pixel: &mut Pixel,
                  z: f32,
                  world: &Point3<f32>,
                  stats: &mut RenderStats) {
    if clip_planes.iter().any(|plane| plane.distance_to_point(world) < 0.0) {
        stats.clipped += 1;
        return;
    }

    if let Some(ref stencil) = material.stencil {
        if !stencil.passes(pixel.stencil) {
            pixel.stencil = stencil.apply(stencil.fail, pixel.stencil);
            stats.stencil_failed += 1;
            return;
        }
    }

    if material.depth_test && !(z <= pixel.depth) {
        if let Some(ref stencil) = material.stencil {
            pixel.stencil = stencil.apply(stencil.depth_fail, pixel.stencil);
        }

        stats.depth_failed += 1;
        return;
    }

    if let Some(ref stencil) = material.stencil {
        pixel.stencil = stencil.apply(stencil.pass, pixel.stencil);
    }

    if material.depth_write {
        pixel.depth = z;
    }

    if material.color_write {
        pixel.color = if material.blend {
            SourceOver.blend(material.color, pixel.color)
        } else {
            ().blend(material.color, pixel.color)
        };
    }

    stats.fragments += 1;
}
