//! Clip-plane set generation

use std::f32::consts::FRAC_PI_2;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::RenderResult;
use crate::geometry::Plane;
use crate::utils::lerp;

/// Planes on a horizontal arc, each facing the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcLayout {
    pub count: usize,
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl Default for ArcLayout {
    fn default() -> ArcLayout {
        ArcLayout {
            count: 10,
            radius: 1.0,
            start_angle: -FRAC_PI_2,
            end_angle: FRAC_PI_2,
        }
    }
}

/// Parallel planes sharing one normal, constants spread over `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineLayout {
    pub count: usize,
    pub normal: [f32; 3],
    pub start: f32,
    pub end: f32,
}

impl Default for LineLayout {
    fn default() -> LineLayout {
        LineLayout {
            count: 4,
            normal: [-1.0, 0.0, 0.0],
            start: -0.5,
            end: 0.5,
        }
    }
}

/// Explicit plane as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneDescriptor {
    pub normal: [f32; 3],
    #[serde(default)]
    pub constant: f32,
}

/// How the clipping planes of a session are arranged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlaneLayout {
    Arc(ArcLayout),
    Line(LineLayout),
    /// `-X`, `-Y` and `-Z` planes through the origin
    Axes,
    Explicit { planes: Vec<PlaneDescriptor> },
}

impl Default for PlaneLayout {
    fn default() -> PlaneLayout {
        PlaneLayout::Arc(ArcLayout::default())
    }
}

impl PlaneLayout {
    /// Produces the ordered plane sequence of the layout
    pub fn generate(&self) -> RenderResult<Vec<Plane>> {
        match *self {
            PlaneLayout::Arc(ref arc) => Ok(arc_planes(arc)),
            PlaneLayout::Line(ref line) => line_planes(line),
            PlaneLayout::Axes => Ok(axis_planes()),
            PlaneLayout::Explicit { ref planes } => {
                planes.iter()
                    .map(|p| Plane::new(Vector3::from(p.normal), p.constant))
                    .collect()
            }
        }
    }

    /// Number of planes the layout produces
    pub fn count(&self) -> usize {
        match *self {
            PlaneLayout::Arc(ref arc) => arc.count,
            PlaneLayout::Line(ref line) => line.count,
            PlaneLayout::Axes => 3,
            PlaneLayout::Explicit { ref planes } => planes.len(),
        }
    }

    /// Changes the plane count of counted layouts. Fixed layouts are unchanged.
    pub fn set_count(&mut self, count: usize) {
        match *self {
            PlaneLayout::Arc(ref mut arc) => arc.count = count,
            PlaneLayout::Line(ref mut line) => line.count = count,
            PlaneLayout::Axes | PlaneLayout::Explicit { .. } => {}
        }
    }
}

/// Interpolation parameter of element `i` out of `count`, the midpoint when there is only one
#[inline]
fn spread(i: usize, count: usize) -> f32 {
    if count == 1 { 0.5 } else { i as f32 / (count - 1) as f32 }
}

/// Fan of planes on the XZ arc, every plane facing the origin.
///
/// Plane `i` passes through `radius * (cos θ, 0, sin θ)`.
/// The normal is derived from the angle alone, so a zero radius still yields valid planes.
pub fn arc_planes(layout: &ArcLayout) -> Vec<Plane> {
    let ArcLayout { count, radius, start_angle, end_angle } = *layout;

    (0..count).map(|i| {
        let theta = lerp(start_angle, end_angle, spread(i, count));
        let (sin, cos) = theta.sin_cos();

        let normal = -Vector3::new(cos, 0.0, sin);
        let point = Point3::from(normal * -radius);

        Plane::from_unit_normal(normal, -point.coords.dot(&normal))
    }).collect()
}

/// Parallel planes along one normal
pub fn line_planes(layout: &LineLayout) -> RenderResult<Vec<Plane>> {
    let LineLayout { count, normal, start, end } = *layout;
    let normal = Vector3::from(normal);

    (0..count).map(|i| Plane::new(normal, lerp(start, end, spread(i, count)))).collect()
}

/// Conventional three-axis box cut
pub fn axis_planes() -> Vec<Plane> {
    [-Vector3::x(), -Vector3::y(), -Vector3::z()].iter()
        .map(|&n| Plane::from_unit_normal(n, 0.0))
        .collect()
}
