//! Scene objects produced by the capping subsystem and consumed by a renderer

use std::fmt;
use std::sync::Arc;

use nalgebra::{Isometry3, Vector3};

use crate::capping::order::RenderOrder;
use crate::color::Color;
use crate::geometry::PlaneId;
use crate::mesh::Mesh;

pub mod material;

pub use self::material::{ClipPlanes, Material, Side};

/// Stable index of a solid within a `ClippingSession`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolidId(pub usize);

impl SolidId {
    #[inline(always)]
    pub fn index(self) -> usize { self.0 }
}

impl fmt::Display for SolidId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "solid#{}", self.0)
    }
}

/// A closed mesh being clipped.
///
/// The mesh is shared read-only between the body and every stencil volume built from it.
#[derive(Debug, Clone)]
pub struct Solid {
    pub mesh: Arc<Mesh>,
    /// Local frame of the solid in world space
    pub transform: Isometry3<f32>,
    pub color: Color,
}

impl Solid {
    pub fn new(mesh: Arc<Mesh>, color: Color) -> Solid {
        Solid { mesh, transform: Isometry3::identity(), color }
    }

    #[inline]
    pub fn with_transform(mut self, transform: Isometry3<f32>) -> Solid {
        self.transform = transform;
        self
    }
}

/// What a drawable represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    /// Stencil-only pass of a solid against one plane
    StencilVolume { slot: usize },
    /// The clipped solid itself
    Body { solid: SolidId },
    /// Cross-section cap of one slot
    Cap { slot: usize },
    /// Debug visualization of a plane
    Helper { plane: PlaneId },
}

/// A single draw call, as data.
///
/// `clears_stencil_after` asks the renderer to clear the stencil buffer once this drawable has been drawn,
/// or at its position in the draw order if it is hidden.
#[derive(Debug, Clone)]
pub struct Drawable {
    pub kind: DrawableKind,
    pub mesh: Arc<Mesh>,
    pub material: Material,
    pub transform: Isometry3<f32>,
    pub order: RenderOrder,
    pub clears_stencil_after: bool,
    pub visible: bool,
}

/// Places `count` solids on a grid centered on the origin.
///
/// Columns run along Z, wrapping into rows along Y after `per_row` solids.
pub fn grid_layout(count: usize, per_row: usize, offset: f32) -> Vec<Isometry3<f32>> {
    let cols = per_row.max(1);
    let rows = (count + cols - 1) / cols;

    let half_cols = (cols as f32 - 1.0) * 0.5;
    let half_rows = (rows as f32 - 1.0) * 0.5;

    (0..count).map(|i| {
        let (row, col) = (i / cols, i % cols);

        Isometry3::translation(0.0,
                               (row as f32 - half_rows) * offset,
                               (col as f32 - half_cols) * offset)
    }).collect()
}

/// Translation part of a transform, for logging and tests
#[inline]
pub fn position_of(transform: &Isometry3<f32>) -> Vector3<f32> {
    transform.translation.vector
}
