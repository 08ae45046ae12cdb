//! Cross-section caps
//!
//! A cap is a flat quad lying on its plane, large enough to cover the solid's whole silhouette.
//! Its stencil test only lets it through where the matching stencil volume marked the interior,
//! and it is clipped by every other plane so it stops at the edges of the remaining wedge.

use std::sync::Arc;

use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::PlaneId;
use crate::mesh::Mesh;
use crate::scene::{Drawable, DrawableKind, Material, Side, SolidId};
use crate::stencil::{StencilOp, StencilState, StencilTest};

use super::allocator::{StencilAlgorithm, StencilBitAssignment};
use super::order::{Phase, RenderOrder};

/// Lightness of generated cap hues
pub const CAP_LIGHTNESS: f32 = 0.55;

/// How cap colors are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapColoring {
    /// Evenly spaced hues around the color wheel, one per slot
    PerSlotHue,
    /// The body color of the slot's solid
    MatchBody,
}

impl Default for CapColoring {
    fn default() -> CapColoring { CapColoring::PerSlotHue }
}

impl CapColoring {
    /// Color of slot `slot` out of `slots`
    pub fn color(self, slot: usize, slots: usize, body: Color) -> Color {
        match self {
            CapColoring::PerSlotHue => Color::from_hsl(slot as f32 / slots.max(1) as f32, 1.0, CAP_LIGHTNESS),
            CapColoring::MatchBody => body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cap {
    pub slot: usize,
    pub plane: PlaneId,
    pub solid: SolidId,
    pub assignment: StencilBitAssignment,
    pub drawable: Drawable,
}

/// Stencil gate of a cap.
///
/// The bit-packed gate only reads its own bit and never writes.
/// The parity gate passes on any non-zero count and zeroes what it covers.
pub fn cap_stencil(algorithm: StencilAlgorithm, assignment: &StencilBitAssignment) -> StencilState<u8> {
    match algorithm {
        StencilAlgorithm::BitPacked => {
            let mask = assignment.mask();

            StencilState::uniform(StencilTest::Equal, mask, StencilOp::Keep)
                .with_read_mask(mask)
                .with_write_mask(0)
        }
        StencilAlgorithm::Parity => StencilState::uniform(StencilTest::NotEqual, 0, StencilOp::Replace(0)),
    }
}

/// Parameters shared by every cap of one build
#[derive(Debug, Clone)]
pub struct CapTemplate<'a> {
    pub algorithm: StencilAlgorithm,
    /// Quad covering the largest solid silhouette
    pub mesh: Arc<Mesh>,
    /// Every plane of the configuration, in order
    pub planes: &'a [PlaneId],
}

impl<'a> CapTemplate<'a> {
    /// Builds the cap of one slot, placed at `transform`
    pub fn build(&self,
                 slot: usize,
                 plane: PlaneId,
                 solid: SolidId,
                 assignment: StencilBitAssignment,
                 color: Color,
                 transform: Isometry3<f32>) -> Cap {
        let phase = if assignment.ends_batch { Phase::CapWithClear } else { Phase::Cap };

        let material = Material::surface(color)
            .with_side(Side::Front)
            .with_clip_planes(self.planes.iter().cloned().filter(|&p| p != plane))
            .with_stencil(cap_stencil(self.algorithm, &assignment));

        let drawable = Drawable {
            kind: DrawableKind::Cap { slot },
            mesh: self.mesh.clone(),
            material,
            transform,
            order: RenderOrder::new(assignment.batch, phase, slot),
            clears_stencil_after: assignment.ends_batch,
            visible: true,
        };

        Cap { slot, plane, solid, assignment, drawable }
    }
}
