//! Stencil-volume construction
//!
//! A stencil volume redraws a solid's own geometry with a single clip plane active, writing nothing but stencil.
//! Wherever the viewer looks through the cut into the solid's interior, the covered surfaces leave a
//! non-zero mark that the matching cap later tests against.

use smallvec::SmallVec;

use crate::geometry::PlaneId;
use crate::scene::{Drawable, DrawableKind, Material, Side, Solid, SolidId};
use crate::stencil::{StencilOp, StencilState, StencilTest};

use super::allocator::{StencilAlgorithm, StencilBitAssignment};
use super::order::{Phase, RenderOrder};

/// Stencil-only passes of one solid against one plane
#[derive(Debug, Clone)]
pub struct StencilVolume {
    pub slot: usize,
    pub plane: PlaneId,
    pub solid: SolidId,
    pub assignment: StencilBitAssignment,
    /// One double-sided pass for the bit-packed algorithm, back then front for parity
    pub passes: SmallVec<[Drawable; 2]>,
}

/// Toggles the assigned bit on every covered fragment, regardless of test outcomes.
///
/// Double coverage cancels, so the bit ends up set where the surface was crossed an odd number of times.
pub fn invert_bit(assignment: &StencilBitAssignment) -> StencilState<u8> {
    let mask = assignment.mask();

    StencilState::uniform(StencilTest::Always, mask, StencilOp::Invert).with_write_mask(mask)
}

/// Parity pass: back faces increment, front faces decrement, both wrapping
pub fn parity_count(side: Side) -> StencilState<u8> {
    let op = match side {
        Side::Back => StencilOp::Increment { wrap: true },
        _ => StencilOp::Decrement { wrap: true },
    };

    StencilState::uniform(StencilTest::Always, 0, op)
}

/// Builds the stencil volume of `solid` against the plane `plane`
pub fn build_volume(algorithm: StencilAlgorithm,
                    slot: usize,
                    plane: PlaneId,
                    solid_id: SolidId,
                    solid: &Solid,
                    assignment: StencilBitAssignment) -> StencilVolume {
    let order = RenderOrder::new(assignment.batch, Phase::StencilVolume, slot);

    let pass = |material: Material| Drawable {
        kind: DrawableKind::StencilVolume { slot },
        mesh: solid.mesh.clone(),
        material: material.with_clip_planes(Some(plane)),
        transform: solid.transform,
        order,
        clears_stencil_after: false,
        visible: true,
    };

    let passes = match algorithm {
        StencilAlgorithm::BitPacked => {
            let mut passes = SmallVec::new();
            passes.push(pass(Material::stencil_only(invert_bit(&assignment)).with_side(Side::Double)));
            passes
        }
        StencilAlgorithm::Parity => {
            [Side::Back, Side::Front].iter()
                .map(|&side| pass(Material::stencil_only(parity_count(side)).with_side(side)))
                .collect()
        }
    };

    StencilVolume { slot, plane, solid: solid_id, assignment, passes }
}
