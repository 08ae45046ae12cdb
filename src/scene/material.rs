//! Draw-call state attached to every drawable

use smallvec::SmallVec;

use crate::color::Color;
use crate::geometry::PlaneId;
use crate::stencil::StencilState;

/// Active clip planes of a draw call, referenced by id into the session's plane array
pub type ClipPlanes = SmallVec<[PlaneId; 8]>;

/// Which faces of a mesh are rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
    Double,
}

impl Side {
    /// Whether a triangle with the given facing is drawn
    #[inline]
    pub fn accepts(self, front_facing: bool) -> bool {
        match self {
            Side::Front => front_facing,
            Side::Back => !front_facing,
            Side::Double => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub side: Side,
    pub clip_planes: ClipPlanes,
    /// `None` disables both stencil testing and stencil writes
    pub stencil: Option<StencilState<u8>>,
    pub depth_test: bool,
    pub depth_write: bool,
    pub color_write: bool,
    /// Source-over blending with the framebuffer
    pub blend: bool,
}

impl Material {
    /// Ordinary opaque surface, front faces only
    pub fn surface(color: Color) -> Material {
        Material {
            color,
            side: Side::Front,
            clip_planes: ClipPlanes::new(),
            stencil: None,
            depth_test: true,
            depth_write: true,
            color_write: true,
            blend: false,
        }
    }

    /// Invisible pass that only stamps the stencil buffer
    pub fn stencil_only(stencil: StencilState<u8>) -> Material {
        Material {
            color: Color::TRANSPARENT,
            side: Side::Double,
            clip_planes: ClipPlanes::new(),
            stencil: Some(stencil),
            depth_test: false,
            depth_write: false,
            color_write: false,
            blend: false,
        }
    }

    #[inline]
    pub fn with_side(mut self, side: Side) -> Material {
        self.side = side;
        self
    }

    pub fn with_clip_planes<I>(mut self, planes: I) -> Material where I: IntoIterator<Item = PlaneId> {
        self.clip_planes = planes.into_iter().collect();
        self
    }

    #[inline]
    pub fn with_stencil(mut self, stencil: StencilState<u8>) -> Material {
        self.stencil = Some(stencil);
        self
    }

    /// Whether any stencil operation of this material can modify the buffer
    pub fn writes_stencil(&self) -> bool {
        use crate::stencil::StencilOp;

        match self.stencil {
            Some(ref s) if s.write_mask != 0 => {
                [s.fail, s.depth_fail, s.pass].iter().any(|op| *op != StencilOp::Keep)
            }
            _ => false,
        }
    }
}
