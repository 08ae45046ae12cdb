//! Error types

use thiserror::Error;

use crate::capping::order::Phase;
use crate::geometry::PlaneId;
use crate::scene::SolidId;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Plane normal has zero length")]
    DegeneratePlaneNormal,
    #[error("{0} indices is invalid for triangle indexing")]
    InvalidVertexCount(usize),
    #[error("Index {index} is out of bounds for {vertices} vertices")]
    IndexOutOfBounds { index: usize, vertices: usize },
    #[error("Invalid pixel coordinate")]
    InvalidPixelCoordinate,
    #[error("Framebuffer dimensions must be non-zero")]
    InvalidDimensions,
    #[error("Unknown plane {0:?}")]
    UnknownPlane(PlaneId),
    #[error("Unknown solid {0:?}")]
    UnknownSolid(SolidId),
    #[error("{phase:?} draw submitted out of order in stencil batch {batch}")]
    OutOfOrderDraw { batch: usize, phase: Phase },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[cfg(feature = "image_compat")]
    #[error("Image buffer could not be created from framebuffer")]
    Image,
}

pub type RenderResult<T> = Result<T, RenderError>;
