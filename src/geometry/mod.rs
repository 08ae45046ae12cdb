//! Geometric primitives shared by the capping subsystem and the rendering host

pub mod dimension;
pub mod plane;

pub use self::dimension::{Dimensions, HasDimensions};
pub use self::plane::{Plane, PlaneId};
