//! Rendering host interface and a reference software implementation

use crate::error::RenderResult;
use crate::geometry::Plane;
use crate::scene::Drawable;

pub mod camera;
pub mod raster;
pub mod software;

pub use self::camera::Camera;
pub use self::raster::RenderStats;
pub use self::software::SoftwareRenderer;

pub use crate::capping::order::DrawCommand;

/// Anything that can execute the draw calls of a `ClippingSession`.
///
/// Implementors must execute draws and stencil clears in exactly the order they are submitted.
pub trait Renderer {
    /// Clears color, depth and stencil before a new frame
    fn begin_frame(&mut self);

    /// Draws a single drawable.
    ///
    /// `planes` is the session's full plane array, indexed by the ids in the material's clip plane list.
    fn draw(&mut self, drawable: &Drawable, planes: &[Plane]) -> RenderResult<()>;

    /// Zeroes the whole stencil buffer
    fn clear_stencil(&mut self);

    /// Whether per-material clip planes are honored at all
    fn local_clipping_enabled(&self) -> bool;
}
