//! Stencil-buffer capping of clipped solids
//!
//! [Documentation](https://docs.rs/stencilcap/)
//!
//! Clipping a closed mesh with one or more planes leaves it hollow where it was cut.
//! This crate seals those cuts with flat "caps", using the stencil buffer to find exactly where
//! the cross-section of each solid lies on screen.
//!
//! ### Example:
//!
//! ```ignore
//! let mut session = ClippingSession::with_solids(SessionConfig::default(), vec![solid])?;
//! let mut renderer = SoftwareRenderer::new(Dimensions::new(512, 512), camera, Color::BLACK)?;
//!
//! session.render(&mut renderer)?;
//! ```
//!
//! See the `demos` directory for complete programs.
//!
//! ### Current Features:
//!
//! * Clip-plane generation on an arc, a line, the three axes, or from explicit planes.
//! * Bit-packed stencil allocation, up to 8 slots per stencil clear, and one-slot-per-clear parity mode.
//! * Stencil volumes, caps and clipped bodies built as plain data with an explicit draw order.
//! * Any number of solids against any number of planes.
//! * Per-frame cap placement that follows live plane edits and solid transforms.
//! * Validation of the per-batch draw order while rendering.
//! * A multithreaded software renderer with clip planes, stencil, depth and blending.
//! * JSON session configuration through `serde`.
//! * Built-in compatibility with the `image` crate, using the `image_compat` cargo feature.

pub mod behavior;
pub mod capping;
pub mod color;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod mesh;
pub mod renderer;
pub mod scene;
pub mod stencil;
pub mod utils;

#[cfg(feature = "image_compat")]
pub mod image_compat;

pub use capping::{ClippingSession, DrawCommand, PlaneLayout, StencilAlgorithm};
pub use color::Color;
pub use config::SessionConfig;
pub use error::{RenderError, RenderResult};
pub use framebuffer::RenderBuffer;
pub use geometry::{Dimensions, HasDimensions, Plane, PlaneId};
pub use mesh::{Mesh, Vertex};
pub use renderer::{Camera, Renderer, SoftwareRenderer};
pub use scene::{Drawable, Solid, SolidId};
