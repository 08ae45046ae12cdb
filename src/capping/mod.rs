//! Stencil-buffer capping of clipped solids
//!
//! Each frame is drawn as a sequence of stencil batches. Within a batch every (solid, plane) slot
//! first stamps its stencil bit with an invisible volume pass, then the clipped bodies are drawn,
//! then each cap is drawn where its bit is set. The last cap of a batch clears the stencil buffer.

pub mod allocator;
pub mod cap;
pub mod generator;
pub mod order;
pub mod session;
pub mod update;
pub mod volume;

pub use self::allocator::{StencilAlgorithm, StencilBitAssignment};
pub use self::cap::{Cap, CapColoring};
pub use self::generator::{ArcLayout, LineLayout, PlaneDescriptor, PlaneLayout};
pub use self::order::{BatchState, BatchTracker, DrawCommand, Phase, RenderOrder};
pub use self::session::ClippingSession;
pub use self::volume::StencilVolume;
