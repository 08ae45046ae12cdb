//! Render-order sequencing
//!
//! Every drawable carries a `RenderOrder`. Sorting by it yields one deterministic total order per frame:
//!
//! ```text
//! batch 0: stencil volumes -> bodies -> caps -> last cap + stencil clear
//! batch 1: stencil volumes -> bodies -> caps -> last cap + stencil clear
//! ...
//! overlay: plane helpers
//! ```

use crate::error::{RenderError, RenderResult};
use crate::scene::Drawable;

/// Sub-phase of a batch, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    StencilVolume,
    Solid,
    Cap,
    /// The cap that ends a batch and clears the stencil buffer after drawing
    CapWithClear,
    /// Debug visualizations, after every batch
    Overlay,
}

/// Draw order of a drawable.
///
/// Compares by batch, then phase, then slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderOrder {
    pub batch: usize,
    pub phase: Phase,
    pub slot: usize,
}

impl RenderOrder {
    #[inline]
    pub fn new(batch: usize, phase: Phase, slot: usize) -> RenderOrder {
        RenderOrder { batch, phase, slot }
    }
}

/// A single step of a frame, as executed by a renderer
#[derive(Debug, Clone, Copy)]
pub enum DrawCommand<'a> {
    Draw(&'a Drawable),
    ClearStencil,
}

/// Sorts drawables into submission order.
///
/// The sort is stable, so drawables with equal orders keep their relative order.
/// Hidden drawables are skipped, but their stencil clears are still emitted.
pub fn sequence<'a, I>(drawables: I) -> Vec<DrawCommand<'a>> where I: IntoIterator<Item = &'a Drawable> {
    let mut sorted: Vec<&'a Drawable> = drawables.into_iter().collect();

    sorted.sort_by_key(|d| d.order);

    let mut commands = Vec::with_capacity(sorted.len());

    for drawable in sorted {
        if drawable.visible {
            commands.push(DrawCommand::Draw(drawable));
        }

        if drawable.clears_stencil_after {
            commands.push(DrawCommand::ClearStencil);
        }
    }

    commands
}

/// Per-batch progress through a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    StencilVolumesDrawn,
    SolidDrawn,
    /// Number of caps drawn so far
    CapsDrawn(usize),
    LastCapDrawn,
    StencilCleared,
}

/// Checks that submitted draws follow the batch state machine.
///
/// Phases only move forward within a batch, batches only move forward within a frame,
/// and nothing but a new batch may follow a stencil clear.
#[derive(Debug, Clone, Copy)]
pub struct BatchTracker {
    batch: usize,
    state: BatchState,
    started: bool,
}

impl Default for BatchTracker {
    fn default() -> BatchTracker { BatchTracker::new() }
}

impl BatchTracker {
    pub fn new() -> BatchTracker {
        BatchTracker { batch: 0, state: BatchState::Idle, started: false }
    }

    #[inline]
    pub fn batch(&self) -> usize { self.batch }

    #[inline]
    pub fn state(&self) -> BatchState { self.state }

    /// Records a draw with the given order
    pub fn draw(&mut self, order: RenderOrder) -> RenderResult<()> {
        if self.started && order.batch < self.batch {
            return Err(RenderError::OutOfOrderDraw { batch: order.batch, phase: order.phase });
        }

        // a batch only closes on its stencil clear, overlays excepted
        if self.started && order.batch > self.batch && order.phase != Phase::Overlay
            && self.state != BatchState::StencilCleared {
            return Err(RenderError::OutOfOrderDraw { batch: order.batch, phase: order.phase });
        }

        if !self.started || order.batch > self.batch {
            self.batch = order.batch;
            self.state = BatchState::Idle;
            self.started = true;
        }

        let rank = |state: BatchState| match state {
            BatchState::Idle => 0,
            BatchState::StencilVolumesDrawn => 1,
            BatchState::SolidDrawn => 2,
            BatchState::CapsDrawn(_) => 3,
            BatchState::LastCapDrawn => 4,
            BatchState::StencilCleared => 5,
        };

        let next = match (order.phase, self.state) {
            (_, BatchState::LastCapDrawn) | (_, BatchState::StencilCleared) => None,
            (Phase::StencilVolume, _) => Some(BatchState::StencilVolumesDrawn),
            (Phase::Solid, _) => Some(BatchState::SolidDrawn),
            (Phase::Cap, BatchState::CapsDrawn(n)) => Some(BatchState::CapsDrawn(n + 1)),
            (Phase::Cap, _) => Some(BatchState::CapsDrawn(1)),
            (Phase::CapWithClear, _) => Some(BatchState::LastCapDrawn),
            // overlays draw on top of a finished frame
            (Phase::Overlay, state) => Some(state),
        };

        match next {
            Some(next) if rank(next) >= rank(self.state) => {
                self.state = next;
                Ok(())
            }
            _ => Err(RenderError::OutOfOrderDraw { batch: order.batch, phase: order.phase }),
        }
    }

    /// Records a stencil clear, which closes the current batch
    pub fn clear_stencil(&mut self) {
        self.state = BatchState::StencilCleared;
    }
}
