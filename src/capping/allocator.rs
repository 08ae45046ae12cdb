//! Stencil bit allocation
//!
//! Every slot (one solid against one plane) needs its own stencil result. Hardware stencil buffers are
//! usually 8 bits wide, so the bit-packed allocator hands out one bit per slot and groups slots into
//! batches of 8. Each batch must be drawn completely and the stencil buffer cleared before the next one starts.
//!
//! The parity allocator gives every slot an isolated batch of its own, because the increment/decrement
//! volumes count through the whole stencil value rather than a single bit.

use serde::{Deserialize, Serialize};

use crate::stencil::STENCIL_BITS;

/// Stencil algorithm used to mark the cross-section of a clipped solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StencilAlgorithm {
    /// Back faces increment, front faces decrement. One slot per batch.
    Parity,
    /// A single double-sided pass inverts one bit per slot. Up to 8 slots per batch.
    BitPacked,
}

impl Default for StencilAlgorithm {
    fn default() -> StencilAlgorithm { StencilAlgorithm::BitPacked }
}

/// Position of one slot's stencil result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilBitAssignment {
    pub batch: usize,
    /// Bit index in `[0, 8)`
    pub bit: u8,
    /// Last slot of its batch. The stencil buffer is cleared after this slot's cap.
    pub ends_batch: bool,
}

impl StencilBitAssignment {
    /// Single-bit mask of the assignment
    #[inline]
    pub fn mask(&self) -> u8 {
        1 << self.bit
    }
}

/// Assigns stencil bits to `count` slots.
///
/// A batch that ends early (`count` not a multiple of 8) still flags its last used slot,
/// so the stencil buffer is always left clean for whatever draws next.
pub fn allocate(algorithm: StencilAlgorithm, count: usize) -> Vec<StencilBitAssignment> {
    match algorithm {
        StencilAlgorithm::Parity => {
            (0..count).map(|i| StencilBitAssignment { batch: i, bit: 0, ends_batch: true }).collect()
        }
        StencilAlgorithm::BitPacked => {
            (0..count).map(|i| {
                let bit = i % STENCIL_BITS;

                StencilBitAssignment {
                    batch: i / STENCIL_BITS,
                    bit: bit as u8,
                    ends_batch: bit == STENCIL_BITS - 1 || i + 1 == count,
                }
            }).collect()
        }
    }
}

/// Number of batches needed for `count` slots
pub fn batch_count(algorithm: StencilAlgorithm, count: usize) -> usize {
    match algorithm {
        StencilAlgorithm::Parity => count,
        StencilAlgorithm::BitPacked => (count + STENCIL_BITS - 1) / STENCIL_BITS,
    }
}
