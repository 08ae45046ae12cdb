//! Stencil buffer types, tests and operations

use num_traits::{PrimInt, WrappingAdd, WrappingSub};

use crate::behavior::ThreadSafeCopyable;

/// Width of the stencil channel in bits
pub const STENCIL_BITS: usize = 8;

/// Defines a type that can be used in a stencil buffer.
///
/// This is automatically implemented for any type that implements its dependent traits
pub trait StencilType: ThreadSafeCopyable + PrimInt + WrappingSub + WrappingAdd + Default {}

impl<T> StencilType for T where T: ThreadSafeCopyable + PrimInt + WrappingSub + WrappingAdd + Default {}

/// Defines tests which can be performed on stencil buffers
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum StencilTest {
    /// Always pass
    Always,
    /// Never pass
    Never,
    /// Pass if the reference value is less than the stored value
    LessThan,
    /// Pass if the reference value is greater than the stored value
    GreaterThan,
    /// Pass if the reference value is less than or equal to the stored value
    LessThanEq,
    /// Pass if the reference value is greater than or equal to the stored value
    GreaterThanEq,
    /// Pass only if the reference value is equal to the stored value
    Equal,
    /// Pass only if the reference value is NOT equal to the stored value
    NotEqual,
}

impl StencilTest {
    /// Performs the stencil test on any `StencilType` type
    #[inline]
    pub fn test<T>(&self, present: T, value: T) -> bool where T: StencilType {
        match *self {
            StencilTest::Always => true,
            StencilTest::Never => false,
            StencilTest::LessThan => value < present,
            StencilTest::LessThanEq => value <= present,
            StencilTest::GreaterThan => value > present,
            StencilTest::GreaterThanEq => value >= present,
            StencilTest::Equal => value == present,
            StencilTest::NotEqual => value != present,
        }
    }
}

/// Defines the operation to be performed on the stored stencil value
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum StencilOp<T> {
    /// Keep the previous stencil value
    Keep,
    /// Perform a bitwise negation on the previous value
    Invert,
    /// Replace the previous value with zero
    Zero,
    /// Replace the previous value with the given value
    Replace(T),
    /// Increment the previous value by one, wrapping as desired.
    Increment { wrap: bool },
    /// Decrement the previous value by one, wrapping as desired.
    Decrement { wrap: bool },
}

impl<T> StencilOp<T> where T: StencilType {
    /// Performs the operation on the value, returning the new value
    #[inline]
    pub fn op(&self, value: T) -> T {
        match *self {
            StencilOp::Keep => value,
            StencilOp::Invert => !value,
            StencilOp::Zero => T::zero(),
            StencilOp::Replace(replacement) => replacement,
            StencilOp::Increment { wrap: true } => value.wrapping_add(&T::one()),
            StencilOp::Decrement { wrap: true } => value.wrapping_sub(&T::one()),
            StencilOp::Increment { wrap: false } => value.saturating_add(T::one()),
            StencilOp::Decrement { wrap: false } => value.saturating_sub(T::one()),
        }
    }
}

/// Full stencil configuration of a single draw call.
///
/// The test compares `reference & read_mask` against `stored & read_mask`.
/// Only the bits in `write_mask` are ever modified by the operations.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct StencilState<T> {
    pub test: StencilTest,
    pub reference: T,
    pub read_mask: T,
    pub write_mask: T,
    /// Applied when the stencil test fails
    pub fail: StencilOp<T>,
    /// Applied when the stencil test passes but the depth test fails
    pub depth_fail: StencilOp<T>,
    /// Applied when both tests pass
    pub pass: StencilOp<T>,
}

impl<T> StencilState<T> where T: StencilType {
    /// Applies the same operation regardless of the test outcomes
    pub fn uniform(test: StencilTest, reference: T, op: StencilOp<T>) -> StencilState<T> {
        StencilState {
            test,
            reference,
            read_mask: !T::zero(),
            write_mask: !T::zero(),
            fail: op,
            depth_fail: op,
            pass: op,
        }
    }

    #[inline]
    pub fn with_read_mask(mut self, mask: T) -> StencilState<T> {
        self.read_mask = mask;
        self
    }

    #[inline]
    pub fn with_write_mask(mut self, mask: T) -> StencilState<T> {
        self.write_mask = mask;
        self
    }

    /// Runs the masked stencil test against the stored value
    #[inline]
    pub fn passes(&self, stored: T) -> bool {
        self.test.test(stored & self.read_mask, self.reference & self.read_mask)
    }

    /// Applies `op` to the stored value, leaving bits outside the write mask untouched
    #[inline]
    pub fn apply(&self, op: StencilOp<T>, stored: T) -> T {
        (stored & !self.write_mask) | (op.op(stored) & self.write_mask)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wrapping_ops() {
        assert_eq!(StencilOp::Increment { wrap: true }.op(255u8), 0);
        assert_eq!(StencilOp::Decrement { wrap: true }.op(0u8), 255);
        assert_eq!(StencilOp::Increment { wrap: false }.op(255u8), 255);
        assert_eq!(StencilOp::Decrement { wrap: false }.op(0u8), 0);
    }

    #[test]
    fn test_masked_invert_flips_single_bit() {
        let state = StencilState::uniform(StencilTest::Always, 0b100u8, StencilOp::Invert)
            .with_write_mask(0b100);

        let once = state.apply(state.pass, 0b0000_0011);
        assert_eq!(once, 0b0000_0111);

        let twice = state.apply(state.pass, once);
        assert_eq!(twice, 0b0000_0011);
    }

    #[test]
    fn test_masked_equal_ignores_other_bits() {
        let state = StencilState::uniform(StencilTest::Equal, 0b1000u8, StencilOp::Keep)
            .with_read_mask(0b1000);

        assert!(state.passes(0b1111_1000));
        assert!(state.passes(0b0000_1000));
        assert!(!state.passes(0b1111_0111));
    }

    #[test]
    fn test_not_equal_zero() {
        let state = StencilState::uniform(StencilTest::NotEqual, 0u8, StencilOp::Replace(0));

        assert!(state.passes(3));
        assert!(!state.passes(0));
        assert_eq!(state.apply(state.pass, 3), 0);
    }
}
