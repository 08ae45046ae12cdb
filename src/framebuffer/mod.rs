//! Interleaved color, depth and stencil framebuffer

use std::slice;

use crate::color::Color;
use crate::error::{RenderError, RenderResult};
use crate::geometry::{Dimensions, HasDimensions};

/// Depth of a cleared pixel. Every fragment passes the depth test against it.
pub const FAR_DEPTH: f32 = ::std::f32::INFINITY;

/// All attachments of a single pixel, stored together for cache locality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub color: Color,
    /// Normalized device depth, smaller is nearer
    pub depth: f32,
    pub stencil: u8,
}

impl Pixel {
    #[inline]
    pub fn cleared(color: Color) -> Pixel {
        Pixel { color, depth: FAR_DEPTH, stencil: 0 }
    }
}

/// A framebuffer with interleaved attachments
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    dimensions: Dimensions,
    clear_color: Color,
    pub(crate) buffer: Vec<Pixel>,
}

impl RenderBuffer {
    /// Creates a cleared framebuffer. Both dimensions must be non-zero.
    pub fn with_dimensions(dimensions: Dimensions, clear_color: Color) -> RenderResult<RenderBuffer> {
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(RenderError::InvalidDimensions);
        }

        Ok(RenderBuffer {
            dimensions,
            clear_color,
            buffer: vec![Pixel::cleared(clear_color); dimensions.area()],
        })
    }

    #[inline]
    pub fn clear_color(&self) -> Color { self.clear_color }

    #[inline]
    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Resets every attachment of every pixel
    pub fn clear(&mut self) {
        let cleared = Pixel::cleared(self.clear_color);

        for pixel in &mut self.buffer {
            *pixel = cleared;
        }
    }

    /// Resets only the stencil attachment to zero
    pub fn clear_stencil(&mut self) {
        for pixel in &mut self.buffer {
            pixel.stencil = 0;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> RenderResult<&Pixel> {
        if self.dimensions.in_bounds(x, y) {
            Ok(&self.buffer[self.dimensions.index(x, y)])
        } else {
            Err(RenderError::InvalidPixelCoordinate)
        }
    }

    #[inline]
    pub fn color_at(&self, x: u32, y: u32) -> RenderResult<Color> {
        self.pixel(x, y).map(|p| p.color)
    }

    #[inline]
    pub fn depth_at(&self, x: u32, y: u32) -> RenderResult<f32> {
        self.pixel(x, y).map(|p| p.depth)
    }

    #[inline]
    pub fn stencil_at(&self, x: u32, y: u32) -> RenderResult<u8> {
        self.pixel(x, y).map(|p| p.stencil)
    }

    /// Iterates over pixels in row-major order
    pub fn iter(&self) -> slice::Iter<'_, Pixel> {
        self.buffer.iter()
    }

    /// Splits the framebuffer into horizontal bands of `rows` rows each
    pub(crate) fn bands_mut(&mut self, rows: u32) -> slice::ChunksMut<'_, Pixel> {
        let rows = rows.max(1) as usize;

        self.buffer.chunks_mut(rows * self.dimensions.width as usize)
    }
}

impl HasDimensions for RenderBuffer {
    #[inline]
    fn dimensions(&self) -> Dimensions { self.dimensions }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(RenderBuffer::with_dimensions(Dimensions::new(0, 4), Color::BLACK).is_err());
    }

    #[test]
    fn test_clear_stencil_keeps_color_and_depth() {
        let mut fb = RenderBuffer::with_dimensions(Dimensions::new(2, 2), Color::BLACK).unwrap();

        fb.buffer[3] = Pixel { color: Color::WHITE, depth: 0.5, stencil: 0xFF };
        fb.clear_stencil();

        assert_eq!(fb.pixel(1, 1).unwrap(), &Pixel { color: Color::WHITE, depth: 0.5, stencil: 0 });

        fb.clear();

        assert_eq!(fb.pixel(1, 1).unwrap(), &Pixel::cleared(Color::BLACK));
    }

    #[test]
    fn test_out_of_bounds() {
        let fb = RenderBuffer::with_dimensions(Dimensions::new(2, 3), Color::BLACK).unwrap();

        assert!(fb.pixel(1, 2).is_ok());
        assert!(fb.pixel(2, 0).is_err());
        assert!(fb.stencil_at(0, 3).is_err());
    }

    #[test]
    fn test_bands_cover_buffer() {
        let mut fb = RenderBuffer::with_dimensions(Dimensions::new(4, 5), Color::BLACK).unwrap();

        let lens: Vec<usize> = fb.bands_mut(2).map(|b| b.len()).collect();

        assert_eq!(lens, vec![8, 8, 4]);
    }
}
