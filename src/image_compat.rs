//! Conversion of framebuffers into `image` buffers

use crate::error::{RenderError, RenderResult};
use crate::framebuffer::RenderBuffer;
use crate::geometry::HasDimensions;

pub trait ImageFrameBuffer {
    /// Copies the color attachment into an 8-bit RGBA image
    fn copy_to_image(&self) -> RenderResult<image::RgbaImage>;
}

impl ImageFrameBuffer for RenderBuffer {
    fn copy_to_image(&self) -> RenderResult<image::RgbaImage> {
        let dimensions = self.dimensions();

        let mut res = Vec::with_capacity(dimensions.area() * 4);

        for pixel in self.iter() {
            res.extend_from_slice(&pixel.color.to_rgba8());
        }

        image::RgbaImage::from_raw(dimensions.width, dimensions.height, res).ok_or(RenderError::Image)
    }
}
