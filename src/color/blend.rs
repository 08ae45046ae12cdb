//! Defines color blending trait and standard blend function handling

use super::Color;

/// Defines some kind of color blending function
pub trait Blend: Send + Sync {
    /// The first parameter passed to the blend function is the incoming fragment color, the source color.
    ///
    /// The second parameter passed to the blend function is the existing value in the framebuffer to blend over.
    ///
    /// For a generic alpha-over blend function, check the Wikipedia article [Here](https://en.wikipedia.org/wiki/Alpha_compositing)
    /// for the *over* color function.
    fn blend(&self, src: Color, dst: Color) -> Color;
}

impl<'a, B> Blend for &'a B where B: Blend {
    fn blend(&self, src: Color, dst: Color) -> Color {
        (**self).blend(src, dst)
    }
}

/// No blending, the source color replaces the destination
impl Blend for () {
    #[inline(always)]
    fn blend(&self, src: Color, _: Color) -> Color { src }
}

/// Standard non-premultiplied *over* operator
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOver;

impl Blend for SourceOver {
    #[inline]
    fn blend(&self, src: Color, dst: Color) -> Color {
        let sa = src.a;
        let da = 1.0 - sa;

        Color {
            r: src.r * sa + dst.r * da,
            g: src.g * sa + dst.g * da,
            b: src.b * sa + dst.b * da,
            a: sa + dst.a * da,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_opaque_source_replaces() {
        let src = Color::rgb(0.2, 0.4, 0.6);
        assert_eq!(SourceOver.blend(src, Color::WHITE), src);
    }

    #[test]
    fn test_transparent_source_keeps_destination() {
        let dst = Color::rgb(0.2, 0.4, 0.6);
        assert_eq!(SourceOver.blend(Color::TRANSPARENT, dst), dst);
    }
}
