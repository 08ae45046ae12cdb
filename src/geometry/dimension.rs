/// Defines types with set dimensions
pub trait HasDimensions {
    /// Returns the dimensions of the object
    fn dimensions(&self) -> Dimensions;

    /// Checks if the given coordinate is within the dimension bounds of the current object
    #[inline]
    fn in_bounds(&self, x: u32, y: u32) -> bool {
        self.dimensions().in_bounds(x, y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[inline(always)]
    pub fn new(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    /// Returns the number of pixels as `usize` by multiplying the current width and height
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Width divided by height
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Checks if the given coordinate is within the dimension bounds
    #[inline]
    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Row-major index of the given coordinate
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
