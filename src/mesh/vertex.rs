use nalgebra::Point3;

/// A single vertex with an object-space position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position of the vertex in object-space
    pub position: Point3<f32>,
}

impl Vertex {
    #[inline(always)]
    pub fn new(x: f32, y: f32, z: f32) -> Vertex {
        Vertex { position: Point3::new(x, y, z) }
    }
}

impl From<Point3<f32>> for Vertex {
    #[inline(always)]
    fn from(position: Point3<f32>) -> Vertex {
        Vertex { position }
    }
}
