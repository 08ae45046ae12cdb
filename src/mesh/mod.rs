//! Indexed triangle meshes

use std::fmt::{self, Debug};

pub mod vertex;
pub mod primitives;

use crate::error::{RenderError, RenderResult};

pub use self::vertex::Vertex;

/// Mesh structure with indexed triangle vertices.
///
/// If you are unfamiliar with vertex indices, it's a way of re-using vertices for multiple triangles.
///
/// For example (in 2D), for a rectangle made of two triangles, you would define the four points for each corner vertex:
///
/// ```text
/// vertex #: name         = (x,   y)
/// 0:        bottom_left  = (0.0, 0.0)
/// 1:        bottom_right = (1.0, 0.0)
/// 2:        top_right    = (1.0, 1.0)
/// 3:        top_left     = (0.0, 1.0)
/// ```
///
/// then you'd have your index list be something like:
///
/// ```text
/// [0, 1, 2, // bottom right triangle
///  0, 2, 3] // top left triangle
/// ```
///
/// Front faces wind counter-clockwise when viewed from outside the solid.
#[derive(Clone)]
pub struct Mesh {
    indices: Vec<usize>,
    vertices: Vec<Vertex>,
}

impl Mesh {
    /// Creates a mesh, checking that the indices form whole triangles and reference existing vertices
    pub fn new(vertices: Vec<Vertex>, indices: Vec<usize>) -> RenderResult<Mesh> {
        if indices.len() % 3 != 0 {
            return Err(RenderError::InvalidVertexCount(indices.len()));
        }

        if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
            return Err(RenderError::IndexOutOfBounds { index, vertices: vertices.len() });
        }

        Ok(Mesh { indices, vertices })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] { &self.vertices }

    #[inline]
    pub fn indices(&self) -> &[usize] { &self.indices }

    /// Number of triangles in the mesh
    #[inline]
    pub fn triangle_count(&self) -> usize { self.indices.len() / 3 }

    /// Iterates over the vertices of every triangle
    pub fn triangles<'a>(&'a self) -> impl Iterator<Item = [&'a Vertex; 3]> + 'a {
        self.indices.chunks(3).map(move |tri| {
            [&self.vertices[tri[0]], &self.vertices[tri[1]], &self.vertices[tri[2]]]
        })
    }

    /// Radius of the smallest origin-centered sphere containing every vertex
    pub fn bounding_radius(&self) -> f32 {
        self.vertices.iter()
            .map(|v| v.position.coords.norm())
            .fold(0.0, f32::max)
    }
}

impl Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mesh {{ vertices: {}, triangles: {} }}", self.vertices.len(), self.triangle_count())
    }
}
