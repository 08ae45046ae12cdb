//! Procedural meshes

use std::f32::consts::PI;

use nalgebra::Vector3;

use super::{Mesh, Vertex};

impl Mesh {
    /// Flat rectangle in the XY plane, centered on the origin, facing +Z
    pub fn quad(width: f32, height: f32) -> Mesh {
        let (hw, hh) = (width * 0.5, height * 0.5);

        Mesh {
            vertices: vec![
                Vertex::new(-hw, -hh, 0.0),
                Vertex::new(hw, -hh, 0.0),
                Vertex::new(hw, hh, 0.0),
                Vertex::new(-hw, hh, 0.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// Closed cylinder centered on the origin with its axis along Y
    pub fn cylinder(radius: f32, height: f32, segments: usize) -> Mesh {
        let segments = segments.max(3);
        let hh = height * 0.5;

        let mut vertices = Vec::with_capacity(segments * 2 + 2);
        let mut indices = Vec::with_capacity(segments * 12);

        for k in 0..segments {
            let theta = 2.0 * PI * k as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();

            vertices.push(Vertex::new(radius * cos, -hh, radius * sin));
            vertices.push(Vertex::new(radius * cos, hh, radius * sin));
        }

        let bottom_center = vertices.len();
        vertices.push(Vertex::new(0.0, -hh, 0.0));
        let top_center = vertices.len();
        vertices.push(Vertex::new(0.0, hh, 0.0));

        for k in 0..segments {
            let next = (k + 1) % segments;
            let (b0, t0) = (2 * k, 2 * k + 1);
            let (b1, t1) = (2 * next, 2 * next + 1);

            // side
            indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
            // top and bottom fans
            indices.extend_from_slice(&[top_center, t1, t0]);
            indices.extend_from_slice(&[bottom_center, b0, b1]);
        }

        Mesh { vertices, indices }
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
        let half = Vector3::new(width * 0.5, height * 0.5, depth * 0.5);

        let (x, y, z) = (Vector3::x(), Vector3::y(), Vector3::z());

        // (normal, u, v) with u × v = normal
        let faces = [
            (x, y, z),
            (y, z, x),
            (z, x, y),
            (-x, z, y),
            (-y, x, z),
            (-z, y, x),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for &(n, u, v) in faces.iter() {
            let base = vertices.len();

            for &(su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].iter() {
                let corner: Vector3<f32> = n + u * su + v * sv;
                vertices.push(Vertex::from(nalgebra::Point3::from(corner.component_mul(&half))));
            }

            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Mesh { vertices, indices }
    }

    /// Torus centered on the origin, lying in the XY plane
    pub fn torus(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> Mesh {
        let radial = radial_segments.max(3);
        let tubular = tubular_segments.max(3);

        let mut vertices = Vec::with_capacity(radial * tubular);
        let mut indices = Vec::with_capacity(radial * tubular * 6);

        for i in 0..tubular {
            let u = 2.0 * PI * i as f32 / tubular as f32;
            let (su, cu) = u.sin_cos();

            for j in 0..radial {
                let v = 2.0 * PI * j as f32 / radial as f32;
                let (sv, cv) = v.sin_cos();
                let ring = radius + tube * cv;

                vertices.push(Vertex::new(ring * cu, ring * su, tube * sv));
            }
        }

        let at = |i: usize, j: usize| (i % tubular) * radial + (j % radial);

        for i in 0..tubular {
            for j in 0..radial {
                let (a, b, c, d) = (at(i, j), at(i + 1, j), at(i, j + 1), at(i + 1, j + 1));

                indices.extend_from_slice(&[a, b, c, b, d, c]);
            }
        }

        Mesh { vertices, indices }
    }
}
