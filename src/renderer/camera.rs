//! View and projection transforms

use nalgebra::{Isometry3, Matrix4, Orthographic3, Perspective3, Point3, Vector3};

/// A right-handed camera looking down its local `-Z` axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    eye: Point3<f32>,
    view: Isometry3<f32>,
    projection: Matrix4<f32>,
}

impl Camera {
    /// Perspective camera at `eye` looking at `target`. `fovy` is in radians.
    pub fn perspective(eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>,
                       fovy: f32, aspect: f32, near: f32, far: f32) -> Camera {
        Camera {
            eye,
            view: Isometry3::look_at_rh(&eye, &target, &up),
            projection: Perspective3::new(aspect, fovy, near, far).to_homogeneous(),
        }
    }

    /// Orthographic camera at `eye` looking at `target`, showing `2 * half_height` world units vertically
    pub fn orthographic(eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>,
                        half_height: f32, aspect: f32, near: f32, far: f32) -> Camera {
        let half_width = half_height * aspect;

        Camera {
            eye,
            view: Isometry3::look_at_rh(&eye, &target, &up),
            projection: Orthographic3::new(-half_width, half_width, -half_height, half_height, near, far).to_homogeneous(),
        }
    }

    #[inline]
    pub fn eye(&self) -> Point3<f32> { self.eye }

    /// World to view transform
    #[inline]
    pub fn view(&self) -> &Isometry3<f32> { &self.view }

    #[inline]
    pub fn projection(&self) -> &Matrix4<f32> { &self.projection }

    #[inline]
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view.to_homogeneous()
    }
}

#[cfg(test)]
mod test {
    use std::f32::consts::FRAC_PI_4;

    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    use super::Camera;

    #[test]
    fn test_target_projects_to_center() {
        let eye = Point3::new(3.0, 2.0, 5.0);

        for camera in &[Camera::perspective(eye, Point3::origin(), Vector3::y(), FRAC_PI_4, 1.5, 0.1, 50.0),
                        Camera::orthographic(eye, Point3::origin(), Vector3::y(), 2.0, 1.5, 0.1, 50.0)] {
            let clip = camera.view_projection() * Point3::<f32>::origin().to_homogeneous();

            assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
            assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_nearer_is_smaller_depth() {
        let camera = Camera::perspective(Point3::new(0.0, 0.0, 5.0), Point3::origin(), Vector3::y(),
                                         FRAC_PI_4, 1.0, 0.1, 50.0);
        let vp = camera.view_projection();

        let near = vp * Point3::new(0.0, 0.0, 1.0).to_homogeneous();
        let far = vp * Point3::new(0.0, 0.0, -1.0).to_homogeneous();

        assert!(near.z / near.w < far.z / far.w);
    }
}
