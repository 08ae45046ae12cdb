//! Clipping planes as half-space descriptors

use std::fmt;

use nalgebra::{Isometry3, Point3, Vector3};

use crate::error::{RenderError, RenderResult};

/// Smallest normal length accepted when constructing a plane
pub const MIN_NORMAL_LENGTH: f32 = 1e-12;

/// Stable index of a plane within a `ClippingSession`'s plane array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneId(pub usize);

impl PlaneId {
    #[inline(always)]
    pub fn index(self) -> usize { self.0 }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "plane#{}", self.0)
    }
}

/// A plane in 3D space, represented as `normal · point + constant = 0`.
///
/// Points with a negative signed distance are on the clipped side of the plane.
///
/// The normal is always unit length. Every constructor and mutation preserves that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector3<f32>,
    constant: f32,
}

impl Plane {
    /// Creates a plane from any non-zero normal and a constant.
    ///
    /// Both are scaled by the inverse length of the normal, so the described plane is unchanged.
    pub fn new(normal: Vector3<f32>, constant: f32) -> RenderResult<Plane> {
        let norm = normal.norm();

        if !(norm > MIN_NORMAL_LENGTH) {
            return Err(RenderError::DegeneratePlaneNormal);
        }

        Ok(Plane {
            normal: normal / norm,
            constant: constant / norm,
        })
    }

    /// Creates a plane with the given normal passing through `point`
    pub fn from_normal_and_coplanar_point(normal: Vector3<f32>, point: Point3<f32>) -> RenderResult<Plane> {
        let mut plane = Plane::new(normal, 0.0)?;
        plane.constant = -point.coords.dot(&plane.normal);
        Ok(plane)
    }

    /// Builds a plane from a normal the caller guarantees to be unit length
    #[inline]
    pub(crate) fn from_unit_normal(normal: Vector3<f32>, constant: f32) -> Plane {
        debug_assert!((normal.norm() - 1.0).abs() < 1e-4, "plane normal must be unit length");

        Plane { normal, constant }
    }

    /// Unit normal of the plane
    #[inline]
    pub fn normal(&self) -> Vector3<f32> { self.normal }

    /// Signed distance from the origin to the plane, measured against the normal
    #[inline]
    pub fn constant(&self) -> f32 { self.constant }

    /// Moves the plane along its normal
    #[inline]
    pub fn set_constant(&mut self, constant: f32) {
        self.constant = constant;
    }

    /// Signed distance from `point` to the plane. Negative values are clipped.
    #[inline]
    pub fn distance_to_point(&self, point: &Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) + self.constant
    }

    /// The canonical point on the plane closest to the origin
    #[inline]
    pub fn coplanar_point(&self) -> Point3<f32> {
        Point3::from(self.normal * -self.constant)
    }

    /// Flips the orientation of the plane in place. The plane keeps its location.
    #[inline]
    pub fn negate(&mut self) {
        self.normal = -self.normal;
        self.constant = -self.constant;
    }

    /// Returns the plane with the opposite orientation
    #[inline]
    pub fn negated(mut self) -> Plane {
        self.negate();
        self
    }

    /// Returns the plane as seen through the rigid transform `iso`
    pub fn transformed(&self, iso: &Isometry3<f32>) -> Plane {
        let normal = (iso.rotation * self.normal).normalize();
        let point = iso * self.coplanar_point();

        Plane {
            normal,
            constant: -point.coords.dot(&normal),
        }
    }
}

#[cfg(test)]
mod test {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, Point3, Vector3};

    use super::Plane;

    #[test]
    fn test_normalizes_on_construction() {
        let plane = Plane::new(Vector3::new(0.0, 3.0, 4.0), 10.0).unwrap();

        assert_relative_eq!(plane.normal().norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(plane.constant(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_normal_is_rejected() {
        assert!(Plane::new(Vector3::zeros(), 1.0).is_err());
    }

    #[test]
    fn test_coplanar_point_lies_on_plane() {
        let plane = Plane::new(Vector3::new(1.0, -2.0, 0.5), 0.75).unwrap();

        assert_relative_eq!(plane.distance_to_point(&plane.coplanar_point()), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_negate_keeps_location() {
        let plane = Plane::new(Vector3::new(-1.0, 0.0, 0.0), 0.3).unwrap();
        let negated = plane.negated();

        assert_relative_eq!(negated.normal(), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(negated.coplanar_point(), plane.coplanar_point(), epsilon = 1e-6);
    }

    #[test]
    fn test_double_negate_round_trips() {
        let plane = Plane::new(Vector3::new(0.3, 0.4, -0.2), -1.25).unwrap();
        let twice = plane.negated().negated();

        assert_relative_eq!(twice.normal(), plane.normal(), epsilon = 1e-6);
        assert_relative_eq!(twice.constant(), plane.constant(), epsilon = 1e-6);
    }

    #[test]
    fn test_distance_sign() {
        let plane = Plane::new(Vector3::new(-1.0, 0.0, 0.0), 0.0).unwrap();

        assert!(plane.distance_to_point(&Point3::new(-1.0, 0.0, 0.0)) > 0.0);
        assert!(plane.distance_to_point(&Point3::new(1.0, 0.0, 0.0)) < 0.0);
    }

    #[test]
    fn test_transform_into_local_space() {
        // Plane x = 2 facing +X, seen from a frame translated by +2 along X
        let plane = Plane::from_normal_and_coplanar_point(Vector3::x(), Point3::new(2.0, 0.0, 0.0)).unwrap();
        let frame = Isometry3::translation(2.0, 0.0, 0.0);

        let local = plane.transformed(&frame.inverse());

        assert_relative_eq!(local.normal(), Vector3::x(), epsilon = 1e-6);
        assert_relative_eq!(local.constant(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_transform_rotation_keeps_unit_normal() {
        let plane = Plane::new(Vector3::new(0.0, 0.0, 1.0), -0.5).unwrap();
        let rotation = Isometry3::new(Vector3::new(0.5, -1.0, 3.0), Vector3::new(FRAC_PI_2, 0.0, 0.0));

        let moved = plane.transformed(&rotation);

        assert_relative_eq!(moved.normal().norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(moved.distance_to_point(&(rotation * plane.coplanar_point())), 0.0, epsilon = 1e-5);
    }
}
