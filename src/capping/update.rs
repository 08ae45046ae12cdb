//! Per-frame cap placement

use std::f32::consts::PI;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use crate::error::{RenderError, RenderResult};
use crate::geometry::Plane;
use crate::scene::{Drawable, DrawableKind, Solid};

use super::cap::Cap;

/// Pose of a quad facing `+Z` so that it lies on `plane`, centered on the plane's coplanar point,
/// with its front face pointing along the negated plane normal.
///
/// The front face looks into the clipped half-space, where the viewer of a cut stands.
pub fn placement(plane: &Plane) -> Isometry3<f32> {
    let facing = -plane.normal();

    let rotation = UnitQuaternion::rotation_between(&Vector3::z(), &facing)
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI));

    Isometry3::from_parts(Translation3::from(plane.coplanar_point().coords), rotation)
}

/// World pose of the cap of `plane` on `solid`.
///
/// The plane is moved into the solid's local frame first, so the cap stays centered on the solid
/// however the solid is translated or rotated.
pub fn cap_transform(plane: &Plane, solid: &Solid) -> Isometry3<f32> {
    let local = plane.transformed(&solid.transform.inverse());

    solid.transform * placement(&local)
}

/// Re-derives every cap pose from the current planes and solids
pub fn update_caps(caps: &mut [Cap], planes: &[Plane], solids: &[Solid]) -> RenderResult<()> {
    for cap in caps {
        let plane = planes.get(cap.plane.index()).ok_or(RenderError::UnknownPlane(cap.plane))?;
        let solid = solids.get(cap.solid.index()).ok_or(RenderError::UnknownSolid(cap.solid))?;

        cap.drawable.transform = cap_transform(plane, solid);
    }

    Ok(())
}

/// Re-derives the pose of every plane helper
pub fn update_helpers(helpers: &mut [Drawable], planes: &[Plane]) -> RenderResult<()> {
    for helper in helpers {
        if let DrawableKind::Helper { plane: id } = helper.kind {
            let plane = planes.get(id.index()).ok_or(RenderError::UnknownPlane(id))?;

            helper.transform = placement(plane);
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use std::f32::consts::FRAC_PI_2;
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    use crate::color::Color;
    use crate::mesh::Mesh;

    use super::*;

    fn plane(x: f32, y: f32, z: f32, c: f32) -> Plane {
        Plane::new(Vector3::new(x, y, z), c).unwrap()
    }

    #[test]
    fn test_placement_faces_negated_normal() {
        for p in &[plane(-1.0, 0.0, 0.0, 0.0), plane(0.3, -0.2, 0.9, 1.5), plane(0.0, 1.0, 0.0, -2.0)] {
            let pose = placement(p);

            assert_relative_eq!(pose * Vector3::z(), -p.normal(), epsilon = 1e-5);
            assert_relative_eq!(pose * Point3::origin(), p.coplanar_point(), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_placement_antiparallel_normal() {
        // normal +Z means the quad has to face -Z
        let pose = placement(&plane(0.0, 0.0, 1.0, 0.0));

        assert_relative_eq!(pose * Vector3::z(), -Vector3::z(), epsilon = 1e-5);
    }

    #[test]
    fn test_quad_corners_lie_on_plane() {
        let p = plane(1.0, 2.0, -0.5, 0.7);
        let pose = placement(&p);

        for v in Mesh::quad(4.0, 4.0).vertices() {
            assert_relative_eq!(p.distance_to_point(&(pose * v.position)), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_cap_follows_solid() {
        let p = plane(-1.0, 0.0, 0.0, 0.0);
        let solid = Solid::new(Arc::new(Mesh::cuboid(1.0, 1.0, 1.0)), Color::WHITE)
            .with_transform(Isometry3::new(Vector3::new(0.0, 3.0, -2.0), Vector3::new(0.0, FRAC_PI_2, 0.0)));

        let pose = cap_transform(&p, &solid);

        // centered on the solid's axis, still on the world plane
        assert_relative_eq!(pose.translation.vector, Vector3::new(0.0, 3.0, -2.0), epsilon = 1e-5);
        assert_relative_eq!(pose * Vector3::z(), Vector3::x(), epsilon = 1e-5);
    }
}
