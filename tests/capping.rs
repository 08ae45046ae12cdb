use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use approx::assert_relative_eq;
use nalgebra::{Isometry3, Point3, Vector3};

use stencilcap::capping::{ArcLayout, BatchTracker, CapColoring, DrawCommand, Phase, PlaneDescriptor, PlaneLayout,
                          RenderOrder, StencilAlgorithm};
use stencilcap::scene::{DrawableKind, Side};
use stencilcap::stencil::StencilOp;
use stencilcap::{ClippingSession, Color, Drawable, Mesh, Plane, PlaneId, RenderResult, Renderer, SessionConfig,
                 Solid, SolidId};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    Begin,
    Draw(DrawableKind, RenderOrder),
    Clear,
}

/// Renderer that only records what it is asked to do
struct Recorder {
    events: Vec<Event>,
    clipping: bool,
}

impl Recorder {
    fn new() -> Recorder {
        Recorder { events: Vec::new(), clipping: true }
    }

    fn clears(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Clear).count()
    }
}

impl Renderer for Recorder {
    fn begin_frame(&mut self) {
        self.events.push(Event::Begin);
    }

    fn draw(&mut self, drawable: &Drawable, planes: &[Plane]) -> RenderResult<()> {
        assert!(drawable.material.clip_planes.iter().all(|id| id.index() < planes.len()));

        self.events.push(Event::Draw(drawable.kind, drawable.order));
        Ok(())
    }

    fn clear_stencil(&mut self) {
        self.events.push(Event::Clear);
    }

    fn local_clipping_enabled(&self) -> bool {
        self.clipping
    }
}

fn cylinder() -> Solid {
    Solid::new(Arc::new(Mesh::cylinder(1.0, 2.0, 32)), Color::from_hex(0xFFC107))
}

fn arc(count: usize) -> SessionConfig {
    SessionConfig::default().with_layout(PlaneLayout::Arc(ArcLayout { count, ..ArcLayout::default() }))
}

fn single_plane() -> SessionConfig {
    SessionConfig::default().with_layout(PlaneLayout::Explicit {
        planes: vec![PlaneDescriptor { normal: [-1.0, 0.0, 0.0], constant: 0.0 }],
    })
}

fn clear_slots(session: &ClippingSession) -> Vec<usize> {
    session.caps().iter().filter(|c| c.drawable.clears_stencil_after).map(|c| c.slot).collect()
}

#[test]
fn arc_planes_are_unit_and_face_origin() {
    for count in 0..24 {
        let session = ClippingSession::new(arc(count)).unwrap();

        assert_eq!(session.planes().len(), count);

        for plane in session.planes() {
            let toward_origin = -plane.coplanar_point().coords.normalize();

            assert_relative_eq!(plane.normal().norm(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(plane.normal(), toward_origin, epsilon = 1e-6);
        }
    }
}

#[test]
fn single_arc_plane_sits_at_midpoint() {
    let session = ClippingSession::new(arc(1)).unwrap();

    // midpoint of -π/2..π/2 is angle 0, the +X end of the arc
    assert_relative_eq!(session.planes()[0].coplanar_point(), Point3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
}

#[test]
fn bits_never_repeat_within_a_batch() {
    let mut session = ClippingSession::with_solids(arc(1), vec![cylinder(), cylinder()]).unwrap();

    for count in 0..40 {
        session.set_plane_count(count).unwrap();

        let assignments = session.assignments();
        assert_eq!(assignments.len(), 2 * count as usize);

        for (i, a) in assignments.iter().enumerate() {
            assert!(assignments[..i].iter().all(|b| b.batch != a.batch || b.bit != a.bit));
        }
    }
}

#[test]
fn double_negation_restores_plane() {
    let mut session = ClippingSession::new(arc(5)).unwrap();
    let before = session.planes()[3];

    session.negate_plane(PlaneId(3)).unwrap();
    assert_relative_eq!(session.planes()[3].normal(), -before.normal());
    assert_relative_eq!(session.planes()[3].coplanar_point(), before.coplanar_point(), epsilon = 1e-6);

    session.negate_plane(PlaneId(3)).unwrap();
    assert_relative_eq!(session.planes()[3].normal(), before.normal());
    assert_relative_eq!(session.planes()[3].constant(), before.constant());
}

#[test]
fn rebuild_is_idempotent() {
    let mut session = ClippingSession::with_solids(arc(11), vec![cylinder()]).unwrap();

    let volumes = session.volumes().len();
    let caps = session.caps().len();
    let assignments = session.assignments().to_vec();

    session.rebuild();
    session.set_plane_count(11).unwrap();

    assert_eq!(session.volumes().len(), volumes);
    assert_eq!(session.caps().len(), caps);
    assert_eq!(session.assignments(), &assignments[..]);
}

#[test]
fn eight_planes_make_one_batch() {
    let session = ClippingSession::with_solids(arc(8), vec![cylinder()]).unwrap();

    assert_eq!(session.batch_count(), 1);
    assert_eq!(clear_slots(&session), vec![7]);
    assert_eq!(session.caps()[7].drawable.order.phase, Phase::CapWithClear);
}

#[test]
fn seventeen_planes_make_three_batches() {
    let session = ClippingSession::with_solids(arc(17), vec![cylinder()]).unwrap();

    assert_eq!(session.batch_count(), 3);

    let batch_sizes: Vec<usize> = (0..3)
        .map(|b| session.assignments().iter().filter(|a| a.batch == b).count())
        .collect();

    assert_eq!(batch_sizes, vec![8, 8, 1]);

    // full batches end on bit 7, the partial batch on its only slot
    assert_eq!(clear_slots(&session), vec![7, 15, 16]);
}

#[test]
fn single_plane_cuts_cylinder_on_its_axis() {
    let session = ClippingSession::with_solids(single_plane(), vec![cylinder()]).unwrap();

    assert_eq!(session.caps().len(), 1);

    let cap = &session.caps()[0].drawable;

    // centered on the axis, lying in x = 0, front face toward the clipped +X side
    assert_relative_eq!(cap.transform.translation.vector, Vector3::zeros(), epsilon = 1e-6);
    assert_relative_eq!(cap.transform * Vector3::z(), Vector3::x(), epsilon = 1e-6);

    for v in cap.mesh.vertices() {
        assert_relative_eq!((cap.transform * v.position).x, 0.0, epsilon = 1e-6);
    }

    // a cap is never clipped by its own plane
    assert!(cap.material.clip_planes.is_empty());
    assert_eq!(cap.material.side, Side::Front);

    // covers the whole silhouette of the cylinder
    let extent = cap.mesh.bounding_radius();
    assert!(extent > cylinder().mesh.bounding_radius());
}

#[test]
fn disabling_slicing_resets_bodies() {
    let mut session = ClippingSession::with_solids(arc(10), vec![cylinder(), cylinder()]).unwrap();

    session.set_slicing_enabled(false);

    assert!(session.caps().is_empty());
    assert!(session.volumes().is_empty());
    assert!(session.helpers().is_empty());

    for body in session.bodies() {
        assert!(body.material.clip_planes.is_empty());
        assert!(body.material.stencil.is_none());
        assert!(!body.material.writes_stencil());
    }

    // the planes themselves survive and come back with slicing
    assert_eq!(session.planes().len(), 10);

    session.set_slicing_enabled(true);

    assert_eq!(session.caps().len(), 20);
    assert!(session.bodies().iter().all(|b| b.material.clip_planes.len() == 10));
}

#[test]
fn frame_follows_batch_order() {
    let mut session = ClippingSession::with_solids(arc(10), vec![cylinder()]).unwrap();
    let mut recorder = Recorder::new();

    session.set_helpers_visible(true);
    session.render(&mut recorder).unwrap();

    assert_eq!(recorder.events[0], Event::Begin);
    assert_eq!(recorder.clears(), 2);

    let phases: Vec<Option<(usize, Phase)>> = recorder.events[1..].iter().map(|e| match *e {
        Event::Draw(_, order) => Some((order.batch, order.phase)),
        _ => None,
    }).collect();

    let mut expected = Vec::new();
    expected.extend((0..8).map(|_| Some((0, Phase::StencilVolume))));
    expected.push(Some((0, Phase::Solid)));
    expected.extend((0..7).map(|_| Some((0, Phase::Cap))));
    expected.push(Some((0, Phase::CapWithClear)));
    expected.push(None);
    expected.extend((0..2).map(|_| Some((1, Phase::StencilVolume))));
    expected.push(Some((1, Phase::Cap)));
    expected.push(Some((1, Phase::CapWithClear)));
    expected.push(None);
    expected.extend((0..10).map(|_| Some((2, Phase::Overlay))));

    assert_eq!(phases, expected);
}

#[test]
fn parity_frame_isolates_every_slot() {
    let config = arc(3).with_algorithm(StencilAlgorithm::Parity);
    let mut session = ClippingSession::with_solids(config, vec![cylinder()]).unwrap();
    let mut recorder = Recorder::new();

    session.render(&mut recorder).unwrap();

    assert_eq!(session.batch_count(), 3);
    assert_eq!(recorder.clears(), 3);

    let volume_passes: Vec<StencilOp<u8>> = session.volumes()[0].passes.iter()
        .map(|p| p.material.stencil.map_or(StencilOp::Keep, |s| s.pass))
        .collect();

    assert_eq!(volume_passes, vec![StencilOp::Increment { wrap: true }, StencilOp::Decrement { wrap: true }]);
}

#[test]
fn hidden_caps_still_clear() {
    let mut session = ClippingSession::with_solids(arc(9), vec![cylinder()]).unwrap();
    let mut recorder = Recorder::new();

    session.set_caps_visible(false);
    session.render(&mut recorder).unwrap();

    assert_eq!(recorder.clears(), 2);
    assert!(recorder.events.iter().all(|e| match *e {
        Event::Draw(DrawableKind::Cap { .. }, _) => false,
        _ => true,
    }));
}

#[test]
fn commands_pass_batch_tracker() {
    for &algorithm in &[StencilAlgorithm::BitPacked, StencilAlgorithm::Parity] {
        for count in 0..20 {
            let config = arc(count).with_algorithm(algorithm);
            let mut session = ClippingSession::with_solids(config, vec![cylinder(), cylinder(), cylinder()]).unwrap();

            session.set_helpers_visible(true);

            let mut tracker = BatchTracker::new();

            for command in session.draw_commands() {
                match command {
                    DrawCommand::Draw(d) => tracker.draw(d.order).unwrap(),
                    DrawCommand::ClearStencil => tracker.clear_stencil(),
                }
            }
        }
    }
}

#[test]
fn many_solids_share_one_plane() {
    let solids = (0..10).map(|_| cylinder()).collect();
    let session = ClippingSession::with_solids(single_plane(), solids).unwrap();

    // fused bodies stamp their own bits, so there are no separate volumes
    assert!(session.volumes().is_empty());
    assert_eq!(session.batch_count(), 2);

    let body = &session.bodies()[9];
    assert_eq!(body.order, RenderOrder::new(1, Phase::Solid, 9));
    assert_eq!(body.material.side, Side::Double);
    assert_eq!(body.material.stencil.map(|s| s.write_mask), Some(0b10));

    assert_eq!(clear_slots(&session), vec![7, 9]);
}

#[test]
fn caps_follow_plane_edits_and_solid_moves() {
    let mut session = ClippingSession::with_solids(single_plane(), vec![cylinder()]).unwrap();

    session.set_plane_constant(PlaneId(0), 0.25).unwrap();
    session.set_solid_transform(SolidId(0), Isometry3::new(Vector3::new(0.0, 0.0, 3.0),
                                                           Vector3::new(0.0, FRAC_PI_2, 0.0))).unwrap();

    // nothing moves until the frame update
    assert_relative_eq!(session.caps()[0].drawable.transform.translation.vector, Vector3::zeros(), epsilon = 1e-6);

    session.update_frame().unwrap();

    let cap = &session.caps()[0].drawable;
    let plane = session.planes()[0];

    assert_relative_eq!(plane.distance_to_point(&(cap.transform * Point3::origin())), 0.0, epsilon = 1e-5);
    assert_relative_eq!(cap.transform.translation.vector, Vector3::new(0.25, 0.0, 3.0), epsilon = 1e-5);
    assert_relative_eq!(session.bodies()[0].transform.translation.vector, Vector3::new(0.0, 0.0, 3.0));
}

#[test]
fn match_body_coloring() {
    let config = arc(2).with_cap_coloring(CapColoring::MatchBody);
    let session = ClippingSession::with_solids(config, vec![cylinder()]).unwrap();

    assert!(session.caps().iter().all(|c| c.drawable.material.color == Color::from_hex(0xFFC107)));
}

#[test]
fn unknown_plane_is_an_error() {
    let mut session = ClippingSession::new(arc(2)).unwrap();

    assert!(session.set_plane_constant(PlaneId(2), 0.0).is_err());
    assert!(session.plane(PlaneId(9)).is_err());
}

#[test]
fn renders_without_local_clipping() {
    let mut session = ClippingSession::with_solids(arc(4), vec![cylinder()]).unwrap();
    let mut recorder = Recorder::new();

    recorder.clipping = false;

    assert!(session.render(&mut recorder).is_ok());
}
