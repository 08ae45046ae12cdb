//! Clipping session
//!
//! Owns the plane array, the clipped solids and every drawable derived from them.
//! Caps, stencil volumes and helpers refer to planes and solids by index, so live plane edits
//! only need the per-frame update, while count or mode changes go through a full rebuild.

use std::sync::Arc;

use nalgebra::Isometry3;
use tracing::{debug, trace, warn};

use crate::color::Color;
use crate::config::SessionConfig;
use crate::error::{RenderError, RenderResult};
use crate::geometry::{Plane, PlaneId};
use crate::mesh::Mesh;
use crate::renderer::Renderer;
use crate::scene::{Drawable, DrawableKind, Material, Side, Solid, SolidId};

use super::allocator::{self, StencilAlgorithm, StencilBitAssignment};
use super::cap::{Cap, CapTemplate};
use super::generator::PlaneLayout;
use super::order::{self, BatchTracker, DrawCommand, Phase, RenderOrder};
use super::update;
use super::volume::{self, StencilVolume};

/// Opacity of plane helpers
pub const HELPER_OPACITY: f32 = 0.25;

/// Everything derived from the planes and solids by one rebuild
#[derive(Debug, Default)]
struct Build {
    assignments: Vec<StencilBitAssignment>,
    volumes: Vec<StencilVolume>,
    caps: Vec<Cap>,
    bodies: Vec<Drawable>,
    helpers: Vec<Drawable>,
    batches: usize,
}

#[derive(Debug)]
pub struct ClippingSession {
    config: SessionConfig,
    planes: Vec<Plane>,
    solids: Vec<Solid>,
    build: Build,
}

impl ClippingSession {
    /// Creates a session with no solids, generating planes from the configured layout
    pub fn new(config: SessionConfig) -> RenderResult<ClippingSession> {
        ClippingSession::with_solids(config, Vec::new())
    }

    pub fn with_solids(config: SessionConfig, solids: Vec<Solid>) -> RenderResult<ClippingSession> {
        let planes = config.layout.generate()?;

        let mut session = ClippingSession { config, planes, solids, build: Build::default() };

        session.rebuild();

        Ok(session)
    }

    /// Adds a solid to be clipped and rebuilds
    pub fn add_solid(&mut self, solid: Solid) -> SolidId {
        let id = SolidId(self.solids.len());

        self.solids.push(solid);
        self.rebuild();

        id
    }

    /// Tears down and rebuilds every derived drawable from the current planes and solids.
    ///
    /// The new set is built completely before the old one is released.
    pub fn rebuild(&mut self) {
        let build = build(&self.config, &self.planes, &self.solids);

        debug!(planes = self.planes.len(),
               solids = self.solids.len(),
               slots = build.assignments.len(),
               batches = build.batches,
               volumes = build.volumes.len(),
               caps = build.caps.len(),
               "rebuilt clipping configuration");

        self.build = build;
    }

    /// Regenerates the planes with a new count and rebuilds. Negative counts mean no clipping.
    ///
    /// Only counted layouts (arc and line) are affected.
    pub fn set_plane_count(&mut self, count: i64) -> RenderResult<()> {
        let count = if count < 0 { 0 } else { count as usize };

        let mut layout = self.config.layout.clone();
        layout.set_count(count);

        self.set_layout(layout)
    }

    /// Replaces the plane layout and rebuilds
    pub fn set_layout(&mut self, layout: PlaneLayout) -> RenderResult<()> {
        let planes = layout.generate()?;

        self.config.layout = layout;
        self.planes = planes;
        self.rebuild();

        Ok(())
    }

    /// Switches stencil algorithm and rebuilds
    pub fn set_algorithm(&mut self, algorithm: StencilAlgorithm) {
        if self.config.algorithm != algorithm {
            self.config.algorithm = algorithm;
            self.rebuild();
        }
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig { &self.config }

    #[inline]
    pub fn planes(&self) -> &[Plane] { &self.planes }

    pub fn plane(&self, id: PlaneId) -> RenderResult<&Plane> {
        self.planes.get(id.index()).ok_or(RenderError::UnknownPlane(id))
    }

    fn plane_mut(&mut self, id: PlaneId) -> RenderResult<&mut Plane> {
        self.planes.get_mut(id.index()).ok_or(RenderError::UnknownPlane(id))
    }

    /// Moves a plane along its normal. Caps follow on the next frame.
    pub fn set_plane_constant(&mut self, id: PlaneId, constant: f32) -> RenderResult<()> {
        self.plane_mut(id)?.set_constant(constant);

        trace!(%id, constant, "plane constant changed");

        Ok(())
    }

    /// Flips which side of a plane is clipped, keeping its location
    pub fn negate_plane(&mut self, id: PlaneId) -> RenderResult<()> {
        self.plane_mut(id)?.negate();

        trace!(%id, "plane negated");

        Ok(())
    }

    #[inline]
    pub fn solids(&self) -> &[Solid] { &self.solids }

    /// Moves a solid. Its body, volumes and caps follow on the next frame.
    pub fn set_solid_transform(&mut self, id: SolidId, transform: Isometry3<f32>) -> RenderResult<()> {
        let solid = self.solids.get_mut(id.index()).ok_or(RenderError::UnknownSolid(id))?;

        solid.transform = transform;

        Ok(())
    }

    pub fn slicing_enabled(&self) -> bool { self.config.slicing_enabled }

    /// Turns all clipping on or off.
    ///
    /// Disabling removes every cap and stencil volume, leaving plain unclipped bodies.
    pub fn set_slicing_enabled(&mut self, enabled: bool) {
        if self.config.slicing_enabled != enabled {
            self.config.slicing_enabled = enabled;

            debug!(enabled, "slicing toggled");

            self.rebuild();
        }
    }

    /// Shows or hides caps without rebuilding. Hidden caps still clear the stencil buffer.
    pub fn set_caps_visible(&mut self, visible: bool) {
        self.config.caps_visible = visible;

        for cap in &mut self.build.caps {
            cap.drawable.visible = visible;
        }
    }

    pub fn set_helpers_visible(&mut self, visible: bool) {
        self.config.helpers_visible = visible;

        for helper in &mut self.build.helpers {
            helper.visible = visible;
        }
    }

    #[inline]
    pub fn assignments(&self) -> &[StencilBitAssignment] { &self.build.assignments }

    #[inline]
    pub fn volumes(&self) -> &[StencilVolume] { &self.build.volumes }

    #[inline]
    pub fn caps(&self) -> &[Cap] { &self.build.caps }

    #[inline]
    pub fn bodies(&self) -> &[Drawable] { &self.build.bodies }

    #[inline]
    pub fn helpers(&self) -> &[Drawable] { &self.build.helpers }

    /// Number of stencil batches per frame
    #[inline]
    pub fn batch_count(&self) -> usize { self.build.batches }

    /// Every drawable of the session, unordered
    pub fn drawables(&self) -> impl Iterator<Item = &Drawable> {
        let build = &self.build;

        build.volumes.iter().flat_map(|v| v.passes.iter())
            .chain(build.bodies.iter())
            .chain(build.caps.iter().map(|c| &c.drawable))
            .chain(build.helpers.iter())
    }

    /// Re-derives cap and helper placement, and moves every drawable along with its solid
    pub fn update_frame(&mut self) -> RenderResult<()> {
        let build = &mut self.build;

        update::update_caps(&mut build.caps, &self.planes, &self.solids)?;
        update::update_helpers(&mut build.helpers, &self.planes)?;

        for v in &mut build.volumes {
            let solid = self.solids.get(v.solid.index()).ok_or(RenderError::UnknownSolid(v.solid))?;

            for pass in &mut v.passes {
                pass.transform = solid.transform;
            }
        }

        for body in &mut build.bodies {
            if let DrawableKind::Body { solid: id } = body.kind {
                body.transform = self.solids.get(id.index()).ok_or(RenderError::UnknownSolid(id))?.transform;
            }
        }

        Ok(())
    }

    /// The frame's draw calls and stencil clears, in submission order
    pub fn draw_commands(&self) -> Vec<DrawCommand<'_>> {
        order::sequence(self.drawables())
    }

    /// Updates the frame, then submits it to `renderer`
    pub fn render<R>(&mut self, renderer: &mut R) -> RenderResult<()> where R: Renderer {
        self.update_frame()?;

        if !renderer.local_clipping_enabled() && self.config.slicing_enabled && !self.planes.is_empty() {
            warn!("local clipping is disabled on the renderer, clip planes will be ignored");
        }

        renderer.begin_frame();

        let mut tracker = BatchTracker::new();

        for command in self.draw_commands() {
            match command {
                DrawCommand::Draw(drawable) => {
                    tracker.draw(drawable.order)?;
                    renderer.draw(drawable, &self.planes)?;
                }
                DrawCommand::ClearStencil => {
                    tracker.clear_stencil();
                    renderer.clear_stencil();

                    trace!(batch = tracker.batch(), "stencil cleared");
                }
            }
        }

        Ok(())
    }
}

fn build(config: &SessionConfig, planes: &[Plane], solids: &[Solid]) -> Build {
    let plain_body = |(s, solid): (usize, &Solid)| Drawable {
        kind: DrawableKind::Body { solid: SolidId(s) },
        mesh: solid.mesh.clone(),
        material: Material::surface(solid.color),
        transform: solid.transform,
        order: RenderOrder::new(0, Phase::Solid, s),
        clears_stencil_after: false,
        visible: true,
    };

    if !config.slicing_enabled || planes.is_empty() {
        return Build {
            bodies: solids.iter().enumerate().map(plain_body).collect(),
            ..Build::default()
        };
    }

    let algorithm = config.algorithm;
    let plane_ids: Vec<PlaneId> = (0..planes.len()).map(PlaneId).collect();

    let slots = solids.len() * planes.len();
    let assignments = allocator::allocate(algorithm, slots);
    let batches = allocator::batch_count(algorithm, slots);

    // a single bit-packed plane lets every body stamp its own stencil bit
    let fused = algorithm == StencilAlgorithm::BitPacked && planes.len() == 1;

    let radius = solids.iter().map(|s| s.mesh.bounding_radius()).fold(0.0, f32::max);
    let extent = (if radius > 0.0 { radius } else { 1.0 }) * 2.0 * config.cap_margin;
    let quad = Arc::new(Mesh::quad(extent, extent));

    let template = CapTemplate { algorithm, mesh: quad.clone(), planes: &plane_ids };

    let mut volumes = Vec::with_capacity(if fused { 0 } else { slots });
    let mut caps = Vec::with_capacity(slots);
    let mut bodies = Vec::with_capacity(solids.len());

    for (s, solid) in solids.iter().enumerate() {
        let first = s * planes.len();
        let solid_id = SolidId(s);

        let mut body = plain_body((s, solid));
        body.order = RenderOrder::new(assignments[first].batch, Phase::Solid, first);
        body.material = body.material.with_clip_planes(plane_ids.iter().cloned());

        if fused {
            body.material = body.material
                .with_side(Side::Double)
                .with_stencil(volume::invert_bit(&assignments[first]));
        }

        bodies.push(body);

        for (p, plane) in planes.iter().enumerate() {
            let slot = first + p;
            let plane_id = PlaneId(p);
            let assignment = assignments[slot];

            if !fused {
                volumes.push(volume::build_volume(algorithm, slot, plane_id, solid_id, solid, assignment));
            }

            let color = config.cap_coloring.color(slot, slots, solid.color);

            let mut cap = template.build(slot, plane_id, solid_id, assignment, color,
                                         update::cap_transform(plane, solid));

            cap.drawable.visible = config.caps_visible;

            caps.push(cap);
        }
    }

    let helpers = planes.iter().enumerate().map(|(p, plane)| {
        let mut material = Material::surface(Color::WHITE.with_alpha(HELPER_OPACITY)).with_side(Side::Double);
        material.blend = true;
        material.depth_write = false;

        Drawable {
            kind: DrawableKind::Helper { plane: PlaneId(p) },
            mesh: quad.clone(),
            material,
            transform: update::placement(plane),
            order: RenderOrder::new(batches, Phase::Overlay, p),
            clears_stencil_after: false,
            visible: config.helpers_visible,
        }
    }).collect();

    Build { assignments, volumes, caps, bodies, helpers, batches }
}
