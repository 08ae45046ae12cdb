//! Multithreaded software rendering host

use parking_lot::Mutex;
use scoped_threadpool::Pool;
use smallvec::SmallVec;
use tracing::trace;

use crate::color::Color;
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::RenderBuffer;
use crate::geometry::{Dimensions, HasDimensions, Plane};
use crate::scene::Drawable;

use super::camera::Camera;
use super::raster::{self, RasterArguments, RenderStats};
use super::Renderer;

/// CPU renderer implementing the fixed-function stencil, depth and clip-plane pipeline.
///
/// Draw calls execute strictly in submission order. Within a draw call the framebuffer is
/// split into horizontal bands which are rasterized in parallel.
pub struct SoftwareRenderer {
    framebuffer: RenderBuffer,
    camera: Camera,
    pool: Pool,
    local_clipping: bool,
    stats: Mutex<RenderStats>,
}

impl SoftwareRenderer {
    /// Creates a renderer with one worker thread per logical CPU
    pub fn new(dimensions: Dimensions, camera: Camera, clear_color: Color) -> RenderResult<SoftwareRenderer> {
        SoftwareRenderer::with_threads(dimensions, camera, clear_color, num_cpus::get() as u32)
    }

    pub fn with_threads(dimensions: Dimensions,
                        camera: Camera,
                        clear_color: Color,
                        threads: u32) -> RenderResult<SoftwareRenderer> {
        Ok(SoftwareRenderer {
            framebuffer: RenderBuffer::with_dimensions(dimensions, clear_color)?,
            camera,
            pool: Pool::new(threads.max(1)),
            local_clipping: true,
            stats: Mutex::new(RenderStats::default()),
        })
    }

    #[inline]
    pub fn framebuffer(&self) -> &RenderBuffer { &self.framebuffer }

    #[inline]
    pub fn framebuffer_mut(&mut self) -> &mut RenderBuffer { &mut self.framebuffer }

    #[inline]
    pub fn into_framebuffer(self) -> RenderBuffer { self.framebuffer }

    #[inline]
    pub fn camera(&self) -> &Camera { &self.camera }

    #[inline]
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Enables or disables clip planes for every draw call
    #[inline]
    pub fn set_local_clipping(&mut self, enabled: bool) {
        self.local_clipping = enabled;
    }

    /// Statistics accumulated since the last `begin_frame`
    pub fn stats(&self) -> RenderStats {
        *self.stats.lock()
    }
}

impl Renderer for SoftwareRenderer {
    fn begin_frame(&mut self) {
        self.framebuffer.clear();
        *self.stats.lock() = RenderStats::default();
    }

    fn draw(&mut self, drawable: &Drawable, planes: &[Plane]) -> RenderResult<()> {
        let material = &drawable.material;

        let clip_planes: SmallVec<[Plane; 8]> = if self.local_clipping {
            material.clip_planes.iter()
                .map(|&id| planes.get(id.index()).cloned().ok_or(RenderError::UnknownPlane(id)))
                .collect::<RenderResult<_>>()?
        } else {
            SmallVec::new()
        };

        let dimensions = self.framebuffer.dimensions();

        let triangles = raster::setup_triangles(&drawable.mesh,
                                                &drawable.transform,
                                                &self.camera.view_projection(),
                                                dimensions,
                                                material.side);

        trace!(kind = ?drawable.kind, triangles = triangles.len(), "draw");

        {
            let mut stats = self.stats.lock();
            stats.draw_calls += 1;
            stats.triangles += triangles.len();
        }

        if triangles.is_empty() {
            return Ok(());
        }

        let threads = self.pool.thread_count();
        let rows = (dimensions.height + threads - 1) / threads;

        let SoftwareRenderer { ref mut framebuffer, ref mut pool, ref stats, .. } = *self;

        let triangles = &triangles;
        let clip_planes = &clip_planes[..];

        pool.scoped(|scope| {
            for (i, band) in framebuffer.bands_mut(rows).enumerate() {
                let args = RasterArguments {
                    width: dimensions.width,
                    first_row: i as u32 * rows,
                    material,
                    clip_planes,
                };

                scope.execute(move || {
                    let band_stats = raster::rasterize_band(args, band, triangles);

                    *stats.lock() += band_stats;
                });
            }
        });

        Ok(())
    }

    fn clear_stencil(&mut self) {
        self.framebuffer.clear_stencil();
    }

    fn local_clipping_enabled(&self) -> bool {
        self.local_clipping
    }
}
