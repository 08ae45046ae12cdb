use std::env;
use std::fs;
use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use tracing_subscriber::EnvFilter;

use stencilcap::image_compat::ImageFrameBuffer;
use stencilcap::{Camera, ClippingSession, Color, Dimensions, Mesh, PlaneId, SessionConfig, SoftwareRenderer, Solid};

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // Optionally load a session configuration, otherwise use the default fan of 10 planes
    let config = match env::args().nth(1) {
        Some(path) => SessionConfig::from_json(&fs::read_to_string(path).unwrap()).unwrap(),
        None => SessionConfig::default(),
    };

    let dimensions = Dimensions::new(1000, 1000);

    let camera = Camera::perspective(Point3::new(3.0, 2.5, 3.0),
                                     Point3::origin(),
                                     Vector3::y(),
                                     45.0f32.to_radians(),
                                     dimensions.aspect(),
                                     0.1, 100.0);

    let mut renderer = SoftwareRenderer::new(dimensions, camera, Color::rgb(0.05, 0.05, 0.05)).unwrap();

    // A single cylinder, sliced into wedges by the fan of planes around it
    let cylinder = Solid::new(Arc::new(Mesh::cylinder(1.0, 2.0, 96)), Color::from_hex(0xFFC107));

    let mut session = ClippingSession::with_solids(config, vec![cylinder]).unwrap();

    println!("Rendering {} planes in {} stencil batches", session.planes().len(), session.batch_count());

    session.render(&mut renderer).unwrap();

    let image = renderer.framebuffer().copy_to_image().unwrap();

    image.save("fan.png").unwrap();

    // Flip the middle plane and render again with the plane helpers visible
    if !session.planes().is_empty() {
        let middle = PlaneId(session.planes().len() / 2);

        session.negate_plane(middle).unwrap();
        session.set_helpers_visible(true);
        session.render(&mut renderer).unwrap();

        let image = renderer.framebuffer().copy_to_image().unwrap();

        image.save("fan_negated.png").unwrap();
    }

    println!("Stats: {:?}", renderer.stats());
}
