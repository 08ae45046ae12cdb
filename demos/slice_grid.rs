use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use tracing_subscriber::EnvFilter;

use stencilcap::capping::{CapColoring, PlaneDescriptor, PlaneLayout};
use stencilcap::image_compat::ImageFrameBuffer;
use stencilcap::scene::grid_layout;
use stencilcap::{Camera, ClippingSession, Color, Dimensions, Mesh, SessionConfig, SoftwareRenderer, Solid, SolidId};

const COUNT: usize = 20;
const PER_ROW: usize = 5;
const OFFSET: f32 = 2.5;

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // One plane through every model, so each torus gets its own stencil bit
    let config = SessionConfig::default()
        .with_cap_coloring(CapColoring::PerSlotHue)
        .with_layout(PlaneLayout::Explicit {
            planes: vec![PlaneDescriptor { normal: [-1.0, 0.0, 0.0], constant: 0.0 }],
        });

    let torus = Arc::new(Mesh::torus(0.8, 0.3, 24, 48));

    // Stand every ring up to face the camera
    let facing = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);

    let solids = grid_layout(COUNT, PER_ROW, OFFSET).into_iter().enumerate().map(|(i, position)| {
        let color = Color::from_hsl(i as f32 / COUNT as f32, 0.6, 0.4);

        Solid::new(torus.clone(), color).with_transform(Isometry3::from_parts(position.translation, facing))
    }).collect();

    let mut session = ClippingSession::with_solids(config, solids).unwrap();

    println!("Rendering {} models in {} stencil batches", session.solids().len(), session.batch_count());

    let dimensions = Dimensions::new(1280, 1024);

    let camera = Camera::perspective(Point3::new(12.0, 3.0, 6.0),
                                     Point3::origin(),
                                     Vector3::y(),
                                     55.0f32.to_radians(),
                                     dimensions.aspect(),
                                     0.1, 100.0);

    let mut renderer = SoftwareRenderer::new(dimensions, camera, Color::WHITE).unwrap();

    // Tilt each model a little further than the last, caps follow on the next frame
    for i in 0..session.solids().len() {
        let solid = SolidId(i);
        let transform = session.solids()[i].transform;

        let spin = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), i as f32 * 0.15);

        session.set_solid_transform(solid, Isometry3::from_parts(Translation3::from(transform.translation.vector),
                                                                 transform.rotation * spin)).unwrap();
    }

    session.render(&mut renderer).unwrap();

    let image = renderer.framebuffer().copy_to_image().unwrap();

    image.save("slice_grid.png").unwrap();

    println!("Stats: {:?}", renderer.stats());
}
