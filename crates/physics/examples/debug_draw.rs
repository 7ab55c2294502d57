use newton_physics::{
    glam::Vec3, BodyDesc, ShapeDesc, ShapeKind, ShapeOffset, Transform, WorldContext,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Debug Draw Example ===\n");

    let mut ctx = WorldContext::default();
    let world = ctx.create_world();
    println!("Created world with gravity: {:?}", ctx.world(world).unwrap().gravity());

    // Rigid body at the root, shapes hang off child proxies
    let root = ctx
        .create_body(
            BodyDesc::rigid(world)
                .with_mass(10.0)
                .with_transform(Transform::from_position(Vec3::new(0.0, 5.0, 0.0))),
        )
        .unwrap();

    let crate_shape = ShapeDesc::new(ShapeKind::unit_box())
        .with_offset(ShapeOffset::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 45.0, 0.0)));
    let lid = ctx
        .create_body(
            BodyDesc::proxy(root)
                .with_shape(crate_shape)
                .with_transform(
                    Transform::from_position(Vec3::new(0.0, 5.0, 0.0))
                        .with_scale(Vec3::new(2.0, 1.0, 2.0)),
                ),
        )
        .unwrap();

    let wheel = ctx
        .create_body(
            BodyDesc::proxy(lid)
                .with_shape(ShapeDesc::new(ShapeKind::Cylinder {
                    radius: 0.4,
                    height: 0.2,
                }))
                .with_transform(
                    Transform::from_position(Vec3::new(1.0, 4.5, 0.0))
                        .with_rotation(Vec3::new(0.0, 0.0, 90.0)),
                ),
        )
        .unwrap();

    for (name, body) in [("lid", lid), ("wheel", wheel)] {
        let owner = ctx.resolve_owning_body(body).unwrap();
        let shape = ctx.get_or_create_shape(body).unwrap();
        println!(
            "{}: owner {:?}, shape {:?}, scale {:?}",
            name,
            owner,
            shape,
            ctx.shapes().scale(shape).unwrap()
        );

        let faces: Vec<_> = ctx.enumerate_faces(shape).unwrap().collect();
        let largest = faces.iter().map(|f| f.len()).max().unwrap_or(0);
        println!("  {} faces, largest has {} vertices", faces.len(), largest);

        let wireframe = ctx.body_wireframe(body).unwrap();
        println!("  {} wireframe segments", wireframe.indices.len());
        for (a, b) in wireframe.lines().take(4) {
            println!(
                "    ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})",
                a.x, a.y, a.z, b.x, b.y, b.z
            );
        }
    }

    // Host rescales the lid; shape follows without being rebuilt
    let rescaled = Transform::from_position(Vec3::new(0.0, 5.0, 0.0)).with_scale(Vec3::splat(3.0));
    ctx.set_transform(lid, rescaled).unwrap();
    let shape = ctx.get_or_create_shape(lid).unwrap();
    println!("\nLid rescaled: {:?}", ctx.shapes().scale(shape).unwrap());
    println!("Lid bounds: {:?}", ctx.shapes().local_aabb(shape).unwrap());

    // Forces for the next step start from the root's weight
    ctx.init_force_accumulators(root).unwrap();
    ctx.add_force(root, Vec3::new(25.0, 0.0, 0.0)).unwrap();
    println!("\nRoot external force: {:?}", ctx.external_force(root).unwrap());

    ctx.release_shape(lid).unwrap();
    match ctx.get_or_create_shape(lid) {
        Err(e) => println!("After release: {}", e),
        Ok(shape) => println!("✗ Released body still produced shape {:?}", shape),
    }
}
