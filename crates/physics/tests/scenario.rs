//! End-to-end scenarios through the public host surface

use newton_physics::glam::Vec3;
use newton_physics::{
    BodyDesc, Error, PhysicsConfig, ShapeDesc, ShapeKind, ShapeState, Transform, WorldContext,
};

fn box_body(ctx: &mut WorldContext, host_scale: Vec3) -> newton_physics::BodyHandle {
    let world = ctx.create_world();
    ctx.create_body(
        BodyDesc::rigid(world)
            .with_shape(ShapeDesc::new(ShapeKind::unit_box()))
            .with_transform(Transform::IDENTITY.with_scale(host_scale)),
    )
    .unwrap()
}

#[test]
fn test_box_scaled_by_host_transform() {
    let mut ctx = WorldContext::default();
    let body = box_body(&mut ctx, Vec3::new(2.0, 3.0, 4.0));

    let shape = ctx.get_or_create_shape(body).unwrap();
    assert_eq!(ctx.shapes().scale(shape).unwrap(), Vec3::new(2.0, 3.0, 4.0));

    let faces: Vec<_> = ctx.enumerate_faces(shape).unwrap().collect();
    assert_eq!(faces.len(), 6);
    for face in &faces {
        assert_eq!(face.len(), 4);
        for v in face.vertices() {
            assert_eq!(v.abs(), Vec3::new(1.0, 1.5, 2.0));
        }
        // outward winding: normal points away from the centre
        let centre: Vec3 = face.vertices().iter().copied().sum::<Vec3>() / 4.0;
        assert!(face.normal().dot(centre) > 0.0);
    }
}

#[test]
fn test_grandchild_proxy_uses_ancestor_world() {
    let mut ctx = WorldContext::default();
    let world = ctx.create_world();
    let root = ctx.create_body(BodyDesc::rigid(world)).unwrap();
    let child = ctx.create_body(BodyDesc::proxy(root)).unwrap();
    let grandchild = ctx
        .create_body(
            BodyDesc::proxy(child)
                .with_shape(ShapeDesc::new(ShapeKind::Sphere { radius: 1.0 }))
                .with_transform(Transform::IDENTITY.with_scale(Vec3::splat(0.5))),
        )
        .unwrap();

    assert_eq!(ctx.resolve_owning_body(grandchild).unwrap(), root);
    let shape = ctx.get_or_create_shape(grandchild).unwrap();
    assert_eq!(ctx.shapes().get(shape).unwrap().world(), world);
    assert_eq!(ctx.shapes().shapes_in(world), vec![shape]);

    // a walk that never meets a world fails
    let orphan = ctx.create_body(BodyDesc::default()).unwrap();
    let orphan_child = ctx.create_body(BodyDesc::proxy(orphan)).unwrap();
    let orphan_grandchild = ctx.create_body(BodyDesc::proxy(orphan_child)).unwrap();
    assert!(matches!(
        ctx.resolve_owning_body(orphan_grandchild),
        Err(Error::NoOwningBody)
    ));
}

#[test]
fn test_scale_updates_follow_host() {
    let mut ctx = WorldContext::default();
    let body = box_body(&mut ctx, Vec3::ONE);
    let shape = ctx.get_or_create_shape(body).unwrap();

    for scale in [Vec3::new(0.5, 0.5, 0.5), Vec3::new(7.0, 1.0, 0.25)] {
        ctx.sync_from_host(body, &Transform::IDENTITY.with_scale(scale))
            .unwrap();
        assert_eq!(ctx.shapes().scale(shape).unwrap(), scale);
        ctx.update_scale(body).unwrap();
        assert_eq!(ctx.shapes().scale(shape).unwrap(), scale);
    }
}

#[test]
fn test_set_scale_rejections_leave_scale() {
    let mut ctx = WorldContext::default();
    let body = box_body(&mut ctx, Vec3::ONE);
    let shape = ctx.get_or_create_shape(body).unwrap();
    ctx.set_shape_scale(shape, Vec3::new(1.5, 2.5, 3.5)).unwrap();

    for bad in [Vec3::ZERO, Vec3::new(-1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 0.0)] {
        assert!(matches!(
            ctx.set_shape_scale(shape, bad),
            Err(Error::InvalidScale { .. })
        ));
    }
    assert_eq!(ctx.shapes().scale(shape).unwrap(), Vec3::new(1.5, 2.5, 3.5));
}

#[test]
fn test_destroy_then_use() {
    let mut ctx = WorldContext::default();
    let body = box_body(&mut ctx, Vec3::ONE);
    let shape = ctx.get_or_create_shape(body).unwrap();

    ctx.destroy_shape(shape);
    ctx.destroy_shape(shape);

    assert!(matches!(
        ctx.set_shape_scale(shape, Vec3::ONE),
        Err(Error::InvalidShape)
    ));
    assert!(matches!(ctx.enumerate_faces(shape), Err(Error::InvalidShape)));
    assert_eq!(ctx.body(body).unwrap().shape_state(), ShapeState::Destroyed);
}

#[test]
fn test_face_limit_from_config() {
    let config = PhysicsConfig::from_toml_str(
        r#"
        max_face_vertices = 64

        [tessellation]
        cylinder_segments = 65
        "#,
    )
    .unwrap();
    let mut ctx = WorldContext::new(config);
    let world = ctx.create_world();
    let cylinder = ShapeDesc::new(ShapeKind::Cylinder {
        radius: 1.0,
        height: 1.0,
    });
    let shape = ctx.create_shape(world, &cylinder, Vec3::ONE).unwrap();

    match ctx.enumerate_faces(shape) {
        Err(Error::FaceTooLarge { vertices, max }) => assert_eq!((vertices, max), (65, 64)),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("65-vertex cap should be rejected"),
    }

    let mut relaxed = WorldContext::new(PhysicsConfig {
        max_face_vertices: 65,
        ..ctx.config().clone()
    });
    let world = relaxed.create_world();
    let shape = relaxed.create_shape(world, &cylinder, Vec3::ONE).unwrap();
    assert_eq!(relaxed.enumerate_faces(shape).unwrap().count(), 67);
}

#[test]
fn test_sixty_four_vertex_face_is_accepted() {
    let mut ctx = WorldContext::new(PhysicsConfig {
        tessellation: newton_physics::TessellationConfig {
            cylinder_segments: 64,
            ..Default::default()
        },
        ..Default::default()
    });
    let world = ctx.create_world();
    let shape = ctx
        .create_shape(
            world,
            &ShapeDesc::new(ShapeKind::Cylinder {
                radius: 1.0,
                height: 1.0,
            }),
            Vec3::ONE,
        )
        .unwrap();

    let largest = ctx
        .enumerate_faces(shape)
        .unwrap()
        .map(|face| face.len())
        .max()
        .unwrap();
    assert_eq!(largest, 64);
}

#[test]
fn test_world_teardown() {
    let mut ctx = WorldContext::default();
    let world = ctx.create_world();
    let root = ctx
        .create_body(BodyDesc::rigid(world).with_shape(ShapeDesc::new(ShapeKind::unit_box())))
        .unwrap();
    let shape = ctx.get_or_create_shape(root).unwrap();

    ctx.destroy_world(world).unwrap();

    assert_eq!(ctx.world_count(), 0);
    assert_eq!(ctx.body_count(), 0);
    assert!(ctx.shapes().is_empty());
    assert!(matches!(ctx.enumerate_faces(shape), Err(Error::InvalidShape)));
    assert!(matches!(ctx.get_or_create_shape(root), Err(Error::InvalidBody)));
}
