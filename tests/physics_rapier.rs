use farmgame::config::{GameConfig, PhysicsSettings};
use farmgame::physics::*;
use farmgame::world::EntityKind;
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

fn desc(kind: EntityKind, position: Vec2) -> BodyDesc {
    let config = GameConfig::default();
    BodyDesc::for_kind(kind, position, &config.physics, &config.sprites)
}

#[test]
fn test_static_body_stays_put() {
    let mut physics = RapierPhysics::new(&PhysicsSettings::default());
    let wall = physics.add_body(&desc(EntityKind::Wall, Vec2::new(64.0, 64.0)));
    physics.apply_force(wall, Vec2::new(10_000.0, 0.0));
    for _ in 0..30 {
        physics.step(DT);
    }
    assert_eq!(physics.pose(wall).unwrap().position, Vec2::new(64.0, 64.0));
}

#[test]
fn test_force_moves_player() {
    let mut physics = RapierPhysics::new(&PhysicsSettings::default());
    let player = physics.add_body(&desc(EntityKind::Player, Vec2::new(500.0, 500.0)));
    for _ in 0..10 {
        physics.apply_force(player, Vec2::new(-3500.0, 0.0));
        physics.step(DT);
    }
    let pose = physics.pose(player).unwrap();
    assert!(pose.position.x < 500.0);
    assert!((pose.position.y - 500.0).abs() < 1e-3);
    assert!(physics.velocity(player).unwrap().x < 0.0);
}

#[test]
fn test_force_lasts_one_step() {
    let settings = PhysicsSettings { damping: 1.0, ..Default::default() };
    let mut physics = RapierPhysics::new(&settings);
    let player = physics.add_body(&desc(EntityKind::Player, Vec2::new(500.0, 500.0)));
    physics.apply_force(player, Vec2::new(3500.0, 0.0));
    physics.step(DT);
    let after_push = physics.velocity(player).unwrap().x;
    assert!(after_push > 0.0);

    physics.step(DT);
    let coasting = physics.velocity(player).unwrap().x;
    assert!((coasting - after_push).abs() < 1e-3);
}

#[test]
fn test_player_speed_is_capped() {
    let mut physics = RapierPhysics::new(&PhysicsSettings::default());
    let player = physics.add_body(&desc(EntityKind::Player, Vec2::new(0.0, 0.0)));
    for _ in 0..60 {
        physics.apply_force(player, Vec2::new(1_000_000.0, -1_000_000.0));
        physics.step(DT);
    }
    let v = physics.velocity(player).unwrap();
    assert!(v.x <= 800.0 + 1e-3);
    assert!(v.y >= -800.0 - 1e-3);
}

#[test]
fn test_damping_slows_bodies() {
    let mut physics = RapierPhysics::new(&PhysicsSettings::default());
    let cow = physics.add_body(&desc(EntityKind::Animal, Vec2::new(0.0, 0.0)));
    physics.apply_force(cow, Vec2::new(6000.0, 0.0));
    physics.step(DT);
    let start = physics.velocity(cow).unwrap().x;
    for _ in 0..30 {
        physics.step(DT);
    }
    assert!(physics.velocity(cow).unwrap().x < start);
}

#[test]
fn test_breakable_reports_wall_contact() {
    let mut physics = RapierPhysics::new(&PhysicsSettings::default());
    let wall = physics.add_body(&desc(EntityKind::Wall, Vec2::new(64.0, 64.0)));
    let brick = physics.add_body(&desc(EntityKind::Breakable, Vec2::new(80.0, 64.0)));

    let contacts = physics.step(DT);
    assert!(
        contacts.iter().any(|c| (c.a == wall && c.b == brick) || (c.a == brick && c.b == wall)),
        "{contacts:?}"
    );
    assert_eq!(physics.pose(brick).unwrap().position, Vec2::new(80.0, 64.0));
}

#[test]
fn test_walls_do_not_report_each_other() {
    let mut physics = RapierPhysics::new(&PhysicsSettings::default());
    physics.add_body(&desc(EntityKind::Wall, Vec2::new(64.0, 64.0)));
    physics.add_body(&desc(EntityKind::Wall, Vec2::new(80.0, 64.0)));
    assert!(physics.step(DT).is_empty());
}

#[test]
fn test_remove_body_twice() {
    let mut physics = RapierPhysics::new(&PhysicsSettings::default());
    let wall = physics.add_body(&desc(EntityKind::Wall, Vec2::ZERO));
    assert_eq!(physics.body_count(), 1);
    assert!(physics.remove_body(wall));
    assert!(!physics.remove_body(wall));
    assert_eq!(physics.body_count(), 0);
    assert!(physics.pose(wall).is_none());
}

#[test]
fn test_body_desc_sizes() {
    let player = desc(EntityKind::Player, Vec2::ZERO);
    assert_eq!(player.half_extents, Vec2::splat(51.2));
    let wall = desc(EntityKind::Wall, Vec2::ZERO);
    assert_eq!(wall.half_extents, Vec2::splat(32.0));
    assert!(!wall.touches_static);
    assert!(desc(EntityKind::Breakable, Vec2::ZERO).touches_static);
}
