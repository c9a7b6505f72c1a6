mod common;

use common::RecordingPhysics;
use farmgame::collision::{CollisionListener, WallBreakRule};
use farmgame::config::{BreakableDecay, GameConfig};
use farmgame::input::{Direction, Intents};
use farmgame::update::*;
use farmgame::world::{EntityKind, World};
use glam::Vec2;

fn setup(config: &GameConfig) -> (World, RecordingPhysics) {
    let mut physics = RecordingPhysics::new();
    let world = World::setup(&common::scenario_layout(), &mut physics, config);
    (world, physics)
}

fn listeners() -> Vec<Box<dyn CollisionListener>> {
    vec![Box::new(WallBreakRule::new())]
}

fn intents(left: bool, right: bool, up: bool, down: bool) -> Intents {
    Intents { left, right, up, down }
}

#[test]
fn test_movement_single_direction() {
    assert_eq!(Movement::from_intents(&intents(true, false, false, false)), Movement::Push(Direction::Left));
    assert_eq!(Movement::from_intents(&intents(false, true, false, false)), Movement::Push(Direction::Right));
    assert_eq!(Movement::from_intents(&intents(false, false, true, false)), Movement::Push(Direction::Up));
    assert_eq!(Movement::from_intents(&intents(false, false, false, true)), Movement::Push(Direction::Down));
    assert_eq!(Movement::from_intents(&Intents::default()), Movement::Stop);
}

#[test]
fn test_movement_horizontal_wins_over_vertical() {
    assert_eq!(Movement::from_intents(&intents(true, false, true, false)), Movement::Push(Direction::Left));
    assert_eq!(Movement::from_intents(&intents(false, true, false, true)), Movement::Push(Direction::Right));
}

#[test]
fn test_movement_opposing_keys_cancel() {
    assert_eq!(Movement::from_intents(&intents(true, true, false, false)), Movement::Stop);
    assert_eq!(Movement::from_intents(&intents(false, false, true, true)), Movement::Stop);
    // Cancelled horizontal axis falls through to vertical.
    assert_eq!(Movement::from_intents(&intents(true, true, true, false)), Movement::Push(Direction::Up));
    assert_eq!(Movement::from_intents(&intents(true, true, true, true)), Movement::Stop);
}

#[test]
fn test_force_direction() {
    assert_eq!(Movement::Push(Direction::Left).force(3500.0), Vec2::new(-3500.0, 0.0));
    assert_eq!(Movement::Push(Direction::Up).force(3500.0), Vec2::new(0.0, 3500.0));
    assert_eq!(Movement::Stop.force(3500.0), Vec2::ZERO);
}

#[test]
fn test_tick_left_pushes_player_with_zero_friction() {
    let config = GameConfig::default();
    let (mut world, mut physics) = setup(&config);
    let player = world.player().body.unwrap();
    world.intents.left = true;

    let movement = tick(&mut world, &mut physics, &mut listeners(), &config);

    assert_eq!(movement, Movement::Push(Direction::Left));
    assert_eq!(physics.forces, vec![(player, Vec2::new(-3500.0, 0.0))]);
    assert_eq!(physics.last_friction(player), Some(0.0));
    assert_eq!(physics.steps, vec![config.physics.timestep]);
}

#[test]
fn test_tick_without_intents_brakes() {
    let config = GameConfig::default();
    let (mut world, mut physics) = setup(&config);
    let player = world.player().body.unwrap();

    let movement = tick(&mut world, &mut physics, &mut listeners(), &config);

    assert_eq!(movement, Movement::Stop);
    assert!(physics.forces.is_empty());
    assert_eq!(physics.last_friction(player), Some(10.0));
}

#[test]
fn test_tick_advances_world_tick() {
    let config = GameConfig::default();
    let (mut world, mut physics) = setup(&config);
    for _ in 0..3 {
        tick(&mut world, &mut physics, &mut listeners(), &config);
    }
    assert_eq!(world.tick(), 3);
}

#[test]
fn test_every_tick_decay_pops_most_recent() {
    let config = common::config_with_decay(BreakableDecay::EveryTick);
    let (mut world, mut physics) = setup(&config);
    let first = world.spawn(EntityKind::Breakable, Vec2::new(500.0, 500.0), &mut physics, &config).unwrap();
    let second = world.spawn(EntityKind::Breakable, Vec2::new(600.0, 500.0), &mut physics, &config).unwrap();

    tick(&mut world, &mut physics, &mut listeners(), &config);
    assert!(world.contains(first));
    assert!(!world.contains(second));

    tick(&mut world, &mut physics, &mut listeners(), &config);
    assert!(world.breakables().is_empty());

    // Nothing left to pop.
    tick(&mut world, &mut physics, &mut listeners(), &config);
    assert!(world.breakables().is_empty());
}

#[test]
fn test_decay_removes_physics_body() {
    let config = GameConfig::default();
    let (mut world, mut physics) = setup(&config);
    world.spawn(EntityKind::Breakable, Vec2::new(500.0, 500.0), &mut physics, &config);
    let body = world.breakables()[0].body.unwrap();

    assert_eq!(decay_breakables(&mut world, &mut physics, BreakableDecay::EveryTick), 1);
    assert!(physics.removed.contains(&body));
    assert!(!physics.bodies.contains_key(&body));
}

#[test]
fn test_after_ticks_decay() {
    let config = common::config_with_decay(BreakableDecay::AfterTicks { ticks: 3 });
    let (mut world, mut physics) = setup(&config);
    world.spawn(EntityKind::Breakable, Vec2::new(500.0, 500.0), &mut physics, &config);

    tick(&mut world, &mut physics, &mut listeners(), &config);
    tick(&mut world, &mut physics, &mut listeners(), &config);
    assert_eq!(world.breakables().len(), 1);
    tick(&mut world, &mut physics, &mut listeners(), &config);
    assert!(world.breakables().is_empty());
}

#[test]
fn test_never_decay() {
    let config = common::config_with_decay(BreakableDecay::Never);
    let (mut world, mut physics) = setup(&config);
    world.spawn(EntityKind::Breakable, Vec2::new(500.0, 500.0), &mut physics, &config);
    for _ in 0..10 {
        tick(&mut world, &mut physics, &mut listeners(), &config);
    }
    assert_eq!(world.breakables().len(), 1);
}

#[test]
fn test_tick_syncs_poses() {
    let config = GameConfig::default();
    let (mut world, mut physics) = setup(&config);
    let cow = world.animals()[0].body.unwrap();
    physics.poses.insert(cow, farmgame::physics::BodyPose { position: Vec2::new(140.0, 200.0), angle: 0.5 });

    tick(&mut world, &mut physics, &mut listeners(), &config);

    assert_eq!(world.animals()[0].position, Vec2::new(140.0, 200.0));
    assert_eq!(world.animals()[0].angle, 0.5);
}
