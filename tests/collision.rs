mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::RecordingPhysics;
use farmgame::collision::{CollisionListener, WallBreakRule, dispatch};
use farmgame::config::{BreakableDecay, GameConfig};
use farmgame::physics::{Contact, PhysicsAdapter};
use farmgame::update;
use farmgame::world::{EntityId, EntityKind, World};
use glam::Vec2;

type Log = Rc<RefCell<Vec<(EntityId, EntityId)>>>;

fn setup() -> (World, RecordingPhysics, GameConfig) {
    let config = common::config_with_decay(BreakableDecay::Never);
    let mut physics = RecordingPhysics::new();
    let world = World::setup(&common::scenario_layout(), &mut physics, &config);
    (world, physics, config)
}

fn break_rule() -> Vec<Box<dyn CollisionListener>> {
    vec![Box::new(WallBreakRule::new())]
}

/// Records every pair it is handed and leaves the world alone.
struct Recorder {
    kinds: (EntityKind, EntityKind),
    log: Log,
}

impl CollisionListener for Recorder {
    fn kinds(&self) -> (EntityKind, EntityKind) {
        self.kinds
    }

    fn on_contact(&mut self, _: &mut World, _: &mut dyn PhysicsAdapter, first: EntityId, second: EntityId) {
        self.log.borrow_mut().push((first, second));
    }
}

#[test]
fn test_breakable_and_wall_are_both_removed() {
    let (mut world, mut physics, config) = setup();
    let wall = world.walls()[0].clone();
    let brick = world.spawn(EntityKind::Breakable, wall.position, &mut physics, &config).unwrap();
    let brick_body = world.breakables()[0].body.unwrap();

    dispatch(&[Contact { a: brick_body, b: wall.body.unwrap() }], &mut world, &mut physics, &mut break_rule());

    assert!(!world.contains(brick));
    assert!(!world.contains(wall.id));
    assert_eq!(world.walls().len(), 5);
    assert!(!physics.bodies.contains_key(&brick_body));
    assert!(!physics.bodies.contains_key(&wall.body.unwrap()));
}

#[test]
fn test_contact_order_does_not_matter() {
    let (mut world, mut physics, config) = setup();
    let wall = world.walls()[2].clone();
    world.spawn(EntityKind::Breakable, wall.position, &mut physics, &config);
    let brick_body = world.breakables()[0].body.unwrap();

    dispatch(&[Contact { a: wall.body.unwrap(), b: brick_body }], &mut world, &mut physics, &mut break_rule());

    assert!(world.breakables().is_empty());
    assert_eq!(world.walls().len(), 5);
}

#[test]
fn test_duplicate_contacts_remove_once() {
    let (mut world, mut physics, config) = setup();
    let wall = world.walls()[0].clone();
    world.spawn(EntityKind::Breakable, wall.position, &mut physics, &config);
    let brick_body = world.breakables()[0].body.unwrap();
    let contact = Contact { a: brick_body, b: wall.body.unwrap() };

    let mut listeners = break_rule();
    dispatch(&[contact, contact, contact], &mut world, &mut physics, &mut listeners);
    // A later batch for the dead pair is skipped too.
    dispatch(&[contact], &mut world, &mut physics, &mut listeners);

    assert_eq!(world.walls().len(), 5);
    assert_eq!(physics.removed.iter().filter(|h| **h == brick_body).count(), 1);
    assert_eq!(physics.removed.iter().filter(|h| **h == wall.body.unwrap()).count(), 1);
}

#[test]
fn test_dead_pairs_reach_no_listener() {
    let (mut world, mut physics, config) = setup();
    let wall = world.walls()[0].clone();
    let brick = world.spawn(EntityKind::Breakable, wall.position, &mut physics, &config).unwrap();
    let brick_body = world.breakables()[0].body.unwrap();
    world.despawn(brick, &mut physics);

    let log = Log::default();
    let mut listeners: Vec<Box<dyn CollisionListener>> =
        vec![Box::new(Recorder { kinds: (EntityKind::Breakable, EntityKind::Wall), log: log.clone() })];
    dispatch(&[Contact { a: brick_body, b: wall.body.unwrap() }], &mut world, &mut physics, &mut listeners);

    assert!(log.borrow().is_empty());
    assert!(world.contains(wall.id));
}

#[test]
fn test_unrelated_pairs_are_ignored() {
    let (mut world, mut physics, _) = setup();
    let player = world.player().body.unwrap();
    let wall = world.walls()[0].body.unwrap();
    let cow = world.animals()[0].body.unwrap();

    dispatch(
        &[Contact { a: player, b: wall }, Contact { a: cow, b: wall }, Contact { a: player, b: cow }],
        &mut world,
        &mut physics,
        &mut break_rule(),
    );

    assert_eq!(world.walls().len(), 6);
    assert_eq!(world.animals().len(), 1);
    assert!(physics.removed.is_empty());
}

#[test]
fn test_listener_sees_kinds_in_declared_order() {
    let (mut world, mut physics, config) = setup();
    let wall = world.walls()[0].clone();
    let brick = world.spawn(EntityKind::Breakable, Vec2::new(0.0, 0.0), &mut physics, &config).unwrap();
    let brick_body = world.breakables()[0].body.unwrap();

    let log = Log::default();
    let mut listeners: Vec<Box<dyn CollisionListener>> =
        vec![Box::new(Recorder { kinds: (EntityKind::Breakable, EntityKind::Wall), log: log.clone() })];
    dispatch(
        &[Contact { a: wall.body.unwrap(), b: brick_body }, Contact { a: brick_body, b: wall.body.unwrap() }],
        &mut world,
        &mut physics,
        &mut listeners,
    );

    assert_eq!(*log.borrow(), vec![(brick, wall.id), (brick, wall.id)]);
}

#[test]
fn test_break_rule_counts_breaks() {
    let (mut world, mut physics, config) = setup();
    let wall = world.walls()[0].clone();
    let brick = world.spawn(EntityKind::Breakable, wall.position, &mut physics, &config).unwrap();

    let mut rule = WallBreakRule::new();
    rule.on_contact(&mut world, &mut physics, brick, wall.id);
    rule.on_contact(&mut world, &mut physics, brick, wall.id);
    assert_eq!(rule.breaks(), 1);
}

#[test]
fn test_break_happens_inside_tick_before_decay() {
    let config = GameConfig::default();
    let mut physics = RecordingPhysics::new();
    let mut world = World::setup(&common::scenario_layout(), &mut physics, &config);
    let wall = world.walls()[1].clone();
    world.spawn(EntityKind::Breakable, wall.position, &mut physics, &config);
    let brick_body = world.breakables()[0].body.unwrap();
    physics.script(vec![Contact { a: brick_body, b: wall.body.unwrap() }]);

    update::tick(&mut world, &mut physics, &mut break_rule(), &config);

    assert!(!world.contains(wall.id));
    assert!(world.breakables().is_empty());
}
