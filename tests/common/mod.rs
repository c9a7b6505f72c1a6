#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};

use farmgame::config::GameConfig;
use farmgame::map::{self, MapLayout};
use farmgame::physics::{BodyDesc, BodyHandle, BodyPose, Contact, PhysicsAdapter};
use glam::Vec2;

/// Physics double: remembers every call and replays scripted contacts.
#[derive(Default)]
pub struct RecordingPhysics {
    next: u64,
    pub bodies: BTreeMap<BodyHandle, BodyDesc>,
    pub added: Vec<(BodyHandle, BodyDesc)>,
    pub removed: Vec<BodyHandle>,
    pub forces: Vec<(BodyHandle, Vec2)>,
    pub frictions: Vec<(BodyHandle, f32)>,
    pub steps: Vec<f32>,
    /// Returned by successive `step` calls; empty once exhausted.
    pub scripted: VecDeque<Vec<Contact>>,
    pub poses: BTreeMap<BodyHandle, BodyPose>,
}

impl RecordingPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&mut self, contacts: Vec<Contact>) {
        self.scripted.push_back(contacts);
    }

    pub fn last_friction(&self, handle: BodyHandle) -> Option<f32> {
        self.frictions.iter().rev().find(|(h, _)| *h == handle).map(|(_, f)| *f)
    }
}

impl PhysicsAdapter for RecordingPhysics {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next);
        self.next += 1;
        self.bodies.insert(handle, *desc);
        self.added.push((handle, *desc));
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.removed.push(handle);
        self.bodies.remove(&handle).is_some()
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.steps.push(dt);
        self.scripted.pop_front().unwrap_or_default()
    }

    fn apply_force(&mut self, handle: BodyHandle, force: Vec2) {
        self.forces.push((handle, force));
    }

    fn set_friction(&mut self, handle: BodyHandle, friction: f32) {
        self.frictions.push((handle, friction));
    }

    fn pose(&self, handle: BodyHandle) -> Option<BodyPose> {
        if let Some(pose) = self.poses.get(&handle) {
            return Some(*pose);
        }
        self.bodies.get(&handle).map(|d| BodyPose { position: d.position, angle: 0.0 })
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|_| Vec2::ZERO)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// The small map used throughout the tests: six walls, one player at
/// (128, 128), one animal at (128, 192).
pub const SCENARIO: [&str; 4] = ["1110", "0030", "0050", "1110"];

pub fn scenario_layout() -> MapLayout {
    map::parse_rows(&SCENARIO, 64.0).unwrap()
}

pub fn config_with_decay(decay: farmgame::config::BreakableDecay) -> GameConfig {
    let mut config = GameConfig::default();
    config.actions.breakable_decay = decay;
    config
}
