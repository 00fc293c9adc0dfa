//! Roll orchestration tests against a scripted physics world

use std::collections::HashMap;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use dicerollgen::dice3d::meshes::{die_faces, DiceCatalog};
use dicerollgen::dice3d::roll::{
    grid_cell, grid_dimensions, DieSpawn, PhysicsBodies, RollCompletion, RollOrchestrator,
    SpawnHost,
};
use dicerollgen::dice3d::settle::{BodySample, ResolutionTier, SettlePhase};
use dicerollgen::dice3d::types::{CompletionKind, DiceType, RollError, RollerSettings};

const DT: f32 = 1.0 / 60.0;

/// Bodies stay exactly where the test puts them.
#[derive(Default)]
struct FakeWorld {
    next_handle: u32,
    bodies: HashMap<u32, BodySample>,
    spawned: Vec<(u32, DieSpawn)>,
    despawned: Vec<u32>,
    zeroed: Vec<u32>,
    /// Spawn indices that fail to create a body.
    failing: Vec<usize>,
}

impl SpawnHost for FakeWorld {
    type Handle = u32;

    fn spawn_die(&mut self, spawn: &DieSpawn) -> Option<u32> {
        if self.failing.contains(&spawn.index) {
            return None;
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            BodySample {
                translation: spawn.position,
                rotation: spawn.rotation,
                linvel: spawn.impulse,
                angvel: spawn.torque_impulse,
            },
        );
        self.spawned.push((handle, spawn.clone()));
        Some(handle)
    }

    fn despawn_die(&mut self, handle: u32) {
        self.bodies.remove(&handle);
        self.despawned.push(handle);
    }
}

impl PhysicsBodies for FakeWorld {
    type Handle = u32;

    fn sample(&self, handle: u32) -> Option<BodySample> {
        self.bodies.get(&handle).copied()
    }

    fn zero_velocity(&mut self, handle: u32) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.linvel = Vec3::ZERO;
            body.angvel = Vec3::ZERO;
        }
        self.zeroed.push(handle);
    }
}

impl FakeWorld {
    fn rest(&mut self, handle: u32, rotation: Quat) {
        let body = self.bodies.get_mut(&handle).unwrap();
        body.rotation = rotation;
        body.linvel = Vec3::ZERO;
        body.angvel = Vec3::ZERO;
    }

    fn spin(&mut self, handle: u32, rotation: Quat) {
        let body = self.bodies.get_mut(&handle).unwrap();
        body.rotation = rotation;
        body.angvel = Vec3::new(0.0, 1.0, 0.0);
    }

    fn handles(&self) -> Vec<u32> {
        self.spawned.iter().map(|(handle, _)| *handle).collect()
    }
}

struct Harness {
    orchestrator: RollOrchestrator<u32>,
    world: FakeWorld,
    catalog: DiceCatalog,
    rng: StdRng,
}

impl Harness {
    fn new() -> Self {
        Self {
            orchestrator: RollOrchestrator::new(&RollerSettings::default()),
            world: FakeWorld::default(),
            catalog: DiceCatalog::standard(),
            rng: StdRng::seed_from_u64(2024),
        }
    }

    fn start(&mut self, die_type: DiceType, count: i32) -> Result<usize, RollError> {
        self.orchestrator.configure(die_type, count);
        self.orchestrator
            .start_roll(&self.catalog, &mut self.world, &mut self.rng)
    }

    fn touch_all(&mut self) {
        for handle in self.world.handles() {
            self.orchestrator.notify_collision(handle);
        }
    }

    /// Tick for up to `seconds`, collecting every completion reported.
    fn run(&mut self, seconds: f32) -> Vec<RollCompletion> {
        let mut completions = Vec::new();
        let ticks = (seconds / DT).ceil() as usize;
        for _ in 0..ticks {
            let report = self.orchestrator.tick(DT, &mut self.world, &mut self.rng);
            completions.extend(report.completion);
        }
        completions
    }
}

fn face_up(die_type: DiceType, value: u32) -> Quat {
    let face = die_faces(die_type)
        .into_iter()
        .find(|f| f.value == value)
        .unwrap();
    Quat::from_rotation_arc(face.normal, Vec3::Y)
}

#[test]
fn test_three_d6_settle_naturally() {
    let mut h = Harness::new();
    assert_eq!(h.start(DiceType::D6, 3).unwrap(), 3);

    h.touch_all();
    let handles = h.world.handles();
    for (handle, value) in handles.iter().zip([3, 5, 1]) {
        h.world.rest(*handle, face_up(DiceType::D6, value));
    }

    let completions = h.run(2.0);
    assert_eq!(completions.len(), 1);

    let completion = &completions[0];
    assert_eq!(completion.kind, CompletionKind::Natural);
    assert_eq!(completion.outcome.values(), &[3, 5, 1]);
    assert_eq!(completion.outcome.total(), 9);
    assert_eq!(completion.outcome.die_count(), 3);
    assert!(h.orchestrator.elapsed() < h.orchestrator.timeout());

    for die in h.orchestrator.dice() {
        let resolution = die.resolution().unwrap();
        assert_eq!(resolution.tier, ResolutionTier::Primary);
        assert!(!resolution.forced);
    }
    assert!(h.world.zeroed.is_empty());
}

#[test]
fn test_twelve_dice_clamp_to_ten_on_four_by_three_grid() {
    let mut h = Harness::new();
    assert_eq!(h.start(DiceType::D6, 12).unwrap(), 10);
    assert_eq!(h.orchestrator.request().die_count, 10);
    assert_eq!(grid_dimensions(10), (4, 3));

    let xs: Vec<f32> = h.world.spawned.iter().map(|(_, s)| s.position.x).collect();
    let zs: Vec<f32> = h.world.spawned.iter().map(|(_, s)| s.position.z).collect();
    for (i, (_, spawn)) in h.world.spawned.iter().enumerate() {
        let (row, col) = grid_cell(i, 10);
        assert!(row < 4 && col < 3);
        assert_eq!(spawn.index, i);
        // Same column shares x, same row shares z.
        assert!((xs[i] - xs[col]).abs() < 1e-5);
        assert!((zs[i] - zs[row * 3]).abs() < 1e-5);
    }
}

#[test]
fn test_stalled_die_is_forced_at_timeout() {
    let mut h = Harness::new();
    h.start(DiceType::D6, 2).unwrap();
    h.touch_all();

    let handles = h.world.handles();
    h.world.rest(handles[0], face_up(DiceType::D6, 4));
    h.world.spin(handles[1], Quat::from_rotation_x(30_f32.to_radians()));

    let early = h.run(9.5);
    assert!(early.is_empty());
    assert_eq!(h.orchestrator.dice()[1].phase(), SettlePhase::Rolling);

    let completions = h.run(1.0);
    assert_eq!(completions.len(), 1);
    let completion = &completions[0];
    assert_eq!(completion.kind, CompletionKind::TimedOut);
    assert_eq!(completion.outcome.die_count(), 2);
    assert_eq!(completion.outcome.values()[0], 4);
    assert!(h.orchestrator.elapsed() >= 10.0 - 1e-3);
    assert!(h.orchestrator.elapsed() < 10.25);

    let stalled = h.orchestrator.dice()[1].resolution().unwrap();
    assert!(stalled.forced);
    assert!(stalled.tier >= ResolutionTier::Secondary);
    assert_eq!(stalled.value, 1);
    assert_eq!(h.world.zeroed, vec![handles[1]]);
}

#[test]
fn test_edge_balanced_die_resolves_on_secondary_tier() {
    let mut h = Harness::new();
    h.start(DiceType::D6, 1).unwrap();
    h.touch_all();

    let handle = h.world.handles()[0];
    h.world.rest(handle, Quat::from_rotation_x(0.9_f32.acos()));

    assert!(h.run(3.0).is_empty());
    assert_eq!(h.orchestrator.force_stop_all(&mut h.world), 1);

    let completions = h.run(0.5);
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].kind, CompletionKind::Cancelled);

    let resolution = h.orchestrator.dice()[0].resolution().unwrap();
    assert_eq!(resolution.tier, ResolutionTier::Secondary);
    assert_eq!(resolution.value, 1);
}

#[test]
fn test_completion_fires_once_when_paths_race() {
    let mut h = Harness::new();
    h.start(DiceType::D8, 2).unwrap();
    h.touch_all();
    for handle in h.world.handles() {
        h.world.rest(handle, face_up(DiceType::D8, 8));
    }

    // Let the dice get close to settling, then force them anyway.
    assert!(h.run(0.78).is_empty());
    let forced = h.orchestrator.force_stop_all(&mut h.world);
    assert_eq!(h.orchestrator.force_stop_all(&mut h.world), 0);

    let mut completions = h.run(1.0);
    completions.extend(h.run(12.0));
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].outcome.values(), &[8, 8]);
    if forced > 0 {
        assert_eq!(completions[0].kind, CompletionKind::Cancelled);
    }

    // Nothing left to force once complete.
    assert_eq!(h.orchestrator.force_stop_all(&mut h.world), 0);
    assert!(h.orchestrator.is_complete());
}

#[test]
fn test_idle_die_is_forced_at_timeout() {
    let mut h = Harness::new();
    h.start(DiceType::D20, 1).unwrap();
    let handle = h.world.handles()[0];
    h.world.rest(handle, Quat::IDENTITY);

    let completions = h.run(10.5);
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].kind, CompletionKind::TimedOut);
    let value = completions[0].outcome.values()[0];
    assert!((1..=20).contains(&value));
}

#[test]
fn test_outcome_before_completion_is_an_error() {
    let mut h = Harness::new();
    assert!(matches!(
        h.orchestrator.current_outcome(),
        Err(RollError::NoSession)
    ));

    h.start(DiceType::D6, 2).unwrap();
    assert!(matches!(
        h.orchestrator.current_outcome(),
        Err(RollError::UnresolvedDie { index: 0 })
    ));
}

#[test]
fn test_starting_while_rolling_is_rejected() {
    let mut h = Harness::new();
    h.start(DiceType::D6, 2).unwrap();

    assert!(matches!(
        h.start(DiceType::D12, 3),
        Err(RollError::SessionActive)
    ));
    assert_eq!(h.world.spawned.len(), 2);
    assert_eq!(h.orchestrator.dice().len(), 2);
}

#[test]
fn test_reset_clears_session() {
    let mut h = Harness::new();
    h.start(DiceType::D6, 2).unwrap();
    h.touch_all();
    for handle in h.world.handles() {
        h.world.rest(handle, face_up(DiceType::D6, 6));
    }
    assert_eq!(h.run(2.0).len(), 1);

    let first = h.world.handles();
    h.orchestrator.reset_session(&mut h.world);
    assert!(!h.orchestrator.has_session());
    assert!(h.orchestrator.dice().is_empty());
    assert!(h.orchestrator.completion().is_none());
    assert_eq!(h.orchestrator.elapsed(), 0.0);
    assert_eq!(h.world.despawned, first);
    assert!(h.world.bodies.is_empty());

    // The next roll starts from nothing.
    h.start(DiceType::D4, 1).unwrap();
    assert_eq!(h.orchestrator.dice().len(), 1);
    assert_eq!(h.orchestrator.dice()[0].phase(), SettlePhase::Idle);
}

#[test]
fn test_completed_session_is_reset_by_next_roll() {
    let mut h = Harness::new();
    h.start(DiceType::D6, 1).unwrap();
    h.touch_all();
    let first = h.world.handles()[0];
    h.world.rest(first, Quat::IDENTITY);
    assert_eq!(h.run(2.0).len(), 1);

    h.start(DiceType::D6, 1).unwrap();
    assert_eq!(h.world.despawned, vec![first]);
    assert!(h.orchestrator.is_active());
    assert_ne!(h.orchestrator.dice()[0].handle(), first);
}

#[test]
fn test_missing_geometry_fails_to_start() {
    let mut h = Harness::new();
    h.catalog.remove(DiceType::D20);

    assert!(matches!(
        h.start(DiceType::D20, 2),
        Err(RollError::SpawnFailed(DiceType::D20))
    ));
    assert!(!h.orchestrator.has_session());
    assert!(h.world.spawned.is_empty());
}

#[test]
fn test_host_that_spawns_nothing_fails_to_start() {
    let mut h = Harness::new();
    h.world.failing = vec![0, 1];

    assert!(matches!(
        h.start(DiceType::D6, 2),
        Err(RollError::SpawnFailed(DiceType::D6))
    ));
    assert!(!h.orchestrator.is_active());
}

#[test]
fn test_partial_spawn_rolls_the_dice_that_exist() {
    let mut h = Harness::new();
    h.world.failing = vec![1];

    assert_eq!(h.start(DiceType::D10, 3).unwrap(), 2);
    h.touch_all();
    for handle in h.world.handles() {
        h.world.rest(handle, face_up(DiceType::D10, 7));
    }

    let completions = h.run(2.0);
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].outcome.die_count(), 2);
    assert_eq!(completions[0].outcome.values(), &[7, 7]);
}

#[test]
fn test_vanished_body_is_resolved_from_last_pose() {
    let mut h = Harness::new();
    h.start(DiceType::D6, 1).unwrap();
    let handle = h.world.handles()[0];
    h.world.rest(handle, face_up(DiceType::D6, 2));
    h.run(0.1);

    h.world.bodies.remove(&handle);
    let completions = h.run(DT);
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].outcome.values(), &[2]);
    assert!(h.orchestrator.dice()[0].resolution().unwrap().forced);
}

#[test]
fn test_unknown_collisions_are_ignored() {
    let mut h = Harness::new();
    assert!(!h.orchestrator.notify_collision(99));

    h.start(DiceType::D6, 1).unwrap();
    let handle = h.world.handles()[0];
    assert!(!h.orchestrator.notify_collision(handle + 1));
    assert!(h.orchestrator.notify_collision(handle));
    assert!(!h.orchestrator.notify_collision(handle));
}
