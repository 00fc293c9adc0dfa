//! Dice roll systems
//!
//! This module routes roll commands and Rapier collisions into the roll
//! orchestrator, advances it once per frame and publishes its messages.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use chrono::Utc;

use crate::dice3d::types::*;

use super::bodies::{DiceRoller, DieBodies, DieBodyQuery, EcsSpawnHost};

/// Apply queued [`RollCommand`]s
pub fn handle_roll_commands(
    mut commands: Commands,
    mut roll_commands: MessageReader<RollCommand>,
    mut roller: ResMut<DiceRoller>,
    mut history: ResMut<RollHistory>,
    mut bodies: DieBodyQuery,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let roller = &mut *roller;

    for command in roll_commands.read() {
        match *command {
            RollCommand::Roll { die_type, count } => {
                if roller.orchestrator.is_active() {
                    warn!("Roll request ignored: {}", RollError::SessionActive);
                    continue;
                }
                roller.orchestrator.configure(die_type, count);
                let mut host = EcsSpawnHost::new(&mut commands)
                    .with_visuals(meshes.as_deref_mut(), materials.as_deref_mut());
                if let Err(err) =
                    roller
                        .orchestrator
                        .start_roll(&roller.catalog, &mut host, &mut roller.rng)
                {
                    warn!("Roll request ignored: {}", err);
                }
            }
            RollCommand::ForceStop => {
                let mut physics = DieBodies::new(&mut bodies);
                let forced = roller.orchestrator.force_stop_all(&mut physics);
                if forced > 0 {
                    info!("Force-stopping {} dice", forced);
                }
            }
            RollCommand::Reset => {
                roller
                    .orchestrator
                    .reset_session(&mut EcsSpawnHost::new(&mut commands));
            }
            RollCommand::ClearHistory => {
                history.clear();
                info!("Roll history cleared");
            }
        }
    }
}

/// Forward the first contact of each die to its settle detector
pub fn track_die_collisions(
    mut collision_events: MessageReader<CollisionEvent>,
    mut roller: ResMut<DiceRoller>,
    mut started: MessageWriter<DieStartedRolling>,
) {
    for ev in collision_events.read() {
        let CollisionEvent::Started(e1, e2, _flags) = *ev else {
            continue;
        };

        for entity in [e1, e2] {
            if roller.orchestrator.notify_collision(entity) {
                started.write(DieStartedRolling { entity });
            }
        }
    }
}

/// Seconds of physics integrated this frame under Rapier's `mode`.
///
/// Without a Rapier timestep resource the frame delta is used as is.
pub fn simulation_step(mode: Option<&TimestepMode>, frame_dt: f32) -> f32 {
    match mode {
        Some(TimestepMode::Variable {
            max_dt, time_scale, ..
        }) => (frame_dt * time_scale).min(*max_dt),
        Some(TimestepMode::Fixed { dt, .. }) => *dt,
        Some(TimestepMode::Interpolated { time_scale, .. }) => frame_dt * time_scale,
        None => frame_dt,
    }
}

/// Advance the active roll by the physics time stepped this frame
pub fn advance_roll(
    time: Res<Time>,
    timestep: Option<Res<TimestepMode>>,
    mut roller: ResMut<DiceRoller>,
    mut bodies: DieBodyQuery,
    mut settled: MessageWriter<DieSettled>,
    mut completed: MessageWriter<RollCompleted>,
) {
    let roller = &mut *roller;
    if !roller.orchestrator.is_active() {
        return;
    }

    let dt = simulation_step(timestep.as_deref(), time.delta_secs());

    let mut physics = DieBodies::new(&mut bodies);
    let report = roller
        .orchestrator
        .tick(dt, &mut physics, &mut roller.rng);

    for die in report.settled {
        settled.write(DieSettled {
            entity: die.handle,
            index: die.index,
            resolution: die.resolution,
        });
    }

    if let Some(completion) = report.completion {
        completed.write(RollCompleted {
            outcome: completion.outcome,
            kind: completion.kind,
        });
    }
}

/// Append every completed roll to the history
pub fn record_roll_history(
    mut completed: MessageReader<RollCompleted>,
    mut history: ResMut<RollHistory>,
) {
    for ev in completed.read() {
        let record = history.record(&ev.outcome, ev.kind, Utc::now());
        debug!("Recorded roll #{}: total {}", record.id, record.total);
    }
}
