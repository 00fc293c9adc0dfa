//! Roll orchestration
//!
//! The orchestrator owns one roll session at a time: it spawns the dice through
//! a [`SpawnHost`], polls every die's [`SettleDetector`] once per tick against
//! [`PhysicsBodies`], forces stragglers when the timeout passes and fires the
//! completion exactly once, when every die's result slot is filled.

use bevy::prelude::*;
use rand::Rng;

use super::host::{PhysicsBodies, SpawnHost};
use super::spawn::place;
use crate::dice3d::meshes::DiceCatalog;
use crate::dice3d::settle::{FaceResolution, SettleDetector, SettlePhase};
use crate::dice3d::types::{
    CompletionKind, DetectionSettings, DiceType, RollError, RollOutcome, RollRequest, RollResult,
    RollerSettings, SpawnSettings,
};

/// One die of the current session.
#[derive(Debug)]
pub struct DieInstance<H> {
    index: usize,
    handle: H,
    detector: SettleDetector,
    /// The physics side has reported this body at least once.
    observed: bool,
}

impl<H: Copy> DieInstance<H> {
    /// Position in spawn order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    pub fn detector(&self) -> &SettleDetector {
        &self.detector
    }

    pub fn phase(&self) -> SettlePhase {
        self.detector.phase()
    }

    pub fn resolution(&self) -> Option<FaceResolution> {
        self.detector.resolution()
    }
}

/// A die whose value got fixed during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettledDie<H> {
    pub index: usize,
    pub handle: H,
    pub resolution: FaceResolution,
}

/// The single completion of a roll session.
#[derive(Clone, Debug, PartialEq)]
pub struct RollCompletion {
    pub outcome: RollOutcome,
    pub kind: CompletionKind,
}

/// What happened during one call to [`RollOrchestrator::tick`].
#[derive(Debug)]
pub struct TickReport<H> {
    pub settled: Vec<SettledDie<H>>,
    /// The timeout was reached this tick and the remaining dice were forced.
    pub timed_out: bool,
    /// Present only on the tick the session completed.
    pub completion: Option<RollCompletion>,
}

impl<H> Default for TickReport<H> {
    fn default() -> Self {
        Self {
            settled: Vec::new(),
            timed_out: false,
            completion: None,
        }
    }
}

#[derive(Debug)]
struct RollSession<H> {
    request: RollRequest,
    dice: Vec<DieInstance<H>>,
    elapsed: f32,
    /// Set when at least one die had to be forced.
    forced: Option<CompletionKind>,
    completion: Option<RollCompletion>,
}

impl<H: Copy> RollSession<H> {
    fn all_resolved(&self) -> bool {
        self.dice.iter().all(|die| die.detector.is_resolved())
    }

    fn outcome(&self) -> RollResult<RollOutcome> {
        RollOutcome::from_slots(
            self.request.die_type,
            self.dice.iter().map(|die| die.detector.value()),
        )
    }
}

/// Drives roll sessions from request to outcome
#[derive(Debug)]
pub struct RollOrchestrator<H> {
    detection: DetectionSettings,
    spawn: SpawnSettings,
    timeout: f32,
    request: RollRequest,
    session: Option<RollSession<H>>,
}

impl<H: Copy + Eq> RollOrchestrator<H> {
    pub fn new(settings: &RollerSettings) -> Self {
        Self {
            detection: settings.detection.clone(),
            spawn: settings.spawn.clone(),
            timeout: settings.roll_timeout_secs,
            request: RollRequest::new(settings.default_die, settings.default_count),
            session: None,
        }
    }

    pub fn timeout(&self) -> f32 {
        self.timeout
    }

    /// Set the die type and count for the next roll; counts are clamped.
    pub fn configure(&mut self, die_type: DiceType, count: i32) -> RollRequest {
        self.request = RollRequest::new(die_type, count);
        self.request
    }

    pub fn request(&self) -> RollRequest {
        self.request
    }

    /// A session exists and has not completed yet.
    pub fn is_active(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.completion.is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.completion().is_some()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Simulation time spent in the current session.
    pub fn elapsed(&self) -> f32 {
        self.session.as_ref().map_or(0.0, |session| session.elapsed)
    }

    pub fn dice(&self) -> &[DieInstance<H>] {
        self.session
            .as_ref()
            .map_or(&[][..], |session| session.dice.as_slice())
    }

    /// Spawn the configured dice and start a session.
    ///
    /// Fails with [`RollError::SessionActive`] while a roll is still running.
    /// A completed session that was never reset is reset first.
    pub fn start_roll<S, R>(
        &mut self,
        catalog: &DiceCatalog,
        host: &mut S,
        rng: &mut R,
    ) -> RollResult<usize>
    where
        S: SpawnHost<Handle = H>,
        R: Rng + ?Sized,
    {
        if self.is_active() {
            return Err(RollError::SessionActive);
        }
        if self.session.is_some() {
            self.reset_session(host);
        }

        let request = self.request;
        let plans = place(
            catalog,
            request.die_type,
            request.die_count,
            &self.spawn,
            rng,
        );

        let mut dice = Vec::with_capacity(plans.len());
        for plan in &plans {
            match host.spawn_die(plan) {
                Some(handle) => dice.push(DieInstance {
                    index: dice.len(),
                    handle,
                    detector: SettleDetector::new(plan.geometry.clone(), plan.rotation),
                    observed: false,
                }),
                None => warn!("Failed to spawn {} #{}", plan.die_type, plan.index),
            }
        }

        if dice.is_empty() {
            error!("No {} could be spawned; roll not started", request.die_type);
            return Err(RollError::SpawnFailed(request.die_type));
        }
        if dice.len() < request.die_count {
            warn!(
                "Only {} of {} {} spawned; rolling with those",
                dice.len(),
                request.die_count,
                request.die_type
            );
        }

        let count = dice.len();
        info!("Rolling {}x{}", count, request.die_type);
        self.session = Some(RollSession {
            request: RollRequest {
                die_type: request.die_type,
                die_count: count,
            },
            dice,
            elapsed: 0.0,
            forced: None,
            completion: None,
        });
        Ok(count)
    }

    /// Route a physics contact to the die owning `handle`. Returns true when
    /// that die just started rolling; unknown handles are ignored.
    pub fn notify_collision(&mut self, handle: H) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let detection = &self.detection;
        session
            .dice
            .iter_mut()
            .find(|die| die.handle == handle)
            .is_some_and(|die| die.detector.on_collision(detection))
    }

    /// Advance the session by `dt` seconds of simulation.
    pub fn tick<P, R>(&mut self, dt: f32, physics: &mut P, rng: &mut R) -> TickReport<H>
    where
        P: PhysicsBodies<Handle = H>,
        R: Rng + ?Sized,
    {
        let mut report = TickReport::default();
        let detection = &self.detection;
        let Some(session) = self.session.as_mut() else {
            return report;
        };
        if session.completion.is_some() {
            return report;
        }

        session.elapsed += dt;

        for die in session.dice.iter_mut() {
            if die.detector.is_resolved() {
                continue;
            }
            let resolution = match physics.sample(die.handle) {
                Some(sample) => {
                    die.observed = true;
                    die.detector.tick(dt, &sample, detection, rng)
                }
                // A body that never showed up may simply not exist yet.
                None if die.observed || die.detector.is_forcing() => {
                    die.detector.resolve_lost(detection, rng)
                }
                None => None,
            };
            if let Some(resolution) = resolution {
                report.settled.push(SettledDie {
                    index: die.index,
                    handle: die.handle,
                    resolution,
                });
            }
        }

        if !session.all_resolved() && session.forced.is_none() && session.elapsed >= self.timeout {
            warn!(
                "Roll timed out after {:.1}s; forcing unsettled dice",
                session.elapsed
            );
            report.timed_out = force_unresolved(session, detection, physics, CompletionKind::TimedOut) > 0;
        }

        report.completion = try_complete(session);
        report
    }

    /// Force every unresolved die of the session. Returns how many dice were
    /// newly forced; dice already resolved or already forcing are untouched.
    pub fn force_stop_all<P>(&mut self, physics: &mut P) -> usize
    where
        P: PhysicsBodies<Handle = H>,
    {
        let detection = &self.detection;
        match self.session.as_mut() {
            Some(session) if session.completion.is_none() => {
                force_unresolved(session, detection, physics, CompletionKind::Cancelled)
            }
            _ => 0,
        }
    }

    /// The outcome of the current session. Fails while any die is unresolved.
    pub fn current_outcome(&self) -> RollResult<RollOutcome> {
        let session = self.session.as_ref().ok_or(RollError::NoSession)?;
        session.outcome().inspect_err(|err| {
            error!("Roll outcome requested before completion: {}", err);
        })
    }

    pub fn completion(&self) -> Option<&RollCompletion> {
        self.session
            .as_ref()
            .and_then(|session| session.completion.as_ref())
    }

    /// Despawn every die of the current session and forget its outcome.
    pub fn reset_session<S>(&mut self, host: &mut S)
    where
        S: SpawnHost<Handle = H>,
    {
        if let Some(session) = self.session.take() {
            for die in session.dice {
                host.despawn_die(die.handle);
            }
            debug!("Roll session reset");
        }
    }
}

fn force_unresolved<H, P>(
    session: &mut RollSession<H>,
    detection: &DetectionSettings,
    physics: &mut P,
    kind: CompletionKind,
) -> usize
where
    H: Copy,
    P: PhysicsBodies<Handle = H>,
{
    let mut forced = 0;
    for die in session.dice.iter_mut() {
        if die.detector.force_stop(detection) {
            physics.zero_velocity(die.handle);
            forced += 1;
        }
    }
    if forced > 0 && session.forced.is_none() {
        session.forced = Some(kind);
    }
    forced
}

/// Fill the session's completion once every slot holds a value.
fn try_complete<H: Copy>(session: &mut RollSession<H>) -> Option<RollCompletion> {
    if session.completion.is_some() || !session.all_resolved() {
        return None;
    }

    let outcome = match session.outcome() {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("Failed to aggregate roll outcome: {}", err);
            return None;
        }
    };
    let kind = session.forced.unwrap_or(CompletionKind::Natural);

    match kind {
        CompletionKind::Natural => info!("Roll complete: {}", outcome),
        _ => warn!("Roll complete ({}): {}", kind, outcome),
    }

    let completion = RollCompletion { outcome, kind };
    session.completion = Some(completion.clone());
    Some(completion)
}
