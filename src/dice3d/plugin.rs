//! Bevy plugin wiring the dice roller into an app.

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

use super::systems::*;
use super::types::*;

/// Registers the roller resources, messages and systems.
///
/// Physics is not added here: the app provides `RapierPhysicsPlugin`. With
/// `scene` enabled the plugin also builds the box, camera and results text and
/// reads the keyboard; without it the roller runs headless and is driven only
/// through [`RollCommand`] messages.
#[derive(Clone, Debug, Default)]
pub struct DiceRollerPlugin {
    pub settings: RollerSettings,
    pub seed: Option<u64>,
    pub report: ReportFormat,
    pub scene: bool,
}

impl DiceRollerPlugin {
    pub fn headless(settings: RollerSettings) -> Self {
        Self {
            settings,
            ..default()
        }
    }

    pub fn with_scene(mut self) -> Self {
        self.scene = true;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_report(mut self, report: ReportFormat) -> Self {
        self.report = report;
        self
    }
}

impl Plugin for DiceRollerPlugin {
    fn build(&self, app: &mut App) {
        let roller = DiceRoller::new(&self.settings, self.seed);
        let selection = RollSelection::from(roller.orchestrator.request());

        app.add_message::<CollisionEvent>()
            .add_message::<RollCommand>()
            .add_message::<DieStartedRolling>()
            .add_message::<DieSettled>()
            .add_message::<RollCompleted>()
            .insert_resource(self.settings.clone())
            .insert_resource(roller)
            .insert_resource(selection)
            .insert_resource(RollHistory::new(self.settings.history_capacity))
            .insert_resource(RollReport {
                format: self.report,
            })
            .add_systems(
                Update,
                (
                    handle_roll_commands,
                    track_die_collisions,
                    advance_roll,
                    record_roll_history,
                    report_completed_rolls,
                )
                    .chain(),
            );

        if self.scene {
            app.add_systems(Startup, setup)
                .add_systems(Update, handle_input.before(handle_roll_commands))
                .add_systems(Update, update_results_display.after(record_roll_history));
        }
    }
}
