//! Input handling systems
//!
//! Keyboard controls for the host scene: pick a die type and count, roll,
//! force-stop, reset and clear the history. Input only produces [`RollCommand`]s; the dice
//! systems act on them.

use bevy::prelude::*;

use crate::dice3d::types::*;

const DIE_KEYS: [(KeyCode, DiceType); 6] = [
    (KeyCode::Digit1, DiceType::D4),
    (KeyCode::Digit2, DiceType::D6),
    (KeyCode::Digit3, DiceType::D8),
    (KeyCode::Digit4, DiceType::D10),
    (KeyCode::Digit5, DiceType::D12),
    (KeyCode::Digit6, DiceType::D20),
];

/// Handle keyboard input for rolling and resetting dice
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut selection: ResMut<RollSelection>,
    mut roll_commands: MessageWriter<RollCommand>,
) {
    for (key, die_type) in DIE_KEYS {
        if keyboard.just_pressed(key) && selection.die_type != die_type {
            selection.die_type = die_type;
            debug!("Selected {}", die_type);
        }
    }

    if keyboard.just_pressed(KeyCode::ArrowUp) {
        selection.adjust_count(1);
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        selection.adjust_count(-1);
    }

    if keyboard.just_pressed(KeyCode::Space) {
        roll_commands.write(RollCommand::Roll {
            die_type: selection.die_type,
            count: selection.count as i32,
        });
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        roll_commands.write(RollCommand::ForceStop);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        roll_commands.write(RollCommand::Reset);
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        roll_commands.write(RollCommand::ClearHistory);
    }
}
