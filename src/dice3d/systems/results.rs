//! Result presentation
//!
//! Keeps the on-screen results text current and echoes completed rolls to
//! stdout in the selected [`ReportFormat`].

use bevy::prelude::*;
use colored::Colorize;

use crate::dice3d::settle::SettlePhase;
use crate::dice3d::types::*;

use super::bodies::DiceRoller;

/// System to update the results display text
pub fn update_results_display(
    roller: Res<DiceRoller>,
    selection: Res<RollSelection>,
    history: Res<RollHistory>,
    mut text_query: Query<&mut Text, With<ResultsText>>,
) {
    let orchestrator = &roller.orchestrator;
    let header = format!(
        "Next roll: {}x{}  (1-6 die, Up/Down count)\n",
        selection.count, selection.die_type
    );

    let body = if orchestrator.is_active() {
        let settled = orchestrator
            .dice()
            .iter()
            .filter(|die| die.phase() == SettlePhase::Resolved)
            .count();
        format!(
            "Rolling... {}/{} settled ({:.1}s)\nPress ESC to stop",
            settled,
            orchestrator.dice().len(),
            orchestrator.elapsed()
        )
    } else if let Some(completion) = orchestrator.completion() {
        let mut text = format!("Result: {}", completion.outcome);
        if completion.kind.is_forced() {
            text.push_str(&format!(" ({})", completion.kind));
        }
        text.push_str(&format!(
            "\nRolls this session: {}\n\nPress SPACE to roll again\nPress R to reset, C to clear history",
            history.len()
        ));
        text
    } else {
        String::from("Press SPACE to roll dice")
    };

    for mut text in text_query.iter_mut() {
        text.0 = format!("{}{}", header, body);
    }
}

/// Print completed rolls to stdout
pub fn report_completed_rolls(
    mut completed: MessageReader<RollCompleted>,
    report: Res<RollReport>,
    history: Res<RollHistory>,
) {
    for ev in completed.read() {
        match report.format {
            ReportFormat::Silent => {}
            ReportFormat::Pretty => println!("{}", format_pretty(ev)),
            ReportFormat::Json => {
                // The history entry carries id and timestamp; fall back to the
                // bare outcome when the history has not caught up yet.
                let line = match history.latest() {
                    Some(record) if record.values == ev.outcome.values() => {
                        serde_json::to_string(record)
                    }
                    _ => serde_json::to_string(&ev.outcome),
                };
                match line {
                    Ok(line) => println!("{}", line),
                    Err(err) => error!("Failed to serialize roll: {}", err),
                }
            }
        }
    }
}

pub fn format_pretty(ev: &RollCompleted) -> String {
    let outcome = &ev.outcome;
    let values: Vec<String> = outcome.values().iter().map(|v| v.to_string()).collect();
    let mut line = format!(
        "{} {} {} {}",
        "Rolled".bold(),
        format!("{}x{}", outcome.die_count(), outcome.die_type()).cyan(),
        format!("[{}]", values.join(", ")).white(),
        format!("= {}", outcome.total()).green().bold(),
    );
    if ev.kind.is_forced() {
        line.push_str(&format!(" {}", format!("({})", ev.kind).yellow()));
    }
    line
}
