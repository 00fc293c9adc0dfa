// Hide console window on Windows for release builds (GUI app).
// Rolls are still echoed to stdout when a console is attached.
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use clap::Parser;
use colored::Colorize;

use dicerollgen::dice3d::{
    clamp_die_count, DiceRollerPlugin, DiceType, ReportFormat, RollCommand, RollerSettings,
};

/// Dice Roll Generator - physics dice that settle for real
#[derive(Parser, Debug)]
#[command(name = "dicerollgen")]
#[command(author, version, about = "Physics-driven 3D dice roller")]
struct Args {
    /// Dice for the first roll (e.g., "3d6", "d20", "2d10")
    #[arg(short, long, value_parser = parse_dice_arg)]
    dice: Option<(usize, DiceType)>,

    /// Settings file (JSON); defaults are used when it does not exist
    #[arg(short, long, default_value = "dicerollgen.json")]
    settings: PathBuf,

    /// Seed for spawn orientations and launch impulses
    #[arg(long)]
    seed: Option<u64>,

    /// Print completed rolls as JSON lines instead of a colored summary
    #[arg(long)]
    json: bool,

    /// Throw the dice as soon as the scene is ready
    #[arg(short, long)]
    roll: bool,

    /// Write the effective settings to the settings file and exit
    #[arg(long)]
    write_settings: bool,
}

fn parse_dice_arg(s: &str) -> Result<(usize, DiceType), String> {
    let s = s.trim().to_lowercase();

    let (count_str, die_str) = if s.starts_with('d') {
        ("1", s.as_str())
    } else if let Some(pos) = s.find('d') {
        (&s[..pos], &s[pos..])
    } else {
        return Err(format!(
            "Invalid dice format: {}. Use format like '2d6' or 'd20'",
            s
        ));
    };

    let count = parse_count(count_str)?;
    let die_type = DiceType::parse(die_str).ok_or_else(|| {
        format!(
            "Unknown die type: {}. Valid: d4, d6, d8, d10, d12, d20",
            die_str
        )
    })?;

    Ok((clamp_die_count(count), die_type))
}

/// Integer count, saturating at the `i32` bounds so huge values still clamp.
fn parse_count(count_str: &str) -> Result<i32, String> {
    let digits = count_str.strip_prefix(['+', '-']).unwrap_or(count_str);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("Invalid count: {}", count_str));
    }

    Ok(count_str.parse().unwrap_or(if count_str.starts_with('-') {
        i32::MIN
    } else {
        i32::MAX
    }))
}

fn main() {
    let args = Args::parse();

    let mut settings = match RollerSettings::load_or_default(&args.settings) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{} {}", "Warning:".yellow().bold(), err);
            eprintln!("Falling back to default settings");
            RollerSettings::default()
        }
    };

    if let Some((count, die_type)) = args.dice {
        settings.default_die = die_type;
        settings.default_count = count as i32;
    }

    if args.write_settings {
        match settings.save(&args.settings) {
            Ok(()) => println!("Settings written to {}", args.settings.display()),
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                std::process::exit(1);
            }
        }
        return;
    }

    let report = if args.json {
        ReportFormat::Json
    } else {
        ReportFormat::Pretty
    };
    let first_roll = RollCommand::Roll {
        die_type: settings.default_die,
        count: settings.default_count,
    };

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Dice Roll Generator".to_string(),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
    .add_plugins(
        DiceRollerPlugin::headless(settings)
            .with_scene()
            .with_seed(args.seed)
            .with_report(report),
    );

    if args.roll {
        app.add_systems(
            Startup,
            move |mut roll_commands: MessageWriter<RollCommand>| {
                roll_commands.write(first_roll);
            },
        );
    }

    app.run();
}
