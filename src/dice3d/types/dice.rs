//! Dice-related types and components
//!
//! This module contains the die-type enum, the per-face reading data handed to
//! each settle detector, and the ECS markers used by the host scene.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Component attached to each spawned die entity
#[derive(Component, Clone, Copy, Debug)]
pub struct Die {
    pub die_type: DiceType,
    /// Position of the die in its roll's spawn order
    pub index: usize,
}

/// Marker component for the dice box/container
#[derive(Component)]
pub struct DiceBox;

/// All supported dice types
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceType {
    D4,
    #[default]
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DiceType {
    pub const ALL: [DiceType; 6] = [
        DiceType::D4,
        DiceType::D6,
        DiceType::D8,
        DiceType::D10,
        DiceType::D12,
        DiceType::D20,
    ];

    /// Number of faces, which is also the highest value the die can show.
    pub fn face_count(&self) -> u32 {
        match self {
            DiceType::D4 => 4,
            DiceType::D6 => 6,
            DiceType::D8 => 8,
            DiceType::D10 => 10,
            DiceType::D12 => 12,
            DiceType::D20 => 20,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiceType::D4 => "D4",
            DiceType::D6 => "D6",
            DiceType::D8 => "D8",
            DiceType::D10 => "D10",
            DiceType::D12 => "D12",
            DiceType::D20 => "D20",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DiceType::D4 => Color::srgb(0.3, 0.4, 0.9),
            DiceType::D6 => Color::srgb(0.85, 0.15, 0.15),
            DiceType::D8 => Color::srgb(0.6, 0.2, 0.8),
            DiceType::D10 => Color::srgb(0.95, 0.95, 0.95),
            DiceType::D12 => Color::srgb(0.95, 0.5, 0.1),
            DiceType::D20 => Color::srgb(0.95, 0.85, 0.2),
        }
    }

    pub fn parse(s: &str) -> Option<DiceType> {
        match s.trim().to_lowercase().as_str() {
            "d4" | "4" => Some(DiceType::D4),
            "d6" | "6" => Some(DiceType::D6),
            "d8" | "8" => Some(DiceType::D8),
            "d10" | "10" => Some(DiceType::D10),
            "d12" | "12" => Some(DiceType::D12),
            "d20" | "20" => Some(DiceType::D20),
            _ => None,
        }
    }

    /// Physical density used for the rigid body's mass properties.
    /// Larger dice are heavier, so they tumble a little longer.
    pub fn density(&self) -> f32 {
        match self {
            DiceType::D4 => 1.0,
            DiceType::D6 => 1.5,
            DiceType::D8 => 1.8,
            DiceType::D10 => 2.0,
            DiceType::D12 => 2.5,
            DiceType::D20 => 3.0,
        }
    }

    /// Scale applied to the die's geometry (collider, mesh and raycast planes alike).
    pub fn scale(&self) -> f32 {
        match self {
            DiceType::D4 => 0.9,
            DiceType::D6 => 1.0,
            DiceType::D8 => 1.0,
            DiceType::D10 => 1.05,
            DiceType::D12 => 1.1,
            DiceType::D20 => 1.2,
        }
    }
}

impl fmt::Display for DiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One readable face of a die: a die-local direction and the value shown when
/// that direction points straight up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DieFace {
    pub normal: Vec3,
    pub value: u32,
}

impl DieFace {
    pub fn new(normal: Vec3, value: u32) -> Self {
        Self {
            normal: normal.normalize(),
            value,
        }
    }

    /// The face direction after applying the die's orientation.
    pub fn world_normal(&self, rotation: Quat) -> Vec3 {
        rotation * self.normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_type_face_count() {
        assert_eq!(DiceType::D4.face_count(), 4);
        assert_eq!(DiceType::D6.face_count(), 6);
        assert_eq!(DiceType::D8.face_count(), 8);
        assert_eq!(DiceType::D10.face_count(), 10);
        assert_eq!(DiceType::D12.face_count(), 12);
        assert_eq!(DiceType::D20.face_count(), 20);
    }

    #[test]
    fn test_dice_type_parse() {
        assert_eq!(DiceType::parse("d4"), Some(DiceType::D4));
        assert_eq!(DiceType::parse("D20"), Some(DiceType::D20));
        assert_eq!(DiceType::parse(" d12 "), Some(DiceType::D12));
        assert_eq!(DiceType::parse("8"), Some(DiceType::D8));
        assert_eq!(DiceType::parse("d100"), None);
        assert_eq!(DiceType::parse(""), None);
    }

    #[test]
    fn test_dice_type_serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&DiceType::D10).unwrap();
        assert_eq!(json, "\"d10\"");
        let parsed: DiceType = serde_json::from_str("\"d20\"").unwrap();
        assert_eq!(parsed, DiceType::D20);
    }

    #[test]
    fn test_dice_type_density_grows_with_size() {
        for pair in DiceType::ALL.windows(2) {
            assert!(pair[0].density() < pair[1].density());
            assert!(pair[0].scale() <= pair[1].scale());
        }
    }

    #[test]
    fn test_die_face_world_normal_follows_rotation() {
        let face = DieFace::new(Vec3::new(0.0, 2.0, 0.0), 6);
        assert_eq!(face.normal, Vec3::Y);

        let flipped = face.world_normal(Quat::from_rotation_x(std::f32::consts::PI));
        assert!((flipped - Vec3::NEG_Y).length() < 1e-5);
    }
}
