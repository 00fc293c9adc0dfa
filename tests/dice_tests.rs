//! Tests for dice types, geometry and face reading

use bevy::prelude::*;
use dicerollgen::dice3d::meshes::{die_faces, die_geometry, DiceCatalog};
use dicerollgen::dice3d::settle::{best_face_by_dot, raycast_face};
use dicerollgen::dice3d::types::{DetectionSettings, DiceType};

#[test]
fn test_dice_type_face_counts() {
    assert_eq!(DiceType::D4.face_count(), 4);
    assert_eq!(DiceType::D6.face_count(), 6);
    assert_eq!(DiceType::D8.face_count(), 8);
    assert_eq!(DiceType::D10.face_count(), 10);
    assert_eq!(DiceType::D12.face_count(), 12);
    assert_eq!(DiceType::D20.face_count(), 20);
}

#[test]
fn test_dice_type_names() {
    assert_eq!(DiceType::D4.name(), "D4");
    assert_eq!(DiceType::D6.name(), "D6");
    assert_eq!(DiceType::D8.name(), "D8");
    assert_eq!(DiceType::D10.name(), "D10");
    assert_eq!(DiceType::D12.name(), "D12");
    assert_eq!(DiceType::D20.name(), "D20");
}

#[test]
fn test_dice_type_parse_valid() {
    assert_eq!(DiceType::parse("d4"), Some(DiceType::D4));
    assert_eq!(DiceType::parse("D4"), Some(DiceType::D4));
    assert_eq!(DiceType::parse("d6"), Some(DiceType::D6));
    assert_eq!(DiceType::parse("D6"), Some(DiceType::D6));
    assert_eq!(DiceType::parse("d8"), Some(DiceType::D8));
    assert_eq!(DiceType::parse("d10"), Some(DiceType::D10));
    assert_eq!(DiceType::parse("d12"), Some(DiceType::D12));
    assert_eq!(DiceType::parse("d20"), Some(DiceType::D20));
    assert_eq!(DiceType::parse("20"), Some(DiceType::D20));
}

#[test]
fn test_dice_type_parse_invalid() {
    assert_eq!(DiceType::parse("d3"), None);
    assert_eq!(DiceType::parse("d100"), None);
    assert_eq!(DiceType::parse("invalid"), None);
    assert_eq!(DiceType::parse(""), None);
}

#[test]
fn test_dice_type_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&DiceType::D12).unwrap(), "\"d12\"");
    let parsed: DiceType = serde_json::from_str("\"d10\"").unwrap();
    assert_eq!(parsed, DiceType::D10);
}

#[test]
fn test_each_face_reads_its_own_value_when_turned_up() {
    for die_type in DiceType::ALL {
        let geometry = die_geometry(die_type);
        for face in die_faces(die_type) {
            let rotation = Quat::from_rotation_arc(face.normal, Vec3::Y);
            let world: Vec<Vec3> = die_faces(die_type)
                .iter()
                .map(|f| f.world_normal(rotation))
                .collect();

            let (index, dot) = best_face_by_dot(&world).unwrap();
            assert!(dot > 0.999, "{die_type} face {} not up", face.value);
            assert_eq!(die_faces(die_type)[index].value, face.value);

            let ray = raycast_face(&geometry, rotation, &DetectionSettings::default());
            assert_eq!(ray, Some(face.value), "{die_type} ray on face {}", face.value);
        }
    }
}

#[test]
fn test_standard_catalog_covers_every_die() {
    let catalog = DiceCatalog::standard();
    for die_type in DiceType::ALL {
        let geometry = catalog.get(die_type).unwrap();
        assert_eq!(geometry.die_type(), die_type);
        assert!(geometry.build_collider().is_some());
    }
}
