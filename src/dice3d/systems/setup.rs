//! Scene setup system
//!
//! This module contains the setup function that initializes the 3D scene:
//! camera, light, the dice box colliders and the results text.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dice3d::types::*;

/// Half the inner width of the dice box.
pub const BOX_HALF_SIZE: f32 = 2.0;
/// Height of the box walls; an invisible ceiling sits just below it.
pub const WALL_HEIGHT: f32 = 1.5;
const WALL_THICKNESS: f32 = 0.15;

/// Spawn the fixed colliders that keep the dice in the box
pub fn spawn_dice_box(commands: &mut Commands) {
    let size = BOX_HALF_SIZE * 2.0;

    // Floor
    commands.spawn((
        Collider::cuboid(BOX_HALF_SIZE, 0.15, BOX_HALF_SIZE),
        Transform::from_xyz(0.0, -0.15, 0.0),
        RigidBody::Fixed,
        Restitution::coefficient(0.2),
        Friction::coefficient(0.8),
        DiceBox,
        Name::new("DiceBoxFloor"),
    ));

    for (pos, half) in box_walls(size) {
        commands.spawn((
            Collider::cuboid(half.x, half.y, half.z),
            Transform::from_translation(pos),
            RigidBody::Fixed,
            Restitution::coefficient(0.2),
            Friction::coefficient(0.8),
            DiceBox,
        ));
    }

    // Invisible ceiling to prevent dice from bouncing out
    commands.spawn((
        Collider::cuboid(BOX_HALF_SIZE + 0.5, 0.2, BOX_HALF_SIZE + 0.5),
        Transform::from_xyz(0.0, WALL_HEIGHT + 0.1, 0.0),
        RigidBody::Fixed,
        Restitution::coefficient(0.05),
        Friction::coefficient(0.3),
        DiceBox,
    ));
}

/// `(centre, half extents)` of the four walls.
fn box_walls(size: f32) -> [(Vec3, Vec3); 4] {
    let y = WALL_HEIGHT / 2.0;
    let long = Vec3::new(size / 2.0 + WALL_THICKNESS, y, WALL_THICKNESS / 2.0);
    let side = Vec3::new(WALL_THICKNESS / 2.0, y, size / 2.0);
    [
        (Vec3::new(0.0, y, -BOX_HALF_SIZE), long),
        (Vec3::new(0.0, y, BOX_HALF_SIZE), long),
        (Vec3::new(-BOX_HALF_SIZE, y, 0.0), side),
        (Vec3::new(BOX_HALF_SIZE, y, 0.0), side),
    ]
}

/// Main setup system - camera, light, visible box and results text
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 4.5, 4.5).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Crystal/glass material for the box
    let crystal_mat = materials.add(StandardMaterial {
        base_color: Color::srgba(0.7, 0.85, 0.95, 0.3),
        alpha_mode: AlphaMode::Blend,
        reflectance: 0.8,
        perceptual_roughness: 0.1,
        ..default()
    });

    let size = BOX_HALF_SIZE * 2.0;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size, 0.3, size))),
        MeshMaterial3d(crystal_mat.clone()),
        Transform::from_xyz(0.0, -0.15, 0.0),
    ));
    for (pos, half) in box_walls(size) {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0))),
            MeshMaterial3d(crystal_mat.clone()),
            Transform::from_translation(pos),
        ));
    }

    spawn_dice_box(&mut commands);

    commands.spawn((
        Text::new("Press SPACE to roll dice"),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        ResultsText,
    ));
}
