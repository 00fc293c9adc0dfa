//! ECS adapters for the roll orchestrator
//!
//! Dice are Rapier rigid bodies with a convex hull collider. The orchestrator
//! sees them only through [`SpawnHost`] and [`PhysicsBodies`], keyed by
//! `Entity`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::dice3d::meshes::DiceCatalog;
use crate::dice3d::roll::{DieSpawn, PhysicsBodies, RollOrchestrator, SpawnHost};
use crate::dice3d::settle::BodySample;
use crate::dice3d::types::*;

/// Roller state shared by the dice systems
#[derive(Resource)]
pub struct DiceRoller {
    pub orchestrator: RollOrchestrator<Entity>,
    pub catalog: DiceCatalog,
    pub rng: StdRng,
}

impl DiceRoller {
    /// Seeded rolls replay identically given identical physics.
    pub fn new(settings: &RollerSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            orchestrator: RollOrchestrator::new(settings),
            catalog: DiceCatalog::standard(),
            rng,
        }
    }
}

/// Spawns dice through `Commands`, with meshes when render assets exist.
pub struct EcsSpawnHost<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: Option<&'a mut Assets<Mesh>>,
    materials: Option<&'a mut Assets<StandardMaterial>>,
}

impl<'a, 'w, 's> EcsSpawnHost<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>) -> Self {
        Self {
            commands,
            meshes: None,
            materials: None,
        }
    }

    pub fn with_visuals(
        mut self,
        meshes: Option<&'a mut Assets<Mesh>>,
        materials: Option<&'a mut Assets<StandardMaterial>>,
    ) -> Self {
        self.meshes = meshes;
        self.materials = materials;
        self
    }
}

impl SpawnHost for EcsSpawnHost<'_, '_, '_> {
    type Handle = Entity;

    fn spawn_die(&mut self, spawn: &DieSpawn) -> Option<Entity> {
        let Some(collider) = spawn.geometry.build_collider() else {
            warn!("Could not build a collider for {}", spawn.die_type);
            return None;
        };

        let mut entity = self.commands.spawn((
            Die {
                die_type: spawn.die_type,
                index: spawn.index,
            },
            Transform::from_translation(spawn.position).with_rotation(spawn.rotation),
            RigidBody::Dynamic,
            collider,
            ActiveEvents::COLLISION_EVENTS,
            Velocity::zero(),
            ExternalImpulse {
                impulse: spawn.impulse,
                torque_impulse: spawn.torque_impulse,
            },
            Restitution::coefficient(0.15),
            Friction::coefficient(0.7),
            ColliderMassProperties::Density(spawn.die_type.density()),
            Ccd::enabled(),
            Name::new(format!("{} #{}", spawn.die_type, spawn.index + 1)),
        ));

        if let (Some(meshes), Some(materials)) = (self.meshes.as_deref_mut(), self.materials.as_deref_mut()) {
            let material = materials.add(StandardMaterial {
                base_color: spawn.die_type.color(),
                reflectance: 0.7,
                perceptual_roughness: 0.15,
                metallic: 0.1,
                ..default()
            });
            entity.insert((
                Mesh3d(meshes.add(spawn.geometry.build_mesh())),
                MeshMaterial3d(material),
            ));
        }

        Some(entity.id())
    }

    fn despawn_die(&mut self, handle: Entity) {
        self.commands.entity(handle).despawn();
    }
}

/// Query shape the dice systems use to read and stop die bodies.
pub type DieBodyQuery<'w, 's> =
    Query<'w, 's, (&'static Transform, &'static mut Velocity), With<Die>>;

/// [`PhysicsBodies`] view over the die body query.
pub struct DieBodies<'a, 'w, 's> {
    query: &'a mut DieBodyQuery<'w, 's>,
}

impl<'a, 'w, 's> DieBodies<'a, 'w, 's> {
    pub fn new(query: &'a mut DieBodyQuery<'w, 's>) -> Self {
        Self { query }
    }
}

impl PhysicsBodies for DieBodies<'_, '_, '_> {
    type Handle = Entity;

    fn sample(&self, handle: Entity) -> Option<BodySample> {
        let (transform, velocity) = self.query.get(handle).ok()?;
        Some(BodySample {
            translation: transform.translation,
            rotation: transform.rotation,
            linvel: velocity.linvel,
            angvel: velocity.angvel,
        })
    }

    fn zero_velocity(&mut self, handle: Entity) {
        if let Ok((_, mut velocity)) = self.query.get_mut(handle) {
            *velocity = Velocity::zero();
        }
    }
}
