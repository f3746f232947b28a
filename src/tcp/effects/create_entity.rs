//! Create Entity effect
//!
//! A holder with [`CreateEntityAbility`] spawns a new entity for every
//! activation, before the activation reaches the other holders. The spawned
//! entity replaces the activation's target.

use bevy::prelude::*;

/// Holder component: spawn `prototype` on activation.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct CreateEntityAbility {
    pub prototype: String,
    /// Give the spawned entity to the user when they target themselves
    pub pickup_on_spawn: bool,
}

/// Marks an entity spawned by an ability.
#[derive(Component, Clone, Debug)]
pub struct SpawnedByAbility {
    pub prototype: String,
    /// The ability user
    pub source: Entity,
}

/// The spawned entity is held by this entity instead of lying in the world.
#[derive(Component, Clone, Debug)]
pub struct PickedUpBy {
    pub holder: Entity,
}

impl CreateEntityAbility {
    /// Spawn the prototype for an activation and return the new target.
    ///
    /// Placed at the target's position, or handed to the user when the user
    /// is the target and pickup is enabled.
    pub fn spawn_for(
        &self,
        commands: &mut Commands,
        user: Entity,
        target: Entity,
        target_position: Vec3,
    ) -> Entity {
        let mut spawned = commands.spawn((
            SpawnedByAbility {
                prototype: self.prototype.clone(),
                source: user,
            },
            Name::new(self.prototype.clone()),
            Transform::from_translation(target_position),
        ));

        if user == target && self.pickup_on_spawn {
            spawned.insert(PickedUpBy { holder: user });
            debug!("{:?} spawned '{}' into its hands", user, self.prototype);
        } else {
            debug!("{:?} spawned '{}' next to {:?}", user, self.prototype, target);
        }

        spawned.id()
    }
}
