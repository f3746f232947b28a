//! Ability Effects
//!
//! The components an ability holder can carry, and the systems that react when
//! the holder's ability is activated or deactivated. Prototypes describe
//! effects as [`AbilityEffect`] values; [`insert_bundle`] turns a bundle into
//! components on a holder entity.

pub mod apply_status;
pub mod create_entity;
pub mod exposure_burst;

pub use apply_status::{apply_status_effects, ApplyStatusAbility, StatusEffects};
pub use create_entity::{CreateEntityAbility, PickedUpBy, SpawnedByAbility};
pub use exposure_burst::{apply_exposure_bursts, ExposureBurstAbility};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

fn default_pickup_on_spawn() -> bool {
    true
}

/// One effect component of an ability prototype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Add statuses to the target while active
    ApplyStatus { statuses: Vec<String> },
    /// Spawn an entity at the target, which then becomes the target
    CreateEntity {
        prototype: String,
        /// Hand the entity to the user when they target themselves
        #[serde(default = "default_pickup_on_spawn")]
        pickup_on_spawn: bool,
    },
    /// Instantly add exposure from the user to the target
    ExposureBurst { amount: f32 },
}

/// Ordered effects one holder carries.
pub type EffectBundle = Vec<AbilityEffect>;

/// Insert the components of `bundle` on a holder entity.
///
/// Repeated `ApplyStatus` effects are merged. For the other kinds the last
/// entry wins.
pub fn insert_bundle(entity: &mut EntityCommands, bundle: &EffectBundle) {
    let mut statuses: Vec<String> = Vec::new();

    for effect in bundle {
        match effect {
            AbilityEffect::ApplyStatus { statuses: added } => {
                for status in added {
                    if !statuses.contains(status) {
                        statuses.push(status.clone());
                    }
                }
            }
            AbilityEffect::CreateEntity {
                prototype,
                pickup_on_spawn,
            } => {
                entity.insert(CreateEntityAbility {
                    prototype: prototype.clone(),
                    pickup_on_spawn: *pickup_on_spawn,
                });
            }
            AbilityEffect::ExposureBurst { amount } => {
                entity.insert(ExposureBurstAbility { amount: *amount });
            }
        }
    }

    if !statuses.is_empty() {
        entity.insert(ApplyStatusAbility { statuses });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::world::CommandQueue;

    #[test]
    fn test_pickup_defaults_to_true() {
        let effect: AbilityEffect =
            ron::from_str(r#"CreateEntity(prototype: "TCPSpore")"#).unwrap();
        assert_eq!(
            effect,
            AbilityEffect::CreateEntity {
                prototype: "TCPSpore".to_string(),
                pickup_on_spawn: true,
            }
        );
    }

    #[test]
    fn test_insert_bundle_merges_statuses() {
        let mut world = World::new();
        let holder = world.spawn_empty().id();

        let bundle = vec![
            AbilityEffect::ApplyStatus {
                statuses: vec!["Blinded".to_string()],
            },
            AbilityEffect::ExposureBurst { amount: 4.0 },
            AbilityEffect::ApplyStatus {
                statuses: vec!["Blinded".to_string(), "Dazed".to_string()],
            },
        ];

        let mut queue = CommandQueue::default();
        let mut commands = Commands::new(&mut queue, &world);
        insert_bundle(&mut commands.entity(holder), &bundle);
        queue.apply(&mut world);

        let status = world.get::<ApplyStatusAbility>(holder).unwrap();
        assert_eq!(status.statuses, vec!["Blinded", "Dazed"]);
        assert_eq!(world.get::<ExposureBurstAbility>(holder).unwrap().amount, 4.0);
        assert!(world.get::<CreateEntityAbility>(holder).is_none());
    }
}
