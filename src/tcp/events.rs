//! TCP ability events
//!
//! Requests flow in through [`ActivateAbility`], [`DeactivateAbility`] and
//! [`ReloadAbilities`]. Holders observe [`TcpAbilityActivated`] and
//! [`TcpAbilityDeactivated`], one per holder per activation.

use bevy::prelude::*;

/// Request to activate `user`'s ability against `target`.
#[derive(Event, Clone, Debug)]
pub struct ActivateAbility {
    pub user: Entity,
    pub target: Entity,
    /// Activation strength, 0.0 to 1.0
    pub strength: f32,
}

/// Request to deactivate `user`'s ability on `target`.
#[derive(Event, Clone, Debug)]
pub struct DeactivateAbility {
    pub user: Entity,
    pub target: Entity,
}

/// Delivered once per holder of an activated ability.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct TcpAbilityActivated {
    pub holder: Entity,
    pub user: Entity,
    pub target: Entity,
    pub strength: f32,
}

/// Delivered once per holder of a deactivated ability.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct TcpAbilityDeactivated {
    pub holder: Entity,
    pub user: Entity,
    pub target: Entity,
}

/// The user entered the ascended state.
#[derive(Event, Clone, Debug)]
pub struct TcpAscended {
    pub user: Entity,
}

/// The user left the ascended state.
#[derive(Event, Clone, Debug)]
pub struct TcpDescended {
    pub user: Entity,
}

/// Request to regenerate an entity's ability holders from its prototypes.
#[derive(Event, Clone, Debug)]
pub struct ReloadAbilities {
    pub entity: Entity,
}

/// Holders were (re)spawned for an entity.
#[derive(Event, Clone, Debug)]
pub struct AbilityEffectsLoaded {
    pub entity: Entity,
    /// Number of holders now owned by the entity
    pub holders: usize,
}
