//! TCP abilities
//!
//! Implements the ability model of TCP creatures:
//! - One trigger strategy per creature, granting its actions
//! - Holder entities carrying the effect components of each ability
//! - Activation routing from actions to holders
//! - Ability logging

use bevy::prelude::*;

pub mod components;
pub mod dispatch;
pub mod effects;
pub mod events;
pub mod holders;
pub mod log;
pub mod strategy;
pub mod systems;
pub mod trigger;

use crate::actions::{ActionPerformed, ActionRejected, PerformAction};
use crate::delayed::{
    CancelDelayedInteraction, DelayedInteractionCancelled, DelayedInteractionCompleted,
};
use crate::exposure::{ExposureBuildup, ExposureDecay, ExposureUpdate};
use crate::prototypes::TcpPrototypes;
use events::*;

/// Plugin for TCP abilities.
///
/// Uses the `TcpPrototypes` resource if one was inserted before the plugin,
/// otherwise the built-in prototypes.
pub struct TcpAbilityPlugin;

impl Plugin for TcpAbilityPlugin {
    fn build(&self, app: &mut App) {
        app
            // Requests
            .add_event::<PerformAction>()
            .add_event::<ActivateAbility>()
            .add_event::<DeactivateAbility>()
            .add_event::<ReloadAbilities>()
            .add_event::<CancelDelayedInteraction>()
            // Outcomes
            .add_event::<ActionPerformed>()
            .add_event::<ActionRejected>()
            .add_event::<TcpAbilityActivated>()
            .add_event::<TcpAbilityDeactivated>()
            .add_event::<TcpAscended>()
            .add_event::<TcpDescended>()
            .add_event::<AbilityEffectsLoaded>()
            .add_event::<DelayedInteractionCompleted>()
            .add_event::<DelayedInteractionCancelled>()
            .add_event::<ExposureBuildup>()
            .add_event::<ExposureDecay>()
            .add_event::<ExposureUpdate>()
            // Resources
            .init_resource::<TcpPrototypes>()
            .init_resource::<log::AbilityLog>()
            // Unload on profile removal or despawn
            .add_observer(dispatch::shutdown_abilities);

        systems::configure_tcp_system_ordering(app);
        systems::add_tcp_systems(app, || true);
    }
}
