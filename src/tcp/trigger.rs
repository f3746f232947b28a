//! Ability Trigger Kinds
//!
//! Every TCP has exactly one trigger kind. It selects the strategy that
//! grants the creature its actions, and the entry of each ability prototype
//! that its effect holders carry.

use serde::{Deserialize, Serialize};

/// Method of activating a TCP's ability.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum AbilityTrigger {
    /// Must enter an "ascension" state, then gains a targeted action that can be used repeatedly
    ActiveAscension,
    /// Has an action they can use against a target
    ActiveTargeted,
    /// Has an action to toggle the ability's status, often a passive effect
    ActiveStatus,
    /// Has an action to do something without a target
    ActiveSelf,
    /// Performs some passive effect that can be "pulsed" to create instant effects
    PassiveWithPulse,
    /// Has a passive ability only
    Passive,
    /// Fallback entry of an ability prototype. Never selects a strategy of its own.
    Default,
    /// Has no ability
    #[default]
    Nullified,
}

impl AbilityTrigger {
    /// Every trigger kind, in declaration order.
    pub const ALL: [AbilityTrigger; 8] = [
        AbilityTrigger::ActiveAscension,
        AbilityTrigger::ActiveTargeted,
        AbilityTrigger::ActiveStatus,
        AbilityTrigger::ActiveSelf,
        AbilityTrigger::PassiveWithPulse,
        AbilityTrigger::Passive,
        AbilityTrigger::Default,
        AbilityTrigger::Nullified,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AbilityTrigger::ActiveAscension => "Active (Ascension)",
            AbilityTrigger::ActiveTargeted => "Active (Targeted)",
            AbilityTrigger::ActiveStatus => "Active (Status)",
            AbilityTrigger::ActiveSelf => "Active (Self)",
            AbilityTrigger::PassiveWithPulse => "Passive (Pulse)",
            AbilityTrigger::Passive => "Passive",
            AbilityTrigger::Default => "Default",
            AbilityTrigger::Nullified => "Nullified",
        }
    }

    /// Whether the strategy for this trigger keeps an on/off state.
    pub fn is_toggleable(&self) -> bool {
        matches!(
            self,
            AbilityTrigger::ActiveAscension | AbilityTrigger::ActiveStatus
        )
    }
}
