//! Actions
//!
//! Actions are entities granted to a creature by its ability strategy. Each
//! action entity carries an [`Action`] component naming its owner and what
//! kind of invocation it raises, and optionally an [`ActionHealthCost`].
//!
//! Invoking an action is a [`PerformAction`] request. The TCP dispatch systems
//! answer every request with either [`ActionPerformed`] or [`ActionRejected`].

pub mod health_cost;
pub mod host;

pub use health_cost::ActionHealthCost;
pub use host::{ActionGrants, ActionHost};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// What invoking an action does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Toggle the ascended state
    ToggleAscension,
    /// Use the ability on the performer
    UseSelf,
    /// Use the ability on a target, possibly after a delay
    UseTargeted,
    /// Toggle a status ability
    ToggleStatus,
    /// Pulse the ability at everything nearby
    Pulse,
}

/// An action entity granted to `owner`.
#[derive(Component, Clone, Debug)]
pub struct Action {
    /// The entity this action was granted to
    pub owner: Entity,
    /// Prototype id the action was created from
    pub prototype: String,
    pub kind: ActionKind,
    /// Seconds between invocation and effect
    pub use_delay: f32,
    /// Maximum distance to a target
    pub range: Option<f32>,
}

/// Request to invoke an action.
#[derive(Event, Clone, Debug)]
pub struct PerformAction {
    pub performer: Entity,
    pub action: Entity,
    pub target: Option<Entity>,
}

/// An action invocation was handled.
#[derive(Event, Clone, Debug)]
pub struct ActionPerformed {
    pub performer: Entity,
    pub action: Entity,
    pub kind: ActionKind,
}

/// Why an action invocation was not handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The action entity doesn't exist or belongs to someone else
    NotOwned,
    /// The performer has no loaded ability strategy
    NoAbility,
    /// The performer has taken too much damage to pay the cost
    TooInjured,
    /// Targeted action without a valid target in range
    InvalidTarget,
    /// A delayed use against this target is already pending
    AlreadyPending,
}

impl RejectReason {
    pub fn describe(&self) -> &'static str {
        match self {
            RejectReason::NotOwned => "action not owned by performer",
            RejectReason::NoAbility => "performer has no loaded ability",
            RejectReason::TooInjured => "performer is too injured",
            RejectReason::InvalidTarget => "no valid target in range",
            RejectReason::AlreadyPending => "use already pending on target",
        }
    }
}

/// An action invocation was rejected and left unhandled.
#[derive(Event, Clone, Debug)]
pub struct ActionRejected {
    pub performer: Entity,
    pub action: Entity,
    pub reason: RejectReason,
}
