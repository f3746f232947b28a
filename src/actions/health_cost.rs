//! Action health costs.
//!
//! Using a costly action deals damage to its performer, and the action is
//! refused once the performer is close enough to critical that paying the
//! cost would tip them over.

use bevy::prelude::*;

use super::ActionHost;
use crate::constants::{HEALTH_COST_DAMAGE_TYPE, HEALTH_LEVEL};
use crate::health::{DamageSpecifier, Damageable};

/// Damage paid by the performer each time the action is used.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct ActionHealthCost {
    /// Damage dealt to the performer on use (None = free)
    pub damage: Option<DamageSpecifier>,
    /// Most damage the performer may have taken and still use the action
    pub maximum_damage: Option<f32>,
}

impl ActionHealthCost {
    /// Cost of `level_cost` health levels for `user`.
    ///
    /// Without the cost damage type the action is free. Without a critical
    /// threshold the damage still applies but nothing blocks the action.
    pub fn for_levels<H: ActionHost + ?Sized>(level_cost: f32, host: &H, user: Entity) -> Self {
        if !host.has_damage_type(HEALTH_COST_DAMAGE_TYPE) {
            warn!(
                "Damage type '{}' is not defined, skipping health cost for {:?}",
                HEALTH_COST_DAMAGE_TYPE, user
            );
            return Self::default();
        }

        let amount = level_cost * HEALTH_LEVEL;
        let maximum_damage = match host.critical_threshold(user) {
            Some(critical) => Some(critical - amount),
            None => {
                debug!("{:?} has no critical threshold, health cost is uncapped", user);
                None
            }
        };

        Self {
            damage: Some(DamageSpecifier::new(HEALTH_COST_DAMAGE_TYPE, amount)),
            maximum_damage,
        }
    }

    /// Whether a performer with this much damage may use the action.
    pub fn allows(&self, damageable: Option<&Damageable>) -> bool {
        match (self.maximum_damage, damageable) {
            (Some(maximum), Some(damageable)) => damageable.total <= maximum,
            _ => true,
        }
    }

    /// Deal the cost to the performer.
    pub fn pay(&self, damageable: &mut Damageable) {
        if let Some(damage) = &self.damage {
            damageable.apply(damage);
        }
    }
}
