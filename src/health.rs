//! Health Components
//!
//! The slice of the damage and mob-state model that action health costs
//! depend on: how much damage an entity has taken, and at what amount of
//! damage it becomes critical.

use bevy::prelude::*;
use std::collections::HashMap;

/// A typed amount of damage.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageSpecifier {
    /// Damage type id (e.g. "Strain")
    pub damage_type: String,
    /// Amount of damage of that type
    pub amount: f32,
}

impl DamageSpecifier {
    pub fn new(damage_type: impl Into<String>, amount: f32) -> Self {
        Self {
            damage_type: damage_type.into(),
            amount,
        }
    }
}

/// Damage accumulated by an entity, in total and per damage type.
#[derive(Component, Clone, Debug, Default)]
pub struct Damageable {
    /// Total damage taken
    pub total: f32,
    /// Damage taken per damage type
    pub by_type: HashMap<String, f32>,
}

impl Damageable {
    /// Add damage to this entity.
    pub fn apply(&mut self, damage: &DamageSpecifier) {
        self.total += damage.amount;
        *self.by_type.entry(damage.damage_type.clone()).or_insert(0.0) += damage.amount;
    }

    /// Damage taken of a single type.
    pub fn of_type(&self, damage_type: &str) -> f32 {
        self.by_type.get(damage_type).copied().unwrap_or(0.0)
    }
}

/// Damage thresholds for mob state changes.
#[derive(Component, Clone, Debug, Default)]
pub struct MobThresholds {
    /// Total damage at which the entity becomes critical (None = never)
    pub critical: Option<f32>,
}

impl MobThresholds {
    pub fn with_critical(critical: f32) -> Self {
        Self {
            critical: Some(critical),
        }
    }
}
