//! Apply Status effect
//!
//! While a holder with [`ApplyStatusAbility`] is active on a target, the
//! target carries the holder's statuses in its [`StatusEffects`].

use bevy::prelude::*;
use std::collections::{BTreeSet, HashMap};

use crate::tcp::events::{TcpAbilityActivated, TcpAbilityDeactivated};

/// Holder component: statuses added to the target on activation.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct ApplyStatusAbility {
    pub statuses: Vec<String>,
}

/// Statuses currently applied to an entity.
#[derive(Component, Clone, Debug, Default)]
pub struct StatusEffects {
    pub active: BTreeSet<String>,
}

impl StatusEffects {
    pub fn has(&self, status: &str) -> bool {
        self.active.contains(status)
    }
}

/// Add statuses on activation and remove them on deactivation.
///
/// Targets without a `StatusEffects` component get one. All changes to the
/// same target within a frame are merged before inserting.
pub fn apply_status_effects(
    mut commands: Commands,
    mut activated: EventReader<TcpAbilityActivated>,
    mut deactivated: EventReader<TcpAbilityDeactivated>,
    holders: Query<&ApplyStatusAbility>,
    mut targets: Query<&mut StatusEffects>,
) {
    let mut pending: HashMap<Entity, StatusEffects> = HashMap::new();

    for event in activated.read() {
        let Ok(ability) = holders.get(event.holder) else {
            continue;
        };

        let statuses = match targets.get_mut(event.target) {
            Ok(effects) => &mut effects.into_inner().active,
            Err(_) => &mut pending.entry(event.target).or_default().active,
        };

        for status in &ability.statuses {
            if statuses.insert(status.clone()) {
                debug!("{:?} gains status '{}' from {:?}", event.target, status, event.user);
            }
        }
    }

    for event in deactivated.read() {
        let Ok(ability) = holders.get(event.holder) else {
            continue;
        };

        let statuses = match targets.get_mut(event.target) {
            Ok(effects) => &mut effects.into_inner().active,
            Err(_) => match pending.get_mut(&event.target) {
                Some(effects) => &mut effects.active,
                None => continue,
            },
        };

        for status in &ability.statuses {
            if statuses.remove(status) {
                debug!("{:?} loses status '{}'", event.target, status);
            }
        }
    }

    for (target, effects) in pending {
        if let Some(mut entity) = commands.get_entity(target) {
            entity.insert(effects);
        }
    }
}
