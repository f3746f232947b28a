//! Action granting seam.
//!
//! Ability strategies grant and revoke actions through [`ActionHost`] rather
//! than touching the world directly. Systems use [`ActionGrants`], which
//! spawns action entities through `Commands`.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{Action, ActionHealthCost};
use crate::health::MobThresholds;
use crate::prototypes::TcpPrototypes;

/// Everything a strategy needs from the outside world.
pub trait ActionHost {
    /// Grant `user` a new action built from `prototype`. `None` if the prototype is unknown.
    fn add_action(&mut self, user: Entity, prototype: &str) -> Option<Entity>;

    /// Revoke a previously granted action.
    fn remove_action(&mut self, action: Entity);

    /// Attach a health cost to a granted action.
    fn set_health_cost(&mut self, action: Entity, cost: ActionHealthCost);

    fn has_damage_type(&self, damage_type: &str) -> bool;

    /// Total damage at which `user` becomes critical, if it has thresholds.
    fn critical_threshold(&self, user: Entity) -> Option<f32>;
}

/// [`ActionHost`] backed by the ECS.
#[derive(SystemParam)]
pub struct ActionGrants<'w, 's> {
    commands: Commands<'w, 's>,
    prototypes: Res<'w, TcpPrototypes>,
    thresholds: Query<'w, 's, &'static MobThresholds>,
}

impl ActionHost for ActionGrants<'_, '_> {
    fn add_action(&mut self, user: Entity, prototype: &str) -> Option<Entity> {
        let Some(proto) = self.prototypes.action(prototype) else {
            warn!("Unknown action prototype '{}' for {:?}", prototype, user);
            return None;
        };

        let action = self
            .commands
            .spawn((
                Action {
                    owner: user,
                    prototype: prototype.to_string(),
                    kind: proto.kind,
                    use_delay: proto.use_delay,
                    range: proto.range,
                },
                Name::new(proto.name.clone()),
            ))
            .id();

        debug!("Granted action '{}' ({:?}) to {:?}", prototype, action, user);
        Some(action)
    }

    fn remove_action(&mut self, action: Entity) {
        if let Some(mut entity) = self.commands.get_entity(action) {
            entity.despawn();
        }
    }

    fn set_health_cost(&mut self, action: Entity, cost: ActionHealthCost) {
        if let Some(mut entity) = self.commands.get_entity(action) {
            entity.insert(cost);
        }
    }

    fn has_damage_type(&self, damage_type: &str) -> bool {
        self.prototypes.has_damage_type(damage_type)
    }

    fn critical_threshold(&self, user: Entity) -> Option<f32> {
        self.thresholds.get(user).ok().and_then(|t| t.critical)
    }
}

/// In-memory host that records every call, for strategy unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    pub struct RecordingHost {
        next_index: u32,
        pub known_prototypes: Vec<&'static str>,
        pub damage_types: Vec<&'static str>,
        pub critical: Option<f32>,
        /// Live actions and the prototype they were created from
        pub actions: HashMap<Entity, String>,
        pub costs: HashMap<Entity, ActionHealthCost>,
        pub removed: Vec<Entity>,
    }

    impl RecordingHost {
        pub fn new() -> Self {
            Self {
                next_index: 1000,
                known_prototypes: vec![
                    crate::constants::ASCEND_ACTION_PROTOTYPE,
                    crate::constants::ABILITY_ACTION_PROTOTYPE,
                    crate::constants::ABILITY_TARGETED_PROTOTYPE,
                    crate::constants::ASCENDED_TARGETED_PROTOTYPE,
                    crate::constants::ABILITY_STATUS_PROTOTYPE,
                    crate::constants::ABILITY_PULSE_PROTOTYPE,
                ],
                damage_types: vec![crate::constants::HEALTH_COST_DAMAGE_TYPE],
                critical: Some(100.0),
                actions: HashMap::new(),
                costs: HashMap::new(),
                removed: Vec::new(),
            }
        }

        pub fn prototype_of(&self, action: Entity) -> Option<&str> {
            self.actions.get(&action).map(String::as_str)
        }

        pub fn count_of(&self, prototype: &str) -> usize {
            self.actions.values().filter(|p| *p == prototype).count()
        }
    }

    impl ActionHost for RecordingHost {
        fn add_action(&mut self, _user: Entity, prototype: &str) -> Option<Entity> {
            if !self.known_prototypes.contains(&prototype) {
                return None;
            }
            let action = Entity::from_raw(self.next_index);
            self.next_index += 1;
            self.actions.insert(action, prototype.to_string());
            Some(action)
        }

        fn remove_action(&mut self, action: Entity) {
            self.actions.remove(&action);
            self.costs.remove(&action);
            self.removed.push(action);
        }

        fn set_health_cost(&mut self, action: Entity, cost: ActionHealthCost) {
            self.costs.insert(action, cost);
        }

        fn has_damage_type(&self, damage_type: &str) -> bool {
            self.damage_types.contains(&damage_type)
        }

        fn critical_threshold(&self, _user: Entity) -> Option<f32> {
            self.critical
        }
    }
}
