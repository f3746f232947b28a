//! Ability Trigger Strategies
//!
//! One strategy per trigger kind decides which actions a TCP is granted and
//! what happens when they are used. Strategies only hold their own state
//! (toggles, the ascended action); granting and revoking actions goes through
//! an [`ActionHost`], and the list of granted actions is owned by the caller.
//!
//! | Trigger          | Granted on load            | Cost (levels) |
//! |------------------|----------------------------|---------------|
//! | ActiveAscension  | ascend toggle              | free          |
//! | ActiveTargeted   | targeted use               | 1             |
//! | ActiveStatus     | status toggle              | free          |
//! | ActiveSelf       | self use                   | 1             |
//! | PassiveWithPulse | pulse                      | 2             |
//! | Passive          | nothing                    |               |
//! | Nullified        | nothing                    |               |

use bevy::prelude::*;

use crate::actions::{ActionHealthCost, ActionHost};
use crate::constants::*;
use crate::prototypes::AbilityDefinition;
use crate::tcp::effects::EffectBundle;
use crate::tcp::trigger::AbilityTrigger;

/// State of the ascension toggle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AscensionState {
    pub enabled: bool,
    /// Targeted action granted while ascended
    pub ability_action: Option<Entity>,
}

/// Behaviour selected by the trigger kind.
#[derive(Clone, Debug, PartialEq)]
pub enum TriggerVariant {
    ActiveAscension(AscensionState),
    ActiveTargeted,
    ActiveStatus { enabled: bool },
    ActiveSelf,
    PassiveWithPulse,
    Passive,
    Nullified,
}

/// What using the strategy's action should do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActivationPlan {
    /// Nothing to activate
    Nothing,
    /// Activate on the user itself
    OnSelf { strength: f32 },
    /// Activate on the chosen target
    OnTarget { strength: f32 },
    /// Activate on every entity within `radius` of the user
    Pulse { radius: f32, strength: f32 },
    /// The status toggle flipped to `enabled`
    Toggled { enabled: bool },
}

/// Result of toggling ascension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AscensionTransition {
    Ascended,
    Descended,
}

/// A trigger strategy bound to the entity that uses it.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityTriggerStrategy {
    user: Entity,
    variant: TriggerVariant,
}

/// Build the strategy for `trigger`. `Default` and `Nullified` get the no-op strategy.
pub fn create_strategy(trigger: AbilityTrigger, user: Entity) -> AbilityTriggerStrategy {
    let variant = match trigger {
        AbilityTrigger::ActiveAscension => TriggerVariant::ActiveAscension(AscensionState::default()),
        AbilityTrigger::ActiveTargeted => TriggerVariant::ActiveTargeted,
        AbilityTrigger::ActiveStatus => TriggerVariant::ActiveStatus { enabled: false },
        AbilityTrigger::ActiveSelf => TriggerVariant::ActiveSelf,
        AbilityTrigger::PassiveWithPulse => TriggerVariant::PassiveWithPulse,
        AbilityTrigger::Passive => TriggerVariant::Passive,
        AbilityTrigger::Default | AbilityTrigger::Nullified => TriggerVariant::Nullified,
    };

    AbilityTriggerStrategy { user, variant }
}

/// Grant `prototype` to `user`, attaching a health cost when `level_cost` is set.
fn load_ability_action<H: ActionHost + ?Sized>(
    host: &mut H,
    user: Entity,
    granted: &mut Vec<Entity>,
    level_cost: Option<f32>,
    prototype: &str,
) -> Option<Entity> {
    let action = host.add_action(user, prototype)?;

    if let Some(levels) = level_cost {
        let cost = ActionHealthCost::for_levels(levels, &*host, user);
        if cost != ActionHealthCost::default() {
            host.set_health_cost(action, cost);
        }
    }

    granted.push(action);
    Some(action)
}

impl AbilityTriggerStrategy {
    pub fn user(&self) -> Entity {
        self.user
    }

    pub fn variant(&self) -> &TriggerVariant {
        &self.variant
    }

    pub fn trigger(&self) -> AbilityTrigger {
        match self.variant {
            TriggerVariant::ActiveAscension(_) => AbilityTrigger::ActiveAscension,
            TriggerVariant::ActiveTargeted => AbilityTrigger::ActiveTargeted,
            TriggerVariant::ActiveStatus { .. } => AbilityTrigger::ActiveStatus,
            TriggerVariant::ActiveSelf => AbilityTrigger::ActiveSelf,
            TriggerVariant::PassiveWithPulse => AbilityTrigger::PassiveWithPulse,
            TriggerVariant::Passive => AbilityTrigger::Passive,
            TriggerVariant::Nullified => AbilityTrigger::Nullified,
        }
    }

    /// On/off state for toggleable strategies.
    pub fn is_enabled(&self) -> Option<bool> {
        match &self.variant {
            TriggerVariant::ActiveAscension(state) => Some(state.enabled),
            TriggerVariant::ActiveStatus { enabled } => Some(*enabled),
            _ => None,
        }
    }

    pub fn is_ascended(&self) -> bool {
        matches!(&self.variant, TriggerVariant::ActiveAscension(state) if state.enabled)
    }

    /// Grant the strategy's actions, appending them to `granted`.
    pub fn load<H: ActionHost + ?Sized>(&mut self, host: &mut H, granted: &mut Vec<Entity>) {
        let user = self.user;
        match &self.variant {
            TriggerVariant::ActiveAscension(_) => {
                load_ability_action(host, user, granted, None, ASCEND_ACTION_PROTOTYPE);
            }
            TriggerVariant::ActiveTargeted => {
                load_ability_action(
                    host,
                    user,
                    granted,
                    Some(ACTIVE_USE_LEVEL_COST),
                    ABILITY_TARGETED_PROTOTYPE,
                );
            }
            TriggerVariant::ActiveStatus { .. } => {
                load_ability_action(host, user, granted, None, ABILITY_STATUS_PROTOTYPE);
            }
            TriggerVariant::ActiveSelf => {
                load_ability_action(
                    host,
                    user,
                    granted,
                    Some(ACTIVE_USE_LEVEL_COST),
                    ABILITY_ACTION_PROTOTYPE,
                );
            }
            TriggerVariant::PassiveWithPulse => {
                load_ability_action(
                    host,
                    user,
                    granted,
                    Some(PULSE_LEVEL_COST),
                    ABILITY_PULSE_PROTOTYPE,
                );
            }
            TriggerVariant::Passive | TriggerVariant::Nullified => {}
        }
    }

    /// Revoke every granted action. Toggleable strategies switch off first.
    pub fn unload<H: ActionHost + ?Sized>(&mut self, host: &mut H, granted: &mut Vec<Entity>) {
        if self.trigger().is_toggleable() {
            self.deactivate(host, granted);
        }

        for action in granted.drain(..) {
            host.remove_action(action);
        }
    }

    /// Use the strategy's main action.
    pub fn activate(&mut self) -> ActivationPlan {
        match &mut self.variant {
            TriggerVariant::ActiveAscension(state) if state.enabled => ActivationPlan::OnTarget {
                strength: DEFAULT_STRENGTH,
            },
            TriggerVariant::ActiveAscension(_) => ActivationPlan::Nothing,
            TriggerVariant::ActiveTargeted => ActivationPlan::OnTarget {
                strength: DEFAULT_STRENGTH,
            },
            TriggerVariant::ActiveStatus { enabled } => {
                *enabled = !*enabled;
                ActivationPlan::Toggled { enabled: *enabled }
            }
            TriggerVariant::ActiveSelf => ActivationPlan::OnSelf {
                strength: DEFAULT_STRENGTH,
            },
            TriggerVariant::PassiveWithPulse => ActivationPlan::Pulse {
                radius: PULSE_RADIUS,
                strength: PULSE_STRENGTH,
            },
            TriggerVariant::Passive | TriggerVariant::Nullified => ActivationPlan::Nothing,
        }
    }

    /// Toggle ascension. `None` for every other strategy.
    pub fn activate_secondary<H: ActionHost + ?Sized>(
        &mut self,
        host: &mut H,
        granted: &mut Vec<Entity>,
    ) -> Option<AscensionTransition> {
        let user = self.user;
        let TriggerVariant::ActiveAscension(state) = &mut self.variant else {
            return None;
        };

        if state.enabled {
            self.deactivate(host, granted);
            return Some(AscensionTransition::Descended);
        }

        state.enabled = true;
        state.ability_action =
            load_ability_action(host, user, granted, None, ASCENDED_TARGETED_PROTOTYPE);
        Some(AscensionTransition::Ascended)
    }

    /// Switch a toggleable strategy off. Returns whether it was on.
    pub fn deactivate<H: ActionHost + ?Sized>(
        &mut self,
        host: &mut H,
        granted: &mut Vec<Entity>,
    ) -> bool {
        match &mut self.variant {
            TriggerVariant::ActiveAscension(state) => {
                let was_enabled = state.enabled;
                state.enabled = false;
                if let Some(action) = state.ability_action.take() {
                    granted.retain(|granted_action| *granted_action != action);
                    host.remove_action(action);
                }
                was_enabled
            }
            TriggerVariant::ActiveStatus { enabled } => std::mem::replace(enabled, false),
            _ => false,
        }
    }

    /// The bundle this strategy uses from `definition`, falling back to the
    /// `Default` entry. Nullified strategies never use one.
    ///
    /// Holders are spawned from the exact trigger entry only; this is the
    /// lookup for callers that want the strategy-level view of a prototype,
    /// such as the headless report.
    pub fn effect_bundle<'a>(&self, definition: &'a AbilityDefinition) -> Option<&'a EffectBundle> {
        if matches!(self.variant, TriggerVariant::Nullified) {
            return None;
        }

        definition
            .effects_for(self.trigger())
            .or_else(|| definition.effects_for(AbilityTrigger::Default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::host::testing::RecordingHost;
    use crate::tcp::effects::AbilityEffect;

    fn user() -> Entity {
        Entity::from_raw(1)
    }

    #[test]
    fn test_factory_maps_every_trigger() {
        for trigger in AbilityTrigger::ALL {
            let strategy = create_strategy(trigger, user());
            let expected = match trigger {
                AbilityTrigger::Default => AbilityTrigger::Nullified,
                other => other,
            };
            assert_eq!(strategy.trigger(), expected);
            assert_eq!(strategy.user(), user());
        }
    }

    #[test]
    fn test_load_unload_round_trip_leaves_nothing() {
        for trigger in AbilityTrigger::ALL {
            let mut host = RecordingHost::new();
            let mut granted = Vec::new();
            let mut strategy = create_strategy(trigger, user());

            strategy.load(&mut host, &mut granted);
            strategy.unload(&mut host, &mut granted);

            assert!(granted.is_empty(), "{:?} kept actions", trigger);
            assert!(host.actions.is_empty(), "{:?} leaked actions", trigger);
        }
    }

    #[test]
    fn test_costs_per_trigger() {
        let cases = [
            (AbilityTrigger::ActiveTargeted, ABILITY_TARGETED_PROTOTYPE, Some(8.0)),
            (AbilityTrigger::ActiveSelf, ABILITY_ACTION_PROTOTYPE, Some(8.0)),
            (AbilityTrigger::PassiveWithPulse, ABILITY_PULSE_PROTOTYPE, Some(16.0)),
            (AbilityTrigger::ActiveStatus, ABILITY_STATUS_PROTOTYPE, None),
            (AbilityTrigger::ActiveAscension, ASCEND_ACTION_PROTOTYPE, None),
        ];

        for (trigger, prototype, damage) in cases {
            let mut host = RecordingHost::new();
            let mut granted = Vec::new();
            create_strategy(trigger, user()).load(&mut host, &mut granted);

            assert_eq!(granted.len(), 1);
            assert_eq!(host.prototype_of(granted[0]), Some(prototype));
            let paid = host
                .costs
                .get(&granted[0])
                .and_then(|cost| cost.damage.as_ref())
                .map(|damage| damage.amount);
            assert_eq!(paid, damage, "{:?}", trigger);
        }
    }

    #[test]
    fn test_passive_and_nullified_grant_nothing() {
        for trigger in [AbilityTrigger::Passive, AbilityTrigger::Nullified] {
            let mut host = RecordingHost::new();
            let mut granted = Vec::new();
            let mut strategy = create_strategy(trigger, user());
            strategy.load(&mut host, &mut granted);

            assert!(granted.is_empty());
            assert_eq!(strategy.activate(), ActivationPlan::Nothing);
        }
    }

    #[test]
    fn test_ascension_double_toggle() {
        let mut host = RecordingHost::new();
        let mut granted = Vec::new();
        let mut strategy = create_strategy(AbilityTrigger::ActiveAscension, user());
        strategy.load(&mut host, &mut granted);

        assert_eq!(strategy.activate(), ActivationPlan::Nothing);

        let first = strategy.activate_secondary(&mut host, &mut granted);
        assert_eq!(first, Some(AscensionTransition::Ascended));
        assert_eq!(strategy.is_enabled(), Some(true));
        assert_eq!(host.count_of(ASCENDED_TARGETED_PROTOTYPE), 1);
        assert_eq!(granted.len(), 2);
        assert!(matches!(strategy.activate(), ActivationPlan::OnTarget { .. }));

        let second = strategy.activate_secondary(&mut host, &mut granted);
        assert_eq!(second, Some(AscensionTransition::Descended));
        assert_eq!(strategy.is_enabled(), Some(false));
        assert_eq!(host.count_of(ASCENDED_TARGETED_PROTOTYPE), 0);
        assert_eq!(host.count_of(ASCEND_ACTION_PROTOTYPE), 1);
        assert_eq!(granted.len(), 1);
    }

    #[test]
    fn test_unload_while_ascended_revokes_everything() {
        let mut host = RecordingHost::new();
        let mut granted = Vec::new();
        let mut strategy = create_strategy(AbilityTrigger::ActiveAscension, user());
        strategy.load(&mut host, &mut granted);
        strategy.activate_secondary(&mut host, &mut granted);

        strategy.unload(&mut host, &mut granted);
        assert!(host.actions.is_empty());
        assert_eq!(host.removed.len(), 2);
        assert_eq!(strategy.is_enabled(), Some(false));
    }

    #[test]
    fn test_secondary_is_ascension_only() {
        let mut host = RecordingHost::new();
        let mut granted = Vec::new();
        let mut strategy = create_strategy(AbilityTrigger::ActiveSelf, user());
        strategy.load(&mut host, &mut granted);

        assert_eq!(strategy.activate_secondary(&mut host, &mut granted), None);
        assert_eq!(granted.len(), 1);
    }

    #[test]
    fn test_status_toggle_flips() {
        let mut strategy = create_strategy(AbilityTrigger::ActiveStatus, user());
        assert_eq!(strategy.activate(), ActivationPlan::Toggled { enabled: true });
        assert_eq!(strategy.activate(), ActivationPlan::Toggled { enabled: false });
        assert_eq!(strategy.activate(), ActivationPlan::Toggled { enabled: true });

        let mut host = RecordingHost::new();
        assert!(strategy.deactivate(&mut host, &mut Vec::new()));
        assert_eq!(strategy.is_enabled(), Some(false));
    }

    #[test]
    fn test_pulse_plan_uses_radius_and_half_strength() {
        let mut strategy = create_strategy(AbilityTrigger::PassiveWithPulse, user());
        assert_eq!(
            strategy.activate(),
            ActivationPlan::Pulse {
                radius: 1.5,
                strength: 0.5
            }
        );
    }

    #[test]
    fn test_missing_cost_damage_type_grants_free_action() {
        let mut host = RecordingHost::new();
        host.damage_types.clear();
        let mut granted = Vec::new();
        create_strategy(AbilityTrigger::ActiveSelf, user()).load(&mut host, &mut granted);

        assert_eq!(granted.len(), 1);
        assert!(host.costs.is_empty());
    }

    #[test]
    fn test_effect_bundle_falls_back_to_default() {
        let burst = vec![AbilityEffect::ExposureBurst { amount: 2.0 }];
        let status = vec![AbilityEffect::ApplyStatus {
            statuses: vec!["Glowing".to_string()],
        }];
        let definition = AbilityDefinition::default()
            .with_effects(AbilityTrigger::Default, burst.clone())
            .with_effects(AbilityTrigger::ActiveSelf, status.clone());

        let own = create_strategy(AbilityTrigger::ActiveSelf, user());
        assert_eq!(own.effect_bundle(&definition), Some(&status));

        let fallback = create_strategy(AbilityTrigger::Passive, user());
        assert_eq!(fallback.effect_bundle(&definition), Some(&burst));

        let nullified = create_strategy(AbilityTrigger::Nullified, user());
        assert_eq!(nullified.effect_bundle(&definition), None);
    }
}
