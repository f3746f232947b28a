//! TCP ability profile component.

use bevy::prelude::*;

use crate::actions::ActionHost;
use crate::prototypes::TcpPrototypes;
use crate::tcp::holders::{AbilityHolders, HolderHost};
use crate::tcp::strategy::{
    create_strategy, AbilityTriggerStrategy, ActivationPlan, AscensionTransition,
};
use crate::tcp::trigger::AbilityTrigger;

/// Abilities of a TCP creature.
///
/// Adding this component loads the trigger strategy and spawns the holders;
/// removing it (or despawning the entity) unloads both.
#[derive(Component, Debug)]
pub struct AbilityProfile {
    pub trigger: AbilityTrigger,
    /// Ability prototype ids, in load order
    pub abilities: Vec<String>,
    strategy: Option<AbilityTriggerStrategy>,
    actions: Vec<Entity>,
    holders: AbilityHolders,
    tracked: Vec<Entity>,
}

impl AbilityProfile {
    pub fn new(trigger: AbilityTrigger, abilities: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            trigger,
            abilities: abilities.into_iter().map(Into::into).collect(),
            strategy: None,
            actions: Vec::new(),
            holders: AbilityHolders::default(),
            tracked: Vec::new(),
        }
    }

    pub fn strategy(&self) -> Option<&AbilityTriggerStrategy> {
        self.strategy.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.strategy.is_some()
    }

    /// Actions granted by the loaded strategy.
    pub fn actions(&self) -> &[Entity] {
        &self.actions
    }

    pub fn holders(&self) -> &AbilityHolders {
        &self.holders
    }

    /// Entities the ability has been activated against since the last descend.
    pub fn tracked(&self) -> &[Entity] {
        &self.tracked
    }

    /// Load the strategy for this profile's trigger, unloading any previous one.
    pub fn load_strategy<H: ActionHost + ?Sized>(&mut self, host: &mut H, user: Entity) {
        self.unload_strategy(host);

        let mut strategy = create_strategy(self.trigger, user);
        strategy.load(host, &mut self.actions);
        self.strategy = Some(strategy);
    }

    pub fn unload_strategy<H: ActionHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(mut strategy) = self.strategy.take() {
            strategy.unload(host, &mut self.actions);
        }
    }

    /// Regenerate the holders. Returns how many were spawned.
    pub fn load_effects<H: HolderHost + ?Sized>(
        &mut self,
        host: &mut H,
        owner: Entity,
        prototypes: &TcpPrototypes,
    ) -> usize {
        self.holders
            .load_effects(host, owner, self.trigger, &self.abilities, prototypes)
    }

    pub fn unload_effects<H: HolderHost + ?Sized>(&mut self, host: &mut H) {
        self.holders.unload_effects(host);
    }

    /// Use the loaded strategy's main action.
    pub fn activate(&mut self) -> ActivationPlan {
        match self.strategy.as_mut() {
            Some(strategy) => strategy.activate(),
            None => ActivationPlan::Nothing,
        }
    }

    pub fn activate_secondary<H: ActionHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Option<AscensionTransition> {
        self.strategy
            .as_mut()?
            .activate_secondary(host, &mut self.actions)
    }

    /// Whether activations are remembered for a later descend.
    pub fn tracks_targets(&self) -> bool {
        self.strategy
            .as_ref()
            .is_some_and(AbilityTriggerStrategy::is_ascended)
    }

    /// Remember an entity the ability was activated against. Only while
    /// ascended; nothing else ever deactivates tracked targets.
    pub fn track(&mut self, target: Entity) {
        if self.tracks_targets() && !self.tracked.contains(&target) {
            self.tracked.push(target);
        }
    }

    /// Drop tracked entities for which `keep` returns false.
    pub fn prune_tracked(&mut self, keep: impl FnMut(&Entity) -> bool) {
        self.tracked.retain(keep);
    }

    /// Take every tracked entity, leaving none.
    pub fn take_tracked(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.tracked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::host::testing::RecordingHost;
    use crate::constants::*;

    #[test]
    fn test_double_load_never_double_grants() {
        let mut host = RecordingHost::new();
        let user = Entity::from_raw(1);
        let mut profile = AbilityProfile::new(AbilityTrigger::ActiveSelf, ["TCPRadiance"]);

        profile.load_strategy(&mut host, user);
        profile.load_strategy(&mut host, user);

        assert_eq!(profile.actions().len(), 1);
        assert_eq!(host.count_of(ABILITY_ACTION_PROTOTYPE), 1);
    }

    #[test]
    fn test_unload_strategy_revokes_actions() {
        let mut host = RecordingHost::new();
        let mut profile = AbilityProfile::new(AbilityTrigger::PassiveWithPulse, Vec::<String>::new());

        profile.load_strategy(&mut host, Entity::from_raw(1));
        assert!(profile.is_loaded());

        profile.unload_strategy(&mut host);
        assert!(!profile.is_loaded());
        assert!(profile.actions().is_empty());
        assert!(host.actions.is_empty());
    }

    #[test]
    fn test_tracked_is_an_ordered_set() {
        let mut host = RecordingHost::new();
        let mut profile = AbilityProfile::new(AbilityTrigger::ActiveAscension, ["TCPGlare"]);
        let a = Entity::from_raw(2);
        let b = Entity::from_raw(3);
        profile.load_strategy(&mut host, Entity::from_raw(1));
        profile.activate_secondary(&mut host);

        profile.track(a);
        profile.track(b);
        profile.track(a);

        assert_eq!(profile.take_tracked(), vec![a, b]);
        assert!(profile.tracked().is_empty());
    }

    #[test]
    fn test_only_ascended_profiles_track() {
        let mut host = RecordingHost::new();
        let target = Entity::from_raw(2);

        let mut self_use = AbilityProfile::new(AbilityTrigger::ActiveSelf, ["TCPRadiance"]);
        self_use.load_strategy(&mut host, Entity::from_raw(1));
        self_use.track(target);
        assert!(self_use.tracked().is_empty());

        let mut ascension = AbilityProfile::new(AbilityTrigger::ActiveAscension, ["TCPGlare"]);
        ascension.load_strategy(&mut host, Entity::from_raw(1));
        ascension.track(target);
        assert!(ascension.tracked().is_empty());

        ascension.activate_secondary(&mut host);
        ascension.track(target);
        assert_eq!(ascension.tracked(), &[target]);

        ascension.prune_tracked(|entity| *entity != target);
        assert!(ascension.tracked().is_empty());
    }

    #[test]
    fn test_unloaded_profile_does_nothing() {
        let mut host = RecordingHost::new();
        let mut profile = AbilityProfile::new(AbilityTrigger::ActiveAscension, ["TCPGlare"]);

        assert_eq!(profile.activate(), ActivationPlan::Nothing);
        assert_eq!(profile.activate_secondary(&mut host), None);
    }
}
