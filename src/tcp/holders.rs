//! Ability Holders
//!
//! Every ability of a TCP is carried by a short-lived holder entity with the
//! effect components its prototype lists for the TCP's trigger kind. Holders
//! are owned by the profile: they are regenerated whenever effects are
//! (re)loaded and destroyed when the profile unloads.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::prototypes::TcpPrototypes;
use crate::tcp::effects::{insert_bundle, EffectBundle};
use crate::tcp::trigger::AbilityTrigger;

/// Marks a holder entity and links it back to its owner.
#[derive(Component, Clone, Debug)]
pub struct AbilityHolder {
    pub owner: Entity,
    /// Prototype id of the ability this holder carries
    pub ability_id: String,
}

/// Spawns and destroys holder entities.
pub trait HolderHost {
    fn spawn_holder(&mut self, owner: Entity, ability_id: &str, bundle: &EffectBundle) -> Entity;

    fn despawn_holder(&mut self, holder: Entity);
}

impl HolderHost for Commands<'_, '_> {
    fn spawn_holder(&mut self, owner: Entity, ability_id: &str, bundle: &EffectBundle) -> Entity {
        let mut holder = self.spawn((
            AbilityHolder {
                owner,
                ability_id: ability_id.to_string(),
            },
            Name::new(format!("{} holder", ability_id)),
        ));
        insert_bundle(&mut holder, bundle);
        holder.id()
    }

    fn despawn_holder(&mut self, holder: Entity) {
        if let Some(mut entity) = self.get_entity(holder) {
            entity.despawn();
        }
    }
}

/// The holder entities owned by one profile.
#[derive(Clone, Debug, Default)]
pub struct AbilityHolders {
    holders: Vec<Entity>,
}

impl AbilityHolders {
    /// Spawn one holder per ability whose prototype has a bundle for exactly
    /// `trigger`. Existing holders are destroyed first. Returns the holder count.
    pub fn load_effects<H: HolderHost + ?Sized>(
        &mut self,
        host: &mut H,
        owner: Entity,
        trigger: AbilityTrigger,
        ability_ids: &[String],
        prototypes: &TcpPrototypes,
    ) -> usize {
        if !self.holders.is_empty() {
            self.unload_effects(host);
        }

        for ability_id in ability_ids {
            let Some(definition) = prototypes.ability(ability_id) else {
                warn!("Unknown ability prototype '{}' on {:?}", ability_id, owner);
                continue;
            };
            let Some(bundle) = definition.effects_for(trigger) else {
                debug!(
                    "Ability '{}' has no {} effects, no holder for {:?}",
                    ability_id,
                    trigger.name(),
                    owner
                );
                continue;
            };

            let holder = host.spawn_holder(owner, ability_id, bundle);
            self.holders.push(holder);
        }

        self.holders.len()
    }

    /// Destroy every holder.
    pub fn unload_effects<H: HolderHost + ?Sized>(&mut self, host: &mut H) {
        for holder in self.holders.drain(..) {
            host.despawn_holder(holder);
        }
    }

    /// One item per holder, built by `make`. Each holder is visited once.
    pub fn dispatch<'a, E: 'a>(
        &'a self,
        make: impl Fn(Entity) -> E + 'a,
    ) -> impl Iterator<Item = E> + 'a {
        let mut seen = HashSet::new();
        self.holders
            .iter()
            .copied()
            .filter(move |holder| seen.insert(*holder))
            .map(make)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.holders.iter().copied()
    }

    pub fn contains(&self, holder: Entity) -> bool {
        self.holders.contains(&holder)
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }
}
