//! TCP Ability Dispatch
//!
//! Drives the ability lifecycle and routes action invocations:
//! - `initialize_abilities`: load strategy and holders of every unloaded profile
//! - `shutdown_abilities`: observer that unloads both when a profile is
//!   replaced, removed or despawned
//! - `handle_ability_actions`: gate, route and answer every `PerformAction`
//! - `complete_delayed_uses`: resume targeted uses after their delay
//! - `deactivate_tracked_on_descend`: undo ascended activations
//! - `broadcast_ability_events`: forward activation requests to every holder

use bevy::ecs::entity::Entities;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::actions::{
    Action, ActionGrants, ActionHealthCost, ActionKind, ActionPerformed, ActionRejected,
    PerformAction, RejectReason,
};
use crate::delayed::{DelayedInteractionCompleted, DelayedInteractions, DelayedPayload};
use crate::health::Damageable;
use crate::prototypes::TcpPrototypes;
use crate::tcp::components::AbilityProfile;
use crate::tcp::effects::{CreateEntityAbility, PickedUpBy};
use crate::tcp::events::*;
use crate::tcp::strategy::{ActivationPlan, AscensionTransition};

/// Every event an action invocation can produce.
#[derive(SystemParam)]
pub struct AbilityEventWriters<'w> {
    performed: EventWriter<'w, ActionPerformed>,
    rejected: EventWriter<'w, ActionRejected>,
    activate: EventWriter<'w, ActivateAbility>,
    deactivate: EventWriter<'w, DeactivateAbility>,
    ascended: EventWriter<'w, TcpAscended>,
    descended: EventWriter<'w, TcpDescended>,
}

impl AbilityEventWriters<'_> {
    fn reject(&mut self, request: &PerformAction, reason: RejectReason) {
        debug!(
            "{:?} could not use {:?}: {}",
            request.performer,
            request.action,
            reason.describe()
        );
        self.rejected.send(ActionRejected {
            performer: request.performer,
            action: request.action,
            reason,
        });
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Load the strategy and holders of newly inserted profiles.
///
/// A profile inserted over an existing one counts as new: the observer has
/// already unloaded the old one.
pub fn initialize_abilities(
    mut commands: Commands,
    mut grants: ActionGrants,
    prototypes: Res<TcpPrototypes>,
    mut profiles: Query<(Entity, &mut AbilityProfile), Changed<AbilityProfile>>,
    mut loaded_events: EventWriter<AbilityEffectsLoaded>,
) {
    for (entity, mut profile) in profiles.iter_mut() {
        if profile.is_loaded() {
            continue;
        }

        profile.load_strategy(&mut grants, entity);
        let holders = profile.load_effects(&mut commands, entity, &prototypes);

        info!(
            "{:?} loaded {} ability: {} actions, {} holders",
            entity,
            profile.trigger.name(),
            profile.actions().len(),
            holders
        );
        loaded_events.send(AbilityEffectsLoaded { entity, holders });
    }
}

/// Regenerate holders on request.
pub fn process_reload_requests(
    mut commands: Commands,
    prototypes: Res<TcpPrototypes>,
    mut requests: EventReader<ReloadAbilities>,
    mut profiles: Query<&mut AbilityProfile>,
    mut loaded_events: EventWriter<AbilityEffectsLoaded>,
) {
    for request in requests.read() {
        let Ok(mut profile) = profiles.get_mut(request.entity) else {
            debug!("Reload requested for {:?} without abilities", request.entity);
            continue;
        };

        let holders = profile.load_effects(&mut commands, request.entity, &prototypes);
        info!("{:?} reloaded abilities: {} holders", request.entity, holders);
        loaded_events.send(AbilityEffectsLoaded {
            entity: request.entity,
            holders,
        });
    }
}

/// Unload everything a profile owns when it is replaced, removed or its
/// entity despawns. Runs while the outgoing profile is still in place.
pub fn shutdown_abilities(
    trigger: Trigger<OnReplace, AbilityProfile>,
    mut commands: Commands,
    mut grants: ActionGrants,
    mut profiles: Query<&mut AbilityProfile>,
) {
    let entity = trigger.entity();
    let Ok(mut profile) = profiles.get_mut(entity) else {
        return;
    };

    profile.unload_strategy(&mut grants);
    profile.unload_effects(&mut commands);
    info!("{:?} unloaded {} ability", entity, profile.trigger.name());
}

// ============================================================================
// Actions
// ============================================================================

/// Route every action invocation, answering with `ActionPerformed` or `ActionRejected`.
///
/// A handled invocation pays its health cost. Rejected ones change nothing.
#[allow(clippy::too_many_arguments)]
pub fn handle_ability_actions(
    mut requests: EventReader<PerformAction>,
    mut grants: ActionGrants,
    mut delayed: DelayedInteractions,
    actions: Query<(&Action, Option<&ActionHealthCost>)>,
    mut profiles: Query<&mut AbilityProfile>,
    mut damageables: Query<&mut Damageable>,
    positions: Query<(Entity, &Transform)>,
    held: Query<(), With<PickedUpBy>>,
    mut outcomes: AbilityEventWriters,
) {
    // Pairs scheduled this run are not visible to the pending query yet
    let mut scheduled: Vec<(Entity, Entity)> = Vec::new();

    for request in requests.read() {
        let Ok((action, cost)) = actions.get(request.action) else {
            outcomes.reject(request, RejectReason::NotOwned);
            continue;
        };
        if action.owner != request.performer {
            outcomes.reject(request, RejectReason::NotOwned);
            continue;
        }
        let Ok(mut profile) = profiles.get_mut(request.performer) else {
            outcomes.reject(request, RejectReason::NoAbility);
            continue;
        };
        if !profile.is_loaded() {
            outcomes.reject(request, RejectReason::NoAbility);
            continue;
        }
        if let Some(cost) = cost {
            if !cost.allows(damageables.get(request.performer).ok()) {
                outcomes.reject(request, RejectReason::TooInjured);
                continue;
            }
        }

        let result = match action.kind {
            ActionKind::ToggleAscension => {
                toggle_ascension(&mut profile, &mut grants, request.performer, &mut outcomes)
            }
            _ => use_ability(
                profile.activate(),
                request,
                action,
                &positions,
                &held,
                &mut delayed,
                &mut scheduled,
                &mut outcomes,
            ),
        };

        match result {
            Ok(()) => {
                if let (Some(cost), Ok(mut damageable)) =
                    (cost, damageables.get_mut(request.performer))
                {
                    cost.pay(&mut damageable);
                }
                outcomes.performed.send(ActionPerformed {
                    performer: request.performer,
                    action: request.action,
                    kind: action.kind,
                });
            }
            Err(reason) => outcomes.reject(request, reason),
        }
    }
}

fn toggle_ascension(
    profile: &mut AbilityProfile,
    grants: &mut ActionGrants,
    user: Entity,
    outcomes: &mut AbilityEventWriters,
) -> Result<(), RejectReason> {
    match profile.activate_secondary(grants) {
        Some(AscensionTransition::Ascended) => {
            info!("{:?} ascended", user);
            outcomes.ascended.send(TcpAscended { user });
            Ok(())
        }
        Some(AscensionTransition::Descended) => {
            info!("{:?} descended", user);
            outcomes.descended.send(TcpDescended { user });
            Ok(())
        }
        None => Err(RejectReason::NoAbility),
    }
}

fn use_ability(
    plan: ActivationPlan,
    request: &PerformAction,
    action: &Action,
    positions: &Query<(Entity, &Transform)>,
    held: &Query<(), With<PickedUpBy>>,
    delayed: &mut DelayedInteractions,
    scheduled: &mut Vec<(Entity, Entity)>,
    outcomes: &mut AbilityEventWriters,
) -> Result<(), RejectReason> {
    let user = request.performer;

    match plan {
        ActivationPlan::Nothing => Err(RejectReason::NoAbility),
        ActivationPlan::OnSelf { strength } => {
            outcomes.activate.send(ActivateAbility {
                user,
                target: user,
                strength,
            });
            Ok(())
        }
        ActivationPlan::Toggled { enabled } => {
            if enabled {
                outcomes.activate.send(ActivateAbility {
                    user,
                    target: user,
                    strength: crate::constants::DEFAULT_STRENGTH,
                });
            } else {
                outcomes.deactivate.send(DeactivateAbility { user, target: user });
            }
            debug!("{:?} toggled ability {}", user, if enabled { "on" } else { "off" });
            Ok(())
        }
        ActivationPlan::Pulse { radius, strength } => {
            let Ok((_, origin)) = positions.get(user) else {
                return Err(RejectReason::InvalidTarget);
            };

            let mut pulsed = 0;
            for (entity, transform) in positions.iter() {
                // Held items travel with their holder and are never pulsed
                if entity == user
                    || held.contains(entity)
                    || origin.translation.distance(transform.translation) > radius
                {
                    continue;
                }
                outcomes.activate.send(ActivateAbility {
                    user,
                    target: entity,
                    strength,
                });
                pulsed += 1;
            }
            debug!("{:?} pulsed {} entities", user, pulsed);
            Ok(())
        }
        ActivationPlan::OnTarget { strength } => {
            let target = request.target.ok_or(RejectReason::InvalidTarget)?;
            let (Ok((_, from)), Ok((_, to))) = (positions.get(user), positions.get(target)) else {
                return Err(RejectReason::InvalidTarget);
            };
            if let Some(range) = action.range {
                if from.translation.distance(to.translation) > range {
                    return Err(RejectReason::InvalidTarget);
                }
            }

            if action.use_delay <= 0.0 {
                outcomes.activate.send(ActivateAbility {
                    user,
                    target,
                    strength,
                });
                return Ok(());
            }

            if scheduled.contains(&(user, target)) {
                return Err(RejectReason::AlreadyPending);
            }
            let payload = DelayedPayload {
                action: Some(request.action),
                strength,
            };
            delayed
                .schedule(user, target, action.use_delay, action.range, payload)
                .ok_or(RejectReason::AlreadyPending)?;
            scheduled.push((user, target));
            Ok(())
        }
    }
}

/// Turn finished delayed uses into activations.
pub fn complete_delayed_uses(
    mut completed: EventReader<DelayedInteractionCompleted>,
    actions: Query<&Action>,
    profiles: Query<&AbilityProfile>,
    mut activate_events: EventWriter<ActivateAbility>,
) {
    for event in completed.read() {
        let Some(action) = event.payload.action else {
            continue;
        };
        // The action may have been revoked while waiting
        let Ok(action) = actions.get(action) else {
            continue;
        };
        if action.owner != event.user {
            continue;
        }
        let Ok(profile) = profiles.get(event.user) else {
            continue;
        };
        if !profile.is_loaded() {
            continue;
        }

        activate_events.send(ActivateAbility {
            user: event.user,
            target: event.target,
            strength: event.payload.strength,
        });
    }
}

/// Deactivate every tracked target of a user that descended.
pub fn deactivate_tracked_on_descend(
    mut descended: EventReader<TcpDescended>,
    mut profiles: Query<&mut AbilityProfile>,
    mut deactivate_events: EventWriter<DeactivateAbility>,
) {
    for event in descended.read() {
        let Ok(mut profile) = profiles.get_mut(event.user) else {
            continue;
        };

        for target in profile.take_tracked() {
            deactivate_events.send(DeactivateAbility {
                user: event.user,
                target,
            });
        }
    }
}

// ============================================================================
// Broadcast
// ============================================================================

/// Let the first create-entity holder replace the target with a freshly
/// spawned entity.
fn modify_target(
    commands: &mut Commands,
    profile: &AbilityProfile,
    creators: &Query<&CreateEntityAbility>,
    positions: &Query<&Transform>,
    user: Entity,
    target: Entity,
) -> Entity {
    let Some(creator) = profile
        .holders()
        .iter()
        .find_map(|holder| creators.get(holder).ok())
    else {
        return target;
    };

    let position = positions
        .get(target)
        .or_else(|_| positions.get(user))
        .map(|transform| transform.translation)
        .unwrap_or_default();

    creator.spawn_for(commands, user, target, position)
}

/// Forward activation and deactivation requests to every holder of the user.
#[allow(clippy::too_many_arguments)]
pub fn broadcast_ability_events(
    mut commands: Commands,
    mut activate_requests: EventReader<ActivateAbility>,
    mut deactivate_requests: EventReader<DeactivateAbility>,
    mut profiles: Query<&mut AbilityProfile>,
    creators: Query<&CreateEntityAbility>,
    positions: Query<&Transform>,
    entities: &Entities,
    mut activated_events: EventWriter<TcpAbilityActivated>,
    mut deactivated_events: EventWriter<TcpAbilityDeactivated>,
) {
    for request in activate_requests.read() {
        let Ok(mut profile) = profiles.get_mut(request.user) else {
            continue;
        };
        if !profile.is_loaded() {
            continue;
        }

        if profile.tracks_targets() {
            profile.prune_tracked(|tracked| entities.contains(*tracked));
            profile.track(request.target);
        }
        let strength = request.strength.clamp(0.0, 1.0);
        let target = modify_target(
            &mut commands,
            &profile,
            &creators,
            &positions,
            request.user,
            request.target,
        );

        let user = request.user;
        activated_events.send_batch(profile.holders().dispatch(move |holder| TcpAbilityActivated {
            holder,
            user,
            target,
            strength,
        }));
    }

    for request in deactivate_requests.read() {
        let Ok(profile) = profiles.get(request.user) else {
            continue;
        };

        let (user, target) = (request.user, request.target);
        deactivated_events.send_batch(
            profile
                .holders()
                .dispatch(move |holder| TcpAbilityDeactivated { holder, user, target }),
        );
    }
}
