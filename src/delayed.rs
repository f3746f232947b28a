//! Delayed Interactions
//!
//! A delayed interaction is a pending entity that waits `duration` seconds
//! and then reports [`DelayedInteractionCompleted`] with the payload it was
//! scheduled with. It is cancelled when the user or target loses its
//! position, when the pair moves further apart than `max_range`, or on
//! request. Cancelling runs nothing; the payload is simply dropped.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

/// Carried through the wait and handed back on completion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelayedPayload {
    /// Action that started the interaction
    pub action: Option<Entity>,
    pub strength: f32,
}

/// A pending interaction between `user` and `target`.
#[derive(Component, Clone, Debug)]
pub struct DelayedInteraction {
    pub user: Entity,
    pub target: Entity,
    /// Seconds to wait
    pub duration: f32,
    /// Seconds waited so far
    pub elapsed: f32,
    /// Cancel when user and target end up further apart than this
    pub max_range: Option<f32>,
    pub payload: DelayedPayload,
}

impl DelayedInteraction {
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }
}

/// Why a delayed interaction did not complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// User or target no longer has a position
    Lost,
    OutOfRange,
    Requested,
}

/// Request to cancel pending interactions of `user` (against `target`, or all when `None`).
#[derive(Event, Clone, Debug)]
pub struct CancelDelayedInteraction {
    pub user: Entity,
    pub target: Option<Entity>,
}

#[derive(Event, Clone, Debug)]
pub struct DelayedInteractionCompleted {
    pub user: Entity,
    pub target: Entity,
    pub payload: DelayedPayload,
}

#[derive(Event, Clone, Debug)]
pub struct DelayedInteractionCancelled {
    pub user: Entity,
    pub target: Entity,
    pub reason: CancelReason,
}

/// Schedules delayed interactions from systems.
#[derive(SystemParam)]
pub struct DelayedInteractions<'w, 's> {
    commands: Commands<'w, 's>,
    pending: Query<'w, 's, &'static DelayedInteraction>,
}

impl DelayedInteractions<'_, '_> {
    pub fn is_pending(&self, user: Entity, target: Entity) -> bool {
        self.pending
            .iter()
            .any(|interaction| interaction.user == user && interaction.target == target)
    }

    /// Start waiting. Returns `None` when the pair already has one pending.
    pub fn schedule(
        &mut self,
        user: Entity,
        target: Entity,
        duration: f32,
        max_range: Option<f32>,
        payload: DelayedPayload,
    ) -> Option<Entity> {
        if self.is_pending(user, target) {
            return None;
        }

        let interaction = self
            .commands
            .spawn((
                DelayedInteraction {
                    user,
                    target,
                    duration,
                    elapsed: 0.0,
                    max_range,
                    payload,
                },
                Name::new("Delayed interaction"),
            ))
            .id();

        debug!(
            "{:?} started a {:.1}s interaction with {:?}",
            user, duration, target
        );
        Some(interaction)
    }
}

fn send_cancelled(
    commands: &mut Commands,
    events: &mut EventWriter<DelayedInteractionCancelled>,
    entity: Entity,
    interaction: &DelayedInteraction,
    reason: CancelReason,
) {
    debug!(
        "Interaction {:?} -> {:?} cancelled: {:?}",
        interaction.user, interaction.target, reason
    );
    events.send(DelayedInteractionCancelled {
        user: interaction.user,
        target: interaction.target,
        reason,
    });
    commands.entity(entity).despawn();
}

/// Advance every pending interaction, completing it or cancelling it when
/// the pair lost its positions or moved apart.
pub fn tick_delayed_interactions(
    mut commands: Commands,
    time: Res<Time>,
    mut interactions: Query<(Entity, &mut DelayedInteraction)>,
    positions: Query<&Transform>,
    mut completed_events: EventWriter<DelayedInteractionCompleted>,
    mut cancelled_events: EventWriter<DelayedInteractionCancelled>,
) {
    let dt = time.delta_secs();

    for (entity, mut interaction) in interactions.iter_mut() {
        let cancel_reason =
            match (positions.get(interaction.user), positions.get(interaction.target)) {
                (Ok(user), Ok(target)) => interaction
                    .max_range
                    .filter(|range| user.translation.distance(target.translation) > *range)
                    .map(|_| CancelReason::OutOfRange),
                _ => Some(CancelReason::Lost),
            };

        if let Some(reason) = cancel_reason {
            send_cancelled(&mut commands, &mut cancelled_events, entity, &interaction, reason);
            continue;
        }

        interaction.elapsed += dt;
        if interaction.elapsed >= interaction.duration {
            completed_events.send(DelayedInteractionCompleted {
                user: interaction.user,
                target: interaction.target,
                payload: interaction.payload,
            });
            commands.entity(entity).despawn();
        }
    }
}

/// Drop pending interactions matching a cancel request.
///
/// Runs after this frame's interactions were scheduled and flushed, so a
/// cancel sent alongside the use that starts an interaction still applies.
pub fn cancel_delayed_interactions(
    mut commands: Commands,
    mut cancel_requests: EventReader<CancelDelayedInteraction>,
    interactions: Query<(Entity, &DelayedInteraction)>,
    mut cancelled_events: EventWriter<DelayedInteractionCancelled>,
) {
    if cancel_requests.is_empty() {
        return;
    }
    let requests: Vec<CancelDelayedInteraction> = cancel_requests.read().cloned().collect();

    for (entity, interaction) in interactions.iter() {
        let requested = requests.iter().any(|request| {
            request.user == interaction.user
                && request.target.map_or(true, |target| target == interaction.target)
        });
        if requested {
            send_cancelled(
                &mut commands,
                &mut cancelled_events,
                entity,
                interaction,
                CancelReason::Requested,
            );
        }
    }
}
