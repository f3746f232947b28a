//! Proximity Exposure
//!
//! Emitters with [`ProximityExposure`] build up an exposure value on every
//! entity that stays near them, and let it decay once the entity leaves.
//!
//! The pass runs at most once per `accumulation_frequency` seconds per
//! emitter. Each pass:
//! 1. collects every positioned entity within `range` (never the emitter,
//!    never an item someone holds)
//! 2. raises exposure of those entities, clamped to `maximum`
//! 3. decays exposure of tracked entities that are out of range
//! 4. forgets entities whose exposure dropped to zero or below

use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::time::Duration;

use crate::constants::*;
use crate::tcp::effects::PickedUpBy;

/// Exposure emitter state and tunables.
#[derive(Component, Clone, Debug)]
pub struct ProximityExposure {
    /// Maximum distance to cause buildup
    pub range: f32,
    /// Maximum exposure value
    pub maximum: f32,
    /// Exposure an entity starts at on first contact
    pub minimum: f32,
    /// Exposure gained per pass while in range
    pub accumulation_rate: f32,
    /// Seconds between passes
    pub accumulation_frequency: f32,
    /// Exposure lost per pass while out of range
    pub decay_rate: f32,
    /// Elapsed time at which the next pass may run
    pub next_update: Duration,
    affected: HashMap<Entity, f32>,
}

impl Default for ProximityExposure {
    fn default() -> Self {
        Self {
            range: EXPOSURE_RANGE,
            maximum: MAXIMUM_EXPOSURE,
            minimum: MINIMUM_EXPOSURE,
            accumulation_rate: EXPOSURE_ACCUMULATION_RATE,
            accumulation_frequency: EXPOSURE_ACCUMULATION_FREQUENCY,
            decay_rate: EXPOSURE_DECAY_RATE,
            next_update: Duration::ZERO,
            affected: HashMap::new(),
        }
    }
}

/// New exposure value of one tracked entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExposureChange {
    pub target: Entity,
    pub exposure: f32,
}

impl ProximityExposure {
    /// Current exposure of `target`, if tracked.
    pub fn exposure_of(&self, target: Entity) -> Option<f32> {
        self.affected.get(&target).copied()
    }

    /// Every tracked entity and its exposure.
    pub fn affected(&self) -> impl Iterator<Item = (Entity, f32)> + '_ {
        self.affected.iter().map(|(entity, exposure)| (*entity, *exposure))
    }

    pub fn tracked_count(&self) -> usize {
        self.affected.len()
    }

    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.next_update
    }

    /// Gate the next pass to `accumulation_frequency` after `now`.
    pub fn schedule_next(&mut self, now: Duration) {
        self.next_update = now + Duration::from_secs_f32(self.accumulation_frequency.max(0.0));
    }

    /// Add `amount` of exposure to `target`, creating the entry if needed.
    /// Returns the clamped result.
    pub fn add_exposure(&mut self, target: Entity, amount: f32) -> f32 {
        let exposure = self.affected.entry(target).or_insert(self.minimum);
        *exposure = (*exposure + amount).min(self.maximum);
        *exposure
    }

    /// Accumulate exposure on every entity in range.
    pub fn give_in_range_exposure(&mut self, in_range: &[Entity]) -> Vec<ExposureChange> {
        let rate = self.accumulation_rate;
        in_range
            .iter()
            .map(|&target| ExposureChange {
                target,
                exposure: self.add_exposure(target, rate),
            })
            .collect()
    }

    /// Decay exposure on tracked entities outside of `in_range` and forget the
    /// ones that reach zero. Reported values never go below zero.
    pub fn decay_exposure(&mut self, in_range: &[Entity]) -> Vec<ExposureChange> {
        let mut changes = Vec::new();
        let mut expired: SmallVec<[Entity; 8]> = SmallVec::new();

        for (&target, exposure) in self.affected.iter_mut() {
            if in_range.contains(&target) {
                continue;
            }

            *exposure -= self.decay_rate;
            changes.push(ExposureChange {
                target,
                exposure: exposure.max(0.0),
            });

            if *exposure <= 0.0 {
                expired.push(target);
            }
        }

        for target in expired {
            self.affected.remove(&target);
        }

        changes
    }
}

/// Exposure of `target` grew because it stayed near `source`.
#[derive(Event, Clone, Debug)]
pub struct ExposureBuildup {
    pub source: Entity,
    pub target: Entity,
    pub exposure: f32,
}

/// Exposure of `target` decayed because it left `source`'s range.
#[derive(Event, Clone, Debug)]
pub struct ExposureDecay {
    pub source: Entity,
    pub target: Entity,
    pub exposure: f32,
}

/// Any change to the exposure of `target` from `source`.
#[derive(Event, Clone, Debug)]
pub struct ExposureUpdate {
    pub source: Entity,
    pub target: Entity,
    pub exposure: f32,
}

/// Run the exposure pass for every emitter that is due.
pub fn update_proximity_exposure(
    time: Res<Time>,
    mut emitters: Query<(Entity, &Transform, &mut ProximityExposure)>,
    positions: Query<(Entity, &Transform), Without<PickedUpBy>>,
    mut buildup_events: EventWriter<ExposureBuildup>,
    mut decay_events: EventWriter<ExposureDecay>,
    mut update_events: EventWriter<ExposureUpdate>,
) {
    let now = time.elapsed();

    for (source, source_transform, mut exposure) in emitters.iter_mut() {
        if !exposure.is_due(now) {
            continue;
        }

        let origin = source_transform.translation;
        let in_range: SmallVec<[Entity; 8]> = positions
            .iter()
            .filter(|(entity, transform)| {
                *entity != source && origin.distance(transform.translation) <= exposure.range
            })
            .map(|(entity, _)| entity)
            .collect();

        for change in exposure.give_in_range_exposure(&in_range) {
            buildup_events.send(ExposureBuildup {
                source,
                target: change.target,
                exposure: change.exposure,
            });
            update_events.send(ExposureUpdate {
                source,
                target: change.target,
                exposure: change.exposure,
            });
        }

        for change in exposure.decay_exposure(&in_range) {
            decay_events.send(ExposureDecay {
                source,
                target: change.target,
                exposure: change.exposure,
            });
            update_events.send(ExposureUpdate {
                source,
                target: change.target,
                exposure: change.exposure,
            });
        }

        exposure.schedule_next(now);
    }
}
