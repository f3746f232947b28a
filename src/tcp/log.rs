//! Ability logging
//!
//! Records every ability, action and exposure event for inspection and for
//! the headless report.

use bevy::prelude::*;
use serde::Serialize;
use std::path::Path;

use crate::actions::{ActionPerformed, ActionRejected};
use crate::delayed::DelayedInteractionCancelled;
use crate::exposure::{ExposureBuildup, ExposureDecay};
use crate::tcp::events::*;

/// A single entry in the ability log
#[derive(Debug, Clone, Serialize)]
pub struct AbilityLogEntry {
    /// Timestamp in simulation time (seconds since start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: AbilityLogEventType,
    /// Entity that caused the event
    #[serde(serialize_with = "serialize_entity")]
    pub user: Entity,
    /// Entity affected by the event, if any
    #[serde(serialize_with = "serialize_optional_entity")]
    pub target: Option<Entity>,
    /// Strength or exposure value carried by the event
    pub value: Option<f32>,
    /// Human-readable description of the event
    pub message: String,
}

fn serialize_entity<S: serde::Serializer>(entity: &Entity, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(entity.to_bits())
}

fn serialize_optional_entity<S: serde::Serializer>(
    entity: &Option<Entity>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match entity {
        Some(entity) => serializer.serialize_some(&entity.to_bits()),
        None => serializer.serialize_none(),
    }
}

/// Types of ability log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbilityLogEventType {
    /// Holders spawned for a profile
    EffectsLoaded,
    /// An action invocation was handled
    ActionPerformed,
    /// An action invocation was refused
    ActionRejected,
    /// A holder received an activation
    Activated,
    /// A holder received a deactivation
    Deactivated,
    Ascended,
    Descended,
    ExposureBuildup,
    ExposureDecay,
    /// A delayed use was cancelled
    InteractionCancelled,
}

/// The ability log resource storing all events
#[derive(Resource, Default, Debug)]
pub struct AbilityLog {
    /// All log entries in chronological order
    pub entries: Vec<AbilityLogEntry>,
    /// Current simulation time
    pub match_time: f32,
}

impl AbilityLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(
        &mut self,
        event_type: AbilityLogEventType,
        user: Entity,
        target: Option<Entity>,
        value: Option<f32>,
        message: String,
    ) {
        self.entries.push(AbilityLogEntry {
            timestamp: self.match_time,
            event_type,
            user,
            target,
            value,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: AbilityLogEventType) -> Vec<&AbilityLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Count entries of one type caused by `user`
    pub fn count_for(&self, event_type: AbilityLogEventType, user: Entity) -> usize {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type && e.user == user)
            .count()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&AbilityLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Write every entry to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| format!("Failed to serialize ability log: {}", e))?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}

/// Append this frame's events to the ability log.
#[allow(clippy::too_many_arguments)]
pub fn record_ability_log(
    time: Res<Time>,
    mut log: ResMut<AbilityLog>,
    mut loaded: EventReader<AbilityEffectsLoaded>,
    mut performed: EventReader<ActionPerformed>,
    mut rejected: EventReader<ActionRejected>,
    mut activated: EventReader<TcpAbilityActivated>,
    mut deactivated: EventReader<TcpAbilityDeactivated>,
    mut ascended: EventReader<TcpAscended>,
    mut descended: EventReader<TcpDescended>,
    mut buildup: EventReader<ExposureBuildup>,
    mut decay: EventReader<ExposureDecay>,
    mut cancelled: EventReader<DelayedInteractionCancelled>,
) {
    log.match_time += time.delta_secs();

    for event in loaded.read() {
        log.log(
            AbilityLogEventType::EffectsLoaded,
            event.entity,
            None,
            None,
            format!("{} ability holders loaded", event.holders),
        );
    }

    for event in performed.read() {
        log.log(
            AbilityLogEventType::ActionPerformed,
            event.performer,
            None,
            None,
            format!("used {:?}", event.kind),
        );
    }

    for event in rejected.read() {
        log.log(
            AbilityLogEventType::ActionRejected,
            event.performer,
            None,
            None,
            event.reason.describe().to_string(),
        );
    }

    for event in activated.read() {
        log.log(
            AbilityLogEventType::Activated,
            event.user,
            Some(event.target),
            Some(event.strength),
            format!("holder {:?} activated", event.holder),
        );
    }

    for event in deactivated.read() {
        log.log(
            AbilityLogEventType::Deactivated,
            event.user,
            Some(event.target),
            None,
            format!("holder {:?} deactivated", event.holder),
        );
    }

    for event in ascended.read() {
        log.log(
            AbilityLogEventType::Ascended,
            event.user,
            None,
            None,
            "ascended".to_string(),
        );
    }

    for event in descended.read() {
        log.log(
            AbilityLogEventType::Descended,
            event.user,
            None,
            None,
            "descended".to_string(),
        );
    }

    for event in buildup.read() {
        log.log(
            AbilityLogEventType::ExposureBuildup,
            event.source,
            Some(event.target),
            Some(event.exposure),
            format!("exposure rose to {:.1}", event.exposure),
        );
    }

    for event in decay.read() {
        log.log(
            AbilityLogEventType::ExposureDecay,
            event.source,
            Some(event.target),
            Some(event.exposure),
            format!("exposure fell to {:.1}", event.exposure),
        );
    }

    for event in cancelled.read() {
        log.log(
            AbilityLogEventType::InteractionCancelled,
            event.user,
            Some(event.target),
            None,
            format!("interaction cancelled: {:?}", event.reason),
        );
    }
}
