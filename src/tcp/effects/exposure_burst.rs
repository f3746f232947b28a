//! Exposure Burst effect
//!
//! When a holder with [`ExposureBurstAbility`] is activated and its user emits
//! exposure, the target's exposure jumps by `amount * strength` at once.

use bevy::prelude::*;

use crate::exposure::{ExposureBuildup, ExposureUpdate, ProximityExposure};
use crate::tcp::events::TcpAbilityActivated;

/// Holder component: instant exposure added to the target.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct ExposureBurstAbility {
    pub amount: f32,
}

pub fn apply_exposure_bursts(
    mut activated: EventReader<TcpAbilityActivated>,
    holders: Query<&ExposureBurstAbility>,
    mut emitters: Query<&mut ProximityExposure>,
    mut buildup_events: EventWriter<ExposureBuildup>,
    mut update_events: EventWriter<ExposureUpdate>,
) {
    for event in activated.read() {
        // Emitters never track themselves
        if event.user == event.target {
            continue;
        }
        let Ok(burst) = holders.get(event.holder) else {
            continue;
        };
        let Ok(mut exposure) = emitters.get_mut(event.user) else {
            continue;
        };

        let value = exposure.add_exposure(event.target, burst.amount * event.strength);
        debug!(
            "{:?} burst {:.1} exposure onto {:?} (now {:.1})",
            event.user,
            burst.amount * event.strength,
            event.target,
            value
        );

        buildup_events.send(ExposureBuildup {
            source: event.user,
            target: event.target,
            exposure: value,
        });
        update_events.send(ExposureUpdate {
            source: event.user,
            target: event.target,
            exposure: value,
        });
    }
}
