//! TCP Ability Systems API
//!
//! Stable entry point for wiring the ability systems into an app. Both the
//! plugin and the headless runner go through here.
//!
//! ## System Phases
//!
//! Ability systems run in four ordered phases each frame:
//!
//! 1. **Lifecycle** - Load newly added profiles, regenerate holders on request
//! 2. **Actions** - Delayed interactions, action routing, cancellation,
//!    activation broadcast
//! 3. **Effects** - Holder effects, proximity exposure
//! 4. **Bookkeeping** - Ability log
//!
//! Deferred commands are applied between phases, so holders spawned during
//! Lifecycle receive broadcasts in Actions of the same frame.
//!
//! ## Usage
//!
//! ```ignore
//! use tcp_abilities::tcp::systems;
//!
//! systems::configure_tcp_system_ordering(&mut app);
//! systems::add_tcp_systems(&mut app, || true);
//! ```

use bevy::prelude::*;

// === Phase 1: Lifecycle ===
pub use super::dispatch::{initialize_abilities, process_reload_requests};

// === Phase 2: Actions ===
pub use super::dispatch::{
    broadcast_ability_events, complete_delayed_uses, deactivate_tracked_on_descend,
    handle_ability_actions,
};
pub use crate::delayed::{cancel_delayed_interactions, tick_delayed_interactions};

// === Phase 3: Effects ===
pub use super::effects::{apply_exposure_bursts, apply_status_effects};
pub use crate::exposure::update_proximity_exposure;

// === Phase 4: Bookkeeping ===
pub use super::log::record_ability_log;

/// System set labels for ability system ordering.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TcpSystemPhase {
    /// Phase 1: Strategy and holder loading
    Lifecycle,
    /// Phase 2: Delayed uses, action routing, broadcast to holders
    Actions,
    /// Phase 3: Effects reacting to holder events, exposure
    Effects,
    /// Phase 4: Logging
    Bookkeeping,
}

/// Configures the ordering between ability system phases.
///
/// Call this once during app setup before adding ability systems.
pub fn configure_tcp_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            TcpSystemPhase::Lifecycle,
            TcpSystemPhase::Actions,
            TcpSystemPhase::Effects,
            TcpSystemPhase::Bookkeeping,
        )
            .chain(),
    );
}

/// Adds the ability systems to the app.
///
/// # Arguments
/// * `app` - The Bevy App to add systems to
/// * `run_condition` - A run condition (use `|| true` to always run)
pub fn add_tcp_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    // Phase 1: Lifecycle
    app.add_systems(
        Update,
        (initialize_abilities, process_reload_requests)
            .chain()
            .in_set(TcpSystemPhase::Lifecycle)
            .run_if(run_condition.clone()),
    );

    // Flush spawned actions and holders
    app.add_systems(
        Update,
        apply_deferred
            .after(TcpSystemPhase::Lifecycle)
            .before(TcpSystemPhase::Actions)
            .run_if(run_condition.clone()),
    );

    // Phase 2: Actions
    app.add_systems(
        Update,
        (
            tick_delayed_interactions,
            handle_ability_actions,
            // Make this frame's scheduled uses visible to cancel requests
            apply_deferred,
            cancel_delayed_interactions,
            complete_delayed_uses,
            deactivate_tracked_on_descend,
            broadcast_ability_events,
        )
            .chain()
            .in_set(TcpSystemPhase::Actions)
            .run_if(run_condition.clone()),
    );

    // Flush spawned entities and granted actions
    app.add_systems(
        Update,
        apply_deferred
            .after(TcpSystemPhase::Actions)
            .before(TcpSystemPhase::Effects)
            .run_if(run_condition.clone()),
    );

    // Phase 3: Effects
    app.add_systems(
        Update,
        (
            apply_status_effects,
            apply_exposure_bursts,
            update_proximity_exposure,
        )
            .chain()
            .in_set(TcpSystemPhase::Effects)
            .run_if(run_condition.clone()),
    );

    // Phase 4: Bookkeeping
    app.add_systems(
        Update,
        record_ability_log
            .in_set(TcpSystemPhase::Bookkeeping)
            .run_if(run_condition),
    );
}
