//! Ability Constants
//!
//! Centralized location for the numeric tunables and prototype ids used by
//! the TCP ability systems. Data-driven values (ability effects, action
//! overrides) live in `assets/config/tcp_prototypes.ron` instead.

// ============================================================================
// Health Costs
// ============================================================================

/// Damage dealt by one "health level" of action cost.
pub const HEALTH_LEVEL: f32 = 8.0;

/// Damage type used for action health costs.
pub const HEALTH_COST_DAMAGE_TYPE: &str = "Strain";

/// Health levels paid by self-use and targeted-use actions.
pub const ACTIVE_USE_LEVEL_COST: f32 = 1.0;

/// Health levels paid by the pulse action.
pub const PULSE_LEVEL_COST: f32 = 2.0;

// ============================================================================
// Action Prototypes
// ============================================================================

/// Toggles the ascended state (ActiveAscension).
pub const ASCEND_ACTION_PROTOTYPE: &str = "ActionTCPAscend";

/// Self-use action (ActiveSelf).
pub const ABILITY_ACTION_PROTOTYPE: &str = "ActionTCPAbility";

/// Targeted-use action behind a delayed interaction (ActiveTargeted).
pub const ABILITY_TARGETED_PROTOTYPE: &str = "ActionTCPAbilityTargeted";

/// Repeatable targeted action granted while ascended.
pub const ASCENDED_TARGETED_PROTOTYPE: &str = "ActionTCPAscendedTargeted";

/// Toggles a status ability on and off (ActiveStatus).
pub const ABILITY_STATUS_PROTOTYPE: &str = "ActionTCPAbilityStatus";

/// Pulses a passive ability for an instant effect (PassiveWithPulse).
pub const ABILITY_PULSE_PROTOTYPE: &str = "ActionTCPAbilityPulse";

// ============================================================================
// Activation
// ============================================================================

/// Strength of a regular, single-target activation.
pub const DEFAULT_STRENGTH: f32 = 1.0;

/// Radius around the owner affected by a pulse, in world units.
pub const PULSE_RADIUS: f32 = 1.5;

/// Strength of each activation caused by a pulse.
pub const PULSE_STRENGTH: f32 = 0.5;

/// Delay before a targeted use completes, in seconds.
pub const TARGETED_USE_DELAY: f32 = 3.0;

/// Maximum distance between user and target for targeted uses.
/// A pending delayed use is cancelled once the pair moves further apart.
pub const INTERACTION_RANGE: f32 = 1.5;

// ============================================================================
// Proximity Exposure Defaults
// ============================================================================

/// Maximum distance to cause buildup.
pub const EXPOSURE_RANGE: f32 = 1.5;

/// Maximum exposure value.
pub const MAXIMUM_EXPOSURE: f32 = 180.0;

/// Starting value of exposure.
pub const MINIMUM_EXPOSURE: f32 = 0.0;

/// Exposure gained per update while in range.
pub const EXPOSURE_ACCUMULATION_RATE: f32 = 1.0;

/// Seconds between exposure updates.
pub const EXPOSURE_ACCUMULATION_FREQUENCY: f32 = 1.0;

/// Exposure lost per update while out of range.
pub const EXPOSURE_DECAY_RATE: f32 = 1.5;
