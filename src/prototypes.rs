//! Data-Driven Prototypes
//!
//! Ability prototypes, action prototypes and known damage types, loaded from
//! RON config files. Ability prototypes are pure data: each one maps trigger
//! kinds to the bundle of effect components a holder should carry.
//!
//! ## Config file
//! ```ron
//! (
//!     damage_types: ["Blunt", "Strain"],
//!     abilities: {
//!         "TCPGlare": (
//!             effects: {
//!                 ActiveTargeted: [ApplyStatus(statuses: ["Blinded"])],
//!                 Default: [ApplyStatus(statuses: ["Dazed"])],
//!             },
//!         ),
//!     },
//! )
//! ```
//!
//! Action prototypes are built in and only need to appear in the file when a
//! value should be overridden.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::actions::ActionKind;
use crate::constants::*;
use crate::tcp::effects::EffectBundle;
use crate::tcp::trigger::AbilityTrigger;

/// Default location of the prototypes file, relative to the working directory.
pub const DEFAULT_PROTOTYPES_PATH: &str = "assets/config/tcp_prototypes.ron";

/// Configuration of a grantable action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionPrototype {
    /// Display name of the action
    pub name: String,
    /// Which invocation this action raises
    pub kind: ActionKind,
    /// Seconds between invocation and effect (0.0 = immediate)
    #[serde(default)]
    pub use_delay: f32,
    /// Maximum distance to the target (targeted actions only)
    #[serde(default)]
    pub range: Option<f32>,
}

impl ActionPrototype {
    fn new(name: &str, kind: ActionKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            use_delay: 0.0,
            range: None,
        }
    }

    fn targeted(name: &str, use_delay: f32) -> Self {
        Self {
            name: name.to_string(),
            kind: ActionKind::UseTargeted,
            use_delay,
            range: Some(INTERACTION_RANGE),
        }
    }
}

/// The action prototypes every strategy relies on.
fn builtin_actions() -> HashMap<String, ActionPrototype> {
    [
        (
            ASCEND_ACTION_PROTOTYPE,
            ActionPrototype::new("Ascend", ActionKind::ToggleAscension),
        ),
        (
            ABILITY_ACTION_PROTOTYPE,
            ActionPrototype::new("Use Ability", ActionKind::UseSelf),
        ),
        (
            ABILITY_TARGETED_PROTOTYPE,
            ActionPrototype::targeted("Use Ability On", TARGETED_USE_DELAY),
        ),
        (
            ASCENDED_TARGETED_PROTOTYPE,
            ActionPrototype::targeted("Ascended Strike", 0.0),
        ),
        (
            ABILITY_STATUS_PROTOTYPE,
            ActionPrototype::new("Toggle Ability", ActionKind::ToggleStatus),
        ),
        (
            ABILITY_PULSE_PROTOTYPE,
            ActionPrototype::new("Pulse Ability", ActionKind::Pulse),
        ),
    ]
    .into_iter()
    .map(|(id, proto)| (id.to_string(), proto))
    .collect()
}

/// A TCP ability: the effect bundle its holders carry for each trigger kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    /// Effect bundles keyed by trigger kind. `Default` is the strategy-level fallback.
    #[serde(default)]
    pub effects: HashMap<AbilityTrigger, EffectBundle>,
}

impl AbilityDefinition {
    /// Builder-style helper to add the bundle for one trigger kind.
    pub fn with_effects(mut self, trigger: AbilityTrigger, bundle: EffectBundle) -> Self {
        self.effects.insert(trigger, bundle);
        self
    }

    /// The bundle registered for exactly this trigger kind (no fallback).
    pub fn effects_for(&self, trigger: AbilityTrigger) -> Option<&EffectBundle> {
        self.effects.get(&trigger)
    }
}

/// Root structure of the prototypes RON file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PrototypesConfig {
    #[serde(default)]
    pub abilities: HashMap<String, AbilityDefinition>,
    /// Overrides for the built-in action prototypes
    #[serde(default)]
    pub actions: HashMap<String, ActionPrototype>,
    /// Known damage types. When omitted only the health cost type is known.
    #[serde(default)]
    pub damage_types: Vec<String>,
}

/// Resource containing every prototype the TCP systems resolve ids against.
///
/// Access via `Res<TcpPrototypes>` in systems. The default value holds the
/// built-in action prototypes and no abilities.
#[derive(Resource, Debug, Clone)]
pub struct TcpPrototypes {
    abilities: HashMap<String, AbilityDefinition>,
    actions: HashMap<String, ActionPrototype>,
    damage_types: HashSet<String>,
}

impl Default for TcpPrototypes {
    fn default() -> Self {
        Self {
            abilities: HashMap::new(),
            actions: builtin_actions(),
            damage_types: HashSet::from([HEALTH_COST_DAMAGE_TYPE.to_string()]),
        }
    }
}

impl TcpPrototypes {
    /// Create from a loaded config, layering it over the built-in actions
    pub fn new(config: PrototypesConfig) -> Self {
        let mut prototypes = Self::default();
        prototypes.abilities = config.abilities;
        prototypes.actions.extend(config.actions);
        if !config.damage_types.is_empty() {
            prototypes.damage_types = config.damage_types.into_iter().collect();
        }
        prototypes
    }

    /// Parse prototypes from RON text and validate them.
    pub fn from_ron_str(contents: &str) -> Result<Self, String> {
        let config: PrototypesConfig =
            ron::from_str(contents).map_err(|e| format!("Failed to parse prototypes: {}", e))?;

        let prototypes = Self::new(config);
        prototypes
            .validate()
            .map_err(|missing| format!("Missing action prototypes: {:?}", missing))?;

        Ok(prototypes)
    }

    /// Load prototypes from a RON file
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let prototypes = Self::from_ron_str(&contents)
            .map_err(|e| format!("{} ({})", e, path.display()))?;

        info!(
            "Loaded {} ability prototypes and {} action prototypes from {}",
            prototypes.abilities.len(),
            prototypes.actions.len(),
            path.display()
        );

        Ok(prototypes)
    }

    /// Check that every action prototype a strategy can grant is defined
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let required = [
            ASCEND_ACTION_PROTOTYPE,
            ABILITY_ACTION_PROTOTYPE,
            ABILITY_TARGETED_PROTOTYPE,
            ASCENDED_TARGETED_PROTOTYPE,
            ABILITY_STATUS_PROTOTYPE,
            ABILITY_PULSE_PROTOTYPE,
        ];

        let missing: Vec<String> = required
            .into_iter()
            .filter(|id| !self.actions.contains_key(*id))
            .map(String::from)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityDefinition> {
        self.abilities.get(id)
    }

    pub fn action(&self, id: &str) -> Option<&ActionPrototype> {
        self.actions.get(id)
    }

    pub fn has_damage_type(&self, id: &str) -> bool {
        self.damage_types.contains(id)
    }

    /// Get all ability ids that are defined
    pub fn ability_ids(&self) -> impl Iterator<Item = &String> {
        self.abilities.keys()
    }

    /// Builder-style helper to register an ability prototype.
    pub fn with_ability(mut self, id: impl Into<String>, definition: AbilityDefinition) -> Self {
        self.abilities.insert(id.into(), definition);
        self
    }

    /// Builder-style helper to forget a damage type.
    pub fn without_damage_type(mut self, id: &str) -> Self {
        self.damage_types.remove(id);
        self
    }
}
