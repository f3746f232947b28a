//! JSON configuration parsing for headless scenarios
//!
//! A scenario places TCP creatures and bystanders, then plays a timed script
//! of actions, movements and cancellations against them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::actions::ActionKind;
use crate::constants::*;
use crate::tcp::trigger::AbilityTrigger;

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Ability-bearing creatures (at least one)
    pub creatures: Vec<CreatureConfig>,
    /// Plain positioned entities to use as targets
    #[serde(default)]
    pub bystanders: Vec<BystanderConfig>,
    /// Timed steps, in any order
    #[serde(default)]
    pub script: Vec<ScriptStep>,
    /// Simulated seconds to run (default: 10)
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Simulation ticks per second (default: 20)
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f32,
    /// Custom output path for the ability log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

/// A TCP creature in the scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureConfig {
    pub name: String,
    #[serde(default)]
    pub trigger: AbilityTrigger,
    /// Ability prototype ids
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub position: [f32; 3],
    /// Damage at which the creature becomes critical (None = never)
    #[serde(default)]
    pub critical_threshold: Option<f32>,
    /// Makes the creature emit proximity exposure
    #[serde(default)]
    pub exposure: Option<ExposureConfig>,
}

/// Exposure emitter tunables; omitted fields use the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    pub range: f32,
    pub maximum: f32,
    pub minimum: f32,
    pub accumulation_rate: f32,
    pub accumulation_frequency: f32,
    pub decay_rate: f32,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            range: EXPOSURE_RANGE,
            maximum: MAXIMUM_EXPOSURE,
            minimum: MINIMUM_EXPOSURE,
            accumulation_rate: EXPOSURE_ACCUMULATION_RATE,
            accumulation_frequency: EXPOSURE_ACCUMULATION_FREQUENCY,
            decay_rate: EXPOSURE_DECAY_RATE,
        }
    }
}

/// A positioned entity without abilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BystanderConfig {
    pub name: String,
    #[serde(default)]
    pub position: [f32; 3],
}

/// One timed scenario step. `at` is in simulated seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScriptStep {
    /// Use the creature's granted action of this kind
    Perform {
        at: f32,
        creature: String,
        action: ActionKind,
        #[serde(default)]
        target: Option<String>,
    },
    /// Teleport an entity
    Move {
        at: f32,
        entity: String,
        position: [f32; 3],
    },
    /// Cancel the creature's pending delayed uses
    Cancel {
        at: f32,
        creature: String,
        #[serde(default)]
        target: Option<String>,
    },
    /// Regenerate the creature's holders
    Reload { at: f32, creature: String },
    /// Strip the creature's abilities
    Remove { at: f32, creature: String },
}

impl ScriptStep {
    pub fn at(&self) -> f32 {
        match self {
            ScriptStep::Perform { at, .. }
            | ScriptStep::Move { at, .. }
            | ScriptStep::Cancel { at, .. }
            | ScriptStep::Reload { at, .. }
            | ScriptStep::Remove { at, .. } => *at,
        }
    }

    /// (creature names, any entity names) referenced by this step
    fn references(&self) -> (Vec<&str>, Vec<&str>) {
        match self {
            ScriptStep::Perform {
                creature, target, ..
            }
            | ScriptStep::Cancel {
                creature, target, ..
            } => (vec![creature.as_str()], target.iter().map(String::as_str).collect()),
            ScriptStep::Move { entity, .. } => (Vec::new(), vec![entity.as_str()]),
            ScriptStep::Reload { creature, .. } | ScriptStep::Remove { creature, .. } => {
                (vec![creature.as_str()], Vec::new())
            }
        }
    }
}

fn default_duration() -> f32 {
    10.0
}

fn default_tick_rate() -> f32 {
    20.0
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario file: {}", e))?;

        Self::from_json_str(&contents)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json_str(contents: &str) -> Result<Self, String> {
        let config: ScenarioConfig = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.creatures.is_empty() {
            return Err("scenario must have at least one creature".to_string());
        }

        // Names must be unique across creatures and bystanders
        let mut names = HashSet::new();
        for name in self
            .creatures
            .iter()
            .map(|c| &c.name)
            .chain(self.bystanders.iter().map(|b| &b.name))
        {
            if !names.insert(name.as_str()) {
                return Err(format!("duplicate entity name: '{}'", name));
            }
        }

        let creatures: HashSet<&str> = self.creatures.iter().map(|c| c.name.as_str()).collect();

        for step in &self.script {
            if step.at() < 0.0 {
                return Err(format!("script step at {:.2}s is negative", step.at()));
            }

            let (creature_refs, entity_refs) = step.references();
            for name in creature_refs {
                if !creatures.contains(name) {
                    return Err(format!("script references unknown creature: '{}'", name));
                }
            }
            for name in entity_refs {
                if !names.contains(name) {
                    return Err(format!("script references unknown entity: '{}'", name));
                }
            }
        }

        if self.duration_secs <= 0.0 {
            return Err("duration_secs must be positive".to_string());
        }
        if self.tick_rate <= 0.0 {
            return Err("tick_rate must be positive".to_string());
        }

        for creature in &self.creatures {
            if let Some(exposure) = &creature.exposure {
                if exposure.accumulation_frequency <= 0.0 {
                    return Err(format!(
                        "{}: exposure accumulation_frequency must be positive",
                        creature.name
                    ));
                }
            }
        }

        Ok(())
    }
}
