//! Headless scenario execution
//!
//! Runs a scenario on a fixed simulated clock without any window, then
//! reports what every creature ended up with.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::actions::{Action, PerformAction};
use crate::delayed::CancelDelayedInteraction;
use crate::exposure::ProximityExposure;
use crate::health::{Damageable, MobThresholds};
use crate::prototypes::TcpPrototypes;
use crate::tcp::components::AbilityProfile;
use crate::tcp::events::ReloadAbilities;
use crate::tcp::log::{AbilityLog, AbilityLogEventType};
use crate::tcp::TcpAbilityPlugin;

use super::config::{CreatureConfig, ExposureConfig, ScenarioConfig, ScriptStep};

/// Options that don't come from the scenario file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Install the log plugin so ability logging is printed
    pub verbose: bool,
    /// Override the scenario's duration
    pub max_duration: Option<f32>,
    /// Override the scenario's output path
    pub output: Option<PathBuf>,
}

/// Result of a completed scenario
///
/// This struct provides programmatic access to scenario results for testing and analysis.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Simulated seconds that were run
    pub duration: f32,
    pub creatures: Vec<CreatureResult>,
    /// Total ability log entries
    pub log_entries: usize,
    /// Where the ability log was saved, if anywhere
    pub log_path: Option<PathBuf>,
}

/// State of a single creature after the scenario
#[derive(Debug, Clone)]
pub struct CreatureResult {
    pub name: String,
    /// Trigger kind name (e.g., "Active (Targeted)")
    pub trigger: String,
    /// Prototype ids of the actions still granted, empty once abilities were removed
    pub actions: Vec<String>,
    /// Holders still owned
    pub holders: usize,
    /// Effect count per ability as the strategy sees it, including
    /// abilities that only have a `Default` entry and so get no holder
    pub strategy_effects: Vec<(String, usize)>,
    /// Holder activations caused by this creature
    pub activations: usize,
    /// Holder deactivations caused by this creature
    pub deactivations: usize,
    /// Toggle state for ascension and status triggers
    pub enabled: Option<bool>,
    /// Damage taken from action health costs
    pub damage_taken: f32,
    /// Final exposure per affected entity name, sorted by name
    pub exposure: Vec<(String, f32)>,
}

impl ScenarioResult {
    pub fn creature(&self, name: &str) -> Option<&CreatureResult> {
        self.creatures.iter().find(|c| c.name == name)
    }

    /// Print a human-readable summary to stdout
    pub fn print_summary(&self) {
        println!("Scenario complete after {:.1}s ({} log entries)", self.duration, self.log_entries);
        for creature in &self.creatures {
            println!("  {} [{}]", creature.name, creature.trigger);
            println!("    actions: {:?}", creature.actions);
            println!(
                "    holders: {}, activations: {}, deactivations: {}",
                creature.holders, creature.activations, creature.deactivations
            );
            if let Some(enabled) = creature.enabled {
                println!("    enabled: {}", enabled);
            }
            for (ability, effects) in &creature.strategy_effects {
                println!("    {}: {} effects", ability, effects);
            }
            if creature.damage_taken > 0.0 {
                println!("    damage taken: {:.1}", creature.damage_taken);
            }
            for (name, exposure) in &creature.exposure {
                println!("    exposure on {}: {:.1}", name, exposure);
            }
        }
        if let Some(path) = &self.log_path {
            println!("Log saved to: {}", path.display());
        }
    }
}

/// Name → entity lookup for script steps
#[derive(Resource, Default, Debug)]
pub struct ScenarioEntities {
    pub by_name: HashMap<String, Entity>,
    /// Creature names in config order
    pub creatures: Vec<String>,
}

impl ScenarioEntities {
    fn get(&self, name: &str) -> Option<Entity> {
        self.by_name.get(name).copied()
    }

    fn name_of(&self, entity: Entity) -> String {
        self.by_name
            .iter()
            .find(|(_, e)| **e == entity)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| format!("{:?}", entity))
    }
}

fn exposure_from_config(config: &ExposureConfig) -> ProximityExposure {
    let mut exposure = ProximityExposure::default();
    exposure.range = config.range;
    exposure.maximum = config.maximum;
    exposure.minimum = config.minimum;
    exposure.accumulation_rate = config.accumulation_rate;
    exposure.accumulation_frequency = config.accumulation_frequency;
    exposure.decay_rate = config.decay_rate;
    exposure
}

fn spawn_creature(world: &mut World, creature: &CreatureConfig) -> Entity {
    let [x, y, z] = creature.position;
    let mut entity = world.spawn((
        Name::new(creature.name.clone()),
        Transform::from_xyz(x, y, z),
        AbilityProfile::new(creature.trigger, creature.abilities.iter().cloned()),
        Damageable::default(),
        MobThresholds {
            critical: creature.critical_threshold,
        },
    ));
    if let Some(exposure) = &creature.exposure {
        entity.insert(exposure_from_config(exposure));
    }
    entity.id()
}

/// Build an app with the scenario's entities spawned and abilities loaded.
pub fn build_scenario_app(config: &ScenarioConfig, prototypes: TcpPrototypes, verbose: bool) -> App {
    let mut app = App::new();
    if verbose {
        app.add_plugins(LogPlugin::default());
    }

    // Time is stepped by hand for a deterministic run
    app.init_resource::<Time>()
        .insert_resource(prototypes)
        .add_plugins(TcpAbilityPlugin);

    let mut entities = ScenarioEntities::default();
    let world = app.world_mut();

    for creature in &config.creatures {
        let entity = spawn_creature(world, creature);
        entities.by_name.insert(creature.name.clone(), entity);
        entities.creatures.push(creature.name.clone());
    }
    for bystander in &config.bystanders {
        let [x, y, z] = bystander.position;
        let entity = world
            .spawn((Name::new(bystander.name.clone()), Transform::from_xyz(x, y, z)))
            .id();
        entities.by_name.insert(bystander.name.clone(), entity);
    }

    info!(
        "Scenario setup complete: {} creatures, {} bystanders",
        config.creatures.len(),
        config.bystanders.len()
    );
    app.insert_resource(entities);

    // Setup frame: load strategies and holders
    app.update();
    app
}

/// Find the action of `kind` granted to `creature`
fn find_action(world: &mut World, creature: Entity, kind: crate::actions::ActionKind) -> Option<Entity> {
    let mut actions = world.query::<(Entity, &Action)>();
    actions
        .iter(world)
        .find(|(_, action)| action.owner == creature && action.kind == kind)
        .map(|(entity, _)| entity)
}

/// Apply one script step to the world
fn apply_step(world: &mut World, entities: &ScenarioEntities, step: &ScriptStep) {
    match step {
        ScriptStep::Perform {
            creature,
            action,
            target,
            ..
        } => {
            let Some(performer) = entities.get(creature) else {
                return;
            };
            let Some(action_entity) = find_action(world, performer, *action) else {
                warn!("{} has no {:?} action", creature, action);
                return;
            };
            world.send_event(PerformAction {
                performer,
                action: action_entity,
                target: target.as_deref().and_then(|name| entities.get(name)),
            });
        }
        ScriptStep::Move {
            entity, position, ..
        } => {
            let Some(moved) = entities.get(entity) else {
                return;
            };
            if let Some(mut transform) = world.get_mut::<Transform>(moved) {
                transform.translation = Vec3::from_array(*position);
            }
        }
        ScriptStep::Cancel {
            creature, target, ..
        } => {
            let Some(user) = entities.get(creature) else {
                return;
            };
            world.send_event(CancelDelayedInteraction {
                user,
                target: target.as_deref().and_then(|name| entities.get(name)),
            });
        }
        ScriptStep::Reload { creature, .. } => {
            if let Some(entity) = entities.get(creature) {
                world.send_event(ReloadAbilities { entity });
            }
        }
        ScriptStep::Remove { creature, .. } => {
            if let Some(entity) = entities.get(creature) {
                world.entity_mut(entity).remove::<AbilityProfile>();
            }
        }
    }
}

/// Collect the result of every creature from the world
fn build_scenario_result(world: &World, duration: f32, log_path: Option<PathBuf>) -> ScenarioResult {
    let entities = world.resource::<ScenarioEntities>();
    let log = world.resource::<AbilityLog>();
    let prototypes = world.resource::<TcpPrototypes>();
    let mut creatures = Vec::new();

    for name in &entities.creatures {
        let Some(entity) = entities.get(name) else {
            continue;
        };

        let profile = world.get::<AbilityProfile>(entity);
        let actions = profile
            .map(|profile| {
                profile
                    .actions()
                    .iter()
                    .filter_map(|action| world.get::<Action>(*action))
                    .map(|action| action.prototype.clone())
                    .collect()
            })
            .unwrap_or_default();

        let strategy_effects = profile
            .and_then(|profile| {
                let strategy = profile.strategy()?;
                Some(
                    profile
                        .abilities
                        .iter()
                        .filter_map(|id| {
                            let bundle = strategy.effect_bundle(prototypes.ability(id)?)?;
                            Some((id.clone(), bundle.len()))
                        })
                        .collect(),
                )
            })
            .unwrap_or_default();

        let mut exposure: Vec<(String, f32)> = world
            .get::<ProximityExposure>(entity)
            .map(|tracker| {
                tracker
                    .affected()
                    .map(|(target, value)| (entities.name_of(target), value))
                    .collect()
            })
            .unwrap_or_default();
        exposure.sort_by(|a, b| a.0.cmp(&b.0));

        creatures.push(CreatureResult {
            name: name.clone(),
            trigger: profile
                .map(|profile| profile.trigger.name().to_string())
                .unwrap_or_else(|| "Removed".to_string()),
            actions,
            holders: profile.map(|profile| profile.holders().len()).unwrap_or(0),
            strategy_effects,
            activations: log.count_for(AbilityLogEventType::Activated, entity),
            deactivations: log.count_for(AbilityLogEventType::Deactivated, entity),
            enabled: profile
                .and_then(|profile| profile.strategy())
                .and_then(|strategy| strategy.is_enabled()),
            damage_taken: world
                .get::<Damageable>(entity)
                .map(|damageable| damageable.total)
                .unwrap_or(0.0),
            exposure,
        });
    }

    ScenarioResult {
        duration,
        creatures,
        log_entries: log.entries.len(),
        log_path,
    }
}

/// Run a scenario to completion with the given prototypes
pub fn run_scenario(
    config: &ScenarioConfig,
    prototypes: TcpPrototypes,
    options: &RunOptions,
) -> Result<ScenarioResult, String> {
    config.validate()?;

    let duration = options.max_duration.unwrap_or(config.duration_secs);
    if duration <= 0.0 {
        return Err("duration must be positive".to_string());
    }

    let mut app = build_scenario_app(config, prototypes, options.verbose);

    let mut script: Vec<&ScriptStep> = config.script.iter().collect();
    script.sort_by(|a, b| a.at().total_cmp(&b.at()));

    let tick = Duration::from_secs_f32(1.0 / config.tick_rate);
    let mut elapsed = 0.0_f32;
    let mut next_step = 0;

    while elapsed < duration {
        // Steps due by now go in before this frame runs
        while next_step < script.len() && script[next_step].at() <= elapsed {
            let world = app.world_mut();
            world.resource_scope(|world, entities: Mut<ScenarioEntities>| {
                apply_step(world, &entities, script[next_step]);
            });
            next_step += 1;
        }

        app.world_mut().resource_mut::<Time>().advance_by(tick);
        app.update();
        elapsed += tick.as_secs_f32();
    }

    let log_path = options
        .output
        .clone()
        .or_else(|| config.output_path.as_ref().map(PathBuf::from));
    if let Some(path) = &log_path {
        app.world().resource::<AbilityLog>().save_to_file(path)?;
    }

    Ok(build_scenario_result(app.world(), elapsed, log_path))
}
