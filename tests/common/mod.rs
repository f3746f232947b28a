//! Shared helpers for driving the ability plugin in tests.
#![allow(dead_code)]

use bevy::prelude::*;
use std::time::Duration;

use tcp_abilities::actions::{Action, ActionKind, PerformAction};
use tcp_abilities::health::{Damageable, MobThresholds};
use tcp_abilities::prototypes::{AbilityDefinition, TcpPrototypes};
use tcp_abilities::tcp::effects::AbilityEffect;
use tcp_abilities::{AbilityProfile, AbilityTrigger, TcpAbilityPlugin};

/// App with the ability plugin and a hand-stepped clock.
pub fn test_app(prototypes: TcpPrototypes) -> App {
    let mut app = App::new();
    app.init_resource::<Time>()
        .insert_resource(prototypes)
        .add_plugins(TcpAbilityPlugin);
    app
}

/// Advance the clock by `secs` and run one frame.
pub fn step(app: &mut App, secs: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(secs));
    app.update();
}

/// Events of type `E` sent during the last frame.
pub fn events<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world()
        .resource::<Events<E>>()
        .iter_current_update_events()
        .cloned()
        .collect()
}

/// Prototypes with one ability per effect kind, registered for every trigger.
pub fn sample_prototypes() -> TcpPrototypes {
    let mut glare = AbilityDefinition::default();
    let mut bounty = AbilityDefinition::default();
    let mut hum = AbilityDefinition::default();

    for trigger in AbilityTrigger::ALL {
        glare = glare.with_effects(
            trigger,
            vec![AbilityEffect::ApplyStatus {
                statuses: vec!["Blinded".to_string()],
            }],
        );
        bounty = bounty.with_effects(
            trigger,
            vec![AbilityEffect::CreateEntity {
                prototype: "FoodBounty".to_string(),
                pickup_on_spawn: true,
            }],
        );
        hum = hum.with_effects(trigger, vec![AbilityEffect::ExposureBurst { amount: 10.0 }]);
    }

    TcpPrototypes::default()
        .with_ability("TCPGlare", glare)
        .with_ability("TCPBounty", bounty)
        .with_ability("TCPHum", hum)
}

/// Spawn a TCP with a critical threshold of 100.
pub fn spawn_creature(
    app: &mut App,
    trigger: AbilityTrigger,
    abilities: &[&str],
    position: Vec3,
) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            AbilityProfile::new(trigger, abilities.iter().copied()),
            Damageable::default(),
            MobThresholds::with_critical(100.0),
        ))
        .id()
}

pub fn spawn_bystander(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn(Transform::from_translation(position))
        .id()
}

/// The action of `kind` currently granted to `owner`.
pub fn action_of(app: &mut App, owner: Entity, kind: ActionKind) -> Option<Entity> {
    let world = app.world_mut();
    let mut actions = world.query::<(Entity, &Action)>();
    actions
        .iter(world)
        .find(|(_, action)| action.owner == owner && action.kind == kind)
        .map(|(entity, _)| entity)
}

pub fn perform(app: &mut App, performer: Entity, action: Entity, target: Option<Entity>) {
    app.world_mut().send_event(PerformAction {
        performer,
        action,
        target,
    });
}

pub fn exists(app: &App, entity: Entity) -> bool {
    app.world().entities().contains(entity)
}

pub fn profile(app: &App, entity: Entity) -> &AbilityProfile {
    app.world()
        .get::<AbilityProfile>(entity)
        .expect("entity has an ability profile")
}
