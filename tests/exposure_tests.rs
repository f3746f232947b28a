//! Proximity exposure tests

mod common;

use bevy::prelude::*;
use common::*;

use tcp_abilities::actions::ActionKind;
use tcp_abilities::constants::PULSE_STRENGTH;
use tcp_abilities::exposure::{ExposureBuildup, ExposureDecay, ExposureUpdate, ProximityExposure};
use tcp_abilities::tcp::effects::PickedUpBy;
use tcp_abilities::AbilityTrigger;

fn spawn_emitter(app: &mut App, exposure: ProximityExposure, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Transform::from_translation(position), exposure))
        .id()
}

fn exposure(app: &App, emitter: Entity) -> &ProximityExposure {
    app.world().get::<ProximityExposure>(emitter).unwrap()
}

#[test]
fn test_exposure_builds_up_then_decays_away() {
    let mut app = test_app(sample_prototypes());
    let emitter = spawn_emitter(&mut app, ProximityExposure::default(), Vec3::ZERO);
    let bystander = spawn_bystander(&mut app, Vec3::new(1.0, 0.0, 0.0));

    step(&mut app, 0.0);
    let buildup = events::<ExposureBuildup>(&app);
    assert_eq!(buildup.len(), 1);
    assert_eq!(buildup[0].source, emitter);
    assert_eq!(buildup[0].target, bystander);
    assert_eq!(buildup[0].exposure, 1.0);
    assert_eq!(events::<ExposureUpdate>(&app).len(), 1);

    step(&mut app, 1.0);
    assert_eq!(exposure(&app, emitter).exposure_of(bystander), Some(2.0));

    app.world_mut()
        .get_mut::<Transform>(bystander)
        .unwrap()
        .translation = Vec3::new(3.0, 0.0, 0.0);

    step(&mut app, 1.0);
    let decay = events::<ExposureDecay>(&app);
    assert_eq!(decay.len(), 1);
    assert_eq!(decay[0].exposure, 0.5);
    assert!(events::<ExposureBuildup>(&app).is_empty());

    step(&mut app, 1.0);
    let decay = events::<ExposureDecay>(&app);
    assert_eq!(decay.len(), 1);
    assert_eq!(decay[0].exposure, 0.0);
    assert_eq!(exposure(&app, emitter).tracked_count(), 0);

    step(&mut app, 1.0);
    assert!(events::<ExposureUpdate>(&app).is_empty());
}

#[test]
fn test_passes_wait_for_accumulation_frequency() {
    let mut app = test_app(sample_prototypes());
    let emitter = spawn_emitter(&mut app, ProximityExposure::default(), Vec3::ZERO);
    let bystander = spawn_bystander(&mut app, Vec3::new(0.0, 1.0, 0.0));

    step(&mut app, 0.0);
    for _ in 0..3 {
        step(&mut app, 0.25);
        assert!(events::<ExposureUpdate>(&app).is_empty());
    }
    assert_eq!(exposure(&app, emitter).exposure_of(bystander), Some(1.0));

    step(&mut app, 0.25);
    assert_eq!(events::<ExposureBuildup>(&app).len(), 1);
    assert_eq!(exposure(&app, emitter).exposure_of(bystander), Some(2.0));
}

#[test]
fn test_emitter_never_exposes_itself() {
    let mut app = test_app(sample_prototypes());
    let emitter = spawn_emitter(&mut app, ProximityExposure::default(), Vec3::ZERO);

    step(&mut app, 0.0);
    step(&mut app, 1.0);

    assert!(events::<ExposureUpdate>(&app).is_empty());
    assert_eq!(exposure(&app, emitter).exposure_of(emitter), None);
}

#[test]
fn test_exposure_stays_at_maximum() {
    let mut tunables = ProximityExposure::default();
    tunables.maximum = 2.5;

    let mut app = test_app(sample_prototypes());
    let emitter = spawn_emitter(&mut app, tunables, Vec3::ZERO);
    let bystander = spawn_bystander(&mut app, Vec3::new(1.5, 0.0, 0.0));

    step(&mut app, 0.0);
    for _ in 0..4 {
        step(&mut app, 1.0);
    }

    assert_eq!(exposure(&app, emitter).exposure_of(bystander), Some(2.5));
}

#[test]
fn test_pulse_burst_adds_exposure_at_pulse_strength() {
    let mut app = test_app(sample_prototypes());
    let tcp = spawn_creature(&mut app, AbilityTrigger::PassiveWithPulse, &["TCPHum"], Vec3::ZERO);
    app.world_mut()
        .entity_mut(tcp)
        .insert(ProximityExposure::default());
    let bystander = spawn_bystander(&mut app, Vec3::new(1.0, 0.0, 0.0));

    step(&mut app, 0.0);
    assert_eq!(exposure(&app, tcp).exposure_of(bystander), Some(1.0));

    let pulse = action_of(&mut app, tcp, ActionKind::Pulse).unwrap();
    perform(&mut app, tcp, pulse, None);
    step(&mut app, 0.1);

    let buildup = events::<ExposureBuildup>(&app);
    assert_eq!(buildup.len(), 1);
    assert_eq!(buildup[0].exposure, 1.0 + 10.0 * PULSE_STRENGTH);
    assert_eq!(exposure(&app, tcp).exposure_of(bystander), Some(6.0));
}

#[test]
fn test_alternating_range_adds_in_and_subtracts_out() {
    let mut tunables = ProximityExposure::default();
    tunables.accumulation_rate = 2.0;
    tunables.decay_rate = 0.5;

    let mut app = test_app(sample_prototypes());
    let emitter = spawn_emitter(&mut app, tunables, Vec3::ZERO);
    let bystander = spawn_bystander(&mut app, Vec3::ZERO);

    let inside = Vec3::new(1.0, 0.0, 0.0);
    let outside = Vec3::new(4.0, 0.0, 0.0);
    let mut previous = 0.0;

    for pass in 0..6 {
        let in_range = pass % 2 == 0;
        app.world_mut()
            .get_mut::<Transform>(bystander)
            .unwrap()
            .translation = if in_range { inside } else { outside };
        step(&mut app, if pass == 0 { 0.0 } else { 1.0 });

        let buildup = events::<ExposureBuildup>(&app);
        let decay = events::<ExposureDecay>(&app);
        let current = exposure(&app, emitter).exposure_of(bystander).unwrap();
        if in_range {
            assert_eq!(buildup.len(), 1, "pass {}", pass);
            assert!(decay.is_empty(), "pass {}", pass);
            assert_eq!(current, previous + 2.0);
        } else {
            assert!(buildup.is_empty(), "pass {}", pass);
            assert_eq!(decay.len(), 1, "pass {}", pass);
            assert_eq!(current, previous - 0.5);
        }
        previous = current;
    }

    assert_eq!(previous, 4.5);
}

#[test]
fn test_held_items_gain_no_exposure() {
    let mut app = test_app(sample_prototypes());
    let emitter = spawn_emitter(&mut app, ProximityExposure::default(), Vec3::ZERO);
    let held = app
        .world_mut()
        .spawn((Transform::from_translation(Vec3::ZERO), PickedUpBy { holder: emitter }))
        .id();
    let bystander = spawn_bystander(&mut app, Vec3::new(1.0, 0.0, 0.0));

    step(&mut app, 0.0);

    assert_eq!(exposure(&app, emitter).exposure_of(held), None);
    assert_eq!(exposure(&app, emitter).exposure_of(bystander), Some(1.0));
}
