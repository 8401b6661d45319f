// src/sensor/tests.rs

use super::*;
use std::time::Duration;

fn sample(x: f32) -> SensorSample {
    SensorSample {
        x,
        y: 0.0,
        z: 9.81,
        timestamp_ns: 0,
    }
}

fn resolved(backend: SimulatedSensors) -> SensorChannel<SimulatedSensors> {
    let bridge = StaticHostBridge::new("com.example.test");
    let mut channel = SensorChannel::new(backend);
    channel.resolve(Some(&bridge));
    channel
}

#[test_log::test]
fn it_should_convert_60_hz_to_a_16_ms_period() {
    assert_eq!(event_period(60), Duration::from_micros(16_000));
    assert_eq!(event_period(1), Duration::from_micros(1_000_000));
    assert_eq!(event_period(0), Duration::from_micros(1_000_000));
}

#[test_log::test]
fn it_should_prefer_the_package_scoped_manager() {
    let channel = resolved(SimulatedSensors::new());
    assert!(channel.is_available());
    assert_eq!(
        channel.backend().manager_lookups(),
        &["package:com.example.test".to_string()]
    );
}

#[test_log::test]
fn it_should_fall_back_to_the_global_manager_when_the_bridge_is_unavailable() {
    let mut channel = SensorChannel::new(SimulatedSensors::new());
    let bridge = StaticHostBridge::unavailable();

    assert!(channel.resolve(Some(&bridge)).is_some());
    assert_eq!(channel.backend().manager_lookups(), &["global".to_string()]);
}

#[test_log::test]
fn it_should_fall_back_to_the_global_manager_without_a_package_scoped_one() {
    let channel = resolved(SimulatedSensors::new().without_package_manager());
    assert!(channel.is_available());
    assert_eq!(
        channel.backend().manager_lookups(),
        &["package:com.example.test".to_string(), "global".to_string()]
    );
}

#[test_log::test]
fn it_should_degrade_gracefully_without_any_manager() {
    let mut channel = resolved(
        SimulatedSensors::new()
            .without_package_manager()
            .without_global_manager(),
    );
    assert!(!channel.is_available());

    channel.enable(60);
    assert!(!channel.is_enabled());
    assert_eq!(channel.drain().count(), 0);
    channel.disable();
}

#[test_log::test]
fn it_should_degrade_gracefully_without_an_accelerometer() {
    let mut channel = resolved(SimulatedSensors::new().without_accelerometer());
    assert_eq!(channel.sensor(), None);

    channel.enable(60);
    assert_eq!(channel.backend().enable_calls(), 0);
}

#[test_log::test]
fn it_should_resolve_only_once() {
    let mut channel = resolved(SimulatedSensors::new());
    let first = channel.sensor();

    assert_eq!(channel.resolve(None), first);
    assert_eq!(channel.backend().manager_lookups().len(), 1);
}

#[test_log::test]
fn it_should_enable_and_disable_idempotently() {
    let mut channel = resolved(SimulatedSensors::new());

    channel.enable(60);
    channel.enable(60);
    assert!(channel.is_enabled());
    assert_eq!(channel.backend().enable_calls(), 1);
    assert_eq!(channel.backend().period(), Some(Duration::from_micros(16_000)));

    channel.disable();
    channel.disable();
    assert!(!channel.is_enabled());
    assert_eq!(channel.backend().disable_calls(), 1);
}

#[test_log::test]
fn it_should_drain_only_what_is_queued() {
    let mut channel = resolved(SimulatedSensors::new());
    let feed = channel.backend().feed();

    assert!(!feed.send(sample(0.5)), "disabled sensors do not report");

    channel.enable(60);
    assert!(feed.send(sample(1.0)));
    assert!(feed.send(sample(2.0)));

    let drained: Vec<f32> = channel.drain().map(|s| s.x).collect();
    assert_eq!(drained, vec![1.0, 2.0]);
    assert_eq!(channel.drain().count(), 0);

    assert!(feed.send(sample(3.0)));
    assert_eq!(channel.drain().map(|s| s.x).collect::<Vec<_>>(), vec![3.0]);
}

#[test_log::test]
fn it_should_drain_lazily() {
    let mut channel = resolved(SimulatedSensors::new());
    let feed = channel.backend().feed();
    channel.enable(60);
    for i in 0..3 {
        feed.send(sample(i as f32));
    }

    assert_eq!(channel.drain().next().map(|s| s.x), Some(0.0));
    assert_eq!(channel.drain().count(), 2);
}
