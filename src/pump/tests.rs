// src/pump/tests.rs

use super::*;
use crate::config::Config;
use crate::lifecycle::Phase;
use crate::sensor::{SensorSample, SimulatedSensors, StaticHostBridge};
use crate::snapshot::Snapshot;
use crate::surface::{HeadlessGraphicsDriver, NativeWindow};
use std::thread;

type TestController = LifecycleController<HeadlessGraphicsDriver, SimulatedSensors>;

const WINDOW: NativeWindow = NativeWindow(1);

fn started(sensors: SimulatedSensors) -> TestController {
    let mut controller = LifecycleController::new(
        HeadlessGraphicsDriver::new(320, 240),
        sensors,
        &Config::default(),
    );
    controller.init(Some(&StaticHostBridge::new("com.example.pump")), None);
    controller
}

fn command(command: Command) -> ScriptStep {
    ScriptStep::Event(PumpEvent::Command(command))
}

fn motion(x: f32, y: f32) -> ScriptStep {
    ScriptStep::Event(PumpEvent::Input(InputEvent::Motion { x, y }))
}

#[test_log::test]
fn it_should_refuse_to_run_an_uninitialized_controller() {
    let controller = LifecycleController::new(
        HeadlessGraphicsDriver::new(320, 240),
        SimulatedSensors::new(),
        &Config::default(),
    );
    let mut pump = EventPumpAdapter::new(controller, ScriptedEventSource::default());
    assert!(pump.run().is_err());
}

#[test_log::test]
fn it_should_block_while_idle_and_poll_while_animating() {
    let source = ScriptedEventSource::new([
        command(Command::WindowAvailable(Some(WINDOW))),
        motion(10.0, 10.0),
        ScriptStep::Idle,
        command(Command::FocusLost),
    ]);
    let mut pump = EventPumpAdapter::new(started(SimulatedSensors::new()), source);

    pump.run().unwrap();

    assert_eq!(
        pump.source().waits(),
        &[
            WaitMode::Block, // window
            WaitMode::Block, // motion
            WaitMode::Poll,  // idle -> tick
            WaitMode::Poll,  // focus lost
            WaitMode::Block, // exhausted
        ]
    );
}

#[test_log::test]
fn it_should_tick_once_per_idle_poll_while_animating() {
    let source = ScriptedEventSource::new([
        command(Command::WindowAvailable(Some(WINDOW))),
        motion(10.0, 10.0),
        ScriptStep::Idle,
        ScriptStep::Idle,
        ScriptStep::Idle,
        command(Command::FocusLost),
        ScriptStep::Idle,
    ]);
    let mut pump = EventPumpAdapter::new(started(SimulatedSensors::new()), source);

    let summary = pump.run().unwrap();

    assert_eq!(summary.ticks, 3);
    assert!((pump.controller().snapshot().angle - 0.03).abs() < 1e-5);
    // window, three ticks, focus lost
    assert_eq!(pump.controller().surface().driver().frames().len(), 5);
}

#[test_log::test]
fn it_should_report_input_results_back_to_the_host() {
    let source = ScriptedEventSource::new([
        motion(120.0, 340.0),
        ScriptStep::Event(PumpEvent::Input(InputEvent::Key { key_code: 66 })),
    ]);
    let mut pump = EventPumpAdapter::new(started(SimulatedSensors::new()), source);

    let summary = pump.run().unwrap();

    assert_eq!(summary.inputs, 2);
    assert_eq!(summary.inputs_consumed, 1);
    assert_eq!(
        pump.source().finished_inputs(),
        &[
            (InputEvent::Motion { x: 120.0, y: 340.0 }, true),
            (InputEvent::Key { key_code: 66 }, false),
        ]
    );
}

#[test_log::test]
fn it_should_hand_saved_state_to_the_host() {
    let source = ScriptedEventSource::new([motion(7.0, 9.0), command(Command::SaveState)]);
    let mut pump = EventPumpAdapter::new(started(SimulatedSensors::new()), source);

    pump.run().unwrap();

    let saved = pump.source().saved_states();
    assert_eq!(saved.len(), 1);
    let restored = Snapshot::from_bytes(&saved[0]).unwrap();
    assert_eq!((restored.last_x, restored.last_y), (7, 9));
}

#[test_log::test]
fn it_should_exit_on_shutdown_after_releasing_the_surface() {
    let source = ScriptedEventSource::new([
        command(Command::WindowAvailable(Some(WINDOW))),
        command(Command::Shutdown),
        command(Command::FocusGained),
    ]);
    let mut pump = EventPumpAdapter::new(started(SimulatedSensors::new()), source);

    pump.run().unwrap();

    let (controller, source) = pump.into_parts();
    assert_eq!(source.remaining(), 1);
    assert_eq!(controller.phase(), Phase::Terminated);
    assert_eq!(controller.surface().driver().count("close_display"), 1);
    assert!(!controller.surface().driver().holds_resources());
}

#[test_log::test]
fn it_should_stop_mid_iteration_when_destroy_is_requested() {
    let source = ScriptedEventSource::new([
        command(Command::WindowAvailable(Some(WINDOW))),
        ScriptStep::Destroy,
        motion(1.0, 2.0),
        command(Command::FocusGained),
    ]);
    let mut pump = EventPumpAdapter::new(started(SimulatedSensors::new()), source);

    let summary = pump.run().unwrap();

    assert_eq!(summary.inputs, 1);
    assert_eq!(pump.source().remaining(), 1);
    assert!(pump.controller().is_terminated());
    assert!(!pump.controller().surface().driver().holds_resources());
    assert_eq!(
        pump.controller().surface().driver().count("close_display"),
        1
    );
}

#[test_log::test]
fn it_should_drain_sensor_samples_when_the_queue_is_ready() {
    let sensors = SimulatedSensors::new();
    let feed = sensors.feed();
    let controller = {
        let mut controller = started(sensors);
        controller.handle_command(Command::FocusGained);
        controller
    };
    for i in 0..4 {
        feed.send(SensorSample {
            x: 0.1 * i as f32,
            y: 0.0,
            z: 9.8,
            timestamp_ns: i,
        });
    }
    let source = ScriptedEventSource::new([ScriptStep::Event(PumpEvent::SensorReady)]);
    let mut pump = EventPumpAdapter::new(controller, source);

    let summary = pump.run().unwrap();

    assert_eq!(summary.sensor_samples, 4);
    assert!(pump.controller().last_sample().is_some());
}

#[test_log::test]
fn it_should_run_against_a_host_on_another_thread() {
    let (tx, source) = ChannelEventSource::channel();
    let mut pump = EventPumpAdapter::new(started(SimulatedSensors::new()), source);

    let host = thread::spawn(move || {
        let events = [
            PumpEvent::Command(Command::WindowAvailable(Some(WINDOW))),
            PumpEvent::Command(Command::FocusGained),
            PumpEvent::Input(InputEvent::Motion { x: 30.0, y: 40.0 }),
            PumpEvent::Command(Command::FocusLost),
            PumpEvent::Command(Command::SaveState),
            PumpEvent::Command(Command::WindowDestroyed),
        ];
        for event in events {
            tx.send(event).unwrap();
        }
        // Dropping the sender ends the session.
    });

    let summary = pump.run().unwrap();
    host.join().unwrap();

    assert_eq!(summary.commands, 5);
    assert!(pump.controller().is_terminated());
    let saved = pump.source().saved_states();
    assert_eq!(saved.len(), 1);
    assert_eq!(Snapshot::from_bytes(&saved[0]).unwrap().last_x, 30);
}
