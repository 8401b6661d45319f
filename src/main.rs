// src/main.rs

//! Headless demo host for the native activity core.
//!
//! The controller runs on the main thread behind the event pump, while a host
//! thread plays a short session: window, focus, a drag gesture with
//! accelerometer samples, a save request and teardown. A second controller is
//! then restored from the saved blob.

use native_activity::{
    config::CONFIG,
    lifecycle::{Command, InputEvent, LifecycleController},
    pump::{ChannelEventSource, EventPumpAdapter, PumpEvent},
    sensor::{SensorFeed, SensorSample, SimulatedSensors, StaticHostBridge},
    surface::{HeadlessGraphicsDriver, NativeWindow},
};

use anyhow::{ensure, Context};
// Logging
use log::{info, warn};
use std::sync::mpsc::{SendError, Sender};
use std::thread;
use std::time::Duration;

const SURFACE_WIDTH_PX: i32 = 1080;
const SURFACE_HEIGHT_PX: i32 = 1920;
const WINDOW: NativeWindow = NativeWindow(0x1);
const GESTURE_STEPS: u32 = 30;

fn main() -> anyhow::Result<()> {
    // Initialize the logger. The default filter comes from the config if RUST_LOG is not set.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(CONFIG.logging.default_filter.as_str()),
    )
    .format_timestamp_micros()
    .init();

    info!("Starting native-activity...");
    info!("Configuration: {:?}", *CONFIG);

    let bridge = StaticHostBridge::new(CONFIG.host.package_name.clone());
    let interval = Duration::from_millis(CONFIG.host.frame_interval_ms);

    // --- First activity instance ---
    let sensors = SimulatedSensors::new();
    let feed = sensors.feed();
    let mut controller = LifecycleController::new(
        HeadlessGraphicsDriver::new(SURFACE_WIDTH_PX, SURFACE_HEIGHT_PX),
        sensors,
        &CONFIG,
    );
    controller.init(Some(&bridge), None);

    let (events, source) = ChannelEventSource::channel();
    let host = thread::Builder::new()
        .name("host".to_string())
        .spawn(move || {
            if let Err(e) = play_session(&events, &feed, interval) {
                warn!("Host: pump went away early: {}", e);
            }
            // Dropping `events` asks the pump to terminate.
        })
        .context("Failed to spawn host thread")?;

    info!("Starting event pump...");
    let mut pump = EventPumpAdapter::new(controller, source);
    let summary = pump.run().context("Event pump failed")?;
    host.join().map_err(|_| anyhow::anyhow!("host thread panicked"))?;
    info!("Session finished: {:?}", summary);

    let (controller, source) = pump.into_parts();
    let saved = source
        .saved_states()
        .last()
        .copied()
        .context("Host session ended without a saved state")?;
    info!(
        "Frames presented: {}, saved state: {:02x?}",
        controller.surface().driver().frames().len(),
        saved
    );

    // --- Second activity instance, restored from the saved blob ---
    let mut restored = LifecycleController::new(
        HeadlessGraphicsDriver::new(SURFACE_WIDTH_PX, SURFACE_HEIGHT_PX),
        SimulatedSensors::new(),
        &CONFIG,
    );
    restored.init(Some(&bridge), Some(&saved));
    ensure!(
        restored.snapshot() == controller.snapshot(),
        "restored snapshot {:?} differs from {:?}",
        restored.snapshot(),
        controller.snapshot()
    );
    restored.handle_command(Command::WindowAvailable(Some(WINDOW)));
    restored.handle_command(Command::Shutdown);
    info!("Restored {:?} and shut down cleanly.", restored.snapshot());

    info!("native-activity exited successfully.");
    Ok(())
}

/// Plays the scripted host side of one activity session.
fn play_session(
    events: &Sender<PumpEvent>,
    feed: &SensorFeed,
    interval: Duration,
) -> Result<(), SendError<PumpEvent>> {
    events.send(PumpEvent::Command(Command::WindowAvailable(Some(WINDOW))))?;
    events.send(PumpEvent::Command(Command::FocusGained))?;
    thread::sleep(interval);

    for step in 0..GESTURE_STEPS {
        let t = step as f32;
        events.send(PumpEvent::Input(InputEvent::Motion {
            x: 100.0 + 25.0 * t,
            y: 300.0 + 40.0 * t,
        }))?;

        let sample = SensorSample {
            x: 0.05 * t,
            y: 9.81,
            z: 0.3,
            timestamp_ns: i64::from(step) * interval.as_nanos() as i64,
        };
        if feed.send(sample) {
            events.send(PumpEvent::SensorReady)?;
        }
        thread::sleep(interval);
    }

    events.send(PumpEvent::Input(InputEvent::Key { key_code: 4 }))?;
    // Focus goes first so no tick lands between the save and teardown.
    events.send(PumpEvent::Command(Command::FocusLost))?;
    events.send(PumpEvent::Command(Command::SaveState))?;
    events.send(PumpEvent::Command(Command::WindowDestroyed))?;
    Ok(())
}
