// src/lifecycle/controller.rs
//! The lifecycle state machine.
//!
//! `LifecycleController` owns the surface context, the sensor channel and the
//! snapshot, and applies host commands to them in a fixed order. It is driven
//! from a single thread and holds no locks.

use crate::config::Config;
use crate::lifecycle::events::{Command, CommandOutcome, InputEvent};
use crate::sensor::{HostBridge, SensorBackend, SensorChannel, SensorSample};
use crate::snapshot::Snapshot;
use crate::surface::{GraphicsDriver, NativeWindow, SurfaceContext};
use log::{debug, info, warn};

/// Coarse lifecycle phase.
///
/// `Created → WindowAbsent ⇄ WindowLive → ShuttingDown → Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `init` not yet called.
    Created,
    /// Running without a live surface.
    WindowAbsent,
    /// Running with a live surface.
    WindowLive,
    /// Releasing resources after a shutdown command.
    ShuttingDown,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Focused,
    #[default]
    Unfocused,
}

pub struct LifecycleController<G, S> {
    phase: Phase,
    focus: Focus,
    animating: bool,
    snapshot: Snapshot,
    surface: SurfaceContext<G>,
    sensors: SensorChannel<S>,
    sensor_rate_hz: u32,
    angle_step: f32,
    last_sample: Option<SensorSample>,
}

impl<G: GraphicsDriver, S: SensorBackend> LifecycleController<G, S> {
    /// Creates a controller in [`Phase::Created`]. Nothing is acquired until
    /// [`init`](Self::init) and the first window command.
    pub fn new(graphics: G, sensors: S, config: &Config) -> Self {
        Self {
            phase: Phase::Created,
            focus: Focus::Unfocused,
            animating: false,
            snapshot: Snapshot::default(),
            surface: SurfaceContext::new(graphics, config.surface.clone()),
            sensors: SensorChannel::new(sensors),
            sensor_rate_hz: config.sensor.target_rate_hz,
            angle_step: config.animation.angle_step,
            last_sample: None,
        }
    }

    /// Resolves the accelerometer and restores the snapshot from `saved`.
    ///
    /// A blob of the wrong size is discarded with a warning and the snapshot
    /// starts zeroed. Only the first call has any effect.
    pub fn init(&mut self, bridge: Option<&dyn HostBridge>, saved: Option<&[u8]>) {
        if self.phase != Phase::Created {
            warn!("Controller: init called again in {:?}, ignoring", self.phase);
            return;
        }

        if self.sensors.resolve(bridge).is_none() {
            info!("Controller: running without an accelerometer");
        }

        self.snapshot = match saved {
            Some(blob) => match Snapshot::from_bytes(blob) {
                Ok(snapshot) => {
                    info!("Controller: restored {:?}", snapshot);
                    snapshot
                }
                Err(e) => {
                    warn!("Controller: discarding saved state: {}", e);
                    Snapshot::default()
                }
            },
            None => Snapshot::default(),
        };

        self.transition(Phase::WindowAbsent);
    }

    /// Applies a lifecycle command.
    pub fn handle_command(&mut self, command: Command) -> CommandOutcome {
        debug!("Controller: {:?} in {:?}", command, self.phase);

        match (self.phase, command) {
            (_, Command::SaveState) => CommandOutcome::StateSaved(self.snapshot.to_bytes()),
            (Phase::Terminated, Command::Shutdown) => CommandOutcome::Terminated,
            (_, Command::Shutdown) => {
                self.shutdown();
                CommandOutcome::Terminated
            }
            (Phase::Created | Phase::ShuttingDown | Phase::Terminated, command) => {
                debug!("Controller: {:?} does not apply in {:?}", command, self.phase);
                CommandOutcome::Ignored
            }
            (_, Command::WindowAvailable(None)) => {
                debug!("Controller: window available without a handle");
                CommandOutcome::Ignored
            }
            (_, Command::WindowAvailable(Some(window))) => {
                self.on_window_available(window);
                CommandOutcome::Handled
            }
            (_, Command::WindowDestroyed) => {
                self.surface.release();
                self.animating = false;
                self.transition(Phase::WindowAbsent);
                CommandOutcome::Handled
            }
            (_, Command::FocusGained) => {
                self.focus = Focus::Focused;
                self.sensors.enable(self.sensor_rate_hz);
                CommandOutcome::Handled
            }
            (_, Command::FocusLost) => {
                self.focus = Focus::Unfocused;
                self.sensors.disable();
                self.animating = false;
                // Leave the last frame showing the idle state.
                self.present();
                CommandOutcome::Handled
            }
        }
    }

    /// Applies an input event. Returns whether the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.is_running() {
            return false;
        }
        match *event {
            InputEvent::Motion { x, y } => {
                self.animating = true;
                self.snapshot.record_pointer(x, y);
                true
            }
            InputEvent::Key { .. } => false,
        }
    }

    /// Advances the animation by one step and presents the frame.
    ///
    /// Does nothing unless animating. Returns whether a step was taken.
    pub fn tick(&mut self) -> bool {
        if !self.animating {
            return false;
        }
        self.snapshot.advance(self.angle_step);
        self.present();
        true
    }

    /// Drains queued accelerometer samples. Returns how many were read.
    pub fn process_sensor_events(&mut self) -> usize {
        let mut count = 0;
        for sample in self.sensors.drain() {
            info!(
                "accelerometer: x={} y={} z={}",
                sample.x, sample.y, sample.z
            );
            self.last_sample = Some(sample);
            count += 1;
        }
        count
    }

    /// True while the host should poll instead of blocking.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The most recent accelerometer sample, if any was ever drained.
    pub fn last_sample(&self) -> Option<SensorSample> {
        self.last_sample
    }

    pub fn surface(&self) -> &SurfaceContext<G> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut SurfaceContext<G> {
        &mut self.surface
    }

    pub fn sensors(&self) -> &SensorChannel<S> {
        &self.sensors
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    fn is_running(&self) -> bool {
        matches!(self.phase, Phase::WindowAbsent | Phase::WindowLive)
    }

    fn on_window_available(&mut self, window: NativeWindow) {
        match self.surface.acquire(window) {
            Ok(_) => {
                self.transition(Phase::WindowLive);
                self.present();
            }
            Err(e) => {
                warn!(
                    "Controller: surface acquisition failed: {}. Continuing without a surface.",
                    e
                );
                self.transition(Phase::WindowAbsent);
            }
        }
    }

    fn present(&mut self) {
        if let Err(e) = self.surface.present(&self.snapshot) {
            warn!("Controller: present failed: {}", e);
        }
    }

    fn shutdown(&mut self) {
        self.transition(Phase::ShuttingDown);
        self.surface.release();
        self.sensors.disable();
        self.animating = false;
        self.transition(Phase::Terminated);
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            info!("Controller: {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }
}
