// src/pump/mod.rs
//! The host event pump.
//!
//! `EventPumpAdapter` owns the controller and translates host events into
//! controller calls. It blocks on the source while idle and polls while
//! animating, ticking the controller whenever the source runs dry.

pub mod sources;

use crate::lifecycle::{Command, CommandOutcome, InputEvent, LifecycleController, Phase};
use crate::sensor::SensorBackend;
use crate::snapshot::SavedState;
use crate::surface::GraphicsDriver;
use anyhow::{ensure, Result};
use log::{debug, info, trace};

pub use sources::{ChannelEventSource, ScriptStep, ScriptedEventSource};

/// How the source should wait when nothing is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Wait until an event arrives or the source closes.
    Block,
    /// Return immediately.
    Poll,
}

impl WaitMode {
    pub fn for_animating(animating: bool) -> Self {
        if animating {
            WaitMode::Poll
        } else {
            WaitMode::Block
        }
    }
}

/// Everything the host can deliver to the pump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PumpEvent {
    Command(Command),
    Input(InputEvent),
    /// The sensor queue has samples to drain.
    SensorReady,
}

/// The host side of the event loop.
pub trait EventSource {
    /// Returns the next event.
    ///
    /// Under [`WaitMode::Block`] this returns `None` only once the source is
    /// closed. Under [`WaitMode::Poll`] it also returns `None` when nothing
    /// is ready.
    fn next_event(&mut self, wait: WaitMode) -> Option<PumpEvent>;

    /// True once the host has asked the activity to terminate.
    fn destroy_requested(&self) -> bool;

    /// Receives the result of an input event.
    fn finish_input(&mut self, event: &InputEvent, consumed: bool);

    /// Receives a saved-state blob to persist.
    fn save_state(&mut self, blob: SavedState);
}

/// Counters collected over one run of the pump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands: usize,
    pub inputs: usize,
    pub inputs_consumed: usize,
    pub sensor_samples: usize,
    pub ticks: usize,
}

pub struct EventPumpAdapter<G, S, E> {
    controller: LifecycleController<G, S>,
    source: E,
    summary: RunSummary,
}

impl<G, S, E> EventPumpAdapter<G, S, E>
where
    G: GraphicsDriver,
    S: SensorBackend,
    E: EventSource,
{
    pub fn new(controller: LifecycleController<G, S>, source: E) -> Self {
        Self {
            controller,
            source,
            summary: RunSummary::default(),
        }
    }

    /// Runs until the host requests termination or closes the source.
    ///
    /// The surface is always released before this returns.
    pub fn run(&mut self) -> Result<RunSummary> {
        ensure!(
            self.controller.phase() != Phase::Created,
            "controller must be initialized before the event pump runs"
        );
        info!("EventPump: starting");

        loop {
            loop {
                let wait = WaitMode::for_animating(self.controller.is_animating());
                let Some(event) = self.source.next_event(wait) else {
                    if wait == WaitMode::Block {
                        debug!("EventPump: source closed");
                        return Ok(self.finish());
                    }
                    break;
                };

                if self.dispatch(event) {
                    return Ok(self.finish());
                }
                if self.source.destroy_requested() {
                    info!("EventPump: destroy requested");
                    return Ok(self.finish());
                }
            }

            if self.source.destroy_requested() {
                info!("EventPump: destroy requested");
                return Ok(self.finish());
            }

            if self.controller.tick() {
                self.summary.ticks += 1;
            }
        }
    }

    pub fn controller(&self) -> &LifecycleController<G, S> {
        &self.controller
    }

    pub fn source(&self) -> &E {
        &self.source
    }

    pub fn into_parts(self) -> (LifecycleController<G, S>, E) {
        (self.controller, self.source)
    }

    /// Returns true when the controller has terminated.
    fn dispatch(&mut self, event: PumpEvent) -> bool {
        trace!("EventPump: {:?}", event);
        match event {
            PumpEvent::Command(command) => {
                self.summary.commands += 1;
                match self.controller.handle_command(command) {
                    CommandOutcome::StateSaved(blob) => self.source.save_state(blob),
                    CommandOutcome::Terminated => return true,
                    CommandOutcome::Handled | CommandOutcome::Ignored => {}
                }
            }
            PumpEvent::Input(input) => {
                self.summary.inputs += 1;
                let consumed = self.controller.handle_input(&input);
                if consumed {
                    self.summary.inputs_consumed += 1;
                }
                self.source.finish_input(&input, consumed);
            }
            PumpEvent::SensorReady => {
                self.summary.sensor_samples += self.controller.process_sensor_events();
            }
        }
        false
    }

    fn finish(&mut self) -> RunSummary {
        // No-op when the controller already terminated.
        self.controller.handle_command(Command::Shutdown);
        info!("EventPump: stopped after {:?}", self.summary);
        self.summary
    }
}

#[cfg(test)]
mod tests;
