// src/pump/sources.rs
//! In-memory event sources.

use crate::lifecycle::InputEvent;
use crate::pump::{EventSource, PumpEvent, WaitMode};
use crate::snapshot::SavedState;
use log::debug;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// An event source fed from another thread through an mpsc channel.
///
/// Dropping every sender counts as a destroy request.
pub struct ChannelEventSource {
    rx: Receiver<PumpEvent>,
    disconnected: bool,
    saved_states: Vec<SavedState>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<PumpEvent>) -> Self {
        Self {
            rx,
            disconnected: false,
            saved_states: Vec::new(),
        }
    }

    /// Creates a connected sender/source pair.
    pub fn channel() -> (Sender<PumpEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }

    /// Every blob handed over by a save request, oldest first.
    pub fn saved_states(&self) -> &[SavedState] {
        &self.saved_states
    }
}

impl EventSource for ChannelEventSource {
    fn next_event(&mut self, wait: WaitMode) -> Option<PumpEvent> {
        if self.disconnected {
            return None;
        }
        let received = match wait {
            WaitMode::Block => self.rx.recv().map_err(|_| TryRecvError::Disconnected),
            WaitMode::Poll => self.rx.try_recv(),
        };
        match received {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                debug!("ChannelEventSource: host disconnected");
                self.disconnected = true;
                None
            }
        }
    }

    fn destroy_requested(&self) -> bool {
        self.disconnected
    }

    fn finish_input(&mut self, _event: &InputEvent, _consumed: bool) {}

    fn save_state(&mut self, blob: SavedState) {
        self.saved_states.push(blob);
    }
}

/// One step of a [`ScriptedEventSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptStep {
    Event(PumpEvent),
    /// Nothing ready. Lets a polling pump tick once; skipped by a blocking wait.
    Idle,
    /// Raises the destroy flag, then continues with the next step.
    Destroy,
}

/// A deterministic event source that replays a fixed script.
///
/// Raises the destroy flag once the script is exhausted, and records what
/// the pump asked of it.
#[derive(Debug, Default)]
pub struct ScriptedEventSource {
    steps: VecDeque<ScriptStep>,
    destroyed: bool,
    waits: Vec<WaitMode>,
    finished_inputs: Vec<(InputEvent, bool)>,
    saved_states: Vec<SavedState>,
}

impl ScriptedEventSource {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// The wait mode of every `next_event` call, in order.
    pub fn waits(&self) -> &[WaitMode] {
        &self.waits
    }

    pub fn finished_inputs(&self) -> &[(InputEvent, bool)] {
        &self.finished_inputs
    }

    pub fn saved_states(&self) -> &[SavedState] {
        &self.saved_states
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl EventSource for ScriptedEventSource {
    fn next_event(&mut self, wait: WaitMode) -> Option<PumpEvent> {
        self.waits.push(wait);
        loop {
            match self.steps.pop_front() {
                Some(ScriptStep::Event(event)) => return Some(event),
                Some(ScriptStep::Idle) if wait == WaitMode::Poll => return None,
                Some(ScriptStep::Idle) => continue,
                Some(ScriptStep::Destroy) => self.destroyed = true,
                None => {
                    self.destroyed = true;
                    return None;
                }
            }
        }
    }

    fn destroy_requested(&self) -> bool {
        self.destroyed
    }

    fn finish_input(&mut self, event: &InputEvent, consumed: bool) {
        self.finished_inputs.push((*event, consumed));
    }

    fn save_state(&mut self, blob: SavedState) {
        self.saved_states.push(blob);
    }
}
