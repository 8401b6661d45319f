// src/lifecycle/events.rs
//
// Commands and input events delivered to the lifecycle controller by the
// host event pump.

use crate::snapshot::SavedState;
use crate::surface::NativeWindow;

/// Lifecycle commands from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The native window is ready. `None` when the host reports no handle.
    WindowAvailable(Option<NativeWindow>),
    /// The native window is going away; its surface must be released.
    WindowDestroyed,
    FocusGained,
    FocusLost,
    /// The host wants the persisted state now.
    SaveState,
    /// The host is terminating the activity.
    Shutdown,
}

/// Input events from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch or pointer motion. Coordinates are those of the first pointer.
    Motion { x: f32, y: f32 },
    /// A key event. Never consumed by the controller.
    Key { key_code: i32 },
}

/// What became of a command passed to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    Handled,
    /// The command does not apply in the current phase.
    Ignored,
    /// The snapshot, serialized for the host to persist.
    StateSaved(SavedState),
    /// The controller has released everything; the loop must exit.
    Terminated,
}
