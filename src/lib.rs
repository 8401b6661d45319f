// src/lib.rs

//! Runtime core of a native application shell.
//!
//! The [`lifecycle::LifecycleController`] ties a graphics surface, a motion
//! sensor subscription and a persisted [`snapshot::Snapshot`] to the
//! lifecycle commands delivered by a host event pump. Every external system
//! sits behind a trait so the whole machine runs headless:
//!
//! - [`surface::GraphicsDriver`] for the graphics API,
//! - [`sensor::SensorBackend`] and [`sensor::HostBridge`] for sensors,
//! - [`pump::EventSource`] for the host's event loop.

pub mod config;
pub mod lifecycle;
pub mod pump;
pub mod sensor;
pub mod snapshot;
pub mod surface;

pub use lifecycle::{Command, CommandOutcome, InputEvent, LifecycleController, Phase};
pub use pump::{EventPumpAdapter, EventSource, PumpEvent, WaitMode};
pub use snapshot::{SavedState, Snapshot, SNAPSHOT_LEN};
