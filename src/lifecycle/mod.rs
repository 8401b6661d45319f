// src/lifecycle/mod.rs
//! Lifecycle coordination between the host, the surface and the sensor.

pub mod controller;
pub mod events;

pub use controller::{Focus, LifecycleController, Phase};
pub use events::{Command, CommandOutcome, InputEvent};
