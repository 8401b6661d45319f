// src/sensor/mod.rs
//
// Motion sensor access: the backend abstraction, the host bridge used to
// scope the sensor manager, and the focus-driven subscription channel.

pub mod backend;
pub mod bridge;
pub mod channel;
pub mod simulated;

pub use backend::{SensorBackend, SensorError, SensorId, SensorKind, SensorSample};
pub use bridge::{BridgeError, HostBridge, StaticHostBridge};
pub use channel::{event_period, Drain, SensorChannel};
pub use simulated::{SensorFeed, SimulatedSensors};

#[cfg(test)]
mod tests;
