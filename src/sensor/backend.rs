// src/sensor/backend.rs
//
// Defines the `SensorBackend` trait, which abstracts over the platform
// sensor subsystem: managers, sensors and event queues.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManagerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Accelerometer,
}

/// One accelerometer reading, in m/s² per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Event time in nanoseconds, as reported by the backend.
    pub timestamp_ns: i64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SensorError {
    #[error("{operation} rejected by sensor backend: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },
}

/// A trait that defines the interface to the platform sensor subsystem.
///
/// Lookups return `None` when the requested object does not exist; that is
/// never an error. Only requests against an existing queue can fail.
pub trait SensorBackend {
    /// Obtains a manager scoped to `package`, if the platform supports it.
    fn manager_for_package(&mut self, package: &str) -> Option<ManagerId>;

    /// Obtains the process-global manager.
    fn global_manager(&mut self) -> Option<ManagerId>;

    fn default_sensor(&mut self, manager: ManagerId, kind: SensorKind) -> Option<SensorId>;

    fn create_event_queue(&mut self, manager: ManagerId) -> Option<QueueId>;

    fn enable_sensor(&mut self, queue: QueueId, sensor: SensorId) -> Result<(), SensorError>;

    /// Requests delivery every `period`. Best effort.
    fn set_event_rate(
        &mut self,
        queue: QueueId,
        sensor: SensorId,
        period: Duration,
    ) -> Result<(), SensorError>;

    fn disable_sensor(&mut self, queue: QueueId, sensor: SensorId) -> Result<(), SensorError>;

    /// Pops the next queued sample without blocking.
    fn next_sample(&mut self, queue: QueueId) -> Option<SensorSample>;
}

impl<B: SensorBackend + ?Sized> SensorBackend for Box<B> {
    fn manager_for_package(&mut self, package: &str) -> Option<ManagerId> {
        (**self).manager_for_package(package)
    }

    fn global_manager(&mut self) -> Option<ManagerId> {
        (**self).global_manager()
    }

    fn default_sensor(&mut self, manager: ManagerId, kind: SensorKind) -> Option<SensorId> {
        (**self).default_sensor(manager, kind)
    }

    fn create_event_queue(&mut self, manager: ManagerId) -> Option<QueueId> {
        (**self).create_event_queue(manager)
    }

    fn enable_sensor(&mut self, queue: QueueId, sensor: SensorId) -> Result<(), SensorError> {
        (**self).enable_sensor(queue, sensor)
    }

    fn set_event_rate(
        &mut self,
        queue: QueueId,
        sensor: SensorId,
        period: Duration,
    ) -> Result<(), SensorError> {
        (**self).set_event_rate(queue, sensor, period)
    }

    fn disable_sensor(&mut self, queue: QueueId, sensor: SensorId) -> Result<(), SensorError> {
        (**self).disable_sensor(queue, sensor)
    }

    fn next_sample(&mut self, queue: QueueId) -> Option<SensorSample> {
        (**self).next_sample(queue)
    }
}
