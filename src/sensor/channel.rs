// src/sensor/channel.rs
//! SensorChannel - the focus-driven accelerometer subscription.

use crate::sensor::backend::{
    ManagerId, QueueId, SensorBackend, SensorId, SensorKind, SensorSample,
};
use crate::sensor::bridge::HostBridge;
use log::{debug, info, warn};
use std::time::Duration;

/// Delivery period for a target rate: `(1000 / hz) * 1000` microseconds,
/// in integer arithmetic (60 Hz maps to 16 000 µs).
pub fn event_period(rate_hz: u32) -> Duration {
    let millis = 1000 / rate_hz.max(1);
    Duration::from_micros(u64::from(millis) * 1000)
}

/// Owns the subscription to the default accelerometer.
///
/// The sensor is resolved once. When no accelerometer exists the channel is
/// permanently degraded and every operation is a no-op.
pub struct SensorChannel<B> {
    backend: B,
    resolved: bool,
    manager: Option<ManagerId>,
    sensor: Option<SensorId>,
    queue: Option<QueueId>,
    enabled: bool,
}

impl<B: SensorBackend> SensorChannel<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            resolved: false,
            manager: None,
            sensor: None,
            queue: None,
            enabled: false,
        }
    }

    /// Looks up the default accelerometer.
    ///
    /// A package-scoped manager is tried first when `bridge` can name the
    /// package, then the global one. Only the first call does any work.
    pub fn resolve(&mut self, bridge: Option<&dyn HostBridge>) -> Option<SensorId> {
        if self.resolved {
            return self.sensor;
        }
        self.resolved = true;

        let Some(manager) = self.resolve_manager(bridge) else {
            warn!("SensorChannel: no sensor manager, accelerometer disabled");
            return None;
        };
        self.manager = Some(manager);

        let Some(sensor) = self
            .backend
            .default_sensor(manager, SensorKind::Accelerometer)
        else {
            warn!("SensorChannel: no accelerometer on this device");
            return None;
        };
        let Some(queue) = self.backend.create_event_queue(manager) else {
            warn!("SensorChannel: unable to create an event queue, accelerometer disabled");
            return None;
        };

        info!("SensorChannel: accelerometer {:?} on {:?}", sensor, queue);
        self.sensor = Some(sensor);
        self.queue = Some(queue);
        Some(sensor)
    }

    fn resolve_manager(&mut self, bridge: Option<&dyn HostBridge>) -> Option<ManagerId> {
        if let Some(bridge) = bridge {
            match bridge.package_name() {
                Ok(package) => match self.backend.manager_for_package(&package) {
                    Some(manager) => {
                        debug!("SensorChannel: package-scoped manager for {}", package);
                        return Some(manager);
                    }
                    None => debug!("SensorChannel: no package-scoped manager for {}", package),
                },
                Err(e) => debug!("SensorChannel: {}, using the global manager", e),
            }
        }
        self.backend.global_manager()
    }

    /// Starts delivery at roughly `rate_hz`. No-op when absent or already enabled.
    pub fn enable(&mut self, rate_hz: u32) {
        let (Some(queue), Some(sensor)) = (self.queue, self.sensor) else {
            return;
        };
        if self.enabled {
            return;
        }
        if let Err(e) = self.backend.enable_sensor(queue, sensor) {
            warn!("SensorChannel: {}", e);
            return;
        }
        self.enabled = true;

        let period = event_period(rate_hz);
        if let Err(e) = self.backend.set_event_rate(queue, sensor, period) {
            warn!("SensorChannel: rate hint of {:?} ignored: {}", period, e);
        }
        debug!("SensorChannel: enabled at {} Hz ({:?})", rate_hz, period);
    }

    /// Stops delivery. No-op when absent or already disabled.
    pub fn disable(&mut self) {
        let (Some(queue), Some(sensor)) = (self.queue, self.sensor) else {
            return;
        };
        if !self.enabled {
            return;
        }
        if let Err(e) = self.backend.disable_sensor(queue, sensor) {
            warn!("SensorChannel: {}", e);
        }
        // Treat the subscription as stopped even if the backend complained.
        self.enabled = false;
        debug!("SensorChannel: disabled");
    }

    /// Yields the samples queued so far without blocking.
    pub fn drain(&mut self) -> Drain<'_, B> {
        Drain {
            backend: &mut self.backend,
            queue: self.queue,
        }
    }

    pub fn is_available(&self) -> bool {
        self.sensor.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn manager(&self) -> Option<ManagerId> {
        self.manager
    }

    pub fn sensor(&self) -> Option<SensorId> {
        self.sensor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Iterator returned by [`SensorChannel::drain`].
pub struct Drain<'a, B> {
    backend: &'a mut B,
    queue: Option<QueueId>,
}

impl<B: SensorBackend> Iterator for Drain<'_, B> {
    type Item = SensorSample;

    fn next(&mut self) -> Option<SensorSample> {
        let queue = self.queue?;
        self.backend.next_sample(queue)
    }
}
