// src/sensor/simulated.rs
//! In-memory sensor backend fed through a channel.
//!
//! Samples are pushed through a [`SensorFeed`], which may live on another
//! thread. Samples sent while the accelerometer is disabled are dropped, the
//! way a real sensor simply does not report.

use crate::sensor::backend::{
    ManagerId, QueueId, SensorBackend, SensorError, SensorId, SensorKind, SensorSample,
};
use log::trace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

const PACKAGE_MANAGER: ManagerId = ManagerId(1);
const GLOBAL_MANAGER: ManagerId = ManagerId(2);
const ACCELEROMETER: SensorId = SensorId(1);
const QUEUE: QueueId = QueueId(1);

/// Sending half of a [`SimulatedSensors`] backend.
#[derive(Clone)]
pub struct SensorFeed {
    tx: Sender<SensorSample>,
    enabled: Arc<AtomicBool>,
}

impl SensorFeed {
    /// Queues `sample` if the sensor is enabled. Returns whether it was queued.
    pub fn send(&self, sample: SensorSample) -> bool {
        if !self.enabled.load(Ordering::Acquire) {
            trace!("SensorFeed: dropping sample, sensor disabled");
            return false;
        }
        self.tx.send(sample).is_ok()
    }
}

pub struct SimulatedSensors {
    package_scoped: bool,
    global: bool,
    accelerometer: bool,
    tx: Sender<SensorSample>,
    rx: Receiver<SensorSample>,
    enabled: Arc<AtomicBool>,
    period: Option<Duration>,
    enable_calls: usize,
    disable_calls: usize,
    manager_lookups: Vec<String>,
}

impl Default for SimulatedSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSensors {
    /// A device with both manager kinds and an accelerometer.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            package_scoped: true,
            global: true,
            accelerometer: true,
            tx,
            rx,
            enabled: Arc::new(AtomicBool::new(false)),
            period: None,
            enable_calls: 0,
            disable_calls: 0,
            manager_lookups: Vec::new(),
        }
    }

    pub fn without_package_manager(mut self) -> Self {
        self.package_scoped = false;
        self
    }

    pub fn without_global_manager(mut self) -> Self {
        self.global = false;
        self
    }

    pub fn without_accelerometer(mut self) -> Self {
        self.accelerometer = false;
        self
    }

    pub fn feed(&self) -> SensorFeed {
        SensorFeed {
            tx: self.tx.clone(),
            enabled: Arc::clone(&self.enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// The delivery period most recently requested.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    pub fn enable_calls(&self) -> usize {
        self.enable_calls
    }

    pub fn disable_calls(&self) -> usize {
        self.disable_calls
    }

    /// Manager lookups in order, as `package:<name>` or `global`.
    pub fn manager_lookups(&self) -> &[String] {
        &self.manager_lookups
    }
}

impl SensorBackend for SimulatedSensors {
    fn manager_for_package(&mut self, package: &str) -> Option<ManagerId> {
        self.manager_lookups.push(format!("package:{}", package));
        self.package_scoped.then_some(PACKAGE_MANAGER)
    }

    fn global_manager(&mut self) -> Option<ManagerId> {
        self.manager_lookups.push("global".to_string());
        self.global.then_some(GLOBAL_MANAGER)
    }

    fn default_sensor(&mut self, _manager: ManagerId, kind: SensorKind) -> Option<SensorId> {
        match kind {
            SensorKind::Accelerometer => self.accelerometer.then_some(ACCELEROMETER),
        }
    }

    fn create_event_queue(&mut self, _manager: ManagerId) -> Option<QueueId> {
        Some(QUEUE)
    }

    fn enable_sensor(&mut self, queue: QueueId, sensor: SensorId) -> Result<(), SensorError> {
        if queue != QUEUE || sensor != ACCELEROMETER {
            return Err(SensorError::Rejected {
                operation: "enable_sensor",
                reason: format!("unknown {:?}/{:?}", queue, sensor),
            });
        }
        self.enable_calls += 1;
        self.enabled.store(true, Ordering::Release);
        Ok(())
    }

    fn set_event_rate(
        &mut self,
        _queue: QueueId,
        _sensor: SensorId,
        period: Duration,
    ) -> Result<(), SensorError> {
        self.period = Some(period);
        Ok(())
    }

    fn disable_sensor(&mut self, _queue: QueueId, _sensor: SensorId) -> Result<(), SensorError> {
        self.disable_calls += 1;
        self.enabled.store(false, Ordering::Release);
        Ok(())
    }

    fn next_sample(&mut self, _queue: QueueId) -> Option<SensorSample> {
        self.rx.try_recv().ok()
    }
}
