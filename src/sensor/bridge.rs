// src/sensor/bridge.rs
//
// The runtime bridge to the hosting environment. Package-scoped sensor
// managers need the host's package name, which only the host can supply.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("host runtime bridge is unavailable")]
    Unavailable,
}

pub trait HostBridge {
    /// The package name of the hosting application.
    fn package_name(&self) -> Result<String, BridgeError>;
}

/// A bridge that reports a fixed package name, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticHostBridge {
    package_name: Option<String>,
}

impl StaticHostBridge {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: Some(package_name.into()),
        }
    }

    /// A bridge whose every call fails as unavailable.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl HostBridge for StaticHostBridge {
    fn package_name(&self) -> Result<String, BridgeError> {
        self.package_name.clone().ok_or(BridgeError::Unavailable)
    }
}
