//! Startup configuration records and their validation errors.
//!
//! Parsing the stored representation is the adapter's job; the core consumes
//! these borrowed records exactly once at startup and never reconfigures at
//! runtime.

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// One MQTT-bound switch row.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct SwitchConfig<'a> {
    pub display_name: &'a str,
    /// Topic commands are published on.
    pub command_topic: &'a str,
    /// Topic the device reports its state on.
    pub state_topic: &'a str,
}

/// One gauge bar.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct GaugeConfig<'a> {
    pub display_name: &'a str,
    /// Initial fill fraction in `[0, 1]`.
    pub percentage: f32,
    pub filled: bool,
}

/// Root wiring record assembled by the adapter. The leaf records are the
/// serializable unit; this struct just borrows them.
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig<'a> {
    pub switches: &'a [SwitchConfig<'a>],
    pub gauges: &'a [GaugeConfig<'a>],
}

/// Fatal startup errors, raised before any rendering begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration contains no items")]
    Empty,
    #[error("configuration exceeds the fixed item capacity")]
    CapacityExceeded,
}
