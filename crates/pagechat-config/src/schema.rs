//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Vendor driven when the caller does not pick one.
    #[serde(default = "default_vendor")]
    pub default_vendor: String,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub cdp: CdpConfig,

    /// Per-vendor profile overrides, keyed by vendor id.
    #[serde(default)]
    pub vendors: HashMap<String, VendorOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_vendor: default_vendor(),
            engine: EngineConfig::default(),
            cdp: CdpConfig::default(),
            vendors: HashMap::new(),
        }
    }
}

fn default_vendor() -> String {
    "duckduckgo".to_string()
}

/// Turn engine timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause between two readiness probes.
    #[serde(default = "default_readiness_interval")]
    pub readiness_interval_secs: u64,

    /// How long a single readiness probe may wait for the marker.
    #[serde(default = "default_readiness_probe_timeout")]
    pub readiness_probe_timeout_secs: u64,

    /// Upper bound for the whole readiness wait. Absent means wait forever,
    /// which leaves room for a manual login or captcha.
    #[serde(default)]
    pub readiness_deadline_secs: Option<u64>,

    /// Interval of the bounded element waits.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Pause after pasting the prompt, before looking for the submit control.
    #[serde(default = "default_paste_settle")]
    pub paste_settle_ms: u64,
}

impl EngineConfig {
    pub fn readiness_interval(&self) -> Duration {
        Duration::from_secs(self.readiness_interval_secs)
    }

    pub fn readiness_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_probe_timeout_secs)
    }

    pub fn readiness_deadline(&self) -> Option<Duration> {
        self.readiness_deadline_secs.map(Duration::from_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn paste_settle(&self) -> Duration {
        Duration::from_millis(self.paste_settle_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            readiness_interval_secs: default_readiness_interval(),
            readiness_probe_timeout_secs: default_readiness_probe_timeout(),
            readiness_deadline_secs: None,
            poll_interval_ms: default_poll_interval(),
            paste_settle_ms: default_paste_settle(),
        }
    }
}

fn default_readiness_interval() -> u64 {
    5
}

fn default_readiness_probe_timeout() -> u64 {
    5
}

fn default_poll_interval() -> u64 {
    250
}

fn default_paste_settle() -> u64 {
    500
}

/// Chrome DevTools endpoint of an already running browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdpConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9222".to_string()
}

/// Overrides applied on top of a built-in vendor profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorOverride {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub submit_timeout_secs: Option<u64>,

    #[serde(default)]
    pub completion_timeout_secs: Option<u64>,

    #[serde(default)]
    pub dwell_ms: Option<u64>,
}
