//! Process-level runtime configuration (§4.M).
//!
//! A plain struct loaded from environment variables, in the shape the
//! teacher's `pictorus-internal::utils::PictorusVars` uses, rather than
//! pulling in a configuration-framework crate for four knobs.

use std::path::PathBuf;

/// Default floor for `timer::arm`'s requested interval, in milliseconds.
/// Below this, a block's re-execution request is clamped up to it rather
/// than armed as asked — the scheduler has no obligation to chase
/// intervals finer than its own granularity.
pub const DEFAULT_MIN_TICK_MS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Path to the persisted block-definition file.
    pub config_path: PathBuf,
    /// Minimum level the installed logger should emit.
    pub log_level: log::LevelFilter,
    /// Minimum resolution the timer scheduler re-arms at; any requested
    /// `execute_interval` below this is clamped up to it (§4.F, §4.M).
    pub min_tick_ms: u64,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let config_path = std::env::var("FB_CONFIG_PATH")
            .unwrap_or_else(|_| "fb-config.json".to_string())
            .into();
        let log_level = std::env::var("FB_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(log::LevelFilter::Info);
        let min_tick_ms = std::env::var("FB_MIN_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MIN_TICK_MS);
        Self {
            config_path,
            log_level,
            min_tick_ms,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            config_path: "fb-config.json".into(),
            log_level: log::LevelFilter::Info,
            min_tick_ms: DEFAULT_MIN_TICK_MS,
        }
    }
}
