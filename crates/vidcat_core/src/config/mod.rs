//! Configuration management for vidcat.
//!
//! - TOML settings with one table per concern
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates that leave other tables untouched
//!
//! # Example
//!
//! ```no_run
//! use vidcat_core::config::{ConfigManager, ConfigSection};
//! use vidcat_core::models::OverlayMode;
//!
//! let mut config = ConfigManager::new("/home/me/.config/vidcat/settings.toml");
//! config.load_or_create().unwrap();
//!
//! config.settings_mut().timestamps.overlay = OverlayMode::Hard;
//! config.update_section(ConfigSection::Timestamps).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, DiscoverySettings, EncodeSettings, LoggingSettings, PathSettings,
    PublishSettings, Settings, TimestampSettings, ToolSettings,
};
