// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for logwire.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of channel names, level names and ignore patterns
//! - Consistent environment variable naming (`LOGWIRE_*`)
//!
//! # Usage
//!
//! ```ignore
//! use logwire_config::load_config;
//!
//! let config = load_config()?;
//! println!("default channel: {}", config.default_channel);
//! ```

pub mod config;
pub mod error;
pub mod layer;
pub mod sources;

pub use config::{DefaultHandler, IgnoreRuleConfig, LogwireConfig, DEFAULT_BUFFER_CAPACITY};
pub use error::{ConfigError, Result};
pub use layer::{IgnoreRuleLayer, LevelSetting, LogwireConfigLayer};
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use tracing::{debug, info};

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`LOGWIRE_*`)
/// 2. Config file (`/etc/logwire/logwire.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<LogwireConfig> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<std::path::PathBuf>) -> Result<LogwireConfig> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<LogwireConfig> {
	let mut merged = LogwireConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Merges the given sources in precedence order and finalizes the result.
pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<LogwireConfig> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = LogwireConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

fn finalize(layer: LogwireConfigLayer) -> Result<LogwireConfig> {
	let config = layer.finalize()?;

	info!(
		enabled = config.enabled,
		default_channel = %config.default_channel,
		extra_channels = config.channels.len(),
		min_level = %config.min_level,
		default_handler = %config.default_handler,
		buffer_capacity = config.buffer_capacity,
		ignore_rules = config.ignore.len(),
		"logwire configuration loaded"
	);

	Ok(config)
}
