// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::config::DefaultHandler;
use crate::error::ConfigError;
use crate::layer::LogwireConfigLayer;

/// Default location of the configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/logwire/logwire.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<LogwireConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<LogwireConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(LogwireConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<LogwireConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(LogwireConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: LogwireConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `LOGWIRE_<FIELD>`. Lists are comma separated. Ignore rules are
/// file-only.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<LogwireConfigLayer, ConfigError> {
		debug!("loading environment variables");
		load_layer_with(|name| std::env::var(name).ok())
	}
}

/// Builds a layer from a variable lookup.
pub(crate) fn load_layer_with<F>(lookup: F) -> Result<LogwireConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

	let default_handler = var("LOGWIRE_DEFAULT_HANDLER")
		.map(|v| v.parse::<DefaultHandler>())
		.transpose()?;

	let buffer_capacity = match var("LOGWIRE_BUFFER_CAPACITY") {
		Some(v) => Some(v.trim().parse().map_err(|_| ConfigError::InvalidValue {
			key: "LOGWIRE_BUFFER_CAPACITY".to_string(),
			message: format!("invalid usize value '{v}'"),
		})?),
		None => None,
	};

	Ok(LogwireConfigLayer {
		enabled: var("LOGWIRE_ENABLED").map(|v| parse_bool(&v)),
		default_channel: var("LOGWIRE_DEFAULT_CHANNEL"),
		channels: var("LOGWIRE_CHANNELS").map(|v| split_list(&v)),
		min_level: var("LOGWIRE_MIN_LEVEL"),
		default_handler,
		buffer_capacity,
		masked_keys: var("LOGWIRE_MASKED_KEYS").map(|v| split_list(&v)),
		ignore: None,
	})
}

fn parse_bool(value: &str) -> bool {
	let value = value.trim();
	value.eq_ignore_ascii_case("true") || value == "1"
}

fn split_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
		.collect()
}
