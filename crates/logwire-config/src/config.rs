// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolved configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use logwire_core::{ChannelName, LogLevel};

use crate::error::ConfigError;

pub const DEFAULT_BUFFER_CAPACITY: usize = 10_000;

/// Destination installed on every channel when nothing else is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefaultHandler {
	/// Text lines on standard error.
	#[default]
	Stderr,
	/// Forward into the host's `tracing` subscriber.
	Tracing,
	/// No default destination.
	None,
}

impl FromStr for DefaultHandler {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"stderr" => Ok(DefaultHandler::Stderr),
			"tracing" => Ok(DefaultHandler::Tracing),
			"none" | "off" => Ok(DefaultHandler::None),
			other => Err(ConfigError::InvalidValue {
				key: "default_handler".to_string(),
				message: format!("unknown handler '{other}' (expected stderr, tracing or none)"),
			}),
		}
	}
}

impl fmt::Display for DefaultHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			DefaultHandler::Stderr => "stderr",
			DefaultHandler::Tracing => "tracing",
			DefaultHandler::None => "none",
		};
		f.write_str(name)
	}
}

/// A validated ignore rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreRuleConfig {
	/// Regular expression matched against the message text.
	pub pattern: String,
	/// Only entries at or below this level are ignored.
	pub threshold: Option<i32>,
	/// Only entries on these channels are ignored.
	pub channels: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogwireConfig {
	pub enabled: bool,
	pub default_channel: ChannelName,
	/// Channels registered on top of the built-in ones.
	pub channels: Vec<ChannelName>,
	/// Entries below this level are not delivered.
	pub min_level: LogLevel,
	pub default_handler: DefaultHandler,
	/// Capacity of the in-memory handler.
	pub buffer_capacity: usize,
	/// Keys masked on top of the built-in list.
	pub masked_keys: Vec<String>,
	pub ignore: Vec<IgnoreRuleConfig>,
}

impl Default for LogwireConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			default_channel: ChannelName::default(),
			channels: Vec::new(),
			min_level: LogLevel::Debug,
			default_handler: DefaultHandler::default(),
			buffer_capacity: DEFAULT_BUFFER_CAPACITY,
			masked_keys: Vec::new(),
			ignore: Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_handler_parsing() {
		assert_eq!("stderr".parse::<DefaultHandler>().unwrap(), DefaultHandler::Stderr);
		assert_eq!(" Tracing ".parse::<DefaultHandler>().unwrap(), DefaultHandler::Tracing);
		assert_eq!("off".parse::<DefaultHandler>().unwrap(), DefaultHandler::None);
		assert!("syslog".parse::<DefaultHandler>().is_err());
	}

	#[test]
	fn defaults() {
		let config = LogwireConfig::default();
		assert!(config.enabled);
		assert_eq!(config.default_channel.as_str(), "DEBUG");
		assert_eq!(config.min_level, LogLevel::Debug);
		assert_eq!(config.buffer_capacity, 10_000);
		assert!(config.ignore.is_empty());
	}
}
