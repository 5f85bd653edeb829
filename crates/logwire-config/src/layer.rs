// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by each source.

use regex::Regex;
use serde::{Deserialize, Serialize};

use logwire_core::{ChannelName, LogLevel};

use crate::config::{DefaultHandler, IgnoreRuleConfig, LogwireConfig, DEFAULT_BUFFER_CAPACITY};
use crate::error::ConfigError;

/// A severity written either as an ordinal (`250`) or a name (`"notice"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSetting {
	Ordinal(i32),
	Name(String),
}

impl LevelSetting {
	pub fn resolve(&self, key: &str) -> Result<i32, ConfigError> {
		match self {
			LevelSetting::Ordinal(ordinal) => Ok(*ordinal),
			LevelSetting::Name(name) => LogLevel::from_name(name)
				.map(|level| level.ordinal())
				.ok_or_else(|| ConfigError::InvalidValue {
					key: key.to_string(),
					message: format!("unknown level '{name}'"),
				}),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IgnoreRuleLayer {
	pub pattern: String,
	pub threshold: Option<LevelSetting>,
	pub channels: Option<Vec<String>>,
}

impl IgnoreRuleLayer {
	fn finalize(self) -> Result<IgnoreRuleConfig, ConfigError> {
		Regex::new(&self.pattern).map_err(|source| ConfigError::InvalidPattern {
			pattern: self.pattern.clone(),
			source,
		})?;

		let threshold = self
			.threshold
			.map(|t| t.resolve("ignore.threshold"))
			.transpose()?;

		Ok(IgnoreRuleConfig {
			pattern: self.pattern,
			threshold,
			channels: self.channels.filter(|channels| !channels.is_empty()),
		})
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogwireConfigLayer {
	pub enabled: Option<bool>,
	pub default_channel: Option<String>,
	pub channels: Option<Vec<String>>,
	pub min_level: Option<String>,
	pub default_handler: Option<DefaultHandler>,
	pub buffer_capacity: Option<usize>,
	pub masked_keys: Option<Vec<String>>,
	pub ignore: Option<Vec<IgnoreRuleLayer>>,
}

impl LogwireConfigLayer {
	/// Overlays `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.default_channel.is_some() {
			self.default_channel = other.default_channel;
		}
		if other.channels.is_some() {
			self.channels = other.channels;
		}
		if other.min_level.is_some() {
			self.min_level = other.min_level;
		}
		if other.default_handler.is_some() {
			self.default_handler = other.default_handler;
		}
		if other.buffer_capacity.is_some() {
			self.buffer_capacity = other.buffer_capacity;
		}
		if other.masked_keys.is_some() {
			self.masked_keys = other.masked_keys;
		}
		if other.ignore.is_some() {
			self.ignore = other.ignore;
		}
	}

	pub fn finalize(self) -> Result<LogwireConfig, ConfigError> {
		let default_channel = match self.default_channel {
			Some(name) => parse_channel("default_channel", &name)?,
			None => ChannelName::default(),
		};

		let channels = self
			.channels
			.unwrap_or_default()
			.iter()
			.map(|name| parse_channel("channels", name))
			.collect::<Result<Vec<_>, _>>()?;

		let min_level = match self.min_level {
			Some(name) => LogLevel::from_name(&name).ok_or_else(|| ConfigError::InvalidValue {
				key: "min_level".to_string(),
				message: format!("unknown level '{name}'"),
			})?,
			None => LogLevel::Debug,
		};

		let buffer_capacity = self.buffer_capacity.unwrap_or(DEFAULT_BUFFER_CAPACITY);
		if buffer_capacity == 0 {
			return Err(ConfigError::Validation(
				"buffer_capacity must be greater than zero".to_string(),
			));
		}

		let ignore = self
			.ignore
			.unwrap_or_default()
			.into_iter()
			.map(IgnoreRuleLayer::finalize)
			.collect::<Result<Vec<_>, _>>()?;

		Ok(LogwireConfig {
			enabled: self.enabled.unwrap_or(true),
			default_channel,
			channels,
			min_level,
			default_handler: self.default_handler.unwrap_or_default(),
			buffer_capacity,
			masked_keys: self
				.masked_keys
				.unwrap_or_default()
				.into_iter()
				.map(|key| key.trim().to_string())
				.filter(|key| !key.is_empty())
				.collect(),
			ignore,
		})
	}
}

fn parse_channel(key: &str, name: &str) -> Result<ChannelName, ConfigError> {
	ChannelName::new(name).map_err(|e| ConfigError::InvalidValue {
		key: key.to_string(),
		message: e.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn merge_prefers_later_layer(a in any::<bool>(), b in proptest::option::of(any::<bool>())) {
			let mut base = LogwireConfigLayer { enabled: Some(a), ..Default::default() };
			base.merge(LogwireConfigLayer { enabled: b, ..Default::default() });
			prop_assert_eq!(base.enabled, Some(b.unwrap_or(a)));
		}

		#[test]
		fn capacity_survives_finalize(capacity in 1usize..1_000_000) {
			let layer = LogwireConfigLayer { buffer_capacity: Some(capacity), ..Default::default() };
			prop_assert_eq!(layer.finalize().unwrap().buffer_capacity, capacity);
		}
	}

	#[test]
	fn empty_layer_finalizes_to_defaults() {
		let config = LogwireConfigLayer::default().finalize().unwrap();
		assert_eq!(config, LogwireConfig::default());
	}

	#[test]
	fn rejects_invalid_default_channel() {
		let layer = LogwireConfigLayer {
			default_channel: Some("not valid".to_string()),
			..Default::default()
		};
		let err = layer.finalize().unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "default_channel"));
	}

	#[test]
	fn rejects_unknown_min_level() {
		let layer = LogwireConfigLayer {
			min_level: Some("loud".to_string()),
			..Default::default()
		};
		assert!(layer.finalize().is_err());
	}

	#[test]
	fn rejects_zero_capacity() {
		let layer = LogwireConfigLayer {
			buffer_capacity: Some(0),
			..Default::default()
		};
		assert!(matches!(layer.finalize(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn ignore_rules_are_validated() {
		let layer = LogwireConfigLayer {
			ignore: Some(vec![IgnoreRuleLayer {
				pattern: "cron job (".to_string(),
				..Default::default()
			}]),
			..Default::default()
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::InvalidPattern { .. })
		));
	}

	#[test]
	fn ignore_threshold_accepts_names_and_ordinals() {
		let layer = LogwireConfigLayer {
			ignore: Some(vec![
				IgnoreRuleLayer {
					pattern: "a".to_string(),
					threshold: Some(LevelSetting::Name("notice".to_string())),
					channels: Some(vec![]),
				},
				IgnoreRuleLayer {
					pattern: "b".to_string(),
					threshold: Some(LevelSetting::Ordinal(300)),
					channels: Some(vec!["CRON".to_string()]),
				},
			]),
			..Default::default()
		};
		let config = layer.finalize().unwrap();
		assert_eq!(config.ignore[0].threshold, Some(250));
		assert_eq!(config.ignore[0].channels, None);
		assert_eq!(config.ignore[1].threshold, Some(300));
		assert_eq!(config.ignore[1].channels, Some(vec!["CRON".to_string()]));
	}

	#[test]
	fn masked_keys_are_trimmed() {
		let layer = LogwireConfigLayer {
			masked_keys: Some(vec![" card_number ".to_string(), "".to_string()]),
			..Default::default()
		};
		assert_eq!(layer.finalize().unwrap().masked_keys, vec!["card_number"]);
	}
}
