// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Channel names and the built-in channel set.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::CoreError;

/// HTTP and transport failures (remote requests, mail, REST).
pub const HTTP: &str = "HTTP";
/// Storage and database failures.
pub const DB: &str = "DB";
/// Runtime errors trapped from the host.
pub const PHP_ERROR: &str = "PHP_ERROR";
/// Authentication and authorization events.
pub const SECURITY: &str = "SECURITY";
/// General purpose channel, also the default.
pub const DEBUG: &str = "DEBUG";
/// Scheduled job runs.
pub const CRON: &str = "CRON";

/// Channel used when nothing more specific is known.
pub const DEFAULT_CHANNEL: &str = DEBUG;

/// The channels registered out of the box.
pub const BUILT_IN: [&str; 6] = [HTTP, DB, PHP_ERROR, SECURITY, DEBUG, CRON];

const MAX_LEN: usize = 64;

static CHANNEL_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").unwrap());

/// A validated channel name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
	/// Validates and wraps a channel name. Surrounding whitespace is trimmed.
	pub fn new(name: impl AsRef<str>) -> Result<Self, CoreError> {
		let trimmed = name.as_ref().trim();
		if Self::validate(trimmed) {
			Ok(Self(trimmed.to_string()))
		} else {
			Err(CoreError::InvalidChannelName(name.as_ref().to_string()))
		}
	}

	/// Returns whether `name` is acceptable as-is.
	pub fn validate(name: &str) -> bool {
		!name.is_empty() && name.len() <= MAX_LEN && CHANNEL_REGEX.is_match(name)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_inner(self) -> String {
		self.0
	}
}

impl Default for ChannelName {
	fn default() -> Self {
		Self(DEFAULT_CHANNEL.to_string())
	}
}

impl fmt::Display for ChannelName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for ChannelName {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<String> for ChannelName {
	type Error = CoreError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<ChannelName> for String {
	fn from(name: ChannelName) -> Self {
		name.0
	}
}

impl AsRef<str> for ChannelName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for ChannelName {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for ChannelName {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}
