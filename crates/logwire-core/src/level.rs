// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The fixed 8-level severity scale.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Severity levels, ordered from least to most severe.
///
/// The numeric values are the ordinals carried by [`crate::LogEntry::level`].
/// Gaps between ordinals are intentional: raw levels that fall between two
/// ordinals are rounded down by [`LogLevel::normalize`].
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	#[default]
	Debug = 100,
	Info = 200,
	Notice = 250,
	Warning = 300,
	Error = 400,
	Critical = 500,
	Alert = 550,
	Emergency = 600,
}

impl LogLevel {
	/// Returns the ordinal for this level.
	pub fn ordinal(&self) -> i32 {
		*self as i32
	}

	/// Returns all levels from least to most severe.
	pub fn all() -> &'static [LogLevel] {
		&[
			LogLevel::Debug,
			LogLevel::Info,
			LogLevel::Notice,
			LogLevel::Warning,
			LogLevel::Error,
			LogLevel::Critical,
			LogLevel::Alert,
			LogLevel::Emergency,
		]
	}

	/// Upper-case name, as used in event-name suffixes and text output.
	pub fn name(&self) -> &'static str {
		match self {
			LogLevel::Debug => "DEBUG",
			LogLevel::Info => "INFO",
			LogLevel::Notice => "NOTICE",
			LogLevel::Warning => "WARNING",
			LogLevel::Error => "ERROR",
			LogLevel::Critical => "CRITICAL",
			LogLevel::Alert => "ALERT",
			LogLevel::Emergency => "EMERGENCY",
		}
	}

	/// Maps a raw ordinal onto the scale.
	///
	/// Non-positive values mean "no level". Values between two ordinals round
	/// down, values under DEBUG clamp up to DEBUG and values over EMERGENCY
	/// clamp down to EMERGENCY.
	pub fn normalize(raw: i32) -> Option<LogLevel> {
		if raw <= 0 {
			return None;
		}

		let level = Self::all()
			.iter()
			.rev()
			.find(|level| level.ordinal() <= raw)
			.copied()
			.unwrap_or(LogLevel::Debug);

		Some(level)
	}

	/// Parses a level name, case-insensitively, ignoring surrounding
	/// whitespace. A few common abbreviations are accepted.
	pub fn from_name(name: &str) -> Option<LogLevel> {
		match name.trim().to_ascii_lowercase().as_str() {
			"debug" => Some(LogLevel::Debug),
			"info" => Some(LogLevel::Info),
			"notice" => Some(LogLevel::Notice),
			"warning" | "warn" => Some(LogLevel::Warning),
			"error" | "err" => Some(LogLevel::Error),
			"critical" | "crit" => Some(LogLevel::Critical),
			"alert" => Some(LogLevel::Alert),
			"emergency" | "emerg" => Some(LogLevel::Emergency),
			_ => None,
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name())
	}
}

impl FromStr for LogLevel {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_name(s).ok_or_else(|| CoreError::UnknownLevel(s.to_string()))
	}
}

impl From<LogLevel> for i32 {
	fn from(level: LogLevel) -> Self {
		level.ordinal()
	}
}
