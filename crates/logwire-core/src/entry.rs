// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The canonical log entry.

use std::fmt;

use crate::level::LogLevel;
use crate::value::Context;

/// A normalized "something happened" signal.
///
/// Entries are immutable: [`LogEntry::escalate`] returns a new entry rather
/// than changing the level in place.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
	message: String,
	level: i32,
	channel: String,
	context: Context,
}

impl LogEntry {
	pub fn new(
		message: impl Into<String>,
		level: impl Into<i32>,
		channel: impl Into<String>,
		context: Context,
	) -> Self {
		Self {
			message: message.into(),
			level: level.into(),
			channel: channel.into(),
			context,
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	/// Raw ordinal severity. Non-positive means "no level".
	pub fn level(&self) -> i32 {
		self.level
	}

	/// The severity mapped onto the fixed scale, if any.
	pub fn log_level(&self) -> Option<LogLevel> {
		LogLevel::normalize(self.level)
	}

	pub fn channel(&self) -> &str {
		&self.channel
	}

	pub fn context(&self) -> &Context {
		&self.context
	}

	/// Returns an entry whose level is at least `floor`.
	pub fn escalate(&self, floor: i32) -> LogEntry {
		LogEntry {
			level: self.level.max(floor),
			..self.clone()
		}
	}

	/// Consumes the entry, returning its parts.
	pub fn into_parts(self) -> (String, i32, String, Context) {
		(self.message, self.level, self.channel, self.context)
	}
}

impl fmt::Display for LogEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.log_level() {
			Some(level) => write!(f, "[{}] {}: {}", self.channel, level, self.message),
			None => write!(f, "[{}] {}: {}", self.channel, self.level, self.message),
		}
	}
}
