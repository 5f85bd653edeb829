// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ambient information an event is normalized under.

use logwire_core::{LogLevel, DEFAULT_CHANNEL};

/// Name of the generic log event. A `.<level>` suffix raises the floor, e.g.
/// `logwire.log.error`.
pub const LOG_EVENT: &str = "logwire.log";

/// Floor severity and fallback channel for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
	floor: i32,
	default_channel: String,
}

impl EventContext {
	pub fn new(floor: impl Into<i32>, default_channel: impl Into<String>) -> Self {
		Self {
			floor: floor.into(),
			default_channel: default_channel.into(),
		}
	}

	/// Derives the floor from the severity suffix of `event_name`.
	///
	/// `logwire.log` and unknown suffixes keep the DEBUG floor.
	pub fn from_event_name(event_name: &str, default_channel: impl Into<String>) -> Self {
		let floor = event_name
			.strip_prefix(LOG_EVENT)
			.and_then(|rest| rest.strip_prefix('.'))
			.and_then(LogLevel::from_name)
			.unwrap_or_default();
		Self::new(floor, default_channel)
	}

	pub fn floor(&self) -> i32 {
		self.floor
	}

	pub fn default_channel(&self) -> &str {
		&self.default_channel
	}
}

impl Default for EventContext {
	fn default() -> Self {
		Self::new(LogLevel::Debug, DEFAULT_CHANNEL)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn every_level_suffix_sets_floor(index in 0usize..8) {
			let level = LogLevel::all()[index];
			let name = format!("{LOG_EVENT}.{}", level.name().to_lowercase());
			prop_assert_eq!(EventContext::from_event_name(&name, "DEBUG").floor(), level.ordinal());
		}
	}

	#[test]
	fn bare_event_uses_debug_floor() {
		let context = EventContext::from_event_name("logwire.log", "DEBUG");
		assert_eq!(context.floor(), 100);
		assert_eq!(context.default_channel(), "DEBUG");
	}

	#[test]
	fn error_suffix() {
		assert_eq!(EventContext::from_event_name("logwire.log.error", "HTTP").floor(), 400);
	}

	#[test]
	fn unknown_suffix_falls_back() {
		assert_eq!(EventContext::from_event_name("logwire.log.loud", "DEBUG").floor(), 100);
		assert_eq!(EventContext::from_event_name("logwire.logger", "DEBUG").floor(), 100);
		assert_eq!(EventContext::from_event_name("other.event", "DEBUG").floor(), 100);
	}
}
