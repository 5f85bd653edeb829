// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! What handlers receive.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use logwire_core::{Context, LogLevel, Value};

/// One delivery, as seen by processors and handlers.
///
/// `context` has already been serialized and masked by the dispatcher;
/// `extra` is filled in by processors.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	pub datetime: DateTime<Utc>,
	pub channel: String,
	pub level: LogLevel,
	pub message: String,
	pub context: Context,
	pub extra: Context,
}

impl Record {
	pub fn new(
		channel: impl Into<String>,
		level: LogLevel,
		message: impl Into<String>,
		context: Context,
	) -> Self {
		Self {
			datetime: Utc::now(),
			channel: channel.into(),
			level,
			message: message.into(),
			context,
			extra: Context::new(),
		}
	}

	pub fn to_json(&self) -> serde_json::Value {
		json!({
			"datetime": self.datetime.to_rfc3339_opts(SecondsFormat::Micros, true),
			"channel": self.channel,
			"level": self.level.ordinal(),
			"level_name": self.level.name(),
			"message": self.message,
			"context": Value::Map(self.context.clone()).to_json(),
			"extra": Value::Map(self.extra.clone()).to_json(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use logwire_core::map;

	#[test]
	fn json_shape() {
		let mut record = Record::new("DB", LogLevel::Error, "query failed", map! { "table" => "posts" });
		record.extra.insert("host".to_string(), Value::from("web-1"));

		let json = record.to_json();
		assert_eq!(json["channel"], "DB");
		assert_eq!(json["level"], 400);
		assert_eq!(json["level_name"], "ERROR");
		assert_eq!(json["context"]["table"], "posts");
		assert_eq!(json["extra"]["host"], "web-1");
		assert!(json["datetime"].as_str().unwrap().ends_with('Z'));
	}
}
