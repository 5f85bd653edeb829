// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record processors: enrich a record before handlers see it.

use logwire_core::{Map, Value};

use crate::record::Record;

pub trait Processor: Send + Sync {
	fn name(&self) -> &str;
	fn process(&self, record: &mut Record);
}

/// Adds the same `extra` fields to every record. Existing keys are kept.
#[derive(Debug, Clone, Default)]
pub struct StaticExtraProcessor {
	extra: Map,
}

impl StaticExtraProcessor {
	pub fn new(extra: Map) -> Self {
		Self { extra }
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}
}

impl Processor for StaticExtraProcessor {
	fn name(&self) -> &str {
		"static_extra"
	}

	fn process(&self, record: &mut Record) {
		for (key, value) in &self.extra {
			record
				.extra
				.entry(key.clone())
				.or_insert_with(|| value.clone());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use logwire_core::{map, LogLevel};

	#[test]
	fn adds_fields_without_overwriting() {
		let processor = StaticExtraProcessor::default()
			.with("host", "web-1")
			.with("release", "2025.3");

		let mut record = Record::new("HTTP", LogLevel::Info, "m", map! {});
		record.extra.insert("host".to_string(), Value::from("override"));
		processor.process(&mut record);

		assert_eq!(record.extra["host"], Value::from("override"));
		assert_eq!(record.extra["release"], Value::from("2025.3"));
	}
}
