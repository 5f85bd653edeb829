// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Forwards records into the host's `tracing` subscriber.

use tracing::{debug, error, info, warn};

use logwire_core::{LogLevel, Value};

use super::Handler;
use crate::error::HandlerError;
use crate::record::Record;

/// Re-emits every record as a `tracing` event with target `logwire`.
///
/// NOTICE maps to `INFO`; ERROR and everything above map to `ERROR`.
#[derive(Debug, Clone, Default)]
pub struct TracingHandler {
	min_level: LogLevel,
}

impl TracingHandler {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_min_level(min_level: LogLevel) -> Self {
		Self { min_level }
	}
}

impl Handler for TracingHandler {
	fn name(&self) -> &str {
		"tracing"
	}

	fn min_level(&self) -> LogLevel {
		self.min_level
	}

	fn handle(&self, record: &Record) -> Result<(), HandlerError> {
		let channel = record.channel.as_str();
		let level = record.level.name();
		let message = record.message.as_str();
		let context_json = Value::Map(record.context.clone()).to_json().to_string();
		let context = context_json.as_str();

		match record.level {
			LogLevel::Debug => debug!(target: "logwire", channel, level, context, "{message}"),
			LogLevel::Info | LogLevel::Notice => {
				info!(target: "logwire", channel, level, context, "{message}")
			}
			LogLevel::Warning => warn!(target: "logwire", channel, level, context, "{message}"),
			LogLevel::Error | LogLevel::Critical | LogLevel::Alert | LogLevel::Emergency => {
				error!(target: "logwire", channel, level, context, "{message}")
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use logwire_core::map;
	use std::fmt;
	use std::sync::{Arc, Mutex};
	use tracing::field::{Field, Visit};
	use tracing::{Event, Subscriber};
	use tracing_subscriber::layer::{Context, SubscriberExt};
	use tracing_subscriber::Layer;

	#[derive(Debug, Clone, PartialEq)]
	struct Captured {
		level: tracing::Level,
		target: String,
		message: String,
		channel: String,
	}

	#[derive(Clone, Default)]
	struct CaptureLayer(Arc<Mutex<Vec<Captured>>>);

	#[derive(Default)]
	struct FieldVisitor {
		message: String,
		channel: String,
	}

	impl Visit for FieldVisitor {
		fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
			if field.name() == "message" {
				self.message = format!("{value:?}");
			}
		}

		fn record_str(&mut self, field: &Field, value: &str) {
			if field.name() == "channel" {
				self.channel = value.to_string();
			}
		}
	}

	impl<S: Subscriber> Layer<S> for CaptureLayer {
		fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
			let mut visitor = FieldVisitor::default();
			event.record(&mut visitor);
			self.0.lock().unwrap().push(Captured {
				level: *event.metadata().level(),
				target: event.metadata().target().to_string(),
				message: visitor.message,
				channel: visitor.channel,
			});
		}
	}

	fn capture(records: &[Record]) -> Vec<Captured> {
		let layer = CaptureLayer::default();
		let subscriber = tracing_subscriber::registry().with(layer.clone());
		let handler = TracingHandler::new();

		tracing::subscriber::with_default(subscriber, || {
			for record in records {
				handler.handle(record).unwrap();
			}
		});

		let captured = layer.0.lock().unwrap().clone();
		captured
	}

	#[test]
	fn levels_map_onto_tracing_levels() {
		let records: Vec<Record> = [
			LogLevel::Debug,
			LogLevel::Notice,
			LogLevel::Warning,
			LogLevel::Emergency,
		]
		.into_iter()
		.map(|level| Record::new("CRON", level, "tick", map! {}))
		.collect();

		let levels: Vec<tracing::Level> = capture(&records).iter().map(|c| c.level).collect();
		assert_eq!(
			levels,
			vec![
				tracing::Level::DEBUG,
				tracing::Level::INFO,
				tracing::Level::WARN,
				tracing::Level::ERROR
			]
		);
	}

	#[test]
	fn forwards_message_and_channel() {
		let record = Record::new("HTTP", LogLevel::Error, "request timed out", map! {});
		let captured = capture(&[record]);

		assert_eq!(captured.len(), 1);
		assert_eq!(captured[0].target, "logwire");
		assert_eq!(captured[0].message, "request timed out");
		assert_eq!(captured[0].channel, "HTTP");
	}
}
