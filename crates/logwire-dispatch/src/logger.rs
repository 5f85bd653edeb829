// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The logger contract and the per-channel logger.

use std::fmt;
use std::sync::Arc;

use logwire_core::{Context, LogLevel};

use crate::error::DeliveryError;
use crate::handler::Handler;
use crate::processor::Processor;
use crate::record::Record;

/// Something that accepts `(level, message, context)`.
pub trait Logger {
	fn log(&self, level: LogLevel, message: &str, context: Context) -> Result<(), DeliveryError>;

	fn debug(&self, message: &str, context: Context) -> Result<(), DeliveryError> {
		self.log(LogLevel::Debug, message, context)
	}

	fn info(&self, message: &str, context: Context) -> Result<(), DeliveryError> {
		self.log(LogLevel::Info, message, context)
	}

	fn notice(&self, message: &str, context: Context) -> Result<(), DeliveryError> {
		self.log(LogLevel::Notice, message, context)
	}

	fn warning(&self, message: &str, context: Context) -> Result<(), DeliveryError> {
		self.log(LogLevel::Warning, message, context)
	}

	fn error(&self, message: &str, context: Context) -> Result<(), DeliveryError> {
		self.log(LogLevel::Error, message, context)
	}

	fn critical(&self, message: &str, context: Context) -> Result<(), DeliveryError> {
		self.log(LogLevel::Critical, message, context)
	}

	fn alert(&self, message: &str, context: Context) -> Result<(), DeliveryError> {
		self.log(LogLevel::Alert, message, context)
	}

	fn emergency(&self, message: &str, context: Context) -> Result<(), DeliveryError> {
		self.log(LogLevel::Emergency, message, context)
	}
}

/// A channel's processors and handlers, fixed when the logger is built.
pub struct ChannelLogger {
	channel: String,
	processors: Vec<Arc<dyn Processor>>,
	handlers: Vec<Arc<dyn Handler>>,
}

impl ChannelLogger {
	pub fn new(
		channel: impl Into<String>,
		processors: Vec<Arc<dyn Processor>>,
		handlers: Vec<Arc<dyn Handler>>,
	) -> Self {
		Self {
			channel: channel.into(),
			processors,
			handlers,
		}
	}

	pub fn channel(&self) -> &str {
		&self.channel
	}

	pub fn handler_names(&self) -> Vec<&str> {
		self.handlers.iter().map(|h| h.name()).collect()
	}

	pub fn processor_names(&self) -> Vec<&str> {
		self.processors.iter().map(|p| p.name()).collect()
	}
}

impl Logger for ChannelLogger {
	/// Runs every processor, then every handler accepting `level`. A failing
	/// handler does not stop the others; the first failure is returned.
	fn log(&self, level: LogLevel, message: &str, context: Context) -> Result<(), DeliveryError> {
		let mut record = Record::new(self.channel.as_str(), level, message, context);
		for processor in &self.processors {
			processor.process(&mut record);
		}

		let mut first_error = None;
		for handler in self.handlers.iter().filter(|h| h.handles(level)) {
			if let Err(source) = handler.handle(&record) {
				first_error.get_or_insert(DeliveryError::Handler {
					handler: handler.name().to_string(),
					source,
				});
			}
		}

		match first_error {
			Some(error) => Err(error),
			None => Ok(()),
		}
	}
}

impl fmt::Debug for ChannelLogger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChannelLogger")
			.field("channel", &self.channel)
			.field("processors", &self.processor_names())
			.field("handlers", &self.handler_names())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::HandlerError;
	use crate::handler::MemoryHandler;
	use crate::processor::StaticExtraProcessor;
	use logwire_core::{map, Value};

	struct Failing;

	impl Handler for Failing {
		fn name(&self) -> &str {
			"failing"
		}

		fn handle(&self, _record: &Record) -> Result<(), HandlerError> {
			Err(HandlerError::Rejected("disk full".to_string()))
		}
	}

	#[test]
	fn processors_run_before_handlers() {
		let memory = MemoryHandler::new(10);
		let logger = ChannelLogger::new(
			"HTTP",
			vec![Arc::new(StaticExtraProcessor::default().with("host", "web-1"))],
			vec![Arc::new(memory.clone())],
		);

		logger.info("request served", map! { "status" => 200 }).unwrap();

		let records = memory.records();
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].channel, "HTTP");
		assert_eq!(records[0].level, LogLevel::Info);
		assert_eq!(records[0].extra["host"], Value::from("web-1"));
		assert_eq!(records[0].context["status"], Value::from(200));
	}

	#[test]
	fn handler_level_threshold() {
		let memory = MemoryHandler::with_min_level(10, LogLevel::Error);
		let logger = ChannelLogger::new("DB", vec![], vec![Arc::new(memory.clone())]);

		logger.warning("slow query", map! {}).unwrap();
		logger.critical("db down", map! {}).unwrap();

		let records = memory.records();
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].message, "db down");
	}

	#[test]
	fn failure_does_not_stop_other_handlers() {
		let memory = MemoryHandler::new(10);
		let logger = ChannelLogger::new(
			"CRON",
			vec![],
			vec![Arc::new(Failing), Arc::new(memory.clone())],
		);

		let err = logger.error("job failed", map! {}).unwrap_err();
		assert!(matches!(err, DeliveryError::Handler { ref handler, .. } if handler == "failing"));
		assert_eq!(memory.len(), 1);
	}

	#[test]
	fn debug_lists_names() {
		let logger = ChannelLogger::new("DEBUG", vec![], vec![Arc::new(MemoryHandler::new(1))]);
		assert_eq!(logger.handler_names(), vec!["memory"]);
		assert!(format!("{logger:?}").contains("DEBUG"));
	}
}
