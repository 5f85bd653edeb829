// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::SecondsFormat;
use parking_lot::Mutex;

use logwire_core::{LogLevel, Value};

use super::Handler;
use crate::error::HandlerError;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamFormat {
	/// One JSON object per line.
	#[default]
	JsonLines,
	/// `[datetime] CHANNEL.LEVEL: message {context} {extra}`
	Text,
}

/// Writes records to any `Write` implementation, one line per record.
pub struct StreamHandler {
	name: String,
	format: StreamFormat,
	min_level: LogLevel,
	writer: Mutex<Box<dyn Write + Send>>,
}

impl StreamHandler {
	pub fn new(writer: impl Write + Send + 'static, format: StreamFormat) -> Self {
		Self {
			name: "stream".to_string(),
			format,
			min_level: LogLevel::Debug,
			writer: Mutex::new(Box::new(writer)),
		}
	}

	/// Text lines on standard error.
	pub fn stderr() -> Self {
		Self::new(std::io::stderr(), StreamFormat::Text).named("stderr")
	}

	/// Appends to the file at `path`, creating it if needed.
	pub fn open_file(path: impl AsRef<Path>, format: StreamFormat) -> Result<Self, HandlerError> {
		let file = OpenOptions::new().create(true).append(true).open(path.as_ref())?;
		Ok(Self::new(file, format).named("file"))
	}

	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_min_level(mut self, min_level: LogLevel) -> Self {
		self.min_level = min_level;
		self
	}

	pub fn format(&self) -> StreamFormat {
		self.format
	}
}

impl std::fmt::Debug for StreamHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StreamHandler")
			.field("name", &self.name)
			.field("format", &self.format)
			.field("min_level", &self.min_level)
			.finish()
	}
}

impl Handler for StreamHandler {
	fn name(&self) -> &str {
		&self.name
	}

	fn min_level(&self) -> LogLevel {
		self.min_level
	}

	fn handle(&self, record: &Record) -> Result<(), HandlerError> {
		let line = match self.format {
			StreamFormat::JsonLines => format_json_line(record)?,
			StreamFormat::Text => format_text_line(record),
		};

		let mut writer = self.writer.lock();
		writer.write_all(line.as_bytes())?;
		writer.flush()?;
		Ok(())
	}
}

pub fn format_json_line(record: &Record) -> Result<String, HandlerError> {
	let json = serde_json::to_string(&record.to_json())?;
	Ok(format!("{json}\n"))
}

pub fn format_text_line(record: &Record) -> String {
	let context = Value::Map(record.context.clone()).to_json();
	let extra = Value::Map(record.extra.clone()).to_json();
	format!(
		"[{}] {}.{}: {} {} {}\n",
		record.datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
		record.channel,
		record.level.name(),
		record.message.replace('\n', "\\n"),
		context,
		extra
	)
}
