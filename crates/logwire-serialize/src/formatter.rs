// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Formatters for domain types.
//!
//! A formatter maps a value it recognizes onto a plainer [`Value`] (text, a
//! list or a map). The serializer renders that result in turn, one level
//! deeper, so formatter output is still masked and depth-bounded.

use chrono::SecondsFormat;
use std::fmt;

use logwire_core::{Map, Value};

type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;
type FormatFn = Box<dyn Fn(&Value) -> Value + Send + Sync>;

pub struct Formatter {
	name: String,
	predicate: Predicate,
	format: FormatFn,
}

impl Formatter {
	pub fn new<P, F>(name: impl Into<String>, predicate: P, format: F) -> Self
	where
		P: Fn(&Value) -> bool + Send + Sync + 'static,
		F: Fn(&Value) -> Value + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			predicate: Box::new(predicate),
			format: Box::new(format),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn matches(&self, value: &Value) -> bool {
		(self.predicate)(value)
	}

	pub fn format(&self, value: &Value) -> Value {
		(self.format)(value)
	}
}

impl fmt::Debug for Formatter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Formatter").field("name", &self.name).finish()
	}
}

/// Ordered formatters; the first whose predicate matches wins.
#[derive(Debug)]
pub struct FormatterList {
	formatters: Vec<Formatter>,
}

impl FormatterList {
	pub fn empty() -> Self {
		Self {
			formatters: Vec::new(),
		}
	}

	/// Appends a formatter. Later formatters only see values no earlier one
	/// matched.
	pub fn push(&mut self, formatter: Formatter) -> &mut Self {
		self.formatters.push(formatter);
		self
	}

	pub fn find(&self, value: &Value) -> Option<&Formatter> {
		self.formatters.iter().find(|f| f.matches(value))
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.formatters.iter().map(Formatter::name)
	}

	pub fn len(&self) -> usize {
		self.formatters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.formatters.is_empty()
	}
}

impl Default for FormatterList {
	fn default() -> Self {
		let mut list = Self::empty();
		list.push(Formatter::new(
			"error_aggregate",
			|v| matches!(v, Value::Error(_)),
			format_error_aggregate,
		))
		.push(Formatter::new(
			"record",
			|v| matches!(v, Value::Record(_)),
			|v| match v {
				Value::Record(record) => Value::String(record.to_string()),
				other => other.clone(),
			},
		))
		.push(Formatter::new(
			"datetime",
			|v| matches!(v, Value::DateTime(_)),
			|v| match v {
				Value::DateTime(dt) => {
					Value::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
				}
				other => other.clone(),
			},
		))
		.push(Formatter::new(
			"throwable",
			|v| matches!(v, Value::Throwable(_)),
			format_throwable,
		))
		.push(Formatter::new(
			"entry",
			|v| matches!(v, Value::Entry(_)),
			format_entry,
		));
		list
	}
}

fn format_error_aggregate(value: &Value) -> Value {
	let Value::Error(error) = value else {
		return value.clone();
	};

	let mut codes = Map::new();
	for code in error.codes() {
		let messages = error
			.messages(code)
			.iter()
			.map(|m| Value::String(m.clone()))
			.collect();
		codes.insert(code.to_string(), Value::List(messages));
	}

	let mut map = Map::new();
	map.insert("errors".to_string(), Value::Map(codes));
	if !error.all_data().is_empty() {
		let data = error
			.all_data()
			.iter()
			.map(|(code, data)| (code.clone(), data.clone()))
			.collect();
		map.insert("error_data".to_string(), Value::Map(data));
	}
	Value::Map(map)
}

fn format_throwable(value: &Value) -> Value {
	let Value::Throwable(throwable) = value else {
		return value.clone();
	};

	let mut map = Map::new();
	map.insert(
		"message".to_string(),
		Value::String(throwable.message().to_string()),
	);
	map.extend(throwable.to_context());
	Value::Map(map)
}

fn format_entry(value: &Value) -> Value {
	let Value::Entry(entry) = value else {
		return value.clone();
	};

	let mut map = Map::new();
	map.insert(
		"message".to_string(),
		Value::String(entry.message().to_string()),
	);
	map.insert("level".to_string(), Value::Int(entry.level().into()));
	map.insert(
		"channel".to_string(),
		Value::String(entry.channel().to_string()),
	);
	map.insert("context".to_string(), Value::Map(entry.context().clone()));
	Value::Map(map)
}
