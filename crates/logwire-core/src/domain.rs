// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain value shapes: error aggregates, throwables, record references and
//! resource handles.

use indexmap::IndexMap;
use std::error::Error as StdError;
use std::fmt;

use crate::object::short_type_name;
use crate::value::{Map, Value};

/// A multi-code domain error.
///
/// Each code carries one or more messages and optionally some data. The
/// first code added is the primary one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorAggregate {
	messages: IndexMap<String, Vec<String>>,
	data: IndexMap<String, Value>,
}

impl ErrorAggregate {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an aggregate holding a single code.
	pub fn single(code: impl Into<String>, message: impl Into<String>) -> Self {
		let mut error = Self::new();
		error.add(code, message);
		error
	}

	/// Adds a message under `code`.
	pub fn add(&mut self, code: impl Into<String>, message: impl Into<String>) -> &mut Self {
		self.messages
			.entry(code.into())
			.or_default()
			.push(message.into());
		self
	}

	/// Attaches data to `code`, replacing any previous data for it.
	pub fn add_data(&mut self, code: impl Into<String>, data: Value) -> &mut Self {
		let code = code.into();
		self.messages.entry(code.clone()).or_default();
		self.data.insert(code, data);
		self
	}

	/// Builder form of [`ErrorAggregate::add_data`] for the primary code.
	pub fn with_data(mut self, data: Value) -> Self {
		if let Some(code) = self.primary_code().map(str::to_string) {
			self.data.insert(code, data);
		}
		self
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	/// Error codes in insertion order.
	pub fn codes(&self) -> impl Iterator<Item = &str> {
		self.messages.keys().map(String::as_str)
	}

	pub fn primary_code(&self) -> Option<&str> {
		self.messages.keys().next().map(String::as_str)
	}

	/// The first message of the primary code, or an empty string.
	pub fn message(&self) -> &str {
		self.messages
			.values()
			.next()
			.and_then(|messages| messages.first())
			.map(String::as_str)
			.unwrap_or("")
	}

	/// All messages for `code`.
	pub fn messages(&self, code: &str) -> &[String] {
		self.messages.get(code).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Data for `code`, or for the primary code when `code` is `None`.
	pub fn data(&self, code: Option<&str>) -> Option<&Value> {
		let code = code.or_else(|| self.primary_code())?;
		self.data.get(code)
	}

	/// All attached data keyed by code.
	pub fn all_data(&self) -> &IndexMap<String, Value> {
		&self.data
	}
}

impl fmt::Display for ErrorAggregate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.message())
	}
}

/// An exception-like value: a typed error with location and stack text.
#[derive(Debug, Clone, PartialEq)]
pub struct Throwable {
	class: String,
	message: String,
	file: Option<String>,
	line: Option<u32>,
	trace: Option<String>,
	previous: Option<Box<Throwable>>,
}

impl Throwable {
	pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			class: class.into(),
			message: message.into(),
			file: None,
			line: None,
			trace: None,
			previous: None,
		}
	}

	/// Captures an error and its source chain. The type name of `E` becomes
	/// the class; sources are recorded as `previous` with class `"Error"`.
	pub fn from_error<E: StdError + 'static>(error: &E) -> Self {
		let mut throwable = Self::new(short_type_name::<E>(), error.to_string());
		throwable.previous = error.source().map(|s| Box::new(Self::from_source(s)));
		throwable
	}

	fn from_source(error: &(dyn StdError + 'static)) -> Self {
		let mut throwable = Self::new("Error", error.to_string());
		throwable.previous = error.source().map(|s| Box::new(Self::from_source(s)));
		throwable
	}

	pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
		self.file = Some(file.into());
		self.line = Some(line);
		self
	}

	pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
		self.trace = Some(trace.into());
		self
	}

	pub fn with_previous(mut self, previous: Throwable) -> Self {
		self.previous = Some(Box::new(previous));
		self
	}

	pub fn class(&self) -> &str {
		&self.class
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn file(&self) -> Option<&str> {
		self.file.as_deref()
	}

	pub fn line(&self) -> Option<u32> {
		self.line
	}

	pub fn trace(&self) -> Option<&str> {
		self.trace.as_deref()
	}

	pub fn previous(&self) -> Option<&Throwable> {
		self.previous.as_deref()
	}

	/// Context fields describing this throwable.
	pub fn to_context(&self) -> Map {
		let mut map = Map::new();
		map.insert("class".to_string(), Value::String(self.class.clone()));
		map.insert("file".to_string(), self.file.clone().into());
		map.insert("line".to_string(), self.line.into());
		map.insert("trace".to_string(), self.trace.clone().into());
		if let Some(previous) = &self.previous {
			map.insert(
				"previous".to_string(),
				Value::String(format!("{}: {}", previous.class, previous.message)),
			);
		}
		map
	}
}

impl fmt::Display for Throwable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.class, self.message)?;
		if let (Some(file), Some(line)) = (&self.file, self.line) {
			write!(f, " ({file}:{line})")?;
		}
		Ok(())
	}
}

/// A reference to a stored record (post, user, term, comment, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
	kind: String,
	id: u64,
	key: Option<String>,
}

impl RecordRef {
	pub fn new(kind: impl Into<String>, id: u64) -> Self {
		Self {
			kind: kind.into(),
			id,
			key: None,
		}
	}

	/// Sets the natural key (slug, login, ...).
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(key.into());
		self
	}

	pub fn kind(&self) -> &str {
		&self.kind
	}

	pub fn id(&self) -> u64 {
		self.id
	}

	pub fn key(&self) -> Option<&str> {
		self.key.as_deref()
	}
}

impl fmt::Display for RecordRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.key {
			Some(key) => write!(f, "{} #{} ({})", self.kind, self.id, key),
			None => write!(f, "{} #{}", self.kind, self.id),
		}
	}
}

/// An opaque handle (stream, socket, connection). Only described, never read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
	kind: String,
	id: u64,
}

impl Resource {
	pub fn new(kind: impl Into<String>, id: u64) -> Self {
		Self {
			kind: kind.into(),
			id,
		}
	}

	pub fn kind(&self) -> &str {
		&self.kind
	}

	pub fn id(&self) -> u64 {
		self.id
	}
}

impl fmt::Display for Resource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Resource ({})", self.kind)
	}
}
