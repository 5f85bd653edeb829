// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recursive context serializer.

use std::sync::Arc;
use tracing::trace;

use logwire_core::{float_token, Context, FilterChain, LogEntry, LogObject, Map, Value};

use crate::formatter::{Formatter, FormatterList};
use crate::masking::{MaskedKeys, MASK};

/// Deepest level that is rendered. Anything below it is passed through
/// unrendered, with masked keys still replaced.
pub const MAX_DEPTH: usize = 8;

/// Renders log contexts into persistable values.
///
/// The output tree only holds strings, lists and maps, except for
/// substructures deeper than [`MAX_DEPTH`], which keep their original values
/// apart from masking.
#[derive(Debug, Default)]
pub struct ContextSerializer {
	masked: MaskedKeys,
	formatters: FormatterList,
}

impl ContextSerializer {
	pub fn new(masked: MaskedKeys, formatters: FormatterList) -> Self {
		Self { masked, formatters }
	}

	/// Default formatters and the built-in masked keys plus `extra`, with the
	/// combined key list passed through `filters`.
	pub fn with_masked_keys<I, S>(extra: I, filters: &FilterChain<Vec<String>>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(MaskedKeys::resolve(extra, filters), FormatterList::default())
	}

	pub fn masked_keys(&self) -> &MaskedKeys {
		&self.masked
	}

	/// Registers a formatter after the built-in ones.
	pub fn register_formatter(&mut self, formatter: Formatter) -> &mut Self {
		self.formatters.push(formatter);
		self
	}

	/// Serializes every value of `context`, masking secret keys.
	pub fn serialize_context(&self, context: &Context) -> Context {
		self.render_map(context, 1)
	}

	/// Serializes a single context value.
	pub fn serialize_value(&self, value: &Value) -> Value {
		self.render(value, 1)
	}

	/// Text form of a message argument. Strings pass through; anything
	/// structured becomes compact JSON of its serialized form.
	pub fn serialize_message(&self, value: &Value) -> String {
		match self.render(value, 1) {
			Value::String(text) => text,
			rendered => rendered.to_json().to_string(),
		}
	}

	fn render(&self, value: &Value, depth: usize) -> Value {
		if depth > MAX_DEPTH {
			return self.mask_only(value);
		}

		match value {
			Value::Null => Value::from("NULL"),
			Value::Bool(true) => Value::from("TRUE"),
			Value::Bool(false) => Value::from("FALSE"),
			Value::Int(i) => Value::String(i.to_string()),
			Value::Float(f) => Value::String(float_token(*f)),
			Value::String(s) => Value::String(s.clone()),
			Value::Resource(resource) => Value::String(resource.to_string()),
			Value::List(items) => {
				Value::List(items.iter().map(|v| self.render(v, depth + 1)).collect())
			}
			Value::Map(map) => Value::Map(self.render_map(map, depth + 1)),
			Value::Object(object) => self.render_object(object, depth),
			other => match self.formatters.find(other) {
				Some(formatter) => self.render(&formatter.format(other), depth + 1),
				None => {
					trace!(kind = other.type_name(), "no formatter, falling back to debug text");
					Value::String(format!("{other:?}"))
				}
			},
		}
	}

	fn render_map(&self, map: &Map, depth: usize) -> Map {
		map.iter()
			.map(|(key, value)| {
				let rendered = if self.masked.contains(key) {
					Value::from(MASK)
				} else {
					self.render(value, depth)
				};
				(key.clone(), rendered)
			})
			.collect()
	}

	/// Replaces masked keys without rendering anything else. Objects are left
	/// as they are, so this only walks owned trees and always ends.
	fn mask_only(&self, value: &Value) -> Value {
		match value {
			Value::Map(map) => Value::Map(
				map.iter()
					.map(|(key, value)| {
						let masked = if self.masked.contains(key) {
							Value::from(MASK)
						} else {
							self.mask_only(value)
						};
						(key.clone(), masked)
					})
					.collect(),
			),
			Value::List(items) => Value::List(items.iter().map(|v| self.mask_only(v)).collect()),
			Value::Entry(entry) => {
				let context = match self.mask_only(&Value::Map(entry.context().clone())) {
					Value::Map(context) => context,
					_ => Map::new(),
				};
				Value::from(LogEntry::new(entry.message(), entry.level(), entry.channel(), context))
			}
			other => other.clone(),
		}
	}

	fn render_object(&self, object: &Arc<dyn LogObject>, depth: usize) -> Value {
		if let Some(described) = object.describe() {
			return self.render(&described, depth + 1);
		}

		if let Some(text) = object.display() {
			return Value::String(text);
		}

		match object.encode() {
			Ok(encoded) => match serde_json::from_str::<serde_json::Value>(&encoded) {
				Ok(json) => return self.render(&Value::from_json(json), depth + 1),
				Err(error) => {
					trace!(kind = object.type_name(), %error, "encoded object is not valid JSON");
				}
			},
			Err(error) => {
				trace!(kind = object.type_name(), %error, "object cannot be encoded");
			}
		}

		Value::String(format!(
			"Instance of {} ({:p})",
			object.type_name(),
			Arc::as_ptr(object) as *const ()
		))
	}
}
