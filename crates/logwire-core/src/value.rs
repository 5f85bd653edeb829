// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loosely-typed values carried by event arguments and log contexts.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::Arc;

use crate::domain::{ErrorAggregate, RecordRef, Resource, Throwable};
use crate::entry::LogEntry;
use crate::object::LogObject;

/// Insertion-ordered string-keyed mapping.
pub type Map = IndexMap<String, Value>;

/// A log context: the data attached to an entry.
pub type Context = Map;

/// Any value an event may carry.
///
/// Scalars and containers mirror JSON. The remaining variants are the domain
/// shapes the normalizer and serializer recognize. `Object` is shared, so a
/// value graph may reference itself.
#[derive(Debug, Clone)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	List(Vec<Value>),
	Map(Map),
	Entry(Box<LogEntry>),
	Error(ErrorAggregate),
	Throwable(Throwable),
	Record(RecordRef),
	DateTime(DateTime<Utc>),
	Resource(Resource),
	Object(Arc<dyn LogObject>),
}

impl Value {
	/// Wraps any [`LogObject`] implementation.
	pub fn object<T: LogObject + 'static>(object: T) -> Self {
		Value::Object(Arc::new(object))
	}

	/// Short name of the variant, or the object's type name.
	pub fn type_name(&self) -> &str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::String(_) => "string",
			Value::List(_) => "list",
			Value::Map(_) => "map",
			Value::Entry(_) => "LogEntry",
			Value::Error(_) => "ErrorAggregate",
			Value::Throwable(t) => t.class(),
			Value::Record(r) => r.kind(),
			Value::DateTime(_) => "DateTime",
			Value::Resource(_) => "resource",
			Value::Object(o) => o.type_name(),
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// True for null, bool, int, float and string.
	pub fn is_scalar(&self) -> bool {
		matches!(
			self,
			Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
		)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&Map> {
		match self {
			Value::Map(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_entry(&self) -> Option<&LogEntry> {
		match self {
			Value::Entry(entry) => Some(entry),
			_ => None,
		}
	}

	/// Plain text for scalar values: strings as-is, numbers and booleans in
	/// their natural form. Structured values yield `None`.
	pub fn as_text(&self) -> Option<String> {
		match self {
			Value::String(s) => Some(s.clone()),
			Value::Int(i) => Some(i.to_string()),
			Value::Float(f) => Some(float_token(*f)),
			Value::Bool(b) => Some(b.to_string()),
			_ => None,
		}
	}

	/// Builds a value from parsed JSON.
	pub fn from_json(json: serde_json::Value) -> Self {
		match json {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Int(i),
				None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(items) => {
				Value::List(items.into_iter().map(Value::from_json).collect())
			}
			serde_json::Value::Object(fields) => Value::Map(
				fields
					.into_iter()
					.map(|(k, v)| (k, Value::from_json(v)))
					.collect(),
			),
		}
	}

	/// Best-effort JSON view of the value.
	///
	/// Non-finite floats become their literal tokens and objects become a
	/// `[object <type>]` marker; nothing is dereferenced.
	pub fn to_json(&self) -> serde_json::Value {
		use serde_json::Value as Json;

		match self {
			Value::Null => Json::Null,
			Value::Bool(b) => Json::Bool(*b),
			Value::Int(i) => Json::from(*i),
			Value::Float(f) => serde_json::Number::from_f64(*f)
				.map(Json::Number)
				.unwrap_or_else(|| Json::String(float_token(*f))),
			Value::String(s) => Json::String(s.clone()),
			Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
			Value::Map(map) => map_to_json(map),
			Value::Entry(entry) => serde_json::json!({
				"message": entry.message(),
				"level": entry.level(),
				"channel": entry.channel(),
				"context": map_to_json(entry.context()),
			}),
			Value::Error(error) => serde_json::json!({
				"codes": error.codes().collect::<Vec<_>>(),
				"message": error.message(),
			}),
			Value::Throwable(t) => serde_json::json!({
				"class": t.class(),
				"message": t.message(),
			}),
			Value::Record(r) => Json::String(r.to_string()),
			Value::DateTime(dt) => Json::String(dt.to_rfc3339()),
			Value::Resource(r) => Json::String(r.to_string()),
			Value::Object(o) => Json::String(format!("[object {}]", o.type_name())),
		}
	}
}

/// Textual form of a float, with explicit tokens for the non-finite values.
pub fn float_token(f: f64) -> String {
	if f.is_nan() {
		"NaN".to_string()
	} else if f == f64::INFINITY {
		"INF".to_string()
	} else if f == f64::NEG_INFINITY {
		"-INF".to_string()
	} else {
		f.to_string()
	}
}

fn map_to_json(map: &Map) -> serde_json::Value {
	serde_json::Value::Object(
		map.iter()
			.map(|(k, v)| (k.clone(), v.to_json()))
			.collect(),
	)
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Int(a), Value::Int(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
			(Value::String(a), Value::String(b)) => a == b,
			(Value::List(a), Value::List(b)) => a == b,
			(Value::Map(a), Value::Map(b)) => a == b,
			(Value::Entry(a), Value::Entry(b)) => a == b,
			(Value::Error(a), Value::Error(b)) => a == b,
			(Value::Throwable(a), Value::Throwable(b)) => a == b,
			(Value::Record(a), Value::Record(b)) => a == b,
			(Value::DateTime(a), Value::DateTime(b)) => a == b,
			(Value::Resource(a), Value::Resource(b)) => a == b,
			(Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<i32> for Value {
	fn from(i: i32) -> Self {
		Value::Int(i64::from(i))
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Int(i)
	}
}

impl From<u32> for Value {
	fn from(i: u32) -> Self {
		Value::Int(i64::from(i))
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Float(f)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Value::List(items)
	}
}

impl From<Map> for Value {
	fn from(map: Map) -> Self {
		Value::Map(map)
	}
}

impl From<LogEntry> for Value {
	fn from(entry: LogEntry) -> Self {
		Value::Entry(Box::new(entry))
	}
}

impl From<ErrorAggregate> for Value {
	fn from(error: ErrorAggregate) -> Self {
		Value::Error(error)
	}
}

impl From<Throwable> for Value {
	fn from(t: Throwable) -> Self {
		Value::Throwable(t)
	}
}

impl From<RecordRef> for Value {
	fn from(r: RecordRef) -> Self {
		Value::Record(r)
	}
}

impl From<Resource> for Value {
	fn from(r: Resource) -> Self {
		Value::Resource(r)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(dt: DateTime<Utc>) -> Self {
		Value::DateTime(dt)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

/// Builds a [`Map`] from `key => value` pairs, converting values with
/// [`Into<Value>`].
///
/// ```
/// let ctx = logwire_core::map! { "user" => "alice", "attempts" => 3 };
/// assert_eq!(ctx.len(), 2);
/// ```
#[macro_export]
macro_rules! map {
	() => {
		$crate::Map::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut map = $crate::Map::new();
		$(
			map.insert(::std::string::String::from($key), $crate::Value::from($value));
		)+
		map
	}};
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn json_roundtrip_preserves_shape() {
		let json = json!({"a": 1, "b": [true, null, "x"], "c": {"d": 1.5}});
		let value = Value::from_json(json.clone());
		assert_eq!(value.to_json(), json);
	}

	#[test]
	fn map_macro_keeps_insertion_order() {
		let map = map! { "z" => 1, "a" => "two", "m" => Value::Null };
		let keys: Vec<&str> = map.keys().map(String::as_str).collect();
		assert_eq!(keys, vec!["z", "a", "m"]);
	}

	#[test]
	fn non_finite_floats_become_tokens_in_json() {
		assert_eq!(Value::Float(f64::INFINITY).to_json(), json!("INF"));
		assert_eq!(Value::Float(f64::NAN).to_json(), json!("NaN"));
	}

	#[test]
	fn as_text_only_for_scalars() {
		assert_eq!(Value::from(42).as_text().as_deref(), Some("42"));
		assert_eq!(Value::from("hi").as_text().as_deref(), Some("hi"));
		assert_eq!(Value::List(vec![]).as_text(), None);
		assert_eq!(Value::Null.as_text(), None);
	}

	#[test]
	fn as_text_uses_float_tokens() {
		assert_eq!(Value::Float(f64::INFINITY).as_text().as_deref(), Some("INF"));
		assert_eq!(Value::Float(f64::NAN).as_text().as_deref(), Some("NaN"));
		assert_eq!(Value::Float(1.5).as_text().as_deref(), Some("1.5"));
	}

	#[test]
	fn nan_equals_nan() {
		assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
	}
}
