// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shape detection for raw event arguments.

use logwire_core::{ErrorAggregate, LogEntry, LogLevel, Map, Throwable, Value};

/// What an argument list looks like. The first matching shape wins.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification<'a> {
	/// No arguments at all.
	Empty,
	/// At least one argument is already a log entry.
	Entries(Vec<&'a LogEntry>),
	/// The primary argument is a mapping with `message`/`level`/... keys.
	Mapping(&'a Map),
	/// The primary argument is a multi-code domain error.
	DomainError(&'a ErrorAggregate),
	/// The primary argument is an exception-like value.
	Throwable(&'a Throwable),
	/// The primary argument is plain text (or a number or boolean).
	Text(String),
	/// Nothing usable.
	Unrecognized,
}

pub fn classify(args: &[Value]) -> Classification<'_> {
	let Some(primary) = args.first() else {
		return Classification::Empty;
	};

	let entries: Vec<&LogEntry> = args.iter().filter_map(Value::as_entry).collect();
	if !entries.is_empty() {
		return Classification::Entries(entries);
	}

	match primary {
		Value::Map(map) => Classification::Mapping(map),
		Value::Error(error) => Classification::DomainError(error),
		Value::Throwable(throwable) => Classification::Throwable(throwable),
		other => match other.as_text() {
			Some(text) => Classification::Text(text),
			None => Classification::Unrecognized,
		},
	}
}

/// Reads a severity from an argument: an integer ordinal or a level name.
///
/// Integers outside the `i32` range saturate. Anything else yields `None`.
pub fn level_of(value: &Value) -> Option<i32> {
	match value {
		Value::Int(raw) => Some(i32::try_from(*raw).unwrap_or(if *raw < 0 {
			i32::MIN
		} else {
			i32::MAX
		})),
		Value::String(name) => LogLevel::from_name(name)
			.map(|level| level.ordinal())
			.or_else(|| name.trim().parse::<i32>().ok()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use logwire_core::map;

	#[test]
	fn empty_arguments() {
		assert_eq!(classify(&[]), Classification::Empty);
	}

	#[test]
	fn entries_take_priority_wherever_they_are() {
		let entry = LogEntry::new("hi", 200, "HTTP", map! {});
		let args = vec![Value::from("text"), Value::from(entry.clone())];
		assert_eq!(classify(&args), Classification::Entries(vec![&entry]));
	}

	#[test]
	fn primary_shapes() {
		let map = map! { "message" => "m" };
		assert_eq!(
			classify(&[Value::Map(map.clone())]),
			Classification::Mapping(&map)
		);

		let error = ErrorAggregate::single("code", "msg");
		assert_eq!(
			classify(&[Value::Error(error.clone())]),
			Classification::DomainError(&error)
		);

		let throwable = Throwable::new("Boom", "bang");
		assert_eq!(
			classify(&[Value::Throwable(throwable.clone())]),
			Classification::Throwable(&throwable)
		);

		assert_eq!(
			classify(&[Value::from("plain")]),
			Classification::Text("plain".to_string())
		);
		assert_eq!(classify(&[Value::Int(7)]), Classification::Text("7".to_string()));
	}

	#[test]
	fn scalar_primaries_become_text() {
		assert_eq!(classify(&[Value::Bool(false)]), Classification::Text("false".to_string()));
		assert_eq!(classify(&[Value::Float(2.5)]), Classification::Text("2.5".to_string()));
		assert_eq!(
			classify(&[Value::Float(f64::INFINITY)]),
			Classification::Text("INF".to_string())
		);
		assert_eq!(
			classify(&[Value::Float(f64::NAN)]),
			Classification::Text("NaN".to_string())
		);
	}

	#[test]
	fn unusable_primary() {
		assert_eq!(classify(&[Value::Null]), Classification::Unrecognized);
		assert_eq!(classify(&[Value::List(vec![])]), Classification::Unrecognized);
	}

	#[test]
	fn levels_from_ints_and_names() {
		assert_eq!(level_of(&Value::Int(550)), Some(550));
		assert_eq!(level_of(&Value::from("warning")), Some(300));
		assert_eq!(level_of(&Value::from("CRIT")), Some(500));
		assert_eq!(level_of(&Value::from("250")), Some(250));
		assert_eq!(level_of(&Value::from("loud")), None);
		assert_eq!(level_of(&Value::Int(i64::MAX)), Some(i32::MAX));
		assert_eq!(level_of(&Value::Bool(true)), None);
	}
}
