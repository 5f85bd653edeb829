// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversion of classified arguments into log entries.

use tracing::trace;

use logwire_core::{Context, ErrorAggregate, FilterChain, LogEntry, LogLevel, Map, Throwable, Value};

use crate::classify::{classify, level_of, Classification};
use crate::context::EventContext;
use crate::guess::guess_channel;

const EMPTY_MESSAGE: &str = "Unknown error.";
const MAPPING_MESSAGE: &str = "Unknown error";

/// Turns raw event arguments into log entries.
///
/// Every produced entry has a level of at least the event floor.
#[derive(Debug, Default)]
pub struct Normalizer {
	channel_guess: FilterChain<String, ErrorAggregate>,
}

impl Normalizer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Filters applied to the channel guessed for a domain error. Each filter
	/// receives the current guess and the error.
	pub fn channel_guess_mut(&mut self) -> &mut FilterChain<String, ErrorAggregate> {
		&mut self.channel_guess
	}

	pub fn normalize(&self, args: &[Value], context: &EventContext) -> Vec<LogEntry> {
		let floor = context.floor();
		let default_channel = context.default_channel();

		let entries = match classify(args) {
			Classification::Empty => vec![LogEntry::new(
				EMPTY_MESSAGE,
				floor,
				default_channel,
				Context::new(),
			)],
			Classification::Entries(entries) => entries.into_iter().cloned().collect(),
			Classification::Mapping(map) => vec![from_mapping(map, &args[1..], default_channel)],
			Classification::DomainError(error) => {
				vec![self.from_domain_error(error, &args[1..], default_channel)]
			}
			Classification::Throwable(throwable) => {
				vec![from_throwable(throwable, &args[1..], default_channel)]
			}
			Classification::Text(text) => vec![from_text(text, &args[1..], default_channel)],
			Classification::Unrecognized => {
				trace!(
					kind = args.first().map(logwire_core::Value::type_name).unwrap_or("none"),
					"event arguments not recognized, skipping"
				);
				Vec::new()
			}
		};

		entries
			.into_iter()
			.map(|entry| entry.escalate(floor))
			.collect()
	}

	fn from_domain_error(
		&self,
		error: &ErrorAggregate,
		rest: &[Value],
		default_channel: &str,
	) -> LogEntry {
		let level = rest
			.first()
			.and_then(level_of)
			.unwrap_or(LogLevel::Notice.ordinal());

		let channel = match explicit_channel(rest.get(1)) {
			Some(channel) => channel,
			None => self
				.channel_guess
				.apply(guess_channel(error, default_channel), error),
		};

		let mut context = Context::new();
		context.insert(
			"error_codes".to_string(),
			Value::List(error.codes().map(Value::from).collect()),
		);
		context.insert(
			"error_data".to_string(),
			Value::Map(
				error
					.all_data()
					.iter()
					.map(|(code, data)| (code.clone(), data.clone()))
					.collect(),
			),
		);

		LogEntry::new(error.message(), level, channel, context)
	}
}

fn from_mapping(map: &Map, rest: &[Value], default_channel: &str) -> LogEntry {
	let message = map
		.get("message")
		.and_then(Value::as_text)
		.unwrap_or_else(|| MAPPING_MESSAGE.to_string());

	let level = map
		.get("level")
		.and_then(level_of)
		.unwrap_or(LogLevel::Debug.ordinal());

	let channel = explicit_channel(map.get("channel")).unwrap_or_else(|| default_channel.to_string());

	let context = match map.get("context") {
		Some(Value::Map(context)) => context.clone(),
		Some(other) => positional(std::slice::from_ref(other)),
		None => positional(rest),
	};

	LogEntry::new(message, level, channel, context)
}

fn from_throwable(throwable: &Throwable, rest: &[Value], default_channel: &str) -> LogEntry {
	let level = rest
		.first()
		.and_then(level_of)
		.unwrap_or(LogLevel::Error.ordinal());

	let channel = explicit_channel(rest.get(1)).unwrap_or_else(|| default_channel.to_string());

	let mut context = Context::new();
	context.insert("throwable".to_string(), Value::Map(throwable.to_context()));

	LogEntry::new(throwable.message(), level, channel, context)
}

fn from_text(message: String, rest: &[Value], default_channel: &str) -> LogEntry {
	let mut level = LogLevel::Debug.ordinal();
	let mut channel = default_channel.to_string();
	let mut consumed = 0;

	if let Some(explicit) = rest.first().and_then(level_of) {
		level = explicit;
		consumed = 1;

		if let Some(second @ Value::String(_)) = rest.get(1) {
			if let Some(explicit) = explicit_channel(Some(second)) {
				channel = explicit;
			}
			consumed = 2;
		}
	}

	let context = match &rest[consumed..] {
		[Value::Map(context)] => context.clone(),
		others => positional(others),
	};

	LogEntry::new(message, level, channel, context)
}

fn explicit_channel(value: Option<&Value>) -> Option<String> {
	value
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|channel| !channel.is_empty())
		.map(str::to_string)
}

/// Keys values by position: `"0"`, `"1"`, ...
fn positional(values: &[Value]) -> Context {
	values
		.iter()
		.enumerate()
		.map(|(index, value)| (index.to_string(), value.clone()))
		.collect()
}
