// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Channel guessing for domain errors.

use logwire_core::channel::{DB, HTTP, SECURITY};
use logwire_core::{ErrorAggregate, Value};

const KEYWORDS: &[(&str, &[&str])] = &[
	(DB, &["db", "sql", "database", "query", "table", "wpdb"]),
	(
		HTTP,
		&["http", "mail", "rest", "api", "request", "curl", "remote", "smtp"],
	),
	(
		SECURITY,
		&[
			"auth",
			"login",
			"cookie",
			"password",
			"nonce",
			"permission",
			"capability",
			"user",
		],
	),
];

/// Picks a channel for `error`.
///
/// A `channel` string in the error's data wins. Otherwise each code is checked,
/// in order, against the keyword groups; the first hit decides. Codes that
/// match nothing leave `default_channel`.
pub fn guess_channel(error: &ErrorAggregate, default_channel: &str) -> String {
	if let Some(channel) = annotated_channel(error) {
		return channel.to_string();
	}

	for code in error.codes() {
		let code = code.to_ascii_lowercase();
		for (channel, keywords) in KEYWORDS {
			if keywords.iter().any(|keyword| code.contains(keyword)) {
				return channel.to_string();
			}
		}
	}

	default_channel.to_string()
}

fn annotated_channel(error: &ErrorAggregate) -> Option<&str> {
	error.all_data().values().find_map(|data| match data {
		Value::Map(map) => map
			.get("channel")
			.and_then(Value::as_str)
			.map(str::trim)
			.filter(|channel| !channel.is_empty()),
		_ => None,
	})
}
