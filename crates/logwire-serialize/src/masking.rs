// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Context keys whose values are never persisted.

use std::collections::HashSet;

use logwire_core::FilterChain;

/// Replacement written in place of a masked value.
pub const MASK: &str = "***";

/// Keys masked out of the box.
pub const DEFAULT_MASKED_KEYS: &[&str] = &[
	"password",
	"pass",
	"pwd",
	"passwd",
	"secret",
	"token",
	"auth_token",
	"access_token",
	"refresh_token",
	"api_key",
	"apikey",
	"private_key",
	"client_secret",
	"auth",
	"authorization",
	"cookie",
	"session",
	"user_pass",
	"nonce",
	"credentials",
];

/// The built-in key list as owned strings, ready to be extended.
pub fn default_masked_keys() -> Vec<String> {
	DEFAULT_MASKED_KEYS.iter().map(|k| k.to_string()).collect()
}

/// A set of key names compared exactly and case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedKeys {
	keys: HashSet<String>,
}

impl MaskedKeys {
	pub fn new<I, S>(keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			keys: keys.into_iter().map(Into::into).collect(),
		}
	}

	/// The built-in list plus `extra`, passed once through `filters`.
	pub fn resolve<I, S>(extra: I, filters: &FilterChain<Vec<String>>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut keys = default_masked_keys();
		keys.extend(extra.into_iter().map(Into::into));
		Self::new(filters.apply(keys, &()))
	}

	pub fn contains(&self, key: &str) -> bool {
		self.keys.contains(key)
	}

	pub fn insert(&mut self, key: impl Into<String>) -> bool {
		self.keys.insert(key.into())
	}

	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.keys.iter().map(String::as_str)
	}
}

impl Default for MaskedKeys {
	fn default() -> Self {
		Self::new(DEFAULT_MASKED_KEYS.iter().copied())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_cover_common_secrets() {
		let keys = MaskedKeys::default();
		for key in ["password", "token", "api_key", "authorization", "nonce"] {
			assert!(keys.contains(key), "{key} should be masked");
		}
		assert_eq!(keys.len(), DEFAULT_MASKED_KEYS.len());
	}

	#[test]
	fn comparison_is_case_sensitive() {
		let keys = MaskedKeys::default();
		assert!(!keys.contains("Password"));
		assert!(!keys.contains("TOKEN"));
		assert!(!keys.contains("password_hint"));
	}

	#[test]
	fn resolve_extends_and_filters() {
		let mut filters: FilterChain<Vec<String>> = FilterChain::new();
		filters.add(|mut keys, _| {
			keys.retain(|k| k != "session");
			keys.push("ssn".to_string());
			keys
		});

		let keys = MaskedKeys::resolve(["card_number"], &filters);
		assert!(keys.contains("card_number"));
		assert!(keys.contains("ssn"));
		assert!(!keys.contains("session"));
		assert!(keys.contains("password"));
	}
}
