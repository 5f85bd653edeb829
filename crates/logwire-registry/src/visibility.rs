// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-channel visibility with a wildcard fallback.

use std::collections::HashMap;

/// Which channels an entity is visible on.
///
/// Precedence: an explicit per-channel flag wins over the wildcard, and the
/// wildcard wins over the implicit default of "not visible".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
	wildcard: Option<bool>,
	channels: HashMap<String, bool>,
}

impl Visibility {
	/// Visible on every channel.
	pub fn everywhere() -> Self {
		Self {
			wildcard: Some(true),
			channels: HashMap::new(),
		}
	}

	/// Visible only on the given channels.
	pub fn only<S: AsRef<str>>(channels: &[S]) -> Self {
		let mut visibility = Self::default();
		visibility.enable(channels);
		visibility
	}

	pub fn is_visible(&self, channel: &str) -> bool {
		self.channels
			.get(channel)
			.copied()
			.or(self.wildcard)
			.unwrap_or(false)
	}

	/// True when at least one channel could see the entity.
	pub fn is_visible_anywhere(&self) -> bool {
		self.wildcard == Some(true) || self.channels.values().any(|visible| *visible)
	}

	pub fn wildcard(&self) -> Option<bool> {
		self.wildcard
	}

	/// The explicit flag for `channel`, if one was set.
	pub fn explicit(&self, channel: &str) -> Option<bool> {
		self.channels.get(channel).copied()
	}

	/// Enables the given channels, or the wildcard when `channels` is empty.
	///
	/// Explicit entries are added or flipped to `true`; an existing wildcard
	/// is left untouched.
	pub fn enable<S: AsRef<str>>(&mut self, channels: &[S]) {
		self.set(channels, true);
	}

	/// Disables the given channels, or the wildcard when `channels` is empty.
	pub fn disable<S: AsRef<str>>(&mut self, channels: &[S]) {
		self.set(channels, false);
	}

	fn set<S: AsRef<str>>(&mut self, channels: &[S], flag: bool) {
		if channels.is_empty() {
			self.wildcard = Some(flag);
			return;
		}
		for channel in channels {
			self.channels.insert(channel.as_ref().to_string(), flag);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const NONE: [&str; 0] = [];

	proptest! {
		#[test]
		fn explicit_entry_beats_wildcard(channel in "[A-Z]{1,8}", wildcard in any::<bool>(), explicit in any::<bool>()) {
			let mut visibility = Visibility::default();
			visibility.set(&NONE, wildcard);
			visibility.set(&[channel.as_str()], explicit);
			prop_assert_eq!(visibility.is_visible(&channel), explicit);
		}

		#[test]
		fn wildcard_applies_to_unlisted_channels(channel in "[A-Z]{1,8}", wildcard in any::<bool>()) {
			let mut visibility = Visibility::default();
			visibility.set(&NONE, wildcard);
			prop_assert_eq!(visibility.is_visible(&channel), wildcard);
		}
	}

	#[test]
	fn default_is_invisible() {
		let visibility = Visibility::default();
		assert!(!visibility.is_visible("HTTP"));
		assert!(!visibility.is_visible_anywhere());
	}

	#[test]
	fn disabling_one_channel_keeps_the_rest() {
		let mut visibility = Visibility::everywhere();
		visibility.disable(&["X"]);

		assert!(!visibility.is_visible("X"));
		assert!(visibility.is_visible("Y"));
		assert!(visibility.is_visible_anywhere());
	}

	#[test]
	fn re_enabling_restores_only_that_channel() {
		let mut visibility = Visibility::only(&["A"]);
		visibility.disable(&["A"]);
		visibility.enable(&["A"]);

		assert!(visibility.is_visible("A"));
		assert!(!visibility.is_visible("B"));
	}

	#[test]
	fn wildcard_re_enable_does_not_override_explicit_disable() {
		let mut visibility = Visibility::everywhere();
		visibility.disable(&NONE);
		visibility.disable(&["X"]);
		visibility.enable(&NONE);

		assert!(!visibility.is_visible("X"));
		assert!(visibility.is_visible("Y"));
	}

	#[test]
	fn explicit_enable_keeps_wildcard() {
		let mut visibility = Visibility::everywhere();
		visibility.enable(&["A"]);
		assert_eq!(visibility.wildcard(), Some(true));
		assert!(visibility.is_visible("B"));
	}
}
