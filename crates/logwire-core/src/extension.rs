// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Extension points: ordered chains of pure `(current, context) -> replacement`
//! functions.

use std::fmt;

type FilterFn<T, C> = Box<dyn Fn(T, &C) -> T + Send + Sync>;

/// An ordered chain of filters over a value of type `T`, given a read-only
/// context of type `C`.
///
/// Filters run in registration order, each receiving the previous output.
pub struct FilterChain<T, C = ()> {
	filters: Vec<FilterFn<T, C>>,
}

impl<T, C> FilterChain<T, C> {
	pub fn new() -> Self {
		Self {
			filters: Vec::new(),
		}
	}

	/// Appends a filter to the chain.
	pub fn add<F>(&mut self, filter: F) -> &mut Self
	where
		F: Fn(T, &C) -> T + Send + Sync + 'static,
	{
		self.filters.push(Box::new(filter));
		self
	}

	/// Runs `value` through every filter.
	pub fn apply(&self, value: T, context: &C) -> T {
		self.filters
			.iter()
			.fold(value, |current, filter| filter(current, context))
	}

	pub fn len(&self) -> usize {
		self.filters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.filters.is_empty()
	}
}

impl<T, C> Default for FilterChain<T, C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T, C> fmt::Debug for FilterChain<T, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FilterChain")
			.field("filters", &self.filters.len())
			.finish()
	}
}
