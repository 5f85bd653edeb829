// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registered channel names, ignore rules and the per-channel logger cache.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use regex::Regex;
use tracing::{debug, trace};

use logwire_config::IgnoreRuleConfig;
use logwire_core::{channel, ChannelName, FilterChain, LogEntry};
use logwire_registry::EntityRegistry;

use crate::error::{DispatchError, Result};
use crate::handler::Handler;
use crate::logger::ChannelLogger;
use crate::processor::Processor;

pub type HandlerRegistry = EntityRegistry<Arc<dyn Handler>>;
pub type ProcessorRegistry = EntityRegistry<Arc<dyn Processor>>;

/// Drops entries whose message matches `pattern`.
///
/// A threshold limits the rule to entries at or below that level; a channel
/// scope limits it to those channels.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
	pattern: Regex,
	threshold: Option<i32>,
	channels: Option<HashSet<String>>,
}

impl IgnoreRule {
	pub fn new(pattern: &str) -> Result<Self> {
		let pattern = Regex::new(pattern).map_err(|source| DispatchError::InvalidPattern {
			pattern: pattern.to_string(),
			source,
		})?;
		Ok(Self {
			pattern,
			threshold: None,
			channels: None,
		})
	}

	pub fn with_threshold(mut self, threshold: impl Into<i32>) -> Self {
		self.threshold = Some(threshold.into());
		self
	}

	pub fn with_channels<I, S>(mut self, channels: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.channels = Some(channels.into_iter().map(Into::into).collect());
		self
	}

	pub fn from_config(config: &IgnoreRuleConfig) -> Result<Self> {
		let mut rule = Self::new(&config.pattern)?;
		rule.threshold = config.threshold;
		if let Some(channels) = &config.channels {
			rule = rule.with_channels(channels.iter().cloned());
		}
		Ok(rule)
	}

	pub fn pattern(&self) -> &str {
		self.pattern.as_str()
	}

	pub fn matches(&self, entry: &LogEntry) -> bool {
		if !self.pattern.is_match(entry.message()) {
			return false;
		}
		if let Some(threshold) = self.threshold {
			if entry.level() > threshold {
				return false;
			}
		}
		match &self.channels {
			Some(channels) => channels.contains(entry.channel()),
			None => true,
		}
	}
}

/// Registries a channel-setup hook may register into.
pub struct ChannelSetup<'a> {
	pub handlers: &'a mut HandlerRegistry,
	pub processors: &'a mut ProcessorRegistry,
}

type ChannelSetupHook = Box<dyn FnMut(&str, &mut ChannelSetup<'_>) + Send>;

/// The set of known channels and the loggers built for them.
///
/// The set can be changed until the first logger is built; after that it is
/// frozen.
pub struct ChannelDirectory {
	channels: IndexSet<String>,
	frozen: bool,
	loggers: HashMap<String, Arc<ChannelLogger>>,
	handlers: HandlerRegistry,
	processors: ProcessorRegistry,
	ignore: Vec<IgnoreRule>,
	on_channel_setup: Option<ChannelSetupHook>,
}

impl ChannelDirectory {
	/// Seeds the set with the built-in channels plus `extra`, then runs the
	/// result through `filters` once. Names that are not valid channel names
	/// after filtering are dropped.
	pub fn new<I, S>(extra: I, filters: &FilterChain<Vec<String>>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let seeded: Vec<String> = channel::BUILT_IN
			.iter()
			.map(|name| name.to_string())
			.chain(extra.into_iter().map(Into::into))
			.collect();

		let mut channels = IndexSet::new();
		for name in filters.apply(seeded, &()) {
			if ChannelName::validate(&name) {
				channels.insert(name);
			} else {
				debug!(channel = %name, "dropping invalid channel name");
			}
		}

		Self {
			channels,
			frozen: false,
			loggers: HashMap::new(),
			handlers: EntityRegistry::new("handlers"),
			processors: EntityRegistry::new("processors"),
			ignore: Vec::new(),
			on_channel_setup: None,
		}
	}

	/// Adds a channel. Returns `false` once frozen or for an invalid name.
	pub fn add_channel(&mut self, name: &str) -> bool {
		if self.frozen {
			debug!(channel = %name, "channel set is frozen, add refused");
			return false;
		}
		if !ChannelName::validate(name) {
			return false;
		}
		self.channels.insert(name.to_string());
		true
	}

	/// Removes a channel. Returns `false` once frozen or for an invalid name.
	pub fn remove_channel(&mut self, name: &str) -> bool {
		if self.frozen {
			debug!(channel = %name, "channel set is frozen, remove refused");
			return false;
		}
		if !ChannelName::validate(name) {
			return false;
		}
		self.channels.shift_remove(name);
		true
	}

	pub fn has_channel(&self, name: &str) -> bool {
		self.channels.contains(name)
	}

	pub fn channels(&self) -> impl Iterator<Item = &str> {
		self.channels.iter().map(String::as_str)
	}

	pub fn is_frozen(&self) -> bool {
		self.frozen
	}

	/// Sets the hook fired once per channel, right before its logger is
	/// built.
	pub fn on_channel_setup<F>(&mut self, hook: F) -> &mut Self
	where
		F: FnMut(&str, &mut ChannelSetup<'_>) + Send + 'static,
	{
		self.on_channel_setup = Some(Box::new(hook));
		self
	}

	pub fn handlers(&self) -> &HandlerRegistry {
		&self.handlers
	}

	pub fn handlers_mut(&mut self) -> &mut HandlerRegistry {
		&mut self.handlers
	}

	pub fn processors(&self) -> &ProcessorRegistry {
		&self.processors
	}

	pub fn processors_mut(&mut self) -> &mut ProcessorRegistry {
		&mut self.processors
	}

	/// Returns the logger for `channel`, building it on first use.
	pub fn logger(&mut self, channel: &str) -> Result<Arc<ChannelLogger>> {
		if !self.channels.contains(channel) {
			return Err(DispatchError::InvalidChannel(channel.to_string()));
		}
		if let Some(logger) = self.loggers.get(channel) {
			return Ok(Arc::clone(logger));
		}

		if !self.frozen {
			trace!("freezing channel set");
			self.frozen = true;
		}

		debug!(channel = %channel, "building channel logger");
		if let Some(hook) = self.on_channel_setup.as_mut() {
			let mut setup = ChannelSetup {
				handlers: &mut self.handlers,
				processors: &mut self.processors,
			};
			hook(channel, &mut setup);
		}

		let handlers = self.handlers.find_for_channel(channel);
		let processors = self.processors.find_for_channel(channel);
		let logger = Arc::new(ChannelLogger::new(channel, processors, handlers));
		self.loggers.insert(channel.to_string(), Arc::clone(&logger));
		Ok(logger)
	}

	/// Replaces the ignore rules, after running them through `filters` once.
	pub fn set_ignore_rules(&mut self, rules: Vec<IgnoreRule>, filters: &FilterChain<Vec<IgnoreRule>>) {
		self.ignore = filters.apply(rules, &());
	}

	pub fn ignore_rules(&self) -> &[IgnoreRule] {
		&self.ignore
	}

	pub fn is_ignored(&self, entry: &LogEntry) -> bool {
		match self.ignore.iter().find(|rule| rule.matches(entry)) {
			Some(rule) => {
				trace!(pattern = rule.pattern(), channel = entry.channel(), "entry ignored");
				true
			}
			None => false,
		}
	}
}

impl fmt::Debug for ChannelDirectory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChannelDirectory")
			.field("channels", &self.channels)
			.field("frozen", &self.frozen)
			.field("loggers", &self.loggers.len())
			.field("handlers", &self.handlers)
			.field("processors", &self.processors)
			.field("ignore", &self.ignore.len())
			.finish()
	}
}
