// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event entry point: normalize, filter, serialize, deliver.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use logwire_config::{DefaultHandler, LogwireConfig};
use logwire_core::{ErrorAggregate, FilterChain, LogEntry, LogLevel, Value};
use logwire_normalize::{EventContext, Normalizer};
use logwire_registry::Registration;
use logwire_serialize::ContextSerializer;

use crate::channels::{ChannelDirectory, IgnoreRule};
use crate::error::{DispatchError, Result};
use crate::handler::{Handler, MemoryHandler, StreamHandler, TracingHandler};
use crate::logger::{ChannelLogger, Logger};
use crate::processor::Processor;

/// Registry id of the handler installed from [`LogwireConfig::default_handler`].
pub const DEFAULT_HANDLER_ID: &str = "default";
/// Registry id of the in-memory buffer, when enabled.
pub const MEMORY_HANDLER_ID: &str = "memory";

type LoggerErrorHook = Box<dyn FnMut(&LogEntry, &DispatchError) + Send>;
type Gate = Box<dyn Fn() -> bool + Send + Sync>;

/// Routes log entries to their channel loggers.
///
/// A dispatcher starts inactive; call [`Dispatcher::activate`] once the host
/// is ready. Failures never propagate out of [`Dispatcher::update`] or
/// [`Dispatcher::on_event`]: they are traced and reported to the
/// logger-error hooks.
pub struct Dispatcher {
	directory: ChannelDirectory,
	serializer: ContextSerializer,
	normalizer: Normalizer,
	default_channel: String,
	min_level: LogLevel,
	enabled: bool,
	active: bool,
	gate: Option<Gate>,
	on_logger_error: Vec<LoggerErrorHook>,
	memory: Option<MemoryHandler>,
}

impl Dispatcher {
	pub fn from_config(config: LogwireConfig) -> Result<Self> {
		DispatcherBuilder::new(config).build()
	}

	pub fn activate(&mut self) {
		self.active = true;
	}

	pub fn deactivate(&mut self) {
		self.active = false;
	}

	/// Whether entries are currently delivered: enabled by configuration,
	/// activated, and let through by the gate if one is set.
	pub fn is_active(&self) -> bool {
		self.enabled && self.active && self.gate.as_ref().map_or(true, |gate| gate())
	}

	/// Adds an external condition checked on every delivery.
	pub fn set_gate<F>(&mut self, gate: F)
	where
		F: Fn() -> bool + Send + Sync + 'static,
	{
		self.gate = Some(Box::new(gate));
	}

	/// Registers a hook told about every entry that could not be delivered.
	pub fn on_logger_error<F>(&mut self, hook: F)
	where
		F: FnMut(&LogEntry, &DispatchError) + Send + 'static,
	{
		self.on_logger_error.push(Box::new(hook));
	}

	/// Normalizes the arguments of `event_name` and delivers every resulting
	/// entry. Returns how many were delivered.
	pub fn on_event(&mut self, event_name: &str, args: &[Value]) -> usize {
		if !self.is_active() {
			return 0;
		}

		let context = EventContext::from_event_name(event_name, self.default_channel.as_str());
		let entries = self.normalizer.normalize(args, &context);
		trace!(event = event_name, entries = entries.len(), "event normalized");

		let mut delivered = 0;
		for entry in &entries {
			if self.update(entry) {
				delivered += 1;
			}
		}
		delivered
	}

	/// Delivers one entry. Returns `true` when a channel logger accepted it.
	pub fn update(&mut self, entry: &LogEntry) -> bool {
		if !self.is_active() {
			return false;
		}
		let Some(level) = entry.log_level() else {
			trace!(level = entry.level(), "entry has no level, skipping");
			return false;
		};
		if level < self.min_level {
			return false;
		}
		if self.directory.is_ignored(entry) {
			return false;
		}

		let context = self.serializer.serialize_context(entry.context());
		match self.deliver(entry.channel(), level, entry.message(), context) {
			Ok(()) => true,
			Err(error) => {
				warn!(channel = entry.channel(), error = %error, "failed to deliver log entry");
				for hook in &mut self.on_logger_error {
					hook(entry, &error);
				}
				false
			}
		}
	}

	fn deliver(
		&mut self,
		channel: &str,
		level: LogLevel,
		message: &str,
		context: logwire_core::Context,
	) -> Result<()> {
		let logger = self.directory.logger(channel)?;
		logger
			.log(level, message, context)
			.map_err(|source| DispatchError::Delivery {
				channel: channel.to_string(),
				source,
			})
	}

	/// The logger for `channel`, for direct use through [`Logger`].
	///
	/// Records logged this way skip normalization and context masking.
	pub fn logger(&mut self, channel: &str) -> Result<Arc<ChannelLogger>> {
		self.directory.logger(channel)
	}

	/// Registers a handler; no channels means every channel.
	pub fn add_handler(&mut self, id: &str, handler: Arc<dyn Handler>, channels: &[&str]) -> Registration {
		self.directory.handlers_mut().add_entity(id, handler, channels)
	}

	/// Registers a processor; no channels means every channel.
	pub fn add_processor(
		&mut self,
		id: &str,
		processor: Arc<dyn Processor>,
		channels: &[&str],
	) -> Registration {
		self.directory.processors_mut().add_entity(id, processor, channels)
	}

	pub fn directory(&self) -> &ChannelDirectory {
		&self.directory
	}

	pub fn directory_mut(&mut self) -> &mut ChannelDirectory {
		&mut self.directory
	}

	pub fn serializer(&self) -> &ContextSerializer {
		&self.serializer
	}

	pub fn serializer_mut(&mut self) -> &mut ContextSerializer {
		&mut self.serializer
	}

	pub fn normalizer_mut(&mut self) -> &mut Normalizer {
		&mut self.normalizer
	}

	pub fn default_channel(&self) -> &str {
		&self.default_channel
	}

	pub fn min_level(&self) -> LogLevel {
		self.min_level
	}

	/// The in-memory buffer, if [`DispatcherBuilder::with_memory_buffer`] was
	/// used.
	pub fn memory(&self) -> Option<&MemoryHandler> {
		self.memory.as_ref()
	}
}

impl fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatcher")
			.field("directory", &self.directory)
			.field("default_channel", &self.default_channel)
			.field("min_level", &self.min_level)
			.field("enabled", &self.enabled)
			.field("active", &self.active)
			.field("gate", &self.gate.is_some())
			.field("on_logger_error", &self.on_logger_error.len())
			.finish()
	}
}

/// Builds a [`Dispatcher`] from configuration and extension filters.
pub struct DispatcherBuilder {
	config: LogwireConfig,
	channel_filters: FilterChain<Vec<String>>,
	ignore_filters: FilterChain<Vec<IgnoreRule>>,
	masked_key_filters: FilterChain<Vec<String>>,
	channel_guess: FilterChain<String, ErrorAggregate>,
	memory_buffer: bool,
}

impl DispatcherBuilder {
	pub fn new(config: LogwireConfig) -> Self {
		Self {
			config,
			channel_filters: FilterChain::new(),
			ignore_filters: FilterChain::new(),
			masked_key_filters: FilterChain::new(),
			channel_guess: FilterChain::new(),
			memory_buffer: false,
		}
	}

	/// Adds a filter over the registered channel names.
	pub fn channel_filter<F>(mut self, filter: F) -> Self
	where
		F: Fn(Vec<String>, &()) -> Vec<String> + Send + Sync + 'static,
	{
		self.channel_filters.add(filter);
		self
	}

	/// Adds a filter over the ignore rules.
	pub fn ignore_filter<F>(mut self, filter: F) -> Self
	where
		F: Fn(Vec<IgnoreRule>, &()) -> Vec<IgnoreRule> + Send + Sync + 'static,
	{
		self.ignore_filters.add(filter);
		self
	}

	/// Adds a filter over the masked context keys.
	pub fn masked_key_filter<F>(mut self, filter: F) -> Self
	where
		F: Fn(Vec<String>, &()) -> Vec<String> + Send + Sync + 'static,
	{
		self.masked_key_filters.add(filter);
		self
	}

	/// Adds a filter over the channel guessed for domain errors.
	pub fn channel_guess<F>(mut self, filter: F) -> Self
	where
		F: Fn(String, &ErrorAggregate) -> String + Send + Sync + 'static,
	{
		self.channel_guess.add(filter);
		self
	}

	/// Also records every entry in a [`MemoryHandler`] sized by
	/// `buffer_capacity`.
	pub fn with_memory_buffer(mut self) -> Self {
		self.memory_buffer = true;
		self
	}

	pub fn build(self) -> Result<Dispatcher> {
		let config = self.config;

		let mut directory = ChannelDirectory::new(
			config.channels.iter().map(|name| name.as_str().to_string()),
			&self.channel_filters,
		);
		if !directory.has_channel(config.default_channel.as_str()) {
			return Err(DispatchError::InvalidChannel(config.default_channel.into_inner()));
		}

		let rules = config
			.ignore
			.iter()
			.map(IgnoreRule::from_config)
			.collect::<Result<Vec<_>>>()?;
		directory.set_ignore_rules(rules, &self.ignore_filters);

		let default_handler: Option<Arc<dyn Handler>> = match config.default_handler {
			DefaultHandler::Stderr => Some(Arc::new(StreamHandler::stderr())),
			DefaultHandler::Tracing => Some(Arc::new(TracingHandler::new())),
			DefaultHandler::None => None,
		};
		if let Some(handler) = default_handler {
			debug!(handler = handler.name(), "installing default handler");
			directory
				.handlers_mut()
				.add_entity(DEFAULT_HANDLER_ID, handler, &[]);
		}

		let memory = self.memory_buffer.then(|| {
			let memory = MemoryHandler::new(config.buffer_capacity);
			directory
				.handlers_mut()
				.add_entity(MEMORY_HANDLER_ID, Arc::new(memory.clone()), &[]);
			memory
		});

		let serializer =
			ContextSerializer::with_masked_keys(config.masked_keys.iter().cloned(), &self.masked_key_filters);

		let mut normalizer = Normalizer::new();
		*normalizer.channel_guess_mut() = self.channel_guess;

		info!(
			enabled = config.enabled,
			default_channel = %config.default_channel,
			min_level = %config.min_level,
			channels = directory.channels().count(),
			"dispatcher built"
		);

		Ok(Dispatcher {
			directory,
			serializer,
			normalizer,
			default_channel: config.default_channel.into_inner(),
			min_level: config.min_level,
			enabled: config.enabled,
			active: false,
			gate: None,
			on_logger_error: Vec::new(),
			memory,
		})
	}
}

impl fmt::Debug for DispatcherBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DispatcherBuilder")
			.field("config", &self.config)
			.field("memory_buffer", &self.memory_buffer)
			.finish_non_exhaustive()
	}
}
