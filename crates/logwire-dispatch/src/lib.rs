// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery side of logwire.
//!
//! This crate provides:
//! - [`Dispatcher`] - turns raw events into entries and delivers them
//! - [`ChannelDirectory`] - registered channels, ignore rules, logger cache
//! - [`ChannelLogger`] and the [`Logger`] contract
//! - [`Handler`]s ([`MemoryHandler`], [`StreamHandler`], [`TracingHandler`])
//!   and [`Processor`]s
//!
//! # Usage
//!
//! ```ignore
//! use logwire_config::load_config;
//! use logwire_core::Value;
//! use logwire_dispatch::Dispatcher;
//!
//! let mut dispatcher = Dispatcher::from_config(load_config()?)?;
//! dispatcher.activate();
//! dispatcher.on_event("logwire.log.error", &[Value::from("payment failed")]);
//! ```

pub mod channels;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod logger;
pub mod processor;
pub mod record;

pub use channels::{ChannelDirectory, ChannelSetup, HandlerRegistry, IgnoreRule, ProcessorRegistry};
pub use dispatcher::{Dispatcher, DispatcherBuilder, DEFAULT_HANDLER_ID, MEMORY_HANDLER_ID};
pub use error::{DeliveryError, DispatchError, HandlerError, Result};
pub use handler::{
	Handler, MemoryHandler, StoredRecord, StreamFormat, StreamHandler, TracingHandler,
};
pub use logger::{ChannelLogger, Logger};
pub use processor::{Processor, StaticExtraProcessor};
pub use record::Record;
