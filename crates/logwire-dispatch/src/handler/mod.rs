// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Log destinations.

pub mod forward;
pub mod memory;
pub mod stream;

pub use forward::TracingHandler;
pub use memory::{MemoryHandler, StoredRecord};
pub use stream::{StreamFormat, StreamHandler};

use logwire_core::LogLevel;

use crate::error::HandlerError;
use crate::record::Record;

/// A destination for records.
///
/// Handlers are shared between channels, so `handle` takes `&self`; use
/// interior mutability for any state.
pub trait Handler: Send + Sync {
	fn name(&self) -> &str;

	/// Lowest level this handler accepts.
	fn min_level(&self) -> LogLevel {
		LogLevel::Debug
	}

	fn handles(&self, level: LogLevel) -> bool {
		level >= self.min_level()
	}

	fn handle(&self, record: &Record) -> Result<(), HandlerError>;
}
