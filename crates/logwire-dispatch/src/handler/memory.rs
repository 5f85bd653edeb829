// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Thread-safe ring buffer handler.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use logwire_config::DEFAULT_BUFFER_CAPACITY;
use logwire_core::LogLevel;

use super::Handler;
use crate::error::HandlerError;
use crate::record::Record;

/// A record kept by [`MemoryHandler`], tagged with a monotonically increasing
/// id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
	pub id: u64,
	pub record: Record,
}

/// Keeps the most recent records in memory.
///
/// When the buffer is full, the oldest record is evicted. Clones share the
/// same buffer, so one clone can be registered as a handler while another is
/// kept for queries.
#[derive(Clone)]
pub struct MemoryHandler {
	inner: Arc<MemoryHandlerInner>,
}

struct MemoryHandlerInner {
	records: RwLock<VecDeque<StoredRecord>>,
	capacity: usize,
	next_id: RwLock<u64>,
	min_level: LogLevel,
}

impl MemoryHandler {
	/// Creates a handler keeping at most `capacity` records (at least one).
	pub fn new(capacity: usize) -> Self {
		Self::with_min_level(capacity, LogLevel::Debug)
	}

	pub fn with_default_capacity() -> Self {
		Self::new(DEFAULT_BUFFER_CAPACITY)
	}

	/// A handler that only accepts records at `min_level` or above.
	pub fn with_min_level(capacity: usize, min_level: LogLevel) -> Self {
		let capacity = capacity.max(1);
		Self {
			inner: Arc::new(MemoryHandlerInner {
				records: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
				capacity,
				next_id: RwLock::new(1),
				min_level,
			}),
		}
	}

	fn push(&self, record: Record) {
		let id = {
			let mut next_id = self.inner.next_id.write();
			let id = *next_id;
			*next_id += 1;
			id
		};

		let mut records = self.inner.records.write();
		if records.len() >= self.inner.capacity {
			records.pop_front();
		}
		records.push_back(StoredRecord { id, record });
	}

	/// Returns up to `limit` of the most recent records, oldest first.
	///
	/// Optionally filtered by minimum level and exact channel. If `after_id`
	/// is provided, only records with a greater id are returned.
	pub fn get_records(
		&self,
		limit: usize,
		min_level: Option<LogLevel>,
		channel: Option<&str>,
		after_id: Option<u64>,
	) -> Vec<StoredRecord> {
		let records = self.inner.records.read();

		let mut matched: Vec<StoredRecord> = records
			.iter()
			.rev()
			.filter(|stored| {
				if let Some(min) = min_level {
					if stored.record.level < min {
						return false;
					}
				}
				if let Some(channel) = channel {
					if stored.record.channel != channel {
						return false;
					}
				}
				if let Some(after) = after_id {
					if stored.id <= after {
						return false;
					}
				}
				true
			})
			.take(limit)
			.cloned()
			.collect();
		matched.reverse();
		matched
	}

	/// Every record currently held, oldest first.
	pub fn records(&self) -> Vec<Record> {
		self.inner
			.records
			.read()
			.iter()
			.map(|stored| stored.record.clone())
			.collect()
	}

	pub fn len(&self) -> usize {
		self.inner.records.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.records.read().is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.inner.capacity
	}

	/// The id the next record will receive.
	pub fn current_id(&self) -> u64 {
		*self.inner.next_id.read()
	}

	pub fn clear(&self) {
		self.inner.records.write().clear();
	}
}

impl Default for MemoryHandler {
	fn default() -> Self {
		Self::with_default_capacity()
	}
}

impl std::fmt::Debug for MemoryHandler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryHandler")
			.field("len", &self.len())
			.field("capacity", &self.inner.capacity)
			.finish()
	}
}

impl Handler for MemoryHandler {
	fn name(&self) -> &str {
		"memory"
	}

	fn min_level(&self) -> LogLevel {
		self.inner.min_level
	}

	fn handle(&self, record: &Record) -> Result<(), HandlerError> {
		self.push(record.clone());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use logwire_core::map;
	use proptest::prelude::*;

	fn record(channel: &str, level: LogLevel, message: &str) -> Record {
		Record::new(channel, level, message, map! {})
	}

	#[test]
	fn test_handle_and_get() {
		let handler = MemoryHandler::new(100);

		handler.handle(&record("HTTP", LogLevel::Info, "message 1")).unwrap();
		handler.handle(&record("DB", LogLevel::Warning, "message 2")).unwrap();

		let records = handler.get_records(10, None, None, None);
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].record.message, "message 1");
		assert_eq!(records[1].record.message, "message 2");
	}

	#[test]
	fn test_capacity_eviction() {
		let handler = MemoryHandler::new(3);

		for i in 1..=4 {
			handler
				.handle(&record("HTTP", LogLevel::Info, &format!("msg {i}")))
				.unwrap();
		}

		assert_eq!(handler.len(), 3);
		let records = handler.get_records(10, None, None, None);
		assert_eq!(records[0].record.message, "msg 2");
		assert_eq!(records[2].record.message, "msg 4");
	}

	#[test]
	fn test_filters() {
		let handler = MemoryHandler::new(10);
		handler.handle(&record("HTTP", LogLevel::Debug, "a")).unwrap();
		handler.handle(&record("DB", LogLevel::Error, "b")).unwrap();
		handler.handle(&record("HTTP", LogLevel::Critical, "c")).unwrap();

		let errors = handler.get_records(10, Some(LogLevel::Error), None, None);
		assert_eq!(errors.len(), 2);

		let http = handler.get_records(10, None, Some("HTTP"), None);
		assert_eq!(http.len(), 2);

		let after = handler.get_records(10, None, None, Some(2));
		assert_eq!(after.len(), 1);
		assert_eq!(after[0].record.message, "c");

		let latest = handler.get_records(1, None, None, None);
		assert_eq!(latest[0].record.message, "c");
	}

	#[test]
	fn test_clones_share_buffer() {
		let handler = MemoryHandler::new(10);
		let registered: Arc<dyn Handler> = Arc::new(handler.clone());
		registered.handle(&record("CRON", LogLevel::Info, "tick")).unwrap();
		assert_eq!(handler.len(), 1);
		assert_eq!(handler.current_id(), 2);
	}

	#[test]
	fn test_min_level() {
		let handler = MemoryHandler::with_min_level(10, LogLevel::Warning);
		assert!(!handler.handles(LogLevel::Info));
		assert!(handler.handles(LogLevel::Warning));
		assert_eq!(handler.capacity(), 10);
	}

	proptest! {
		#[test]
		fn never_exceeds_capacity(capacity in 1usize..20, pushes in 0usize..60) {
			let handler = MemoryHandler::new(capacity);
			for _ in 0..pushes {
				handler.handle(&record("DEBUG", LogLevel::Debug, "m")).unwrap();
			}
			prop_assert_eq!(handler.len(), pushes.min(capacity));
			prop_assert_eq!(handler.current_id(), pushes as u64 + 1);
		}
	}
}
