// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Id-keyed entity store with lazy registration and per-id setup.

use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::visibility::Visibility;

/// Identity comparison between entities.
///
/// Re-registering an id only merges channels when the entity is the *same*
/// one; shared pointers compare by address.
pub trait SameEntity {
	fn same_entity(&self, other: &Self) -> bool;
}

impl<T: ?Sized> SameEntity for Arc<T> {
	fn same_entity(&self, other: &Self) -> bool {
		Arc::ptr_eq(self, other)
	}
}

impl<T: ?Sized> SameEntity for Rc<T> {
	fn same_entity(&self, other: &Self) -> bool {
		Rc::ptr_eq(self, other)
	}
}

/// Where the registry is in its one-time registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryPhase {
	/// No lookup has happened yet.
	Unregistered,
	/// The registration hook is running.
	Registering,
	/// Registration has completed.
	Ready,
}

/// Outcome of [`EntityRegistry::add_entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
	/// A new id was stored.
	Inserted,
	/// The id was already bound to the same entity; channels were merged.
	Merged,
	/// The id is bound to a different entity; nothing changed.
	Conflict,
}

/// Outcome of [`EntityRegistry::remove_entity_from_channels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
	/// The id is not registered.
	Unknown,
	/// The channels were disabled and the entity is still visible somewhere.
	Narrowed,
	/// Nothing remained visible, so the entity was dropped.
	Dropped,
}

type RegisterHook<E> = Box<dyn FnOnce(&mut EntityRegistry<E>) + Send>;
type SetupHook<E> = Arc<dyn Fn(&str, &E, &mut EntityRegistry<E>) + Send + Sync>;

struct Slot<E> {
	entity: E,
	visibility: Visibility,
}

/// A store of entities (handlers, processors, ...) keyed by a stable id.
///
/// Lookups are lazy: the first one fires the registration hook, and the first
/// successful lookup of each id fires the setup hook for that id. Both hooks
/// receive the registry itself and may register more entities; those are
/// visible to the lookup that triggered the hook.
pub struct EntityRegistry<E> {
	name: String,
	slots: IndexMap<String, Slot<E>>,
	phase: RegistryPhase,
	set_up: HashSet<String>,
	on_register: Option<RegisterHook<E>>,
	on_setup: Option<SetupHook<E>>,
}

impl<E> EntityRegistry<E>
where
	E: Clone + SameEntity,
{
	/// Creates an empty registry. `name` only shows up in diagnostics.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			slots: IndexMap::new(),
			phase: RegistryPhase::Unregistered,
			set_up: HashSet::new(),
			on_register: None,
			on_setup: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn phase(&self) -> RegistryPhase {
		self.phase
	}

	/// Sets the hook fired once, right before the first lookup.
	pub fn on_register<F>(&mut self, hook: F) -> &mut Self
	where
		F: FnOnce(&mut EntityRegistry<E>) + Send + 'static,
	{
		self.on_register = Some(Box::new(hook));
		self
	}

	/// Sets the hook fired the first time each id is successfully looked up.
	///
	/// Lookups made from inside the hook fire it for the other ids they hit.
	pub fn on_setup<F>(&mut self, hook: F) -> &mut Self
	where
		F: Fn(&str, &E, &mut EntityRegistry<E>) + Send + Sync + 'static,
	{
		self.on_setup = Some(Arc::new(hook));
		self
	}

	/// Registers `entity` under `id`.
	///
	/// With no channels the entity is visible everywhere; otherwise only on
	/// the listed channels. Registering a known id again with the same entity
	/// merges the channels; with a different entity it does nothing.
	pub fn add_entity(&mut self, id: &str, entity: E, channels: &[&str]) -> Registration {
		match self.slots.get_mut(id) {
			None => {
				let visibility = if channels.is_empty() {
					Visibility::everywhere()
				} else {
					Visibility::only(channels)
				};
				trace!(registry = %self.name, id, ?channels, "entity registered");
				self.slots.insert(id.to_string(), Slot { entity, visibility });
				Registration::Inserted
			}
			Some(slot) if slot.entity.same_entity(&entity) => {
				slot.visibility.enable(channels);
				trace!(registry = %self.name, id, ?channels, "entity channels merged");
				Registration::Merged
			}
			Some(_) => {
				debug!(registry = %self.name, id, "id already bound to another entity, ignoring");
				Registration::Conflict
			}
		}
	}

	/// Hides the entity from `channels` (from the wildcard when empty). An
	/// entity left visible nowhere is dropped.
	pub fn remove_entity_from_channels(&mut self, id: &str, channels: &[&str]) -> Removal {
		let Some(slot) = self.slots.get_mut(id) else {
			return Removal::Unknown;
		};

		slot.visibility.disable(channels);
		if slot.visibility.is_visible_anywhere() {
			return Removal::Narrowed;
		}

		self.slots.shift_remove(id);
		self.set_up.remove(id);
		debug!(registry = %self.name, id, "entity no longer visible on any channel, dropped");
		Removal::Dropped
	}

	/// Removes `id` entirely, returning its entity.
	pub fn remove_entity(&mut self, id: &str) -> Option<E> {
		self.set_up.remove(id);
		self.slots.shift_remove(id).map(|slot| slot.entity)
	}

	/// Looks up an entity by id.
	pub fn find(&mut self, id: &str) -> Option<E> {
		self.ensure_registered();

		let entity = self.slots.get(id)?.entity.clone();
		self.set_up_once(id, &entity);
		Some(entity)
	}

	/// Every entity visible on `channel`, in registration order.
	///
	/// Entities added by hooks during this call are visited in the same pass.
	pub fn find_for_channel(&mut self, channel: &str) -> Vec<E> {
		self.ensure_registered();

		let mut found = Vec::new();
		let mut index = 0;
		while let Some((id, slot)) = self.slots.get_index(index) {
			index += 1;
			if !slot.visibility.is_visible(channel) {
				continue;
			}
			let id = id.clone();
			let entity = slot.entity.clone();
			self.set_up_once(&id, &entity);
			found.push(entity);
		}
		found
	}

	/// Visibility check without firing any hook.
	pub fn is_visible(&self, id: &str, channel: &str) -> bool {
		self.slots
			.get(id)
			.is_some_and(|slot| slot.visibility.is_visible(channel))
	}

	pub fn visibility(&self, id: &str) -> Option<&Visibility> {
		self.slots.get(id).map(|slot| &slot.visibility)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.slots.contains_key(id)
	}

	/// Number of distinct ids registered.
	pub fn count(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Registered ids, in registration order.
	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.slots.keys().map(String::as_str)
	}

	fn ensure_registered(&mut self) {
		if self.phase != RegistryPhase::Unregistered {
			return;
		}

		self.phase = RegistryPhase::Registering;
		if let Some(hook) = self.on_register.take() {
			debug!(registry = %self.name, "running registration hook");
			hook(self);
		}
		self.phase = RegistryPhase::Ready;
	}

	fn set_up_once(&mut self, id: &str, entity: &E) {
		if self.set_up.contains(id) {
			return;
		}
		let Some(hook) = self.on_setup.clone() else {
			return;
		};

		// Marked before the call, so a lookup of the same id from inside the
		// hook does not recurse.
		self.set_up.insert(id.to_string());
		trace!(registry = %self.name, id, "running setup hook");
		hook(id, entity, self);
	}
}

impl<E> fmt::Debug for EntityRegistry<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EntityRegistry")
			.field("name", &self.name)
			.field("ids", &self.slots.keys().collect::<Vec<_>>())
			.field("phase", &self.phase)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Mutex;

	type Entity = Arc<str>;

	fn entity(name: &str) -> Entity {
		Arc::from(name)
	}

	fn registry() -> EntityRegistry<Entity> {
		EntityRegistry::new("test")
	}

	proptest! {
		#[test]
		fn count_matches_distinct_ids(ids in prop::collection::vec("[a-z]{1,6}", 0..20)) {
			let mut registry = registry();
			for id in &ids {
				registry.add_entity(id, entity(id), &[]);
			}
			let distinct: HashSet<&String> = ids.iter().collect();
			prop_assert_eq!(registry.count(), distinct.len());
		}

		#[test]
		fn first_registration_wins(id in "[a-z]{1,8}") {
			let mut registry = registry();
			let first = entity("first");
			registry.add_entity(&id, first.clone(), &[]);
			let outcome = registry.add_entity(&id, entity("second"), &["HTTP"]);

			prop_assert_eq!(outcome, Registration::Conflict);
			prop_assert!(Arc::ptr_eq(&registry.find(&id).unwrap(), &first));
			prop_assert!(registry.is_visible(&id, "ANY"));
		}
	}

	#[test]
	fn empty_channels_means_everywhere() {
		let mut registry = registry();
		registry.add_entity("h", entity("h"), &[]);

		assert!(registry.is_visible("h", "HTTP"));
		assert!(registry.is_visible("h", "ANYTHING"));
		assert_eq!(registry.visibility("h").unwrap().wildcard(), Some(true));
	}

	#[test]
	fn explicit_channels_have_no_wildcard() {
		let mut registry = registry();
		registry.add_entity("h", entity("h"), &["HTTP", "DB"]);

		assert!(registry.is_visible("h", "HTTP"));
		assert!(registry.is_visible("h", "DB"));
		assert!(!registry.is_visible("h", "SECURITY"));
		assert_eq!(registry.visibility("h").unwrap().wildcard(), None);
	}

	#[test]
	fn same_entity_merges_channels() {
		let mut registry = registry();
		let handler = entity("h");
		registry.add_entity("h", handler.clone(), &["HTTP"]);
		let outcome = registry.add_entity("h", handler, &["DB"]);

		assert_eq!(outcome, Registration::Merged);
		assert!(registry.is_visible("h", "HTTP"));
		assert!(registry.is_visible("h", "DB"));
	}

	#[test]
	fn explicit_merge_does_not_clear_wildcard() {
		let mut registry = registry();
		let handler = entity("h");
		registry.add_entity("h", handler.clone(), &[]);
		registry.add_entity("h", handler, &["DB"]);

		assert!(registry.is_visible("h", "CRON"));
	}

	#[test]
	fn wildcard_then_disabled_channel() {
		let mut registry = registry();
		let handler = entity("h");
		registry.add_entity("h", handler.clone(), &[]);

		assert_eq!(registry.remove_entity_from_channels("h", &["X"]), Removal::Narrowed);
		assert!(!registry.is_visible("h", "X"));
		assert!(registry.is_visible("h", "Y"));

		registry.add_entity("h", handler, &["X"]);
		assert!(registry.is_visible("h", "X"));
		assert!(registry.is_visible("h", "Y"));
	}

	#[test]
	fn removing_last_channel_drops_entity() {
		let mut registry = registry();
		registry.add_entity("h", entity("h"), &["HTTP"]);

		assert_eq!(registry.remove_entity_from_channels("h", &["HTTP"]), Removal::Dropped);
		assert!(!registry.contains("h"));
		assert_eq!(registry.count(), 0);
		assert_eq!(registry.remove_entity_from_channels("h", &["HTTP"]), Removal::Unknown);
	}

	#[test]
	fn disabling_wildcard_with_explicit_channels_left_keeps_entity() {
		let mut registry = registry();
		let handler = entity("h");
		registry.add_entity("h", handler.clone(), &[]);
		registry.add_entity("h", handler, &["DB"]);

		assert_eq!(registry.remove_entity_from_channels("h", &[]), Removal::Narrowed);
		assert!(registry.is_visible("h", "DB"));
		assert!(!registry.is_visible("h", "HTTP"));
	}

	#[test]
	fn find_absent_is_none() {
		let mut registry = registry();
		assert!(registry.find("nope").is_none());
		assert!(registry.find_for_channel("HTTP").is_empty());
	}

	#[test]
	fn registration_hook_fires_once_before_first_lookup() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);

		let mut registry = registry();
		registry.on_register(move |registry| {
			counter.fetch_add(1, Ordering::SeqCst);
			registry.add_entity("late", entity("late"), &[]);
		});

		assert_eq!(registry.phase(), RegistryPhase::Unregistered);
		assert!(registry.find("late").is_some());
		assert!(registry.find("late").is_some());
		registry.find_for_channel("HTTP");

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(registry.phase(), RegistryPhase::Ready);
	}

	#[test]
	fn re_entrant_lookup_during_registration_does_not_refire() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);

		let mut registry = registry();
		registry.on_register(move |registry| {
			counter.fetch_add(1, Ordering::SeqCst);
			registry.add_entity("a", entity("a"), &[]);
			assert!(registry.find("a").is_some());
		});

		registry.find_for_channel("DEBUG");
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn setup_fires_at_most_once_per_id() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let log = Arc::clone(&seen);

		let mut registry = registry();
		registry.add_entity("a", entity("a"), &[]);
		registry.add_entity("b", entity("b"), &["HTTP"]);
		registry.on_setup(move |id, _, _| log.lock().unwrap().push(id.to_string()));

		registry.find("a");
		registry.find("a");
		registry.find_for_channel("HTTP");
		registry.find_for_channel("HTTP");

		assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
	}

	#[test]
	fn setup_additions_are_visible_to_same_pass() {
		let mut registry = registry();
		registry.add_entity("first", entity("first"), &["HTTP"]);
		registry.on_setup(|id, _, registry| {
			if id == "first" {
				registry.add_entity("second", entity("second"), &["HTTP"]);
			}
		});

		let found = registry.find_for_channel("HTTP");
		let names: Vec<&str> = found.iter().map(|e| e.as_ref()).collect();
		assert_eq!(names, vec!["first", "second"]);
	}

	#[test]
	fn nested_lookup_inside_setup_does_not_recurse() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);

		let mut registry = registry();
		registry.add_entity("a", entity("a"), &[]);
		registry.on_setup(move |id, _, registry| {
			counter.fetch_add(1, Ordering::SeqCst);
			assert!(registry.find(id).is_some());
		});

		registry.find("a");
		registry.find("a");
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn nested_lookup_of_another_id_fires_its_setup() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let log = Arc::clone(&seen);

		let mut registry = registry();
		registry.add_entity("a", entity("a"), &[]);
		registry.add_entity("b", entity("b"), &[]);
		registry.on_setup(move |id, _, registry| {
			log.lock().unwrap().push(id.to_string());
			if id == "a" {
				assert!(registry.find("b").is_some());
			}
		});

		registry.find("a");
		registry.find("b");

		assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
	}

	#[test]
	fn dropped_entity_is_set_up_again_after_re_registration() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);

		let mut registry = registry();
		registry.on_setup(move |_, _, _| {
			counter.fetch_add(1, Ordering::SeqCst);
		});
		registry.add_entity("a", entity("a"), &["HTTP"]);
		registry.find("a");
		registry.remove_entity_from_channels("a", &["HTTP"]);
		registry.add_entity("a", entity("a2"), &["HTTP"]);
		registry.find("a");

		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn ids_keep_registration_order() {
		let mut registry = registry();
		for id in ["c", "a", "b"] {
			registry.add_entity(id, entity(id), &[]);
		}
		assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["c", "a", "b"]);
		assert!(registry.remove_entity("a").is_some());
		assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["c", "b"]);
	}
}
