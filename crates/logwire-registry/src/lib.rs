// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Generic entity registry for logwire.
//!
//! Handlers and processors are both stored in an [`EntityRegistry`]: entities
//! keyed by a stable id, each with a [`Visibility`] deciding which channels
//! see it. Registration and per-id setup are lazy and fire at most once.

pub mod registry;
pub mod visibility;

pub use registry::{EntityRegistry, Registration, RegistryPhase, Removal, SameEntity};
pub use visibility::Visibility;
