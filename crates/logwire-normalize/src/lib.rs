// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event argument normalization for logwire.
//!
//! Events arrive as an ordered list of [`logwire_core::Value`] arguments. The
//! [`Normalizer`] classifies them ([`Classification`]) and turns them into
//! zero or more [`logwire_core::LogEntry`] values, each escalated to at least
//! the floor severity carried by the [`EventContext`].

pub mod classify;
pub mod context;
pub mod guess;
pub mod normalizer;

pub use classify::{classify, level_of, Classification};
pub use context::{EventContext, LOG_EVENT};
pub use guess::guess_channel;
pub use normalizer::Normalizer;
