// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core data model for logwire.
//!
//! This crate provides the types shared by every other logwire crate:
//! - [`LogEntry`] - the canonical normalized log event
//! - [`LogLevel`] - the fixed 8-level severity scale (100..600)
//! - [`ChannelName`] and the built-in [`channel`] names
//! - [`Value`] - loosely-typed event arguments and context values, including
//!   the domain shapes ([`ErrorAggregate`], [`Throwable`], [`RecordRef`],
//!   [`Resource`]) and arbitrary [`LogObject`]s
//! - [`FilterChain`] - the extension-point primitive

pub mod channel;
pub mod domain;
pub mod entry;
pub mod error;
pub mod extension;
pub mod level;
pub mod object;
pub mod value;

pub use channel::{ChannelName, DEFAULT_CHANNEL};
pub use domain::{ErrorAggregate, RecordRef, Resource, Throwable};
pub use entry::LogEntry;
pub use error::{CoreError, Result};
pub use extension::FilterChain;
pub use level::LogLevel;
pub use object::{EncodeError, LogObject, Serializable};
pub use value::{float_token, Context, Map, Value};
