// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Context serialization for logwire.
//!
//! [`ContextSerializer`] turns arbitrary [`logwire_core::Value`] graphs into
//! a persistable shape: scalars become text tokens, domain types go through
//! an ordered formatter list, objects are described through their
//! [`logwire_core::LogObject`] hooks, secrets are masked, and recursion stops
//! at [`MAX_DEPTH`]. Serialization never fails.

pub mod formatter;
pub mod masking;
pub mod serializer;

pub use formatter::{Formatter, FormatterList};
pub use masking::{default_masked_keys, MaskedKeys, DEFAULT_MASKED_KEYS, MASK};
pub use serializer::{ContextSerializer, MAX_DEPTH};
