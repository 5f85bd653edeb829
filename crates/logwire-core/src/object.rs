// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Arbitrary objects attached to log contexts.

use serde::Serialize;
use std::fmt;

use crate::value::Value;

/// Hooks an arbitrary object exposes to the context serializer.
///
/// Every method but [`LogObject::type_name`] is optional. The serializer
/// tries them in order: [`LogObject::describe`], [`LogObject::display`],
/// [`LogObject::encode`], then falls back to a descriptive placeholder.
pub trait LogObject: fmt::Debug + Send + Sync {
	fn type_name(&self) -> &str;

	/// Self-describing serialization. The returned value is serialized in
	/// turn, so it is still subject to masking and the depth bound.
	fn describe(&self) -> Option<Value> {
		None
	}

	/// String conversion.
	fn display(&self) -> Option<String> {
		None
	}

	/// Generic structured encoding, as a JSON document.
	fn encode(&self) -> Result<String, EncodeError> {
		Err(EncodeError::Unsupported)
	}
}

/// Why an object could not be encoded.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
	#[error("object does not support structured encoding")]
	Unsupported,

	#[error("encoding failed: {0}")]
	Json(#[from] serde_json::Error),
}

/// Last path segment of `T`'s name with generic arguments dropped, so
/// `alloc::vec::Vec<app::Order>` becomes `Vec`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
	let full = std::any::type_name::<T>();
	let path = full.split('<').next().unwrap_or(full);
	path.rsplit("::").next().unwrap_or(path)
}

/// Adapts any `Serialize` type into a [`LogObject`] that encodes via JSON.
#[derive(Debug, Clone)]
pub struct Serializable<T> {
	type_name: String,
	inner: T,
}

impl<T: Serialize> Serializable<T> {
	pub fn new(inner: T) -> Self {
		Self {
			type_name: short_type_name::<T>().to_string(),
			inner,
		}
	}

	pub fn named(type_name: impl Into<String>, inner: T) -> Self {
		Self {
			type_name: type_name.into(),
			inner,
		}
	}

	pub fn inner(&self) -> &T {
		&self.inner
	}
}

impl<T> LogObject for Serializable<T>
where
	T: Serialize + fmt::Debug + Send + Sync,
{
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn encode(&self) -> Result<String, EncodeError> {
		Ok(serde_json::to_string(&self.inner)?)
	}
}
