// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use logwire_config::ConfigError;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Error, Debug)]
pub enum DispatchError {
	#[error("channel '{0}' is not registered")]
	InvalidChannel(String),

	#[error("delivery to channel '{channel}' failed: {source}")]
	Delivery {
		channel: String,
		#[source]
		source: DeliveryError,
	},

	#[error("invalid ignore pattern '{pattern}': {source}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("handler setup failed: {0}")]
	Handler(#[from] HandlerError),
}

/// A channel logger could not hand a record to every handler.
#[derive(Error, Debug)]
pub enum DeliveryError {
	#[error("handler '{handler}' failed: {source}")]
	Handler {
		handler: String,
		#[source]
		source: HandlerError,
	},
}

#[derive(Error, Debug)]
pub enum HandlerError {
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),

	#[error("serialization failed: {0}")]
	Json(#[from] serde_json::Error),

	#[error("record rejected: {0}")]
	Rejected(String),
}
