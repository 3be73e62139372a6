// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration.
//!
//! The token secret signs bearer tokens; it must be set to a non-default
//! value in production deployments.

use serde::Deserialize;

/// Default bearer token lifetime in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// HMAC secret used to sign bearer tokens.
	pub token_secret: String,
	/// Bearer token lifetime in minutes.
	pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			token_secret: "insecure-dev-secret".to_string(),
			token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
		}
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub token_secret: Option<String>,
	#[serde(default)]
	pub token_ttl_minutes: Option<i64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.token_secret.is_some() {
			self.token_secret = other.token_secret;
		}
		if other.token_ttl_minutes.is_some() {
			self.token_ttl_minutes = other.token_ttl_minutes;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		let defaults = AuthConfig::default();
		AuthConfig {
			token_secret: self.token_secret.unwrap_or(defaults.token_secret),
			token_ttl_minutes: self
				.token_ttl_minutes
				.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = AuthConfigLayer::default().finalize();
		assert_eq!(config.token_ttl_minutes, 30);
		assert!(!config.token_secret.is_empty());
	}

	#[test]
	fn test_merge_keeps_later_values() {
		let mut base = AuthConfigLayer {
			token_secret: Some("from-file".to_string()),
			token_ttl_minutes: Some(60),
		};
		base.merge(AuthConfigLayer {
			token_secret: Some("from-env".to_string()),
			token_ttl_minutes: None,
		});
		let config = base.finalize();
		assert_eq!(config.token_secret, "from-env");
		assert_eq!(config.token_ttl_minutes, 60);
	}
}
