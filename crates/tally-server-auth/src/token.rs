// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer token issuance and decoding.
//!
//! Tokens are HS256 JWTs carrying the user's email as subject and an
//! expiry. Decoding fails closed: a bad signature, malformed token, or
//! expired claim all surface as [`AuthError::InvalidToken`].

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AuthError, Result};

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
	/// Subject: the user's email.
	pub sub: String,
	/// Issued at (seconds since epoch).
	pub iat: i64,
	/// Expiration (seconds since epoch).
	pub exp: i64,
}

/// Issues and decodes bearer tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenCodec {
	encoding: EncodingKey,
	decoding: DecodingKey,
	ttl: Duration,
}

impl TokenCodec {
	/// Create a codec from the configured secret and token lifetime.
	pub fn new(secret: &str, ttl_minutes: i64) -> Self {
		Self {
			encoding: EncodingKey::from_secret(secret.as_bytes()),
			decoding: DecodingKey::from_secret(secret.as_bytes()),
			ttl: Duration::minutes(ttl_minutes),
		}
	}

	/// Issue a signed token for the given subject with the configured TTL.
	#[instrument(skip(self))]
	pub fn issue(&self, subject: &str) -> Result<String> {
		let now = Utc::now();
		let claims = Claims {
			sub: subject.to_string(),
			iat: now.timestamp(),
			exp: (now + self.ttl).timestamp(),
		};

		encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
			.map_err(|e| AuthError::Encoding(format!("failed to encode token: {e}")))
	}

	/// Decode and validate a token, returning its claims.
	///
	/// # Errors
	/// Returns [`AuthError::InvalidToken`] when the signature is invalid,
	/// the token is malformed, or the expiry has passed. No leeway is
	/// granted on expiry.
	pub fn decode(&self, token: &str) -> Result<Claims> {
		let mut validation = Validation::new(Algorithm::HS256);
		validation.leeway = 0;

		decode::<Claims>(token, &self.decoding, &validation)
			.map(|data| data.claims)
			.map_err(|e| {
				tracing::debug!(error = %e, "token validation failed");
				AuthError::InvalidToken
			})
	}
}

impl std::fmt::Debug for TokenCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		// Keys are secret material, never printed.
		f.debug_struct("TokenCodec").field("ttl", &self.ttl).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_issue_and_decode_round_trip() {
		let codec = TokenCodec::new("test-secret", 30);
		let token = codec.issue("alice@example.com").unwrap();

		let claims = codec.decode(&token).unwrap();
		assert_eq!(claims.sub, "alice@example.com");
		assert!(claims.exp > claims.iat);
	}

	#[test]
	fn test_decode_rejects_wrong_secret() {
		let issuer = TokenCodec::new("secret-a", 30);
		let verifier = TokenCodec::new("secret-b", 30);

		let token = issuer.issue("alice@example.com").unwrap();
		assert!(matches!(
			verifier.decode(&token),
			Err(AuthError::InvalidToken)
		));
	}

	#[test]
	fn test_decode_rejects_expired_token() {
		// Negative TTL: the token is expired the moment it is issued.
		let codec = TokenCodec::new("test-secret", -1);
		let token = codec.issue("alice@example.com").unwrap();

		assert!(matches!(codec.decode(&token), Err(AuthError::InvalidToken)));
	}

	#[test]
	fn test_decode_rejects_garbage() {
		let codec = TokenCodec::new("test-secret", 30);
		assert!(matches!(
			codec.decode("not.a.jwt"),
			Err(AuthError::InvalidToken)
		));
	}
}
