// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Errors produced by credential verification and token handling.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	/// Wrong email/password pair.
	#[error("invalid credentials")]
	InvalidCredentials,

	/// Token is malformed, has a bad signature, or is expired.
	#[error("invalid token")]
	InvalidToken,

	/// Password hashing/verification failed internally.
	#[error("credential processing failed: {0}")]
	Hash(String),

	/// Token encoding failed internally.
	#[error("token encoding failed: {0}")]
	Encoding(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
