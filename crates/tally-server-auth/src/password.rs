// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing and verification.
//!
//! Passwords are hashed with Argon2id and a per-password random salt. The
//! stored value is the PHC string (`$argon2id$...`), so parameters travel
//! with the hash and can be upgraded over time.

use argon2::{
	password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
#[cfg(test)]
use argon2::{Algorithm, Params, Version};

use crate::error::{AuthError, Result};

/// Returns an Argon2 instance configured appropriately for the build context.
///
/// In production (`#[cfg(not(test))]`), returns `Argon2::default()` with
/// strong security parameters.
///
/// In tests (`#[cfg(test)]`), returns an Argon2 instance with minimal
/// parameters for fast test execution.
#[inline]
fn argon2_instance() -> Argon2<'static> {
	#[cfg(test)]
	{
		// Fast, insecure parameters for tests ONLY.
		let params = Params::new(
			1024, // memory_kib: 1 MiB
			1,    // iterations
			1,    // parallelism
			None, // output length = default
		)
		.expect("valid Argon2 params for tests");
		Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
	}

	#[cfg(not(test))]
	{
		Argon2::default()
	}
}

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> Result<String> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| AuthError::Hash(format!("failed to hash password: {e}")))
}

/// Verify a plaintext password against a stored PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
	let parsed_hash =
		PasswordHash::new(hash).map_err(|e| AuthError::Hash(format!("invalid hash format: {e}")))?;

	Ok(argon2_instance()
		.verify_password(password.as_bytes(), &parsed_hash)
		.is_ok())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hash_and_verify() {
		let hash = hash_password("hunter2").unwrap();
		assert!(hash.starts_with("$argon2"));

		assert!(verify_password("hunter2", &hash).unwrap());
		assert!(!verify_password("hunter3", &hash).unwrap());
	}

	#[test]
	fn test_different_hashes_for_same_password() {
		let hash1 = hash_password("hunter2").unwrap();
		let hash2 = hash_password("hunter2").unwrap();

		// Hashes should be different due to random salt
		assert_ne!(hash1, hash2);

		assert!(verify_password("hunter2", &hash1).unwrap());
		assert!(verify_password("hunter2", &hash2).unwrap());
	}

	#[test]
	fn test_verify_rejects_garbage_hash() {
		assert!(verify_password("hunter2", "not-a-phc-string").is_err());
	}
}
