// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User entity shared by the auth and database layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A user in the system.
///
/// # PII Handling
///
/// `email` is personally identifiable information and should be redacted in
/// logs. `password_hash` is a PHC string; it must never appear in API
/// responses or logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	/// Unique identifier for this user.
	pub id: UserId,

	/// Login email, unique across the system.
	pub email: String,

	/// Argon2 PHC hash of the user's password.
	#[serde(skip_serializing)]
	pub password_hash: String,

	/// Deactivated users fail authentication even with a valid token.
	pub is_active: bool,

	/// When the account was created.
	pub created_at: DateTime<Utc>,
}

impl User {
	/// Create a new active user with the given hashed credentials.
	///
	/// The id is a placeholder until the row is inserted.
	pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
		Self {
			id: UserId::new(0),
			email: email.into(),
			password_hash: password_hash.into(),
			is_active: true,
			created_at: Utc::now(),
		}
	}
}
