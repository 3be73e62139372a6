// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_server_auth::User;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RegisterRequest {
	pub email: String,
	pub password: String,
}

/// A user account in API responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserResponse {
	pub id: i64,
	pub email: String,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
	fn from(user: User) -> Self {
		Self {
			id: user.id.into_inner(),
			email: user.email,
			is_active: user.is_active,
			created_at: user.created_at,
		}
	}
}

/// Error response for user operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserErrorResponse {
	pub error: String,
	pub message: String,
}
