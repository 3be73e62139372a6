// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Validation failed: {0}")]
	Validation(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	/// Map a sqlx error to `Conflict` when it is a unique constraint
	/// violation, passing everything else through as `Sqlx`.
	pub fn from_insert(e: sqlx::Error, what: &str) -> Self {
		if let sqlx::Error::Database(ref db) = e {
			if db.is_unique_violation() {
				return DbError::Conflict(format!("{what} already exists"));
			}
		}
		DbError::Sqlx(e)
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
