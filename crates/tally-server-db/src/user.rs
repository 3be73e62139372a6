// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use tally_server_auth::{types::UserId, user::User};

use crate::error::{DbError, Result};

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new user with a pre-hashed password.
	///
	/// # Errors
	/// Returns `DbError::Conflict` when the email is already registered.
	#[tracing::instrument(skip(self, password_hash))]
	pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
		let created_at = Utc::now();
		let result = sqlx::query(
			"INSERT INTO users (email, password_hash, is_active, created_at) VALUES (?, ?, 1, ?)",
		)
		.bind(email)
		.bind(password_hash)
		.bind(created_at.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "user"))?;

		let id = UserId::new(result.last_insert_rowid());
		tracing::debug!(user_id = %id, "user created");

		Ok(User {
			id,
			email: email.to_string(),
			password_hash: password_hash.to_string(),
			is_active: true,
			created_at,
		})
	}

	/// Get a user by email.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
		let row = sqlx::query(
			"SELECT id, email, password_hash, is_active, created_at FROM users WHERE email = ?",
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Get a user by id.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>> {
		let row = sqlx::query(
			"SELECT id, email, password_hash, is_active, created_at FROM users WHERE id = ?",
		)
		.bind(id.into_inner())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
	let created_at: String = row.try_get("created_at")?;
	Ok(User {
		id: UserId::new(row.try_get("id")?),
		email: row.try_get("email")?,
		password_hash: row.try_get("password_hash")?,
		is_active: row.try_get::<i64, _>("is_active")? != 0,
		created_at: parse_timestamp(&created_at)?,
	})
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("invalid timestamp in database: {e}")))
}
