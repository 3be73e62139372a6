// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema creation and seed data.
//!
//! Migrations are idempotent (`CREATE TABLE IF NOT EXISTS`) and run at
//! startup. Seeding is limited to the shared fallback category that
//! category deletion reassigns dependents to.

use sqlx::sqlite::SqlitePool;

use crate::error::{DbError, Result};

/// Name of the shared fallback category dependents are reassigned to when
/// their category is deleted.
pub const FALLBACK_CATEGORY_NAME: &str = "Other";

/// Create all tables and seed the fallback category.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS users (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			email TEXT NOT NULL UNIQUE,
			password_hash TEXT NOT NULL,
			is_active INTEGER NOT NULL DEFAULT 1,
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS groups (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			name TEXT NOT NULL,
			admin_id INTEGER NOT NULL REFERENCES users(id),
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS group_members (
			group_id INTEGER NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
			user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
			role TEXT NOT NULL CHECK (role IN ('admin', 'editor', 'viewer')),
			added_at TEXT NOT NULL,
			PRIMARY KEY (group_id, user_id)
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS categories (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			name TEXT NOT NULL,
			user_id INTEGER REFERENCES users(id),
			group_id INTEGER REFERENCES groups(id),
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS expenses (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			amount REAL NOT NULL,
			date TEXT NOT NULL,
			description TEXT,
			category_id INTEGER NOT NULL REFERENCES categories(id),
			user_id INTEGER REFERENCES users(id),
			group_id INTEGER REFERENCES groups(id),
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS budgets (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			category_id INTEGER NOT NULL REFERENCES categories(id),
			amount REAL NOT NULL,
			period_start TEXT NOT NULL,
			period_end TEXT,
			user_id INTEGER REFERENCES users(id),
			group_id INTEGER REFERENCES groups(id),
			created_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id)")
		.execute(pool)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_expenses_owner ON expenses(user_id, group_id)")
		.execute(pool)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_budgets_owner ON budgets(user_id, group_id)")
		.execute(pool)
		.await?;

	ensure_fallback_category(pool).await?;

	tracing::debug!("migrations complete");
	Ok(())
}

/// Seed the shared fallback category if it does not exist, returning its id.
pub async fn ensure_fallback_category(pool: &SqlitePool) -> Result<i64> {
	if let Some(id) = fallback_category_id(pool).await? {
		return Ok(id);
	}

	let result = sqlx::query(
		"INSERT INTO categories (name, user_id, group_id, created_at) VALUES (?, NULL, NULL, ?)",
	)
	.bind(FALLBACK_CATEGORY_NAME)
	.bind(chrono::Utc::now().to_rfc3339())
	.execute(pool)
	.await?;

	tracing::debug!(id = result.last_insert_rowid(), "seeded fallback category");
	Ok(result.last_insert_rowid())
}

/// Look up the shared fallback category id.
pub async fn fallback_category_id(pool: &SqlitePool) -> Result<Option<i64>> {
	let row: Option<(i64,)> = sqlx::query_as(
		"SELECT id FROM categories WHERE name = ? AND user_id IS NULL AND group_id IS NULL",
	)
	.bind(FALLBACK_CATEGORY_NAME)
	.fetch_optional(pool)
	.await?;

	Ok(row.map(|(id,)| id))
}

/// Like [`fallback_category_id`] but errors when the seed row is missing.
pub async fn require_fallback_category_id(pool: &SqlitePool) -> Result<i64> {
	fallback_category_id(pool)
		.await?
		.ok_or_else(|| DbError::Internal("fallback category is not seeded".to_string()))
}
