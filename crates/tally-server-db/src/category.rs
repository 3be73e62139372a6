// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Category repository for database operations.
//!
//! Categories come in three flavors: personal (owned by a user), group
//! (owned by a group), and shared defaults (no owner). Shared categories
//! are visible in every scope and mutable in none; deleting an owned
//! category reassigns its dependent expenses and budgets to the shared
//! fallback category instead of cascading.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use tally_server_auth::{
	types::{CategoryId, GroupId, UserId},
	Scope,
};

use crate::error::Result;
use crate::scoped::{owned_predicate, visible_predicate};
use crate::user::parse_timestamp;

/// An expense classification.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Category {
	pub id: CategoryId,
	pub name: String,
	pub user_id: Option<UserId>,
	pub group_id: Option<GroupId>,
	pub created_at: DateTime<Utc>,
}

impl Category {
	/// Shared default categories have no owner.
	pub fn is_shared(&self) -> bool {
		self.user_id.is_none() && self.group_id.is_none()
	}
}

/// Repository for category database operations.
#[derive(Clone)]
pub struct CategoryRepository {
	pool: SqlitePool,
}

impl CategoryRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a category owned by the given scope.
	#[tracing::instrument(skip(self))]
	pub async fn create(&self, scope: &Scope, name: &str) -> Result<Category> {
		let created_at = Utc::now();
		let user_id = scope.owner_user_id();
		let group_id = scope.owner_group_id();

		let result = sqlx::query(
			"INSERT INTO categories (name, user_id, group_id, created_at) VALUES (?, ?, ?, ?)",
		)
		.bind(name)
		.bind(user_id.map(UserId::into_inner))
		.bind(group_id.map(GroupId::into_inner))
		.bind(created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		let id = CategoryId::new(result.last_insert_rowid());
		tracing::debug!(category_id = %id, "category created");

		Ok(Category {
			id,
			name: name.to_string(),
			user_id,
			group_id,
			created_at,
		})
	}

	/// Get a category visible in the scope (owned or shared).
	#[tracing::instrument(skip(self), fields(category_id = %id))]
	pub async fn get(&self, scope: &Scope, id: CategoryId) -> Result<Option<Category>> {
		let pred = visible_predicate(scope, "c");
		let sql = format!(
			"SELECT c.id, c.name, c.user_id, c.group_id, c.created_at FROM categories c WHERE c.id = ? AND {}",
			pred.sql
		);

		let row = sqlx::query(&sql)
			.bind(id.into_inner())
			.bind(pred.bind)
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_category(&r)).transpose()
	}

	/// List categories visible in the scope (owned plus shared defaults).
	#[tracing::instrument(skip(self))]
	pub async fn list(&self, scope: &Scope, limit: i32, offset: i32) -> Result<Vec<Category>> {
		let pred = visible_predicate(scope, "c");
		let sql = format!(
			"SELECT c.id, c.name, c.user_id, c.group_id, c.created_at FROM categories c WHERE {} ORDER BY c.id LIMIT ? OFFSET ?",
			pred.sql
		);

		let rows = sqlx::query(&sql)
			.bind(pred.bind)
			.bind(limit)
			.bind(offset)
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(row_to_category).collect()
	}

	/// Rename a category owned by the scope.
	///
	/// Shared categories are not owned by any scope, so they are never
	/// matched here; callers see `None` (404).
	#[tracing::instrument(skip(self), fields(category_id = %id))]
	pub async fn rename(&self, scope: &Scope, id: CategoryId, name: &str) -> Result<Option<Category>> {
		let pred = owned_predicate(scope, "categories");
		let sql = format!("UPDATE categories SET name = ? WHERE id = ? AND {}", pred.sql);

		let result = sqlx::query(&sql)
			.bind(name)
			.bind(id.into_inner())
			.bind(pred.bind)
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get(scope, id).await
	}

	/// Delete a category owned by the scope, reassigning dependents.
	///
	/// All expenses and budgets referencing the category are repointed to
	/// `fallback` inside the same transaction as the delete. Returns false
	/// when the category is absent, shared, or out of scope.
	#[tracing::instrument(skip(self), fields(category_id = %id, fallback = %fallback))]
	pub async fn delete(&self, scope: &Scope, id: CategoryId, fallback: CategoryId) -> Result<bool> {
		let pred = owned_predicate(scope, "categories");
		let delete_sql = format!("DELETE FROM categories WHERE id = ? AND {}", pred.sql);

		let mut tx = self.pool.begin().await?;

		sqlx::query("UPDATE expenses SET category_id = ? WHERE category_id = ?")
			.bind(fallback.into_inner())
			.bind(id.into_inner())
			.execute(&mut *tx)
			.await?;
		sqlx::query("UPDATE budgets SET category_id = ? WHERE category_id = ?")
			.bind(fallback.into_inner())
			.bind(id.into_inner())
			.execute(&mut *tx)
			.await?;

		let result = sqlx::query(&delete_sql)
			.bind(id.into_inner())
			.bind(pred.bind)
			.execute(&mut *tx)
			.await?;

		if result.rows_affected() == 0 {
			// Nothing owned matched; leave dependents untouched.
			tx.rollback().await?;
			return Ok(false);
		}

		tx.commit().await?;
		tracing::debug!("category deleted, dependents reassigned");
		Ok(true)
	}
}

/// Whether a category may be referenced from the given scope: it must be
/// owned by the scope or be a shared default.
pub(crate) async fn category_in_scope(
	pool: &SqlitePool,
	id: CategoryId,
	scope: &Scope,
) -> Result<bool> {
	let pred = visible_predicate(scope, "c");
	let sql = format!("SELECT 1 FROM categories c WHERE c.id = ? AND {}", pred.sql);

	let row: Option<(i64,)> = sqlx::query_as(&sql)
		.bind(id.into_inner())
		.bind(pred.bind)
		.fetch_optional(pool)
		.await?;

	Ok(row.is_some())
}

fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
	let created_at: String = row.try_get("created_at")?;
	Ok(Category {
		id: CategoryId::new(row.try_get("id")?),
		name: row.try_get("name")?,
		user_id: row.try_get::<Option<i64>, _>("user_id")?.map(UserId::new),
		group_id: row.try_get::<Option<i64>, _>("group_id")?.map(GroupId::new),
		created_at: parse_timestamp(&created_at)?,
	})
}
