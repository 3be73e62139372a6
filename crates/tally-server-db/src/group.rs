// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group repository for database operations.
//!
//! This module provides database access for group management including:
//! - Group CRUD operations
//! - Membership management (admin, editor, viewer roles)
//! - Role resolution for scope checks

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use tally_server_auth::types::{GroupId, GroupRole, UserId};

use crate::error::{DbError, Result};
use crate::user::parse_timestamp;

/// A group sharing expense tracking among its members.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Group {
	pub id: GroupId,
	pub name: String,
	pub admin_id: UserId,
	pub created_at: DateTime<Utc>,
}

/// A user's membership in a group.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GroupMember {
	pub group_id: GroupId,
	pub user_id: UserId,
	pub role: GroupRole,
	pub added_at: DateTime<Utc>,
}

/// Repository for group database operations.
///
/// Manages groups and their memberships. The group's `admin_id` always has
/// the `admin` role regardless of the membership table.
#[derive(Clone)]
pub struct GroupRepository {
	pool: SqlitePool,
}

impl GroupRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a group with the given admin, adding the admin as a member.
	///
	/// Runs in a single transaction so a group never exists without its
	/// admin membership row.
	#[tracing::instrument(skip(self), fields(admin_id = %admin_id))]
	pub async fn create_group(&self, name: &str, admin_id: UserId) -> Result<Group> {
		let created_at = Utc::now();
		let mut tx = self.pool.begin().await?;

		let result = sqlx::query("INSERT INTO groups (name, admin_id, created_at) VALUES (?, ?, ?)")
			.bind(name)
			.bind(admin_id.into_inner())
			.bind(created_at.to_rfc3339())
			.execute(&mut *tx)
			.await?;
		let group_id = result.last_insert_rowid();

		sqlx::query(
			"INSERT INTO group_members (group_id, user_id, role, added_at) VALUES (?, ?, 'admin', ?)",
		)
		.bind(group_id)
		.bind(admin_id.into_inner())
		.bind(created_at.to_rfc3339())
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		tracing::debug!(group_id, "group created");
		Ok(Group {
			id: GroupId::new(group_id),
			name: name.to_string(),
			admin_id,
			created_at,
		})
	}

	/// Get a group by id, without visibility checks.
	#[tracing::instrument(skip(self), fields(group_id = %id))]
	pub async fn get_group(&self, id: GroupId) -> Result<Option<Group>> {
		let row = sqlx::query("SELECT id, name, admin_id, created_at FROM groups WHERE id = ?")
			.bind(id.into_inner())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_group(&r)).transpose()
	}

	/// Get a group by id, only if the user is its admin or a member.
	///
	/// Returns `None` for both absent and invisible groups so callers map
	/// either case to a 404.
	#[tracing::instrument(skip(self), fields(group_id = %id, user_id = %user_id))]
	pub async fn get_group_for_user(&self, id: GroupId, user_id: UserId) -> Result<Option<Group>> {
		let row = sqlx::query(
			r#"
			SELECT g.id, g.name, g.admin_id, g.created_at
			FROM groups g
			WHERE g.id = ?
			  AND (g.admin_id = ?
			       OR EXISTS (SELECT 1 FROM group_members m
			                  WHERE m.group_id = g.id AND m.user_id = ?))
			"#,
		)
		.bind(id.into_inner())
		.bind(user_id.into_inner())
		.bind(user_id.into_inner())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_group(&r)).transpose()
	}

	/// List groups the user administers or belongs to.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_groups_for_user(
		&self,
		user_id: UserId,
		limit: i32,
		offset: i32,
	) -> Result<Vec<Group>> {
		let rows = sqlx::query(
			r#"
			SELECT g.id, g.name, g.admin_id, g.created_at
			FROM groups g
			WHERE g.admin_id = ?
			   OR EXISTS (SELECT 1 FROM group_members m
			              WHERE m.group_id = g.id AND m.user_id = ?)
			ORDER BY g.id
			LIMIT ? OFFSET ?
			"#,
		)
		.bind(user_id.into_inner())
		.bind(user_id.into_inner())
		.bind(limit)
		.bind(offset)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_group).collect()
	}

	/// Rename a group.
	#[tracing::instrument(skip(self), fields(group_id = %id))]
	pub async fn rename_group(&self, id: GroupId, name: &str) -> Result<Option<Group>> {
		let result = sqlx::query("UPDATE groups SET name = ? WHERE id = ?")
			.bind(name)
			.bind(id.into_inner())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_group(id).await
	}

	/// Delete a group along with its memberships and owned entities.
	///
	/// Group-owned expenses, budgets, and categories go with the group;
	/// personal data is untouched. Runs in one transaction.
	#[tracing::instrument(skip(self), fields(group_id = %id))]
	pub async fn delete_group(&self, id: GroupId) -> Result<bool> {
		let mut tx = self.pool.begin().await?;
		let group_id = id.into_inner();

		sqlx::query("DELETE FROM expenses WHERE group_id = ?")
			.bind(group_id)
			.execute(&mut *tx)
			.await?;
		sqlx::query("DELETE FROM budgets WHERE group_id = ?")
			.bind(group_id)
			.execute(&mut *tx)
			.await?;
		sqlx::query("DELETE FROM categories WHERE group_id = ?")
			.bind(group_id)
			.execute(&mut *tx)
			.await?;
		sqlx::query("DELETE FROM group_members WHERE group_id = ?")
			.bind(group_id)
			.execute(&mut *tx)
			.await?;
		let result = sqlx::query("DELETE FROM groups WHERE id = ?")
			.bind(group_id)
			.execute(&mut *tx)
			.await?;

		tx.commit().await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(group_id, "group deleted");
		}
		Ok(deleted)
	}

	// =========================================================================
	// Membership
	// =========================================================================

	/// Resolve the user's role in a group, if any.
	///
	/// The group's `admin_id` is always `admin`, even without a membership
	/// row.
	#[tracing::instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
	pub async fn membership_role(
		&self,
		group_id: GroupId,
		user_id: UserId,
	) -> Result<Option<GroupRole>> {
		let admin: Option<(i64,)> =
			sqlx::query_as("SELECT 1 FROM groups WHERE id = ? AND admin_id = ?")
				.bind(group_id.into_inner())
				.bind(user_id.into_inner())
				.fetch_optional(&self.pool)
				.await?;
		if admin.is_some() {
			return Ok(Some(GroupRole::Admin));
		}

		let row: Option<(String,)> =
			sqlx::query_as("SELECT role FROM group_members WHERE group_id = ? AND user_id = ?")
				.bind(group_id.into_inner())
				.bind(user_id.into_inner())
				.fetch_optional(&self.pool)
				.await?;

		row.map(|(role,)| parse_role(&role)).transpose()
	}

	/// Add a member to a group.
	///
	/// # Errors
	/// Returns `DbError::Conflict` when the user is already a member.
	#[tracing::instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
	pub async fn add_member(
		&self,
		group_id: GroupId,
		user_id: UserId,
		role: GroupRole,
	) -> Result<GroupMember> {
		let added_at = Utc::now();
		sqlx::query("INSERT INTO group_members (group_id, user_id, role, added_at) VALUES (?, ?, ?, ?)")
			.bind(group_id.into_inner())
			.bind(user_id.into_inner())
			.bind(role.to_string())
			.bind(added_at.to_rfc3339())
			.execute(&self.pool)
			.await
			.map_err(|e| DbError::from_insert(e, "group member"))?;

		tracing::debug!("group member added");
		Ok(GroupMember {
			group_id,
			user_id,
			role,
			added_at,
		})
	}

	/// Get a single membership row.
	#[tracing::instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
	pub async fn get_member(
		&self,
		group_id: GroupId,
		user_id: UserId,
	) -> Result<Option<GroupMember>> {
		let row = sqlx::query(
			"SELECT group_id, user_id, role, added_at FROM group_members WHERE group_id = ? AND user_id = ?",
		)
		.bind(group_id.into_inner())
		.bind(user_id.into_inner())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_member(&r)).transpose()
	}

	/// List the members of a group.
	#[tracing::instrument(skip(self), fields(group_id = %group_id))]
	pub async fn list_members(
		&self,
		group_id: GroupId,
		limit: i32,
		offset: i32,
	) -> Result<Vec<GroupMember>> {
		let rows = sqlx::query(
			r#"
			SELECT group_id, user_id, role, added_at
			FROM group_members
			WHERE group_id = ?
			ORDER BY added_at
			LIMIT ? OFFSET ?
			"#,
		)
		.bind(group_id.into_inner())
		.bind(limit)
		.bind(offset)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_member).collect()
	}

	/// Change a member's role.
	#[tracing::instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
	pub async fn update_member_role(
		&self,
		group_id: GroupId,
		user_id: UserId,
		role: GroupRole,
	) -> Result<Option<GroupMember>> {
		let result =
			sqlx::query("UPDATE group_members SET role = ? WHERE group_id = ? AND user_id = ?")
				.bind(role.to_string())
				.bind(group_id.into_inner())
				.bind(user_id.into_inner())
				.execute(&self.pool)
				.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_member(group_id, user_id).await
	}

	/// Remove a member from a group. Returns false when no such membership.
	#[tracing::instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
	pub async fn remove_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool> {
		let result = sqlx::query("DELETE FROM group_members WHERE group_id = ? AND user_id = ?")
			.bind(group_id.into_inner())
			.bind(user_id.into_inner())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn row_to_group(row: &sqlx::sqlite::SqliteRow) -> Result<Group> {
	let created_at: String = row.try_get("created_at")?;
	Ok(Group {
		id: GroupId::new(row.try_get("id")?),
		name: row.try_get("name")?,
		admin_id: UserId::new(row.try_get("admin_id")?),
		created_at: parse_timestamp(&created_at)?,
	})
}

fn row_to_member(row: &sqlx::sqlite::SqliteRow) -> Result<GroupMember> {
	let role: String = row.try_get("role")?;
	let added_at: String = row.try_get("added_at")?;
	Ok(GroupMember {
		group_id: GroupId::new(row.try_get("group_id")?),
		user_id: UserId::new(row.try_get("user_id")?),
		role: parse_role(&role)?,
		added_at: parse_timestamp(&added_at)?,
	})
}

fn parse_role(value: &str) -> Result<GroupRole> {
	GroupRole::from_str(value).map_err(DbError::Internal)
}
