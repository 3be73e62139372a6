// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared helpers for repository tests.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tally_server_auth::types::{GroupId, UserId};

use crate::group::GroupRepository;
use crate::migrations::run_migrations;

/// In-memory pool pinned to a single connection so every query sees the
/// same database.
pub async fn create_test_pool() -> SqlitePool {
	SqlitePoolOptions::new()
		.max_connections(1)
		.connect(":memory:")
		.await
		.unwrap()
}

/// Test pool with the full schema and the fallback category seeded.
pub async fn create_finance_test_pool() -> SqlitePool {
	let pool = create_test_pool().await;
	run_migrations(&pool).await.unwrap();
	pool
}

/// Insert a user row directly, skipping password hashing.
pub async fn seed_user(pool: &SqlitePool, email: &str) -> UserId {
	let result = sqlx::query(
		"INSERT INTO users (email, password_hash, is_active, created_at) VALUES (?, 'test-hash', 1, ?)",
	)
	.bind(email)
	.bind(chrono::Utc::now().to_rfc3339())
	.execute(pool)
	.await
	.unwrap();

	UserId::new(result.last_insert_rowid())
}

/// Create a group with the given admin through the repository.
pub async fn seed_group(pool: &SqlitePool, name: &str, admin: UserId) -> GroupId {
	GroupRepository::new(pool.clone())
		.create_group(name, admin)
		.await
		.unwrap()
		.id
}
