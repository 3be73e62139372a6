// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Expense repository for database operations.
//!
//! Expenses always belong to exactly one scope (a user or a group). Their
//! category must be visible in the same scope: owned by it or a shared
//! default. That cross-reference is validated on create and whenever an
//! update changes the category.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use tally_server_auth::{
	types::{CategoryId, ExpenseId, GroupId, UserId},
	Scope,
};

use crate::category::category_in_scope;
use crate::error::{DbError, Result};
use crate::scoped::owned_predicate;
use crate::user::parse_timestamp;

/// A single expense entry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Expense {
	pub id: ExpenseId,
	pub amount: f64,
	pub date: NaiveDate,
	pub description: Option<String>,
	pub category_id: CategoryId,
	pub user_id: Option<UserId>,
	pub group_id: Option<GroupId>,
	pub created_at: DateTime<Utc>,
}

/// Fields for creating an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
	pub amount: f64,
	pub date: NaiveDate,
	pub description: Option<String>,
	pub category_id: CategoryId,
}

/// Partial update for an expense; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
	pub amount: Option<f64>,
	pub date: Option<NaiveDate>,
	pub description: Option<String>,
	pub category_id: Option<CategoryId>,
}

/// Listing filters, all optional.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
	pub category_id: Option<CategoryId>,
	pub start_date: Option<NaiveDate>,
	pub end_date: Option<NaiveDate>,
	pub min_amount: Option<f64>,
	pub max_amount: Option<f64>,
}

/// Repository for expense database operations.
#[derive(Clone)]
pub struct ExpenseRepository {
	pool: SqlitePool,
}

impl ExpenseRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create an expense in the given scope.
	///
	/// # Errors
	/// Returns `DbError::Validation` when the category is not visible in
	/// the scope.
	#[tracing::instrument(skip(self, expense))]
	pub async fn create(&self, scope: &Scope, expense: NewExpense) -> Result<Expense> {
		if !category_in_scope(&self.pool, expense.category_id, scope).await? {
			return Err(DbError::Validation(format!(
				"category {} is not in scope",
				expense.category_id
			)));
		}

		let created_at = Utc::now();
		let user_id = scope.owner_user_id();
		let group_id = scope.owner_group_id();

		let result = sqlx::query(
			r#"
			INSERT INTO expenses (amount, date, description, category_id, user_id, group_id, created_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(expense.amount)
		.bind(expense.date.to_string())
		.bind(&expense.description)
		.bind(expense.category_id.into_inner())
		.bind(user_id.map(UserId::into_inner))
		.bind(group_id.map(GroupId::into_inner))
		.bind(created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		let id = ExpenseId::new(result.last_insert_rowid());
		tracing::debug!(expense_id = %id, "expense created");

		Ok(Expense {
			id,
			amount: expense.amount,
			date: expense.date,
			description: expense.description,
			category_id: expense.category_id,
			user_id,
			group_id,
			created_at,
		})
	}

	/// Get an expense owned by the scope.
	#[tracing::instrument(skip(self), fields(expense_id = %id))]
	pub async fn get(&self, scope: &Scope, id: ExpenseId) -> Result<Option<Expense>> {
		let pred = owned_predicate(scope, "e");
		let sql = format!(
			"SELECT e.id, e.amount, e.date, e.description, e.category_id, e.user_id, e.group_id, e.created_at FROM expenses e WHERE e.id = ? AND {}",
			pred.sql
		);

		let row = sqlx::query(&sql)
			.bind(id.into_inner())
			.bind(pred.bind)
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_expense(&r)).transpose()
	}

	/// List expenses owned by the scope, newest date first.
	#[tracing::instrument(skip(self, filter))]
	pub async fn list(
		&self,
		scope: &Scope,
		filter: &ExpenseFilter,
		limit: i32,
		offset: i32,
	) -> Result<Vec<Expense>> {
		let pred = owned_predicate(scope, "e");
		let mut sql = format!(
			"SELECT e.id, e.amount, e.date, e.description, e.category_id, e.user_id, e.group_id, e.created_at FROM expenses e WHERE {}",
			pred.sql
		);

		if filter.category_id.is_some() {
			sql.push_str(" AND e.category_id = ?");
		}
		if filter.start_date.is_some() {
			sql.push_str(" AND e.date >= ?");
		}
		if filter.end_date.is_some() {
			sql.push_str(" AND e.date <= ?");
		}
		if filter.min_amount.is_some() {
			sql.push_str(" AND e.amount >= ?");
		}
		if filter.max_amount.is_some() {
			sql.push_str(" AND e.amount <= ?");
		}
		sql.push_str(" ORDER BY e.date DESC, e.id DESC LIMIT ? OFFSET ?");

		let mut query = sqlx::query(&sql).bind(pred.bind);
		if let Some(category_id) = filter.category_id {
			query = query.bind(category_id.into_inner());
		}
		if let Some(start_date) = filter.start_date {
			query = query.bind(start_date.to_string());
		}
		if let Some(end_date) = filter.end_date {
			query = query.bind(end_date.to_string());
		}
		if let Some(min_amount) = filter.min_amount {
			query = query.bind(min_amount);
		}
		if let Some(max_amount) = filter.max_amount {
			query = query.bind(max_amount);
		}

		let rows = query.bind(limit).bind(offset).fetch_all(&self.pool).await?;

		rows.iter().map(row_to_expense).collect()
	}

	/// Apply a partial update to an expense owned by the scope.
	///
	/// # Errors
	/// Returns `DbError::Validation` when the patch points the expense at a
	/// category outside the scope.
	#[tracing::instrument(skip(self, patch), fields(expense_id = %id))]
	pub async fn update(
		&self,
		scope: &Scope,
		id: ExpenseId,
		patch: ExpensePatch,
	) -> Result<Option<Expense>> {
		let Some(existing) = self.get(scope, id).await? else {
			return Ok(None);
		};

		if let Some(category_id) = patch.category_id {
			if !category_in_scope(&self.pool, category_id, scope).await? {
				return Err(DbError::Validation(format!(
					"category {category_id} is not in scope"
				)));
			}
		}

		let amount = patch.amount.unwrap_or(existing.amount);
		let date = patch.date.unwrap_or(existing.date);
		let description = patch.description.or(existing.description);
		let category_id = patch.category_id.unwrap_or(existing.category_id);

		let pred = owned_predicate(scope, "expenses");
		let sql = format!(
			"UPDATE expenses SET amount = ?, date = ?, description = ?, category_id = ? WHERE id = ? AND {}",
			pred.sql
		);

		sqlx::query(&sql)
			.bind(amount)
			.bind(date.to_string())
			.bind(&description)
			.bind(category_id.into_inner())
			.bind(id.into_inner())
			.bind(pred.bind)
			.execute(&self.pool)
			.await?;

		self.get(scope, id).await
	}

	/// Delete an expense owned by the scope. Returns false when absent or
	/// out of scope.
	#[tracing::instrument(skip(self), fields(expense_id = %id))]
	pub async fn delete(&self, scope: &Scope, id: ExpenseId) -> Result<bool> {
		let pred = owned_predicate(scope, "expenses");
		let sql = format!("DELETE FROM expenses WHERE id = ? AND {}", pred.sql);

		let result = sqlx::query(&sql)
			.bind(id.into_inner())
			.bind(pred.bind)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense> {
	let date: String = row.try_get("date")?;
	let created_at: String = row.try_get("created_at")?;
	Ok(Expense {
		id: ExpenseId::new(row.try_get("id")?),
		amount: row.try_get("amount")?,
		date: parse_date(&date)?,
		description: row.try_get("description")?,
		category_id: CategoryId::new(row.try_get("category_id")?),
		user_id: row.try_get::<Option<i64>, _>("user_id")?.map(UserId::new),
		group_id: row.try_get::<Option<i64>, _>("group_id")?.map(GroupId::new),
		created_at: parse_timestamp(&created_at)?,
	})
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
	value
		.parse::<NaiveDate>()
		.map_err(|e| DbError::Internal(format!("invalid date in database: {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::category::CategoryRepository;
	use crate::testing::{create_finance_test_pool, seed_user};

	fn day(s: &str) -> NaiveDate {
		s.parse().unwrap()
	}

	async fn setup() -> (SqlitePool, Scope, CategoryId) {
		let pool = create_finance_test_pool().await;
		let alice = seed_user(&pool, "alice@example.com").await;
		let scope = Scope::personal(alice);
		let category = CategoryRepository::new(pool.clone())
			.create(&scope, "Food")
			.await
			.unwrap();
		(pool, scope, category.id)
	}

	#[tokio::test]
	async fn test_create_and_get_expense() {
		let (pool, scope, category_id) = setup().await;
		let repo = ExpenseRepository::new(pool);

		let expense = repo
			.create(
				&scope,
				NewExpense {
					amount: 12.5,
					date: day("2025-01-10"),
					description: Some("groceries".to_string()),
					category_id,
				},
			)
			.await
			.unwrap();

		let fetched = repo.get(&scope, expense.id).await.unwrap().unwrap();
		assert_eq!(fetched.amount, 12.5);
		assert_eq!(fetched.date, day("2025-01-10"));
		assert_eq!(fetched.description.as_deref(), Some("groceries"));
	}

	#[tokio::test]
	async fn test_create_rejects_cross_scope_category() {
		let (pool, _scope, _category_id) = setup().await;
		let bob = seed_user(&pool, "bob@example.com").await;
		let bob_scope = Scope::personal(bob);
		let alice_category = CategoryId::new(2); // Alice's "Food" from setup

		let repo = ExpenseRepository::new(pool);
		let err = repo
			.create(
				&bob_scope,
				NewExpense {
					amount: 1.0,
					date: day("2025-01-01"),
					description: None,
					category_id: alice_category,
				},
			)
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::Validation(_)));
	}

	#[tokio::test]
	async fn test_expenses_invisible_across_users() {
		let (pool, scope, category_id) = setup().await;
		let bob = seed_user(&pool, "bob@example.com").await;
		let repo = ExpenseRepository::new(pool);

		let expense = repo
			.create(
				&scope,
				NewExpense {
					amount: 5.0,
					date: day("2025-01-05"),
					description: None,
					category_id,
				},
			)
			.await
			.unwrap();

		let bob_scope = Scope::personal(bob);
		assert!(repo.get(&bob_scope, expense.id).await.unwrap().is_none());
		assert!(!repo.delete(&bob_scope, expense.id).await.unwrap());
	}

	#[tokio::test]
	async fn test_list_filters() {
		let (pool, scope, category_id) = setup().await;
		let repo = ExpenseRepository::new(pool);

		for (amount, date) in [(10.0, "2025-01-05"), (20.0, "2025-01-15"), (30.0, "2025-02-01")] {
			repo.create(
				&scope,
				NewExpense {
					amount,
					date: day(date),
					description: None,
					category_id,
				},
			)
			.await
			.unwrap();
		}

		let all = repo
			.list(&scope, &ExpenseFilter::default(), 100, 0)
			.await
			.unwrap();
		assert_eq!(all.len(), 3);
		// Newest first
		assert_eq!(all[0].date, day("2025-02-01"));

		let january = repo
			.list(
				&scope,
				&ExpenseFilter {
					start_date: Some(day("2025-01-01")),
					end_date: Some(day("2025-01-31")),
					..Default::default()
				},
				100,
				0,
			)
			.await
			.unwrap();
		assert_eq!(january.len(), 2);

		let pricey = repo
			.list(
				&scope,
				&ExpenseFilter {
					min_amount: Some(15.0),
					..Default::default()
				},
				100,
				0,
			)
			.await
			.unwrap();
		assert_eq!(pricey.len(), 2);

		let paged = repo
			.list(&scope, &ExpenseFilter::default(), 2, 2)
			.await
			.unwrap();
		assert_eq!(paged.len(), 1);
	}

	#[tokio::test]
	async fn test_partial_update() {
		let (pool, scope, category_id) = setup().await;
		let repo = ExpenseRepository::new(pool);

		let expense = repo
			.create(
				&scope,
				NewExpense {
					amount: 10.0,
					date: day("2025-01-05"),
					description: Some("lunch".to_string()),
					category_id,
				},
			)
			.await
			.unwrap();

		let updated = repo
			.update(
				&scope,
				expense.id,
				ExpensePatch {
					amount: Some(11.5),
					..Default::default()
				},
			)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(updated.amount, 11.5);
		// Untouched fields survive the merge.
		assert_eq!(updated.date, day("2025-01-05"));
		assert_eq!(updated.description.as_deref(), Some("lunch"));
	}

	#[tokio::test]
	async fn test_update_rejects_cross_scope_category() {
		let (pool, scope, category_id) = setup().await;
		let bob = seed_user(&pool, "bob@example.com").await;
		let bob_category = CategoryRepository::new(pool.clone())
			.create(&Scope::personal(bob), "Secret")
			.await
			.unwrap();
		let repo = ExpenseRepository::new(pool);

		let expense = repo
			.create(
				&scope,
				NewExpense {
					amount: 10.0,
					date: day("2025-01-05"),
					description: None,
					category_id,
				},
			)
			.await
			.unwrap();

		let err = repo
			.update(
				&scope,
				expense.id,
				ExpensePatch {
					category_id: Some(bob_category.id),
					..Default::default()
				},
			)
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::Validation(_)));
	}
}
