// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Budget repository for database operations.
//!
//! A budget caps spending for one category over a period starting at
//! `period_start` and optionally ending at `period_end` (inclusive). A
//! budget is exceeded when the summed matching expenses strictly surpass
//! its amount.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use tally_server_auth::{
	types::{BudgetId, CategoryId, GroupId, UserId},
	Scope,
};

use crate::category::category_in_scope;
use crate::error::{DbError, Result};
use crate::expense::parse_date;
use crate::scoped::owned_predicate;
use crate::user::parse_timestamp;

/// A spending limit for a category over a period.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Budget {
	pub id: BudgetId,
	pub category_id: CategoryId,
	pub amount: f64,
	pub period_start: NaiveDate,
	pub period_end: Option<NaiveDate>,
	pub user_id: Option<UserId>,
	pub group_id: Option<GroupId>,
	pub created_at: DateTime<Utc>,
}

/// Fields for creating a budget.
#[derive(Debug, Clone)]
pub struct NewBudget {
	pub category_id: CategoryId,
	pub amount: f64,
	pub period_start: NaiveDate,
	pub period_end: Option<NaiveDate>,
}

/// Partial update for a budget; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
	pub category_id: Option<CategoryId>,
	pub amount: Option<f64>,
	pub period_start: Option<NaiveDate>,
	pub period_end: Option<NaiveDate>,
}

/// Repository for budget database operations.
#[derive(Clone)]
pub struct BudgetRepository {
	pool: SqlitePool,
}

impl BudgetRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a budget in the given scope.
	///
	/// # Errors
	/// Returns `DbError::Validation` when the category is not visible in
	/// the scope.
	#[tracing::instrument(skip(self, budget))]
	pub async fn create(&self, scope: &Scope, budget: NewBudget) -> Result<Budget> {
		if !category_in_scope(&self.pool, budget.category_id, scope).await? {
			return Err(DbError::Validation(format!(
				"category {} is not in scope",
				budget.category_id
			)));
		}

		let created_at = Utc::now();
		let user_id = scope.owner_user_id();
		let group_id = scope.owner_group_id();

		let result = sqlx::query(
			r#"
			INSERT INTO budgets (category_id, amount, period_start, period_end, user_id, group_id, created_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(budget.category_id.into_inner())
		.bind(budget.amount)
		.bind(budget.period_start.to_string())
		.bind(budget.period_end.map(|d| d.to_string()))
		.bind(user_id.map(UserId::into_inner))
		.bind(group_id.map(GroupId::into_inner))
		.bind(created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		let id = BudgetId::new(result.last_insert_rowid());
		tracing::debug!(budget_id = %id, "budget created");

		Ok(Budget {
			id,
			category_id: budget.category_id,
			amount: budget.amount,
			period_start: budget.period_start,
			period_end: budget.period_end,
			user_id,
			group_id,
			created_at,
		})
	}

	/// Get a budget owned by the scope.
	#[tracing::instrument(skip(self), fields(budget_id = %id))]
	pub async fn get(&self, scope: &Scope, id: BudgetId) -> Result<Option<Budget>> {
		let pred = owned_predicate(scope, "b");
		let sql = format!(
			"SELECT b.id, b.category_id, b.amount, b.period_start, b.period_end, b.user_id, b.group_id, b.created_at FROM budgets b WHERE b.id = ? AND {}",
			pred.sql
		);

		let row = sqlx::query(&sql)
			.bind(id.into_inner())
			.bind(pred.bind)
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_budget(&r)).transpose()
	}

	/// List budgets owned by the scope.
	#[tracing::instrument(skip(self))]
	pub async fn list(&self, scope: &Scope, limit: i32, offset: i32) -> Result<Vec<Budget>> {
		let pred = owned_predicate(scope, "b");
		let sql = format!(
			"SELECT b.id, b.category_id, b.amount, b.period_start, b.period_end, b.user_id, b.group_id, b.created_at FROM budgets b WHERE {} ORDER BY b.id LIMIT ? OFFSET ?",
			pred.sql
		);

		let rows = sqlx::query(&sql)
			.bind(pred.bind)
			.bind(limit)
			.bind(offset)
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(row_to_budget).collect()
	}

	/// List budgets whose matching expense total strictly exceeds the limit.
	///
	/// Matching expenses share the budget's category and scope and fall
	/// within the period (`date >= period_start`, and `date <= period_end`
	/// when an end is set).
	#[tracing::instrument(skip(self))]
	pub async fn list_exceeded(&self, scope: &Scope) -> Result<Vec<Budget>> {
		let budget_pred = owned_predicate(scope, "b");
		let expense_pred = owned_predicate(scope, "e");
		let sql = format!(
			r#"
			SELECT b.id, b.category_id, b.amount, b.period_start, b.period_end, b.user_id, b.group_id, b.created_at
			FROM budgets b
			WHERE {budget_pred}
			  AND (
				SELECT COALESCE(SUM(e.amount), 0)
				FROM expenses e
				WHERE e.category_id = b.category_id
				  AND {expense_pred}
				  AND e.date >= b.period_start
				  AND (b.period_end IS NULL OR e.date <= b.period_end)
			  ) > b.amount
			ORDER BY b.id
			"#,
			budget_pred = budget_pred.sql,
			expense_pred = expense_pred.sql,
		);

		let rows = sqlx::query(&sql)
			.bind(budget_pred.bind)
			.bind(expense_pred.bind)
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(row_to_budget).collect()
	}

	/// Apply a partial update to a budget owned by the scope.
	///
	/// # Errors
	/// Returns `DbError::Validation` when the patch points the budget at a
	/// category outside the scope, or when the merged period would end
	/// before it starts.
	#[tracing::instrument(skip(self, patch), fields(budget_id = %id))]
	pub async fn update(&self, scope: &Scope, id: BudgetId, patch: BudgetPatch) -> Result<Option<Budget>> {
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

		let category_id = patch.category_id.unwrap_or(existing.category_id);
		let amount = patch.amount.unwrap_or(existing.amount);
		let period_start = patch.period_start.unwrap_or(existing.period_start);
		let period_end = patch.period_end.or(existing.period_end);

		// The merged period must stay ordered even when only one side changed.
		if let Some(end) = period_end {
			if end < period_start {
				return Err(DbError::Validation(
					"period_end must not be before period_start".to_string(),
				));
			}
		}

		let pred = owned_predicate(scope, "budgets");
		let sql = format!(
			"UPDATE budgets SET category_id = ?, amount = ?, period_start = ?, period_end = ? WHERE id = ? AND {}",
			pred.sql
		);

		sqlx::query(&sql)
			.bind(category_id.into_inner())
			.bind(amount)
			.bind(period_start.to_string())
			.bind(period_end.map(|d| d.to_string()))
			.bind(id.into_inner())
			.bind(pred.bind)
			.execute(&self.pool)
			.await?;

		self.get(scope, id).await
	}

	/// Delete a budget owned by the scope. Returns false when absent or out
	/// of scope.
	#[tracing::instrument(skip(self), fields(budget_id = %id))]
	pub async fn delete(&self, scope: &Scope, id: BudgetId) -> Result<bool> {
		let pred = owned_predicate(scope, "budgets");
		let sql = format!("DELETE FROM budgets WHERE id = ? AND {}", pred.sql);

		let result = sqlx::query(&sql)
			.bind(id.into_inner())
			.bind(pred.bind)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

fn row_to_budget(row: &sqlx::sqlite::SqliteRow) -> Result<Budget> {
	let period_start: String = row.try_get("period_start")?;
	let period_end: Option<String> = row.try_get("period_end")?;
	let created_at: String = row.try_get("created_at")?;
	Ok(Budget {
		id: BudgetId::new(row.try_get("id")?),
		category_id: CategoryId::new(row.try_get("category_id")?),
		amount: row.try_get("amount")?,
		period_start: parse_date(&period_start)?,
		period_end: period_end.as_deref().map(parse_date).transpose()?,
		user_id: row.try_get::<Option<i64>, _>("user_id")?.map(UserId::new),
		group_id: row.try_get::<Option<i64>, _>("group_id")?.map(GroupId::new),
		created_at: parse_timestamp(&created_at)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::category::CategoryRepository;
	use crate::expense::{ExpenseRepository, NewExpense};
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

	async fn spend(pool: &SqlitePool, scope: &Scope, category_id: CategoryId, amount: f64, date: &str) {
		ExpenseRepository::new(pool.clone())
			.create(
				scope,
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

	#[tokio::test]
	async fn test_create_rejects_cross_scope_category() {
		let (pool, _scope, category_id) = setup().await;
		let bob = seed_user(&pool, "bob@example.com").await;
		let repo = BudgetRepository::new(pool);

		let err = repo
			.create(
				&Scope::personal(bob),
				NewBudget {
					category_id,
					amount: 100.0,
					period_start: day("2025-01-01"),
					period_end: None,
				},
			)
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::Validation(_)));
	}

	#[tokio::test]
	async fn test_exceeded_budget_with_date_range() {
		let (pool, scope, category_id) = setup().await;
		let repo = BudgetRepository::new(pool.clone());

		// Limit 100 over January; three expenses of 40 sum to 120 > 100.
		let budget = repo
			.create(
				&scope,
				NewBudget {
					category_id,
					amount: 100.0,
					period_start: day("2025-01-01"),
					period_end: Some(day("2025-01-31")),
				},
			)
			.await
			.unwrap();

		for date in ["2025-01-05", "2025-01-15", "2025-01-25"] {
			spend(&pool, &scope, category_id, 40.0, date).await;
		}

		let exceeded = repo.list_exceeded(&scope).await.unwrap();
		assert_eq!(exceeded.len(), 1);
		assert_eq!(exceeded[0].id, budget.id);
	}

	#[tokio::test]
	async fn test_budget_at_exact_limit_is_not_exceeded() {
		let (pool, scope, category_id) = setup().await;
		let repo = BudgetRepository::new(pool.clone());

		repo.create(
			&scope,
			NewBudget {
				category_id,
				amount: 80.0,
				period_start: day("2025-01-01"),
				period_end: Some(day("2025-01-31")),
			},
		)
		.await
		.unwrap();

		spend(&pool, &scope, category_id, 40.0, "2025-01-05").await;
		spend(&pool, &scope, category_id, 40.0, "2025-01-15").await;

		// 80 == 80: strictly-greater means not exceeded.
		assert!(repo.list_exceeded(&scope).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_expenses_outside_period_do_not_count() {
		let (pool, scope, category_id) = setup().await;
		let repo = BudgetRepository::new(pool.clone());

		repo.create(
			&scope,
			NewBudget {
				category_id,
				amount: 50.0,
				period_start: day("2025-01-01"),
				period_end: Some(day("2025-01-31")),
			},
		)
		.await
		.unwrap();

		spend(&pool, &scope, category_id, 40.0, "2024-12-31").await;
		spend(&pool, &scope, category_id, 40.0, "2025-02-01").await;
		spend(&pool, &scope, category_id, 40.0, "2025-01-10").await;

		// Only the January expense counts: 40 < 50.
		assert!(repo.list_exceeded(&scope).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_exceeded_ignores_other_users_expenses() {
		let (pool, scope, category_id) = setup().await;
		let repo = BudgetRepository::new(pool.clone());

		repo.create(
			&scope,
			NewBudget {
				category_id,
				amount: 50.0,
				period_start: day("2025-01-01"),
				period_end: None,
			},
		)
		.await
		.unwrap();

		// Bob's spending in his own scope must not count toward Alice's budget.
		let bob = seed_user(&pool, "bob@example.com").await;
		let bob_scope = Scope::personal(bob);
		let bob_category = CategoryRepository::new(pool.clone())
			.create(&bob_scope, "Food")
			.await
			.unwrap();
		spend(&pool, &bob_scope, bob_category.id, 500.0, "2025-01-10").await;

		assert!(repo.list_exceeded(&scope).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_open_ended_budget_counts_everything_after_start() {
		let (pool, scope, category_id) = setup().await;
		let repo = BudgetRepository::new(pool.clone());

		repo.create(
			&scope,
			NewBudget {
				category_id,
				amount: 50.0,
				period_start: day("2025-01-01"),
				period_end: None,
			},
		)
		.await
		.unwrap();

		spend(&pool, &scope, category_id, 30.0, "2025-03-01").await;
		spend(&pool, &scope, category_id, 30.0, "2026-01-01").await;

		assert_eq!(repo.list_exceeded(&scope).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_update_rejects_inverted_merged_period() {
		let (pool, scope, category_id) = setup().await;
		let repo = BudgetRepository::new(pool);

		let budget = repo
			.create(
				&scope,
				NewBudget {
					category_id,
					amount: 100.0,
					period_start: day("2025-01-01"),
					period_end: Some(day("2025-01-31")),
				},
			)
			.await
			.unwrap();

		// Patching only period_end behind the existing start must fail.
		let err = repo
			.update(
				&scope,
				budget.id,
				BudgetPatch {
					period_end: Some(day("2024-06-01")),
					..Default::default()
				},
			)
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::Validation(_)));

		// Same for moving the start past the existing end.
		let err = repo
			.update(
				&scope,
				budget.id,
				BudgetPatch {
					period_start: Some(day("2025-03-01")),
					..Default::default()
				},
			)
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::Validation(_)));

		let unchanged = repo.get(&scope, budget.id).await.unwrap().unwrap();
		assert_eq!(unchanged.period_start, day("2025-01-01"));
		assert_eq!(unchanged.period_end, Some(day("2025-01-31")));
	}

	#[tokio::test]
	async fn test_update_and_delete() {
		let (pool, scope, category_id) = setup().await;
		let repo = BudgetRepository::new(pool);

		let budget = repo
			.create(
				&scope,
				NewBudget {
					category_id,
					amount: 100.0,
					period_start: day("2025-01-01"),
					period_end: None,
				},
			)
			.await
			.unwrap();

		let updated = repo
			.update(
				&scope,
				budget.id,
				BudgetPatch {
					amount: Some(150.0),
					..Default::default()
				},
			)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(updated.amount, 150.0);
		assert_eq!(updated.period_start, day("2025-01-01"));

		assert!(repo.delete(&scope, budget.id).await.unwrap());
		assert!(repo.get(&scope, budget.id).await.unwrap().is_none());
	}
}
