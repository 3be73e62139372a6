// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tally_server_auth::types::UserId;
use tally_server_db::Budget;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Request to create a budget in the current scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateBudgetRequest {
	pub category_id: i64,
	pub amount: f64,
	pub period_start: NaiveDate,
	pub period_end: Option<NaiveDate>,
}

/// Partial update for a budget; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateBudgetRequest {
	pub category_id: Option<i64>,
	pub amount: Option<f64>,
	pub period_start: Option<NaiveDate>,
	pub period_end: Option<NaiveDate>,
}

/// A budget in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BudgetResponse {
	pub id: i64,
	pub category_id: i64,
	pub amount: f64,
	pub period_start: NaiveDate,
	pub period_end: Option<NaiveDate>,
	pub user_id: Option<i64>,
	pub group_id: Option<i64>,
	pub created_at: DateTime<Utc>,
}

impl From<Budget> for BudgetResponse {
	fn from(budget: Budget) -> Self {
		Self {
			id: budget.id.into_inner(),
			category_id: budget.category_id.into_inner(),
			amount: budget.amount,
			period_start: budget.period_start,
			period_end: budget.period_end,
			user_id: budget.user_id.map(UserId::into_inner),
			group_id: budget.group_id.map(|g| g.into_inner()),
			created_at: budget.created_at,
		}
	}
}

/// Response containing budgets owned by the current scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListBudgetsResponse {
	pub budgets: Vec<BudgetResponse>,
}

/// Error response for budget operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BudgetErrorResponse {
	pub error: String,
	pub message: String,
}
