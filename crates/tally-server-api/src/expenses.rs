// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tally_server_auth::types::UserId;
use tally_server_db::Expense;

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// Request to record an expense in the current scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateExpenseRequest {
	pub amount: f64,
	pub date: NaiveDate,
	pub description: Option<String>,
	pub category_id: i64,
}

/// Partial update for an expense; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateExpenseRequest {
	pub amount: Option<f64>,
	pub date: Option<NaiveDate>,
	pub description: Option<String>,
	pub category_id: Option<i64>,
}

/// Query filters for listing expenses. All are optional and combine with
/// AND semantics; date and amount bounds are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct ListExpensesParams {
	pub category_id: Option<i64>,
	pub start_date: Option<NaiveDate>,
	pub end_date: Option<NaiveDate>,
	pub min_amount: Option<f64>,
	pub max_amount: Option<f64>,
}

/// An expense in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ExpenseResponse {
	pub id: i64,
	pub amount: f64,
	pub date: NaiveDate,
	pub description: Option<String>,
	pub category_id: i64,
	pub user_id: Option<i64>,
	pub group_id: Option<i64>,
	pub created_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
	fn from(expense: Expense) -> Self {
		Self {
			id: expense.id.into_inner(),
			amount: expense.amount,
			date: expense.date,
			description: expense.description,
			category_id: expense.category_id.into_inner(),
			user_id: expense.user_id.map(UserId::into_inner),
			group_id: expense.group_id.map(|g| g.into_inner()),
			created_at: expense.created_at,
		}
	}
}

/// Response containing expenses owned by the current scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListExpensesResponse {
	pub expenses: Vec<ExpenseResponse>,
}

/// Error response for expense operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ExpenseErrorResponse {
	pub error: String,
	pub message: String,
}
