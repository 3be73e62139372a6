// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health HTTP handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::AppState;

/// Health report for the server and its database.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
	pub status: String,
	pub database: String,
	pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Liveness plus a database round trip.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

	let (http_status, status, database) = if database_ok {
		(StatusCode::OK, "ok", "ok")
	} else {
		(StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "unreachable")
	};

	(
		http_status,
		Json(HealthResponse {
			status: status.to_string(),
			database: database.to_string(),
			timestamp: chrono::Utc::now().to_rfc3339(),
		}),
	)
}
