// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tally expense tracking server.
//!
//! This crate wires the config, auth, and db crates into an axum HTTP
//! server: per-request bearer authentication, per-request scope selection
//! via the `group_id` query parameter, and repositories that enforce
//! ownership at the SQL level.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod pagination;
pub mod routes;
pub mod scope_query;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use auth_middleware::RequireAuth;
pub use tally_server_config::ServerConfig;
