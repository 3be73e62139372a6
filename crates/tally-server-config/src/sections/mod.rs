// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections, one module per concern.
//!
//! Each section has a fully resolved runtime struct (e.g. [`HttpConfig`])
//! and a partial layer struct (e.g. [`HttpConfigLayer`]) used while merging
//! sources.

mod auth;
mod database;
mod http;
mod logging;

pub use auth::{AuthConfig, AuthConfigLayer, DEFAULT_TOKEN_TTL_MINUTES};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
