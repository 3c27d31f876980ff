// HTTP routes
pub mod admin;
pub mod analytics;
pub mod auth;
pub mod chat;
pub mod forms;
pub mod health;
pub mod portfolio;
pub mod social;
pub mod stocks;
pub mod waitlist;

use axum::extract::FromRequest;

use crate::server::error::ApiError;

/// `axum::Json` whose rejections render as `{"detail": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
