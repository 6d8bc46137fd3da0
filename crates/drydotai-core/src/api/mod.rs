//! REST API client module for the dry.ai CRUD service.
//!
//! This module provides the `DryClient` for sending natural-language
//! create/read/update/delete queries and for the email verification
//! endpoints used during login.
//!
//! Requests carry a bearer token obtained through the `auth` module.

pub mod client;
pub mod error;

pub use client::{DryClient, GetItemQuery, RegisterResponse, VerifyResponse};
pub use error::ApiError;
