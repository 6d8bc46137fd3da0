//! Client library for the dry.ai natural-language CRUD service.
//!
//! Callers describe what they want in plain language ("create a high
//! priority task", "find all open issues") and the server turns it into
//! create/read/update/delete operations on schema-less items.
//!
//! - [`DryClient`]: caller-owned HTTP handle for the CRUD endpoints
//! - [`Item`] / [`Space`]: wrappers over the JSON the server returns
//! - [`TokenStore`] / [`Authenticator`]: bearer token persistence and the
//!   email verification login flow
//! - [`Session`]: resolves a token (lazily logging in on first run) and
//!   opens spaces

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod session;
pub mod utils;

pub use api::{ApiError, DryClient, GetItemQuery};
pub use auth::{
    AuthError, AuthState, Authenticator, CodeProvider, ConsolePrompt, EmailProvider,
    PendingRegistration, Prompt, StaticPrompt, TokenStore, TokenStoreError,
};
pub use config::ClientConfig;
pub use models::{Item, ItemType, Space};
pub use session::Session;
