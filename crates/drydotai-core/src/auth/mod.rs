//! Authentication module for obtaining and keeping a bearer token.
//!
//! This module provides:
//! - `TokenStore`: token persistence in the process environment and a
//!   local `.env` file
//! - `Authenticator`: the email verification login exchange
//! - `CodeProvider` / `EmailProvider`: how the login asks the user for
//!   input, with console and fixed-answer implementations
//!
//! Tokens carry no expiry; one stays valid until it is cleared.

pub mod flow;
pub mod prompt;
pub mod token_store;

pub use flow::{AuthError, AuthState, Authenticator, PendingRegistration};
pub use prompt::{CodeProvider, ConsolePrompt, EmailProvider, Prompt, StaticPrompt};
pub use token_store::{TokenStore, TokenStoreError, DEFAULT_TOKEN_FILE};
