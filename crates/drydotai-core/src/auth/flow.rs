use thiserror::Error;
use tracing::{error, info};

use crate::api::{ApiError, DryClient};

use super::prompt::CodeProvider;
use super::token_store::{TokenStore, TokenStoreError};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Email is required for authentication")]
    MissingEmail,

    #[error("Verification code is required")]
    MissingCode,

    #[error(transparent)]
    Store(#[from] TokenStoreError),
}

/// Where an `Authenticator` is in the login exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unregistered,
    PendingVerification,
    Authenticated,
}

/// State carried from `register_or_login` to `verify`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRegistration {
    pub user_id: String,
    pub email: String,
    pub is_existing_user: bool,
}

/// Email verification login.
///
/// `register_or_login` asks the server to mail a code, `verify` trades the
/// code for a bearer token and stores it. Nothing is retried; a wrong or
/// expired code ends the attempt.
pub struct Authenticator {
    client: DryClient,
    store: TokenStore,
    state: AuthState,
}

impl Authenticator {
    pub fn new(client: DryClient, store: TokenStore) -> Self {
        Self {
            client,
            store,
            state: AuthState::Unregistered,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Register a new user or start login for an existing one
    pub async fn register_or_login(&mut self, email: &str) -> Result<PendingRegistration, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::MissingEmail);
        }

        let response = self.client.register_user(email).await?;
        if !response.success {
            let message = response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Registration failed".to_string());
            return Err(ApiError::Rejected(message).into());
        }

        let user_id = response
            .user_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ApiError::InvalidResponse("No userId returned from registration".to_string())
            })?;

        if response.is_existing_user {
            info!(email, "Existing user - verification code sent to email");
        } else {
            info!(email, "New user created - verification code sent to email");
        }

        self.state = AuthState::PendingVerification;
        Ok(PendingRegistration {
            user_id,
            email: email.to_string(),
            is_existing_user: response.is_existing_user,
        })
    }

    /// Verify the emailed code and persist the returned token.
    /// Nothing is written to the store unless the server confirms.
    pub async fn verify(&mut self, code: &str, user_id: &str, email: &str) -> Result<String, AuthError> {
        let result = self.verify_inner(code, user_id, email).await;
        self.state = match result {
            Ok(_) => AuthState::Authenticated,
            Err(_) => AuthState::Unregistered,
        };
        result
    }

    async fn verify_inner(&self, code: &str, user_id: &str, email: &str) -> Result<String, AuthError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::MissingCode);
        }

        let response = self.client.verify_email(code, user_id, email).await?;
        if !(response.success && response.verified) {
            let message = response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Email verification failed".to_string());
            return Err(ApiError::Rejected(message).into());
        }

        let token = response
            .mcp_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ApiError::InvalidResponse("No mcpToken returned from verification".to_string())
            })?;

        self.store.set(&token)?;

        if response.user_created {
            info!(email, "Email verified, new user account created");
        } else {
            info!(email, "Email verified, logged into existing account");
        }
        Ok(token)
    }

    /// Run the whole exchange: register, ask for the code, verify
    pub async fn authenticate<P>(&mut self, email: &str, codes: &P) -> Result<String, AuthError>
    where
        P: CodeProvider + ?Sized,
    {
        info!(email, "Starting authentication");
        let pending = self.register_or_login(email).await?;

        let code = match codes.verification_code(&pending.email) {
            Some(code) if !code.trim().is_empty() => code,
            _ => {
                self.state = AuthState::Unregistered;
                return Err(AuthError::MissingCode);
            }
        };

        self.verify(&code, &pending.user_id, &pending.email).await
    }

    /// `authenticate`, logging the failure instead of returning it
    pub async fn authenticate_user<P>(&mut self, email: &str, codes: &P) -> Option<String>
    where
        P: CodeProvider + ?Sized,
    {
        match self.authenticate(email, codes).await {
            Ok(token) => Some(token),
            Err(e) => {
                error!(error = %e, "Authentication failed");
                None
            }
        }
    }
}
