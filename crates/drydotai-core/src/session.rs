//! Entry points that resolve a token and open spaces.
//!
//! A `Session` owns the configuration, the token store and (optionally) a
//! prompt. The first call that finds no token anywhere runs the email
//! login once through the prompt, so a first run needs no setup step.

use tracing::{info, warn};

use crate::api::{ApiError, DryClient, GetItemQuery};
use crate::auth::{Authenticator, Prompt, TokenStore};
use crate::config::ClientConfig;
use crate::models::{ItemType, Space};

pub struct Session {
    config: ClientConfig,
    store: TokenStore,
    prompt: Option<Box<dyn Prompt + Send + Sync>>,
}

impl Session {
    /// Session using the default `.env` token store and no prompt
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            store: TokenStore::default(),
            prompt: None,
        }
    }

    pub fn with_store(mut self, store: TokenStore) -> Self {
        self.store = store;
        self
    }

    /// Enable first-run login through the given prompt
    pub fn with_prompt(mut self, prompt: impl Prompt + Send + Sync + 'static) -> Self {
        self.prompt = Some(Box::new(prompt));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Explicit token, then the store, then (with a prompt) a fresh login
    pub async fn resolve_token(&self) -> Option<String> {
        if let Some(token) = self.config.token.as_ref().filter(|t| !t.is_empty()) {
            return Some(token.clone());
        }
        if let Some(token) = self.store.get() {
            return Some(token);
        }

        let prompt = self.prompt.as_deref()?;
        info!("dry.ai authentication required for first-time setup");

        let Some(email) = prompt.email() else {
            warn!("Email is required for authentication");
            return None;
        };

        let client = match DryClient::new(self.config.clone()) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Could not build client for authentication");
                return None;
            }
        };

        let mut authenticator = Authenticator::new(client, self.store.clone());
        let token = authenticator.authenticate_user(&email, prompt).await;
        if token.is_some() {
            info!("Authentication successful, token saved for future runs");
        }
        token
    }

    /// Client carrying the resolved token. Without a token the client is
    /// still returned; the server then answers with 401.
    pub async fn client(&self) -> Result<DryClient, ApiError> {
        let mut config = self.config.clone();
        config.token = self.resolve_token().await;
        if config.token.is_none() {
            warn!("No dry.ai token available, requests will be unauthenticated");
        }
        DryClient::new(config)
    }

    /// Create a new space from a natural-language description
    pub async fn create_space(&self, query: &str) -> Result<Option<Space>, ApiError> {
        let client = self.client().await?;
        let item = client.create_item(ItemType::Space, query, None).await?;
        Ok(item.map(|item| Space::new(item, client)))
    }

    /// Find an existing space with a natural-language query
    pub async fn get_space(&self, query: &str) -> Result<Option<Space>, ApiError> {
        let client = self.client().await?;
        let item = client
            .get_item(&GetItemQuery::search(ItemType::Space, query))
            .await?;
        Ok(item.map(|item| Space::new(item, client)))
    }

    pub async fn get_space_by_id(&self, space_id: &str) -> Result<Option<Space>, ApiError> {
        let client = self.client().await?;
        let item = client.get_item(&GetItemQuery::by_id(space_id)).await?;
        Ok(item.map(|item| Space::new(item, client)))
    }
}
