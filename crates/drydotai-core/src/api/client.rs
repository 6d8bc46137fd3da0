//! API client for the dry.ai CRUD service.
//!
//! Every call is a single request/response round trip. Failures are
//! logged and returned; nothing is retried.

use reqwest::{header, Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::models::{Item, ItemType};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

const REGISTER_ENDPOINT: &str = "register-user";
const VERIFY_ENDPOINT: &str = "verify-email";
const ITEMS_ENDPOINT: &str = "items";
const ITEM_ENDPOINT: &str = "item";

/// Reply to `register-user`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: bool,
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_existing_user: bool,
    pub message: Option<String>,
}

/// Reply to `verify-email`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub verified: bool,
    pub mcp_token: Option<String>,
    #[serde(default)]
    pub user_created: bool,
    pub message: Option<String>,
}

/// Parameters for `get_item`. Unset fields are left off the query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetItemQuery {
    #[serde(rename = "item", skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl GetItemQuery {
    pub fn by_id(item_id: impl Into<String>) -> Self {
        Self {
            item_id: Some(item_id.into()),
            ..Self::default()
        }
    }

    pub fn search(item_type: ItemType, query: impl Into<String>) -> Self {
        Self {
            item_type: Some(item_type),
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

/// API client for dry.ai.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct DryClient {
    client: Client,
    config: ClientConfig,
}

impl DryClient {
    /// Create a new API client
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn token(&self) -> Option<&str> {
        self.config.token.as_deref()
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.config.token = Some(token);
    }

    /// Create a new client with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone().with_token(token),
        }
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.api_base(), endpoint)
    }

    fn headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&self.config.user_agent)?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(ref token) = self.config.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request and parse the JSON body, logging the outcome
    async fn execute(&self, method: Method, url: &str, request: RequestBuilder) -> Result<Value, ApiError> {
        let result = self.execute_inner(request, url).await;
        match &result {
            Ok(value) => {
                if let Some(message) = value
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                {
                    info!(%message, "Server message");
                }
                if self.config.verbose {
                    info!(%method, url, "Call completed successfully");
                } else {
                    debug!(%method, url, "Call completed successfully");
                }
            }
            Err(e) => warn!(%method, url, error = %e, "Call failed"),
        }
        result
    }

    async fn execute_inner(&self, request: RequestBuilder, url: &str) -> Result<Value, ApiError> {
        let response = request.headers(self.headers()?).send().await?;
        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }

    async fn get(&self, endpoint: &str, params: &impl Serialize) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        let request = self.client.get(&url).query(params);
        self.execute(Method::GET, &url, request).await
    }

    async fn post(&self, endpoint: &str, body: &impl Serialize) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        let request = self.client.post(&url).json(body);
        self.execute(Method::POST, &url, request).await
    }

    async fn put(&self, endpoint: &str, body: &impl Serialize) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        let request = self.client.put(&url).json(body);
        self.execute(Method::PUT, &url, request).await
    }

    async fn delete(&self, endpoint: &str, params: &impl Serialize) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        let request = self.client.delete(&url).query(params);
        self.execute(Method::DELETE, &url, request).await
    }

    /// Reject 2xx replies that carry `"success": false`
    fn ensure_success(value: &Value, default_message: &str) -> Result<(), ApiError> {
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(default_message);
            return Err(ApiError::Rejected(message.to_string()));
        }
        Ok(())
    }

    /// Items under the `items` key. A missing or null key means no results.
    fn parse_items(value: Value) -> Result<Vec<Item>, ApiError> {
        match value.get("items") {
            None | Some(Value::Null) => Ok(vec![]),
            Some(Value::Array(items)) => items.iter().cloned().map(Item::from_value).collect(),
            Some(other) => Err(ApiError::InvalidResponse(format!(
                "Expected 'items' to be an array, got {}",
                other
            ))),
        }
    }

    fn parse_first_item(value: Value) -> Result<Option<Item>, ApiError> {
        Ok(Self::parse_items(value)?.into_iter().next())
    }

    // ===== Authentication =====

    /// Start registration or login for an email address.
    /// The server mails a verification code to the address.
    pub async fn register_user(&self, email: &str) -> Result<RegisterResponse, ApiError> {
        let value = self.post(REGISTER_ENDPOINT, &json!({ "email": email })).await?;
        serde_json::from_value(value).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse registration response: {}", e))
        })
    }

    /// Exchange a verification code for a bearer token
    pub async fn verify_email(
        &self,
        code: &str,
        user_id: &str,
        email: &str,
    ) -> Result<VerifyResponse, ApiError> {
        let body = json!({
            "code": code,
            "userId": user_id,
            "email": email,
        });
        let value = self.post(VERIFY_ENDPOINT, &body).await?;
        serde_json::from_value(value).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse verification response: {}", e))
        })
    }

    // ===== Items =====

    /// Create an item from a natural-language description, optionally
    /// inside a folder or space
    pub async fn create_item(
        &self,
        item_type: ItemType,
        query: &str,
        folder: Option<&str>,
    ) -> Result<Option<Item>, ApiError> {
        let mut body = json!({
            "type": item_type,
            "query": query,
            "multi": "true",
        });
        if let Some(folder) = folder.filter(|f| !f.is_empty()) {
            body["folder"] = json!(folder);
        }

        let value = self.post(ITEMS_ENDPOINT, &body).await?;
        Self::ensure_success(&value, "Create failed")?;
        Self::parse_first_item(value)
    }

    /// Fetch a single item by ID, or search for one by type and query
    pub async fn get_item(&self, params: &GetItemQuery) -> Result<Option<Item>, ApiError> {
        let value = self.get(ITEM_ENDPOINT, params).await?;
        Self::ensure_success(&value, "Lookup failed")?;
        match value.get("item") {
            None | Some(Value::Null) => Ok(None),
            Some(item) => Item::from_value(item.clone()).map(Some),
        }
    }

    /// Search for items in a folder using a natural-language query
    pub async fn list_items(&self, folder: &str, query: &str) -> Result<Vec<Item>, ApiError> {
        let params = [("folder", folder), ("query", query), ("multi", "true")];
        let value = self.get(ITEMS_ENDPOINT, &params).await?;
        Self::ensure_success(&value, "Search failed")?;
        Self::parse_items(value)
    }

    /// Update one item using natural-language instructions
    pub async fn update_item(&self, item_id: &str, query: &str) -> Result<Option<Item>, ApiError> {
        let value = self
            .put(ITEMS_ENDPOINT, &json!({ "item": item_id, "query": query }))
            .await?;
        Self::ensure_success(&value, "Update failed")?;
        Self::parse_first_item(value)
    }

    /// Update every item in a folder matching the instructions
    pub async fn update_items(&self, folder: &str, query: &str) -> Result<Vec<Item>, ApiError> {
        let value = self
            .put(ITEMS_ENDPOINT, &json!({ "folder": folder, "query": query }))
            .await?;
        Self::ensure_success(&value, "Update failed")?;
        Self::parse_items(value)
    }

    pub async fn delete_item(&self, item_id: &str) -> Result<(), ApiError> {
        let value = self.delete(ITEMS_ENDPOINT, &[("item", item_id)]).await?;
        Self::ensure_success(&value, "Delete failed")
    }

    /// Delete the items in a folder matching a natural-language query
    pub async fn delete_items_by_query(&self, folder: &str, query: &str) -> Result<(), ApiError> {
        let value = self
            .delete(ITEMS_ENDPOINT, &[("folder", folder), ("query", query)])
            .await?;
        Self::ensure_success(&value, "Delete failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items() {
        let value = json!({"items": [{"ID": "a"}, {"ID": "b"}]});
        let items = DryClient::parse_items(value).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id(), Some("b"));

        assert!(DryClient::parse_items(json!({})).unwrap().is_empty());
        assert!(DryClient::parse_items(json!({"items": null})).unwrap().is_empty());
        assert!(DryClient::parse_items(json!({"items": "nope"})).is_err());
    }

    #[test]
    fn test_ensure_success() {
        assert!(DryClient::ensure_success(&json!({"items": []}), "x").is_ok());
        assert!(DryClient::ensure_success(&json!({"success": true}), "x").is_ok());

        let err = DryClient::ensure_success(&json!({"success": false}), "Delete failed").unwrap_err();
        assert_eq!(err.to_string(), "Request rejected: Delete failed");

        let err = DryClient::ensure_success(
            &json!({"success": false, "message": "no such folder"}),
            "Delete failed",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Request rejected: no such folder");
    }

    #[test]
    fn test_get_item_query_serialization() {
        let params = GetItemQuery::search(ItemType::Space, "my project");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({"type": "SMARTSPACE", "query": "my project"}));

        let params = GetItemQuery::by_id("abc");
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"item": "abc"}));
    }

    #[test]
    fn test_timeout_is_opt_in() {
        let client = DryClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.config().timeout, None);

        let timeout = std::time::Duration::from_secs(120);
        let client = DryClient::new(ClientConfig::default().with_timeout(timeout)).unwrap();
        assert_eq!(client.config().timeout, Some(timeout));
    }

    #[test]
    fn test_headers() {
        let client = DryClient::new(ClientConfig::default().with_token("tok-1")).unwrap();
        let headers = client.headers().unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer tok-1");
        assert_eq!(headers[header::ACCEPT], "application/json");

        let anonymous = DryClient::new(ClientConfig::default()).unwrap();
        assert!(!anonymous.headers().unwrap().contains_key(header::AUTHORIZATION));
    }
}
