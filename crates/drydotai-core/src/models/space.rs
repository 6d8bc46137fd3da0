use std::fmt;

use crate::api::{ApiError, DryClient};

use super::{Item, ItemType};

/// A workspace on the server, holding the client used to reach it.
#[derive(Clone)]
pub struct Space {
    item: Item,
    client: DryClient,
}

impl Space {
    pub fn new(item: Item, client: DryClient) -> Self {
        Self { item, client }
    }

    pub fn id(&self) -> Option<&str> {
        self.item.id()
    }

    pub fn name(&self) -> Option<&str> {
        self.item.name()
    }

    pub fn description(&self) -> Option<&str> {
        self.item.description()
    }

    pub fn url(&self) -> Option<&str> {
        self.item.url()
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn client(&self) -> &DryClient {
        &self.client
    }

    fn space_id(&self) -> Result<&str, ApiError> {
        self.item.require_id()
    }

    /// Search for items in this space using natural language
    pub async fn search(&self, query: &str) -> Result<Vec<Item>, ApiError> {
        self.client.list_items(self.space_id()?, query).await
    }

    /// Add a type definition (a schema for later items)
    pub async fn add_type(&self, query: &str) -> Result<Option<Item>, ApiError> {
        self.add(ItemType::Type, query).await
    }

    pub async fn add_item(&self, query: &str) -> Result<Option<Item>, ApiError> {
        self.add(ItemType::Item, query).await
    }

    pub async fn add_folder(&self, query: &str) -> Result<Option<Item>, ApiError> {
        self.add(ItemType::Folder, query).await
    }

    async fn add(&self, item_type: ItemType, query: &str) -> Result<Option<Item>, ApiError> {
        self.client
            .create_item(item_type, query, Some(self.space_id()?))
            .await
    }

    /// Delete the items in this space matching the query
    pub async fn delete_items(&self, query: &str) -> Result<(), ApiError> {
        self.client
            .delete_items_by_query(self.space_id()?, query)
            .await
    }

    /// Update every matching item in this space
    pub async fn update_items(&self, query: &str) -> Result<Vec<Item>, ApiError> {
        self.client.update_items(self.space_id()?, query).await
    }

    /// Update the space itself. When the server returns the new version it
    /// replaces this space's data.
    pub async fn update(&mut self, query: &str) -> Result<&mut Self, ApiError> {
        let updated = self.client.update_item(self.space_id()?, query).await?;
        if let Some(item) = updated {
            self.item = item;
        }
        Ok(self)
    }

    pub async fn delete(self) -> Result<(), ApiError> {
        self.client.delete_item(self.space_id()?).await
    }
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space").field("item", &self.item).finish()
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Space(")?;
        self.item.fmt_fields(f)?;
        write!(f, ")")
    }
}
