use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{ApiError, DryClient};
use crate::utils::{capitalize, display_value};

/// Kind of item to create. The server calls spaces `SMARTSPACE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "ITEM")]
    Item,
    #[serde(rename = "FOLDER")]
    Folder,
    #[serde(rename = "TYPE")]
    Type,
    #[serde(rename = "SMARTSPACE")]
    Space,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Item => "ITEM",
            ItemType::Folder => "FOLDER",
            ItemType::Type => "TYPE",
            ItemType::Space => "SMARTSPACE",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schema-less record returned by the server.
///
/// The well-known fields (`ID`, `Name`, `Description`, `URL`) have
/// accessors; anything the user's schema defines is reached through
/// [`Item::field`] or the map-style methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item {
    data: Map<String, Value>,
}

impl Item {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(ApiError::InvalidResponse(format!(
                "Expected an item object, got {}",
                other
            ))),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field("ID")
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("Name")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("Description")
    }

    pub fn url(&self) -> Option<&str> {
        self.str_field("URL")
    }

    /// The item ID, or an error for items the server sent without one
    pub fn require_id(&self) -> Result<&str, ApiError> {
        self.id()
            .ok_or_else(|| ApiError::InvalidResponse("Item has no ID field".to_string()))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Look up a field by a loosely-cased name.
    ///
    /// Tried in order: exact key, capitalized (`priority` -> `Priority`),
    /// upper case (`url` -> `URL`), then the first key that matches
    /// ignoring case.
    pub fn field(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.data.get(name) {
            return Some(value);
        }
        if let Some(value) = self.data.get(&capitalize(name)) {
            return Some(value);
        }
        if let Some(value) = self.data.get(&name.to_uppercase()) {
            return Some(value);
        }
        let lowered = name.to_lowercase();
        self.data
            .iter()
            .find(|(key, _)| key.to_lowercase() == lowered)
            .map(|(_, value)| value)
    }

    /// [`Item::field`] narrowed to string values
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Exact-key lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.data
    }

    /// Update this item with natural-language instructions.
    /// Returns the server's updated copy; `self` is left as it was.
    pub async fn update(&self, client: &DryClient, query: &str) -> Result<Option<Item>, ApiError> {
        client.update_item(self.require_id()?, query).await
    }

    pub async fn delete(&self, client: &DryClient) -> Result<(), ApiError> {
        client.delete_item(self.require_id()?).await
    }

    /// Write every field as `  key: value`, keys lowercased and sorted
    pub(crate) fn fmt_fields(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<(String, &Value)> = self
            .data
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, value) in fields {
            writeln!(f, "  {}: {}", key, display_value(value))?;
        }
        Ok(())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Item(")?;
        self.fmt_fields(f)?;
        write!(f, ")")
    }
}

impl From<Map<String, Value>> for Item {
    fn from(data: Map<String, Value>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Item {
        Item::from_value(json!({
            "ID": "item-1",
            "Name": "Review code",
            "Description": "Before Friday",
            "URL": "https://dry.ai/item-1",
            "Priority": "high",
            "STATUS": "todo",
            "dueDate": "2025-10-03",
        }))
        .expect("sample item should be an object")
    }

    #[test]
    fn test_map_conversions() {
        let mut data = Map::new();
        data.insert("ID".to_string(), json!("x1"));
        data.insert("Tags".to_string(), json!(["a", "b"]));

        let item = Item::from(data.clone());
        assert_eq!(item.id(), Some("x1"));
        assert_eq!(item.as_map(), &data);
        assert_eq!(item.into_map(), data);
    }

    #[test]
    fn test_well_known_fields() {
        let item = sample();
        assert_eq!(item.id(), Some("item-1"));
        assert_eq!(item.name(), Some("Review code"));
        assert_eq!(item.description(), Some("Before Friday"));
        assert_eq!(item.url(), Some("https://dry.ai/item-1"));
    }

    #[test]
    fn test_field_lookup_order() {
        let item = sample();
        // capitalized
        assert_eq!(item.field_str("priority"), Some("high"));
        // upper case
        assert_eq!(item.field_str("status"), Some("todo"));
        assert_eq!(item.field_str("url"), Some("https://dry.ai/item-1"));
        // case-insensitive scan
        assert_eq!(item.field_str("DUEDATE"), Some("2025-10-03"));
        assert_eq!(item.field("missing"), None);
    }

    #[test]
    fn test_exact_match_wins() {
        let item = Item::from_value(json!({"name": "lower", "Name": "Capital"})).unwrap();
        assert_eq!(item.field_str("name"), Some("lower"));
        assert_eq!(item.field_str("Name"), Some("Capital"));
        assert_eq!(item.name(), Some("Capital"));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(matches!(
            Item::from_value(json!(["a"])),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_map_access() {
        let mut item = sample();
        assert!(item.contains_key("Priority"));
        assert!(!item.contains_key("priority"));
        item.insert("Notes", json!("started"));
        assert_eq!(item.get("Notes"), Some(&json!("started")));
        assert_eq!(item.len(), 8);
    }

    #[test]
    fn test_require_id() {
        let item = Item::from_value(json!({"Name": "no id"})).unwrap();
        assert!(item.require_id().is_err());
        assert_eq!(sample().require_id().unwrap(), "item-1");
    }

    #[test]
    fn test_display_sorted_lowercase() {
        let item = Item::from_value(json!({"Name": "Task", "ID": "t1"})).unwrap();
        assert_eq!(item.to_string(), "Item(\n  id: \"t1\"\n  name: \"Task\"\n)");
    }

    #[test]
    fn test_item_type_wire_names() {
        assert_eq!(ItemType::Space.as_str(), "SMARTSPACE");
        assert_eq!(serde_json::to_value(ItemType::Folder).unwrap(), json!("FOLDER"));
    }
}
