//! Request and response models for the items API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use ombrelle_db::models::Item;

/// Request to create an item.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    /// Item name.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateItemRequest {
    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Name is required".to_string());
        }
        if self.name.len() > 200 {
            return Some("Name must be at most 200 characters".to_string());
        }
        None
    }
}

/// Request to update an item. Unset fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateItemRequest {
    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Some("Name must not be empty".to_string());
            }
            if name.len() > 200 {
                return Some("Name must be at most 200 characters".to_string());
            }
        }
        None
    }
}

/// An item as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemResponse {
    /// Unique item identifier.
    pub id: Uuid,

    /// Owning tenant.
    pub tenant_id: Uuid,

    /// Item name.
    pub name: String,

    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            tenant_id: item.tenant_id,
            name: item.name,
            description: item.description,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_item_request_valid() {
        let request = CreateItemRequest {
            name: "Widget".to_string(),
            description: None,
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_create_item_request_empty_name() {
        let request = CreateItemRequest {
            name: "   ".to_string(),
            description: None,
        };
        assert_eq!(request.validate(), Some("Name is required".to_string()));
    }

    #[test]
    fn test_update_item_request_empty_is_valid() {
        assert!(UpdateItemRequest::default().validate().is_none());
    }
}
