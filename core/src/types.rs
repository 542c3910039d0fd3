//! Request payloads and response DTOs for the ProposalPage API.
//!
//! # Design
//! Response types mirror the backend's JSON (Mongo-style `_id`, camelCase
//! fields) and are decoded on demand through `CallResult::json_as`. Fields
//! the backend may omit default instead of failing, so a DTO keeps decoding
//! when the server adds or drops optional data. The mock-server crate
//! defines its own copies; integration tests catch drift between the two.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::params::Params;

/// Login payload for `authenticate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Body of `setProjectPassword` and `checkProjectPassword`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPayload {
    pub password: String,
}

/// Body of `cloneRow` when a target position is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonePosition {
    pub position: u32,
}

/// Query for `listTemplates`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
}

impl Pagination {
    pub fn new(page: u32, items_per_page: u32) -> Self {
        Self {
            page: Some(page),
            items_per_page: Some(items_per_page),
        }
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .with_opt("page", self.page)
            .with_opt("itemsPerPage", self.items_per_page)
    }
}

/// Query for `listProjects`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub title: Option<String>,
}

impl ProjectFilter {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn items_per_page(mut self, items_per_page: u32) -> Self {
        self.items_per_page = Some(items_per_page);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .with_opt("page", self.page)
            .with_opt("itemsPerPage", self.items_per_page)
            .with_opt("title", self.title.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
}

/// Paginated listing envelope used by `listProjects` and `listTemplates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
    #[serde(default)]
    pub default_cover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fonts: Vec<Value>,
    #[serde(default)]
    pub publish: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub count_views: u64,
    #[serde(default)]
    pub time_views: u64,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "publishURL", default)]
    pub publish_url: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_view: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub style: Value,
    #[serde(default)]
    pub full_screen: bool,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub style: Value,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub style: Value,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub contents: Vec<Content>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub style: Value,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}
