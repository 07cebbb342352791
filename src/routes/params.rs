//! Query parameter helpers for the email listing endpoint.
//!
//! Strongly-typed parsing for URL query strings, following Rocket's
//! `FromForm` conventions and deriving `JsonSchema` so the generated OpenAPI
//! document reflects the available parameters and their defaults.

use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

const fn default_page() -> i64 {
    1
}

const fn default_page_size() -> i64 {
    50
}

fn default_optional_string() -> Option<String> {
    None
}

const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters accepted by the email list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, rocket::form::FromForm)]
#[serde(rename_all = "camelCase")]
pub struct EmailListParams {
    /// Optional category filter; `all` (or omission) disables filtering.
    #[serde(default = "default_optional_string")]
    pub category: Option<String>,
    /// One-based page index (defaults to the first page).
    #[field(default = 1)]
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page (clamped between 1 and 100, default 50).
    #[field(default = 50)]
    #[serde(default = "default_page_size")]
    pub size: i64,
}

impl Default for EmailListParams {
    fn default() -> Self {
        Self {
            category: None,
            page: default_page(),
            size: default_page_size(),
        }
    }
}

impl EmailListParams {
    /// Normalized 1-based page index.
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    /// Normalized page size capped at [`MAX_PAGE_SIZE`].
    pub fn size(&self) -> i64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Offset of the first row of the requested page.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.size()
    }

    /// Lower-cased category filter with `all` and empty values removed.
    pub fn category_filter(&self) -> Option<String> {
        self.category.as_ref().and_then(|value| {
            let normalized = value.trim().to_lowercase();
            if normalized.is_empty() || normalized == "all" {
                None
            } else {
                Some(normalized)
            }
        })
    }
}
