// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::de::DeserializeOwned;

use crate::error::CatalogError;
use crate::http::HttpClient;

use super::model::{Genre, Show};

/// Base URL of the public podcast catalog
pub const DEFAULT_BASE_URL: &str = "https://podcast-api.netlify.app";

/// Read-only client for the remote podcast catalog
///
/// Stateless request/response: every call fetches a fresh snapshot. Callers
/// own whatever caching they need.
pub struct CatalogGateway<C: HttpClient> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> CatalogGateway<C> {
    /// Create a gateway against the default catalog URL
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Create a gateway against a custom base URL (mirrors, tests)
    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// Fetch the full show catalog, sorted alphabetically by title
    pub async fn list_shows(&self) -> Result<Vec<Show>, CatalogError> {
        let url = self.base_url.clone();
        let value: serde_json::Value = self.get_json(&url).await?;

        // The catalog root must be a list of shows
        if !value.is_array() {
            return Err(CatalogError::MalformedData {
                url,
                reason: "catalog root is not a list".to_string(),
            });
        }

        let mut shows: Vec<Show> = serde_json::from_value(value)
            .map_err(|e| CatalogError::ParseFailed { url, source: e })?;

        shows.sort_by_key(|show| show.title.to_lowercase());
        Ok(shows)
    }

    /// Fetch a single show with its seasons and episode lists populated
    pub async fn get_show(&self, id: &str) -> Result<Show, CatalogError> {
        let url = format!("{}/id/{}", self.base_url, id);
        self.get_json(&url).await
    }

    /// Fetch genre metadata by numeric id
    pub async fn get_genre(&self, id: u32) -> Result<Genre, CatalogError> {
        let url = format!("{}/genre/{}", self.base_url, id);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| CatalogError::FetchFailed {
                url: url.to_string(),
                source: e,
            })?;

        if !(200..300).contains(&response.status) {
            return Err(CatalogError::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| CatalogError::ParseFailed {
            url: url.to_string(),
            source: e,
        })
    }
}
