use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, InvalidHeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Constraint conflict: {0}")]
    Conflict(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Thin client over the PostgREST endpoints of the salon store.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self, method: &Method) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key))?,
        );

        // PostgREST only echoes written rows when asked to
        if [Method::POST, Method::PATCH, Method::DELETE].contains(method) {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(&method)?;

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => DatabaseError::Auth(error_text),
                404 => DatabaseError::NotFound(error_text),
                409 => DatabaseError::Conflict(error_text),
                code => DatabaseError::Api { status: code, message: error_text },
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<T>(&bytes)
            .map_err(|e| DatabaseError::Decode(e.to_string()))
    }

    /// Fetch rows from a table with a pre-built PostgREST query string.
    pub async fn select<T>(&self, table: &str, query: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let path = if query.is_empty() {
            format!("/rest/v1/{}", table)
        } else {
            format!("/rest/v1/{}?{}", table, query)
        };

        self.request(Method::GET, &path, None).await
    }

    /// Insert one row and return the stored representation.
    pub async fn insert<T>(&self, table: &str, row: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", table);
        let rows: Vec<T> = self.request(Method::POST, &path, Some(row)).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DatabaseError::Decode(format!("Insert into {} returned no rows", table)))
    }

    /// Patch the row with the given id; `NotFound` when nothing matched.
    pub async fn update<T>(&self, table: &str, id: &str, changes: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}?id=eq.{}", table, id);
        let rows: Vec<T> = self.request(Method::PATCH, &path, Some(changes)).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {}", table, id)))
    }

    /// Delete the row with the given id; `NotFound` when nothing matched.
    pub async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let path = format!("/rest/v1/{}?id=eq.{}", table, id);
        let rows: Vec<Value> = self.request(Method::DELETE, &path, None).await?;
        if rows.is_empty() {
            return Err(DatabaseError::NotFound(format!("{} {}", table, id)));
        }
        Ok(())
    }
}
