//! Data-plane client: per-table CRUD with equality filters.

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::StoreError;

/// Longest response-body prefix kept in error messages and logs.
const ERROR_BODY_LIMIT: usize = 500;

/// Client for the remote store's data plane.
///
/// Cheap to clone; all clones share one HTTP connection pool. Row-level
/// security on the remote side scopes every query to the bearer identity,
/// so callers pass the signed-in user's access token where one exists.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl StoreClient {
    /// Create a new data-plane client.
    ///
    /// `api_key` is the project anon key for the public servers, or the
    /// service-role key for operational tools.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            inner: Arc::new(StoreClientInner {
                http: reqwest::Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                api_key,
            }),
        }
    }

    /// Start a query against `table`.
    #[must_use]
    pub fn from(&self, table: &str) -> TableQuery {
        TableQuery {
            client: self.clone(),
            table: table.to_string(),
            filters: Vec::new(),
            select: None,
            order: None,
        }
    }

    fn request(
        &self,
        method: reqwest::Method,
        table: &str,
        token: Option<&SecretString>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}/rest/v1/{table}", self.inner.base_url);
        let api_key = self.inner.api_key.expose_secret();
        // Without a user token the anon/service key doubles as the bearer
        let bearer = token.map_or(api_key, ExposeSecret::expose_secret);

        self.inner
            .http
            .request(method, url)
            .header("apikey", api_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }
}

/// Builder for a single table operation.
///
/// Filters compose with logical AND, matching the remote store's equality
/// filter syntax (`?column=eq.value`).
pub struct TableQuery {
    client: StoreClient,
    table: String,
    filters: Vec<(String, String)>,
    select: Option<String>,
    order: Option<String>,
}

impl TableQuery {
    /// Require `column` to equal `value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Require `column` to be non-null. The store rejects unfiltered
    /// deletes, so bulk operations filter on a never-null column.
    #[must_use]
    pub fn not_null(mut self, column: &str) -> Self {
        self.filters
            .push((column.to_string(), "not.is.null".to_string()));
        self
    }

    /// Project the given columns. Embedded joins use the store's resource
    /// embedding syntax, e.g. `*,products(*)`.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// Order results by `column`, newest first.
    #[must_use]
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.desc"));
        self
    }

    /// Fetch all matching rows.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails, the store answers with
    /// a non-success status, or the body cannot be decoded.
    #[instrument(skip(self, token), fields(table = %self.table))]
    pub async fn fetch<T: DeserializeOwned>(
        self,
        token: Option<&SecretString>,
    ) -> Result<Vec<T>, StoreError> {
        let mut params = self.filters.clone();
        params.push((
            "select".to_string(),
            self.select.clone().unwrap_or_else(|| "*".to_string()),
        ));
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }

        let response = self
            .client
            .request(reqwest::Method::GET, &self.table, token)
            .query(&params)
            .send()
            .await?;

        let body = check_status(&self.table, response).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                table = %self.table,
                error = %e,
                body = %truncate(&body),
                "Failed to decode store response"
            );
            StoreError::Parse(e)
        })
    }

    /// Fetch exactly one matching row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row matches, or any error
    /// [`fetch`](Self::fetch) can return.
    pub async fn fetch_one<T: DeserializeOwned>(
        self,
        token: Option<&SecretString>,
    ) -> Result<T, StoreError> {
        let table = self.table.clone();
        let filters = describe_filters(&self.filters);
        let rows: Vec<T> = self.fetch(token).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("{table} {filters}")))
    }

    /// Insert a row.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or the store rejects
    /// the row (constraint violation, permission denial).
    #[instrument(skip(self, row, token), fields(table = %self.table))]
    pub async fn insert(self, row: &impl Serialize, token: Option<&SecretString>) -> Result<(), StoreError> {
        let response = self
            .client
            .request(reqwest::Method::POST, &self.table, token)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        check_status(&self.table, response).await.map(drop)
    }

    /// Update all matching rows with `patch`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or is rejected.
    #[instrument(skip(self, patch, token), fields(table = %self.table))]
    pub async fn update(self, patch: &impl Serialize, token: Option<&SecretString>) -> Result<(), StoreError> {
        let response = self
            .client
            .request(reqwest::Method::PATCH, &self.table, token)
            .header("Prefer", "return=minimal")
            .query(&self.filters)
            .json(patch)
            .send()
            .await?;

        check_status(&self.table, response).await.map(drop)
    }

    /// Delete all matching rows.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the request fails or is rejected.
    #[instrument(skip(self, token), fields(table = %self.table))]
    pub async fn delete(self, token: Option<&SecretString>) -> Result<(), StoreError> {
        let response = self
            .client
            .request(reqwest::Method::DELETE, &self.table, token)
            .header("Prefer", "return=minimal")
            .query(&self.filters)
            .send()
            .await?;

        check_status(&self.table, response).await.map(drop)
    }
}

/// Read the body and convert non-success statuses into [`StoreError::Api`].
async fn check_status(table: &str, response: reqwest::Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            table = %table,
            status = %status,
            body = %truncate(&body),
            "Store returned non-success status"
        );
        return Err(StoreError::Api {
            status: status.as_u16(),
            message: truncate(&body),
        });
    }

    Ok(body)
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

fn describe_filters(filters: &[(String, String)]) -> String {
    if filters.is_empty() {
        return "(unfiltered)".to_string();
    }
    filters
        .iter()
        .map(|(column, value)| format!("{column}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}
