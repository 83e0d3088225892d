//! Row storage over the backend's PostgREST interface.

use crate::domain::ports::{BackendStore, RowQuery};
use crate::utils::error::{CatalystError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RestStore {
    pub fn new(url: &str, service_key: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn check(table: &str, response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        tracing::error!("Backend request on {} failed with status {}: {}", table, status, message);
        Err(CatalystError::BackendError { status, message })
    }
}

impl BackendStore for RestStore {
    async fn insert(&self, table: &str, row: Value) -> Result<Value> {
        let request = self
            .client
            .post(self.endpoint(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = Self::check(table, self.authorized(request).send().await?).await?;

        let stored: Value = response.json().await?;
        match stored {
            Value::Array(mut rows) if !rows.is_empty() => Ok(rows.swap_remove(0)),
            Value::Object(_) => Ok(stored),
            _ => Err(CatalystError::BackendError {
                status: 200,
                message: format!("Insert into {} returned no row", table),
            }),
        }
    }

    async fn insert_many(&self, table: &str, rows: Vec<Value>) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let count = rows.len();
        let request = self
            .client
            .post(self.endpoint(table))
            .header("Prefer", "return=minimal")
            .json(&rows);
        Self::check(table, self.authorized(request).send().await?).await?;

        tracing::debug!("Inserted {} rows into {}", count, table);
        Ok(count)
    }

    async fn select(&self, query: &RowQuery) -> Result<Vec<Value>> {
        let mut params: Vec<(String, String)> = vec![("select".to_string(), "*".to_string())];
        params.extend(equality_filters(query));
        if let Some((column, order)) = &query.order {
            params.push(("order".to_string(), format!("{}.{}", column, order.as_str())));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        let request = self.client.get(self.endpoint(&query.table)).query(&params);
        let response = Self::check(&query.table, self.authorized(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn update(&self, query: &RowQuery, patch: Value) -> Result<Vec<Value>> {
        // PostgREST patches the whole table when no filter is given
        if query.filters.is_empty() {
            return Err(CatalystError::validation(format!(
                "Refusing to update every row of {}",
                query.table
            )));
        }

        let request = self
            .client
            .patch(self.endpoint(&query.table))
            .query(&equality_filters(query))
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = Self::check(&query.table, self.authorized(request).send().await?).await?;

        let rows: Vec<Value> = response.json().await?;
        tracing::debug!("Updated {} rows in {}", rows.len(), query.table);
        Ok(rows)
    }
}

fn equality_filters(query: &RowQuery) -> Vec<(String, String)> {
    query
        .filters
        .iter()
        .map(|(column, value)| (column.clone(), format!("eq.{}", value)))
        .collect()
}
