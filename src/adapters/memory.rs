use crate::domain::ports::{BackendStore, RowQuery, SortOrder};
use crate::utils::error::{CatalystError, Result};
use chrono::Utc;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-process tables, used when no hosted backend is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows(&self, table: &str) -> Vec<Value> {
        let tables = self.tables.lock().await;
        tables.get(table).cloned().unwrap_or_default()
    }
}

/// Fills in the columns the backend would generate.
fn with_defaults(row: Value) -> Result<Value> {
    let Value::Object(mut fields) = row else {
        return Err(CatalystError::validation("Rows must be JSON objects"));
    };
    fields
        .entry("id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    fields
        .entry("created_at")
        .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
    Ok(Value::Object(fields))
}

fn matches(row: &Value, column: &str, expected: &str) -> bool {
    match row.get(column) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == expected,
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl BackendStore for MemoryStore {
    async fn insert(&self, table: &str, row: Value) -> Result<Value> {
        let row = with_defaults(row)?;
        let mut tables = self.tables.lock().await;
        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    async fn insert_many(&self, table: &str, rows: Vec<Value>) -> Result<usize> {
        let rows = rows
            .into_iter()
            .map(with_defaults)
            .collect::<Result<Vec<_>>>()?;
        let count = rows.len();
        let mut tables = self.tables.lock().await;
        tables.entry(table.to_string()).or_default().extend(rows);
        Ok(count)
    }

    async fn select(&self, query: &RowQuery) -> Result<Vec<Value>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Value> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|(column, value)| matches(row, column, value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, order)) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(column), b.get(column));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn update(&self, query: &RowQuery, patch: Value) -> Result<Vec<Value>> {
        let Value::Object(patch) = patch else {
            return Err(CatalystError::validation("Row patches must be JSON objects"));
        };

        let mut tables = self.tables.lock().await;
        let Some(rows) = tables.get_mut(&query.table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|row| {
            query
                .filters
                .iter()
                .all(|(column, value)| matches(row, column, value))
        }) {
            if let Some(fields) = row.as_object_mut() {
                fields.extend(patch.clone());
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }
}
