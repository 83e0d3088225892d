use crate::domain::model::{BackendSettings, LlmSettings, TimetableDefaults};
use crate::utils::error::Result;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Equality-filtered, optionally ordered read of one backend table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowQuery {
    pub table: String,
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl RowQuery {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, column: &str, order: SortOrder) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Row storage delegated to the hosted backend.
pub trait BackendStore: Send + Sync {
    /// Inserts one row and returns it as stored, including its generated `id`.
    fn insert(&self, table: &str, row: Value)
        -> impl std::future::Future<Output = Result<Value>> + Send;

    /// Inserts several rows and returns how many were written.
    fn insert_many(
        &self,
        table: &str,
        rows: Vec<Value>,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;

    fn select(&self, query: &RowQuery)
        -> impl std::future::Future<Output = Result<Vec<Value>>> + Send;

    /// Merges `patch` into every row matching the query's filters and
    /// returns the updated rows. Ordering and limit are ignored.
    fn update(
        &self,
        query: &RowQuery,
        patch: Value,
    ) -> impl std::future::Future<Output = Result<Vec<Value>>> + Send;
}

/// What the request handlers need from whichever config source is in use.
pub trait ConfigProvider: Send + Sync {
    fn llm(&self) -> &LlmSettings;
    fn backend(&self) -> &BackendSettings;
    fn timetable_defaults(&self) -> &TimetableDefaults;
    /// JSON catalog replacing the built-in directories.
    fn catalog_path(&self) -> Option<&str>;
}
