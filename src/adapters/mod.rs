// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod memory;
pub mod openai;
pub mod supabase;

pub use memory::MemoryStore;
pub use openai::{ChatClient, ChatMessage, ChatRequest};
pub use supabase::RestStore;

use crate::domain::model::BackendSettings;
use crate::domain::ports::{BackendStore, RowQuery};
use crate::utils::error::Result;
use serde_json::Value;

/// The store selected by configuration.
#[derive(Debug, Clone)]
pub enum Backend {
    Rest(RestStore),
    Memory(MemoryStore),
}

impl Backend {
    pub fn from_settings(settings: &BackendSettings) -> Result<Self> {
        match settings.credentials() {
            Some((url, key)) => {
                tracing::info!("Using hosted backend at {}", url);
                Ok(Backend::Rest(RestStore::new(url, key, settings.timeout_seconds)?))
            }
            None => {
                tracing::warn!("No backend configured, rows are kept in memory only");
                Ok(Backend::Memory(MemoryStore::new()))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Backend::Rest(_) => "rest",
            Backend::Memory(_) => "memory",
        }
    }
}

impl BackendStore for Backend {
    async fn insert(&self, table: &str, row: Value) -> Result<Value> {
        match self {
            Backend::Rest(store) => store.insert(table, row).await,
            Backend::Memory(store) => store.insert(table, row).await,
        }
    }

    async fn insert_many(&self, table: &str, rows: Vec<Value>) -> Result<usize> {
        match self {
            Backend::Rest(store) => store.insert_many(table, rows).await,
            Backend::Memory(store) => store.insert_many(table, rows).await,
        }
    }

    async fn select(&self, query: &RowQuery) -> Result<Vec<Value>> {
        match self {
            Backend::Rest(store) => store.select(query).await,
            Backend::Memory(store) => store.select(query).await,
        }
    }

    async fn update(&self, query: &RowQuery, patch: Value) -> Result<Vec<Value>> {
        match self {
            Backend::Rest(store) => store.update(query, patch).await,
            Backend::Memory(store) => store.update(query, patch).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        let memory = Backend::from_settings(&BackendSettings::default()).unwrap();
        assert_eq!(memory.kind(), "memory");

        let rest = Backend::from_settings(&BackendSettings {
            url: Some("https://project.supabase.co".to_string()),
            service_key: Some("key".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rest.kind(), "rest");

        let blank_key = Backend::from_settings(&BackendSettings {
            url: Some("https://project.supabase.co".to_string()),
            service_key: Some(" ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(blank_key.kind(), "memory");
    }
}
