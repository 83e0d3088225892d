//! Ordered fallback between answer sources.
//!
//! Each [`Provider`] either answers or declines with `None`; a
//! [`ProviderChain`] asks them in order and stops at the first answer.

use async_trait::async_trait;

#[async_trait]
pub trait Provider<I: Sync, O>: Send + Sync {
    fn name(&self) -> &'static str;
    async fn provide(&self, input: &I) -> Option<O>;
}

/// An answer together with the provider that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<O> {
    pub source: &'static str,
    pub value: O,
}

pub struct ProviderChain<I, O> {
    providers: Vec<Box<dyn Provider<I, O>>>,
}

impl<I: Sync, O> Default for ProviderChain<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Sync, O> ProviderChain<I, O> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with(mut self, provider: impl Provider<I, O> + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn with_optional(self, provider: Option<impl Provider<I, O> + 'static>) -> Self {
        match provider {
            Some(provider) => self.with(provider),
            None => self,
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn resolve(&self, input: &I) -> Option<Resolved<O>> {
        for provider in &self.providers {
            match provider.provide(input).await {
                Some(value) => {
                    tracing::debug!("Provider {} answered", provider.name());
                    return Some(Resolved {
                        source: provider.name(),
                        value,
                    });
                }
                None => tracing::debug!("Provider {} declined, trying next", provider.name()),
            }
        }
        None
    }
}
