use super::EdgeFunction;
use crate::adapters::{ChatClient, ChatMessage, ChatRequest};
use crate::core::chain::{Provider, ProviderChain};
use crate::core::roadmap::{
    fallback_roadmap, parse_roadmap_reply, roadmap_prompt, ROADMAP_SYSTEM_PROMPT,
};
use crate::domain::model::LlmSettings;
use crate::utils::error::{CatalystError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRequest {
    #[serde(default)]
    pub career_title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub user_profile: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapResponse {
    pub success: bool,
    pub roadmap: Value,
    pub career: String,
    pub category: String,
    pub source: &'static str,
}

pub struct LlmRoadmap {
    client: ChatClient,
    model: String,
}

impl LlmRoadmap {
    pub fn new(client: ChatClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Provider<RoadmapRequest, Value> for LlmRoadmap {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn provide(&self, request: &RoadmapRequest) -> Option<Value> {
        let prompt = roadmap_prompt(
            &request.career_title,
            &request.category,
            request.user_profile.as_ref(),
        );
        let chat = ChatRequest::new(
            self.model.clone(),
            vec![ChatMessage::system(ROADMAP_SYSTEM_PROMPT), ChatMessage::user(prompt)],
        )
        .max_tokens(2000)
        .temperature(0.7);

        match self.client.complete(&chat).await {
            Ok(content) if !content.trim().is_empty() => Some(parse_roadmap_reply(&content)),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!("Roadmap model unavailable: {}", err);
                None
            }
        }
    }
}

pub struct BuiltinRoadmap;

#[async_trait]
impl Provider<RoadmapRequest, Value> for BuiltinRoadmap {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn provide(&self, request: &RoadmapRequest) -> Option<Value> {
        Some(fallback_roadmap(&request.career_title))
    }
}

pub struct DetailedRoadmap {
    chain: ProviderChain<RoadmapRequest, Value>,
}

impl DetailedRoadmap {
    pub fn new(chat: Option<ChatClient>, llm: &LlmSettings) -> Self {
        let chain = ProviderChain::new()
            .with_optional(chat.map(|client| LlmRoadmap::new(client, &llm.roadmap_model)))
            .with(BuiltinRoadmap);
        Self { chain }
    }
}

#[async_trait]
impl EdgeFunction for DetailedRoadmap {
    const NAME: &'static str = "generate-detailed-roadmap";
    type Request = RoadmapRequest;
    type Response = RoadmapResponse;

    async fn handle(&self, request: RoadmapRequest) -> Result<RoadmapResponse> {
        if request.career_title.trim().is_empty() {
            return Err(CatalystError::validation("careerTitle is required"));
        }
        tracing::info!("🗺️ Generating roadmap for {}", request.career_title);

        let (source, roadmap) = match self.chain.resolve(&request).await {
            Some(resolved) => (resolved.source, resolved.value),
            None => ("fallback", fallback_roadmap(&request.career_title)),
        };

        Ok(RoadmapResponse {
            success: true,
            roadmap,
            career: request.career_title,
            category: request.category,
            source,
        })
    }
}
