use super::EdgeFunction;
use crate::adapters::{ChatClient, ChatMessage, ChatRequest};
use crate::core::chain::{Provider, ProviderChain};
use crate::core::mentor::{
    self, Intent, EMPTY_MODEL_REPLY, GREETING_REPLY, MENTOR_SYSTEM_PROMPT,
};
use crate::domain::model::LlmSettings;
use crate::utils::error::{CatalystError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct MentorChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MentorReply {
    pub text: String,
    pub intent: Option<Intent>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentorChatResponse {
    pub response: String,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    pub confidence: f32,
}

pub struct TopicProvider;

#[async_trait]
impl Provider<String, MentorReply> for TopicProvider {
    fn name(&self) -> &'static str {
        "keywords"
    }

    async fn provide(&self, message: &String) -> Option<MentorReply> {
        mentor::classify(message).map(|(matched, topic)| MentorReply {
            text: topic.reply.to_string(),
            intent: Some(matched.intent),
            confidence: matched.confidence,
        })
    }
}

pub struct LlmMentor {
    client: ChatClient,
    model: String,
}

impl LlmMentor {
    pub fn new(client: ChatClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Provider<String, MentorReply> for LlmMentor {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn provide(&self, message: &String) -> Option<MentorReply> {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![
                ChatMessage::system(MENTOR_SYSTEM_PROMPT),
                ChatMessage::user(message.clone()),
            ],
        )
        .max_tokens(600);

        match self.client.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => Some(MentorReply {
                text,
                intent: None,
                confidence: 1.0,
            }),
            Ok(_) => {
                tracing::warn!("Mentor model returned an empty reply");
                Some(MentorReply {
                    text: EMPTY_MODEL_REPLY.to_string(),
                    intent: None,
                    confidence: 0.0,
                })
            }
            Err(err) => {
                tracing::warn!("Mentor model unavailable: {}", err);
                None
            }
        }
    }
}

pub struct GreetingProvider;

#[async_trait]
impl Provider<String, MentorReply> for GreetingProvider {
    fn name(&self) -> &'static str {
        "greeting"
    }

    async fn provide(&self, _message: &String) -> Option<MentorReply> {
        Some(MentorReply {
            text: GREETING_REPLY.to_string(),
            intent: None,
            confidence: 0.0,
        })
    }
}

/// Answers a mentor message from canned topics, the model, or the greeting.
pub struct MentorChat {
    chain: ProviderChain<String, MentorReply>,
}

impl MentorChat {
    pub fn new(chat: Option<ChatClient>, llm: &LlmSettings) -> Self {
        let chain = ProviderChain::new()
            .with(TopicProvider)
            .with_optional(chat.map(|client| LlmMentor::new(client, &llm.mentor_model)))
            .with(GreetingProvider);
        Self { chain }
    }

    pub fn providers(&self) -> Vec<&'static str> {
        self.chain.names()
    }
}

#[async_trait]
impl EdgeFunction for MentorChat {
    const NAME: &'static str = "ai-mentor-chat";
    type Request = MentorChatRequest;
    type Response = MentorChatResponse;

    async fn handle(&self, request: MentorChatRequest) -> Result<MentorChatResponse> {
        let message = request.message.trim().to_string();
        if message.is_empty() {
            return Err(CatalystError::validation("Message cannot be empty"));
        }

        let resolved = self.chain.resolve(&message).await;
        let (source, reply) = match resolved {
            Some(resolved) => (resolved.source, resolved.value),
            None => (
                "greeting",
                MentorReply {
                    text: GREETING_REPLY.to_string(),
                    intent: None,
                    confidence: 0.0,
                },
            ),
        };
        tracing::info!("💬 Mentor reply from {}", source);

        Ok(MentorChatResponse {
            response: reply.text,
            source,
            intent: reply.intent,
            confidence: reply.confidence,
        })
    }
}
