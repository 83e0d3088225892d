//! Request handlers exposed both over HTTP and through the lambda runtime.

pub mod detailed_roadmap;
pub mod mentor_chat;
pub mod progress;
pub mod recommend_course;
pub mod smart_timetable;
pub mod stress_check;

pub use detailed_roadmap::DetailedRoadmap;
pub use mentor_chat::MentorChat;
pub use progress::ProgressReport;
pub use recommend_course::RecommendCourse;
pub use smart_timetable::SmartTimetable;
pub use stress_check::StressCheck;

use crate::utils::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A stateless JSON-in, JSON-out handler.
#[async_trait]
pub trait EdgeFunction: Send + Sync {
    /// Route segment under `/functions/v1/`.
    const NAME: &'static str;

    type Request: DeserializeOwned + Send;
    type Response: Serialize + Send;

    async fn handle(&self, request: Self::Request) -> Result<Self::Response>;

    /// Decodes a raw body, runs the handler and encodes the reply.
    async fn invoke(&self, body: &[u8]) -> Result<serde_json::Value> {
        let request: Self::Request = serde_json::from_slice(body).map_err(|err| {
            crate::utils::error::CatalystError::validation(format!("Invalid request body: {}", err))
        })?;
        let response = self.handle(request).await?;
        Ok(serde_json::to_value(response)?)
    }
}
