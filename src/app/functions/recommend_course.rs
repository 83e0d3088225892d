use super::EdgeFunction;
use crate::adapters::{ChatClient, ChatMessage, ChatRequest};
use crate::core::chain::{Provider, ProviderChain};
use crate::core::quiz;
use crate::core::roadmap::strip_code_fence;
use crate::domain::model::{
    CourseRecommendation, LlmSettings, QuizAnswers, QuizResultRow, RecommendationSet,
};
use crate::domain::ports::BackendStore;
use crate::utils::error::{CatalystError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const QUIZ_RESULTS_TABLE: &str = "quiz_results";

const RECOMMEND_SYSTEM_PROMPT: &str =
    "You are an expert educational counselor. Always respond with valid JSON only.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendCourseRequest {
    #[serde(default)]
    pub answers: QuizAnswers,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendCourseResponse {
    pub success: bool,
    pub recommendations: Vec<CourseRecommendation>,
    pub analysis: String,
    pub source: &'static str,
}

pub fn recommendation_prompt(answers: &QuizAnswers) -> String {
    let answers_text = answers
        .iter()
        .map(|(question, answer)| format!("Q{}: {}", question, answer))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert educational counselor and career advisor. Based on the following quiz responses from a student, recommend the top 3 most suitable undergraduate courses/programs.

Quiz Responses:
{answers_text}

Available Course Categories:
- Engineering & Technology (Computer Science, Mechanical, Electrical, Civil, etc.)
- Business & Management (BBA, Economics, Commerce, etc.)
- Sciences (Physics, Chemistry, Biology, Mathematics, etc.)
- Arts & Humanities (Literature, Psychology, Philosophy, etc.)
- Medical & Health Sciences (MBBS, Nursing, Pharmacy, etc.)
- Law & Legal Studies
- Design & Creative Arts
- Agriculture & Life Sciences
- Social Sciences (Sociology, Political Science, etc.)

Please analyze the responses and provide exactly 3 course recommendations in the following JSON format:
{{
  "recommendations": [
    {{
      "course": "Full course name (e.g., Bachelor of Computer Science)",
      "confidence": 85,
      "reasoning": "Clear explanation why this course suits the student based on their quiz responses",
      "careerPaths": ["Career option 1", "Career option 2", "Career option 3"],
      "prerequisites": ["Prerequisite 1", "Prerequisite 2"],
      "duration": "3-4 years"
    }}
  ],
  "analysis": "Overall analysis of the student's interests, strengths, and personality based on quiz responses"
}}

Base your recommendations on:
1. Stated interests and preferred activities
2. Motivation and goals
3. Personality traits and working style
4. Preferred environment and work type
5. Subject preferences
6. Problem-solving approach

Ensure each recommendation is well-reasoned and matches the student's profile."#
    )
}

/// Model output before confidences are normalised.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelCourse {
    course: String,
    confidence: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    career_paths: Vec<String>,
    #[serde(default)]
    prerequisites: Vec<String>,
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
struct ModelRecommendations {
    recommendations: Vec<ModelCourse>,
    #[serde(default)]
    analysis: String,
}

/// Parses a model reply, clamping confidences to 0..=100. Replies that are
/// not JSON or carry no recommendations yield `None`.
pub fn parse_recommendations(content: &str) -> Option<RecommendationSet> {
    let parsed: ModelRecommendations = match serde_json::from_str(strip_code_fence(content)) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("Could not parse model recommendations: {}", err);
            return None;
        }
    };
    if parsed.recommendations.is_empty() {
        return None;
    }

    Some(RecommendationSet {
        recommendations: parsed
            .recommendations
            .into_iter()
            .map(|course| CourseRecommendation {
                course: course.course,
                confidence: course.confidence.clamp(0.0, 100.0).round() as u8,
                reasoning: course.reasoning,
                career_paths: course.career_paths,
                prerequisites: course.prerequisites,
                duration: course.duration,
            })
            .collect(),
        analysis: parsed.analysis,
    })
}

pub struct LlmRecommender {
    client: ChatClient,
    model: String,
}

impl LlmRecommender {
    pub fn new(client: ChatClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Provider<QuizAnswers, RecommendationSet> for LlmRecommender {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn provide(&self, answers: &QuizAnswers) -> Option<RecommendationSet> {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![
                ChatMessage::system(RECOMMEND_SYSTEM_PROMPT),
                ChatMessage::user(recommendation_prompt(answers)),
            ],
        )
        .max_completion_tokens(1500)
        .temperature(0.7);

        match self.client.complete(&request).await {
            Ok(content) => parse_recommendations(&content),
            Err(err) => {
                tracing::warn!("Course recommendation model unavailable: {}", err);
                None
            }
        }
    }
}

pub struct KeywordRecommender;

#[async_trait]
impl Provider<QuizAnswers, RecommendationSet> for KeywordRecommender {
    fn name(&self) -> &'static str {
        "keywords"
    }

    async fn provide(&self, answers: &QuizAnswers) -> Option<RecommendationSet> {
        Some(quiz::recommend(answers))
    }
}

/// Recommends courses for a set of quiz answers and records the result.
pub struct RecommendCourse<S: BackendStore> {
    store: S,
    chain: ProviderChain<QuizAnswers, RecommendationSet>,
}

impl<S: BackendStore> RecommendCourse<S> {
    pub fn new(store: S, chat: Option<ChatClient>, llm: &LlmSettings) -> Self {
        let chain = ProviderChain::new()
            .with_optional(chat.map(|client| LlmRecommender::new(client, &llm.recommend_model)))
            .with(KeywordRecommender);
        Self { store, chain }
    }
}

#[async_trait]
impl<S: BackendStore> EdgeFunction for RecommendCourse<S> {
    const NAME: &'static str = "recommend-course";
    type Request = RecommendCourseRequest;
    type Response = RecommendCourseResponse;

    async fn handle(&self, request: RecommendCourseRequest) -> Result<RecommendCourseResponse> {
        let user_id = validate_required_field("userId", &request.user_id)
            .map_err(CatalystError::into_input)?
            .clone();
        if request.answers.is_empty() {
            return Err(CatalystError::validation("At least one quiz answer is required"));
        }
        tracing::info!("🎓 Processing {} quiz answers for user {}", request.answers.len(), user_id);

        let (source, set) = match self.chain.resolve(&request.answers).await {
            Some(resolved) => (resolved.source, resolved.value),
            None => ("keywords", quiz::recommend(&request.answers)),
        };

        let row = QuizResultRow {
            user_id,
            answers: request.answers,
            recommended_courses: set.recommendations.iter().map(|r| r.course.clone()).collect(),
            ai_analysis: set.clone(),
        };
        self.store
            .insert(QUIZ_RESULTS_TABLE, serde_json::to_value(&row)?)
            .await?;

        Ok(RecommendCourseResponse {
            success: true,
            recommendations: set.recommendations,
            analysis: set.analysis,
            source,
        })
    }
}
