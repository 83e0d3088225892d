use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---- timetable ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    /// 1 (low) to 5 (high).
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    /// Minutes.
    pub duration: u32,
    #[serde(default = "default_frequency")]
    pub frequency: String,
}

fn default_frequency() -> String {
    "daily".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationType {
    #[default]
    Day,
    Week,
    Custom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    #[default]
    AcademicOnly,
    Balanced,
}

impl PlanType {
    pub fn title_prefix(&self) -> &'static str {
        match self {
            PlanType::AcademicOnly => "Academic Focus",
            PlanType::Balanced => "Balanced",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_session_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRequest {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub duration_type: DurationType,
    #[serde(rename = "type", default)]
    pub plan_type: PlanType,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Study,
    Break,
    Activity,
}

impl SlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Study => "study",
            SlotKind::Break => "break",
            SlotKind::Activity => "activity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    /// Minutes after midnight of the first plan day; may exceed one day.
    #[serde(skip)]
    pub start_minute: u32,
    pub title: String,
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: SlotKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimetablePlan {
    pub plan_type: PlanType,
    pub slots: Vec<ScheduleSlot>,
    /// Minutes handed to subjects, after rounding.
    pub study_minutes: u32,
    pub end_minute: u32,
    pub overruns_end_time: bool,
}

// ---- quiz / recommendations ----

/// Question id to free-text answer.
pub type QuizAnswers = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecommendation {
    pub course: String,
    pub confidence: u8,
    pub reasoning: String,
    #[serde(default)]
    pub career_paths: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<CourseRecommendation>,
    #[serde(default)]
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizQuestion {
    pub id: &'static str,
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub category: &'static str,
}

// ---- stress check ----

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressContact {
    pub name: &'static str,
    pub number: &'static str,
    pub available: &'static str,
}

// ---- persisted rows ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableRow {
    pub user_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub subjects: Vec<Subject>,
    pub activities: Vec<Activity>,
    pub duration_type: DurationType,
    pub total_hours: f64,
    pub schedule: serde_json::Value,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub timetable_id: String,
    pub task_id: String,
    pub task_title: String,
    pub task_type: String,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResultRow {
    pub user_id: String,
    pub answers: QuizAnswers,
    pub recommended_courses: Vec<String>,
    pub ai_analysis: RecommendationSet,
}

// ---- settings shared by every config source ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub mentor_model: String,
    pub recommend_model: String,
    pub roadmap_model: String,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            mentor_model: "gpt-4o-mini".to_string(),
            recommend_model: "gpt-4.1-2025-04-14".to_string(),
            roadmap_model: "gpt-4o-mini".to_string(),
            max_retries: 2,
            retry_delay_ms: 2000,
            timeout_seconds: 60,
        }
    }
}

impl LlmSettings {
    /// A key that is unset or blank disables the LLM providers.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableDefaults {
    pub break_minutes: u32,
    pub session_minutes: u32,
    pub start_time: String,
}

impl Default for TimetableDefaults {
    fn default() -> Self {
        Self {
            break_minutes: 15,
            session_minutes: 90,
            start_time: "09:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Project URL of the hosted backend; rows stay in memory when unset.
    pub url: Option<String>,
    pub service_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            timeout_seconds: 30,
        }
    }
}

impl BackendSettings {
    /// URL and key, when both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().filter(|u| !u.trim().is_empty())?;
        let key = self.service_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some((url, key))
    }
}
