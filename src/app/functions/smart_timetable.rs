use super::EdgeFunction;
use crate::core::progress::build_progress_rows;
use crate::core::timetable;
use crate::domain::model::{PlanType, TimetableDefaults, TimetableRequest, TimetableRow};
use crate::domain::ports::BackendStore;
use crate::utils::error::{CatalystError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const TIMETABLES_TABLE: &str = "timetables";
pub const PROGRESS_TABLE: &str = "study_progress";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartTimetableRequest {
    #[serde(flatten)]
    pub timetable: TimetableRequest,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTimetable {
    pub id: String,
    pub schedule: serde_json::Value,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmartTimetableResponse {
    pub success: bool,
    pub timetable: CreatedTimetable,
    pub message: String,
}

/// Builds a plan, stores it and seeds one progress row per slot.
pub struct SmartTimetable<S: BackendStore> {
    store: S,
    defaults: TimetableDefaults,
}

impl<S: BackendStore> SmartTimetable<S> {
    pub fn new(store: S, defaults: TimetableDefaults) -> Self {
        Self { store, defaults }
    }
}

#[async_trait]
impl<S: BackendStore> EdgeFunction for SmartTimetable<S> {
    const NAME: &'static str = "smart-timetable";
    type Request = SmartTimetableRequest;
    type Response = SmartTimetableResponse;

    async fn handle(&self, request: SmartTimetableRequest) -> Result<SmartTimetableResponse> {
        let user_id = validate_required_field("userId", &request.user_id)
            .map_err(CatalystError::into_input)?
            .clone();
        let timetable = request.timetable;

        let plan = timetable::generate(&timetable, &self.defaults)?;
        let schedule = plan.schedule_value()?;
        let today = Utc::now().date_naive();

        tracing::info!(
            "📅 Generated {} slots ({} study minutes) for user {}",
            plan.slots.len(),
            plan.study_minutes,
            user_id
        );

        let row = TimetableRow {
            user_id: user_id.clone(),
            title: format!(
                "{} Plan - {}",
                timetable.plan_type.title_prefix(),
                today.format("%-m/%-d/%Y")
            ),
            plan_type: timetable.plan_type,
            subjects: timetable.subjects.clone(),
            activities: timetable.activities.clone(),
            duration_type: timetable.duration_type,
            total_hours: timetable.total_hours,
            schedule: schedule.clone(),
            preferences: timetable.preferences.clone(),
        };
        let stored = self
            .store
            .insert(TIMETABLES_TABLE, serde_json::to_value(&row)?)
            .await?;
        let timetable_id = stored
            .get("id")
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| CatalystError::BackendError {
                status: 200,
                message: "Stored timetable has no id".to_string(),
            })?;

        let progress = build_progress_rows(&plan, &user_id, &timetable_id, today)
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let seeded = self.store.insert_many(PROGRESS_TABLE, progress).await?;
        tracing::debug!("Seeded {} progress rows for timetable {}", seeded, timetable_id);

        Ok(SmartTimetableResponse {
            success: true,
            message: plan.summary_message(timetable.total_hours),
            timetable: CreatedTimetable {
                id: timetable_id,
                schedule,
                plan_type: timetable.plan_type,
                total_hours: timetable.total_hours,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_creates_timetable_and_progress_rows() {
        let store = MemoryStore::new();
        let function = SmartTimetable::new(store.clone(), TimetableDefaults::default());

        let body = json!({
            "userId": "student-1",
            "subjects": [
                {"name": "Math", "priority": 5},
                {"name": "Physics", "priority": 3}
            ],
            "totalHours": 4,
            "type": "academic_only",
            "preferences": {"studySessionLength": 90, "breakDuration": 15, "startTime": "09:00"}
        });
        let response = function.invoke(body.to_string().as_bytes()).await.unwrap();

        assert_eq!(response["success"], true);
        assert_eq!(response["timetable"]["type"], "academic_only");
        assert_eq!(response["timetable"]["totalHours"], 4.0);
        assert_eq!(response["timetable"]["schedule"]["09:00"]["title"], "Math - Session 1");
        assert_eq!(
            response["message"],
            "Created focused academic schedule with 4 hours of study time."
        );

        let timetables = store.rows(TIMETABLES_TABLE).await;
        assert_eq!(timetables.len(), 1);
        assert_eq!(timetables[0]["user_id"], "student-1");
        assert!(timetables[0]["title"]
            .as_str()
            .unwrap()
            .starts_with("Academic Focus Plan - "));

        let progress = store.rows(PROGRESS_TABLE).await;
        let slots = response["timetable"]["schedule"].as_object().unwrap().len();
        assert_eq!(progress.len(), slots);
        assert_eq!(progress[0]["timetable_id"], timetables[0]["id"]);
    }

    #[tokio::test]
    async fn test_missing_user_is_rejected() {
        let function = SmartTimetable::new(MemoryStore::new(), TimetableDefaults::default());
        let body = json!({"subjects": [{"name": "Math", "priority": 5}], "totalHours": 2});

        let err = function.invoke(body.to_string().as_bytes()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required field: userId"
        );
    }

    #[tokio::test]
    async fn test_invalid_plan_writes_nothing() {
        let store = MemoryStore::new();
        let function = SmartTimetable::new(store.clone(), TimetableDefaults::default());
        let body = json!({"userId": "u1", "subjects": [], "totalHours": 2});

        assert!(function.invoke(body.to_string().as_bytes()).await.is_err());
        assert!(store.rows(TIMETABLES_TABLE).await.is_empty());
    }
}
