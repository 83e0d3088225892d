use super::smart_timetable::PROGRESS_TABLE;
use crate::core::progress::{compute_stats, ProgressStats};
use crate::domain::model::ProgressTask;
use crate::domain::ports::{BackendStore, RowQuery, SortOrder};
use crate::utils::error::{CatalystError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub success: bool,
    pub stats: ProgressStats,
    pub completion_percent: u32,
    pub tasks: Vec<ProgressTask>,
}

/// Reads a timetable's progress rows and summarises them.
pub struct ProgressReport<S: BackendStore> {
    store: S,
}

impl<S: BackendStore> ProgressReport<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn summary(
        &self,
        user_id: &str,
        timetable_id: &str,
        today: NaiveDate,
    ) -> Result<ProgressSummary> {
        if user_id.trim().is_empty() || timetable_id.trim().is_empty() {
            return Err(CatalystError::validation("userId and timetableId are required"));
        }

        let query = RowQuery::table(PROGRESS_TABLE)
            .eq("user_id", user_id)
            .eq("timetable_id", timetable_id)
            .order_by("scheduled_time", SortOrder::Ascending);
        let tasks = self
            .store
            .select(&query)
            .await?
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<ProgressTask>, _>>()?;

        let stats = compute_stats(&tasks, today);
        tracing::debug!(
            "Progress for {}: {}/{} tasks, streak {}",
            timetable_id,
            stats.completed_tasks,
            stats.total_tasks,
            stats.streak
        );

        Ok(ProgressSummary {
            success: true,
            completion_percent: stats.completion_percent(),
            stats,
            tasks,
        })
    }

    /// Flips a task's completion. Completing stamps `completed_at` with
    /// `now`; un-completing clears it.
    pub async fn toggle(
        &self,
        user_id: &str,
        task_row_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ProgressTask> {
        if user_id.trim().is_empty() || task_row_id.trim().is_empty() {
            return Err(CatalystError::validation("userId and taskId are required"));
        }

        let query = RowQuery::table(PROGRESS_TABLE)
            .eq("id", task_row_id)
            .eq("user_id", user_id);
        let current = self
            .store
            .select(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(task_row_id))?;
        let completed = !current
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let patch = json!({
            "completed": completed,
            "completed_at": completed.then(|| now.to_rfc3339()),
        });
        let row = self
            .store
            .update(&query, patch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(task_row_id))?;

        tracing::info!(
            "✅ Task {} marked {}",
            task_row_id,
            if completed { "complete" } else { "incomplete" }
        );
        Ok(serde_json::from_value(row)?)
    }
}

fn not_found(task_row_id: &str) -> CatalystError {
    CatalystError::NotFoundError {
        resource: format!("progress task {}", task_row_id),
    }
}
