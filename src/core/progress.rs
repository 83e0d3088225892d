//! Study progress rows and the statistics derived from them.

use crate::core::timetable::slot_key;
use crate::domain::model::{ProgressTask, SlotKind, TimetablePlan};
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Hours credited for each completed study task.
pub const HOURS_PER_STUDY_TASK: f64 = 1.5;
/// How far back the streak looks.
pub const STREAK_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub study_hours: f64,
    pub streak: u32,
}

impl ProgressStats {
    pub fn completion_percent(&self) -> u32 {
        if self.total_tasks == 0 {
            return 0;
        }
        ((self.completed_tasks as f64 / self.total_tasks as f64) * 100.0).round() as u32
    }
}

/// One tracking row per slot, scheduled at the slot's start on `plan_date`.
pub fn build_progress_rows(
    plan: &TimetablePlan,
    user_id: &str,
    timetable_id: &str,
    plan_date: NaiveDate,
) -> Vec<ProgressTask> {
    let midnight = plan_date.and_time(NaiveTime::MIN).and_utc();

    plan.slots
        .iter()
        .enumerate()
        .map(|(index, slot)| ProgressTask {
            id: None,
            user_id: user_id.to_string(),
            timetable_id: timetable_id.to_string(),
            task_id: format!("{}_{}", slot_key(slot.start_minute), index),
            task_title: slot.title.clone(),
            task_type: slot.kind.as_str().to_string(),
            scheduled_time: midnight + Duration::minutes(i64::from(slot.start_minute)),
            completed: false,
            completed_at: None,
            notes: None,
        })
        .collect()
}

pub fn compute_stats(tasks: &[ProgressTask], today: NaiveDate) -> ProgressStats {
    let completed_tasks = tasks.iter().filter(|task| task.completed).count();
    let completed_study = tasks
        .iter()
        .filter(|task| task.completed && task.task_type == SlotKind::Study.as_str())
        .count();

    ProgressStats {
        total_tasks: tasks.len(),
        completed_tasks,
        study_hours: completed_study as f64 * HOURS_PER_STUDY_TASK,
        streak: streak(tasks, today),
    }
}

/// Consecutive days with a completed task, walking back from `today`.
/// Empty days before the first completed one are skipped; the first empty
/// day after it ends the streak.
pub fn streak(tasks: &[ProgressTask], today: NaiveDate) -> u32 {
    let completed_days: HashSet<NaiveDate> = tasks
        .iter()
        .filter(|task| task.completed)
        .map(|task| day_of(&task.scheduled_time))
        .collect();

    let mut streak = 0;
    let window = (0..STREAK_WINDOW_DAYS)
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))));
    for day in window {
        if completed_days.contains(&day) {
            streak += 1;
        } else if streak > 0 {
            break;
        }
    }
    streak
}

fn day_of(time: &DateTime<Utc>) -> NaiveDate {
    time.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PlanType, ScheduleSlot};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(day: NaiveDate, kind: &str, completed: bool) -> ProgressTask {
        ProgressTask {
            id: None,
            user_id: "u1".to_string(),
            timetable_id: "t1".to_string(),
            task_id: "09:00_0".to_string(),
            task_title: "Math".to_string(),
            task_type: kind.to_string(),
            scheduled_time: day.and_hms_opt(9, 0, 0).unwrap().and_utc(),
            completed,
            completed_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_stats_counts_and_hours() {
        let today = date(2024, 3, 10);
        let tasks = vec![
            task(today, "study", true),
            task(today, "study", true),
            task(today, "break", true),
            task(today, "study", false),
        ];
        let stats = compute_stats(&tasks, today);
        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.completed_tasks, 3);
        assert_eq!(stats.study_hours, 3.0);
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.completion_percent(), 75);
    }

    #[test]
    fn test_streak_skips_leading_empty_days() {
        let today = date(2024, 3, 10);
        let tasks = vec![
            task(date(2024, 3, 8), "study", true),
            task(date(2024, 3, 7), "study", true),
            task(date(2024, 3, 6), "study", true),
            // gap on the 5th ends the streak
            task(date(2024, 3, 4), "study", true),
        ];
        assert_eq!(streak(&tasks, today), 3);
    }

    #[test]
    fn test_streak_ignores_incomplete_and_old_tasks() {
        let today = date(2024, 3, 10);
        let tasks = vec![
            task(today, "study", false),
            task(date(2024, 1, 1), "study", true),
        ];
        assert_eq!(streak(&tasks, today), 0);
        assert_eq!(compute_stats(&[], today).completion_percent(), 0);
    }

    #[test]
    fn test_rows_follow_slot_times() {
        let plan = TimetablePlan {
            plan_type: PlanType::AcademicOnly,
            slots: vec![
                ScheduleSlot {
                    start_minute: 9 * 60,
                    title: "Math - Session 1".to_string(),
                    duration: 90,
                    kind: SlotKind::Study,
                    priority: Some(5),
                    exam_date: None,
                    frequency: None,
                },
                ScheduleSlot {
                    start_minute: 24 * 60 + 30,
                    title: "Break".to_string(),
                    duration: 15,
                    kind: SlotKind::Break,
                    priority: None,
                    exam_date: None,
                    frequency: None,
                },
            ],
            study_minutes: 90,
            end_minute: 24 * 60 + 45,
            overruns_end_time: false,
        };

        let rows = build_progress_rows(&plan, "u1", "t1", date(2024, 3, 10));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].task_id, "09:00_0");
        assert_eq!(rows[0].task_type, "study");
        assert_eq!(
            rows[0].scheduled_time,
            date(2024, 3, 10).and_hms_opt(9, 0, 0).unwrap().and_utc()
        );
        assert_eq!(rows[1].task_id, "Day 2 00:30_1");
        assert_eq!(
            rows[1].scheduled_time,
            date(2024, 3, 11).and_hms_opt(0, 30, 0).unwrap().and_utc()
        );
        assert!(!rows[1].completed);
    }
}
