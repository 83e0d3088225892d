//! Timetable allocation.
//!
//! A single ordered pass: the study budget is split across subjects in
//! proportion to priority, each allocation is cut into sessions no longer
//! than the configured session length, and breaks are laid between them.
//! Balanced plans study for 70% of the total hours, rounded to whole hours.

use crate::domain::model::{
    Activity, DurationType, PlanType, Preferences, ScheduleSlot, SlotKind, Subject,
    TimetableDefaults, TimetablePlan, TimetableRequest,
};
use crate::utils::error::{CatalystError, Result};
use crate::utils::validation::{
    parse_clock_time, validate_non_empty_string, validate_range, Validate,
};
use chrono::NaiveTime;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Write;

pub const MIN_PRIORITY: u32 = 1;
pub const MAX_PRIORITY: u32 = 5;
/// One week.
pub const MAX_TOTAL_HOURS: f64 = 168.0;
const MINUTES_PER_DAY: u32 = 24 * 60;
const BALANCED_STUDY_SHARE: f64 = 0.7;

/// Splits `budget` minutes across `subjects` in proportion to their priority,
/// rounding each share to the nearest minute.
pub fn allocate_minutes(subjects: &[Subject], budget: u32) -> Result<Vec<u32>> {
    let total_priority: u64 = subjects.iter().map(|s| u64::from(s.priority)).sum();
    if total_priority == 0 {
        return Err(CatalystError::validation(
            "Subjects must have a positive total priority",
        ));
    }

    let budget = u64::from(budget);
    Ok(subjects
        .iter()
        .map(|subject| {
            let weighted = u64::from(subject.priority) * budget;
            ((2 * weighted + total_priority) / (2 * total_priority)) as u32
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Settings {
    break_minutes: u32,
    session_minutes: u32,
    start_minute: u32,
    end_minute: Option<u32>,
}

impl Settings {
    fn resolve(preferences: &Preferences, defaults: &TimetableDefaults) -> Result<Self> {
        let break_minutes = preferences.break_duration.unwrap_or(defaults.break_minutes);
        let session_minutes = preferences
            .study_session_length
            .unwrap_or(defaults.session_minutes);
        validate_range("preferences.breakDuration", break_minutes, 0, 120)?;
        validate_range("preferences.studySessionLength", session_minutes, 1, 600)?;

        let start_minute = parse_clock_time(
            "preferences.startTime",
            preferences
                .start_time
                .as_deref()
                .unwrap_or(&defaults.start_time),
        )?;
        let end_minute = preferences
            .end_time
            .as_deref()
            .map(|end| parse_clock_time("preferences.endTime", end))
            .transpose()?
            // an end at or before the start means "tomorrow"
            .map(|end| if end <= start_minute { end + MINUTES_PER_DAY } else { end });

        Ok(Self {
            break_minutes,
            session_minutes,
            start_minute,
            end_minute,
        })
    }
}

impl Validate for TimetableRequest {
    fn validate(&self) -> Result<()> {
        if self.subjects.is_empty() {
            return Err(CatalystError::validation("At least one subject is required"));
        }
        for subject in &self.subjects {
            validate_non_empty_string("subjects.name", &subject.name)?;
            validate_range("subjects.priority", subject.priority, MIN_PRIORITY, MAX_PRIORITY)?;
        }
        if !self.total_hours.is_finite() || self.total_hours <= 0.0 {
            return Err(CatalystError::validation("totalHours must be greater than zero"));
        }
        validate_range("totalHours", self.total_hours, 0.0, MAX_TOTAL_HOURS)?;
        for activity in &self.activities {
            validate_non_empty_string("activities.name", &activity.name)?;
            validate_range("activities.duration", activity.duration, 1, MINUTES_PER_DAY)?;
        }
        Ok(())
    }
}

struct ScheduleBuilder {
    cursor: u32,
    slots: Vec<ScheduleSlot>,
}

impl ScheduleBuilder {
    fn new(start_minute: u32) -> Self {
        Self {
            cursor: start_minute,
            slots: Vec::new(),
        }
    }

    fn push(&mut self, slot: ScheduleSlot) {
        self.cursor += slot.duration;
        self.slots.push(slot);
    }

    fn push_break(&mut self, minutes: u32) {
        if minutes == 0 {
            return;
        }
        self.push(ScheduleSlot {
            start_minute: self.cursor,
            title: "Break".to_string(),
            duration: minutes,
            kind: SlotKind::Break,
            priority: None,
            exam_date: None,
            frequency: None,
        });
    }

    /// Lays `minutes` of study for `subject` as sessions of at most
    /// `settings.session_minutes`, with a break after each full-length
    /// session that has more work behind it.
    fn push_sessions(
        &mut self,
        subject: &Subject,
        minutes: u32,
        settings: &Settings,
        plain_single_title: bool,
    ) {
        let session_count = minutes.div_ceil(settings.session_minutes);
        let mut remaining = minutes;
        let mut session = 1;

        while remaining > 0 {
            let duration = remaining.min(settings.session_minutes);
            let title = if plain_single_title && session_count == 1 {
                subject.name.clone()
            } else {
                format!("{} - Session {}", subject.name, session)
            };

            self.push(ScheduleSlot {
                start_minute: self.cursor,
                title,
                duration,
                kind: SlotKind::Study,
                priority: Some(subject.priority),
                exam_date: subject.exam_date.clone(),
                frequency: None,
            });

            remaining -= duration;
            session += 1;

            if remaining > 0 && duration == settings.session_minutes {
                self.push_break(settings.break_minutes);
            }
        }
    }

    fn push_activity(&mut self, activity: &Activity) {
        self.push(ScheduleSlot {
            start_minute: self.cursor,
            title: activity.name.clone(),
            duration: activity.duration,
            kind: SlotKind::Activity,
            priority: None,
            exam_date: None,
            frequency: Some(activity.frequency.clone()),
        });
    }
}

pub fn generate(request: &TimetableRequest, defaults: &TimetableDefaults) -> Result<TimetablePlan> {
    request.validate().map_err(CatalystError::into_input)?;
    let settings =
        Settings::resolve(&request.preferences, defaults).map_err(CatalystError::into_input)?;
    let total_minutes = (request.total_hours * 60.0).round() as u32;

    let mut builder = ScheduleBuilder::new(settings.start_minute);
    let study_minutes = match request.plan_type {
        PlanType::AcademicOnly => {
            let allocations = allocate_minutes(&request.subjects, total_minutes)?;
            for (subject, minutes) in request.subjects.iter().zip(&allocations) {
                builder.push_sessions(subject, *minutes, &settings, false);
            }
            allocations.iter().sum()
        }
        PlanType::Balanced => {
            // whole study hours, the rest of the day is left for activities
            let budget = (request.total_hours * BALANCED_STUDY_SHARE).round() as u32 * 60;
            if budget == 0 {
                return Err(CatalystError::validation(
                    "totalHours is too small for a balanced plan (needs at least one study hour)",
                ));
            }
            let allocations = allocate_minutes(&request.subjects, budget)?;
            let last = request.subjects.len() - 1;
            for (index, (subject, minutes)) in
                request.subjects.iter().zip(&allocations).enumerate()
            {
                builder.push_sessions(subject, *minutes, &settings, true);
                if index < last {
                    builder.push_break(settings.break_minutes);
                }
            }
            for activity in &request.activities {
                builder.push_activity(activity);
            }
            allocations.iter().sum()
        }
    };

    let end_minute = builder.cursor;
    let overruns_end_time = request.duration_type == DurationType::Day
        && settings.end_minute.is_some_and(|end| end_minute > end);
    if overruns_end_time {
        tracing::debug!(
            "Plan ends at {} which is past the requested end time",
            format_clock(end_minute)
        );
    }

    Ok(TimetablePlan {
        plan_type: request.plan_type,
        slots: builder.slots,
        study_minutes,
        end_minute,
        overruns_end_time,
    })
}

/// `HH:MM` on a 24h clock.
pub fn format_clock(minute: u32) -> String {
    NaiveTime::from_num_seconds_from_midnight_opt(minute % MINUTES_PER_DAY * 60, 0)
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Schedule key of a slot: `HH:MM` on the first day, `Day N HH:MM` after it.
pub fn slot_key(start_minute: u32) -> String {
    let day = start_minute / MINUTES_PER_DAY;
    if day == 0 {
        format_clock(start_minute)
    } else {
        format!("Day {} {}", day + 1, format_clock(start_minute))
    }
}

/// Time-keyed view of a plan, serialized in schedule order.
pub struct Schedule<'a>(&'a [ScheduleSlot]);

impl Serialize for Schedule<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for slot in self.0 {
            map.serialize_entry(&slot_key(slot.start_minute), slot)?;
        }
        map.end()
    }
}

impl TimetablePlan {
    pub fn schedule(&self) -> Schedule<'_> {
        Schedule(&self.slots)
    }

    pub fn schedule_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.schedule())?)
    }

    pub fn summary_message(&self, total_hours: f64) -> String {
        let mut message = match self.plan_type {
            PlanType::AcademicOnly => format!(
                "Created focused academic schedule with {} hours of study time.",
                total_hours
            ),
            PlanType::Balanced => format!(
                "Created balanced schedule with {} hours including activities and breaks.",
                total_hours
            ),
        };
        if self.overruns_end_time {
            message.push_str(&format!(
                " Note: the plan runs until {}, past your preferred end time.",
                format_clock(self.end_minute)
            ));
        }
        message
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["start", "title", "type", "duration", "priority", "exam_date", "frequency"])?;
        for slot in &self.slots {
            csv.write_record([
                slot_key(slot.start_minute),
                slot.title.clone(),
                slot.kind.as_str().to_string(),
                slot.duration.to_string(),
                slot.priority.map(|p| p.to_string()).unwrap_or_default(),
                slot.exam_date.clone().unwrap_or_default(),
                slot.frequency.clone().unwrap_or_default(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(name: &str, priority: u32) -> Subject {
        Subject {
            name: name.to_string(),
            priority,
            exam_date: None,
        }
    }

    fn request(subjects: Vec<Subject>, total_hours: f64, plan_type: PlanType) -> TimetableRequest {
        TimetableRequest {
            subjects,
            total_hours,
            plan_type,
            ..Default::default()
        }
    }

    fn studied(plan: &TimetablePlan, name: &str) -> u32 {
        plan.slots
            .iter()
            .filter(|s| s.kind == SlotKind::Study && s.title.starts_with(name))
            .map(|s| s.duration)
            .sum()
    }

    #[test]
    fn test_math_physics_example() {
        let req = request(
            vec![subject("Math", 3), subject("Physics", 1)],
            4.0,
            PlanType::AcademicOnly,
        );
        let plan = generate(&req, &TimetableDefaults::default()).unwrap();

        assert_eq!(studied(&plan, "Math"), 180);
        assert_eq!(studied(&plan, "Physics"), 60);

        let titles: Vec<(&str, u32)> = plan
            .slots
            .iter()
            .map(|s| (s.title.as_str(), s.duration))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("Math - Session 1", 90),
                ("Break", 15),
                ("Math - Session 2", 90),
                ("Physics - Session 1", 60),
            ]
        );

        let keys: Vec<String> = plan.slots.iter().map(|s| slot_key(s.start_minute)).collect();
        assert_eq!(keys, vec!["09:00", "10:30", "10:45", "12:15"]);
        assert_eq!(plan.study_minutes, 240);
    }

    #[test]
    fn test_allocation_sums_to_budget_within_rounding() {
        let cases = [
            vec![subject("A", 1), subject("B", 1), subject("C", 1)],
            vec![subject("A", 5), subject("B", 2), subject("C", 3), subject("D", 4)],
            vec![subject("A", 2), subject("B", 3)],
            vec![subject("A", 4)],
        ];
        for subjects in cases {
            for budget in [1u32, 59, 60, 100, 245, 600, 1337] {
                let total: u32 = allocate_minutes(&subjects, budget).unwrap().iter().sum();
                let drift = (i64::from(total) - i64::from(budget)).unsigned_abs();
                assert!(
                    drift <= subjects.len() as u64,
                    "budget {} allocated {} across {} subjects",
                    budget,
                    total,
                    subjects.len()
                );
            }
        }
    }

    #[test]
    fn test_allocation_is_monotonic_in_priority() {
        for budget in [90u32, 240, 479, 1000] {
            let mut previous = 0;
            for priority in MIN_PRIORITY..=MAX_PRIORITY {
                let subjects = vec![subject("X", priority), subject("Y", 3), subject("Z", 2)];
                let allocation = allocate_minutes(&subjects, budget).unwrap()[0];
                assert!(allocation >= previous);
                previous = allocation;
            }
        }
    }

    #[test]
    fn test_sessions_never_exceed_configured_length() {
        let mut req = request(
            vec![subject("Chemistry", 5), subject("History", 2), subject("Art", 1)],
            9.5,
            PlanType::AcademicOnly,
        );
        req.preferences.study_session_length = Some(45);
        req.preferences.break_duration = Some(10);

        let plan = generate(&req, &TimetableDefaults::default()).unwrap();
        for (index, slot) in plan.slots.iter().enumerate() {
            if slot.kind != SlotKind::Study {
                continue;
            }
            assert!(slot.duration <= 45);
            let next = plan.slots.get(index + 1);
            let same_subject_follows = next.is_some_and(|n| n.kind == SlotKind::Break);
            if slot.duration == 45 && same_subject_follows {
                assert_eq!(next.unwrap().duration, 10);
            }
        }
        // every break sits between two sessions of the same subject
        for window in plan.slots.windows(3) {
            if window[1].kind == SlotKind::Break {
                let before = window[0].title.split(" - ").next();
                let after = window[2].title.split(" - ").next();
                assert_eq!(before, after);
                assert_eq!(window[0].duration, 45);
            }
        }
    }

    #[test]
    fn test_zero_priority_is_rejected() {
        let err = allocate_minutes(&[], 240).unwrap_err();
        assert!(matches!(err, CatalystError::ValidationError { .. }));

        let req = request(vec![subject("Math", 0)], 2.0, PlanType::AcademicOnly);
        assert!(generate(&req, &TimetableDefaults::default()).is_err());
    }

    #[test]
    fn test_missing_subjects_or_hours_are_rejected() {
        let defaults = TimetableDefaults::default();
        assert!(generate(&request(vec![], 2.0, PlanType::Balanced), &defaults).is_err());
        assert!(generate(
            &request(vec![subject("Math", 2)], 0.0, PlanType::Balanced),
            &defaults
        )
        .is_err());
        assert!(generate(
            &request(vec![subject("Math", 6)], 2.0, PlanType::Balanced),
            &defaults
        )
        .is_err());
    }

    #[test]
    fn test_balanced_plan_layout() {
        let mut req = request(
            vec![subject("Biology", 2), subject("English", 2)],
            5.0,
            PlanType::Balanced,
        );
        req.activities = vec![Activity {
            name: "Football".to_string(),
            duration: 60,
            frequency: "daily".to_string(),
        }];

        let plan = generate(&req, &TimetableDefaults::default()).unwrap();
        // round(5h * 0.7) = 4 study hours
        assert_eq!(plan.study_minutes, 240);

        let layout: Vec<(&str, SlotKind, u32)> = plan
            .slots
            .iter()
            .map(|s| (s.title.as_str(), s.kind, s.duration))
            .collect();
        assert_eq!(
            layout,
            vec![
                ("Biology - Session 1", SlotKind::Study, 90),
                ("Break", SlotKind::Break, 15),
                ("Biology - Session 2", SlotKind::Study, 30),
                ("Break", SlotKind::Break, 15),
                ("English - Session 1", SlotKind::Study, 90),
                ("Break", SlotKind::Break, 15),
                ("English - Session 2", SlotKind::Study, 30),
                ("Football", SlotKind::Activity, 60),
            ]
        );
        assert_eq!(plan.slots.last().unwrap().frequency.as_deref(), Some("daily"));
    }

    #[test]
    fn test_balanced_single_session_keeps_plain_title() {
        let req = request(vec![subject("Maths", 1)], 1.0, PlanType::Balanced);
        let plan = generate(&req, &TimetableDefaults::default()).unwrap();
        assert_eq!(plan.slots.len(), 1);
        assert_eq!(plan.slots[0].title, "Maths");
        assert_eq!(plan.slots[0].duration, 60);
    }

    #[test]
    fn test_balanced_budget_is_whole_study_hours() {
        let defaults = TimetableDefaults::default();
        let req = request(
            vec![subject("Math", 1), subject("Physics", 1)],
            5.0,
            PlanType::Balanced,
        );
        let plan = generate(&req, &defaults).unwrap();
        assert_eq!(plan.study_minutes, 240);
        assert_eq!(studied(&plan, "Math"), 120);
        assert_eq!(studied(&plan, "Physics"), 120);

        // 3h * 0.7 = 2.1 -> 2 hours
        let req = request(vec![subject("Math", 1)], 3.0, PlanType::Balanced);
        assert_eq!(generate(&req, &defaults).unwrap().study_minutes, 120);

        // 0.5h * 0.7 rounds to no study at all
        let req = request(vec![subject("Math", 1)], 0.5, PlanType::Balanced);
        let err = generate(&req, &defaults).unwrap_err();
        assert!(matches!(err, CatalystError::ValidationError { .. }));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(545), "09:05");
        assert_eq!(format_clock(1439), "23:59");
        assert_eq!(format_clock(MINUTES_PER_DAY + 90), "01:30");
        assert_eq!(slot_key(MINUTES_PER_DAY * 2 + 600), "Day 3 10:00");
    }

    #[test]
    fn test_end_time_overrun_is_reported() {
        let mut req = request(vec![subject("Math", 3)], 4.0, PlanType::AcademicOnly);
        req.preferences.start_time = Some("18:00".to_string());
        req.preferences.end_time = Some("21:00".to_string());

        let plan = generate(&req, &TimetableDefaults::default()).unwrap();
        assert!(plan.overruns_end_time);
        assert!(plan.summary_message(4.0).contains("past your preferred end time"));

        req.preferences.end_time = Some("23:30".to_string());
        let plan = generate(&req, &TimetableDefaults::default()).unwrap();
        assert!(!plan.overruns_end_time);
        assert_eq!(
            plan.summary_message(4.0),
            "Created focused academic schedule with 4 hours of study time."
        );
    }

    #[test]
    fn test_schedule_keys_do_not_collide_past_midnight() {
        let mut req = request(vec![subject("Revision", 1)], 30.0, PlanType::AcademicOnly);
        req.duration_type = DurationType::Week;
        req.preferences.break_duration = Some(0);

        let plan = generate(&req, &TimetableDefaults::default()).unwrap();
        let value = plan.schedule_value().unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), plan.slots.len());
        assert!(map.keys().any(|k| k.starts_with("Day 2 ")));
        assert_eq!(map["09:00"]["title"], "Revision - Session 1");
        assert_eq!(map["09:00"]["type"], "study");
    }

    #[test]
    fn test_invalid_start_time_is_rejected() {
        let mut req = request(vec![subject("Math", 3)], 2.0, PlanType::AcademicOnly);
        req.preferences.start_time = Some("25:00".to_string());
        assert!(generate(&req, &TimetableDefaults::default()).is_err());
    }

    #[test]
    fn test_write_csv() {
        let req = request(
            vec![subject("Math", 3), subject("Physics", 1)],
            4.0,
            PlanType::AcademicOnly,
        );
        let plan = generate(&req, &TimetableDefaults::default()).unwrap();

        let mut out = Vec::new();
        plan.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "start,title,type,duration,priority,exam_date,frequency");
        assert_eq!(lines[1], "09:00,Math - Session 1,study,90,3,,");
        assert_eq!(lines[2], "10:30,Break,break,15,,,");
        assert_eq!(lines.len(), 5);
    }
}
