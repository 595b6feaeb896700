//! Core data models for the goal planner

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::provider::{ProviderKind, DEFAULT_MODEL};

//
// ================= Goal Request =================
//

/// One planning request against a chat-completion provider.
///
/// `goal` must be non-empty (caller-enforced); `endpoint` and `api_key` are
/// validated before dispatch.
#[derive(Debug, Clone)]
pub struct GoalRequest {
    pub goal: String,
    pub provider: ProviderKind,
    /// Caller-supplied base URL. Only consulted for [`ProviderKind::Custom`];
    /// built-in providers route to fixed endpoints.
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

impl GoalRequest {
    pub fn new(
        goal: impl Into<String>,
        provider: ProviderKind,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            goal: goal.into(),
            provider,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

//
// ================= Parsed Response =================
//

/// One task item exactly as parsed from the provider's reply content.
///
/// Either the offset pair or `duration_hours` is expected to be meaningful;
/// an item carrying neither, both, or a malformed pair is degraded by the
/// synthesizer rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawPlannedItem {
    pub task_name: String,
    /// Days relative to today (0 = today). 32-bit on the wire; values that
    /// do not fit are a parse error, not a silent coercion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_offset_days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_offset_days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<i32>,
}

/// Container shape the system prompt instructs the provider to reply with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTaskList {
    pub tasks: Vec<RawPlannedItem>,
}

//
// ================= Scheduled Task =================
//

/// A concrete calendar entry produced by schedule synthesis.
///
/// Invariant: `end_time >= start_time` (enforced by the synthesizer's
/// fallback rules). Created once per synthesis pass; ownership passes to the
/// caller, which may discard or persist it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledTask {
    pub id: String,
    pub name: String,
    /// Absolute epoch milliseconds.
    pub start_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub dependency_ids: Option<Vec<String>>,
    #[serde(default)]
    pub estimated_effort_hours: Option<f32>,
    #[serde(default)]
    pub actual_effort_hours: Option<f32>,
    #[serde(default)]
    pub completion_percentage: u8,
    #[serde(default)]
    pub is_milestone: bool,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl ScheduledTask {
    /// Create a task with a fresh id and all other fields at their defaults.
    pub fn new(name: impl Into<String>, start_time: i64, end_time: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            start_time,
            end_time,
            parent_id: None,
            dependency_ids: None,
            estimated_effort_hours: None,
            actual_effort_hours: None,
            completion_percentage: 0,
            is_milestone: false,
            priority: None,
        }
    }

    /// Span of the task in milliseconds.
    pub fn span_ms(&self) -> i64 {
        self.end_time - self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_list_round_trip() {
        let json = r#"{
            "tasks": [
                {"task_name": "Draft initial proposal", "duration_hours": 4},
                {"task_name": "Review feedback", "start_date_offset_days": 1, "end_date_offset_days": 2},
                {"task_name": "Final polish"}
            ]
        }"#;

        let parsed: PlannedTaskList = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.tasks.len(), 3);

        assert_eq!(parsed.tasks[0].task_name, "Draft initial proposal");
        assert_eq!(parsed.tasks[0].duration_hours, Some(4));
        assert_eq!(parsed.tasks[0].start_date_offset_days, None);

        assert_eq!(parsed.tasks[1].start_date_offset_days, Some(1));
        assert_eq!(parsed.tasks[1].end_date_offset_days, Some(2));
        assert_eq!(parsed.tasks[1].duration_hours, None);

        assert_eq!(parsed.tasks[2].task_name, "Final polish");
        assert_eq!(parsed.tasks[2].duration_hours, None);

        // Field values survive a serialize/deserialize cycle untouched.
        let encoded = serde_json::to_string(&parsed).unwrap();
        let reparsed: PlannedTaskList = serde_json::from_str(&encoded).unwrap();
        assert_eq!(reparsed.tasks, parsed.tasks);
    }

    #[test]
    fn test_missing_task_name_is_rejected() {
        let json = r#"{"tasks": [{"duration_hours": 2}]}"#;
        assert!(serde_json::from_str::<PlannedTaskList>(json).is_err());
    }

    #[test]
    fn test_out_of_range_int_fields_are_rejected() {
        // Offsets and durations are 32-bit; anything wider must fail the
        // parse instead of being truncated.
        let json = r#"{"tasks": [{"task_name": "x", "duration_hours": 99999999999999}]}"#;
        assert!(serde_json::from_str::<PlannedTaskList>(json).is_err());

        let json = r#"{"tasks": [{"task_name": "x", "start_date_offset_days": 9999999999, "end_date_offset_days": 0}]}"#;
        assert!(serde_json::from_str::<PlannedTaskList>(json).is_err());
    }

    #[test]
    fn test_scheduled_task_defaults() {
        let task = ScheduledTask::new("Write report", 1_000, 2_000);
        assert_eq!(task.span_ms(), 1_000);
        assert_eq!(task.completion_percentage, 0);
        assert!(!task.is_milestone);
        assert!(task.parent_id.is_none());
        assert!(task.dependency_ids.is_none());
        assert!(!task.id.is_empty());

        let other = ScheduledTask::new("Write report", 1_000, 2_000);
        assert_ne!(task.id, other.id);
    }
}
