//! Planner trait and implementations
//!
//! A planner turns a goal request into the ordered task items the provider
//! proposed. Schedule synthesis happens afterwards, in [`crate::schedule`].

use crate::models::{GoalRequest, RawPlannedItem};
use crate::Result;
use async_trait::async_trait;

pub mod chat;
pub use chat::ChatCompletionPlanner;

/// Trait for goal decomposition (LLM controlled)
#[async_trait]
pub trait TaskPlanner: Send + Sync {
    /// Produce the task items for a goal, in exactly the order the provider
    /// returned them.
    async fn plan(&self, request: &GoalRequest) -> Result<Vec<RawPlannedItem>>;
}

/// Mock planner for development & testing
/// Keeps the system functional without a live provider
pub struct MockPlanner;

#[async_trait]
impl TaskPlanner for MockPlanner {
    async fn plan(&self, request: &GoalRequest) -> Result<Vec<RawPlannedItem>> {
        Ok(vec![
            RawPlannedItem {
                task_name: format!("Research: {}", request.goal),
                start_date_offset_days: Some(0),
                end_date_offset_days: Some(0),
                duration_hours: None,
            },
            RawPlannedItem {
                task_name: "Draft initial proposal".to_string(),
                start_date_offset_days: None,
                end_date_offset_days: None,
                duration_hours: Some(4),
            },
            RawPlannedItem {
                task_name: "Review feedback".to_string(),
                start_date_offset_days: None,
                end_date_offset_days: None,
                duration_hours: Some(2),
            },
        ])
    }
}
