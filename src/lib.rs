//! AI Goal Planner
//!
//! Decomposes a free-text goal into concrete, non-overlapping-by-construction
//! calendar entries:
//! - resolves the selected chat-completion provider from a settings store
//! - issues exactly one planning request and parses the structured task list
//! - synthesizes schedule entries anchored at local midnight ("today-zero")
//!
//! PIPELINE:
//! GOAL → RESOLVE PROVIDER → PLAN REQUEST → PARSE → SYNTHESIZE → SCHEDULE

pub mod error;
pub mod models;
pub mod planner;
pub mod provider;
pub mod schedule;
pub mod service;
pub mod settings;

pub use error::{PlanningError, Result};

// Re-export common types
pub use models::{GoalRequest, PlannedTaskList, RawPlannedItem, ScheduledTask};
pub use provider::{ProviderConfig, ProviderKind};
pub use schedule::{synthesize, today_zero, SchedulePolicy};
pub use service::PlanningService;
