//! Planning service - ties the pieces together
//!
//! GOAL → RESOLVE PROVIDER → PLAN REQUEST → PARSE → SYNTHESIZE → SCHEDULE
//!
//! Each call is processed independently and to completion; no state is shared
//! between calls and nothing is persisted here. Ownership of the produced
//! schedule passes to the caller.

use crate::error::PlanningError;
use crate::models::{GoalRequest, ScheduledTask};
use crate::planner::TaskPlanner;
use crate::provider::ProviderKind;
use crate::schedule::{synthesize, today_zero, SchedulePolicy};
use crate::settings::SettingsStore;
use crate::Result;
use std::sync::Arc;
use tracing::info;

pub struct PlanningService {
    settings: Arc<dyn SettingsStore>,
    planner: Arc<dyn TaskPlanner>,
    policy: SchedulePolicy,
}

impl PlanningService {
    pub fn new(settings: Arc<dyn SettingsStore>, planner: Arc<dyn TaskPlanner>) -> Self {
        Self {
            settings,
            planner,
            policy: SchedulePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SchedulePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Decompose a goal into a schedule anchored at today's local midnight.
    ///
    /// Fails fast on configuration problems before any network activity;
    /// synthesis only runs after a complete, successfully parsed response, so
    /// no partial schedule is ever observed.
    pub async fn plan_goal(&self, goal: &str) -> Result<Vec<ScheduledTask>> {
        let request = self.build_request(goal).await?;

        info!(goal = %request.goal, provider = request.provider.name(), "Planning goal");
        let items = self.planner.plan(&request).await?;

        let schedule = synthesize(&items, today_zero(), self.policy);
        info!(tasks = schedule.len(), "Synthesized schedule");
        Ok(schedule)
    }

    /// Resolve the selected provider's validated config into a request.
    async fn build_request(&self, goal: &str) -> Result<GoalRequest> {
        if goal.trim().is_empty() {
            return Err(PlanningError::Configuration(
                "Goal description is empty".to_string(),
            ));
        }

        let selected = self
            .settings
            .get_selected()
            .await?
            .ok_or_else(|| PlanningError::Configuration("No AI provider selected".to_string()))?;

        let config = self.settings.get(&selected).await?.ok_or_else(|| {
            PlanningError::Configuration(format!("No configuration stored for provider '{selected}'"))
        })?;

        let provider = ProviderKind::from_name(&config.name).ok_or_else(|| {
            PlanningError::Configuration(format!("Unrecognized AI provider '{}'", config.name))
        })?;

        if config.api_key.trim().is_empty() || config.api_url.trim().is_empty() {
            return Err(PlanningError::Configuration(format!(
                "Provider '{selected}' configuration is incomplete (API key or URL missing)"
            )));
        }

        Ok(GoalRequest::new(goal, provider, config.api_url, config.api_key))
    }
}
