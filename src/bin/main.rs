use goal_planner::{
    planner::{ChatCompletionPlanner, MockPlanner, TaskPlanner},
    provider::ProviderConfig,
    settings::{initialize_defaults, InMemorySettingsStore, SettingsStore},
    PlanningService,
};
use chrono::{Local, TimeZone};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("AI Goal Planner starting");

    let goal = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let goal = if goal.is_empty() {
        "Plan and launch a personal blog".to_string()
    } else {
        goal
    };

    let store = Arc::new(InMemorySettingsStore::new());
    initialize_defaults(store.as_ref()).await?;

    // With PLANNER_API_KEY set, the request goes to a live provider;
    // otherwise the mock planner keeps the demo self-contained.
    let planner: Arc<dyn TaskPlanner> = match std::env::var("PLANNER_API_KEY") {
        Ok(api_key) => {
            let name = std::env::var("PLANNER_PROVIDER").unwrap_or_else(|_| "OpenAI".to_string());
            let api_url = std::env::var("PLANNER_API_URL").unwrap_or_else(|_| "https://api.openai.com/".to_string());
            store.put(ProviderConfig::new(name.clone(), api_url, api_key)).await?;
            store.set_selected(&name).await?;
            info!(provider = %name, "Using live chat-completion planner");
            Arc::new(ChatCompletionPlanner::new())
        }
        Err(_) => {
            store
                .put(ProviderConfig::new("OpenAI", "https://api.openai.com/", "offline"))
                .await?;
            store.set_selected("OpenAI").await?;
            info!("PLANNER_API_KEY not set, using mock planner");
            Arc::new(MockPlanner)
        }
    };

    let service = PlanningService::new(store, planner);

    match service.plan_goal(&goal).await {
        Ok(schedule) => {
            println!("\n=== PLANNED SCHEDULE ===");
            println!("Goal: {goal}\n");
            let fmt = |ms: i64| {
                Local
                    .timestamp_millis_opt(ms)
                    .earliest()
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| ms.to_string())
            };
            for task in &schedule {
                println!("  {} -> {}  {}", fmt(task.start_time), fmt(task.end_time), task.name);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Planning failed: {e}");
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
