//! Chat-completion planning client
//!
//! Issues exactly one outbound request per invocation against an
//! OpenAI-compatible chat-completion endpoint and parses the structured task
//! list out of the reply. Uses a long-lived reqwest::Client for connection
//! pooling. Retry, if any, is a caller policy.

use crate::error::PlanningError;
use crate::models::{GoalRequest, PlannedTaskList, RawPlannedItem};
use crate::planner::TaskPlanner;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

/// Read/write timeout is larger than connect to tolerate slow generation.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum length of a response fragment carried inside a parse error.
const SNIPPET_LEN: usize = 200;

/// System instruction fixing the reply shape: a JSON object with a single
/// `tasks` array whose elements carry a name and either an offset pair or a
/// duration. Changing this wording changes the wire contract.
const SYSTEM_PROMPT: &str = r#"You are an expert project planner. Your goal is to break down a user's large goal into a list of smaller, actionable tasks.
For each task, provide a name, and EITHER a start_date_offset_days and end_date_offset_days (relative to today, where 0 is today), OR a duration_hours.
Respond strictly in JSON format. The JSON should be an object with a single key 'tasks', which is an array of task objects.
Each task object must have a 'task_name' (string).
It must also have EITHER ('start_date_offset_days' (integer) AND 'end_date_offset_days' (integer)) OR 'duration_hours' (integer).
Do not include any other text or explanations outside the JSON structure.
Example task: {"task_name": "Draft initial proposal", "duration_hours": 4}
Example task with offset: {"task_name": "Review feedback", "start_date_offset_days": 1, "end_date_offset_days": 2}"#;

/// Reusable chat-completion planner (connection-pooled)
pub struct ChatCompletionPlanner {
    http: Client,
}

impl ChatCompletionPlanner {
    pub fn new() -> Self {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    /// Build a planner with explicit connect and read/write timeouts.
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        let http = Client::builder()
            .connect_timeout(connect)
            .timeout(read)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self { http }
    }
}

impl Default for ChatCompletionPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskPlanner for ChatCompletionPlanner {
    async fn plan(&self, request: &GoalRequest) -> Result<Vec<RawPlannedItem>> {
        if request.api_key.trim().is_empty() {
            return Err(PlanningError::Configuration(
                "Provider API key is blank".to_string(),
            ));
        }

        let url = request.provider.chat_completions_url(&request.endpoint)?;
        let body = build_request_body(request);

        info!(provider = request.provider.name(), model = %request.model, "Dispatching planning request");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", request.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Planning request failed: {}", e);
                PlanningError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Provider returned non-success status");
            return Err(PlanningError::Provider {
                status: status.as_u16(),
                body: snippet(&text),
            });
        }

        let text = response.text().await.map_err(PlanningError::Network)?;
        if text.trim().is_empty() {
            error!("Provider returned an empty body");
            return Err(PlanningError::EmptyResponse);
        }

        let content = extract_message_content(&text)?;
        let items = parse_task_list(&content)?;

        info!(count = items.len(), "Parsed planned task items");
        Ok(items)
    }
}

/// Build the outbound chat-completion body: system instruction first, then
/// the user's goal, with a JSON-object response-format hint.
fn build_request_body(request: &GoalRequest) -> ChatRequest {
    let user_prompt = format!(
        "My large goal is: \"{}\". Please break this down into smaller tasks as per your instructions.",
        request.goal
    );

    ChatRequest {
        model: request.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user_prompt,
            },
        ],
        response_format: ResponseFormat {
            kind: "json_object".to_string(),
        },
    }
}

/// Pull the inner JSON content string out of the response envelope.
fn extract_message_content(body: &str) -> Result<String> {
    let envelope: ChatResponse = serde_json::from_str(body).map_err(|e| PlanningError::MalformedEnvelope {
        detail: e.to_string(),
        fragment: snippet(body),
    })?;

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| PlanningError::MalformedEnvelope {
            detail: "no usable message content".to_string(),
            fragment: snippet(body),
        })
}

/// Parse the task-list JSON the system prompt asked for.
fn parse_task_list(content: &str) -> Result<Vec<RawPlannedItem>> {
    let container: PlannedTaskList =
        serde_json::from_str(content).map_err(|e| PlanningError::MalformedTaskList {
            detail: e.to_string(),
            fragment: snippet(content),
        })?;
    Ok(container.tasks)
}

/// First [`SNIPPET_LEN`] characters of a body, for error diagnostics.
fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

//
// ================= Wire Types =================
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
