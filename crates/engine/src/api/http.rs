//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use squadlink_domain::{Command, CompanionId, CompanionState, Response, SpatialDirection};

use crate::app::App;
use crate::use_cases::{ExecutionReport, PipelineError, PipelineOutcome};

pub const SERVICE_NAME: &str = "SquadLink Companion Engine";

const NOT_UNDERSTOOD: &str = "Failed to understand command. Please try rephrasing.";

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/command", post(process_command))
        .route("/api/execute", post(execute_command))
        .route("/api/reset", post(reset_state))
        .route("/api/companions", get(list_companions))
        .route("/api/companions/{id}", get(get_companion))
        .fallback(not_found)
}

#[derive(Debug, Serialize)]
struct HealthReply {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthReply> {
    Json(HealthReply {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Player commands
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub text: String,
    /// Accepted for client compatibility; routing uses each action's `assigned_to`
    #[serde(default)]
    pub companion_id: Option<String>,
    #[serde(default)]
    pub player_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandReply {
    pub success: bool,
    pub dialogue: String,
    pub response_id: String,
    pub command_id: String,
    pub action_type_executed: String,
    pub spatial_direction: Option<SpatialDirection>,
    pub action_status: bool,
    pub action_reason: Option<String>,
    pub processing_time_ms: u64,
    pub timing_breakdown: TimingBreakdown,
    pub attempts: u32,
    pub results: Vec<ActionReply>,
}

#[derive(Debug, Serialize)]
pub struct TimingBreakdown {
    pub llm_ms: u64,
    pub ue_ms: u64,
    pub dialogue_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ActionReply {
    pub action_id: String,
    pub action_type_executed: String,
    pub spatial_direction: Option<SpatialDirection>,
    pub status: bool,
    pub reason: Option<String>,
    pub companion_id: CompanionId,
    pub response_id: String,
    pub dialogue: String,
}

impl CommandReply {
    fn from_report(report: ExecutionReport) -> Result<Self, ApiError> {
        let (first, line) = report
            .primary()
            .map(|(result, line)| (result.clone(), line.to_string()))
            .ok_or_else(|| ApiError::Internal("Response contained no actions".to_string()))?;

        let results = report
            .response
            .actions
            .into_iter()
            .zip(report.dialogue)
            .map(|(result, dialogue)| ActionReply {
                action_id: result.action_id,
                action_type_executed: result.action_type_executed,
                spatial_direction: result.spatial_direction,
                status: result.status,
                reason: result.reason,
                companion_id: result.companion_id,
                response_id: result.response_id,
                dialogue,
            })
            .collect();

        Ok(Self {
            success: first.status,
            dialogue: line,
            response_id: first.response_id,
            command_id: report.response.command_id,
            action_type_executed: first.action_type_executed,
            spatial_direction: first.spatial_direction,
            action_status: first.status,
            action_reason: first.reason,
            processing_time_ms: report.timings.total_ms,
            timing_breakdown: TimingBreakdown {
                llm_ms: report.timings.compile_ms,
                ue_ms: report.timings.dispatch_ms,
                dialogue_ms: report.timings.dialogue_ms,
            },
            attempts: report.attempts,
            results,
        })
    }
}

async fn process_command(
    State(app): State<Arc<App>>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandReply>, ApiError> {
    let started = Instant::now();
    let Json(request) = payload.map_err(|_| ApiError::BadRequest("No JSON data provided".into()))?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Text field is required".into()));
    }

    tracing::info!(
        input = %text,
        companion_id = request.companion_id.as_deref().unwrap_or_default(),
        player_id = request.player_id.as_deref().unwrap_or_default(),
        "Processing command"
    );

    match app.use_cases.process_input.execute(text).await {
        Ok(PipelineOutcome::Executed(report)) => Ok(Json(CommandReply::from_report(report)?)),
        Ok(PipelineOutcome::NotUnderstood { processing_ms, .. }) => {
            Err(ApiError::NotUnderstood { processing_ms })
        }
        Err(PipelineError::Dispatch(e)) => {
            tracing::error!(
                error = %e,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Error processing command"
            );
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

// =============================================================================
// Direct engine access
// =============================================================================

async fn execute_command(
    State(app): State<Arc<App>>,
    payload: Result<Json<Command>, JsonRejection>,
) -> Result<Json<Response>, ApiError> {
    let Json(command) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if command.actions.is_empty() {
        return Err(ApiError::BadRequest("Command must contain at least one action".into()));
    }
    // Decoding is lenient about parameters, so an unknown direction would
    // otherwise be echoed back as null
    for (index, action) in command.actions.iter().enumerate() {
        action
            .checked_spatial_direction()
            .map_err(|e| ApiError::BadRequest(format!("actions[{index}]: {e}")))?;
    }

    let response = app
        .use_cases
        .dispatcher
        .execute(&command)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ResetReply {
    success: bool,
    message: &'static str,
}

async fn reset_state(State(app): State<Arc<App>>) -> Json<ResetReply> {
    app.use_cases.dispatcher.reset();
    Json(ResetReply {
        success: true,
        message: "State reset successfully",
    })
}

// =============================================================================
// Companion inspection
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CompanionReply {
    pub companion_id: CompanionId,
    pub tracked: bool,
    pub state: CompanionState,
}

async fn list_companions(State(app): State<Arc<App>>) -> Json<Vec<CompanionReply>> {
    let companions = app
        .companions
        .tracked_ids()
        .into_iter()
        .map(|id| CompanionReply {
            state: app.companions.snapshot(&id),
            companion_id: id,
            tracked: true,
        })
        .collect();
    Json(companions)
}

async fn get_companion(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<CompanionReply>, ApiError> {
    let id = CompanionId::new(id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let tracked = app.companions.tracked_ids().contains(&id);
    Ok(Json(CompanionReply {
        state: app.companions.snapshot(&id),
        companion_id: id,
        tracked,
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    NotUnderstood { processing_ms: u64 },
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    processing_time_ms: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, processing_time_ms) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Endpoint not found".to_string(),
                None,
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotUnderstood { processing_ms } => (
                StatusCode::BAD_REQUEST,
                NOT_UNDERSTOOD.to_string(),
                Some(processing_ms),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", msg),
                None,
            ),
        };
        (
            status,
            Json(ErrorReply {
                success: false,
                error,
                processing_time_ms,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::EngineConfig;
    use crate::infrastructure::ports::{LlmError, LlmResponse, MockLlmPort};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const FOLLOW_COMMAND: &str = r#"{"command_id": "cmd_001", "actions": [{"action_id": "act_001", "type": "follow", "target": {"descriptors": ["player"], "category_hint": "player"}, "parameters": {"spatial_direction": "Back"}, "assigned_to": "companion_01", "priority": "normal", "depends_on": null}], "dialogue_context": "follow me", "requires_clarification": false}"#;

    fn app_with(llm: MockLlmPort) -> Arc<App> {
        Arc::new(App::new(EngineConfig::default(), Arc::new(llm)))
    }

    fn idle_llm() -> MockLlmPort {
        let mut llm = MockLlmPort::new();
        llm.expect_generate().never();
        llm
    }

    async fn send(app: Arc<App>, request: Request<Body>) -> (StatusCode, Value) {
        let response = routes().with_state(app).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_service() {
        let (status, body) = send(app_with(idle_llm()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn command_follow_me() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Ok(LlmResponse::text(FOLLOW_COMMAND)));
        let app = app_with(llm);

        let (status, body) = send(
            app.clone(),
            post_json("/api/command", json!({"text": "follow me"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["dialogue"], "Right behind you.");
        assert_eq!(body["response_id"], "RESP_FOLLOW_ACCEPT");
        assert_eq!(body["command_id"], "cmd_001");
        assert_eq!(body["action_type_executed"], "follow");
        assert_eq!(body["spatial_direction"], "Back");
        assert_eq!(body["action_reason"], Value::Null);
        assert!(body["timing_breakdown"]["llm_ms"].is_u64());
        assert_eq!(body["results"].as_array().map(Vec::len), Some(1));

        let (_, body) = send(app, post_json("/api/command", json!({"text": "follow me"}))).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["action_reason"], "already_following");
        assert_eq!(body["dialogue"], "I'm already following you.");
    }

    #[tokio::test]
    async fn command_requires_text() {
        let (status, body) = send(
            app_with(idle_llm()),
            post_json("/api/command", json!({"text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Text field is required");
    }

    #[tokio::test]
    async fn command_rejects_non_json_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/command")
            .body(Body::from("follow me"))
            .unwrap();
        let (status, body) = send(app_with(idle_llm()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No JSON data provided");
    }

    #[tokio::test]
    async fn command_not_understood() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(3)
            .returning(|_| Err(LlmError::RequestFailed("connection refused".into())));

        let (status, body) = send(
            app_with(llm),
            post_json("/api/command", json!({"text": "follow me"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], NOT_UNDERSTOOD);
        assert!(body["processing_time_ms"].is_u64());
    }

    #[tokio::test]
    async fn execute_bypasses_compiler() {
        let command = json!({
            "command_id": "cmd_direct",
            "actions": [
                {"action_id": "a1", "type": "do_a_barrel_roll", "parameters": {"spatial_direction": "Left"}},
                {"action_id": "a2", "type": "engage", "target": {"descriptors": [], "category_hint": null},
                 "assigned_to": "companion_02", "priority": "critical"}
            ],
            "dialogue_context": "",
            "requires_clarification": false
        });

        let (status, body) = send(app_with(idle_llm()), post_json("/api/execute", command)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signal_type"], "validation");
        assert_eq!(body["actions"][0]["action_type_executed"], "unknown");
        assert_eq!(body["actions"][0]["response_id"], "RESP_UNSUPPORTED_ACTION");
        assert_eq!(body["actions"][0]["spatial_direction"], "Left");
        assert_eq!(body["actions"][0]["companion_id"], "companion_01");
        assert_eq!(body["actions"][1]["reason"], "no_target");
        assert_eq!(body["actions"][1]["companion_id"], "companion_02");
    }

    #[tokio::test]
    async fn execute_rejects_empty_actions() {
        let command = json!({"command_id": "c", "actions": []});
        let (status, _) = send(app_with(idle_llm()), post_json("/api/execute", command)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn execute_rejects_unknown_direction() {
        let command = json!({
            "command_id": "c",
            "actions": [
                {"action_id": "a1", "type": "take_cover"},
                {"action_id": "a2", "type": "suppress", "parameters": {"spatial_direction": "Up"}}
            ]
        });
        let app = app_with(idle_llm());

        let (status, body) = send(app.clone(), post_json("/api/execute", command)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("actions[1]:"));
        // Rejected before dispatch, so the first action did not run either
        assert!(app.companions.is_empty());
    }

    #[tokio::test]
    async fn reset_and_inspect_companion() {
        let app = app_with(idle_llm());
        let follow = json!({
            "command_id": "c",
            "actions": [{"action_id": "a", "type": "follow"}]
        });
        send(app.clone(), post_json("/api/execute", follow)).await;

        let (_, body) = send(app.clone(), get("/api/companions/companion_01")).await;
        assert_eq!(body["tracked"], true);
        assert_eq!(body["state"]["is_following"], true);

        let (status, body) = send(app.clone(), post_json("/api/reset", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "State reset successfully");

        let (_, body) = send(app.clone(), get("/api/companions/companion_01")).await;
        assert_eq!(body["state"]["is_following"], false);

        let (_, body) = send(app, get("/api/companions")).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn untracked_companion_reads_baseline() {
        let (status, body) = send(app_with(idle_llm()), get("/api/companions/ghost")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tracked"], false);
        assert_eq!(body["state"]["is_waiting"], false);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (status, body) = send(app_with(idle_llm()), get("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"success": false, "error": "Endpoint not found"})
        );
    }
}
