//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single `Router`.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new().allow_origin(value),
        Err(e) => {
            tracing::warn!("Invalid CORS_ORIGIN '{}': {} — allowing any origin", origin, e);
            CorsLayer::permissive()
        }
    }
}

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/", get(api::home))
        .route("/health", get(api::health))
        .route("/test", post(api::test_echo))
        .route("/test2", get(api::test_fixed_question))
        .route("/ask-agent", post(api::ask_agent))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use relay_agent::{
        Agent, AgentDispatcher, AgentRoutes, AgentService, AgentServiceError, AgentThread,
        MessageContent, MessageRole, RunStatus, TextContent, ThreadMessage, ThreadRun, ToolClassifier,
    };
    use relay_llm::{CompletionParams, LlmError, LlmProvider, Message};

    // ── Fakes ─────────────────────────────────────────────────────

    /// Classifier backend: fixed reply, or an error; counts calls.
    struct FakeLlm {
        reply: Result<&'static str, &'static str>,
        calls: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl LlmProvider for FakeLlm {
        async fn complete(&self, _: Vec<Message>, _: &CompletionParams) -> Result<String, LlmError> {
            *self.calls.lock().unwrap() += 1;
            self.reply
                .map(str::to_string)
                .map_err(|e| LlmError::ApiError { status: 500, body: e.to_string() })
        }
    }

    /// Agent service that echoes the question back as the agent's reply.
    #[derive(Default)]
    struct FakeAgents {
        calls: Mutex<Vec<String>>,
        fail_run: bool,
    }

    impl FakeAgents {
        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl AgentService for FakeAgents {
        async fn get_agent(&self, agent_id: &str) -> Result<Agent, AgentServiceError> {
            self.log(format!("get_agent {agent_id}"));
            Ok(Agent { id: agent_id.into(), name: None, model: None, instructions: None })
        }

        async fn get_thread(&self, thread_id: &str) -> Result<AgentThread, AgentServiceError> {
            self.log(format!("get_thread {thread_id}"));
            Ok(AgentThread { id: thread_id.into(), created_at: None })
        }

        async fn create_thread(&self) -> Result<AgentThread, AgentServiceError> {
            self.log("create_thread".into());
            Ok(AgentThread { id: "thread_9".into(), created_at: None })
        }

        async fn create_message(
            &self,
            thread_id: &str,
            _role: MessageRole,
            content: &str,
        ) -> Result<ThreadMessage, AgentServiceError> {
            self.log(format!("create_message {thread_id} {content}"));
            Ok(ThreadMessage { id: "msg_1".into(), role: "user".into(), content: vec![] })
        }

        async fn create_and_process_run(
            &self,
            thread_id: &str,
            agent_id: &str,
        ) -> Result<ThreadRun, AgentServiceError> {
            self.log(format!("run {thread_id} {agent_id}"));
            if self.fail_run {
                return Err(AgentServiceError::Api { status: 429, body: "Rate limit exceeded".into() });
            }
            Ok(ThreadRun { id: "run_1".into(), status: RunStatus::Completed, last_error: None })
        }

        async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AgentServiceError> {
            self.log(format!("list_messages {thread_id}"));
            let text = |value: &str| MessageContent::Text {
                text: TextContent { value: value.into(), annotations: vec![] },
            };
            Ok(vec![
                ThreadMessage { id: "msg_2".into(), role: "assistant".into(), content: vec![text("Here is how.")] },
                ThreadMessage { id: "msg_1".into(), role: "user".into(), content: vec![text("the question")] },
            ])
        }
    }

    struct Harness {
        app: Router,
        llm_calls: Arc<Mutex<usize>>,
        agents: Arc<FakeAgents>,
    }

    fn harness(reply: Result<&'static str, &'static str>, agents: FakeAgents) -> Harness {
        let llm_calls = Arc::new(Mutex::new(0));
        let agents = Arc::new(agents);
        let classifier = ToolClassifier::new(Box::new(FakeLlm { reply, calls: llm_calls.clone() }));
        let routes = AgentRoutes::new(Some("asst_bi".into()), Some("asst_apps".into()));
        let dispatcher = AgentDispatcher::new(classifier, routes, agents.clone());

        let mut config = relay_core::Config::for_profile("ROUTERTEST");
        config.demo.question = "What is Powerapps?".into();
        config.server.cors_origin = "*".into();

        let state = Arc::new(AppState { config, dispatcher });
        Harness { app: build_router(state), llm_calls, agents }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    // ── Routes ────────────────────────────────────────────────────

    #[tokio::test]
    async fn home_says_welcome() {
        let h = harness(Ok("powerbi"), FakeAgents::default());
        let (status, body) = send(&h.app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "responses": "Welcome" }));
    }

    #[tokio::test]
    async fn test_route_echoes_question() {
        let h = harness(Ok("powerbi"), FakeAgents::default());
        let (status, body) = send(&h.app, "POST", "/test", Some(json!({ "question": "hello" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "Test": "hello" }));

        let (_, body) = send(&h.app, "POST", "/test", Some(json!({}))).await;
        assert_eq!(body, json!({ "Test": null }));
    }

    #[tokio::test]
    async fn ask_agent_relays_to_powerapps_agent() {
        let h = harness(Ok("powerapps"), FakeAgents::default());

        let (status, body) =
            send(&h.app, "POST", "/ask-agent", Some(json!({ "question": "Create a canvas app" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "responses": [
                { "role": "assistant", "text": "Here is how." },
                { "role": "user", "text": "the question" },
            ]})
        );
        assert_eq!(
            *h.agents.calls.lock().unwrap(),
            vec![
                "get_agent asst_apps",
                "create_thread",
                "create_message thread_9 Create a canvas app",
                "run thread_9 asst_apps",
                "list_messages thread_9",
            ]
        );
    }

    #[tokio::test]
    async fn empty_or_missing_question_is_rejected_without_calls() {
        let h = harness(Ok("powerapps"), FakeAgents::default());

        for body in [json!({ "question": "" }), json!({}), json!({ "question": null })] {
            let (status, resp) = send(&h.app, "POST", "/ask-agent", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp, json!({ "error": "No question provided." }));
        }
        assert_eq!(*h.llm_calls.lock().unwrap(), 0);
        assert!(h.agents.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_bodies_get_json_errors() {
        let h = harness(Ok("powerapps"), FakeAgents::default());

        let (status, body) = send(&h.app, "POST", "/ask-agent", Some(json!({ "question": 123 }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string(), "body {body}");

        let request = Request::builder()
            .method("POST")
            .uri("/ask-agent")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = h.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string(), "body {body}");

        assert_eq!(*h.llm_calls.lock().unwrap(), 0);
        assert!(h.agents.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn whitespace_question_is_rejected_as_empty() {
        let h = harness(Ok("powerapps"), FakeAgents::default());
        let (status, body) = send(&h.app, "POST", "/ask-agent", Some(json!({ "question": "  \n\t" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No question provided." }));
        assert_eq!(*h.llm_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn classifier_failure_is_a_bad_request() {
        for reply in [Err("connection reset"), Ok("I think powerbi")] {
            let h = harness(reply, FakeAgents::default());

            let (status, body) =
                send(&h.app, "POST", "/ask-agent", Some(json!({ "question": "Visualize monthly sales" }))).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Could not determine the correct agent from the question." }));
            assert!(h.agents.calls.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn agent_failure_is_a_server_error_with_its_text() {
        let h = harness(Ok("powerbi"), FakeAgents { fail_run: true, ..Default::default() });

        let (status, body) =
            send(&h.app, "POST", "/ask-agent", Some(json!({ "question": "Schedule a report refresh" }))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "agent service error: 429 — Rate limit exceeded" }));
    }

    #[tokio::test]
    async fn test2_relays_configured_question() {
        let h = harness(Ok("powerapps"), FakeAgents::default());

        let (status, body) = send(&h.app, "GET", "/test2", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["responses"][0]["text"], "Here is how.");
        assert!(h
            .agents
            .calls
            .lock()
            .unwrap()
            .contains(&"create_message thread_9 What is Powerapps?".to_string()));
    }

    #[tokio::test]
    async fn test2_with_empty_question_is_rejected() {
        let llm_calls = Arc::new(Mutex::new(0));
        let classifier = ToolClassifier::new(Box::new(FakeLlm { reply: Ok("powerapps"), calls: llm_calls.clone() }));
        let dispatcher = AgentDispatcher::new(classifier, AgentRoutes::default(), Arc::new(FakeAgents::default()));
        let mut config = relay_core::Config::for_profile("ROUTERTEST");
        config.demo.question = String::new();
        let app = build_router(Arc::new(AppState { config, dispatcher }));

        let (status, body) = send(&app, "GET", "/test2", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No question provided." }));
        assert_eq!(*llm_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn health_reports_redacted_config() {
        let h = harness(Ok("powerbi"), FakeAgents::default());
        let (status, body) = send(&h.app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["config"]["llm"].get("azure_api_key").is_none());
    }
}
