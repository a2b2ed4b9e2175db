//! OpenAPI documentation aggregator, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "foundry-relay API",
        version = "0.1.0",
        description = "Classifies questions and relays them to a Power BI or Power Apps agent.",
    ),
    tags(
        (name = "Relay", description = "Question classification and agent relay"),
        (name = "Health", description = "Liveness and configuration summary"),
    ),
    paths(
        crate::api::health::home,
        crate::api::health::health,
        crate::api::ask::test_echo,
        crate::api::ask::test_fixed_question,
        crate::api::ask::ask_agent,
    ),
    components(schemas(
        crate::api::ErrorResponse,
        crate::api::health::WelcomeResponse,
        crate::api::health::HealthResponse,
        crate::api::ask::QuestionRequest,
        crate::api::ask::AgentResponses,
        relay_agent::TextMessage,
    ))
)]
pub struct ApiDoc;
