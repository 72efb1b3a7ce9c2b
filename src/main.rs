use std::sync::Arc;

use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use yeondam_server::config::AppConfig;
use yeondam_server::domain::ai::handler;
use yeondam_server::domain::ai::{dto, service::AiService};
use yeondam_server::domain::health;
use yeondam_server::error::ErrorBody;
use yeondam_server::{create_router, shutdown, AdvicePolicy, AiClient, AppState, OpenAiClient};

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::generate_advice,
        handler::generate_compatibility,
        health::handler::check_health,
    ),
    components(
        schemas(
            dto::AdviceRequest,
            dto::AdviceResponse,
            dto::CompatibilityRequest,
            dto::CompatibilityResponse,
            health::handler::HealthStatus,
            ErrorBody,
        )
    ),
    tags(
        (name = "AI", description = "연애 조언/궁합 생성 API"),
        (name = "Health", description = "서버 상태")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    health::handler::init_start_time();

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    let client: Option<AiClient> = config
        .openai_api_key
        .as_deref()
        .map(|key| Arc::new(OpenAiClient::new(key, config.openai_model.clone())) as AiClient);

    if client.is_none() {
        tracing::warn!(
            "OPENAI_API_KEY is not set; every generation request will be served from the fallback path"
        );
    }

    let state = AppState {
        ai_service: Arc::new(AiService::new(client, AdvicePolicy::default())),
    };

    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        );

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(%addr, model = %config.openai_model, "Starting yeondam-server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .expect("Server error");
}
