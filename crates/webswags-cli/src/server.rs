//! Web application serving the discovered documents.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use webswags_core::{Config, Discovery, Format};

use crate::pages::Pages;
use crate::proxy;

/// Preflight cache lifetime, in seconds
const CORS_MAX_AGE_SECS: u64 = 3600;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<Discovery>,
    pub pages: Arc<Pages>,
    /// Client used by the proxy relay
    pub client: reqwest::Client,
    pub swagger_ui_version: String,
}

impl AppState {
    pub fn new(config: &Config, discovery: Discovery) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.proxy_timeout())
            .build()?;
        Ok(Self {
            discovery: Arc::new(discovery),
            pages: Arc::new(Pages::new()?),
            client,
            swagger_ui_version: config.swagger_ui_version.clone(),
        })
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/service/{service}", get(service_page))
        .route("/api/specs", get(list_specs))
        .route("/api/specs/{service}/{file}", get(spec_file))
        .route("/proxy", any(proxy::handle_proxy))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
            Method::HEAD,
            Method::CONNECT,
            Method::TRACE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("x-custom-header"),
        ])
        .max_age(std::time::Duration::from_secs(CORS_MAX_AGE_SECS))
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn run(config: &Config, discovery: Discovery) -> anyhow::Result<()> {
    let addr = config.listen_addr()?;
    let app = create_router(AppState::new(config, discovery)?);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Webswags listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

fn render(page: tera::Result<String>) -> Response {
    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

async fn index(State(state): State<AppState>) -> Response {
    render(state.pages.index(&state.discovery))
}

async fn service_page(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Response {
    render(
        state
            .pages
            .service(&state.discovery, &service, &state.swagger_ui_version),
    )
}

async fn list_specs(State(state): State<AppState>) -> Response {
    Json(state.discovery.specs()).into_response()
}

/// Raw bytes of the first record with this service key and format
async fn spec_file(
    State(state): State<AppState>,
    Path((service, file)): Path<(String, String)>,
) -> Response {
    let format = match file.as_str() {
        "swagger.json" => Format::Json,
        "swagger.yaml" => Format::Yaml,
        _ => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    match state.discovery.find(&service, format) {
        Some(spec) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, format.content_type())],
            spec.raw.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            format!("No {} document for service {}", format, service),
        )
            .into_response(),
    }
}
