use axum::{
    extract::FromRef,
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod auth;
mod catalog;
mod config;
mod database;
mod errors;
mod handlers;
mod models;
mod query;
mod region;
mod validation;

use auth::SessionKeys;
use config::AppConfig;
use handlers::search;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub session: SessionKeys,
    pub max_limit: i64,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with reduced SQL verbosity
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("listing_search=info,sqlx=warn,info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let pool = database::create_pool(&config.database_url, config.max_connections).await?;
    info!("✅ Connected to PostgreSQL");

    if config.session_secret.is_none() {
        warn!("⚠️ NEXTAUTH_SECRET not set; every caller is treated as anonymous");
    }

    let state = AppState {
        db: pool,
        session: SessionKeys::new(config.session_secret.as_deref()),
        max_limit: config.max_limit,
    };

    let app = app(state).layer(cors_layer(&config));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("🚀 Server starting on http://{}:{}", config.host, config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/search", search::router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

// Permissive in development, explicit origin list otherwise
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = if config.debug_mode {
        info!("🔓 Development mode: Using permissive CORS");
        CorsLayer::new().allow_origin(Any)
    } else {
        let allowed_origins = config
            .allowed_origins
            .clone()
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|origin| {
                let trimmed = origin.trim();
                match trimmed.parse() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!("⚠️ Ignoring invalid origin '{}': {}", trimmed, e);
                        None
                    }
                }
            })
            .collect();

        info!("🔒 CORS configured for origins: {}", allowed_origins);
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
    };

    cors.allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
}

async fn health_check() -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": "listing-search",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "search": "/api/search/:query",
            "health": "/api/health"
        }
    })))
}
