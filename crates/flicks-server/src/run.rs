use crate::config::ServerConfig;
use crate::error::Result;
use axum::http::StatusCode;
use axum::{response::IntoResponse, routing::get, Json, Router};
use flicks_app::cors::origin_gate;
use flicks_app::rest_api;
use flicks_app::state::{AppConfig, AppState};
use flicks_dal::movie::Movie;
use futures::FutureExt;
use http::{header, HeaderValue, Method};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state.clone());

    if !args.no_cors {
        // Gate runs behind the CORS layer, so preflights are answered by the
        // layer and only plain requests from unlisted origins reach the gate.
        app = app
            .layer(axum::middleware::from_fn_with_state(state, origin_gate))
            .layer(cors_layer(&args.allowed_origins));
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    debug!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

fn main_router(state: AppState) -> Router<()> {
    Router::new()
        .nest("/movies", rest_api::movie::router())
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(json!({"message": "Movies API"}))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let seed = match &config.movies_file {
        Some(path) => {
            let raw = tokio::fs::read(path).await?;
            let movies: Vec<Movie> = serde_json::from_slice(&raw)?;
            info!("Loaded {} movies from {}", movies.len(), path.display());
            movies
        }
        None => {
            info!("No seed dataset configured, starting with an empty collection");
            Vec::new()
        }
    };

    let app_config = AppConfig {
        allowed_origins: config.allowed_origins.clone(),
    };
    let store = flicks_dal::new_store(seed);

    Ok(AppState::new(app_config, store))
}
