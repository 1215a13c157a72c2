mod api;
mod auth;
mod config;
mod db;
mod membership;
mod models;
mod photos;
mod schema;
mod seed;
mod telemetry;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{FromRef, MatchedPath};
use axum::http::{Request, Response};
use axum::Router;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use db::DbPool;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub config: Arc<Config>,
}

impl FromRef<AppState> for Arc<DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram recipe-sharing backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Print the OpenAPI spec as JSON and exit
    Openapi,
    /// Load ingredients from a two-column CSV file (name, measurement unit)
    LoadIngredients {
        /// Path to the CSV file
        #[arg(long, default_value = "data/ingredients.csv")]
        path: PathBuf,
    },
    /// Create the default tags
    LoadTags,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Openapi) = cli.command {
        let spec = api::openapi()
            .to_pretty_json()
            .context("Failed to serialize OpenAPI spec")?;
        println!("{}", spec);
        return Ok(());
    }

    telemetry::init_telemetry()?;
    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url, config.db_pool_size)?;

    match cli.command {
        Some(Commands::LoadIngredients { path }) => {
            seed::load_ingredients(&pool, &path)?;
            Ok(())
        }
        Some(Commands::LoadTags) => {
            seed::load_tags(&pool)?;
            Ok(())
        }
        Some(Commands::Serve) | Some(Commands::Openapi) | None => serve(config, pool).await,
    }
}

fn app(state: AppState) -> Router {
    let api_router = Router::new()
        .nest("/api/users", api::users::router())
        .nest("/api/auth/token", api::auth::router())
        .nest("/api/tags", api::tags::router())
        .nest("/api/ingredients", api::ingredients::router())
        .nest("/api/recipes", api::recipes::router())
        .nest("/api/photos", api::photos::router())
        .merge(api::short_links::router());

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api_router)
        .merge(swagger_ui)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_request(())
                .on_response(log_response)
                .on_failure(log_failure),
        )
}

/// One `http_request` span per request, keyed by the route template.
fn request_span(request: &Request<Body>) -> Span {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or(request.uri().path());

    tracing::info_span!("http_request", method = %request.method(), path = %route)
}

fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let status = response.status().as_u16();
    let latency_ms = latency.as_millis() as u64;
    if response.status().is_server_error() {
        tracing::error!(status, latency_ms, "request failed with server error");
    } else {
        tracing::info!(status, latency_ms, "request completed");
    }
}

fn log_failure(error: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    tracing::error!(error = %error, latency_ms = latency.as_millis() as u64, "request failed");
}

async fn serve(config: Config, pool: DbPool) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);
    tracing::info!(
        "Swagger UI available at {}",
        config.absolute_url("/swagger-ui/")
    );

    let state = AppState {
        pool: Arc::new(pool),
        config: Arc::new(config),
    };

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;
    Ok(())
}
