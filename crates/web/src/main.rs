mod pages;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Form, Router,
};
use common::Config;
use pages::{render_page, Notice};
use scholar::{user_message, ScholarService};
use serde::Deserialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

struct AppState {
    service: ScholarService,
}

type SharedState = Arc<AppState>;

#[derive(Deserialize)]
struct FetchForm {
    #[serde(default)]
    url: String,
}

async fn form_page() -> Html<String> {
    Html(render_page("", &[], None))
}

async fn fetch_submit(State(state): State<SharedState>, Form(form): Form<FetchForm>) -> Html<String> {
    let via = format!("Fetching data via the {} source...", state.service.source_name());

    match state.service.process(&form.url).await {
        Ok(outcome) => {
            let saved = match &outcome.saved_to {
                Some(path) => format!("Fetched all researcher data and saved it to {}", path.display()),
                None => "Fetched all researcher data".to_string(),
            };
            let fetched_via = if outcome.via == "serpapi" {
                "Fetched data via SerpApi.".to_string()
            } else {
                via
            };
            Html(render_page(
                &form.url,
                &[Notice::Info(&fetched_via), Notice::Success(&saved)],
                Some(&outcome.report_html()),
            ))
        }
        Err(e) => {
            let message = user_message(&e);
            Html(render_page(&form.url, &[Notice::Error(&message)], None))
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/fetch", post(fetch_submit))
        .route("/health", get(health))
        .with_state(Arc::new(state))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    let _ = dotenv::dotenv();

    // Configure tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;
    let service = ScholarService::new(&config)?;
    info!(
        "Page source: {}, SerpApi: {}",
        service.source_name(),
        if config.serpapi_key.is_some() { "enabled" } else { "disabled" }
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid host:port")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, build_router(AppState { service }))
        .await
        .context("Server error")?;

    Ok(())
}
