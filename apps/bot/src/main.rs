mod config;
mod dispatch;
mod errors;
mod filter;
mod followers;
mod generation;
mod instagram;
mod interactions;
mod llm_client;
mod routes;
mod settings;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::followers::FollowerWelcomer;
use crate::generation::generator::ResponseGenerator;
use crate::instagram::{DemoTransport, GatewayTransport, MessagingTransport};
use crate::interactions::InteractionLog;
use crate::llm_client::{CompletionService, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting fact-check bot v{}", env!("CARGO_PKG_VERSION"));

    let settings = settings::shared(config.bot_settings());
    info!(
        "Bot settings: mode={} safe_mode={} log_interactions={}",
        config.bot_mode, config.safe_mode, config.log_interactions
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_max_attempts)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    if let Err(e) = llm.ping().await {
        warn!("Completion service unreachable at startup, replies will degrade: {e}");
    }

    let interactions = Arc::new(InteractionLog::new(config.interaction_log_path.clone()));
    let generator = ResponseGenerator::new(Arc::new(llm), settings.clone())
        .with_interaction_log(interactions.clone());

    let welcomer = FollowerWelcomer::load(config.seen_followers_path.clone()).await;

    let transport: Arc<dyn MessagingTransport> = match &config.instagram_gateway_url {
        Some(url) => {
            info!("Instagram transport: gateway at {url}");
            Arc::new(GatewayTransport::new(url.clone())?)
        }
        None => {
            info!("Instagram transport: demo");
            Arc::new(DemoTransport::new())
        }
    };

    let dispatcher = Dispatcher::new(
        Arc::new(generator),
        transport,
        Arc::new(welcomer),
        interactions,
        settings,
    );

    let state = AppState {
        dispatcher: Arc::new(dispatcher),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
