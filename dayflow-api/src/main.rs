//! dayflow-api - Scheduling backend
//!
//! Verifies Supabase tokens, stores events in Supabase (or a local SQLite
//! file), and asks Groq/Gemini for schedule parsing and insights.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dayflow_api::config::{Args, Settings};
use dayflow_api::services::{
    EventStore, GeminiClient, GroqClient, SupabaseAuth, SupabaseEventStore,
};
use dayflow_api::AppState;
use dayflow_common::config::{load_toml_config, resolve_config_path, TomlConfig};

const DEFAULT_LOG_FILTER: &str = "dayflow_api=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::try_from(args).context("Invalid configuration")?;
    let config_path = resolve_config_path(settings.config.as_deref())
        .context("Failed to locate config file")?;
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path).context("Failed to load config file")?,
        None => TomlConfig::default(),
    };

    // RUST_LOG wins over the config file
    let default_filter = toml_config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting dayflow-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found; using built-in defaults"),
    }
    info!("Environment: {}", settings.environment);

    dayflow_api::error::set_expose_details(settings.is_development());

    let llm = &toml_config.llm;
    let auth = SupabaseAuth::new(&settings.supabase_url, settings.supabase_anon_key.clone())
        .context("Failed to build Supabase auth client")?;

    let store: Arc<dyn EventStore> = match &settings.local_db {
        Some(path) => {
            info!("Event storage: local SQLite at {}", path.display());
            let pool = dayflow_api::db::init_database_pool(path).await?;
            Arc::new(dayflow_api::db::SqliteEventStore::new(pool))
        }
        None => {
            info!("Event storage: Supabase");
            Arc::new(
                SupabaseEventStore::new(
                    &settings.supabase_url,
                    settings.supabase_service_key.clone(),
                )
                .context("Failed to build Supabase storage client")?,
            )
        }
    };

    let mut groq = GroqClient::new(settings.groq_api_key.clone(), llm.groq_model.clone(), llm.temperature)
        .context("Failed to build Groq client")?;
    if let Some(base_url) = &llm.groq_base_url {
        info!("Groq endpoint override: {}", base_url);
        groq = groq.with_base_url(base_url);
    }
    info!("Text model: {}", llm.groq_model);

    let mut state = AppState::new(Arc::new(auth), store, Arc::new(groq));

    match &settings.gemini_api_key {
        Some(key) => {
            let mut pro = GeminiClient::new(key.clone(), llm.gemini_pro_model.clone(), llm.temperature)
                .context("Failed to build Gemini pro client")?;
            let mut vision = GeminiClient::new(key.clone(), llm.gemini_model.clone(), llm.temperature)
                .context("Failed to build Gemini vision client")?;
            if let Some(base_url) = &llm.gemini_base_url {
                info!("Gemini endpoint override: {}", base_url);
                pro = pro.with_base_url(base_url);
                vision = vision.with_base_url(base_url);
            }
            info!(
                "Gemini enabled: pro={}, vision={}",
                llm.gemini_pro_model, llm.gemini_model
            );
            state = state.with_gemini(Arc::new(pro), Arc::new(vision));
        }
        None => warn!("GEMINI_API_KEY not set; pro and image parsing will return 503"),
    }

    let app = dayflow_api::build_router(state)
        .layer(dayflow_api::cors_layer(&settings.cors_origin).context("Invalid CORS_ORIGIN")?);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
