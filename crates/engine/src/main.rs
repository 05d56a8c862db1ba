//! Skirmish Engine - Main entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skirmish_engine::app::{App, Repositories};
use skirmish_engine::infrastructure::{
    catalog_client::RemoteCatalogClient,
    config::EngineConfig,
    memory::{
        InMemoryCatalog, InMemoryEventStore, InMemoryRoundStore, InMemorySessionStore,
        InMemoryUsageStore,
    },
    notifications::BroadcastNotifier,
    ports::{CharacterRepo, SkillRepo},
    seed::CatalogSeed,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine is usually run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skirmish_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Skirmish Engine");

    let config = EngineConfig::from_env()?;

    // Catalog: remote service when configured, otherwise an in-memory seed
    let (character, skill): (Arc<dyn CharacterRepo>, Arc<dyn SkillRepo>) =
        match &config.catalog_url {
            Some(url) => {
                tracing::info!(
                    catalog_url = %url,
                    timeout_ms = config.catalog_timeout.as_millis() as u64,
                    "Using remote catalog"
                );
                let client = Arc::new(RemoteCatalogClient::new(url, config.catalog_timeout)?);
                let character: Arc<dyn CharacterRepo> = client.clone();
                let skill: Arc<dyn SkillRepo> = client;
                (character, skill)
            }
            None => {
                let catalog = Arc::new(InMemoryCatalog::new());
                if let Some(path) = &config.catalog_seed_path {
                    CatalogSeed::from_path(path)?.load_into(&catalog).await;
                }
                let (characters, skills) = catalog.counts().await;
                tracing::info!(characters, skills, "Using in-memory catalog");
                let character: Arc<dyn CharacterRepo> = catalog.clone();
                let skill: Arc<dyn SkillRepo> = catalog;
                (character, skill)
            }
        };

    let repos = Repositories {
        character,
        skill,
        usage: Arc::new(InMemoryUsageStore::new()),
        round: Arc::new(InMemoryRoundStore::new()),
        event: Arc::new(InMemoryEventStore::new()),
        session: Arc::new(InMemorySessionStore::new()),
    };
    let notifications = Arc::new(BroadcastNotifier::new(config.notification_capacity));
    let app = Arc::new(App::new(
        repos,
        notifications,
        config.resolved_rounds_limit,
    ));

    let cors = skirmish_engine::api::cors_layer(config.cors_allowed_origins.as_deref());
    let router = skirmish_engine::api::router(app, cors);

    // Start server
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
