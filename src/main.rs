//! # Lead Chat — Servidor
//!
//! Inicializa o motor de conversa e sobe o servidor web.
//!
//! ```text
//! main()
//!   ├── Carrega .env (se houver)
//!   ├── Configura tracing/logging
//!   ├── Carrega Settings (config/default + LEAD_CHAT__*)
//!   ├── Abre o arquivo de preferências
//!   ├── Monta KB, NluPipeline e Orchestrator
//!   └── Inicia servidor TCP
//! ```
//!
//! ```bash
//! RUST_LOG=debug cargo run
//! LEAD_CHAT__SERVER__PORT=8080 cargo run
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use lead_chat::config::Settings;
use lead_chat::core::KnowledgeBase;
use lead_chat::nlu::NluPipeline;
use lead_chat::orchestrator::{Orchestrator, Ports};
use lead_chat::persistence::JsonFileStore;
use lead_chat::ports::{EnvLocale, SystemClock};
use lead_chat::web::{self, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG controla o nível; padrão info.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("💬 Lead Chat — Starting...");

    let settings = Settings::load().context("falha ao carregar configuração")?;

    let store = JsonFileStore::open(&settings.storage.preferences_path).with_context(|| {
        format!(
            "falha ao abrir preferências em {}",
            settings.storage.preferences_path
        )
    })?;

    let kb = Arc::new(KnowledgeBase::builtin());
    tracing::info!(
        services = kb.services().len(),
        faqs = kb.faqs().len(),
        "Base de conhecimento carregada"
    );

    let nlu = Arc::new(NluPipeline::new(&kb));
    let ports = Ports {
        clock: Arc::new(SystemClock),
        locale: Arc::new(EnvLocale),
        store: Arc::new(store),
    };
    let orchestrator = Orchestrator::new(kb, nlu, ports, settings.engine.clone());
    let app = web::create_router(AppState::new(orchestrator));

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("falha no bind em {addr}"))?;
    tracing::info!(%addr, "🚀 Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
