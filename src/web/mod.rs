//! # Módulo Web — Superfície HTTP do Widget
//!
//! Camada web construída com **Axum** + **HTMX** + **Maud** + **SSE**.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Browser (widget HTMX + EventSource)                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                               │
//! │  ├── GET  /            → página do widget               │
//! │  ├── POST /chat        → HTMX fragment (409 se ocupado) │
//! │  ├── GET  /transcript  → HTMX fragment                  │
//! │  ├── GET  /messages    → JSON (?q= filtra)              │
//! │  ├── GET  /context     → JSON                           │
//! │  ├── GET  /stats       → JSON                           │
//! │  ├── GET  /events      → SSE stream                     │
//! │  ├── GET  /export      → JSON                           │
//! │  ├── POST /import      → 204                            │
//! │  ├── POST /clear       → HTMX fragment                  │
//! │  ├── POST /language    → JSON                           │
//! │  └── POST /stage       → JSON                           │
//! ├─────────────────────────────────────────────────────────┤
//! │ CorsLayer (widget embutido em outros domínios)          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submódulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado e agendamento da resposta |
//! | [`handlers`] | Handlers Axum para cada rota |
//! | [`templates`] | Templates Maud (HTML server-side) |

pub mod handlers;
pub mod state;
pub mod templates;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Página ───────────────────────────────────────────
        .route("/", get(handlers::index))
        // ── HTMX fragments ───────────────────────────────────
        .route("/chat", post(handlers::chat))
        .route("/transcript", get(handlers::transcript))
        .route("/clear", post(handlers::clear))
        // ── API JSON ─────────────────────────────────────────
        .route("/messages", get(handlers::messages))
        .route("/context", get(handlers::context))
        .route("/stats", get(handlers::stats))
        .route("/export", get(handlers::export))
        .route("/import", post(handlers::import))
        .route("/language", post(handlers::language))
        .route("/stage", post(handlers::stage))
        // ── SSE ──────────────────────────────────────────────
        .route("/events", get(handlers::sse_events))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;
    use crate::config::EngineSettings;
    use crate::core::context::Language;
    use crate::core::knowledge_base::KnowledgeBase;
    use crate::core::message::{ChatMessage, Sender};
    use crate::nlu::NluPipeline;
    use crate::orchestrator::{Orchestrator, Ports};
    use crate::persistence::MemoryStore;
    use crate::ports::{FixedClock, FixedLocale};

    fn app_state(typing_ms: u64) -> AppState {
        let kb = Arc::new(KnowledgeBase::builtin());
        let nlu = Arc::new(NluPipeline::new(&kb));
        let ports = Ports {
            clock: Arc::new(FixedClock::new(Utc::now())),
            locale: Arc::new(FixedLocale(Language::Pt)),
            store: Arc::new(MemoryStore::new()),
        };
        let settings = EngineSettings {
            typing_ms_per_char: typing_ms,
            typing_min_ms: typing_ms,
            typing_max_ms: typing_ms,
            rng_seed: Some(3),
            ..EngineSettings::default()
        };
        AppState::new(Orchestrator::new(kb, nlu, ports, settings))
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn chat_returns_user_fragment_and_refuses_while_busy() {
        let state = app_state(60_000);
        let app = create_router(state.clone());

        let response = app
            .clone()
            .oneshot(form("/chat", "message=quanto+custa+um+site%3F"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("quanto custa um site?"));
        assert!(html.contains("typing-indicator"));
        assert!(state.is_busy());

        let response = app.clone().oneshot(form("/chat", "message=oi")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // clear cancela a resposta pendente e libera a sessão
        let response = app.clone().oneshot(form("/clear", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!state.is_busy());
        assert!(state.orchestrator.lock().messages().is_empty());
    }

    #[tokio::test]
    async fn reply_is_delivered_after_delay() {
        let state = app_state(1);
        let app = create_router(state.clone());

        app.clone().oneshot(form("/chat", "message=oi")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let response = app.clone().oneshot(get_req("/messages")).await.unwrap();
        let messages: Vec<ChatMessage> = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender(), Sender::Bot);
        assert!(!state.is_busy());
    }

    #[tokio::test]
    async fn rejected_import_keeps_pending_reply() {
        let state = app_state(50);
        let app = create_router(state.clone());

        app.clone().oneshot(form("/chat", "message=oi")).await.unwrap();
        assert!(state.is_busy());

        let bad = Request::builder()
            .method("POST")
            .uri("/import")
            .body(Body::from("{nope"))
            .unwrap();
        let response = app.clone().oneshot(bad).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        let orchestrator = state.orchestrator.lock();
        assert_eq!(orchestrator.messages().len(), 2);
        assert_eq!(orchestrator.messages()[1].sender(), Sender::Bot);
    }

    #[tokio::test]
    async fn empty_message_is_ignored() {
        let state = app_state(1);
        let app = create_router(state.clone());
        let response = app.oneshot(form("/chat", "message=+++")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.is_empty());
        assert!(state.orchestrator.lock().messages().is_empty());
    }

    #[tokio::test]
    async fn messages_can_be_searched() {
        let state = app_state(1);
        state.orchestrator.lock().respond("quero um site");
        state.orchestrator.lock().respond("oi");
        let app = create_router(state);

        let response = app.oneshot(get_req("/messages?q=SITE")).await.unwrap();
        let messages: Vec<ChatMessage> = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(!messages.is_empty());
        assert!(messages.iter().all(|m| m.text().to_lowercase().contains("site")));
    }

    #[tokio::test]
    async fn context_and_stage() {
        let state = app_state(1);
        let app = create_router(state);

        let response = app.clone().oneshot(form("/stage", "stage=proposal")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["conversationStage"], "proposal");
        assert_eq!(json["leadTier"], "cold");

        let response = app.clone().oneshot(form("/stage", "stage=nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(get_req("/context")).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["conversationStage"], "proposal");
        assert_eq!(json["leadScore"], 0);
    }

    #[tokio::test]
    async fn language_change() {
        let state = app_state(1);
        let app = create_router(state);
        let response = app.clone().oneshot(form("/language", "language=en")).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["language"], "en");

        let response = app.oneshot(form("/language", "language=fr")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_import_round_trip() {
        let source = app_state(1);
        source.orchestrator.lock().respond("meu nome é Ana");
        let response = create_router(source.clone())
            .oneshot(get_req("/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let exported = body_string(response).await;

        let target = app_state(1);
        let app = create_router(target.clone());
        let request = Request::builder()
            .method("POST")
            .uri("/import")
            .header("content-type", "application/json")
            .body(Body::from(exported))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            target.orchestrator.lock().messages(),
            source.orchestrator.lock().messages()
        );

        let bad = Request::builder()
            .method("POST")
            .uri("/import")
            .body(Body::from("{nope"))
            .unwrap();
        assert_eq!(app.oneshot(bad).await.unwrap().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_and_transcript() {
        let state = app_state(1);
        state.orchestrator.lock().respond("oi");
        let app = create_router(state);

        let response = app.clone().oneshot(get_req("/stats")).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["totalMessages"], 2);
        assert_eq!(json["intents"]["greeting"], 1);

        let response = app.oneshot(get_req("/transcript")).await.unwrap();
        let html = body_string(response).await;
        assert!(html.contains("user-message"));
        assert!(html.contains("bot-message"));
    }
}
