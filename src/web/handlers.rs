//! # Handlers HTTP
//!
//! Cada função pública é um handler Axum mapeado em [`super::create_router()`].
//!
//! | Handler | Método | Retorno |
//! |---------|--------|---------|
//! | `index` | GET | Página do widget |
//! | `chat` | POST form | Fragmento da mensagem do usuário + "digitando..." (409 se ocupado) |
//! | `transcript` | GET | Fragmento com o log inteiro |
//! | `messages` | GET `?q=` | JSON das mensagens (filtradas) |
//! | `context` | GET | JSON do contexto + faixa do lead |
//! | `stats` | GET | JSON de estatísticas |
//! | `sse_events` | GET | Stream SSE de `ChatEvent` |
//! | `export` | GET | JSON da conversa |
//! | `import` | POST JSON | Substitui a sessão |
//! | `clear` | POST | Limpa a conversa |
//! | `language` | POST form | Mudança de locale |
//! | `stage` | POST form | Atribuição de estágio |

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use futures_util::stream::StreamExt;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;

use super::state::{AppState, Submission};
use super::templates;
use crate::core::context::{ConversationStage, Language};
use crate::core::message::ChatMessage;
use crate::error::ChatError;
use crate::events::ContextView;
use crate::orchestrator::ConversationStats;

/// Converte Maud Markup em resposta Html<String> do Axum.
fn markup_to_html(m: maud::Markup) -> Html<String> {
    Html(m.into_string())
}

/// Erro de handler → status HTTP + texto.
pub struct ApiError(StatusCode, String);

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        let status = match e {
            ChatError::Json(_) | ChatError::InvalidImport(_) => StatusCode::BAD_REQUEST,
            ChatError::Io(_) | ChatError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Deserialize)]
pub struct ChatForm {
    pub message: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct LanguageForm {
    pub language: String,
}

#[derive(Deserialize)]
pub struct StageForm {
    pub stage: String,
}

/// GET `/` — página do widget no idioma da sessão.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let language = state.orchestrator.lock().context().language();
    markup_to_html(templates::full_page(language))
}

/// POST `/chat` — envia a mensagem e agenda a resposta.
///
/// A resposta do bot não vem neste fragmento: chega pelo SSE depois do
/// atraso de digitação e aparece no próximo `/transcript`.
pub async fn chat(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Response {
    let language = state.orchestrator.lock().context().language();
    match state.try_submit(&form.message) {
        Submission::Ignored => markup_to_html(maud::html! {}).into_response(),
        Submission::Busy => {
            tracing::debug!("Mensagem recusada: resposta pendente");
            (StatusCode::CONFLICT, markup_to_html(templates::busy_notice(language))).into_response()
        }
        Submission::Accepted {
            user_message,
            delay,
        } => {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "Resposta agendada");
            markup_to_html(maud::html! {
                (templates::message(&user_message))
                (templates::typing_indicator(language))
            })
            .into_response()
        }
    }
}

/// GET `/transcript` — fragmento com todas as mensagens.
pub async fn transcript(State(state): State<AppState>) -> Html<String> {
    let orchestrator = state.orchestrator.lock();
    markup_to_html(templates::transcript(orchestrator.messages()))
}

/// GET `/messages?q=` — mensagens em JSON, filtradas se `q` vier preenchido.
pub async fn messages(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<ChatMessage>> {
    let orchestrator = state.orchestrator.lock();
    let messages = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => orchestrator.search_messages(q),
        _ => orchestrator.messages().to_vec(),
    };
    Json(messages)
}

/// GET `/context`
pub async fn context(State(state): State<AppState>) -> Json<ContextView> {
    Json(ContextView::from(state.orchestrator.lock().context()))
}

/// GET `/stats`
pub async fn stats(State(state): State<AppState>) -> Json<ConversationStats> {
    Json(state.orchestrator.lock().stats())
}

/// GET `/events` — stream SSE de [`ChatEvent`](crate::events::ChatEvent).
///
/// O nome do evento SSE é o discriminador (`Message`, `Context`...).
/// Assinantes atrasados perdem eventos (descartados em silêncio).
pub async fn sse_events(
    State(state): State<AppState>,
) -> Sse<impl futures_util::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = state.orchestrator.lock().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => {
                let data = serde_json::to_string(&event).ok()?;
                Some(Ok(SseEvent::default().event(event.name()).data(data)))
            }
            Err(_) => None,
        }
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// GET `/export`
pub async fn export(State(state): State<AppState>) -> Result<Response, ApiError> {
    let json = state.orchestrator.lock().export_conversation()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response())
}

/// POST `/import` — corpo é um export JSON.
///
/// A resposta pendente só é cancelada se o import for aceito; uma entrega
/// que chegue no meio da troca cai na checagem de sessão antiga.
pub async fn import(State(state): State<AppState>, body: String) -> Result<StatusCode, ApiError> {
    state.orchestrator.lock().import_conversation(&body)?;
    state.cancel_pending();
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/clear` — nova sessão; devolve o transcript vazio.
pub async fn clear(State(state): State<AppState>) -> Html<String> {
    state.cancel_pending();
    state.orchestrator.lock().clear_conversation();
    markup_to_html(templates::transcript(&[]))
}

/// POST `/language` — mudança de locale do ambiente (`pt` | `en`).
pub async fn language(
    State(state): State<AppState>,
    Form(form): Form<LanguageForm>,
) -> Result<Json<ContextView>, ApiError> {
    let language = Language::parse(&form.language).ok_or_else(|| {
        ApiError(StatusCode::BAD_REQUEST, format!("idioma inválido: {}", form.language))
    })?;
    let mut orchestrator = state.orchestrator.lock();
    orchestrator.apply_locale_change(language);
    Ok(Json(ContextView::from(orchestrator.context())))
}

/// POST `/stage` — atribuição externa de estágio.
pub async fn stage(
    State(state): State<AppState>,
    Form(form): Form<StageForm>,
) -> Result<Json<ContextView>, ApiError> {
    let stage = ConversationStage::parse(&form.stage).ok_or_else(|| {
        ApiError(StatusCode::BAD_REQUEST, format!("estágio inválido: {}", form.stage))
    })?;
    let mut orchestrator = state.orchestrator.lock();
    orchestrator.set_stage(stage);
    Ok(Json(ContextView::from(orchestrator.context())))
}
