//! # Eventos da Conversa
//!
//! O orquestrador publica um [`ChatEvent`] num `tokio::sync::broadcast`
//! a cada mudança observável. A rota `/events` repassa cada um como SSE.
//!
//! ## Ordem
//!
//! ```text
//! turno:  Message(user) → Context → [LanguageChanged] → Typing
//! entrega: Message(bot)
//! clear:  Cleared → Context
//! ```
//!
//! ## Serialização
//!
//! `#[serde(tag = "type")]` produz JSON com discriminador:
//!
//! ```json
//! { "type": "Message", "version": 3, "message": { "sender": "user", ... } }
//! ```

use serde::Serialize;
use uuid::Uuid;

use crate::core::context::{ConversationContext, Language};
use crate::core::lead_score::LeadTier;
use crate::core::message::ChatMessage;

/// Contexto como exposto para fora: campos do contexto + faixa do lead.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextView {
    #[serde(flatten)]
    pub context: ConversationContext,
    pub lead_tier: LeadTier,
}

impl From<&ConversationContext> for ContextView {
    fn from(context: &ConversationContext) -> Self {
        Self {
            context: context.clone(),
            lead_tier: context.lead_tier(),
        }
    }
}

/// Evento publicado pelo orquestrador.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum ChatEvent {
    /// Mensagem anexada ao log.
    Message { version: u64, message: ChatMessage },

    /// Contexto depois da mensagem que o alterou.
    Context { version: u64, context: ContextView },

    /// Resposta do bot agendada; o widget mostra "digitando...".
    Typing {
        session_id: Uuid,
        delay_ms: u64,
    },

    /// Idioma da sessão mudou (detecção por mensagem ou locale).
    LanguageChanged {
        session_id: Uuid,
        from: Language,
        to: Language,
    },

    /// Conversa limpa; `session_id` é o da nova sessão.
    Cleared { session_id: Uuid },
}

impl ChatEvent {
    /// Nome do evento SSE (`event:`), igual ao discriminador JSON.
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::Message { .. } => "Message",
            ChatEvent::Context { .. } => "Context",
            ChatEvent::Typing { .. } => "Typing",
            ChatEvent::LanguageChanged { .. } => "LanguageChanged",
            ChatEvent::Cleared { .. } => "Cleared",
        }
    }
}
