//! # Mensagens e Log da Conversa
//!
//! [`ChatMessage`] é imutável depois de criada: os campos são privados e só
//! há getters. O [`MessageLog`] é append-only: não há remoção nem edição
//! de entradas individuais, apenas `clear()` em bloco junto com o contexto.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::context::Language;
use crate::nlu::intent::Intent;

/// Quem enviou a mensagem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Forma de apresentação da mensagem no widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    QuickReply,
    Carousel,
}

/// Tom emocional de uma mensagem do usuário.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// Resposta sugerida exibida como botão.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub text: String,
    /// Texto enviado como mensagem do usuário quando o botão é tocado.
    pub payload: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl QuickReply {
    pub fn new(text: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: payload.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Item de carrossel (projetos de exemplo de um serviço).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselItem {
    pub title: String,
    pub subtitle: String,
}

/// Metadados anexados a mensagens do bot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    /// Score do intent vencedor, arredondado para 0–100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_replies: Vec<QuickReply>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub carousel: Vec<CarouselItem>,
}

/// Mensagem trocada na conversa. Imutável após a criação.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    id: Uuid,
    sender: Sender,
    text: String,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<u8>,
    #[serde(default)]
    metadata: MessageMetadata,
}

impl ChatMessage {
    /// Mensagem do usuário (carrega sentimento, nunca confiança).
    pub fn user(text: impl Into<String>, sentiment: Sentiment, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            text: text.into(),
            timestamp,
            kind: MessageKind::Text,
            sentiment: Some(sentiment),
            confidence: None,
            metadata: MessageMetadata::default(),
        }
    }

    /// Mensagem do bot (carrega confiança 0–100, nunca sentimento).
    pub fn bot(
        text: impl Into<String>,
        kind: MessageKind,
        confidence: u8,
        metadata: MessageMetadata,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Bot,
            text: text.into(),
            timestamp,
            kind,
            sentiment: None,
            confidence: Some(confidence.min(100)),
            metadata,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment
    }

    pub fn confidence(&self) -> Option<u8> {
        self.confidence
    }

    pub fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }
}

/// Registro ordenado e append-only das mensagens de uma sessão.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Todas as mensagens em ordem de inserção.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Busca case-insensitive por substring no texto, preservando a ordem.
    pub fn search(&self, query: &str) -> Vec<&ChatMessage> {
        let query = query.to_lowercase();
        self.messages
            .iter()
            .filter(|m| m.text.to_lowercase().contains(&query))
            .collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<ChatMessage>> for MessageLog {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}
