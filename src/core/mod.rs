//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Este módulo agrupa os tipos sobre os quais todo o motor de conversa opera:
//!
//! - [`KnowledgeBase`] — catálogo imutável de serviços, FAQs e fatos da empresa
//! - [`ConversationContext`] — estado mutável de uma sessão (estágio, lead score, identidade)
//! - [`LeadScorer`] — incrementos de lead score por turno
//! - [`ChatMessage`] / [`MessageLog`] — mensagens imutáveis e o log append-only
//!
//! ## Ordem de Dependência
//!
//! ```text
//! knowledge_base ← lead_score ← context ← message
//! ```

/// Catálogo de serviços, FAQs e fatos institucionais.
pub mod knowledge_base;

/// Contexto mutável da sessão.
pub mod context;

/// Pontuação de leads.
pub mod lead_score;

/// Mensagens e log da conversa.
pub mod message;

pub use context::{
    CapturedIdentity, ContextChanges, ConversationContext, ConversationStage, Language, Urgency,
};
pub use knowledge_base::{KnowledgeBase, ServiceKey};
pub use lead_score::{IdentityAward, LeadPoints, LeadScorer, LeadTier};
pub use message::{
    CarouselItem, ChatMessage, MessageKind, MessageLog, MessageMetadata, QuickReply, Sender,
    Sentiment,
};
