//! # ConversationContext — Estado Mutável da Sessão
//!
//! Um [`ConversationContext`] por sessão. Guarda o estágio do funil, o lead
//! score acumulado, o interesse de serviço, a identidade capturada, a
//! urgência e o idioma.
//!
//! ## Atualização por Turno
//!
//! ```text
//! update(texto)
//!   ├── 1. Interesse de serviço (primeiro serviço do catálogo com match)
//!   ├── 2. Urgência → High (só sobe, nunca desce)
//!   ├── 3. Greeting + interesse definido → Discovery
//!   ├── 4. Identidade capturada (nome capitalizado, email)
//!   ├── 5. LeadScorer (somente incrementos)
//!   └── 6. last_activity = now
//! ```
//!
//! ## Invariantes
//!
//! - `session_id` nunca muda; uma nova sessão é um novo contexto
//! - `lead_score` nunca diminui (campos privados, só [`add_points`](ConversationContext::add_points) altera)
//! - Só a transição `Greeting → Discovery` é automática; os demais
//!   estágios chegam por [`set_stage`](ConversationContext::set_stage)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::knowledge_base::{KnowledgeBase, ServiceKey};
use super::lead_score::{LeadPoints, LeadScorer, LeadTier};

/// Keywords que elevam a urgência para [`Urgency::High`].
pub const URGENCY_KEYWORDS: &[&str] = &[
    "urgente",
    "urgência",
    "urgencia",
    "o quanto antes",
    "o mais rápido",
    "o mais rapido",
    "pra ontem",
    "imediato",
    "urgent",
    "asap",
    "as soon as possible",
    "right away",
];

/// Idioma da sessão.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    /// `en` se a tag de locale começa com "en" (ex: `en-US`), senão `pt`.
    pub fn from_locale_tag(tag: &str) -> Self {
        if tag.trim().to_lowercase().starts_with("en") {
            Language::En
        } else {
            Language::Pt
        }
    }

    /// Aceita apenas `"pt"` ou `"en"` (case-insensitive).
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "pt" => Some(Language::Pt),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }
}

/// Estágio do funil de vendas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    #[default]
    Greeting,
    Discovery,
    Qualification,
    Proposal,
    Closing,
}

impl ConversationStage {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "greeting" => Some(Self::Greeting),
            "discovery" => Some(Self::Discovery),
            "qualification" => Some(Self::Qualification),
            "proposal" => Some(Self::Proposal),
            "closing" => Some(Self::Closing),
            _ => None,
        }
    }
}

/// Urgência declarada pelo lead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
}

/// Identidade extraída de **uma** mensagem (não do contexto acumulado).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// O que mudou no contexto durante um turno, usado para logs e eventos.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextChanges {
    pub service_interest: Option<ServiceKey>,
    pub urgency_raised: bool,
    pub stage_advanced: bool,
    pub name_captured: bool,
    pub email_captured: bool,
    pub points: LeadPoints,
}

/// Estado mutável de uma sessão de conversa.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    session_id: Uuid,
    conversation_stage: ConversationStage,
    lead_score: u32,
    service_interest: Option<ServiceKey>,
    user_name: Option<String>,
    user_email: Option<String>,
    urgency: Urgency,
    language: Language,
    last_activity: DateTime<Utc>,
}

impl ConversationContext {
    /// Cria o contexto de uma nova sessão com todos os campos no default.
    pub fn new(session_id: Uuid, language: Language, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            conversation_stage: ConversationStage::Greeting,
            lead_score: 0,
            service_interest: None,
            user_name: None,
            user_email: None,
            urgency: Urgency::Low,
            language,
            last_activity: now,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn stage(&self) -> ConversationStage {
        self.conversation_stage
    }

    pub fn lead_score(&self) -> u32 {
        self.lead_score
    }

    pub fn lead_tier(&self) -> LeadTier {
        LeadTier::from_score(self.lead_score)
    }

    pub fn service_interest(&self) -> Option<ServiceKey> {
        self.service_interest
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Atribuição externa de estágio (qualification, proposal, closing...).
    pub fn set_stage(&mut self, stage: ConversationStage) {
        self.conversation_stage = stage;
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Soma pontos ao lead score. Saturante; nunca subtrai.
    pub fn add_points(&mut self, points: u32) {
        self.lead_score = self.lead_score.saturating_add(points);
    }

    /// Aplica um turno ao contexto (etapas 1–6).
    ///
    /// `text_lower` deve estar normalizado (NFC) e em lowercase.
    /// `captured` vem de [`IdentityExtractor`](crate::nlu::extractor::IdentityExtractor).
    pub fn update(
        &mut self,
        text_lower: &str,
        captured: &CapturedIdentity,
        kb: &KnowledgeBase,
        scorer: &LeadScorer,
        now: DateTime<Utc>,
    ) -> ContextChanges {
        let mut changes = ContextChanges::default();

        // 1. Interesse de serviço: turnos posteriores podem sobrescrever
        if let Some(service) = kb.match_service(text_lower) {
            self.service_interest = Some(service);
            changes.service_interest = Some(service);
        }

        // 2. Urgência: upgrade de mão única
        if self.urgency != Urgency::High && URGENCY_KEYWORDS.iter().any(|k| text_lower.contains(k)) {
            self.urgency = Urgency::High;
            changes.urgency_raised = true;
        }

        // 3. Única transição automática de estágio
        if self.conversation_stage == ConversationStage::Greeting && self.service_interest.is_some() {
            self.conversation_stage = ConversationStage::Discovery;
            changes.stage_advanced = true;
        }

        // 4. Identidade
        if let Some(name) = &captured.name {
            self.user_name = Some(name.clone());
            changes.name_captured = true;
        }
        if let Some(email) = &captured.email {
            self.user_email = Some(email.clone());
            changes.email_captured = true;
        }

        // 5. Lead score
        let points = scorer.score(text_lower, self, captured);
        self.add_points(points.total());
        changes.points = points;

        // 6.
        self.last_activity = now;

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lead_score::IdentityAward;

    fn ctx() -> ConversationContext {
        ConversationContext::new(Uuid::new_v4(), Language::Pt, Utc::now())
    }

    #[test]
    fn locale_tag_prefix() {
        assert_eq!(Language::from_locale_tag("en-US"), Language::En);
        assert_eq!(Language::from_locale_tag("EN"), Language::En);
        assert_eq!(Language::from_locale_tag("pt-BR"), Language::Pt);
        assert_eq!(Language::from_locale_tag("fr-FR"), Language::Pt);
        assert_eq!(Language::from_locale_tag(""), Language::Pt);
    }

    #[test]
    fn service_match_advances_greeting_to_discovery() {
        let kb = KnowledgeBase::builtin();
        let scorer = LeadScorer::default();
        let mut c = ctx();
        let changes = c.update("tenho interesse em um app", &CapturedIdentity::default(), &kb, &scorer, Utc::now());
        assert_eq!(c.service_interest(), Some(ServiceKey::Mobile));
        assert_eq!(c.stage(), ConversationStage::Discovery);
        assert!(changes.stage_advanced);
    }

    #[test]
    fn later_turn_overrides_service_interest() {
        let kb = KnowledgeBase::builtin();
        let scorer = LeadScorer::default();
        let mut c = ctx();
        c.update("quero um site", &CapturedIdentity::default(), &kb, &scorer, Utc::now());
        c.update("na verdade uma loja virtual", &CapturedIdentity::default(), &kb, &scorer, Utc::now());
        assert_eq!(c.service_interest(), Some(ServiceKey::Ecommerce));
        // um turno sem match não apaga o interesse
        c.update("ok", &CapturedIdentity::default(), &kb, &scorer, Utc::now());
        assert_eq!(c.service_interest(), Some(ServiceKey::Ecommerce));
    }

    #[test]
    fn stage_does_not_regress_once_assigned() {
        let kb = KnowledgeBase::builtin();
        let scorer = LeadScorer::default();
        let mut c = ctx();
        c.set_stage(ConversationStage::Proposal);
        c.update("quero um site", &CapturedIdentity::default(), &kb, &scorer, Utc::now());
        assert_eq!(c.stage(), ConversationStage::Proposal);
    }

    #[test]
    fn urgency_is_one_way() {
        let kb = KnowledgeBase::builtin();
        let scorer = LeadScorer::default();
        let mut c = ctx();
        let changes = c.update("é urgente", &CapturedIdentity::default(), &kb, &scorer, Utc::now());
        assert!(changes.urgency_raised);
        c.update("sem pressa", &CapturedIdentity::default(), &kb, &scorer, Utc::now());
        assert_eq!(c.urgency(), Urgency::High);
    }

    #[test]
    fn identity_fields_are_stored() {
        let kb = KnowledgeBase::builtin();
        let scorer = LeadScorer::new(IdentityAward::PerMention);
        let mut c = ctx();
        let captured = CapturedIdentity {
            name: Some("Ana".into()),
            email: Some("ana@exemplo.com".into()),
        };
        let changes = c.update("meu nome é ana, ana@exemplo.com", &captured, &kb, &scorer, Utc::now());
        assert_eq!(c.user_name(), Some("Ana"));
        assert_eq!(c.user_email(), Some("ana@exemplo.com"));
        assert_eq!(changes.points.total(), 30);
        assert_eq!(c.lead_score(), 30);
    }

    #[test]
    fn last_activity_follows_clock() {
        let kb = KnowledgeBase::builtin();
        let scorer = LeadScorer::default();
        let mut c = ctx();
        let later = Utc::now() + chrono::Duration::minutes(5);
        c.update("oi", &CapturedIdentity::default(), &kb, &scorer, later);
        assert_eq!(c.last_activity(), later);
    }

    #[test]
    fn serializes_camel_case() {
        let c = ctx();
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("sessionId").is_some());
        assert_eq!(json["conversationStage"], "greeting");
        assert_eq!(json["leadScore"], 0);
        assert_eq!(json["language"], "pt");
    }
}
