//! # LeadScorer — Acumulador de Prontidão de Venda
//!
//! Calcula os incrementos de lead score de um turno. Os incrementos são
//! sempre somados ao contexto (nunca subtraídos), então o score é
//! monotonicamente não-decrescente dentro de uma sessão.
//!
//! | Sinal | Pontos |
//! |-------|--------|
//! | Keyword de pedido/engajamento ("quero", "preciso"...) | +10 |
//! | Keyword de preço ("preço", "orçamento"...) | +15 |
//! | Email | +20 |
//! | Nome | +10 |
//!
//! ## Política de Identidade
//!
//! Email e nome seguem a [`IdentityAward`] configurada:
//! `PerMention` pontua quando o dado aparece na mensagem do turno;
//! `WhilePresent` pontua em todo turno enquanto o campo estiver preenchido.

use serde::{Deserialize, Serialize};

use super::context::{CapturedIdentity, ConversationContext};

pub const REQUEST_POINTS: u32 = 10;
pub const PRICING_POINTS: u32 = 15;
pub const EMAIL_POINTS: u32 = 20;
pub const NAME_POINTS: u32 = 10;

/// Keywords de pedido/engajamento.
pub const REQUEST_KEYWORDS: &[&str] = &[
    "quero",
    "preciso",
    "gostaria",
    "tenho interesse",
    "interessado",
    "interessada",
    "i want",
    "i need",
    "would like",
    "interested",
    "looking for",
];

/// Keywords de preço, compartilhadas com o intent `Pricing`.
pub const PRICING_KEYWORDS: &[&str] = &[
    "preço",
    "preco",
    "orçamento",
    "orcamento",
    "quanto custa",
    "valor",
    "custo",
    "price",
    "pricing",
    "quote",
    "budget",
    "how much",
    "cost",
];

/// Quando os dados de identidade pontuam.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityAward {
    /// Pontua quando o nome/email é extraído da mensagem atual.
    #[default]
    PerMention,
    /// Pontua em todo turno enquanto o campo estiver no contexto.
    WhilePresent,
}

/// Pontos de um turno, separados por sinal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LeadPoints {
    pub request: u32,
    pub pricing: u32,
    pub email: u32,
    pub name: u32,
}

impl LeadPoints {
    pub fn total(&self) -> u32 {
        self.request + self.pricing + self.email + self.name
    }
}

/// Faixa qualitativa do lead, derivada do score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadTier {
    Cold,
    Warm,
    Hot,
}

impl LeadTier {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=29 => LeadTier::Cold,
            30..=59 => LeadTier::Warm,
            _ => LeadTier::Hot,
        }
    }
}

/// Calcula incrementos de lead score.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeadScorer {
    policy: IdentityAward,
}

impl LeadScorer {
    pub fn new(policy: IdentityAward) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> IdentityAward {
        self.policy
    }

    /// Pontos do turno.
    ///
    /// `context` já deve refletir a identidade capturada neste turno
    /// (etapa 4 do update acontece antes).
    pub fn score(
        &self,
        text_lower: &str,
        context: &ConversationContext,
        captured: &CapturedIdentity,
    ) -> LeadPoints {
        let mut points = LeadPoints::default();

        if REQUEST_KEYWORDS.iter().any(|k| text_lower.contains(k)) {
            points.request = REQUEST_POINTS;
        }
        if PRICING_KEYWORDS.iter().any(|k| text_lower.contains(k)) {
            points.pricing = PRICING_POINTS;
        }

        let (has_email, has_name) = match self.policy {
            IdentityAward::PerMention => (captured.email.is_some(), captured.name.is_some()),
            IdentityAward::WhilePresent => {
                (context.user_email().is_some(), context.user_name().is_some())
            }
        };
        if has_email {
            points.email = EMAIL_POINTS;
        }
        if has_name {
            points.name = NAME_POINTS;
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Language;
    use chrono::Utc;
    use uuid::Uuid;

    fn ctx() -> ConversationContext {
        ConversationContext::new(Uuid::new_v4(), Language::Pt, Utc::now())
    }

    #[test]
    fn request_and_pricing_points() {
        let scorer = LeadScorer::default();
        let p = scorer.score("quero saber o preço", &ctx(), &CapturedIdentity::default());
        assert_eq!(p.request, 10);
        assert_eq!(p.pricing, 15);
        assert_eq!(p.total(), 25);
    }

    #[test]
    fn no_signals_no_points() {
        let scorer = LeadScorer::default();
        assert_eq!(scorer.score("bom dia", &ctx(), &CapturedIdentity::default()).total(), 0);
    }

    #[test]
    fn while_present_refires_on_every_turn() {
        let scorer = LeadScorer::new(IdentityAward::WhilePresent);
        let mut c = ctx();
        let kb = crate::core::KnowledgeBase::builtin();
        let captured = CapturedIdentity {
            name: Some("Ana".into()),
            email: None,
        };
        c.update("meu nome é ana", &captured, &kb, &scorer, Utc::now());
        assert_eq!(c.lead_score(), 10);
        c.update("ok", &CapturedIdentity::default(), &kb, &scorer, Utc::now());
        assert_eq!(c.lead_score(), 20);
    }

    #[test]
    fn per_mention_awards_only_when_stated() {
        let scorer = LeadScorer::new(IdentityAward::PerMention);
        assert_eq!(scorer.policy(), IdentityAward::PerMention);
        let mut c = ctx();
        let kb = crate::core::KnowledgeBase::builtin();
        let captured = CapturedIdentity {
            name: None,
            email: Some("a@b.com".into()),
        };
        c.update("a@b.com", &captured, &kb, &scorer, Utc::now());
        c.update("ok", &CapturedIdentity::default(), &kb, &scorer, Utc::now());
        assert_eq!(c.lead_score(), 20);
    }

    #[test]
    fn tiers() {
        assert_eq!(LeadTier::from_score(0), LeadTier::Cold);
        assert_eq!(LeadTier::from_score(35), LeadTier::Warm);
        assert_eq!(LeadTier::from_score(60), LeadTier::Hot);
    }
}
