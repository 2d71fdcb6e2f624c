//! # Classificador de Intenção (Intent) do Usuário
//!
//! O [`IntentClassifier`] pontua a mensagem contra um catálogo fixo de
//! intents e escolhe o vencedor:
//!
//! | Intent | Exemplo |
//! |--------|---------|
//! | [`Greeting`](Intent::Greeting) | "oi", "bom dia" |
//! | [`Service`](Intent::Service) | "quero um site", "preciso de um app" |
//! | [`Pricing`](Intent::Pricing) | "quanto custa?" |
//! | [`Timeline`](Intent::Timeline) | "qual o prazo?" |
//! | [`Contact`](Intent::Contact) | "quero falar com alguém" |
//! | [`ProjectDetails`](Intent::ProjectDetails) | "vocês têm portfólio?" |
//! | [`Qualification`](Intent::Qualification) | "minha empresa tem 20 funcionários" |
//! | [`Faq`](Intent::Faq) | "como funciona o suporte?" |
//! | [`Default`](Intent::Default) | nenhum match |
//!
//! ## Score
//!
//! ```text
//! score(intent) = min(100, Σ keywords presentes (chars(keyword) / chars(mensagem) × 100))
//! ```
//!
//! Keywords longas em mensagens curtas pesam mais. O maior score vence;
//! empates ficam com o intent declarado **primeiro** no catálogo
//! (greeting → serviços na ordem da KB → pricing → timeline → contact →
//! project_details → qualification → faq). Sem score positivo → `Default`.
//!
//! ## Confiança
//!
//! A confiança exibida ao usuário é uma **heurística de apresentação**, não
//! uma probabilidade calibrada: base 85, +10 se o intent não é `Default`,
//! +5 se a mensagem tem mais de 50 caracteres, teto 99.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::knowledge_base::{KnowledgeBase, ServiceKey};
use crate::core::lead_score::PRICING_KEYWORDS;

/// Confiança base de qualquer classificação.
pub const BASE_CONFIDENCE: u8 = 85;
/// Teto da confiança exibida.
pub const MAX_CONFIDENCE: u8 = 99;

const GREETING_KEYWORDS: &[&str] = &[
    "oi",
    "olá",
    "ola",
    "bom dia",
    "boa tarde",
    "boa noite",
    "e aí",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

const TIMELINE_KEYWORDS: &[&str] = &[
    "prazo",
    "quanto tempo",
    "cronograma",
    "quando fica pronto",
    "entrega",
    "demora",
    "deadline",
    "timeline",
    "how long",
    "delivery",
];

const CONTACT_KEYWORDS: &[&str] = &[
    "contato",
    "falar com",
    "telefone",
    "whatsapp",
    "e-mail",
    "ligar",
    "reunião",
    "reuniao",
    "atendente",
    "contact",
    "phone",
    "meeting",
    "talk to",
];

const PROJECT_DETAILS_KEYWORDS: &[&str] = &[
    "projeto",
    "portfólio",
    "portfolio",
    "cases",
    "exemplos",
    "trabalhos",
    "funcionalidades",
    "project",
    "examples",
    "features",
];

const QUALIFICATION_KEYWORDS: &[&str] = &[
    "empresa",
    "negócio",
    "negocio",
    "startup",
    "equipe",
    "funcionários",
    "funcionarios",
    "faturamento",
    "company",
    "business",
    "team",
    "employees",
];

const FAQ_KEYWORDS: &[&str] = &[
    "dúvida",
    "duvida",
    "pergunta",
    "como funciona",
    "suporte",
    "manutenção",
    "manutencao",
    "garantia",
    "pagamento",
    "tecnologia",
    "question",
    "how does",
    "support",
    "maintenance",
    "warranty",
    "payment",
    "technology",
];

/// Intenção classificada a partir da mensagem do usuário.
///
/// Conjunto fechado: o despacho de resposta é um `match` exaustivo.
/// Serializado como string (`"greeting"`, `"web"`, `"pricing"`...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    /// Interesse em um serviço específico do catálogo.
    Service(ServiceKey),
    Pricing,
    Timeline,
    Contact,
    ProjectDetails,
    Qualification,
    Faq,
    /// Nenhum intent com score positivo.
    Default,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Service(key) => key.as_str(),
            Intent::Pricing => "pricing",
            Intent::Timeline => "timeline",
            Intent::Contact => "contact",
            Intent::ProjectDetails => "project_details",
            Intent::Qualification => "qualification",
            Intent::Faq => "faq",
            Intent::Default => "default",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let intent = match value {
            "greeting" => Intent::Greeting,
            "pricing" => Intent::Pricing,
            "timeline" => Intent::Timeline,
            "contact" => Intent::Contact,
            "project_details" => Intent::ProjectDetails,
            "qualification" => Intent::Qualification,
            "faq" => Intent::Faq,
            "default" => Intent::Default,
            other => {
                let key = ServiceKey::ALL.iter().find(|k| k.as_str() == other)?;
                Intent::Service(*key)
            }
        };
        Some(intent)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Intent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Intent::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("intent desconhecido: {raw}")))
    }
}

/// Resultado de uma classificação.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    /// Score bruto do vencedor (0–100).
    pub score: f64,
    /// Confiança de apresentação (85–99).
    pub confidence: u8,
}

/// Uma linha do catálogo: intent + keywords em lowercase.
struct IntentRule {
    intent: Intent,
    keywords: Vec<&'static str>,
}

/// Classificador por keywords com ordem de desempate explícita.
pub struct IntentClassifier {
    /// Regras na ordem de declaração (a ordem é o desempate).
    rules: Vec<IntentRule>,
}

impl IntentClassifier {
    /// Monta o catálogo: greeting, serviços (na ordem da KB), intents estruturais.
    pub fn new(kb: &KnowledgeBase) -> Self {
        let mut rules = vec![IntentRule {
            intent: Intent::Greeting,
            keywords: GREETING_KEYWORDS.to_vec(),
        }];
        for service in kb.services() {
            rules.push(IntentRule {
                intent: Intent::Service(service.key),
                keywords: service.keywords.to_vec(),
            });
        }
        let structural: [(Intent, &[&'static str]); 6] = [
            (Intent::Pricing, PRICING_KEYWORDS),
            (Intent::Timeline, TIMELINE_KEYWORDS),
            (Intent::Contact, CONTACT_KEYWORDS),
            (Intent::ProjectDetails, PROJECT_DETAILS_KEYWORDS),
            (Intent::Qualification, QUALIFICATION_KEYWORDS),
            (Intent::Faq, FAQ_KEYWORDS),
        ];
        for (intent, keywords) in structural {
            rules.push(IntentRule {
                intent,
                keywords: keywords.to_vec(),
            });
        }
        Self { rules }
    }

    /// Intents candidatos na ordem de desempate.
    pub fn catalog_order(&self) -> Vec<Intent> {
        self.rules.iter().map(|r| r.intent).collect()
    }

    /// Score de um intent para a mensagem (0 se o intent não está no catálogo).
    pub fn score(&self, intent: Intent, text: &str) -> f64 {
        let lower = text.trim().to_lowercase();
        let len = lower.chars().count();
        self.rules
            .iter()
            .find(|r| r.intent == intent)
            .map_or(0.0, |r| rule_score(r, &lower, len))
    }

    /// Classifica a mensagem.
    ///
    /// Itera o catálogo em ordem e só troca de vencedor com score
    /// **estritamente** maior: empate fica com o primeiro declarado.
    pub fn classify(&self, text: &str) -> Classification {
        let lower = text.trim().to_lowercase();
        let len = lower.chars().count();

        let mut best_intent = Intent::Default;
        let mut best_score = 0.0f64;
        for rule in &self.rules {
            let score = rule_score(rule, &lower, len);
            if score > best_score {
                best_score = score;
                best_intent = rule.intent;
            }
        }

        Classification {
            intent: best_intent,
            score: best_score,
            confidence: confidence_for(best_intent, len),
        }
    }
}

fn rule_score(rule: &IntentRule, lower: &str, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    let total: f64 = rule
        .keywords
        .iter()
        .filter(|k| lower.contains(*k))
        .map(|k| k.chars().count() as f64 / len as f64 * 100.0)
        .sum();
    total.min(100.0)
}

/// Confiança de apresentação: 85 (+10 se não-default) (+5 se > 50 chars), teto 99.
pub fn confidence_for(intent: Intent, message_len: usize) -> u8 {
    let mut confidence = BASE_CONFIDENCE;
    if intent != Intent::Default {
        confidence += 10;
    }
    if message_len > 50 {
        confidence += 5;
    }
    confidence.min(MAX_CONFIDENCE)
}
