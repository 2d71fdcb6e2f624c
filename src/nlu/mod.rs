//! # Pipeline NLU — Compreensão de Linguagem Natural
//!
//! O [`NluPipeline`] transforma o texto bruto do usuário nos sinais que o
//! orquestrador consome em cada turno:
//!
//! ```text
//! Mensagem do usuário
//!   ├── 1. NFC normalize + trim
//!   ├── 2. Sentimento      (SentimentAnalyzer)
//!   ├── 3. Idioma          (LanguageDetector, com idioma anterior como fallback)
//!   ├── 4. Identidade      (IdentityExtractor → nome/email)
//!   └── 5. Intent          (IntentClassifier)
//! ```
//!
//! Todos os componentes são puros e `&self`: o pipeline pode ser
//! compartilhado entre requisições sem lock.
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`extractor`] | Nome e email do lead |
//! | [`intent`] | Classificação de intenção por keywords |
//! | [`language`] | Detecção pt/en |
//! | [`sentiment`] | Polaridade por léxico |

/// Sub-módulo do extrator de identidade (nome/email).
pub mod extractor;

/// Sub-módulo do classificador de intenção do usuário.
pub mod intent;

/// Sub-módulo de detecção de idioma.
pub mod language;

/// Sub-módulo de análise de sentimento.
pub mod sentiment;

use unicode_normalization::UnicodeNormalization;

use crate::core::context::{CapturedIdentity, Language};
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::message::Sentiment;

use extractor::IdentityExtractor;
use intent::{Classification, IntentClassifier};
use language::LanguageDetector;
use sentiment::SentimentAnalyzer;

/// Sinais extraídos de uma mensagem.
#[derive(Clone, Debug)]
pub struct NluResult {
    /// Texto normalizado (NFC, sem espaços nas bordas).
    pub text: String,
    /// `text` em lowercase, usado por todos os matchers de keyword.
    pub lower: String,
    pub sentiment: Sentiment,
    pub language: Language,
    pub identity: CapturedIdentity,
    pub classification: Classification,
}

/// Pipeline NLU completo.
pub struct NluPipeline {
    sentiment: SentimentAnalyzer,
    language: LanguageDetector,
    extractor: IdentityExtractor,
    intent_classifier: IntentClassifier,
}

impl NluPipeline {
    /// Monta o pipeline; o catálogo de intents vem da KB.
    pub fn new(kb: &KnowledgeBase) -> Self {
        Self {
            sentiment: SentimentAnalyzer::new(),
            language: LanguageDetector::new(),
            extractor: IdentityExtractor::new(),
            intent_classifier: IntentClassifier::new(kb),
        }
    }

    /// Normalização Unicode NFC + trim.
    ///
    /// Garante que "ã" digitado como `a + ~` combine com as keywords.
    pub fn normalize(text: &str) -> String {
        text.nfc()
            .map(|c| if c == '\u{2019}' { '\'' } else { c })
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Analisa uma mensagem. `prior` é o idioma da sessão antes do turno.
    pub fn analyze(&self, text: &str, prior: Language) -> NluResult {
        let text = Self::normalize(text);
        let lower = text.to_lowercase();

        let sentiment = self.sentiment.analyze(&text);
        let language = self.language.detect(&text, prior);
        let identity = self.extractor.extract(&text);
        let classification = self.intent_classifier.classify(&text);

        tracing::debug!(
            intent = %classification.intent,
            score = classification.score,
            sentiment = ?sentiment,
            language = language.code(),
            "Mensagem analisada"
        );

        NluResult {
            text,
            lower,
            sentiment,
            language,
            identity,
            classification,
        }
    }
}
