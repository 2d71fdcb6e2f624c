//! # Detecção de Idioma (pt / en)
//!
//! Detecção em duas camadas, sem modelo estatístico:
//!
//! 1. **Indicadores fortes** — frases tipicamente inglesas ("hello", "i want",
//!    "how much"...) casadas em fronteira de palavra. Qualquer uma → `En`.
//! 2. **Razão de palavras funcionais** — fração dos tokens que pertencem ao
//!    conjunto de palavras funcionais inglesas. `≥ 0.3` → `En`, senão `Pt`.
//!
//! Palavras funcionais que também são palavras portuguesas comuns
//! ("a", "do", "me", "no", "as") ficam fora do conjunto.
//!
//! Mensagem sem tokens não tem evidência: mantém o idioma anterior.

use crate::core::context::Language;

/// Razão mínima de palavras funcionais inglesas para classificar como `En`.
pub const EN_RATIO_THRESHOLD: f64 = 0.3;

const STRONG_EN_INDICATORS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "how are you",
    "i am",
    "i'm",
    "i want",
    "i need",
    "i would",
    "what is",
    "how much",
    "can you",
    "could you",
    "thank you",
    "thanks",
    "please",
];

const EN_FUNCTION_WORDS: &[&str] = &[
    "the", "an", "is", "are", "was", "were", "be", "to", "of", "and", "in", "on", "for", "with",
    "you", "your", "my", "i", "we", "it", "this", "that", "what", "how", "can", "want", "need",
    "would", "like", "have", "has", "does", "will", "about", "much", "many", "our", "from",
];

/// Detector de idioma sem estado.
#[derive(Clone, Copy, Debug, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detecta o idioma; sem tokens, devolve `prior`.
    pub fn detect(&self, text: &str, prior: Language) -> Language {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return prior;
        }

        let padded = format!(" {} ", tokens.join(" "));
        if STRONG_EN_INDICATORS
            .iter()
            .any(|phrase| padded.contains(&format!(" {phrase} ")))
        {
            return Language::En;
        }

        if english_ratio(&tokens) >= EN_RATIO_THRESHOLD {
            Language::En
        } else {
            Language::Pt
        }
    }
}

/// Tokens em lowercase sem pontuação de borda (apóstrofo interno preservado).
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .replace('\u{2019}', "'")
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn english_ratio(tokens: &[String]) -> f64 {
    let hits = tokens
        .iter()
        .filter(|t| EN_FUNCTION_WORDS.contains(&t.as_str()))
        .count();
    hits as f64 / tokens.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Language {
        LanguageDetector::new().detect(text, Language::Pt)
    }

    #[test]
    fn portuguese_messages() {
        assert_eq!(detect("Olá, meu nome é Ana"), Language::Pt);
        assert_eq!(detect("Quero saber o preço do desenvolvimento web"), Language::Pt);
        assert_eq!(detect("quanto custa um site?"), Language::Pt);
        assert_eq!(detect("me chama no whatsapp"), Language::Pt);
    }

    #[test]
    fn strong_indicators() {
        assert_eq!(detect("Hello!"), Language::En);
        assert_eq!(detect("I want a website"), Language::En);
        assert_eq!(detect("How much, please?"), Language::En);
        assert_eq!(detect("I\u{2019}m Bob"), Language::En);
    }

    #[test]
    fn indicators_are_word_bounded() {
        // "hi" dentro de "chip" e "this" não conta
        assert_eq!(detect("chip novo"), Language::Pt);
    }

    #[test]
    fn function_word_ratio() {
        assert_eq!(detect("the project is late"), Language::En);
        assert_eq!(detect("projeto e-commerce marketplace integração"), Language::Pt);
    }

    #[test]
    fn empty_keeps_prior() {
        let d = LanguageDetector::new();
        assert_eq!(d.detect("", Language::En), Language::En);
        assert_eq!(d.detect("  ?! ", Language::En), Language::En);
        assert_eq!(d.detect("", Language::Pt), Language::Pt);
    }

    #[test]
    fn detection_is_idempotent() {
        let d = LanguageDetector::new();
        for text in ["I need an app", "preciso de um app", "ok"] {
            let first = d.detect(text, Language::Pt);
            assert_eq!(d.detect(text, first), first);
        }
    }
}
