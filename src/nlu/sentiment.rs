//! # Análise de Sentimento por Léxico
//!
//! Conta quantas entradas do léxico positivo e do negativo aparecem na
//! mensagem (substring, case-insensitive). Mais positivas → `Positive`,
//! mais negativas → `Negative`, empate (inclusive 0 × 0) → `Neutral`.

use crate::core::message::Sentiment;

const POSITIVE_WORDS: &[&str] = &[
    "bom",
    "boa",
    "ótimo",
    "otimo",
    "excelente",
    "perfeito",
    "legal",
    "gostei",
    "adorei",
    "amei",
    "obrigado",
    "obrigada",
    "maravilhoso",
    "incrível",
    "incrivel",
    "good",
    "great",
    "excellent",
    "perfect",
    "love",
    "thanks",
    "thank you",
    "awesome",
    "amazing",
    "nice",
    "happy",
];

const NEGATIVE_WORDS: &[&str] = &[
    "ruim",
    "péssimo",
    "pessimo",
    "horrível",
    "horrivel",
    "problema",
    "difícil",
    "dificil",
    "caro",
    "chato",
    "frustrado",
    "frustrada",
    "decepcionado",
    "decepcionada",
    "bad",
    "terrible",
    "awful",
    "problem",
    "expensive",
    "hate",
    "difficult",
    "frustrated",
    "disappointed",
];

/// Classificador de sentimento sem estado.
#[derive(Clone, Copy, Debug, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// `(positivas, negativas)` encontradas no texto.
    pub fn counts(&self, text: &str) -> (usize, usize) {
        let lower = text.to_lowercase();
        let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
        let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
        (positive, negative)
    }

    pub fn analyze(&self, text: &str) -> Sentiment {
        let (positive, negative) = self.counts(text);
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_message() {
        assert_eq!(SentimentAnalyzer::new().analyze("Ótimo, adorei a proposta!"), Sentiment::Positive);
        assert_eq!(SentimentAnalyzer::new().analyze("great, thanks"), Sentiment::Positive);
    }

    #[test]
    fn negative_message() {
        assert_eq!(SentimentAnalyzer::new().analyze("achei muito caro e ruim"), Sentiment::Negative);
        assert_eq!(SentimentAnalyzer::new().analyze("this is terrible"), Sentiment::Negative);
    }

    #[test]
    fn balanced_or_empty_is_neutral() {
        let s = SentimentAnalyzer::new();
        assert_eq!(s.analyze(""), Sentiment::Neutral);
        assert_eq!(s.analyze("quero um site"), Sentiment::Neutral);
        assert_eq!(s.analyze("legal, mas caro"), Sentiment::Neutral);
    }

    #[test]
    fn counts_distinct_entries() {
        assert_eq!(SentimentAnalyzer::new().counts("ótimo ótimo"), (1, 0));
    }
}
