//! # Extrator de Identidade — Nome e Email do Lead
//!
//! O [`IdentityExtractor`] procura dois dados de contato em texto livre:
//!
//! | Dado | Estratégia | Exemplo |
//! |------|------------|---------|
//! | Nome | Frase de apresentação + palavra seguinte | "meu nome é **Ana**", "sou a **Ana**", "I'm **Bob**" |
//! | Email | Padrão `local@domínio.tld` | "ana.silva@empresa.com.br" |
//!
//! ## Filtros
//!
//! - Palavras que seguem a frase de apresentação mas não são nomes
//!   ("I'm **interested**", "sou **de**...") são descartadas via [`NOT_NAMES`]
//! - O nome capturado tem a primeira letra em maiúscula; o resto fica como digitado
//!
//! A extração roda sobre o texto original (não o lowercase) para preservar a
//! grafia do nome; as regexes são case-insensitive.

use regex::Regex;

use crate::core::context::CapturedIdentity;

/// Palavras que aparecem depois de "I'm"/"I am"/"me chamo" sem serem nomes.
const NOT_NAMES: &[&str] = &[
    "interested",
    "looking",
    "from",
    "here",
    "not",
    "just",
    "very",
    "so",
    "good",
    "fine",
    "new",
    "trying",
    "having",
    "planning",
    "the",
    "a",
    "an",
    "ok",
    "interessado",
    "interessada",
    "de",
    "da",
    "do",
    "um",
    "uma",
    "bem",
    "muito",
    "novo",
    "nova",
    "cliente",
];

/// Extrai nome e email de uma mensagem.
pub struct IdentityExtractor {
    /// Frase de apresentação seguida de uma palavra (grupo 1).
    name_re: Regex,
    email_re: Regex,
}

impl IdentityExtractor {
    pub fn new() -> Self {
        Self {
            name_re: Regex::new(
                r"(?i)\b(?:meu nome é|meu nome e|me chamo|pode me chamar de|(?:eu\s+)?sou(?:\s+(?:a|o))?|my name is|i['’]m|i am|call me)\s+(\p{L}+)",
            )
            .expect("regex de nome válida"),
            email_re: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                .expect("regex de email válida"),
        }
    }

    /// Nome apresentado na mensagem, capitalizado.
    pub fn extract_name(&self, text: &str) -> Option<String> {
        self.name_re
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str())
            .find(|word| word.chars().count() >= 2 && !NOT_NAMES.contains(&word.to_lowercase().as_str()))
            .map(capitalize)
    }

    /// Primeiro email da mensagem.
    pub fn extract_email(&self, text: &str) -> Option<String> {
        self.email_re.find(text).map(|m| m.as_str().to_string())
    }

    pub fn extract(&self, text: &str) -> CapturedIdentity {
        CapturedIdentity {
            name: self.extract_name(text),
            email: self.extract_email(text),
        }
    }
}

impl Default for IdentityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portuguese_introduction() {
        let ex = IdentityExtractor::new();
        assert_eq!(ex.extract_name("Olá, meu nome é Ana"), Some("Ana".into()));
        assert_eq!(ex.extract_name("me chamo joão"), Some("João".into()));
        assert_eq!(ex.extract_name("MEU NOME É Carla"), Some("Carla".into()));
    }

    #[test]
    fn sou_introduction() {
        let ex = IdentityExtractor::new();
        assert_eq!(ex.extract_name("sou Ana"), Some("Ana".into()));
        assert_eq!(ex.extract_name("Oi, sou a Ana"), Some("Ana".into()));
        assert_eq!(ex.extract_name("eu sou o Pedro"), Some("Pedro".into()));
        assert_eq!(ex.extract_name("sou de São Paulo"), None);
        assert_eq!(ex.extract_name("sou muito grato"), None);
    }

    #[test]
    fn english_introduction() {
        let ex = IdentityExtractor::new();
        assert_eq!(ex.extract_name("Hi, I'm bob"), Some("Bob".into()));
        assert_eq!(ex.extract_name("my name is Alice and I need an app"), Some("Alice".into()));
        assert_eq!(ex.extract_name("I\u{2019}m Bob"), Some("Bob".into()));
    }

    #[test]
    fn non_names_are_rejected() {
        let ex = IdentityExtractor::new();
        assert_eq!(ex.extract_name("I am interested in a website"), None);
        assert_eq!(ex.extract_name("I'm looking for a quote"), None);
        assert_eq!(ex.extract_name("quero um site"), None);
    }

    #[test]
    fn email_extraction() {
        let ex = IdentityExtractor::new();
        assert_eq!(
            ex.extract_email("pode escrever para ana.silva@empresa.com.br, obrigada"),
            Some("ana.silva@empresa.com.br".into())
        );
        assert_eq!(ex.extract_email("sem email aqui @ nada"), None);
    }

    #[test]
    fn extract_both() {
        let ex = IdentityExtractor::new();
        let id = ex.extract("meu nome é Ana, email ana@x.com");
        assert_eq!(id.name.as_deref(), Some("Ana"));
        assert_eq!(id.email.as_deref(), Some("ana@x.com"));
    }
}
