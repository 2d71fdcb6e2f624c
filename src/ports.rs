//! # Portas — Dependências Externas do Motor
//!
//! O orquestrador não lê relógio, locale nem disco diretamente: recebe
//! implementações destas traits na construção.
//!
//! | Porta | Produção | Testes |
//! |-------|----------|--------|
//! | [`Clock`] | [`SystemClock`] | [`FixedClock`] |
//! | [`LocaleSource`] | [`EnvLocale`] | [`FixedLocale`] |
//! | [`PreferenceStore`] | `JsonFileStore` | `MemoryStore` |

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::core::context::Language;

/// Fonte de tempo.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Relógio controlado manualmente.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Idioma preferido do ambiente (navegador/SO).
pub trait LocaleSource: Send + Sync {
    fn current_language(&self) -> Language;
}

/// Lê `LC_ALL`, `LC_MESSAGES` ou `LANG`, nessa ordem.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvLocale;

impl LocaleSource for EnvLocale {
    fn current_language(&self) -> Language {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .map(|tag| Language::from_locale_tag(&tag))
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedLocale(pub Language);

impl LocaleSource for FixedLocale {
    fn current_language(&self) -> Language {
        self.0
    }
}

/// Armazenamento chave-valor de preferências. Valores são JSON.
///
/// Escrita é fire-and-forget: falhas são responsabilidade do adaptador
/// (logar e seguir), nunca do pipeline.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let start = Utc::now();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now(), start + Duration::seconds(5));
        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn fixed_locale() {
        assert_eq!(FixedLocale(Language::En).current_language(), Language::En);
    }
}
