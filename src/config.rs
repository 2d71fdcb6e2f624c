//! # Configuração
//!
//! [`Settings`] é montado em camadas, da menos para a mais prioritária:
//!
//! 1. Defaults embutidos ([`Settings::default`])
//! 2. Arquivo `config/default.{toml,json,yaml}` (opcional)
//! 3. Variáveis de ambiente `LEAD_CHAT__<SEÇÃO>__<CAMPO>`
//!    (ex: `LEAD_CHAT__SERVER__PORT=8080`)
//!
//! `main` chama `dotenvy::dotenv()` antes, então um `.env` local também vale.

use serde::{Deserialize, Serialize};

use crate::core::lead_score::IdentityAward;
use crate::error::Result;

/// Endereço do servidor HTTP.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Parâmetros do motor de conversa.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Atraso de "digitando..." por caractere da resposta.
    pub typing_ms_per_char: u64,
    pub typing_min_ms: u64,
    pub typing_max_ms: u64,
    /// Semente do RNG das respostas; `None` → entropia do SO.
    pub rng_seed: Option<u64>,
    pub identity_award: IdentityAward,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            typing_ms_per_char: 30,
            typing_min_ms: 800,
            typing_max_ms: 3000,
            rng_seed: None,
            identity_award: IdentityAward::PerMention,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Arquivo JSON das preferências do usuário.
    pub preferences_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            preferences_path: "data/preferences.json".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub engine: EngineSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Carrega as camadas de configuração.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("LEAD_CHAT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
