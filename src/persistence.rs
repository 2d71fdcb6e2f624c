//! # Persistência — Adaptadores de [`PreferenceStore`]
//!
//! Dois adaptadores para o contrato get/set de preferências:
//!
//! - [`MemoryStore`] — `HashMap` em memória (testes, sessões efêmeras)
//! - [`JsonFileStore`] — um objeto JSON em disco, carregado na abertura
//!   e regravado a cada `set`
//!
//! ## Atomicidade
//!
//! O `JsonFileStore` escreve num arquivo temporário ao lado do destino e
//! faz `rename`: um crash no meio da escrita nunca deixa o arquivo
//! truncado. Last-write-wins.
//!
//! Os valores guardados são texto JSON; [`load_json`] / [`save_json`]
//! fazem a (de)serialização tipada e tratam JSON corrompido como ausente.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ports::PreferenceStore;

/// Chave da preferência de idioma.
pub const LANGUAGE_KEY: &str = "chat.language";
/// Chave do nome capturado (somente escrita).
pub const USER_NAME_KEY: &str = "chat.userName";

/// Lê e desserializa uma preferência. JSON inválido → `warn!` + `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn PreferenceStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Preferência corrompida, ignorando");
            None
        }
    }
}

/// Serializa e grava uma preferência (fire-and-forget).
pub fn save_json<T: Serialize>(store: &dyn PreferenceStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, &raw),
        Err(e) => tracing::warn!(key, error = %e, "Falha ao serializar preferência"),
    }
}

/// Preferências em memória.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }
}

/// Preferências num arquivo JSON (`{"chave": "valor-json", ...}`).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Abre o arquivo; ausente → store vazio. Conteúdo corrompido também
    /// começa vazio (com `warn!`); a próxima escrita o substitui.
    ///
    /// # Erros
    ///
    /// Retorna erro se o arquivo existir mas não puder ser lido.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Falha ao ler {}", path.display()))?;
            match serde_json::from_str(&json) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Arquivo de preferências corrompido, iniciando vazio");
                    BTreeMap::new()
                }
            }
        } else {
            tracing::info!(path = %path.display(), "Nenhum arquivo de preferências, iniciando vazio");
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Grava o mapa inteiro: temp file + rename.
    fn flush(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Falha ao criar diretório {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(values).context("Falha ao serializar preferências")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Falha ao escrever {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Falha ao renomear para {}", self.path.display()))?;
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write();
        values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&values) {
            tracing::warn!(key, error = %e, "Falha ao persistir preferência");
        }
    }
}
