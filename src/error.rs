//! # Erros do Motor de Conversa
//!
//! O pipeline de mensagens nunca falha por causa de entrada do usuário;
//! só as bordas (export/import, disco, configuração) retornam [`ChatError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("falha de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    /// O JSON é válido mas não descreve uma conversa aceitável.
    #[error("importação rejeitada: {0}")]
    InvalidImport(String),

    #[error("configuração inválida: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
