//! # Lead Chat — Motor de Conversa para Captação de Leads
//!
//! Widget de chat de uma agência digital: classifica a intenção de cada
//! mensagem por palavras-chave, responde a partir de uma base de
//! conhecimento fixa (pt/en) e acumula um lead score por sessão.
//!
//! ## Camadas
//!
//! ```text
//! web (axum + htmx + maud + SSE)
//!   └── orchestrator          ciclo de turno, eventos, export/import
//!         ├── nlu             intent, sentimento, idioma, identidade
//!         ├── response        texto da resposta + quick replies
//!         ├── core            KB, contexto, lead score, mensagens
//!         └── ports           relógio, locale, preferências
//! ```

/// Configuração em camadas (arquivo + ambiente).
pub mod config;

/// Tipos fundamentais do domínio.
pub mod core;

pub mod error;

/// Eventos publicados a cada mudança observável da conversa.
pub mod events;

/// Pipeline de compreensão de linguagem natural.
pub mod nlu;

/// Orquestra o ciclo de cada turno da conversa.
pub mod orchestrator;

/// Preferências persistidas (memória ou arquivo JSON).
pub mod persistence;

/// Portas para o ambiente: relógio, locale, armazenamento.
pub mod ports;

/// Geração das respostas do bot.
pub mod response;

/// Servidor web axum, handlers HTTP, templates e SSE.
pub mod web;
