//! # Estado da Aplicação Web
//!
//! ```text
//! AppState (Clone, barato)
//!  ├── orchestrator: Arc<Mutex<Orchestrator>>   sessão única do widget
//!  └── pending: Arc<Mutex<Option<JoinHandle>>>  entrega agendada da resposta
//! ```
//!
//! Enquanto `pending` guarda uma task não terminada, a sessão está
//! **ocupada** e `/chat` responde 409. `/clear` aborta a task.
//!
//! Ordem de lock: `pending` antes de `orchestrator`. A task de entrega só
//! trava o orquestrador.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::core::message::ChatMessage;
use crate::orchestrator::Orchestrator;

/// Resultado de [`AppState::try_submit`].
#[derive(Debug)]
pub enum Submission {
    /// Texto vazio; nada aconteceu.
    Ignored,
    /// Já existe uma resposta pendente.
    Busy,
    /// Mensagem aceita; a resposta chega em `delay`.
    Accepted {
        user_message: ChatMessage,
        delay: Duration,
    },
}

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Mutex<Orchestrator>>,
    /// Task que entrega a resposta pendente depois do atraso de digitação.
    pub pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// `true` se há uma resposta agendada ainda não entregue.
    pub fn is_busy(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Envia a mensagem e agenda a entrega da resposta.
    ///
    /// Checagem de ocupado, envio e agendamento acontecem sob o lock de
    /// `pending`: duas requisições simultâneas nunca passam juntas.
    /// Deve ser chamado de dentro do runtime tokio.
    pub fn try_submit(&self, text: &str) -> Submission {
        let mut pending = self.pending.lock();
        if pending.as_ref().is_some_and(|task| !task.is_finished()) {
            return Submission::Busy;
        }

        let (reply, user_message) = {
            let mut orchestrator = self.orchestrator.lock();
            let Some(reply) = orchestrator.submit_message(text) else {
                return Submission::Ignored;
            };
            let Some(user_message) = orchestrator.messages().last().cloned() else {
                return Submission::Ignored;
            };
            (reply, user_message)
        };

        let delay = reply.delay;
        let orchestrator = self.orchestrator.clone();
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(reply.delay).await;
            orchestrator.lock().deliver_reply(reply);
        }));

        Submission::Accepted {
            user_message,
            delay,
        }
    }

    /// Aborta a entrega agendada, se houver.
    pub fn cancel_pending(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
            tracing::debug!("Resposta pendente cancelada");
        }
    }
}
