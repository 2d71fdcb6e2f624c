//! # Orquestrador — Pipeline de uma Sessão de Conversa
//!
//! O [`Orchestrator`] é dono de **uma** sessão: contexto, log de mensagens,
//! gerador de respostas e barramento de eventos. Não há estado global; a
//! camada web guarda cada orquestrador atrás de um `parking_lot::Mutex`.
//!
//! ## Ciclo de um Turno
//!
//! ```text
//! submit_message(texto)
//!   ├── 1. NFC + trim; vazio → None (nada muda, nenhum evento)
//!   ├── 2. NLU: sentimento, idioma, identidade, intent
//!   ├── 3. Troca de idioma? → contexto + preferência + log
//!   ├── 4. Anexa mensagem do usuário           → ChatEvent::Message
//!   ├── 5. ConversationContext::update         → ChatEvent::Context
//!   ├── 6. ResponseGenerator::generate
//!   └── 7. PendingReply com atraso de digitação → ChatEvent::Typing
//!
//! deliver_reply(pending)
//!   └── sessão ainda é a mesma? → anexa mensagem do bot → ChatEvent::Message
//! ```
//!
//! A resposta só entra no log quando é entregue: quem chama decide o
//! atraso (a web agenda um timer tokio). [`respond`](Orchestrator::respond)
//! faz as duas etapas de uma vez.
//!
//! ## Versão
//!
//! Toda mudança observável incrementa `version`; eventos e
//! [`Snapshot`]s carregam a versão em que foram produzidos.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::EngineSettings;
use crate::core::context::{ConversationContext, ConversationStage, Language};
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::lead_score::{LeadScorer, LeadTier};
use crate::core::message::{ChatMessage, MessageLog, MessageMetadata, Sender, Sentiment};
use crate::error::{ChatError, Result};
use crate::events::{ChatEvent, ContextView};
use crate::nlu::NluPipeline;
use crate::persistence::{load_json, save_json, LANGUAGE_KEY, USER_NAME_KEY};
use crate::ports::{Clock, LocaleSource, PreferenceStore};
use crate::response::ResponseGenerator;

/// Capacidade do canal de eventos; assinantes lentos perdem os mais antigos.
const EVENT_CAPACITY: usize = 256;

/// Dependências externas de uma sessão.
#[derive(Clone)]
pub struct Ports {
    pub clock: Arc<dyn Clock>,
    pub locale: Arc<dyn LocaleSource>,
    pub store: Arc<dyn PreferenceStore>,
}

/// Resposta do bot calculada mas ainda não anexada ao log.
#[derive(Clone, Debug)]
pub struct PendingReply {
    pub message: ChatMessage,
    /// Atraso de "digitando..." antes da entrega.
    pub delay: Duration,
    /// Sessão que originou a resposta; outra sessão → descartada.
    pub session_id: Uuid,
}

/// Visão consistente do estado num instante.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u64,
    pub messages: Vec<ChatMessage>,
    pub context: ContextView,
}

/// Formato de export/import de uma conversa.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationExport {
    pub session_id: Uuid,
    pub messages: MessageLog,
    pub context: ConversationContext,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// Estatísticas da conversa atual.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStats {
    pub session_id: Uuid,
    pub total_messages: usize,
    pub user_messages: usize,
    pub bot_messages: usize,
    /// Quantas respostas do bot por intent.
    pub intents: BTreeMap<String, usize>,
    pub sentiments: SentimentCounts,
    /// Média da confiança das respostas do bot (0 sem respostas).
    pub average_confidence: f64,
    pub lead_score: u32,
    pub lead_tier: LeadTier,
    pub stage: ConversationStage,
    pub language: Language,
}

pub struct Orchestrator {
    kb: Arc<KnowledgeBase>,
    nlu: Arc<NluPipeline>,
    responder: ResponseGenerator,
    scorer: LeadScorer,
    ports: Ports,
    settings: EngineSettings,
    context: ConversationContext,
    log: MessageLog,
    version: u64,
    events: broadcast::Sender<ChatEvent>,
}

impl Orchestrator {
    /// Abre uma sessão nova. O idioma vem da preferência salva, senão do locale.
    pub fn new(
        kb: Arc<KnowledgeBase>,
        nlu: Arc<NluPipeline>,
        ports: Ports,
        settings: EngineSettings,
    ) -> Self {
        let responder = ResponseGenerator::with_seed(kb.clone(), settings.rng_seed);
        let scorer = LeadScorer::new(settings.identity_award);
        let language = resolve_language(&ports);
        let context = ConversationContext::new(Uuid::new_v4(), language, ports.clock.now());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        tracing::info!(
            session_id = %context.session_id(),
            language = language.code(),
            "Sessão iniciada"
        );

        Self {
            kb,
            nlu,
            responder,
            scorer,
            ports,
            settings,
            context,
            log: MessageLog::new(),
            version: 0,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub fn session_id(&self) -> Uuid {
        self.context.session_id()
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.log.messages()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version,
            messages: self.log.messages().to_vec(),
            context: ContextView::from(&self.context),
        }
    }

    /// Processa a mensagem do usuário e calcula a resposta (sem anexá-la).
    ///
    /// Texto vazio ou só com espaços é ignorado: retorna `None`.
    pub fn submit_message(&mut self, text: &str) -> Option<PendingReply> {
        if NluPipeline::normalize(text).is_empty() {
            return None;
        }

        let now = self.ports.clock.now();
        let analysis = self.nlu.analyze(text, self.context.language());

        let previous_language = self.context.language();
        if analysis.language != previous_language {
            self.context.set_language(analysis.language);
            save_json(self.ports.store.as_ref(), LANGUAGE_KEY, &analysis.language);
            tracing::info!(
                session_id = %self.session_id(),
                from = previous_language.code(),
                to = analysis.language.code(),
                "Idioma da sessão alterado"
            );
        }

        let user_message = ChatMessage::user(analysis.text.clone(), analysis.sentiment, now);
        self.append(user_message);

        let changes = self.context.update(
            &analysis.lower,
            &analysis.identity,
            &self.kb,
            &self.scorer,
            now,
        );
        if changes.name_captured {
            if let Some(name) = self.context.user_name() {
                save_json(self.ports.store.as_ref(), USER_NAME_KEY, &name);
            }
        }
        self.publish_context();

        if analysis.language != previous_language {
            self.emit(ChatEvent::LanguageChanged {
                session_id: self.session_id(),
                from: previous_language,
                to: analysis.language,
            });
        }

        let classification = analysis.classification;
        let reply = self.responder.generate(
            classification.intent,
            &self.context,
            analysis.sentiment,
            &analysis.lower,
        );

        tracing::info!(
            session_id = %self.session_id(),
            intent = %classification.intent,
            score = classification.score,
            lead_score = self.context.lead_score(),
            lead_tier = ?self.context.lead_tier(),
            points = changes.points.total(),
            "Turno processado"
        );

        let metadata = MessageMetadata {
            intent: Some(classification.intent),
            score: Some(classification.score.round().clamp(0.0, 100.0) as u8),
            language: Some(self.context.language()),
            quick_replies: reply.quick_replies,
            carousel: reply.carousel,
        };
        let message = ChatMessage::bot(
            reply.message,
            reply.kind,
            classification.confidence,
            metadata,
            now,
        );
        let delay = self.typing_delay(message.text());

        self.emit(ChatEvent::Typing {
            session_id: self.session_id(),
            delay_ms: delay.as_millis() as u64,
        });

        Some(PendingReply {
            message,
            delay,
            session_id: self.session_id(),
        })
    }

    /// Anexa a resposta pendente. Retorna `false` se a sessão mudou desde o envio.
    pub fn deliver_reply(&mut self, reply: PendingReply) -> bool {
        if reply.session_id != self.session_id() {
            tracing::debug!(
                stale = %reply.session_id,
                current = %self.session_id(),
                "Resposta de sessão antiga descartada"
            );
            return false;
        }
        self.append(reply.message);
        true
    }

    /// `submit_message` + `deliver_reply` sem atraso. Retorna a mensagem do bot.
    pub fn respond(&mut self, text: &str) -> Option<ChatMessage> {
        let pending = self.submit_message(text)?;
        let message = pending.message.clone();
        self.deliver_reply(pending);
        Some(message)
    }

    /// Nova sessão: novo id, log vazio, contexto no default.
    pub fn clear_conversation(&mut self) {
        let previous = self.session_id();
        let language = resolve_language(&self.ports);
        self.log.clear();
        self.context = ConversationContext::new(Uuid::new_v4(), language, self.ports.clock.now());
        self.version += 1;

        tracing::info!(previous = %previous, session_id = %self.session_id(), "Conversa limpa");

        self.emit(ChatEvent::Cleared {
            session_id: self.session_id(),
        });
        self.publish_context();
    }

    /// Atribuição externa de estágio do funil.
    pub fn set_stage(&mut self, stage: ConversationStage) {
        self.context.set_stage(stage);
        tracing::info!(session_id = %self.session_id(), stage = ?stage, "Estágio atribuído");
        self.publish_context();
    }

    /// Locale do ambiente mudou. Não bloqueia a detecção por mensagem.
    pub fn apply_locale_change(&mut self, language: Language) {
        let previous = self.context.language();
        save_json(self.ports.store.as_ref(), LANGUAGE_KEY, &language);
        if previous == language {
            return;
        }
        self.context.set_language(language);
        tracing::info!(
            session_id = %self.session_id(),
            from = previous.code(),
            to = language.code(),
            "Idioma alterado pelo locale"
        );
        self.publish_context();
        self.emit(ChatEvent::LanguageChanged {
            session_id: self.session_id(),
            from: previous,
            to: language,
        });
    }

    pub fn search_messages(&self, query: &str) -> Vec<ChatMessage> {
        self.log.search(query).into_iter().cloned().collect()
    }

    pub fn stats(&self) -> ConversationStats {
        let messages = self.log.messages();
        let mut intents = BTreeMap::new();
        let mut sentiments = SentimentCounts::default();
        let mut confidence_sum = 0u64;
        let mut bot_messages = 0usize;

        for message in messages {
            match message.sender() {
                Sender::User => match message.sentiment().unwrap_or_default() {
                    Sentiment::Positive => sentiments.positive += 1,
                    Sentiment::Negative => sentiments.negative += 1,
                    Sentiment::Neutral => sentiments.neutral += 1,
                },
                Sender::Bot => {
                    bot_messages += 1;
                    confidence_sum += u64::from(message.confidence().unwrap_or(0));
                    if let Some(intent) = message.metadata().intent {
                        *intents.entry(intent.to_string()).or_insert(0) += 1;
                    }
                }
            }
        }

        let average_confidence = if bot_messages == 0 {
            0.0
        } else {
            confidence_sum as f64 / bot_messages as f64
        };

        ConversationStats {
            session_id: self.session_id(),
            total_messages: messages.len(),
            user_messages: messages.len() - bot_messages,
            bot_messages,
            intents,
            sentiments,
            average_confidence,
            lead_score: self.context.lead_score(),
            lead_tier: self.context.lead_tier(),
            stage: self.context.stage(),
            language: self.context.language(),
        }
    }

    /// JSON camelCase com `sessionId`, `messages` e `context`.
    pub fn export_conversation(&self) -> Result<String> {
        let export = ConversationExport {
            session_id: self.session_id(),
            messages: self.log.clone(),
            context: self.context.clone(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Substitui a sessão atual pela exportada.
    ///
    /// # Erros
    ///
    /// - [`ChatError::Json`] se o texto não é um export válido
    /// - [`ChatError::InvalidImport`] se `sessionId` diverge do contexto
    pub fn import_conversation(&mut self, json: &str) -> Result<()> {
        let export: ConversationExport = serde_json::from_str(json)?;
        if export.session_id != export.context.session_id() {
            return Err(ChatError::InvalidImport(format!(
                "sessionId {} difere do contexto {}",
                export.session_id,
                export.context.session_id()
            )));
        }

        self.log = export.messages;
        self.context = export.context;
        self.version += 1;
        save_json(self.ports.store.as_ref(), LANGUAGE_KEY, &self.context.language());

        tracing::info!(
            session_id = %self.session_id(),
            messages = self.log.len(),
            "Conversa importada"
        );
        self.publish_context();
        Ok(())
    }

    /// `chars × typing_ms_per_char`, limitado a `[typing_min_ms, typing_max_ms]`.
    pub fn typing_delay(&self, text: &str) -> Duration {
        let min = self.settings.typing_min_ms;
        let max = self.settings.typing_max_ms.max(min);
        let ms = (text.chars().count() as u64).saturating_mul(self.settings.typing_ms_per_char);
        Duration::from_millis(ms.clamp(min, max))
    }

    fn append(&mut self, message: ChatMessage) {
        self.log.append(message.clone());
        self.version += 1;
        self.emit(ChatEvent::Message {
            version: self.version,
            message,
        });
    }

    fn publish_context(&mut self) {
        self.version += 1;
        self.emit(ChatEvent::Context {
            version: self.version,
            context: ContextView::from(&self.context),
        });
    }

    fn emit(&self, event: ChatEvent) {
        // Sem assinantes o send falha; evento descartado.
        let _ = self.events.send(event);
    }
}

/// Preferência salva → locale. O resultado é gravado de volta.
fn resolve_language(ports: &Ports) -> Language {
    let language = load_json::<Language>(ports.store.as_ref(), LANGUAGE_KEY)
        .unwrap_or_else(|| ports.locale.current_language());
    save_json(ports.store.as_ref(), LANGUAGE_KEY, &language);
    language
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Urgency;
    use crate::core::knowledge_base::ServiceKey;
    use crate::core::message::MessageKind;
    use crate::nlu::intent::Intent;
    use crate::persistence::MemoryStore;
    use crate::ports::{FixedClock, FixedLocale};
    use chrono::Utc;

    fn engine_with(store: Arc<MemoryStore>, locale: Language) -> Orchestrator {
        let kb = Arc::new(KnowledgeBase::builtin());
        let nlu = Arc::new(NluPipeline::new(&kb));
        let ports = Ports {
            clock: Arc::new(FixedClock::new(Utc::now())),
            locale: Arc::new(FixedLocale(locale)),
            store,
        };
        let settings = EngineSettings {
            rng_seed: Some(7),
            ..EngineSettings::default()
        };
        Orchestrator::new(kb, nlu, ports, settings)
    }

    fn engine() -> Orchestrator {
        engine_with(Arc::new(MemoryStore::new()), Language::Pt)
    }

    #[test]
    fn reference_sequence() {
        let mut e = engine();
        e.respond("Olá, meu nome é Ana").unwrap();
        assert_eq!(e.context().user_name(), Some("Ana"));
        assert_eq!(e.context().lead_score(), 10);

        e.respond("Quero saber o preço do desenvolvimento web").unwrap();
        assert_eq!(e.context().service_interest(), Some(ServiceKey::Web));
        assert_eq!(e.context().stage(), ConversationStage::Discovery);
        assert_eq!(e.context().lead_score(), 35);
    }

    #[test]
    fn empty_input_is_noop() {
        let mut e = engine();
        let mut rx = e.subscribe();
        assert!(e.submit_message("   \n\t").is_none());
        assert!(e.messages().is_empty());
        assert_eq!(e.version(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn pricing_reply_metadata() {
        let mut e = engine();
        let bot = e.respond("quanto custa um site?").unwrap();
        assert_eq!(bot.sender(), Sender::Bot);
        assert_eq!(bot.metadata().intent, Some(Intent::Pricing));
        assert!(bot.metadata().score.unwrap() > 0);
        assert!(bot.confidence().unwrap() >= 85);
        assert_eq!(e.messages().len(), 2);
        assert_eq!(e.messages()[0].sender(), Sender::User);
    }

    #[test]
    fn lead_score_never_decreases() {
        let mut e = engine();
        let mut last = 0;
        for text in [
            "oi",
            "quero um app",
            "quanto custa?",
            "isso é caro e ruim",
            "meu email é ana@empresa.com",
            "asdkjasdj",
            "tchau",
        ] {
            e.respond(text);
            assert!(e.context().lead_score() >= last);
            last = e.context().lead_score();
        }
    }

    #[test]
    fn export_then_import_round_trips() {
        let mut e = engine();
        e.respond("oi, me chamo Bruno");
        e.respond("preciso de uma loja virtual urgente");
        let json = e.export_conversation().unwrap();

        let mut fresh = engine();
        fresh.import_conversation(&json).unwrap();
        assert_eq!(fresh.messages(), e.messages());
        assert_eq!(fresh.context(), e.context());
        assert_eq!(fresh.context().urgency(), Urgency::High);
    }

    #[test]
    fn import_rejects_malformed_and_inconsistent() {
        let mut e = engine();
        assert!(matches!(e.import_conversation("{nope"), Err(ChatError::Json(_))));

        let other = engine();
        let mut export: serde_json::Value =
            serde_json::from_str(&other.export_conversation().unwrap()).unwrap();
        export["sessionId"] = serde_json::Value::String(Uuid::new_v4().to_string());
        assert!(matches!(
            e.import_conversation(&export.to_string()),
            Err(ChatError::InvalidImport(_))
        ));
    }

    #[test]
    fn clear_resets_session() {
        let mut e = engine();
        e.respond("quero um site, meu email é x@y.com");
        assert!(e.context().lead_score() > 0);
        let old = e.session_id();

        e.clear_conversation();
        assert_ne!(e.session_id(), old);
        assert_eq!(e.context().lead_score(), 0);
        assert!(e.messages().is_empty());
        assert_eq!(e.context().stage(), ConversationStage::Greeting);
    }

    #[test]
    fn stale_reply_is_dropped() {
        let mut e = engine();
        let pending = e.submit_message("oi").unwrap();
        e.clear_conversation();
        assert!(!e.deliver_reply(pending));
        assert!(e.messages().is_empty());
    }

    #[test]
    fn pending_reply_is_not_logged_until_delivered() {
        let mut e = engine();
        let pending = e.submit_message("oi").unwrap();
        assert_eq!(e.messages().len(), 1);
        assert_eq!(pending.session_id, e.session_id());
        assert!(e.deliver_reply(pending));
        assert_eq!(e.messages().len(), 2);
    }

    #[test]
    fn typing_delay_is_clamped() {
        let e = engine();
        let s = EngineSettings::default();
        assert_eq!(e.typing_delay("oi"), Duration::from_millis(s.typing_min_ms));
        assert_eq!(e.typing_delay(&"x".repeat(10_000)), Duration::from_millis(s.typing_max_ms));
        assert_eq!(e.typing_delay(&"x".repeat(50)), Duration::from_millis(50 * s.typing_ms_per_char));
    }

    #[test]
    fn language_resolution_prefers_saved_preference() {
        let store = Arc::new(MemoryStore::new());
        store.set(LANGUAGE_KEY, "\"en\"");
        let e = engine_with(store, Language::Pt);
        assert_eq!(e.context().language(), Language::En);
    }

    #[test]
    fn corrupt_preference_falls_back_to_locale_and_is_rewritten() {
        let store = Arc::new(MemoryStore::new());
        store.set(LANGUAGE_KEY, "{garbage");
        let e = engine_with(store.clone(), Language::En);
        assert_eq!(e.context().language(), Language::En);
        assert_eq!(store.get(LANGUAGE_KEY).as_deref(), Some("\"en\""));
    }

    #[test]
    fn language_switch_is_persisted() {
        let store = Arc::new(MemoryStore::new());
        let mut e = engine_with(store.clone(), Language::Pt);
        let bot = e.respond("Hello, I need a website").unwrap();
        assert_eq!(e.context().language(), Language::En);
        assert_eq!(bot.metadata().language, Some(Language::En));
        assert_eq!(store.get(LANGUAGE_KEY).as_deref(), Some("\"en\""));
    }

    #[test]
    fn captured_name_is_saved() {
        let store = Arc::new(MemoryStore::new());
        let mut e = engine_with(store.clone(), Language::Pt);
        e.respond("me chamo carla");
        assert_eq!(store.get(USER_NAME_KEY).as_deref(), Some("\"Carla\""));
    }

    #[test]
    fn locale_change_updates_session() {
        let mut e = engine();
        e.apply_locale_change(Language::En);
        assert_eq!(e.context().language(), Language::En);
        // a detecção por mensagem continua valendo
        e.respond("quero um site para minha empresa");
        assert_eq!(e.context().language(), Language::Pt);
    }

    #[test]
    fn set_stage_and_search() {
        let mut e = engine();
        e.respond("quero um site");
        e.set_stage(ConversationStage::Proposal);
        assert_eq!(e.context().stage(), ConversationStage::Proposal);
        let found = e.search_messages("SITE");
        assert!(!found.is_empty());
        assert!(found.iter().all(|m| m.text().to_lowercase().contains("site")));
    }

    #[test]
    fn stats_count_messages() {
        let mut e = engine();
        e.respond("oi");
        e.respond("ótimo, quero um app");
        let stats = e.stats();
        assert_eq!(stats.total_messages, 4);
        assert_eq!(stats.user_messages, 2);
        assert_eq!(stats.bot_messages, 2);
        assert_eq!(stats.intents.get("greeting"), Some(&1));
        assert_eq!(stats.sentiments.positive, 1);
        assert!(stats.average_confidence >= 85.0);
    }

    #[test]
    fn snapshot_version_is_monotonic() {
        let mut e = engine();
        let v0 = e.snapshot().version;
        e.respond("oi");
        let v1 = e.snapshot().version;
        e.set_stage(ConversationStage::Closing);
        let v2 = e.snapshot().version;
        assert!(v0 < v1 && v1 < v2);
        assert_eq!(e.snapshot().messages.len(), 2);
    }

    #[tokio::test]
    async fn events_follow_append_order() {
        let mut e = engine();
        let mut rx = e.subscribe();
        let pending = e.submit_message("oi").unwrap();
        e.deliver_reply(pending);

        let mut names = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let ChatEvent::Message { message, .. } = &event {
                names.push(format!("Message:{:?}", message.sender()));
            } else {
                names.push(event.name().to_string());
            }
        }
        assert_eq!(
            names,
            vec!["Message:User", "Context", "Typing", "Message:Bot"]
        );
    }

    #[tokio::test]
    async fn carousel_kind_for_service() {
        let mut e = engine();
        let mut rx = e.subscribe();
        let bot = e.respond("preciso de um aplicativo").unwrap();
        assert_eq!(bot.kind(), MessageKind::Carousel);
        let first = rx.recv().await.unwrap();
        assert_eq!(first.name(), "Message");
    }
}
