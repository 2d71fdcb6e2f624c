//! # Gerador de Respostas
//!
//! O [`ResponseGenerator`] transforma `(intent, contexto)` numa [`Reply`]:
//! texto no idioma da sessão, tipo de mensagem, quick replies e itens de
//! carrossel.
//!
//! ## Despacho
//!
//! ```text
//! Greeting       → saudação (personalizada se o nome é conhecido) + menu de serviços
//! Service(key)   → descrição + tecnologias + preço, carrossel de projetos
//! Pricing        → preço do serviço de interesse, ou tabela de todos
//! Timeline       → prazo do serviço de interesse (+ nota se urgência alta)
//! Contact        → canais de contato (+ confirmação do email capturado)
//! ProjectDetails → destaques do portfólio em carrossel
//! Qualification  → pergunta de porte/orçamento
//! Faq            → melhor FAQ por keywords, ou menu de FAQs
//! Default        → uma de três respostas do pool do sentimento (RNG)
//! ```
//!
//! O RNG é injetado (`StdRng`); com semente fixa a escolha é determinística.

/// Textos bilíngues das respostas.
pub mod templates;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::context::{ConversationContext, Language, Urgency};
use crate::core::knowledge_base::{KnowledgeBase, ServiceEntry, ServiceKey};
use crate::core::message::{CarouselItem, MessageKind, QuickReply, Sentiment};
use crate::nlu::intent::Intent;

/// Resposta gerada para um turno.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub message: String,
    pub kind: MessageKind,
    pub quick_replies: Vec<QuickReply>,
    pub carousel: Vec<CarouselItem>,
}

impl Reply {
    fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: MessageKind::Text,
            quick_replies: Vec::new(),
            carousel: Vec::new(),
        }
    }

    /// Anexa quick replies; o tipo vira `QuickReply` se ainda for texto.
    fn with_quick_replies(mut self, quick_replies: Vec<QuickReply>) -> Self {
        if !quick_replies.is_empty() && self.kind == MessageKind::Text {
            self.kind = MessageKind::QuickReply;
        }
        self.quick_replies = quick_replies;
        self
    }

    fn with_carousel(mut self, carousel: Vec<CarouselItem>) -> Self {
        if !carousel.is_empty() {
            self.kind = MessageKind::Carousel;
        }
        self.carousel = carousel;
        self
    }
}

pub struct ResponseGenerator {
    kb: Arc<KnowledgeBase>,
    rng: StdRng,
}

impl ResponseGenerator {
    pub fn new(kb: Arc<KnowledgeBase>, rng: StdRng) -> Self {
        Self { kb, rng }
    }

    /// `seed = None` usa entropia do SO.
    pub fn with_seed(kb: Arc<KnowledgeBase>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(kb, rng)
    }

    /// Gera a resposta. `text_lower` é a mensagem do turno (para o match de FAQ).
    pub fn generate(
        &mut self,
        intent: Intent,
        context: &ConversationContext,
        sentiment: Sentiment,
        text_lower: &str,
    ) -> Reply {
        let lang = context.language();
        match intent {
            Intent::Greeting => self.greeting(lang, context),
            Intent::Service(key) => self.service(lang, key),
            Intent::Pricing => self.pricing(lang, context),
            Intent::Timeline => self.timeline(lang, context),
            Intent::Contact => self.contact(lang, context),
            Intent::ProjectDetails => self.project_details(lang, context),
            Intent::Qualification => self.qualification(lang, context),
            Intent::Faq => self.faq(lang, text_lower),
            Intent::Default => self.fallback(lang, sentiment),
        }
    }

    fn greeting(&self, lang: Language, context: &ConversationContext) -> Reply {
        let message = templates::greeting(lang, self.kb.company().name, context.user_name());
        Reply::text(message).with_quick_replies(self.service_menu(lang))
    }

    fn service(&self, lang: Language, key: ServiceKey) -> Reply {
        let Some(entry) = self.kb.service(key) else {
            return Reply::text(templates::faq_menu(lang)).with_quick_replies(self.service_menu(lang));
        };
        let message = templates::service(
            lang,
            entry.name.get(lang),
            entry.description.get(lang),
            entry.technologies,
            entry.pricing.get(lang),
        );
        Reply::text(message)
            .with_carousel(carousel_for(entry, lang))
            .with_quick_replies(follow_ups(lang))
    }

    fn pricing(&self, lang: Language, context: &ConversationContext) -> Reply {
        let message = match self.interest(context) {
            Some(entry) => templates::pricing_for(
                lang,
                entry.name.get(lang),
                entry.pricing.get(lang),
                entry.timeline.get(lang),
            ),
            None => {
                let lines: Vec<String> = self
                    .kb
                    .services()
                    .iter()
                    .map(|s| format!("{} {}: {}", s.icon, s.name.get(lang), s.pricing.get(lang)))
                    .collect();
                templates::pricing_overview(lang, &lines)
            }
        };
        let quick_replies = vec![
            QuickReply::new(
                templates::tr(lang, "Quero um orçamento", "I want a quote"),
                templates::tr(lang, "Quero um orçamento", "I want a quote"),
            )
            .with_icon("📝"),
            QuickReply::new(
                templates::tr(lang, "Qual o prazo?", "What's the timeline?"),
                templates::tr(lang, "Qual o prazo?", "What's the timeline?"),
            )
            .with_icon("⏱️"),
            talk_to_specialist(lang),
        ];
        Reply::text(message).with_quick_replies(quick_replies)
    }

    fn timeline(&self, lang: Language, context: &ConversationContext) -> Reply {
        let mut message = match self.interest(context) {
            Some(entry) => templates::timeline_for(lang, entry.name.get(lang), entry.timeline.get(lang)),
            None => {
                let lines: Vec<String> = self
                    .kb
                    .services()
                    .iter()
                    .map(|s| format!("{} {}: {}", s.icon, s.name.get(lang), s.timeline.get(lang)))
                    .collect();
                templates::timeline_overview(lang, &lines)
            }
        };
        if context.urgency() == Urgency::High {
            message.push_str(templates::urgency_note(lang));
        }
        Reply::text(message).with_quick_replies(vec![
            QuickReply::new(
                templates::tr(lang, "Quanto custa?", "How much does it cost?"),
                templates::tr(lang, "Quanto custa?", "How much does it cost?"),
            )
            .with_icon("💰"),
            talk_to_specialist(lang),
        ])
    }

    fn contact(&self, lang: Language, context: &ConversationContext) -> Reply {
        let company = self.kb.company();
        let mut message = templates::contact(
            lang,
            company.email,
            company.phone,
            company.whatsapp,
            company.hours.get(lang),
        );
        match context.user_email() {
            Some(email) => message.push_str(&templates::contact_confirm(lang, email)),
            None => message.push_str(templates::contact_ask_email(lang)),
        }
        Reply::text(message)
    }

    fn project_details(&self, lang: Language, context: &ConversationContext) -> Reply {
        let company = self.kb.company();
        let message = templates::project_details(lang, company.projects_delivered, company.founded);
        let carousel = match self.interest(context) {
            Some(entry) => carousel_for(entry, lang),
            None => self
                .kb
                .services()
                .iter()
                .filter_map(|s| s.sample_projects.first().map(|p| (s, p)))
                .map(|(s, p)| CarouselItem {
                    title: format!("{} {}", s.icon, p.name),
                    subtitle: p.summary.get(lang).to_string(),
                })
                .collect(),
        };
        Reply::text(message)
            .with_carousel(carousel)
            .with_quick_replies(follow_ups(lang))
    }

    fn qualification(&self, lang: Language, context: &ConversationContext) -> Reply {
        Reply::text(templates::qualification(lang, context.user_name()))
    }

    fn faq(&self, lang: Language, text_lower: &str) -> Reply {
        match self.kb.match_faq(text_lower) {
            Some(faq) => Reply::text(faq.answer.get(lang)),
            None => {
                let quick_replies = self
                    .kb
                    .faqs()
                    .iter()
                    .map(|f| QuickReply::new(f.question.get(lang), f.question.get(lang)).with_icon("❓"))
                    .collect();
                Reply::text(templates::faq_menu(lang)).with_quick_replies(quick_replies)
            }
        }
    }

    fn fallback(&mut self, lang: Language, sentiment: Sentiment) -> Reply {
        let pool = templates::default_pool(lang, sentiment);
        let message = pool[self.rng.random_range(0..pool.len())];
        Reply::text(message).with_quick_replies(self.service_menu(lang))
    }

    fn interest(&self, context: &ConversationContext) -> Option<&ServiceEntry> {
        context.service_interest().and_then(|key| self.kb.service(key))
    }

    /// Um botão por serviço; o payload é classificado como aquele serviço.
    fn service_menu(&self, lang: Language) -> Vec<QuickReply> {
        self.kb
            .services()
            .iter()
            .map(|s| {
                let name = s.name.get(lang);
                let payload = match lang {
                    Language::Pt => format!("Quero saber sobre {name}"),
                    Language::En => format!("Tell me about {name}"),
                };
                QuickReply::new(name, payload).with_icon(s.icon)
            })
            .collect()
    }
}

fn carousel_for(entry: &ServiceEntry, lang: Language) -> Vec<CarouselItem> {
    entry
        .sample_projects
        .iter()
        .map(|p| CarouselItem {
            title: p.name.to_string(),
            subtitle: p.summary.get(lang).to_string(),
        })
        .collect()
}

fn follow_ups(lang: Language) -> Vec<QuickReply> {
    vec![
        QuickReply::new(
            templates::tr(lang, "Quanto custa?", "How much does it cost?"),
            templates::tr(lang, "Quanto custa?", "How much does it cost?"),
        )
        .with_icon("💰"),
        QuickReply::new(
            templates::tr(lang, "Qual o prazo?", "What's the timeline?"),
            templates::tr(lang, "Qual o prazo?", "What's the timeline?"),
        )
        .with_icon("⏱️"),
        talk_to_specialist(lang),
    ]
}

fn talk_to_specialist(lang: Language) -> QuickReply {
    QuickReply::new(
        templates::tr(lang, "Falar com especialista", "Talk to a specialist"),
        templates::tr(lang, "Quero falar com um especialista", "I want to talk to a specialist"),
    )
    .with_icon("👤")
}
