//! # KnowledgeBase — Catálogo Estático de Serviços, FAQs e Empresa
//!
//! A [`KnowledgeBase`] é o **catálogo imutável** que alimenta o classificador
//! de intenção e os templates de resposta. É construída uma única vez na
//! inicialização e compartilhada por todas as sessões via `Arc`.
//!
//! ## Conteúdo
//!
//! - **Serviços**: um [`ServiceEntry`] por [`ServiceKey`], com keywords,
//!   descrição, tecnologias, projetos de exemplo, preço e prazo
//! - **FAQs**: perguntas frequentes com keywords próprias
//! - **Fatos da empresa**: contato, horário, números institucionais
//!
//! ## Ordem de Declaração
//!
//! A ordem dos serviços em [`ServiceKey::ALL`] **é semântica**: define o
//! desempate do [`IntentClassifier`](crate::nlu::intent::IntentClassifier)
//! e a regra "primeiro match vence" do interesse de serviço. Reordenar o
//! catálogo muda silenciosamente a classificação.
//!
//! ## Textos Bilíngues
//!
//! Todo texto exibido ao usuário é um [`Localized`] com variantes `pt` e `en`,
//! escolhidas pelo idioma da sessão no momento da resposta.

use serde::{Deserialize, Serialize};

use super::context::Language;

/// Chave de serviço do catálogo.
///
/// Serializada em `snake_case` (`"web"`, `"ecommerce"`...), que é também o
/// formato exportado no contexto da conversa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKey {
    /// Sites, landing pages e portais.
    Web,
    /// Aplicativos Android/iOS.
    Mobile,
    /// Lojas virtuais.
    Ecommerce,
    /// Inteligência artificial, chatbots e automação.
    Ai,
    /// UX/UI e identidade visual.
    Design,
    /// Consultoria e transformação digital.
    Consulting,
}

impl ServiceKey {
    /// Todas as chaves, na ordem de declaração do catálogo.
    pub const ALL: [ServiceKey; 6] = [
        ServiceKey::Web,
        ServiceKey::Mobile,
        ServiceKey::Ecommerce,
        ServiceKey::Ai,
        ServiceKey::Design,
        ServiceKey::Consulting,
    ];

    /// Identificador estável usado em payloads de quick reply e logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKey::Web => "web",
            ServiceKey::Mobile => "mobile",
            ServiceKey::Ecommerce => "ecommerce",
            ServiceKey::Ai => "ai",
            ServiceKey::Design => "design",
            ServiceKey::Consulting => "consulting",
        }
    }
}

/// Texto com variantes em português e inglês.
#[derive(Clone, Copy, Debug)]
pub struct Localized {
    pub pt: &'static str,
    pub en: &'static str,
}

impl Localized {
    /// Retorna a variante do idioma pedido.
    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::Pt => self.pt,
            Language::En => self.en,
        }
    }
}

/// Projeto de portfólio exibido como item de carrossel.
#[derive(Clone, Copy, Debug)]
pub struct SampleProject {
    pub name: &'static str,
    pub summary: Localized,
}

/// Entrada de serviço do catálogo.
#[derive(Clone, Debug)]
pub struct ServiceEntry {
    pub key: ServiceKey,
    pub name: Localized,
    /// Emoji usado como ícone em quick replies.
    pub icon: &'static str,
    /// Keywords em lowercase, comparadas por substring.
    pub keywords: &'static [&'static str],
    pub description: Localized,
    pub technologies: &'static [&'static str],
    pub sample_projects: &'static [SampleProject],
    pub pricing: Localized,
    pub timeline: Localized,
}

impl ServiceEntry {
    /// `true` se alguma keyword do serviço ocorre no texto (já em lowercase).
    pub fn matches(&self, text_lower: &str) -> bool {
        self.keywords.iter().any(|k| text_lower.contains(k))
    }
}

/// Pergunta frequente com keywords próprias (match secundário).
#[derive(Clone, Debug)]
pub struct FaqEntry {
    pub question: Localized,
    pub answer: Localized,
    pub keywords: &'static [&'static str],
}

impl FaqEntry {
    /// Quantas keywords desta FAQ ocorrem no texto (já em lowercase).
    pub fn hits(&self, text_lower: &str) -> usize {
        self.keywords.iter().filter(|k| text_lower.contains(*k)).count()
    }
}

/// Fatos institucionais usados nos templates de contato e saudação.
#[derive(Clone, Debug)]
pub struct CompanyFacts {
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub whatsapp: &'static str,
    pub hours: Localized,
    pub founded: u16,
    pub projects_delivered: u32,
}

/// Catálogo imutável, lido por todas as sessões, nunca alterado em runtime.
#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    services: Vec<ServiceEntry>,
    faqs: Vec<FaqEntry>,
    company: CompanyFacts,
}

impl KnowledgeBase {
    /// Monta uma KB a partir de partes explícitas.
    ///
    /// A ordem de `services` é a ordem de desempate do classificador.
    pub fn new(services: Vec<ServiceEntry>, faqs: Vec<FaqEntry>, company: CompanyFacts) -> Self {
        Self {
            services,
            faqs,
            company,
        }
    }

    /// Catálogo embutido da agência.
    pub fn builtin() -> Self {
        let services = ServiceKey::ALL.iter().map(|k| builtin_service(*k)).collect();
        Self::new(services, builtin_faqs(), builtin_company())
    }

    /// Serviços na ordem de declaração.
    pub fn services(&self) -> &[ServiceEntry] {
        &self.services
    }

    /// Entrada de um serviço, se presente no catálogo.
    pub fn service(&self, key: ServiceKey) -> Option<&ServiceEntry> {
        self.services.iter().find(|s| s.key == key)
    }

    pub fn faqs(&self) -> &[FaqEntry] {
        &self.faqs
    }

    pub fn company(&self) -> &CompanyFacts {
        &self.company
    }

    /// Primeiro serviço (ordem do catálogo) cujas keywords ocorrem no texto.
    pub fn match_service(&self, text_lower: &str) -> Option<ServiceKey> {
        self.services
            .iter()
            .find(|s| s.matches(text_lower))
            .map(|s| s.key)
    }

    /// FAQ com mais keywords presentes no texto; empate fica com a primeira.
    ///
    /// Retorna `None` se nenhuma FAQ tiver ao menos um match.
    pub fn match_faq(&self, text_lower: &str) -> Option<&FaqEntry> {
        let mut best: Option<(&FaqEntry, usize)> = None;
        for faq in &self.faqs {
            let hits = faq.hits(text_lower);
            if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
                best = Some((faq, hits));
            }
        }
        best.map(|(faq, _)| faq)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

// ─── Dados embutidos ──────────────────────────────────────────────

fn builtin_service(key: ServiceKey) -> ServiceEntry {
    match key {
        ServiceKey::Web => ServiceEntry {
            key,
            name: Localized { pt: "Desenvolvimento Web", en: "Web Development" },
            icon: "🌐",
            keywords: &["site", "website", "web", "landing page", "página", "pagina", "portal", "blog"],
            description: Localized {
                pt: "Criamos sites institucionais, landing pages e portais rápidos, responsivos e otimizados para SEO.",
                en: "We build corporate websites, landing pages and portals that are fast, responsive and SEO-friendly.",
            },
            technologies: &["React", "Next.js", "Node.js", "TypeScript", "Tailwind CSS"],
            sample_projects: &[
                SampleProject {
                    name: "Portal Saúde+",
                    summary: Localized {
                        pt: "Portal de agendamentos com 40 mil acessos mensais.",
                        en: "Scheduling portal with 40k monthly visits.",
                    },
                },
                SampleProject {
                    name: "Landing Fintech Pay",
                    summary: Localized {
                        pt: "Landing page com conversão 3x maior.",
                        en: "Landing page with 3x higher conversion.",
                    },
                },
            ],
            pricing: Localized {
                pt: "a partir de R$ 3.500 (landing page) e R$ 8.000 (site institucional)",
                en: "from R$ 3,500 (landing page) and R$ 8,000 (corporate website)",
            },
            timeline: Localized { pt: "2 a 6 semanas", en: "2 to 6 weeks" },
        },
        ServiceKey::Mobile => ServiceEntry {
            key,
            name: Localized { pt: "Aplicativos Mobile", en: "Mobile Apps" },
            icon: "📱",
            keywords: &["app", "aplicativo", "mobile", "android", "iphone", "celular", "smartphone"],
            description: Localized {
                pt: "Desenvolvemos aplicativos nativos e multiplataforma para Android e iOS, do protótipo à publicação nas lojas.",
                en: "We develop native and cross-platform apps for Android and iOS, from prototype to store release.",
            },
            technologies: &["Flutter", "React Native", "Kotlin", "Swift", "Firebase"],
            sample_projects: &[
                SampleProject {
                    name: "FitTrack",
                    summary: Localized {
                        pt: "App de treinos com 100 mil downloads.",
                        en: "Workout app with 100k downloads.",
                    },
                },
                SampleProject {
                    name: "Delivery Já",
                    summary: Localized {
                        pt: "App de delivery com rastreamento em tempo real.",
                        en: "Delivery app with real-time tracking.",
                    },
                },
            ],
            pricing: Localized {
                pt: "a partir de R$ 15.000",
                en: "from R$ 15,000",
            },
            timeline: Localized { pt: "2 a 4 meses", en: "2 to 4 months" },
        },
        ServiceKey::Ecommerce => ServiceEntry {
            key,
            name: Localized { pt: "E-commerce", en: "E-commerce" },
            icon: "🛒",
            keywords: &["loja virtual", "loja online", "e-commerce", "ecommerce", "vender online", "vendas online", "online store", "shop"],
            description: Localized {
                pt: "Montamos lojas virtuais completas com pagamentos, frete, gestão de estoque e integrações com marketplaces.",
                en: "We build complete online stores with payments, shipping, inventory management and marketplace integrations.",
            },
            technologies: &["Shopify", "WooCommerce", "VTEX", "Stripe", "Mercado Pago"],
            sample_projects: &[SampleProject {
                name: "Moda Raiz",
                summary: Localized {
                    pt: "Loja de moda sustentável com 2 mil pedidos/mês.",
                    en: "Sustainable fashion store with 2k orders/month.",
                },
            }],
            pricing: Localized {
                pt: "a partir de R$ 12.000",
                en: "from R$ 12,000",
            },
            timeline: Localized { pt: "1 a 3 meses", en: "1 to 3 months" },
        },
        ServiceKey::Ai => ServiceEntry {
            key,
            name: Localized { pt: "Inteligência Artificial", en: "Artificial Intelligence" },
            icon: "🤖",
            keywords: &[
                "inteligência artificial",
                "inteligencia artificial",
                "artificial intelligence",
                "chatbot",
                "automação",
                "automacao",
                "automation",
                "machine learning",
            ],
            description: Localized {
                pt: "Implementamos chatbots, automações e modelos de machine learning integrados aos seus sistemas.",
                en: "We implement chatbots, automations and machine learning models integrated with your systems.",
            },
            technologies: &["Python", "OpenAI", "LangChain", "TensorFlow", "Rust"],
            sample_projects: &[SampleProject {
                name: "Atende Bot",
                summary: Localized {
                    pt: "Chatbot que resolve 70% dos atendimentos sem humano.",
                    en: "Chatbot resolving 70% of support requests unassisted.",
                },
            }],
            pricing: Localized {
                pt: "a partir de R$ 10.000",
                en: "from R$ 10,000",
            },
            timeline: Localized { pt: "1 a 3 meses", en: "1 to 3 months" },
        },
        ServiceKey::Design => ServiceEntry {
            key,
            name: Localized { pt: "Design UX/UI", en: "UX/UI Design" },
            icon: "🎨",
            keywords: &["design", "ux/ui", "ui/ux", "identidade visual", "logotipo", "logomarca", "layout", "protótipo", "prototipo", "prototype"],
            description: Localized {
                pt: "Desenhamos interfaces e identidades visuais com pesquisa de usuário, protótipos navegáveis e design system.",
                en: "We design interfaces and visual identities backed by user research, clickable prototypes and a design system.",
            },
            technologies: &["Figma", "Adobe XD", "Illustrator", "Design Systems"],
            sample_projects: &[SampleProject {
                name: "Rebrand Café Aurora",
                summary: Localized {
                    pt: "Nova identidade visual para rede de cafeterias.",
                    en: "New visual identity for a coffee shop chain.",
                },
            }],
            pricing: Localized {
                pt: "a partir de R$ 4.000",
                en: "from R$ 4,000",
            },
            timeline: Localized { pt: "2 a 5 semanas", en: "2 to 5 weeks" },
        },
        ServiceKey::Consulting => ServiceEntry {
            key,
            name: Localized { pt: "Consultoria Digital", en: "Digital Consulting" },
            icon: "💡",
            keywords: &["consultoria", "consultor", "consulting", "estratégia digital", "estrategia digital", "transformação digital", "transformacao digital", "auditoria"],
            description: Localized {
                pt: "Apoiamos a estratégia digital da sua empresa com diagnóstico, roadmap tecnológico e acompanhamento.",
                en: "We support your company's digital strategy with assessment, technology roadmap and follow-up.",
            },
            technologies: &["Cloud", "DevOps", "Analytics", "Arquitetura de Software"],
            sample_projects: &[SampleProject {
                name: "Logística 4.0",
                summary: Localized {
                    pt: "Roadmap de digitalização para transportadora regional.",
                    en: "Digitalization roadmap for a regional carrier.",
                },
            }],
            pricing: Localized {
                pt: "a partir de R$ 250/hora ou pacotes mensais",
                en: "from R$ 250/hour or monthly packages",
            },
            timeline: Localized { pt: "conforme o escopo", en: "depending on scope" },
        },
    }
}

fn builtin_faqs() -> Vec<FaqEntry> {
    vec![
        FaqEntry {
            question: Localized {
                pt: "Vocês oferecem manutenção depois da entrega?",
                en: "Do you offer maintenance after delivery?",
            },
            answer: Localized {
                pt: "Sim! Todo projeto tem 90 dias de garantia e oferecemos planos mensais de manutenção e suporte.",
                en: "Yes! Every project has a 90-day warranty and we offer monthly maintenance and support plans.",
            },
            keywords: &["manutenção", "manutencao", "suporte", "garantia", "maintenance", "support", "warranty"],
        },
        FaqEntry {
            question: Localized {
                pt: "Como funciona o processo de desenvolvimento?",
                en: "How does the development process work?",
            },
            answer: Localized {
                pt: "Trabalhamos em sprints de 2 semanas: descoberta, protótipo, desenvolvimento, testes e lançamento, com entregas parciais para sua aprovação.",
                en: "We work in 2-week sprints: discovery, prototype, development, testing and launch, with partial deliveries for your approval.",
            },
            keywords: &["processo", "como funciona", "metodologia", "etapas", "process", "how does it work", "methodology", "steps"],
        },
        FaqEntry {
            question: Localized {
                pt: "Quais formas de pagamento vocês aceitam?",
                en: "Which payment methods do you accept?",
            },
            answer: Localized {
                pt: "Aceitamos PIX, boleto e cartão, com parcelamento em etapas do projeto.",
                en: "We accept PIX, bank slip and credit card, with installments tied to project milestones.",
            },
            keywords: &["pagamento", "parcel", "pix", "boleto", "cartão", "cartao", "payment", "installment", "credit card"],
        },
        FaqEntry {
            question: Localized {
                pt: "Quais tecnologias vocês usam?",
                en: "Which technologies do you use?",
            },
            answer: Localized {
                pt: "Usamos tecnologias modernas como React, Next.js, Flutter, Node.js, Python e Rust, escolhidas conforme cada projeto.",
                en: "We use modern technologies such as React, Next.js, Flutter, Node.js, Python and Rust, chosen per project.",
            },
            keywords: &["tecnologia", "linguagem", "stack", "framework", "technology", "technologies", "language"],
        },
    ]
}

fn builtin_company() -> CompanyFacts {
    CompanyFacts {
        name: "Nexus Digital",
        email: "contato@nexusdigital.com.br",
        phone: "+55 11 4002-8922",
        whatsapp: "+55 11 98765-4321",
        hours: Localized {
            pt: "segunda a sexta, das 9h às 18h",
            en: "Monday to Friday, 9am to 6pm (BRT)",
        },
        founded: 2016,
        projects_delivered: 150,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_every_service_in_declared_order() {
        let kb = KnowledgeBase::builtin();
        let keys: Vec<ServiceKey> = kb.services().iter().map(|s| s.key).collect();
        assert_eq!(keys, ServiceKey::ALL.to_vec());
    }

    #[test]
    fn first_matching_service_wins() {
        let kb = KnowledgeBase::builtin();
        // "site" (web) e "app" (mobile); web vem antes no catálogo
        assert_eq!(kb.match_service("quero um site e um app"), Some(ServiceKey::Web));
        assert_eq!(kb.match_service("preciso de um aplicativo"), Some(ServiceKey::Mobile));
        assert_eq!(kb.match_service("nada a ver"), None);
    }

    #[test]
    fn faq_match_prefers_more_hits() {
        let kb = KnowledgeBase::builtin();
        let faq = kb.match_faq("vocês dão suporte e garantia?").expect("faq");
        assert!(faq.answer.pt.contains("garantia"));
        assert!(kb.match_faq("xyz").is_none());
    }

    #[test]
    fn localized_picks_language() {
        let l = Localized { pt: "olá", en: "hello" };
        assert_eq!(l.get(Language::Pt), "olá");
        assert_eq!(l.get(Language::En), "hello");
    }
}
