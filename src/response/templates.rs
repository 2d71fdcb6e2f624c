//! Textos fixos das respostas, em pt e en.
//!
//! Cada função recebe o idioma e os valores a interpolar; nenhuma delas
//! toca em estado.

use crate::core::context::Language;
use crate::core::message::Sentiment;

/// Escolhe a variante do idioma.
pub fn tr(language: Language, pt: &'static str, en: &'static str) -> &'static str {
    match language {
        Language::Pt => pt,
        Language::En => en,
    }
}

pub fn greeting(language: Language, company: &str, name: Option<&str>) -> String {
    match (language, name) {
        (Language::Pt, Some(name)) => format!(
            "Olá, {name}! 👋 Que bom ter você aqui. Sou o assistente virtual da {company}. Em qual serviço posso ajudar?"
        ),
        (Language::Pt, None) => format!(
            "Olá! 👋 Sou o assistente virtual da {company}. Posso te ajudar com sites, apps, lojas virtuais, IA, design e consultoria. Por onde começamos?"
        ),
        (Language::En, Some(name)) => format!(
            "Hi, {name}! 👋 Great to have you here. I'm {company}'s virtual assistant. Which service can I help you with?"
        ),
        (Language::En, None) => format!(
            "Hello! 👋 I'm {company}'s virtual assistant. I can help with websites, apps, online stores, AI, design and consulting. Where shall we start?"
        ),
    }
}

pub fn service(
    language: Language,
    name: &str,
    description: &str,
    technologies: &[&str],
    pricing: &str,
) -> String {
    let stack = technologies.join(", ");
    match language {
        Language::Pt => format!(
            "Ótima escolha! {name}: {description}\n\nTecnologias: {stack}.\nInvestimento {pricing}. Veja alguns projetos que entregamos:"
        ),
        Language::En => format!(
            "Great choice! {name}: {description}\n\nTechnologies: {stack}.\nInvestment {pricing}. Here are some projects we delivered:"
        ),
    }
}

pub fn pricing_for(language: Language, name: &str, pricing: &str, timeline: &str) -> String {
    match language {
        Language::Pt => format!(
            "Para {name}, o investimento fica {pricing}, com prazo médio de {timeline}. O valor final depende do escopo. Quer um orçamento personalizado?"
        ),
        Language::En => format!(
            "For {name}, pricing starts {pricing}, with an average timeline of {timeline}. The final price depends on scope. Would you like a custom quote?"
        ),
    }
}

pub fn pricing_overview(language: Language, lines: &[String]) -> String {
    let body = lines.join("\n");
    match language {
        Language::Pt => format!(
            "Nossos valores de referência:\n{body}\n\nQual desses serviços você procura?"
        ),
        Language::En => format!("Our reference prices:\n{body}\n\nWhich of these services are you looking for?"),
    }
}

pub fn timeline_for(language: Language, name: &str, timeline: &str) -> String {
    match language {
        Language::Pt => format!("Um projeto de {name} leva em média {timeline}, contando com as rodadas de aprovação."),
        Language::En => format!("A {name} project usually takes {timeline}, including review rounds."),
    }
}

pub fn timeline_overview(language: Language, lines: &[String]) -> String {
    let body = lines.join("\n");
    match language {
        Language::Pt => format!("Prazos médios por serviço:\n{body}"),
        Language::En => format!("Average timelines per service:\n{body}"),
    }
}

pub fn urgency_note(language: Language) -> &'static str {
    tr(
        language,
        "\n\nEntendi que é urgente! ⚡ Temos um fluxo expresso com entregas parciais já na primeira semana.",
        "\n\nI understand it's urgent! ⚡ We have an express track with partial deliveries in the very first week.",
    )
}

pub fn contact(language: Language, email: &str, phone: &str, whatsapp: &str, hours: &str) -> String {
    match language {
        Language::Pt => format!(
            "Você pode falar com nosso time por:\n📧 {email}\n📞 {phone}\n💬 WhatsApp {whatsapp}\nAtendimento: {hours}."
        ),
        Language::En => format!(
            "You can reach our team at:\n📧 {email}\n📞 {phone}\n💬 WhatsApp {whatsapp}\nBusiness hours: {hours}."
        ),
    }
}

pub fn contact_confirm(language: Language, email: &str) -> String {
    match language {
        Language::Pt => format!("\n\nJá anotei seu e-mail ({email}); um especialista vai te escrever em até 1 dia útil."),
        Language::En => format!("\n\nI've noted your email ({email}); a specialist will write to you within 1 business day."),
    }
}

pub fn contact_ask_email(language: Language) -> &'static str {
    tr(
        language,
        "\n\nSe preferir, deixe seu e-mail aqui que entramos em contato.",
        "\n\nIf you prefer, leave your email here and we'll get in touch.",
    )
}

pub fn project_details(language: Language, projects_delivered: u32, founded: u16) -> String {
    match language {
        Language::Pt => format!(
            "Desde {founded} já entregamos mais de {projects_delivered} projetos. Alguns destaques:"
        ),
        Language::En => format!("Since {founded} we've delivered over {projects_delivered} projects. Some highlights:"),
    }
}

pub fn qualification(language: Language, name: Option<&str>) -> String {
    let who = name.map(|n| format!(", {n}")).unwrap_or_default();
    match language {
        Language::Pt => format!(
            "Obrigado pelas informações{who}! Para montar a melhor proposta: qual o porte da sua empresa e qual o orçamento previsto para o projeto?"
        ),
        Language::En => format!(
            "Thanks for the details{who}! To put together the best proposal: how big is your company and what's the expected budget for the project?"
        ),
    }
}

pub fn faq_menu(language: Language) -> &'static str {
    tr(
        language,
        "Claro! Estas são as dúvidas mais comuns, escolha uma ou escreva a sua:",
        "Sure! These are the most common questions, pick one or type yours:",
    )
}

/// Respostas de fallback por sentimento (uma é sorteada).
pub fn default_pool(language: Language, sentiment: Sentiment) -> &'static [&'static str] {
    match (language, sentiment) {
        (Language::Pt, Sentiment::Positive) => &[
            "Que bom! 😊 Me conta um pouco mais sobre o que você precisa?",
            "Fico feliz em ajudar! Qual serviço te interessa mais?",
            "Ótimo! Posso te mostrar nossos serviços ou preços, o que prefere?",
        ],
        (Language::Pt, Sentiment::Negative) => &[
            "Sinto muito por isso. 😕 Como posso te ajudar a resolver?",
            "Entendo a frustração. Quer falar direto com um especialista?",
            "Poxa, vamos resolver isso juntos. Pode me dar mais detalhes?",
        ],
        (Language::Pt, Sentiment::Neutral) => &[
            "Não tenho certeza se entendi. Pode reformular?",
            "Hmm, pode me dar mais detalhes sobre o que procura?",
            "Posso ajudar com sites, apps, e-commerce, IA, design e consultoria. Sobre qual quer saber?",
        ],
        (Language::En, Sentiment::Positive) => &[
            "Glad to hear that! 😊 Tell me a bit more about what you need?",
            "Happy to help! Which service interests you the most?",
            "Great! I can show you our services or prices, what would you prefer?",
        ],
        (Language::En, Sentiment::Negative) => &[
            "I'm sorry about that. 😕 How can I help sort it out?",
            "I understand the frustration. Would you like to talk to a specialist?",
            "Let's fix this together. Could you give me more details?",
        ],
        (Language::En, Sentiment::Neutral) => &[
            "I'm not sure I understood. Could you rephrase?",
            "Hmm, could you tell me more about what you're looking for?",
            "I can help with websites, apps, e-commerce, AI, design and consulting. Which one would you like to know about?",
        ],
    }
}
