//! # Templates Maud — Widget de Chat
//!
//! Fragmentos HTML renderizados no servidor e injetados pelo HTMX:
//!
//! | Função | Tipo | Descrição |
//! |--------|------|-----------|
//! | [`full_page()`] | Página completa | Widget com SSE e formulário |
//! | [`message()`] | Fragment HTMX | Uma mensagem (texto, quick replies, carrossel) |
//! | [`transcript()`] | Fragment HTMX | Todas as mensagens da sessão |
//! | [`typing_indicator()`] | Fragment HTMX | "digitando..." |
//! | [`busy_notice()`] | Fragment HTMX | Aviso de resposta pendente (409) |
//!
//! Quick replies são botões que fazem `POST /chat` com o payload como
//! `message` (via `hx-vals`).

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::core::context::Language;
use crate::core::message::{ChatMessage, MessageKind, Sender};

/// Página do widget.
///
/// O script inline escuta `/events` e busca `/transcript` a cada mensagem
/// nova, mantendo o log sincronizado com as entregas atrasadas.
pub fn full_page(language: Language) -> Markup {
    let lang = match language {
        Language::Pt => "pt-BR",
        Language::En => "en",
    };
    let placeholder = match language {
        Language::Pt => "Digite sua mensagem...",
        Language::En => "Type your message...",
    };
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Nexus Digital — Chat" }
                script src="https://unpkg.com/htmx.org@2.0.4" {}
            }
            body {
                div class="chat-widget" {
                    div id="chat-messages" class="chat-messages"
                        hx-get="/transcript" hx-trigger="load" hx-swap="innerHTML" {}
                    div id="typing" class="typing" {}
                    form id="chat-form" class="chat-input" hx-post="/chat" hx-target="#typing"
                        hx-swap="innerHTML" {
                        input type="text" name="message" placeholder=(placeholder) autocomplete="off";
                        button type="submit" { "➤" }
                    }
                    button class="chat-clear" hx-post="/clear" hx-target="#chat-messages"
                        hx-swap="innerHTML" { "🗑" }
                }
                script {
                    (PreEscaped(r#"
const source = new EventSource('/events');
const typing = document.getElementById('typing');
source.addEventListener('Message', (e) => {
  htmx.ajax('GET', '/transcript', { target: '#chat-messages', swap: 'innerHTML' });
  if (JSON.parse(e.data).message.sender === 'bot') typing.innerHTML = '';
});
source.addEventListener('Cleared', () => { typing.innerHTML = ''; });
document.getElementById('chat-form').addEventListener('htmx:afterRequest', (e) => e.target.reset());
"#))
                }
            }
        }
    }
}

/// Uma mensagem do log.
pub fn message(msg: &ChatMessage) -> Markup {
    let (class, role) = match msg.sender() {
        Sender::User => ("message user-message", "user"),
        Sender::Bot => ("message bot-message", "bot"),
    };
    let meta = msg.metadata();
    html! {
        div class=(class) data-role=(role) data-id=(msg.id().to_string()) {
            div class="message-content" { (msg.text()) }
            @if msg.kind() == MessageKind::Carousel && !meta.carousel.is_empty() {
                div class="carousel" {
                    @for item in &meta.carousel {
                        div class="carousel-item" {
                            strong { (item.title) }
                            p { (item.subtitle) }
                        }
                    }
                }
            }
            @if !meta.quick_replies.is_empty() {
                div class="quick-replies" {
                    @for qr in &meta.quick_replies {
                        button class="quick-reply" hx-post="/chat" hx-target="#typing"
                            hx-swap="innerHTML"
                            hx-vals=(serde_json::json!({ "message": qr.payload }).to_string()) {
                            @if let Some(icon) = &qr.icon { (icon) " " }
                            (qr.text)
                        }
                    }
                }
            }
            @if let Some(confidence) = msg.confidence() {
                span class="confidence" { (confidence) "%" }
            }
        }
    }
}

pub fn transcript(messages: &[ChatMessage]) -> Markup {
    html! {
        @for msg in messages {
            (message(msg))
        }
    }
}

pub fn typing_indicator(language: Language) -> Markup {
    let label = match language {
        Language::Pt => "digitando...",
        Language::En => "typing...",
    };
    html! {
        div class="typing-indicator" { (label) }
    }
}

pub fn busy_notice(language: Language) -> Markup {
    let label = match language {
        Language::Pt => "Aguarde a resposta anterior.",
        Language::En => "Please wait for the previous reply.",
    };
    html! {
        div class="message system-message busy" { (label) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{CarouselItem, MessageMetadata, QuickReply, Sentiment};
    use chrono::Utc;

    #[test]
    fn user_text_is_escaped() {
        let msg = ChatMessage::user("<script>x</script>", Sentiment::Neutral, Utc::now());
        let html = message(&msg).into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("user-message"));
    }

    #[test]
    fn typing_indicator_waits_for_bot_message() {
        let html = full_page(Language::Pt).into_string();
        assert!(html.contains("message.sender === 'bot'"));
        assert!(html.contains("addEventListener('Cleared'"));
        assert!(html.contains(r#"lang="pt-BR""#));
    }

    #[test]
    fn bot_message_renders_affordances() {
        let metadata = MessageMetadata {
            quick_replies: vec![QuickReply::new("Quanto custa?", "Quanto custa?").with_icon("💰")],
            carousel: vec![CarouselItem {
                title: "Portal".into(),
                subtitle: "Agendamentos".into(),
            }],
            ..MessageMetadata::default()
        };
        let msg = ChatMessage::bot("Veja:", MessageKind::Carousel, 95, metadata, Utc::now());
        let html = message(&msg).into_string();
        assert!(html.contains("carousel-item"));
        assert!(html.contains("quick-reply"));
        assert!(html.contains("95%"));
    }
}
