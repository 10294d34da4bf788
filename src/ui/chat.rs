//! Conversation entries shown inside `#chat-box`.

use maud::{Markup, html};

use crate::recommend::{ProfileReply, Suggestion};

/// A single bubble in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    /// Text the student submitted.
    Student(String),
    /// The counselor's answer to it.
    Counselor(ProfileReply),
}

impl ChatEntry {
    pub fn render(&self) -> Markup {
        match self {
            Self::Student(text) => html! {
                div class="message student" {
                    p class="message-text" { (text) }
                }
            },
            Self::Counselor(reply) => html! {
                div class="message counselor" {
                    (render_reply(reply))
                }
            },
        }
    }
}

/// Greeting shown when the conversation is empty.
pub fn greeting() -> Markup {
    html! {
        div class="message counselor" {
            p class="message-text" {
                "Hi! Tell me about yourself: your favourite subjects, marks, interests and where you'd like to study. I'll suggest colleges that fit."
            }
        }
    }
}

fn render_reply(reply: &ProfileReply) -> Markup {
    match reply {
        ProfileReply::Suggestions(list) if list.is_empty() => html! {
            p class="message-text" { "I couldn't find a college that matches yet. Could you tell me a bit more?" }
        },
        ProfileReply::Suggestions(list) => html! {
            p class="message-text" { "Here are colleges that could suit you:" }
            ol class="suggestions" {
                @for s in list {
                    (render_suggestion(s))
                }
            }
        },
        ProfileReply::InvalidOutput { details } => html! {
            p class="message-text error" { "Invalid output" }
            p class="message-details" { (details) }
        },
        ProfileReply::Unavailable { details } => html! {
            p class="message-text error" { "The counselor is unavailable right now." }
            p class="message-details" { (details) }
        },
    }
}

fn render_suggestion(s: &Suggestion) -> Markup {
    html! {
        li class="suggestion" {
            strong class="suggestion-college" { (s.college) }
            @if !s.location.is_empty() {
                " "
                span class="suggestion-location" { "(" (s.location) ")" }
            }
            @if !s.reason.is_empty() {
                p class="suggestion-reason" { (s.reason) }
            }
        }
    }
}
