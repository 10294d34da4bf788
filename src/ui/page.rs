//! Full chat page.
//!
//! The element ids here are the contract with the browser controller in the
//! `scholar-select-web` crate: `chat-form`, `profile`, `typing-indicator` and
//! `chat-box`.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use super::chat::{ChatEntry, greeting};

/// ES module that boots the wasm controller built into `/static/pkg`.
const CONTROLLER_LOADER: &str = r#"import init from "/static/pkg/scholar_select_web.js";
init().catch((err) => console.error("chat controller failed to load", err));"#;

/// Data for one render of the chat page.
#[derive(Debug, Clone, Default)]
pub struct ChatPage {
    pub entries: Vec<ChatEntry>,
    /// Shown above the form, e.g. when an empty profile was submitted.
    pub notice: Option<String>,
}

impl ChatPage {
    pub fn render(&self) -> String {
        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    meta name="description" content="College recommendations from a local counselor model";
                    title { "ScholarSelect - College Counselor" }
                    link rel="stylesheet" href="/static/app.css";
                    script type="module" { (PreEscaped(CONTROLLER_LOADER)) }
                }
                body {
                    main class="chat-shell" {
                        (header())
                        (self.chat_box())
                        (typing_indicator())
                        @if let Some(notice) = &self.notice {
                            p class="notice" role="alert" { (notice) }
                        }
                        (self.form())
                    }
                }
            }
        };

        markup.into_string()
    }

    fn chat_box(&self) -> Markup {
        html! {
            div id="chat-box" class="chat-box" aria-live="polite" aria-label="Conversation" {
                @if self.entries.is_empty() {
                    (greeting())
                }
                @for entry in &self.entries {
                    (entry.render())
                }
            }
        }
    }

    fn form(&self) -> Markup {
        html! {
            form id="chat-form" class="chat-form" method="post" action="/" {
                textarea
                    id="profile"
                    name="profile"
                    rows="3"
                    placeholder="Describe your interests, marks and preferred locations..."
                    required {}
                button type="submit" class="send" { "Send" }
            }
            p class="hint" { "Press Enter to send, Shift+Enter for new line" }
        }
    }
}

fn header() -> Markup {
    html! {
        header class="chat-header" {
            h1 { "ScholarSelect" }
            p class="subtitle" { "Your AI college counselor" }
        }
    }
}

/// Hidden until the controller reveals it on submit. The server response
/// replaces the page, which hides it again.
fn typing_indicator() -> Markup {
    html! {
        div id="typing-indicator" class="typing-indicator" style="display: none;" {
            span class="dot" {}
            span class="dot" {}
            span class="dot" {}
            span class="typing-label" { "Counselor is typing..." }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::{ProfileReply, Suggestion};

    #[test]
    fn test_empty_page_has_controller_contract() {
        let html = ChatPage::default().render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        for id in ["chat-form", "profile", "typing-indicator", "chat-box"] {
            assert!(html.contains(&format!(r#"id="{id}""#)), "missing #{id}");
        }
        assert!(html.contains(r#"style="display: none;""#));
        assert!(html.contains("/static/pkg/scholar_select_web.js"));
        assert!(html.contains("Tell me about yourself"));
    }

    #[test]
    fn test_conversation_is_escaped() {
        let page = ChatPage {
            entries: vec![
                ChatEntry::Student("<script>alert(1)</script>".to_string()),
                ChatEntry::Counselor(ProfileReply::Suggestions(vec![Suggestion {
                    college: "A & M".to_string(),
                    location: "Chennai".to_string(),
                    reason: "Good <b>labs</b>".to_string(),
                }])),
            ],
            ..ChatPage::default()
        };
        let html = page.render();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("A &amp; M"));
        assert!(html.contains("(Chennai)"));
        assert!(!html.contains("Tell me about yourself"));
    }

    #[test]
    fn test_notice_above_empty_form() {
        let page = ChatPage {
            notice: Some("Please describe yourself first.".to_string()),
            ..ChatPage::default()
        };
        let html = page.render();

        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("Please describe yourself first."));
        assert!(html.contains("></textarea>"));
    }

    #[test]
    fn test_error_replies_render() {
        let page = ChatPage {
            entries: vec![
                ChatEntry::Counselor(ProfileReply::InvalidOutput {
                    details: "expected value at line 1".to_string(),
                }),
                ChatEntry::Counselor(ProfileReply::Unavailable {
                    details: "`ollama` not found".to_string(),
                }),
            ],
            ..ChatPage::default()
        };
        let html = page.render();

        assert!(html.contains("Invalid output"));
        assert!(html.contains("expected value at line 1"));
        assert!(html.contains("The counselor is unavailable right now."));
    }
}
