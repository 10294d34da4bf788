//! Chat form behavior, independent of the browser bindings.
//!
//! [`FormController`] maps the page's three events (ready, submit, keydown)
//! onto a [`ChatSurface`]. Start-up wiring lives in [`crate::page`], the
//! browser implementation in `dom`; tests drive a recording surface instead.

use thiserror::Error;

/// Id of the chat form.
pub const FORM_ID: &str = "chat-form";
/// Id of the profile textarea inside the form.
pub const INPUT_ID: &str = "profile";
/// Id of the "counselor is typing" element.
pub const TYPING_INDICATOR_ID: &str = "typing-indicator";
/// Id of the scrollable conversation panel.
pub const CHAT_BOX_ID: &str = "chat-box";

/// Errors raised while wiring or driving the chat form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// The window or its document is not available.
    #[error("document is unavailable")]
    NoDocument,

    /// A required element is absent from the page.
    #[error("required element #{0} is missing from the page")]
    MissingElement(&'static str),

    /// An element exists but has the wrong type.
    #[error("element #{id} is not a {expected}")]
    WrongElementType {
        /// Element id.
        id: &'static str,
        /// Expected element kind.
        expected: &'static str,
    },

    /// The browser refused to register a listener.
    #[error("failed to attach {0} listener")]
    ListenerRejected(&'static str),

    /// Programmatic submission was rejected by the browser.
    #[error("form submission request failed: {0}")]
    SubmitFailed(String),
}

/// The page elements the controller mutates.
///
/// Methods take `&self`: a programmatic submit re-enters the submit handler
/// synchronously, so no exclusive borrow may be held across it.
pub trait ChatSurface {
    /// Make the typing indicator visible (`display: block`).
    fn show_typing_indicator(&self);

    /// Set the chat panel's scroll offset to its scroll height.
    fn scroll_chat_to_bottom(&self);

    /// Ask the form to submit through its normal submission pathway.
    fn request_submit(&self) -> Result<(), ControllerError>;
}

/// A key press delivered to the textarea.
pub trait KeyInput {
    /// Key name, e.g. `"Enter"` or `"a"`.
    fn key(&self) -> String;

    /// Whether Shift was held.
    fn shift_held(&self) -> bool;

    /// Suppress the browser's default handling of the key.
    fn prevent_default(&self);
}

/// What the keydown handler did with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Default suppressed and form submission requested.
    Submitted,
    /// Nothing done; the browser handles the key.
    PassedThrough,
}

/// Returns true for the chord that sends the message: Enter without Shift.
pub fn is_submit_chord(key: &str, shift_held: bool) -> bool {
    key == "Enter" && !shift_held
}

/// Event-to-action mapping for the chat form.
#[derive(Debug)]
pub struct FormController<S> {
    surface: S,
}

impl<S: ChatSurface> FormController<S> {
    /// Take ownership of the located page elements and scroll the
    /// conversation to its latest message.
    ///
    /// Must only be called once the document has been parsed.
    pub fn initialize(surface: S) -> Self {
        surface.scroll_chat_to_bottom();
        log::debug!("chat form controller initialized");
        Self { surface }
    }

    /// Handle the form's `submit` event. The submission itself is never
    /// prevented.
    pub fn on_submit(&self) {
        self.surface.show_typing_indicator();
        self.surface.scroll_chat_to_bottom();
    }

    /// Handle a `keydown` on the textarea.
    pub fn on_keydown<K: KeyInput + ?Sized>(&self, event: &K) -> KeyOutcome {
        if !is_submit_chord(&event.key(), event.shift_held()) {
            return KeyOutcome::PassedThrough;
        }

        event.prevent_default();
        if let Err(err) = self.surface.request_submit() {
            log::warn!("{err}");
        }
        KeyOutcome::Submitted
    }

    /// The underlying page surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }
}
