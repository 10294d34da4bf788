//! Browser controller for the scholar-select chat form.
//!
//! Built with `wasm-pack build web --target web --out-dir ../static/pkg` and
//! loaded by the chat page as an ES module. On start it waits for the
//! document to be parsed, then:
//!
//! - scrolls `#chat-box` to the latest message,
//! - shows `#typing-indicator` whenever `#chat-form` submits,
//! - turns Enter (without Shift) in `#profile` into a form submission.

pub mod controller;
pub mod page;

#[cfg(target_arch = "wasm32")]
mod dom;

pub use controller::{
    CHAT_BOX_ID, ChatSurface, ControllerError, FORM_ID, FormController, INPUT_ID, KeyInput,
    KeyOutcome, TYPING_INDICATOR_ID, is_submit_chord,
};
pub use page::{Handlers, Located, Page, attach, is_document_parsed};

/// WASM entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    if let Err(err) = dom::run_when_ready() {
        log::error!("chat form controller not started: {err}");
    }
}
