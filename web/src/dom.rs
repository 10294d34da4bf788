//! `web-sys` bindings for the chat form controller.

use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlFormElement, HtmlTextAreaElement, KeyboardEvent,
};

use crate::controller::{
    CHAT_BOX_ID, ChatSurface, ControllerError, FORM_ID, INPUT_ID, KeyInput, TYPING_INDICATOR_ID,
};
use crate::page::{Handlers, Located, Page, attach, is_document_parsed};

/// Located page elements.
struct DomSurface {
    form: HtmlFormElement,
    input: HtmlTextAreaElement,
    typing_indicator: HtmlElement,
    chat_box: Element,
}

impl ChatSurface for DomSurface {
    fn show_typing_indicator(&self) {
        if let Err(err) = self
            .typing_indicator
            .style()
            .set_property("display", "block")
        {
            log::warn!("failed to show typing indicator: {err:?}");
        }
    }

    fn scroll_chat_to_bottom(&self) {
        self.chat_box.set_scroll_top(self.chat_box.scroll_height());
    }

    fn request_submit(&self) -> Result<(), ControllerError> {
        self.form
            .request_submit()
            .map_err(|err| ControllerError::SubmitFailed(format!("{err:?}")))
    }
}

struct KeyboardInput<'a>(&'a KeyboardEvent);

impl KeyInput for KeyboardInput<'_> {
    fn key(&self) -> String {
        self.0.key()
    }

    fn shift_held(&self) -> bool {
        self.0.shift_key()
    }

    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

fn cast<T: JsCast>(
    element: Element,
    id: &'static str,
    expected: &'static str,
) -> Result<T, ControllerError> {
    element
        .dyn_into::<T>()
        .map_err(|_| ControllerError::WrongElementType { id, expected })
}

struct DomPage(Document);

impl Page for DomPage {
    type Element = Element;
    type Surface = DomSurface;

    fn element(&self, id: &'static str) -> Option<Element> {
        self.0.get_element_by_id(id)
    }

    fn surface(&self, found: Located<Element>) -> Result<DomSurface, ControllerError> {
        Ok(DomSurface {
            form: cast(found.form, FORM_ID, "form")?,
            input: cast(found.input, INPUT_ID, "textarea")?,
            typing_indicator: cast(found.typing_indicator, TYPING_INDICATOR_ID, "HTML element")?,
            chat_box: found.chat_box,
        })
    }

    fn install(&self, surface: &DomSurface, handlers: Handlers) -> Result<(), ControllerError> {
        let Handlers {
            on_submit,
            on_keydown,
        } = handlers;
        let on_submit = Closure::<dyn FnMut(Event)>::new(move |_event: Event| on_submit());
        let on_keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            on_keydown(&KeyboardInput(&event));
        });

        surface
            .form
            .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
            .map_err(|_| ControllerError::ListenerRejected("submit"))?;
        if surface
            .input
            .add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())
            .is_err()
        {
            // Take the submit listener back down before its closure is freed.
            let _ = surface
                .form
                .remove_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref());
            return Err(ControllerError::ListenerRejected("keydown"));
        }

        on_submit.forget();
        on_keydown.forget();
        Ok(())
    }
}

fn start(document: Document) -> Result<(), ControllerError> {
    attach(&DomPage(document))?;
    log::info!("chat form controller attached");
    Ok(())
}

/// Initialize the controller now if the document is parsed, otherwise on
/// `DOMContentLoaded`.
pub(crate) fn run_when_ready() -> Result<(), ControllerError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(ControllerError::NoDocument)?;

    if is_document_parsed(&document.ready_state()) {
        return start(document);
    }

    let ready_document = document.clone();
    let on_ready = Closure::once(move |_event: Event| {
        if let Err(err) = start(ready_document) {
            log::error!("chat form controller not started: {err}");
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        .map_err(|_| ControllerError::ListenerRejected("DOMContentLoaded"))?;
    on_ready.forget();
    Ok(())
}
