//! Wiring the controller into a page.
//!
//! [`attach`] owns the start-up order: look up the four elements (failing on
//! the first missing id), scroll the conversation down, then install the
//! submit and keydown handlers. The browser side only supplies a [`Page`].

use std::rc::Rc;

use crate::controller::{
    CHAT_BOX_ID, ChatSurface, ControllerError, FORM_ID, FormController, INPUT_ID, KeyInput,
    TYPING_INDICATOR_ID,
};

/// The four elements, found by id but not yet type-checked.
#[derive(Debug)]
pub struct Located<E> {
    pub form: E,
    pub input: E,
    pub typing_indicator: E,
    pub chat_box: E,
}

/// Handlers [`attach`] asks the page to register.
pub struct Handlers {
    /// For the form's `submit` event.
    pub on_submit: Box<dyn Fn()>,
    /// For `keydown` on the textarea.
    pub on_keydown: Box<dyn Fn(&dyn KeyInput)>,
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers").finish_non_exhaustive()
    }
}

/// A document the controller can be attached to.
pub trait Page {
    type Element;
    type Surface: ChatSurface + 'static;

    /// Element with the given id, if present.
    fn element(&self, id: &'static str) -> Option<Self::Element>;

    /// Check element types and build the surface.
    fn surface(&self, found: Located<Self::Element>) -> Result<Self::Surface, ControllerError>;

    /// Register both handlers. On error neither stays registered.
    fn install(&self, surface: &Self::Surface, handlers: Handlers) -> Result<(), ControllerError>;
}

/// Whether `document.readyState` says parsing is finished.
pub fn is_document_parsed(ready_state: &str) -> bool {
    ready_state != "loading"
}

/// Locate the elements, initialize the controller and install its handlers.
pub fn attach<P: Page>(page: &P) -> Result<Rc<FormController<P::Surface>>, ControllerError> {
    let find = |id| page.element(id).ok_or(ControllerError::MissingElement(id));
    let found = Located {
        form: find(FORM_ID)?,
        input: find(INPUT_ID)?,
        typing_indicator: find(TYPING_INDICATOR_ID)?,
        chat_box: find(CHAT_BOX_ID)?,
    };
    let controller = Rc::new(FormController::initialize(page.surface(found)?));

    let submit_controller = Rc::clone(&controller);
    let keydown_controller = Rc::clone(&controller);
    page.install(
        controller.surface(),
        Handlers {
            on_submit: Box::new(move || submit_controller.on_submit()),
            on_keydown: Box::new(move |key: &dyn KeyInput| {
                keydown_controller.on_keydown(key);
            }),
        },
    )?;

    Ok(controller)
}
