//! Component state for the document editor.
//!
//! The struct holds the page-lifetime data the view and update logic work
//! on: the current text, the editing session carrying the clean/dirty
//! baseline, the loaded document metadata, and the DOM refs. Fields are
//! `pub` because they are accessed by the `view` and `update` modules.

use common::editor::{ButtonState, EditorSession};
use common::model::document::Document;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlTextAreaElement};
use yew::prelude::*;

pub struct EditorComponent {
    /// Current content of the text area (UTF-8 `String`).
    pub text: String,

    /// Dirty tracking against the last loaded or saved baseline.
    /// `None` until the first content fetch finishes.
    pub session: Option<EditorSession>,

    /// Metadata of the open document, present once loading succeeded.
    pub document: Option<Document>,

    /// Syntax mode for the text area, from the `mode` prop or derived from
    /// the stored MIME type.
    pub mode: Option<String>,

    /// Guard to avoid running first-render initialization more than once.
    pub loaded: bool,

    /// Set when the metadata or content request failed.
    pub load_failed: bool,

    /// Reference to the `<textarea>` DOM node.
    pub textarea_ref: NodeRef,

    /// Reference to the hidden file input behind the upload button.
    pub file_input_ref: NodeRef,
}

impl EditorComponent {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            session: None,
            document: None,
            mode: None,
            loaded: false,
            load_failed: false,
            textarea_ref: Default::default(),
            file_input_ref: Default::default(),
        }
    }

    /// Whether the content differs from the last loaded or saved baseline.
    pub fn dirty(&self) -> bool {
        self.session
            .as_ref()
            .map(|session| session.is_dirty(&self.text))
            .unwrap_or(false)
    }

    /// Enabled state of the discard and upload buttons. Both stay disabled
    /// until a session exists.
    pub fn buttons(&self) -> ButtonState {
        self.session
            .as_ref()
            .map(|session| session.buttons(&self.text))
            .unwrap_or(ButtonState {
                discard_enabled: false,
                upload_enabled: false,
            })
    }

    /// Adjusts the textarea CSS height to match its `scrollHeight`, producing
    /// an auto-growing area without internal scrollbars.
    pub fn resize_textarea(&self) {
        if let Some(textarea) = self.textarea_ref.cast::<HtmlTextAreaElement>() {
            if let Ok(html_elem) = textarea.clone().dyn_into::<HtmlElement>() {
                // Force height recalculation
                let style = html_elem.style();
                let _ = style.set_property("height", "auto");
                let scroll_height = textarea.scroll_height();
                let _ = style.set_property("height", &format!("{}px", scroll_height));
            }
        }
    }
}
