//! Properties for the `EditorComponent`.

use yew::prelude::*;

/// Configuration handed to the editor by the page controller.
#[derive(Properties, PartialEq, Clone)]
pub struct EditorProps {
    /// Identifier of the document to edit. Opaque to the editor; it is only
    /// used to build the request URLs.
    pub document_id: String,

    /// Syntax mode applied to the text area as its `data-mode` attribute.
    /// When absent, the mode is derived from the document's MIME type after
    /// the metadata arrives.
    #[prop_or_default]
    pub mode: Option<String>,

    /// Bracket-matching flag, echoed to the widget configuration.
    #[prop_or(true)]
    pub match_brackets: bool,
}
