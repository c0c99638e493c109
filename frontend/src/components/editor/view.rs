//! View rendering for the document editor component.
//!
//! The layout is a toolbar above the editing area. The toolbar shows the
//! document name, a red dot while there are unsaved changes, the discard,
//! upload and save actions, and the syntax mode on the right. The editing
//! area is a line-number gutter next to an auto-growing `<textarea>` that
//! stands in for the code widget: the syntax mode and bracket-matching flag
//! are applied to it as data attributes, and the Tab key indents instead of
//! moving focus.
//!
//! The `disabled` state of the discard and upload buttons is derived from
//! the same dirty computation on every render, so the two always mirror the
//! session state.

use web_sys::{HtmlInputElement, HtmlTextAreaElement, InputEvent};
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::{byte_to_utf16_idx, utf16_to_byte_idx};
use super::messages::Msg;
use super::state::EditorComponent;

const INDENT: &str = "    ";

/// Main view function for the editor component.
pub fn view(component: &EditorComponent, ctx: &Context<EditorComponent>) -> Html {
    let link = ctx.link();
    let match_brackets = ctx.props().match_brackets;

    html! {
        <div class="editor-root">
            { build_toolbar(component, link) }
            {
                if component.session.is_some() {
                    build_editor_area(component, link, match_brackets)
                } else if component.load_failed {
                    html! { <div class="editor-empty">{"This document could not be loaded."}</div> }
                } else {
                    html! { <div class="editor-loading">{"Loading document…"}</div> }
                }
            }
        </div>
    }
}

/// Builds the toolbar: name, dirty indicator, the three actions and the
/// hidden file input behind the upload button.
fn build_toolbar(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let buttons = component.buttons();
    let name = component
        .document
        .as_ref()
        .map(|document| document.name.clone())
        .unwrap_or_default();

    html! {
        <div class="editor-toolbar">
            <span class="editor-name">{ name }</span>
            {
                if component.dirty() {
                    html! { <span class="editor-dirty" title="Unsaved changes"></span> }
                } else {
                    html! {}
                }
            }
            <button
                id="discard"
                disabled={!buttons.discard_enabled}
                onclick={link.callback(|_| Msg::Discard)}
            >
                {"Discard"}
            </button>
            <button
                id="upload"
                disabled={!buttons.upload_enabled}
                onclick={link.callback(|_| Msg::OpenFileDialog)}
            >
                {"Upload"}
            </button>
            <button
                id="save"
                disabled={component.session.is_none()}
                onclick={link.callback(|_| Msg::Save)}
            >
                {"Save"}
            </button>
            {
                if let Some(mode) = &component.mode {
                    html! { <span class="editor-mode">{ mode.clone() }</span> }
                } else {
                    html! {}
                }
            }
            <input
                type="file"
                ref={component.file_input_ref.clone()}
                style="display: none;"
                onchange={link.batch_callback(|e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    match input.files().and_then(|files| files.item(0)) {
                        Some(file) => vec![Msg::FileSelected(file)],
                        None => vec![],
                    }
                })}
            />
        </div>
    }
}

/// Builds the editing area: line numbers next to the textarea.
fn build_editor_area(
    component: &EditorComponent,
    link: &Scope<EditorComponent>,
    match_brackets: bool,
) -> Html {
    let line_count = component.text.split('\n').count();
    let line_numbers = (1..=line_count)
        .map(|n| html! { <div class="line-number">{ n }</div> })
        .collect::<Html>();

    html! {
        <div class="editor-area">
            <div class="line-gutter">{ line_numbers }</div>
            <textarea
                id="code"
                ref={component.textarea_ref.clone()}
                value={component.text.clone()}
                spellcheck="false"
                data-mode={component.mode.clone().unwrap_or_default()}
                data-match-brackets={match_brackets.to_string()}
                oninput={link.batch_callback(|e: InputEvent| {
                    let value = e.target_unchecked_into::<HtmlTextAreaElement>().value();
                    vec![Msg::UpdateText(value), Msg::AutoResize]
                })}
                onkeydown={link.batch_callback(|e: KeyboardEvent| {
                    if e.key() != "Tab" {
                        return vec![];
                    }
                    e.prevent_default();
                    let textarea = e.target_unchecked_into::<HtmlTextAreaElement>();
                    vec![Msg::UpdateText(indent_selection(&textarea)), Msg::AutoResize]
                })}
                rows={1}
            />
        </div>
    }
}

/// Replaces the textarea selection with an indent and leaves the caret after
/// it. Returns the updated text.
fn indent_selection(textarea: &HtmlTextAreaElement) -> String {
    let text = textarea.value();
    let start_utf16 = textarea.selection_start().unwrap_or(Some(0)).unwrap_or(0) as usize;
    let end_utf16 = textarea.selection_end().unwrap_or(Some(0)).unwrap_or(0) as usize;
    let start = utf16_to_byte_idx(&text, start_utf16);
    let end = utf16_to_byte_idx(&text, end_utf16.max(start_utf16));

    let new_text = format!("{}{}{}", &text[..start], INDENT, &text[end..]);
    textarea.set_value(&new_text);

    let caret = byte_to_utf16_idx(&new_text, start + INDENT.len());
    textarea.set_selection_range(caret, caret).ok();
    new_text
}
