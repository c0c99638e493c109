//! Update function for the document editor component.
//!
//! This module contains a single `update` function following an Elm-style
//! architecture: it receives the current `EditorComponent` state, the
//! `Context`, and a `Msg`, mutates the state accordingly, and returns a
//! `bool` indicating whether the view should re-render.
//!
//! Key behaviors
//! - Dirty tracking: every content mutation republishes the dirty flag, and
//!   the button states follow it on the next render.
//! - Save: one PUT with the raw text, outcome classified from the response
//!   status. Success resets the baseline and shows a notice; a 403 sends the
//!   browser to the login page; anything else alerts and leaves the session
//!   dirty.
//! - Discard: confirmation, then disarm the unload guard and reload.
//! - Upload: replaces the document content from a local file, after which
//!   the content is re-fetched so the baseline matches the server again.

use common::editor::{EditorSession, SaveDisposition, DISCARD_PROMPT, SAVED_NOTICE, SAVE_FAILED_ALERT};
use gloo_console::error;
use gloo_net::http::Request;
use web_sys::{FormData, HtmlInputElement};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{
    alert, clear_unload_guard, confirm, mode_from_mime, publish_dirty, redirect_to_login,
    reload_page, show_toast,
};
use super::messages::Msg;
use super::state::EditorComponent;

/// Central update function for the component.
///
/// Contract
/// - Mutates `component` based on `msg`.
/// - May dispatch further messages via `ctx.link()` (e.g., async callbacks).
/// - Returns `true` to re-render the view, `false` when only side effects occur.
pub fn update(
    component: &mut EditorComponent,
    ctx: &Context<EditorComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::DocumentLoaded(document) => {
            if component.mode.is_none() {
                component.mode = document
                    .mime_type
                    .as_deref()
                    .and_then(mode_from_mime)
                    .map(str::to_string);
            }
            component.document = Some(document);
            true
        }
        Msg::ContentLoaded(text) => {
            component.text = text;
            component.session = Some(EditorSession::new(
                ctx.props().document_id.clone(),
                &component.text,
            ));
            publish_dirty(false);

            // The textarea mounts on the next render; resize once it did.
            ctx.link().send_message(Msg::AutoResize);
            let link = ctx.link().clone();
            wasm_bindgen_futures::spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(200).await;
                link.send_message(Msg::AutoResize);
            });
            true
        }
        Msg::LoadFailed => {
            component.load_failed = true;
            true
        }
        Msg::UpdateText(new_text) => {
            if component.text != new_text {
                component.text = new_text;
                publish_dirty(component.dirty());
            }
            true
        }
        Msg::AutoResize => {
            component.resize_textarea();
            false
        }
        Msg::Save => {
            if let Some(session) = &component.session {
                let url = session.save_url("");
                let text = component.text.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let status = match Request::put(&url)
                        .header("Content-Type", "text/plain;charset=utf-8")
                        .body(text)
                    {
                        Ok(request) => match request.send().await {
                            Ok(response) => Some(response.status()),
                            Err(_) => None,
                        },
                        Err(_) => None,
                    };
                    link.send_message(Msg::SaveFinished(SaveDisposition::classify(status)));
                });
            }
            false
        }
        Msg::SaveFinished(outcome) => match outcome {
            SaveDisposition::Saved => {
                if let Some(session) = &mut component.session {
                    session.mark_clean(&component.text);
                }
                publish_dirty(false);
                show_toast(SAVED_NOTICE);
                true
            }
            SaveDisposition::LoginRequired => {
                redirect_to_login();
                false
            }
            SaveDisposition::Failed { status } => {
                error!(format!("save failed, status {:?}", status));
                alert(SAVE_FAILED_ALERT);
                false
            }
        },
        Msg::Discard => {
            if confirm(DISCARD_PROMPT) {
                clear_unload_guard();
                reload_page();
            }
            false
        }
        Msg::OpenFileDialog => {
            if let Some(input) = component.file_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
            false
        }
        Msg::FileSelected(file) => {
            // Clear the input so picking the same file again fires onchange.
            if let Some(input) = component.file_input_ref.cast::<HtmlInputElement>() {
                input.set_value("");
            }
            let target = component
                .document
                .as_ref()
                .and_then(|document| document.parent_id.map(|parent| (parent, document.name.clone())));
            if let Some((parent_id, name)) = target {
                let link = ctx.link().clone();
                spawn_local(async move {
                    let status = upload_replacement(parent_id, &name, &file).await;
                    link.send_message(Msg::UploadFinished(status));
                });
            }
            false
        }
        Msg::UploadFinished(status) => {
            match SaveDisposition::classify(status) {
                SaveDisposition::Saved => {
                    show_toast("Upload complete.");
                    let link = ctx.link().clone();
                    let document_id = ctx.props().document_id.clone();
                    spawn_local(async move {
                        super::fetch_content(link, &document_id).await;
                    });
                }
                SaveDisposition::LoginRequired => redirect_to_login(),
                SaveDisposition::Failed { status } => {
                    error!(format!("upload failed, status {:?}", status));
                    show_toast("Could not upload the file.");
                }
            }
            false
        }
    }
}

/// Sends `file` as a multipart replacement carrying the open document's own
/// name, so the server overwrites it instead of creating a sibling. `None`
/// means the request never produced a response.
async fn upload_replacement(parent_id: i64, name: &str, file: &web_sys::File) -> Option<u16> {
    let form = FormData::new().ok()?;
    form.append_with_blob_and_filename("file", file, name).ok()?;
    let request = Request::post(&format!("/admin/api/document/{}/upload", parent_id))
        .body(form)
        .ok()?;
    match request.send().await {
        Ok(response) => Some(response.status()),
        Err(_) => None,
    }
}
