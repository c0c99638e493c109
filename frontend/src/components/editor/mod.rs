//! Document editor: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering, and helpers.
//!
//! Responsibilities
//! - Re-export selected types (`Msg`, `EditorProps`, `EditorComponent`).
//! - Provide the `Component` implementation that delegates to `update::update` and `view::view`.
//! - On first render, install the unload guard, publish a clean dirty flag,
//!   and fetch the document metadata plus its live content. A 403 on either
//!   request sends the browser to the login page.

use common::model::document::Document;
use gloo_net::http::Request;
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::EditorProps;
pub use state::EditorComponent;

impl Component for EditorComponent {
    type Message = Msg;
    type Properties = EditorProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut component = EditorComponent::new();
        component.mode = ctx.props().mode.clone();
        component
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;

            helpers::install_unload_guard();
            helpers::publish_dirty(false);
            load_document(ctx.link().clone(), ctx.props().document_id.clone());
        }
    }
}

/// Fetches metadata and then the live content of `document_id`, feeding both
/// into the component as messages.
fn load_document(link: Scope<EditorComponent>, document_id: String) {
    spawn_local(async move {
        match Request::get(&format!("/admin/api/document/{}", document_id))
            .send()
            .await
        {
            Ok(response) if response.ok() => match response.json::<Document>().await {
                Ok(document) => {
                    link.send_message(Msg::DocumentLoaded(document));
                    fetch_content(link, &document_id).await;
                }
                Err(_) => link.send_message(Msg::LoadFailed),
            },
            Ok(response) if response.status() == 403 => helpers::redirect_to_login(),
            _ => link.send_message(Msg::LoadFailed),
        }
    });
}

/// Fetches the live content and resets the editing session around it. Also
/// used after an upload replaced the content behind the editor's back.
async fn fetch_content(link: Scope<EditorComponent>, document_id: &str) {
    match Request::get(&format!("/admin/api/document/{}/content", document_id))
        .send()
        .await
    {
        Ok(response) if response.ok() => match response.text().await {
            Ok(text) => link.send_message(Msg::ContentLoaded(text)),
            Err(_) => link.send_message(Msg::LoadFailed),
        },
        Ok(response) if response.status() == 403 => helpers::redirect_to_login(),
        _ => link.send_message(Msg::LoadFailed),
    }
}
