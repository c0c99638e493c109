use crate::components::editor::EditorComponent;
use web_sys::UrlSearchParams;
use yew::{html, Component, Context, Html};

/// Root component of the admin page. Reads the `document` and `mode` query
/// parameters once and mounts the editor over the selected document.
pub struct App {
    document_id: Option<String>,
    mode: Option<String>,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let query = web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default();
        let params = UrlSearchParams::new_with_str(&query).ok();
        let param = |name: &str| {
            params
                .as_ref()
                .and_then(|params| params.get(name))
                .filter(|value| !value.is_empty())
        };

        Self {
            document_id: param("document"),
            mode: param("mode"),
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div>
                {
                    match &self.document_id {
                        Some(id) => html! {
                            <EditorComponent document_id={id.clone()} mode={self.mode.clone()} />
                        },
                        None => html! {
                            <div class="editor-empty">{"No document selected."}</div>
                        },
                    }
                }
            </div>
        }
    }
}
