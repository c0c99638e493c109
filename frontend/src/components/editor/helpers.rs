//! Browser-facing utilities for the editor component.
//!
//! Responsibilities:
//!
//! - **Dirty flag publication**: the clean/dirty state is published under the
//!   well-known `window.app_dirty` property so code outside the component,
//!   the unload guard included, can consult it synchronously.
//! - **Unload guard**: a `beforeunload` handler that warns about unsaved
//!   changes, and the switch that disarms it before a deliberate reload.
//! - **Dialogs and navigation**: thin wrappers over `window.confirm`,
//!   `window.alert`, the login redirect and the page reload.
//! - **User feedback**: transient toast notifications.
//! - **Index conversion**: between Rust's UTF-8 byte indices and the UTF-16
//!   code unit indices used by textarea selection APIs.

use common::editor::{LOGIN_PATH, UNSAVED_WARNING};
use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::BeforeUnloadEvent;

/// Publishes the dirty flag on the window object.
pub fn publish_dirty(dirty: bool) {
    if let Some(window) = web_sys::window() {
        let _ = Reflect::set(
            &window,
            &JsValue::from_str("app_dirty"),
            &JsValue::from_bool(dirty),
        );
    }
}

/// Reads the published dirty flag back. Missing or non-boolean values count
/// as clean.
pub fn dirty_flag() -> bool {
    web_sys::window()
        .and_then(|window| Reflect::get(&window, &JsValue::from_str("app_dirty")).ok())
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

/// Installs the page-unload guard. While the published dirty flag is set the
/// browser shows a leave confirmation; the exact wording is browser
/// controlled and may not match [`UNSAVED_WARNING`].
pub fn install_unload_guard() {
    if let Some(window) = web_sys::window() {
        let guard = Closure::<dyn FnMut(BeforeUnloadEvent)>::new(|event: BeforeUnloadEvent| {
            if dirty_flag() {
                event.prevent_default();
                event.set_return_value(UNSAVED_WARNING);
            }
        });
        window.set_onbeforeunload(Some(guard.as_ref().unchecked_ref()));
        // The handler stays installed for the rest of the page's life.
        guard.forget();
    }
}

/// Disarms the unload guard, so a deliberate reload does not re-trigger it.
pub fn clear_unload_guard() {
    if let Some(window) = web_sys::window() {
        window.set_onbeforeunload(None);
    }
}

/// Blocking yes/no confirmation. Defaults to "no" when the dialog cannot be
/// shown.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Blocking alert dialog.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        window.alert_with_message(message).ok();
    }
}

/// Sends the browser to the login page.
pub fn redirect_to_login() {
    if let Some(window) = web_sys::window() {
        window.location().set_href(LOGIN_PATH).ok();
    }
}

/// Reloads the current page from the server.
pub fn reload_page() {
    if let Some(window) = web_sys::window() {
        window.location().reload().ok();
    }
}

/// Displays a temporary notification at the bottom of the screen. The toast
/// removes itself after a few seconds.
pub fn show_toast(message: &str) {
    if let Some(document) = web_sys::window().and_then(|window| window.document()) {
        if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
            toast.set_class_name("toast");
            toast.set_text_content(Some(message));
            if body.append_child(&toast).is_ok() {
                wasm_bindgen_futures::spawn_local(async move {
                    gloo_timers::future::TimeoutFuture::new(3000).await;
                    if let Some(parent) = toast.parent_node() {
                        parent.remove_child(&toast).ok();
                    }
                });
            }
        }
    }
}

/// Syntax mode for a stored MIME type, using the editor's conventional mode
/// names. Plain text and unknown types carry no mode.
pub fn mode_from_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "text/html" | "application/xhtml+xml" => Some("htmlmixed"),
        "text/css" => Some("css"),
        "application/javascript" | "text/javascript" | "application/json" => Some("javascript"),
        "application/xml" | "text/xml" | "image/svg+xml" => Some("xml"),
        "text/markdown" => Some("markdown"),
        _ => None,
    }
}

/// Converts a UTF-8 byte index to its corresponding UTF-16 code unit index,
/// for programmatically setting the caret via `set_selection_range`.
pub fn byte_to_utf16_idx(s: &str, byte_idx: usize) -> u32 {
    s[..byte_idx].encode_utf16().count() as u32
}

/// Converts a UTF-16 code unit index, as reported by `selectionStart`, to
/// the corresponding UTF-8 byte index usable for slicing. Indices past the
/// end, and indices inside a surrogate pair, clamp to the next boundary.
pub fn utf16_to_byte_idx(s: &str, utf16_idx: usize) -> usize {
    let mut units = 0;
    for (byte_idx, ch) in s.char_indices() {
        if units >= utf16_idx {
            return byte_idx;
        }
        units += ch.len_utf16();
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_the_stored_mime_type() {
        assert_eq!(mode_from_mime("text/html"), Some("htmlmixed"));
        assert_eq!(mode_from_mime("text/css"), Some("css"));
        assert_eq!(mode_from_mime("application/json"), Some("javascript"));
        assert_eq!(mode_from_mime("image/svg+xml"), Some("xml"));
        assert_eq!(mode_from_mime("text/markdown"), Some("markdown"));
        assert_eq!(mode_from_mime("text/plain"), None);
        assert_eq!(mode_from_mime("application/pdf"), None);
    }

    #[test]
    fn index_conversion_is_identity_for_ascii() {
        let text = "hello world";
        assert_eq!(utf16_to_byte_idx(text, 5), 5);
        assert_eq!(byte_to_utf16_idx(text, 5), 5);
    }

    #[test]
    fn index_conversion_handles_multibyte_text() {
        // 'ä' is 2 UTF-8 bytes, 1 UTF-16 unit; '𝄞' is 4 bytes, 2 units.
        let text = "aä𝄞b";
        assert_eq!(utf16_to_byte_idx(text, 0), 0);
        assert_eq!(utf16_to_byte_idx(text, 1), 1);
        assert_eq!(utf16_to_byte_idx(text, 2), 3);
        assert_eq!(utf16_to_byte_idx(text, 4), 7);
        assert_eq!(byte_to_utf16_idx(text, 3), 2);
        assert_eq!(byte_to_utf16_idx(text, 7), 4);
    }

    #[test]
    fn out_of_range_utf16_index_clamps_to_the_end() {
        let text = "abc";
        assert_eq!(utf16_to_byte_idx(text, 99), 3);
    }
}
