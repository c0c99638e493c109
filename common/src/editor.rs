//! Editing-session state shared between the admin frontend and its tests.
//!
//! The session tracks a single document against the md5 of the last loaded
//! or saved text. Everything here is plain data so the save flow can be
//! exercised without a browser.

/// Toast shown after a successful save.
pub const SAVED_NOTICE: &str = "Document Saved!";
/// Alert shown when a save fails for any reason other than a lost session.
pub const SAVE_FAILED_ALERT: &str = "Could not save the changes. Sorry!";
/// Confirmation prompt before throwing away unsaved edits.
pub const DISCARD_PROMPT: &str = "Are you sure you want to discard all changes?";
/// Handed to the unload guard while the session is dirty.
pub const UNSAVED_WARNING: &str = "Your document contains unsaved changes.";
/// Where the browser is sent when the server reports a lost session.
pub const LOGIN_PATH: &str = "/login/";

fn digest(text: &str) -> String {
    format!("{:x}", md5::compute(text))
}

/// Dirty tracking for one open document.
///
/// The baseline is the md5 of the text as it was last loaded or saved.
/// Current editor content is compared against it on demand, so the caller
/// keeps owning the text and no copy is held here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorSession {
    document_id: String,
    baseline_md5: String,
}

impl EditorSession {
    /// Opens a session over freshly loaded text. The session starts clean.
    pub fn new(document_id: impl Into<String>, initial_text: &str) -> Self {
        Self {
            document_id: document_id.into(),
            baseline_md5: digest(initial_text),
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn is_dirty(&self, current_text: &str) -> bool {
        digest(current_text) != self.baseline_md5
    }

    /// Resets the baseline to `saved_text`, normally right after the server
    /// acknowledged a save of exactly that text.
    pub fn mark_clean(&mut self, saved_text: &str) {
        self.baseline_md5 = digest(saved_text);
    }

    pub fn buttons(&self, current_text: &str) -> ButtonState {
        ButtonState::for_unsaved_changes(self.is_dirty(current_text))
    }

    /// Target of the save request for this document.
    pub fn save_url(&self, base_path: &str) -> String {
        save_url(base_path, &self.document_id)
    }
}

/// `PUT {base_path}/admin/api/document/{document_id}/save`
pub fn save_url(base_path: &str, document_id: &str) -> String {
    format!(
        "{}/admin/api/document/{}/save",
        base_path.trim_end_matches('/'),
        document_id
    )
}

/// Enabled state of the two toolbar actions. Discard is only offered while
/// there is something to throw away, upload only while there is not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonState {
    pub discard_enabled: bool,
    pub upload_enabled: bool,
}

impl ButtonState {
    pub fn for_unsaved_changes(unsaved_changes: bool) -> Self {
        Self {
            discard_enabled: unsaved_changes,
            upload_enabled: !unsaved_changes,
        }
    }
}

/// Outcome of one save request, classified from the response status.
/// `None` stands for a request that never produced a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveDisposition {
    /// 2xx. Show the saved notice and reset the baseline.
    Saved,
    /// 403. The session expired, send the user to the login page.
    LoginRequired,
    /// Everything else. Show the failure alert and keep the session dirty.
    Failed { status: Option<u16> },
}

impl SaveDisposition {
    pub fn classify(status: Option<u16>) -> Self {
        match status {
            Some(code) if (200..300).contains(&code) => Self::Saved,
            Some(403) => Self::LoginRequired,
            other => Self::Failed { status: other },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_clean_with_upload_enabled() {
        let session = EditorSession::new("doc-42", "hello world");
        assert!(!session.is_dirty("hello world"));
        assert_eq!(
            session.buttons("hello world"),
            ButtonState {
                discard_enabled: false,
                upload_enabled: true,
            }
        );
    }

    #[test]
    fn any_content_change_flips_to_dirty() {
        let session = EditorSession::new("doc-42", "hello world");
        for edited in ["hello world!", "", "hello worl", "HELLO WORLD"] {
            assert!(session.is_dirty(edited), "expected dirty for {edited:?}");
            let buttons = session.buttons(edited);
            assert!(buttons.discard_enabled);
            assert!(!buttons.upload_enabled);
        }
    }

    #[test]
    fn reverting_to_the_baseline_text_is_clean_again() {
        let session = EditorSession::new("doc-42", "hello world");
        assert!(session.is_dirty("hello"));
        assert!(!session.is_dirty("hello world"));
    }

    #[test]
    fn mark_clean_moves_the_baseline() {
        let mut session = EditorSession::new("doc-42", "first");
        assert!(session.is_dirty("second"));
        session.mark_clean("second");
        assert!(!session.is_dirty("second"));
        assert!(session.is_dirty("first"));
        assert!(session.buttons("second").upload_enabled);
    }

    #[test]
    fn save_url_contains_the_document_id() {
        assert_eq!(
            save_url("", "doc-42"),
            "/admin/api/document/doc-42/save"
        );
        assert_eq!(
            save_url("https://cms.example.com/", "17"),
            "https://cms.example.com/admin/api/document/17/save"
        );
        let session = EditorSession::new("doc-42", "");
        assert_eq!(session.save_url(""), "/admin/api/document/doc-42/save");
    }

    #[test]
    fn two_hundred_range_counts_as_saved() {
        assert_eq!(SaveDisposition::classify(Some(200)), SaveDisposition::Saved);
        assert_eq!(SaveDisposition::classify(Some(204)), SaveDisposition::Saved);
        assert_eq!(SaveDisposition::classify(Some(299)), SaveDisposition::Saved);
    }

    #[test]
    fn forbidden_redirects_to_login_instead_of_alerting() {
        assert_eq!(
            SaveDisposition::classify(Some(403)),
            SaveDisposition::LoginRequired
        );
    }

    #[test]
    fn other_statuses_and_transport_errors_fail() {
        assert_eq!(
            SaveDisposition::classify(Some(500)),
            SaveDisposition::Failed { status: Some(500) }
        );
        assert_eq!(
            SaveDisposition::classify(Some(404)),
            SaveDisposition::Failed { status: Some(404) }
        );
        assert_eq!(
            SaveDisposition::classify(Some(302)),
            SaveDisposition::Failed { status: Some(302) }
        );
        assert_eq!(
            SaveDisposition::classify(None),
            SaveDisposition::Failed { status: None }
        );
    }

    #[test]
    fn failed_save_leaves_the_baseline_alone() {
        let session = EditorSession::new("doc-42", "hello world");
        let edited = "hello world, edited";
        assert!(session.is_dirty(edited));
        // The caller only calls mark_clean for Saved, so a failure changes
        // nothing about the session.
        let outcome = SaveDisposition::classify(Some(500));
        assert_eq!(outcome, SaveDisposition::Failed { status: Some(500) });
        assert!(session.is_dirty(edited));
        assert!(session.buttons(edited).discard_enabled);
    }
}
