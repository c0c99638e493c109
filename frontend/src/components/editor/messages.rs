use common::editor::SaveDisposition;
use common::model::document::Document;

#[derive(Clone)]
pub enum Msg {
    DocumentLoaded(Document),
    ContentLoaded(String),
    LoadFailed,
    UpdateText(String),
    AutoResize,
    Save,
    SaveFinished(SaveDisposition),
    Discard,
    OpenFileDialog,
    FileSelected(web_sys::File),
    UploadFinished(Option<u16>),
}
