pub mod json;
pub mod txt;

use std::path::Path;

use crate::error::Result;

/// One document as read from the corpus, before tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub doc_id: String,
    pub text: String,
}

pub type LoaderBoxed = Box<dyn Loader + Send + Sync>;

pub trait Loader {
    /// `None` if this loader does not handle the file at all
    fn try_index_file(&self, absolute_path: &Path, relative_path: &Path) -> Option<Result<Vec<LoadedDocument>>>;

    fn get_name(&self) -> String;
}
