use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::loader::{LoadedDocument, Loader};
use crate::utils::record_id::RecordId;

#[derive(Deserialize)]
struct JsonDocument {
    doc_id: RecordId,
    #[serde(default)]
    title: String,
    #[serde(default, rename = "abstract")]
    abstract_text: String,
}

/// Reads `.jsonl` files holding one `{ "doc_id", "title", "abstract" }` document per line.
pub struct JsonLinesLoader;

impl JsonLinesLoader {
    fn parse_documents(raw: &str, relative_path: &Path) -> Vec<LoadedDocument> {
        raw.lines()
            .enumerate()
            .filter(|(_line_idx, line)| !line.trim().is_empty())
            .filter_map(|(line_idx, line)| match serde_json::from_str::<JsonDocument>(line) {
                Ok(doc) => Some(LoadedDocument {
                    doc_id: doc.doc_id.to_string(),
                    text: format!("{} {}", doc.title, doc.abstract_text),
                }),
                Err(e) => {
                    warn!("Skipping line {} of {}: {}", line_idx + 1, relative_path.display(), e);
                    None
                }
            })
            .collect()
    }
}

impl Loader for JsonLinesLoader {
    fn try_index_file(&self, absolute_path: &Path, relative_path: &Path) -> Option<Result<Vec<LoadedDocument>>> {
        if relative_path.extension()? != "jsonl" {
            return None;
        }

        Some(
            std::fs::read_to_string(absolute_path)
                .map(|raw| JsonLinesLoader::parse_documents(&raw, relative_path))
                .map_err(|e| Error::io(absolute_path, e)),
        )
    }

    fn get_name(&self) -> String {
        "JsonLinesLoader".to_owned()
    }
}
