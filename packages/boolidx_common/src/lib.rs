use std::collections::BTreeMap;

pub mod doc_table;
pub mod language;
pub mod postings;
pub mod tokenize;
pub mod utils;

pub static DOC_MAP_FILE: &str = "doc_map.json";
pub static METADATA_FILE: &str = "metadata.json";
pub static POSTINGS_FILE: &str = "postings.bin";

/// Uncompressed positional index, `term -> document -> positions`.
///
/// Both levels are ordered maps, so iterating (or serializing) visits
/// terms, then documents, in lexicographic order.
pub type PostingsMap = BTreeMap<String, BTreeMap<String, Vec<u32>>>;
