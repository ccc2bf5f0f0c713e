//! Persisted, compressed form of a [`PostingsMap`].
//!
//! A store folder holds three artifacts:
//! - `doc_map.json`: json array of document identifiers, the array index being the doc id
//! - `metadata.json`: the term directory, `{ term: { "offset", "length" } }` into the postings blob
//! - `postings.bin`: concatenated term postings, see [`boolidx_common::postings`]

use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use boolidx_common::doc_table::DocTable;
use boolidx_common::postings::{decode_term_postings, encode_term_postings};
use boolidx_common::{PostingsMap, DOC_MAP_FILE, METADATA_FILE, POSTINGS_FILE};
use boolidx_search::SearchIndex;

use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermInfo {
    pub offset: u64,
    pub length: u64,
}

pub type TermDirectory = BTreeMap<String, TermInfo>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub num_terms: usize,
    pub num_docs: usize,
    pub postings_bytes: u64,
    pub total_bytes: u64,
}

#[derive(Debug)]
pub struct LoadedIndex {
    pub doc_table: DocTable,
    pub postings: PostingsMap,
    /// Directory entries skipped while decoding
    pub corrupt_terms: usize,
}

impl LoadedIndex {
    pub fn to_search_index(&self) -> SearchIndex {
        SearchIndex::new(self.doc_table.doc_names().iter().cloned(), &self.postings)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedStore {
    pub doc_table: DocTable,
    pub term_directory: TermDirectory,
    pub postings_blob: Vec<u8>,
}

impl CompressedStore {
    pub fn from_postings(postings: &PostingsMap) -> Result<Self> {
        let doc_table = DocTable::from_postings(postings);
        let mut term_directory = TermDirectory::new();
        let mut postings_blob: Vec<u8> = Vec::new();

        for (term, term_docs) in postings {
            // Documents iterate in name order, which is doc id order for this table
            let docs: Vec<(u32, &[u32])> = term_docs
                .iter()
                .filter_map(|(doc, positions)| doc_table.get_doc_id(doc).map(|doc_id| (doc_id, positions.as_slice())))
                .collect();

            let offset = postings_blob.len() as u64;
            encode_term_postings(docs.into_iter(), &mut postings_blob)
                .map_err(|source| Error::Codec { term: term.to_owned(), source })?;

            term_directory.insert(term.to_owned(), TermInfo { offset, length: postings_blob.len() as u64 - offset });
        }

        Ok(CompressedStore { doc_table, term_directory, postings_blob })
    }

    pub fn write_to(&self, store_folder_path: &Path) -> Result<StoreStats> {
        std::fs::create_dir_all(store_folder_path).map_err(|e| Error::io(store_folder_path, e))?;

        let doc_map_path = store_folder_path.join(DOC_MAP_FILE);
        let doc_map = serde_json::to_vec(self.doc_table.doc_names()).map_err(|e| Error::json(&doc_map_path, e))?;
        write_artifact(&doc_map_path, &doc_map)?;

        let metadata_path = store_folder_path.join(METADATA_FILE);
        let metadata = serde_json::to_vec(&self.term_directory).map_err(|e| Error::json(&metadata_path, e))?;
        write_artifact(&metadata_path, &metadata)?;

        write_artifact(&store_folder_path.join(POSTINGS_FILE), &self.postings_blob)?;

        Ok(StoreStats {
            num_terms: self.term_directory.len(),
            num_docs: self.doc_table.len(),
            postings_bytes: self.postings_blob.len() as u64,
            total_bytes: (doc_map.len() + metadata.len() + self.postings_blob.len()) as u64,
        })
    }

    /// Any missing or malformed artifact fails the whole read
    pub fn read_from(store_folder_path: &Path) -> Result<Self> {
        let doc_map_path = store_folder_path.join(DOC_MAP_FILE);
        let doc_names: Vec<String> =
            serde_json::from_slice(&read_artifact(&doc_map_path)?).map_err(|e| Error::json(&doc_map_path, e))?;

        let metadata_path = store_folder_path.join(METADATA_FILE);
        let term_directory: TermDirectory =
            serde_json::from_slice(&read_artifact(&metadata_path)?).map_err(|e| Error::json(&metadata_path, e))?;

        let postings_blob = read_artifact(&store_folder_path.join(POSTINGS_FILE))?;

        Ok(CompressedStore { doc_table: DocTable::from_names(doc_names), term_directory, postings_blob })
    }

    fn get_term_slice(&self, term_info: &TermInfo) -> Option<&[u8]> {
        let blob_len = self.postings_blob.len() as u64;
        if term_info.offset >= blob_len {
            return None;
        }

        let end = term_info.offset.checked_add(term_info.length).filter(|end| *end <= blob_len)?;
        Some(&self.postings_blob[term_info.offset as usize..end as usize])
    }

    fn decode_term(&self, term: &str, term_info: &TermInfo) -> Option<BTreeMap<String, Vec<u32>>> {
        let slice = match self.get_term_slice(term_info) {
            Some(slice) => slice,
            None => {
                warn!(
                    "Skipping term \"{}\": range {}+{} exceeds the {} bytes of {}",
                    term,
                    term_info.offset,
                    term_info.length,
                    self.postings_blob.len(),
                    POSTINGS_FILE,
                );
                return None;
            }
        };

        let docs = match decode_term_postings(slice) {
            Ok(docs) => docs,
            Err(e) => {
                warn!("Skipping term \"{}\": {}", term, e);
                return None;
            }
        };

        let mut term_docs = BTreeMap::new();
        for doc in docs {
            match self.doc_table.get_doc_name(doc.doc_id) {
                Some(doc_name) => {
                    term_docs.insert(doc_name.to_owned(), doc.positions);
                }
                None => {
                    warn!("Skipping term \"{}\": doc id {} is not in {}", term, doc.doc_id, DOC_MAP_FILE);
                    return None;
                }
            }
        }

        Some(term_docs)
    }

    /// Corrupt directory entries are skipped with a warning, the rest still loads.
    pub fn decode(self) -> LoadedIndex {
        let mut postings = PostingsMap::new();
        let mut corrupt_terms = 0;

        for (term, term_info) in self.term_directory.iter() {
            match self.decode_term(term, term_info) {
                Some(term_docs) => {
                    postings.insert(term.to_owned(), term_docs);
                }
                None => corrupt_terms += 1,
            }
        }

        LoadedIndex { doc_table: self.doc_table, postings, corrupt_terms }
    }
}

fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| Error::io(path, e))
}

fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(Error::MissingArtifact(path.to_path_buf()));
    }
    std::fs::read(path).map_err(|e| Error::io(path, e))
}

pub fn save(postings: &PostingsMap, store_folder_path: &Path) -> Result<StoreStats> {
    let stats = CompressedStore::from_postings(postings)?.write_to(store_folder_path)?;

    let raw_positions: usize = postings.values().flat_map(|docs| docs.values()).map(|positions| positions.len()).sum();
    let raw_bytes = raw_positions * std::mem::size_of::<u32>();
    info!(
        "Compressed {} terms over {} documents: {} positions ({} bytes as u32) into {} bytes of postings, {} bytes in total",
        stats.num_terms, stats.num_docs, raw_positions, raw_bytes, stats.postings_bytes, stats.total_bytes,
    );
    if stats.postings_bytes > 0 {
        info!("Compression ratio {:.2}", raw_bytes as f64 / stats.postings_bytes as f64);
    }

    Ok(stats)
}

pub fn load(store_folder_path: &Path) -> Result<LoadedIndex> {
    let loaded = CompressedStore::read_from(store_folder_path)?.decode();

    if !loaded.doc_table.is_sorted() {
        warn!("{} is not sorted, doc ids do not follow document order", DOC_MAP_FILE);
    }

    if loaded.corrupt_terms > 0 {
        warn!("{} corrupt terms were skipped while loading {}", loaded.corrupt_terms, store_folder_path.display());
    }
    info!("Loaded {} terms over {} documents", loaded.postings.len(), loaded.doc_table.len());

    Ok(loaded)
}
