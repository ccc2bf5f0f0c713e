use std::collections::BTreeSet;

use crate::PostingsMap;

/// Dense doc ids for document identifiers.
///
/// A table built from postings assigns ids in lexicographic order of the identifiers,
/// which is what lets the searcher treat sorted doc ids as sorted identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocTable {
    doc_names: Vec<String>,
}

impl DocTable {
    pub fn from_postings(postings: &PostingsMap) -> Self {
        let all_docs: BTreeSet<&str> = postings
            .values()
            .flat_map(|docs| docs.keys().map(|doc| doc.as_str()))
            .collect();

        DocTable {
            doc_names: all_docs.into_iter().map(|doc| doc.to_owned()).collect(),
        }
    }

    /// Takes identifiers exactly as persisted, the index in `doc_names` being the doc id.
    pub fn from_names(doc_names: Vec<String>) -> Self {
        DocTable { doc_names }
    }

    pub fn len(&self) -> usize {
        self.doc_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_names.is_empty()
    }

    pub fn get_doc_name(&self, doc_id: u32) -> Option<&str> {
        self.doc_names.get(doc_id as usize).map(|name| name.as_str())
    }

    /// Only meaningful for sorted tables, which is always the case for [`DocTable::from_postings`].
    pub fn get_doc_id(&self, doc_name: &str) -> Option<u32> {
        self.doc_names
            .binary_search_by(|probe| probe.as_str().cmp(doc_name))
            .ok()
            .map(|idx| idx as u32)
    }

    pub fn is_sorted(&self) -> bool {
        self.doc_names.windows(2).all(|pair| pair[0] < pair[1])
    }

    pub fn doc_names(&self) -> &[String] {
        &self.doc_names
    }

    pub fn into_doc_names(self) -> Vec<String> {
        self.doc_names
    }
}
