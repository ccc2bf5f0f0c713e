use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use boolidx_common::doc_table::DocTable;
use boolidx_common::PostingsMap;

use crate::set_ops::DocSet;

/// Anything that can hand out the sorted doc id set of a term.
pub trait DocSetSource {
    /// Absent terms yield an empty slice
    fn get_doc_set(&self, term: &str) -> &[u32];
}

impl DocSetSource for FxHashMap<String, DocSet> {
    fn get_doc_set(&self, term: &str) -> &[u32] {
        self.get(term).map(|docs| docs.as_slice()).unwrap_or(&[])
    }
}

/// Immutable, query-ready form of a postings map.
///
/// Positions are dropped: boolean retrieval only needs which documents contain a term.
/// Doc ids index into `doc_names`, which is kept sorted, so sorted doc sets
/// always map back to sorted document identifiers.
pub struct SearchIndex {
    doc_names: Vec<String>,
    universe: DocSet,
    term_doc_sets: FxHashMap<String, DocSet>,
}

impl SearchIndex {
    /// `doc_names` may list documents without any term, they still belong to the universe.
    /// Documents only referenced by `postings` are added as well.
    pub fn new<I: IntoIterator<Item = String>>(doc_names: I, postings: &PostingsMap) -> Self {
        let mut all_docs: BTreeSet<String> = doc_names.into_iter().collect();
        for docs in postings.values() {
            for doc in docs.keys() {
                if !all_docs.contains(doc) {
                    all_docs.insert(doc.to_owned());
                }
            }
        }
        let doc_names: Vec<String> = all_docs.into_iter().collect();

        let mut term_doc_sets = FxHashMap::default();
        term_doc_sets.reserve(postings.len());
        for (term, docs) in postings {
            // Both sides are sorted, so are the resulting ids
            let doc_set: DocSet = docs
                .keys()
                .filter_map(|doc| doc_names.binary_search(doc).ok())
                .map(|idx| idx as u32)
                .collect();
            term_doc_sets.insert(term.to_owned(), doc_set);
        }

        SearchIndex {
            universe: (0..doc_names.len() as u32).collect(),
            doc_names,
            term_doc_sets,
        }
    }

    pub fn from_postings(postings: &PostingsMap) -> Self {
        SearchIndex::new(DocTable::from_postings(postings).into_doc_names(), postings)
    }

    pub fn universe(&self) -> &[u32] {
        &self.universe
    }

    pub fn get_doc_name(&self, doc_id: u32) -> Option<&str> {
        self.doc_names.get(doc_id as usize).map(|name| name.as_str())
    }

    pub fn num_docs(&self) -> usize {
        self.doc_names.len()
    }

    pub fn num_terms(&self) -> usize {
        self.term_doc_sets.len()
    }
}

impl DocSetSource for SearchIndex {
    fn get_doc_set(&self, term: &str) -> &[u32] {
        self.term_doc_sets.get_doc_set(term)
    }
}
