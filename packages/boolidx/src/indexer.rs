mod worker;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{error, warn};
use rustc_hash::FxHashSet;
use walkdir::WalkDir;

use boolidx_common::tokenize::IndexerTokenizer;
use boolidx_common::PostingsMap;

use crate::config::BoolConfig;
use crate::error::{Error, Result};
use crate::i_debug;
use crate::loader::{LoadedDocument, LoaderBoxed};
use crate::utils::time;
use worker::tokenize_docs;

/// Collects documents from the corpus, then builds the positional index in one go.
pub struct Indexer {
    tokenizer: Arc<dyn IndexerTokenizer + Send + Sync>,
    loaders: Vec<LoaderBoxed>,
    num_threads: usize,
    docs: Vec<LoadedDocument>,
    seen_doc_ids: FxHashSet<String>,
    start_instant: Option<Instant>,
}

impl Indexer {
    pub fn new(
        tokenizer: Arc<dyn IndexerTokenizer + Send + Sync>,
        loaders: Vec<LoaderBoxed>,
        num_threads: usize,
        log_perf: bool,
    ) -> Self {
        Indexer {
            tokenizer,
            loaders,
            num_threads: std::cmp::max(num_threads, 1),
            docs: Vec::new(),
            seen_doc_ids: FxHashSet::default(),
            start_instant: if log_perf { Some(Instant::now()) } else { None },
        }
    }

    pub fn from_config(config: &BoolConfig, log_perf: bool) -> Result<Self> {
        Ok(Indexer::new(
            config.resolve_tokenizer()?,
            config.indexing_config.get_loaders_from_config()?,
            config.indexing_config.num_threads,
            log_perf,
        ))
    }

    /// The first loader accepting the file wins. Files no loader accepts are ignored.
    pub fn index_file(&mut self, absolute_path: &Path, relative_path: &Path) -> Result<()> {
        for loader in self.loaders.iter() {
            if let Some(loader_result) = loader.try_index_file(absolute_path, relative_path) {
                let docs = loader_result?;
                i_debug!("{} loaded {} documents from {}", loader.get_name(), docs.len(), relative_path.display());

                for doc in docs {
                    self.add_doc(doc);
                }
                return Ok(());
            }
        }

        Ok(())
    }

    /// Document ids must be unique, later duplicates are dropped
    pub fn add_doc(&mut self, doc: LoadedDocument) {
        if self.seen_doc_ids.contains(&doc.doc_id) {
            warn!("Duplicate document id {}, skipping it", doc.doc_id);
            return;
        }

        self.seen_doc_ids.insert(doc.doc_id.clone());
        self.docs.push(doc);
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    /// Positions are zero based token indices within each document.
    /// Documents without any term do not show up in the result.
    pub fn finish(self) -> PostingsMap {
        time::print_time_elapsed(&self.start_instant, "Documents loaded");

        let mut postings = PostingsMap::new();
        for tokenized_doc in tokenize_docs(self.docs, &self.tokenizer, self.num_threads) {
            for (term, positions) in tokenized_doc.term_positions {
                postings.entry(term).or_default().insert(tokenized_doc.doc_id.clone(), positions);
            }
        }

        time::print_time_elapsed(&self.start_instant, "Postings built");
        postings
    }
}

/// Indexes every non-excluded file under `input_folder_path`, visited in sorted path order.
pub fn index_folder(config: &BoolConfig, input_folder_path: &Path, log_perf: bool) -> Result<PostingsMap> {
    if !input_folder_path.is_dir() {
        return Err(Error::io(
            input_folder_path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "corpus folder does not exist"),
        ));
    }

    let mut indexer = Indexer::from_config(config, log_perf)?;

    for entry in WalkDir::new(input_folder_path).sort_by_file_name() {
        match entry {
            Ok(dir_entry) => {
                if !dir_entry.file_type().is_file() {
                    continue;
                }

                let path = dir_entry.path();
                let relative_path = match path.strip_prefix(input_folder_path) {
                    Ok(relative_path) => relative_path,
                    Err(_) => continue,
                };
                if config.indexing_config.is_excluded(relative_path) {
                    continue;
                }

                indexer.index_file(path, relative_path)?;
            }
            Err(e) => {
                error!("Error processing entry. {}", e)
            }
        }
    }

    i_debug!("Indexing {} documents", indexer.num_docs());

    Ok(indexer.finish())
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use boolidx_common::language::BoolLanguageConfig;
    use boolidx_lang_ascii::ascii;

    use super::{index_folder, Indexer};
    use crate::config::BoolConfig;
    use crate::loader::LoadedDocument;

    fn doc(doc_id: &str, text: &str) -> LoadedDocument {
        LoadedDocument { doc_id: doc_id.to_owned(), text: text.to_owned() }
    }

    fn get_indexer(num_threads: usize) -> Indexer {
        let tokenizer = Arc::new(ascii::new_with_options(&BoolLanguageConfig::default()));
        Indexer::new(tokenizer, Vec::new(), num_threads, false)
    }

    #[test]
    fn test_positions() {
        let mut indexer = get_indexer(2);
        indexer.add_doc(doc("d2", "dog cat"));
        indexer.add_doc(doc("d1", "Cat sat on the cat, 42 times"));
        indexer.add_doc(doc("d3", "  "));
        indexer.add_doc(doc("d1", "duplicate"));

        let postings = indexer.finish();

        assert_eq!(postings.keys().collect::<Vec<_>>(), vec!["cat", "cat,", "dog", "on", "sat", "the", "times"]);
        assert_eq!(postings["cat"].iter().collect::<Vec<_>>(), vec![(&"d1".to_owned(), &vec![0]), (&"d2".to_owned(), &vec![1])]);
        assert_eq!(postings["cat,"]["d1"], vec![4]);
        assert_eq!(postings["times"]["d1"], vec![5]);
        assert!(!postings.contains_key("duplicate"));
    }

    #[test]
    fn test_thread_count_does_not_matter() {
        let texts: Vec<String> = (0..50).map(|i| format!("lorem ipsum{} dolor lorem {}", i % 7, i)).collect();

        let build = |num_threads| {
            let mut indexer = get_indexer(num_threads);
            for (i, text) in texts.iter().enumerate() {
                indexer.add_doc(doc(&format!("doc{:02}", i), text));
            }
            indexer.finish()
        };

        assert_eq!(build(1), build(4));
    }

    #[test]
    fn test_index_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("drafts")).unwrap();
        std::fs::write(dir.path().join("a.txt"), "lorem ipsum").unwrap();
        std::fs::write(dir.path().join("drafts").join("b.txt"), "lorem").unwrap();
        std::fs::write(dir.path().join("c.jsonl"), r#"{"doc_id": 7, "title": "Ipsum", "abstract": "dolor"}"#).unwrap();
        std::fs::write(dir.path().join("boolidx.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "indexing_config": { "exclude": ["drafts/*", "*.json"] } }"#).unwrap();
        let config = BoolConfig::from_file(Some(&config_path)).unwrap();

        let postings = index_folder(&config, dir.path(), false).unwrap();

        assert_eq!(postings.keys().collect::<Vec<_>>(), vec!["dolor", "ipsum", "lorem"]);
        assert_eq!(postings["ipsum"].keys().collect::<Vec<_>>(), vec!["7", "a.txt"]);
        assert_eq!(postings["lorem"].keys().collect::<Vec<_>>(), vec!["a.txt"]);
        assert_eq!(postings["dolor"]["7"], vec![1]);

        assert!(index_folder(&config, &dir.path().join("missing"), false).is_err());
    }
}
