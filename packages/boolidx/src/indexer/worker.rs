use std::sync::Arc;

use crossbeam::channel::{self, Receiver, Sender};
use rustc_hash::FxHashMap;

use boolidx_common::tokenize::IndexerTokenizer;

use crate::loader::LoadedDocument;

pub struct TokenizedDoc {
    pub doc_id: String,
    pub term_positions: FxHashMap<String, Vec<u32>>,
}

fn tokenize_doc(tokenizer: &dyn IndexerTokenizer, doc: LoadedDocument) -> TokenizedDoc {
    let mut term_positions: FxHashMap<String, Vec<u32>> = FxHashMap::default();
    for (pos, term) in tokenizer.tokenize(&doc.text).enumerate() {
        term_positions.entry(term).or_default().push(pos as u32);
    }

    TokenizedDoc { doc_id: doc.doc_id, term_positions }
}

/// Tokenizes on `num_threads` workers, returning documents in their input order
pub fn tokenize_docs(
    docs: Vec<LoadedDocument>,
    tokenizer: &Arc<dyn IndexerTokenizer + Send + Sync>,
    num_threads: usize,
) -> Vec<TokenizedDoc> {
    let num_docs = docs.len();
    if num_threads <= 1 || num_docs <= 1 {
        return docs.into_iter().map(|doc| tokenize_doc(tokenizer.as_ref(), doc)).collect();
    }

    let (tx_main, rx_worker): (Sender<(usize, LoadedDocument)>, Receiver<(usize, LoadedDocument)>) =
        channel::unbounded();
    let (tx_worker, rx_main): (Sender<(usize, TokenizedDoc)>, Receiver<(usize, TokenizedDoc)>) =
        channel::unbounded();

    for job in docs.into_iter().enumerate() {
        // Receivers are alive until the scope below ends
        let _ = tx_main.send(job);
    }
    drop(tx_main);

    let mut results: Vec<Option<TokenizedDoc>> = (0..num_docs).map(|_| None).collect();

    crossbeam::scope(|s| {
        for _i in 0..num_threads {
            let rx_worker = rx_worker.clone();
            let tx_worker = tx_worker.clone();
            s.spawn(move |_| {
                for (idx, doc) in rx_worker.iter() {
                    if tx_worker.send((idx, tokenize_doc(tokenizer.as_ref(), doc))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx_worker);

        for (idx, tokenized_doc) in rx_main.iter() {
            results[idx] = Some(tokenized_doc);
        }
    })
    .unwrap_or_else(|e| std::panic::resume_unwind(e));

    results.into_iter().flatten().collect()
}
