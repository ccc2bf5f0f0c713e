//! Batch evaluation of json-lines queries against a loaded index.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crossbeam::channel::{self, Receiver, Sender};
use log::{info, warn};
use serde::Deserialize;

use boolidx_search::{QueryError, Searcher};

use crate::error::{Error, Result};
use crate::utils::record_id::RecordId;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub query_id: RecordId,
    /// The boolean expression
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetrievalStats {
    pub num_queries: usize,
    pub num_skipped: usize,
    pub num_results: usize,
}

/// Blank lines are ignored, malformed ones are skipped with a warning
pub fn read_queries<R: BufRead>(reader: R, source_name: &str) -> Result<Vec<QueryRecord>> {
    let mut queries = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(source_name, e))?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<QueryRecord>(&line) {
            Ok(query) => queries.push(query),
            Err(e) => warn!("Skipping line {} of {}: {}", line_idx + 1, source_name, e),
        }
    }

    Ok(queries)
}

/// Evaluates every query on `num_threads` workers sharing the searcher.
///
/// Results are in the order of `queries`, whatever order the workers finish in.
pub fn run_queries<'s>(
    searcher: &'s Searcher,
    queries: &[QueryRecord],
    num_threads: usize,
) -> Vec<std::result::Result<Vec<&'s str>, QueryError>> {
    let num_threads = std::cmp::max(1, std::cmp::min(num_threads, queries.len()));
    if num_threads == 1 {
        return queries.iter().map(|query| searcher.search(&query.title)).collect();
    }

    let (tx_main, rx_worker): (Sender<(usize, &str)>, Receiver<(usize, &str)>) = channel::unbounded();
    let (tx_worker, rx_main) = channel::unbounded();

    for (idx, query) in queries.iter().enumerate() {
        // Receivers are alive until the scope below ends
        let _ = tx_main.send((idx, query.title.as_str()));
    }
    drop(tx_main);

    let mut results: Vec<Option<std::result::Result<Vec<&'s str>, QueryError>>> =
        (0..queries.len()).map(|_| None).collect();

    crossbeam::scope(|s| {
        for _i in 0..num_threads {
            let rx_worker = rx_worker.clone();
            let tx_worker = tx_worker.clone();
            s.spawn(move |_| {
                for (idx, query) in rx_worker.iter() {
                    if tx_worker.send((idx, searcher.search(query))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx_worker);

        for (idx, result) in rx_main.iter() {
            results[idx] = Some(result);
        }
    })
    .unwrap_or_else(|e| std::panic::resume_unwind(e));

    results.into_iter().flatten().collect()
}

/// Writes `query_id document_id rank score` lines, rank being 1 based.
/// Queries that failed to parse are logged and produce no lines.
pub fn write_results<W: Write>(
    writer: &mut W,
    queries: &[QueryRecord],
    results: &[std::result::Result<Vec<&str>, QueryError>],
    score: f32,
) -> std::io::Result<RetrievalStats> {
    let mut stats = RetrievalStats { num_queries: queries.len(), ..RetrievalStats::default() };

    for (query, result) in queries.iter().zip(results) {
        match result {
            Ok(doc_ids) => {
                for (rank, doc_id) in doc_ids.iter().enumerate() {
                    writeln!(writer, "{} {} {} {}", query.query_id, doc_id, rank + 1, score)?;
                }
                stats.num_results += doc_ids.len();
            }
            Err(e) => {
                warn!("Skipping query {} \"{}\": {}", query.query_id, query.title, e);
                stats.num_skipped += 1;
            }
        }
    }

    Ok(stats)
}

pub fn retrieve(
    searcher: &Searcher,
    queries_file_path: &Path,
    output_file_path: &Path,
    num_threads: usize,
    score: f32,
) -> Result<RetrievalStats> {
    let queries_file = File::open(queries_file_path).map_err(|e| Error::io(queries_file_path, e))?;
    let queries = read_queries(BufReader::new(queries_file), &queries_file_path.to_string_lossy())?;

    let start = Instant::now();
    let results = run_queries(searcher, &queries, num_threads);
    info!("Evaluated {} queries in {:.3}s", queries.len(), start.elapsed().as_secs_f64());

    let output_file = File::create(output_file_path).map_err(|e| Error::io(output_file_path, e))?;
    let mut writer = BufWriter::new(output_file);
    let stats = write_results(&mut writer, &queries, &results, score)
        .and_then(|stats| writer.flush().map(|_| stats))
        .map_err(|e| Error::io(output_file_path, e))?;

    info!(
        "Wrote {} results for {} queries, {} skipped",
        stats.num_results, stats.num_queries, stats.num_skipped,
    );
    Ok(stats)
}
