use std::path::Path;

use pretty_assertions::assert_eq;

use boolidx::store::{self, CompressedStore, TermInfo};
use boolidx::Error;
use boolidx_common::PostingsMap;

fn get_postings() -> PostingsMap {
    serde_json::from_str(
        r#"{
            "cat": { "d1": [0], "d2": [3] },
            "dog": { "d2": [0] },
            "lorem": { "a.txt": [1, 129, 130, 70000], "d1": [2, 5] },
            "ipsum": { "a.txt": [0] }
        }"#,
    )
    .unwrap()
}

fn read_artifacts(store_folder_path: &Path) -> Vec<Vec<u8>> {
    ["doc_map.json", "metadata.json", "postings.bin"]
        .iter()
        .map(|file| std::fs::read(store_folder_path.join(file)).unwrap())
        .collect()
}

#[test]
fn test_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let postings = get_postings();

    let stats = store::save(&postings, dir.path()).unwrap();
    assert_eq!(stats.num_terms, 4);
    assert_eq!(stats.num_docs, 3);

    let loaded = store::load(dir.path()).unwrap();
    assert_eq!(loaded.postings, postings);
    assert_eq!(loaded.corrupt_terms, 0);
    assert_eq!(loaded.doc_table.doc_names(), &["a.txt", "d1", "d2"]);

    let doc_map: Vec<String> =
        serde_json::from_slice(&std::fs::read(dir.path().join("doc_map.json")).unwrap()).unwrap();
    assert_eq!(doc_map, vec!["a.txt", "d1", "d2"]);
}

#[test]
fn test_save_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    store::save(&get_postings(), first.path()).unwrap();
    store::save(&get_postings(), second.path()).unwrap();

    assert_eq!(read_artifacts(first.path()), read_artifacts(second.path()));
}

#[test]
fn test_missing_artifact() {
    for artifact in &["doc_map.json", "metadata.json", "postings.bin"] {
        let dir = tempfile::tempdir().unwrap();
        store::save(&get_postings(), dir.path()).unwrap();
        std::fs::remove_file(dir.path().join(artifact)).unwrap();

        match store::load(dir.path()) {
            Err(Error::MissingArtifact(path)) => assert!(path.ends_with(artifact)),
            other => panic!("expected a missing artifact error, got {:?}", other.map(|loaded| loaded.postings)),
        }
    }
}

#[test]
fn test_malformed_metadata() {
    let dir = tempfile::tempdir().unwrap();
    store::save(&get_postings(), dir.path()).unwrap();
    std::fs::write(dir.path().join("metadata.json"), "{ \"cat\": ").unwrap();

    assert!(matches!(store::load(dir.path()), Err(Error::Json { .. })));
}

#[test]
fn test_corrupt_entry_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut postings = get_postings();
    store::save(&postings, dir.path()).unwrap();

    let mut compressed = CompressedStore::read_from(dir.path()).unwrap();
    let blob_len = compressed.postings_blob.len() as u64;
    compressed.term_directory.insert("dog".to_owned(), TermInfo { offset: blob_len + 10, length: 2 });
    std::fs::write(dir.path().join("metadata.json"), serde_json::to_vec(&compressed.term_directory).unwrap()).unwrap();

    let loaded = store::load(dir.path()).unwrap();
    postings.remove("dog");
    assert_eq!(loaded.postings, postings);
    assert_eq!(loaded.corrupt_terms, 1);
}

#[test]
fn test_empty_index() {
    let dir = tempfile::tempdir().unwrap();
    store::save(&PostingsMap::new(), dir.path()).unwrap();

    let loaded = store::load(dir.path()).unwrap();
    assert!(loaded.postings.is_empty());
    assert!(loaded.doc_table.is_empty());
}
