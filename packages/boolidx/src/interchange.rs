//! Uncompressed `index.json` form of the postings, `{ term: { document: [positions] } }`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use boolidx_common::PostingsMap;

use crate::error::{Error, Result};

pub fn read_index(index_file_path: &Path) -> Result<PostingsMap> {
    let file = File::open(index_file_path).map_err(|e| Error::io(index_file_path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::json(index_file_path, e))
}

/// Terms and documents come out sorted, so equal maps produce identical files
pub fn write_index(postings: &PostingsMap, index_file_path: &Path) -> Result<()> {
    if let Some(parent) = index_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let file = File::create(index_file_path).map_err(|e| Error::io(index_file_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, postings).map_err(|e| Error::json(index_file_path, e))?;
    writer.write_all(b"\n").and_then(|_| writer.flush()).map_err(|e| Error::io(index_file_path, e))
}
