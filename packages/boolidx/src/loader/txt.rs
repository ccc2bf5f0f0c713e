use std::path::Path;

use log::error;
use path_slash::PathExt;

use crate::error::{Error, Result};
use crate::loader::{LoadedDocument, Loader};

/// Indexes each `.txt` file as one document, identified by its slash separated relative path.
pub struct TxtLoader;

impl Loader for TxtLoader {
    fn try_index_file(&self, absolute_path: &Path, relative_path: &Path) -> Option<Result<Vec<LoadedDocument>>> {
        if relative_path.extension()? != "txt" {
            return None;
        }

        let doc_id = match relative_path.to_slash() {
            Some(doc_id) => doc_id.into_owned(),
            None => {
                error!("Unable to index {} containing non-unicode characters", relative_path.to_slash_lossy());
                return None;
            }
        };

        Some(
            std::fs::read_to_string(absolute_path)
                .map(|text| vec![LoadedDocument { doc_id, text }])
                .map_err(|e| Error::io(absolute_path, e)),
        )
    }

    fn get_name(&self) -> String {
        "TxtLoader".to_owned()
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::TxtLoader;
    use crate::loader::{LoadedDocument, Loader};

    #[test]
    fn test_txt_loader() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let absolute_path = dir.path().join("sub").join("a.txt");
        std::fs::write(&absolute_path, "Lorem ipsum").unwrap();

        let docs = TxtLoader.try_index_file(&absolute_path, &Path::new("sub").join("a.txt")).unwrap().unwrap();
        assert_eq!(docs, vec![LoadedDocument { doc_id: "sub/a.txt".to_owned(), text: "Lorem ipsum".to_owned() }]);

        assert!(TxtLoader.try_index_file(&absolute_path, Path::new("a.md")).is_none());
        assert!(TxtLoader.try_index_file(&absolute_path, Path::new("README")).is_none());
        assert!(TxtLoader.try_index_file(&dir.path().join("missing.txt"), Path::new("missing.txt")).unwrap().is_err());
    }
}
