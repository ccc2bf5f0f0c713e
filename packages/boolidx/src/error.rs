use std::io;
use std::path::PathBuf;

use thiserror::Error;

use boolidx_common::postings::CodecError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid json: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("index artifact {0} is missing")]
    MissingArtifact(PathBuf),

    #[error("postings of term \"{term}\" could not be encoded: {source}")]
    Codec {
        term: String,
        #[source]
        source: CodecError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Json { path: path.into(), source }
    }
}
