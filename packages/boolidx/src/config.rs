use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::Pattern;
use serde::{Deserialize, Serialize};

use boolidx_common::language::BoolLanguageConfig;
use boolidx_lang_ascii::ascii::{self, Tokenizer};

use crate::error::{Error, Result};
use crate::loader::json::JsonLinesLoader;
use crate::loader::txt::TxtLoader;
use crate::loader::LoaderBoxed;
use crate::CONFIG_FILE;

fn get_default_num_threads() -> usize {
    std::cmp::max(std::cmp::min(num_cpus::get_physical(), num_cpus::get()) - 1, 1)
}

fn get_default_exclude_patterns() -> Vec<String> {
    vec![CONFIG_FILE.to_owned()]
}

fn get_default_loaders() -> Vec<String> {
    vec!["TxtLoader".to_owned(), "JsonLinesLoader".to_owned()]
}

fn get_default_score() -> f32 {
    1.0
}

fn get_default_log_level() -> String {
    "warn".to_owned()
}

#[derive(Serialize, Deserialize)]
pub struct BoolIndexingConfig {
    #[serde(default = "get_default_num_threads", skip_serializing)]
    pub num_threads: usize,

    #[serde(default = "get_default_exclude_patterns")]
    pub exclude: Vec<String>,

    #[serde(default = "get_default_loaders")]
    pub loaders: Vec<String>,

    #[serde(skip, default = "Vec::new")]
    exclude_patterns: Vec<Pattern>,
}

impl Default for BoolIndexingConfig {
    fn default() -> Self {
        BoolIndexingConfig {
            num_threads: get_default_num_threads(),
            exclude: get_default_exclude_patterns(),
            loaders: get_default_loaders(),
            exclude_patterns: get_default_exclude_patterns()
                .iter()
                .filter_map(|pat_str| Pattern::new(pat_str).ok())
                .collect(),
        }
    }
}

impl BoolIndexingConfig {
    pub fn get_loaders_from_config(&self) -> Result<Vec<LoaderBoxed>> {
        self.loaders
            .iter()
            .map(|name| -> Result<LoaderBoxed> {
                match name.as_str() {
                    "TxtLoader" => Ok(Box::new(TxtLoader)),
                    "JsonLinesLoader" => Ok(Box::new(JsonLinesLoader)),
                    _ => Err(Error::Config(format!("unknown loader {}", name))),
                }
            })
            .collect()
    }

    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.exclude_patterns.iter().any(|pat| pat.matches_path(relative_path))
    }

    fn init_patterns(&mut self) -> Result<()> {
        self.exclude_patterns = self
            .exclude
            .iter()
            .map(|pat_str| {
                Pattern::new(pat_str).map_err(|e| Error::Config(format!("invalid exclude pattern {}: {}", pat_str, e)))
            })
            .collect::<Result<Vec<Pattern>>>()?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
pub struct BoolSearchConfig {
    #[serde(default = "get_default_num_threads", skip_serializing)]
    pub num_threads: usize,

    /// Boolean retrieval does not rank, every match is written with this score
    #[serde(default = "get_default_score")]
    pub score: f32,
}

impl Default for BoolSearchConfig {
    fn default() -> Self {
        BoolSearchConfig { num_threads: get_default_num_threads(), score: get_default_score() }
    }
}

#[derive(Serialize, Deserialize)]
pub struct BoolLogConfig {
    #[serde(default = "get_default_log_level")]
    pub level: String,

    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for BoolLogConfig {
    fn default() -> Self {
        BoolLogConfig { level: get_default_log_level(), file: None }
    }
}

#[derive(Serialize, Deserialize, Default)]
pub struct BoolConfig {
    #[serde(default)]
    pub lang_config: BoolLanguageConfig,
    #[serde(default)]
    pub indexing_config: BoolIndexingConfig,
    #[serde(default)]
    pub search_config: BoolSearchConfig,
    #[serde(default)]
    pub log_config: BoolLogConfig,
}

impl BoolConfig {
    pub fn new(raw_config: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(raw_config)
    }

    /// Falls back to the defaults when no file is given
    pub fn from_file(config_file_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(config_file_path) = config_file_path {
            let raw_config = std::fs::read_to_string(config_file_path)
                .map_err(|e| Error::io(config_file_path, e))?;
            BoolConfig::new(&raw_config).map_err(|e| Error::json(config_file_path, e))?
        } else {
            BoolConfig::default()
        };

        config.indexing_config.init_patterns()?;
        Ok(config)
    }

    /// Replaces the configured stop words with the whitespace separated words of a file
    pub fn set_stop_words_file(&mut self, stop_words_path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(stop_words_path).map_err(|e| Error::io(stop_words_path, e))?;
        self.lang_config.options.stop_words = Some(raw.split_whitespace().map(|word| word.to_owned()).collect());
        Ok(())
    }

    pub fn resolve_tokenizer(&self) -> Result<Arc<Tokenizer>> {
        match self.lang_config.lang.as_str() {
            "ascii" => Ok(Arc::new(ascii::new_with_options(&self.lang_config))),
            "ascii_english" => Ok(Arc::new(ascii::new_english_with_options(&self.lang_config))),
            _ => Err(Error::Config(format!("unsupported language {}", self.lang_config.lang))),
        }
    }
}
