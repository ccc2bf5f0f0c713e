#[cfg(feature = "indexer")]
use serde::{Serialize, Deserialize};

#[cfg(feature = "indexer")]
fn get_default_language() -> String {
    "ascii".to_owned()
}

#[cfg_attr(feature = "indexer", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct BoolLanguageConfigOpts {
    pub stop_words: Option<Vec<String>>,
    pub max_term_len: Option<usize>,
}

impl Default for BoolLanguageConfigOpts {
    fn default() -> Self {
        BoolLanguageConfigOpts {
            stop_words: None,
            max_term_len: None,
        }
    }
}

#[cfg_attr(feature = "indexer", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct BoolLanguageConfig {
    #[cfg_attr(feature = "indexer", serde(default = "get_default_language"))]
    pub lang: String,

    #[cfg_attr(feature = "indexer", serde(default))]
    pub options: BoolLanguageConfigOpts,
}

impl Default for BoolLanguageConfig {
    fn default() -> Self {
        BoolLanguageConfig {
            lang: "ascii".to_owned(),
            options: BoolLanguageConfigOpts::default(),
        }
    }
}
