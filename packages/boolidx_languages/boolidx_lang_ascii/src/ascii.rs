use std::borrow::Cow;
use std::collections::HashSet;

use regex::Regex;

use boolidx_common::language::BoolLanguageConfig;
use boolidx_common::tokenize::{IndexerTokenizer, QueryToken, SearchTokenizer, TermIter};

use crate::stop_words::{get_stop_words, ENGLISH_STOP_WORDS};

lazy_static! {
    static ref TERM_SPLITTER: Regex = Regex::new(r"[^\s()]+").unwrap();
    static ref QUERY_LEXER: Regex = Regex::new(r"[()]|[^\s()]+").unwrap();
}

pub struct Tokenizer {
    pub stop_words: HashSet<String>,
    /// Unlimited when `None`
    max_term_len: Option<usize>,
}

impl Default for Tokenizer {
    fn default() -> Tokenizer {
        Tokenizer {
            stop_words: HashSet::new(),
            max_term_len: None,
        }
    }
}

/// "ascii": no stop words unless configured
pub fn new_with_options(lang_config: &BoolLanguageConfig) -> Tokenizer {
    with_default_stop_words(lang_config, &[])
}

/// "ascii_english": english stop words unless configured
pub fn new_english_with_options(lang_config: &BoolLanguageConfig) -> Tokenizer {
    with_default_stop_words(lang_config, ENGLISH_STOP_WORDS)
}

fn with_default_stop_words(lang_config: &BoolLanguageConfig, defaults: &[&'static str]) -> Tokenizer {
    Tokenizer {
        stop_words: get_stop_words(lang_config, defaults),
        max_term_len: lang_config.options.max_term_len,
    }
}

/// Lowercases and blanks out digits, so that "Rust2018" indexes as "rust"
fn normalize(text: &str) -> Cow<str> {
    if text.bytes().any(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
        Cow::Owned(
            text.chars()
                .map(|c| if c.is_ascii_digit() { ' ' } else { c.to_ascii_lowercase() })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

impl Tokenizer {
    fn is_valid_term(&self, term: &str) -> bool {
        !term.is_empty()
            && self.max_term_len.map_or(true, |max_term_len| term.len() <= max_term_len)
            && !self.stop_words.contains(term)
    }
}

impl IndexerTokenizer for Tokenizer {
    fn tokenize<'a>(&'a self, text: &'a str) -> TermIter<'a> {
        let terms: Vec<String> = TERM_SPLITTER
            .find_iter(&normalize(text))
            .map(|m| m.as_str())
            .filter(|term| self.is_valid_term(term))
            .map(|term| term.to_owned())
            .collect();

        Box::new(terms.into_iter())
    }
}

impl SearchTokenizer for Tokenizer {
    fn search_tokenize(&self, query: &str) -> Vec<QueryToken> {
        QUERY_LEXER
            .find_iter(&normalize(query))
            .filter_map(|m| match m.as_str() {
                "(" => Some(QueryToken::OpenGroup),
                ")" => Some(QueryToken::CloseGroup),
                // Overlong terms are kept, they can only match nothing
                word => QueryToken::from_keyword(word).or_else(|| {
                    if !self.stop_words.contains(word) {
                        Some(QueryToken::term(word))
                    } else {
                        None
                    }
                }),
            })
            .collect()
    }

    fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }
}
