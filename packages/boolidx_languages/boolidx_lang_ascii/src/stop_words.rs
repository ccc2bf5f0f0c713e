use std::collections::HashSet;

use boolidx_common::language::BoolLanguageConfig;

// Same list as tantivy
pub static ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it", "no",
    "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these", "they", "this",
    "to", "was", "will", "with",
];

fn get_stop_words_set<'a, T: IntoIterator<Item = &'a str>>(stop_words: T) -> HashSet<String> {
    stop_words.into_iter().map(|word| word.to_ascii_lowercase()).collect()
}

/// Configured stop words take precedence over the language's defaults
pub fn get_stop_words(lang_config: &BoolLanguageConfig, defaults: &[&'static str]) -> HashSet<String> {
    if let Some(stop_words) = &lang_config.options.stop_words {
        get_stop_words_set(stop_words.iter().map(|s| s.as_str()))
    } else {
        get_stop_words_set(defaults.iter().copied())
    }
}
