use std::fmt;

pub type TermIter<'a> = Box<dyn Iterator<Item = String> + 'a>;

/// Tokenizes document text into normalized terms, in position order.
pub trait IndexerTokenizer {
    fn tokenize<'a>(&'a self, text: &'a str) -> TermIter<'a>;
}

/// Lexes a raw query with the same normalization as [`IndexerTokenizer`],
/// additionally splitting out brackets and the boolean keywords.
pub trait SearchTokenizer {
    fn search_tokenize(&self, query: &str) -> Vec<QueryToken>;

    fn is_stop_word(&self, term: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    Term(String),
    And,
    Or,
    Not,
    OpenGroup,
    CloseGroup,
}

impl QueryToken {
    pub fn term(term: &str) -> Self {
        QueryToken::Term(term.to_owned())
    }

    /// Recognizes the boolean keywords case-insensitively
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(QueryToken::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(QueryToken::Or)
        } else if word.eq_ignore_ascii_case("not") {
            Some(QueryToken::Not)
        } else {
            None
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, QueryToken::And | QueryToken::Or | QueryToken::Not)
    }
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryToken::Term(term) => f.write_str(term),
            QueryToken::And => f.write_str("AND"),
            QueryToken::Or => f.write_str("OR"),
            QueryToken::Not => f.write_str("NOT"),
            QueryToken::OpenGroup => f.write_str("("),
            QueryToken::CloseGroup => f.write_str(")"),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::QueryToken;

    #[test]
    fn test_keywords() {
        assert_eq!(QueryToken::from_keyword("AND"), Some(QueryToken::And));
        assert_eq!(QueryToken::from_keyword("oR"), Some(QueryToken::Or));
        assert_eq!(QueryToken::from_keyword("not"), Some(QueryToken::Not));
        assert_eq!(QueryToken::from_keyword("nothing"), None);
        assert_eq!(QueryToken::from_keyword("andor"), None);
    }

    #[test]
    fn test_display() {
        let tokens = vec![
            QueryToken::Not,
            QueryToken::OpenGroup,
            QueryToken::term("lorem"),
            QueryToken::Or,
            QueryToken::term("ipsum"),
            QueryToken::CloseGroup,
        ];
        let displayed: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
        assert_eq!(displayed.join(" "), "NOT ( lorem OR ipsum )");
    }
}
