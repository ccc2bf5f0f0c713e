pub mod query_parser;
pub mod query_tree;

use std::sync::Arc;

use thiserror::Error;

use boolidx_common::tokenize::SearchTokenizer;

use crate::postings_list::SearchIndex;
use crate::set_ops::DocSet;
use query_tree::{build_tree, QueryNode};

/// Queries that cannot be assembled into a tree. Unbalanced brackets are repaired instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("operator {operator} is missing an operand")]
    MissingOperand { operator: &'static str },

    #[error("{0} operands are not joined by any operator")]
    DanglingOperands(usize),

    #[error("query contains no terms")]
    EmptyQuery,

    #[error("query nests deeper than {max_depth} levels")]
    TooDeep { max_depth: usize },
}

pub struct Searcher {
    index: SearchIndex,
    tokenizer: Arc<dyn SearchTokenizer + Send + Sync>,
}

impl Searcher {
    pub fn new(index: SearchIndex, tokenizer: Arc<dyn SearchTokenizer + Send + Sync>) -> Self {
        Searcher { index, tokenizer }
    }

    pub fn get_index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn parse_query(&self, query: &str) -> Result<QueryNode, QueryError> {
        build_tree(query_parser::parse_query(query, self.tokenizer.as_ref()))
    }

    pub fn search_doc_ids(&self, query: &str) -> Result<DocSet, QueryError> {
        let tree = self.parse_query(query)?;
        Ok(tree.evaluate(&self.index, self.index.universe()))
    }

    /// Matching document identifiers, in sorted order
    pub fn search(&self, query: &str) -> Result<Vec<&str>, QueryError> {
        Ok(self
            .search_doc_ids(query)?
            .into_iter()
            .filter_map(|doc_id| self.index.get_doc_name(doc_id))
            .collect())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use boolidx_common::language::BoolLanguageConfig;
    use boolidx_lang_ascii::ascii;

    use super::query_tree::MAX_QUERY_DEPTH;
    use super::{QueryError, Searcher};
    use crate::postings_list::test::to_postings;
    use crate::postings_list::SearchIndex;

    fn get_searcher() -> Searcher {
        let index = SearchIndex::from_postings(&to_postings(vec![
            ("cat", vec![("d1", vec![0]), ("d2", vec![3])]),
            ("dog", vec![("d2", vec![0])]),
        ]));
        Searcher::new(index, Arc::new(ascii::new_with_options(&BoolLanguageConfig::default())))
    }

    #[test]
    fn test_cat_dog() {
        let searcher = get_searcher();

        assert_eq!(searcher.search("cat AND dog"), Ok(vec!["d2"]));
        assert_eq!(searcher.search("cat OR dog"), Ok(vec!["d1", "d2"]));
        assert_eq!(searcher.search("NOT cat"), Ok(vec![]));
        assert_eq!(searcher.search("cat NOT dog"), Ok(vec!["d1"]));
        assert_eq!(searcher.search("Cat dog"), Ok(vec!["d2"]));
        assert_eq!(searcher.search("bird"), Ok(vec![]));
        assert_eq!(searcher.search("NOT bird"), Ok(vec!["d1", "d2"]));
    }

    #[test]
    fn test_long_unknown_term() {
        let searcher = get_searcher();
        let long_term = "x".repeat(81);

        assert_eq!(searcher.search(&format!("cat OR {}", long_term)), Ok(vec!["d1", "d2"]));
        assert_eq!(searcher.search(&format!("cat AND {}", long_term)), Ok(vec![]));
        assert_eq!(searcher.search(&format!("NOT {}", "y".repeat(10_000))), Ok(vec!["d1", "d2"]));
    }

    #[test]
    fn test_deep_query() {
        let searcher = get_searcher();

        assert_eq!(
            searcher.search(&format!("{}cat", "NOT ".repeat(10_000))),
            Err(QueryError::TooDeep { max_depth: MAX_QUERY_DEPTH }),
        );
        assert_eq!(searcher.search(&format!("{}cat", "NOT NOT ".repeat(100))), Ok(vec!["d1", "d2"]));
        assert_eq!(searcher.search("cat AND dog"), Ok(vec!["d2"]));
    }

    #[test]
    fn test_invalid_queries() {
        let searcher = get_searcher();

        assert_eq!(searcher.search("AND cat"), Err(QueryError::MissingOperand { operator: "AND" }));
        assert_eq!(searcher.search("   "), Err(QueryError::EmptyQuery));
        // Repaired, not rejected
        assert_eq!(searcher.search("(cat OR dog"), Ok(vec!["d1", "d2"]));
        assert_eq!(searcher.search("cat) dog"), Ok(vec!["d2"]));
    }
}
