pub mod postings_list;
pub mod searcher;
pub mod set_ops;

pub use postings_list::SearchIndex;
pub use searcher::{QueryError, Searcher};
