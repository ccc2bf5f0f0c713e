use std::fmt;

use boolidx_common::tokenize::QueryToken;

use super::QueryError;
use crate::postings_list::DocSetSource;
use crate::set_ops::{self, DocSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    Term(String),
    And(Box<QueryNode>, Box<QueryNode>),
    Or(Box<QueryNode>, Box<QueryNode>),
    Not(Box<QueryNode>),
}

/// Deepest tree [`build_tree`] assembles. Evaluating, printing and dropping a tree all recurse.
pub const MAX_QUERY_DEPTH: usize = 1000;

type Operand = (QueryNode, usize);

fn pop_operand(operands: &mut Vec<Operand>, operator: &'static str) -> Result<Operand, QueryError> {
    operands.pop().ok_or(QueryError::MissingOperand { operator })
}

fn check_depth(depth: usize) -> Result<usize, QueryError> {
    if depth > MAX_QUERY_DEPTH {
        Err(QueryError::TooDeep { max_depth: MAX_QUERY_DEPTH })
    } else {
        Ok(depth)
    }
}

fn join(
    operands: &mut Vec<Operand>,
    operator: &'static str,
    to_node: fn(Box<QueryNode>, Box<QueryNode>) -> QueryNode,
) -> Result<Operand, QueryError> {
    let (right, right_depth) = pop_operand(operands, operator)?;
    let (left, left_depth) = pop_operand(operands, operator)?;
    let depth = check_depth(left_depth.max(right_depth) + 1)?;
    Ok((to_node(Box::new(left), Box::new(right)), depth))
}

/// Assembles a postfix token sequence into a single tree, no deeper than [`MAX_QUERY_DEPTH`].
pub fn build_tree(postfix: Vec<QueryToken>) -> Result<QueryNode, QueryError> {
    // Each operand carries the depth of its subtree
    let mut operands: Vec<Operand> = Vec::new();

    for token in postfix {
        let operand = match token {
            QueryToken::Term(term) => (QueryNode::Term(term), 1),
            QueryToken::Not => {
                let (child, depth) = pop_operand(&mut operands, "NOT")?;
                let depth = check_depth(depth + 1)?;
                (QueryNode::Not(Box::new(child)), depth)
            }
            QueryToken::And => join(&mut operands, "AND", QueryNode::And)?,
            QueryToken::Or => join(&mut operands, "OR", QueryNode::Or)?,
            // Groups are resolved by to_postfix
            QueryToken::OpenGroup | QueryToken::CloseGroup => continue,
        };
        operands.push(operand);
    }

    match operands.len() {
        0 => Err(QueryError::EmptyQuery),
        1 => operands.pop().map(|(root, _)| root).ok_or(QueryError::EmptyQuery),
        n => Err(QueryError::DanglingOperands(n)),
    }
}

impl QueryNode {
    /// Evaluates the tree bottom up into a sorted, duplicate-free doc id set.
    ///
    /// `universe` is the sorted set of all doc ids, which is what NOT complements against.
    pub fn evaluate<S: DocSetSource + ?Sized>(&self, postings: &S, universe: &[u32]) -> DocSet {
        match self {
            QueryNode::Term(term) => postings.get_doc_set(term).to_vec(),
            QueryNode::And(left, right) => {
                let left = left.evaluate(postings, universe);
                if left.is_empty() {
                    return left;
                }
                set_ops::intersect(&left, &right.evaluate(postings, universe))
            }
            QueryNode::Or(left, right) => {
                set_ops::union(&left.evaluate(postings, universe), &right.evaluate(postings, universe))
            }
            QueryNode::Not(child) => set_ops::difference(universe, &child.evaluate(postings, universe)),
        }
    }
}

/// Fully bracketed, mainly for logging how a query was understood
impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Term(term) => f.write_str(term),
            QueryNode::And(left, right) => write!(f, "({} AND {})", left, right),
            QueryNode::Or(left, right) => write!(f, "({} OR {})", left, right),
            QueryNode::Not(child) => write!(f, "(NOT {})", child),
        }
    }
}
