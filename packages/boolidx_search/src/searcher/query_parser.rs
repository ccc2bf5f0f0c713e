use boolidx_common::tokenize::{QueryToken, SearchTokenizer};

fn ends_operand(token: &QueryToken) -> bool {
    matches!(token, QueryToken::Term(_) | QueryToken::CloseGroup)
}

fn starts_operand(token: &QueryToken) -> bool {
    matches!(token, QueryToken::Term(_) | QueryToken::OpenGroup | QueryToken::Not)
}

/// Juxtaposition means AND: `cat dog`, `cat (dog)`, `(cat) NOT dog` and so on.
pub fn insert_implicit_and(tokens: Vec<QueryToken>) -> Vec<QueryToken> {
    let mut result: Vec<QueryToken> = Vec::with_capacity(tokens.len() * 2);

    for token in tokens {
        if result.last().map_or(false, |prev| ends_operand(prev) && starts_operand(&token)) {
            result.push(QueryToken::And);
        }
        result.push(token);
    }

    result
}

fn get_precedence(token: &QueryToken) -> u8 {
    match token {
        QueryToken::Not => 3,
        QueryToken::And => 2,
        QueryToken::Or => 1,
        _ => 0,
    }
}

/// Whether `top`, sitting on the operator stack, binds tighter than the incoming operator
fn pops_before(top: &QueryToken, incoming: &QueryToken) -> bool {
    if !top.is_operator() {
        return false;
    }

    let top_precedence = get_precedence(top);
    let precedence = get_precedence(incoming);
    // NOT is the only right associative operator
    top_precedence > precedence || (top_precedence == precedence && *incoming != QueryToken::Not)
}

/// Shunting-yard conversion to postfix order, groups are resolved and never emitted.
///
/// Unbalanced groups are repaired rather than rejected:
/// an unmatched `)` flushes the whole operator stack and is dropped,
/// unmatched `(` are dropped at the end.
pub fn to_postfix(tokens: Vec<QueryToken>) -> Vec<QueryToken> {
    let mut output: Vec<QueryToken> = Vec::with_capacity(tokens.len());
    let mut operator_stack: Vec<QueryToken> = Vec::new();

    for token in tokens {
        match token {
            QueryToken::Term(_) => output.push(token),
            QueryToken::OpenGroup => operator_stack.push(token),
            QueryToken::CloseGroup => {
                while let Some(top) = operator_stack.pop() {
                    if top == QueryToken::OpenGroup {
                        break;
                    }
                    output.push(top);
                }
            }
            operator => {
                while operator_stack.last().map_or(false, |top| pops_before(top, &operator)) {
                    if let Some(top) = operator_stack.pop() {
                        output.push(top);
                    }
                }
                operator_stack.push(operator);
            }
        }
    }

    while let Some(top) = operator_stack.pop() {
        if top.is_operator() {
            output.push(top);
        }
    }

    output
}

/// Lexes and orders a raw query for [`super::query_tree::build_tree`]
pub fn parse_query(query: &str, tokenizer: &dyn SearchTokenizer) -> Vec<QueryToken> {
    to_postfix(insert_implicit_and(tokenizer.search_tokenize(query)))
}
