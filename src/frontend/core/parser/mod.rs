//! Expression parser module
//!
//! Builds [`ast::Expr`] trees from token lists via the shunting-yard
//! algorithm and serializes trees back to token lists, optionally through
//! an alternate operator mapping table for target-language rendering.

pub mod ast;
pub mod precedence;
pub mod serialize;
pub mod shunting;

#[cfg(test)]
mod tests;

pub use ast::{Expr, ExprKind, OpArity};
pub use serialize::{append_to_token_list, CallRendering, OpRendering, OperatorTable};
pub use shunting::parse;

use crate::frontend::core::lexer::TokenList;
use crate::util::span::Span;

/// A syntax error, carrying the offending token's position and, where
/// applicable, the underlying cause. This is the primary
/// recoverable-by-caller error class: it is expected to be caught at the
/// boundary where one line is analyzed and reported to the user without
/// aborting the session.
#[derive(Debug, thiserror::Error)]
#[error("syntax error at {span}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
    #[source]
    pub cause: Option<Box<SyntaxError>>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, span: Span, cause: SyntaxError) -> Self {
        Self {
            message: message.into(),
            span,
            cause: Some(Box::new(cause)),
        }
    }
}

/// Parses a single expression from the front of `tokens`. Returns `None`
/// for a blank input.
pub fn parse_expression(
    tokens: &mut TokenList,
    stop_tokens: Option<&[&str]>,
) -> Result<Option<Expr>, SyntaxError> {
    let mut roots = shunting::parse(tokens, stop_tokens)?;
    if roots.is_empty() {
        Ok(None)
    } else {
        Ok(Some(roots.remove(0)))
    }
}

/// Parses a separator-delimited expression list. The `delimiter` token
/// designates the list end and is not consumed; `separator` tokens
/// between the expressions are.
pub fn parse_list(
    tokens: &mut TokenList,
    separator: &str,
    delimiter: &str,
) -> Result<Vec<Expr>, SyntaxError> {
    let stops = [separator, delimiter];
    let mut exprs = Vec::new();
    while !tokens.is_blank() && tokens.text_at(0) != delimiter {
        let before = tokens.size();
        exprs.extend(shunting::parse(tokens, Some(&stops))?);
        if !tokens.is_blank() && tokens.text_at(0) == separator {
            tokens.remove(0);
        } else if tokens.size() == before {
            // No progress: tolerate and stop
            break;
        }
    }
    Ok(exprs)
}
