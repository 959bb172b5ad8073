//! structogram
//!
//! Expression and type analysis core for a structogram (Nassi-Shneiderman
//! diagram) pseudocode editor. One line of loosely-typed, keyword-
//! configurable pseudocode goes in; out come a reconstructable token
//! list, an expression syntax tree, and inferred types for every
//! sub-expression, tracked through a shared type registry.
//!
//! # Example
//!
//! ```rust
//! use structogram::frontend::core::lexer::TokenList;
//! use structogram::frontend::core::parser::parse_expression;
//! use structogram::frontend::typecheck::{infer_type, TypeRegistry};
//!
//! let mut tokens = TokenList::from_text("x <- 3 + 4 * 2");
//! let mut expr = parse_expression(&mut tokens, None).unwrap().unwrap();
//! let mut registry = TypeRegistry::new();
//! let ty = infer_type(&mut expr, &mut registry, true).unwrap();
//! assert_eq!(ty.name(), "int");
//! ```

#![doc(html_root_url = "https://docs.rs/structogram")]
#![warn(rust_2018_idioms)]

// Public modules
pub mod frontend;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use thiserror::Error;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "structogram";

use frontend::core::lexer::TokenList;
use frontend::core::parser::{parse_expression, Expr, SyntaxError};
use frontend::keywords::Keywords;
use frontend::typecheck::{infer_type, Type, TypeRegistry};
use std::sync::Arc;
use tracing::debug;

/// Analyzes one line of pseudocode: tokenizes it, strips decorator
/// keywords, parses the leading expression, and infers its type against
/// `registry`. Convenience entry point wiring the pipeline together.
pub fn analyze_line(
    line: &str,
    keywords: &mut Keywords,
    registry: &mut TypeRegistry,
) -> Result<(Option<Expr>, Option<Arc<Type>>), SyntaxError> {
    debug!("analyzing line of {} chars", line.chars().count());
    let mut tokens = keywords.tokenize_line(line);
    keywords.remove_decorators(&mut tokens);
    tokens.trim();
    let mut expr = parse_expression(&mut tokens, None)?;
    let ty = expr
        .as_mut()
        .and_then(|expr| infer_type(expr, registry, true));
    Ok((expr, ty))
}

/// Tokenizes one line without any keyword handling.
pub fn tokenize_line(line: &str) -> TokenList {
    TokenList::from_text(line)
}
