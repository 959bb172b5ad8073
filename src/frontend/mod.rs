//! Front end of the pseudocode analysis core
//!
//! Data flow: raw line text -> [`core::lexer`] (plus [`keywords`]
//! decoration handling) -> token list -> [`core::parser`] -> expression
//! tree -> [`typecheck`] (consulting the type registry).

pub mod core;
pub mod keywords;
pub mod typecheck;

pub use self::core::lexer::{tokenize, Token, TokenKind, TokenList};
pub use self::core::parser::{parse_expression, parse_list, Expr, ExprKind, SyntaxError};
pub use keywords::Keywords;
pub use typecheck::{infer_type, Type, TypeRegistry};
