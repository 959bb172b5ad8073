//! Expression syntax tree types
//!
//! Each node is a tagged union over the expression forms the shunting-yard
//! parser produces. A node carries its originating token span, an optional
//! resolved type, and a flag telling whether that type is final ("safe",
//! guaranteed not to change on re-inference).
//!
//! The transient parenthesis marker of the parsing algorithm is a stack
//! entry of the parser itself (with an explicit pending-operand counter),
//! so a finished tree can never contain one.

use crate::frontend::typecheck::types::Type;
use crate::util::span::Span;
use std::sync::Arc;

/// Discriminated operator arity. The same symbol may exist in unary and
/// binary form (sign vs. subtraction, dereference vs. multiplication)
/// without collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpArity {
    Unary,
    Binary,
}

/// Expression node variants
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A literal; its type is derivable from the textual shape
    Literal,
    /// An identifier, possibly resolvable through the type registry
    Identifier,
    /// An operator with explicit arity; `[]` is the indexing operator
    /// whose first child is the indexed value
    Operator { arity: OpArity },
    /// A function call with its ordered arguments as children
    FunctionCall,
    /// `{...}` initializer with the ordered elements as children
    ArrayInitializer,
    /// `Name{...}` initializer; children are the components
    RecordInitializer,
    /// A named component inside a record initializer; single child is the
    /// component value
    Component,
}

/// A node of an expression syntax tree
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// Literal text, identifier, operator symbol, function name, record
    /// type name, or component name (empty for array initializers)
    pub text: String,
    pub children: Vec<Expr>,
    /// Span of the originating token(s)
    pub span: Span,
    /// The resolved type, if inference decided one
    pub ty: Option<Arc<Type>>,
    /// Whether `ty` is final and survives re-inference
    pub ty_is_safe: bool,
}

impl Expr {
    pub fn new(kind: ExprKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
            span,
            ty: None,
            ty_is_safe: false,
        }
    }

    pub fn with_children(
        kind: ExprKind,
        text: impl Into<String>,
        span: Span,
        children: Vec<Expr>,
    ) -> Self {
        let mut expr = Self::new(kind, text, span);
        expr.span = children.iter().fold(expr.span, |s, c| s.covering(c.span));
        expr.children = children;
        expr
    }

    pub fn literal(text: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Literal, text, span)
    }

    pub fn identifier(text: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Identifier, text, span)
    }

    pub fn operator(
        symbol: impl Into<String>,
        arity: OpArity,
        span: Span,
        children: Vec<Expr>,
    ) -> Self {
        Self::with_children(ExprKind::Operator { arity }, symbol, span, children)
    }

    /// Whether this node is a function call
    pub fn is_function(&self) -> bool {
        self.kind == ExprKind::FunctionCall
    }

    /// Whether this node is an operator with the given symbol
    pub fn is_operator(&self, symbol: &str) -> bool {
        matches!(self.kind, ExprKind::Operator { .. }) && self.text == symbol
    }

    /// The operator arity, if this is an operator node
    pub fn op_arity(&self) -> Option<OpArity> {
        match self.kind {
            ExprKind::Operator { arity } => Some(arity),
            _ => None,
        }
    }

    /// Whether this is an assignment operator node (`<-` or `:=`)
    pub fn is_assignment(&self) -> bool {
        matches!(self.kind, ExprKind::Operator { arity: OpArity::Binary })
            && (self.text == "<-" || self.text == ":=")
    }

    /// Store an inferred type on this node
    pub fn set_type(&mut self, ty: Arc<Type>, safe: bool) {
        self.ty = Some(ty);
        self.ty_is_safe = safe;
    }

    /// Deep copy carrying the cached types over (a node's cached type
    /// survives a copy operation)
    pub fn duplicate_with_types(&self) -> Expr {
        self.clone()
    }

    /// Checks the arity invariant of this node and its descendants:
    /// every operator node's child count matches its declared arity.
    pub fn arity_consistent(&self) -> bool {
        let own = match self.kind {
            ExprKind::Operator { arity: OpArity::Unary } => self.children.len() == 1,
            ExprKind::Operator { arity: OpArity::Binary } => {
                // The indexing operator takes the value plus 1..n index
                // expressions
                if self.text == "[]" {
                    self.children.len() >= 2
                } else {
                    self.children.len() == 2
                }
            }
            ExprKind::Component => self.children.len() == 1,
            ExprKind::Literal | ExprKind::Identifier => self.children.is_empty(),
            _ => true,
        };
        own && self.children.iter().all(Expr::arity_consistent)
    }
}

impl std::fmt::Display for Expr {
    /// Linearized pseudocode-compatible rendering with minimal
    /// parenthesization
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tokens = crate::frontend::core::lexer::TokenList::new();
        super::serialize::append_to_token_list(
            self,
            &mut tokens,
            &super::serialize::OperatorTable::standard(),
            Some(-1),
        );
        write!(f, "{}", tokens.to_text())
    }
}
