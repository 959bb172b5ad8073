//! Expression tree re-serialization
//!
//! Renders a finished expression tree back into a token list. The
//! rendering is driven by an [`OperatorTable`]: code generators hand in a
//! table with target-language operator symbols and precedence levels, or
//! convert an operator into a function or method call with reordered
//! operands. An operator missing from the table forces parentheses around
//! its composed operands.

use super::ast::{Expr, ExprKind, OpArity};
use super::precedence::{self, precedence, PREC_ACCESS, PREC_UNARY};
use crate::frontend::core::lexer::TokenList;
use std::collections::HashMap;

/// Conversion of an operator into a function or method call
#[derive(Debug, Clone, PartialEq)]
pub struct CallRendering {
    /// Function or method name
    pub name: String,
    /// Render as method call: the first (reordered) operand becomes the
    /// receiver (`recv.name(rest...)`) instead of the first argument
    pub as_method: bool,
    /// Operand permutation: position `i` of the call takes source operand
    /// `operand_order[i]`. An empty order keeps the original operand
    /// sequence.
    pub operand_order: Vec<usize>,
}

/// How one operator is rendered by a target mapping table
#[derive(Debug, Clone, PartialEq)]
pub struct OpRendering {
    /// Target operator symbol (ignored when `as_call` is set)
    pub symbol: String,
    /// Target precedence; `None` forces parentheses around composed
    /// operands
    pub precedence: Option<i32>,
    /// Render the operator as a function/method call instead
    pub as_call: Option<CallRendering>,
}

impl OpRendering {
    pub fn symbol(symbol: impl Into<String>, precedence: i32) -> Self {
        Self {
            symbol: symbol.into(),
            precedence: Some(precedence),
            as_call: None,
        }
    }

    pub fn call(name: impl Into<String>, operand_order: Vec<usize>) -> Self {
        Self {
            symbol: String::new(),
            precedence: Some(PREC_ACCESS),
            as_call: Some(CallRendering {
                name: name.into(),
                as_method: false,
                operand_order,
            }),
        }
    }

    pub fn method(name: impl Into<String>, operand_order: Vec<usize>) -> Self {
        Self {
            symbol: String::new(),
            precedence: Some(PREC_ACCESS),
            as_call: Some(CallRendering {
                name: name.into(),
                as_method: true,
                operand_order,
            }),
        }
    }
}

/// Operator-symbol/precedence/function-call mapping table used when a
/// tree is re-serialized. The standard table reproduces pseudocode
/// syntax; target-language tables override individual operators.
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    entries: HashMap<(String, OpArity), OpRendering>,
    /// Fall back to the built-in precedence for unmapped operators
    /// (standard table); when `false`, unmapped operators are
    /// parenthesized defensively
    use_builtin_precedence: bool,
}

impl OperatorTable {
    /// The identity table: every operator keeps its symbol and built-in
    /// precedence.
    pub fn standard() -> Self {
        Self {
            entries: HashMap::new(),
            use_builtin_precedence: true,
        }
    }

    /// An empty table: every composed operand gets parenthesized, symbols
    /// pass through. Starting point for target-language tables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds or replaces the rendering for an operator
    pub fn with(mut self, symbol: &str, arity: OpArity, rendering: OpRendering) -> Self {
        self.entries.insert((symbol.to_string(), arity), rendering);
        self
    }

    fn lookup(&self, symbol: &str, arity: OpArity) -> Option<&OpRendering> {
        self.entries.get(&(symbol.to_string(), arity))
    }

    fn precedence_of(&self, symbol: &str, arity: OpArity) -> Option<i32> {
        if let Some(rendering) = self.lookup(symbol, arity) {
            return rendering.precedence;
        }
        if self.use_builtin_precedence {
            let prec = precedence(symbol, arity);
            // Sign operators parenthesize like negation
            if arity == OpArity::Unary && precedence::may_be_sign(symbol) {
                return Some(PREC_UNARY);
            }
            return prec;
        }
        None
    }
}

/// Appends `expr` in tokenized form to `tokens`, rendering operators
/// through `table`. `parent_prec` is the precedence of the operator this
/// expression is an operand of: `Some(-1)` for a root expression, `None`
/// to force parentheses around any non-atomic sub-expression.
pub fn append_to_token_list(
    expr: &Expr,
    tokens: &mut TokenList,
    table: &OperatorTable,
    parent_prec: Option<i32>,
) {
    match &expr.kind {
        ExprKind::Literal | ExprKind::Identifier => {
            tokens.push_str(&expr.text);
        }
        ExprKind::Operator { arity } => {
            if expr.text == "[]" {
                append_index(expr, tokens, table);
                return;
            }
            if let Some(OpRendering {
                as_call: Some(call), ..
            }) = table.lookup(&expr.text, *arity)
            {
                append_as_call(expr, call, tokens, table);
                return;
            }
            let symbol = table
                .lookup(&expr.text, *arity)
                .map(|r| r.symbol.clone())
                .unwrap_or_else(|| expr.text.clone());
            let my_prec = table.precedence_of(&expr.text, *arity);
            match arity {
                OpArity::Unary => append_unary(expr, &symbol, my_prec, tokens, table),
                OpArity::Binary => {
                    let parens = needs_parens(my_prec, parent_prec);
                    if parens {
                        tokens.push_str("(");
                    }
                    for (i, child) in expr.children.iter().enumerate() {
                        if i > 0 {
                            tokens.push_str(&symbol);
                        }
                        append_to_token_list(child, tokens, table, my_prec);
                    }
                    if parens {
                        tokens.push_str(")");
                    }
                }
            }
        }
        ExprKind::FunctionCall => {
            tokens.push_str(&expr.text);
            tokens.push_str("(");
            for (i, child) in expr.children.iter().enumerate() {
                if i > 0 {
                    tokens.push_str(",");
                }
                append_to_token_list(child, tokens, table, Some(-1));
            }
            tokens.push_str(")");
        }
        ExprKind::ArrayInitializer | ExprKind::RecordInitializer => {
            if expr.kind == ExprKind::RecordInitializer {
                tokens.push_str(&expr.text);
            }
            tokens.push_str("{");
            for (i, child) in expr.children.iter().enumerate() {
                if i > 0 {
                    tokens.push_str(",");
                }
                append_to_token_list(child, tokens, table, Some(-1));
            }
            tokens.push_str("}");
        }
        ExprKind::Component => {
            tokens.push_str(&expr.text);
            tokens.push_str(":");
            if let Some(value) = expr.children.first() {
                append_to_token_list(value, tokens, table, Some(-1));
            }
        }
    }
}

/// Parentheses are needed when the own precedence is unknown, the parent
/// forces them, or the parent binds tighter. Below member access and
/// indexing no parentheses are required (the index position is already
/// bracketed).
fn needs_parens(my_prec: Option<i32>, parent_prec: Option<i32>) -> bool {
    match (my_prec, parent_prec) {
        (None, _) | (_, None) => true,
        (Some(mine), Some(parent)) => mine < parent && !(mine < PREC_UNARY && parent == PREC_ACCESS),
    }
}

fn append_unary(
    expr: &Expr,
    symbol: &str,
    my_prec: Option<i32>,
    tokens: &mut TokenList,
    table: &OperatorTable,
) {
    let postfix = precedence::is_postfix(&expr.text);
    if !postfix {
        tokens.push_str(symbol);
    }
    if let Some(operand) = expr.children.first() {
        append_to_token_list(operand, tokens, table, my_prec);
    }
    if postfix {
        tokens.push_str(symbol);
    }
}

fn append_index(expr: &Expr, tokens: &mut TokenList, table: &OperatorTable) {
    let my_prec = Some(PREC_ACCESS);
    if let Some(array) = expr.children.first() {
        append_to_token_list(array, tokens, table, my_prec);
    }
    tokens.push_str("[");
    for (i, index) in expr.children.iter().skip(1).enumerate() {
        if i > 0 {
            tokens.push_str(",");
        }
        append_to_token_list(index, tokens, table, Some(-1));
    }
    tokens.push_str("]");
}

fn append_as_call(expr: &Expr, call: &CallRendering, tokens: &mut TokenList, table: &OperatorTable) {
    let operands: Vec<&Expr> = if call.operand_order.is_empty() {
        expr.children.iter().collect()
    } else {
        call.operand_order
            .iter()
            .filter_map(|&i| expr.children.get(i))
            .collect()
    };
    let mut rest = operands.as_slice();
    if call.as_method {
        if let Some((receiver, tail)) = operands.split_first() {
            append_to_token_list(receiver, tokens, table, Some(PREC_ACCESS));
            tokens.push_str(".");
            rest = tail;
        }
    }
    tokens.push_str(&call.name);
    tokens.push_str("(");
    for (i, operand) in rest.iter().enumerate() {
        if i > 0 {
            tokens.push_str(",");
        }
        append_to_token_list(operand, tokens, table, Some(-1));
    }
    tokens.push_str(")");
}
