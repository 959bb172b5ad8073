//! Shunting-yard expression parsing
//!
//! Classic two-stack precedence parse over a token list: operands go to an
//! output stack, operators and opening brackets to an operator stack, and
//! reductions pop completed operators onto the output. A bracket entry
//! records the output depth at its opening; when the bracket closes, the
//! operands above that depth are exactly the comma-separated slots and
//! get attached to the owning call/initializer/index node.
//!
//! Parsing consumes tokens from the front of the list and stops at the
//! first stop token (left unconsumed) or, without a stop set, at the first
//! token that cannot extend the current single completed expression.

use super::ast::{Expr, ExprKind, OpArity};
use super::precedence::{self, precedence, PREC_ACCESS};
use super::SyntaxError;
use crate::frontend::core::lexer::{TokenKind, TokenList};
use crate::util::span::Span;

/// Operator-stack entries. `Bracket` is the transient parenthesis marker;
/// it never becomes part of a finished tree.
#[derive(Debug, Clone)]
enum StackEntry {
    Operator {
        symbol: String,
        arity: OpArity,
        span: Span,
    },
    /// An opening bracket, remembering the output depth at its opening
    /// (for the index operator the depth is taken before the indexed
    /// value, which occupies the first operand slot)
    Bracket {
        opening: char,
        base: usize,
        span: Span,
    },
    Function {
        name: String,
        span: Span,
    },
    ArrayInit {
        span: Span,
    },
    RecordInit {
        type_name: String,
        span: Span,
    },
    /// A pending record component (name seen, value outstanding)
    Component {
        name: String,
        span: Span,
    },
}

/// Parses a token list into a list of expression trees. The result will
/// usually contain one element; blank-separated expressions at top level
/// accumulate as multiple roots when a stop set is given.
///
/// Tokens are consumed from the front of `tokens` until a stop token (not
/// consumed), a token that cannot extend the expression (no stop set), or
/// the end of the list.
pub fn parse(tokens: &mut TokenList, stop_tokens: Option<&[&str]>) -> Result<Vec<Expr>, SyntaxError> {
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut output: Vec<Expr> = Vec::new();
    // true if a following '+', '-', '*' or '&' must be a unary operator
    let mut sign_pos = true;

    'main: while !tokens.is_blank() {
        let token = tokens.get(0).clone();
        let text = token.text.as_str();
        if let Some(stops) = stop_tokens {
            if stops.contains(&text) {
                break;
            }
        }

        if text == "(" {
            stack.push(StackEntry::Bracket {
                opening: '(',
                base: output.len(),
                span: token.span,
            });
            sign_pos = true;
        } else if text == "{" {
            // May open an array or a record initializer
            if !matches!(stack.last(), Some(StackEntry::RecordInit { .. })) {
                stack.push(StackEntry::ArrayInit { span: token.span });
            }
            stack.push(StackEntry::Bracket {
                opening: '{',
                base: output.len(),
                span: token.span,
            });
            sign_pos = true;
        } else if text == ")" || text == "]" || text == "}" {
            close_bracket(&mut stack, &mut output, token.span, text)?;
            sign_pos = false;
        } else if text == "," {
            // Argument/element separator: reduce back to the bracket
            loop {
                match stack.last() {
                    None => {
                        if stop_tokens.is_some() {
                            return Err(SyntaxError::new(
                                "misplaced ',' or missing '(', '[' or '{'",
                                token.span,
                            ));
                        }
                        // Tolerate while editing: stop before the comma
                        break 'main;
                    }
                    Some(StackEntry::Bracket { .. }) => break,
                    Some(StackEntry::Component { .. }) => reduce_component(&mut stack, &mut output)?,
                    Some(StackEntry::Operator { .. }) => reduce_operator(&mut stack, &mut output)?,
                    Some(_) => {
                        return Err(SyntaxError::new("unexpected separator", token.span));
                    }
                }
            }
            sign_pos = true;
        } else if text == ":" {
            // Only valid directly inside the open '{' of a record
            // initializer
            let in_record = matches!(stack.last(), Some(StackEntry::Bracket { opening: '{', .. }))
                && stack.len() >= 2
                && matches!(stack[stack.len() - 2], StackEntry::RecordInit { .. });
            if !in_record {
                return Err(SyntaxError::new(
                    "component separator ':' outside a record initializer",
                    token.span,
                ));
            }
            let name_expr = match output.pop() {
                Some(expr) if expr.kind == ExprKind::Identifier => expr,
                _ => {
                    return Err(SyntaxError::new(
                        "component name expected before ':'",
                        token.span,
                    ));
                }
            };
            stack.push(StackEntry::Component {
                name: name_expr.text,
                span: token.span,
            });
            sign_pos = true;
        } else if let Some((symbol, arity)) = classify_operator(&token, sign_pos, tokens) {
            if symbol == "." {
                let followed_by_name =
                    tokens.size() > 1 && tokens.get(1).kind == TokenKind::Name;
                if !followed_by_name {
                    return Err(SyntaxError::new(
                        "'.' must be followed by a component identifier",
                        token.span,
                    ));
                }
            }
            let prec = precedence(&symbol, arity).unwrap_or(PREC_ACCESS);
            if arity == OpArity::Binary {
                // Strict left-associativity: reduce while the stack top
                // binds at least as tightly
                while let Some(StackEntry::Operator {
                    symbol: top_symbol,
                    arity: top_arity,
                    ..
                }) = stack.last()
                {
                    let top_prec = precedence(top_symbol, *top_arity).unwrap_or(PREC_ACCESS);
                    if prec <= top_prec {
                        reduce_operator(&mut stack, &mut output)?;
                    } else {
                        break;
                    }
                }
            }
            let postfix = precedence::is_postfix(&symbol);
            stack.push(StackEntry::Operator {
                symbol: symbol.clone(),
                arity,
                span: token.span,
            });
            if symbol == "[]" {
                // The indexed value already on the output stack occupies
                // the first operand slot
                stack.push(StackEntry::Bracket {
                    opening: '[',
                    base: output.len().saturating_sub(1),
                    span: token.span,
                });
            }
            if !postfix {
                sign_pos = true;
            }
        } else if token.is_literal() || text == "Infinity" {
            if !start_operand(&mut stack, &mut output, sign_pos, stop_tokens.is_some(), token.span)? {
                break 'main;
            }
            output.push(Expr::literal(text, token.span));
            sign_pos = false;
        } else if token.kind == TokenKind::Name {
            if !start_operand(&mut stack, &mut output, sign_pos, stop_tokens.is_some(), token.span)? {
                break 'main;
            }
            if tokens.size() > 1 && tokens.text_at(1) == "(" {
                stack.push(StackEntry::Function {
                    name: text.to_string(),
                    span: token.span,
                });
            } else if tokens.size() > 1 && tokens.text_at(1) == "{" {
                stack.push(StackEntry::RecordInit {
                    type_name: text.to_string(),
                    span: token.span,
                });
            } else {
                output.push(Expr::identifier(text, token.span));
                sign_pos = false;
            }
        } else {
            // This token cannot extend the expression
            break;
        }
        tokens.remove(0);
    }

    // Resolve remaining stacked operators in LIFO order
    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Bracket { opening, span, .. } => {
                return Err(SyntaxError::new(
                    format!("more opening '{}' than closing brackets", opening),
                    span,
                ));
            }
            StackEntry::Operator { symbol, arity, span } => {
                stack.push(StackEntry::Operator { symbol, arity, span });
                reduce_operator(&mut stack, &mut output)?;
            }
            StackEntry::Component { name, span } => {
                stack.push(StackEntry::Component { name, span });
                reduce_component(&mut stack, &mut output)?;
            }
            StackEntry::Function { name, span } => {
                return Err(SyntaxError::new(format!("unclosed call to '{}'", name), span));
            }
            StackEntry::ArrayInit { span } | StackEntry::RecordInit { span, .. } => {
                return Err(SyntaxError::new("unclosed initializer", span));
            }
        }
    }
    Ok(output)
}

/// Decides whether the front token acts as an operator here, and with
/// which arity. Word operators followed by an argument list are left to
/// the function-call rule (`div(x, y)`), except `not`, which always
/// negates.
fn classify_operator(
    token: &crate::frontend::core::lexer::Token,
    sign_pos: bool,
    tokens: &TokenList,
) -> Option<(String, OpArity)> {
    let text = token.text.as_str();
    if text == "[" {
        return Some(("[]".to_string(), OpArity::Binary));
    }
    let known = precedence(text, OpArity::Binary).is_some()
        || precedence(text, OpArity::Unary).is_some();
    if !known {
        return None;
    }
    if token.kind == TokenKind::Name
        && !precedence::is_negation(text)
        && sign_pos
        && tokens.size() > 1
        && tokens.text_at(1) == "("
    {
        // A word operator in operand position used like a function keeps
        // being a call; after a completed operand it must be the operator
        return None;
    }
    let unary = (sign_pos && precedence::may_be_sign(text))
        || precedence::is_negation(text)
        || precedence::is_postfix(text);
    let arity = if unary { OpArity::Unary } else { OpArity::Binary };
    Some((text.to_string(), arity))
}

/// Prepares for a fresh operand when the previous expression is already
/// complete. Inside brackets that is an error; without a stop set the
/// parse stops (`Ok(false)`, token unconsumed); with one, the previous
/// root is finished and a new root may accumulate.
fn start_operand(
    stack: &mut Vec<StackEntry>,
    output: &mut Vec<Expr>,
    sign_pos: bool,
    has_stop_set: bool,
    span: Span,
) -> Result<bool, SyntaxError> {
    if sign_pos {
        return Ok(true);
    }
    if stack
        .iter()
        .any(|entry| matches!(entry, StackEntry::Bracket { .. }))
    {
        return Err(SyntaxError::new(
            "two operands in succession without an operator",
            span,
        ));
    }
    if !has_stop_set {
        return Ok(false);
    }
    while matches!(stack.last(), Some(StackEntry::Operator { .. })) {
        reduce_operator(stack, output)?;
    }
    Ok(true)
}

/// Pops the topmost operator entry and reduces it with its operands.
fn reduce_operator(stack: &mut Vec<StackEntry>, output: &mut Vec<Expr>) -> Result<(), SyntaxError> {
    let (symbol, arity, span) = match stack.pop() {
        Some(StackEntry::Operator { symbol, arity, span }) => (symbol, arity, span),
        _ => unreachable!("reduce_operator called without operator on top"),
    };
    let n = match arity {
        OpArity::Unary => 1,
        OpArity::Binary => 2,
    };
    if output.len() < n {
        return Err(SyntaxError::new(
            format!("too few operands for operator '{}'", symbol),
            span,
        ));
    }
    let children = output.split_off(output.len() - n);
    output.push(Expr::operator(symbol, arity, span, children));
    Ok(())
}

/// Pops the topmost pending component and attaches its value.
fn reduce_component(stack: &mut Vec<StackEntry>, output: &mut Vec<Expr>) -> Result<(), SyntaxError> {
    let (name, span) = match stack.pop() {
        Some(StackEntry::Component { name, span }) => (name, span),
        _ => unreachable!("reduce_component called without component on top"),
    };
    let value = match output.pop() {
        Some(value) => value,
        None => {
            return Err(SyntaxError::new(
                format!("record component '{}' lacks a value", name),
                span,
            ));
        }
    };
    output.push(Expr::with_children(
        ExprKind::Component,
        name,
        span,
        vec![value],
    ));
    Ok(())
}

/// Handles a closing bracket: reduces back to the matching opener, then
/// attaches the accumulated operand slots to the owning node (function
/// call, initializer, or index operator).
fn close_bracket(
    stack: &mut Vec<StackEntry>,
    output: &mut Vec<Expr>,
    span: Span,
    closer: &str,
) -> Result<(), SyntaxError> {
    let expected_opening = match closer {
        ")" => '(',
        "]" => '[',
        _ => '{',
    };
    let base;
    loop {
        match stack.last() {
            None => {
                return Err(SyntaxError::new(
                    format!("'{}' without preceding '{}'", closer, expected_opening),
                    span,
                ));
            }
            Some(StackEntry::Bracket { opening, .. }) => {
                let opening = *opening;
                if opening != expected_opening {
                    return Err(SyntaxError::new(
                        format!("'{}' does not match the opening '{}'", closer, opening),
                        span,
                    ));
                }
                base = match stack.pop() {
                    Some(StackEntry::Bracket { base, .. }) => base,
                    _ => unreachable!(),
                };
                break;
            }
            Some(StackEntry::Component { .. }) => reduce_component(stack, output)?,
            Some(StackEntry::Operator { .. }) => reduce_operator(stack, output)?,
            Some(_) => {
                return Err(SyntaxError::new(format!("unexpected '{}'", closer), span));
            }
        }
    }
    if base > output.len() {
        return Err(SyntaxError::new(
            format!("lost operands before '{}'", closer),
            span,
        ));
    }

    // Attach the slots above the recorded depth to the owner of the
    // bracket
    match stack.last() {
        Some(StackEntry::Function { .. }) if expected_opening == '(' => {
            let (name, fn_span) = match stack.pop() {
                Some(StackEntry::Function { name, span }) => (name, span),
                _ => unreachable!(),
            };
            let children = output.split_off(base);
            output.push(Expr::with_children(
                ExprKind::FunctionCall,
                name,
                fn_span,
                children,
            ));
        }
        Some(StackEntry::ArrayInit { .. }) if expected_opening == '{' => {
            let init_span = match stack.pop() {
                Some(StackEntry::ArrayInit { span }) => span,
                _ => unreachable!(),
            };
            let children = output.split_off(base);
            output.push(Expr::with_children(
                ExprKind::ArrayInitializer,
                "",
                init_span,
                children,
            ));
        }
        Some(StackEntry::RecordInit { .. }) if expected_opening == '{' => {
            let (type_name, init_span) = match stack.pop() {
                Some(StackEntry::RecordInit { type_name, span }) => (type_name, span),
                _ => unreachable!(),
            };
            let children = output.split_off(base);
            output.push(Expr::with_children(
                ExprKind::RecordInitializer,
                type_name,
                init_span,
                children,
            ));
        }
        Some(StackEntry::Operator { symbol, .. }) if expected_opening == '[' && symbol == "[]" => {
            let (symbol, arity, op_span) = match stack.pop() {
                Some(StackEntry::Operator { symbol, arity, span }) => (symbol, arity, span),
                _ => unreachable!(),
            };
            let children = output.split_off(base);
            if children.len() < 2 {
                return Err(SyntaxError::new(
                    "index access lacks its value or index",
                    op_span,
                ));
            }
            output.push(Expr::with_children(
                ExprKind::Operator { arity },
                symbol,
                op_span,
                children,
            ));
        }
        _ => {
            // A plain parenthesized group: its expression(s) stay on the
            // output stack
        }
    }
    Ok(())
}
