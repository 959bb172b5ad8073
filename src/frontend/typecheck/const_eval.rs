//! Minimal constant expression evaluation
//!
//! Evaluates integer constant expressions, used for assigning codes to
//! enumeration members. Identifier references resolve through a
//! caller-provided lookup (registered constants and already-coded sibling
//! members). Evaluation problems are reported as [`Diagnostic`] values,
//! never panics or exceptions.

use crate::frontend::core::lexer::TokenList;
use crate::frontend::core::parser::{parse_expression, Expr, ExprKind, OpArity};
use crate::util::diagnostic::Diagnostic;

/// Evaluates the constant expression in `text`.
pub fn evaluate_text(
    text: &str,
    lookup: &dyn Fn(&str) -> Option<i64>,
) -> Result<i64, Diagnostic> {
    let mut tokens = TokenList::from_text(text);
    let expr = parse_expression(&mut tokens, None)
        .map_err(|err| Diagnostic::error(format!("not a constant expression: {}", err), err.span))?;
    match expr {
        Some(expr) => evaluate(&expr, lookup),
        None => Err(Diagnostic::error("empty constant expression", Default::default())),
    }
}

/// Evaluates a parsed constant expression bottom-up.
pub fn evaluate(expr: &Expr, lookup: &dyn Fn(&str) -> Option<i64>) -> Result<i64, Diagnostic> {
    match &expr.kind {
        ExprKind::Literal => literal_value(expr),
        ExprKind::Identifier => lookup(&expr.text).ok_or_else(|| {
            Diagnostic::error(
                format!("unresolved constant reference '{}'", expr.text),
                expr.span,
            )
        }),
        ExprKind::Operator { arity } => {
            let symbol = expr.text.as_str();
            match arity {
                OpArity::Unary => {
                    let value = evaluate(&expr.children[0], lookup)?;
                    match symbol {
                        "-" => Ok(-value),
                        "+" => Ok(value),
                        "!" => Ok(i64::from(value == 0)),
                        _ if symbol.eq_ignore_ascii_case("not") => Ok(i64::from(value == 0)),
                        _ => Err(not_constant(expr)),
                    }
                }
                OpArity::Binary => {
                    let left = evaluate(&expr.children[0], lookup)?;
                    let right = evaluate(&expr.children[1], lookup)?;
                    binary_value(expr, symbol, left, right)
                }
            }
        }
        _ => Err(not_constant(expr)),
    }
}

fn binary_value(expr: &Expr, symbol: &str, left: i64, right: i64) -> Result<i64, Diagnostic> {
    let value = match symbol {
        "+" => left.checked_add(right),
        "-" => left.checked_sub(right),
        "*" => left.checked_mul(right),
        "/" => left.checked_div(right),
        "%" => left.checked_rem(right),
        "<<" => u32::try_from(right).ok().and_then(|s| left.checked_shl(s)),
        ">>" => u32::try_from(right).ok().and_then(|s| left.checked_shr(s)),
        ">>>" => u32::try_from(right)
            .ok()
            .and_then(|s| (left as u64).checked_shr(s))
            .map(|v| v as i64),
        "&" => Some(left & right),
        "|" => Some(left | right),
        "^" => Some(left ^ right),
        _ => {
            if symbol.eq_ignore_ascii_case("div") {
                left.checked_div(right)
            } else if symbol.eq_ignore_ascii_case("mod") {
                left.checked_rem(right)
            } else if symbol.eq_ignore_ascii_case("shl") {
                u32::try_from(right).ok().and_then(|s| left.checked_shl(s))
            } else if symbol.eq_ignore_ascii_case("shr") {
                u32::try_from(right).ok().and_then(|s| left.checked_shr(s))
            } else if symbol.eq_ignore_ascii_case("xor") {
                Some(left ^ right)
            } else {
                return Err(not_constant(expr));
            }
        }
    };
    value.ok_or_else(|| {
        Diagnostic::error(
            format!("constant expression '{}' does not evaluate", expr.text),
            expr.span,
        )
    })
}

fn literal_value(expr: &Expr) -> Result<i64, Diagnostic> {
    let text = expr.text.as_str();
    let parsed = match () {
        _ if text == "true" => Some(1),
        _ if text == "false" => Some(0),
        _ if text.starts_with("0x") || text.starts_with("0X") => {
            i64::from_str_radix(&text[2..], 16).ok()
        }
        _ if text.starts_with("0b") || text.starts_with("0B") => {
            i64::from_str_radix(&text[2..], 2).ok()
        }
        _ if text.len() > 1 && text.starts_with('0') && !text.contains('.') => {
            i64::from_str_radix(&text[1..], 8).ok()
        }
        _ if text.len() == 3 && text.starts_with('\'') && text.ends_with('\'') => {
            text.chars().nth(1).map(|c| c as i64)
        }
        _ => text.trim_end_matches(['l', 'L']).parse::<i64>().ok(),
    };
    parsed.ok_or_else(|| {
        Diagnostic::error(
            format!("'{}' is no integer constant", text),
            expr.span,
        )
    })
}

fn not_constant(expr: &Expr) -> Diagnostic {
    Diagnostic::error(
        format!("'{}' is not usable in a constant expression", expr.text),
        expr.span,
    )
}
