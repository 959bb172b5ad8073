//! Operator precedence handling
//!
//! One fixed table ranks all pseudocode operators from assignment (0,
//! binds loosest) up to member access and indexing (12, binds tightest).
//! Word operators (`and`, `div`, ...) and their symbol twins share a
//! level. Unary overloads of `+ - * &` (sign, dereference, address-of)
//! rank with negation.

use super::ast::OpArity;

/// Precedence level of the assignment operators
pub const PREC_ASSIGN: i32 = 0;
/// Precedence level of negation and the unary sign/deref/address operators
pub const PREC_UNARY: i32 = 11;
/// Precedence level of member access and indexing
pub const PREC_ACCESS: i32 = 12;

/// Looks up the precedence of `symbol` used with the given arity; `None`
/// if the symbol is no known operator.
pub fn precedence(symbol: &str, arity: OpArity) -> Option<i32> {
    if arity == OpArity::Unary {
        return match symbol {
            "+" | "-" | "*" | "&" => Some(PREC_UNARY),
            "!" => Some(PREC_UNARY),
            "++" | "--" => Some(PREC_UNARY),
            _ if symbol.eq_ignore_ascii_case("not") => Some(PREC_UNARY),
            _ => None,
        };
    }
    binary_precedence(symbol)
}

fn binary_precedence(symbol: &str) -> Option<i32> {
    let prec = match symbol {
        "<-" | ":=" => 0,
        "||" => 1,
        "&&" => 2,
        "|" => 3,
        "^" => 4,
        "&" => 5,
        "=" | "==" | "<>" | "!=" => 6,
        "<" | ">" | "<=" | ">=" => 7,
        "<<" | ">>" | ">>>" => 8,
        "+" | "-" => 9,
        "*" | "/" | "%" => 10,
        "!" => 11,
        "[]" => 12,
        "." => 12,
        _ => {
            // Word operators are matched case-insensitively
            if symbol.eq_ignore_ascii_case("or") {
                1
            } else if symbol.eq_ignore_ascii_case("and") {
                2
            } else if symbol.eq_ignore_ascii_case("xor") {
                4
            } else if symbol.eq_ignore_ascii_case("shl") || symbol.eq_ignore_ascii_case("shr") {
                8
            } else if symbol.eq_ignore_ascii_case("div") || symbol.eq_ignore_ascii_case("mod") {
                10
            } else if symbol.eq_ignore_ascii_case("not") {
                11
            } else {
                return None;
            }
        }
    };
    Some(prec)
}

/// Whether `symbol` is any known operator at all
pub fn is_operator(symbol: &str) -> bool {
    binary_precedence(symbol).is_some() || precedence(symbol, OpArity::Unary).is_some()
}

/// Negation-class operators are right-associative and never trigger eager
/// reduction of the operator stack.
pub fn is_negation(symbol: &str) -> bool {
    symbol == "!" || symbol.eq_ignore_ascii_case("not")
}

/// Postfix increment/decrement; unary, attached to the completed operand.
pub fn is_postfix(symbol: &str) -> bool {
    symbol == "++" || symbol == "--"
}

/// Whether `symbol` may be a unary sign/dereference/address operator when
/// an operand is still expected.
pub fn may_be_sign(symbol: &str) -> bool {
    matches!(symbol, "+" | "-" | "*" | "&")
}
