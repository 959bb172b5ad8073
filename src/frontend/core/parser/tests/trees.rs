//! Tree-shape tests for the shunting-yard parser

use crate::frontend::core::lexer::TokenList;
use crate::frontend::core::parser::{parse, parse_expression, parse_list, Expr, ExprKind, OpArity};

fn parse_one(line: &str) -> Expr {
    let mut tokens = TokenList::from_text(line);
    let expr = parse_expression(&mut tokens, None)
        .expect("parse failed")
        .expect("no expression");
    assert!(expr.arity_consistent(), "inconsistent arity for {}", line);
    expr
}

#[test]
fn test_precedence() {
    let expr = parse_one("a + b * c");
    assert!(expr.is_operator("+"));
    assert!(expr.children[1].is_operator("*"));

    let expr = parse_one("(a + b) * c");
    assert!(expr.is_operator("*"));
    assert!(expr.children[0].is_operator("+"));
}

#[test]
fn test_left_associativity() {
    let expr = parse_one("a - b - c");
    // (a - b) - c
    assert!(expr.is_operator("-"));
    assert!(expr.children[0].is_operator("-"));
    assert_eq!(expr.children[1].text, "c");
}

#[test]
fn test_assignment_binds_loosest() {
    let expr = parse_one("x <- 3 + 4 * 2");
    assert!(expr.is_assignment());
    assert_eq!(expr.children[0].text, "x");
    let rhs = &expr.children[1];
    assert!(rhs.is_operator("+"));
    assert!(rhs.children[1].is_operator("*"));
}

#[test]
fn test_binary_arity() {
    let expr = parse_one("a + b");
    assert_eq!(expr.op_arity(), Some(OpArity::Binary));
    assert_eq!(expr.children.len(), 2);
}

#[test]
fn test_unary_sign() {
    let expr = parse_one("-x");
    assert_eq!(expr.op_arity(), Some(OpArity::Unary));
    assert_eq!(expr.children.len(), 1);

    let expr = parse_one("8 * -7");
    assert!(expr.is_operator("*"));
    let sign = &expr.children[1];
    assert!(sign.is_operator("-"));
    assert_eq!(sign.op_arity(), Some(OpArity::Unary));
}

#[test]
fn test_unary_overloads() {
    // Dereference and address-of share symbols with multiplication and
    // bitwise and
    let expr = parse_one("*p");
    assert_eq!(expr.op_arity(), Some(OpArity::Unary));
    let expr = parse_one("&x");
    assert_eq!(expr.op_arity(), Some(OpArity::Unary));
    let expr = parse_one("a & b");
    assert_eq!(expr.op_arity(), Some(OpArity::Binary));
}

#[test]
fn test_negation() {
    for line in ["not a", "!a", "NOT a"] {
        let expr = parse_one(line);
        assert_eq!(expr.op_arity(), Some(OpArity::Unary), "{}", line);
    }
    // Negation is right-associative: not not a
    let expr = parse_one("not not a");
    assert!(expr.children[0].op_arity() == Some(OpArity::Unary));
}

#[test]
fn test_postfix_increment() {
    let expr = parse_one("x++");
    assert_eq!(expr.op_arity(), Some(OpArity::Unary));
    assert_eq!(expr.children[0].text, "x");
}

#[test]
fn test_function_call() {
    let expr = parse_one("max(a, b)");
    assert!(expr.is_function());
    assert_eq!(expr.text, "max");
    assert_eq!(expr.children.len(), 2);

    let expr = parse_one("f()");
    assert!(expr.is_function());
    assert!(expr.children.is_empty());
}

#[test]
fn test_nested_calls() {
    let expr = parse_one("pow(g(x), 2)");
    assert!(expr.is_function());
    assert_eq!(expr.children.len(), 2);
    assert!(expr.children[0].is_function());
    assert_eq!(expr.children[0].children.len(), 1);
}

#[test]
fn test_call_with_expression_arguments() {
    let expr = parse_one("pow(17, 11.4, -8.1)");
    assert_eq!(expr.children.len(), 3);
    assert_eq!(expr.children[2].op_arity(), Some(OpArity::Unary));
}

#[test]
fn test_index_access() {
    let expr = parse_one("stack[top - 1]");
    assert!(expr.is_operator("[]"));
    assert_eq!(expr.children.len(), 2);
    assert_eq!(expr.children[0].text, "stack");
    assert!(expr.children[1].is_operator("-"));
}

#[test]
fn test_multi_index() {
    let expr = parse_one("m[i, j]");
    assert!(expr.is_operator("[]"));
    assert_eq!(expr.children.len(), 3);
}

#[test]
fn test_member_access_chain() {
    let expr = parse_one("a.b.c");
    // (a.b).c
    assert!(expr.is_operator("."));
    assert!(expr.children[0].is_operator("."));
    assert_eq!(expr.children[1].text, "c");
}

#[test]
fn test_access_path_mix() {
    let expr = parse_one("rec.rows[2].y");
    assert!(expr.is_operator("."));
    assert_eq!(expr.children[1].text, "y");
    let indexed = &expr.children[0];
    assert!(indexed.is_operator("[]"));
    assert!(indexed.children[0].is_operator("."));
}

#[test]
fn test_array_initializer() {
    let expr = parse_one("{17 + 9, -3, pow(17, 2), \"text\"}");
    assert_eq!(expr.kind, ExprKind::ArrayInitializer);
    assert_eq!(expr.children.len(), 4);
    assert!(expr.children[0].is_operator("+"));
    assert!(expr.children[2].is_function());
}

#[test]
fn test_empty_array_initializer() {
    let expr = parse_one("{}");
    assert_eq!(expr.kind, ExprKind::ArrayInitializer);
    assert!(expr.children.is_empty());
}

#[test]
fn test_record_initializer() {
    let expr = parse_one("Point{x: 1, y: 2}");
    assert_eq!(expr.kind, ExprKind::RecordInitializer);
    assert_eq!(expr.text, "Point");
    assert_eq!(expr.children.len(), 2);
    for (child, name) in expr.children.iter().zip(["x", "y"]) {
        assert_eq!(child.kind, ExprKind::Component);
        assert_eq!(child.text, name);
        assert_eq!(child.children.len(), 1);
    }
}

#[test]
fn test_record_initializer_positional() {
    let expr = parse_one("Size{640, 480}");
    assert_eq!(expr.kind, ExprKind::RecordInitializer);
    assert_eq!(expr.children.len(), 2);
    assert_eq!(expr.children[0].kind, ExprKind::Literal);
}

#[test]
fn test_nested_record_initializer() {
    let expr = parse_one("Outer{inner: Inner{x: 1}, n: 2}");
    assert_eq!(expr.children.len(), 2);
    let inner = &expr.children[0];
    assert_eq!(inner.kind, ExprKind::Component);
    assert_eq!(inner.children[0].kind, ExprKind::RecordInitializer);
}

#[test]
fn test_redundant_parentheses_vanish() {
    let expr = parse_one("((a))");
    assert_eq!(expr.kind, ExprKind::Identifier);
    assert_eq!(expr.text, "a");
}

#[test]
fn test_stop_tokens() {
    let mut tokens = TokenList::from_text("x <- 1; y <- 2");
    let expr = parse_expression(&mut tokens, Some(&[";"])).unwrap().unwrap();
    assert!(expr.is_assignment());
    // The stop token is left unconsumed
    assert_eq!(tokens.text_at(0), ";");
}

#[test]
fn test_word_operator_with_arguments_is_call() {
    let expr = parse_one("div(10, 3)");
    assert!(expr.is_function());
    let expr = parse_one("10 div 3");
    assert!(expr.is_operator("div"));
}

#[test]
fn test_parse_list() {
    let mut tokens = TokenList::from_text("1, a + 2, f(3); rest");
    let exprs = parse_list(&mut tokens, ",", ";").unwrap();
    assert_eq!(exprs.len(), 3);
    assert!(exprs[1].is_operator("+"));
    assert!(exprs[2].is_function());
    assert_eq!(tokens.text_at(0), ";");
}

#[test]
fn test_best_effort_stop_without_stop_set() {
    // Without a stop set, a token that cannot extend the expression ends
    // the parse and stays in the list
    let mut tokens = TokenList::from_text("a 19");
    let roots = parse(&mut tokens, None).unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(tokens.text_at(0), "19");
}

#[test]
fn test_blank_separated_roots_with_stop_set() {
    // With a stop set, blank-separated expressions accumulate as roots
    let mut tokens = TokenList::from_text("34 + 8 19 true");
    let roots = parse(&mut tokens, Some(&[";"])).unwrap();
    assert_eq!(roots.len(), 3);
    assert!(roots[0].is_operator("+"));
}

#[test]
fn test_spans_cover_operands() {
    let expr = parse_one("ab + cd");
    assert_eq!(expr.span.start.offset, 0);
    assert_eq!(expr.span.end.offset, 7);
}
