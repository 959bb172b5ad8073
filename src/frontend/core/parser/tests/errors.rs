//! Syntax error tests

use crate::frontend::core::lexer::TokenList;
use crate::frontend::core::parser::parse;

fn parse_err(line: &str) -> String {
    let mut tokens = TokenList::from_text(line);
    match parse(&mut tokens, Some(&[";"])) {
        Ok(exprs) => panic!("{:?} unexpectedly parsed to {:?}", line, exprs),
        Err(err) => err.to_string(),
    }
}

#[test]
fn test_too_few_operands() {
    let message = parse_err("a * / b");
    assert!(message.contains("too few operands"), "{}", message);
}

#[test]
fn test_trailing_operator() {
    let message = parse_err("a +");
    assert!(message.contains("too few operands"), "{}", message);
}

#[test]
fn test_unmatched_closing_bracket() {
    let message = parse_err("a + b)");
    assert!(message.contains("without preceding"), "{}", message);
}

#[test]
fn test_mismatched_brackets() {
    let message = parse_err("(a]");
    assert!(message.contains("does not match"), "{}", message);
    let message = parse_err("f(x}");
    assert!(message.contains("does not match"), "{}", message);
}

#[test]
fn test_unclosed_bracket() {
    let message = parse_err("f(a");
    assert!(message.contains("closing"), "{}", message);
    let message = parse_err("{1, 2");
    assert!(message.contains("closing"), "{}", message);
}

#[test]
fn test_colon_outside_record_initializer() {
    let message = parse_err("x: 1");
    assert!(message.contains("record initializer"), "{}", message);
    let message = parse_err("{x: 1}");
    assert!(message.contains("record initializer"), "{}", message);
}

#[test]
fn test_dot_needs_identifier() {
    let message = parse_err("p. + 2");
    assert!(message.contains("'.'"), "{}", message);
    let message = parse_err("p.");
    assert!(message.contains("'.'"), "{}", message);
}

#[test]
fn test_operands_in_succession_inside_brackets() {
    let message = parse_err("f(1 2)");
    assert!(message.contains("succession"), "{}", message);
}

#[test]
fn test_misplaced_comma_with_stop_set() {
    let message = parse_err("a, b");
    assert!(message.contains("misplaced ','"), "{}", message);
}

#[test]
fn test_error_carries_position() {
    let mut tokens = TokenList::from_text("pow(1, 2))");
    let err = parse(&mut tokens, Some(&[";"])).unwrap_err();
    assert_eq!(err.span.start.offset, 9);
}

#[test]
fn test_misplaced_comma_without_stop_set_is_tolerated() {
    let mut tokens = TokenList::from_text("a, b");
    let exprs = parse(&mut tokens, None).unwrap();
    assert_eq!(exprs.len(), 1);
    assert_eq!(tokens.text_at(0), ",");
}
