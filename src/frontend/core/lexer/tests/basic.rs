//! Basic tokenization tests

use crate::frontend::core::lexer::{tokenize, TokenKind, TokenList};

fn texts(list: &TokenList) -> Vec<&str> {
    list.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn test_simple_tokenization() {
    let tokens = TokenList::from_text("abc");
    assert_eq!(tokens.size(), 1);
    assert_eq!(tokens.get(0).kind, TokenKind::Name);
    assert_eq!(tokens.text_at(0), "abc");
}

#[test]
fn test_empty_line() {
    let tokens = TokenList::from_text("");
    assert!(tokens.is_blank());
    assert!(tokens.is_empty());
}

#[test]
fn test_whitespace_only() {
    let tokens = TokenList::from_text("   \t ");
    assert!(tokens.is_blank());
    assert!(!tokens.is_empty());
    assert_eq!(tokens.length(), 5);
}

#[test]
fn test_assignment_line() {
    let tokens = tokenize("x <- 3 + 4 * 2", true, true);
    assert_eq!(texts(&tokens), vec!["x", "<-", "3", "+", "4", "*", "2"]);
}

#[test]
fn test_underscore_names() {
    let tokens = TokenList::from_text("_foo bar_9");
    assert_eq!(texts(&tokens), vec!["_foo", "bar_9"]);
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Name));
}

#[test]
fn test_call_with_indexing() {
    let tokens = TokenList::from_text("pow(stack[top-1], 2)");
    assert_eq!(
        texts(&tokens),
        vec!["pow", "(", "stack", "[", "top", "-", "1", "]", ",", "2", ")"]
    );
}

#[test]
fn test_unknown_characters_become_symbols() {
    // No fatal lexical error: odd characters pass through as symbols
    let tokens = TokenList::from_text("a ¿ b");
    assert_eq!(texts(&tokens), vec!["a", "¿", "b"]);
    assert_eq!(tokens.get(1).kind, TokenKind::Symbol);
}

#[test]
fn test_internal_key_placeholder() {
    let tokens = TokenList::from_text("§FOR§ i <- 1");
    assert_eq!(tokens.get(0).kind, TokenKind::InternalKey);
    assert_eq!(tokens.text_at(0), "§FOR§");
}

#[test]
fn test_lonely_sigil() {
    let tokens = TokenList::from_text("§§ §x");
    assert_eq!(texts(&tokens), vec!["§", "§", "§", "x"]);
    assert!(tokens.iter().take(3).all(|t| t.kind == TokenKind::Symbol));
}

#[test]
fn test_special_keyword_priority() {
    // A quote-bearing keyword must survive as one token
    let keys = vec!["jusqu'à".to_string()];
    let tokens = TokenList::from_text_with_keywords("pour i jusqu'à 10", &keys, false);
    assert!(tokens.contains("jusqu'à"));
    assert_eq!(tokens.size(), 4);
}

#[test]
fn test_token_spans() {
    let tokens = TokenList::from_text("ab + cd");
    assert_eq!(tokens.get(0).span.start.offset, 0);
    assert_eq!(tokens.get(0).span.end.offset, 2);
    assert_eq!(tokens.get(1).span.start.offset, 3);
    assert_eq!(tokens.get(2).span.start.offset, 5);
}
