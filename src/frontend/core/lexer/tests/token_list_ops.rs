//! TokenList mutation and search tests

use crate::frontend::core::lexer::TokenList;

fn texts(list: &TokenList) -> Vec<&str> {
    list.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn test_sub_sequence() {
    let tokens = TokenList::from_text("a <- b + c * d");
    let part = tokens.sub_sequence(2, 5);
    assert_eq!(texts(&part), vec!["b", "+", "c"]);
    assert_eq!(part.to_text(), "b + c");
    let tail = tokens.sub_sequence_to_end(5);
    assert_eq!(texts(&tail), vec!["*", "d"]);
}

#[test]
fn test_remove_merges_gaps() {
    let mut tokens = TokenList::from_text("a + b");
    let removed = tokens.remove(1);
    assert_eq!(removed.text, "+");
    assert_eq!(tokens.to_text(), "a b");
    assert_eq!(tokens.length(), 3);
}

#[test]
fn test_remove_restores_necessary_gap() {
    let mut tokens = TokenList::from_text("ab+cd");
    tokens.remove(1);
    // Without the restored blank, "ab" and "cd" would amalgamate
    assert_eq!(tokens.to_text(), "ab cd");
}

#[test]
fn test_remove_range() {
    let mut tokens = TokenList::from_text("x <- f(1, 2)");
    let cut = tokens.remove_range(2, tokens.size());
    assert_eq!(texts(&tokens), vec!["x", "<-"]);
    assert_eq!(texts(&cut), vec!["f", "(", "1", ",", "2", ")"]);
}

#[test]
fn test_set_token() {
    let mut tokens = TokenList::from_text("a + b");
    let old = tokens.set(1, "*");
    assert_eq!(old.text, "+");
    assert_eq!(tokens.to_text(), "a * b");
    // Empty replacement removes
    tokens.set(1, "");
    assert_eq!(tokens.size(), 2);
}

#[test]
fn test_insert_and_push() {
    let mut tokens = TokenList::from_text("a c");
    tokens.insert_str(1, "b");
    assert_eq!(texts(&tokens), vec!["a", "b", "c"]);
    tokens.push_str("+ d");
    assert_eq!(texts(&tokens), vec!["a", "b", "c", "+", "d"]);
    // Pushed text is split like any other text
    tokens.push_str("e*f");
    assert_eq!(texts(&tokens), vec!["a", "b", "c", "+", "d", "e", "*", "f"]);
}

#[test]
fn test_push_restores_gap() {
    let mut tokens = TokenList::from_text("ab");
    tokens.push_str("cd");
    assert_eq!(tokens.to_text(), "ab cd");
}

#[test]
fn test_search() {
    let tokens = TokenList::from_text("for i <- 1 to N do");
    assert_eq!(tokens.index_of("to", 0, true), Some(4));
    assert_eq!(tokens.index_of("TO", 0, true), None);
    assert_eq!(tokens.index_of("TO", 0, false), Some(4));
    assert!(tokens.contains("do"));
    assert_eq!(tokens.count_of("i", true), 1);
}

#[test]
fn test_search_subsequence() {
    let tokens = TokenList::from_text("repeat until x > 0 end until");
    let sub = TokenList::from_text("until x");
    assert_eq!(tokens.index_of_list(&sub, 0, true), Some(1));
    let single = TokenList::from_text("until");
    assert_eq!(tokens.last_index_of_list(&single, true), Some(6));
    assert!(tokens.contains_list(&sub, true));
}

#[test]
fn test_concatenate() {
    let a = TokenList::from_text("x <- 1");
    let b = TokenList::from_text("y <- 2");
    let joined = TokenList::concatenate([&a, &b], Some(";"));
    assert_eq!(joined.to_text(), "x <- 1; y <- 2".replace("; ", ";"));
    let spaced = TokenList::concatenate([&a, &b], Some(" "));
    assert_eq!(spaced.size(), 6);
}

#[test]
fn test_trim_and_shrink() {
    let mut tokens = TokenList::from_text("  a  +  b  ");
    assert_eq!(tokens.trim(), 4);
    assert_eq!(tokens.to_text(), "a  +  b");
    tokens.shrink();
    assert_eq!(tokens.to_text(), "a+b");

    let mut tokens = TokenList::from_text("ab  cd");
    tokens.remove_paddings();
    assert_eq!(tokens.to_text(), "abcd");
    tokens.shrink();
    assert_eq!(tokens.to_text(), "ab cd");
}

#[test]
fn test_padding_bookkeeping_invariant() {
    let mut tokens = TokenList::from_text("a + b * c");
    tokens.remove(3);
    tokens.insert_str(2, "q");
    tokens.set(0, "zz");
    tokens.push_str("!");
    let text = tokens.to_text();
    assert_eq!(text.chars().count(), tokens.length());
    // Re-lexing the reconstruction must give the same tokens
    let again = TokenList::from_text(&text);
    assert!(tokens.same_tokens(&again, true));
}
