//! Operator symbol recognition tests

use crate::frontend::core::lexer::TokenList;

fn texts(list: &TokenList) -> Vec<&str> {
    list.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn test_two_char_symbols() {
    for sym in [":=", "<-", "<=", ">=", "<>", "==", "!=", "<<", ">>", "&&", "||", "++", "--"] {
        let line = format!("a {} b", sym);
        let tokens = TokenList::from_text(&line);
        assert_eq!(texts(&tokens), vec!["a", sym, "b"], "splitting {:?}", line);
    }
}

#[test]
fn test_three_char_symbols() {
    let tokens = TokenList::from_text("a >>> 2");
    assert_eq!(texts(&tokens), vec!["a", ">>>", "2"]);
    let tokens = TokenList::from_text("x <<= 1");
    assert_eq!(texts(&tokens), vec!["x", "<<=", "1"]);
}

#[test]
fn test_compound_assignments() {
    for sym in ["+=", "-=", "*=", "/=", "%=", "&=", "|=", ">>="] {
        let line = format!("a{}b", sym);
        let tokens = TokenList::from_text(&line);
        assert_eq!(texts(&tokens), vec!["a", sym, "b"], "splitting {:?}", line);
    }
}

#[test]
fn test_longest_match_fails_over() {
    // ">>>=" is no symbol: the longest valid prefix wins, the rest restarts
    let tokens = TokenList::from_text("a >>>= b");
    assert_eq!(texts(&tokens), vec!["a", ">>>", "=", "b"]);
}

#[test]
fn test_unicode_comparisons_decoded() {
    let tokens = TokenList::from_text("a ≠ b");
    assert_eq!(texts(&tokens), vec!["a", "<>", "b"]);
    let tokens = TokenList::from_text("a≤b≥c");
    assert_eq!(texts(&tokens), vec!["a", "<=", "b", ">=", "c"]);
}

#[test]
fn test_assignment_arrow_swallows_extra_hyphen() {
    let tokens = TokenList::from_text("a <-- b");
    assert_eq!(texts(&tokens), vec!["a", "<-", "b"]);
}

#[test]
fn test_adjacent_symbols_split() {
    let tokens = TokenList::from_text("x:=-1");
    assert_eq!(texts(&tokens), vec!["x", ":=", "-", "1"]);
}

#[test]
fn test_floating_escape_sequence() {
    let tokens = TokenList::from_text(r"a \n b");
    assert_eq!(texts(&tokens), vec!["a", r"\n", "b"]);
}

#[test]
fn test_double_backslash() {
    let tokens = TokenList::from_text(r"a \\ b");
    assert_eq!(texts(&tokens), vec!["a", r"\\", "b"]);
}
