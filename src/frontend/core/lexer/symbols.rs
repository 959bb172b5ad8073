//! Operator symbol tables
//!
//! Multi-character operator symbols are recognized by greedy longest-match
//! while the scanner is in the symbol state. A longer match that fails
//! falls back to emitting the shorter token and restarting.

/// Non-alphanumeric character sequences to be detected as single tokens,
/// chiefly the operator symbols relevant for structogram pseudocode.
pub const LEX_SYMBOLS: &[&str] = &[
    ":=", "<-",
    "<=", ">=", "<>", "==", "!=",
    "<<", ">>>", ">>",
    "&&", "||",
    "..", "...",
    "++", "--",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "<<=", ">>=",
    "\\\\",
];

/// Characters that may occur as second or third character of a symbol from
/// [`LEX_SYMBOLS`]. Used to decide whether the current symbol token may
/// still grow.
pub const SYMBOL_CONTINUATIONS: &str = ".+-<>=:&|\\";

/// The reserved sigil character bracketing internal keyword placeholders.
pub const INTERNAL_KEY_SIGIL: char = '\u{00a7}'; // '§'

/// Decodes the non-ASCII comparison symbols that are always replaced by
/// their multi-character ASCII equivalents, regardless of lexing mode.
pub fn decode_special_symbol(ch: char) -> Option<&'static str> {
    match ch {
        '\u{2260}' => Some("<>"), // ≠
        '\u{2264}' => Some("<="), // ≤
        '\u{2265}' => Some(">="), // ≥
        _ => None,
    }
}

/// Whether `text` is one of the known multi-character symbols.
pub fn is_lex_symbol(text: &str) -> bool {
    LEX_SYMBOLS.contains(&text)
}

/// Whether `ch` may continue a multi-character symbol.
pub fn is_symbol_continuation(ch: char) -> bool {
    SYMBOL_CONTINUATIONS.contains(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert!(is_lex_symbol(":="));
        assert!(is_lex_symbol(">>>"));
        assert!(is_lex_symbol("<<="));
        assert!(!is_lex_symbol("<"));
        assert!(!is_lex_symbol("=>"));
    }

    #[test]
    fn test_special_decode() {
        assert_eq!(decode_special_symbol('\u{2260}'), Some("<>"));
        assert_eq!(decode_special_symbol('\u{2264}'), Some("<="));
        assert_eq!(decode_special_symbol('\u{2265}'), Some(">="));
        assert_eq!(decode_special_symbol('='), None);
    }
}
