//! Lexer module
//!
//! Converts one line of pseudocode text into a [`TokenList`]. Lexing is
//! total: unrecognized characters become single-character symbol tokens,
//! there is no fatal lexical error, and reconstructing the token list
//! yields the original text (whitespace normalized to spaces).

pub mod literals;
pub mod state;
pub mod symbols;
pub mod token_list;
pub mod tokenizer;
pub mod tokens;

#[cfg(test)]
mod tests;

// Re-export types
pub use token_list::TokenList;
pub use tokenizer::Lexer;
pub use tokens::{NumBase, Token, TokenKind};

/// Tokenize one line of source text.
///
/// `preserve_strings` keeps string/char literals as single tokens;
/// `collapse_whitespace` drops all inter-token whitespace from the result
/// (the statement parser works on collapsed lists, reconstruction needs
/// the preserved ones).
pub fn tokenize(source: &str, preserve_strings: bool, collapse_whitespace: bool) -> TokenList {
    tracing::debug!("lexing {} bytes", source.len());

    let mut tokens = if preserve_strings {
        TokenList::from_text(source)
    } else {
        TokenList::from_text_opts(source, false)
    };
    if collapse_whitespace {
        tokens.remove_paddings();
    }

    tracing::debug!("lexing complete, {} tokens", tokens.size());
    tokens
}
