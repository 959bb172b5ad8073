//! Tokenizer implementation
//!
//! A hand-written finite-state scanner over one line of pseudocode text.
//! Lexing never fails: unrecognized characters are emitted as single
//! character symbol tokens and correctness is deferred to the parser.
//! Inter-token whitespace widths are collected separately so that the
//! original text can be reconstructed exactly (whitespace normalized to
//! ASCII spaces).

use super::literals::{
    is_binary_digit, is_digit, is_escapable, is_hex_digit, is_identifier_char,
    is_identifier_start, is_octal_digit,
};
use super::state::LexState;
use super::symbols::{
    decode_special_symbol, is_lex_symbol, is_symbol_continuation, INTERNAL_KEY_SIGIL,
};
use super::tokens::{NumBase, Token, TokenKind};
use crate::util::span::Span;

/// Main scanner structure; consumed by [`Lexer::run`].
pub struct Lexer<'a> {
    chars: Vec<(usize, char)>,
    /// Whether string/char literals are kept as single tokens
    preserve_strings: bool,
    /// Keyword preferences containing quote characters, to be matched with
    /// priority over string-literal collection (ordered by decreasing
    /// length)
    special_keywords: Option<&'a [String]>,
    /// Case-insensitive matching for the special keywords
    ignore_case: bool,

    ix: usize,
    state: LexState,
    buf: String,
    buf_start: usize,
    n_blanks: usize,
    escape: bool,
    tokens: Vec<Token>,
    paddings: Vec<usize>,
}

impl<'a> Lexer<'a> {
    /// Create a new scanner for the given line
    pub fn new(source: &'a str, preserve_strings: bool) -> Self {
        Self {
            chars: source.char_indices().collect(),
            preserve_strings,
            special_keywords: None,
            ignore_case: false,
            ix: 0,
            state: LexState::Idle,
            buf: String::new(),
            buf_start: 0,
            n_blanks: 0,
            escape: false,
            tokens: Vec::new(),
            paddings: Vec::new(),
        }
    }

    /// Give quote-bearing keyword preferences priority over string
    /// collection (only relevant while strings are preserved)
    pub fn with_special_keywords(mut self, keywords: &'a [String], ignore_case: bool) -> Self {
        self.special_keywords = Some(keywords);
        self.ignore_case = ignore_case;
        self
    }

    /// Run the state machine over the whole input and return the tokens
    /// and the padding widths around them (`paddings.len() == tokens.len() + 1`).
    pub fn run(mut self) -> (Vec<Token>, Vec<usize>) {
        while self.ix < self.chars.len() {
            let (pos, c) = self.chars[self.ix];
            match self.state {
                LexState::Idle => self.step_idle(pos, c),
                LexState::Whitespace => self.step_whitespace(c),
                LexState::Name => self.step_name(c),
                LexState::InternalKey => self.step_internal_key(pos, c),
                LexState::Int | LexState::Int0 => self.step_int(pos, c),
                LexState::IntBin => self.step_radix(c, NumBase::Bin, is_binary_digit),
                LexState::IntOct => self.step_radix(c, NumBase::Oct, is_octal_digit),
                LexState::IntHex => self.step_hex(c),
                LexState::Float => self.step_float(c),
                LexState::FloatSignedExp => self.step_float_signed_exp(c),
                LexState::FloatExp => self.step_float_exp(c),
                LexState::CharLit => self.step_string(c, '\'', TokenKind::CharLit),
                LexState::StringLit => self.step_string(c, '"', TokenKind::StringLit),
                LexState::Symbol => self.step_symbol(pos, c),
            }
        }
        if !self.buf.is_empty() {
            let kind = self.pending_kind();
            self.flush(kind);
        }
        self.paddings.push(self.n_blanks);
        (self.tokens, self.paddings)
    }

    /// Append the collected buffer as a token of the given kind
    fn flush(&mut self, kind: TokenKind) {
        let end = self.buf_start + self.buf.len();
        let token = Token::new(
            std::mem::take(&mut self.buf),
            kind,
            Span::of_range(self.buf_start, end),
        );
        self.paddings.push(self.n_blanks);
        self.n_blanks = 0;
        self.tokens.push(token);
        self.state = LexState::Idle;
    }

    /// Token kind for a buffer flushed because the input ended
    fn pending_kind(&self) -> TokenKind {
        match self.state {
            LexState::Name => TokenKind::Name,
            LexState::Int | LexState::Int0 => TokenKind::Int(NumBase::Dec),
            LexState::IntBin => TokenKind::Int(NumBase::Bin),
            LexState::IntOct => TokenKind::Int(NumBase::Oct),
            LexState::IntHex => TokenKind::Int(NumBase::Hex),
            LexState::Float | LexState::FloatSignedExp | LexState::FloatExp => TokenKind::Float,
            LexState::CharLit => TokenKind::CharLit,
            LexState::StringLit => TokenKind::StringLit,
            _ => TokenKind::Symbol,
        }
    }

    fn peek_char(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.ix + ahead).map(|&(_, c)| c)
    }

    /// Initial and interregnum state
    fn step_idle(&mut self, pos: usize, c: char) {
        if c.is_whitespace() {
            self.n_blanks += 1;
            self.state = LexState::Whitespace;
            self.ix += 1;
            return;
        }
        // Quote-bearing keyword preferences take priority over string
        // literal collection
        if self.preserve_strings && self.buf.is_empty() {
            if let Some(n_chars) = self.match_special_keyword() {
                let skey: String = self.chars[self.ix..self.ix + n_chars]
                    .iter()
                    .map(|&(_, c)| c)
                    .collect();
                let end = pos + skey.len();
                self.paddings.push(self.n_blanks);
                self.n_blanks = 0;
                self.tokens
                    .push(Token::new(skey, TokenKind::Name, Span::of_range(pos, end)));
                self.ix += n_chars;
                return;
            }
        }
        if is_identifier_start(c) {
            self.buf_start = pos;
            self.buf.push(c);
            self.state = LexState::Name;
        } else if is_digit(c) {
            self.buf_start = pos;
            self.buf.push(c);
            self.state = if c == '0' { LexState::Int0 } else { LexState::Int };
        } else if c == '.' {
            self.buf_start = pos;
            self.buf.push(c);
            let next = self.peek_char(1);
            // Leading-dot literal like .5 or .09e-8; a bare dot (or a
            // range/ellipsis dot) stays a symbol
            self.state = match next {
                Some(c1) if c1 == 'e' || c1 == 'E' || is_digit(c1) => LexState::Float,
                _ => LexState::Symbol,
            };
        } else if c == '\'' {
            self.buf_start = pos;
            self.buf.push(c);
            self.state = if self.preserve_strings {
                LexState::CharLit
            } else {
                LexState::Symbol
            };
        } else if c == '"' {
            self.buf_start = pos;
            self.buf.push(c);
            self.state = if self.preserve_strings {
                LexState::StringLit
            } else {
                LexState::Symbol
            };
        } else if let Some(decoded) = decode_special_symbol(c) {
            self.paddings.push(self.n_blanks);
            self.n_blanks = 0;
            self.tokens.push(Token::new(
                decoded,
                TokenKind::Symbol,
                Span::of_range(pos, pos + c.len_utf8()),
            ));
        } else if c == INTERNAL_KEY_SIGIL {
            self.buf_start = pos;
            self.buf.push(c);
            self.state = LexState::InternalKey;
        } else {
            self.buf_start = pos;
            self.buf.push(c);
            if c == '\\' {
                self.escape = true;
            }
            self.state = LexState::Symbol;
        }
        self.ix += 1;
    }

    fn step_whitespace(&mut self, c: char) {
        if c.is_whitespace() {
            self.n_blanks += 1;
            self.ix += 1;
        } else {
            self.state = LexState::Idle;
        }
    }

    fn step_name(&mut self, c: char) {
        if is_identifier_char(c) {
            self.buf.push(c);
            self.ix += 1;
        } else {
            self.flush(TokenKind::Name);
        }
    }

    /// Pseudo identifiers of the form `§KEY§` with an upper-case key
    fn step_internal_key(&mut self, pos: usize, c: char) {
        if c.is_ascii_uppercase() {
            self.buf.push(c);
            self.ix += 1;
        } else if c == INTERNAL_KEY_SIGIL {
            if self.buf.chars().count() > 1 {
                self.buf.push(c);
                self.flush(TokenKind::InternalKey);
            } else {
                // Nothing between the two sigils: emit one of them as a
                // singular token, the new one is again a potential start
                let sigil_len = INTERNAL_KEY_SIGIL.len_utf8();
                self.paddings.push(self.n_blanks);
                self.n_blanks = 0;
                self.tokens.push(Token::new(
                    INTERNAL_KEY_SIGIL.to_string(),
                    TokenKind::Symbol,
                    Span::of_range(self.buf_start, self.buf_start + sigil_len),
                ));
                self.buf_start = pos;
            }
            self.ix += 1;
        } else {
            // Make the initial sigil a single token and reprocess the rest
            let sigil_len = INTERNAL_KEY_SIGIL.len_utf8();
            self.paddings.push(self.n_blanks);
            self.n_blanks = 0;
            self.tokens.push(Token::new(
                INTERNAL_KEY_SIGIL.to_string(),
                TokenKind::Symbol,
                Span::of_range(self.buf_start, self.buf_start + sigil_len),
            ));
            self.buf.remove(0);
            self.buf_start += sigil_len;
            // If not empty it is an upper-case letter sequence, thus a name
            self.state = if self.buf.is_empty() {
                LexState::Idle
            } else {
                LexState::Name
            };
        }
    }

    /// Decimal integer literal; also handles the undecided leading-zero form
    fn step_int(&mut self, pos: usize, c: char) {
        if self.state == LexState::Int0 {
            if (c == 'b' || c == 'B') && self.peek_char(1).map(is_binary_digit).unwrap_or(false) {
                self.buf.push(c);
                self.state = LexState::IntBin;
                self.ix += 1;
                return;
            }
            if (c == 'x' || c == 'X') && self.peek_char(1).map(is_hex_digit).unwrap_or(false) {
                self.buf.push(c);
                self.state = LexState::IntHex;
                self.ix += 1;
                return;
            }
            if is_octal_digit(c) {
                self.buf.push(c);
                self.state = LexState::IntOct;
                self.ix += 1;
                return;
            }
            if is_digit(c) {
                // 08, 09: another int literal seems to start here
                self.flush(TokenKind::Int(NumBase::Dec));
                self.buf_start = pos;
                self.buf.push(c);
                self.state = LexState::Int;
                self.ix += 1;
                return;
            }
        }
        if is_digit(c) {
            self.buf.push(c);
            self.ix += 1;
        } else if c == '.' && self.peek_char(1) != Some('.') {
            // A second dot would make this a range/ellipsis symbol
            self.buf.push(c);
            self.state = LexState::Float;
            self.ix += 1;
        } else if c == 'e' || c == 'E' {
            if !self.try_exponent(c) {
                self.flush(TokenKind::Int(NumBase::Dec));
            }
        } else if c == 'f' || c == 'F' {
            // Float literal: [0-9]+f
            self.buf.push(c);
            self.ix += 1;
            self.flush(TokenKind::Float);
        } else if c == 'l' || c == 'L' {
            // Long literal: [0-9]+L
            self.buf.push(c);
            self.ix += 1;
            self.flush(TokenKind::Int(NumBase::Dec));
        } else {
            // Something different seems to start here
            self.flush(TokenKind::Int(NumBase::Dec));
        }
    }

    /// Binary or octal literal body, optional long suffix
    fn step_radix(&mut self, c: char, base: NumBase, digit_test: fn(char) -> bool) {
        if digit_test(c) {
            self.buf.push(c);
            self.ix += 1;
        } else if c == 'l' || c == 'L' {
            self.buf.push(c);
            self.ix += 1;
            self.flush(TokenKind::Int(base));
        } else {
            self.flush(TokenKind::Int(base));
        }
    }

    fn step_hex(&mut self, c: char) {
        if is_hex_digit(c) {
            self.buf.push(c);
            self.ix += 1;
        } else {
            self.flush(TokenKind::Int(NumBase::Hex));
        }
    }

    /// Fraction part of a floating-point literal
    fn step_float(&mut self, c: char) {
        if is_digit(c) {
            self.buf.push(c);
            self.ix += 1;
        } else if c == 'e' || c == 'E' {
            if !self.try_exponent(c) {
                self.flush(TokenKind::Float);
            }
        } else if c == 'f' || c == 'F' {
            self.buf.push(c);
            self.ix += 1;
            self.flush(TokenKind::Float);
        } else {
            self.flush(TokenKind::Float);
        }
    }

    /// Attempts to enter an exponent state; the 'e' only belongs to the
    /// literal when digits (optionally signed) follow.
    fn try_exponent(&mut self, c: char) -> bool {
        let c1 = self.peek_char(1);
        if c1.map(is_digit).unwrap_or(false) {
            self.buf.push(c);
            self.state = LexState::FloatExp;
            self.ix += 1;
            true
        } else if matches!(c1, Some('+') | Some('-'))
            && self.peek_char(2).map(is_digit).unwrap_or(false)
        {
            self.buf.push(c);
            self.state = LexState::FloatSignedExp;
            self.ix += 1;
            true
        } else {
            false
        }
    }

    fn step_float_signed_exp(&mut self, c: char) {
        self.state = LexState::FloatExp;
        if c == '+' || c == '-' {
            self.buf.push(c);
            self.ix += 1;
        }
        // otherwise reprocess in the digits-only exponent state
    }

    fn step_float_exp(&mut self, c: char) {
        if is_digit(c) {
            self.buf.push(c);
            self.ix += 1;
        } else if c == 'f' || c == 'F' {
            self.buf.push(c);
            self.ix += 1;
            self.flush(TokenKind::Float);
        } else {
            self.flush(TokenKind::Float);
        }
    }

    /// String or char literal with escape awareness: the terminating quote
    /// must not be mistaken mid-escape.
    fn step_string(&mut self, c: char, quote: char, kind: TokenKind) {
        self.buf.push(c);
        self.ix += 1;
        if c == '\\' {
            self.escape = !self.escape;
        } else if c == quote && !self.escape {
            self.flush(kind);
        } else {
            self.escape = false;
        }
    }

    /// Generic symbol run with greedy longest-match composition
    fn step_symbol(&mut self, pos: usize, c: char) {
        if is_symbol_continuation(c) {
            let old_len = self.buf.len();
            self.buf.push(c);
            if !is_lex_symbol(&self.buf) {
                // May not be part of the grown symbol: push the former one
                self.buf.truncate(old_len);
                let completed = std::mem::take(&mut self.buf);
                let end = self.buf_start + completed.len();
                let was_assign_arrow = completed == "<-";
                self.paddings.push(self.n_blanks);
                self.n_blanks = 0;
                self.tokens.push(Token::new(
                    completed,
                    TokenKind::Symbol,
                    Span::of_range(self.buf_start, end),
                ));
                if was_assign_arrow && c == '-' {
                    // Drop the superfluous third hyphen of "<--"
                    self.state = LexState::Idle;
                } else {
                    // Start a new symbol with the current character
                    self.buf_start = pos;
                    self.buf.push(c);
                    if c == '\\' {
                        self.escape = true;
                    }
                }
            } else if self.escape && c == '\\' {
                // "\\" completed
                self.escape = false;
            }
            self.ix += 1;
        } else if self.escape && is_escapable(c) {
            // Amalgamate a floating escape sequence outside a string literal
            self.buf.push(c);
            self.escape = false;
            self.ix += 1;
            self.flush(TokenKind::Symbol);
        } else {
            self.escape = false;
            self.flush(TokenKind::Symbol);
        }
    }

    /// Check whether one of the special keywords starts at the current
    /// position; returns the number of chars it occupies.
    fn match_special_keyword(&self) -> Option<usize> {
        let keywords = self.special_keywords?;
        for skey in keywords {
            let key_chars: Vec<char> = skey.chars().collect();
            if key_chars.is_empty() || self.ix + key_chars.len() > self.chars.len() {
                continue;
            }
            let matches = self.chars[self.ix..self.ix + key_chars.len()]
                .iter()
                .zip(key_chars.iter())
                .all(|(&(_, a), &b)| {
                    if self.ignore_case {
                        a.to_lowercase().eq(b.to_lowercase())
                    } else {
                        a == b
                    }
                });
            if matches {
                return Some(key_chars.len());
            }
        }
        None
    }
}

/// Convenience check used by mutating [`super::TokenList`] operations:
/// would `left` and `right` amalgamate into a single token when written
/// next to each other without a gap? Identifier adjacency is the common
/// case; symbol pairs (`-` and `-` giving `--`) and dot/digit pairs are
/// caught by re-lexing the concatenation.
pub fn tokens_amalgamate(left: &str, right: &str) -> bool {
    match (left.chars().last(), right.chars().next()) {
        (Some(a), Some(b)) => {
            if is_identifier_char(a) && is_identifier_char(b) {
                return true;
            }
            let (relexed, _) = Lexer::new(&format!("{}{}", left, right), true).run();
            relexed.len() < 2
        }
        _ => false,
    }
}
