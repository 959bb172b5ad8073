//! Token list: a lexicographically split line of text
//!
//! A [`TokenList`] keeps the non-blank tokens of one line together with the
//! widths of the whitespace gaps between them (the "paddings"), so that the
//! represented line can be reconstructed exactly (all whitespace normalized
//! to ASCII spaces). The padding list always has `tokens.len() + 1`
//! entries: `paddings[0]` is the number of blanks before the first token,
//! `paddings[i]` with `i > 0` is the gap between token `i - 1` and token
//! `i`, and the final entry is the trailing whitespace.
//!
//! Mutating operations keep the bookkeeping consistent and restore a
//! single separating blank wherever two neighboring tokens would otherwise
//! amalgamate into one token on reconstruction.
//!
//! This type is not synchronized; a list is owned and mutated by a single
//! analysis context.

use super::tokenizer::{tokens_amalgamate, Lexer};
use super::tokens::{Token, TokenKind};
use std::fmt;

/// A lexicographically split line of text, maintaining the distances
/// between the tokens.
#[derive(Debug, Clone)]
pub struct TokenList {
    tokens: Vec<Token>,
    paddings: Vec<usize>,
    /// Total character length of the represented text, updated on every
    /// modifying operation
    len: usize,
}

impl Default for TokenList {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenList {
    /// Creates an empty token list, i.e. a token list representing an
    /// empty string.
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            paddings: vec![0],
            len: 0,
        }
    }

    /// Splits the given text into lexical morphemes. This will possibly
    /// overdo somewhat (e.g. signs of number literals form separate
    /// tokens) but floating-point literals like `123.45` or `.09e-8` are
    /// preserved as contiguous tokens. String and char literals are
    /// preserved.
    pub fn from_text(text: &str) -> Self {
        Self::from_text_opts(text, true)
    }

    /// Like [`TokenList::from_text`], with control over string literal
    /// preservation. Keyword preferences possibly containing quotes (like
    /// `jusqu'à`) need `preserve_strings = false` to tokenize as intended.
    pub fn from_text_opts(text: &str, preserve_strings: bool) -> Self {
        let (tokens, paddings) = Lexer::new(text, preserve_strings).run();
        Self::from_parts(tokens, paddings)
    }

    /// Like [`TokenList::from_text`], but quote-bearing keyword
    /// preferences in `special_keywords` (ordered by decreasing length)
    /// are matched with priority and kept as single tokens.
    pub fn from_text_with_keywords(
        text: &str,
        special_keywords: &[String],
        ignore_case: bool,
    ) -> Self {
        let (tokens, paddings) = Lexer::new(text, true)
            .with_special_keywords(special_keywords, ignore_case)
            .run();
        Self::from_parts(tokens, paddings)
    }

    fn from_parts(tokens: Vec<Token>, paddings: Vec<usize>) -> Self {
        debug_assert_eq!(paddings.len(), tokens.len() + 1);
        let mut list = Self {
            tokens,
            paddings,
            len: 0,
        };
        list.recompute_len();
        list
    }

    /// Concatenates the given token lists into a single one, inserting
    /// `separator` between them unless it is `None`. A blank-only
    /// separator guarantees that amount of whitespace between the parts
    /// instead of inserting tokens.
    pub fn concatenate<'a>(
        lists: impl IntoIterator<Item = &'a TokenList>,
        separator: Option<&str>,
    ) -> TokenList {
        let mut total = TokenList::new();
        for (i, part) in lists.into_iter().enumerate() {
            if i > 0 {
                if let Some(sep) = separator {
                    if sep.chars().all(char::is_whitespace) {
                        if !sep.is_empty() && !total.is_blank() {
                            let last = total.size() - 1;
                            total.set_padding(last, -1, sep.chars().count() as isize);
                        }
                    } else {
                        total.push_str(sep);
                    }
                }
            }
            total.append(part.clone());
        }
        total
    }

    /// Restores the represented text line as a string including the
    /// padding whitespace between the tokens.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.len);
        for (i, token) in self.tokens.iter().enumerate() {
            out.extend(std::iter::repeat(' ').take(self.paddings[i]));
            out.push_str(&token.text);
        }
        out.extend(std::iter::repeat(' ').take(self.paddings[self.tokens.len()]));
        out
    }

    /// Returns the token texts either without gaps or with whitespace
    /// elements according to the paddings interleaved.
    pub fn to_strings(&self, with_gaps: bool) -> Vec<String> {
        let mut out = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if with_gaps {
                out.push(" ".repeat(self.paddings[i]));
            }
            out.push(token.text.clone());
        }
        if with_gaps {
            out.push(" ".repeat(self.paddings[self.tokens.len()]));
        }
        out
    }

    /// The number of tokens this token list consists of
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    /// The length (total number of characters) of the represented text
    /// string including whitespace
    pub fn length(&self) -> usize {
        self.len
    }

    /// `true` if this token list does not contain a single token (it
    /// might still represent whitespace)
    pub fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `true` if this token list neither contains tokens nor whitespace
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The token at the given position
    pub fn get(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    /// The token text at the given position
    pub fn text_at(&self, index: usize) -> &str {
        &self.tokens[index].text
    }

    /// The very first token, if any
    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    /// The very last token, if any
    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Iterate over the tokens
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Replaces the token at `index` with the given string (which should
    /// have token properties, i.e. not fall apart when re-lexed). An empty
    /// replacement removes the token. Returns the replaced token.
    pub fn set(&mut self, index: usize, text: &str) -> Token {
        if text.is_empty() {
            return self.remove(index);
        }
        let relexed = TokenList::from_text(text);
        let kind = if relexed.size() == 1 {
            relexed.get(0).kind
        } else {
            TokenKind::Symbol
        };
        let new_len = text.chars().count();
        let mut token = Token::synthetic(text, kind);
        std::mem::swap(&mut token, &mut self.tokens[index]);
        self.len = self.len + new_len - token.len();
        if index > 0 {
            self.ensure_gap(index - 1);
        }
        self.ensure_gap(index);
        token
    }

    /// Sets the paddings around the token at `index`; negative values are
    /// ignored. Automatically ensures a single separating blank between
    /// two tokens that would otherwise amalgamate. Returns the growth of
    /// the total padding sum.
    pub fn set_padding(&mut self, index: usize, left: isize, right: isize) -> isize {
        let mut growth = 0isize;
        if left >= 0 {
            growth += left - self.paddings[index] as isize;
            self.paddings[index] = left as usize;
            if index > 0 && self.paddings[index] == 0 && self.ensure_gap_core(index - 1) {
                growth += 1;
            }
        }
        if right >= 0 {
            growth += right - self.paddings[index + 1] as isize;
            self.paddings[index + 1] = right as usize;
            if index + 1 < self.tokens.len()
                && self.paddings[index + 1] == 0
                && self.ensure_gap_core(index)
            {
                growth += 1;
            }
        }
        self.len = (self.len as isize + growth) as usize;
        growth
    }

    /// The total number of blanks in all paddings
    pub fn padding_total(&self) -> usize {
        self.paddings.iter().sum()
    }

    /// The (left, right) padding pair around the token at `index`
    pub fn padding_at(&self, index: usize) -> (usize, usize) {
        (self.paddings[index], self.paddings[index + 1])
    }

    /// Removes all but necessary inter-token whitespace and trims the
    /// list at both ends. Returns the change of the number of whitespace
    /// characters.
    pub fn shrink(&mut self) -> isize {
        let mut change = 0isize;
        for i in 0..self.tokens.len() {
            change += self.set_padding(i, 0, 0);
        }
        if self.tokens.is_empty() {
            change -= self.paddings[0] as isize;
            self.len -= self.paddings[0];
            self.paddings[0] = 0;
        }
        change
    }

    /// Eliminates absolutely all whitespace around the tokens without
    /// ensuring minimum gaps. Necessary gaps can be restored afterwards
    /// with [`TokenList::shrink`] or [`TokenList::set_padding`].
    pub fn remove_paddings(&mut self) -> isize {
        let mut removed = 0isize;
        for padding in self.paddings.iter_mut() {
            removed -= *padding as isize;
            *padding = 0;
        }
        self.len = (self.len as isize + removed) as usize;
        removed
    }

    /// Eliminates all whitespace between token `from_index` and token
    /// `to_index` (exclusive outer paddings).
    pub fn remove_paddings_between(&mut self, from_index: usize, to_index: usize) -> isize {
        let mut removed = 0isize;
        for i in (from_index + 1)..=to_index {
            removed -= self.paddings[i] as isize;
            self.paddings[i] = 0;
        }
        self.len = (self.len as isize + removed) as usize;
        removed
    }

    /// Removes whitespace from the beginning and end. Returns the number
    /// of removed blanks.
    pub fn trim(&mut self) -> usize {
        self.trim_start() + self.trim_end()
    }

    /// Removes trailing whitespace. Returns the number of removed blanks.
    pub fn trim_end(&mut self) -> usize {
        let last = self.tokens.len();
        let shortened = self.paddings[last];
        self.paddings[last] = 0;
        self.len -= shortened;
        shortened
    }

    /// Removes leading whitespace. Returns the number of removed blanks.
    pub fn trim_start(&mut self) -> usize {
        let shortened = self.paddings[0];
        self.paddings[0] = 0;
        self.len -= shortened;
        shortened
    }

    /// Returns a copy of the portion of this token list between
    /// `from_index` (inclusive) and `to_index` (exclusive). The copy is
    /// trimmed at both ends.
    pub fn sub_sequence(&self, from_index: usize, to_index: usize) -> TokenList {
        let mut part = TokenList::new();
        if from_index < to_index {
            part.tokens.extend_from_slice(&self.tokens[from_index..to_index]);
            part.paddings
                .splice(1..1, self.paddings[from_index + 1..to_index].iter().copied());
            part.paddings.push(0);
            part.paddings.truncate(part.tokens.len() + 1);
        }
        part.recompute_len();
        part
    }

    /// Returns a copy of the portion from `from_index` towards the end.
    pub fn sub_sequence_to_end(&self, from_index: usize) -> TokenList {
        self.sub_sequence(from_index, self.tokens.len())
    }

    /// Whether this token list contains the given string as exact token
    pub fn contains(&self, token: &str) -> bool {
        self.contains_matching(token, true)
    }

    /// Whether this token list contains a token equal to `token` in a
    /// case-aware or case-ignorant way
    pub fn contains_matching(&self, token: &str, case_sensitive: bool) -> bool {
        self.index_of(token, 0, case_sensitive).is_some()
    }

    /// Whether `sub` occurs as a contiguous token subsequence
    pub fn contains_list(&self, sub: &TokenList, case_sensitive: bool) -> bool {
        self.index_of_list(sub, 0, case_sensitive).is_some()
    }

    /// Counts the (exact or case-ignorant) occurrences of `token`
    pub fn count_of(&self, token: &str, case_sensitive: bool) -> usize {
        self.tokens
            .iter()
            .filter(|t| t.matches(token, case_sensitive))
            .count()
    }

    /// Position of the first token equal to `token` at or after
    /// `from_index`
    pub fn index_of(&self, token: &str, from_index: usize, case_sensitive: bool) -> Option<usize> {
        (from_index..self.tokens.len()).find(|&i| self.tokens[i].matches(token, case_sensitive))
    }

    /// Position of the last token equal to `token`
    pub fn last_index_of(&self, token: &str, case_sensitive: bool) -> Option<usize> {
        (0..self.tokens.len())
            .rev()
            .find(|&i| self.tokens[i].matches(token, case_sensitive))
    }

    /// Position of the first occurrence of the token subsequence `sub` at
    /// or after `from_index`
    pub fn index_of_list(
        &self,
        sub: &TokenList,
        from_index: usize,
        case_sensitive: bool,
    ) -> Option<usize> {
        let n = sub.size();
        if n == 0 || self.size() < n {
            return None;
        }
        (from_index..=self.size() - n).find(|&i| self.matches_at(i, sub, case_sensitive))
    }

    /// Position of the last occurrence of the token subsequence `sub`
    pub fn last_index_of_list(&self, sub: &TokenList, case_sensitive: bool) -> Option<usize> {
        let n = sub.size();
        if n == 0 || self.size() < n {
            return None;
        }
        (0..=self.size() - n)
            .rev()
            .find(|&i| self.matches_at(i, sub, case_sensitive))
    }

    fn matches_at(&self, at: usize, sub: &TokenList, case_sensitive: bool) -> bool {
        sub.tokens
            .iter()
            .enumerate()
            .all(|(j, t)| self.tokens[at + j].matches(&t.text, case_sensitive))
    }

    /// Appends the token list derived from `text` at the end, beyond the
    /// end padding. Inserts a blank at the seam if the neighboring tokens
    /// would otherwise amalgamate.
    pub fn push_str(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        // We may not be sure to obtain a genuine single token, so split
        self.append(TokenList::from_text(text));
        true
    }

    /// Inserts the token list derived from `text` before the token at
    /// `index`, shifting the rest.
    pub fn insert_str(&mut self, index: usize, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.insert_list(index, TokenList::from_text(text));
        true
    }

    /// Appends all tokens (and gaps) of `other` at the end.
    pub fn append(&mut self, other: TokenList) {
        let seam = self.tokens.len();
        let trailing = self.paddings.pop().unwrap_or(0);
        let mut other_paddings = other.paddings.into_iter();
        let leading = other_paddings.next().unwrap_or(0);
        self.paddings.push(trailing + leading);
        self.paddings.extend(other_paddings);
        self.tokens.extend(other.tokens);
        if seam > 0 {
            self.ensure_gap(seam - 1);
        }
        self.recompute_len();
    }

    /// Inserts all tokens (and inner gaps) of `other` before the token at
    /// `index` (`index == size()` appends).
    pub fn insert_list(&mut self, index: usize, other: TokenList) {
        if index == self.tokens.len() {
            self.append(other);
            return;
        }
        let k = other.tokens.len();
        if k == 0 {
            return;
        }
        self.paddings[index] += other.paddings[0];
        self.paddings
            .splice(index + 1..index + 1, other.paddings[1..=k].iter().copied());
        self.tokens.splice(index..index, other.tokens);
        if index > 0 {
            self.ensure_gap(index - 1);
        }
        self.ensure_gap(index + k - 1);
        self.recompute_len();
    }

    /// Removes the token at the given position; neighboring paddings are
    /// merged. Returns the removed token.
    pub fn remove(&mut self, index: usize) -> Token {
        let n = self.tokens.len();
        if index == 0 {
            if n > 1 {
                let gone = self.paddings.remove(1);
                self.len -= gone;
            } else {
                // The only token: keep leading and trailing paddings merged
                let trailing = self.paddings.remove(1);
                self.paddings[0] += trailing;
            }
        } else if index == n - 1 {
            let gone = self.paddings.remove(index);
            self.len -= gone;
        } else {
            let gap = self.paddings[index] + self.paddings[index + 1];
            self.paddings[index + 1] = gap / 2 + gap % 2;
            self.paddings.remove(index);
            self.len -= gap / 2;
        }
        let removed = self.tokens.remove(index);
        self.len -= removed.len();
        if index > 0 {
            self.ensure_gap(index - 1);
        }
        removed
    }

    /// Cuts out and removes the portion between `from_index` (inclusive)
    /// and `to_index` (exclusive); the removed subsequence is returned.
    pub fn remove_range(&mut self, from_index: usize, to_index: usize) -> TokenList {
        let removed = self.sub_sequence(from_index, to_index);
        for i in (from_index..to_index).rev() {
            self.remove(i);
        }
        if from_index > 0 {
            self.ensure_gap(from_index - 1);
        }
        removed
    }

    /// Check whether token `i` and its successor need a separating blank;
    /// insert one if so.
    fn ensure_gap(&mut self, i: usize) -> bool {
        let grown = self.ensure_gap_core(i);
        if grown {
            self.len += 1;
        }
        grown
    }

    fn ensure_gap_core(&mut self, i: usize) -> bool {
        if i + 1 < self.tokens.len() && self.paddings[i + 1] == 0 {
            let left = &self.tokens[i].text;
            let right = &self.tokens[i + 1].text;
            if tokens_amalgamate(left, right) {
                self.paddings[i + 1] = 1;
                return true;
            }
        }
        false
    }

    fn recompute_len(&mut self) {
        self.len = self.paddings.iter().sum::<usize>()
            + self.tokens.iter().map(Token::len).sum::<usize>();
    }

    /// Token-wise equality honoring the given case sensitivity
    pub fn same_tokens(&self, other: &TokenList, case_sensitive: bool) -> bool {
        self.size() == other.size() && self.matches_at(0, other, case_sensitive)
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl PartialEq for TokenList {
    fn eq(&self, other: &Self) -> bool {
        self.same_tokens(other, true)
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
