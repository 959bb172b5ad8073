//! Keyword/decorator service
//!
//! Structogram pseudocode is keyword-configurable: the marker words that
//! introduce or terminate structural blocks ("for", "while", "until", the
//! input/output markers, ...) are user preferences, held in named slots.
//! This service keeps the current slot values, hands out their tokenized
//! forms (cached), strips redundant decorator keywords from token lists,
//! and translates between user-facing keyword text and internal
//! single-token placeholders (`§PREFOR§`) so downstream components can
//! match keywords positionally without depending on the configured text.

use crate::frontend::core::lexer::symbols::INTERNAL_KEY_SIGIL;
use crate::frontend::core::lexer::{TokenList, TokenKind};
use crate::util::config::{self, ConfigError, ParserConfig, UserConfig};
use std::collections::HashMap;


/// The keyword slot table with its tokenized-form cache.
///
/// One instance per session; the GUI owns it and mutates it when the user
/// changes preferences.
#[derive(Debug, Clone)]
pub struct Keywords {
    config: ParserConfig,
    /// Lazily tokenized slot values, invalidated on every slot change
    split_cache: HashMap<String, TokenList>,
}

impl Default for Keywords {
    fn default() -> Self {
        Self::from_config(ParserConfig::default())
    }
}

impl Keywords {
    /// Build the service from parser preferences
    pub fn from_config(config: ParserConfig) -> Self {
        Self {
            config,
            split_cache: HashMap::new(),
        }
    }

    /// Load the parser preferences from the persisted configuration store
    pub fn load() -> Result<Self, ConfigError> {
        let user = config::load_user_config()?;
        tracing::debug!("loaded {} keyword slots", user.parser.keywords.len());
        Ok(Self::from_config(user.parser))
    }

    /// Write the current parser preferences back to the configuration store
    pub fn save(&self) -> Result<(), ConfigError> {
        let user = UserConfig {
            parser: self.config.clone(),
        };
        config::save_user_config(&user)
    }

    /// Whether keyword matching ignores case
    pub fn ignore_case(&self) -> bool {
        self.config.ignore_case
    }

    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.config.ignore_case = ignore_case;
    }

    /// The set of slot names
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.config.keywords.keys().map(String::as_str)
    }

    /// The configured keyword for `slot`, if the slot exists.
    /// An empty `preForIn` slot falls back to the `preFor` keyword.
    pub fn keyword(&self, slot: &str) -> Option<&str> {
        let word = self.config.keyword(slot)?;
        if slot == "preForIn" && word.trim().is_empty() {
            return self.config.keyword("preFor");
        }
        Some(word)
    }

    /// Replaces the slot value for this session. Only existing slots may
    /// be set; the tokenized cache entry is refreshed.
    pub fn set_keyword(&mut self, slot: &str, word: &str) -> bool {
        if !self.config.set_keyword(slot, word) {
            return false;
        }
        // Keyword preferences may contain quotes, so do not treat them as
        // string delimiters
        self.split_cache
            .insert(slot.to_string(), TokenList::from_text_opts(word, false));
        true
    }

    /// The tokenized form of the slot keyword, for precise token-wise
    /// comparison. Works with lazy initialization.
    pub fn split_keyword(&mut self, slot: &str) -> Option<&TokenList> {
        if !self.config.keywords.contains_key(slot) {
            return None;
        }
        if !self.split_cache.contains_key(slot) {
            let word = self.keyword(slot).unwrap_or("").to_string();
            self.split_cache
                .insert(slot.to_string(), TokenList::from_text_opts(&word, false));
        }
        self.split_cache.get(slot)
    }

    /// Keyword values containing quote characters; these must be matched
    /// with priority during lexing lest they fall apart at the quotes.
    /// Ordered by decreasing length.
    pub fn quoted_keywords(&self) -> Vec<String> {
        let mut quoted: Vec<String> = self
            .config
            .keywords
            .values()
            .filter(|word| word.contains('\'') || word.contains('"'))
            .cloned()
            .collect();
        quoted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        quoted
    }

    /// Tokenize one line honoring quote-bearing keyword preferences
    pub fn tokenize_line(&self, text: &str) -> TokenList {
        let quoted = self.quoted_keywords();
        if quoted.is_empty() {
            TokenList::from_text(text)
        } else {
            TokenList::from_text_with_keywords(text, &quoted, self.config.ignore_case)
        }
    }

    /// Slot names ordered by decreasing tokenized keyword length, so that
    /// longer markers are matched before any of their prefixes.
    fn slots_longest_first(&mut self) -> Vec<String> {
        let mut slots: Vec<(String, usize)> = Vec::new();
        let names: Vec<String> = self.config.keywords.keys().cloned().collect();
        for slot in names {
            let len = match self.split_keyword(&slot) {
                Some(tokens) if !tokens.is_blank() => tokens.length(),
                _ => continue,
            };
            slots.push((slot, len));
        }
        slots.sort_by(|a, b| b.1.cmp(&a.1));
        slots.into_iter().map(|(slot, _)| slot).collect()
    }

    /// Deletes every occurrence of any configured decorator keyword's
    /// token sequence from `tokens`, longest markers first. Returns the
    /// number of removed occurrences.
    pub fn remove_decorators(&mut self, tokens: &mut TokenList) -> usize {
        let case_sensitive = !self.config.ignore_case;
        let mut removed = 0;
        for slot in self.slots_longest_first() {
            let marker = match self.split_keyword(&slot) {
                Some(tokens) => tokens.clone(),
                None => continue,
            };
            while let Some(at) = tokens.index_of_list(&marker, 0, case_sensitive) {
                tokens.remove_range(at, at + marker.size());
                removed += 1;
            }
        }
        tracing::trace!("removed {} decorator occurrences", removed);
        removed
    }

    /// The internal placeholder token text for a slot (`preFor` ->
    /// `§PREFOR§`)
    pub fn placeholder(slot: &str) -> String {
        format!(
            "{}{}{}",
            INTERNAL_KEY_SIGIL,
            slot.to_ascii_uppercase(),
            INTERNAL_KEY_SIGIL
        )
    }

    /// The slot name encoded in an internal placeholder token, if any
    pub fn placeholder_slot(&self, token_text: &str) -> Option<String> {
        let key = token_text
            .strip_prefix(INTERNAL_KEY_SIGIL)?
            .strip_suffix(INTERNAL_KEY_SIGIL)?;
        self.config
            .keywords
            .keys()
            .find(|slot| slot.to_ascii_uppercase() == key)
            .cloned()
    }

    /// Replaces every configured keyword's token sequence by its internal
    /// single-token placeholder, longest markers first.
    pub fn encode_line(&mut self, tokens: &TokenList) -> TokenList {
        let case_sensitive = !self.config.ignore_case;
        let mut encoded = tokens.clone();
        for slot in self.slots_longest_first() {
            let marker = match self.split_keyword(&slot) {
                Some(tokens) => tokens.clone(),
                None => continue,
            };
            let mut from = 0;
            while let Some(at) = encoded.index_of_list(&marker, from, case_sensitive) {
                encoded.remove_range(at, at + marker.size());
                encoded.insert_str(at, &Self::placeholder(&slot));
                from = at + 1;
            }
        }
        encoded
    }

    /// Replaces every internal keyword placeholder by the currently
    /// configured keyword text for its slot. Placeholders of unknown
    /// slots are left alone.
    pub fn decode_line(&mut self, tokens: &TokenList) -> TokenList {
        let mut decoded = TokenList::new();
        for (i, token) in tokens.iter().enumerate() {
            let replacement = if token.kind == TokenKind::InternalKey {
                self.placeholder_slot(&token.text)
                    .and_then(|slot| self.keyword(&slot).map(str::to_string))
            } else {
                None
            };
            let (left, _right) = tokens.padding_at(i);
            let mut piece = match replacement {
                Some(word) => TokenList::from_text_opts(&word, false),
                None => tokens.sub_sequence(i, i + 1),
            };
            piece.set_padding(0, left as isize, -1);
            decoded.append(piece);
        }
        if tokens.size() > 0 && decoded.size() > 0 {
            let trailing = tokens.padding_at(tokens.size() - 1).1;
            if trailing > 0 {
                decoded.set_padding(decoded.size() - 1, -1, trailing as isize);
            }
        }
        decoded
    }
}
