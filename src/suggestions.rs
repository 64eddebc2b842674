//! Follow-up question suggestions and the strict parser for model-emitted lists.
//!
//! The model is asked to reply with a bracketed list of three quoted strings,
//! e.g. `["What is CPF?", "Can I use it for housing?", "How is it taxed?"]`.
//! The parser accepts exactly that shape and nothing more; any deviation is an
//! error so the caller can fall back to [`SuggestionSet::default`].

use serde::Serialize;
use thiserror::Error;

use crate::constants::DEFAULT_SUGGESTIONS;

pub const SUGGESTION_COUNT: usize = 3;

/// Exactly three follow-up questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionSet([String; SUGGESTION_COUNT]);

impl SuggestionSet {
    pub fn new(items: [String; SUGGESTION_COUNT]) -> Self {
        Self(items)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// 1-based lookup, as shown to terminal users.
    pub fn get(&self, number: usize) -> Option<&str> {
        number.checked_sub(1).and_then(|i| self.0.get(i)).map(String::as_str)
    }

    /// Parse a model reply, failing closed on anything but a three-string list.
    pub fn parse(reply: &str) -> Result<Self, SuggestionParseError> {
        let items = parse_string_list(reply)?;
        let items: [String; SUGGESTION_COUNT] = items
            .try_into()
            .map_err(|items: Vec<String>| SuggestionParseError::WrongCount(items.len()))?;
        Ok(Self(items))
    }
}

impl Default for SuggestionSet {
    fn default() -> Self {
        Self(DEFAULT_SUGGESTIONS.map(String::from))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuggestionParseError {
    #[error("expected '{expected}' at offset {offset}")]
    Expected { expected: char, offset: usize },

    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("unsupported escape '\\{0}'")]
    BadEscape(char),

    #[error("expected 3 suggestions, got {0}")]
    WrongCount(usize),
}

/// Accepts `[` (quoted string (`,` quoted string)* `,`?)? `]` surrounded by optional
/// whitespace. Strings use single or double quotes with backslash escapes.
pub fn parse_string_list(input: &str) -> Result<Vec<String>, SuggestionParseError> {
    let mut cursor = Cursor::new(input);
    cursor.skip_whitespace();
    cursor.expect('[')?;

    let mut items = Vec::new();
    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            Some(']') => {
                cursor.bump();
                break;
            }
            Some('"') | Some('\'') => {
                items.push(cursor.string()?);
                cursor.skip_whitespace();
                match cursor.peek() {
                    Some(',') => {
                        cursor.bump();
                    }
                    Some(']') => {
                        cursor.bump();
                        break;
                    }
                    _ => return Err(cursor.unexpected_or(']')),
                }
            }
            _ => return Err(cursor.unexpected_or(']')),
        }
    }

    cursor.skip_whitespace();
    match cursor.peek() {
        None => Ok(items),
        Some(found) => Err(SuggestionParseError::Unexpected {
            found,
            offset: cursor.offset,
        }),
    }
}

struct Cursor<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SuggestionParseError> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(SuggestionParseError::Expected {
                expected,
                offset: self.offset,
            })
        }
    }

    fn unexpected_or(&self, expected: char) -> SuggestionParseError {
        match self.peek() {
            Some(found) => SuggestionParseError::Unexpected {
                found,
                offset: self.offset,
            },
            None => SuggestionParseError::Expected {
                expected,
                offset: self.offset,
            },
        }
    }

    fn string(&mut self) -> Result<String, SuggestionParseError> {
        let start = self.offset;
        let quote = self.bump().ok_or(SuggestionParseError::UnterminatedString(start))?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(SuggestionParseError::UnterminatedString(start)),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = self.bump().ok_or(SuggestionParseError::UnterminatedString(start))?;
                    out.push(match escaped {
                        '\\' => '\\',
                        '"' => '"',
                        '\'' => '\'',
                        'n' => '\n',
                        't' => '\t',
                        other => return Err(SuggestionParseError::BadEscape(other)),
                    });
                }
                Some(c) => out.push(c),
            }
        }
    }
}
