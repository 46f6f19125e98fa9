//! Data-driven phonetic provider.
//!
//! `ReadingTable` maps single characters to a romanized reading supplied by the
//! caller (for Chinese text: one pinyin syllable per hanzi). It carries no
//! transliteration rules of its own; with an empty table it degrades to
//! lower-cased text and word initials.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::traits::PhoneticProvider;

#[derive(Debug, Clone, Default)]
pub struct ReadingTable {
    readings: HashMap<char, String>,
}

enum Piece<'a> {
    Token(Cow<'a, str>),
    Gap,
}

impl ReadingTable {
    pub fn new() -> Self { Self::default() }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (char, S)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (ch, reading) in pairs {
            table.insert(ch, reading.as_ref());
        }
        table
    }

    /// Load a JSON object of `{"字": "zi", ...}`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| Error::Json { path: path.to_path_buf(), source })?;
        let mut table = Self::new();
        for (key, reading) in entries {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => table.insert(ch, &reading),
                _ => {
                    return Err(Error::InvalidConfig(format!(
                        "reading table {}: key {:?} is not a single character",
                        path.display(),
                        key
                    )))
                }
            }
        }
        tracing::debug!(path = %path.display(), readings = table.len(), "loaded reading table");
        Ok(table)
    }

    pub fn insert(&mut self, ch: char, reading: &str) {
        let reading = reading.trim().to_lowercase();
        if !reading.is_empty() {
            self.readings.insert(ch, reading);
        }
    }

    pub fn len(&self) -> usize { self.readings.len() }

    pub fn is_empty(&self) -> bool { self.readings.is_empty() }

    // Mapped chars become their own token, unmapped runs form one token,
    // whitespace collapses into a single gap.
    fn pieces<'a>(&'a self, text: &str) -> Vec<Piece<'a>> {
        let mut pieces = Vec::new();
        let mut run = String::new();
        for ch in text.chars() {
            if ch.is_whitespace() {
                flush_run(&mut run, &mut pieces);
                if matches!(pieces.last(), Some(Piece::Token(_))) {
                    pieces.push(Piece::Gap);
                }
            } else if let Some(reading) = self.readings.get(&ch) {
                flush_run(&mut run, &mut pieces);
                pieces.push(Piece::Token(Cow::Borrowed(reading.as_str())));
            } else {
                run.extend(ch.to_lowercase());
            }
        }
        flush_run(&mut run, &mut pieces);
        if matches!(pieces.last(), Some(Piece::Gap)) {
            pieces.pop();
        }
        pieces
    }
}

fn flush_run(run: &mut String, pieces: &mut Vec<Piece<'_>>) {
    if !run.is_empty() {
        pieces.push(Piece::Token(Cow::Owned(std::mem::take(run))));
    }
}

impl PhoneticProvider for ReadingTable {
    fn phonetic(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for piece in self.pieces(text) {
            match piece {
                Piece::Token(token) => out.push_str(&token),
                Piece::Gap => out.push(' '),
            }
        }
        out
    }

    fn initials(&self, text: &str) -> String {
        self.pieces(text)
            .iter()
            .filter_map(|piece| match piece {
                Piece::Token(token) => token.chars().next(),
                Piece::Gap => None,
            })
            .collect()
    }
}
