//! Lexical atoms of a service-area string
//!
//! The tokenizer only cuts at whitespace and a fixed punctuation set. A run
//! such as `Badenerstr.717` stays one atom; separating the street from its
//! number is left to the classifier.

use serde::{Deserialize, Serialize};

/// Candidate separator between segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    Slash,
    Comma,
    Semicolon,
    /// Hyphen, en dash or em dash
    Dash,
    /// A run of whitespace
    Whitespace,
}

impl Delimiter {
    /// Tie-break rank; lower wins
    pub fn priority(self) -> u8 {
        match self {
            Delimiter::Slash => 0,
            Delimiter::Comma => 1,
            Delimiter::Semicolon => 2,
            Delimiter::Dash => 3,
            Delimiter::Whitespace => 4,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '/' => Some(Delimiter::Slash),
            ',' => Some(Delimiter::Comma),
            ';' => Some(Delimiter::Semicolon),
            '-' | '–' | '—' => Some(Delimiter::Dash),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    Word,
    Number,
    Delimiter(Delimiter),
    Punctuation,
}

/// A typed slice of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom<'a> {
    pub text: &'a str,
    pub kind: AtomKind,
    /// Byte offset into the tokenized string
    pub start: usize,
}

impl<'a> Atom<'a> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn is_significant(&self) -> bool {
        matches!(self.kind, AtomKind::Word | AtomKind::Number)
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == AtomKind::Delimiter(Delimiter::Whitespace)
    }

    pub fn delimiter(&self) -> Option<Delimiter> {
        match self.kind {
            AtomKind::Delimiter(d) => Some(d),
            _ => None,
        }
    }

    pub(crate) fn starts_with_digit(&self) -> bool {
        self.text.starts_with(|c: char| c.is_ascii_digit())
    }

    pub(crate) fn ends_with_digit(&self) -> bool {
        self.text.ends_with(|c: char| c.is_ascii_digit())
    }
}

fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '[' | ']' | '{' | '}' | ':' | '&' | '+' | '"' | '|' | '«' | '»' | '“' | '”'
    )
}

/// Split `raw` into atoms, preserving order and byte offsets
pub fn tokenize(raw: &str) -> Vec<Atom<'_>> {
    let mut atoms = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut space_start: Option<usize> = None;

    for (i, c) in raw.char_indices() {
        if c.is_whitespace() {
            flush_run(raw, &mut run_start, i, &mut atoms);
            space_start.get_or_insert(i);
            continue;
        }
        flush_space(raw, &mut space_start, i, &mut atoms);

        if let Some(delimiter) = Delimiter::from_char(c) {
            flush_run(raw, &mut run_start, i, &mut atoms);
            atoms.push(Atom {
                text: &raw[i..i + c.len_utf8()],
                kind: AtomKind::Delimiter(delimiter),
                start: i,
            });
        } else if is_punctuation(c) {
            flush_run(raw, &mut run_start, i, &mut atoms);
            atoms.push(Atom {
                text: &raw[i..i + c.len_utf8()],
                kind: AtomKind::Punctuation,
                start: i,
            });
        } else {
            run_start.get_or_insert(i);
        }
    }

    flush_run(raw, &mut run_start, raw.len(), &mut atoms);
    flush_space(raw, &mut space_start, raw.len(), &mut atoms);
    atoms
}

fn flush_run<'a>(raw: &'a str, start: &mut Option<usize>, end: usize, atoms: &mut Vec<Atom<'a>>) {
    if let Some(s) = start.take() {
        let text = &raw[s..end];
        let kind = if text.bytes().all(|b| b.is_ascii_digit()) {
            AtomKind::Number
        } else if text.chars().any(char::is_alphanumeric) {
            AtomKind::Word
        } else {
            AtomKind::Punctuation
        };
        atoms.push(Atom {
            text,
            kind,
            start: s,
        });
    }
}

fn flush_space<'a>(raw: &'a str, start: &mut Option<usize>, end: usize, atoms: &mut Vec<Atom<'a>>) {
    if let Some(s) = start.take() {
        atoms.push(Atom {
            text: &raw[s..end],
            kind: AtomKind::Delimiter(Delimiter::Whitespace),
            start: s,
        });
    }
}
