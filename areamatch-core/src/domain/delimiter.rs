//! Delimiter scoring and segment splitting
//!
//! Each candidate separator is scored by how often it actually separates
//! something, doubled when every occurrence sits in the same structural
//! context (between two numbers, or between two groups). The winner drives
//! the top-level split; pieces are re-split on the remaining candidates.

use smallvec::SmallVec;

use crate::domain::classifier::SegmentClassifier;
use crate::domain::tokenizer::{tokenize, Atom, AtomKind, Delimiter};

/// Score of one candidate separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterScore {
    pub delimiter: Delimiter,
    pub count: usize,
    pub consistent: bool,
    pub score: usize,
}

/// A contiguous slice of the input selected for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    /// Byte offset into the full service-area string
    pub offset: usize,
    /// Trailing word run cut off by a whitespace split
    pub loose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    BetweenNumbers,
    BetweenGroups,
}

/// Drop delimiter atoms at both ends
fn trim_delimiters<'s, 'a>(atoms: &'s [Atom<'a>]) -> &'s [Atom<'a>] {
    let start = atoms
        .iter()
        .position(|a| a.delimiter().is_none())
        .unwrap_or(atoms.len());
    let end = atoms
        .iter()
        .rposition(|a| a.delimiter().is_none())
        .map_or(start, |i| i + 1);
    &atoms[start..end.max(start)]
}

fn previous_significant<'s, 'a>(atoms: &'s [Atom<'a>], i: usize) -> Option<&'s Atom<'a>> {
    atoms[..i].iter().rev().find(|a| a.is_significant())
}

fn next_significant<'s, 'a>(atoms: &'s [Atom<'a>], i: usize) -> Option<&'s Atom<'a>> {
    atoms[i + 1..].iter().find(|a| a.is_significant())
}

fn context(atoms: &[Atom<'_>], i: usize) -> Context {
    match (previous_significant(atoms, i), next_significant(atoms, i)) {
        (Some(prev), Some(next)) if prev.ends_with_digit() && next.starts_with_digit() => {
            Context::BetweenNumbers
        }
        _ => Context::BetweenGroups,
    }
}

/// Whether the atom at `i` acts as a separator rather than padding, a range
/// dash or a name hyphen.
fn is_separator(atoms: &[Atom<'_>], i: usize) -> bool {
    let before = i.checked_sub(1).and_then(|j| atoms.get(j));
    let after = atoms.get(i + 1);

    match atoms[i].kind {
        AtomKind::Delimiter(Delimiter::Slash | Delimiter::Comma | Delimiter::Semicolon) => true,
        AtomKind::Delimiter(Delimiter::Dash) => {
            let padded = before.is_some_and(Atom::is_whitespace) && after.is_some_and(Atom::is_whitespace);
            padded && context(atoms, i) == Context::BetweenGroups
        }
        AtomKind::Delimiter(Delimiter::Whitespace) => match (before, after) {
            (Some(b), Some(a)) if b.is_significant() && a.is_significant() => {
                b.ends_with_digit() || a.starts_with_digit()
            }
            _ => false,
        },
        _ => false,
    }
}

/// Score every separator present in `atoms`, best first
pub fn score_delimiters(atoms: &[Atom<'_>]) -> Vec<DelimiterScore> {
    let atoms = trim_delimiters(atoms);
    let mut tallies: SmallVec<[(Delimiter, usize, Option<Context>, bool); 5]> = SmallVec::new();

    for (i, atom) in atoms.iter().enumerate() {
        let Some(delimiter) = atom.delimiter() else {
            continue;
        };
        if !is_separator(atoms, i) {
            continue;
        }
        let ctx = context(atoms, i);
        match tallies.iter_mut().find(|(d, ..)| *d == delimiter) {
            Some((_, count, first, consistent)) => {
                *count += 1;
                *consistent &= *first == Some(ctx);
            }
            None => tallies.push((delimiter, 1, Some(ctx), true)),
        }
    }

    let mut scores: Vec<DelimiterScore> = tallies
        .into_iter()
        .map(|(delimiter, count, _, consistent)| DelimiterScore {
            delimiter,
            count,
            consistent,
            score: count * (1 + usize::from(consistent)),
        })
        .collect();
    scores.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.delimiter.priority().cmp(&b.delimiter.priority()))
    });
    scores
}

/// Best unused candidate. A whitespace run is the fallback and only wins
/// when no punctuation separator is left.
fn choose(scores: &[DelimiterScore], used: &[Delimiter]) -> Option<DelimiterScore> {
    let mut unused = scores.iter().filter(|s| !used.contains(&s.delimiter));
    let best = unused.clone().find(|s| s.delimiter != Delimiter::Whitespace);
    best.or_else(|| unused.next()).copied()
}

/// Chooses separators and splits lines into classifiable segments
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimiterScorer;

impl DelimiterScorer {
    pub fn new() -> Self {
        Self
    }

    /// Separator used for the top-level split of the atom sequence
    pub fn primary(&self, atoms: &[Atom<'_>]) -> Option<Delimiter> {
        choose(&score_delimiters(atoms), &[]).map(|s| s.delimiter)
    }

    /// Split one line into segments.
    ///
    /// `base` is the byte offset of `line` in the full input. A whitespace
    /// split is only applied to a piece the classifier cannot read whole.
    pub fn split_segments<'a>(
        &self,
        line: &'a str,
        base: usize,
        classifier: &SegmentClassifier,
    ) -> Vec<Segment<'a>> {
        let atoms = tokenize(line);
        let mut out = Vec::new();
        self.split_recursive(line, base, &atoms, &SmallVec::new(), classifier, &mut out);
        out
    }

    fn split_recursive<'a>(
        &self,
        line: &'a str,
        base: usize,
        atoms: &[Atom<'a>],
        used: &SmallVec<[Delimiter; 4]>,
        classifier: &SegmentClassifier,
        out: &mut Vec<Segment<'a>>,
    ) {
        let atoms = trim_delimiters(atoms);
        let (Some(first), Some(last)) = (atoms.first(), atoms.last()) else {
            return;
        };
        let piece = Segment {
            text: &line[first.start..last.end()],
            offset: base + first.start,
            loose: false,
        };

        let Some(best) = choose(&score_delimiters(atoms), used) else {
            out.push(piece);
            return;
        };
        if best.delimiter == Delimiter::Whitespace
            && !classifier.classify(piece.text).label.is_unknown()
        {
            out.push(piece);
            return;
        }

        log::trace!(
            "Splitting '{}' on {:?} (score {})",
            piece.text,
            best.delimiter,
            best.score
        );
        let mut next_used = used.clone();
        next_used.push(best.delimiter);

        let first_piece = out.len();
        let mut start = 0;
        for i in 0..atoms.len() {
            if atoms[i].delimiter() == Some(best.delimiter) && is_separator(atoms, i) {
                self.split_recursive(line, base, &atoms[start..i], &next_used, classifier, out);
                start = i + 1;
            }
        }
        self.split_recursive(line, base, &atoms[start..], &next_used, classifier, out);

        if best.delimiter == Delimiter::Whitespace && out.len() - first_piece > 1 {
            if let Some(tail) = out.last_mut() {
                tail.loose = !tail.text.chars().any(|c| c.is_ascii_digit());
            }
        }
    }
}
