use std::collections::HashMap;

use super::rule::{Rule, Token};

/// The compiled, indexed collection of all rules loaded into a context.
///
/// Append-only: loading never removes or edits existing rules, and the
/// candidate index is updated incrementally on every add so later loads
/// extend the match space of earlier ones.
#[derive(Debug, Default)]
pub struct ParserTree {
    rules: Vec<Rule>,
    /// Rules whose pattern starts with a literal, bucketed by that
    /// literal's first byte. Bucket contents are ascending load indices.
    by_first_byte: HashMap<u8, Vec<usize>>,
    /// Rules tried against every input: pattern starts with a field
    /// extractor, or is empty.
    open_starts: Vec<usize>,
}

impl ParserTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn rule(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Append a rule, assigning it the next load index.
    pub(crate) fn add(&mut self, tag: String, tokens: Vec<Token>) {
        let index = self.rules.len();
        match tokens.first() {
            Some(Token::Literal(text)) => {
                // Patterns are non-empty strings, so the first byte exists.
                let first = text.as_bytes()[0];
                self.by_first_byte.entry(first).or_default().push(index);
            }
            _ => self.open_starts.push(index),
        }
        self.rules.push(Rule { tag, tokens, index });
    }

    /// Candidate rule indices for an input line, ascending by load index.
    ///
    /// Merges the first-byte bucket with the open-start list so the caller
    /// can take the earliest-loaded full match.
    pub(crate) fn candidates(&self, input: &str) -> Vec<usize> {
        let bucket = input
            .as_bytes()
            .first()
            .and_then(|b| self.by_first_byte.get(b))
            .map_or(&[][..], Vec::as_slice);

        let mut merged = Vec::with_capacity(bucket.len() + self.open_starts.len());
        let (mut i, mut j) = (0, 0);
        while i < bucket.len() && j < self.open_starts.len() {
            if bucket[i] < self.open_starts[j] {
                merged.push(bucket[i]);
                i += 1;
            } else {
                merged.push(self.open_starts[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&bucket[i..]);
        merged.extend_from_slice(&self.open_starts[j..]);
        merged
    }
}
