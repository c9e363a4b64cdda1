//! Reading time estimation

use std::fmt;

use super::RenderedBlock;
use crate::helpers::html_to_text;

/// Fixed reading rate
pub const WORDS_PER_MINUTE: usize = 200;

/// Approximate minutes needed to read a post, displayed as `"<n> min"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadingTime {
    minutes: usize,
}

impl ReadingTime {
    /// Reading time of `words` words, rounded up to whole minutes
    pub fn from_word_count(words: usize) -> Self {
        Self {
            minutes: words.div_ceil(WORDS_PER_MINUTE),
        }
    }

    /// Estimate over every heading and rendered body, in order
    pub fn estimate(blocks: &[RenderedBlock]) -> Self {
        let words: usize = blocks.iter().map(|b| count_words(&block_text(b))).sum();
        Self::from_word_count(words)
    }

    pub fn minutes(&self) -> usize {
        self.minutes
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes)
    }
}

/// Number of whitespace separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Heading immediately followed by the body text, with no separator
///
/// The heading runs into the first body word, so it never adds a word of
/// its own when the body is not empty.
fn block_text(block: &RenderedBlock) -> String {
    let body = html_to_text(&block.body);
    format!("{}{}", block.heading, body.trim_start())
}
