// File: src/core/script.rs
use serde::{Deserialize, Serialize};

/// An inclusive block of code points making up the target script.
///
/// Used to tell whether a token in the buffer is already a transliteration
/// result. The check is a pure predicate over the block; combining marks,
/// virama and digits of the script are all inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRange {
    pub name: String,
    pub first: char,
    pub last: char,
}

impl ScriptRange {
    /// U+0900..=U+097F.
    pub fn devanagari() -> Self {
        Self {
            name: "Devanagari".to_string(),
            first: '\u{0900}',
            last: '\u{097F}',
        }
    }

    pub fn contains(&self, c: char) -> bool {
        (self.first..=self.last).contains(&c)
    }

    /// True iff `word` is non-empty and every character is in the block.
    pub fn is_entirely(&self, word: &str) -> bool {
        !word.is_empty() && word.chars().all(|c| self.contains(c))
    }
}

impl Default for ScriptRange {
    fn default() -> Self {
        Self::devanagari()
    }
}
