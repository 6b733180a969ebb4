// File: src/core/registry.rs
use std::collections::HashMap;

/// Remembers which typed (source-script) word produced each transliterated
/// word, so a later click on the transliteration can ask for suggestions of
/// what the user originally typed.
///
/// Keys are overwritten on collision and entries are never removed except by
/// [`clear`](Self::clear) at session end. It does not track the buffer.
#[derive(Debug, Clone, Default)]
pub struct OriginalFormRegistry {
    originals: HashMap<String, String>,
}

impl OriginalFormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `transliterated` came from `original`. Last write wins.
    pub fn record(&mut self, transliterated: impl Into<String>, original: impl Into<String>) {
        let transliterated = transliterated.into();
        let original = original.into();
        tracing::trace!(%transliterated, %original, "registry record");
        self.originals.insert(transliterated, original);
    }

    pub fn original_of(&self, transliterated: &str) -> Option<&str> {
        self.originals.get(transliterated).map(String::as_str)
    }

    /// Copies the original form registered for `from` to `to`.
    /// Returns false (and changes nothing) when `from` is unknown.
    pub fn propagate(&mut self, from: &str, to: &str) -> bool {
        match self.originals.get(from).cloned() {
            Some(original) => {
                self.record(to, original);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub fn clear(&mut self) {
        self.originals.clear();
    }
}
