// File: src/backend/table.rs
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::backend::Transliterator;
use crate::error::{Error, Result};

/// A fixed word → suggestions table.
///
/// Lets the front-ends run without a server and gives tests a backend whose
/// answers (and failures) are known up front. Unknown words get an empty
/// list.
#[derive(Debug, Clone, Default)]
pub struct TableTransliterator {
    entries: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
}

impl TableTransliterator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry<I, S>(mut self, word: impl Into<String>, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(word.into(), suggestions.into_iter().map(Into::into).collect());
        self
    }

    /// Makes calls for `word` fail as if the backend were down.
    pub fn failing_on(mut self, word: impl Into<String>) -> Self {
        self.failing.insert(word.into());
        self
    }

    /// Reads a JSON object mapping words to suggestion arrays.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let entries: HashMap<String, Vec<String>> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self {
            entries,
            failing: HashSet::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Transliterator for TableTransliterator {
    fn transliterate(&self, word: &str) -> Result<Vec<String>> {
        if self.failing.contains(word) {
            return Err(Error::backend(format!("no route to backend for {word:?}")));
        }
        Ok(self.entries.get(word).cloned().unwrap_or_default())
    }
}
