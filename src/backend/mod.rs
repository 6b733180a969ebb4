//! The transliteration capability the session consumes.
//!
//! A backend takes one whitespace-free word and returns ranked suggestions,
//! most likely first. Transport failures and unparsable answers are both
//! errors; the session treats them the same way.

pub mod http;
pub mod table;

pub use self::http::HttpTransliterator;
pub use self::table::TableTransliterator;

use crate::error::Result;

pub trait Transliterator: Send {
    fn transliterate(&self, word: &str) -> Result<Vec<String>>;
}
