//! xmltok - streaming XML 1.0 tokenizer
//!
//! A pull-based lexical analyzer that converts decoded text into a
//! stream of structural tokens per the W3C XML 1.0 production rules:
//! - Character data, CDATA sections, comments
//! - Start/end/self-closing tags with attributes
//! - Processing instructions and the XML declaration
//! - DOCTYPE declarations (external identifiers; internal subsets
//!   are skipped)
//! - Numeric and named entity resolution against a host-provided
//!   table
//!
//! The tokenizer is strict: every well-formedness violation aborts
//! the stream with a distinct [`XmlError`] kind. It is also
//! deterministic - identical input and entity table yield an
//! identical token sequence.
//!
//! # Examples
//!
//! ```
//! use xmltok::{tokenize, Token};
//!
//! let tokens = tokenize("<greeting lang=\"en\">hi</greeting>")?;
//!
//! assert_eq!(tokens[0].tag_name(), Some("greeting"));
//! assert_eq!(tokens[0].attribute_value("lang"), Some("en"));
//! assert_eq!(tokens[1], Token::Character('h'));
//! assert_eq!(tokens[2], Token::Character('i'));
//! assert_eq!(tokens[3], Token::CloseTag { name: "greeting".into() });
//! # Ok::<(), xmltok::XmlError>(())
//! ```
//!
//! Streaming use goes through [`Tokenizer`] directly, one token per
//! [`next_token`](Tokenizer::next_token) call:
//!
//! ```
//! use xmltok::{EntityTable, Token, Tokenizer};
//!
//! let mut table = EntityTable::predefined();
//! table.insert("copy", "\u{A9}");
//!
//! let mut tokenizer = Tokenizer::new("&copy;", &table);
//! assert_eq!(tokenizer.next_token()?, Token::Character('\u{A9}'));
//! assert_eq!(tokenizer.next_token()?, Token::EndOfFile);
//! # Ok::<(), xmltok::XmlError>(())
//! ```

pub mod entities;
pub mod error;
pub mod scanner;
pub mod token;
pub mod tokenizer;
pub mod unicode;

pub use entities::EntityTable;
pub use error::XmlError;
pub use scanner::Scanner;
pub use token::{Attribute, Standalone, Token};
pub use tokenizer::Tokenizer;

/// Tokenize a complete document with the predefined entity table.
///
/// Collects every token up to (not including) the terminal
/// [`Token::EndOfFile`], or fails with the first well-formedness
/// error.
pub fn tokenize(input: &str) -> Result<Vec<Token>, XmlError> {
    let table = EntityTable::predefined();
    let mut tokenizer = Tokenizer::new(input, &table);
    let mut tokens = Vec::new();
    loop {
        match tokenizer.next_token()? {
            Token::EndOfFile => return Ok(tokens),
            token => tokens.push(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_collects_until_end_of_file() {
        let tokens = tokenize("<a><b/></a>").unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| !t.is_end_of_file()));
    }

    #[test]
    fn test_tokenize_propagates_errors() {
        assert!(tokenize("<a b=\"1\" b=\"2\">").is_err());
    }
}
