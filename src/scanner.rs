//! Character source
//!
//! A buffered, rewindable cursor over already-decoded text. The
//! tokenizer consumes characters one at a time through `current` and
//! `advance`, peeks keyword literals with `continues_with`, and may
//! step back a few characters where a state unreads lookahead.
//!
//! Bulk skips over content that needs no per-character validation
//! (CDATA and processing-instruction tails) go through
//! `advance_until`, which uses memchr for the delimiter search.

use memchr::memchr;

use crate::unicode::is_whitespace;

/// Cursor over decoded input text.
///
/// The position is a byte offset into the underlying `str` and is
/// always kept on a character boundary.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at the start of `input`
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Byte offset of the cursor
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if the cursor is past the last character
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The character under the cursor, or `None` at end of input
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Remaining text from the cursor to the end of input
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Move the cursor forward by `n` characters, clamping at the end
    #[inline]
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            match self.current() {
                Some(c) => self.pos += c.len_utf8(),
                None => break,
            }
        }
    }

    /// Move the cursor backward by `n` characters, clamping at the start
    pub fn back(&mut self, n: usize) {
        for _ in 0..n {
            match self.input[..self.pos].char_indices().next_back() {
                Some((i, _)) => self.pos = i,
                None => break,
            }
        }
    }

    /// Advance one character and return the character now under the cursor
    #[inline]
    pub fn get_next(&mut self) -> Option<char> {
        self.advance(1);
        self.current()
    }

    /// Check if the upcoming characters match `literal`, cursor unmoved
    #[inline]
    pub fn continues_with(&self, literal: &str) -> bool {
        self.rest().as_bytes().starts_with(literal.as_bytes())
    }

    /// Case-insensitive `continues_with` for ASCII keyword literals
    #[inline]
    pub fn continues_with_ignore_ascii_case(&self, literal: &str) -> bool {
        debug_assert!(literal.is_ascii());
        self.rest()
            .as_bytes()
            .get(..literal.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(literal.as_bytes()))
    }

    /// Skip XML whitespace (space, tab, newline, carriage return)
    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            if !is_whitespace(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Advance to the next occurrence of an ASCII delimiter and
    /// return the text skipped over.
    ///
    /// The cursor stops on the delimiter itself, or at end of input
    /// when the delimiter does not occur (check `is_eof` after).
    pub fn advance_until(&mut self, delimiter: char) -> &'a str {
        debug_assert!(delimiter.is_ascii());
        let rest = self.rest();
        match memchr(delimiter as u8, rest.as_bytes()) {
            Some(i) => {
                self.pos += i;
                &rest[..i]
            }
            None => {
                self.pos = self.input.len();
                rest
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_and_advance() {
        let mut scanner = Scanner::new("<a>");
        assert_eq!(scanner.current(), Some('<'));
        scanner.advance(1);
        assert_eq!(scanner.current(), Some('a'));
        scanner.advance(2);
        assert_eq!(scanner.current(), None);
        assert!(scanner.is_eof());
        // advancing past the end is a no-op
        scanner.advance(1);
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_back() {
        let mut scanner = Scanner::new("abc");
        scanner.advance(3);
        scanner.back(2);
        assert_eq!(scanner.current(), Some('b'));
        scanner.back(5);
        assert_eq!(scanner.current(), Some('a'));
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_multibyte_stepping() {
        let mut scanner = Scanner::new("aé中\u{1F600}b");
        scanner.advance(3);
        assert_eq!(scanner.current(), Some('\u{1F600}'));
        scanner.advance(1);
        assert_eq!(scanner.current(), Some('b'));
        scanner.back(2);
        assert_eq!(scanner.current(), Some('中'));
    }

    #[test]
    fn test_get_next() {
        let mut scanner = Scanner::new("xy");
        assert_eq!(scanner.get_next(), Some('y'));
        assert_eq!(scanner.get_next(), None);
    }

    #[test]
    fn test_continues_with() {
        let mut scanner = Scanner::new("<![CDATA[x]]>");
        assert!(scanner.continues_with("<!["));
        assert!(!scanner.continues_with("<!-"));
        scanner.advance(2);
        assert!(scanner.continues_with("[CDATA["));
        // the cursor does not move on a match
        assert_eq!(scanner.current(), Some('['));
    }

    #[test]
    fn test_continues_with_ignore_ascii_case() {
        let scanner = Scanner::new("DocType html");
        assert!(scanner.continues_with_ignore_ascii_case("DOCTYPE"));
        assert!(!scanner.continues_with_ignore_ascii_case("PUBLIC"));
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new("  \t\r\n x");
        scanner.skip_whitespace();
        assert_eq!(scanner.current(), Some('x'));
    }

    #[test]
    fn test_advance_until() {
        let mut scanner = Scanner::new("hello ]]> tail");
        assert_eq!(scanner.advance_until(']'), "hello ");
        assert_eq!(scanner.current(), Some(']'));
        assert!(scanner.continues_with("]]>"));
    }

    #[test]
    fn test_advance_until_missing_delimiter() {
        let mut scanner = Scanner::new("no delimiter here");
        assert_eq!(scanner.advance_until('?'), "no delimiter here");
        assert!(scanner.is_eof());
    }
}
