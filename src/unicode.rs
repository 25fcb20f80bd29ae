//! XML 1.0 character classes
//!
//! Predicates for the character classes the tokenizer dispatches on:
//! - Name start / name characters (full Unicode ranges)
//! - Public identifier characters
//! - The `Char` production (legal document characters)
//! - Whitespace

/// Check if a character is XML whitespace (space, tab, newline, carriage return)
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Check if a character can start an XML name
///
/// NameStartChar ::= ":" | [A-Z] | "_" | [a-z] | [#xC0-#xD6] | [#xD8-#xF6]
///   | [#xF8-#x2FF] | [#x370-#x37D] | [#x37F-#x1FFF] | [#x200C-#x200D]
///   | [#x2070-#x218F] | [#x2C00-#x2FEF] | [#x3001-#xD7FF]
///   | [#xF900-#xFDCF] | [#xFDF0-#xFFFD] | [#x10000-#xEFFFF]
#[inline]
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | '_'
        | 'A'..='Z'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

/// Check if a character can continue an XML name
///
/// NameChar ::= NameStartChar | "-" | "." | [0-9] | #xB7
///   | [#x300-#x36F] | [#x203F-#x2040]
#[inline]
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.'
            | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}'
        )
}

/// Check if a character may appear in a DOCTYPE public identifier
///
/// PubidChar ::= #x20 | #xD | #xA | [a-zA-Z0-9] | [-'()+,./:=?;!*#@$_%]
#[inline]
pub fn is_pubid_char(c: char) -> bool {
    matches!(c,
        ' ' | '\r' | '\n'
        | 'A'..='Z'
        | 'a'..='z'
        | '0'..='9'
        | '-' | '\'' | '(' | ')' | '+' | ',' | '.' | '/' | ':'
        | '=' | '?' | ';' | '!' | '*' | '#' | '@' | '$' | '_' | '%'
    )
}

/// Check if a character is a legal XML 1.0 `Char`
///
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Check if a numeric character reference resolves to a legal XML `Char`
#[inline]
pub fn is_valid_char_ref(code_point: u32) -> bool {
    char::from_u32(code_point).is_some_and(is_xml_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_start_char() {
        assert!(is_name_start_char('a'));
        assert!(is_name_start_char('Z'));
        assert!(is_name_start_char('_'));
        assert!(is_name_start_char(':'));
        assert!(is_name_start_char('\u{E9}')); // é
        assert!(is_name_start_char('\u{4E2D}')); // 中
        assert!(!is_name_start_char('-'));
        assert!(!is_name_start_char('3'));
        assert!(!is_name_start_char(' '));
        assert!(!is_name_start_char('\u{B7}'));
    }

    #[test]
    fn test_name_char() {
        assert!(is_name_char('a'));
        assert!(is_name_char('-'));
        assert!(is_name_char('.'));
        assert!(is_name_char('7'));
        assert!(is_name_char('\u{B7}'));
        assert!(!is_name_char(' '));
        assert!(!is_name_char('>'));
        assert!(!is_name_char('='));
    }

    #[test]
    fn test_pubid_char() {
        assert!(is_pubid_char(' '));
        assert!(is_pubid_char('-'));
        assert!(is_pubid_char('/'));
        assert!(is_pubid_char('W'));
        assert!(!is_pubid_char('"'));
        assert!(!is_pubid_char('^'));
        assert!(!is_pubid_char('\t'));
    }

    #[test]
    fn test_xml_char() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('\n'));
        assert!(is_xml_char('a'));
        assert!(is_xml_char('\u{10000}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{B}'));
        assert!(!is_xml_char('\u{FFFE}'));
        assert!(!is_xml_char('\u{FFFF}'));
    }

    #[test]
    fn test_char_ref() {
        assert!(is_valid_char_ref(0x41));
        assert!(is_valid_char_ref(0x10FFFF));
        assert!(!is_valid_char_ref(0xFFFE));
        assert!(!is_valid_char_ref(0xD800)); // surrogate
        assert!(!is_valid_char_ref(0x110000)); // beyond Unicode
        assert!(!is_valid_char_ref(0x0));
    }
}
