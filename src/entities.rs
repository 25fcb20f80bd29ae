//! Entity resolution
//!
//! Converts entity references into their replacement text:
//! - Numeric character references: `&#123;` and `&#x7B;`
//! - Named references looked up in a host-provided table
//!
//! The table is read-only during tokenization and may be shared
//! freely. `decode_text` additionally offers bulk decoding of a text
//! slice with a zero-copy fast path when no reference is present.

use std::borrow::Cow;
use std::collections::HashMap;

use memchr::memchr;

use crate::error::XmlError;
use crate::unicode::{is_name_char, is_name_start_char, is_valid_char_ref};

/// Named-entity table provided by the host.
///
/// The tokenizer resolves `&name;` references against this table.
/// The five predefined XML entities are available via
/// [`EntityTable::predefined`], which is also the `Default`.
#[derive(Debug, Clone)]
pub struct EntityTable {
    map: HashMap<String, String>,
}

impl EntityTable {
    /// Create an empty table
    pub fn new() -> Self {
        EntityTable {
            map: HashMap::new(),
        }
    }

    /// Create a table holding the five predefined XML entities
    /// (`amp`, `lt`, `gt`, `apos`, `quot`)
    pub fn predefined() -> Self {
        let mut table = EntityTable::new();
        table.insert("amp", "&");
        table.insert("lt", "<");
        table.insert("gt", ">");
        table.insert("apos", "'");
        table.insert("quot", "\"");
        table
    }

    /// Register an entity; replaces any previous mapping for `name`
    pub fn insert(&mut self, name: impl Into<String>, replacement: impl Into<String>) {
        self.map.insert(name.into(), replacement.into());
    }

    /// Look up the replacement text for a named entity
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }
}

impl Default for EntityTable {
    fn default() -> Self {
        EntityTable::predefined()
    }
}

/// An entity reference as scanned, before resolution.
///
/// This is the internal intermediate of attribute-value scanning and
/// character-reference resolution; it is consumed immediately and
/// never emitted to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntityRef {
    /// Entity name, or the digit text of a numeric reference
    pub name: String,
    pub is_numeric: bool,
    /// Only meaningful when `is_numeric` is set
    pub is_hex: bool,
}

/// Resolve one entity reference to its replacement text.
pub(crate) fn resolve(reference: &EntityRef, table: &EntityTable) -> Result<String, XmlError> {
    if reference.is_numeric {
        let radix = if reference.is_hex { 16 } else { 10 };
        let code_point = u32::from_str_radix(&reference.name, radix).ok();
        match code_point
            .filter(|&cp| is_valid_char_ref(cp))
            .and_then(char::from_u32)
        {
            Some(c) => Ok(c.to_string()),
            None => Err(XmlError::CharacterReferenceInvalidNumber {
                reference: numeric_reference_text(reference),
            }),
        }
    } else {
        table
            .get(&reference.name)
            .map(str::to_owned)
            .ok_or_else(|| XmlError::CharacterReferenceInvalidCode {
                name: reference.name.clone(),
            })
    }
}

fn numeric_reference_text(reference: &EntityRef) -> String {
    if reference.is_hex {
        format!("x{}", reference.name)
    } else {
        reference.name.clone()
    }
}

/// Decode every entity reference in a text slice.
///
/// Returns `Cow::Borrowed` when the input contains no `&` (zero-copy
/// fast path). Fails with the same errors the tokenizer would raise
/// for a malformed or unknown reference.
pub fn decode_text<'a>(input: &'a str, table: &EntityTable) -> Result<Cow<'a, str>, XmlError> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(input));
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        out.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];

        let semi = memchr(b';', rest.as_bytes())
            .ok_or(XmlError::CharacterReferenceNotTerminated)?;
        let body = &rest[..semi];
        out.push_str(&resolve(&parse_reference(body)?, table)?);
        rest = &rest[semi + 1..];
    }
    out.push_str(rest);
    Ok(Cow::Owned(out))
}

/// Parse the text between `&` and `;` into an entity reference.
fn parse_reference(body: &str) -> Result<EntityRef, XmlError> {
    if let Some(numeric) = body.strip_prefix('#') {
        let (digits, is_hex) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, true),
            None => (numeric, false),
        };
        let digits_valid = if is_hex {
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
        } else {
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        };
        if !digits_valid {
            return Err(XmlError::CharacterReferenceNotTerminated);
        }
        return Ok(EntityRef {
            name: digits.to_string(),
            is_numeric: true,
            is_hex,
        });
    }

    let mut chars = body.chars();
    let valid_name = match chars.next() {
        Some(first) => is_name_start_char(first) && chars.all(is_name_char),
        None => false,
    };
    if !valid_name {
        return Err(XmlError::CharacterReferenceNotTerminated);
    }
    Ok(EntityRef {
        name: body.to_string(),
        is_numeric: false,
        is_hex: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(digits: &str, is_hex: bool) -> EntityRef {
        EntityRef {
            name: digits.to_string(),
            is_numeric: true,
            is_hex,
        }
    }

    fn named(name: &str) -> EntityRef {
        EntityRef {
            name: name.to_string(),
            is_numeric: false,
            is_hex: false,
        }
    }

    #[test]
    fn test_predefined_entities() {
        let table = EntityTable::predefined();
        assert_eq!(resolve(&named("amp"), &table).unwrap(), "&");
        assert_eq!(resolve(&named("lt"), &table).unwrap(), "<");
        assert_eq!(resolve(&named("gt"), &table).unwrap(), ">");
        assert_eq!(resolve(&named("apos"), &table).unwrap(), "'");
        assert_eq!(resolve(&named("quot"), &table).unwrap(), "\"");
    }

    #[test]
    fn test_unknown_entity() {
        let table = EntityTable::predefined();
        assert_eq!(
            resolve(&named("nbsp"), &table),
            Err(XmlError::CharacterReferenceInvalidCode {
                name: "nbsp".to_string()
            })
        );
    }

    #[test]
    fn test_host_entities() {
        let mut table = EntityTable::predefined();
        table.insert("copy", "\u{A9}");
        table.insert("header", "<h1>Title</h1>");
        assert_eq!(resolve(&named("copy"), &table).unwrap(), "\u{A9}");
        assert_eq!(resolve(&named("header"), &table).unwrap(), "<h1>Title</h1>");
    }

    #[test]
    fn test_numeric_decimal() {
        let table = EntityTable::new();
        assert_eq!(resolve(&numeric("65", false), &table).unwrap(), "A");
        assert_eq!(resolve(&numeric("169", false), &table).unwrap(), "\u{A9}");
    }

    #[test]
    fn test_numeric_hex() {
        let table = EntityTable::new();
        assert_eq!(resolve(&numeric("41", true), &table).unwrap(), "A");
        assert_eq!(
            resolve(&numeric("1F600", true), &table).unwrap(),
            "\u{1F600}"
        );
    }

    #[test]
    fn test_numeric_out_of_range() {
        let table = EntityTable::new();
        for digits in ["FFFE", "FFFF", "D800", "110000"] {
            assert!(matches!(
                resolve(&numeric(digits, true), &table),
                Err(XmlError::CharacterReferenceInvalidNumber { .. })
            ));
        }
        // overflow of u32 parsing is the same error
        assert!(matches!(
            resolve(&numeric("99999999999999", false), &table),
            Err(XmlError::CharacterReferenceInvalidNumber { .. })
        ));
    }

    #[test]
    fn test_decode_text_zero_copy() {
        let table = EntityTable::predefined();
        let decoded = decode_text("plain text", &table).unwrap();
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "plain text");
    }

    #[test]
    fn test_decode_text_mixed() {
        let table = EntityTable::predefined();
        let decoded = decode_text("a &lt; b &amp; c &#x41;", &table).unwrap();
        assert_eq!(decoded, "a < b & c A");
    }

    #[test]
    fn test_decode_text_unterminated() {
        let table = EntityTable::predefined();
        assert_eq!(
            decode_text("bare & ampersand", &table),
            Err(XmlError::CharacterReferenceNotTerminated)
        );
    }
}
