//! Well-formedness errors
//!
//! Every way the tokenizer can reject its input, one variant per
//! error kind. All errors are fatal to the current tokenization:
//! they surface to the caller and abort the stream. Recovery, if
//! any, is the consuming parser's responsibility.

use thiserror::Error;

/// A well-formedness violation detected while tokenizing.
///
/// After `next_token` returns an error the tokenizer is in an
/// unspecified state and must not be reused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// Input ended inside a token.
    #[error("unexpected end of input")]
    Eof,

    /// The character after `<` cannot begin any markup.
    #[error("invalid start tag")]
    InvalidStartTag,

    /// Malformed `</name>` end tag.
    #[error("invalid end tag")]
    InvalidEndTag,

    /// Illegal character inside or directly after a name.
    #[error("invalid name")]
    InvalidName,

    /// Malformed attribute syntax.
    #[error("invalid attribute")]
    InvalidAttribute,

    /// The same attribute name appeared twice on one tag.
    #[error("duplicate attribute `{attribute}`")]
    UniqueAttribute { attribute: String },

    /// A literal `<` inside a quoted attribute value.
    #[error("`<` is not allowed in an attribute value")]
    LtInAttributeValue,

    /// The sequence `]]>` appeared in character data.
    #[error("`]]>` is not allowed in character data")]
    InvalidCharData,

    /// `<!` was not followed by a comment, CDATA section or DOCTYPE.
    #[error("undefined markup declaration")]
    UndefinedMarkupDeclaration,

    /// Malformed or unterminated comment, or an illegal character in one.
    #[error("invalid comment")]
    InvalidComment,

    /// Malformed processing instruction, or a PI target of `xml`.
    #[error("invalid processing instruction")]
    InvalidPI,

    /// Malformed `<?xml ...?>` declaration.
    #[error("invalid XML declaration")]
    XmlDeclarationInvalid,

    /// Malformed DOCTYPE declaration.
    #[error("invalid DOCTYPE declaration")]
    DoctypeInvalid,

    /// Illegal character in a DOCTYPE public identifier.
    #[error("invalid character in public identifier")]
    InvalidPubId,

    /// An entity or character reference was not closed with `;`.
    #[error("character reference not terminated")]
    CharacterReferenceNotTerminated,

    /// A numeric character reference names an illegal code point.
    #[error("character reference `&#{reference};` is not a valid XML character")]
    CharacterReferenceInvalidNumber { reference: String },

    /// A named entity reference is absent from the entity table.
    #[error("unknown entity `&{name};`")]
    CharacterReferenceInvalidCode { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(XmlError::Eof.to_string(), "unexpected end of input");
        assert_eq!(
            XmlError::UniqueAttribute {
                attribute: "id".to_string()
            }
            .to_string(),
            "duplicate attribute `id`"
        );
        assert_eq!(
            XmlError::CharacterReferenceInvalidCode {
                name: "nbsp".to_string()
            }
            .to_string(),
            "unknown entity `&nbsp;`"
        );
    }
}
