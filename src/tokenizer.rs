//! XML tokenizer - state machine for token extraction
//!
//! Implements a pull-style tokenizer over a character source. Each
//! call to `next_token` drives the state machine until one complete
//! token has been assembled:
//! - Start/end/self-closing tags with attributes
//! - Character data
//! - CDATA sections
//! - Comments
//! - Processing instructions and the XML declaration
//! - DOCTYPE declarations (external identifiers; the internal
//!   subset is skipped, not parsed)
//!
//! Entity references are resolved as they are encountered, both in
//! character data and inside attribute values. All well-formedness
//! violations abort the stream with a typed [`XmlError`].

use std::collections::VecDeque;
use std::mem;

use crate::entities::{self, EntityRef, EntityTable};
use crate::error::XmlError;
use crate::scanner::Scanner;
use crate::token::{Attribute, Standalone, Token};
use crate::unicode::{
    is_name_char, is_name_start_char, is_pubid_char, is_whitespace, is_xml_char,
};

/// Current state of the machine.
///
/// The initial state is `Data`; every emitted token returns the
/// machine to `Data`. Missing transitions are compile-time errors by
/// virtue of the exhaustive dispatch in `next_token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Character data between constructs
    Data,
    /// A `]` was seen in character data; decide between a plain
    /// character and a stray `]]>`
    CheckCharacter,
    /// After `<`
    TagOpen,
    /// After `<!`
    MarkupDeclaration,
    /// Inside `<!--...-->`
    Comment,
    /// Inside `<![CDATA[...]]>`
    CData,
    /// Reading a start-tag name
    TagName,
    /// Between attributes, before a name
    AttributeBeforeName,
    /// Reading an attribute name
    AttributeName,
    /// After `=`, before the opening quote
    AttributeBeforeValue,
    /// Inside a quoted attribute value
    AttributeValue,
    /// After the closing quote of an attribute value
    AttributeAfterValue,
    /// After `</`
    TagEnd,
    /// After the `/` of a self-closing tag
    TagSelfClosing,
    /// After `<?xml`, deciding declaration vs. processing instruction
    DeclarationStart,
    /// Scanning the optional encoding/standalone pseudo-attributes
    DeclarationPseudoAttributes,
    /// Reading a processing-instruction target
    ProcessingStart,
    /// Reading processing-instruction content up to `?>`
    ProcessingContent,
    /// Inside `<!DOCTYPE ...>`
    Doctype,
}

/// Pull-based XML tokenizer.
///
/// Bound to one input and one read-only entity table for its
/// lifetime. `next_token` returns exactly one token per call; the
/// terminal [`Token::EndOfFile`] is sticky. After an error the
/// tokenizer is in an unspecified state and must not be reused.
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    entities: &'a EntityTable,
    state: State,
    /// Scan buffer, reused across tokens
    buf: String,
    /// Replacement characters from a top-level entity reference that
    /// have not been handed out yet
    pending: VecDeque<char>,
    /// Set once any token has been emitted; gates the XML declaration
    started: bool,
    done: bool,
    failed: bool,
    // builder for the tag in flight
    tag_name: String,
    attributes: Vec<Attribute>,
    quote: char,
    pi_target: String,
    decl_version: Option<String>,
    decl_encoding: Option<String>,
    decl_standalone: Standalone,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `input`, resolving named entities
    /// against `entities`
    pub fn new(input: &'a str, entities: &'a EntityTable) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            entities,
            state: State::Data,
            buf: String::new(),
            pending: VecDeque::new(),
            started: false,
            done: false,
            failed: false,
            tag_name: String::new(),
            attributes: Vec::new(),
            quote: '"',
            pi_target: String::new(),
            decl_version: None,
            decl_encoding: None,
            decl_standalone: Standalone::Unspecified,
        }
    }

    /// Byte offset of the scanner cursor, for diagnostics
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Assemble and return the next token.
    ///
    /// Once `EndOfFile` has been returned, every further call
    /// returns `EndOfFile` again.
    pub fn next_token(&mut self) -> Result<Token, XmlError> {
        if let Some(c) = self.pending.pop_front() {
            return Ok(Token::Character(c));
        }
        if self.done {
            return Ok(Token::EndOfFile);
        }
        loop {
            let step = match self.state {
                State::Data => self.step_data(),
                State::CheckCharacter => self.step_check_character(),
                State::TagOpen => self.step_tag_open(),
                State::MarkupDeclaration => self.step_markup_declaration(),
                State::Comment => self.step_comment(),
                State::CData => self.step_cdata(),
                State::TagName => self.step_tag_name(),
                State::AttributeBeforeName => self.step_attribute_before_name(),
                State::AttributeName => self.step_attribute_name(),
                State::AttributeBeforeValue => self.step_attribute_before_value(),
                State::AttributeValue => self.step_attribute_value(),
                State::AttributeAfterValue => self.step_attribute_after_value(),
                State::TagEnd => self.step_tag_end(),
                State::TagSelfClosing => self.step_tag_self_closing(),
                State::DeclarationStart => self.step_declaration_start(),
                State::DeclarationPseudoAttributes => self.step_declaration_pseudo_attributes(),
                State::ProcessingStart => self.step_processing_start(),
                State::ProcessingContent => self.step_processing_content(),
                State::Doctype => self.step_doctype(),
            };
            match step {
                Ok(Some(token)) => return Ok(self.emit(token)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Err(e);
                }
            }
        }
    }

    fn transition(&mut self, next: State) {
        log::trace!(
            target: "xmltok",
            "state {:?} -> {:?} @ {}",
            self.state,
            next,
            self.scanner.position()
        );
        self.state = next;
    }

    fn emit(&mut self, token: Token) -> Token {
        log::trace!(target: "xmltok", "emit {token:?}");
        self.started = true;
        if token.is_end_of_file() {
            self.done = true;
        }
        self.state = State::Data;
        token
    }

    // --- Top level ---

    fn step_data(&mut self) -> Result<Option<Token>, XmlError> {
        match self.scanner.current() {
            None => Ok(Some(Token::EndOfFile)),
            Some('&') => {
                self.scanner.advance(1);
                let reference = self.read_reference()?;
                let replacement = entities::resolve(&reference, self.entities)?;
                self.pending.extend(replacement.chars());
                match self.pending.pop_front() {
                    Some(c) => Ok(Some(Token::Character(c))),
                    None => Ok(None),
                }
            }
            Some('<') => {
                self.scanner.advance(1);
                self.transition(State::TagOpen);
                Ok(None)
            }
            Some(']') => {
                self.transition(State::CheckCharacter);
                Ok(None)
            }
            Some(c) => {
                self.scanner.advance(1);
                Ok(Some(Token::Character(c)))
            }
        }
    }

    fn step_check_character(&mut self) -> Result<Option<Token>, XmlError> {
        if self.scanner.continues_with("]]>") {
            return Err(XmlError::InvalidCharData);
        }
        self.scanner.advance(1);
        Ok(Some(Token::Character(']')))
    }

    // --- Tag open and markup dispatch ---

    fn step_tag_open(&mut self) -> Result<Option<Token>, XmlError> {
        match self.scanner.current() {
            Some('!') => {
                self.scanner.advance(1);
                self.transition(State::MarkupDeclaration);
                Ok(None)
            }
            Some('?') => {
                self.scanner.advance(1);
                // `<?xml` opens the declaration only while no token
                // has been emitted; everywhere else the reserved
                // target is caught by the PI states.
                if !self.started && self.scanner.continues_with("xml") {
                    self.scanner.advance(3);
                    self.transition(State::DeclarationStart);
                } else {
                    self.transition(State::ProcessingStart);
                }
                Ok(None)
            }
            Some('/') => {
                self.scanner.advance(1);
                self.transition(State::TagEnd);
                Ok(None)
            }
            Some(c) if is_name_start_char(c) => {
                self.buf.clear();
                self.buf.push(c);
                self.scanner.advance(1);
                self.attributes.clear();
                self.transition(State::TagName);
                Ok(None)
            }
            None => Err(XmlError::Eof),
            Some(_) => Err(XmlError::InvalidStartTag),
        }
    }

    fn step_markup_declaration(&mut self) -> Result<Option<Token>, XmlError> {
        if self.scanner.continues_with("--") {
            self.scanner.advance(2);
            self.buf.clear();
            self.transition(State::Comment);
            Ok(None)
        } else if self.scanner.continues_with_ignore_ascii_case("DOCTYPE") {
            self.scanner.advance(7);
            self.transition(State::Doctype);
            Ok(None)
        } else if self.scanner.continues_with("[CDATA[") {
            self.scanner.advance(7);
            self.buf.clear();
            self.transition(State::CData);
            Ok(None)
        } else {
            Err(XmlError::UndefinedMarkupDeclaration)
        }
    }

    // --- Comments and CDATA ---

    fn step_comment(&mut self) -> Result<Option<Token>, XmlError> {
        loop {
            match self.scanner.current() {
                None => return Err(XmlError::InvalidComment),
                // `--` terminates only when followed by `>`
                Some('-') if self.scanner.continues_with("-->") => {
                    self.scanner.advance(3);
                    return Ok(Some(Token::Comment(mem::take(&mut self.buf))));
                }
                Some(c) => {
                    if !is_xml_char(c) {
                        return Err(XmlError::InvalidComment);
                    }
                    self.buf.push(c);
                    self.scanner.advance(1);
                }
            }
        }
    }

    fn step_cdata(&mut self) -> Result<Option<Token>, XmlError> {
        loop {
            let chunk = self.scanner.advance_until(']');
            self.buf.push_str(chunk);
            if self.scanner.is_eof() {
                return Err(XmlError::Eof);
            }
            if self.scanner.continues_with("]]>") {
                self.scanner.advance(3);
                return Ok(Some(Token::CData(mem::take(&mut self.buf))));
            }
            self.buf.push(']');
            self.scanner.advance(1);
        }
    }

    // --- Start tags and attributes ---

    fn step_tag_name(&mut self) -> Result<Option<Token>, XmlError> {
        while let Some(c) = self.scanner.current() {
            if !is_name_char(c) {
                break;
            }
            self.buf.push(c);
            self.scanner.advance(1);
        }
        self.tag_name = mem::take(&mut self.buf);
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some('>') => {
                self.scanner.advance(1);
                Ok(Some(self.finish_open_tag(false)))
            }
            Some('/') => {
                self.scanner.advance(1);
                self.transition(State::TagSelfClosing);
                Ok(None)
            }
            Some(c) if is_whitespace(c) => {
                self.scanner.advance(1);
                self.transition(State::AttributeBeforeName);
                Ok(None)
            }
            Some(_) => Err(XmlError::InvalidName),
        }
    }

    fn step_attribute_before_name(&mut self) -> Result<Option<Token>, XmlError> {
        self.scanner.skip_whitespace();
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some('/') => {
                self.scanner.advance(1);
                self.transition(State::TagSelfClosing);
                Ok(None)
            }
            Some('>') => {
                self.scanner.advance(1);
                Ok(Some(self.finish_open_tag(false)))
            }
            Some(c) if is_name_start_char(c) => {
                self.buf.clear();
                self.buf.push(c);
                self.scanner.advance(1);
                self.transition(State::AttributeName);
                Ok(None)
            }
            Some(_) => Err(XmlError::InvalidAttribute),
        }
    }

    fn step_attribute_name(&mut self) -> Result<Option<Token>, XmlError> {
        while let Some(c) = self.scanner.current() {
            if !is_name_char(c) {
                break;
            }
            self.buf.push(c);
            self.scanner.advance(1);
        }
        let name = mem::take(&mut self.buf);
        if self.attributes.iter().any(|a| a.name == name) {
            return Err(XmlError::UniqueAttribute { attribute: name });
        }
        self.attributes.push(Attribute::new(name, String::new()));
        self.scanner.skip_whitespace();
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some('=') => {
                self.scanner.advance(1);
                self.transition(State::AttributeBeforeValue);
                Ok(None)
            }
            Some(_) => Err(XmlError::InvalidAttribute),
        }
    }

    fn step_attribute_before_value(&mut self) -> Result<Option<Token>, XmlError> {
        self.scanner.skip_whitespace();
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some(q @ ('"' | '\'')) => {
                self.quote = q;
                self.scanner.advance(1);
                self.buf.clear();
                self.transition(State::AttributeValue);
                Ok(None)
            }
            Some(_) => Err(XmlError::InvalidAttribute),
        }
    }

    fn step_attribute_value(&mut self) -> Result<Option<Token>, XmlError> {
        loop {
            match self.scanner.current() {
                None => return Err(XmlError::Eof),
                Some(c) if c == self.quote => {
                    self.scanner.advance(1);
                    let value = mem::take(&mut self.buf);
                    if let Some(attribute) = self.attributes.last_mut() {
                        attribute.value = value;
                    }
                    self.transition(State::AttributeAfterValue);
                    return Ok(None);
                }
                Some('&') => {
                    self.scanner.advance(1);
                    let reference = self.read_reference()?;
                    let replacement = entities::resolve(&reference, self.entities)?;
                    self.buf.push_str(&replacement);
                }
                Some('<') => return Err(XmlError::LtInAttributeValue),
                Some(c) => {
                    self.buf.push(c);
                    self.scanner.advance(1);
                }
            }
        }
    }

    fn step_attribute_after_value(&mut self) -> Result<Option<Token>, XmlError> {
        match self.scanner.current() {
            Some(c) if is_whitespace(c) => {
                self.scanner.advance(1);
                self.transition(State::AttributeBeforeName);
                Ok(None)
            }
            Some('/') => {
                self.scanner.advance(1);
                self.transition(State::TagSelfClosing);
                Ok(None)
            }
            Some('>') => {
                self.scanner.advance(1);
                Ok(Some(self.finish_open_tag(false)))
            }
            _ => Err(XmlError::InvalidAttribute),
        }
    }

    fn finish_open_tag(&mut self, self_closing: bool) -> Token {
        Token::OpenTag {
            name: mem::take(&mut self.tag_name),
            attributes: mem::take(&mut self.attributes),
            self_closing,
        }
    }

    // --- End tags and self-closing ---

    fn step_tag_end(&mut self) -> Result<Option<Token>, XmlError> {
        match self.scanner.current() {
            None => return Err(XmlError::Eof),
            Some(c) if is_name_start_char(c) => {
                self.buf.clear();
                self.buf.push(c);
                self.scanner.advance(1);
            }
            Some(_) => return Err(XmlError::InvalidEndTag),
        }
        while let Some(c) = self.scanner.current() {
            if !is_name_char(c) {
                break;
            }
            self.buf.push(c);
            self.scanner.advance(1);
        }
        self.scanner.skip_whitespace();
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some('>') => {
                self.scanner.advance(1);
                Ok(Some(Token::CloseTag {
                    name: mem::take(&mut self.buf),
                }))
            }
            Some(_) => Err(XmlError::InvalidEndTag),
        }
    }

    fn step_tag_self_closing(&mut self) -> Result<Option<Token>, XmlError> {
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some('>') => {
                self.scanner.advance(1);
                Ok(Some(self.finish_open_tag(true)))
            }
            Some(_) => Err(XmlError::InvalidName),
        }
    }

    // --- XML declaration ---

    fn step_declaration_start(&mut self) -> Result<Option<Token>, XmlError> {
        match self.scanner.current() {
            Some(c) if is_whitespace(c) => {
                self.scanner.skip_whitespace();
                if !self.scanner.continues_with("version") {
                    return Err(XmlError::XmlDeclarationInvalid);
                }
                self.scanner.advance(7);
                self.eat_pseudo_eq()?;
                self.decl_version = Some(self.read_version_value()?);
                self.transition(State::DeclarationPseudoAttributes);
                Ok(None)
            }
            _ => {
                // `<?xml` not followed by whitespace is an ordinary
                // processing instruction whose target starts with
                // `xml`; unread the literal and rescan it as one.
                self.scanner.back(3);
                self.transition(State::ProcessingStart);
                Ok(None)
            }
        }
    }

    fn step_declaration_pseudo_attributes(&mut self) -> Result<Option<Token>, XmlError> {
        let after_whitespace = match self.scanner.current() {
            Some(c) if is_whitespace(c) => {
                self.scanner.skip_whitespace();
                true
            }
            _ => false,
        };
        if self.scanner.continues_with("?>") {
            self.scanner.advance(2);
            return Ok(Some(Token::Declaration {
                version: self.decl_version.take(),
                encoding: self.decl_encoding.take(),
                standalone: mem::take(&mut self.decl_standalone),
            }));
        }
        // further pseudo-attributes require a whitespace separator
        if !after_whitespace {
            return Err(XmlError::XmlDeclarationInvalid);
        }
        if self.decl_encoding.is_none()
            && self.decl_standalone == Standalone::Unspecified
            && self.scanner.continues_with("encoding")
        {
            self.scanner.advance(8);
            self.eat_pseudo_eq()?;
            self.decl_encoding = Some(self.read_encoding_value()?);
            return Ok(None);
        }
        if self.decl_standalone == Standalone::Unspecified
            && self.scanner.continues_with("standalone")
        {
            self.scanner.advance(10);
            self.eat_pseudo_eq()?;
            self.decl_standalone = self.read_standalone_value()?;
            return Ok(None);
        }
        Err(XmlError::XmlDeclarationInvalid)
    }

    fn eat_pseudo_eq(&mut self) -> Result<(), XmlError> {
        self.scanner.skip_whitespace();
        if self.scanner.current() != Some('=') {
            return Err(XmlError::XmlDeclarationInvalid);
        }
        self.scanner.advance(1);
        self.scanner.skip_whitespace();
        Ok(())
    }

    fn open_declaration_quote(&mut self) -> Result<char, XmlError> {
        match self.scanner.current() {
            Some(q @ ('"' | '\'')) => {
                self.scanner.advance(1);
                Ok(q)
            }
            _ => Err(XmlError::XmlDeclarationInvalid),
        }
    }

    fn read_version_value(&mut self) -> Result<String, XmlError> {
        let quote = self.open_declaration_quote()?;
        self.buf.clear();
        loop {
            match self.scanner.current() {
                None => return Err(XmlError::XmlDeclarationInvalid),
                Some(c) if c == quote => {
                    self.scanner.advance(1);
                    return Ok(mem::take(&mut self.buf));
                }
                Some(c) => {
                    self.buf.push(c);
                    self.scanner.advance(1);
                }
            }
        }
    }

    fn read_encoding_value(&mut self) -> Result<String, XmlError> {
        let quote = self.open_declaration_quote()?;
        self.buf.clear();
        loop {
            match self.scanner.current() {
                None => return Err(XmlError::XmlDeclarationInvalid),
                Some(c) if c == quote => {
                    self.scanner.advance(1);
                    break;
                }
                Some(c) => {
                    let valid = if self.buf.is_empty() {
                        c.is_ascii_alphabetic()
                    } else {
                        c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
                    };
                    if !valid {
                        return Err(XmlError::XmlDeclarationInvalid);
                    }
                    self.buf.push(c);
                    self.scanner.advance(1);
                }
            }
        }
        if self.buf.is_empty() {
            return Err(XmlError::XmlDeclarationInvalid);
        }
        Ok(mem::take(&mut self.buf))
    }

    fn read_standalone_value(&mut self) -> Result<Standalone, XmlError> {
        let quote = self.open_declaration_quote()?;
        self.buf.clear();
        loop {
            match self.scanner.current() {
                None => return Err(XmlError::XmlDeclarationInvalid),
                Some(c) if c == quote => {
                    self.scanner.advance(1);
                    break;
                }
                Some(c) => {
                    self.buf.push(c);
                    self.scanner.advance(1);
                }
            }
        }
        let standalone = match self.buf.as_str() {
            "yes" => Standalone::Yes,
            "no" => Standalone::No,
            _ => return Err(XmlError::XmlDeclarationInvalid),
        };
        self.buf.clear();
        Ok(standalone)
    }

    // --- Processing instructions ---

    fn step_processing_start(&mut self) -> Result<Option<Token>, XmlError> {
        match self.scanner.current() {
            None => return Err(XmlError::Eof),
            Some(c) if is_name_start_char(c) => {
                self.buf.clear();
                self.buf.push(c);
                self.scanner.advance(1);
            }
            Some(_) => return Err(XmlError::InvalidPI),
        }
        while let Some(c) = self.scanner.current() {
            if !is_name_char(c) {
                break;
            }
            self.buf.push(c);
            self.scanner.advance(1);
        }
        let target = mem::take(&mut self.buf);
        // `xml` in any case combination is reserved for the declaration
        if target.eq_ignore_ascii_case("xml") {
            return Err(XmlError::InvalidPI);
        }
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some('?') => {
                self.scanner.advance(1);
                if self.scanner.current() == Some('>') {
                    self.scanner.advance(1);
                    Ok(Some(Token::ProcessingInstruction {
                        target,
                        content: String::new(),
                    }))
                } else {
                    Err(XmlError::InvalidPI)
                }
            }
            Some(c) if is_whitespace(c) => {
                self.scanner.advance(1);
                self.pi_target = target;
                self.transition(State::ProcessingContent);
                Ok(None)
            }
            Some(_) => Err(XmlError::InvalidPI),
        }
    }

    fn step_processing_content(&mut self) -> Result<Option<Token>, XmlError> {
        loop {
            let chunk = self.scanner.advance_until('?');
            self.buf.push_str(chunk);
            if self.scanner.is_eof() {
                return Err(XmlError::Eof);
            }
            if self.scanner.continues_with("?>") {
                self.scanner.advance(2);
                return Ok(Some(Token::ProcessingInstruction {
                    target: mem::take(&mut self.pi_target),
                    content: mem::take(&mut self.buf),
                }));
            }
            // a lone `?` is ordinary content
            self.buf.push('?');
            self.scanner.advance(1);
        }
    }

    // --- DOCTYPE ---

    fn step_doctype(&mut self) -> Result<Option<Token>, XmlError> {
        match self.scanner.current() {
            None => return Err(XmlError::Eof),
            Some(c) if is_whitespace(c) => self.scanner.skip_whitespace(),
            Some(_) => return Err(XmlError::DoctypeInvalid),
        }
        match self.scanner.current() {
            None => return Err(XmlError::Eof),
            Some(c) if is_name_start_char(c) => {
                self.buf.clear();
                self.buf.push(c);
                self.scanner.advance(1);
            }
            Some(_) => return Err(XmlError::DoctypeInvalid),
        }
        while let Some(c) = self.scanner.current() {
            if !is_name_char(c) {
                break;
            }
            self.buf.push(c);
            self.scanner.advance(1);
        }
        let name = mem::take(&mut self.buf);
        let mut public_id = None;
        let mut system_id = None;

        match self.scanner.current() {
            None => return Err(XmlError::Eof),
            Some('>') => {
                self.scanner.advance(1);
                return Ok(Some(Token::Doctype {
                    name,
                    public_id,
                    system_id,
                }));
            }
            Some(c) if is_whitespace(c) => {
                self.scanner.skip_whitespace();
                if self.scanner.continues_with_ignore_ascii_case("PUBLIC") {
                    self.scanner.advance(6);
                    self.require_doctype_whitespace()?;
                    public_id = Some(self.read_pubid_literal()?);
                    self.require_doctype_whitespace()?;
                    system_id = Some(self.read_system_literal()?);
                } else if self.scanner.continues_with_ignore_ascii_case("SYSTEM") {
                    self.scanner.advance(6);
                    self.require_doctype_whitespace()?;
                    system_id = Some(self.read_system_literal()?);
                }
            }
            Some(_) => return Err(XmlError::DoctypeInvalid),
        }

        // optional whitespace, then an optional internal subset: `[`
        // is consumed and input is discarded up to the closing `>`.
        // Declarations inside the subset are not materialized.
        self.scanner.skip_whitespace();
        if self.scanner.current() == Some('[') {
            self.scanner.advance(1);
            self.scanner.advance_until('>');
        }
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some('>') => {
                self.scanner.advance(1);
                Ok(Some(Token::Doctype {
                    name,
                    public_id,
                    system_id,
                }))
            }
            Some(_) => Err(XmlError::DoctypeInvalid),
        }
    }

    fn require_doctype_whitespace(&mut self) -> Result<(), XmlError> {
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some(c) if is_whitespace(c) => {
                self.scanner.skip_whitespace();
                Ok(())
            }
            Some(_) => Err(XmlError::DoctypeInvalid),
        }
    }

    fn open_doctype_quote(&mut self) -> Result<char, XmlError> {
        match self.scanner.current() {
            None => Err(XmlError::Eof),
            Some(q @ ('"' | '\'')) => {
                self.scanner.advance(1);
                Ok(q)
            }
            Some(_) => Err(XmlError::DoctypeInvalid),
        }
    }

    fn read_pubid_literal(&mut self) -> Result<String, XmlError> {
        let quote = self.open_doctype_quote()?;
        self.buf.clear();
        loop {
            match self.scanner.current() {
                None => return Err(XmlError::Eof),
                Some(c) if c == quote => {
                    self.scanner.advance(1);
                    return Ok(mem::take(&mut self.buf));
                }
                Some(c) if is_pubid_char(c) => {
                    self.buf.push(c);
                    self.scanner.advance(1);
                }
                Some(_) => return Err(XmlError::InvalidPubId),
            }
        }
    }

    fn read_system_literal(&mut self) -> Result<String, XmlError> {
        let quote = self.open_doctype_quote()?;
        self.buf.clear();
        loop {
            match self.scanner.current() {
                None => return Err(XmlError::Eof),
                Some(c) if c == quote => {
                    self.scanner.advance(1);
                    return Ok(mem::take(&mut self.buf));
                }
                Some(c) => {
                    self.buf.push(c);
                    self.scanner.advance(1);
                }
            }
        }
    }

    // --- Entity references ---

    /// Scan an entity or character reference after its `&`.
    ///
    /// The returned reference is consumed immediately by the calling
    /// state; entity tokens are never queued.
    fn read_reference(&mut self) -> Result<EntityRef, XmlError> {
        let mut name = String::new();
        match self.scanner.current() {
            Some('#') => {
                self.scanner.advance(1);
                let is_hex = matches!(self.scanner.current(), Some('x' | 'X'));
                if is_hex {
                    self.scanner.advance(1);
                }
                while let Some(c) = self.scanner.current() {
                    let is_digit = if is_hex {
                        c.is_ascii_hexdigit()
                    } else {
                        c.is_ascii_digit()
                    };
                    if !is_digit {
                        break;
                    }
                    name.push(c);
                    self.scanner.advance(1);
                }
                if name.is_empty() || self.scanner.current() != Some(';') {
                    return Err(XmlError::CharacterReferenceNotTerminated);
                }
                self.scanner.advance(1);
                Ok(EntityRef {
                    name,
                    is_numeric: true,
                    is_hex,
                })
            }
            Some(c) if is_name_start_char(c) => {
                name.push(c);
                self.scanner.advance(1);
                while let Some(c) = self.scanner.current() {
                    if !is_name_char(c) {
                        break;
                    }
                    name.push(c);
                    self.scanner.advance(1);
                }
                if self.scanner.current() != Some(';') {
                    return Err(XmlError::CharacterReferenceNotTerminated);
                }
                self.scanner.advance(1);
                Ok(EntityRef {
                    name,
                    is_numeric: false,
                    is_hex: false,
                })
            }
            _ => Err(XmlError::CharacterReferenceNotTerminated),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, XmlError>;

    /// Yield tokens up to (not including) `EndOfFile`; fused after
    /// an error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.failed {
            return None;
        }
        match self.next_token() {
            Ok(Token::EndOfFile) => None,
            Ok(token) => Some(Ok(token)),
            Err(e) => Some(Err(e)),
        }
    }
}
