//! Fast Infoset Encoder – X.891 7, 12, C
//!
//! Der Encoder ist eine Zustandsmaschine: ein Adapter (Baum, Push oder Pull)
//! ruft `open_document`, `open_element`, `emit_*`, `close_element` und
//! `close_document` in Dokumentreihenfolge auf, der Encoder schreibt die
//! Bytes in einen internen Puffer. Alternativ nimmt [`Encoder::encode_event`]
//! dieselben Schritte als [`FiEvent`]s entgegen.
//!
//! # Beispiel
//!
//! ```
//! use fastinfoset::encoder::encode;
//! use fastinfoset::event::{ElementContent, FiEvent, Name};
//! use fastinfoset::options::EncoderOptions;
//!
//! let events = vec![
//!     FiEvent::StartDocument(Default::default()),
//!     FiEvent::StartElement(ElementContent::new(Name::local("root")).with_attribute(Name::local("id"), "7")),
//!     FiEvent::Characters("hello".into()),
//!     FiEvent::EndElement,
//!     FiEvent::EndDocument,
//! ];
//! let bytes = encode(&events, &EncoderOptions::default()).unwrap();
//! assert_eq!(&bytes[..4], &[0xE0, 0x00, 0x00, 0x01]);
//! assert_eq!(bytes.last(), Some(&0xFF));
//! ```

mod pending;
mod qname;
mod scope;
mod value;

use std::sync::Arc;

use crate::algorithm::{AlgorithmRegistry, EncodingAlgorithm};
use crate::bitstream::BitWriter;
use crate::constants::{
    COMMENT, DOCUMENT_TYPE_DECLARATION, DOCUMENT_TYPE_PUBLIC_IDENTIFIER_FLAG, DOCUMENT_TYPE_SYSTEM_IDENTIFIER_FLAG,
    ELEMENT_ATTRIBUTE_FLAG, ELEMENT_NAMESPACES_FLAG, PROCESSING_INSTRUCTION, TERMINATOR, UNEXPANDED_ENTITY_PUBLIC_IDENTIFIER_FLAG,
    UNEXPANDED_ENTITY_REFERENCE, UNEXPANDED_ENTITY_SYSTEM_IDENTIFIER_FLAG, XML_NAMESPACE, XML_PREFIX, XMLNS_NAMESPACE,
    XMLNS_PREFIX,
};
use crate::error::{Error, Result};
use crate::event::{AlgorithmData, AttributeValue, DocumentProperties, FiEvent, NamespaceBinding};
use crate::header;
use crate::options::EncoderOptions;
use crate::string::{OctetSource, encode_identifying_string, encode_non_identifying_literal, is_xml_whitespace};
use crate::string_table::TableKind;
use crate::vocabulary::{SharedVocabulary, Vocabulary};
use pending::PendingTerminator;
use scope::NamespaceScope;

// ============================================================================
// State
// ============================================================================

/// Wo im Dokument der Encoder gerade steht.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Vor `open_document`.
    Idle,
    /// Auf Dokumentebene (vor, zwischen oder nach dem Wurzelelement).
    Document,
    /// Element mit angekündigten Attributen ist offen.
    Attributes { count: usize },
    /// Im Inhalt eines Elements.
    Content,
    /// Nach `close_document`.
    Closed,
    /// Ein Fehler ist aufgetreten; die Ausgabe ist unbrauchbar.
    Failed,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            Self::Idle => "no document",
            Self::Document => "document level",
            Self::Attributes { .. } => "attribute list",
            Self::Content => "element content",
            Self::Closed => "closed document",
            Self::Failed => "failed document",
        }
    }
}

// ============================================================================
// Encoder
// ============================================================================

/// Fast Infoset encoder for one document at a time.
///
/// Errors are final for the current document: the encoder refuses every
/// further call until [`reset`](Self::reset), and the buffered bytes must be
/// discarded.
pub struct Encoder {
    /// Ausgabepuffer.
    writer: BitWriter,
    options: EncoderOptions,
    /// Lokale Tabellen, ggf. auf einem geteilten Vokabular.
    vocabulary: Vocabulary,
    /// Eingebaute und registrierte Encoding-Algorithmen.
    algorithms: AlgorithmRegistry,
    /// Namespace-Bindungen der offenen Elemente.
    scope: NamespaceScope,
    /// Zurückgehaltener Terminator.
    pending: PendingTerminator,
    state: State,
    /// Wurzelelement bereits geöffnet?
    root_seen: bool,
    /// DOCTYPE bereits geschrieben?
    doctype_seen: bool,
}

impl std::fmt::Debug for Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encoder")
            .field("state", &self.state)
            .field("depth", &self.scope.depth())
            .field("buffered", &self.writer.len())
            .finish_non_exhaustive()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(EncoderOptions::default())
    }
}

impl Encoder {
    /// Creates an encoder with an empty vocabulary.
    pub fn new(options: EncoderOptions) -> Self {
        Self {
            writer: BitWriter::new(),
            options,
            vocabulary: Vocabulary::new(),
            algorithms: AlgorithmRegistry::new(),
            scope: NamespaceScope::default(),
            pending: PendingTerminator::None,
            state: State::Idle,
            root_seen: false,
            doctype_seen: false,
        }
    }

    /// Layers the local vocabulary on a shared one; its entries are
    /// announced in the header of every document.
    pub fn with_vocabulary(mut self, shared: &SharedVocabulary) -> Self {
        self.vocabulary = Vocabulary::layered(shared);
        self
    }

    /// Uses `algorithms` for typed values.
    pub fn with_algorithms(mut self, algorithms: AlgorithmRegistry) -> Self {
        self.algorithms = algorithms;
        self
    }

    /// Registers an application encoding algorithm and returns its identifier.
    ///
    /// # Errors
    ///
    /// `OrderingViolation` while a document is open, since its header already
    /// lists the registered URIs.
    pub fn register_algorithm(&mut self, uri: &str, algorithm: Arc<dyn EncodingAlgorithm>) -> Result<u32> {
        if !matches!(self.state, State::Idle | State::Closed) {
            return Err(Error::ordering_violation("no open document", "algorithm registration"));
        }
        self.algorithms.register(uri, algorithm)
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn algorithms(&self) -> &AlgorithmRegistry {
        &self.algorithms
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.scope.depth()
    }

    /// Bytes buffered so far.
    pub fn buffered_len(&self) -> usize {
        self.writer.len()
    }

    // ========================================================================
    // Fehlerbehandlung
    // ========================================================================

    /// Markiert das Dokument bei einem Fehler als unbrauchbar.
    fn poison<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            log::debug!("encoder failed in {}: {err}", self.state.name());
            self.state = State::Failed;
        }
        result
    }

    fn unexpected(&self, found: &'static str) -> Error {
        let expected = match self.state {
            State::Idle | State::Closed => "start document",
            State::Failed => "reset after error",
            State::Document if self.root_seen => "end document",
            State::Document => "root element",
            State::Attributes { .. } | State::Content => "element content or end element",
        };
        Error::ordering_violation(expected, found)
    }

    /// Schreibt einen zurückgehaltenen Terminator.
    fn flush_pending(&mut self) {
        if let Some(octet) = self.pending.flush() {
            self.writer.write_octet(octet);
        }
    }

    /// Beendet eine offene Attributliste (Terminator steht dann aus).
    fn end_attributes(&mut self) -> Result<()> {
        if let State::Attributes { count } = self.state {
            if count == 0 {
                return Err(Error::ordering_violation("attribute", "end of attribute list"));
            }
            debug_assert!(!self.pending.is_pending());
            self.pending.close();
            self.state = State::Content;
        }
        Ok(())
    }

    /// Prüft, dass Inhalt (Kinder eines Elements) erlaubt ist, und schließt
    /// ggf. die Attributliste.
    fn enter_content(&mut self, found: &'static str) -> Result<()> {
        match self.state {
            State::Attributes { .. } => self.end_attributes(),
            State::Content => Ok(()),
            _ => Err(self.unexpected(found)),
        }
    }

    /// Wie [`enter_content`](Self::enter_content), erlaubt aber auch die Dokumentebene.
    fn enter_child(&mut self, found: &'static str) -> Result<()> {
        match self.state {
            State::Document => Ok(()),
            _ => self.enter_content(found),
        }
    }

    // ========================================================================
    // Dokument
    // ========================================================================

    /// Opens a document without optional header components.
    pub fn open_document(&mut self) -> Result<()> {
        self.open_document_with(&DocumentProperties::default())
    }

    /// Opens a document and writes the header (X.891 12).
    ///
    /// Beim zweiten Dokument wird das lokale Vokabular geleert, außer
    /// `retain_vocabulary` ist gesetzt.
    pub fn open_document_with(&mut self, properties: &DocumentProperties) -> Result<()> {
        let result = self.open_document_inner(properties);
        self.poison(result)
    }

    fn open_document_inner(&mut self, properties: &DocumentProperties) -> Result<()> {
        match self.state {
            State::Idle => {}
            State::Closed => {
                let clear = !self.options.retain_vocabulary();
                log::debug!("next document, clearing local vocabulary: {clear}");
                self.vocabulary.reset(clear);
            }
            _ => return Err(self.unexpected("start document")),
        }
        self.scope.clear();
        self.root_seen = false;
        self.doctype_seen = false;
        header::encode_header(&mut self.writer, &self.options, properties, &mut self.vocabulary, &self.algorithms)?;
        log::debug!("document opened, header {} bytes", self.writer.len());
        self.state = State::Document;
        Ok(())
    }

    /// Closes the document: writes the outstanding terminators (X.891 C.2.11).
    pub fn close_document(&mut self) -> Result<()> {
        let result = self.close_document_inner();
        self.poison(result)
    }

    fn close_document_inner(&mut self) -> Result<()> {
        if self.state != State::Document || !self.root_seen {
            return Err(self.unexpected("end document"));
        }
        if let Some(octet) = self.pending.close() {
            self.writer.write_octet(octet);
        }
        self.flush_pending();
        self.state = State::Closed;
        log::debug!("document closed, {} bytes", self.writer.len());
        Ok(())
    }

    /// Writes a document type declaration with its external identifiers
    /// (X.891 C.9). Only allowed before the root element.
    pub fn emit_document_type_declaration(
        &mut self,
        system_identifier: Option<&str>,
        public_identifier: Option<&str>,
    ) -> Result<()> {
        let result = self.doctype_inner(system_identifier, public_identifier);
        self.poison(result)
    }

    fn doctype_inner(&mut self, system_identifier: Option<&str>, public_identifier: Option<&str>) -> Result<()> {
        if self.state != State::Document || self.root_seen || self.doctype_seen {
            return Err(self.unexpected("document type declaration"));
        }
        if self.options.ignore_dtd() {
            log::trace!("document type declaration dropped");
            return Ok(());
        }
        self.flush_pending();
        let system_identifier = system_identifier.filter(|s| !s.is_empty());
        let public_identifier = public_identifier.filter(|s| !s.is_empty());
        let mut tag = DOCUMENT_TYPE_DECLARATION;
        if system_identifier.is_some() {
            tag |= DOCUMENT_TYPE_SYSTEM_IDENTIFIER_FLAG;
        }
        if public_identifier.is_some() {
            tag |= DOCUMENT_TYPE_PUBLIC_IDENTIFIER_FLAG;
        }
        self.writer.write_octet(tag);
        for identifier in [system_identifier, public_identifier].into_iter().flatten() {
            encode_identifying_string(&mut self.writer, self.vocabulary.table_mut(TableKind::OtherUri), identifier)?;
        }
        // Keine Instruktionen aus der DTD: Liste sofort beenden
        self.pending.close();
        self.doctype_seen = true;
        Ok(())
    }

    // ========================================================================
    // Elemente und Attribute
    // ========================================================================

    /// Opens an element (X.891 C.3).
    ///
    /// `namespaces` sind die Deklarationen am Element; bereits identisch
    /// gebundene werden übersprungen. Ist der eigene Prefix des Elements
    /// danach nicht an `namespace_name` gebunden, wird eine Bindung ergänzt.
    /// With `has_attributes` at least one [`emit_attribute`](Self::emit_attribute)
    /// must follow before any content.
    pub fn open_element(
        &mut self,
        namespace_name: &str,
        qname: &str,
        local_name: &str,
        namespaces: &[NamespaceBinding],
        has_attributes: bool,
    ) -> Result<()> {
        let result = self.open_element_inner(namespace_name, qname, local_name, namespaces, has_attributes);
        self.poison(result)
    }

    fn open_element_inner(
        &mut self,
        namespace_name: &str,
        qname: &str,
        local_name: &str,
        namespaces: &[NamespaceBinding],
        has_attributes: bool,
    ) -> Result<()> {
        match self.state {
            State::Document if self.root_seen => return Err(self.unexpected("second root element")),
            State::Document => self.root_seen = true,
            _ => self.enter_content("start element")?,
        }
        let prefix = crate::qname::validate(namespace_name, qname, local_name)?;

        self.scope.push_element();
        let mut declared: Vec<(&str, &str)> = Vec::new();
        for binding in namespaces {
            let (p, ns) = (&*binding.prefix, &*binding.namespace_name);
            check_binding(p, ns)?;
            if self.scope.resolve(p) == Some(ns) {
                log::trace!("namespace binding {p}={ns} already in scope");
                continue;
            }
            if declared.iter().any(|(q, _)| *q == p) {
                return Err(Error::malformed_qname(format!("prefix '{p}' declared twice")));
            }
            self.scope.bind(p, ns);
            declared.push((p, ns));
        }
        if self.scope.resolve(prefix) != Some(namespace_name) {
            log::trace!("synthesized namespace binding {prefix}={namespace_name}");
            self.scope.bind(prefix, namespace_name);
            declared.push((prefix, namespace_name));
        }

        self.flush_pending();
        let attribute_flag = if has_attributes { ELEMENT_ATTRIBUTE_FLAG } else { 0 };
        if declared.is_empty() {
            // '0' + Attribut-Flag, Name ab dem dritten Bit
            self.writer.write_bits(u64::from(attribute_flag >> 6), 2);
        } else {
            self.writer.write_octet(ELEMENT_NAMESPACES_FLAG | attribute_flag);
            for (p, ns) in declared {
                self.encode_namespace_attribute(p, ns)?;
            }
            self.writer.write_octet(TERMINATOR);
            self.writer.write_bits(0, 2);
        }
        self.encode_element_name(prefix, namespace_name, qname, local_name)?;

        self.state = if has_attributes { State::Attributes { count: 0 } } else { State::Content };
        Ok(())
    }

    /// Adds an attribute to the element just opened (X.891 C.4).
    ///
    /// A prefixed name must resolve in scope. An unprefixed name with a
    /// namespace borrows any prefix bound to that namespace.
    pub fn emit_attribute<'a>(
        &mut self,
        namespace_name: &str,
        qname: &str,
        local_name: &str,
        value: impl Into<AttributeValue<'a>>,
    ) -> Result<()> {
        let result = self.emit_attribute_inner(namespace_name, qname, local_name, value.into());
        self.poison(result)
    }

    fn emit_attribute_inner(
        &mut self,
        namespace_name: &str,
        qname: &str,
        local_name: &str,
        value: AttributeValue<'_>,
    ) -> Result<()> {
        let State::Attributes { count } = self.state else {
            return Err(self.unexpected("attribute"));
        };
        if namespace_name == XMLNS_NAMESPACE || qname == XMLNS_PREFIX {
            return Err(Error::malformed_qname("namespace declarations belong to open_element"));
        }
        let prefix = crate::qname::validate(namespace_name, qname, local_name)?;
        let prefix: String = if !prefix.is_empty() {
            if self.scope.resolve(prefix) != Some(namespace_name) {
                return Err(Error::unresolved_namespace(prefix.to_owned(), namespace_name.to_owned()));
            }
            prefix.to_owned()
        } else if !namespace_name.is_empty() {
            match self.scope.prefix_for(namespace_name) {
                Some(bound) => bound.to_owned(),
                None => return Err(Error::unresolved_namespace("", namespace_name.to_owned())),
            }
        } else {
            String::new()
        };
        let qname = if prefix.is_empty() { qname.to_owned() } else { format!("{prefix}:{local_name}") };

        // '0' + Name ab dem zweiten Bit
        self.writer.write_bit(false);
        self.encode_attribute_name(&prefix, namespace_name, &qname, local_name)?;
        self.encode_attribute_value(value)?;
        self.state = State::Attributes { count: count + 1 };
        Ok(())
    }

    /// Closes the innermost element (X.891 C.3.8).
    pub fn close_element(&mut self) -> Result<()> {
        let result = self.close_element_inner();
        self.poison(result)
    }

    fn close_element_inner(&mut self) -> Result<()> {
        self.enter_content("end element")?;
        if let Some(octet) = self.pending.close() {
            self.writer.write_octet(octet);
        }
        self.scope.pop_element();
        if self.scope.depth() == 0 {
            self.state = State::Document;
        }
        Ok(())
    }

    // ========================================================================
    // Inhalt
    // ========================================================================

    /// Writes character content (X.891 C.7).
    ///
    /// Leerer Text ist ein No-op. Reiner Whitespace entfällt mit
    /// `ignore_whitespace`, auf Dokumentebene immer.
    pub fn emit_text(&mut self, text: &str) -> Result<()> {
        let result = self.emit_text_inner(text);
        self.poison(result)
    }

    fn emit_text_inner(&mut self, text: &str) -> Result<()> {
        if self.state == State::Document && is_xml_whitespace(text) {
            return Ok(());
        }
        self.enter_content("characters")?;
        if text.is_empty() {
            return Ok(());
        }
        if self.options.ignore_whitespace() && is_xml_whitespace(text) {
            log::trace!("whitespace run of {} bytes dropped", text.len());
            return Ok(());
        }
        self.flush_pending();
        self.encode_text_chunk(text)
    }

    /// Writes a CDATA section as a chunk of the built-in CDATA algorithm.
    pub fn emit_cdata(&mut self, text: &str) -> Result<()> {
        let result = self.emit_cdata_inner(text);
        self.poison(result)
    }

    fn emit_cdata_inner(&mut self, text: &str) -> Result<()> {
        self.enter_content("CDATA section")?;
        if text.is_empty() {
            return Ok(());
        }
        self.flush_pending();
        self.encode_cdata_chunk(text)
    }

    /// Writes character content through an encoding algorithm.
    pub fn emit_typed_text(&mut self, data: &AlgorithmData) -> Result<()> {
        let result = self.emit_typed_text_inner(data);
        self.poison(result)
    }

    fn emit_typed_text_inner(&mut self, data: &AlgorithmData) -> Result<()> {
        self.enter_content("typed characters")?;
        let (id, octets) = self.algorithm_octets(data)?;
        // Leere Werte ergeben keinen Chunk
        if octets.is_empty() {
            return Ok(());
        }
        self.flush_pending();
        self.encode_octet_chunk(OctetSource::EncodingAlgorithm(id), &octets)
    }

    /// Writes character content packed with a restricted alphabet.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for an undefined alphabet or a character outside it.
    pub fn emit_restricted_text(&mut self, alphabet: u32, text: &str) -> Result<()> {
        let result = self.emit_restricted_text_inner(alphabet, text);
        self.poison(result)
    }

    fn emit_restricted_text_inner(&mut self, alphabet: u32, text: &str) -> Result<()> {
        self.enter_content("restricted characters")?;
        if text.is_empty() {
            return Ok(());
        }
        let octets = self.alphabet_octets(alphabet, text)?;
        self.flush_pending();
        self.encode_octet_chunk(OctetSource::RestrictedAlphabet(alphabet), &octets)
    }

    /// Writes a comment (X.891 C.8); dropped with `ignore_comments`.
    pub fn emit_comment(&mut self, text: &str) -> Result<()> {
        let result = self.emit_comment_inner(text);
        self.poison(result)
    }

    fn emit_comment_inner(&mut self, text: &str) -> Result<()> {
        self.enter_child("comment")?;
        if self.options.ignore_comments() {
            return Ok(());
        }
        self.flush_pending();
        self.writer.write_octet(COMMENT);
        encode_non_identifying_literal(&mut self.writer, text, false)
    }

    /// Writes a processing instruction (X.891 C.5); dropped with
    /// `ignore_processing_instructions`.
    pub fn emit_processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        let result = self.emit_processing_instruction_inner(target, data);
        self.poison(result)
    }

    fn emit_processing_instruction_inner(&mut self, target: &str, data: &str) -> Result<()> {
        self.enter_child("processing instruction")?;
        if self.options.ignore_processing_instructions() {
            return Ok(());
        }
        self.flush_pending();
        self.writer.write_octet(PROCESSING_INSTRUCTION);
        encode_identifying_string(&mut self.writer, self.vocabulary.table_mut(TableKind::OtherNcName), target)?;
        encode_non_identifying_literal(&mut self.writer, data, false)
    }

    /// Writes an unexpanded entity reference (X.891 C.6); dropped with
    /// `ignore_dtd`.
    pub fn emit_unexpanded_entity_reference(
        &mut self,
        name: &str,
        system_identifier: Option<&str>,
        public_identifier: Option<&str>,
    ) -> Result<()> {
        let result = self.entity_reference_inner(name, system_identifier, public_identifier);
        self.poison(result)
    }

    fn entity_reference_inner(
        &mut self,
        name: &str,
        system_identifier: Option<&str>,
        public_identifier: Option<&str>,
    ) -> Result<()> {
        self.enter_content("entity reference")?;
        if self.options.ignore_dtd() {
            log::warn!("unexpanded entity reference '{name}' dropped");
            return Ok(());
        }
        self.flush_pending();
        let system_identifier = system_identifier.filter(|s| !s.is_empty());
        let public_identifier = public_identifier.filter(|s| !s.is_empty());
        let mut tag = UNEXPANDED_ENTITY_REFERENCE;
        if system_identifier.is_some() {
            tag |= UNEXPANDED_ENTITY_SYSTEM_IDENTIFIER_FLAG;
        }
        if public_identifier.is_some() {
            tag |= UNEXPANDED_ENTITY_PUBLIC_IDENTIFIER_FLAG;
        }
        self.writer.write_octet(tag);
        encode_identifying_string(&mut self.writer, self.vocabulary.table_mut(TableKind::OtherNcName), name)?;
        for identifier in [system_identifier, public_identifier].into_iter().flatten() {
            encode_identifying_string(&mut self.writer, self.vocabulary.table_mut(TableKind::OtherUri), identifier)?;
        }
        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Encodes one event; same bytes as the matching method call.
    pub fn encode_event(&mut self, event: &FiEvent) -> Result<()> {
        match event {
            FiEvent::StartDocument(properties) => self.open_document_with(properties),
            FiEvent::EndDocument => self.close_document(),
            FiEvent::DocumentType(doctype) => self.emit_document_type_declaration(
                doctype.system_identifier.as_deref(),
                doctype.public_identifier.as_deref(),
            ),
            FiEvent::StartElement(element) => {
                let name = &element.name;
                self.open_element(
                    &name.namespace_name,
                    &name.qname,
                    &name.local_name,
                    &element.namespaces,
                    !element.attributes.is_empty(),
                )?;
                for attribute in &element.attributes {
                    let name = &attribute.name;
                    self.emit_attribute(&name.namespace_name, &name.qname, &name.local_name, attribute.value.as_value())?;
                }
                Ok(())
            }
            FiEvent::EndElement => self.close_element(),
            FiEvent::Characters(text) => self.emit_text(text),
            FiEvent::CData(text) => self.emit_cdata(text),
            FiEvent::TypedCharacters(data) => self.emit_typed_text(data),
            FiEvent::RestrictedCharacters { alphabet, text } => self.emit_restricted_text(*alphabet, text),
            FiEvent::Comment(text) => self.emit_comment(text),
            FiEvent::ProcessingInstruction(pi) => self.emit_processing_instruction(&pi.target, &pi.data),
            FiEvent::EntityReference(reference) => self.emit_unexpanded_entity_reference(
                &reference.name,
                reference.system_identifier.as_deref(),
                reference.public_identifier.as_deref(),
            ),
        }
    }

    /// Encodes a sequence of events.
    pub fn encode_events<'a>(&mut self, events: impl IntoIterator<Item = &'a FiEvent>) -> Result<()> {
        events.into_iter().try_for_each(|event| self.encode_event(event))
    }

    // ========================================================================
    // Ausgabe
    // ========================================================================

    fn check_closed(&self, found: &'static str) -> Result<()> {
        match self.state {
            State::Closed => Ok(()),
            _ => Err(self.unexpected(found)),
        }
    }

    /// Returns the finished document(s).
    ///
    /// # Errors
    ///
    /// `OrderingViolation` unless the last document was closed.
    pub fn finish(self) -> Result<Vec<u8>> {
        self.check_closed("finish")?;
        Ok(self.writer.into_vec())
    }

    /// Writes the finished document(s) to `sink`.
    pub fn finish_to(mut self, sink: &mut impl std::io::Write) -> Result<()> {
        self.check_closed("finish")?;
        self.writer
            .drain_to(sink)
            .map_err(|e| Error::IoError(format!("finish: {e}")))
    }

    /// Takes the bytes of the closed document and keeps the encoder ready
    /// for the next one.
    pub fn take_output(&mut self) -> Result<Vec<u8>> {
        self.check_closed("take output")?;
        Ok(self.writer.take_vec())
    }

    /// Discards all output and the local vocabulary, also after an error.
    pub fn reset(&mut self) {
        self.writer.clear();
        self.vocabulary.reset(true);
        self.scope.clear();
        self.pending = PendingTerminator::None;
        self.state = State::Idle;
        self.root_seen = false;
        self.doctype_seen = false;
        log::debug!("encoder reset");
    }
}

/// Prüft eine Namespace-Deklaration (Namespaces in XML 1.0, 3).
fn check_binding(prefix: &str, namespace_name: &str) -> Result<()> {
    if prefix == XMLNS_PREFIX || namespace_name == XMLNS_NAMESPACE {
        return Err(Error::malformed_qname("the xmlns prefix and namespace cannot be declared"));
    }
    if (prefix == XML_PREFIX) != (namespace_name == XML_NAMESPACE) {
        return Err(Error::malformed_qname("the xml prefix is bound to the XML namespace only"));
    }
    if !prefix.is_empty() && namespace_name.is_empty() {
        return Err(Error::malformed_qname(format!("prefix '{prefix}' cannot be undeclared")));
    }
    Ok(())
}

// ============================================================================
// High-Level API
// ============================================================================

/// Encodes a complete event sequence into one document.
pub fn encode<'a>(events: impl IntoIterator<Item = &'a FiEvent>, options: &EncoderOptions) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(options.clone());
    encoder.encode_events(events)?;
    encoder.finish()
}

/// Encodes an event sequence on top of a shared vocabulary.
pub fn encode_with_vocabulary<'a>(
    events: impl IntoIterator<Item = &'a FiEvent>,
    options: &EncoderOptions,
    vocabulary: &SharedVocabulary,
) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(options.clone()).with_vocabulary(vocabulary);
    encoder.encode_events(events)?;
    encoder.finish()
}

// ============================================================================
// Tests
// ============================================================================
