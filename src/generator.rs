//! Builds a vocabulary from sample documents.
//!
//! [`VocabularyGenerator`] watches the same events the encoder consumes and
//! indexes every name, namespace and short value it sees. The result is
//! frozen with [`VocabularyGenerator::share`] and handed to encoders as their
//! read-only parent, so later documents reference those strings by index.

use crate::event::{AttributeData, ElementContent, FiEvent, Name};
use crate::options::EncoderOptions;
use crate::qname;
use crate::string::is_xml_whitespace;
use crate::string_table::TableKind;
use crate::vocabulary::{SharedVocabulary, Vocabulary};
use crate::Result;

/// Collects a vocabulary from a stream of events.
#[derive(Debug, Clone, Default)]
pub struct VocabularyGenerator {
    vocabulary: Vocabulary,
    options: EncoderOptions,
}

impl VocabularyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the size constraints and whitespace policy of `options`.
    pub fn with_options(options: EncoderOptions) -> Self {
        Self {
            vocabulary: Vocabulary::new(),
            options,
        }
    }

    /// Continues filling an existing vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn into_vocabulary(self) -> Vocabulary {
        self.vocabulary
    }

    /// Freezes the collected vocabulary.
    pub fn share(self) -> SharedVocabulary {
        self.vocabulary.share()
    }

    /// Feeds one event.
    ///
    /// # Errors
    ///
    /// `MalformedQualifiedName` for inconsistent element or attribute names.
    pub fn process(&mut self, event: &FiEvent) -> Result<()> {
        match event {
            FiEvent::StartElement(element) => self.add_element_content(element),
            FiEvent::Characters(text) => self.add_characters(text),
            FiEvent::ProcessingInstruction(pi) => {
                // Ein leeres Target hat keinen Tabelleneintrag; der Encoder lehnt es ab
                if !pi.target.is_empty() {
                    self.vocabulary.intern_string(TableKind::OtherNcName, &pi.target)?;
                }
                Ok(())
            }
            // Kommentare, CDATA und typisierte Inhalte bleiben Literale
            _ => Ok(()),
        }
    }

    /// Feeds a whole event sequence.
    pub fn process_all<'a>(&mut self, events: impl IntoIterator<Item = &'a FiEvent>) -> Result<()> {
        events.into_iter().try_for_each(|event| self.process(event))
    }

    fn add_element_content(&mut self, element: &ElementContent) -> Result<()> {
        for binding in &element.namespaces {
            self.add_namespace_binding(&binding.prefix, &binding.namespace_name)?;
        }
        self.add_element(&element.name)?;
        for attribute in &element.attributes {
            match &attribute.value {
                AttributeData::Text(value) => self.add_attribute(&attribute.name, value)?,
                AttributeData::Encoded(_) => self.add_attribute_name(&attribute.name)?,
            }
        }
        Ok(())
    }

    /// Indexes a prefix and its namespace.
    pub fn add_namespace_binding(&mut self, prefix: &str, namespace_name: &str) -> Result<()> {
        self.vocabulary.add_namespace_binding(prefix, namespace_name)
    }

    /// Indexes an element name together with its prefix and namespace.
    pub fn add_element(&mut self, name: &Name) -> Result<()> {
        let prefix = qname::validate(&name.namespace_name, &name.qname, &name.local_name)?;
        self.vocabulary.add_namespace_binding(prefix, &name.namespace_name)?;
        self.vocabulary.add_element_name(&name.namespace_name, &name.qname, &name.local_name)?;
        Ok(())
    }

    /// Indexes an attribute name and, if short enough, its value.
    pub fn add_attribute(&mut self, name: &Name, value: &str) -> Result<()> {
        self.add_attribute_name(name)?;
        if !value.is_empty() && self.options.indexes_attribute_value(value) {
            self.vocabulary.intern_string(TableKind::AttributeValue, value)?;
        }
        Ok(())
    }

    fn add_attribute_name(&mut self, name: &Name) -> Result<()> {
        let prefix = qname::validate(&name.namespace_name, &name.qname, &name.local_name)?;
        self.vocabulary.add_namespace_binding(prefix, &name.namespace_name)?;
        if prefix.is_empty() && !name.namespace_name.is_empty() {
            // Der Encoder schreibt solche Attribute mit geliehenem Prefix; ein
            // Eintrag ohne Prefix würde nie getroffen
            self.vocabulary.intern_string(TableKind::LocalName, &name.local_name)?;
            return Ok(());
        }
        self.vocabulary.add_attribute_name(&name.namespace_name, &name.qname, &name.local_name)?;
        Ok(())
    }

    /// Indexes a character chunk when it is short enough.
    pub fn add_characters(&mut self, text: &str) -> Result<()> {
        if text.is_empty() || !self.options.indexes_character_chunk(text) {
            return Ok(());
        }
        if self.options.ignore_whitespace() && is_xml_whitespace(text) {
            return Ok(());
        }
        self.vocabulary.intern_string(TableKind::CharacterContentChunk, text)?;
        Ok(())
    }
}
