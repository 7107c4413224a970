//! Event model driving the encoder (X.891 7).
//!
//! Tree and stream adapters translate their input into [`FiEvent`]s, or call
//! the matching [`Encoder`](crate::encoder::Encoder) methods directly. Both
//! paths produce identical bytes.

use std::sync::Arc;

use crate::algorithm::{AlgorithmRef, TypedValue};

/// A namespace declaration on an element (`xmlns` or `xmlns:prefix`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    /// Prefix being bound (empty for the default namespace).
    pub prefix: Arc<str>,
    /// Namespace name (empty undeclares the default namespace).
    pub namespace_name: Arc<str>,
}

impl NamespaceBinding {
    pub fn new(prefix: &str, namespace_name: &str) -> Self {
        Self {
            prefix: prefix.into(),
            namespace_name: namespace_name.into(),
        }
    }
}

/// A value destined for an encoding algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmData {
    pub algorithm: AlgorithmRef,
    pub value: TypedValue,
}

impl AlgorithmData {
    pub fn new(algorithm: impl Into<AlgorithmRef>, value: TypedValue) -> Self {
        Self {
            algorithm: algorithm.into(),
            value,
        }
    }
}

/// Borrowed attribute value handed to
/// [`Encoder::emit_attribute`](crate::encoder::Encoder::emit_attribute).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    Text(&'a str),
    Encoded(&'a AlgorithmData),
}

impl<'a> From<&'a str> for AttributeValue<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a AlgorithmData> for AttributeValue<'a> {
    fn from(data: &'a AlgorithmData) -> Self {
        Self::Encoded(data)
    }
}

/// Owned attribute value inside an [`FiEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeData {
    Text(Arc<str>),
    Encoded(AlgorithmData),
}

impl AttributeData {
    pub fn as_value(&self) -> AttributeValue<'_> {
        match self {
            Self::Text(text) => AttributeValue::Text(text),
            Self::Encoded(data) => AttributeValue::Encoded(data),
        }
    }
}

/// An expanded element or attribute name as the adapter sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub namespace_name: Arc<str>,
    /// `prefix:local` or just `local`.
    pub qname: Arc<str>,
    pub local_name: Arc<str>,
}

impl Name {
    /// Name without namespace.
    pub fn local(local_name: &str) -> Self {
        Self::new("", local_name, local_name)
    }

    pub fn new(namespace_name: &str, qname: &str, local_name: &str) -> Self {
        Self {
            namespace_name: namespace_name.into(),
            qname: qname.into(),
            local_name: local_name.into(),
        }
    }
}

/// Attribute inside a [`FiEvent::StartElement`].
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeContent {
    pub name: Name,
    pub value: AttributeData,
}

/// Content of [`FiEvent::StartElement`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElementContent {
    pub name: Name,
    pub namespaces: Vec<NamespaceBinding>,
    pub attributes: Vec<AttributeContent>,
}

impl ElementContent {
    /// Element without declarations or attributes.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            namespaces: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, prefix: &str, namespace_name: &str) -> Self {
        self.namespaces.push(NamespaceBinding::new(prefix, namespace_name));
        self
    }

    pub fn with_attribute(mut self, name: Name, value: &str) -> Self {
        self.attributes.push(AttributeContent {
            name,
            value: AttributeData::Text(value.into()),
        });
        self
    }

    pub fn with_encoded_attribute(mut self, name: Name, data: AlgorithmData) -> Self {
        self.attributes.push(AttributeContent {
            name,
            value: AttributeData::Encoded(data),
        });
        self
    }
}

/// A notation declared in the document header (X.891 7.11).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notation {
    pub name: Arc<str>,
    pub system_identifier: Option<Arc<str>>,
    pub public_identifier: Option<Arc<str>>,
}

/// An unparsed entity declared in the document header (X.891 7.12).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedEntity {
    pub name: Arc<str>,
    pub system_identifier: Arc<str>,
    pub public_identifier: Option<Arc<str>>,
    pub notation_name: Arc<str>,
}

/// Optional document properties written into the header (X.891 7.2).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentProperties {
    pub standalone: Option<bool>,
    pub version: Option<Arc<str>>,
    pub notations: Vec<Notation>,
    pub unparsed_entities: Vec<UnparsedEntity>,
}

/// Content for [`FiEvent::ProcessingInstruction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiContent {
    pub target: Arc<str>,
    pub data: Arc<str>,
}

/// Content for [`FiEvent::DocumentType`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DoctypeContent {
    pub system_identifier: Option<Arc<str>>,
    pub public_identifier: Option<Arc<str>>,
}

/// Content for [`FiEvent::EntityReference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReferenceContent {
    pub name: Arc<str>,
    pub system_identifier: Option<Arc<str>>,
    pub public_identifier: Option<Arc<str>>,
}

/// One step of a document, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum FiEvent {
    StartDocument(DocumentProperties),
    EndDocument,
    /// DOCTYPE with external identifiers; the internal subset is not carried.
    DocumentType(DoctypeContent),
    /// Element with its declarations and attributes.
    StartElement(ElementContent),
    EndElement,
    Characters(Arc<str>),
    /// CDATA section, kept distinct from plain text.
    CData(Arc<str>),
    /// Character content handed to an encoding algorithm.
    TypedCharacters(AlgorithmData),
    /// Character content packed with a restricted alphabet.
    RestrictedCharacters { alphabet: u32, text: Arc<str> },
    Comment(Arc<str>),
    ProcessingInstruction(PiContent),
    EntityReference(EntityReferenceContent),
}

impl FiEvent {
    /// Short name for logs and ordering errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartDocument(_) => "start document",
            Self::EndDocument => "end document",
            Self::DocumentType(_) => "document type declaration",
            Self::StartElement(_) => "start element",
            Self::EndElement => "end element",
            Self::Characters(_) => "characters",
            Self::CData(_) => "CDATA section",
            Self::TypedCharacters(_) => "typed characters",
            Self::RestrictedCharacters { .. } => "restricted characters",
            Self::Comment(_) => "comment",
            Self::ProcessingInstruction(_) => "processing instruction",
            Self::EntityReference(_) => "entity reference",
        }
    }
}
