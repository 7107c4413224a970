//! fastinfoset – Fast Infoset (ITU-T X.891) Encoder
//!
//! # Beispiel
//!
//! ```
//! use fastinfoset::{EncoderOptions, FiEvent, encode};
//! use fastinfoset::event::{ElementContent, Name};
//!
//! let events = vec![
//!     FiEvent::StartDocument(Default::default()),
//!     FiEvent::StartElement(ElementContent::new(Name::local("greeting"))),
//!     FiEvent::Characters("Hello".into()),
//!     FiEvent::EndElement,
//!     FiEvent::EndDocument,
//! ];
//! let bytes = encode(&events, &EncoderOptions::default()).unwrap();
//! assert_eq!(&bytes[..4], &[0xE0, 0x00, 0x00, 0x01]);
//! ```
//!
//! Mehrere Encoder können eine eingefrorene [`SharedVocabulary`] teilen, die
//! ein [`VocabularyGenerator`] aus Beispieldokumenten aufbaut.

pub mod algorithm;
pub mod alphabet;
pub mod bitstream;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod event;
pub mod generator;
mod header;
pub mod integer;
pub mod length;
pub mod options;
pub mod qname;
pub mod string;
pub mod string_table;
pub mod vocabulary;

pub use error::{Error, Result};

/// HashMap mit ahash (schneller, nicht DoS-resistent, für interne Datenstrukturen).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// IndexMap mit ahash (deterministische Iteration + schnelles Hashing).
pub(crate) type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: Events
pub use event::{AlgorithmData, AttributeValue, DocumentProperties, ElementContent, FiEvent, Name, NamespaceBinding};

// Public API: Options
pub use options::EncoderOptions;

// Public API: Encoder
pub use encoder::{Encoder, encode, encode_with_vocabulary};

// Public API: Vokabular und Algorithmen
pub use algorithm::{AlgorithmRef, AlgorithmRegistry, BuiltInAlgorithm, EncodingAlgorithm, TypedValue};
pub use generator::VocabularyGenerator;
pub use qname::QualifiedName;
pub use string_table::TableKind;
pub use vocabulary::{SharedVocabulary, Vocabulary};
