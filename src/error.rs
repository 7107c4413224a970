//! Central error types for the Fast Infoset encoder.
//!
//! Each variant references the governing clause of ITU-T Rec. X.891.

use core::fmt;
use std::borrow::Cow;

/// All errors the encoder core can report.
///
/// Jeder Fehler ist lokal und nicht wiederholbar: der Aufrufer verwirft die
/// gepufferte Ausgabe und beginnt ein neues Dokument.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An integer or octet-string length exceeds the largest encodable tier (X.891 C.21-C.28).
    IntegerOutOfRange(u64),
    /// A namespace needed for an element or attribute name cannot be encoded (X.891 7.2.22).
    UnresolvedNamespace {
        /// Prefix des Namens (leer für Default-Namespace).
        prefix: Cow<'static, str>,
        /// Namespace-URI die nicht aufgelöst werden konnte.
        namespace: Cow<'static, str>,
    },
    /// Encoding algorithm identifiers 10..=31 are reserved (X.891 8.4).
    ReservedAlgorithmIdentifier(u32),
    /// No application encoding algorithm is registered for the identifier or URI (X.891 8.4).
    AlgorithmNotRegistered(Cow<'static, str>),
    /// A read-only parent table was bound to a table of another kind (X.891 8.2).
    InvalidVocabularyBinding {
        /// Tabellenart des Kindes.
        expected: Cow<'static, str>,
        /// Tabellenart des angebotenen Parents.
        found: Cow<'static, str>,
    },
    /// Prefix, namespace name and local name do not form a valid qualified name (X.891 7.17).
    MalformedQualifiedName(Cow<'static, str>),
    /// Encoder calls arrived in an order the document structure does not allow (X.891 7.1).
    OrderingViolation {
        /// Was erwartet wurde (leer wenn nicht verfügbar).
        expected: Cow<'static, str>,
        /// Was gefunden wurde (leer wenn nicht verfügbar).
        found: Cow<'static, str>,
    },
    /// A typed value could not be converted by an encoding algorithm (X.891 10).
    InvalidValue(String),
    /// A codec ran out of input while decoding (X.891 C).
    PrematureEndOfStream,
    /// The leading bits do not select any length or integer tier (X.891 C.21-C.28).
    InvalidTierPrefix(u8),
    /// Writing the finished document to a sink failed.
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegerOutOfRange(value) => {
                write!(f, "integer {value} out of encodable range (X.891 C.21-C.28)")
            }
            Self::UnresolvedNamespace { prefix, namespace } => {
                if prefix.is_empty() {
                    write!(f, "unresolved namespace '{namespace}' (X.891 7.2.22)")
                } else {
                    write!(f, "unresolved namespace '{namespace}' for prefix '{prefix}' (X.891 7.2.22)")
                }
            }
            Self::ReservedAlgorithmIdentifier(id) => {
                write!(f, "encoding algorithm identifier {id} is reserved (X.891 8.4)")
            }
            Self::AlgorithmNotRegistered(key) => {
                write!(f, "encoding algorithm '{key}' is not registered (X.891 8.4)")
            }
            Self::InvalidVocabularyBinding { expected, found } => {
                write!(f, "cannot bind {found} table as read-only parent of {expected} table (X.891 8.2)")
            }
            Self::MalformedQualifiedName(msg) => {
                if msg.is_empty() {
                    write!(f, "malformed qualified name (X.891 7.17)")
                } else {
                    write!(f, "malformed qualified name: {msg} (X.891 7.17)")
                }
            }
            Self::OrderingViolation { expected, found } => {
                if expected.is_empty() && found.is_empty() {
                    write!(f, "event ordering violation (X.891 7.1)")
                } else {
                    write!(f, "event ordering violation: expected '{expected}', found '{found}' (X.891 7.1)")
                }
            }
            Self::InvalidValue(msg) => write!(f, "invalid typed value (X.891 10): {msg}"),
            Self::PrematureEndOfStream => write!(f, "premature end of stream (X.891 C)"),
            Self::InvalidTierPrefix(bits) => {
                write!(f, "bit pattern {bits:#04x} selects no tier (X.891 C.21-C.28)")
            }
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Erstellt einen `OrderingViolation` Fehler mit Kontext.
    pub fn ordering_violation(
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::OrderingViolation {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Erstellt einen `UnresolvedNamespace` Fehler.
    pub fn unresolved_namespace(
        prefix: impl Into<Cow<'static, str>>,
        namespace: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::UnresolvedNamespace {
            prefix: prefix.into(),
            namespace: namespace.into(),
        }
    }

    /// Erstellt einen `MalformedQualifiedName` Fehler mit Nachricht.
    pub fn malformed_qname(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedQualifiedName(msg.into())
    }

    /// Erstellt einen `AlgorithmNotRegistered` Fehler für URI oder Identifier.
    pub fn algorithm_not_registered(key: impl Into<Cow<'static, str>>) -> Self {
        Self::AlgorithmNotRegistered(key.into())
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
