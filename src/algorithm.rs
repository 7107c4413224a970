//! Encoding algorithms (X.891 8.4, 10).
//!
//! An encoding algorithm converts a typed value into the octets carried by an
//! attribute value or character chunk. Identifiers 0..=9 are the built-in
//! algorithms, 10..=31 are reserved and 32..=255 belong to the application,
//! which registers its converters by URI in an [`AlgorithmRegistry`].

mod boolean;
mod numeric;
mod octets;
mod uuid;

use std::fmt;
use std::sync::Arc;

use crate::constants::{
    BASE64_ALGORITHM, BOOLEAN_ALGORITHM, CDATA_ALGORITHM, DOUBLE_ALGORITHM, FIRST_APPLICATION_ALGORITHM,
    FLOAT_ALGORITHM, HEXADECIMAL_ALGORITHM, INT_ALGORITHM, LAST_APPLICATION_ALGORITHM, LAST_BUILT_IN_ALGORITHM,
    LAST_RESERVED_ALGORITHM, LONG_ALGORITHM, SHORT_ALGORITHM, UUID_ALGORITHM,
};
use crate::{Error, FastIndexMap, Result};

/// A value before it is turned into octets (or after it was read back).
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Octets(Vec<u8>),
    Shorts(Vec<i16>),
    Ints(Vec<i32>),
    /// Also used by the UUID algorithm: two words per UUID, most significant first.
    Longs(Vec<i64>),
    Booleans(Vec<bool>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
    Text(String),
}

impl TypedValue {
    /// Variant name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Octets(_) => "octets",
            Self::Shorts(_) => "shorts",
            Self::Ints(_) => "ints",
            Self::Longs(_) => "longs",
            Self::Booleans(_) => "booleans",
            Self::Floats(_) => "floats",
            Self::Doubles(_) => "doubles",
            Self::Text(_) => "text",
        }
    }
}

/// Converter between typed values, octets and text.
///
/// Implementations must be stateless from the caller's point of view; the
/// registry hands the same instance to every encoder.
pub trait EncodingAlgorithm: Send + Sync {
    /// Encodes a typed value. Values of the wrong kind fail with `InvalidValue`.
    fn to_octets(&self, value: &TypedValue) -> Result<Vec<u8>>;

    /// Decodes octets produced by [`to_octets`](Self::to_octets).
    fn from_octets(&self, octets: &[u8]) -> Result<TypedValue>;

    /// Parses the lexical form (whitespace separated for lists).
    fn from_text(&self, text: &str) -> Result<TypedValue>;

    /// Renders a typed value in its lexical form.
    fn to_text(&self, value: &TypedValue) -> Result<String>;

    /// Encodes a value, parsing it first when it arrives as text.
    fn encode(&self, value: &TypedValue) -> Result<Vec<u8>> {
        match value {
            TypedValue::Text(text) => self.to_octets(&self.from_text(text)?),
            other => self.to_octets(other),
        }
    }
}

/// Mismatch zwischen Algorithmus und Wertart.
pub(crate) fn wrong_kind(algorithm: BuiltInAlgorithm, value: &TypedValue) -> Error {
    Error::InvalidValue(format!("{} algorithm cannot encode {}", algorithm.name(), value.kind()))
}

/// The built-in algorithms (X.891 10.2-10.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInAlgorithm {
    Hexadecimal,
    Base64,
    Short,
    Int,
    Long,
    Boolean,
    Float,
    Double,
    Uuid,
    Cdata,
}

static BUILT_IN: [BuiltInAlgorithm; 10] = [
    BuiltInAlgorithm::Hexadecimal,
    BuiltInAlgorithm::Base64,
    BuiltInAlgorithm::Short,
    BuiltInAlgorithm::Int,
    BuiltInAlgorithm::Long,
    BuiltInAlgorithm::Boolean,
    BuiltInAlgorithm::Float,
    BuiltInAlgorithm::Double,
    BuiltInAlgorithm::Uuid,
    BuiltInAlgorithm::Cdata,
];

impl BuiltInAlgorithm {
    /// Returns the built-in algorithm with this identifier.
    pub fn from_id(id: u32) -> Option<Self> {
        BUILT_IN.get(id as usize).copied()
    }

    /// The algorithm identifier written to the stream.
    pub fn id(self) -> u32 {
        match self {
            Self::Hexadecimal => HEXADECIMAL_ALGORITHM,
            Self::Base64 => BASE64_ALGORITHM,
            Self::Short => SHORT_ALGORITHM,
            Self::Int => INT_ALGORITHM,
            Self::Long => LONG_ALGORITHM,
            Self::Boolean => BOOLEAN_ALGORITHM,
            Self::Float => FLOAT_ALGORITHM,
            Self::Double => DOUBLE_ALGORITHM,
            Self::Uuid => UUID_ALGORITHM,
            Self::Cdata => CDATA_ALGORITHM,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hexadecimal => "hexadecimal",
            Self::Base64 => "base64",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::Double => "double",
            Self::Uuid => "uuid",
            Self::Cdata => "cdata",
        }
    }

    fn instance(self) -> &'static dyn EncodingAlgorithm {
        &BUILT_IN[self.id() as usize]
    }
}

impl EncodingAlgorithm for BuiltInAlgorithm {
    fn to_octets(&self, value: &TypedValue) -> Result<Vec<u8>> {
        match self {
            Self::Hexadecimal | Self::Base64 => octets::to_octets(*self, value),
            Self::Short | Self::Int | Self::Long | Self::Float | Self::Double => numeric::to_octets(*self, value),
            Self::Boolean => boolean::to_octets(value),
            Self::Uuid => uuid::to_octets(value),
            Self::Cdata => octets::cdata_to_octets(value),
        }
    }

    fn from_octets(&self, data: &[u8]) -> Result<TypedValue> {
        match self {
            Self::Hexadecimal | Self::Base64 => Ok(TypedValue::Octets(data.to_vec())),
            Self::Short | Self::Int | Self::Long | Self::Float | Self::Double => numeric::from_octets(*self, data),
            Self::Boolean => boolean::from_octets(data),
            Self::Uuid => uuid::from_octets(data),
            Self::Cdata => octets::cdata_from_octets(data),
        }
    }

    fn from_text(&self, text: &str) -> Result<TypedValue> {
        match self {
            Self::Hexadecimal => octets::hex_from_text(text),
            Self::Base64 => octets::base64_from_text(text),
            Self::Short | Self::Int | Self::Long | Self::Float | Self::Double => numeric::from_text(*self, text),
            Self::Boolean => boolean::from_text(text),
            Self::Uuid => uuid::from_text(text),
            Self::Cdata => Ok(TypedValue::Text(text.to_owned())),
        }
    }

    fn to_text(&self, value: &TypedValue) -> Result<String> {
        match self {
            Self::Hexadecimal => octets::hex_to_text(value),
            Self::Base64 => octets::base64_to_text(value),
            Self::Short | Self::Int | Self::Long | Self::Float | Self::Double => numeric::to_text(*self, value),
            Self::Boolean => boolean::to_text(value),
            Self::Uuid => uuid::to_text(value),
            Self::Cdata => match value {
                TypedValue::Text(text) => Ok(text.clone()),
                other => Err(wrong_kind(*self, other)),
            },
        }
    }
}

/// How a caller names the algorithm for a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlgorithmRef {
    /// Identifier as written to the stream.
    Id(u32),
    /// URI of a registered application algorithm.
    Uri(Arc<str>),
}

impl fmt::Display for AlgorithmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Uri(uri) => f.write_str(uri),
        }
    }
}

impl From<BuiltInAlgorithm> for AlgorithmRef {
    fn from(algorithm: BuiltInAlgorithm) -> Self {
        Self::Id(algorithm.id())
    }
}

/// Built-in algorithms plus the application algorithms of one encoder.
///
/// Application algorithms receive identifiers in registration order starting
/// at 32. Cloning is cheap; the converters are shared.
#[derive(Clone, Default)]
pub struct AlgorithmRegistry {
    applications: FastIndexMap<Arc<str>, Arc<dyn EncodingAlgorithm>>,
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("applications", &self.applications.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an application algorithm and returns its identifier.
    /// Registering a URI again replaces the converter and keeps the identifier.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for an empty URI, `IntegerOutOfRange` when all
    /// application identifiers are taken.
    pub fn register(&mut self, uri: &str, algorithm: Arc<dyn EncodingAlgorithm>) -> Result<u32> {
        if uri.is_empty() {
            return Err(Error::InvalidValue("encoding algorithm URI must not be empty".into()));
        }
        if let Some((position, _, slot)) = self.applications.get_full_mut(uri) {
            *slot = algorithm;
            return Ok(FIRST_APPLICATION_ALGORITHM + position as u32);
        }
        let id = FIRST_APPLICATION_ALGORITHM + self.applications.len() as u32;
        if id > LAST_APPLICATION_ALGORITHM {
            return Err(Error::IntegerOutOfRange(u64::from(id)));
        }
        self.applications.insert(uri.into(), algorithm);
        log::debug!("registered encoding algorithm {id} for {uri}");
        Ok(id)
    }

    /// Looks up a built-in algorithm.
    ///
    /// # Errors
    ///
    /// `ReservedAlgorithmIdentifier` for 10..=31, `AlgorithmNotRegistered`
    /// for application identifiers.
    pub fn builtin(id: u32) -> Result<BuiltInAlgorithm> {
        if let Some(algorithm) = BuiltInAlgorithm::from_id(id) {
            return Ok(algorithm);
        }
        if id <= LAST_RESERVED_ALGORITHM {
            return Err(Error::ReservedAlgorithmIdentifier(id));
        }
        Err(Error::algorithm_not_registered(format!("#{id}")))
    }

    /// Looks up an application algorithm by URI.
    pub fn application(&self, uri: &str) -> Result<(u32, &dyn EncodingAlgorithm)> {
        match self.applications.get_full(uri) {
            Some((position, _, algorithm)) => Ok((FIRST_APPLICATION_ALGORITHM + position as u32, algorithm.as_ref())),
            None => Err(Error::algorithm_not_registered(uri.to_owned())),
        }
    }

    /// Resolves any identifier to its converter.
    ///
    /// # Errors
    ///
    /// `ReservedAlgorithmIdentifier` for 10..=31, `AlgorithmNotRegistered` for
    /// an unused application identifier, `IntegerOutOfRange` above 255.
    pub fn resolve(&self, id: u32) -> Result<&dyn EncodingAlgorithm> {
        if id <= LAST_BUILT_IN_ALGORITHM {
            return Ok(Self::builtin(id)?.instance());
        }
        if id <= LAST_RESERVED_ALGORITHM {
            return Err(Error::ReservedAlgorithmIdentifier(id));
        }
        if id > LAST_APPLICATION_ALGORITHM {
            return Err(Error::IntegerOutOfRange(u64::from(id)));
        }
        self.applications
            .get_index((id - FIRST_APPLICATION_ALGORITHM) as usize)
            .map(|(_, algorithm)| algorithm.as_ref())
            .ok_or_else(|| Error::algorithm_not_registered(format!("#{id}")))
    }

    /// Resolves an [`AlgorithmRef`] to identifier and converter.
    pub fn lookup(&self, reference: &AlgorithmRef) -> Result<(u32, &dyn EncodingAlgorithm)> {
        match reference {
            AlgorithmRef::Id(id) => Ok((*id, self.resolve(*id)?)),
            AlgorithmRef::Uri(uri) => self.application(uri),
        }
    }

    /// Application URIs in identifier order.
    pub fn uris(&self) -> impl ExactSizeIterator<Item = &str> {
        self.applications.keys().map(AsRef::as_ref)
    }

    pub fn application_count(&self) -> usize {
        self.applications.len()
    }
}
