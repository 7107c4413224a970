//! Reserved bit patterns of the Fast Infoset byte stream (X.891 7, Annex C).
//!
//! Alle Konstanten sind als volle Oktette notiert: ein Tag belegt die hohen
//! Bits, die niedrigen Bits gehören Flags oder dem Anfang einer Ganzzahl.

// ============================================================================
// Header (X.891 12.6, 12.7)
// ============================================================================

/// Fixed four-octet header: identification `1110 0000 0000 0000` + version 1.
pub const HEADER: [u8; 4] = [0xE0, 0x00, 0x00, 0x01];

/// Optional XML declaration preceding the header.
pub const XML_DECLARATION: &[u8] = b"<?xml encoding='finf'?>";

// Document optional components (erstes Oktett nach dem Header).
pub const DOCUMENT_INITIAL_VOCABULARY_FLAG: u8 = 0x10;
pub const DOCUMENT_NOTATIONS_FLAG: u8 = 0x08;
pub const DOCUMENT_UNPARSED_ENTITIES_FLAG: u8 = 0x04;
pub const DOCUMENT_STANDALONE_FLAG: u8 = 0x02;
pub const DOCUMENT_VERSION_FLAG: u8 = 0x01;

// ============================================================================
// Initial vocabulary (X.891 7.2.5)
// ============================================================================

// Erstes Oktett: drei Padding-Bits, dann fünf Flags.
pub const INITIAL_VOCABULARY_EXTERNAL_VOCABULARY_FLAG: u8 = 0x10;
pub const INITIAL_VOCABULARY_RESTRICTED_ALPHABETS_FLAG: u8 = 0x08;
pub const INITIAL_VOCABULARY_ENCODING_ALGORITHMS_FLAG: u8 = 0x04;
pub const INITIAL_VOCABULARY_PREFIXES_FLAG: u8 = 0x02;
pub const INITIAL_VOCABULARY_NAMESPACE_NAMES_FLAG: u8 = 0x01;
// Zweites Oktett.
pub const INITIAL_VOCABULARY_LOCAL_NAMES_FLAG: u8 = 0x80;
pub const INITIAL_VOCABULARY_OTHER_NCNAMES_FLAG: u8 = 0x40;
pub const INITIAL_VOCABULARY_OTHER_URIS_FLAG: u8 = 0x20;
pub const INITIAL_VOCABULARY_ATTRIBUTE_VALUES_FLAG: u8 = 0x10;
pub const INITIAL_VOCABULARY_CONTENT_CHARACTER_CHUNKS_FLAG: u8 = 0x08;
pub const INITIAL_VOCABULARY_OTHER_STRINGS_FLAG: u8 = 0x04;
pub const INITIAL_VOCABULARY_ELEMENT_NAME_SURROGATES_FLAG: u8 = 0x02;
pub const INITIAL_VOCABULARY_ATTRIBUTE_NAME_SURROGATES_FLAG: u8 = 0x01;

/// Name surrogate presence flags (X.891 7.15).
pub const NAME_SURROGATE_PREFIX_FLAG: u8 = 0x02;
pub const NAME_SURROGATE_NAME_FLAG: u8 = 0x01;

// ============================================================================
// Document-level items (X.891 7.2, 7.5, 7.6, 7.7, 7.8)
// ============================================================================

pub const NOTATIONS: u8 = 0xC0;
pub const NOTATIONS_MASK: u8 = 0xFC;
pub const NOTATIONS_SYSTEM_IDENTIFIER_FLAG: u8 = 0x02;
pub const NOTATIONS_PUBLIC_IDENTIFIER_FLAG: u8 = 0x01;

pub const UNPARSED_ENTITIES: u8 = 0xD0;
pub const UNPARSED_ENTITIES_MASK: u8 = 0xFE;
pub const UNPARSED_ENTITIES_PUBLIC_IDENTIFIER_FLAG: u8 = 0x01;

pub const PROCESSING_INSTRUCTION: u8 = 0xE1;
pub const COMMENT: u8 = 0xE2;

pub const DOCUMENT_TYPE_DECLARATION: u8 = 0xC4;
pub const DOCUMENT_TYPE_SYSTEM_IDENTIFIER_FLAG: u8 = 0x02;
pub const DOCUMENT_TYPE_PUBLIC_IDENTIFIER_FLAG: u8 = 0x01;

// ============================================================================
// Element and attribute items (X.891 7.3, 7.4, 7.12)
// ============================================================================

/// Element item: first bit `0`.
pub const ELEMENT: u8 = 0x00;
/// Second bit of an element item: attributes follow.
pub const ELEMENT_ATTRIBUTE_FLAG: u8 = 0x40;
/// Bits 3-8 `111000`: namespace attributes precede the qualified name.
pub const ELEMENT_NAMESPACES_FLAG: u8 = 0x38;
/// Bits 3-6 `1111`: literal qualified name follows.
pub const ELEMENT_LITERAL_QNAME_FLAG: u8 = 0x3C;

pub const NAMESPACE_ATTRIBUTE: u8 = 0xCC;
pub const NAMESPACE_ATTRIBUTE_MASK: u8 = 0xFC;
pub const NAMESPACE_ATTRIBUTE_PREFIX_FLAG: u8 = 0x02;
pub const NAMESPACE_ATTRIBUTE_NAME_FLAG: u8 = 0x01;

/// Attribute literal qualified name: bits 2-6 `11110`.
pub const ATTRIBUTE_LITERAL_QNAME_FLAG: u8 = 0x78;

pub const LITERAL_QNAME_PREFIX_FLAG: u8 = 0x02;
pub const LITERAL_QNAME_NAMESPACE_NAME_FLAG: u8 = 0x01;

// ============================================================================
// Character content (X.891 7.7, 7.13, C.15)
// ============================================================================

/// Character chunk: bits 1-2 `10`.
pub const CHARACTER_CHUNK: u8 = 0x80;
pub const CHARACTER_CHUNK_ADD_TO_TABLE_FLAG: u8 = 0x10;
/// Third bit: the chunk is a table index (C.28 on the fourth bit follows).
pub const CHARACTER_CHUNK_INDEX_FLAG: u8 = 0x20;
pub const CHARACTER_CHUNK_UTF8_FLAG: u8 = 0x00;
pub const CHARACTER_CHUNK_RESTRICTED_ALPHABET_FLAG: u8 = 0x08;
pub const CHARACTER_CHUNK_ENCODING_ALGORITHM_FLAG: u8 = 0x0C;

pub const UNEXPANDED_ENTITY_REFERENCE: u8 = 0xC8;
pub const UNEXPANDED_ENTITY_REFERENCE_MASK: u8 = 0xFC;
pub const UNEXPANDED_ENTITY_SYSTEM_IDENTIFIER_FLAG: u8 = 0x02;
pub const UNEXPANDED_ENTITY_PUBLIC_IDENTIFIER_FLAG: u8 = 0x01;

// ============================================================================
// Strings (X.891 C.13, C.14)
// ============================================================================

/// Non-identifying string on the first bit: literal to be added to its table.
pub const NISTRING_ADD_TO_TABLE_FLAG: u8 = 0x40;
pub const NISTRING_UTF8_FLAG: u8 = 0x00;
pub const NISTRING_RESTRICTED_ALPHABET_FLAG: u8 = 0x20;
pub const NISTRING_ENCODING_ALGORITHM_FLAG: u8 = 0x30;
/// Index form of a non-identifying string on the first bit.
pub const NISTRING_INDEX_FLAG: u8 = 0x80;
/// Empty non-identifying string: `1` followed by seven `1` bits (C.26).
pub const NISTRING_EMPTY: u8 = 0xFF;

// ============================================================================
// Termination (X.891 7.2.19, 7.3.6)
// ============================================================================

pub const TERMINATOR: u8 = 0xF0;
pub const DOUBLE_TERMINATOR: u8 = 0xFF;

// ============================================================================
// Tier breakpoints (X.891 C.21-C.28)
// ============================================================================

/// Largest integer any tier can carry: 2^20.
pub const INTEGER_MAXIMUM: u32 = 1 << 20;
/// Largest octet-string length: 2^32.
pub const OCTET_STRING_LENGTH_MAXIMUM: u64 = 1 << 32;

// C.21: sequence length.
pub const SEQUENCE_LENGTH_SMALL_LIMIT: u32 = 128;
pub const SEQUENCE_LENGTH_MEDIUM_FLAG: u8 = 0x80;

// C.22: octet-string length starting on the second bit.
pub const OCTET_STRING_LENGTH_2ND_BIT_SMALL_LIMIT: u64 = 64;
pub const OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_LIMIT: u64 = 320;
pub const OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_FLAG: u8 = 0x40;
pub const OCTET_STRING_LENGTH_2ND_BIT_LARGE_FLAG: u8 = 0x60;

// C.23: octet-string length starting on the fifth bit.
pub const OCTET_STRING_LENGTH_5TH_BIT_SMALL_LIMIT: u64 = 8;
pub const OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_LIMIT: u64 = 264;
pub const OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_FLAG: u8 = 0x08;
pub const OCTET_STRING_LENGTH_5TH_BIT_LARGE_FLAG: u8 = 0x0C;

// C.24: octet-string length starting on the seventh bit.
pub const OCTET_STRING_LENGTH_7TH_BIT_SMALL_LIMIT: u64 = 2;
pub const OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_LIMIT: u64 = 258;
pub const OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_FLAG: u8 = 0x02;
pub const OCTET_STRING_LENGTH_7TH_BIT_LARGE_FLAG: u8 = 0x03;

// C.25: integer starting on the second bit.
pub const INTEGER_2ND_BIT_SMALL_LIMIT: u32 = 64;
pub const INTEGER_2ND_BIT_MEDIUM_LIMIT: u32 = 8256;
pub const INTEGER_2ND_BIT_MEDIUM_FLAG: u8 = 0x40;
pub const INTEGER_2ND_BIT_LARGE_FLAG: u8 = 0x60;

// C.27: integer starting on the third bit.
pub const INTEGER_3RD_BIT_SMALL_LIMIT: u32 = 32;
pub const INTEGER_3RD_BIT_MEDIUM_LIMIT: u32 = 2080;
pub const INTEGER_3RD_BIT_LARGE_LIMIT: u32 = 526_368;
pub const INTEGER_3RD_BIT_MEDIUM_FLAG: u8 = 0x20;
pub const INTEGER_3RD_BIT_LARGE_FLAG: u8 = 0x28;
pub const INTEGER_3RD_BIT_LARGE_LARGE_FLAG: u8 = 0x30;

// C.28: integer starting on the fourth bit.
pub const INTEGER_4TH_BIT_SMALL_LIMIT: u32 = 16;
pub const INTEGER_4TH_BIT_MEDIUM_LIMIT: u32 = 1040;
pub const INTEGER_4TH_BIT_LARGE_LIMIT: u32 = 263_184;
pub const INTEGER_4TH_BIT_MEDIUM_FLAG: u8 = 0x10;
pub const INTEGER_4TH_BIT_LARGE_FLAG: u8 = 0x14;
pub const INTEGER_4TH_BIT_LARGE_LARGE_FLAG: u8 = 0x18;

// ============================================================================
// Encoding algorithms and restricted alphabets (X.891 8.3, 8.4)
// ============================================================================

pub const HEXADECIMAL_ALGORITHM: u32 = 0;
pub const BASE64_ALGORITHM: u32 = 1;
pub const SHORT_ALGORITHM: u32 = 2;
pub const INT_ALGORITHM: u32 = 3;
pub const LONG_ALGORITHM: u32 = 4;
pub const BOOLEAN_ALGORITHM: u32 = 5;
pub const FLOAT_ALGORITHM: u32 = 6;
pub const DOUBLE_ALGORITHM: u32 = 7;
pub const UUID_ALGORITHM: u32 = 8;
pub const CDATA_ALGORITHM: u32 = 9;
/// Last built-in algorithm identifier.
pub const LAST_BUILT_IN_ALGORITHM: u32 = CDATA_ALGORITHM;
/// Last reserved identifier; 31 is the escape into the application range.
pub const LAST_RESERVED_ALGORITHM: u32 = 31;
/// First application-defined algorithm identifier.
pub const FIRST_APPLICATION_ALGORITHM: u32 = 32;
/// Identifiers travel in eight bits on the wire.
pub const LAST_APPLICATION_ALGORITHM: u32 = 255;

pub const NUMERIC_ALPHABET: u32 = 0;
pub const DATE_TIME_ALPHABET: u32 = 1;
pub const NUMERIC_CHARACTERS: &str = "0123456789-+.E ";
pub const DATE_TIME_CHARACTERS: &str = "0123456789-:TZ ";

// ============================================================================
// Well-known names (X.891 8.2)
// ============================================================================

pub const XML_PREFIX: &str = "xml";
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS_PREFIX: &str = "xmlns";
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
