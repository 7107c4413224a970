//! Encoder options.
//!
//! Controls which information items reach the stream and which strings are
//! candidates for the attribute-value and character-chunk tables.
//!
//! # Beispiel
//!
//! ```
//! use fastinfoset::options::EncoderOptions;
//!
//! let opts = EncoderOptions::default()
//!     .with_ignore_comments()
//!     .with_character_content_chunk_size_constraint(8);
//!
//! assert!(opts.ignore_comments());
//! assert_eq!(opts.character_content_chunk_size_constraint(), 8);
//! assert_eq!(opts.attribute_value_size_constraint(), 32);
//! ```

/// Default: Strings mit weniger als 32 Zeichen kommen in die Tabelle.
pub const DEFAULT_SIZE_CONSTRAINT: usize = 32;

/// Options controlling one [`Encoder`](crate::encoder::Encoder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    pub(crate) xml_declaration: bool,
    pub(crate) ignore_whitespace: bool,
    pub(crate) ignore_comments: bool,
    pub(crate) ignore_processing_instructions: bool,
    pub(crate) ignore_dtd: bool,
    pub(crate) attribute_value_size_constraint: usize,
    pub(crate) character_content_chunk_size_constraint: usize,
    pub(crate) retain_vocabulary: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            xml_declaration: false,
            ignore_whitespace: false,
            ignore_comments: false,
            ignore_processing_instructions: false,
            ignore_dtd: false,
            attribute_value_size_constraint: DEFAULT_SIZE_CONSTRAINT,
            character_content_chunk_size_constraint: DEFAULT_SIZE_CONSTRAINT,
            retain_vocabulary: false,
        }
    }
}

impl EncoderOptions {
    // --- Getter ---

    /// Prefix the stream with `<?xml encoding='finf'?>` (X.891 12.3).
    pub fn xml_declaration(&self) -> bool { self.xml_declaration }
    /// Whitespace-only character runs are dropped.
    pub fn ignore_whitespace(&self) -> bool { self.ignore_whitespace }
    pub fn ignore_comments(&self) -> bool { self.ignore_comments }
    pub fn ignore_processing_instructions(&self) -> bool { self.ignore_processing_instructions }
    /// DOCTYPE and unexpanded entity references are dropped.
    pub fn ignore_dtd(&self) -> bool { self.ignore_dtd }
    /// Attribute values shorter than this (in characters) are added to the table.
    pub fn attribute_value_size_constraint(&self) -> usize { self.attribute_value_size_constraint }
    /// Character chunks shorter than this (in characters) are added to the table.
    pub fn character_content_chunk_size_constraint(&self) -> usize { self.character_content_chunk_size_constraint }
    /// The local vocabulary survives into the next document.
    pub fn retain_vocabulary(&self) -> bool { self.retain_vocabulary }

    // --- Builder ---

    pub fn with_xml_declaration(mut self) -> Self { self.xml_declaration = true; self }
    pub fn with_ignore_whitespace(mut self) -> Self { self.ignore_whitespace = true; self }
    pub fn with_ignore_comments(mut self) -> Self { self.ignore_comments = true; self }
    pub fn with_ignore_processing_instructions(mut self) -> Self { self.ignore_processing_instructions = true; self }
    pub fn with_ignore_dtd(mut self) -> Self { self.ignore_dtd = true; self }
    pub fn with_attribute_value_size_constraint(mut self, len: usize) -> Self { self.attribute_value_size_constraint = len; self }
    pub fn with_character_content_chunk_size_constraint(mut self, len: usize) -> Self { self.character_content_chunk_size_constraint = len; self }
    pub fn with_retain_vocabulary(mut self) -> Self { self.retain_vocabulary = true; self }

    // --- Setter ---

    pub fn set_xml_declaration(&mut self, val: bool) { self.xml_declaration = val; }
    pub fn set_ignore_whitespace(&mut self, val: bool) { self.ignore_whitespace = val; }
    pub fn set_ignore_comments(&mut self, val: bool) { self.ignore_comments = val; }
    pub fn set_ignore_processing_instructions(&mut self, val: bool) { self.ignore_processing_instructions = val; }
    pub fn set_ignore_dtd(&mut self, val: bool) { self.ignore_dtd = val; }
    pub fn set_attribute_value_size_constraint(&mut self, len: usize) { self.attribute_value_size_constraint = len; }
    pub fn set_character_content_chunk_size_constraint(&mut self, len: usize) { self.character_content_chunk_size_constraint = len; }
    pub fn set_retain_vocabulary(&mut self, val: bool) { self.retain_vocabulary = val; }

    /// True when an attribute value of this length goes into the table.
    pub(crate) fn indexes_attribute_value(&self, value: &str) -> bool {
        below(value, self.attribute_value_size_constraint)
    }

    /// True when a character chunk of this length goes into the table.
    pub(crate) fn indexes_character_chunk(&self, text: &str) -> bool {
        below(text, self.character_content_chunk_size_constraint)
    }
}

/// Zeichenlänge strikt kleiner als `limit`, ohne den ganzen String zu zählen.
fn below(value: &str, limit: usize) -> bool {
    value.len() < limit || value.chars().take(limit).count() < limit
}
