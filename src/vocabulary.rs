//! Vocabulary: the full set of tables for one encoding session (X.891 8.2).
//!
//! A [`Vocabulary`] owns one [`StringTable`] per table kind plus the element
//! and attribute [`QualifiedNameTable`]s. Freezing it with
//! [`Vocabulary::share`] yields a [`SharedVocabulary`] that any number of
//! encoders, on any number of threads, can use as their read-only parent.
//!
//! # Beispiel
//!
//! ```
//! use fastinfoset::vocabulary::Vocabulary;
//! use fastinfoset::string_table::TableKind;
//!
//! let mut base = Vocabulary::new();
//! base.add_namespace_binding("inv", "urn:inventory").unwrap();
//! base.add_element_name("urn:inventory", "inv:item", "item").unwrap();
//! let shared = base.share();
//!
//! let mut local = Vocabulary::layered(&shared);
//! assert_eq!(local.lookup(TableKind::LocalName, "item"), Some(0));
//! assert_eq!(local.intern_string(TableKind::LocalName, "price").unwrap(), 1);
//! ```

use std::sync::Arc;

use crate::alphabet;
use crate::constants::{XML_NAMESPACE, XML_PREFIX};
use crate::qname::{self, NameTableKind, QualifiedName, QualifiedNameEntry, QualifiedNameTable};
use crate::string_table::{StringTable, TableKind};
use crate::{Error, Result};

const PREFIX_BUILTINS: &[&str] = &[XML_PREFIX];
const NAMESPACE_BUILTINS: &[&str] = &[XML_NAMESPACE];

/// Mutable vocabulary owned by one encoder (or being prepared for sharing).
#[derive(Debug, Clone)]
pub struct Vocabulary {
    tables: Vec<StringTable>,
    element_names: QualifiedNameTable,
    attribute_names: QualifiedNameTable,
    parent: Option<SharedVocabulary>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary {
    /// Creates a root vocabulary: `xml` and its namespace sit at index 0.
    pub fn new() -> Self {
        let tables = TableKind::ALL
            .iter()
            .map(|&kind| match kind {
                TableKind::Prefix => StringTable::with_builtins(kind, PREFIX_BUILTINS),
                TableKind::NamespaceName => StringTable::with_builtins(kind, NAMESPACE_BUILTINS),
                _ => StringTable::new(kind),
            })
            .collect();
        Self {
            tables,
            element_names: QualifiedNameTable::new(NameTableKind::Element),
            attribute_names: QualifiedNameTable::new(NameTableKind::Attribute),
            parent: None,
        }
    }

    /// Creates an empty local layer on top of a shared vocabulary.
    pub fn layered(parent: &SharedVocabulary) -> Self {
        let mut vocabulary = Self::new();
        // Kann nicht fehlschlagen: Tabellenarten stammen aus derselben Aufzählung
        for kind in TableKind::ALL {
            let table = &mut vocabulary.tables[kind.slot()];
            if table.set_read_only_parent(Arc::clone(parent.table(kind))).is_err() {
                unreachable!("table kinds are aligned by slot");
            }
        }
        if vocabulary.element_names.set_read_only_parent(Arc::clone(&parent.inner.element_names)).is_err()
            || vocabulary.attribute_names.set_read_only_parent(Arc::clone(&parent.inner.attribute_names)).is_err()
        {
            unreachable!("name table kinds are fixed");
        }
        vocabulary.parent = Some(parent.clone());
        vocabulary
    }

    /// The shared vocabulary this one is layered on.
    pub fn parent(&self) -> Option<&SharedVocabulary> {
        self.parent.as_ref()
    }

    /// Binds a read-only parent to a single table.
    ///
    /// # Errors
    ///
    /// `InvalidVocabularyBinding` when `parent` is not a `kind` table.
    pub fn set_read_only_parent(&mut self, kind: TableKind, parent: Arc<StringTable>) -> Result<()> {
        self.tables[kind.slot()].set_read_only_parent(parent)
    }

    /// Binds a read-only parent to the element or attribute name table.
    pub fn set_read_only_name_parent(
        &mut self,
        kind: NameTableKind,
        parent: Arc<QualifiedNameTable>,
    ) -> Result<()> {
        self.names_mut(kind).set_read_only_parent(parent)
    }

    pub fn table(&self, kind: TableKind) -> &StringTable {
        &self.tables[kind.slot()]
    }

    pub fn table_mut(&mut self, kind: TableKind) -> &mut StringTable {
        &mut self.tables[kind.slot()]
    }

    pub fn names(&self, kind: NameTableKind) -> &QualifiedNameTable {
        match kind {
            NameTableKind::Element => &self.element_names,
            NameTableKind::Attribute => &self.attribute_names,
        }
    }

    pub fn names_mut(&mut self, kind: NameTableKind) -> &mut QualifiedNameTable {
        match kind {
            NameTableKind::Element => &mut self.element_names,
            NameTableKind::Attribute => &mut self.attribute_names,
        }
    }

    /// Returns the index of `value` in `kind`, adding it when absent.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for the empty string.
    pub fn intern_string(&mut self, kind: TableKind, value: &str) -> Result<usize> {
        self.table_mut(kind).intern(value)
    }

    /// Read-only lookup, parent first.
    pub fn lookup(&self, kind: TableKind, value: &str) -> Option<usize> {
        self.table(kind).lookup(value)
    }

    /// Variant list for `local_name` in the element or attribute name table.
    pub fn obtain_qualified_name_entry(
        &mut self,
        kind: NameTableKind,
        local_name: &str,
    ) -> QualifiedNameEntry<'_> {
        self.names_mut(kind).obtain_entry(local_name)
    }

    /// Indexes a prefix and its namespace name; empty parts are skipped.
    pub fn add_namespace_binding(&mut self, prefix: &str, namespace_name: &str) -> Result<()> {
        if !prefix.is_empty() {
            self.intern_string(TableKind::Prefix, prefix)?;
        }
        if !namespace_name.is_empty() {
            self.intern_string(TableKind::NamespaceName, namespace_name)?;
        }
        Ok(())
    }

    /// Adds an element name; its prefix and namespace must already be indexed.
    pub fn add_element_name(&mut self, namespace_name: &str, qname: &str, local_name: &str) -> Result<QualifiedName> {
        self.add_name(NameTableKind::Element, namespace_name, qname, local_name)
    }

    /// Adds an attribute name; its prefix and namespace must already be indexed.
    pub fn add_attribute_name(&mut self, namespace_name: &str, qname: &str, local_name: &str) -> Result<QualifiedName> {
        self.add_name(NameTableKind::Attribute, namespace_name, qname, local_name)
    }

    fn add_name(
        &mut self,
        kind: NameTableKind,
        namespace_name: &str,
        qname: &str,
        local_name: &str,
    ) -> Result<QualifiedName> {
        let prefix = qname::validate(namespace_name, qname, local_name)?;
        // Surrogate brauchen Indizes für Prefix und Namespace
        if !namespace_name.is_empty() && self.lookup(TableKind::NamespaceName, namespace_name).is_none() {
            return Err(Error::unresolved_namespace(prefix.to_owned(), namespace_name.to_owned()));
        }
        if !prefix.is_empty() && self.lookup(TableKind::Prefix, prefix).is_none() {
            return Err(Error::unresolved_namespace(prefix.to_owned(), namespace_name.to_owned()));
        }
        self.intern_string(TableKind::LocalName, local_name)?;
        let entry = self.obtain_qualified_name_entry(kind, local_name);
        if let Some(existing) = entry.find(prefix, namespace_name) {
            return Ok(existing.clone());
        }
        Ok(entry.add(prefix, namespace_name))
    }

    /// Adds a restricted alphabet and returns its wire identifier.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for an unusable alphabet, `IntegerOutOfRange` once the
    /// identifier would exceed 255.
    pub fn add_restricted_alphabet(&mut self, characters: &str) -> Result<u32> {
        alphabet::validate(characters)?;
        let index = self.intern_string(TableKind::RestrictedAlphabet, characters)?;
        let id = alphabet::FIRST_VOCABULARY_ALPHABET as u64 + index as u64;
        if id > u64::from(alphabet::LAST_ALPHABET) {
            return Err(Error::IntegerOutOfRange(id));
        }
        Ok(id as u32)
    }

    /// Characters of the alphabet with wire identifier `id`.
    pub fn restricted_alphabet(&self, id: u32) -> Option<&str> {
        alphabet::builtin(id).or_else(|| {
            let index = id.checked_sub(alphabet::FIRST_VOCABULARY_ALPHABET)?;
            self.table(TableKind::RestrictedAlphabet).get(index as usize)
        })
    }

    /// Drops every local entry when `clear_local` is set; indices then restart
    /// right after the parent's range. `false` keeps the vocabulary for the
    /// next document.
    pub fn reset(&mut self, clear_local: bool) {
        if !clear_local {
            return;
        }
        for table in &mut self.tables {
            table.clear();
        }
        self.element_names.clear();
        self.attribute_names.clear();
    }

    /// Freezes this vocabulary for use as a read-only parent.
    pub fn share(self) -> SharedVocabulary {
        self.freeze(None)
    }

    /// Freezes this vocabulary as an external vocabulary named by `uri`.
    ///
    /// Documents then announce only the URI; readers must know the entries.
    pub fn share_external(self, uri: &str) -> SharedVocabulary {
        self.freeze(Some(uri.into()))
    }

    fn freeze(self, external_uri: Option<Arc<str>>) -> SharedVocabulary {
        SharedVocabulary {
            inner: Arc::new(SharedInner {
                tables: self.tables.into_iter().map(Arc::new).collect(),
                element_names: Arc::new(self.element_names),
                attribute_names: Arc::new(self.attribute_names),
                external_uri,
            }),
        }
    }
}

#[derive(Debug)]
struct SharedInner {
    tables: Vec<Arc<StringTable>>,
    element_names: Arc<QualifiedNameTable>,
    attribute_names: Arc<QualifiedNameTable>,
    external_uri: Option<Arc<str>>,
}

/// Frozen vocabulary; cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct SharedVocabulary {
    inner: Arc<SharedInner>,
}

impl SharedVocabulary {
    pub fn table(&self, kind: TableKind) -> &Arc<StringTable> {
        &self.inner.tables[kind.slot()]
    }

    pub fn names(&self, kind: NameTableKind) -> &Arc<QualifiedNameTable> {
        match kind {
            NameTableKind::Element => &self.inner.element_names,
            NameTableKind::Attribute => &self.inner.attribute_names,
        }
    }

    /// URI under which readers know this vocabulary, if external.
    pub fn external_uri(&self) -> Option<&str> {
        self.inner.external_uri.as_deref()
    }

    /// True when no table holds anything beyond the implicit `xml` entries.
    pub fn is_empty(&self) -> bool {
        TableKind::ALL.iter().all(|&kind| {
            let table = self.table(kind);
            table.len() == table.builtin_len()
        }) && self.inner.element_names.is_empty()
            && self.inner.attribute_names.is_empty()
    }
}
