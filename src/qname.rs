//! Qualified names and the element/attribute name tables (X.891 7.17, 8.2).
//!
//! A [`QualifiedName`] is identified by `(prefix, namespace_name, local_name)`.
//! A name table entry carries its prefix onto the wire, so the same expanded
//! name under two prefixes occupies two indices.
//!
//! [`QualifiedNameTable`] indexes names by local name. Each local name maps to
//! the short list of variants that share it, so resolving a name during encode
//! is one hash lookup plus a scan over a handful of entries.

use std::fmt;
use std::sync::Arc;

use crate::constants::{XML_NAMESPACE, XML_PREFIX, XMLNS_PREFIX};
use crate::{Error, FastIndexMap, Result};

/// A qualified name with its assigned table index.
#[derive(Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Prefix (empty for none).
    pub prefix: Arc<str>,
    /// Namespace name (empty for no namespace).
    pub namespace_name: Arc<str>,
    /// Local name, never empty.
    pub local_name: Arc<str>,
    /// `prefix:local` or just `local`.
    pub qname: Arc<str>,
    /// Position in the owning element or attribute name table.
    pub index: usize,
}

impl QualifiedName {
    /// Erstellt einen QualifiedName; `qname` wird aus Prefix und Local-Name gebildet.
    pub fn new(prefix: &str, namespace_name: &str, local_name: &str, index: usize) -> Self {
        let qname: Arc<str> = if prefix.is_empty() {
            local_name.into()
        } else {
            format!("{prefix}:{local_name}").into()
        };
        Self {
            prefix: prefix.into(),
            namespace_name: namespace_name.into(),
            local_name: local_name.into(),
            qname,
            index,
        }
    }

    /// Lookup identity: prefix, namespace name and local name.
    #[inline]
    pub fn matches(&self, prefix: &str, namespace_name: &str, local_name: &str) -> bool {
        &*self.local_name == local_name && &*self.namespace_name == namespace_name && &*self.prefix == prefix
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedName({{{}}}{} as {} #{})", self.namespace_name, self.local_name, self.qname, self.index)
    }
}

/// Splits `prefix:local` into its parts. No colon means no prefix.
pub fn split_qname(qname: &str) -> (&str, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", qname),
    }
}

/// Checks that `qname`, `namespace_name` and `local_name` describe one name
/// and returns its prefix.
///
/// # Errors
///
/// `MalformedQualifiedName` when the local name is empty or contains a colon,
/// the qname disagrees with the local name, a prefix has no namespace, or the
/// reserved `xml`/`xmlns` prefixes are misused.
pub fn validate<'a>(namespace_name: &str, qname: &'a str, local_name: &str) -> Result<&'a str> {
    if local_name.is_empty() {
        return Err(Error::malformed_qname(format!("empty local name in '{qname}'")));
    }
    if local_name.contains(':') {
        return Err(Error::malformed_qname(format!("local name '{local_name}' contains a colon")));
    }
    let (prefix, local) = split_qname(qname);
    if local != local_name || (!prefix.is_empty() && local.contains(':')) {
        return Err(Error::malformed_qname(format!(
            "qname '{qname}' does not end in local name '{local_name}'"
        )));
    }
    if !prefix.is_empty() && namespace_name.is_empty() {
        return Err(Error::malformed_qname(format!("prefix '{prefix}' without namespace")));
    }
    if prefix == XML_PREFIX && namespace_name != XML_NAMESPACE {
        return Err(Error::malformed_qname("prefix 'xml' bound to a foreign namespace"));
    }
    if prefix == XMLNS_PREFIX {
        return Err(Error::malformed_qname("prefix 'xmlns' is reserved for declarations"));
    }
    Ok(prefix)
}

/// Unterscheidet Element- und Attribut-Namenstabelle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameTableKind {
    Element,
    Attribute,
}

impl NameTableKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Element => "element name",
            Self::Attribute => "attribute name",
        }
    }
}

/// Element or attribute name table keyed by local name.
#[derive(Debug, Clone)]
pub struct QualifiedNameTable {
    kind: NameTableKind,
    parent: Option<Arc<QualifiedNameTable>>,
    /// Erster lokaler Index (= Größe des Parents).
    offset: usize,
    by_local_name: FastIndexMap<Arc<str>, Vec<QualifiedName>>,
    /// Lokale Namen in Index-Reihenfolge (für Surrogate im Initial Vocabulary).
    names: Vec<QualifiedName>,
}

/// View on all variants sharing one local name, returned by
/// [`QualifiedNameTable::obtain_entry`].
pub struct QualifiedNameEntry<'a> {
    local_name: Arc<str>,
    parent: Option<&'a QualifiedNameTable>,
    variants: &'a mut Vec<QualifiedName>,
    names: &'a mut Vec<QualifiedName>,
    next_index: usize,
}

impl QualifiedNameEntry<'_> {
    /// Finds the variant with this prefix and namespace; inherited entries win.
    pub fn find(&self, prefix: &str, namespace_name: &str) -> Option<&QualifiedName> {
        if let Some(parent) = self.parent
            && let Some(found) = parent.find(prefix, namespace_name, &self.local_name)
        {
            return Some(found);
        }
        self.variants.iter().find(|q| q.matches(prefix, namespace_name, &self.local_name))
    }

    /// Number of variants known for this local name, inherited ones included.
    pub fn len(&self) -> usize {
        self.parent.map_or(0, |p| p.variant_count(&self.local_name)) + self.variants.len()
    }

    /// True when no variant exists yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a new variant under the next free index.
    pub fn add(self, prefix: &str, namespace_name: &str) -> QualifiedName {
        let name = QualifiedName::new(prefix, namespace_name, &self.local_name, self.next_index);
        self.variants.push(name.clone());
        self.names.push(name.clone());
        name
    }
}

impl QualifiedNameTable {
    /// Creates an empty root table.
    pub fn new(kind: NameTableKind) -> Self {
        Self {
            kind,
            parent: None,
            offset: 0,
            by_local_name: FastIndexMap::default(),
            names: Vec::new(),
        }
    }

    pub fn kind(&self) -> NameTableKind {
        self.kind
    }

    /// Binds a read-only parent; local names are dropped.
    ///
    /// # Errors
    ///
    /// `InvalidVocabularyBinding` when an element table is bound to an
    /// attribute table or vice versa.
    pub fn set_read_only_parent(&mut self, parent: Arc<QualifiedNameTable>) -> Result<()> {
        if parent.kind != self.kind {
            return Err(Error::InvalidVocabularyBinding {
                expected: self.kind.name().into(),
                found: parent.kind.name().into(),
            });
        }
        self.offset = parent.len();
        self.parent = Some(parent);
        self.clear();
        Ok(())
    }

    /// Returns (creating if absent) the variant list for `local_name`.
    pub fn obtain_entry(&mut self, local_name: &str) -> QualifiedNameEntry<'_> {
        let slot = match self.by_local_name.get_index_of(local_name) {
            Some(slot) => slot,
            None => self.by_local_name.insert_full(local_name.into(), Vec::new()).0,
        };
        let next_index = self.offset + self.names.len();
        let Some((key, variants)) = self.by_local_name.get_index_mut(slot) else {
            unreachable!("slot {slot} was just resolved");
        };
        QualifiedNameEntry {
            local_name: Arc::clone(key),
            parent: self.parent.as_deref(),
            variants,
            names: &mut self.names,
            next_index,
        }
    }

    /// Read-only lookup by identity.
    pub fn find(&self, prefix: &str, namespace_name: &str, local_name: &str) -> Option<&QualifiedName> {
        if let Some(parent) = &self.parent
            && let Some(found) = parent.find(prefix, namespace_name, local_name)
        {
            return Some(found);
        }
        self.by_local_name
            .get(local_name)
            .and_then(|variants| variants.iter().find(|q| q.matches(prefix, namespace_name, local_name)))
    }

    fn variant_count(&self, local_name: &str) -> usize {
        self.parent.as_ref().map_or(0, |p| p.variant_count(local_name))
            + self.by_local_name.get(local_name).map_or(0, Vec::len)
    }

    /// Returns the name stored at `index`.
    pub fn get(&self, index: usize) -> Option<&QualifiedName> {
        if index < self.offset {
            self.parent.as_ref().and_then(|p| p.get(index))
        } else {
            self.names.get(index - self.offset)
        }
    }

    /// All names in index order, parent first.
    pub fn names(&self) -> Vec<&QualifiedName> {
        let mut out = match &self.parent {
            Some(parent) => parent.names(),
            None => Vec::with_capacity(self.names.len()),
        };
        out.extend(self.names.iter());
        out
    }

    /// Total number of indices in use, parent included.
    pub fn len(&self) -> usize {
        self.offset + self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops local names; indices continue after the parent's range.
    pub fn clear(&mut self) {
        self.by_local_name.clear();
        self.names.clear();
    }
}
