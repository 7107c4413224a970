//! Vocabulary string tables (X.891 8.2, 8.3).
//!
//! Each table maps a string to a small index. Indices are handed out in
//! insertion order and never change. A table can sit on top of a read-only
//! parent: lookups consult the parent first and new entries continue the
//! parent's index space, so documents encoded against a shared baseline pay
//! nothing for its entries.
//!
//! Lifecycle: one local layer per encoder; parents are frozen behind `Arc`
//! and shared between threads.

use std::sync::Arc;

use crate::{Error, FastHashMap, Result};

/// Schwelle ab der Partition von linearer Suche auf HashMap wechselt.
/// Für <64 Einträge ist lineare Suche auf Vec<Arc<str>> schneller als
/// HashMap-Hashing.
const PARTITION_LINEAR_THRESHOLD: usize = 64;

/// The string tables of a vocabulary (X.891 8.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Restricted alphabets defined by the application.
    RestrictedAlphabet,
    Prefix,
    NamespaceName,
    LocalName,
    /// NCNames outside element/attribute names: PI targets, entity and notation names.
    OtherNcName,
    /// System and public identifiers.
    OtherUri,
    AttributeValue,
    CharacterContentChunk,
    /// Comments, PI data and other non-identifying strings.
    OtherString,
}

impl TableKind {
    /// All string tables, in initial-vocabulary order.
    pub const ALL: [TableKind; 9] = [
        TableKind::RestrictedAlphabet,
        TableKind::Prefix,
        TableKind::NamespaceName,
        TableKind::LocalName,
        TableKind::OtherNcName,
        TableKind::OtherUri,
        TableKind::AttributeValue,
        TableKind::CharacterContentChunk,
        TableKind::OtherString,
    ];

    /// Position in [`TableKind::ALL`].
    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    /// Human-readable name used in errors and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::RestrictedAlphabet => "restricted alphabet",
            Self::Prefix => "prefix",
            Self::NamespaceName => "namespace name",
            Self::LocalName => "local name",
            Self::OtherNcName => "other NCName",
            Self::OtherUri => "other URI",
            Self::AttributeValue => "attribute value",
            Self::CharacterContentChunk => "content character chunk",
            Self::OtherString => "other string",
        }
    }
}

/// Ergebnis eines `obtain_index` (X.891 7.13, 7.14).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactIdResult {
    /// String gefunden: Index-Referenz emittieren.
    Hit(usize),
    /// String war neu und wurde mit diesem Index eingetragen: Literal emittieren.
    Miss(usize),
}

/// Generische Partition für String->Index Mapping.
///
/// Für kleine Partitionen (<64 Einträge) wird lineare Suche auf dem
/// entries-Vec verwendet. Ab 64 Einträgen wird lazy ein HashMap angelegt.
#[derive(Debug, Clone, Default)]
struct Partition {
    entries: Vec<Arc<str>>,
    lookup: Option<FastHashMap<Arc<str>, usize>>,
}

impl Partition {
    #[inline]
    fn lookup(&self, value: &str) -> Option<usize> {
        if let Some(ref map) = self.lookup {
            map.get(value).copied()
        } else {
            self.entries.iter().position(|e| &**e == value)
        }
    }

    /// Hängt einen neuen Wert an; Aufrufer hat vorher `lookup` gemacht.
    fn push(&mut self, value: &str) -> usize {
        let id = self.entries.len();
        let arc: Arc<str> = value.into();

        // HashMap lazy anlegen wenn Threshold erreicht
        if self.lookup.is_none() && id + 1 >= PARTITION_LINEAR_THRESHOLD {
            let mut map = FastHashMap::with_capacity_and_hasher(id + 1, Default::default());
            for (i, e) in self.entries.iter().enumerate() {
                map.insert(Arc::clone(e), i);
            }
            map.insert(Arc::clone(&arc), id);
            self.lookup = Some(map);
        } else if let Some(ref mut map) = self.lookup {
            map.insert(Arc::clone(&arc), id);
        }

        self.entries.push(arc);
        id
    }

    fn get(&self, id: usize) -> Option<&str> {
        self.entries.get(id).map(AsRef::as_ref)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.lookup = None;
    }
}

/// One vocabulary table, optionally layered on a read-only parent.
#[derive(Debug, Clone)]
pub struct StringTable {
    kind: TableKind,
    parent: Option<Arc<StringTable>>,
    /// Erster lokaler Index (= Größe des Parents).
    offset: usize,
    /// Implizite Einträge, die jede Wurzel-Tabelle trägt (z.B. "xml").
    builtins: &'static [&'static str],
    local: Partition,
}

impl StringTable {
    /// Creates an empty root table.
    pub fn new(kind: TableKind) -> Self {
        Self::with_builtins(kind, &[])
    }

    /// Creates a root table whose first entries are implicit in every document.
    pub fn with_builtins(kind: TableKind, builtins: &'static [&'static str]) -> Self {
        let mut table = Self {
            kind,
            parent: None,
            offset: 0,
            builtins,
            local: Partition::default(),
        };
        table.seed();
        table
    }

    fn seed(&mut self) {
        for value in self.builtins {
            self.local.push(value);
        }
    }

    /// Which vocabulary table this is.
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Binds a read-only parent. Local entries are dropped and new indices
    /// continue after the parent's range.
    ///
    /// # Errors
    ///
    /// `InvalidVocabularyBinding` if the parent is a different kind of table.
    pub fn set_read_only_parent(&mut self, parent: Arc<StringTable>) -> Result<()> {
        if parent.kind != self.kind {
            return Err(Error::InvalidVocabularyBinding {
                expected: self.kind.name().into(),
                found: parent.kind.name().into(),
            });
        }
        self.offset = parent.len();
        self.parent = Some(parent);
        // Implizite Einträge liegen jetzt im Parent
        self.builtins = &[];
        self.local.clear();
        Ok(())
    }

    /// The read-only parent, if any.
    pub fn parent(&self) -> Option<&Arc<StringTable>> {
        self.parent.as_ref()
    }

    /// Read-only lookup: parent first, then the local layer.
    pub fn lookup(&self, value: &str) -> Option<usize> {
        if let Some(parent) = &self.parent
            && let Some(id) = parent.lookup(value)
        {
            return Some(id);
        }
        self.local.lookup(value).map(|id| id + self.offset)
    }

    /// Returns the index of `value`, adding it locally when absent.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for the empty string, which never gets an index.
    pub fn obtain_index(&mut self, value: &str) -> Result<CompactIdResult> {
        self.check_not_empty(value)?;
        Ok(match self.lookup(value) {
            Some(id) => CompactIdResult::Hit(id),
            None => CompactIdResult::Miss(self.local.push(value) + self.offset),
        })
    }

    /// Shorthand for [`obtain_index`](Self::obtain_index) when only the index matters.
    pub fn intern(&mut self, value: &str) -> Result<usize> {
        match self.obtain_index(value)? {
            CompactIdResult::Hit(id) | CompactIdResult::Miss(id) => Ok(id),
        }
    }

    /// Appends `value` without looking for an existing entry.
    ///
    /// Mirrors what a reader does for every literal flagged "add to table",
    /// so both sides keep identical index spaces.
    pub fn append(&mut self, value: &str) -> Result<usize> {
        self.check_not_empty(value)?;
        Ok(self.local.push(value) + self.offset)
    }

    fn check_not_empty(&self, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(Error::InvalidValue(format!("empty {} string is never indexed", self.kind.name())));
        }
        Ok(())
    }

    /// Returns the string stored at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        if index < self.offset {
            self.parent.as_ref().and_then(|p| p.get(index))
        } else {
            self.local.get(index - self.offset)
        }
    }

    /// Total number of indices in use, parent included.
    pub fn len(&self) -> usize {
        self.offset + self.local.len()
    }

    /// True when neither parent nor local layer hold any entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries every root table carries implicitly.
    pub fn builtin_len(&self) -> usize {
        match &self.parent {
            Some(parent) => parent.builtin_len(),
            None => self.builtins.len(),
        }
    }

    /// Number of entries added on top of the parent.
    pub fn local_len(&self) -> usize {
        self.local.len()
    }

    /// All entries in index order, parent first.
    pub fn entries(&self) -> Vec<&str> {
        let mut out = match &self.parent {
            Some(parent) => parent.entries(),
            None => Vec::with_capacity(self.local.len()),
        };
        out.extend(self.local.entries.iter().map(AsRef::as_ref));
        out
    }

    /// Drops local entries. The parent's range stays reserved.
    pub fn clear(&mut self) {
        self.local.clear();
        self.seed();
    }
}
