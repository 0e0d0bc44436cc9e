//! Gettext catalogs
//!
//! A [`Catalog`] is the header (banner comment and `Key: Value` metadata)
//! followed by the message entries in file order. It reads and writes the
//! textual `.po` format and compiles to the binary `.mo` format.

pub mod entry;
pub mod mo;
pub mod po;

use std::fs;
use std::path::Path;

pub use entry::CatalogEntry;

use crate::error::CatalogError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Comment lines above the header entry
    header_comment: Option<String>,
    header_flags: Vec<String>,
    /// Header fields, in file order
    metadata: Vec<(String, String)>,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `.po` text
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new();
        let mut entries = po::parse_entries(content)?.into_iter();

        let mut first = entries.next();
        if let Some(header) = first.take_if(|e| e.is_header()) {
            catalog.header_comment = header.translator_comment;
            catalog.header_flags = header.flags;
            catalog.metadata = parse_metadata(&header.msgstr);
        }
        catalog.entries = first.into_iter().chain(entries).collect();
        Ok(catalog)
    }

    /// Read and parse a `.po` file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Write the catalog as a `.po` file
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        fs::write(path, self.to_po_string()).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compile the catalog into a `.mo` file
    pub fn save_as_mo(&self, path: &Path) -> Result<(), CatalogError> {
        fs::write(path, mo::to_mo_bytes(self)).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_po_string(&self) -> String {
        let mut out = String::new();
        if self.has_header() {
            let header = CatalogEntry {
                translator_comment: self.header_comment.clone(),
                flags: self.header_flags.clone(),
                ..CatalogEntry::new("", self.header_msgstr())
            };
            po::write_entry(&mut out, &header);
        }
        for entry in &self.entries {
            if !out.is_empty() {
                out.push('\n');
            }
            po::write_entry(&mut out, entry);
        }
        out
    }

    fn has_header(&self) -> bool {
        self.header_comment.is_some() || !self.header_flags.is_empty() || !self.metadata.is_empty()
    }

    /// Metadata rendered as the header `msgstr`
    pub fn header_msgstr(&self) -> String {
        self.metadata
            .iter()
            .map(|(key, value)| format!("{key}: {value}\n"))
            .collect()
    }

    pub fn header_comment(&self) -> Option<&str> {
        self.header_comment.as_deref()
    }

    pub fn set_header_comment(&mut self, comment: impl Into<String>) {
        self.header_comment = Some(comment.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a header field, keeping its position when it already exists
    pub fn set_metadata(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.metadata.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.metadata.push((key.to_string(), value)),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [CatalogEntry] {
        &mut self.entries
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    /// Live entry with the given context and identifier
    pub fn find(&self, msgctxt: Option<&str>, msgid: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| !e.obsolete && e.msgid == msgid && e.msgctxt.as_deref() == msgctxt)
    }

    /// Number of entries, obsolete ones excluded
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.obsolete).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_metadata(msgstr: &str) -> Vec<(String, String)> {
    msgstr
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
