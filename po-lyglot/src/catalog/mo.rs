//! Compilation into the binary `.mo` format
//!
//! Layout (all integers little-endian u32):
//!
//! | offset | content |
//! |--------|---------|
//! | 0  | magic `0x950412de` |
//! | 4  | revision (0) |
//! | 8  | number of strings N |
//! | 12 | offset of the original strings table |
//! | 16 | offset of the translated strings table |
//! | 20 | hash table size (0, no hash table) |
//! | 24 | hash table offset |
//!
//! Each table holds N (length, offset) pairs; keys are sorted bytewise as
//! required by the lookup in GNU gettext.

use crate::catalog::Catalog;

pub const MO_MAGIC: u32 = 0x950412de;
const HEADER_SIZE: u32 = 28;

/// Build the key/value pairs that go into the `.mo` file.
///
/// Fuzzy, obsolete and untranslated entries are left out, as `msgfmt` does.
/// The header is always present under the empty key.
pub fn compiled_messages(catalog: &Catalog) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut messages = vec![(Vec::new(), catalog.header_msgstr().into_bytes())];

    for entry in catalog.entries() {
        if entry.obsolete || entry.msgid.is_empty() || entry.is_fuzzy() || !entry.is_translated() {
            continue;
        }
        let mut key = Vec::new();
        if let Some(ctx) = &entry.msgctxt {
            key.extend_from_slice(ctx.as_bytes());
            key.push(0x04);
        }
        key.extend_from_slice(entry.msgid.as_bytes());

        let value = match &entry.msgid_plural {
            Some(plural) => {
                key.push(0);
                key.extend_from_slice(plural.as_bytes());
                entry.msgstr_plural.join("\0").into_bytes()
            }
            None => entry.msgstr.clone().into_bytes(),
        };
        messages.push((key, value));
    }

    messages.sort_by(|a, b| a.0.cmp(&b.0));
    messages.dedup_by(|a, b| a.0 == b.0);
    messages
}

/// Serialise a catalog into `.mo` bytes
pub fn to_mo_bytes(catalog: &Catalog) -> Vec<u8> {
    let messages = compiled_messages(catalog);
    let n = messages.len() as u32;
    let originals_offset = HEADER_SIZE;
    let translations_offset = originals_offset + n * 8;
    let strings_offset = translations_offset + n * 8;

    let mut tables = Vec::with_capacity((n * 16) as usize);
    let mut strings = Vec::new();
    let mut descriptors = |pick: fn(&(Vec<u8>, Vec<u8>)) -> &Vec<u8>| {
        let mut table = Vec::with_capacity(messages.len() * 8);
        for message in &messages {
            let bytes = pick(message);
            let offset = strings_offset + strings.len() as u32;
            table.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            table.extend_from_slice(&offset.to_le_bytes());
            strings.extend_from_slice(bytes);
            strings.push(0);
        }
        table
    };
    tables.extend(descriptors(|m| &m.0));
    tables.extend(descriptors(|m| &m.1));

    let mut out = Vec::with_capacity(HEADER_SIZE as usize + tables.len() + strings.len());
    for word in [
        MO_MAGIC,
        0,
        n,
        originals_offset,
        translations_offset,
        0,
        strings_offset,
    ] {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out.extend_from_slice(&tables);
    out.extend_from_slice(&strings);
    out
}
