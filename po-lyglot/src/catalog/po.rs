//! Reading and writing the textual `.po` format

use crate::catalog::entry::CatalogEntry;
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrPlural(usize),
}

/// Accumulates the lines of one entry until a blank line or a new entry starts
#[derive(Debug, Default)]
struct EntryBuilder {
    entry: CatalogEntry,
    translator_comment: Vec<String>,
    comment: Vec<String>,
    field: Option<Field>,
    has_msgid: bool,
}

impl EntryBuilder {
    fn finish(mut self) -> Option<CatalogEntry> {
        if !self.has_msgid {
            return None;
        }
        if !self.translator_comment.is_empty() {
            self.entry.translator_comment = Some(self.translator_comment.join("\n"));
        }
        if !self.comment.is_empty() {
            self.entry.comment = Some(self.comment.join("\n"));
        }
        Some(self.entry)
    }

    fn append(&mut self, text: String) -> Option<()> {
        let entry = &mut self.entry;
        match self.field? {
            Field::Msgctxt => entry.msgctxt.get_or_insert_with(String::new).push_str(&text),
            Field::Msgid => entry.msgid.push_str(&text),
            Field::MsgidPlural => entry
                .msgid_plural
                .get_or_insert_with(String::new)
                .push_str(&text),
            Field::Msgstr => entry.msgstr.push_str(&text),
            Field::MsgstrPlural(idx) => entry.msgstr_plural.get_mut(idx)?.push_str(&text),
        }
        Some(())
    }
}

/// Parse `.po` text into entries, header included, in file order
pub fn parse_entries(content: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let mut entries = Vec::new();
    let mut current = EntryBuilder::default();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let mut line = raw_line.trim_end();

        if line.trim().is_empty() {
            if let Some(entry) = std::mem::take(&mut current).finish() {
                entries.push(entry);
            }
            continue;
        }

        let mut obsolete = false;
        if let Some(rest) = line.strip_prefix("#~") {
            obsolete = true;
            line = rest.trim_start();
            if line.starts_with('|') {
                continue;
            }
        } else if let Some(rest) = line.strip_prefix('#') {
            // A comment after a complete entry starts a new one
            if current.has_msgid && current.field.is_some_and(|f| f != Field::Msgctxt) {
                if let Some(entry) = std::mem::take(&mut current).finish() {
                    entries.push(entry);
                }
            }
            parse_comment(&mut current, rest);
            continue;
        }

        let keyword_line = line.trim_start();
        if keyword_line.starts_with('"') {
            let text = unquote(keyword_line, line_no)?;
            current.append(text).ok_or_else(|| CatalogError::Syntax {
                line: line_no,
                message: "continuation line outside of a string".to_string(),
            })?;
            continue;
        }

        let (keyword, rest) = keyword_line
            .split_once(char::is_whitespace)
            .ok_or_else(|| CatalogError::Syntax {
                line: line_no,
                message: format!("unexpected line '{}'", keyword_line),
            })?;
        let value = unquote(rest.trim(), line_no)?;

        // msgctxt or msgid after a msgstr starts the next entry
        let starts_entry = keyword == "msgctxt" || keyword == "msgid";
        if starts_entry
            && current.has_msgid
            && !(keyword == "msgid" && current.field == Some(Field::Msgctxt))
        {
            if let Some(entry) = std::mem::take(&mut current).finish() {
                entries.push(entry);
            }
        }
        if obsolete {
            current.entry.obsolete = true;
        }

        match keyword {
            "msgctxt" => {
                current.entry.msgctxt = Some(value);
                current.field = Some(Field::Msgctxt);
            }
            "msgid" => {
                current.entry.msgid = value;
                current.has_msgid = true;
                current.field = Some(Field::Msgid);
            }
            "msgid_plural" => {
                current.entry.msgid_plural = Some(value);
                current.field = Some(Field::MsgidPlural);
            }
            "msgstr" => {
                current.entry.msgstr = value;
                current.field = Some(Field::Msgstr);
            }
            _ => {
                let idx = keyword
                    .strip_prefix("msgstr[")
                    .and_then(|k| k.strip_suffix(']'))
                    .and_then(|k| k.parse::<usize>().ok())
                    .ok_or_else(|| CatalogError::Syntax {
                        line: line_no,
                        message: format!("unknown keyword '{}'", keyword),
                    })?;
                let slots = &mut current.entry.msgstr_plural;
                if slots.len() <= idx {
                    slots.resize(idx + 1, String::new());
                }
                slots[idx] = value;
                current.field = Some(Field::MsgstrPlural(idx));
            }
        }
    }

    if let Some(entry) = current.finish() {
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_comment(current: &mut EntryBuilder, rest: &str) {
    let entry = &mut current.entry;
    if let Some(text) = rest.strip_prefix('.') {
        current.comment.push(text.strip_prefix(' ').unwrap_or(text).to_string());
    } else if let Some(text) = rest.strip_prefix(':') {
        entry
            .references
            .extend(text.split_whitespace().map(str::to_string));
    } else if let Some(text) = rest.strip_prefix(',') {
        for flag in text.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            if !entry.has_flag(flag) {
                entry.flags.push(flag.to_string());
            }
        }
    } else if let Some(text) = rest.strip_prefix('|') {
        entry.previous.push(text.trim_start().to_string());
    } else {
        current
            .translator_comment
            .push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
    }
}

/// Remove the surrounding quotes and resolve the C escape sequences gettext
/// accepts, octal and hexadecimal byte escapes included
fn unquote(s: &str, line: usize) -> Result<String, CatalogError> {
    let inner = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| CatalogError::Syntax {
            line,
            message: format!("expected a quoted string, found '{}'", s),
        })?;

    let syntax = |message: String| CatalogError::Syntax { line, message };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let Some(escaped) = chars.next() else {
            return Err(syntax("dangling backslash at end of string".to_string()));
        };
        let byte = match escaped {
            'n' => b'\n',
            't' => b'\t',
            'r' => b'\r',
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0c,
            'v' => 0x0b,
            '"' => b'"',
            '\'' => b'\'',
            '?' => b'?',
            '\\' => b'\\',
            '0'..='7' => {
                let mut value = escaped as u32 - '0' as u32;
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                u8::try_from(value)
                    .map_err(|_| syntax(format!("octal escape \\{:o} is out of range", value)))?
            }
            'x' => {
                let mut value = 0u32;
                let mut digits = 0;
                while let Some(digit) = chars.peek().and_then(|d| d.to_digit(16)) {
                    value = value * 16 + digit;
                    digits += 1;
                    chars.next();
                    if digits == 2 {
                        break;
                    }
                }
                if digits == 0 {
                    return Err(syntax("\\x escape without hexadecimal digits".to_string()));
                }
                value as u8
            }
            other => return Err(syntax(format!("invalid escape sequence \\{}", other))),
        };
        bytes.push(byte);
    }
    String::from_utf8(bytes).map_err(|_| syntax("escaped bytes are not valid UTF-8".to_string()))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{0b}' => out.push_str("\\v"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

/// Write `keyword "value"`, splitting multi-line values after each `\n`
fn write_string(out: &mut String, prefix: &str, keyword: &str, value: &str) {
    let trimmed = value.strip_suffix('\n').unwrap_or(value);
    if !trimmed.contains('\n') {
        out.push_str(&format!("{prefix}{keyword} \"{}\"\n", escape(value)));
        return;
    }
    out.push_str(&format!("{prefix}{keyword} \"\"\n"));
    for segment in value.split_inclusive('\n') {
        out.push_str(&format!("{prefix}\"{}\"\n", escape(segment)));
    }
}

fn write_comment_lines(out: &mut String, marker: &str, text: &str) {
    for line in text.lines() {
        if line.is_empty() {
            out.push_str(marker.trim_end());
            out.push('\n');
        } else {
            out.push_str(marker);
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// Serialise one entry, without the trailing blank line
pub fn write_entry(out: &mut String, entry: &CatalogEntry) {
    if let Some(comment) = &entry.translator_comment {
        write_comment_lines(out, "# ", comment);
    }
    if let Some(comment) = &entry.comment {
        write_comment_lines(out, "#. ", comment);
    }
    if !entry.references.is_empty() {
        out.push_str(&format!("#: {}\n", entry.references.join(" ")));
    }
    if !entry.flags.is_empty() {
        out.push_str(&format!("#, {}\n", entry.flags.join(", ")));
    }
    for previous in &entry.previous {
        out.push_str(&format!("#| {}\n", previous));
    }

    let prefix = if entry.obsolete { "#~ " } else { "" };
    if let Some(msgctxt) = &entry.msgctxt {
        write_string(out, prefix, "msgctxt", msgctxt);
    }
    write_string(out, prefix, "msgid", &entry.msgid);
    match &entry.msgid_plural {
        Some(plural) => {
            write_string(out, prefix, "msgid_plural", plural);
            if entry.msgstr_plural.is_empty() {
                write_string(out, prefix, "msgstr[0]", "");
                write_string(out, prefix, "msgstr[1]", "");
            }
            for (i, msgstr) in entry.msgstr_plural.iter().enumerate() {
                write_string(out, prefix, &format!("msgstr[{i}]"), msgstr);
            }
        }
        None => write_string(out, prefix, "msgstr", &entry.msgstr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_entries() {
        let entries = parse_entries(
            r#"
msgid "Hello"
msgstr "Bonjour"

msgid "Goodbye"
msgstr "Au revoir"
"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].msgid, "Hello");
        assert_eq!(entries[1].msgstr, "Au revoir");
    }

    #[test]
    fn test_parse_comments_and_flags() {
        let entries = parse_entries(
            r#"# Translator note
#. Extracted note
#: src/app.py:12 src/app.py:40
#, fuzzy, python-format
#| msgid "Helo"
msgid "Hello %s"
msgstr "Bonjour %s"
"#,
        )
        .unwrap();
        let entry = &entries[0];
        assert_eq!(entry.translator_comment.as_deref(), Some("Translator note"));
        assert_eq!(entry.comment.as_deref(), Some("Extracted note"));
        assert_eq!(entry.references, vec!["src/app.py:12", "src/app.py:40"]);
        assert_eq!(entry.flags, vec!["fuzzy", "python-format"]);
        assert_eq!(entry.previous, vec!["msgid \"Helo\""]);
        assert!(entry.is_fuzzy());
    }

    #[test]
    fn test_parse_multiline_and_escapes() {
        let entries = parse_entries(
            r#"msgid ""
"Line one\n"
"Line \"two\""
msgstr "Tab\there\\"
"#,
        )
        .unwrap();
        assert_eq!(entries[0].msgid, "Line one\nLine \"two\"");
        assert_eq!(entries[0].msgstr, "Tab\there\\");
    }

    #[test]
    fn test_parse_plural_and_context() {
        let entries = parse_entries(
            r#"msgctxt "inbox"
msgid "%d message"
msgid_plural "%d messages"
msgstr[0] "%d message"
msgstr[1] "%d messages"
"#,
        )
        .unwrap();
        let entry = &entries[0];
        assert_eq!(entry.msgctxt.as_deref(), Some("inbox"));
        assert_eq!(entry.msgid_plural.as_deref(), Some("%d messages"));
        assert_eq!(entry.msgstr_plural, vec!["%d message", "%d messages"]);
    }

    #[test]
    fn test_entries_without_blank_separator() {
        let entries = parse_entries(
            "msgid \"a\"\nmsgstr \"A\"\nmsgid \"b\"\nmsgstr \"B\"\n#, fuzzy\nmsgid \"c\"\nmsgstr \"\"\n",
        )
        .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].msgstr, "B");
        assert!(entries[2].is_fuzzy());
        assert!(!entries[1].is_fuzzy());
    }

    #[test]
    fn test_obsolete_entries() {
        let entries = parse_entries("#~ msgid \"Old\"\n#~ msgstr \"Vieux\"\n").unwrap();
        assert!(entries[0].obsolete);
        assert_eq!(entries[0].msgstr, "Vieux");
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse_entries("msgid \"ok\"\nmsgstr unquoted\n").unwrap_err();
        assert!(matches!(err, CatalogError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_c_escapes_survive_a_round_trip() {
        let source = "msgid \"Bell\\a tab\\v feed\\f\"\nmsgstr \"Cloche\\a\\033[0m\"\n";
        let entries = parse_entries(source).unwrap();
        assert_eq!(entries[0].msgid, "Bell\u{07} tab\u{0b} feed\u{0c}");
        assert_eq!(entries[0].msgstr, "Cloche\u{07}\u{1b}[0m");

        let mut out = String::new();
        write_entry(&mut out, &entries[0]);
        assert_eq!(
            out,
            "msgid \"Bell\\a tab\\v feed\\f\"\nmsgstr \"Cloche\\a\\033[0m\"\n"
        );
        assert_eq!(parse_entries(&out).unwrap(), entries);
    }

    #[test]
    fn test_octal_and_hex_escapes_decode_to_utf8() {
        let entries = parse_entries("msgid \"caf\\303\\251\"\nmsgstr \"\\x41\\101\"\n").unwrap();
        assert_eq!(entries[0].msgid, "café");
        assert_eq!(entries[0].msgstr, "AA");
    }

    #[test]
    fn test_unknown_escape_is_a_syntax_error() {
        let err = parse_entries("msgid \"a\"\nmsgstr \"b\\q\"\n").unwrap_err();
        assert!(matches!(err, CatalogError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_write_multiline_value() {
        let mut out = String::new();
        write_entry(&mut out, &CatalogEntry::new("One\nTwo", "Un\nDeux"));
        assert_eq!(
            out,
            "msgid \"\"\n\"One\\n\"\n\"Two\"\nmsgstr \"\"\n\"Un\\n\"\n\"Deux\"\n"
        );
    }

    #[test]
    fn test_write_explanation_as_extracted_comment() {
        let mut entry = CatalogEntry::new("bank", "banca");
        entry.comment = Some("Financial institution\n\nnot a river bank".to_string());
        let mut out = String::new();
        write_entry(&mut out, &entry);
        assert!(out.starts_with("#. Financial institution\n#.\n#. not a river bank\n"));
    }

    #[test]
    fn test_write_then_parse_plural() {
        let entry = CatalogEntry::new_plural(
            "%d file",
            "%d files",
            vec!["%d fichier".to_string(), "%d fichiers".to_string()],
        )
        .with_flag("c-format");
        let mut out = String::new();
        write_entry(&mut out, &entry);
        let parsed = parse_entries(&out).unwrap();
        assert_eq!(parsed, vec![entry]);
    }
}
