/// A single message of a gettext catalog
///
/// Singular entries use `msgstr`; entries with a `msgid_plural` use
/// `msgstr_plural`, one string per `msgstr[N]` slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    /// `# ` lines
    pub translator_comment: Option<String>,
    /// `#.` lines; explanations from the oracle are stored here
    pub comment: Option<String>,
    /// `#:` lines
    pub references: Vec<String>,
    /// `#,` flags such as `fuzzy` or `python-format`
    pub flags: Vec<String>,
    /// `#|` lines, kept verbatim without the prefix
    pub previous: Vec<String>,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: String,
    pub msgstr_plural: Vec<String>,
    /// `#~` entries
    pub obsolete: bool,
}

impl CatalogEntry {
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        Self {
            msgid: msgid.into(),
            msgstr: msgstr.into(),
            ..Default::default()
        }
    }

    pub fn new_plural(
        msgid: impl Into<String>,
        msgid_plural: impl Into<String>,
        msgstr_plural: Vec<String>,
    ) -> Self {
        Self {
            msgid: msgid.into(),
            msgid_plural: Some(msgid_plural.into()),
            msgstr_plural,
            ..Default::default()
        }
    }

    pub fn with_flag(mut self, flag: &str) -> Self {
        if !self.has_flag(flag) {
            self.flags.push(flag.to_string());
        }
        self
    }

    pub fn with_context(mut self, msgctxt: impl Into<String>) -> Self {
        self.msgctxt = Some(msgctxt.into());
        self
    }

    pub fn is_plural(&self) -> bool {
        self.msgid_plural.is_some()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn is_fuzzy(&self) -> bool {
        self.has_flag("fuzzy")
    }

    /// The metadata entry (`msgid ""` without context)
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none() && !self.obsolete
    }

    /// True when every translation slot is filled in
    pub fn is_translated(&self) -> bool {
        if self.is_plural() {
            !self.msgstr_plural.is_empty() && self.msgstr_plural.iter().all(|s| !s.is_empty())
        } else {
            !self.msgstr.is_empty()
        }
    }

    /// Copy the translation slots of `other`, leaving everything else alone
    pub fn copy_translation_from(&mut self, other: &CatalogEntry) {
        if self.is_plural() {
            if other.is_plural() {
                self.msgstr_plural = other.msgstr_plural.clone();
            } else {
                self.msgstr_plural = vec![other.msgstr.clone()];
            }
        } else if other.is_plural() {
            self.msgstr = other.msgstr_plural.first().cloned().unwrap_or_default();
        } else {
            self.msgstr = other.msgstr.clone();
        }
    }
}
