//! Brace templates used by the prompts
//!
//! The syntax is the one translators already know from `str.format`-style
//! prompt files:
//!
//! - `{key}` is replaced by the value bound to `key`
//! - `{{` and `}}` produce literal braces
//!
//! Values are inserted verbatim and are never scanned again, so a phrase such
//! as `{follower_name} has created a new {followed_type}` survives rendering
//! untouched.

use std::collections::HashMap;

use crate::error::ConfigError;

/// Key/value bindings for [`render`]
#[derive(Debug, Clone, Default)]
pub struct TemplateParams(HashMap<String, String>);

impl TemplateParams {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn extend(&mut self, other: TemplateParams) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Render `template`, failing on unknown keys and unbalanced braces
pub fn render(template: &str, params: &TemplateParams) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut key = String::new();
                let mut closed = false;
                for (_, k) in chars.by_ref() {
                    if k == '}' {
                        closed = true;
                        break;
                    }
                    if k == '{' {
                        return Err(ConfigError::MalformedTemplate {
                            position: pos,
                            reason: "nested '{' inside a placeholder".to_string(),
                        });
                    }
                    key.push(k);
                }
                if !closed {
                    return Err(ConfigError::MalformedTemplate {
                        position: pos,
                        reason: "unterminated '{'".to_string(),
                    });
                }
                let key = key.trim();
                let value = params
                    .get(key)
                    .ok_or_else(|| ConfigError::UnknownTemplateKey(key.to_string()))?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(ConfigError::MalformedTemplate {
                        position: pos,
                        reason: "single '}' outside a placeholder".to_string(),
                    });
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
