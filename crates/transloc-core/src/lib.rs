use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide result alias over [`TranslocError`].
pub type Result<T> = std::result::Result<T, TranslocError>;

/// Domain used when the caller does not name one explicitly.
pub const DEFAULT_DOMAIN: &str = "messages";

#[derive(Debug, Error)]
pub enum TranslocError {
    #[error("catalogue has no domain `{0}`")]
    DomainNotFound(String),
    /// Strict-mode only: message key is not a dot-delimited token chain.
    #[error("text keys are not allowed, use dot-delimited keys. Key: `{key}`, sources: {sources}")]
    InvalidKey { key: String, sources: String },
    #[error("xml: {0}")]
    Xml(String),
}

/// Collection of translatable messages for one locale, grouped into domains.
/// Insertion order of domains and of messages within a domain is preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCatalogue {
    pub locale: String,
    #[serde(default)]
    pub domains: IndexMap<String, MessageDomain>,
}

impl MessageCatalogue {
    pub fn new(locale: impl Into<String>) -> Self {
        MessageCatalogue {
            locale: locale.into(),
            domains: IndexMap::new(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Look up a domain by name.
    pub fn domain(&self, name: &str) -> Result<&MessageDomain> {
        self.domains
            .get(name)
            .ok_or_else(|| TranslocError::DomainNotFound(name.to_string()))
    }

    /// Insert a message under `domain`, creating the domain on first use.
    pub fn add(&mut self, domain: &str, id: impl Into<String>, message: Message) {
        self.domains
            .entry(domain.to_string())
            .or_default()
            .insert(id, message);
    }
}

/// Named subgroup of messages, keyed by message id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageDomain {
    messages: IndexMap<String, Message>,
}

impl MessageDomain {
    pub fn insert(&mut self, id: impl Into<String>, message: Message) {
        self.messages.insert(id.into(), message);
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.get(id)
    }

    /// (id, message) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.messages.iter().map(|(id, m)| (id.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// One translatable unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Default text as written by the developer.
    #[serde(default)]
    pub source: String,
    /// Text for the catalogue's locale.
    #[serde(default)]
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// True while no human translation has been supplied.
    #[serde(default)]
    pub new: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
}

impl Message {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        Message {
            translation: source.clone(),
            source,
            note: None,
            new: true,
            sources: Vec::new(),
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = translation.into();
        self.new = false;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_source_ref(mut self, source: SourceRef) -> Self {
        self.sources.push(source);
        self
    }
}

/// Where a message was discovered: a position in program source, or an
/// opaque descriptor supplied by an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceRef {
    File { path: String, line: u32 },
    Custom(String),
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::File { path, line } => write!(f, "{path}:{line}"),
            SourceRef::Custom(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_lookup_reports_missing_domain() {
        let mut cat = MessageCatalogue::new("fr");
        cat.add(DEFAULT_DOMAIN, "greeting", Message::new("Hello"));

        assert!(cat.domain(DEFAULT_DOMAIN).is_ok());
        let err = cat.domain("validators").unwrap_err();
        assert!(matches!(err, TranslocError::DomainNotFound(ref d) if d == "validators"));
    }

    #[test]
    fn messages_keep_insertion_order() {
        let mut cat = MessageCatalogue::new("de");
        for id in ["z.last", "a.first", "m.middle"] {
            cat.add(DEFAULT_DOMAIN, id, Message::new(id));
        }

        let ids: Vec<&str> = cat
            .domain(DEFAULT_DOMAIN)
            .unwrap()
            .iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, ["z.last", "a.first", "m.middle"]);
    }

    #[test]
    fn source_ref_display_and_json_shapes() {
        let file = SourceRef::File {
            path: "src/Controller/HomeController.php".into(),
            line: 42,
        };
        let custom = SourceRef::Custom("database:snippets".into());

        assert_eq!(file.to_string(), "src/Controller/HomeController.php:42");
        assert_eq!(custom.to_string(), "database:snippets");

        // untagged: файл — объект, произвольный источник — строка
        let json = serde_json::to_string(&vec![file.clone(), custom.clone()]).unwrap();
        let back: Vec<SourceRef> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![file, custom]);
    }

    #[test]
    fn catalogue_round_trips_through_json() {
        let raw = r#"{
            "locale": "fr",
            "domains": {
                "messages": {
                    "welcome.user": {
                        "source": "Welcome!",
                        "translation": "Bienvenue !",
                        "sources": [{"path": "src/a.php", "line": 3}, "custom:thing"]
                    }
                }
            }
        }"#;

        let cat: MessageCatalogue = serde_json::from_str(raw).unwrap();
        let msg = cat
            .domain("messages")
            .unwrap()
            .get("welcome.user")
            .unwrap();
        assert_eq!(msg.translation, "Bienvenue !");
        assert_eq!(msg.sources.len(), 2);
        assert!(!msg.new);
    }
}
