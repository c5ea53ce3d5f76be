use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use sha1::{Digest, Sha1};
use transloc_core::{Message, MessageCatalogue, Result, SourceRef, TranslocError};

pub use transloc_core::DEFAULT_DOMAIN;

const XLIFF_NS: &str = "urn:oasis:names:tc:xliff:document:1.2";
const JMS_NS: &str = "urn:jms:translation";
const XLIFF_VERSION: &str = "1.2";
const TOOL_ID: &str = "transloc";
const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
// Подстановка при повторном экспорте (см. dump_unit) сравнивает локаль
// каталога именно с "en", а не с настроенным source_language.
const DEFAULT_LOCALE: &str = "en";
const SOURCE_NOTE: &str = "The source node in most cases contains the sample message \
as written by the developer. If it looks like a dot-delimitted string such as \
\"form.label.firstname\", then the developer has not provided a default message.";

/// XLIFF 1.2 dumper.
///
/// Serializes one domain of a [`MessageCatalogue`] into a pretty-printed
/// XLIFF 1.2 document. Pure read → transform → serialize; the catalogue is
/// never mutated and no state survives a call.
///
/// See <https://docs.oasis-open.org/xliff/v1.2/os/xliff-core.html>
#[derive(Debug, Clone)]
pub struct XliffDumper {
    source_language: String,
    add_date: bool,
    strict_keys: bool,
    timestamp: Option<DateTime<Utc>>,
}

impl Default for XliffDumper {
    fn default() -> Self {
        XliffDumper {
            source_language: DEFAULT_LOCALE.to_string(),
            add_date: true,
            strict_keys: false,
            timestamp: None,
        }
    }
}

impl XliffDumper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Language written to the `source-language` attribute (default `en`).
    pub fn with_source_language(mut self, lang: impl Into<String>) -> Self {
        self.source_language = lang.into();
        self
    }

    /// Whether to stamp the `file` element with the dump date (default on).
    pub fn with_add_date(mut self, add_date: bool) -> Self {
        self.add_date = add_date;
        self
    }

    /// Reject message keys that are not dot-delimited token chains.
    /// Off by default: arbitrary keys are tolerated.
    pub fn with_strict_keys(mut self, strict_keys: bool) -> Self {
        self.strict_keys = strict_keys;
        self
    }

    /// Use a fixed instant for the `date` attribute instead of the current
    /// time. Reproducible output for tests and repeatable builds.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Serialize `domain` of `catalogue` into an XLIFF 1.2 document string.
    ///
    /// Fails with [`TranslocError::DomainNotFound`] before producing any
    /// output if the catalogue has no such domain.
    pub fn dump(&self, catalogue: &MessageCatalogue, domain: &str) -> Result<String> {
        let messages = catalogue.domain(domain)?;

        let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
        emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut root = BytesStart::new("xliff");
        root.push_attribute(("xmlns", XLIFF_NS));
        root.push_attribute(("xmlns:jms", JMS_NS));
        root.push_attribute(("version", XLIFF_VERSION));
        emit(&mut w, Event::Start(root))?;

        let mut file = BytesStart::new("file");
        if self.add_date {
            let date = self.timestamp.unwrap_or_else(Utc::now);
            file.push_attribute(("date", date.format(DATE_FORMAT).to_string().as_str()));
        }
        file.push_attribute(("source-language", self.source_language.as_str()));
        file.push_attribute(("target-language", catalogue.locale()));
        file.push_attribute(("datatype", "plaintext"));
        file.push_attribute(("original", "not.available"));
        emit(&mut w, Event::Start(file))?;

        emit(&mut w, Event::Start(BytesStart::new("header")))?;
        let mut tool = BytesStart::new("tool");
        tool.push_attribute(("tool-id", TOOL_ID));
        tool.push_attribute(("tool-name", TOOL_ID));
        tool.push_attribute(("tool-version", TOOL_VERSION));
        emit(&mut w, Event::Empty(tool))?;
        emit(&mut w, Event::Start(BytesStart::new("note")))?;
        emit(&mut w, Event::Text(BytesText::new(SOURCE_NOTE)))?;
        emit(&mut w, Event::End(BytesEnd::new("note")))?;
        emit(&mut w, Event::End(BytesEnd::new("header")))?;

        emit(&mut w, Event::Start(BytesStart::new("body")))?;
        for (id, message) in messages.iter() {
            if self.strict_keys {
                check_key(id, message)?;
            }
            self.dump_unit(&mut w, catalogue, id, message)?;
        }
        emit(&mut w, Event::End(BytesEnd::new("body")))?;

        emit(&mut w, Event::End(BytesEnd::new("file")))?;
        emit(&mut w, Event::End(BytesEnd::new("xliff")))?;

        String::from_utf8(w.into_inner()).map_err(|e| TranslocError::Xml(e.to_string()))
    }

    fn dump_unit(
        &self,
        w: &mut Writer<Vec<u8>>,
        catalogue: &MessageCatalogue,
        id: &str,
        message: &Message,
    ) -> Result<()> {
        let mut unit = BytesStart::new("trans-unit");
        unit.push_attribute(("id", sha1_hex(id).as_str()));
        unit.push_attribute(("resname", id));
        emit(w, Event::Start(unit))?;

        // Повторный экспорт каталога по умолчанию: если английский текст
        // уже правили, в source идёт актуальная строка локали.
        let mut src = message.source.as_str();
        if catalogue.locale() == DEFAULT_LOCALE && message.source != message.translation {
            src = message.translation.as_str();
        }

        emit(w, Event::Start(BytesStart::new("source")))?;
        emit(w, text_or_cdata(&message.source, src))?;
        emit(w, Event::End(BytesEnd::new("source")))?;

        let mut target = BytesStart::new("target");
        if message.new {
            target.push_attribute(("state", "new"));
        }
        emit(w, Event::Start(target))?;
        emit(w, text_or_cdata(&message.translation, &message.translation))?;
        emit(w, Event::End(BytesEnd::new("target")))?;

        if let Some(note) = message.note.as_deref().filter(|n| !n.is_empty()) {
            emit(w, Event::Start(BytesStart::new("note")))?;
            emit(w, Event::Text(BytesText::new(note)))?;
            emit(w, Event::End(BytesEnd::new("note")))?;
        }

        // Нестандартные элементы обязаны идти последними внутри trans-unit
        // (правило расширяемости OASIS XLIFF 1.2).
        write_source_refs(w, message)?;

        emit(w, Event::End(BytesEnd::new("trans-unit")))?;
        Ok(())
    }
}

/// Trailing provenance block: one `jms:reference-file` per distinct file
/// path (first occurrence wins), one `jms:reference` per custom descriptor.
fn write_source_refs(w: &mut Writer<Vec<u8>>, message: &Message) -> Result<()> {
    let mut seen_paths: HashSet<&str> = HashSet::new();
    for source in &message.sources {
        match source {
            SourceRef::File { path, .. } => {
                if seen_paths.insert(path.as_str()) {
                    emit(w, Event::Start(BytesStart::new("jms:reference-file")))?;
                    emit(w, Event::Text(BytesText::new(path)))?;
                    emit(w, Event::End(BytesEnd::new("jms:reference-file")))?;
                }
            }
            SourceRef::Custom(text) => {
                emit(w, Event::Start(BytesStart::new("jms:reference")))?;
                emit(w, Event::Text(BytesText::new(text)))?;
                emit(w, Event::End(BytesEnd::new("jms:reference")))?;
            }
        }
    }
    Ok(())
}

/// The CDATA decision is driven by the untransformed message text while the
/// payload may be the substituted one, hence two arguments.
fn text_or_cdata<'a>(trigger: &str, payload: &'a str) -> Event<'a> {
    if trigger.contains(['<', '>', '&']) {
        Event::CData(BytesCData::new(payload))
    } else {
        Event::Text(BytesText::new(payload))
    }
}

fn sha1_hex(id: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(id.as_bytes());
    hex::encode(hasher.finalize())
}

fn check_key(id: &str, message: &Message) -> Result<()> {
    static DOT_KEY_RE: OnceLock<Regex> = OnceLock::new();
    let re = DOT_KEY_RE.get_or_init(|| Regex::new(r"^[\w-]+(?:\.[\w-]+)+$").unwrap());
    if re.is_match(id) {
        return Ok(());
    }
    let sources = message
        .sources
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(TranslocError::InvalidKey {
        key: id.to_string(),
        sources,
    })
}

fn emit(w: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    w.write_event(event)
        .map_err(|e| TranslocError::Xml(e.to_string()))
}
