use serde::Deserialize;

/// Values from `transloc.toml`. Everything is optional: the CLI overlays
/// its own flags on top and falls back to built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslocConfig {
    pub source_lang: Option<String>,
    pub add_date: Option<bool>,
    pub strict_keys: Option<bool>,
    pub dump: Option<DumpCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DumpCfg {
    pub domain: Option<String>,
    pub out: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

pub fn load_config() -> Result<TranslocConfig, ConfigError> {
    // Search order: CWD/transloc.toml, $HOME/.config/transloc/transloc.toml
    let mut merged = TranslocConfig::default();
    if let Ok(p) = std::env::current_dir() {
        let path = p.join("transloc.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<TranslocConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    if let Some(base) = dirs::config_dir() {
        let path = base.join("transloc").join("transloc.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<TranslocConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }
    Ok(merged)
}

fn merge(mut a: TranslocConfig, b: TranslocConfig) -> TranslocConfig {
    if a.source_lang.is_none() {
        a.source_lang = b.source_lang;
    }
    if a.add_date.is_none() {
        a.add_date = b.add_date;
    }
    if a.strict_keys.is_none() {
        a.strict_keys = b.strict_keys;
    }
    a.dump = merge_opt(a.dump, b.dump, merge_dump);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_dump(mut a: DumpCfg, b: DumpCfg) -> DumpCfg {
    if a.domain.is_none() {
        a.domain = b.domain;
    }
    if a.out.is_none() {
        a.out = b.out;
    }
    a
}
