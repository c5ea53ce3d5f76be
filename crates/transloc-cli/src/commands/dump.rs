use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::Result;
use owo_colors::OwoColorize;
use transloc_core::{MessageCatalogue, DEFAULT_DOMAIN};
use transloc_export_xliff::XliffDumper;

#[allow(clippy::too_many_arguments)]
pub fn run_dump(
    catalogue: PathBuf,
    domain: Option<String>,
    source_lang: Option<String>,
    no_date: bool,
    strict_keys: bool,
    out: Option<PathBuf>,
    use_color: bool,
) -> Result<()> {
    tracing::debug!(event = "dump_args", catalogue = ?catalogue, domain = ?domain, source_lang = ?source_lang, no_date = no_date, strict_keys = strict_keys, out = ?out);

    let cfg = transloc_config::load_config()?;
    let domain = domain
        .or_else(|| cfg.dump.as_ref().and_then(|d| d.domain.clone()))
        .unwrap_or_else(|| DEFAULT_DOMAIN.to_string());
    let out = out.or_else(|| {
        cfg.dump
            .as_ref()
            .and_then(|d| d.out.as_deref().map(PathBuf::from))
    });

    let raw = fs::read_to_string(&catalogue)?;
    let cat: MessageCatalogue = serde_json::from_str(&raw)?;
    tracing::debug!(
        event = "catalogue_loaded",
        locale = cat.locale(),
        domains = cat.domains.len()
    );

    let mut dumper = XliffDumper::new()
        .with_add_date(!no_date && cfg.add_date.unwrap_or(true))
        .with_strict_keys(strict_keys || cfg.strict_keys.unwrap_or(false));
    if let Some(lang) = source_lang.or(cfg.source_lang) {
        dumper = dumper.with_source_language(lang);
    }

    let xml = dumper.dump(&cat, &domain)?;

    match out {
        Some(path) => {
            fs::write(&path, &xml)?;
            if use_color {
                println!("{} XLIFF saved to {}", "✔".green(), path.display());
            } else {
                println!("✔ XLIFF saved to {}", path.display());
            }
        }
        None => println!("{xml}"),
    }
    Ok(())
}
