use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::Result;
use owo_colors::OwoColorize;
use transloc_core::MessageCatalogue;

pub fn run_domains(catalogue: PathBuf, use_color: bool) -> Result<()> {
    tracing::debug!(event = "domains_args", catalogue = ?catalogue);

    let raw = fs::read_to_string(&catalogue)?;
    let cat: MessageCatalogue = serde_json::from_str(&raw)?;

    for (name, domain) in &cat.domains {
        if use_color {
            println!("{}: {}", name.green(), domain.len());
        } else {
            println!("{}: {}", name, domain.len());
        }
    }
    Ok(())
}
