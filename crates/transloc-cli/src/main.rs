mod commands;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::Layer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "transloc", version, about = "Message catalogue → XLIFF 1.2 dumper")]
struct Cli {
    /// Выключить цветной вывод
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Сериализовать один домен каталога в XLIFF 1.2
    Dump {
        /// Каталог сообщений (JSON)
        #[arg(short, long)]
        catalogue: PathBuf,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        source_lang: Option<String>,
        /// Не проставлять атрибут date (воспроизводимый вывод)
        #[arg(long, default_value_t = false)]
        no_date: bool,
        #[arg(long, default_value_t = false)]
        strict_keys: bool,
        /// Файл результата; без него XLIFF уходит в stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Перечислить домены каталога и количество сообщений в каждом
    Domains {
        #[arg(short, long)]
        catalogue: PathBuf,
    },
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!("▶ Starting command: {}", cmd_name);

        let result = match self {
            Commands::Dump {
                catalogue,
                domain,
                source_lang,
                no_date,
                strict_keys,
                out,
            } => commands::run_dump(
                catalogue,
                domain,
                source_lang,
                no_date,
                strict_keys,
                out,
                use_color,
            ),
            Commands::Domains { catalogue } => commands::run_domains(catalogue, use_color),
        };

        match &result {
            Ok(_) => info!("✔ Finished command: {}", cmd_name),
            Err(e) => error!("✖ Command {} failed: {:?}", cmd_name, e),
        }

        result
    }
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = rolling::daily("logs", "transloc.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Консоль — на stderr: stdout зарезервирован под сам XLIFF.
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
