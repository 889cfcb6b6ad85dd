//! fieldsign binary
//!
//! Fills PDF fields from a JSON manifest, or reports a PDF's page count.

use anyhow::Context;
use clap::{Parser, Subcommand};
use fieldsign_cli::{fill_document, FieldManifest};
use fieldsign_core::{EmbedConfig, PagePolicy};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming a TOML config file
const CONFIG_ENV: &str = "FIELDSIGN_CONFIG";

#[derive(Parser, Debug)]
#[command(name = "fieldsign")]
#[command(version, about = "Burn signature, text, date and checkbox fields into PDFs")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a field manifest to a PDF
    Fill {
        /// Source PDF
        #[arg(long)]
        input: PathBuf,

        /// JSON manifest: {"fields": [{"id", "type", "x", "y", "width", "height", "page", "value"}]}
        #[arg(long)]
        fields: PathBuf,

        /// Where to write the filled PDF
        #[arg(long)]
        output: PathBuf,

        /// TOML configuration (defaults to $FIELDSIGN_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Fail fields whose page does not exist instead of using page 1
        #[arg(long)]
        strict_pages: bool,

        /// Locale for date fields, e.g. id_ID or en_US
        #[arg(long)]
        locale: Option<String>,
    },
    /// Print the number of pages in a PDF
    PageCount { pdf: PathBuf },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // stdout carries the JSON report, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Command::Fill {
            input,
            fields,
            output,
            config,
            strict_pages,
            locale,
        } => {
            let config = load_config(config, strict_pages, locale)?;
            let manifest = FieldManifest::from_file(&fields)?;
            let pdf = fs::read(&input)
                .with_context(|| format!("Failed to read PDF: {}", input.display()))?;

            tracing::info!(
                "Filling {} field(s) into {}",
                manifest.fields.len(),
                input.display()
            );
            let (filled, report) = fill_document(&pdf, &manifest.fields, config)
                .with_context(|| format!("Failed to fill {}", input.display()))?;

            fs::write(&output, filled)
                .with_context(|| format!("Failed to write PDF: {}", output.display()))?;
            tracing::info!("Wrote {}", output.display());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::PageCount { pdf } => {
            let bytes =
                fs::read(&pdf).with_context(|| format!("Failed to read PDF: {}", pdf.display()))?;
            let count = fieldsign_core::page_count(&bytes)
                .with_context(|| format!("Failed to count pages of {}", pdf.display()))?;
            println!("{}", count);
        }
    }

    Ok(())
}

fn load_config(
    path: Option<PathBuf>,
    strict_pages: bool,
    locale: Option<String>,
) -> anyhow::Result<EmbedConfig> {
    let path = path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    let mut config = match path {
        Some(path) => EmbedConfig::from_file(&path)?,
        None => EmbedConfig::default(),
    };

    if strict_pages {
        config = config.with_page_policy(PagePolicy::Strict);
    }
    if let Some(locale) = locale {
        config = config.with_locale(locale);
    }
    Ok(config)
}
