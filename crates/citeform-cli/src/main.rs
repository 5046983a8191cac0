//! citeform CLI - render dataset citations.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use citeform::{
    CitationRecord, EmitOptions, FileNameInclusion, Format, LabelBundle, LabelError, Locale,
    RenderError, render,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "citeform")]
#[command(author, version, about = "Dataset citation renderer", long_about = None)]
struct Cli {
    /// Log rendering details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a citation record (JSON) in one format
    Render {
        /// Record file (use - for stdin)
        input: PathBuf,

        /// Output format: plain, bibtex, ris or endnotexml
        #[arg(short, long)]
        to: Format,

        /// Output file (omit for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML label bundle replacing the built-in labels
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Locale to resolve labels in
        #[arg(long, default_value = "en")]
        locale: String,

        /// HTML-escape plain text and link the PID
        #[arg(long)]
        html: bool,

        /// Include the file name even for indirectly accessed files
        #[arg(long)]
        always_file_name: bool,

        /// Also emit series title and UNF
        #[arg(long)]
        extended: bool,
    },

    /// List available formats
    Formats,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write output: {0}")]
    Write(#[from] io::Error),
    #[error("invalid record: {0}")]
    Record(#[from] serde_json::Error),
    #[error("invalid label bundle: {0}")]
    Labels(#[from] LabelError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Render {
            input,
            to,
            output,
            labels,
            locale,
            html,
            always_file_name,
            extended,
        } => {
            let options = EmitOptions {
                escape_html: html,
                file_name: if always_file_name {
                    FileNameInclusion::Always
                } else {
                    FileNameInclusion::DirectOnly
                },
                extended,
            };
            render_file(input, to, output, labels, Locale::new(locale), &options)?;
        }
        Commands::Formats => {
            list_formats();
        }
    }

    Ok(())
}

fn render_file(
    input: PathBuf,
    format: Format,
    output: Option<PathBuf>,
    labels: Option<PathBuf>,
    locale: Locale,
    options: &EmitOptions,
) -> Result<(), CliError> {
    let record: CitationRecord = serde_json::from_str(&read_input(&input)?)?;

    let bundle = match labels {
        Some(path) => LabelBundle::from_toml(&read_input(&path)?)?,
        None => LabelBundle::builtin(),
    };

    tracing::debug!(input = %input.display(), %format, %locale, "rendering record");
    let citation = render(format, &record, &bundle, &locale, options)?;

    match output {
        Some(path) if path.as_os_str() != "-" => fs::write(&path, citation)?,
        _ => io::stdout().write_all(citation.as_bytes())?,
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let read = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    };
    read.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn list_formats() {
    println!("Available formats:\n");
    println!("  {:12} {:10}  MIME TYPE", "FORMAT", "EXTENSION");
    println!("  {:12} {:10}  ---------", "------", "---------");

    for fmt in Format::ALL {
        println!(
            "  {:12} {:10}  {}",
            fmt.name(),
            fmt.extension(),
            fmt.mime_type()
        );
    }

    println!("\nBuilt-in label locales: {}", LabelBundle::builtin().locales().join(", "));
}
