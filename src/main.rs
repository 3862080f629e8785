use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use exn::ResultExt;
use folio::naming::{self, ArchiveName};
use folio::{Build, ErrorKind, Result};
use folio_config::{ArchiverKind, Config};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use time::UtcDateTime;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON) layered over `folio.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_enum)]
    archiver: Option<ArchiverArg>,
    /// More logging; repeat for trace output.
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rewrite the metadata of an existing EPUB into a new copy.
    Patch {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Defaults to the input name with the configured suffix.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build an EPUB from a rendered single-page HTML book.
    Build {
        #[arg(long)]
        html: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Show how the rendered HTML book splits into chapters.
    Chapters {
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ArchiverArg {
    Native,
    Command,
}

impl From<ArchiverArg> for ArchiverKind {
    fn from(value: ArchiverArg) -> Self {
        match value {
            ArchiverArg::Native => Self::Native,
            ArchiverArg::Command => Self::Command,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(archiver) = cli.archiver {
        config.archiver = archiver.into();
    }

    match cli.command {
        Commands::Patch { input, output } => {
            config.validate().or_raise(|| ErrorKind::Config)?;
            let input = input.unwrap_or(config.patch.input);
            let output = output.unwrap_or_else(|| naming::patched(&input, &config.patch.suffix));
            let archiver = folio::archiver(config.archiver);
            folio::patch_epub(archiver.as_ref(), &config.metadata, &input, &output)?;
            tracing::info!(output = %output.display(), "Wrote patched EPUB");
        },
        Commands::Build { html, output_dir } => {
            config.validate().or_raise(|| ErrorKind::Config)?;
            let html = html.unwrap_or(config.build.html);
            let output_dir = output_dir.unwrap_or(config.build.output_dir);
            let now = UtcDateTime::now();
            let name: ArchiveName = config.build.name.parse()?;
            let output = output_dir.join(name.render(&config.metadata, now.date())?);
            fs::create_dir_all(&output_dir).or_raise(|| ErrorKind::Io(output_dir.clone()))?;
            let build = Build {
                metadata: &config.metadata,
                html: &html,
                generate: &config.build.generate,
                end_marker: &config.build.end_marker,
                modified: now,
            };
            let archiver = folio::archiver(config.archiver);
            folio::build_epub(archiver.as_ref(), &build, &output)?;
            tracing::info!(output = %output.display(), "Wrote EPUB");
        },
        Commands::Chapters { html } => {
            let html = html.unwrap_or(config.build.html);
            for chapter in folio::chapters(&html, &config.build.end_marker)? {
                println!("{chapter}");
            }
        },
    }
    Ok(())
}
