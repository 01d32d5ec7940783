use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fpm::index::{IndexSummary, ScanConfig};
use fpm::launch::SystemLauncher;
use fpm::output;
use fpm::query::{sort_files, FileSort, SCOPE_MARKER};
use fpm::session::Session;
use serde::Serialize;
use std::path::{Path, PathBuf};
use termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fpm")]
#[command(about = "Browse a directory by the parts of its file names")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory to browse (when no subcommand is given)
    #[arg(default_value = ".")]
    path: PathBuf,

    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Args, Clone, Default)]
struct ScanArgs {
    /// Skip paths matching this glob (repeatable)
    #[arg(long = "exclude", value_name = "GLOB", global = true)]
    exclude: Vec<String>,

    /// Do not index dot-files and dot-directories
    #[arg(long, global = true)]
    skip_hidden: bool,

    /// No progress spinner
    #[arg(long, global = true)]
    quiet: bool,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, global = true)]
    color: ColorArg,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum ColorArg {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Browse interactively with an initial query
    Search {
        /// Directory to browse
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Initial query
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Index a directory and print the summary
    Scan {
        path: PathBuf,

        #[arg(long)]
        json: bool,
    },
    /// List parts matching a query (`text`, ` text` or `>text`)
    Parts {
        path: PathBuf,

        /// Query; lists every part when omitted
        query: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// List the files containing a part
    Files {
        path: PathBuf,

        part: String,

        /// Column to sort by (default: path key)
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        #[arg(long)]
        json: bool,
    },
    /// List the parts of one file, optionally narrowed by a prefix
    Lateral {
        path: PathBuf,

        /// File path relative to PATH
        file: String,

        /// Prefix to narrow the file's parts
        query: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Open a file, or the folder containing it
    Open {
        path: PathBuf,

        /// File path relative to PATH
        file: String,

        /// Open the containing folder instead
        #[arg(long)]
        folder: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Path,
    Type,
    Size,
}

impl From<SortArg> for FileSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Path => FileSort::Path,
            SortArg::Type => FileSort::Type,
            SortArg::Size => FileSort::Size,
        }
    }
}

#[derive(Serialize)]
struct ScanReport<'a> {
    root: &'a Path,
    #[serde(flatten)]
    summary: IndexSummary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Search { .. }));
    init_logging(interactive);

    let color: ColorChoice = cli.scan.color.into();
    let mut config = scan_config(&cli.scan);

    match cli.command {
        None => run_interactive(cli.path, None, config)?,
        Some(Commands::Search { path, query }) => run_interactive(path, query, config)?,
        Some(Commands::Scan { path, json }) => {
            config.show_progress = config.show_progress && !json;
            let session = open_session(&path, config)?;
            let root = session.index().root();
            let summary = session.summary().context("scan produced no summary")?;
            if json {
                output::print_json(&ScanReport { root, summary })?;
            } else {
                output::print_summary(root, &summary, color)?;
            }
        }
        Some(Commands::Parts { path, query, json }) => {
            let mut session = open_session(&path, config)?;
            let parts = session.set_query(query.as_deref().unwrap_or(""));
            print_parts(&parts, json, color)?;
        }
        Some(Commands::Files {
            path,
            part,
            sort,
            desc,
            json,
        }) => {
            let session = open_session(&path, config)?;
            let mut files = session.select_part(&part.to_lowercase());
            if sort.is_some() || desc {
                sort_files(&mut files, sort.map(FileSort::from).unwrap_or_default(), desc);
            }
            if json {
                output::print_json(&files)?;
            } else {
                output::print_files(&files, color)?;
            }
        }
        Some(Commands::Lateral {
            path,
            file,
            query,
            json,
        }) => {
            let mut session = open_session(&path, config)?;
            let mut parts = session
                .explore_laterally_from(&file)
                .with_context(|| format!("{} is not in the index of {}", file, path.display()))?;
            if let Some(query) = query {
                let query = if query.starts_with(SCOPE_MARKER) {
                    query
                } else {
                    format!("{SCOPE_MARKER}{query}")
                };
                parts = session.set_query(&query);
            }
            print_parts(&parts, json, color)?;
        }
        Some(Commands::Open { path, file, folder }) => {
            let session = open_session(&path, config)?;
            let record = session
                .index()
                .find_file(&file)
                .with_context(|| format!("{} is not in the index of {}", file, path.display()))?;
            if folder {
                session.open_containing_folder(record, &SystemLauncher)?;
            } else {
                session.open_file(record, &SystemLauncher)?;
            }
        }
    }

    Ok(())
}

/// Logs go to stderr, filtered by `FPM_LOG`. The interactive UI owns the
/// terminal, so it stays silent unless asked.
fn init_logging(interactive: bool) {
    let default = if interactive { "off" } else { "warn" };
    let filter = EnvFilter::try_from_env("FPM_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then `FPM_*` variables, then flags
fn scan_config(args: &ScanArgs) -> ScanConfig {
    let mut config = ScanConfig::load();
    config.exclude.extend(args.exclude.iter().cloned());
    if args.skip_hidden {
        config.include_hidden = false;
    }
    config.show_progress = !args.quiet;
    config
}

fn open_session(path: &Path, config: ScanConfig) -> Result<Session> {
    let mut session = Session::new(config);
    session
        .select_directory(path)
        .with_context(|| format!("Failed to index {}", path.display()))?;
    Ok(session)
}

fn print_parts(parts: &[String], json: bool, color: ColorChoice) -> Result<()> {
    if json {
        output::print_json(parts)?;
    } else {
        output::print_parts(parts, color)?;
    }
    Ok(())
}

#[cfg(feature = "interactive")]
fn run_interactive(path: PathBuf, query: Option<String>, mut config: ScanConfig) -> Result<()> {
    config.show_progress = false;
    fpm::tui::run(path, query, config)
}

#[cfg(not(feature = "interactive"))]
fn run_interactive(_path: PathBuf, _query: Option<String>, _config: ScanConfig) -> Result<()> {
    anyhow::bail!("fpm was built without the `interactive` feature; use `fpm parts` or `fpm files`")
}
