use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use termcolor::ColorChoice;
use wordex::IndexError;
use wordex::index::build::build_index_with_progress;
use wordex::output::{self, IndexReport};
use wordex::utils::load_config;

#[derive(Parser)]
#[command(name = "wordex")]
#[command(about = "Build an in-memory inverted word index over a directory of text files")]
struct Cli {
    /// Directory containing the files to index
    #[arg(short = 'd', long = "directory")]
    directory: PathBuf,

    /// Number of worker threads
    #[arg(short = 'n', long = "threads")]
    threads: NonZeroUsize,

    /// JSON config file (defaults to the per-user config if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every word and the files it occurs in
    #[arg(long)]
    words: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    color: ColorArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
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

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit with 1; --help and --version are not errors
            let code = if e.use_stderr() { 1 } else { 0 };
            // Nowhere left to report a failed write; the exit code still applies
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<IndexError>()
        .map(IndexError::exit_code)
        .unwrap_or(1);
    u8::try_from(code).unwrap_or(1)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let silent = cli.quiet || cli.json;

    let built = build_index_with_progress(&cli.directory, cli.threads, &config, silent)
        .with_context(|| format!("Failed to index {}", cli.directory.display()))?;

    if cli.json {
        output::print_json(&IndexReport::new(&built, cli.words))?;
        return Ok(());
    }

    let choice = cli.color.into();
    output::print_summary(&built, choice)?;

    if cli.words {
        println!();
        output::print_postings(&built.postings(), choice)?;
    }

    Ok(())
}
