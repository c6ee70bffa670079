use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::{load_savefile, save_savefile, CodecLimits, UnknownIdPolicy};
use delve_tools::{
    format_inspect_report, format_summary_pretty, inspect_savefile, sample_world, summarize,
    SaveSelection,
};
use glob::Pattern;
use schema::GameTables;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "delve-tools",
    version,
    about = "delve save file inspection tools"
)]
struct Cli {
    /// Game tables JSON used to resolve ids (defaults to the built-in test tables).
    #[arg(long, global = true)]
    tables: Option<PathBuf>,
    /// Decode out-of-range optional ids as absent instead of failing.
    #[arg(long, global = true)]
    lenient: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show section layout and sizes.
    Inspect {
        /// Path to a save, or a directory of saves.
        path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected saves.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected saves (after sorting).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Decode a save and summarize the world.
    Summary {
        /// Path to the save.
        path: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = SummaryFormat::Json)]
        format: SummaryFormat,
    },
    /// Write a small sample save.
    Sample {
        /// Where to write it.
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SummaryFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let tables = match &cli.tables {
        Some(path) => load_tables(path).context("load tables")?,
        None => GameTables::for_testing(),
    };
    let mut codec_limits = CodecLimits::default();
    if cli.lenient {
        codec_limits = codec_limits.with_unknown_ids(UnknownIdPolicy::TreatAsAbsent);
    }
    let limits = wire::Limits::default();

    match cli.command {
        Command::Inspect {
            path,
            glob,
            sort,
            limit,
        } => {
            if path.is_dir() {
                let selection = SaveSelection {
                    pattern: glob
                        .as_deref()
                        .map(Pattern::new)
                        .transpose()
                        .context("invalid glob pattern")?,
                    largest_first: sort.is_some(),
                    limit: limit.or(sort.map(|InspectSort::Size| 10)),
                };
                let saves = selection
                    .select(&path)
                    .with_context(|| format!("read dir {}", path.display()))?;
                for save in saves {
                    let bytes = fs::read(&save.path)
                        .with_context(|| format!("read save {}", save.path.display()))?;
                    println!("== {} ({} bytes) ==", save.path.display(), save.bytes);
                    match inspect_savefile(&bytes, &tables, &limits, &codec_limits) {
                        Ok(report) => print!("{}", format_inspect_report(&report)),
                        Err(err) => {
                            error!(path = %save.path.display(), %err, "failed to inspect save");
                            println!("error: {err}");
                        }
                    }
                }
            } else {
                let bytes =
                    fs::read(&path).with_context(|| format!("read save {}", path.display()))?;
                let report = inspect_savefile(&bytes, &tables, &limits, &codec_limits)
                    .with_context(|| format!("decode save {}", path.display()))?;
                print!("{}", format_inspect_report(&report));
            }
        }
        Command::Summary { path, format } => {
            let bytes = fs::read(&path).with_context(|| format!("read save {}", path.display()))?;
            let mut src = bytes.as_slice();
            let loaded = load_savefile(&mut src, &tables, &limits, &codec_limits)
                .with_context(|| format!("decode save {}", path.display()))?;
            let summary = summarize(&loaded, &tables);
            match format {
                SummaryFormat::Json => {
                    let json = serde_json::to_string_pretty(&summary).context("serialize json")?;
                    println!("{json}");
                }
                SummaryFormat::Pretty => {
                    print!("{}", format_summary_pretty(&summary));
                }
            }
        }
        Command::Sample { output } => {
            let mut bytes = Vec::new();
            let summary = save_savefile(
                &sample_world(),
                &GameTables::for_testing(),
                &limits,
                &CodecLimits::default(),
                &mut bytes,
            )
            .context("encode sample world")?;
            fs::write(&output, &bytes)
                .with_context(|| format!("write save {}", output.display()))?;
            debug!(bytes = summary.bytes_written, path = %output.display(), "wrote sample save");
            println!("wrote {} bytes to {}", bytes.len(), output.display());
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_tables(path: &Path) -> Result<GameTables> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read tables {}", path.display()))?;
    let tables: GameTables = serde_json::from_str(&contents).context("parse tables json")?;
    tables
        .validate()
        .map_err(|err| anyhow::anyhow!("table validation failed: {err}"))?;
    Ok(tables)
}
