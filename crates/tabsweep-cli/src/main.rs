use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::PathBuf;
use tabsweep_picker::{pick, Layout, MatchFilter, OnCancel, PickerOptions};
use tracing_subscriber::EnvFilter;

mod config;
mod control;
mod editor;
mod sweep;

use config::Config;

#[derive(Parser)]
#[command(name = "tabsweep")]
#[command(about = "Close browser tabs in batch by editing their listing", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit the open-tab listing and close every tab whose line was deleted
    Sweep(SweepArgs),
    /// Filter stdin lines through the interactive fuzzy picker
    Pick(PickArgs),
}

#[derive(Args)]
struct SweepArgs {
    /// Emit the closure audit as JSON lines instead of text
    #[arg(long)]
    json: bool,
    /// Tab control binary (default: $TABSWEEP_CONTROL_BIN, then chrome-cli)
    #[arg(long)]
    control_bin: Option<PathBuf>,
    /// Editor binary (default: $VISUAL, $EDITOR, then vi)
    #[arg(long)]
    editor: Option<PathBuf>,
}

#[derive(Args)]
struct PickArgs {
    /// Preset filter text
    #[arg(long)]
    query: Option<String>,
    /// Prompt label shown by the picker
    #[arg(long)]
    prompt: Option<String>,
    /// Alternate picker config file
    #[arg(long)]
    rcfile: Option<PathBuf>,
    /// Input buffer cap handed to the picker
    #[arg(long)]
    buffer_size: Option<u32>,
    /// Auto-accept when only one candidate matches
    #[arg(long)]
    select_one: bool,
    /// Echo the query in the picker output
    #[arg(long)]
    print_query: bool,
    /// Starting cursor row
    #[arg(long)]
    initial_index: Option<u32>,
    /// Matching mode
    #[arg(long, value_enum)]
    initial_filter: Option<FilterArg>,
    /// Marker for multi-selected lines
    #[arg(long)]
    selection_prefix: Option<String>,
    /// Candidate list layout
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
    /// Fail instead of printing nothing when the selection is cancelled
    #[arg(long)]
    require_match: bool,
    /// Picker binary (default: $TABSWEEP_PICKER_BIN, then peco)
    #[arg(long)]
    picker_bin: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    IgnoreCase,
    CaseSensitive,
    SmartCase,
    Regexp,
    Fuzzy,
}

impl From<FilterArg> for MatchFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::IgnoreCase => MatchFilter::IgnoreCase,
            FilterArg::CaseSensitive => MatchFilter::CaseSensitive,
            FilterArg::SmartCase => MatchFilter::SmartCase,
            FilterArg::Regexp => MatchFilter::Regexp,
            FilterArg::Fuzzy => MatchFilter::Fuzzy,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    BottomUp,
    TopDown,
}

impl From<LayoutArg> for Layout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::BottomUp => Layout::BottomUp,
            LayoutArg::TopDown => Layout::TopDown,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sweep(args) => {
            let config = Config::resolve(args.control_bin, args.editor, None);
            sweep::run(&config, args.json).await?;
            Ok(())
        }
        Commands::Pick(args) => run_pick(args).await,
    }
}

// Diagnostics go to stderr; stdout carries the rendered/audit output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

async fn run_pick(args: PickArgs) -> Result<()> {
    let config = Config::resolve(None, None, args.picker_bin);

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading candidates from stdin")?;
    let candidates: Vec<String> = input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    let mut options = PickerOptions::new(config.picker_bin);
    options.query = args.query;
    options.prompt = args.prompt;
    options.rcfile = args.rcfile;
    options.buffer_size = args.buffer_size;
    options.select_one = args.select_one;
    options.print_query = args.print_query;
    options.initial_index = args.initial_index;
    options.initial_filter = args.initial_filter.map(Into::into);
    options.selection_prefix = args.selection_prefix;
    options.layout = args.layout.map(Into::into);
    if args.require_match {
        options.on_cancel = OnCancel::Reject;
    }

    let selected = pick(&candidates, &options).await?;
    for line in selected {
        println!("{line}");
    }
    Ok(())
}
