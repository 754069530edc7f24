use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("picker binary not found: {bin}\ninstall peco from https://github.com/peco/peco")]
    MissingBinary { bin: String },
    #[error("failed to launch picker {bin}: {source}")]
    Launch { bin: String, source: io::Error },
    #[error("picker i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("selection cancelled")]
    Cancelled,
}

/// Matching mode handed to the picker's `--initial-filter` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFilter {
    IgnoreCase,
    CaseSensitive,
    SmartCase,
    Regexp,
    Fuzzy,
}

impl MatchFilter {
    fn as_str(&self) -> &'static str {
        match self {
            MatchFilter::IgnoreCase => "IgnoreCase",
            MatchFilter::CaseSensitive => "CaseSensitive",
            MatchFilter::SmartCase => "SmartCase",
            MatchFilter::Regexp => "Regexp",
            MatchFilter::Fuzzy => "Fuzzy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    BottomUp,
    TopDown,
}

impl Layout {
    fn as_str(&self) -> &'static str {
        match self {
            Layout::BottomUp => "bottom-up",
            Layout::TopDown => "top-down",
        }
    }
}

/// Whether an empty selection (the user quit without choosing) is an error
/// or just an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnCancel {
    Reject,
    Skip,
}

/// Whether a launch or runtime failure is returned to the caller or
/// terminates the process after a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    Reject,
    Exit,
}

#[derive(Debug, Clone)]
pub struct PickerOptions {
    /// Picker binary, resolved by the caller's configuration; there is no
    /// ambient lookup here.
    pub bin: PathBuf,
    pub on_cancel: OnCancel,
    pub on_error: OnError,
    pub query: Option<String>,
    pub prompt: Option<String>,
    pub rcfile: Option<PathBuf>,
    pub buffer_size: Option<u32>,
    pub select_one: bool,
    pub print_query: bool,
    pub initial_index: Option<u32>,
    pub initial_filter: Option<MatchFilter>,
    pub selection_prefix: Option<String>,
    pub layout: Option<Layout>,
}

impl PickerOptions {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            on_cancel: OnCancel::Skip,
            on_error: OnError::Reject,
            query: None,
            prompt: None,
            rcfile: None,
            buffer_size: None,
            select_one: false,
            print_query: false,
            initial_index: None,
            initial_filter: None,
            selection_prefix: None,
            layout: None,
        }
    }
}

fn build_args(options: &PickerOptions) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(query) = &options.query {
        args.push(format!("--query={query}"));
    }
    if let Some(prompt) = &options.prompt {
        args.push(format!("--prompt={prompt}"));
    }
    if let Some(rcfile) = &options.rcfile {
        args.push(format!("--rcfile={}", rcfile.display()));
    }
    if let Some(buffer_size) = options.buffer_size {
        args.push(format!("--buffer-size={buffer_size}"));
    }
    if options.select_one {
        args.push("--select-1=true".to_string());
    }
    if options.print_query {
        args.push("--print-query=true".to_string());
    }
    if let Some(initial_index) = options.initial_index {
        args.push(format!("--initial-index={initial_index}"));
    }
    if let Some(initial_filter) = options.initial_filter {
        args.push(format!("--initial-filter={}", initial_filter.as_str()));
    }
    if let Some(selection_prefix) = &options.selection_prefix {
        args.push(format!("--selection-prefix={selection_prefix}"));
    }
    if let Some(layout) = options.layout {
        args.push(format!("--layout={}", layout.as_str()));
    }
    args
}

/// Pipe `candidates` through the external picker and return the chosen
/// subset as trimmed, non-empty lines. The subprocess owns its stdin and
/// stdout pipes for its lifetime; its stderr stays attached to the
/// terminal so the picker UI can draw there.
pub async fn pick(
    candidates: &[String],
    options: &PickerOptions,
) -> Result<Vec<String>, PickerError> {
    let selected = match run_picker(candidates, options).await {
        Ok(lines) => lines,
        Err(err) => match options.on_error {
            OnError::Reject => return Err(err),
            OnError::Exit => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
    };

    if selected.is_empty() && options.on_cancel == OnCancel::Reject {
        return Err(PickerError::Cancelled);
    }
    Ok(selected)
}

async fn run_picker(
    candidates: &[String],
    options: &PickerOptions,
) -> Result<Vec<String>, PickerError> {
    let args = build_args(options);
    debug!("picker_spawn: {} {:?}", options.bin.display(), args);

    let mut child = Command::new(&options.bin)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                PickerError::MissingBinary {
                    bin: options.bin.display().to_string(),
                }
            } else {
                PickerError::Launch {
                    bin: options.bin.display().to_string(),
                    source: err,
                }
            }
        })?;

    let mut stdin = child.stdin.take().expect("piped stdin");
    stdin.write_all(candidates.join("\n").as_bytes()).await?;
    drop(stdin);

    // The picker exits non-zero when the user cancels; an empty selection
    // already encodes that, so the status is not checked.
    let output = child.wait_with_output().await?;
    let selected = String::from_utf8_lossy(&output.stdout)
        .trim()
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    Ok(selected)
}
