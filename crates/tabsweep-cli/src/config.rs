use std::env;
use std::path::PathBuf;

const DEFAULT_CONTROL_BIN: &str = "chrome-cli";
const DEFAULT_EDITOR_BIN: &str = "vi";
const DEFAULT_PICKER_BIN: &str = "peco";

/// External binary paths, resolved once at startup and passed explicitly
/// to every bridge. Precedence per binary: CLI flag, then environment,
/// then a fixed default.
#[derive(Debug, Clone)]
pub struct Config {
    pub control_bin: PathBuf,
    pub editor_bin: PathBuf,
    pub picker_bin: PathBuf,
}

impl Config {
    pub fn resolve(
        control_override: Option<PathBuf>,
        editor_override: Option<PathBuf>,
        picker_override: Option<PathBuf>,
    ) -> Self {
        Self {
            control_bin: resolve_bin(
                control_override,
                &["TABSWEEP_CONTROL_BIN"],
                DEFAULT_CONTROL_BIN,
            ),
            editor_bin: resolve_bin(editor_override, &["VISUAL", "EDITOR"], DEFAULT_EDITOR_BIN),
            picker_bin: resolve_bin(
                picker_override,
                &["TABSWEEP_PICKER_BIN"],
                DEFAULT_PICKER_BIN,
            ),
        }
    }
}

fn resolve_bin(override_path: Option<PathBuf>, env_keys: &[&str], default: &str) -> PathBuf {
    if let Some(path) = override_path {
        return path;
    }
    for key in env_keys {
        if let Ok(value) = env::var(key) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
    }
    PathBuf::from(default)
}
