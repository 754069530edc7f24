use std::io;
use std::path::PathBuf;
use tabsweep_core::TabRecord;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("control binary not found: {0}")]
    MissingBinary(PathBuf),
    #[error("failed to launch {bin}: {source}")]
    Launch { bin: PathBuf, source: io::Error },
    #[error("`{command}` failed: {detail}")]
    Fetch { command: String, detail: String },
    #[error("malformed info response for tab {id}: {detail}")]
    Parse { id: String, detail: String },
    #[error("close failed for tab {id}: {detail}")]
    Close { id: String, detail: String },
}

/// Client for the external tab listing/control service. All interaction is
/// one subprocess invocation per call; nothing is cached between calls.
pub struct TabControl {
    bin: PathBuf,
}

impl TabControl {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Flat listing, one `[<id>] ...` line per open tab.
    pub async fn list_tabs(&self) -> Result<String, ControlError> {
        self.run(&["list", "tabs"]).await
    }

    /// Detail lookup for one tab. The response contract is exactly three
    /// `label: value` lines mapping, in order, to id, title, and url.
    pub async fn tab_info(&self, id: &str) -> Result<TabRecord, ControlError> {
        let output = self.run(&["info", "-t", id]).await?;
        parse_info(id, &output)
    }

    /// Close request. A non-zero exit is reportable but must not abort the
    /// caller's loop.
    pub async fn close_tab(&self, id: &str) -> Result<(), ControlError> {
        match self.run(&["close", "-t", id]).await {
            Ok(_) => Ok(()),
            Err(ControlError::Fetch { detail, .. }) => Err(ControlError::Close {
                id: id.to_string(),
                detail,
            }),
            Err(err) => Err(err),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String, ControlError> {
        debug!("control_invoke: {} {:?}", self.bin.display(), args);
        let output = Command::new(&self.bin)
            .args(args)
            .output()
            .await
            .map_err(|err| {
                if err.kind() == io::ErrorKind::NotFound {
                    ControlError::MissingBinary(self.bin.clone())
                } else {
                    ControlError::Launch {
                        bin: self.bin.clone(),
                        source: err,
                    }
                }
            })?;
        if !output.status.success() {
            return Err(ControlError::Fetch {
                command: args.join(" "),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

fn parse_info(id: &str, output: &str) -> Result<TabRecord, ControlError> {
    let parse_err = |detail: String| ControlError::Parse {
        id: id.to_string(),
        detail,
    };

    let lines: Vec<&str> = output.lines().collect();
    if lines.len() != 3 {
        return Err(parse_err(format!("expected 3 lines, got {}", lines.len())));
    }

    let mut values = Vec::with_capacity(3);
    for line in &lines {
        let (_, value) = line
            .split_once(':')
            .ok_or_else(|| parse_err(format!("line without `label: value` shape: {line:?}")))?;
        values.push(value.trim().to_string());
    }

    if values[0] != id {
        return Err(parse_err(format!(
            "response is for tab {}, not {id}",
            values[0]
        )));
    }

    Ok(TabRecord {
        id: values[0].clone(),
        title: values[1].clone(),
        url: values[2].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn fake_control(dir: &TempDir, script: &str) -> PathBuf {
        let path = dir.path().join("chrome-cli");
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    #[test]
    fn parse_info_accepts_the_three_line_contract() {
        let record = parse_info("12", "Id: 12\nTitle: Inbox (3)\nUrl: http://mail.example/\n")
            .expect("valid response");
        assert_eq!(
            record,
            TabRecord {
                id: "12".to_string(),
                title: "Inbox (3)".to_string(),
                url: "http://mail.example/".to_string(),
            }
        );
    }

    #[test]
    fn parse_info_rejects_short_responses() {
        let err = parse_info("12", "Id: 12\nTitle: Inbox\n").expect_err("two lines");
        assert!(matches!(err, ControlError::Parse { .. }));
        assert!(err.to_string().contains("expected 3 lines, got 2"));
    }

    #[test]
    fn parse_info_rejects_unlabelled_lines() {
        let err = parse_info("12", "Id: 12\njust text\nUrl: http://x/\n").expect_err("bad line");
        assert!(matches!(err, ControlError::Parse { .. }));
    }

    #[test]
    fn parse_info_rejects_an_id_mismatch() {
        let err =
            parse_info("12", "Id: 13\nTitle: Other\nUrl: http://x/\n").expect_err("wrong tab");
        assert!(err.to_string().contains("not 12"));
    }

    #[tokio::test]
    async fn list_and_info_round_trip_through_a_fake_binary() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_control(
            &dir,
            r#"case "$1" in
list) printf '[5] Docs\n[9] News\n' ;;
info) printf 'Id: %s\nTitle: Tab %s\nUrl: http://t.example/%s\n' "$3" "$3" "$3" ;;
esac"#,
        );
        let control = TabControl::new(&bin);

        let listing = control.list_tabs().await.expect("listing");
        assert!(listing.contains("[5] Docs"));

        let record = control.tab_info("9").await.expect("info");
        assert_eq!(record.title, "Tab 9");
        assert_eq!(record.url, "http://t.example/9");
    }

    #[tokio::test]
    async fn fetch_failures_carry_the_command_and_stderr() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_control(&dir, "echo 'no browser session' >&2; exit 3");
        let control = TabControl::new(&bin);

        let err = control.list_tabs().await.expect_err("non-zero exit");
        match err {
            ControlError::Fetch { command, detail } => {
                assert_eq!(command, "list tabs");
                assert_eq!(detail, "no browser session");
            }
            other => panic!("expected Fetch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn close_failures_are_their_own_variant() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_control(&dir, "exit 1");
        let control = TabControl::new(&bin);

        let err = control.close_tab("4").await.expect_err("close fails");
        assert!(matches!(err, ControlError::Close { .. }));
    }

    #[tokio::test]
    async fn a_missing_binary_is_reported_distinctly() {
        let dir = TempDir::new().expect("tempdir");
        let control = TabControl::new(dir.path().join("absent"));
        let err = control.list_tabs().await.expect_err("missing binary");
        assert!(matches!(err, ControlError::MissingBinary(_)));
    }
}
