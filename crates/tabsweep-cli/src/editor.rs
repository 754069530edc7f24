use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use tempfile::Builder;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to run editor {bin}: {detail}")]
    Launch { bin: PathBuf, detail: String },
    #[error("scratch file error: {0}")]
    Scratch(#[from] io::Error),
}

/// Hands text to an external full-screen editor through a scratch file.
pub struct EditorBridge {
    bin: PathBuf,
}

impl EditorBridge {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Write `text` to a uniquely named scratch file, run the editor on it
    /// with the terminal's streams inherited, block until the editor
    /// exits, and read the file back. The scratch file is owned by this
    /// call alone and is removed on every exit path, including launch and
    /// read failures. The wait is open-ended; the user controls it.
    pub async fn edit(&self, text: &str) -> Result<String, EditorError> {
        let scratch = Builder::new().prefix("tabsweep-").suffix(".tabs").tempfile()?;
        std::fs::write(scratch.path(), text)?;
        debug!(
            "editor_spawn: {} {}",
            self.bin.display(),
            scratch.path().display()
        );

        let status = Command::new(&self.bin)
            .arg(scratch.path())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|err| EditorError::Launch {
                bin: self.bin.clone(),
                detail: err.to_string(),
            })?;
        if !status.success() {
            return Err(EditorError::Launch {
                bin: self.bin.clone(),
                detail: format!("exited with {status}"),
            });
        }

        Ok(std::fs::read_to_string(scratch.path())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn fake_editor(dir: &TempDir, script: &str) -> PathBuf {
        let path = dir.path().join("editor");
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    #[tokio::test]
    async fn edit_returns_what_the_editor_left_behind() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_editor(&dir, r#"printf '[a.com]\n- Foo (1)\n' > "$1""#);
        let bridge = EditorBridge::new(&bin);

        let edited = bridge.edit("[a.com]\n- Foo (1)\n- Bar (2)\n").await.expect("edit");
        assert_eq!(edited, "[a.com]\n- Foo (1)\n");
    }

    #[tokio::test]
    async fn an_untouched_document_comes_back_verbatim() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_editor(&dir, "true");
        let bridge = EditorBridge::new(&bin);

        let text = "[b.com]\n- Bar (2)\n\n";
        assert_eq!(bridge.edit(text).await.expect("edit"), text);
    }

    #[tokio::test]
    async fn non_zero_editor_exit_is_a_launch_failure() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_editor(&dir, "exit 7");
        let bridge = EditorBridge::new(&bin);

        let err = bridge.edit("text").await.expect_err("editor failed");
        assert!(matches!(err, EditorError::Launch { .. }));
    }

    #[tokio::test]
    async fn a_missing_editor_is_a_launch_failure() {
        let dir = TempDir::new().expect("tempdir");
        let bridge = EditorBridge::new(dir.path().join("absent-editor"));
        let err = bridge.edit("text").await.expect_err("missing editor");
        assert!(matches!(err, EditorError::Launch { .. }));
    }

    #[tokio::test]
    async fn the_scratch_file_is_removed_after_the_edit() {
        let dir = TempDir::new().expect("tempdir");
        // The editor records the scratch path it was handed.
        let bin = fake_editor(&dir, r#"printf '%s' "$1" > "$0.path""#);
        let bridge = EditorBridge::new(&bin);

        bridge.edit("text").await.expect("edit");
        let scratch_path = fs::read_to_string(bin.with_file_name("editor.path"))
            .expect("recorded path");
        assert!(!scratch_path.is_empty());
        assert!(!PathBuf::from(scratch_path.trim()).exists());
    }
}
