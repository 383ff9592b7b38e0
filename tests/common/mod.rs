#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use unburnt::digest::Md5Digester;

/// A scan root plus an isolated area for manifests, ignore files, and config.
pub struct Fixture {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("tree");
        fs::create_dir_all(&root)?;
        Ok(Self { temp_dir, root })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Creates a file under the scan root, returning its MD5.
    pub fn file(&self, relative: &str, content: &str) -> Result<String> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(Md5Digester::digest_bytes(content.as_bytes()))
    }

    /// Writes `md5sum`-style lines for `(digest, path)` pairs.
    pub fn manifest(&self, name: &str, records: &[(&str, &str)]) -> Result<PathBuf> {
        let path = self.path().join(name);
        let content: String = records
            .iter()
            .map(|(digest, file)| format!("{digest}  ./{file}\n"))
            .collect();
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn ignore(&self, rules: &[&str]) -> Result<PathBuf> {
        let path = self.path().join("ignore.txt");
        fs::write(&path, rules.join("\n"))?;
        Ok(path)
    }

    /// The binary with the environment isolated from the host.
    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("unburnt")?;
        cmd.env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("UNBURNT_CONFIG_PATH")
            .env_remove("UNBURNT_THREADS")
            .env_remove("RUST_LOG")
            .arg("-f")
            .arg(&self.root);
        Ok(cmd)
    }
}

/// Sorted stdout lines of a successful run.
pub fn reported(cmd: &mut Command) -> Vec<String> {
    let output = cmd.assert().success().get_output().stdout.clone();
    let mut lines: Vec<String> = String::from_utf8_lossy(&output)
        .lines()
        .map(str::to_owned)
        .collect();
    lines.sort();
    lines
}
