use super::{ContentDigester, DigestError, leading_digest};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Digests files by running an external `md5sum`-compatible program.
///
/// The program is resolved on `PATH` once, at construction. It is invoked as
/// `<program> <file>` and must print the digest as the first 32 characters of
/// its output.
#[derive(Debug, Clone)]
pub struct CommandDigester {
    program: String,
    resolved: PathBuf,
}

impl CommandDigester {
    /// Locates `program` on `PATH` (or as a direct path).
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::ToolUnavailable`] if the program cannot be found.
    pub fn new(program: &str) -> Result<Self, DigestError> {
        let resolved = which::which(program).map_err(|e| DigestError::ToolUnavailable {
            tool: program.to_owned(),
            reason: e.to_string(),
        })?;
        debug!(program, resolved = %resolved.display(), "Digest tool located");

        Ok(Self {
            program: program.to_owned(),
            resolved,
        })
    }
}

impl ContentDigester for CommandDigester {
    fn digest(&self, path: &Path) -> Result<String, DigestError> {
        let output = Command::new(&self.resolved)
            .arg(path)
            .output()
            .map_err(|e| DigestError::ToolUnavailable {
                tool: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.lines().next().unwrap_or("").trim().to_owned();
            return Err(DigestError::io(
                path,
                std::io::Error::other(format!(
                    "{} exited with {}: {message}",
                    self.program, output.status
                )),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        // md5sum prefixes the line with a backslash when it escapes the name
        let line = stdout.strip_prefix('\\').unwrap_or(&*stdout);

        leading_digest(line).ok_or_else(|| DigestError::MalformedToolOutput {
            tool: self.program.clone(),
            output: stdout.lines().next().unwrap_or("").to_owned(),
        })
    }

    fn name(&self) -> &str {
        &self.program
    }
}
