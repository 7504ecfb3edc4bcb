use serde::{Deserialize, Serialize};

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// a collaborator process that did not do what the pipeline needed
#[derive(Debug, thiserror::Error)]
pub enum ExternalToolFailure {
    #[error("could not launch `{program}` in {}: {source}", .work_dir.display())]
    Launch {
        program: String,
        work_dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status} in {}\nstderr:\n{stderr}", .work_dir.display())]
    ExitStatus {
        program: String,
        work_dir: PathBuf,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    #[error("`{program}` did not produce the expected output file {}", .path.display())]
    MissingOutput { program: String, path: PathBuf },
}

/// captured standard streams of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// An external program (mesher, converter, extruder). It is always run in an explicit
/// working directory, never in the current directory of this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTool {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ExternalTool {
    pub fn new<T: Into<String>>(program: T) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<T: Into<String>>(mut self, arg: T) -> Self {
        self.args.push(arg.into());
        self
    }

    /// a copy of this tool with `extra` appended to its arguments
    pub fn with_args<I, T>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut tool = self.clone();
        tool.args.extend(extra.into_iter().map(Into::into));
        tool
    }

    /// run to completion inside `work_dir`, failing on a non-zero exit status
    pub fn run_in(&self, work_dir: &Path) -> Result<ToolOutput, ExternalToolFailure> {
        log::info!(
            "running `{} {}` in {}",
            self.program,
            self.args.join(" "),
            work_dir.display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(work_dir)
            .output()
            .map_err(|source| ExternalToolFailure::Launch {
                program: self.program.clone(),
                work_dir: work_dir.to_path_buf(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !stdout.is_empty() {
            log::debug!("{} stdout:\n{stdout}", self.program);
        }
        if !stderr.is_empty() {
            log::debug!("{} stderr:\n{stderr}", self.program);
        }

        if !output.status.success() {
            return Err(ExternalToolFailure::ExitStatus {
                program: self.program.clone(),
                work_dir: work_dir.to_path_buf(),
                status: output.status,
                stdout,
                stderr,
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }

    /// fail unless this tool left `path` behind
    pub fn require_output(&self, path: &Path) -> Result<(), ExternalToolFailure> {
        if path.is_file() {
            Ok(())
        } else {
            Err(ExternalToolFailure::MissingOutput {
                program: self.program.clone(),
                path: path.to_path_buf(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn runs_in_the_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ExternalTool::new("sh").arg("-c").arg("pwd; touch made.txt");

        let output = tool.run_in(dir.path()).unwrap();

        let reported = PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
        assert!(tool.require_output(&dir.path().join("made.txt")).is_ok());
    }

    #[test]
    fn non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ExternalTool::new("sh").with_args(["-c", "echo broken >&2; exit 3"]);

        match tool.run_in(dir.path()) {
            Err(ExternalToolFailure::ExitStatus { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn missing_program_and_output() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ExternalTool::new("definitely-not-a-real-mesher");

        assert!(matches!(
            tool.run_in(dir.path()),
            Err(ExternalToolFailure::Launch { .. })
        ));
        assert!(matches!(
            tool.require_output(&dir.path().join("out.ugrid")),
            Err(ExternalToolFailure::MissingOutput { .. })
        ));
    }
}
