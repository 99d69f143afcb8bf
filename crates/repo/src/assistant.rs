use std::env;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use agentry_core::tool::Error;
use serde_json::{Value, json};
use tokio::process::Command;

/// The assistant executable used when nothing else is configured.
pub const DEFAULT_COMMAND: &str = "claude";

/// The environment variable naming the assistant executable.
pub const COMMAND_ENV_VAR: &str = "CLAUDE_CODE_CMD";

const DEFAULT_SHELL: &str = "/bin/sh";

/// What the assistant printed on a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Standard output parsed as JSON.
    Structured(Value),
    /// Standard output that is not JSON, unchanged.
    Raw(String),
}

impl Payload {
    /// Interprets standard output, preferring JSON.
    pub fn parse(stdout: String) -> Self {
        match serde_json::from_str(&stdout) {
            Ok(value) => Payload::Structured(value),
            Err(_) => Payload::Raw(stdout),
        }
    }

    /// Returns `"json"` or `"text"`.
    #[inline]
    pub fn format(&self) -> &'static str {
        match self {
            Payload::Structured(_) => "json",
            Payload::Raw(_) => "text",
        }
    }

    /// Converts the payload into a JSON value, raw text becoming a string.
    #[inline]
    pub fn into_value(self) -> Value {
        match self {
            Payload::Structured(value) => value,
            Payload::Raw(text) => Value::String(text),
        }
    }
}

/// A successful assistant run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// The output of the run.
    pub payload: Payload,
    /// What `<cmd> --version` reported before the run.
    pub version: String,
}

impl Invocation {
    /// Converts the invocation into the fields of a success envelope.
    pub fn into_value(self) -> Value {
        let format = self.payload.format();
        json!({
            "result": self.payload.into_value(),
            "format": format,
            "claude_version": self.version,
        })
    }
}

/// An external code assistant reachable through a shell.
///
/// The command is spliced into a shell command line as-is, so it may be an
/// alias-like string such as `npx claude`. Instructions are always quoted as
/// a single shell word.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodeAssistant {
    command: String,
    shell: PathBuf,
}

impl CodeAssistant {
    /// Creates an assistant that runs `command`.
    #[inline]
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
            shell: PathBuf::from(DEFAULT_SHELL),
        }
    }

    /// Reads the command from `CLAUDE_CODE_CMD`, defaulting to `claude`.
    #[inline]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(COMMAND_ENV_VAR) {
            Some(command) if !command.trim().is_empty() => Self::new(command),
            _ => Self::new(DEFAULT_COMMAND),
        }
    }

    /// Sets the shell used to run command lines.
    #[inline]
    pub fn with_shell<P: Into<PathBuf>>(mut self, shell: P) -> Self {
        self.shell = shell.into();
        self
    }

    /// Returns the assistant command.
    #[inline]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Builds the command line that passes `instruction` to the assistant.
    pub fn command_line(&self, instruction: &str) -> Result<String, Error> {
        let quoted = shlex::try_quote(instruction).map_err(|err| {
            Error::invalid_input().with_reason(format!(
                "instruction cannot be passed to a shell: {err}"
            ))
        })?;
        Ok(format!("{} -p {quoted}", self.command))
    }

    /// Checks that the assistant can be started, returning its version.
    pub async fn probe(&self) -> Result<String, Error> {
        let cmdline = format!("{} --version", self.command);
        let output = self.run(&cmdline, None).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_unavailable().with_reason(format!(
                "{} CLI is not installed or not in PATH: {}",
                self.command,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = if stdout.trim().is_empty() {
            String::from_utf8_lossy(&output.stderr).trim().to_owned()
        } else {
            stdout.trim().to_owned()
        };
        Ok(version)
    }

    /// Runs the assistant with `instruction` inside `working_dir`.
    ///
    /// The directory is handed to the child process only; the working
    /// directory of the current process is never touched.
    pub async fn invoke(
        &self,
        instruction: &str,
        working_dir: &Path,
    ) -> Result<Invocation, Error> {
        let version = self.probe().await?;

        if !working_dir.is_dir() {
            return Err(Error::not_found().with_reason(format!(
                "Repository path does not exist: {}",
                working_dir.display()
            )));
        }

        let cmdline = self.command_line(instruction)?;
        debug!("running `{cmdline}` in {}", working_dir.display());
        let output = self.run(&cmdline, Some(working_dir)).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut err = Error::execution_failure().with_reason(format!(
                "{} execution failed: {}",
                self.command,
                stderr.trim_end()
            ));
            if let Some(code) = output.status.code() {
                err = err.with_exit_code(code);
            }
            return Err(err);
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let payload = Payload::parse(stdout);
        trace!("assistant replied with {} output", payload.format());
        Ok(Invocation { payload, version })
    }

    async fn run(
        &self,
        cmdline: &str,
        working_dir: Option<&Path>,
    ) -> Result<Output, Error> {
        let mut command = Command::new(&self.shell);
        command
            .arg("-c")
            .arg(cmdline)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(working_dir) = working_dir {
            command.current_dir(working_dir);
        }

        command.output().await.map_err(|err| {
            Error::tool_unavailable().with_reason(format!(
                "failed to start {}: {err}",
                self.shell.display()
            ))
        })
    }
}
