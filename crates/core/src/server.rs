//! Descriptions of tool servers that talk over a subprocess's stdio.

use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::tool::Error;

/// How to launch a tool server whose protocol runs over stdin/stdout.
///
/// Only the launch is owned here. Speaking the protocol itself is left to
/// whichever client drives the agent.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StdioServerParams {
    name: String,
    command: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl StdioServerParams {
    /// Creates parameters for running `command` under the given name.
    #[inline]
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, command: S2) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: vec![],
            env: BTreeMap::new(),
        }
    }

    /// Appends an argument.
    #[inline]
    pub fn with_arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[inline]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable for the subprocess.
    #[inline]
    pub fn with_env<K: Into<String>, V: Into<String>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Returns the server name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the program to run.
    #[inline]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the program arguments.
    #[inline]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the variables set on top of the inherited environment.
    #[inline]
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Launches the server with piped stdin and stdout.
    ///
    /// The child inherits the current environment plus [`Self::env`], and is
    /// killed when the returned handle is dropped.
    pub fn spawn(&self) -> Result<Child, Error> {
        debug!(
            "launching stdio server `{}`: {} {:?}",
            self.name, self.command, self.args
        );
        Command::new(&self.command)
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                Error::tool_unavailable().with_reason(format!(
                    "failed to launch `{}`: {err}",
                    self.command
                ))
            })
    }
}

impl Debug for StdioServerParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values may be access tokens.
        f.debug_struct("StdioServerParams")
            .field("name", &self.name)
            .field("command", &self.command)
            .field("args", &self.args)
            .field("env", &self.env.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    use super::*;
    use crate::tool::ErrorKind;

    #[test]
    fn test_debug_hides_env_values() {
        let params = StdioServerParams::new("github", "docker")
            .with_env("GITHUB_PERSONAL_ACCESS_TOKEN", "ghp_secret");
        let debug = format!("{params:?}");
        assert!(debug.contains("GITHUB_PERSONAL_ACCESS_TOKEN"));
        assert!(!debug.contains("ghp_secret"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_pipes_stdio() {
        let params = StdioServerParams::new("echo", "sh")
            .with_args(["-c", "read line; echo \"$GREETING $line\""])
            .with_env("GREETING", "hello");
        let mut child = params.spawn().unwrap();

        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(b"world\n").await.unwrap();
        drop(stdin);

        let stdout = child.stdout.take().unwrap();
        let mut line = String::new();
        BufReader::new(stdout).read_line(&mut line).await.unwrap();
        assert_eq!(line, "hello world\n");

        assert!(child.wait().await.unwrap().success());
    }

    #[tokio::test]
    async fn test_spawn_missing_program() {
        let params =
            StdioServerParams::new("nothing", "agentry-no-such-program");
        let err = params.spawn().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ToolUnavailable);
    }
}
