use std::fs;
use std::path::Path;

use crate::CodeAssistant;

/// Writes a shell script standing in for the assistant CLI.
///
/// `--version` prints `fake-assistant 1.0.0`; any other call runs `body`
/// with the usual `-p <instruction>` arguments.
pub(crate) fn fake_assistant(dir: &Path, body: &str) -> CodeAssistant {
    let script = dir.join("fake-assistant.sh");
    fs::write(
        &script,
        format!(
            "if [ \"$1\" = \"--version\" ]; then\n  echo 'fake-assistant 1.0.0'\n  exit 0\nfi\n{body}\n"
        ),
    )
    .unwrap();

    let script = script.to_str().unwrap();
    CodeAssistant::new(format!("sh {}", shlex::try_quote(script).unwrap()))
}
