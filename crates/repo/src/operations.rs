use std::path::{Component, Path, PathBuf};

use agentry_core::tool::Error;

use crate::{CodeAssistant, Invocation};

/// Searches the repository for code, patterns or concepts.
pub async fn search_repository(
    assistant: &CodeAssistant,
    query: &str,
    repo_path: &Path,
    file_patterns: &[String],
) -> Result<Invocation, Error> {
    let instruction = search_instruction(query, file_patterns);
    assistant.invoke(&instruction, repo_path).await
}

/// Explains a file, or a line range such as `10-20` inside it.
pub async fn explain_code(
    assistant: &CodeAssistant,
    file_path: &Path,
    repo_path: &Path,
    line_range: Option<&str>,
) -> Result<Invocation, Error> {
    let file_path = relative_to_repo(file_path, repo_path)?;
    let instruction = explain_instruction(&file_path, line_range);
    assistant.invoke(&instruction, repo_path).await
}

/// Edits a file according to `instruction`.
pub async fn modify_code(
    assistant: &CodeAssistant,
    instruction: &str,
    file_path: &Path,
    repo_path: &Path,
) -> Result<Invocation, Error> {
    let file_path = relative_to_repo(file_path, repo_path)?;
    let instruction = modify_instruction(&file_path, instruction);
    assistant.invoke(&instruction, repo_path).await
}

/// Hands a free-form task to the assistant unchanged.
#[inline]
pub async fn execute_task(
    assistant: &CodeAssistant,
    task: &str,
    repo_path: &Path,
) -> Result<Invocation, Error> {
    assistant.invoke(task, repo_path).await
}

/// Rewrites `file_path` relative to `repo_path`.
///
/// Relative paths are taken from the repository root. Paths that end up
/// outside the repository, whether absolute, through `..` or through a
/// symlink, are rejected. The existing part of each path is resolved on the
/// file system; the rest is normalized lexically.
pub fn relative_to_repo(
    file_path: &Path,
    repo_path: &Path,
) -> Result<PathBuf, Error> {
    let repo = std::path::absolute(repo_path).map_err(|err| {
        Error::invalid_input().with_reason(format!(
            "Invalid repository path {}: {err}",
            repo_path.display()
        ))
    })?;
    let full = resolve(&repo.join(file_path));
    let repo = resolve(&repo);

    match full.strip_prefix(&repo) {
        Ok(relative) if !relative.as_os_str().is_empty() => {
            Ok(relative.to_path_buf())
        }
        _ => Err(Error::invalid_input().with_reason(format!(
            "File path {} is not within repository {}",
            file_path.display(),
            repo_path.display()
        ))),
    }
}

// Canonicalizes the deepest existing ancestor and appends the missing tail.
fn resolve(path: &Path) -> PathBuf {
    let path = normalize(path);
    let mut existing = path.as_path();
    let mut missing = vec![];
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing.iter().rev().fold(canonical, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return path,
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

fn search_instruction(query: &str, file_patterns: &[String]) -> String {
    let mut instruction = String::from("search");
    if !file_patterns.is_empty() {
        instruction.push_str(&format!(
            " --include=\"{}\"",
            file_patterns.join(",")
        ));
    }
    instruction.push_str(&format!(" \"{}\"", escape_quotes(query)));
    instruction
}

fn explain_instruction(file_path: &Path, line_range: Option<&str>) -> String {
    match line_range {
        Some(range) if !range.is_empty() => {
            format!("explain {}:{range}", file_path.display())
        }
        _ => format!("explain {}", file_path.display()),
    }
}

fn modify_instruction(file_path: &Path, instruction: &str) -> String {
    format!(
        "edit {} \"{}\"",
        file_path.display(),
        escape_quotes(instruction)
    )
}
