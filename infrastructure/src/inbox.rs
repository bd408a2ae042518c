//! Inbox: a file-driven debate queue
//!
//! Drop `.md` question files into the inbox directory and an `--inbox`
//! run debates them oldest-first. A file may open with YAML frontmatter
//! overriding debate settings for that question. Processed files move to
//! the archive directory with a timestamp prefix; failed ones also get a
//! `FAILED_` marker so they are easy to spot and re-queue.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InboxError {
    #[error("inbox I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid frontmatter in {}: {source}", path.display())]
    Frontmatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("question file {} is empty", .0.display())]
    EmptyQuestion(PathBuf),
}

/// Per-file overrides carried in frontmatter
///
/// ```markdown
/// ---
/// rounds: 3
/// panel: claude,gemini,grok
/// full: true
/// ---
/// Should we split the billing service?
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InboxOverrides {
    pub rounds: Option<u32>,
    /// Comma-separated identity names, same syntax as `--panel`
    pub panel: Option<String>,
    pub full: Option<bool>,
}

/// One question pulled from the inbox
#[derive(Debug)]
pub struct InboxQuestion {
    pub path: PathBuf,
    pub text: String,
    pub overrides: InboxOverrides,
}

impl InboxQuestion {
    /// File stem, used as the report slug so output traces back to input
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// Create the inbox and archive directories if they do not exist
pub fn ensure_dirs(inbox_dir: &Path, archive_dir: &Path) -> Result<(), InboxError> {
    fs::create_dir_all(inbox_dir)?;
    fs::create_dir_all(archive_dir)?;
    Ok(())
}

/// All `.md` files in the inbox, oldest modification first
pub fn scan(inbox_dir: &Path) -> Result<Vec<PathBuf>, InboxError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(inbox_dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            let modified = entry.metadata()?.modified()?;
            files.push((modified, path));
        }
    }
    files.sort();
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Read one question file, splitting optional frontmatter from the body
pub fn read_question(path: &Path) -> Result<InboxQuestion, InboxError> {
    let raw = fs::read_to_string(path)?;
    let (overrides, body) = split_frontmatter(&raw, path)?;
    let text = body.trim();
    if text.is_empty() {
        return Err(InboxError::EmptyQuestion(path.to_path_buf()));
    }
    Ok(InboxQuestion {
        path: path.to_path_buf(),
        text: text.to_string(),
        overrides,
    })
}

/// Move a processed file into the archive with a timestamp prefix
pub fn archive(path: &Path, archive_dir: &Path, failed: bool) -> Result<PathBuf, InboxError> {
    fs::create_dir_all(archive_dir)?;

    let stamp = chrono::Local::now().format("%Y-%m-%dT%H%M");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "question.md".to_string());
    let prefix = if failed { "FAILED_" } else { "" };
    let target = archive_dir.join(format!("{prefix}{stamp}_{name}"));

    fs::rename(path, &target)?;
    Ok(target)
}

fn split_frontmatter<'a>(
    raw: &'a str,
    path: &Path,
) -> Result<(InboxOverrides, &'a str), InboxError> {
    if !raw.starts_with("---") {
        return Ok((InboxOverrides::default(), raw));
    }

    let mut parts = raw.splitn(3, "---");
    parts.next(); // text before the opening fence, always empty
    let (Some(front), Some(body)) = (parts.next(), parts.next()) else {
        // No closing fence; treat the whole file as body
        return Ok((InboxOverrides::default(), raw));
    };

    if front.trim().is_empty() {
        return Ok((InboxOverrides::default(), body));
    }

    let overrides = serde_yaml::from_str(front).map_err(|source| InboxError::Frontmatter {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((overrides, body))
}
