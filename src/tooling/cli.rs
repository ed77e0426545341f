//! CLI Tooling
//!
//! Command-line interface driving the whole pipeline: load the hierarchy from
//! disk, validate it, serialize the install/uninstall registry scripts and
//! write them to incrementing output filenames.

use crate::error::MenuError;
use crate::hierarchy::read_menu_hierarchy;
use crate::menu::MenuItem;
use crate::registry::generate_reg_from_hierarchy;
use crate::validation::{validate_hierarchy_with, HierarchyIssues, IconPolicy};
use anyhow::{bail, Context};
use clap::Parser;
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Convert file structures to right-click context menu for Windows.
#[derive(Parser, Debug)]
#[command(name = "regmenu", version)]
#[command(about = "Convert file structures to right-click context menu for Windows")]
pub struct Cli {
    /// Path to an existing directory containing context-menu entries.
    pub root_dir: PathBuf,

    /// Path to an existing directory where the reg files must be created.
    /// Default is root-dir.
    #[arg(long)]
    pub target_dir: Option<PathBuf>,

    /// Output debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Doesn't abort when validation errors are found. Use at your own risk.
    #[arg(long)]
    pub ignore_errors: bool,

    /// Treat a missing icon file as an error instead of a warning.
    #[arg(long)]
    pub strict_icons: bool,
}

/// Resolved execution context for one CLI invocation.
pub struct CliContext {
    root_dir: PathBuf,
    target_dir: PathBuf,
    ignore_errors: bool,
    icon_policy: IconPolicy,
}

impl CliContext {
    /// Canonicalize and check the directories the user named.
    pub fn new(cli: &Cli) -> Result<Self, anyhow::Error> {
        let root_dir = canonical_dir(&cli.root_dir)?;
        let target_dir = match cli.target_dir {
            Some(ref target) => canonical_dir(target)?,
            None => root_dir.clone(),
        };
        Ok(Self {
            root_dir,
            target_dir,
            ignore_errors: cli.ignore_errors,
            icon_policy: if cli.strict_icons {
                IconPolicy::Error
            } else {
                IconPolicy::Warning
            },
        })
    }

    /// Run the pipeline. Returns a human-readable summary for stdout.
    pub fn execute(&self) -> Result<String, anyhow::Error> {
        info!(
            "starting {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        info!(root = %self.root_dir.display(), "reading hierarchy");

        let hierarchy = read_menu_hierarchy(&self.root_dir, true)?;
        let issues = validate_hierarchy_with(&hierarchy, self.icon_policy);
        self.report_issues(&issues)?;

        let comments = vec![format!("generated from {}", self.root_dir.display())];
        let reg_install = generate_reg_from_hierarchy(&hierarchy, &comments, true);
        let reg_uninstall = generate_reg_from_hierarchy(&hierarchy, &comments, false);

        let install_path = increment_path(&self.target_dir.join("install.reg"))?;
        write_lines(&install_path, &reg_install)?;
        let uninstall_path = increment_path(&self.target_dir.join("uninstall.reg"))?;
        write_lines(&uninstall_path, &reg_uninstall)?;

        Ok(format!(
            "{}\n  {}\n  {}",
            "generated registry scripts:".bold(),
            install_path.display(),
            uninstall_path.display()
        ))
    }

    fn report_issues(&self, issues: &HierarchyIssues) -> Result<(), anyhow::Error> {
        if issues.has_warnings() {
            warn!(
                "{}",
                format_issue_block(&issues.warnings, &"warning".yellow().to_string())
            );
        }
        if issues.has_errors() {
            let block = format_issue_block(&issues.errors, &"error".red().to_string());
            error!("{block}");
            if !self.ignore_errors {
                bail!("parsed hierarchy has issues:\n{block}");
            }
        }
        Ok(())
    }
}

fn canonical_dir(path: &Path) -> Result<PathBuf, anyhow::Error> {
    if !path.is_dir() {
        return Err(MenuError::DirectoryNotFound(path.to_path_buf()).into());
    }
    dunce::canonicalize(path)
        .with_context(|| format!("cannot canonicalize directory {}", path.display()))
}

/// One line per entry, its messages indented below, entries sorted for stable
/// output.
fn format_issue_block(issues: &HashMap<MenuItem, Vec<String>>, severity: &str) -> String {
    let mut entries: Vec<(String, &Vec<String>)> = issues
        .iter()
        .map(|(entity, messages)| (entity.to_string(), messages))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    entries
        .iter()
        .map(|(entity, messages)| {
            let details = messages
                .iter()
                .map(|m| format!("  {severity}: {m}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!("- {entity}:\n{details}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pick the next free incremented output path for `base`.
///
/// `install.reg` becomes `install.0001.reg`, or the lowest 4-digit suffix
/// above every same-stem file already on disk.
pub fn increment_path(base: &Path) -> Result<PathBuf, anyhow::Error> {
    let parent = base.parent().unwrap_or(Path::new("."));
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut increment: u32 = 1;
    for entry in fs::read_dir(parent).with_context(|| format!("cannot list {}", parent.display()))? {
        let entry = entry.with_context(|| format!("cannot list {}", parent.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(rest) = name
            .strip_prefix(&format!("{stem}."))
            .and_then(|r| r.strip_suffix(&format!(".{ext}")))
        else {
            continue;
        };
        if rest.len() == 4 && rest.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(existing) = rest.parse::<u32>() {
                increment = increment.max(existing + 1);
            }
        }
    }

    Ok(parent.join(format!("{stem}.{increment:04}.{ext}")))
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), anyhow::Error> {
    info!(path = %path.display(), "writing registry script");
    fs::write(path, lines.join("\n"))
        .with_context(|| format!("cannot write output file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_starts_at_one() {
        let temp = tempfile::tempdir().unwrap();
        let next = increment_path(&temp.path().join("install.reg")).unwrap();
        assert_eq!(next, temp.path().join("install.0001.reg"));
    }

    #[test]
    fn increment_skips_past_existing_versions() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("install.0001.reg"), "").unwrap();
        fs::write(temp.path().join("install.0004.reg"), "").unwrap();
        // same suffix on a different stem must not interfere
        fs::write(temp.path().join("uninstall.0009.reg"), "").unwrap();

        let next = increment_path(&temp.path().join("install.reg")).unwrap();
        assert_eq!(next, temp.path().join("install.0005.reg"));
    }

    #[test]
    fn non_numeric_suffixes_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("install.backup.reg"), "").unwrap();
        fs::write(temp.path().join("install.00012.reg"), "").unwrap();

        let next = increment_path(&temp.path().join("install.reg")).unwrap();
        assert_eq!(next, temp.path().join("install.0001.reg"));
    }
}
