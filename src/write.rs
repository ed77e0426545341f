//! Writing menu items back to disk and deleting existing records.
//!
//! Both helpers mirror the loader's on-disk conventions: a record file
//! `{identifier}.mnu` plus an `{identifier}/` directory holding the children.

use crate::error::MenuError;
use crate::hierarchy::MenuFile;
use crate::menu::{MenuItem, MenuItemRecord, MENU_FILE_EXT};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Serialize a [`MenuItem`] to a record file inside `directory`.
///
/// Existing files are overwritten. With `write_children`, every child is
/// recursively written into a subdirectory named after this item's
/// identifier, so a later [`load_hierarchy`](crate::hierarchy::load_hierarchy)
/// reproduces the tree value-for-value (when no tokens were present).
///
/// Returns the path of the record file written; child files may have been
/// written too.
pub fn write_menu_item_to_file(
    item: &MenuItem,
    directory: &Path,
    write_children: bool,
) -> Result<PathBuf, MenuError> {
    let record = MenuItemRecord::from_item(item);
    let dst_path = directory.join(format!("{}.{MENU_FILE_EXT}", item.identifier));

    let content = serde_json::to_string_pretty(&record)
        .map_err(|e| MenuError::parse(&dst_path, e.to_string()))?;
    fs::write(&dst_path, content).map_err(|e| MenuError::io(&dst_path, e))?;
    debug!(path = %dst_path.display(), "wrote menu record");

    if !write_children {
        return Ok(dst_path);
    }

    if !item.children.is_empty() {
        let child_dir = directory.join(&item.identifier);
        if !child_dir.is_dir() {
            fs::create_dir(&child_dir).map_err(|e| MenuError::io(&child_dir, e))?;
        }
        for child in &item.children {
            write_menu_item_to_file(child, &child_dir, true)?;
        }
    }

    Ok(dst_path)
}

/// Behavior switches for [`delete_menu_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// Also delete every child record, recursively.
    pub remove_children: bool,
    /// Additionally delete the whole children directory tree, including files
    /// that are not part of the menu structure. Implies nothing about
    /// `remove_children`; both can be set independently.
    pub remove_children_dir: bool,
    /// Report affected paths without touching the filesystem.
    pub dry_run: bool,
}

/// Delete the record file behind a provenance node.
///
/// Returns the duplicate-free set of every path that was (or, with
/// `dry_run`, would have been) removed, directories included.
pub fn delete_menu_file(
    file: &MenuFile,
    options: DeleteOptions,
) -> Result<BTreeSet<PathBuf>, MenuError> {
    let mut removed = BTreeSet::new();
    delete_recursive(file, options, &mut removed)?;
    if !options.dry_run {
        info!(count = removed.len(), path = %file.path.display(), "deleted menu records");
    }
    Ok(removed)
}

fn delete_recursive(
    file: &MenuFile,
    options: DeleteOptions,
    removed: &mut BTreeSet<PathBuf>,
) -> Result<(), MenuError> {
    removed.insert(file.path.clone());
    if !options.dry_run {
        fs::remove_file(&file.path).map_err(|e| MenuError::io(&file.path, e))?;
    }

    if options.remove_children {
        for child in &file.children {
            delete_recursive(child, options, removed)?;
        }
    }

    if options.remove_children_dir {
        let children_dir = file.children_dir();
        if children_dir.is_dir() {
            for entry in WalkDir::new(&children_dir) {
                let entry = entry.map_err(|e| {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| children_dir.clone());
                    match e.into_io_error() {
                        Some(io) => MenuError::io(path, io),
                        None => MenuError::DirectoryNotFound(children_dir.clone()),
                    }
                })?;
                removed.insert(entry.path().to_path_buf());
            }
            if !options.dry_run {
                fs::remove_dir_all(&children_dir).map_err(|e| MenuError::io(&children_dir, e))?;
            }
        }
    }

    Ok(())
}
