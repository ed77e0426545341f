//! Loading menu hierarchies from disk.
//!
//! Parent/child relationships are encoded by the filesystem: a record file
//! `Foo.mnu` owns every record inside a sibling directory named `Foo`. Only
//! root files are returned by the loader; the rest of the hierarchy hangs off
//! their `children`.

use crate::error::MenuError;
use crate::menu::{read_menu_item_from_file, MenuItem, MENU_FILE_EXT};
use crate::tokens::TokenResolver;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A menu record file existing on disk, before resolution.
///
/// Immutable describer of a disk location; the write/delete helpers act on the
/// filesystem through it but never mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuFile {
    /// Filesystem path to the record file.
    pub path: PathBuf,
    /// The hierarchy root directory this file was discovered from.
    pub root_dir: PathBuf,
    /// Records that are children of this one in the hierarchy.
    pub children: Vec<MenuFile>,
}

impl MenuFile {
    /// True if this file sits directly at the root of the hierarchy.
    pub fn at_root(&self) -> bool {
        self.path.parent() == Some(self.root_dir.as_path())
    }

    /// Directory holding this file's child records, whether or not it exists.
    pub fn children_dir(&self) -> PathBuf {
        self.path.with_extension("")
    }

    /// Parse this file (and recursively its children) into a [`MenuItem`].
    ///
    /// With `resolve_tokens`, the `icon` field and every `command` argument go
    /// through the token resolver with `CWD` bound to the record's directory
    /// and `ROOT` to the hierarchy root, both with backslashes doubled so
    /// substituted paths survive registry escaping.
    pub fn content(&self, resolve_tokens: bool) -> Result<MenuItem, MenuError> {
        let children = self
            .children
            .iter()
            .map(|child| child.content(resolve_tokens))
            .collect::<Result<Vec<_>, _>>()?;

        let mut item = read_menu_item_from_file(&self.path, children)?;

        if resolve_tokens {
            let cwd = self
                .path
                .parent()
                .unwrap_or(Path::new(""))
                .to_string_lossy()
                .replace('\\', "\\\\");
            let root = self.root_dir.to_string_lossy().replace('\\', "\\\\");
            let resolver = TokenResolver::new(cwd, root);

            item.icon = item
                .icon
                .take()
                .map(|icon| resolver.resolve(&icon.to_string_lossy()))
                .filter(|s| !s.is_empty())
                .map(PathBuf::from);
            item.command = item
                .command
                .iter()
                .map(|arg| resolver.resolve(arg))
                .collect();
        }

        Ok(item)
    }
}

/// Walk `root_dir` and build the hierarchy of menu record files.
///
/// Records directly inside `root_dir` become root files, in lexicographic
/// filename order. A directory named after a record's stem is recursed into as
/// that record's child source, sharing the original root for token resolution.
pub fn load_hierarchy(root_dir: &Path) -> Result<Vec<MenuFile>, MenuError> {
    if !root_dir.is_dir() {
        return Err(MenuError::DirectoryNotFound(root_dir.to_path_buf()));
    }
    load_level(root_dir, root_dir)
}

fn load_level(dir: &Path, initial_root: &Path) -> Result<Vec<MenuFile>, MenuError> {
    let mut record_paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| MenuError::io(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| MenuError::io(dir, e))?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().map_or(false, |ext| ext == MENU_FILE_EXT)
        })
        .collect();
    record_paths.sort();

    let mut output = Vec::with_capacity(record_paths.len());
    for record_path in record_paths {
        let children_dir = record_path.with_extension("");
        let children = if children_dir.is_dir() {
            load_level(&children_dir, initial_root)?
        } else {
            Vec::new()
        };

        debug!(path = %record_path.display(), children = children.len(), "discovered menu record");
        output.push(MenuFile {
            path: record_path,
            root_dir: initial_root.to_path_buf(),
            children,
        });
    }

    Ok(output)
}

/// Load and resolve a hierarchy in one step.
///
/// The returned items have no concept of the original filesystem structure;
/// use [`load_hierarchy`] when provenance must be preserved.
pub fn read_menu_hierarchy(
    root_dir: &Path,
    resolve_tokens: bool,
) -> Result<Vec<MenuItem>, MenuError> {
    let hierarchy = load_hierarchy(root_dir)?;
    hierarchy
        .iter()
        .map(|file| file.content(resolve_tokens))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_record(dir: &Path, stem: &str, json: &str) -> PathBuf {
        let path = dir.join(format!("{stem}.{MENU_FILE_EXT}"));
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn missing_root_dir_is_reported() {
        let err = load_hierarchy(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, MenuError::DirectoryNotFound(_)));
    }

    #[test]
    fn records_are_discovered_in_filename_order_with_children() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write_record(root, "beta", r#"{"name": "Beta", "paths": ["HKEY_X"]}"#);
        write_record(root, "alpha", r#"{"name": "Alpha", "paths": ["HKEY_X"]}"#);
        fs::create_dir(root.join("alpha")).unwrap();
        write_record(&root.join("alpha"), "child", r#"{"name": "Child"}"#);
        // a stray non-record file must be ignored
        fs::write(root.join("notes.txt"), "ignore me").unwrap();

        let hierarchy = load_hierarchy(root).unwrap();
        assert_eq!(hierarchy.len(), 2);
        assert!(hierarchy[0].at_root());
        assert!(hierarchy[0].path.ends_with("alpha.mnu"));
        assert_eq!(hierarchy[0].children.len(), 1);
        assert!(!hierarchy[0].children[0].at_root());
        assert!(hierarchy[1].path.ends_with("beta.mnu"));
        assert!(hierarchy[1].children.is_empty());
    }

    #[test]
    fn content_resolves_cwd_and_root_tokens() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write_record(
            root,
            "entry",
            r#"{"name": "Entry", "paths": ["HKEY_X"], "icon": "@CWD/icon.ico",
               "command": ["run", "@ROOT/tool.exe", "@@literal"]}"#,
        );

        let hierarchy = load_hierarchy(root).unwrap();
        let item = hierarchy[0].content(true).unwrap();

        let root_str = root.to_string_lossy();
        assert_eq!(
            item.icon,
            Some(PathBuf::from(format!("{root_str}/icon.ico")))
        );
        assert_eq!(item.command[1], format!("{root_str}/tool.exe"));
        assert_eq!(item.command[2], "@literal");
    }

    #[test]
    fn content_without_resolution_keeps_tokens_raw() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write_record(
            root,
            "entry",
            r#"{"name": "Entry", "command": ["@CWD/tool.exe"]}"#,
        );

        let hierarchy = load_hierarchy(root).unwrap();
        let item = hierarchy[0].content(false).unwrap();
        assert_eq!(item.command[0], "@CWD/tool.exe");
    }

    #[test]
    fn one_bad_record_aborts_the_whole_load() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write_record(root, "good", r#"{"name": "Good", "paths": ["HKEY_X"]}"#);
        write_record(root, "zz_bad", r#"{"icon": "no-name-field.ico"}"#);

        let err = read_menu_hierarchy(root, true).unwrap_err();
        assert!(matches!(err, MenuError::Parse { .. }));
    }
}
