//! The menu entry value type and its on-disk record format.

use crate::error::MenuError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the record files describing one menu entry each.
pub const MENU_FILE_EXT: &str = "mnu";

/// One entry of a context menu, fully resolved.
///
/// This value has no concept of a filesystem; use
/// [`MenuFile`](crate::hierarchy::MenuFile) to preserve provenance. Instances
/// are immutable. Equality and hashing are structural and recurse through
/// `children`, so two independently loaded hierarchies with identical content
/// compare and hash equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuItem {
    /// Label displayed in the GUI.
    pub name: String,
    /// Unique identifier used to build the registry key. Derived from the
    /// record file's stem, never stored in the record itself.
    pub identifier: String,
    /// Path to an .ico file.
    pub icon: Option<PathBuf>,
    /// Command called when clicking the entry, as a list of arguments.
    pub command: Vec<String>,
    /// Registry paths that must receive this entry. Only meaningful on root
    /// entries.
    pub paths: Vec<String>,
    /// Nested entries, in discovery order.
    pub children: Vec<MenuItem>,
    /// False marks the entry (and implicitly its children) as not intended to
    /// be displayed. Consumers decide how to treat enabled children of a
    /// disabled parent.
    pub enabled: bool,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<MenuItem \"{}\": {} children>",
            self.name,
            self.children.len()
        )
    }
}

/// On-disk record for one menu entry.
///
/// The identifier is absent on purpose: it is derived from the file name at
/// load time. Children are discovered structurally from a sibling directory,
/// they are never listed in the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl MenuItemRecord {
    /// Snapshot of a resolved item, ready to serialize back to disk.
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            icon: item.icon.as_ref().map(|p| p.to_string_lossy().into_owned()),
            command: item.command.clone(),
            paths: item.paths.clone(),
            enabled: item.enabled,
        }
    }
}

/// Parse a single record file into a [`MenuItem`], attaching the given
/// children.
///
/// The identifier is always the record file's stem, regardless of record
/// content. A missing or malformed record (for example an absent `name`)
/// fails with [`MenuError::Parse`] naming the offending path.
pub fn read_menu_item_from_file(
    path: &Path,
    children: Vec<MenuItem>,
) -> Result<MenuItem, MenuError> {
    let raw = fs::read_to_string(path).map_err(|e| MenuError::io(path, e))?;
    let record: MenuItemRecord =
        serde_json::from_str(&raw).map_err(|e| MenuError::parse(path, e.to_string()))?;

    let identifier = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| MenuError::parse(path, "record file has no stem"))?;

    Ok(MenuItem {
        name: record.name,
        identifier,
        icon: record.icon.filter(|s| !s.is_empty()).map(PathBuf::from),
        command: record.command,
        paths: record.paths,
        children,
        enabled: record.enabled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, identifier: &str) -> MenuItem {
        MenuItem {
            name: name.to_string(),
            identifier: identifier.to_string(),
            icon: None,
            command: vec![],
            paths: vec![],
            children: vec![],
            enabled: true,
        }
    }

    fn chain(levels: usize, rename_root: Option<&str>) -> MenuItem {
        let mut item = leaf("lowest", "");
        for i in 0..levels {
            let name = match rename_root {
                Some(n) if i == levels - 1 => n.to_string(),
                _ => i.to_string(),
            };
            item = MenuItem {
                name,
                identifier: i.to_string(),
                icon: None,
                command: vec![],
                paths: if i == levels - 1 {
                    vec!["p".to_string()]
                } else {
                    vec![]
                },
                children: vec![item],
                enabled: true,
            };
        }
        item
    }

    fn hash_of(item: &MenuItem) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        item.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn structural_hash_distinguishes_depth_and_content() {
        let deep = chain(13, None);
        let shallow_a = chain(12, None);
        let shallow_b = chain(12, None);
        let renamed = chain(12, Some("babz"));

        assert_ne!(hash_of(&deep), hash_of(&shallow_a));
        assert_eq!(hash_of(&shallow_a), hash_of(&shallow_b));
        assert_eq!(shallow_a, shallow_b);
        assert_ne!(hash_of(&shallow_b), hash_of(&renamed));
    }

    #[test]
    fn leaf_rename_changes_ancestor_hash_but_not_sibling() {
        let sibling = leaf("stable", "s");
        let make = |leaf_name: &str| MenuItem {
            name: "root".to_string(),
            identifier: "root".to_string(),
            icon: None,
            command: vec![],
            paths: vec!["p".to_string()],
            children: vec![leaf(leaf_name, "l"), sibling.clone()],
            enabled: true,
        };
        let a = make("one");
        let b = make("two");
        assert_ne!(hash_of(&a), hash_of(&b));
        assert_eq!(hash_of(&a.children[1]), hash_of(&b.children[1]));
    }

    #[test]
    fn missing_name_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mnu");
        std::fs::write(&path, r#"{"command": ["cmd"]}"#).unwrap();

        let err = read_menu_item_from_file(&path, vec![]).unwrap_err();
        match err {
            MenuError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn identifier_comes_from_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("FFMPEG.mnu");
        std::fs::write(&path, r#"{"name": "Ffmpeg"}"#).unwrap();

        let item = read_menu_item_from_file(&path, vec![]).unwrap();
        assert_eq!(item.identifier, "FFMPEG");
        assert_eq!(item.name, "Ffmpeg");
        assert!(item.enabled);
        assert!(item.command.is_empty());
    }
}
