//! Structural validation of resolved menu hierarchies.
//!
//! Issues are returned as data, never raised: callers decide whether errors
//! block serialization ("ignore errors" mode proceeds anyway).

use crate::menu::MenuItem;
use std::collections::HashMap;

/// Deepest allowed nesting below a root entry.
const MAX_NESTING: u32 = 16;

/// Severity applied when an icon path doesn't resolve to an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconPolicy {
    /// Report the missing icon as a warning, don't block serialization.
    #[default]
    Warning,
    /// Treat the missing icon as an error.
    Error,
}

/// Issues found in a hierarchy, keyed by the offending entry.
///
/// Keys rely on the structural equality/hashing of [`MenuItem`]: two entries
/// collide only when their entire subtrees are deeply identical, which is
/// accepted behavior.
#[derive(Debug, Default)]
pub struct HierarchyIssues {
    pub errors: HashMap<MenuItem, Vec<String>>,
    pub warnings: HashMap<MenuItem, Vec<String>>,
}

impl HierarchyIssues {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    fn error(&mut self, entry: &MenuItem, message: String) {
        self.errors.entry(entry.clone()).or_default().push(message);
    }

    fn warning(&mut self, entry: &MenuItem, message: String) {
        self.warnings.entry(entry.clone()).or_default().push(message);
    }
}

/// Validate a hierarchy with the default icon policy.
pub fn validate_hierarchy(hierarchy: &[MenuItem]) -> HierarchyIssues {
    validate_hierarchy_with(hierarchy, IconPolicy::default())
}

/// Validate every entry of the hierarchy exactly once.
///
/// Rules are evaluated independently, so one entry can accumulate several
/// messages, and errors on a parent never stop traversal into its children.
pub fn validate_hierarchy_with(hierarchy: &[MenuItem], icon_policy: IconPolicy) -> HierarchyIssues {
    let mut issues = HierarchyIssues::default();
    validate_level(hierarchy, 0, icon_policy, &mut issues);
    issues
}

fn validate_level(
    entries: &[MenuItem],
    depth: u32,
    icon_policy: IconPolicy,
    issues: &mut HierarchyIssues,
) {
    for entry in entries {
        // Root entries don't count toward the nesting limit: the counter is 0
        // at root, 1 entering a child, then +1 per level.
        let counter = if depth == 0 { 0 } else { depth + 1 };

        if counter > MAX_NESTING {
            issues.error(
                entry,
                format!("maximum number of {MAX_NESTING} nested entry reached with {entry}"),
            );
        }

        if depth == 0 && entry.paths.is_empty() {
            issues.error(entry, format!("no paths specified for root entry {entry}"));
        }

        if !entry.children.is_empty() && !entry.command.is_empty() {
            issues.warning(
                entry,
                format!("Entry {entry} is specifying both a command and children."),
            );
        }

        if let Some(ref icon) = entry.icon {
            let has_dir_component = icon.parent().map_or(false, |p| !p.as_os_str().is_empty());
            if has_dir_component && !icon.is_file() {
                let message = format!(
                    "icon path doesn't exist on disk: got {}, expected to be an existing file.",
                    icon.display()
                );
                match icon_policy {
                    IconPolicy::Warning => issues.warning(entry, message),
                    IconPolicy::Error => issues.error(entry, message),
                }
            }
        }

        validate_level(&entry.children, depth + 1, icon_policy, issues);
    }
}
