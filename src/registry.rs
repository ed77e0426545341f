//! Serialization of menu hierarchies to Windows registry import syntax.

use crate::menu::MenuItem;
use std::path::Path;

/// First line of every generated file, fixed by the registry editor format.
const FORMAT_BANNER: &str = "Windows Registry Editor Version 5.00";

/// Escape a filesystem path for use as a registry string value.
pub fn escape_registry_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}

/// Join command arguments into one Windows command line.
///
/// Inverse of `CommandLineToArgvW` parsing: arguments containing spaces, tabs
/// or nothing at all are quoted; runs of backslashes are doubled when they
/// precede a quote, and embedded quotes become `\"`.
pub fn escape_windows_command(command: &[String]) -> String {
    let mut result = String::new();

    for arg in command {
        if !result.is_empty() {
            result.push(' ');
        }

        let needquote = arg.contains(' ') || arg.contains('\t') || arg.is_empty();
        if needquote {
            result.push('"');
        }

        let mut backslashes = 0usize;
        for c in arg.chars() {
            match c {
                '\\' => backslashes += 1,
                '"' => {
                    result.extend(std::iter::repeat('\\').take(backslashes * 2));
                    backslashes = 0;
                    result.push_str("\\\"");
                }
                other => {
                    result.extend(std::iter::repeat('\\').take(backslashes));
                    backslashes = 0;
                    result.push(other);
                }
            }
        }
        // trailing backslashes are doubled when followed by the closing quote
        result.extend(std::iter::repeat('\\').take(if needquote {
            backslashes * 2
        } else {
            backslashes
        }));
        if needquote {
            result.push('"');
        }
    }

    result
}

fn generate_reg_from_entry(entry: &MenuItem, parent_path: &str, add_keys: bool) -> Vec<String> {
    let mut output = Vec::new();
    let path_prefix = if add_keys { "" } else { "-" };
    let full_path = format!("{parent_path}\\shell\\{}", entry.identifier);

    if !entry.children.is_empty() {
        output.push(format!("; {}", entry.name));
    }

    output.push(format!("[{path_prefix}{full_path}]"));
    output.push(format!("\"MUIVerb\"=\"{}\"", entry.name));
    if let Some(ref icon) = entry.icon {
        output.push(format!("\"icon\"=\"{}\"", escape_registry_path(icon)));
    }

    if !entry.children.is_empty() {
        output.push("\"subCommands\"=\"\"".to_string());
        for child in &entry.children {
            output.push(String::new());
            // removing the top-level key already removes the subtree, so
            // nested keys are always written in the plain form
            output.extend(generate_reg_from_entry(child, &full_path, true));
        }
    } else {
        output.push(format!("[{path_prefix}{full_path}\\command]"));
        output.push(format!("@=\"{}\"", escape_windows_command(&entry.command)));
    }

    output
}

/// Generate a registry import file from the given hierarchy, as lines.
///
/// `add_keys` selects between the install file (plain keys) and the
/// uninstall file (root keys marked for removal with a `-` prefix). Header
/// comments are each prefixed with `; ` unless they already start with `;`.
pub fn generate_reg_from_hierarchy(
    hierarchy: &[MenuItem],
    header_comments: &[String],
    add_keys: bool,
) -> Vec<String> {
    let mut output = vec![
        FORMAT_BANNER.to_string(),
        String::new(),
        format!(
            "; File auto-generated from {} v{}.",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ),
    ];
    output.extend(header_comments.iter().map(|comment| {
        if comment.starts_with(';') {
            comment.clone()
        } else {
            format!("; {comment}")
        }
    }));
    output.push(String::new());

    for root_entry in hierarchy {
        for registry_path in &root_entry.paths {
            output.push(String::new());
            output.extend(generate_reg_from_entry(root_entry, registry_path, add_keys));
        }
    }

    output
}
