//! Regmenu: file hierarchies to Windows context-menu registry scripts
//!
//! Converts a directory tree of small declarative menu files into a pair of
//! registry import scripts (install / uninstall) for the Windows Explorer
//! "right click" context menu.

pub mod error;
pub mod hierarchy;
pub mod logging;
pub mod menu;
pub mod registry;
pub mod tokens;
pub mod tooling;
pub mod validation;
pub mod write;

pub use error::MenuError;
pub use hierarchy::{load_hierarchy, read_menu_hierarchy, MenuFile};
pub use menu::{MenuItem, MENU_FILE_EXT};
pub use registry::generate_reg_from_hierarchy;
pub use tokens::TokenResolver;
pub use validation::{validate_hierarchy, validate_hierarchy_with, HierarchyIssues, IconPolicy};
pub use write::{delete_menu_file, write_menu_item_to_file, DeleteOptions};
