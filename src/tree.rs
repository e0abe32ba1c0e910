//! Annotated ASCII rendering of the scanned directory tree.

use crate::filter::{FilterSet, PathDecision};
use crate::output::format_size;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Renders the tree rooted at `root`, one line per entry.
///
/// Directories render as `name/`, files as `name (size)` followed by an
/// inclusion indicator. Entries matching a traversal rule are omitted
/// entirely, as are symlinks and other non-regular entries, which the
/// collection walk never yields either. Directory read order is preserved
/// as the filesystem yields it.
pub fn render_tree(root: &Path, filter: &FilterSet) -> String {
    let mut out = String::new();
    render_into(root, root, filter, "", &mut out);
    out
}

fn render_into(dir: &Path, root: &Path, filter: &FilterSet, prefix: &str, out: &mut String) {
    let entries: Vec<_> = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir.collect(),
        Err(e) => {
            warn!("cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };
    let total = entries.len();
    for (index, entry) in entries.into_iter().enumerate() {
        // Last-sibling detection runs over the raw listing, so a pruned
        // final entry leaves the visible tail drawn with non-last glyphs.
        let is_last = index + 1 == total;
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let full_path = entry.path();
        let metadata = match fs::symlink_metadata(&full_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("cannot stat {}: {}", full_path.display(), e);
                continue;
            }
        };
        // Symlinks and special files are excluded from collection, so they
        // must not show up in the tree either.
        if !metadata.is_dir() && !metadata.is_file() {
            continue;
        }
        let relative = full_path.strip_prefix(root).unwrap_or(&full_path);
        if filter.skip_traversal(relative) {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let connector = if is_last { "└── " } else { "├── " };
        if metadata.is_dir() {
            out.push_str(&format!("{prefix}{connector}{name}/\n"));
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            render_into(&full_path, root, filter, &child_prefix, out);
        } else {
            let indicator = match filter.decide(&full_path, relative) {
                PathDecision::IncludeOcr => " 📄",
                PathDecision::IncludeText => " ✓",
                PathDecision::ContentSkip | PathDecision::TraverseSkip => " ✗",
            };
            out.push_str(&format!(
                "{prefix}{connector}{name} ({}){indicator}\n",
                format_size(metadata.len())
            ));
        }
    }
}
