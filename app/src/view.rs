//! The grouped marker listing as rendered for the terminal and for `--json`.
//!
//! One long-lived view holds one reference root and a label cache; the index
//! stays free of any rendering concern.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use todo_tree_core::{Marker, MarkerIndex};

#[derive(Serialize)]
struct JsonFile {
    path: String,
    markers: Vec<Marker>,
}

#[derive(Serialize)]
struct JsonListing {
    total: usize,
    files: Vec<JsonFile>,
}

/// Serialize the grouped view of the index as pretty-printed JSON.
pub fn render_json(index: &MarkerIndex) -> serde_json::Result<String> {
    let files = index
        .files_grouped()
        .into_iter()
        .map(|(path, markers)| JsonFile { path, markers })
        .collect();
    serde_json::to_string_pretty(&JsonListing {
        total: index.total_count(),
        files,
    })
}

/// Text renderer for the grouped listing.
///
/// Per file: a `name (count)` header, the root-relative path, then one
/// `line: text` row per marker, followed by an overall summary line. Header
/// labels are memoized by `(path, count)`; the cache is cosmetic only and can
/// be dropped at any time without affecting what gets rendered next.
pub struct TreeView {
    root: PathBuf,
    label_cache: HashMap<(String, usize), String>,
}

impl TreeView {
    pub fn new(root: &Path) -> Self {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        Self {
            root,
            label_cache: HashMap::new(),
        }
    }

    pub fn render(&mut self, index: &MarkerIndex) -> String {
        let grouped = index.files_grouped();

        // Keep only labels for the current (path, count) pairs; fluctuating
        // counts in a long watch session must not grow the cache unboundedly.
        self.label_cache.retain(|(path, count), _| {
            grouped
                .iter()
                .any(|(p, markers)| p == path && markers.len() == *count)
        });

        let mut out = String::new();

        for (path, markers) in &grouped {
            let label = self.file_label(path, markers.len());
            out.push_str(&label);
            out.push('\n');
            out.push_str("  ");
            out.push_str(&self.relative_path(path));
            out.push('\n');
            for marker in markers {
                out.push_str(&format!("    {}: {}\n", marker.line, marker.text));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "{} markers in {} files\n",
            index.total_count(),
            grouped.len()
        ));
        out
    }

    /// `name (count)` header for a file, memoized by `(path, count)` so a
    /// content change that keeps the count does not rebuild the label.
    fn file_label(&mut self, path: &str, count: usize) -> String {
        self.label_cache
            .entry((path.to_string(), count))
            .or_insert_with(|| {
                let name = Path::new(path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string());
                format!("{name} ({count})")
            })
            .clone()
    }

    fn relative_path(&self, path: &str) -> String {
        Path::new(path)
            .strip_prefix(&self.root)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.to_string())
    }
}
