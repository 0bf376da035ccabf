//! The in-memory marker index.
//!
//! Conceptually a mapping from the composite key `(file_path, line)` to a
//! [`Marker`]. The key is structured as nested maps (path, then line) so
//! removing one file's entries can never touch another path that merely
//! shares a string prefix, and so grouped queries fall out of the iteration
//! order for free.

use std::collections::BTreeMap;

use tracing::debug;

use crate::extract::extract_markers;
use crate::model::Marker;

type ChangeListener = Box<dyn Fn() + Send + Sync>;

/// Stateful store of markers keyed by file path.
///
/// All operations are synchronous, in-memory transformations; the index
/// never reads files itself. In a multi-threaded host, wrap the whole index
/// in a mutex so each update (replace, then notify) appears atomic to
/// readers.
#[derive(Default)]
pub struct MarkerIndex {
    /// path -> line -> marker. At most one marker per (path, line).
    files: BTreeMap<String, BTreeMap<usize, Marker>>,
    total: usize,
    listeners: Vec<ChangeListener>,
}

impl MarkerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change listener.
    ///
    /// Listeners fire exactly once per [`update_file`](Self::update_file)
    /// call and once per [`clear`](Self::clear) call, after the state change
    /// completes. Read queries never fire them.
    pub fn subscribe(&mut self, listener: impl Fn() + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replace everything known about `file_path` with the markers extracted
    /// from `content`.
    ///
    /// Each call is a full, atomic replace for that path: stale markers from
    /// an earlier scan never survive. Any text is accepted, including empty
    /// content, which simply removes the path's markers.
    pub fn update_file(&mut self, file_path: &str, content: &str) {
        if let Some(old) = self.files.remove(file_path) {
            self.total -= old.len();
        }

        let extracted = extract_markers(content);
        if !extracted.is_empty() {
            let markers: BTreeMap<usize, Marker> = extracted
                .into_iter()
                .map(|m| (m.line, m.into_marker(file_path)))
                .collect();
            self.total += markers.len();
            debug!(
                "update_file: {} now has {} markers ({} total)",
                file_path,
                markers.len(),
                self.total
            );
            self.files.insert(file_path.to_string(), markers);
        } else {
            debug!("update_file: {} has no markers ({} total)", file_path, self.total);
        }

        self.notify();
    }

    /// Current total number of markers across all files.
    pub fn total_count(&self) -> usize {
        self.total
    }

    /// All files with at least one marker, in ascending byte order of path,
    /// each with its markers in ascending line order.
    pub fn files_grouped(&self) -> Vec<(String, Vec<Marker>)> {
        self.files
            .iter()
            .map(|(path, markers)| (path.clone(), markers.values().cloned().collect()))
            .collect()
    }

    /// Markers for one file in ascending line order. Unknown paths yield an
    /// empty vec, not an error.
    pub fn markers_for_file(&self, file_path: &str) -> Vec<Marker> {
        self.files
            .get(file_path)
            .map(|markers| markers.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop every entry and reset the total. Fires the change notification.
    pub fn clear(&mut self) {
        self.files.clear();
        self.total = 0;
        self.notify();
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn indexes_all_marker_formats() {
        let mut index = MarkerIndex::new();
        index.update_file(
            "t.ts",
            "// TODO: Format 1\n// FIXME: Format 2\n// Todo - Format 3\n# TODO: Format 4\n# FIXME - Format 5",
        );

        let markers = index.markers_for_file("t.ts");
        assert_eq!(index.total_count(), 5);
        assert_eq!(markers.len(), 5);
        for (i, marker) in markers.iter().enumerate() {
            assert_eq!(marker.file_path, "t.ts");
            assert_eq!(marker.line, i + 1);
            assert_eq!(marker.text, format!("Format {}", i + 1));
        }
    }

    #[test]
    fn empty_content_indexes_nothing() {
        let mut index = MarkerIndex::new();
        index.update_file("t.ts", "");
        assert_eq!(index.total_count(), 0);
        assert!(index.markers_for_file("t.ts").is_empty());
        assert!(index.files_grouped().is_empty());
    }

    #[test]
    fn update_replaces_previous_markers() {
        let mut index = MarkerIndex::new();
        index.update_file("t.ts", "// TODO: Old");
        index.update_file("t.ts", "// TODO: New");

        let markers = index.markers_for_file("t.ts");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "New");
        assert_eq!(index.total_count(), 1);
    }

    #[test]
    fn update_is_idempotent() {
        let mut index = MarkerIndex::new();
        let content = "// TODO: a\ncode\n# fixme: b";
        index.update_file("t.ts", content);
        let first = index.markers_for_file("t.ts");
        index.update_file("t.ts", content);
        assert_eq!(index.markers_for_file("t.ts"), first);
        assert_eq!(index.total_count(), 2);
    }

    #[test]
    fn update_with_empty_content_removes_markers() {
        let mut index = MarkerIndex::new();
        index.update_file("t.ts", "// TODO: gone soon");
        assert_eq!(index.total_count(), 1);
        index.update_file("t.ts", "");
        assert_eq!(index.total_count(), 0);
        assert!(index.markers_for_file("t.ts").is_empty());
    }

    #[test]
    fn prefix_paths_are_disjoint() {
        let mut index = MarkerIndex::new();
        index.update_file("/a/b.txt", "// TODO: original");
        index.update_file("/a/b.txt.bak", "// TODO: backup");

        index.update_file("/a/b.txt", "// TODO: changed");

        let backup = index.markers_for_file("/a/b.txt.bak");
        assert_eq!(backup.len(), 1);
        assert_eq!(backup[0].text, "backup");
        assert_eq!(index.total_count(), 2);
    }

    #[test]
    fn markers_are_line_ordered() {
        let mut index = MarkerIndex::new();
        index.update_file(
            "t.ts",
            "code\n// TODO: two\ncode\n// TODO: four\ncode\n// TODO: six",
        );
        let lines: Vec<usize> = index
            .markers_for_file("t.ts")
            .iter()
            .map(|m| m.line)
            .collect();
        assert_eq!(lines, vec![2, 4, 6]);
    }

    #[test]
    fn files_grouped_sorts_by_path() {
        let mut index = MarkerIndex::new();
        index.update_file("src/z.rs", "// TODO: z");
        index.update_file("src/a.rs", "// TODO: a1\n// TODO: a2");
        index.update_file("README.md", "no markers here");

        let grouped = index.files_grouped();
        let paths: Vec<&str> = grouped.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["src/a.rs", "src/z.rs"]);
        assert_eq!(grouped[0].1.len(), 2);
        assert_eq!(grouped[1].1.len(), 1);
    }

    #[test]
    fn unknown_path_is_empty_not_an_error() {
        let index = MarkerIndex::new();
        assert!(index.markers_for_file("never/seen.rs").is_empty());
    }

    #[test]
    fn total_count_matches_per_file_sums() {
        let mut index = MarkerIndex::new();
        index.update_file("a.rs", "// TODO: 1\n// TODO: 2");
        index.update_file("b.rs", "# fixme: 3");
        index.update_file("c.rs", "nothing");
        index.update_file("a.rs", "// TODO: only one now");

        let sum: usize = index
            .files_grouped()
            .iter()
            .map(|(_, markers)| markers.len())
            .sum();
        assert_eq!(index.total_count(), sum);
        assert_eq!(index.total_count(), 2);
    }

    #[test]
    fn clear_resets_everything() {
        let mut index = MarkerIndex::new();
        index.update_file("a.rs", "// TODO: a");
        index.update_file("b.rs", "// TODO: b");
        index.clear();

        assert_eq!(index.total_count(), 0);
        assert!(index.files_grouped().is_empty());
        assert!(index.markers_for_file("a.rs").is_empty());
    }

    #[test]
    fn listeners_fire_once_per_update_and_clear() {
        let mut index = MarkerIndex::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_for_listener = Arc::clone(&fired);
        index.subscribe(move || {
            fired_for_listener.fetch_add(1, Ordering::SeqCst);
        });

        index.update_file("a.rs", "// TODO: a");
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Updates with no markers still notify: the view re-renders anyway.
        index.update_file("a.rs", "");
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        index.markers_for_file("a.rs");
        index.files_grouped();
        index.total_count();
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        index.clear();
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }
}
