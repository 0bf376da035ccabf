use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ignore::{WalkBuilder, WalkState};
use todo_tree_core::IndexResult;
use tracing::{debug, info, warn};

use crate::SharedIndex;
use crate::text::{path_key, read_text_file};

/// Scan one file into the index.
///
/// Binary and non-UTF-8 files are treated as having no content and are left
/// out of the index entirely.
pub fn index_file(path: &Path, index: &SharedIndex) -> IndexResult<()> {
    let Some(content) = read_text_file(path)? else {
        debug!("index_file: skipping binary file {}", path.display());
        return Ok(());
    };

    index.lock().update_file(&path_key(path), &content);
    Ok(())
}

/// Initial full scan using a parallel filesystem walk.
///
/// Honors `.gitignore`/`.ignore` rules and skips `.git` directories. Returns
/// the number of files pushed through the index.
pub fn initial_scan(root: &Path, index: &SharedIndex) -> IndexResult<usize> {
    info!("initial_scan: starting parallel walk at {}", root.display());

    let counter = Arc::new(AtomicUsize::new(0));

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(true)
        .git_ignore(true)
        .git_exclude(true)
        .parents(true)
        .filter_entry(|entry| {
            !entry
                .path()
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name == ".git")
        })
        .build_parallel();

    walker.run(|| {
        let index = SharedIndex::clone(index);
        let counter = Arc::clone(&counter);

        Box::new(move |entry_res| {
            let entry = match entry_res {
                Ok(e) => e,
                Err(err) => {
                    warn!("initial_scan: failed to read entry: {err}");
                    return WalkState::Continue;
                }
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                return WalkState::Continue;
            }

            let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
            if done.is_multiple_of(500) {
                info!("initial_scan: scanned {} files so far", done);
            }

            if let Err(err) = index_file(entry.path(), &index) {
                warn!(
                    "initial_scan worker: failed to scan {}: {:?}",
                    entry.path().display(),
                    err
                );
            }

            WalkState::Continue
        })
    });

    let done = counter.load(Ordering::Relaxed);
    info!("initial_scan: completed, scanned {} files in total", done);
    Ok(done)
}
