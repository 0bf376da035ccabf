use std::sync::Arc;

use parking_lot::Mutex;
use todo_tree_core::MarkerIndex;

pub mod debounce;
pub mod scanner;
pub mod text;
pub mod watcher;

pub use debounce::Debouncer;
pub use scanner::{index_file, initial_scan};
pub use text::{path_key, read_text_file};
pub use watcher::background_watcher;

/// The index as shared between the scanner workers, the watcher loop and the
/// rendering side. Every index operation runs under the one lock, so a
/// replace-then-notify sequence appears atomic to readers.
pub type SharedIndex = Arc<Mutex<MarkerIndex>>;

pub fn shared_index() -> SharedIndex {
    Arc::new(Mutex::new(MarkerIndex::new()))
}
