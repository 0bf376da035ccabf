use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use todo_tree_core::IndexResult;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::SharedIndex;
use crate::debounce::Debouncer;
use crate::scanner::index_file;
use crate::text::path_key;

/// Watch `root` recursively and keep the index in sync.
///
/// Raw notify events are coalesced per path through a [`Debouncer`] with the
/// given quiet period, so an editor hammering a file with writes results in
/// one re-scan of that file. Runs until the watch channel closes.
pub async fn background_watcher(
    root: PathBuf,
    index: SharedIndex,
    quiet_period: Duration,
) -> notify::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher: RecommendedWatcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    let git_dir = root.join(".git");
    let mut debouncer = Debouncer::new(quiet_period);

    loop {
        let deadline = debouncer.next_deadline();
        tokio::select! {
            res = rx.recv() => {
                match res {
                    Some(Ok(event)) => collect_event(event, &git_dir, &mut debouncer),
                    Some(Err(err)) => warn!("file watcher error: {err}"),
                    None => break,
                }
            }
            _ = wait_until(deadline) => {
                flush_due(&mut debouncer, &index).await;
            }
        }
    }

    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn collect_event(event: Event, git_dir: &Path, debouncer: &mut Debouncer) {
    match event.kind {
        EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Any)
        | EventKind::Modify(ModifyKind::Name(_))
        | EventKind::Create(CreateKind::File)
        | EventKind::Remove(RemoveKind::File) => {
            // Rename events carry both the old and the new path; recording
            // both lets the flush purge the old key and index the new one.
            let now = Instant::now();
            for path in event.paths {
                if path.starts_with(git_dir) {
                    continue;
                }
                debouncer.record(path, now);
            }
        }
        _ => {}
    }
}

async fn flush_due(debouncer: &mut Debouncer, index: &SharedIndex) {
    for path in debouncer.take_due(Instant::now()) {
        let index_clone = SharedIndex::clone(index);
        let path_for_task = path.clone();
        let path_display = path.display().to_string();

        match tokio::task::spawn_blocking(move || apply_change(&path_for_task, &index_clone)).await
        {
            Ok(Ok(())) => debug!("watcher: applied change for {path_display}"),
            Ok(Err(err)) => warn!("watcher: failed to apply change for {path_display}: {err}"),
            Err(join_err) => {
                error!("watcher: update task panicked for {path_display}: {join_err}");
            }
        }
    }
}

/// Apply one coalesced change: re-scan the file if it still exists, or purge
/// its markers (by supplying empty content) if it is gone.
pub fn apply_change(path: &Path, index: &SharedIndex) -> IndexResult<()> {
    if path.exists() {
        if !path.is_file() {
            return Ok(());
        }
        return index_file(path, index);
    }

    index.lock().update_file(&path_key(path), "");
    Ok(())
}
