use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use todo_tree_core::IndexError;
use todo_tree_fs::{SharedIndex, background_watcher, initial_scan, shared_index};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::view::{TreeView, render_json};

pub fn default_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Initialize tracing for the CLI.
///
/// Logs go to stderr so stdout stays clean for the listing (text or JSON),
/// and respect RUST_LOG or default to `info`.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run_scan(
    root: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = root.unwrap_or_else(default_root);

    let index = shared_index();
    match initial_scan(&root, &index) {
        Ok(scanned) => info!("scan: {} files scanned under {}", scanned, root.display()),
        Err(err) => {
            error!("Scan failed for {}: {err}", root.display());
            std::process::exit(1);
        }
    }

    let index = index.lock();
    if json {
        println!("{}", render_json(&index)?);
    } else {
        let mut view = TreeView::new(&root);
        print!("{}", view.render(&index));
    }

    Ok(())
}

pub async fn run_watch(
    root: Option<PathBuf>,
    debounce_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = root.unwrap_or_else(default_root);
    let quiet_period = Duration::from_millis(debounce_ms);

    let index = shared_index();
    match initial_scan(&root, &index) {
        Ok(scanned) => info!("watch: {} files scanned under {}", scanned, root.display()),
        Err(err) => {
            error!("Scan failed for {}: {err}", root.display());
            std::process::exit(1);
        }
    }

    // Subscribe after the initial scan so the burst of per-file updates does
    // not trigger one render each; the first render below covers them all.
    let (change_tx, mut change_rx) = mpsc::unbounded_channel::<()>();
    index.lock().subscribe(move || {
        let _ = change_tx.send(());
    });

    let mut view = TreeView::new(&root);
    render_to_stdout(&mut view, &index)?;

    let watcher_index = SharedIndex::clone(&index);
    let watcher_root = root.clone();
    let mut watcher_task =
        tokio::spawn(
            async move { background_watcher(watcher_root, watcher_index, quiet_period).await },
        );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("watch: shutting down");
                break;
            }
            res = &mut watcher_task => {
                match res {
                    Ok(Ok(())) => break,
                    Ok(Err(err)) => return Err(IndexError::Watch(err.to_string()).into()),
                    Err(join_err) => return Err(join_err.into()),
                }
            }
            changed = change_rx.recv() => {
                if changed.is_none() {
                    break;
                }
                // Drain the burst: one render per coalesced batch is enough.
                while change_rx.try_recv().is_ok() {}
                println!();
                render_to_stdout(&mut view, &index)?;
            }
        }
    }

    watcher_task.abort();
    index.lock().clear();
    Ok(())
}

fn render_to_stdout(
    view: &mut TreeView,
    index: &SharedIndex,
) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = view.render(&index.lock());
    let mut stdout = std::io::stdout();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
