use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use tracing::{debug, info, warn};

use crate::cache::PermissionsCache;
use crate::error::Result;

/// Start watching the cache's configuration file for changes.
///
/// Modify/create events for the file trigger a [`PermissionsCache::refresh`];
/// a save that fails to parse is logged and the last good snapshot stays
/// live. The watcher runs on a blocking task for the life of the process.
pub async fn start_watching(cache: Arc<PermissionsCache>) -> Result<()> {
    let config_path = cache.store().path().to_path_buf();
    let watch_dir = config_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    info!("starting configuration watcher for {:?}", config_path);

    // Channel between the notify callback and the handler task.
    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<Event>| {
            if let Ok(event) = result {
                let _ = tx.send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )?;

    // Watch the containing directory: editors often replace the file
    // rather than writing it in place.
    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

    task::spawn_blocking(move || {
        info!("configuration watcher task started");

        // Keep the watcher alive for the duration of the task.
        let _watcher = watcher;

        for event in rx {
            handle_event(&cache, &config_path, event);
        }
    });

    Ok(())
}

fn handle_event(cache: &PermissionsCache, config_path: &Path, event: Event) {
    debug!("file event: {:?}", event);

    match event.kind {
        EventKind::Modify(_) | EventKind::Create(_) => {
            if event.paths.iter().any(|path| path == config_path) {
                info!("configuration file changed: {:?}", config_path);
                match cache.refresh() {
                    Ok(true) => info!("configuration reloaded, permission cache invalidated"),
                    Ok(false) => debug!("configuration content unchanged"),
                    Err(e) => warn!(
                        "failed to reload configuration, keeping last good snapshot: {}",
                        e
                    ),
                }
            }
        }
        EventKind::Remove(_) => {
            if event.paths.iter().any(|path| path == config_path) {
                warn!("configuration file removed: {:?}", config_path);
            }
        }
        _ => {
            // Ignore other events.
        }
    }
}
