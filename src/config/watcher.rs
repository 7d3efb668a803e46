//! Configuration file watcher for hot reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use crate::breaker::RuleManager;
use crate::config::loader::{parse_config, ConfigError};
use crate::config::schema::BreakerConfig;

/// A watcher that monitors the rule file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<BreakerConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<BreakerConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        match reload_config(&path) {
                            Ok(Some(new_config)) => {
                                tracing::info!(path = ?path, rules = new_config.rules.len(), "Rule file reloaded");
                                let _ = tx.send(new_config);
                            }
                            Ok(None) => {
                                tracing::debug!(path = ?path, "Rule file is blank; keeping current rules");
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Failed to reload rules; keeping current rules");
                            }
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Rule watcher started");
        Ok(watcher)
    }
}

/// Read the rule file for a reload.
///
/// Blank content yields `Ok(None)`: writers truncate before writing, and a
/// watcher event can land in between. An intentionally empty rule set must
/// be spelled `rules = []`.
pub fn reload_config(path: &Path) -> Result<Option<BreakerConfig>, ConfigError> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    parse_config(&content).map(Some)
}

/// Feed reloaded configurations into the rule manager until the channel
/// closes or shutdown is signalled.
pub async fn apply_updates(
    manager: Arc<RuleManager>,
    mut updates: mpsc::UnboundedReceiver<BreakerConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(config) => {
                    let active = manager.load_rules(config.to_rules());
                    tracing::info!(active, "Rule reload applied");
                }
                None => break,
            },
            _ = shutdown.recv() => break,
        }
    }
    tracing::debug!("Rule update loop stopped");
}
