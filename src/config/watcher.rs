//! Configuration file watcher for hot reload.
//!
//! Only target weights can change at runtime, so a reloaded file is forwarded
//! only when its weights differ from the last ones seen.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::SimulatorConfig;

type Weights = Vec<(String, u32)>;

fn weights(config: &SimulatorConfig) -> Weights {
    config
        .targets
        .iter()
        .map(|t| (t.id.clone(), t.weight))
        .collect()
}

/// A watcher that monitors the configuration file for changes.
#[derive(Debug)]
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<SimulatorConfig>,
    last_weights: Mutex<Weights>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`; `current` is the config already running.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(
        path: &Path,
        current: &SimulatorConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SimulatorConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
            last_weights: Mutex::new(weights(current)),
        };
        (watcher, update_rx)
    }

    /// Re-read the file and forward it if target weights changed.
    ///
    /// Returns whether an update was sent.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let config = load_config(&self.path)?;
        let new_weights = weights(&config);

        let mut last = self
            .last_weights
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *last == new_weights {
            tracing::debug!(path = ?self.path, "Config changed without weight changes");
            return Ok(false);
        }

        *last = new_weights;
        // The receiver is gone once the server has stopped.
        Ok(self.update_tx.send(config).is_ok())
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let this = Arc::new(self);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match this.reload() {
                        Ok(true) => tracing::info!("Config reloaded, new target weights sent"),
                        Ok(false) => {}
                        Err(e) => tracing::error!(
                            error = %e,
                            "Failed to reload config, keeping current weights"
                        ),
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}
