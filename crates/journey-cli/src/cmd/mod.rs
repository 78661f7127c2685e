pub mod achievements;
pub mod day;
pub mod days;
pub mod history;
pub mod init;
pub mod notify;
pub mod reflection;
pub mod timer;
pub mod usage;

use anyhow::Context;
use journey_core::{clock::SystemClock, config::Config, journey::Journey, store::FileStore};
use std::path::Path;

pub type CliJourney = Journey<FileStore, SystemClock>;

/// Load config and open the store under `root`. Fails with a hint when
/// `journey init` has not run yet.
pub fn open_journey(root: &Path) -> anyhow::Result<CliJourney> {
    let config = Config::load(root).context("failed to load config")?;
    for w in config.validate() {
        tracing::warn!(level = ?w.level, "{}", w.message);
    }
    Ok(Journey::with_config(
        FileStore::new(root),
        SystemClock,
        config,
    ))
}
