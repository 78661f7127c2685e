use std::path::{Path, PathBuf};

/// Resolve the journey root directory.
///
/// Priority:
/// 1. `--root` flag / `JOURNEY_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.journey/`
/// 3. The user's home directory
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if let Some(found) = find_journey_dir(&cwd) {
        return found;
    }

    journey_core::paths::home_root().unwrap_or(cwd)
}

fn find_journey_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(journey_core::paths::JOURNEY_DIR).is_dir())
        .map(Path::to_path_buf)
}
