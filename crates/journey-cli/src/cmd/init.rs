use crate::output::print_json;
use anyhow::Context;
use journey_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store_dir = paths::store_dir(root);
    io::ensure_dir(&store_dir)
        .with_context(|| format!("failed to create {}", store_dir.display()))?;

    let config_path = paths::config_path(root);
    let created_config = !config_path.exists();
    if created_config {
        Config::default()
            .save(root)
            .context("failed to write config.yaml")?;
    }

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "config_created": created_config,
        }))?;
        return Ok(());
    }

    println!("Initializing journey in: {}", root.display());
    println!("  ready:   {}", paths::STORE_DIR);
    if created_config {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }
    println!("\nStart with: journey day show 1");
    Ok(())
}
