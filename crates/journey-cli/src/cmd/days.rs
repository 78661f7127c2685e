use crate::cmd::open_journey;
use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    journey
        .record_activity()
        .context("failed to record activity")?;
    let progress = journey.progress().context("failed to load progress")?;
    let overview = progress.overview();

    if json {
        print_json(&serde_json::json!({
            "completed": progress.completed_count(),
            "percent": progress.percent_complete(),
            "days": overview,
        }))?;
        return Ok(());
    }

    let rows = overview
        .iter()
        .map(|d| {
            vec![
                d.day.to_string(),
                d.theme.to_string(),
                d.status.to_string(),
                if d.accessible { "open" } else { "locked" }.to_string(),
                format!("{}/{}", d.checked, d.total),
            ]
        })
        .collect();
    print_table(&["DAY", "THEME", "STATUS", "ACCESS", "CHECKLIST"], rows);
    println!(
        "\n{} of 7 days completed ({}%)",
        progress.completed_count(),
        progress.percent_complete()
    );
    Ok(())
}
