use crate::cmd::{open_journey, CliJourney};
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use journey_core::usage::UsagePattern;
use std::path::Path;

#[derive(Subcommand)]
pub enum UsageSubcommand {
    /// Record that you used the app just now
    Record,
    /// Suggest a reminder time from your usage
    Suggest {
        /// Also save the suggestion as the preferred reminder time
        #[arg(long)]
        apply: bool,
    },
}

pub fn run(root: &Path, subcmd: UsageSubcommand, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    match subcmd {
        UsageSubcommand::Record => record(&journey, json),
        UsageSubcommand::Suggest { apply } => suggest(&journey, apply, json),
    }
}

fn record(journey: &CliJourney, json: bool) -> anyhow::Result<()> {
    let pattern = journey
        .record_activity()
        .context("failed to record activity")?;
    let suggested = pattern.suggested_time(journey.config().notifications.reminder_time());

    if json {
        print_json(&serde_json::json!({
            "samples": pattern.timestamps.len(),
            "common_hour": pattern.common_hour,
            "suggested_time": suggested,
        }))?;
    } else {
        println!(
            "Recorded activity ({} samples, suggested time {})",
            pattern.timestamps.len(),
            suggested
        );
    }
    Ok(())
}

fn suggest(journey: &CliJourney, apply: bool, json: bool) -> anyhow::Result<()> {
    let pattern = UsagePattern::load(journey.store()).context("failed to load usage pattern")?;
    let suggested = pattern.suggested_time(journey.config().notifications.reminder_time());

    if apply {
        let mut prefs = journey.notification_preferences()?;
        prefs.preferred_time = suggested.clone();
        prefs
            .save(journey.store())
            .context("failed to save notification preferences")?;
    }

    if json {
        print_json(&serde_json::json!({
            "samples": pattern.timestamps.len(),
            "common_hour": pattern.common_hour,
            "suggested_time": suggested,
            "applied": apply,
        }))?;
        return Ok(());
    }

    match pattern.common_hour {
        Some(_) => println!("You usually show up around {suggested}"),
        None => println!(
            "Not enough data yet ({} samples); default time {suggested}",
            pattern.timestamps.len()
        ),
    }
    if apply {
        println!("Preferred reminder time set to {suggested}");
    }
    Ok(())
}
