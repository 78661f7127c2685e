use crate::cmd::{open_journey, CliJourney};
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use journey_core::{clock::Clock, content, reflection::FinalReflection};
use std::path::Path;

#[derive(Subcommand)]
pub enum ReflectionSubcommand {
    /// Show the saved reflection and completed deliverables
    Show,
    /// Save the reflection; omitted fields keep their saved value
    Save {
        #[arg(long)]
        deliverables: Option<String>,
        #[arg(long)]
        insights: Option<String>,
        #[arg(long)]
        next_steps: Option<String>,
        #[arg(long)]
        feeling: Option<String>,
    },
    /// Print the text to share your result
    Share,
}

pub fn run(root: &Path, subcmd: ReflectionSubcommand, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    match subcmd {
        ReflectionSubcommand::Show => show(&journey, json),
        ReflectionSubcommand::Save {
            deliverables,
            insights,
            next_steps,
            feeling,
        } => save(
            &journey,
            FinalReflection {
                deliverables: deliverables.unwrap_or_default(),
                insights: insights.unwrap_or_default(),
                next_steps: next_steps.unwrap_or_default(),
                feeling: feeling.unwrap_or_default(),
                timestamp: None,
            },
            json,
        ),
        ReflectionSubcommand::Share => share(&journey, json),
    }
}

fn load(journey: &CliJourney) -> anyhow::Result<Option<FinalReflection>> {
    FinalReflection::load(journey.store()).context("failed to load reflection")
}

fn show(journey: &CliJourney, json: bool) -> anyhow::Result<()> {
    let progress = journey.progress()?;
    let reflection = load(journey)?;
    let delivered: Vec<_> = progress
        .records()
        .filter(|r| r.completed)
        .map(|r| (r.day, content::day_content(r.day).deliverable))
        .collect();

    if json {
        let delivered: Vec<_> = delivered
            .iter()
            .map(|(day, deliverable)| serde_json::json!({ "day": day, "deliverable": deliverable }))
            .collect();
        print_json(&serde_json::json!({
            "completed_days": progress.completed_count(),
            "completed_deliverables": delivered,
            "reflection": reflection,
        }))?;
        return Ok(());
    }

    println!("Completed days: {}/7", progress.completed_count());
    if !delivered.is_empty() {
        println!("\nCompleted deliverables:");
        for (day, deliverable) in &delivered {
            println!("  ✓ Dia {day}: {deliverable}");
        }
    }
    let Some(r) = reflection else {
        println!("\nNo reflection saved yet. Use: journey reflection save --insights ...");
        return Ok(());
    };
    println!("\nDeliverables: {}", r.deliverables);
    println!("Insights:     {}", r.insights);
    println!("Next steps:   {}", r.next_steps);
    println!("Feeling:      {}", r.feeling);
    Ok(())
}

fn save(journey: &CliJourney, update: FinalReflection, json: bool) -> anyhow::Result<()> {
    let mut reflection = load(journey)?.unwrap_or_default();
    for (field, value) in [
        (&mut reflection.deliverables, update.deliverables),
        (&mut reflection.insights, update.insights),
        (&mut reflection.next_steps, update.next_steps),
        (&mut reflection.feeling, update.feeling),
    ] {
        if !value.is_empty() {
            *field = value;
        }
    }
    reflection
        .save(journey.store(), journey.clock().now_utc())
        .context("failed to save reflection")?;

    if json {
        print_json(&reflection)?;
    } else {
        println!("Reflection saved");
    }
    Ok(())
}

fn share(journey: &CliJourney, json: bool) -> anyhow::Result<()> {
    let completed = journey.progress()?.completed_count();
    let reflection = load(journey)?.unwrap_or_default();
    let text = reflection.share_text(completed);

    if json {
        print_json(&serde_json::json!({ "text": text }))?;
    } else {
        println!("{text}");
    }
    Ok(())
}
