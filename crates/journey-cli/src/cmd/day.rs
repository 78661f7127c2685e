use crate::cmd::open_journey;
use crate::output::{check_mark, print_json};
use anyhow::Context;
use clap::Subcommand;
use journey_core::{
    collaborator::{self, CollaboratorPayload, ItemBinding},
    content,
    day::ToggleOutcome,
    journey::NextStep,
    types::DayNumber,
};
use std::io::Read;
use std::path::Path;

#[derive(Subcommand)]
pub enum DaySubcommand {
    /// Open a day and show its checklist, notes and guidance
    Show { day: DayNumber },
    /// Tick a checklist item (1-based)
    Toggle { day: DayNumber, item: usize },
    /// Submit a collaborator's answers as JSON (`-` reads stdin)
    Submit { day: DayNumber, payload: String },
    /// Replace the day's notes
    Notes {
        day: DayNumber,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Mark the day as completed
    Complete { day: DayNumber },
    /// Move on to the next day (or the final reflection after day 7)
    Advance { day: DayNumber },
    /// Mark a resource from the resources step as still needed
    ResourcePending {
        day: DayNumber,
        #[arg(required = true)]
        name: Vec<String>,
    },
}

pub fn run(root: &Path, subcmd: DaySubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DaySubcommand::Show { day } => show(root, day, json),
        DaySubcommand::Toggle { day, item } => toggle(root, day, item, json),
        DaySubcommand::Submit { day, payload } => submit(root, day, &payload, json),
        DaySubcommand::Notes { day, text } => notes(root, day, &text.join(" "), json),
        DaySubcommand::Complete { day } => complete(root, day, json),
        DaySubcommand::Advance { day } => advance(root, day, json),
        DaySubcommand::ResourcePending { day, name } => {
            resource_pending(root, day, &name.join(" "), json)
        }
    }
}

fn show(root: &Path, day: DayNumber, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    let record = journey.open_day(day)?;
    let info = content::day_content(day);

    if json {
        print_json(&serde_json::json!({
            "record": record,
            "status": record.status(),
            "content": info,
        }))?;
        return Ok(());
    }

    println!("Dia {day}: {}", info.theme);
    println!("{}\n", info.objective);
    for (i, label) in info.checklist.iter().enumerate() {
        let hint = match collaborator::binding(day, i) {
            Some(ItemBinding::Dialog(kind)) => format!("  ({kind})"),
            Some(ItemBinding::Publish) => "  (publish_link)".to_string(),
            _ => String::new(),
        };
        println!(
            "  {}. {} {label}{hint}",
            i + 1,
            check_mark(record.checklist.get(i).copied().unwrap_or(false))
        );
    }
    println!();
    if record.has_notes() {
        println!("Notes: {}", record.notes);
    } else {
        println!("Notes: (none)");
    }
    println!("Tip: {}", info.tip);
    println!("Deliverable: {}", info.deliverable);
    println!("Principle: {}", info.principle);
    println!("Status: {}", record.status());
    Ok(())
}

fn item_index(item: usize) -> anyhow::Result<usize> {
    item.checked_sub(1)
        .context("checklist items are numbered from 1")
}

fn toggle(root: &Path, day: DayNumber, item: usize, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    let index = item_index(item)?;
    let outcome = journey.toggle_item(day, index)?;

    if json {
        print_json(&serde_json::json!({ "day": day, "item": item, "result": outcome }))?;
        return Ok(());
    }
    match outcome {
        ToggleOutcome::Toggled => println!("Checked item {item} of day {day}"),
        ToggleOutcome::AlreadyChecked => println!("Item {item} of day {day} is already checked"),
        ToggleOutcome::AwaitingCollaborator(kind) => {
            println!("Item {item} is completed through the '{kind}' step.");
            println!("Run: journey day submit {day} '{{\"kind\":\"{kind}\", ...}}'");
        }
    }
    Ok(())
}

fn read_payload(raw: &str) -> anyhow::Result<CollaboratorPayload> {
    let text = if raw == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read payload from stdin")?;
        buf
    } else {
        raw.to_string()
    };
    serde_json::from_str(&text).context("invalid collaborator payload")
}

fn submit(root: &Path, day: DayNumber, raw: &str, json: bool) -> anyhow::Result<()> {
    let payload = read_payload(raw)?;
    let kind = payload.kind();
    let journey = open_journey(root)?;
    let index = journey.complete_collaborator(day, payload)?;

    if json {
        print_json(&serde_json::json!({ "day": day, "collaborator": kind, "item": index + 1 }))?;
    } else {
        println!("Saved '{kind}' and checked item {} of day {day}", index + 1);
    }
    Ok(())
}

fn notes(root: &Path, day: DayNumber, text: &str, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    journey.set_notes(day, text)?;

    if json {
        print_json(&serde_json::json!({ "day": day, "notes": text }))?;
    } else {
        println!("Saved notes for day {day}");
    }
    Ok(())
}

fn complete(root: &Path, day: DayNumber, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    let outcome = journey.complete_day(day)?;

    if json {
        print_json(&outcome)?;
        return Ok(());
    }
    match &outcome.celebration {
        Some(c) => println!("{}\n{}", c.title, c.description),
        None => println!("Day {day} was already completed"),
    }
    if let Some(a) = outcome.achievements.newly_unlocked {
        println!("\nUnlocked: {} - {}", a.title, a.description);
    }
    Ok(())
}

fn advance(root: &Path, day: DayNumber, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    let next = journey.advance(day)?;

    if json {
        print_json(&next)?;
        return Ok(());
    }
    match next {
        NextStep::Day(n) => println!("Next: journey day show {n}"),
        NextStep::Reflection => println!("Next: journey reflection show"),
    }
    Ok(())
}

fn resource_pending(root: &Path, day: DayNumber, name: &str, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    journey.mark_resource_pending(day, name)?;

    if json {
        print_json(&serde_json::json!({ "day": day, "resource": name, "has_it": false }))?;
    } else {
        println!("Marked '{name}' as pending");
    }
    Ok(())
}
