use crate::cmd::open_journey;
use crate::output::{check_mark, print_json};
use anyhow::Context;
use journey_core::achievement::ACHIEVEMENTS;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    let eval = journey
        .evaluate_achievements()
        .context("failed to evaluate achievements")?;

    if json {
        print_json(&eval)?;
        return Ok(());
    }

    if let Some(a) = eval.newly_unlocked {
        println!("Unlocked: {} - {}\n", a.title, a.description);
    }
    for a in ACHIEVEMENTS.iter() {
        let earned = eval.unlocked.iter().any(|u| u.id == a.id);
        println!("{} {:<18} {}", check_mark(earned), a.title, a.description);
    }
    Ok(())
}
