use crate::cmd::open_journey;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use journey_core::reflection::{export_notes, links_history, notes_history};
use std::path::Path;

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// Notes, insights and feedback by day
    Notes {
        /// Print the plain-text export instead of the summary
        #[arg(long)]
        export: bool,
    },
    /// Links found in notes, research sources and the published post
    Links,
}

pub fn run(root: &Path, subcmd: HistorySubcommand, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    let progress = journey.progress().context("failed to load progress")?;

    match subcmd {
        HistorySubcommand::Notes { export } => {
            let entries = notes_history(&progress);
            if json {
                return print_json(&entries);
            }
            if export {
                print!("{}", export_notes(&entries));
                return Ok(());
            }
            if entries.is_empty() {
                println!("No notes yet.");
            }
            for e in &entries {
                println!("Dia {}: {}", e.day, e.theme);
                if !e.notes.is_empty() {
                    println!("  {}", e.notes);
                }
                for i in &e.insights {
                    println!("  * {i}");
                }
                for f in &e.feedback {
                    println!("  > {f}");
                }
            }
        }
        HistorySubcommand::Links => {
            let entries = links_history(&progress);
            if json {
                return print_json(&entries);
            }
            if entries.is_empty() {
                println!("No links yet.");
            }
            for e in &entries {
                println!("Dia {}: {}", e.day, e.theme);
                for l in &e.links {
                    println!("  {l}");
                }
            }
        }
    }
    Ok(())
}
