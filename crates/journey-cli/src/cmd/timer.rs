use crate::cmd::{open_journey, CliJourney};
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use journey_core::{
    clock::Clock,
    pomodoro::{
        self, format_remaining, FocusSession, PhaseChange, PomodoroSettings, BREAK_OPTIONS,
        PRESETS,
    },
};
use std::io::Write;
use std::path::Path;

#[derive(Subcommand)]
pub enum TimerSubcommand {
    /// Show focus timer settings and a suggestion for your progress
    Show,
    /// Change focus and break durations (minutes)
    Set {
        #[arg(long)]
        focus: Option<u32>,
        #[arg(long = "break")]
        break_minutes: Option<u32>,
        /// Use a preset: "15 min", "20 min" or "25 min"
        #[arg(long, conflicts_with_all = ["focus", "break_minutes"])]
        preset: Option<String>,
    },
    /// Run a focus session followed by a break
    Start {
        /// Focus minutes for this session only
        #[arg(long)]
        focus: Option<u32>,
        /// Break minutes for this session only
        #[arg(long = "break")]
        break_minutes: Option<u32>,
    },
}

pub fn run(root: &Path, subcmd: TimerSubcommand, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    match subcmd {
        TimerSubcommand::Show => show(&journey, json),
        TimerSubcommand::Set {
            focus,
            break_minutes,
            preset,
        } => set(&journey, focus, break_minutes, preset.as_deref(), json),
        TimerSubcommand::Start {
            focus,
            break_minutes,
        } => start(&journey, focus, break_minutes, json),
    }
}

fn load(journey: &CliJourney) -> anyhow::Result<PomodoroSettings> {
    let fallback = PomodoroSettings::from(&journey.config().timer);
    PomodoroSettings::load(journey.store(), fallback).context("failed to load timer settings")
}

fn show(journey: &CliJourney, json: bool) -> anyhow::Result<()> {
    let settings = load(journey)?;
    let completed = journey.progress()?.completed_count();
    let suggestion = pomodoro::suggestion(completed, settings.focus_duration);

    if json {
        print_json(&serde_json::json!({
            "settings": settings,
            "suggestion": suggestion,
            "presets": PRESETS,
            "break_options": BREAK_OPTIONS,
        }))?;
        return Ok(());
    }

    println!("Focus: {} min", settings.focus_duration);
    println!("Break: {} min", settings.break_duration);
    if let Some(s) = suggestion {
        println!("\n{s}");
    }
    Ok(())
}

fn set(
    journey: &CliJourney,
    focus: Option<u32>,
    break_minutes: Option<u32>,
    preset: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut settings = load(journey)?;
    match preset {
        Some(label) => {
            let p = pomodoro::find_preset(label)
                .with_context(|| format!("unknown preset '{label}'"))?;
            settings.apply_preset(p);
        }
        None => settings.set(focus, break_minutes)?,
    }
    settings
        .save(journey.store())
        .context("failed to save timer settings")?;

    if json {
        print_json(&settings)?;
    } else {
        println!(
            "Timer set to {} min focus / {} min break",
            settings.focus_duration, settings.break_duration
        );
    }
    Ok(())
}

fn start(
    journey: &CliJourney,
    focus: Option<u32>,
    break_minutes: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let mut settings = load(journey)?;
    settings.set(focus, break_minutes)?;

    let clock = journey.clock();
    let mut session = FocusSession::start(settings, clock.now_utc());
    tracing::info!(
        focus = settings.focus_duration,
        break_minutes = settings.break_duration,
        "focus session started"
    );
    if !json {
        println!(
            "Focus for {} min, then a {} min break. Ctrl-C stops.",
            settings.focus_duration, settings.break_duration
        );
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let completed = rt.block_on(async {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = clock.now_utc();
                    match session.tick(now) {
                        Some(PhaseChange::Completed) => return Ok::<bool, anyhow::Error>(true),
                        Some(PhaseChange::BreakStarted) if !json => {
                            println!("\rFocus done. Take a break.        ");
                        }
                        _ => {}
                    }
                    if !json {
                        print!(
                            "\r{:<5} {} ({:>3}%)",
                            session.phase(),
                            format_remaining(session.remaining(now)),
                            session.percent(now)
                        );
                        std::io::stdout().flush()?;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("focus session stopped");
                    return Ok(false);
                }
            }
        }
    })?;

    if json {
        print_json(&serde_json::json!({
            "completed": completed,
            "phase": session.phase(),
            "settings": settings,
        }))?;
    } else if completed {
        println!("\rSession complete! 🎉              ");
    } else {
        println!("\nStopped during {}", session.phase());
    }
    Ok(())
}
