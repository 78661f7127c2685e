use crate::cmd::{open_journey, CliJourney};
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use journey_core::{
    clock::SystemClock,
    reminder::{
        FixedPermission, NotificationPreferences, Notifier, ReminderMessage, ReminderScheduler,
        Reminders,
    },
    types::{Frequency, Permission},
};
use std::path::Path;

/// Environment variable that stands in for the platform permission prompt.
pub const PERMISSION_ENV: &str = "JOURNEY_NOTIFY_PERMISSION";

#[derive(Subcommand)]
pub enum NotifySubcommand {
    /// Show reminder preferences and permission
    Status,
    /// Turn reminders on (asks for permission first)
    Enable,
    /// Turn reminders off
    Disable,
    /// Change preferred time and frequency
    Set {
        /// Preferred time, HH:MM
        #[arg(long)]
        time: Option<String>,
        /// daily, every-other-day or weekly
        #[arg(long)]
        frequency: Option<Frequency>,
    },
    /// Run one reminder check now
    Check,
    /// Show a reminder right away, regardless of frequency
    Test,
    /// Keep running and check for reminders on the configured interval
    Watch {
        /// Seconds between looks at the saved preferences
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
        poll_secs: u64,
    },
}

pub fn run(root: &Path, subcmd: NotifySubcommand, json: bool) -> anyhow::Result<()> {
    let journey = open_journey(root)?;
    match subcmd {
        NotifySubcommand::Status => status(&journey, json),
        NotifySubcommand::Enable => enable(&journey, json),
        NotifySubcommand::Disable => disable(&journey, json),
        NotifySubcommand::Set { time, frequency } => {
            set(&journey, time.as_deref(), frequency, json)
        }
        NotifySubcommand::Check => check(&journey, json),
        NotifySubcommand::Test => test(&journey, json),
        NotifySubcommand::Watch { poll_secs } => watch(&journey, poll_secs),
    }
}

// ---------------------------------------------------------------------------
// Terminal capabilities
// ---------------------------------------------------------------------------

/// The platform answer from the environment. An undecided `default`
/// takes the answer given to an earlier `notify enable`.
fn permission_from_env(journey: &CliJourney) -> anyhow::Result<FixedPermission> {
    let permission = match std::env::var(PERMISSION_ENV) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<Permission>()
            .with_context(|| format!("invalid {PERMISSION_ENV}"))?,
        _ => Permission::Granted,
    };
    FixedPermission::remembered(permission, journey.store())
        .context("failed to load notification permission")
}

/// Prints reminders to stdout. In JSON mode they are only collected so the
/// command can report them in its output.
struct TerminalNotifier {
    json: bool,
    shown: Vec<ReminderMessage>,
}

impl Notifier for TerminalNotifier {
    fn show(&mut self, title: &str, body: &str) -> journey_core::Result<()> {
        if !self.json {
            println!("🔔 {title}\n   {body}");
        }
        self.shown.push(ReminderMessage {
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

type TerminalReminders = Reminders<FixedPermission, TerminalNotifier, SystemClock>;

fn reminders(journey: &CliJourney, json: bool) -> anyhow::Result<TerminalReminders> {
    let prefs = journey
        .notification_preferences()
        .context("failed to load notification preferences")?;
    let minutes = i64::from(journey.config().notifications.check_interval_minutes.max(1));
    Ok(Reminders::new(
        prefs,
        permission_from_env(journey)?,
        TerminalNotifier {
            json,
            shown: Vec::new(),
        },
        SystemClock,
        ReminderScheduler::new(chrono::Duration::minutes(minutes)),
    ))
}

fn save(journey: &CliJourney, reminders: &TerminalReminders) -> anyhow::Result<()> {
    reminders
        .preferences()
        .save(journey.store())
        .context("failed to save notification preferences")
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn status(journey: &CliJourney, json: bool) -> anyhow::Result<()> {
    let reminders = reminders(journey, json)?;
    let prefs = reminders.preferences();
    let suggested = journey.suggested_time()?;

    if json {
        print_json(&serde_json::json!({
            "preferences": prefs,
            "permission": reminders.permission(),
            "suggested_time": suggested,
        }))?;
        return Ok(());
    }

    println!("Reminders:  {}", if prefs.enabled { "on" } else { "off" });
    println!("Time:       {}", prefs.preferred_time);
    println!("Frequency:  {}", prefs.frequency);
    println!("Permission: {}", reminders.permission());
    match prefs.last_notification_date {
        Some(at) => println!("Last sent:  {}", at.to_rfc3339()),
        None => println!("Last sent:  never"),
    }
    if suggested != prefs.preferred_time {
        println!("\nYou usually show up around {suggested}. Use: journey usage suggest --apply");
    }
    Ok(())
}

fn enable(journey: &CliJourney, json: bool) -> anyhow::Result<()> {
    let mut reminders = reminders(journey, json)?;
    let progress = journey.progress()?;
    reminders.request_enable(&progress, &mut rand::thread_rng())?;
    save(journey, &reminders)?;
    reminders
        .gate()
        .remember(journey.store())
        .context("failed to save notification permission")?;

    if json {
        print_json(&serde_json::json!({
            "enabled": true,
            "shown": reminders.notifier().shown,
        }))?;
    } else {
        println!("Reminders enabled");
    }
    Ok(())
}

fn disable(journey: &CliJourney, json: bool) -> anyhow::Result<()> {
    let mut reminders = reminders(journey, json)?;
    reminders.disable();
    save(journey, &reminders)?;

    if json {
        print_json(&serde_json::json!({ "enabled": false }))?;
    } else {
        println!("Reminders disabled");
    }
    Ok(())
}

fn set(
    journey: &CliJourney,
    time: Option<&str>,
    frequency: Option<Frequency>,
    json: bool,
) -> anyhow::Result<()> {
    let mut reminders = reminders(journey, json)?;
    reminders.update_preferences(time, frequency)?;
    save(journey, &reminders)?;

    let prefs = reminders.preferences();
    if json {
        print_json(prefs)?;
    } else {
        println!(
            "Reminders set for {} ({})",
            prefs.preferred_time, prefs.frequency
        );
    }
    Ok(())
}

fn check(journey: &CliJourney, json: bool) -> anyhow::Result<()> {
    let mut reminders = reminders(journey, json)?;
    let progress = journey.progress()?;
    let shown = reminders.evaluate(&progress, &mut rand::thread_rng())?;
    if shown.is_some() {
        save(journey, &reminders)?;
    }

    if json {
        print_json(&serde_json::json!({ "fired": shown.is_some(), "message": shown }))?;
    } else if shown.is_none() {
        println!("No reminder due");
    }
    Ok(())
}

fn test(journey: &CliJourney, json: bool) -> anyhow::Result<()> {
    let mut reminders = reminders(journey, json)?;
    let progress = journey.progress()?;
    let message = reminders.send_test(&progress, &mut rand::thread_rng())?;
    save(journey, &reminders)?;

    if json {
        print_json(&message)?;
    }
    Ok(())
}

fn watch(journey: &CliJourney, poll_secs: u64) -> anyhow::Result<()> {
    let mut reminders = reminders(journey, false)?;
    if !reminders.preferences().enabled {
        anyhow::bail!("reminders are disabled: run 'journey notify enable' first");
    }
    reminders.resume();
    if !reminders.scheduler().is_running() {
        anyhow::bail!(
            "notification permission is '{}': reminders cannot run",
            reminders.permission()
        );
    }

    let default_time = journey.config().notifications.reminder_time().to_string();
    tracing::info!(
        interval_secs = reminders.scheduler().interval().num_seconds(),
        poll_secs,
        "watching for reminders"
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(poll_secs));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Pick up `notify disable` and `notify set` from other shells.
                    reminders.sync_preferences(journey.notification_preferences()?);
                    if !reminders.scheduler().is_running() {
                        println!("Reminders disabled, stopping");
                        break;
                    }
                    let progress = journey.progress()?;
                    let shown = reminders.tick(&progress, &mut rand::thread_rng())?;
                    if let (Some(_), Some(at)) =
                        (shown, reminders.preferences().last_notification_date)
                    {
                        NotificationPreferences::record_sent(journey.store(), &default_time, at)
                            .context("failed to save notification preferences")?;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("stopping reminder watch");
                    break;
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}
