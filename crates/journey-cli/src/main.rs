mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    day::DaySubcommand, history::HistorySubcommand, notify::NotifySubcommand,
    reflection::ReflectionSubcommand, timer::TimerSubcommand, usage::UsageSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "journey",
    about = "Seven days from noise to result: daily checklists, reminders and badges",
    version,
    propagate_version = true
)]
struct Cli {
    /// Journey root (default: auto-detect from .journey/, then the home directory)
    #[arg(long, global = true, env = "JOURNEY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the journey store and config
    Init,

    /// Show all seven days with their status and lock state
    Days,

    /// Work on a single day
    Day {
        #[command(subcommand)]
        subcommand: DaySubcommand,
    },

    /// Show earned badges and announce a newly unlocked one
    Achievements,

    /// Manage reminder notifications
    Notify {
        #[command(subcommand)]
        subcommand: NotifySubcommand,
    },

    /// Track usage and suggest a reminder time
    Usage {
        #[command(subcommand)]
        subcommand: UsageSubcommand,
    },

    /// Focus timer settings
    Timer {
        #[command(subcommand)]
        subcommand: TimerSubcommand,
    },

    /// Final reflection after day 7
    Reflection {
        #[command(subcommand)]
        subcommand: ReflectionSubcommand,
    },

    /// Notes and links collected across the journey
    History {
        #[command(subcommand)]
        subcommand: HistorySubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Notify {
            subcommand: NotifySubcommand::Watch { .. },
        } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Days => cmd::days::run(&root, cli.json),
        Commands::Day { subcommand } => cmd::day::run(&root, subcommand, cli.json),
        Commands::Achievements => cmd::achievements::run(&root, cli.json),
        Commands::Notify { subcommand } => cmd::notify::run(&root, subcommand, cli.json),
        Commands::Usage { subcommand } => cmd::usage::run(&root, subcommand, cli.json),
        Commands::Timer { subcommand } => cmd::timer::run(&root, subcommand, cli.json),
        Commands::Reflection { subcommand } => cmd::reflection::run(&root, subcommand, cli.json),
        Commands::History { subcommand } => cmd::history::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
