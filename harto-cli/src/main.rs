use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use harto_core::{Clock, FileStore, Harto, LocalClock, Pack, Region, ResetScope, ZonedClock};
use std::time::Duration;

mod config;
mod content;
mod custom_cmd;
mod prefs_cmd;
mod render;
mod state;

use config::Config;
use custom_cmd::CustomCommand;
use prefs_cmd::PrefsCommand;

#[derive(Parser, Debug)]
#[command(
    name = "harto",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("HARTO_BUILD_SHA"), ")"),
    about = "Card-based daily/weekly checklist for Heartopia"
)]
struct Cli {
    /// Use cached content only; do not fetch
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,

    /// Debug logging (overridden by HARTO_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show pending and completed cards
    Board {
        /// Only this display pack
        #[arg(long)]
        pack: Option<String>,

        /// Print the board as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Mark a card done
    Complete { id: String },

    /// Revert a card to pending (clears step progress)
    Undo { id: String },

    /// Toggle a step of a multi-step card
    Step {
        id: String,

        /// Step number, starting at 1
        step: u32,
    },

    /// Clear completions in the active region
    Reset {
        #[arg(long, conflicts_with = "all")]
        pack: Option<String>,

        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Show or switch the region (sea, tw)
    Region { region: Option<Region> },

    /// Show the game clock for the active region
    Clock,

    /// Manage your own cards
    Custom {
        #[command(subcommand)]
        command: CustomCommand,
    },

    /// Pin pending cards to the top in this order
    Order {
        ids: Vec<String>,

        /// Forget the custom order
        #[arg(long, default_value_t = false)]
        clear: bool,
    },

    /// Preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },

    /// Special item tracker
    Tracker,

    /// List guides, or print one
    Guides { id: Option<String> },

    /// Redraw the board periodically
    Watch {
        /// Seconds between ticks (default: config feed.refresh_minutes)
        #[arg(long)]
        interval: Option<u64>,

        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.harto/config.toml with defaults
    Init,
    /// Print the effective config
    Show,
}

/// Game clock: a configured IANA zone, else host local time.
enum HostClock {
    Local(LocalClock),
    Zoned(ZonedClock),
}

impl HostClock {
    fn from_config(cfg: &Config) -> Result<Self> {
        match cfg.clock.timezone.as_deref() {
            Some(tz) => Ok(HostClock::Zoned(ZonedClock::from_name(tz)?)),
            None => Ok(HostClock::Local(LocalClock)),
        }
    }
}

impl Clock for HostClock {
    fn now(&self) -> NaiveDateTime {
        match self {
            HostClock::Local(c) => c.now(),
            HostClock::Zoned(c) => c.now(),
        }
    }
}

type App = Harto<FileStore, HostClock>;

fn init_tracing(cfg: &Config, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { cfg.log.level.as_str() };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HARTO_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_tracing(&cfg, cli.verbose)?;

    if let Command::Config { command } = &cli.command {
        return match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                Ok(())
            }
        };
    }

    let mut store = state::open_store()?;
    let snapshot = content::load_snapshot(&cfg, &mut store, cli.offline).await;
    if snapshot.catalog.cards.is_empty() {
        tracing::warn!("no card catalog available; showing custom cards only");
    }

    let mut app: App = Harto::open(store, HostClock::from_config(&cfg)?);
    content::apply_snapshot(&mut app, &snapshot);

    match cli.command {
        Command::Board { pack, json } => {
            let board = app.board();
            if json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else {
                let only = pack.as_deref().map(Pack::parse_loose);
                render::print_board(&board, &app.environment(), app.view_mode(), only.as_ref());
            }
        }

        Command::Complete { id } => {
            app.complete(&id)?;
            println!("Completed {id}.");
        }

        Command::Undo { id } => {
            if app.uncomplete(&id) {
                println!("{id} is pending again.");
            } else {
                println!("{id} was not completed.");
            }
        }

        Command::Step { id, step } => {
            if step == 0 {
                bail!("steps are numbered from 1");
            }
            let done = app.toggle_step(&id, step - 1)?;
            let progress = app.steps_completed(&id);
            let total = app.tasks().iter().find(|t| t.id == id).map_or(0, |t| t.steps);
            if done {
                println!("{id}: all {total} steps done.");
            } else {
                println!("{id}: {progress}/{total} steps.");
            }
        }

        Command::Reset { pack, all } => {
            let scope = match (pack, all) {
                (Some(p), _) => ResetScope::Pack(Pack::parse_loose(&p)),
                (None, true) => ResetScope::All,
                (None, false) => bail!("pass --pack <pack> or --all"),
            };
            let removed = app.reset_completed_in_pack(scope);
            println!("Reset {removed} completed card(s) in {}.", app.region());
        }

        Command::Region { region } => {
            if let Some(r) = region {
                app.switch_region(r);
            }
            let r = app.region();
            println!("Region: {r} (daily reset {:02}:00)", r.reset_hour());
        }

        Command::Clock => {
            let cal = app.calendar();
            println!("region:      {}", cal.region);
            println!("now:         {}", cal.now.format("%Y-%m-%d %H:%M"));
            println!("today:       {}", cal.today());
            println!("week start:  {}", cal.week_start());
            println!("slot:        {}", cal.slot());
            println!("merge window: {}", cal.in_weekly_merge_window());
        }

        Command::Custom { command } => custom_cmd::run(&mut app, command)?,

        Command::Order { ids, clear } => {
            if clear {
                app.set_pending_order(Vec::new());
                println!("Pending order cleared.");
            } else {
                if ids.is_empty() {
                    bail!("pass card ids in the order you want them, or --clear");
                }
                for id in &ids {
                    if app.tasks().iter().all(|t| &t.id != id) {
                        tracing::warn!(id = %id, "ordering unknown card");
                    }
                }
                println!("Pinned {} card(s).", ids.len());
                app.set_pending_order(ids);
            }
        }

        Command::Prefs { command } => prefs_cmd::run(&mut app, command)?,

        Command::Tracker => {
            if snapshot.tracker.items.is_empty() {
                println!("No tracker data.");
            }
            for item in &snapshot.tracker.items {
                println!(
                    "{} | {} | {}",
                    item.name,
                    item.location.as_deref().unwrap_or("unknown"),
                    item.updated_at.as_deref().unwrap_or("-")
                );
            }
        }

        Command::Guides { id } => match id {
            None => {
                for g in &snapshot.guides.guides {
                    println!("{} | {} ({} pages)", g.id, g.title, g.pages.len());
                }
            }
            Some(id) => {
                let Some(g) = snapshot.guides.guides.iter().find(|g| g.id == id) else {
                    bail!("guide not found: {id}");
                };
                println!("# {}\n", g.title);
                for (i, page) in g.pages.iter().enumerate() {
                    println!("## {}", page.title.clone().unwrap_or_else(|| format!("Page {}", i + 1)));
                    println!("{}\n", page.body);
                }
            }
        },

        Command::Watch { interval, ticks } => {
            let every = watch_period(interval, cfg.feed.refresh_minutes);
            watch(&mut app, &cfg, cli.offline, every, ticks).await?;
        }

        // Handled above, before any state is opened.
        Command::Config { .. } => {}
    }

    Ok(())
}

/// Explicit `--interval` seconds, else the configured refresh minutes. Never zero.
fn watch_period(interval_secs: Option<u64>, refresh_minutes: u64) -> Duration {
    let secs = interval_secs.unwrap_or_else(|| refresh_minutes.max(1).saturating_mul(60));
    Duration::from_secs(secs.max(1))
}

/// Periodic tick: refresh content, re-run resets, redraw.
async fn watch(app: &mut App, cfg: &Config, offline: bool, every: Duration, ticks: Option<u64>) -> Result<()> {
    let mut interval = tokio::time::interval(every);
    let mut n = 0u64;
    loop {
        interval.tick().await;
        if n > 0 {
            // The first tick fires immediately and reuses the content loaded at startup.
            let mut store = state::open_store()?;
            let snapshot = content::load_snapshot(cfg, &mut store, offline).await;
            content::apply_snapshot(app, &snapshot);
            println!("\n----------------------------------------\n");
        }
        let board = app.board();
        render::print_board(&board, &app.environment(), app.view_mode(), None);

        n += 1;
        if ticks.is_some_and(|t| n >= t) {
            return Ok(());
        }
    }
}
