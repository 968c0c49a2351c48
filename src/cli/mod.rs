pub mod chart;
pub mod history;

use std::{fmt::Display, path::PathBuf};

use anyhow::Result;
use chrono::Local;
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;

use crate::{
    aggregate::daily_series,
    storage::{kv::FileKeyValueStore, session_store::SessionStore},
    timer::HoldTimer,
    utils::{
        clock::{Clock, DefaultClock},
        dir::default_state_path,
        logging::enable_logging,
    },
};

use chart::{chart_legend, chart_lines, DEFAULT_CHART_ROWS};
use history::{history_lines, stats_lines};

#[derive(Parser, Debug)]
#[command(name = "Planktrack", version, long_about = None)]
#[command(about = "Command line plank timer and training log", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Time a plank hold. Press Enter to stop")]
    Start {
        #[arg(long, help = "Don't show the first-hold-of-the-day target")]
        no_target: bool,
    },
    #[command(about = "Show today's count, the all-time best and the session total")]
    Stats,
    #[command(about = "Chart best and total hold time for the last 14 active days")]
    Chart {
        #[arg(long, default_value_t = DEFAULT_CHART_ROWS, help = "Chart height in rows")]
        height: u32,
    },
    #[command(about = "List recorded holds, newest first, grouped by day")]
    History {
        #[arg(
            long,
            short,
            help = "Only show holds from this date on. Examples are \"yesterday\", \"1 hour ago\", \"15/03/2025\""
        )]
        since: Option<String>,
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let state_dir = match args.dir {
        Some(v) => v,
        None => default_state_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&state_dir, logging_level, args.log)?;

    let clock = DefaultClock;
    let store = SessionStore::new(
        FileKeyValueStore::new(state_dir)?,
        Box::new(DefaultClock),
    );

    match args.commands {
        Commands::Start { no_target } => {
            let stop = CancellationToken::new();
            let signal_stop = stop.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    signal_stop.cancel();
                }
            });

            HoldTimer::new(store, Box::new(DefaultClock), stop, !no_target)
                .run()
                .await
        }
        Commands::Stats => {
            let log = store.load().await;
            for line in stats_lines(&log, clock.now().date_naive()) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Chart { height } => {
            let log = store.load().await;
            let series = daily_series(&log);
            if !series.is_empty() {
                println!("{}", chart_legend(true));
            }
            for line in chart_lines(&series, height.max(4), true) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::History { since, date_style } => {
            let log = store.load().await;
            let log = match since {
                Some(s) => {
                    let cutoff = match parse_date_string(&s, Local::now(), date_style.into()) {
                        Ok(v) => v.with_timezone(&chrono::Utc),
                        Err(e) => {
                            return Err(Args::command()
                                .error(
                                    clap::error::ErrorKind::ValueValidation,
                                    format!("Failed to validate since date {e}"),
                                )
                                .into());
                        }
                    };
                    log.into_iter().filter(|v| v.date >= cutoff).collect()
                }
                None => log,
            };
            for line in history_lines(&log) {
                println!("{line}");
            }
            Ok(())
        }
    }
}
