//! Interactive hold timer. One [HoldTimer] instance owns the whole
//! lifecycle of a run: the frame refresh task, the stop paths and the
//! handoff of the measured duration into the store.

pub mod target;

use std::{io::Write, time::Duration};

use ansi_term::Colour;
use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::Instant,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    storage::{kv::KeyValueStore, session_store::SessionStore},
    utils::{clock::Clock, time::format_clock},
};

use target::{is_first_of_day, TargetIndicator};

/// Holds shorter than a second never reach the log.
pub const MIN_RECORDED_MS: u64 = 1_000;

/// How long the final time stays on screen before the display resets.
const DISPLAY_HOLD: Duration = Duration::from_millis(1500);

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// The append gate. Checked exactly once per completed hold.
pub fn qualifies_for_log(elapsed_ms: u64) -> bool {
    elapsed_ms >= MIN_RECORDED_MS
}

/// Single line the running display refreshes in place.
pub fn frame_line(elapsed_ms: u64, indicator: TargetIndicator) -> String {
    let m = elapsed_ms / 60_000;
    let s = (elapsed_ms % 60_000) / 1_000;
    let cs = (elapsed_ms % 1_000) / 10;
    let clock = format!("{m:02}:{s:02}.{cs:02}");

    match indicator {
        TargetIndicator::Hidden => clock,
        TargetIndicator::Armed => {
            format!("{clock}  {}", Colour::Yellow.paint("daily target 00:20"))
        }
        TargetIndicator::Reached => {
            format!("{clock}  {}", Colour::Green.paint("daily target reached"))
        }
    }
}

pub struct HoldTimer<K: KeyValueStore> {
    store: SessionStore<K>,
    clock: Box<dyn Clock>,
    stop: CancellationToken,
    show_target: bool,
}

impl<K: KeyValueStore> HoldTimer<K> {
    pub fn new(
        store: SessionStore<K>,
        clock: Box<dyn Clock>,
        stop: CancellationToken,
        show_target: bool,
    ) -> Self {
        Self {
            store,
            clock,
            stop,
            show_target,
        }
    }

    /// Runs one hold until Enter, Ctrl-C or stdin closing. The frame
    /// refresh is an arm of the select loop, so every way out of the loop
    /// tears it down with no orphaned ticker left behind.
    pub async fn run(self) -> Result<()> {
        let log = self.store.load().await;
        let today = self.clock.now().date_naive();
        // Evaluated once per start, not re-checked mid-hold.
        let mut indicator =
            TargetIndicator::on_start(self.show_target && is_first_of_day(&log, today));

        println!("Hold! Press Enter to stop.");

        let start = self.clock.instant();
        let mut next_frame = start + FRAME_INTERVAL;
        let mut input = BufReader::new(tokio::io::stdin()).lines();

        let elapsed_ms = loop {
            tokio::select! {
                _ = input.next_line() => {
                    break elapsed_between(start, self.clock.instant());
                }
                _ = self.stop.cancelled() => {
                    break elapsed_between(start, self.clock.instant());
                }
                _ = self.clock.sleep_until(next_frame) => {
                    next_frame += FRAME_INTERVAL;
                    let elapsed = elapsed_between(start, self.clock.instant());
                    indicator = indicator.advance(elapsed);
                    refresh_display(&frame_line(elapsed, indicator))?;
                }
            }
        };

        indicator = indicator.advance(elapsed_ms);
        refresh_display(&frame_line(elapsed_ms, indicator))?;
        debug!("Hold stopped at {elapsed_ms}ms");

        let outcome = if qualifies_for_log(elapsed_ms) {
            self.store.append(elapsed_ms).await
        } else {
            info!("Discarding {elapsed_ms}ms hold, under the {MIN_RECORDED_MS}ms threshold");
            Ok(())
        };

        // Final time stays visible for a moment before the display zeroes
        // out.
        self.clock.sleep(DISPLAY_HOLD).await;
        refresh_display(&frame_line(0, TargetIndicator::Hidden))?;
        println!();

        match outcome {
            Ok(()) if qualifies_for_log(elapsed_ms) => {
                println!("Recorded a {} hold.", format_clock(elapsed_ms));
                Ok(())
            }
            Ok(()) => {
                println!("Too short to record (under a second).");
                Ok(())
            }
            Err(e) => Err(e.context(format!(
                "Couldn't save your {} hold, it is not in the log",
                format_clock(elapsed_ms),
            ))),
        }
    }
}

fn elapsed_between(start: Instant, now: Instant) -> u64 {
    now.saturating_duration_since(start).as_millis() as u64
}

/// Rewrites the single display line in place.
fn refresh_display(line: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "\r\x1b[K{line}")?;
    stdout.flush()?;
    Ok(())
}
