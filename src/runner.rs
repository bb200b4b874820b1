//! Wall-clock driver for the reminder scheduler.

use std::future::Future;

use pursebook_core::{Clock, NotificationSink, ReminderScheduler, TickOutcome};
use tokio::time::{self, MissedTickBehavior};

use crate::errors::CliError;

/// What a watch session did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub checks: usize,
    pub fired: usize,
    pub last: Option<TickOutcome>,
}

impl WatchSummary {
    fn record(&mut self, outcome: TickOutcome) {
        if outcome != TickOutcome::Inactive {
            self.checks += 1;
        }
        if outcome.fired() {
            self.fired += 1;
        }
        self.last = Some(outcome);
    }
}

/// Runs the scheduler until `shutdown` resolves or the scheduler goes idle.
///
/// Checks once immediately, then once per scheduler interval. Before every
/// periodic check the stored configuration is re-read; a change triggers a
/// `sync` instead of a plain `tick`. Missed ticks after a suspension collapse
/// into a single check.
pub async fn watch<N, C, F>(scheduler: &mut ReminderScheduler<N, C>, shutdown: F) -> WatchSummary
where
    N: NotificationSink,
    C: Clock,
    F: Future<Output = ()>,
{
    let mut summary = WatchSummary::default();
    summary.record(scheduler.sync());
    if !scheduler.is_active() {
        tracing::info!("reminders are disabled; nothing to watch");
        return summary;
    }

    let mut ticker = time::interval_at(
        time::Instant::now() + scheduler.interval(),
        scheduler.interval(),
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => {
                tracing::info!(checks = summary.checks, "watch interrupted");
                scheduler.stop();
                break;
            }
            _ = ticker.tick() => {
                let outcome = if scheduler.settings().refresh() {
                    tracing::info!("reminder settings changed on disk");
                    scheduler.sync()
                } else {
                    scheduler.tick()
                };
                summary.record(outcome);
                if !scheduler.is_active() {
                    tracing::info!("reminders switched off; watch finished");
                    break;
                }
            }
        }
    }
    summary
}

/// Runs [`watch`] on a current-thread runtime, stopping on Ctrl-C.
pub fn watch_until_interrupted<N, C>(
    scheduler: &mut ReminderScheduler<N, C>,
) -> Result<WatchSummary, CliError>
where
    N: NotificationSink,
    C: Clock,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(watch(scheduler, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for Ctrl-C; stop the process to end the watch");
            std::future::pending::<()>().await;
        }
    })))
}
