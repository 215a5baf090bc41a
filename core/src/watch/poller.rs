use std::{future::Future, io::Write, time::Duration};

use anyhow::Context as _;
use tokio::time::Instant;

use super::{
    live::LiveRender,
    status::{StatusBoard, StatusSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The last fetched board had nothing waiting.
    Settled,
    Cancelled,
    BudgetExhausted,
}

/// Fetches a status board at a fixed cadence and redraws it until nothing
/// is waiting anymore.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    budget: Option<Duration>,
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            budget: None,
        }
    }
}

impl Poller {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Total time after which polling gives up even if something is still waiting.
    pub fn budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self
    }

    pub async fn run<S, W, V, C>(
        &self,
        source: &mut S,
        live: &mut LiveRender<W>,
        view: V,
        cancel: C,
    ) -> anyhow::Result<PollOutcome>
    where
        S: StatusSource + ?Sized,
        W: Write,
        V: Fn(&StatusBoard) -> String,
        C: Future<Output = ()>,
    {
        let deadline = self.budget.map(|b| Instant::now() + b);
        let budget_exhausted = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(cancel, budget_exhausted);

        live.begin();
        loop {
            let tick_start = Instant::now();

            let board = tokio::select! {
                res = source.fetch() => res.context("Failed to fetch submission status")?,
                _ = &mut cancel => return Ok(PollOutcome::Cancelled),
                _ = &mut budget_exhausted => return Ok(PollOutcome::BudgetExhausted),
            };
            live.render(&view(&board))
                .context("Failed to render submission status")?;

            if !board.is_waiting() {
                return Ok(PollOutcome::Settled);
            }

            let wait = self.interval.saturating_sub(tick_start.elapsed());
            log::trace!("Next fetch in {}ms", wait.as_millis());
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = &mut cancel => return Ok(PollOutcome::Cancelled),
                _ = &mut budget_exhausted => return Ok(PollOutcome::BudgetExhausted),
            }
        }
    }
}
