//! View model that runs user fetches in the background and hands the
//! results to the registered view on the thread that pumps it.
//!
//! The coordinator is not `Send`: it lives on the UI thread. Fetches run on
//! the tokio runtime it was given and post their outcome back over a channel;
//! nothing reaches the view until [`FetchCoordinator::pump`] or
//! [`FetchCoordinator::pump_until_idle`] is called. Mutating methods take
//! `&mut self`, so there is a single writer for the output reference.

use std::{
    sync::{Arc, Weak},
    time::{Duration, Instant},
};

use crossbeam_channel::{unbounded, Receiver, Sender};
use shared::display::{project, DisplayPayload};
use tokio::{runtime::Handle, sync::broadcast};
use tracing::{debug, info, warn};

use crate::{
    error::FetchError, output::UserViewOutput, service::UserFetchService, subject::Subject,
    FetchOutcome,
};

/// Generation number of one `fetch_user` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Every completion is delivered in arrival order.
    #[default]
    DeliverAll,
    /// Completions older than the most recent `fetch_user` are dropped.
    DiscardStale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Fetching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpReport {
    pub delivered: usize,
    pub skipped_no_output: usize,
    pub discarded_stale: usize,
}

impl PumpReport {
    pub fn completions(&self) -> usize {
        self.delivered + self.skipped_no_output + self.discarded_stale
    }
}

struct Completion {
    ticket: FetchTicket,
    outcome: FetchOutcome,
}

/// Sends exactly one completion per ticket. If the fetch task panics or is
/// dropped by a runtime that shut down, the drop sends an aborted outcome so
/// the view still gets the fallback.
struct CompletionGuard {
    ticket: FetchTicket,
    completions_tx: Option<Sender<Completion>>,
}

impl CompletionGuard {
    fn complete(mut self, outcome: FetchOutcome) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: FetchOutcome) {
        let Some(completions_tx) = self.completions_tx.take() else {
            return;
        };
        let ticket = self.ticket;
        if completions_tx.send(Completion { ticket, outcome }).is_err() {
            debug!(generation = ticket.0, "coordinator dropped before user fetch completed");
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.completions_tx.is_some() {
            warn!(generation = self.ticket.0, "user fetch task ended without a result");
            self.send(Err(FetchError::Transport("user fetch aborted".to_string())));
        }
    }
}

pub struct FetchCoordinator {
    service: Arc<dyn UserFetchService>,
    runtime: Handle,
    output: Option<Weak<dyn UserViewOutput>>,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
    payloads: Subject<DisplayPayload>,
    stale_policy: StalePolicy,
    latest: FetchTicket,
    in_flight: usize,
}

impl FetchCoordinator {
    pub fn new(service: Arc<dyn UserFetchService>, runtime: Handle) -> Self {
        let (completions_tx, completions_rx) = unbounded();
        Self {
            service,
            runtime,
            output: None,
            completions_tx,
            completions_rx,
            payloads: Subject::default(),
            stale_policy: StalePolicy::default(),
            latest: FetchTicket(0),
            in_flight: 0,
        }
    }

    pub fn with_stale_policy(mut self, stale_policy: StalePolicy) -> Self {
        self.stale_policy = stale_policy;
        self
    }

    /// Replaces the current view. Only a weak reference is kept, so the view
    /// may be dropped while a fetch is in flight.
    pub fn register_output<O: UserViewOutput + 'static>(&mut self, output: &Arc<O>) {
        let output: Weak<dyn UserViewOutput> = Arc::<O>::downgrade(output);
        self.output = Some(output);
    }

    pub fn clear_output(&mut self) {
        self.output = None;
    }

    pub fn has_output(&self) -> bool {
        self.output
            .as_ref()
            .is_some_and(|output| output.strong_count() > 0)
    }

    /// Receives every payload the view model produces, whether or not a view
    /// is registered. Results dropped as stale are not published.
    pub fn subscribe(&self) -> broadcast::Receiver<DisplayPayload> {
        self.payloads.subscribe()
    }

    pub fn phase(&self) -> FetchPhase {
        if self.in_flight == 0 {
            FetchPhase::Idle
        } else {
            FetchPhase::Fetching
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts one request and returns immediately. Overlapping calls are not
    /// deduplicated.
    pub fn fetch_user(&mut self) -> FetchTicket {
        self.latest = FetchTicket(self.latest.0 + 1);
        let ticket = self.latest;
        self.in_flight += 1;

        let service = Arc::clone(&self.service);
        // Built outside the task so a task that never runs still reports back.
        let guard = CompletionGuard {
            ticket,
            completions_tx: Some(self.completions_tx.clone()),
        };
        self.runtime.spawn(async move {
            let outcome = service.fetch_user().await;
            guard.complete(outcome);
        });

        debug!(generation = ticket.0, "queued user fetch");
        ticket
    }

    /// Delivers every completion that has already arrived. Never blocks.
    pub fn pump(&mut self) -> PumpReport {
        let mut report = PumpReport::default();
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.deliver(completion, &mut report);
        }
        report
    }

    /// Blocks the calling thread until no fetch is in flight or `timeout`
    /// elapses, delivering completions as they arrive.
    pub fn pump_until_idle(&mut self, timeout: Duration) -> PumpReport {
        let deadline = Instant::now() + timeout;
        let mut report = self.pump();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            // The coordinator holds a sender, so the only error is a timeout.
            let Ok(completion) = self.completions_rx.recv_timeout(remaining) else {
                break;
            };
            self.deliver(completion, &mut report);
        }
        report
    }

    fn deliver(&mut self, completion: Completion, report: &mut PumpReport) {
        let Completion { ticket, outcome } = completion;
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.stale_policy == StalePolicy::DiscardStale && ticket < self.latest {
            debug!(
                generation = ticket.0,
                latest = self.latest.0,
                "discarding stale user fetch result"
            );
            report.discarded_stale += 1;
            return;
        }

        if let Err(err) = &outcome {
            warn!(
                generation = ticket.0,
                reason = err.reason(),
                "user fetch failed, showing fallback: {err}"
            );
        }
        let payload = project(&outcome);
        self.payloads.publish(payload.clone());

        let Some(output) = self.output.as_ref().and_then(Weak::upgrade) else {
            debug!(generation = ticket.0, "no view registered, dropping user update");
            report.skipped_no_output += 1;
            return;
        };
        output.update_view(&payload);
        info!(generation = ticket.0, email = %payload.email, "delivered user update");
        report.delivered += 1;
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
