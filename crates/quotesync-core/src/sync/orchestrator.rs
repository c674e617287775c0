//! Sync orchestrator: drives fetch, merge and commit cycles.
//!
//! Timer ticks and manual requests both land in [`SyncOrchestrator::run_cycle`].
//! Only one cycle runs at a time; a trigger that arrives mid-cycle is
//! answered with [`SyncOutcome::Busy`] and does no work.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::merge::merge;
use crate::models::{Conflict, QuoteRecord};
use crate::remote::{PushAck, RemoteSource};
use crate::services::QuoteService;
use crate::state::{SyncPhase, SyncTrigger};
use crate::Result;

/// What a committed cycle changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub replaced: usize,
    pub conflicts: Vec<Conflict>,
    /// Category list recomputed after the commit
    pub categories: Vec<String>,
}

/// Result of one sync trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Another cycle was already running
    Busy,
    /// The remote returned nothing
    Skipped,
    /// The remote batch matched the local collection
    UpToDate,
    /// The merge result was committed
    Applied(SyncSummary),
}

impl SyncOutcome {
    /// One-line notice for the presentation layer.
    pub fn notice(&self) -> String {
        match self {
            Self::Busy => "Sync already in progress".to_string(),
            Self::Skipped => "Sync skipped: no quotes received from server".to_string(),
            Self::UpToDate => "Quotes already up to date".to_string(),
            Self::Applied(summary) if summary.conflicts.is_empty() => format!(
                "Quotes synced with server: {} added, no conflicts",
                summary.added
            ),
            Self::Applied(summary) => format!(
                "Conflicts detected: server version applied to {} quotes ({} added)",
                summary.conflicts.len(),
                summary.added
            ),
        }
    }

    /// Conflicts produced by this cycle.
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            Self::Applied(summary) => &summary.conflicts,
            _ => &[],
        }
    }
}

/// How the best-effort upload of a new quote went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    Acknowledged(PushAck),
    /// Upload failed; the quote stays local
    Deferred(String),
}

/// Result of adding a quote through the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReport {
    pub record: QuoteRecord,
    pub push: PushStatus,
}

pub struct SyncOrchestrator<R> {
    service: QuoteService,
    remote: R,
    fetch_limit: usize,
    phase: Mutex<SyncPhase>,
}

impl<R: RemoteSource> SyncOrchestrator<R> {
    pub const fn new(service: QuoteService, remote: R, fetch_limit: usize) -> Self {
        Self {
            service,
            remote,
            fetch_limit,
            phase: Mutex::new(SyncPhase::Idle),
        }
    }

    pub const fn service(&self) -> &QuoteService {
        &self.service
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    pub fn phase(&self) -> SyncPhase {
        *lock_phase(&self.phase)
    }

    /// Run one fetch, merge and commit cycle.
    pub async fn run_cycle(&self, trigger: SyncTrigger) -> Result<SyncOutcome> {
        let Some(_cycle) = self.begin_cycle() else {
            tracing::debug!("Ignoring {trigger} sync trigger: cycle already running");
            return Ok(SyncOutcome::Busy);
        };
        tracing::debug!("Sync cycle started by {trigger}");

        let batch = self.remote.fetch_batch(self.fetch_limit).await;
        if batch.is_empty() {
            tracing::debug!("Sync skipped: remote returned no quotes");
            return Ok(SyncOutcome::Skipped);
        }

        // Merge and commit under one lock so no other writer can slip in
        // between the snapshot and the swap.
        let mut state = self.service.lock().await;
        self.set_phase(SyncPhase::Merging);
        let outcome = merge(state.records(), &batch);
        if !outcome.changed {
            tracing::debug!("Sync found nothing new in {} remote quotes", batch.len());
            return Ok(SyncOutcome::UpToDate);
        }

        self.set_phase(SyncPhase::Committing);
        let summary = state.commit_merge(outcome)?;
        tracing::info!(
            "Sync committed: {} added, {} replaced, {} conflicts",
            summary.added,
            summary.replaced,
            summary.conflicts.len()
        );
        Ok(SyncOutcome::Applied(summary))
    }

    /// Run cycles on a fixed interval until `shutdown` resolves.
    ///
    /// The first cycle starts immediately. Cycle errors are logged and the
    /// loop keeps going.
    pub async fn run_periodic<F, O>(&self, interval: Duration, shutdown: F, mut on_outcome: O)
    where
        F: Future<Output = ()>,
        O: FnMut(&SyncOutcome),
    {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::debug!("Periodic sync stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_cycle(SyncTrigger::Timer).await {
                        Ok(outcome) => on_outcome(&outcome),
                        Err(error) => tracing::error!("Periodic sync failed: {error}"),
                    }
                }
            }
        }
    }

    /// Add a quote locally, then try to upload it.
    ///
    /// The local add is what matters; a failed upload is reported in
    /// [`AddReport::push`] and never fails the call.
    pub async fn add_and_push(&self, text: &str, category: &str) -> Result<AddReport> {
        let record = self.service.add_quote(text, category).await?;

        let push = match self.remote.push_one(&record).await {
            Ok(ack) => {
                tracing::debug!("Quote {} pushed to remote", record.id);
                PushStatus::Acknowledged(ack)
            }
            Err(error) => {
                tracing::warn!("Quote {} stays local: {error}", record.id);
                PushStatus::Deferred(error.to_string())
            }
        };

        Ok(AddReport { record, push })
    }

    fn begin_cycle(&self) -> Option<CycleGuard<'_>> {
        let mut phase = lock_phase(&self.phase);
        if !phase.is_idle() {
            return None;
        }
        *phase = SyncPhase::Fetching;
        Some(CycleGuard { phase: &self.phase })
    }

    fn set_phase(&self, next: SyncPhase) {
        *lock_phase(&self.phase) = next;
    }
}

/// Returns the orchestrator to `Idle` when a cycle ends, however it ends.
struct CycleGuard<'a> {
    phase: &'a Mutex<SyncPhase>,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        *lock_phase(self.phase) = SyncPhase::Idle;
    }
}

fn lock_phase(phase: &Mutex<SyncPhase>) -> MutexGuard<'_, SyncPhase> {
    phase.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuoteId, QuoteSource, REMOTE_CATEGORY};
    use crate::remote::{RemoteError, RemoteResult};
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Serves queued batches in order, then empty batches.
    #[derive(Default)]
    struct ScriptedRemote {
        batches: std::sync::Mutex<VecDeque<Vec<QuoteRecord>>>,
        pushed: std::sync::Mutex<Vec<QuoteRecord>>,
        fetches: AtomicUsize,
        reject_pushes: bool,
    }

    impl ScriptedRemote {
        fn with_batches(batches: Vec<Vec<QuoteRecord>>) -> Self {
            Self {
                batches: std::sync::Mutex::new(batches.into()),
                ..Self::default()
            }
        }
    }

    impl RemoteSource for ScriptedRemote {
        async fn fetch_batch(&self, limit: usize) -> Vec<QuoteRecord> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let mut batch = self
                .batches
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default();
            batch.truncate(limit);
            batch
        }

        async fn push_one(&self, record: &QuoteRecord) -> RemoteResult<PushAck> {
            if self.reject_pushes {
                return Err(RemoteError::Api("HTTP 503".to_string()));
            }
            self.pushed.lock().unwrap().push(record.clone());
            Ok(PushAck {
                remote_id: Some("101".to_string()),
            })
        }
    }

    /// Holds the fetch open until released, to overlap two triggers.
    struct GatedRemote {
        started: Notify,
        release: Notify,
        batch: Vec<QuoteRecord>,
    }

    impl RemoteSource for GatedRemote {
        async fn fetch_batch(&self, _limit: usize) -> Vec<QuoteRecord> {
            self.started.notify_one();
            self.release.notified().await;
            self.batch.clone()
        }

        async fn push_one(&self, _record: &QuoteRecord) -> RemoteResult<PushAck> {
            Ok(PushAck::default())
        }
    }

    fn local(text: &str, category: &str) -> QuoteRecord {
        QuoteRecord {
            id: QuoteId::new_local(),
            text: text.to_string(),
            category: category.to_string(),
            source: QuoteSource::Local,
            last_modified: 1,
        }
    }

    fn remote(id: u32, text: &str) -> QuoteRecord {
        QuoteRecord::from_remote(Some(id.to_string()), text, 2)
    }

    async fn service_with(records: Vec<QuoteRecord>) -> QuoteService {
        let service = QuoteService::open_in_memory().unwrap();
        {
            let mut state = service.lock().await;
            let outcome = crate::merge::MergeOutcome {
                merged: records,
                ..Default::default()
            };
            state.commit_merge(outcome).unwrap();
        }
        service
    }

    #[tokio::test]
    async fn empty_fetch_skips_cycle() {
        let before = vec![local("Be kind", "Wisdom")];
        let service = service_with(before.clone()).await;
        let orchestrator = SyncOrchestrator::new(service, ScriptedRemote::default(), 5);

        let outcome = orchestrator.run_cycle(SyncTrigger::Manual).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Skipped);
        assert_eq!(orchestrator.service().records().await, before);
        assert_eq!(orchestrator.phase(), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn conflicting_batch_applies_remote_and_opens_session() {
        let before = vec![local("Be kind", "Wisdom")];
        let service = service_with(before.clone()).await;
        let batch = vec![remote(1, "Be kind"), remote(2, "New idea")];
        let orchestrator =
            SyncOrchestrator::new(service, ScriptedRemote::with_batches(vec![batch.clone()]), 5);

        let outcome = orchestrator.run_cycle(SyncTrigger::Timer).await.unwrap();

        let SyncOutcome::Applied(summary) = &outcome else {
            panic!("expected applied outcome, got {outcome:?}");
        };
        assert_eq!(summary.added, 1);
        assert_eq!(summary.replaced, 1);
        assert_eq!(summary.conflicts.len(), 1);
        assert_eq!(summary.categories, vec![REMOTE_CATEGORY.to_string()]);
        assert!(outcome.notice().starts_with("Conflicts detected"));

        let service = orchestrator.service();
        assert_eq!(service.records().await, batch);
        assert_eq!(service.reload().await.unwrap(), batch);
        assert_eq!(service.pending_conflicts().await, summary.conflicts);

        assert_eq!(service.keep_local_for_all().await.unwrap(), 1);
        let restored = service.records().await;
        assert_eq!(restored[0], before[0]);
        assert_eq!(restored[1], batch[1]);
    }

    #[tokio::test]
    async fn unchanged_batch_is_up_to_date() {
        let existing = remote(1, "Already synced");
        let service = service_with(vec![existing.clone()]).await;
        let orchestrator = SyncOrchestrator::new(
            service,
            ScriptedRemote::with_batches(vec![vec![existing]]),
            5,
        );

        let outcome = orchestrator.run_cycle(SyncTrigger::Manual).await.unwrap();

        assert_eq!(outcome, SyncOutcome::UpToDate);
        assert_eq!(outcome.notice(), "Quotes already up to date");
    }

    #[tokio::test]
    async fn conflict_free_cycle_clears_previous_session() {
        let service = service_with(vec![local("Be kind", "Wisdom")]).await;
        let orchestrator = SyncOrchestrator::new(
            service,
            ScriptedRemote::with_batches(vec![
                vec![remote(1, "Be kind")],
                vec![remote(2, "Another")],
            ]),
            5,
        );

        orchestrator.run_cycle(SyncTrigger::Timer).await.unwrap();
        assert_eq!(orchestrator.service().pending_conflicts().await.len(), 1);

        let outcome = orchestrator.run_cycle(SyncTrigger::Timer).await.unwrap();
        assert!(outcome.conflicts().is_empty());
        assert!(outcome.notice().contains("no conflicts"));
        assert!(orchestrator.service().pending_conflicts().await.is_empty());
    }

    #[tokio::test]
    async fn overlapping_trigger_is_rejected_while_busy() {
        let service = service_with(Vec::new()).await;
        let orchestrator = SyncOrchestrator::new(
            service,
            GatedRemote {
                started: Notify::new(),
                release: Notify::new(),
                batch: vec![remote(1, "Only once")],
            },
            5,
        );

        let first = orchestrator.run_cycle(SyncTrigger::Timer);
        let second = async {
            orchestrator.remote().started.notified().await;
            assert_eq!(orchestrator.phase(), SyncPhase::Fetching);
            let outcome = orchestrator.run_cycle(SyncTrigger::Manual).await;
            orchestrator.remote().release.notify_one();
            outcome
        };

        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first.unwrap(), SyncOutcome::Applied(_)));
        assert_eq!(second.unwrap(), SyncOutcome::Busy);
        assert_eq!(orchestrator.service().records().await.len(), 1);
        assert_eq!(orchestrator.phase(), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn writes_during_fetch_are_kept_by_the_merge() {
        let service = service_with(Vec::new()).await;
        let orchestrator = SyncOrchestrator::new(
            service,
            GatedRemote {
                started: Notify::new(),
                release: Notify::new(),
                batch: vec![remote(1, "From server")],
            },
            5,
        );

        let cycle = orchestrator.run_cycle(SyncTrigger::Manual);
        let writer = async {
            orchestrator.remote().started.notified().await;
            let added = orchestrator
                .service()
                .add_quote("Typed meanwhile", "Local")
                .await;
            orchestrator.remote().release.notify_one();
            added
        };

        let (cycle, added) = tokio::join!(cycle, writer);
        cycle.unwrap();
        added.unwrap();

        let texts = orchestrator
            .service()
            .records()
            .await
            .into_iter()
            .map(|record| record.text)
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["Typed meanwhile", "From server"]);
    }

    #[tokio::test]
    async fn add_and_push_reports_acknowledgement() {
        let service = service_with(Vec::new()).await;
        let orchestrator = SyncOrchestrator::new(service, ScriptedRemote::default(), 5);

        let report = orchestrator.add_and_push("Be kind", "Wisdom").await.unwrap();

        assert_eq!(
            report.push,
            PushStatus::Acknowledged(PushAck {
                remote_id: Some("101".to_string())
            })
        );
        assert_eq!(orchestrator.remote().pushed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_and_push_keeps_quote_when_push_fails() {
        let service = service_with(Vec::new()).await;
        let remote = ScriptedRemote {
            reject_pushes: true,
            ..ScriptedRemote::default()
        };
        let orchestrator = SyncOrchestrator::new(service, remote, 5);

        let report = orchestrator.add_and_push("Be kind", "Wisdom").await.unwrap();

        assert!(matches!(report.push, PushStatus::Deferred(_)));
        assert_eq!(orchestrator.service().records().await, vec![report.record]);
    }

    #[tokio::test]
    async fn add_and_push_rejects_invalid_input_before_pushing() {
        let service = service_with(Vec::new()).await;
        let orchestrator = SyncOrchestrator::new(service, ScriptedRemote::default(), 5);

        assert!(orchestrator.add_and_push("  ", "Wisdom").await.is_err());
        assert!(orchestrator.remote().pushed.lock().unwrap().is_empty());
        assert!(orchestrator.service().records().await.is_empty());
    }

    #[tokio::test]
    async fn fetch_limit_is_forwarded() {
        let service = service_with(Vec::new()).await;
        let orchestrator = SyncOrchestrator::new(
            service,
            ScriptedRemote::with_batches(vec![vec![
                remote(1, "a"),
                remote(2, "b"),
                remote(3, "c"),
            ]]),
            2,
        );

        orchestrator.run_cycle(SyncTrigger::Manual).await.unwrap();

        assert_eq!(orchestrator.service().records().await.len(), 2);
    }

    #[tokio::test]
    async fn periodic_loop_runs_until_shutdown() {
        let service = service_with(Vec::new()).await;
        let orchestrator = SyncOrchestrator::new(
            service,
            ScriptedRemote::with_batches(vec![vec![remote(1, "Tick")]]),
            5,
        );
        let mut outcomes = Vec::new();

        orchestrator
            .run_periodic(
                Duration::from_millis(10),
                tokio::time::sleep(Duration::from_millis(45)),
                |outcome| outcomes.push(outcome.clone()),
            )
            .await;

        assert!(orchestrator.remote().fetches.load(Ordering::SeqCst) >= 2);
        assert!(matches!(outcomes.first(), Some(SyncOutcome::Applied(_))));
        assert!(outcomes[1..]
            .iter()
            .all(|outcome| *outcome == SyncOutcome::Skipped));
        assert_eq!(orchestrator.phase(), SyncPhase::Idle);
    }
}
