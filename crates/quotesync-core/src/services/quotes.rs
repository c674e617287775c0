//! Shared quote service wrapper used by every front end.
//!
//! All writers (add, import, sync commit, conflict revert) go through the
//! one mutex around [`QuoteState`], so they never interleave.

use std::path::PathBuf;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::{Mutex, MutexGuard};

use crate::db::Database;
use crate::export::render_json_export;
use crate::merge::MergeOutcome;
use crate::models::{CategoryFilter, Conflict, QuoteRecord};
use crate::store::{ImportReport, RecordStore};
use crate::sync::{ConflictSession, SyncSummary};
use crate::Result;

/// Collection, conflict session and last viewed quote, guarded together.
pub struct QuoteState {
    store: RecordStore,
    session: Option<ConflictSession>,
    last_viewed: Option<QuoteRecord>,
}

impl QuoteState {
    pub const fn new(store: RecordStore) -> Self {
        Self {
            store,
            session: None,
            last_viewed: None,
        }
    }

    pub fn records(&self) -> &[QuoteRecord] {
        self.store.records()
    }

    pub const fn session(&self) -> Option<&ConflictSession> {
        self.session.as_ref()
    }

    /// Persist a merge result and open a review session for its conflicts.
    ///
    /// The pre-merge snapshot is taken here, right before the swap. If the
    /// write fails nothing changes in memory.
    pub fn commit_merge(&mut self, outcome: MergeOutcome) -> Result<SyncSummary> {
        let snapshot = self.store.records().to_vec();
        self.store.replace_all(outcome.merged)?;

        self.session = if outcome.conflicts.is_empty() {
            None
        } else {
            Some(ConflictSession::new(outcome.conflicts.clone(), snapshot))
        };

        Ok(SyncSummary {
            added: outcome.added,
            replaced: outcome.replaced,
            conflicts: outcome.conflicts,
            categories: self.store.categories(),
        })
    }

    /// Accept the remote side of every conflict. Data is already in place.
    pub fn keep_remote_for_all(&mut self) -> usize {
        self.session
            .take()
            .map_or(0, |session| session.conflicts().len())
    }

    /// Put every conflicting entry back to its pre-merge local form.
    pub fn keep_local_for_all(&mut self) -> Result<usize> {
        let Some(session) = self.session.as_ref() else {
            return Ok(0);
        };

        let (records, reverted) = session.revert_to_local(self.store.records());
        if reverted > 0 {
            self.store.replace_all(records)?;
        }
        self.session = None;
        Ok(reverted)
    }
}

/// Thread-safe service for quote collection operations.
#[derive(Clone)]
pub struct QuoteService {
    state: Arc<Mutex<QuoteState>>,
}

impl QuoteService {
    /// Open a quote service backed by the database at the given path.
    pub fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        Ok(Self::from_store(RecordStore::open(db)?))
    }

    /// Open an in-memory quote service (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::from_store(RecordStore::open(db)?))
    }

    pub fn from_store(store: RecordStore) -> Self {
        Self {
            state: Arc::new(Mutex::new(QuoteState::new(store))),
        }
    }

    /// Exclusive access to the collection for multi-step operations.
    pub async fn lock(&self) -> MutexGuard<'_, QuoteState> {
        self.state.lock().await
    }

    /// Current collection.
    pub async fn records(&self) -> Vec<QuoteRecord> {
        self.lock().await.records().to_vec()
    }

    /// Re-read the persisted collection.
    pub async fn reload(&self) -> Result<Vec<QuoteRecord>> {
        let mut state = self.lock().await;
        Ok(state.store.load()?.to_vec())
    }

    /// Add a user-entered quote.
    pub async fn add_quote(&self, text: &str, category: &str) -> Result<QuoteRecord> {
        let mut state = self.lock().await;
        let record = state.store.add(text, category)?;
        tracing::info!("Added quote {} in category '{}'", record.id, record.category);
        state.last_viewed = Some(record.clone());
        Ok(record)
    }

    /// Import a JSON array of quotes. The first added quote becomes the
    /// last viewed one.
    pub async fn import_json(&self, raw: &str) -> Result<ImportReport> {
        let mut state = self.lock().await;
        let report = state.store.import_json(raw)?;
        if let Some(first) = report.added.first() {
            state.last_viewed = Some(first.clone());
        }
        Ok(report)
    }

    /// Render the whole collection for export.
    pub async fn export_json(&self) -> Result<String> {
        let state = self.lock().await;
        Ok(render_json_export(state.records())?)
    }

    /// Distinct categories in first-seen order.
    pub async fn categories(&self) -> Vec<String> {
        self.lock().await.store.categories()
    }

    /// Last category filter the user picked.
    pub async fn current_filter(&self) -> Result<CategoryFilter> {
        self.lock().await.store.load_filter()
    }

    /// Remember a category filter across sessions.
    pub async fn set_filter(&self, filter: &CategoryFilter) -> Result<()> {
        self.lock().await.store.save_filter(filter)
    }

    /// Quotes matching `filter`, in collection order.
    pub async fn filtered_quotes(&self, filter: &CategoryFilter) -> Vec<QuoteRecord> {
        self.lock()
            .await
            .records()
            .iter()
            .filter(|quote| filter.matches(quote))
            .cloned()
            .collect()
    }

    /// Pick a random quote matching `filter` and remember it as last viewed.
    pub async fn random_quote(&self, filter: &CategoryFilter) -> Option<QuoteRecord> {
        let mut state = self.lock().await;
        let candidates = state
            .records()
            .iter()
            .filter(|quote| filter.matches(quote))
            .collect::<Vec<_>>();
        let picked = candidates
            .choose(&mut rand::thread_rng())
            .map(|quote| (*quote).clone());

        if let Some(quote) = &picked {
            state.last_viewed = Some(quote.clone());
        }
        picked
    }

    /// Quote shown most recently in this process.
    pub async fn last_viewed(&self) -> Option<QuoteRecord> {
        self.lock().await.last_viewed.clone()
    }

    /// Conflicts from the latest committed sync that are still under review.
    pub async fn pending_conflicts(&self) -> Vec<Conflict> {
        self.lock()
            .await
            .session()
            .map(|session| session.conflicts().to_vec())
            .unwrap_or_default()
    }

    pub async fn keep_remote_for_all(&self) -> usize {
        let acknowledged = self.lock().await.keep_remote_for_all();
        tracing::info!("Kept remote version for {acknowledged} conflicts");
        acknowledged
    }

    pub async fn keep_local_for_all(&self) -> Result<usize> {
        let reverted = self.lock().await.keep_local_for_all()?;
        tracing::info!("Reverted {reverted} quotes to their local version");
        Ok(reverted)
    }
}
