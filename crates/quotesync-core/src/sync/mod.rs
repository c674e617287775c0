//! Sync orchestration and conflict review.

mod orchestrator;
mod session;

pub use orchestrator::{AddReport, PushStatus, SyncOrchestrator, SyncOutcome, SyncSummary};
pub use session::ConflictSession;
