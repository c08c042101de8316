pub mod board;
pub mod gate;
pub mod provider;
pub mod snapshot;
pub mod validate;

pub use board::{categories, DashboardSummary, KanbanBoard};
pub use gate::{cookie_value, GateDecision, RequestGate, API_PREFIX, AUTH_COOKIE, LOGIN_PATH};
pub use provider::{fallback, resolve_base_dir, LoadFailure, StatusProvider, SNAPSHOT_FILE_NAME};
pub use snapshot::{
    builtin_snapshot, LearningProgress, Priority, PrStatus, PullRequestRecord, StatusSnapshot,
    TaskRecord, TaskStatus, WorkStats,
};
pub use validate::{validate, SnapshotIssue};

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub fn get_version() -> String {
    // First check for a git hash injected by the packaging environment
    if let Some(git_hash) = option_env!("EDEN_GIT_HASH") {
        short_hash(git_hash)
    } else if let Some(git_hash) = built_info::GIT_COMMIT_HASH {
        // Fall back to built crate's git detection (for cargo builds)
        short_hash(git_hash)
    } else {
        built_info::PKG_VERSION.to_string()
    }
}

fn short_hash(hash: &str) -> String {
    hash.chars().take(8).collect()
}
