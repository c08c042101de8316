//! Loads the status snapshot from disk.
//!
//! Loading is split in two steps: [`StatusProvider::load`] makes a single
//! read attempt and reports why it failed, and [`fallback`] turns any
//! failure into the built-in snapshot. [`StatusProvider::snapshot`] runs
//! both and never fails.

use chrono::{DateTime, Utc};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::snapshot::{builtin_snapshot, StatusSnapshot};
use crate::validate::validate;

/// File name of the snapshot inside the base directory.
pub const SNAPSHOT_FILE_NAME: &str = "status.json";

/// Base directory name under the home directory when no override is set.
pub const DEFAULT_DIR_NAME: &str = "clawd";

/// Pick the snapshot base directory.
///
/// A non-empty override wins. Otherwise `<home>/clawd`, or a relative
/// `clawd` when the home directory is unknown.
pub fn resolve_base_dir(env_override: Option<String>, home: Option<PathBuf>) -> PathBuf {
    match env_override.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home
            .map(|home| home.join(DEFAULT_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_NAME)),
    }
}

/// Why a snapshot could not be loaded from disk.
#[derive(Debug)]
pub enum LoadFailure {
    /// No file at the configured location.
    Missing { path: PathBuf },
    /// The file exists but could not be read.
    Unreadable { path: PathBuf, source: io::Error },
    /// The file was read but isn't a valid snapshot.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LoadFailure {
    pub fn path(&self) -> &Path {
        match self {
            Self::Missing { path } | Self::Unreadable { path, .. } | Self::Malformed { path, .. } => {
                path
            }
        }
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { path } => write!(f, "no snapshot at {}", path.display()),
            Self::Unreadable { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::Malformed { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LoadFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Missing { .. } => None,
            Self::Unreadable { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
        }
    }
}

/// Choose the snapshot to serve when loading failed.
///
/// Every failure kind gets the same answer: the built-in snapshot stamped
/// with `now`.
pub fn fallback(_failure: &LoadFailure, now: DateTime<Utc>) -> StatusSnapshot {
    builtin_snapshot(now)
}

/// Reads the snapshot file written by the automation agent.
#[derive(Debug, Clone)]
pub struct StatusProvider {
    path: PathBuf,
}

impl StatusProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Provider for `<base_dir>/status.json`.
    pub fn from_base_dir(base_dir: impl AsRef<Path>) -> Self {
        Self::new(base_dir.as_ref().join(SNAPSHOT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make one attempt to read and parse the snapshot file.
    pub fn load(&self) -> Result<StatusSnapshot, LoadFailure> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LoadFailure::Missing {
                    path: self.path.clone(),
                })
            }
            Err(source) => {
                return Err(LoadFailure::Unreadable {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| LoadFailure::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// The snapshot to serve right now. Never fails.
    pub fn snapshot(&self) -> StatusSnapshot {
        self.snapshot_at(Utc::now())
    }

    /// As [`snapshot`](Self::snapshot), with the fallback stamped at `now`.
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> StatusSnapshot {
        match self.load() {
            Ok(snapshot) => {
                for issue in validate(&snapshot) {
                    warn!("Snapshot {}: {}", self.path.display(), issue);
                }
                snapshot
            }
            Err(failure) => {
                match &failure {
                    LoadFailure::Missing { .. } => {
                        debug!("{}, serving built-in snapshot", failure)
                    }
                    _ => warn!("{}, serving built-in snapshot", failure),
                }
                fallback(&failure, now)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Priority, PrStatus, TaskStatus};
    use serde_json::json;

    fn write_snapshot(dir: &Path, value: &serde_json::Value) {
        fs::write(
            dir.join(SNAPSHOT_FILE_NAME),
            serde_json::to_vec_pretty(value).unwrap(),
        )
        .unwrap();
    }

    fn custom_snapshot_json() -> serde_json::Value {
        json!({
            "lastUpdated": "2026-02-01T09:00:00Z",
            "prs": [{
                "repo": "eden",
                "number": 42,
                "title": "feat: kanban board",
                "url": "https://github.com/doravidan/eden/pull/42",
                "status": "merged",
                "createdAt": "2026-01-31T18:00:00Z"
            }],
            "tasks": [{
                "id": "t-1",
                "title": "Write release notes",
                "status": "in-progress",
                "category": "Docs",
                "priority": "high"
            }],
            "learning": {
                "reposDocumented": 1,
                "totalRepos": 2,
                "thoughtLeaders": [],
                "insightsExtracted": 0
            },
            "stats": { "linesFixed": 3, "issuesFound": 2, "prsCreated": 1 }
        })
    }

    #[test]
    fn test_resolve_base_dir_prefers_override() {
        assert_eq!(
            resolve_base_dir(Some("/srv/eden".to_string()), Some(PathBuf::from("/home/me"))),
            PathBuf::from("/srv/eden")
        );
    }

    #[test]
    fn test_resolve_base_dir_defaults_under_home() {
        assert_eq!(
            resolve_base_dir(None, Some(PathBuf::from("/home/me"))),
            PathBuf::from("/home/me/clawd")
        );
        assert_eq!(
            resolve_base_dir(Some(String::new()), Some(PathBuf::from("/home/me"))),
            PathBuf::from("/home/me/clawd")
        );
        assert_eq!(resolve_base_dir(None, None), PathBuf::from("clawd"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StatusProvider::from_base_dir(dir.path());
        let failure = provider.load().unwrap_err();
        assert!(matches!(failure, LoadFailure::Missing { .. }));
        assert_eq!(failure.path(), dir.path().join(SNAPSHOT_FILE_NAME));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SNAPSHOT_FILE_NAME), "{ not json").unwrap();
        let provider = StatusProvider::from_base_dir(dir.path());
        assert!(matches!(
            provider.load().unwrap_err(),
            LoadFailure::Malformed { .. }
        ));
    }

    #[test]
    fn test_load_wrong_shape_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path(), &json!({ "prs": "nope" }));
        let provider = StatusProvider::from_base_dir(dir.path());
        assert!(matches!(
            provider.load().unwrap_err(),
            LoadFailure::Malformed { .. }
        ));
    }

    #[test]
    fn test_load_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(SNAPSHOT_FILE_NAME)).unwrap();
        let provider = StatusProvider::from_base_dir(dir.path());
        assert!(matches!(
            provider.load().unwrap_err(),
            LoadFailure::Unreadable { .. }
        ));
    }

    #[test]
    fn test_fallback_ignores_failure_kind() {
        let now = Utc::now();
        let missing = LoadFailure::Missing {
            path: PathBuf::from("status.json"),
        };
        let malformed = LoadFailure::Malformed {
            path: PathBuf::from("status.json"),
            source: serde_json::from_str::<StatusSnapshot>("[").unwrap_err(),
        };
        assert_eq!(fallback(&missing, now), builtin_snapshot(now));
        assert_eq!(fallback(&malformed, now), builtin_snapshot(now));
    }

    #[test]
    fn test_snapshot_without_file_is_builtin_with_fresh_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StatusProvider::from_base_dir(dir.path());

        let before = Utc::now();
        let snapshot = provider.snapshot();
        let stamped = DateTime::parse_from_rfc3339(&snapshot.last_updated)
            .unwrap()
            .with_timezone(&Utc);

        assert!((stamped - before).num_seconds().abs() <= 5);
        let mut expected = builtin_snapshot(before);
        expected.last_updated = snapshot.last_updated.clone();
        assert_eq!(snapshot, expected);
    }

    #[test]
    fn test_snapshot_with_malformed_file_matches_missing_case() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SNAPSHOT_FILE_NAME), b"\xff\xfe garbage").unwrap();
        let provider = StatusProvider::from_base_dir(dir.path());
        let now = Utc::now();
        assert_eq!(provider.snapshot_at(now), builtin_snapshot(now));
    }

    #[test]
    fn test_snapshot_serves_file_contents_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path(), &custom_snapshot_json());
        let provider = StatusProvider::from_base_dir(dir.path());

        let snapshot = provider.snapshot();
        assert_eq!(snapshot.last_updated, "2026-02-01T09:00:00Z");
        assert_eq!(snapshot.prs.len(), 1);
        assert_eq!(snapshot.prs[0].status, PrStatus::Merged);
        assert_eq!(snapshot.prs[0].number, 42);
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].status, TaskStatus::InProgress);
        assert_eq!(snapshot.tasks[0].priority, Some(Priority::High));
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            custom_snapshot_json()
        );
    }

    #[test]
    fn test_snapshot_passes_through_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut value = custom_snapshot_json();
        value["tasks"][0]["status"] = json!("blocked");
        value["learning"]["reposDocumented"] = json!(9);
        write_snapshot(dir.path(), &value);

        let snapshot = StatusProvider::from_base_dir(dir.path()).snapshot();
        assert_eq!(snapshot.tasks[0].status, TaskStatus::Other("blocked".to_string()));
        assert_eq!(snapshot.learning.repos_documented, 9);
        assert_eq!(serde_json::to_value(&snapshot).unwrap(), value);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let original = builtin_snapshot(Utc::now());
        write_snapshot(dir.path(), &serde_json::to_value(&original).unwrap());

        let loaded = StatusProvider::from_base_dir(dir.path()).load().unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_each_call_rereads_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StatusProvider::from_base_dir(dir.path());
        let now = Utc::now();
        assert_eq!(provider.snapshot_at(now), builtin_snapshot(now));

        write_snapshot(dir.path(), &custom_snapshot_json());
        assert_eq!(provider.snapshot_at(now).prs.len(), 1);
    }
}
