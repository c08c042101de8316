//! Status snapshot types.
//!
//! A snapshot is written as a single JSON document by the automation agent
//! and served back unchanged to the dashboard. Field names are camelCase on
//! the wire. Enum-like fields accept any string: known values map onto named
//! variants and anything else is carried through as `Other` so that a value
//! the dashboard doesn't know about still round-trips byte-for-byte. Keys the
//! dashboard doesn't model are kept in each object's `extra` map and written
//! back out unchanged.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrStatus {
    Open,
    Merged,
    Closed,
    /// Any value outside the known set, kept verbatim.
    Other(String),
}

impl PrStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for PrStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "open" => Self::Open,
            "merged" => Self::Merged,
            "closed" => Self::Closed,
            _ => Self::Other(s),
        }
    }
}

impl From<PrStatus> for String {
    fn from(status: PrStatus) -> Self {
        match status {
            PrStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kanban column a task belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "todo" => Self::Todo,
            "in-progress" => Self::InProgress,
            "done" => Self::Done,
            _ => Self::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Other(s),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pull request opened by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRecord {
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub status: PrStatus,
    pub created_at: String,
    /// Keys not modelled above, passed through as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A unit of work shown on the kanban board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Keys not modelled above, passed through as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    pub repos_documented: u64,
    pub total_repos: u64,
    pub thought_leaders: Vec<String>,
    pub insights_extracted: u64,
    /// Keys not modelled above, passed through as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkStats {
    pub lines_fixed: u64,
    pub issues_found: u64,
    pub prs_created: u64,
    /// Keys not modelled above, passed through as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The full payload served by `/api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// ISO-8601 timestamp, passed through as written.
    pub last_updated: String,
    pub prs: Vec<PullRequestRecord>,
    pub tasks: Vec<TaskRecord>,
    pub learning: LearningProgress,
    pub stats: WorkStats,
    /// Keys not modelled above, passed through as written.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Format a timestamp the way the dashboard expects (`2026-01-28T06:15:00.000Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn open_pr(repo: &str, number: u64, title: &str, created_at: &str) -> PullRequestRecord {
    PullRequestRecord {
        repo: repo.to_string(),
        number,
        title: title.to_string(),
        url: format!("https://github.com/doravidan/{}/pull/{}", repo, number),
        status: PrStatus::Open,
        created_at: created_at.to_string(),
        extra: Map::new(),
    }
}

fn task(id: &str, title: &str, status: TaskStatus, category: &str) -> TaskRecord {
    TaskRecord {
        id: id.to_string(),
        title: title.to_string(),
        status,
        category: category.to_string(),
        priority: None,
        created_at: None,
        extra: Map::new(),
    }
}

/// The built-in example dataset, served until the agent has written a real
/// snapshot. Only `last_updated` depends on `now`.
pub fn builtin_snapshot(now: DateTime<Utc>) -> StatusSnapshot {
    StatusSnapshot {
        last_updated: format_timestamp(now),
        prs: vec![
            open_pr(
                "new-das-app",
                1,
                "chore: remove dead code from marketDataService",
                "2026-01-27T22:13:57Z",
            ),
            open_pr(
                "new-das-app",
                2,
                "Fix test environment: switch from jsdom to happy-dom",
                "2026-01-27T22:28:33Z",
            ),
            open_pr(
                "new-das-app",
                3,
                "fix: Use GTC TIF for premarket/postmarket orders",
                "2026-01-27T22:31:00Z",
            ),
            open_pr(
                "wheel2go",
                1,
                "feat(api): Implement toll notifications and S3 upload",
                "2026-01-27T22:09:40Z",
            ),
            open_pr(
                "wheel2go",
                2,
                "feat(api): Implement password reset email notification",
                "2026-01-27T22:12:27Z",
            ),
            open_pr(
                "wheel2go",
                3,
                "fix: resolve TypeScript errors in UI and admin packages",
                "2026-01-27T22:35:22Z",
            ),
            open_pr(
                "dreamtales-ai-stories",
                1,
                "fix: resolve all ESLint errors",
                "2026-01-28T06:15:00Z",
            ),
            open_pr(
                "clipcraft-ai",
                1,
                "fix: exclude ios/ from ESLint",
                "2026-01-28T06:18:00Z",
            ),
            open_pr(
                "style-my-look",
                1,
                "fix: exclude ios/ and scripts/ from ESLint",
                "2026-01-28T06:20:00Z",
            ),
        ],
        tasks: vec![
            task("1", "Continue codebase learning", TaskStatus::Done, "Learning"),
            task("2", "Thought leader research", TaskStatus::Done, "Learning"),
            task("3", "App store growth research", TaskStatus::Done, "Research"),
            task("4", "Fix lint issues across repos", TaskStatus::Done, "Code Quality"),
            task("5", "Review Greg Isenberg content", TaskStatus::Todo, "Learning"),
            task("6", "Deep dive Starter Story cases", TaskStatus::Todo, "Learning"),
            task("7", "Voice transcription setup", TaskStatus::Done, "Tools"),
        ],
        learning: LearningProgress {
            repos_documented: 30,
            total_repos: 36,
            thought_leaders: vec![
                "Alex Finn".to_string(),
                "Greg Isenberg".to_string(),
                "Ryan Carson".to_string(),
                "Starter Story".to_string(),
            ],
            insights_extracted: 47,
            extra: Map::new(),
        },
        stats: WorkStats {
            lines_fixed: 150,
            issues_found: 21,
            prs_created: 9,
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_known_statuses_map_to_variants() {
        assert_eq!(PrStatus::from("merged".to_string()), PrStatus::Merged);
        assert_eq!(
            TaskStatus::from("in-progress".to_string()),
            TaskStatus::InProgress
        );
        assert_eq!(Priority::from("high".to_string()), Priority::High);
    }

    #[test]
    fn test_unknown_status_is_preserved_verbatim() {
        let status: TaskStatus = serde_json::from_value(json!("blocked")).unwrap();
        assert_eq!(status, TaskStatus::Other("blocked".to_string()));
        assert!(!status.is_known());
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("blocked"));
    }

    #[test]
    fn test_status_matching_is_case_sensitive() {
        let status = PrStatus::from("Open".to_string());
        assert_eq!(status, PrStatus::Other("Open".to_string()));
    }

    #[test]
    fn test_task_optional_fields_omitted_when_absent() {
        let t = task("9", "Ship it", TaskStatus::Todo, "Feature");
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "9",
                "title": "Ship it",
                "status": "todo",
                "category": "Feature"
            })
        );
    }

    #[test]
    fn test_snapshot_uses_camel_case_fields() {
        let snapshot = builtin_snapshot(Utc::now());
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value.get("lastUpdated").is_some());
        assert_eq!(value["learning"]["reposDocumented"], json!(30));
        assert_eq!(value["stats"]["prsCreated"], json!(9));
        assert_eq!(value["prs"][0]["createdAt"], json!("2026-01-27T22:13:57Z"));
    }

    #[test]
    fn test_negative_count_is_a_parse_failure() {
        let mut value = serde_json::to_value(builtin_snapshot(Utc::now())).unwrap();
        value["stats"]["linesFixed"] = json!(-1);
        assert!(serde_json::from_value::<StatusSnapshot>(value).is_err());
    }

    #[test]
    fn test_unmodelled_keys_are_preserved() {
        let mut value = serde_json::to_value(builtin_snapshot(Utc::now())).unwrap();
        value["agent"] = json!({ "name": "clawd", "mood": "busy" });
        value["prs"][0]["reviewers"] = json!(["octocat"]);
        value["tasks"][0]["notes"] = json!("see thread");
        value["learning"]["currentRepo"] = json!("wheel2go");
        value["stats"]["testsAdded"] = json!(12);

        let snapshot: StatusSnapshot = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(snapshot.prs[0].extra["reviewers"], json!(["octocat"]));
        assert_eq!(snapshot.stats.extra["testsAdded"], json!(12));
        assert!(snapshot.prs[1].extra.is_empty());
        assert_eq!(serde_json::to_value(&snapshot).unwrap(), value);
    }

    #[test]
    fn test_builtin_snapshot_contents() {
        let snapshot = builtin_snapshot(Utc::now());
        assert_eq!(snapshot.prs.len(), 9);
        assert_eq!(snapshot.tasks.len(), 7);
        assert!(snapshot.prs.iter().all(|pr| pr.status == PrStatus::Open));
        assert_eq!(
            snapshot.prs[3].url,
            "https://github.com/doravidan/wheel2go/pull/1"
        );
        assert_eq!(snapshot.learning.thought_leaders.len(), 4);
    }

    #[test]
    fn test_builtin_snapshot_only_timestamp_varies() {
        let earlier = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 6, 1, 12, 30, 0).unwrap();
        let a = builtin_snapshot(earlier);
        let b = builtin_snapshot(later);
        assert_eq!(a.last_updated, "2026-01-01T00:00:00.000Z");
        assert_eq!(b.last_updated, "2026-06-01T12:30:00.000Z");
        assert_eq!(a.prs, b.prs);
        assert_eq!(a.tasks, b.tasks);
        assert_eq!(a.learning, b.learning);
        assert_eq!(a.stats, b.stats);
    }
}
