//! Advisory checks over a parsed snapshot.
//!
//! Snapshots are served as written even when these checks fail; the issues
//! are only reported (server log, `eden check`).

use chrono::DateTime;
use std::collections::HashSet;
use std::fmt;

use crate::snapshot::StatusSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotIssue {
    /// `learning.totalRepos` is zero.
    ZeroTotalRepos,
    /// `learning.reposDocumented` is larger than `learning.totalRepos`.
    DocumentedExceedsTotal { documented: u64, total: u64 },
    /// A PR record has number 0.
    ZeroPrNumber { repo: String },
    /// Two PR records share a repo and number.
    DuplicatePr { repo: String, number: u64 },
    /// Two tasks share an id.
    DuplicateTaskId { id: String },
    UnknownPrStatus { repo: String, number: u64, value: String },
    UnknownTaskStatus { id: String, value: String },
    UnknownPriority { id: String, value: String },
    /// A timestamp field isn't valid RFC 3339.
    BadTimestamp { field: String, value: String },
}

impl fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTotalRepos => write!(f, "learning.totalRepos is 0"),
            Self::DocumentedExceedsTotal { documented, total } => write!(
                f,
                "learning.reposDocumented ({}) exceeds learning.totalRepos ({})",
                documented, total
            ),
            Self::ZeroPrNumber { repo } => write!(f, "PR in {} has number 0", repo),
            Self::DuplicatePr { repo, number } => {
                write!(f, "duplicate PR {}#{}", repo, number)
            }
            Self::DuplicateTaskId { id } => write!(f, "duplicate task id {:?}", id),
            Self::UnknownPrStatus {
                repo,
                number,
                value,
            } => write!(f, "PR {}#{} has unknown status {:?}", repo, number, value),
            Self::UnknownTaskStatus { id, value } => {
                write!(f, "task {:?} has unknown status {:?}", id, value)
            }
            Self::UnknownPriority { id, value } => {
                write!(f, "task {:?} has unknown priority {:?}", id, value)
            }
            Self::BadTimestamp { field, value } => {
                write!(f, "{} is not an RFC 3339 timestamp: {:?}", field, value)
            }
        }
    }
}

fn check_timestamp(field: String, value: &str, issues: &mut Vec<SnapshotIssue>) {
    if DateTime::parse_from_rfc3339(value).is_err() {
        issues.push(SnapshotIssue::BadTimestamp {
            field,
            value: value.to_string(),
        });
    }
}

/// Collect every issue in the snapshot, in document order.
pub fn validate(snapshot: &StatusSnapshot) -> Vec<SnapshotIssue> {
    let mut issues = Vec::new();

    check_timestamp(
        "lastUpdated".to_string(),
        &snapshot.last_updated,
        &mut issues,
    );

    let mut seen_prs = HashSet::new();
    for (i, pr) in snapshot.prs.iter().enumerate() {
        if pr.number == 0 {
            issues.push(SnapshotIssue::ZeroPrNumber {
                repo: pr.repo.clone(),
            });
        }
        if !seen_prs.insert((pr.repo.as_str(), pr.number)) {
            issues.push(SnapshotIssue::DuplicatePr {
                repo: pr.repo.clone(),
                number: pr.number,
            });
        }
        if !pr.status.is_known() {
            issues.push(SnapshotIssue::UnknownPrStatus {
                repo: pr.repo.clone(),
                number: pr.number,
                value: pr.status.to_string(),
            });
        }
        check_timestamp(format!("prs[{}].createdAt", i), &pr.created_at, &mut issues);
    }

    let mut seen_tasks = HashSet::new();
    for (i, task) in snapshot.tasks.iter().enumerate() {
        if !seen_tasks.insert(task.id.as_str()) {
            issues.push(SnapshotIssue::DuplicateTaskId {
                id: task.id.clone(),
            });
        }
        if !task.status.is_known() {
            issues.push(SnapshotIssue::UnknownTaskStatus {
                id: task.id.clone(),
                value: task.status.to_string(),
            });
        }
        if let Some(priority) = task.priority.as_ref().filter(|p| !p.is_known()) {
            issues.push(SnapshotIssue::UnknownPriority {
                id: task.id.clone(),
                value: priority.to_string(),
            });
        }
        if let Some(created_at) = &task.created_at {
            check_timestamp(format!("tasks[{}].createdAt", i), created_at, &mut issues);
        }
    }

    let learning = &snapshot.learning;
    if learning.total_repos == 0 {
        issues.push(SnapshotIssue::ZeroTotalRepos);
    }
    if learning.repos_documented > learning.total_repos {
        issues.push(SnapshotIssue::DocumentedExceedsTotal {
            documented: learning.repos_documented,
            total: learning.total_repos,
        });
    }

    issues
}
