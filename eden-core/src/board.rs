//! Dashboard view model: summary cards and the kanban board.

use serde::Serialize;

use crate::snapshot::{PrStatus, StatusSnapshot, TaskRecord, TaskStatus};

/// Distinct task categories in the order they first appear.
pub fn categories(tasks: &[TaskRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for task in tasks {
        if !seen.contains(&task.category) {
            seen.push(task.category.clone());
        }
    }
    seen
}

/// Tasks split into the three board columns, in source order.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanBoard {
    pub todo: Vec<TaskRecord>,
    pub in_progress: Vec<TaskRecord>,
    pub done: Vec<TaskRecord>,
}

impl KanbanBoard {
    /// Build the board, optionally keeping only one category.
    ///
    /// Tasks with a status outside the three columns are left off the board.
    pub fn build(tasks: &[TaskRecord], category: Option<&str>) -> Self {
        let mut board = Self::default();
        let selected = tasks
            .iter()
            .filter(|task| category.is_none_or(|c| task.category == c));
        for task in selected {
            let column = match task.status {
                TaskStatus::Todo => &mut board.todo,
                TaskStatus::InProgress => &mut board.in_progress,
                TaskStatus::Done => &mut board.done,
                TaskStatus::Other(_) => continue,
            };
            column.push(task.clone());
        }
        board
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts shown on the summary cards.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_prs: usize,
    pub open_prs: usize,
    pub merged_prs: usize,
    pub closed_prs: usize,
    pub total_tasks: usize,
    pub todo_tasks: usize,
    pub in_progress_tasks: usize,
    pub done_tasks: usize,
    /// reposDocumented / totalRepos as a whole percentage.
    pub learning_percent: u64,
}

impl DashboardSummary {
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        let mut summary = Self {
            total_prs: snapshot.prs.len(),
            total_tasks: snapshot.tasks.len(),
            learning_percent: learning_percent(
                snapshot.learning.repos_documented,
                snapshot.learning.total_repos,
            ),
            ..Default::default()
        };

        for pr in &snapshot.prs {
            match pr.status {
                PrStatus::Open => summary.open_prs += 1,
                PrStatus::Merged => summary.merged_prs += 1,
                PrStatus::Closed => summary.closed_prs += 1,
                PrStatus::Other(_) => {}
            }
        }

        for task in &snapshot.tasks {
            match task.status {
                TaskStatus::Todo => summary.todo_tasks += 1,
                TaskStatus::InProgress => summary.in_progress_tasks += 1,
                TaskStatus::Done => summary.done_tasks += 1,
                TaskStatus::Other(_) => {}
            }
        }

        summary
    }
}

/// Rounded percentage, half away from zero. Zero when `total` is zero.
///
/// Computed in `u128` so any pair of counts is accepted; a result above
/// `u64::MAX` (documented far beyond total) saturates.
pub fn learning_percent(documented: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let (documented, total) = (u128::from(documented), u128::from(total));
    let percent = (documented * 200 + total) / (total * 2);
    u64::try_from(percent).unwrap_or(u64::MAX)
}
