//! HTTP handlers for the dashboard page.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use eden_core::{categories, DashboardSummary, KanbanBoard, StatusSnapshot};

use crate::status::load_snapshot;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Show only tasks in this category on the board.
    pub category: Option<String>,
}

/// Everything the page script needs, computed from one snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub snapshot: StatusSnapshot,
    pub summary: DashboardSummary,
    pub board: KanbanBoard,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
}

impl DashboardView {
    pub fn new(snapshot: StatusSnapshot, category: Option<String>) -> Self {
        // An empty ?category= means no filter
        let selected_category = category.filter(|c| !c.is_empty());
        let summary = DashboardSummary::from_snapshot(&snapshot);
        let board = KanbanBoard::build(&snapshot.tasks, selected_category.as_deref());
        let categories = categories(&snapshot.tasks);
        Self {
            snapshot,
            summary,
            board,
            categories,
            selected_category,
        }
    }
}

/// Serialize for embedding inside a `<script>` block.
///
/// `<`, `>` and `&` only occur inside JSON strings, where the `\u` escapes
/// are equivalent, so the payload can't close the script element.
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

pub fn generate_dashboard_html(view: &DashboardView) -> String {
    const DASHBOARD_HTML_TEMPLATE: &str = include_str!("dashboard.html");

    let timestamp = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();

    DASHBOARD_HTML_TEMPLATE
        .replace("{version}", &eden_core::get_version())
        .replace("{timestamp}", &timestamp)
        .replace("{view_json}", &script_json(view))
}

/// Handler: GET /
pub async fn get_dashboard_html(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let snapshot = load_snapshot(&state).await;
    let view = DashboardView::new(snapshot, query.category);
    Html(generate_dashboard_html(&view))
}
