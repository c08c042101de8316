//! The HTML dashboard.
//!
//! One page renders the current snapshot as summary cards, a PR table, a
//! kanban board of tasks, and learning progress. The view model is computed
//! server-side and embedded as JSON; the page script only lays it out.

pub mod handlers;
