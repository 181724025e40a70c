//! Selection of the single read predicate a list request runs with.
//!
//! Search and priority filtering are mutually exclusive: a non-empty search
//! query wins and any priority selector is ignored. Callers that need both
//! have to filter the returned list themselves.

use serde::Deserialize;

use super::model::Priority;

/// Upper bound appended to a search prefix so a range scan matches every
/// title starting with it.
pub const PREFIX_SENTINEL: char = '\u{f8ff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    All,
    Urgent,
    Medium,
    Normal,
}

impl PriorityFilter {
    pub fn level(self) -> Option<Priority> {
        match self {
            PriorityFilter::All => None,
            PriorityFilter::Urgent => Some(Priority::Urgent),
            PriorityFilter::Medium => Some(Priority::Medium),
            PriorityFilter::Normal => Some(Priority::Normal),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub priority: Option<PriorityFilter>,
    pub search_query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskQuery {
    /// `start <= title_lower < end`
    TitlePrefix { start: String, end: String },
    PriorityEquals(Priority),
    /// Every task, most recently created first.
    NewestFirst,
}

pub fn build_query(filters: &FilterParams) -> TaskQuery {
    let search = filters
        .search_query
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    if let Some(start) = search {
        let mut end = start.clone();
        end.push(PREFIX_SENTINEL);
        return TaskQuery::TitlePrefix { start, end };
    }

    match filters.priority.and_then(PriorityFilter::level) {
        Some(priority) => TaskQuery::PriorityEquals(priority),
        None => TaskQuery::NewestFirst,
    }
}
