use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::normalize::normalize_priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    #[default]
    Normal,
    Medium,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Medium => "medium",
            Priority::Urgent => "urgent",
        }
    }
}

// Request bodies go through the same lenient mapping as stored documents.
impl From<String> for Priority {
    fn from(raw: String) -> Self {
        normalize_priority(Some(raw.as_str()))
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical task as handed to callers. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: i64,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Timestamp shapes a stored document may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTimestamp {
    Millis(i64),
    Native(DateTime<Utc>),
    Parts { seconds: i64, nanoseconds: i64 },
}

impl RawTimestamp {
    /// Reads a timestamp out of a loosely-typed JSON value. Unrecognised shapes
    /// yield `None` and are later treated as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| is_integral_millis(*f)).map(|f| f as i64))
                .map(RawTimestamp::Millis),
            Value::Object(map) => {
                let seconds = map
                    .get("seconds")
                    .or_else(|| map.get("_seconds"))
                    .and_then(Value::as_i64)?;
                let nanoseconds = map
                    .get("nanoseconds")
                    .or_else(|| map.get("_nanoseconds"))
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                Some(RawTimestamp::Parts { seconds, nanoseconds })
            }
            _ => None,
        }
    }
}

// `as` saturates, so out-of-range floats must be rejected before the cast.
fn is_integral_millis(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// A task exactly as the store returned it, before normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDocument {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<RawTimestamp>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    pub created_at: Option<RawTimestamp>,
    pub updated_at: Option<RawTimestamp>,
}

/// Display title plus the lowercase fields prefix search runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableTitle {
    pub display: String,
    pub lowercase: String,
    pub words: Vec<String>,
}

impl SearchableTitle {
    pub fn new(title: &str) -> Self {
        let display = title.trim().to_string();
        let lowercase = display.to_lowercase();
        let words = lowercase.split_whitespace().map(str::to_string).collect();

        Self {
            display,
            lowercase,
            words,
        }
    }
}

/// Fields written on create. Timestamps come from the store clock.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskDocument {
    pub title: SearchableTitle,
    pub description: String,
    pub due_date: i64,
    pub priority: Priority,
}

/// Partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskPatch {
    pub title: Option<SearchableTitle>,
    pub description: Option<String>,
    pub due_date: Option<i64>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}
