//! Conversion of loosely-typed stored values into canonical task fields.
//!
//! Every function here is total: unrecognised input falls back to a default
//! (current time, `Priority::Normal`, empty text) instead of failing.

use chrono::Utc;

use super::model::{Priority, RawTimestamp, Task, TaskDocument};

/// Milliseconds since the epoch for any stored timestamp shape. Absent or
/// unrepresentable values resolve to the current time.
pub fn normalize_timestamp(raw: Option<&RawTimestamp>) -> i64 {
    let millis = match raw {
        Some(RawTimestamp::Millis(ms)) => Some(*ms),
        Some(RawTimestamp::Native(at)) => Some(at.timestamp_millis()),
        Some(RawTimestamp::Parts {
            seconds,
            nanoseconds,
        }) => seconds
            .checked_mul(1000)
            .and_then(|ms| ms.checked_add(nanoseconds / 1_000_000)),
        None => None,
    };

    millis.unwrap_or_else(|| {
        tracing::debug!(?raw, "timestamp missing or malformed, using current time");
        Utc::now().timestamp_millis()
    })
}

pub fn normalize_priority(raw: Option<&str>) -> Priority {
    let Some(raw) = raw else {
        return Priority::Normal;
    };

    match raw.trim().to_lowercase().as_str() {
        "urgent" | "high" => Priority::Urgent,
        "medium" | "med" => Priority::Medium,
        "normal" | "low" => Priority::Normal,
        other => {
            tracing::debug!(priority = other, "unrecognised priority, defaulting to normal");
            Priority::Normal
        }
    }
}

pub fn normalize_document(doc: TaskDocument) -> Task {
    Task {
        id: doc.id,
        title: doc.title.unwrap_or_default(),
        description: doc.description.unwrap_or_default(),
        due_date: normalize_timestamp(doc.due_date.as_ref()),
        priority: normalize_priority(doc.priority.as_deref()),
        completed: doc.completed.unwrap_or(false),
        created_at: normalize_timestamp(doc.created_at.as_ref()),
        updated_at: normalize_timestamp(doc.updated_at.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use uuid::Uuid;

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    #[rstest]
    #[case("urgent", Priority::Urgent)]
    #[case("HIGH", Priority::Urgent)]
    #[case("  Urgent ", Priority::Urgent)]
    #[case("medium", Priority::Medium)]
    #[case(" Med", Priority::Medium)]
    #[case("MEDIUM\t", Priority::Medium)]
    #[case("normal", Priority::Normal)]
    #[case("Low ", Priority::Normal)]
    #[case("meduim", Priority::Normal)]
    #[case("", Priority::Normal)]
    #[case("critical", Priority::Normal)]
    fn priority_maps_to_canonical(#[case] raw: &str, #[case] expected: Priority) {
        assert_eq!(normalize_priority(Some(raw)), expected);
    }

    #[test]
    fn absent_priority_is_normal() {
        assert_eq!(normalize_priority(None), Priority::Normal);
    }

    #[rstest]
    #[case(0)]
    #[case(1_700_000_000_123)]
    #[case(-86_400_000)]
    fn numeric_timestamp_passes_through(#[case] ms: i64) {
        assert_eq!(normalize_timestamp(Some(&RawTimestamp::Millis(ms))), ms);
    }

    #[test]
    fn native_timestamp_uses_millis() {
        let at = Utc.timestamp_millis_opt(1_650_000_000_456).unwrap();
        assert_eq!(
            normalize_timestamp(Some(&RawTimestamp::Native(at))),
            1_650_000_000_456
        );
    }

    #[test]
    fn second_parts_are_combined() {
        let raw = RawTimestamp::Parts {
            seconds: 1_650_000_000,
            nanoseconds: 456_789_000,
        };
        assert_eq!(normalize_timestamp(Some(&raw)), 1_650_000_000_456);
    }

    #[test]
    fn missing_timestamp_is_now() {
        let before = now_ms();
        let got = normalize_timestamp(None);
        let after = now_ms();
        assert!(got >= before && got <= after);
    }

    #[test]
    fn overflowing_parts_fall_back_to_now() {
        let before = now_ms();
        let got = normalize_timestamp(Some(&RawTimestamp::Parts {
            seconds: i64::MAX,
            nanoseconds: 0,
        }));
        assert!(got >= before && got - before < 5_000);
    }

    #[test]
    fn sparse_document_gets_defaults() {
        let id = Uuid::new_v4();
        let before = now_ms();
        let task = normalize_document(TaskDocument {
            id,
            priority: Some("High".into()),
            ..Default::default()
        });

        assert_eq!(task.id, id);
        assert_eq!(task.title, "");
        assert_eq!(task.description, "");
        assert_eq!(task.priority, Priority::Urgent);
        assert!(!task.completed);
        assert!(task.due_date >= before);
        assert!(task.created_at >= before);
    }
}
