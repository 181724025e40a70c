//! Demo tasks inserted at startup when `SEED_DEMO_TASKS` is enabled.

use chrono::Utc;

use crate::routes::tasks::model::{NewTaskDocument, Priority, SearchableTitle};
use crate::routes::tasks::{StoreError, TaskQuery, TaskStore};

const DAY_MS: i64 = 86_400_000;

const DEMO_TASKS: &[(&str, &str, i64, Priority)] = &[
    (
        "Complete project documentation",
        "Write setup instructions and an architecture overview.",
        2,
        Priority::Urgent,
    ),
    (
        "Review pull requests",
        "Go through open PRs and leave feedback on the changes.",
        1,
        Priority::Medium,
    ),
    (
        "Update dependencies",
        "Check for outdated packages and move to the latest stable versions.",
        7,
        Priority::Normal,
    ),
    (
        "Plan sprint review meeting",
        "Schedule the review and prepare an agenda.",
        4,
        Priority::Urgent,
    ),
    (
        "Fix navigation bug",
        "Investigate the back button issue on Android devices.",
        5,
        Priority::Medium,
    ),
    (
        "Onboard new team member",
        "Prepare onboarding material and intro sessions.",
        14,
        Priority::Normal,
    ),
];

/// Inserts the demo set into an empty store and returns how many tasks were
/// written. A store that already holds tasks is left alone, so restarting
/// against a persistent database does not duplicate the set.
pub async fn seed_demo_tasks(store: &dyn TaskStore) -> Result<usize, StoreError> {
    let existing = store.fetch(&TaskQuery::NewestFirst).await?.len();
    if existing > 0 {
        tracing::info!(existing, "store already has tasks, skipping demo seed");
        return Ok(0);
    }

    let now = Utc::now().timestamp_millis();

    for (title, description, days_out, priority) in DEMO_TASKS {
        let id = store
            .insert(NewTaskDocument {
                title: SearchableTitle::new(title),
                description: description.to_string(),
                due_date: now + days_out * DAY_MS,
                priority: *priority,
            })
            .await?;
        tracing::debug!(%id, title, "seeded demo task");
    }

    tracing::info!(count = DEMO_TASKS.len(), "demo tasks seeded");
    Ok(DEMO_TASKS.len())
}
