use serde::Deserialize;

use super::model::{NewTaskDocument, Priority, SearchableTitle, TaskPatch};

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: i64,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<i64>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

// Checks the trimmed title is present and not too long
pub fn validate_title(title: &str) -> Result<(), String> {
    let title = title.trim();

    if title.is_empty() {
        return Err("Title is required".to_string());
    }

    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(format!("Title must be less than {MAX_TITLE_CHARS} characters"));
    }

    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), String> {
    if description.trim().chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(format!(
            "Description must be less than {MAX_DESCRIPTION_CHARS} characters"
        ));
    }

    Ok(())
}

impl CreateTask {
    pub fn into_document(self) -> Result<NewTaskDocument, String> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;

        Ok(NewTaskDocument {
            title: SearchableTitle::new(&self.title),
            description: self.description.trim().to_string(),
            due_date: self.due_date,
            priority: self.priority,
        })
    }
}

impl UpdateTask {
    pub fn into_patch(self) -> Result<TaskPatch, String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }

        Ok(TaskPatch {
            title: self.title.as_deref().map(SearchableTitle::new),
            description: self.description.map(|d| d.trim().to_string()),
            due_date: self.due_date,
            priority: self.priority,
            completed: self.completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str) -> CreateTask {
        CreateTask {
            title: title.into(),
            description: "  from the corner shop ".into(),
            due_date: 1_700_000_000_000,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn create_trims_and_derives_search_fields() {
        let doc = create("  Buy milk  ").into_document().unwrap();
        assert_eq!(doc.title.display, "Buy milk");
        assert_eq!(doc.title.lowercase, "buy milk");
        assert_eq!(doc.description, "from the corner shop");
        assert_eq!(doc.priority, Priority::Medium);
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(
            create("   ").into_document().unwrap_err(),
            "Title is required"
        );
    }

    #[test]
    fn long_title_is_rejected() {
        let title = "x".repeat(MAX_TITLE_CHARS + 1);
        assert!(create(&title).into_document().is_err());
        assert!(create(&"x".repeat(MAX_TITLE_CHARS)).into_document().is_ok());
    }

    #[test]
    fn long_description_is_rejected() {
        let update = UpdateTask {
            description: Some("d".repeat(MAX_DESCRIPTION_CHARS + 1)),
            ..Default::default()
        };
        assert!(update.into_patch().is_err());
    }

    #[test]
    fn update_recomputes_title_fields() {
        let patch = UpdateTask {
            title: Some("New Title".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();

        let title = patch.title.unwrap();
        assert_eq!(title.lowercase, "new title");
        assert_eq!(title.words, vec!["new", "title"]);
        assert_eq!(patch.description, None);
    }

    #[test]
    fn create_body_defaults_priority() {
        let body: CreateTask =
            serde_json::from_str(r#"{"title":"Call mum","dueDate":1700000000000}"#).unwrap();
        assert_eq!(body.priority, Priority::Normal);
        assert_eq!(body.description, "");
    }
}
