use crate::error::{NotifierError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Accessors for the parts of a raw Canvas course record the notifier reads
///
/// Fields are read lazily: the id only to request enrollments, the name only
/// once there is a section to head.
pub struct Course;

impl Course {
    /// `enrollment_term_id` of a raw course record, if it is an integer
    pub fn term_id(raw: &Value) -> Option<i64> {
        raw.get("enrollment_term_id").and_then(Value::as_i64)
    }

    /// Course id as used in the enrollments path, `None` when absent or null
    pub fn id(raw: &Value) -> Option<String> {
        raw.get("id").filter(|id| !id.is_null()).map(render)
    }

    pub fn name(raw: &Value) -> Result<String> {
        raw.get("name").map(render).ok_or_else(|| NotifierError::missing("name", "course"))
    }
}

/// One enrollment line: `User: <name>, Grades: <final grade>`
///
/// A null final grade (not yet posted) renders as `N/A`.
pub fn format_enrollment(detail: &Value) -> Result<String> {
    let user = detail.get("user").ok_or_else(|| NotifierError::missing("user", "enrollment"))?;
    let name = user.get("name").ok_or_else(|| NotifierError::missing("user.name", "enrollment"))?;
    let grades =
        detail.get("grades").ok_or_else(|| NotifierError::missing("grades", "enrollment"))?;
    let final_grade = grades
        .get("final_grade")
        .ok_or_else(|| NotifierError::missing("grades.final_grade", "enrollment"))?;

    let grade = match final_grade {
        Value::Null => "N/A".to_string(),
        other => render(other),
    };

    Ok(format!("User: {}, Grades: {}", render(name), grade))
}

// Strings without their JSON quotes, everything else as JSON
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Result of handing the message to the publisher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PublishStatus {
    Published { message_id: String },
    Failed { error: String },
}

/// Outcome of one notifier run
#[derive(Debug, Clone, Serialize)]
pub struct NotificationOutcome {
    pub message: String,
    pub courses_matched: usize,
    pub courses_skipped: usize,
    pub status: PublishStatus,
    pub timestamp: DateTime<Utc>,
}

impl NotificationOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self.status, PublishStatus::Published { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_enrollment() {
        let detail = json!({
            "user": {"name": "Ada Lovelace", "id": 9},
            "grades": {"final_grade": "A", "final_score": 97.5}
        });

        assert_eq!(format_enrollment(&detail).unwrap(), "User: Ada Lovelace, Grades: A");
    }

    #[test]
    fn test_numeric_and_null_grades() {
        let numeric = json!({"user": {"name": "Bo"}, "grades": {"final_grade": 88.5}});
        let pending = json!({"user": {"name": "Cy"}, "grades": {"final_grade": null}});

        assert_eq!(format_enrollment(&numeric).unwrap(), "User: Bo, Grades: 88.5");
        assert_eq!(format_enrollment(&pending).unwrap(), "User: Cy, Grades: N/A");
    }

    #[test]
    fn test_missing_keys_are_errors() {
        let no_user = json!({"grades": {"final_grade": "B"}});
        let no_grades = json!({"user": {"name": "Di"}});
        let no_final = json!({"user": {"name": "Di"}, "grades": {}});

        assert!(matches!(
            format_enrollment(&no_user),
            Err(NotifierError::MissingField { field: "user", .. })
        ));
        assert!(matches!(
            format_enrollment(&no_grades),
            Err(NotifierError::MissingField { field: "grades", .. })
        ));
        assert!(matches!(
            format_enrollment(&no_final),
            Err(NotifierError::MissingField { field: "grades.final_grade", .. })
        ));
    }

    #[test]
    fn test_course_view() {
        let raw = json!({"id": 1234, "name": "Systems Programming", "enrollment_term_id": 212});

        assert_eq!(Course::term_id(&raw), Some(212));
        assert_eq!(Course::id(&raw).as_deref(), Some("1234"));
        assert_eq!(Course::name(&raw).unwrap(), "Systems Programming");
        assert_eq!(Course::term_id(&json!({"enrollment_term_id": "212"})), None);
    }

    #[test]
    fn test_course_without_id_or_name() {
        let raw = json!({"id": null, "enrollment_term_id": 212});

        assert_eq!(Course::id(&raw), None);
        assert_eq!(Course::id(&json!({})), None);
        assert!(matches!(
            Course::name(&raw),
            Err(NotifierError::MissingField { field: "name", record: "course" })
        ));
    }
}
