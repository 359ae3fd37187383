//! Class projections returned to callers

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use srm_common::Subject;

/// One row of the class listing
///
/// Counts are aggregated over the association tables at read time.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClassListItem {
    pub id: i64,
    pub name: String,
    pub standard: String,
    pub section: String,
    pub academic_year: String,
    pub student_count: i64,
    pub subject_count: i64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// A subject assignment joined with its teacher
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAssignmentView {
    pub subject_id: Subject,
    pub teacher_id: i64,
    pub teacher_name: String,
    pub employee_id: String,
    pub teacher_email: String,
}

impl<'r> FromRow<'r, SqliteRow> for SubjectAssignmentView {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let subject_id: String = row.try_get("subject_id")?;
        let subject_id = Subject::from_id(&subject_id).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "subject_id".to_string(),
            source: format!("unknown subject '{}'", subject_id).into(),
        })?;

        Ok(SubjectAssignmentView {
            subject_id,
            teacher_id: row.try_get("teacher_id")?,
            teacher_name: row.try_get("teacher_name")?,
            employee_id: row.try_get("employee_id")?,
            teacher_email: row.try_get("teacher_email")?,
        })
    }
}

/// Detail view: the list item plus eagerly resolved subjects and the ids of
/// enrolled students (full student rows come from `/class/:id/students`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    #[serde(flatten)]
    pub class: ClassListItem,
    pub subjects: Vec<SubjectAssignmentView>,
    pub student_ids: Vec<i64>,
}

/// Optional equality filters for the listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFilters {
    pub standard: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
}

impl ClassFilters {
    /// Drop blank values so `?standard=` behaves like no filter
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            standard: keep(self.standard),
            section: keep(self.section),
            academic_year: keep(self.academic_year),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_view_flattens_summary() {
        let view = ClassView {
            class: ClassListItem {
                id: 3,
                name: "Class VIII-A".to_string(),
                standard: "8".to_string(),
                section: "A".to_string(),
                academic_year: "2024-2025".to_string(),
                student_count: 2,
                subject_count: 1,
                created_at: "2024-06-01 09:00:00".to_string(),
                updated_at: None,
            },
            subjects: vec![SubjectAssignmentView {
                subject_id: Subject::Mathematics,
                teacher_id: 7,
                teacher_name: "R. Sharma".to_string(),
                employee_id: "EMP007".to_string(),
                teacher_email: "sharma@school.test".to_string(),
            }],
            student_ids: vec![101, 102],
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["academicYear"], "2024-2025");
        assert_eq!(json["studentCount"], 2);
        assert_eq!(json["subjects"][0]["subjectId"], "mathematics");
        assert_eq!(json["subjects"][0]["teacherEmail"], "sharma@school.test");
        assert_eq!(json["studentIds"], serde_json::json!([101, 102]));
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        let filters = ClassFilters {
            standard: Some(" ".to_string()),
            section: Some("B".to_string()),
            academic_year: None,
        }
        .normalized();

        assert!(filters.standard.is_none());
        assert_eq!(filters.section.as_deref(), Some("B"));
    }
}
