//! Typed request bodies for class composition
//!
//! Bodies arrive with every field optional so that a missing field becomes a
//! `Validation` error with a readable message instead of a deserializer
//! rejection. `validate` turns them into the checked forms the composer
//! works with; nothing here touches the store.

use serde::Deserialize;
use srm_common::{Error, Result, Subject};

/// One `{id, teacherId}` entry of a `subjects` list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectEntry {
    pub id: Option<String>,
    pub teacher_id: Option<i64>,
}

impl SubjectEntry {
    pub fn new(id: &str, teacher_id: i64) -> Self {
        Self {
            id: Some(id.to_string()),
            teacher_id: Some(teacher_id),
        }
    }
}

/// Body of `POST /class/create`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub name: Option<String>,
    pub standard: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    pub subjects: Option<Vec<SubjectEntry>>,
    pub students: Option<Vec<i64>>,
}

/// Body of `PUT /class/:id`; every field is a partial update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub standard: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    pub subjects: Option<Vec<SubjectEntry>>,
    pub students: Option<Vec<i64>>,
}

/// A validated subject-teacher pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub subject: Subject,
    pub teacher_id: i64,
}

/// A class creation whose shape has been checked
///
/// Subject entries are still raw: each one is resolved into an
/// [`Assignment`] only after the class slot is known to be free.
#[derive(Debug, Clone)]
pub struct NewClass {
    pub name: String,
    pub standard: String,
    pub section: String,
    pub academic_year: String,
    pub subjects: Vec<SubjectEntry>,
    pub students: Vec<i64>,
}

/// A shape-checked partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct ClassPatch {
    pub name: Option<String>,
    pub standard: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    pub subjects: Option<Vec<SubjectEntry>>,
    pub students: Option<Vec<i64>>,
}

const MISSING_FIELDS: &str = "Please provide all required fields: name, standard, and section";
const NO_SUBJECTS: &str = "Please provide at least one subject with an assigned teacher";
const NO_STUDENTS: &str = "Please enroll at least one student in the class";

/// Trimmed, non-empty text or `None`
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Patch fields may be omitted, but not supplied blank
fn patch_text(field: &str, value: Option<String>) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) => match present(Some(v)) {
            Some(v) => Ok(Some(v)),
            None => Err(Error::Validation(format!("{} cannot be empty", field))),
        },
    }
}

fn non_empty_subjects(entries: Vec<SubjectEntry>) -> Result<Vec<SubjectEntry>> {
    if entries.is_empty() {
        return Err(Error::Validation(NO_SUBJECTS.to_string()));
    }
    Ok(entries)
}

fn non_empty_students(students: Vec<i64>) -> Result<Vec<i64>> {
    if students.is_empty() {
        return Err(Error::Validation(NO_STUDENTS.to_string()));
    }
    Ok(students)
}

impl SubjectEntry {
    /// Resolve the entry: it needs a subject id, a teacher, and the id must
    /// name a catalog subject
    pub fn assignment(&self) -> Result<Assignment> {
        let id = present(self.id.clone()).ok_or_else(|| {
            Error::Validation("Every subject entry needs a subject id".to_string())
        })?;
        let teacher_id = self.teacher_id.ok_or_else(|| {
            Error::Validation(format!("Teacher not assigned for subject {}", id))
        })?;

        Ok(Assignment {
            subject: id.parse()?,
            teacher_id,
        })
    }
}

impl CreateClassRequest {
    /// Check the request shape; `default_academic_year` fills an omitted year
    pub fn validate(self, default_academic_year: &str) -> Result<NewClass> {
        let (name, standard, section) =
            match (present(self.name), present(self.standard), present(self.section)) {
                (Some(name), Some(standard), Some(section)) => (name, standard, section),
                _ => return Err(Error::Validation(MISSING_FIELDS.to_string())),
            };

        let subjects = non_empty_subjects(self.subjects.unwrap_or_default())?;
        let students = non_empty_students(self.students.unwrap_or_default())?;

        let academic_year = present(self.academic_year)
            .unwrap_or_else(|| default_academic_year.to_string());

        Ok(NewClass {
            name,
            standard,
            section,
            academic_year,
            subjects,
            students,
        })
    }
}

impl UpdateClassRequest {
    pub fn validate(self) -> Result<ClassPatch> {
        Ok(ClassPatch {
            name: patch_text("name", self.name)?,
            standard: patch_text("standard", self.standard)?,
            section: patch_text("section", self.section)?,
            academic_year: patch_text("academicYear", self.academic_year)?,
            subjects: self.subjects.map(non_empty_subjects).transpose()?,
            students: self.students.map(non_empty_students).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateClassRequest {
        CreateClassRequest {
            name: Some("Class VIII-A".to_string()),
            standard: Some("8".to_string()),
            section: Some("A".to_string()),
            academic_year: Some("2024-2025".to_string()),
            subjects: Some(vec![SubjectEntry::new("mathematics", 7)]),
            students: Some(vec![101, 102]),
        }
    }

    fn validation_message(result: Result<impl std::fmt::Debug>) -> String {
        match result {
            Err(Error::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_request_from_json() {
        let json = r#"{
            "name": "Class VIII-A",
            "standard": "8",
            "section": "A",
            "academicYear": "2024-2025",
            "subjects": [{"id": "mathematics", "teacherId": 7}],
            "students": [101, 102]
        }"#;
        let request: CreateClassRequest = serde_json::from_str(json).unwrap();
        let new_class = request.validate("2026").unwrap();

        assert_eq!(new_class.academic_year, "2024-2025");
        assert_eq!(
            new_class.subjects[0].assignment().unwrap(),
            Assignment {
                subject: Subject::Mathematics,
                teacher_id: 7
            }
        );
        assert_eq!(new_class.students, vec![101, 102]);
    }

    #[test]
    fn test_blank_required_field_rejected() {
        let mut request = valid_create();
        request.section = Some("   ".to_string());
        assert_eq!(validation_message(request.validate("2026")), MISSING_FIELDS);
    }

    #[test]
    fn test_empty_subjects_and_students_rejected() {
        let mut request = valid_create();
        request.subjects = Some(vec![]);
        assert_eq!(validation_message(request.validate("2026")), NO_SUBJECTS);

        let mut request = valid_create();
        request.students = None;
        assert_eq!(validation_message(request.validate("2026")), NO_STUDENTS);
    }

    #[test]
    fn test_shape_check_leaves_entries_unresolved() {
        // Entry problems surface later, when the entry is resolved
        let mut request = valid_create();
        request.subjects = Some(vec![SubjectEntry {
            id: Some("physics".to_string()),
            teacher_id: None,
        }]);
        assert!(request.validate("2026").is_ok());
    }

    #[test]
    fn test_missing_teacher_id_rejected() {
        let entry = SubjectEntry {
            id: Some("physics".to_string()),
            teacher_id: None,
        };
        assert_eq!(
            validation_message(entry.assignment()),
            "Teacher not assigned for subject physics"
        );
    }

    #[test]
    fn test_unknown_subject_rejected() {
        let entry = SubjectEntry::new("alchemy", 7);
        assert!(validation_message(entry.assignment()).contains("alchemy"));

        let blank = SubjectEntry {
            id: Some("  ".to_string()),
            teacher_id: Some(7),
        };
        assert_eq!(
            validation_message(blank.assignment()),
            "Every subject entry needs a subject id"
        );
    }

    #[test]
    fn test_academic_year_defaults() {
        let mut request = valid_create();
        request.academic_year = Some(String::new());
        assert_eq!(request.validate("2031").unwrap().academic_year, "2031");
    }

    #[test]
    fn test_patch_leaves_omitted_fields_alone() {
        let patch = UpdateClassRequest {
            students: Some(vec![101]),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert!(patch.name.is_none());
        assert!(patch.subjects.is_none());
        assert_eq!(patch.students, Some(vec![101]));
    }

    #[test]
    fn test_patch_rejects_blank_and_empty_lists() {
        let blank = UpdateClassRequest {
            standard: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(validation_message(blank.validate()), "standard cannot be empty");

        let empty = UpdateClassRequest {
            subjects: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(validation_message(empty.validate()), NO_SUBJECTS);
    }
}
