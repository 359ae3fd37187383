//! Database models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// Student record as projected to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub admission_number: String,
    pub standard: String,
    pub section: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub mobile_number: String,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub blood_group: Option<String>,
    pub aadhar_number: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Teacher record as projected to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub employee_id: String,
    pub qualification: Option<String>,
    /// Subjects the teacher is qualified for (stored comma-separated)
    pub subjects: Vec<String>,
    pub designation: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub date_of_birth: Option<NaiveDate>,
    pub mobile_number: String,
    pub address: Option<String>,
    pub aadhar_number: Option<String>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl<'r> FromRow<'r, SqliteRow> for Teacher {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let subjects: String = row.try_get("subjects")?;

        Ok(Teacher {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            employee_id: row.try_get("employee_id")?,
            qualification: row.try_get("qualification")?,
            subjects: split_subject_list(&subjects),
            designation: row.try_get("designation")?,
            date_of_joining: row.try_get("date_of_joining")?,
            date_of_birth: row.try_get("date_of_birth")?,
            mobile_number: row.try_get("mobile_number")?,
            address: row.try_get("address")?,
            aadhar_number: row.try_get("aadhar_number")?,
            gender: row.try_get("gender")?,
            experience: row.try_get("experience")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Join a subject list for the `teachers.subjects` column
pub fn join_subject_list(subjects: &[String]) -> String {
    subjects
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split the `teachers.subjects` column back into a list
pub fn split_subject_list(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_list_round_trip() {
        let subjects = vec!["mathematics".to_string(), " physics ".to_string(), String::new()];
        let stored = join_subject_list(&subjects);
        assert_eq!(stored, "mathematics,physics");
        assert_eq!(split_subject_list(&stored), vec!["mathematics", "physics"]);
    }

    #[test]
    fn test_split_empty_column() {
        assert!(split_subject_list("").is_empty());
    }
}
