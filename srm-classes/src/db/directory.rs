//! Student/teacher directory
//!
//! The composer only needs existence checks, so it depends on the
//! [`Directory`] trait. [`SqliteDirectory`] is the store-backed
//! implementation and also carries the registration and deletion calls the
//! HTTP layer exposes.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use srm_common::db::{join_subject_list, Student, Teacher};
use srm_common::error::{is_foreign_key_violation, is_unique_violation};
use srm_common::{Error, Result};
use tracing::info;

/// Lookup interface consumed by the class composer
#[async_trait]
pub trait Directory: Send + Sync {
    async fn student_by_id(&self, id: i64) -> Result<Option<Student>>;

    async fn teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;

    async fn student_by_admission_number(&self, admission_number: &str)
        -> Result<Option<Student>>;

    async fn student_by_email(&self, email: &str) -> Result<Option<Student>>;

    async fn teacher_by_employee_id(&self, employee_id: &str) -> Result<Option<Teacher>>;

    async fn teacher_by_email(&self, email: &str) -> Result<Option<Teacher>>;
}

/// Body of `POST /student/create`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub admission_number: Option<String>,
    pub standard: Option<String>,
    pub section: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub blood_group: Option<String>,
    pub aadhar_number: Option<String>,
}

/// Body of `POST /teacher/create`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeacher {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub qualification: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub designation: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub date_of_birth: Option<NaiveDate>,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
    pub aadhar_number: Option<String>,
    pub gender: Option<String>,
    pub experience: Option<String>,
}

const REQUIRED_FIELDS: &str = "Please provide all required fields";

fn required(value: &Option<String>) -> Result<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Validation(REQUIRED_FIELDS.to_string()))
}

fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// SQLite-backed directory
#[derive(Debug, Clone)]
pub struct SqliteDirectory {
    pool: SqlitePool,
}

impl SqliteDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a student; admission number and email must be unused
    pub async fn register_student(&self, new: NewStudent) -> Result<Student> {
        let full_name = required(&new.full_name)?;
        let email = required(&new.email)?;
        let admission_number = required(&new.admission_number)?;
        let standard = required(&new.standard)?;
        let mobile_number = required(&new.mobile_number)?;

        if self.student_by_admission_number(admission_number).await?.is_some() {
            return Err(Error::Conflict(
                "Student with this admission number already exists".to_string(),
            ));
        }
        if self.student_by_email(email).await?.is_some() {
            return Err(Error::Conflict(
                "Email is already registered with another student".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO students (
                full_name, email, admission_number, standard, section, date_of_birth,
                mobile_number, address, parent_name, blood_group, aadhar_number, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(admission_number)
        .bind(standard)
        .bind(optional(&new.section))
        .bind(new.date_of_birth)
        .bind(mobile_number)
        .bind(optional(&new.address))
        .bind(optional(&new.parent_name))
        .bind(optional(&new.blood_group))
        .bind(optional(&new.aadhar_number))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration
            if is_unique_violation(&e) {
                Error::Conflict("Student with this admission number or email already exists".to_string())
            } else {
                Error::Database(e)
            }
        })?;

        let id = result.last_insert_rowid();
        info!(student_id = id, admission_number, "Registered student");

        self.student_by_id(id)
            .await?
            .ok_or_else(|| Error::Internal(format!("Student {} vanished after insert", id)))
    }

    /// Register a teacher; employee id and email must be unused
    pub async fn register_teacher(&self, new: NewTeacher) -> Result<Teacher> {
        let full_name = required(&new.full_name)?;
        let email = required(&new.email)?;
        let employee_id = required(&new.employee_id)?;
        let mobile_number = required(&new.mobile_number)?;
        let subjects = new
            .subjects
            .as_deref()
            .map(join_subject_list)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Validation(REQUIRED_FIELDS.to_string()))?;

        if self.teacher_by_employee_id(employee_id).await?.is_some() {
            return Err(Error::Conflict(
                "Teacher with this employee ID already exists".to_string(),
            ));
        }
        if self.teacher_by_email(email).await?.is_some() {
            return Err(Error::Conflict(
                "Email is already registered with another teacher".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO teachers (
                full_name, email, employee_id, qualification, subjects, designation,
                date_of_joining, date_of_birth, mobile_number, address, aadhar_number,
                gender, experience, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(employee_id)
        .bind(optional(&new.qualification))
        .bind(&subjects)
        .bind(optional(&new.designation))
        .bind(new.date_of_joining)
        .bind(new.date_of_birth)
        .bind(mobile_number)
        .bind(optional(&new.address))
        .bind(optional(&new.aadhar_number))
        .bind(optional(&new.gender))
        .bind(optional(&new.experience))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict("Teacher with this employee ID or email already exists".to_string())
            } else {
                Error::Database(e)
            }
        })?;

        let id = result.last_insert_rowid();
        info!(teacher_id = id, employee_id, "Registered teacher");

        self.teacher_by_id(id)
            .await?
            .ok_or_else(|| Error::Internal(format!("Teacher {} vanished after insert", id)))
    }

    /// Delete a student; their enrollments go with them (ON DELETE CASCADE)
    pub async fn delete_student(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Student not found".to_string()));
        }

        info!(student_id = id, "Deleted student");
        Ok(())
    }

    /// Delete a teacher
    ///
    /// Rejected with `Conflict` while any class still assigns them a subject
    /// (the `class_subjects.teacher_id` foreign key blocks the delete).
    pub async fn delete_teacher(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    Error::Conflict(
                        "Teacher is assigned to one or more classes and cannot be deleted"
                            .to_string(),
                    )
                } else {
                    Error::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Teacher not found".to_string()));
        }

        info!(teacher_id = id, "Deleted teacher");
        Ok(())
    }

    async fn student_where(&self, column: &str, value: &str) -> Result<Option<Student>> {
        let sql = format!("SELECT * FROM students WHERE {} = ?", column);
        Ok(sqlx::query_as::<_, Student>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn teacher_where(&self, column: &str, value: &str) -> Result<Option<Teacher>> {
        let sql = format!("SELECT * FROM teachers WHERE {} = ?", column);
        Ok(sqlx::query_as::<_, Teacher>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl Directory for SqliteDirectory {
    async fn student_by_id(&self, id: i64) -> Result<Option<Student>> {
        Ok(sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        Ok(sqlx::query_as::<_, Teacher>("SELECT * FROM teachers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn student_by_admission_number(
        &self,
        admission_number: &str,
    ) -> Result<Option<Student>> {
        self.student_where("admission_number", admission_number).await
    }

    async fn student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.student_where("email", email).await
    }

    async fn teacher_by_employee_id(&self, employee_id: &str) -> Result<Option<Teacher>> {
        self.teacher_where("employee_id", employee_id).await
    }

    async fn teacher_by_email(&self, email: &str) -> Result<Option<Teacher>> {
        self.teacher_where("email", email).await
    }
}
