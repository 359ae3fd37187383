//! Class composition engine
//!
//! Creates, updates and deletes a class together with its subject
//! assignments and enrollments as one unit. A create:
//!
//! 1. checks the request shape (required text, non-empty lists),
//! 2. rejects a (standard, section, academic year) that is already taken,
//! 3. resolves subject entries in order, each one's teacher looked up in turn,
//! 4. looks up every student,
//! 5. stages all inserts in one transaction, then commits or rolls back
//!    explicitly before returning the error.
//!
//! An update first requires the class to exist, then follows the same order.
//!
//! The pre-checks are not the only guard. Two concurrent creates of the same
//! (standard, section, academic year) can both pass them; the UNIQUE
//! constraint then fails the loser's insert and it is reported as `Conflict`.

use crate::db::classes::{self, ClassRow};
use crate::db::Directory;
use crate::models::{ClassFilters, ClassListItem, ClassView, SubjectAssignmentView};
use crate::projection::ClassQueries;
use crate::request::{Assignment, CreateClassRequest, NewClass, SubjectEntry, UpdateClassRequest};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use srm_common::db::Student;
use srm_common::error::{is_foreign_key_violation, is_unique_violation};
use srm_common::{Error, ErrorKind, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Engine settings
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Academic year applied when a create request omits one
    pub default_academic_year: String,
    /// Deadline for one write operation; `None` waits indefinitely
    pub operation_timeout: Option<Duration>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            default_academic_year: srm_common::config::current_academic_year(),
            operation_timeout: None,
        }
    }
}

/// The class composition engine
pub struct ClassComposer {
    pool: SqlitePool,
    directory: Arc<dyn Directory>,
    queries: ClassQueries,
    config: ComposerConfig,
}

fn triple_taken(standard: &str, section: &str, academic_year: &str) -> Error {
    Error::Conflict(format!(
        "Class {}-{} already exists for academic year {}",
        standard, section, academic_year
    ))
}

fn class_not_found() -> Error {
    Error::NotFound("Class not found".to_string())
}

/// Commit on success, roll back on failure
///
/// The rollback is awaited so the store is clean before the caller sees the
/// error.
async fn finish<T>(tx: Transaction<'_, Sqlite>, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(err)
        }
    }
}

/// An uncommitted transaction and the outcome of the writes staged in it
type Staged<T> = (Transaction<'static, Sqlite>, Result<T>);

impl ClassComposer {
    pub fn new(pool: SqlitePool, directory: Arc<dyn Directory>, config: ComposerConfig) -> Self {
        let queries = ClassQueries::new(pool.clone());
        Self {
            pool,
            directory,
            queries,
            config,
        }
    }

    /// Create a fully staffed and populated class in one step
    pub async fn create_class(&self, request: CreateClassRequest) -> Result<ClassView> {
        let outcome = self.create(request).await;
        log_outcome("create class", None, &outcome);
        outcome
    }

    /// Apply a partial update; supplied subject/student lists replace the
    /// stored ones wholesale
    pub async fn update_class(&self, id: i64, request: UpdateClassRequest) -> Result<ClassView> {
        let outcome = self.update(id, request).await;
        log_outcome("update class", Some(id), &outcome);
        outcome
    }

    /// Delete a class with all of its assignments and enrollments
    pub async fn delete_class(&self, id: i64) -> Result<()> {
        let outcome = self.delete(id).await;
        log_outcome("delete class", Some(id), &outcome);
        outcome
    }

    pub async fn get_class_by_id(&self, id: i64) -> Result<Option<ClassView>> {
        self.queries.get_class_by_id(id).await
    }

    pub async fn list_classes(&self, filters: &ClassFilters) -> Result<Vec<ClassListItem>> {
        self.queries.list_classes(filters).await
    }

    pub async fn get_class_subjects(&self, id: i64) -> Result<Vec<SubjectAssignmentView>> {
        self.queries.get_class_subjects(id).await
    }

    pub async fn get_class_students(&self, id: i64) -> Result<Vec<Student>> {
        self.queries.get_class_students(id).await
    }

    async fn create(&self, request: CreateClassRequest) -> Result<ClassView> {
        let new_class = request.validate(&self.config.default_academic_year)?;

        let (tx, written) = self.with_deadline(self.stage_new_class(&new_class)).await?;
        let class_id = finish(tx, written).await?;

        info!(
            class_id,
            standard = %new_class.standard,
            section = %new_class.section,
            academic_year = %new_class.academic_year,
            subjects = new_class.subjects.len(),
            students = new_class.students.len(),
            "Class created"
        );

        self.read_back(class_id).await
    }

    async fn update(&self, id: i64, request: UpdateClassRequest) -> Result<ClassView> {
        let (tx, written) = self.with_deadline(self.stage_class_patch(id, request)).await?;
        finish(tx, written).await?;

        info!(class_id = id, "Class updated");

        self.read_back(id).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let (tx, removed) = self.with_deadline(self.stage_removal(id)).await?;
        finish(tx, removed).await?;

        info!(class_id = id, "Class deleted");
        Ok(())
    }

    /// Pre-checks, then every insert inside one open transaction
    async fn stage_new_class(&self, new_class: &NewClass) -> Result<Staged<i64>> {
        if classes::find_class_by_triple(
            &self.pool,
            &new_class.standard,
            &new_class.section,
            &new_class.academic_year,
        )
        .await?
        .is_some()
        {
            return Err(triple_taken(
                &new_class.standard,
                &new_class.section,
                &new_class.academic_year,
            ));
        }

        let assignments = self.resolve_assignments(&new_class.subjects).await?;
        self.ensure_students_exist(&new_class.students).await?;

        let mut tx = self.pool.begin().await?;
        let written = write_new_class(&mut tx, new_class, &assignments).await;
        Ok((tx, written))
    }

    async fn stage_class_patch(&self, id: i64, request: UpdateClassRequest) -> Result<Staged<()>> {
        let existing = classes::find_class(&self.pool, id)
            .await?
            .ok_or_else(class_not_found)?;
        let patch = request.validate()?;

        let updated = ClassRow {
            id,
            name: patch.name.unwrap_or(existing.name),
            standard: patch.standard.unwrap_or(existing.standard),
            section: patch.section.unwrap_or(existing.section),
            academic_year: patch.academic_year.unwrap_or(existing.academic_year),
        };

        // Landing on our own slot is a no-op rename, not a conflict
        if let Some(other) = classes::find_class_by_triple(
            &self.pool,
            &updated.standard,
            &updated.section,
            &updated.academic_year,
        )
        .await?
        {
            if other.id != id {
                return Err(triple_taken(
                    &updated.standard,
                    &updated.section,
                    &updated.academic_year,
                ));
            }
        }

        let assignments = match &patch.subjects {
            Some(entries) => Some(self.resolve_assignments(entries).await?),
            None => None,
        };
        if let Some(students) = &patch.students {
            self.ensure_students_exist(students).await?;
        }

        let mut tx = self.pool.begin().await?;
        let written = write_class_patch(
            &mut tx,
            &updated,
            assignments.as_deref(),
            patch.students.as_deref(),
        )
        .await;
        Ok((tx, written))
    }

    async fn stage_removal(&self, id: i64) -> Result<Staged<()>> {
        let mut tx = self.pool.begin().await?;
        let removed = remove_class(&mut tx, id).await;
        Ok((tx, removed))
    }

    /// Resolve subject entries in request order; an entry's own shape is
    /// checked before its teacher is looked up
    async fn resolve_assignments(&self, entries: &[SubjectEntry]) -> Result<Vec<Assignment>> {
        let mut assignments = Vec::with_capacity(entries.len());
        for entry in entries {
            let assignment = entry.assignment()?;
            if self
                .directory
                .teacher_by_id(assignment.teacher_id)
                .await?
                .is_none()
            {
                return Err(Error::NotFound(format!(
                    "Teacher with ID {} not found",
                    assignment.teacher_id
                )));
            }
            assignments.push(assignment);
        }
        Ok(assignments)
    }

    async fn ensure_students_exist(&self, students: &[i64]) -> Result<()> {
        for &student_id in students {
            if self.directory.student_by_id(student_id).await?.is_none() {
                return Err(Error::NotFound(format!(
                    "Student with ID {} not found",
                    student_id
                )));
            }
        }
        Ok(())
    }

    async fn read_back(&self, id: i64) -> Result<ClassView> {
        self.queries
            .get_class_by_id(id)
            .await?
            .ok_or_else(|| Error::Internal(format!("Class {} missing after commit", id)))
    }

    /// Run the staging part of a write under the configured deadline
    ///
    /// Only pre-checks and uncommitted writes run here. On expiry the future
    /// is dropped along with its open transaction, which rolls it back;
    /// commit and read-back happen afterwards and are never cut short.
    async fn with_deadline<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        match self.config.operation_timeout {
            Some(limit) => tokio::time::timeout(limit, operation)
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => operation.await,
        }
    }
}

/// Insert the class row, its assignments and its enrollments
async fn write_new_class(
    conn: &mut SqliteConnection,
    new_class: &NewClass,
    assignments: &[Assignment],
) -> Result<i64> {
    let class_id = classes::insert_class(
        conn,
        &new_class.name,
        &new_class.standard,
        &new_class.section,
        &new_class.academic_year,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            triple_taken(
                &new_class.standard,
                &new_class.section,
                &new_class.academic_year,
            )
        } else {
            Error::Database(e)
        }
    })?;

    write_assignments(conn, class_id, assignments).await?;
    write_enrollments(conn, class_id, &new_class.students).await?;

    Ok(class_id)
}

async fn write_class_patch(
    conn: &mut SqliteConnection,
    updated: &ClassRow,
    assignments: Option<&[Assignment]>,
    students: Option<&[i64]>,
) -> Result<()> {
    let touched = classes::update_class(conn, updated).await.map_err(|e| {
        if is_unique_violation(&e) {
            triple_taken(&updated.standard, &updated.section, &updated.academic_year)
        } else {
            Error::Database(e)
        }
    })?;

    // Deleted by someone else since the existence check
    if touched == 0 {
        return Err(class_not_found());
    }

    if let Some(assignments) = assignments {
        let removed = classes::delete_assignments(conn, updated.id).await?;
        debug!(class_id = updated.id, removed, "Cleared subject assignments");
        write_assignments(conn, updated.id, assignments).await?;
    }

    if let Some(students) = students {
        let removed = classes::delete_enrollments(conn, updated.id).await?;
        debug!(class_id = updated.id, removed, "Cleared enrollments");
        write_enrollments(conn, updated.id, students).await?;
    }

    Ok(())
}

async fn write_assignments(
    conn: &mut SqliteConnection,
    class_id: i64,
    assignments: &[Assignment],
) -> Result<()> {
    for assignment in assignments {
        classes::insert_assignment(&mut *conn, class_id, assignment.subject, assignment.teacher_id)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::Conflict(format!(
                        "Subject {} is assigned more than once",
                        assignment.subject
                    ))
                } else if is_foreign_key_violation(&e) {
                    Error::NotFound(format!(
                        "Teacher with ID {} not found",
                        assignment.teacher_id
                    ))
                } else {
                    Error::Database(e)
                }
            })?;
    }
    Ok(())
}

async fn write_enrollments(
    conn: &mut SqliteConnection,
    class_id: i64,
    students: &[i64],
) -> Result<()> {
    for &student_id in students {
        classes::insert_enrollment(&mut *conn, class_id, student_id)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::Conflict(format!(
                        "Student with ID {} is enrolled more than once",
                        student_id
                    ))
                } else if is_foreign_key_violation(&e) {
                    Error::NotFound(format!("Student with ID {} not found", student_id))
                } else {
                    Error::Database(e)
                }
            })?;
    }
    Ok(())
}

/// Remove owned rows first, then the class itself
async fn remove_class(conn: &mut SqliteConnection, id: i64) -> Result<()> {
    classes::delete_assignments(conn, id).await?;
    classes::delete_enrollments(conn, id).await?;

    if classes::delete_class_row(conn, id).await? == 0 {
        return Err(class_not_found());
    }
    Ok(())
}

fn log_outcome<T>(operation: &str, class_id: Option<i64>, outcome: &Result<T>) {
    if let Err(err) = outcome {
        match err.kind() {
            ErrorKind::Storage => {
                error!(operation, ?class_id, error = %err, "Class operation failed")
            }
            kind => warn!(operation, ?class_id, ?kind, error = %err, "Class operation rejected"),
        }
    }
}
