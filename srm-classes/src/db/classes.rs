//! SQL for the `classes`, `class_subjects` and `class_students` tables
//!
//! Write helpers take a bare connection so the composer can run them inside
//! one transaction. They return raw `sqlx::Error`s; turning constraint
//! violations into domain errors is the composer's job because only it knows
//! which request entry was being written.

use sqlx::{FromRow, SqliteConnection, SqlitePool};
use srm_common::Subject;

/// A `classes` row without aggregates
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ClassRow {
    pub id: i64,
    pub name: String,
    pub standard: String,
    pub section: String,
    pub academic_year: String,
}

/// Load a class row by id
pub async fn find_class(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<ClassRow>> {
    sqlx::query_as::<_, ClassRow>(
        "SELECT id, name, standard, section, academic_year FROM classes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Look up the class occupying a (standard, section, academic year) slot
pub async fn find_class_by_triple(
    pool: &SqlitePool,
    standard: &str,
    section: &str,
    academic_year: &str,
) -> sqlx::Result<Option<ClassRow>> {
    sqlx::query_as::<_, ClassRow>(
        r#"
        SELECT id, name, standard, section, academic_year
        FROM classes
        WHERE standard = ? AND section = ? AND academic_year = ?
        "#,
    )
    .bind(standard)
    .bind(section)
    .bind(academic_year)
    .fetch_optional(pool)
    .await
}

pub async fn class_exists(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM classes WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Insert a class row and return its id
pub async fn insert_class(
    conn: &mut SqliteConnection,
    name: &str,
    standard: &str,
    section: &str,
    academic_year: &str,
) -> sqlx::Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO classes (name, standard, section, academic_year, created_at)
        VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(name)
    .bind(standard)
    .bind(section)
    .bind(academic_year)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite the descriptive columns of a class
///
/// Returns the number of rows touched (0 when the class is gone).
pub async fn update_class(conn: &mut SqliteConnection, row: &ClassRow) -> sqlx::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE classes
        SET name = ?, standard = ?, section = ?, academic_year = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&row.name)
    .bind(&row.standard)
    .bind(&row.section)
    .bind(&row.academic_year)
    .bind(row.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_assignment(
    conn: &mut SqliteConnection,
    class_id: i64,
    subject: Subject,
    teacher_id: i64,
) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO class_subjects (class_id, subject_id, teacher_id) VALUES (?, ?, ?)")
        .bind(class_id)
        .bind(subject.id())
        .bind(teacher_id)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn insert_enrollment(
    conn: &mut SqliteConnection,
    class_id: i64,
    student_id: i64,
) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO class_students (class_id, student_id) VALUES (?, ?)")
        .bind(class_id)
        .bind(student_id)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn delete_assignments(conn: &mut SqliteConnection, class_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM class_subjects WHERE class_id = ?")
        .bind(class_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_enrollments(conn: &mut SqliteConnection, class_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM class_students WHERE class_id = ?")
        .bind(class_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Delete the class row itself; returns rows affected
pub async fn delete_class_row(conn: &mut SqliteConnection, class_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM classes WHERE id = ?")
        .bind(class_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
