//! Shared fixtures for srm-classes integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use srm_classes::db::{NewStudent, NewTeacher, SqliteDirectory};
use srm_classes::request::{CreateClassRequest, SubjectEntry};
use srm_classes::{ClassComposer, ComposerConfig};
use srm_common::db::init_database;
use tempfile::TempDir;

pub const ACADEMIC_YEAR: &str = "2024-2025";

/// Fresh migrated database; keep the `TempDir` alive for the whole test
pub async fn create_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pool = init_database(&temp_dir.path().join("school.db"))
        .await
        .expect("Failed to initialize test database");
    (temp_dir, pool)
}

pub fn test_config() -> ComposerConfig {
    ComposerConfig {
        default_academic_year: ACADEMIC_YEAR.to_string(),
        operation_timeout: None,
    }
}

pub fn composer_with(pool: &SqlitePool, config: ComposerConfig) -> ClassComposer {
    ClassComposer::new(
        pool.clone(),
        Arc::new(SqliteDirectory::new(pool.clone())),
        config,
    )
}

pub fn composer(pool: &SqlitePool) -> ClassComposer {
    composer_with(pool, test_config())
}

pub fn timed_composer(pool: &SqlitePool, limit: Duration) -> ClassComposer {
    composer_with(
        pool,
        ComposerConfig {
            operation_timeout: Some(limit),
            ..test_config()
        },
    )
}

pub fn new_teacher(tag: &str) -> NewTeacher {
    NewTeacher {
        full_name: Some(format!("Teacher {}", tag)),
        email: Some(format!("teacher.{}@school.test", tag.to_lowercase())),
        employee_id: Some(format!("EMP-{}", tag)),
        subjects: Some(vec!["mathematics".to_string(), "physics".to_string()]),
        mobile_number: Some("9000000000".to_string()),
        ..Default::default()
    }
}

pub fn new_student(name: &str, admission_number: &str) -> NewStudent {
    NewStudent {
        full_name: Some(name.to_string()),
        email: Some(format!("{}@school.test", admission_number.to_lowercase())),
        admission_number: Some(admission_number.to_string()),
        standard: Some("8".to_string()),
        section: Some("A".to_string()),
        mobile_number: Some("9111111111".to_string()),
        ..Default::default()
    }
}

pub async fn seed_teacher(pool: &SqlitePool, tag: &str) -> i64 {
    SqliteDirectory::new(pool.clone())
        .register_teacher(new_teacher(tag))
        .await
        .expect("Failed to seed teacher")
        .id
}

pub async fn seed_student(pool: &SqlitePool, name: &str, admission_number: &str) -> i64 {
    SqliteDirectory::new(pool.clone())
        .register_student(new_student(name, admission_number))
        .await
        .expect("Failed to seed student")
        .id
}

pub fn class_request(
    standard: &str,
    section: &str,
    subjects: &[(&str, i64)],
    students: &[i64],
) -> CreateClassRequest {
    CreateClassRequest {
        name: Some(format!("Class {}-{}", standard, section)),
        standard: Some(standard.to_string()),
        section: Some(section.to_string()),
        academic_year: Some(ACADEMIC_YEAR.to_string()),
        subjects: Some(
            subjects
                .iter()
                .map(|(id, teacher)| SubjectEntry::new(id, *teacher))
                .collect(),
        ),
        students: Some(students.to_vec()),
    }
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
