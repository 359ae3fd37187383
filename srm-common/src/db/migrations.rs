//! Database schema migrations
//!
//! Versioned, idempotent schema setup tracked in the `schema_version` table.
//! Invoked once by [`crate::db::init_database`] during service startup.
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing migrations** - databases created by older builds depend on them
//! 2. **Always add new migrations** - one function per schema change, bump `CURRENT_SCHEMA_VERSION`
//! 3. **Use IF NOT EXISTS** - a migration may be re-applied after a crash between DDL and version bump

use crate::Result;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// v1: entity tables and the two association tables
///
/// The UNIQUE(standard, section, academic_year) constraint on `classes` is the
/// final guard against concurrent duplicate creates; application pre-checks
/// only give nicer error messages.
const V1_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        admission_number TEXT NOT NULL UNIQUE,
        standard TEXT NOT NULL,
        section TEXT,
        date_of_birth TEXT,
        mobile_number TEXT NOT NULL,
        address TEXT,
        parent_name TEXT,
        blood_group TEXT,
        aadhar_number TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teachers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        employee_id TEXT NOT NULL UNIQUE,
        qualification TEXT,
        subjects TEXT NOT NULL,
        designation TEXT,
        date_of_joining TEXT,
        date_of_birth TEXT,
        mobile_number TEXT NOT NULL,
        address TEXT,
        aadhar_number TEXT,
        gender TEXT,
        experience TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS classes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        standard TEXT NOT NULL,
        section TEXT NOT NULL,
        academic_year TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT,
        UNIQUE(standard, section, academic_year)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS class_subjects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        class_id INTEGER NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
        subject_id TEXT NOT NULL,
        -- NO ACTION, not RESTRICT: a blocked teacher delete must report as a
        -- foreign key violation
        teacher_id INTEGER NOT NULL REFERENCES teachers(id),
        UNIQUE(class_id, subject_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS class_students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        class_id INTEGER NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
        student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        UNIQUE(class_id, student_id)
    )
    "#,
];

/// v2: lookup indexes for the projection queries and FK enforcement
const V2_STATEMENTS: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_students_full_name ON students(full_name)",
    "CREATE INDEX IF NOT EXISTS idx_students_standard ON students(standard)",
    "CREATE INDEX IF NOT EXISTS idx_class_subjects_teacher ON class_subjects(teacher_id)",
    "CREATE INDEX IF NOT EXISTS idx_class_students_student ON class_students(student_id)",
];

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Get current schema version from database
///
/// Returns 0 if no migration has been recorded yet
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let version: Option<i32> =
        sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
            .fetch_one(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn apply_statements(conn: &mut SqliteConnection, statements: &[&str]) -> Result<()> {
    for statement in statements {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Apply one migration and record its version in the same transaction
async fn apply_migration(pool: &SqlitePool, version: i32, statements: &[&str]) -> Result<()> {
    let mut tx = pool.begin().await?;

    apply_statements(&mut tx, statements).await?;

    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!("✓ Migration v{} completed", version);
    Ok(())
}

/// Run all pending migrations
///
/// Safe to call on every startup: an up-to-date schema is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        warn!("This may indicate a downgrade. Proceeding with caution.");
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        apply_migration(pool, 1, V1_STATEMENTS).await?;
    }

    if current_version < 2 {
        apply_migration(pool, 2, V2_STATEMENTS).await?;
    }

    info!("All migrations completed successfully");
    Ok(())
}
