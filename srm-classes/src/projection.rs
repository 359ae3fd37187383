//! Read-side projections over the class tables
//!
//! Nothing here mutates state. Reads run on the pool with the store's
//! default isolation; no explicit locks are taken.

use crate::db::classes;
use crate::models::{ClassFilters, ClassListItem, ClassView, SubjectAssignmentView};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use srm_common::db::Student;
use srm_common::{Error, Result};

const CLASS_SUMMARY_SELECT: &str = r#"
    SELECT c.id, c.name, c.standard, c.section, c.academic_year,
           c.created_at, c.updated_at,
           (SELECT COUNT(*) FROM class_students cs WHERE cs.class_id = c.id) AS student_count,
           (SELECT COUNT(*) FROM class_subjects sj WHERE sj.class_id = c.id) AS subject_count
    FROM classes c
"#;

/// Query/projection layer for classes
#[derive(Debug, Clone)]
pub struct ClassQueries {
    pool: SqlitePool,
}

impl ClassQueries {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List classes with aggregate counts, ordered by (standard, section)
    pub async fn list_classes(&self, filters: &ClassFilters) -> Result<Vec<ClassListItem>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(CLASS_SUMMARY_SELECT);
        qb.push(" WHERE 1=1");

        if let Some(standard) = &filters.standard {
            qb.push(" AND c.standard = ").push_bind(standard);
        }
        if let Some(section) = &filters.section {
            qb.push(" AND c.section = ").push_bind(section);
        }
        if let Some(academic_year) = &filters.academic_year {
            qb.push(" AND c.academic_year = ").push_bind(academic_year);
        }

        // academic_year and id only break ties so listings are deterministic
        qb.push(" ORDER BY c.standard, c.section, c.academic_year, c.id");

        Ok(qb
            .build_query_as::<ClassListItem>()
            .fetch_all(&self.pool)
            .await?)
    }

    /// Detail view, or `None` when the class does not exist
    pub async fn get_class_by_id(&self, id: i64) -> Result<Option<ClassView>> {
        let sql = format!("{} WHERE c.id = ?", CLASS_SUMMARY_SELECT);
        let summary = sqlx::query_as::<_, ClassListItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(class) = summary else {
            return Ok(None);
        };

        let subjects = self.subjects_with_teachers(id).await?;
        let student_ids = sqlx::query_scalar(
            "SELECT student_id FROM class_students WHERE class_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ClassView {
            class,
            subjects,
            student_ids,
        }))
    }

    /// Subject assignments joined with their teachers
    ///
    /// `NotFound` when the class does not exist.
    pub async fn get_class_subjects(&self, id: i64) -> Result<Vec<SubjectAssignmentView>> {
        self.ensure_class(id).await?;
        self.subjects_with_teachers(id).await
    }

    /// Enrolled students, ordered by full name
    ///
    /// `NotFound` when the class does not exist.
    pub async fn get_class_students(&self, id: i64) -> Result<Vec<Student>> {
        self.ensure_class(id).await?;

        Ok(sqlx::query_as::<_, Student>(
            r#"
            SELECT s.*
            FROM students s
            JOIN class_students cs ON s.id = cs.student_id
            WHERE cs.class_id = ?
            ORDER BY s.full_name, s.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn ensure_class(&self, id: i64) -> Result<()> {
        if classes::class_exists(&self.pool, id).await? {
            Ok(())
        } else {
            Err(Error::NotFound("Class not found".to_string()))
        }
    }

    // Ordered by assignment row id, i.e. the order the subjects were submitted
    async fn subjects_with_teachers(&self, class_id: i64) -> Result<Vec<SubjectAssignmentView>> {
        Ok(sqlx::query_as::<_, SubjectAssignmentView>(
            r#"
            SELECT cs.subject_id, cs.teacher_id,
                   t.full_name AS teacher_name, t.employee_id,
                   t.email AS teacher_email
            FROM class_subjects cs
            JOIN teachers t ON cs.teacher_id = t.id
            WHERE cs.class_id = ?
            ORDER BY cs.id
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
