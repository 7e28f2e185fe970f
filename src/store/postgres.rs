use crate::{
    config::DbConfig,
    data::student::{NewStudent, Student, StudentPatch},
    error::{MakeQuerySnafu, MigrateSnafu, OpenDatabaseSnafu, RosterError, RosterResult},
    store::StudentStore,
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};

const COLUMNS: &str =
    "id, email, first_name, last_name, middle_name, age, gender, course, year_level, section";

#[derive(Clone, Debug)]
pub struct PostgresStudentStore {
    pool: Pool<Postgres>,
}

impl PostgresStudentStore {
    pub async fn connect(options: PgPoolOptions, db_config: &DbConfig) -> RosterResult<Self> {
        let pool = options
            .connect(&db_config.get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self { pool })
    }
}

/// A unique violation here means another writer took the email between the
/// validator's check and this write.
fn write_error(source: sqlx::Error, email: Option<&str>) -> RosterError {
    match (&source, email) {
        (sqlx::Error::Database(db), Some(email)) if db.is_unique_violation() => {
            RosterError::EmailTaken {
                email: email.to_string(),
            }
        }
        _ => RosterError::MakeQuery { source },
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn list(&self) -> RosterResult<Vec<Student>> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {COLUMNS} FROM public.students ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .context(MakeQuerySnafu)
    }

    async fn get(&self, id: i64) -> RosterResult<Option<Student>> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {COLUMNS} FROM public.students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)
    }

    async fn email_owner(&self, email: &str) -> RosterResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM public.students WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn insert(&self, new: NewStudent) -> RosterResult<Student> {
        sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO public.students (email, first_name, last_name, middle_name, age, gender, course, year_level, section) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {COLUMNS}"
        ))
        .bind(&new.email)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.middle_name)
        .bind(new.age)
        .bind(&new.gender)
        .bind(&new.course)
        .bind(&new.year_level)
        .bind(&new.section)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, Some(&new.email)))
    }

    async fn patch(&self, id: i64, patch: StudentPatch) -> RosterResult<Option<Student>> {
        let StudentPatch {
            email,
            first_name,
            last_name,
            middle_name,
            age,
            gender,
            course,
            year_level,
            section,
        } = patch;
        let touch_middle_name = middle_name.is_some();

        sqlx::query_as::<_, Student>(&format!(
            "UPDATE public.students SET \
                email = COALESCE($2, email), \
                first_name = COALESCE($3, first_name), \
                last_name = COALESCE($4, last_name), \
                middle_name = CASE WHEN $5 THEN $6 ELSE middle_name END, \
                age = COALESCE($7, age), \
                gender = COALESCE($8, gender), \
                course = COALESCE($9, course), \
                year_level = COALESCE($10, year_level), \
                section = COALESCE($11, section), \
                updated_at = now() \
            WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&email)
        .bind(first_name)
        .bind(last_name)
        .bind(touch_middle_name)
        .bind(middle_name.flatten())
        .bind(age)
        .bind(gender)
        .bind(course)
        .bind(year_level)
        .bind(section)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, email.as_deref()))
    }

    async fn remove(&self, id: i64) -> RosterResult<bool> {
        let result = sqlx::query("DELETE FROM public.students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context(MakeQuerySnafu)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> RosterResult<usize> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM public.students")
            .fetch_one(&self.pool)
            .await
            .context(MakeQuerySnafu)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
