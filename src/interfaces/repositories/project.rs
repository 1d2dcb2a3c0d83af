use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::{
        pagination::LimitOffset,
        project::{Project, ProjectInsert, ProjectRow},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

const PROJECT_COLUMNS: &str =
    "id, name, description, url, project_status, project_image, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Inserts the project and its technology associations atomically.
    async fn create_project(&self, project: &ProjectInsert) -> Result<i64, AppError>;

    async fn get_project_by_id(&self, id: i64) -> Result<Project, AppError>;

    /// Newest first; the whole table when `page` is `None`.
    async fn list_projects(&self, page: Option<LimitOffset>) -> Result<Vec<Project>, AppError>;

    async fn count_projects(&self) -> Result<i64, AppError>;

    async fn check_connection(&self) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }

    /// Join lookup from project ids to their technology names.
    async fn technology_names(&self, project_ids: &[i64]) -> Result<HashMap<i64, Vec<String>>, AppError> {
        if project_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT pt.project_id, t.name
            FROM project_technologies pt
            JOIN technologies t ON t.id = pt.technology_id
            WHERE pt.project_id = ANY($1)
            ORDER BY pt.project_id, t.id
            "#,
        )
        .bind(project_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut names: HashMap<i64, Vec<String>> = HashMap::new();
        for (project_id, name) in rows {
            names.entry(project_id).or_default().push(name);
        }

        Ok(names)
    }

    async fn attach_technologies(&self, rows: Vec<ProjectRow>) -> Result<Vec<Project>, AppError> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut names = self.technology_names(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let technologies = names.remove(&row.id).unwrap_or_default();
                Project::from_row(row, technologies)
            })
            .collect())
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        if !project.technology_ids.is_empty() {
            let existing: Vec<i64> = sqlx::query_scalar(
                r#"SELECT id FROM technologies WHERE id = ANY($1)"#,
            )
            .bind(project.technology_ids.as_slice())
            .fetch_all(&mut *tx)
            .await?;

            if let Some(missing) = project.technology_ids.iter().find(|id| !existing.contains(*id)) {
                return Err(AppError::field(
                    "technologies",
                    format!("Invalid pk \"{}\" - object does not exist.", missing),
                ));
            }
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO projects (name, description, url, project_status, project_image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.url)
        .bind(project.project_status)
        .bind(&project.project_image)
        .bind(project.created_at)
        .fetch_one(&mut *tx)
        .await?;

        if !project.technology_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO project_technologies (project_id, technology_id)
                SELECT $1, UNNEST($2::BIGINT[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(project.technology_ids.as_slice())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(id)
    }

    async fn get_project_by_id(&self, id: i64) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".into()))?;

        let mut projects = self.attach_technologies(vec![row]).await?;
        projects
            .pop()
            .ok_or_else(|| AppError::NotFound("Project".into()))
    }

    async fn list_projects(&self, page: Option<LimitOffset>) -> Result<Vec<Project>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, id DESC"
        ));

        if let Some(page) = page {
            builder.push(" LIMIT ").push_bind(page.limit);
            builder.push(" OFFSET ").push_bind(page.offset);
        }

        let rows: Vec<ProjectRow> = builder
            .build_query_as::<ProjectRow>()
            .fetch_all(&self.pool)
            .await?;

        self.attach_technologies(rows).await
    }

    async fn count_projects(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM projects"#)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
