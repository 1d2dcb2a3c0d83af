use async_trait::async_trait;

use crate::{
    entities::technology::{Technology, TechnologyInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxTechnologyRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TechnologyRepository: Send + Sync {
    async fn create_technology(&self, technology: &TechnologyInsert) -> Result<Technology, AppError>;
    async fn list_technologies(&self) -> Result<Vec<Technology>, AppError>;

    /// Removes the technology and its project associations; projects stay.
    async fn delete_technology(&self, id: i64) -> Result<(), AppError>;
}

impl SqlxTechnologyRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxTechnologyRepo { pool }
    }
}

#[async_trait]
impl TechnologyRepository for SqlxTechnologyRepo {
    async fn create_technology(&self, technology: &TechnologyInsert) -> Result<Technology, AppError> {
        let created = sqlx::query_as::<_, Technology>(
            r#"
            INSERT INTO technologies (name, created_at)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(&technology.name)
        .bind(technology.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_technologies(&self) -> Result<Vec<Technology>, AppError> {
        let technologies = sqlx::query_as::<_, Technology>(
            r#"SELECT id, name, created_at FROM technologies ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(technologies)
    }

    async fn delete_technology(&self, id: i64) -> Result<(), AppError> {
        // project_technologies rows go with it through ON DELETE CASCADE
        let result = sqlx::query(r#"DELETE FROM technologies WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Technology".into()));
        }

        Ok(())
    }
}
