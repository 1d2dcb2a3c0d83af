use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::technology::{NewTechnologyRequest, Technology},
    errors::AppError,
    repositories::technology::TechnologyRepository,
    utils::valid_id::valid_id,
};

pub struct TechnologyHandler<R>
where
    R: TechnologyRepository + ?Sized,
{
    pub technology_repo: Arc<R>,
}

impl<R> TechnologyHandler<R>
where
    R: TechnologyRepository + ?Sized,
{
    pub fn new(technology_repo: Arc<R>) -> Self {
        TechnologyHandler { technology_repo }
    }

    pub async fn create_technology(&self, request: NewTechnologyRequest) -> Result<Technology, AppError> {
        let request = request.normalized();
        request.validate()?;

        let technology = self
            .technology_repo
            .create_technology(&request.prepare_for_insert())
            .await?;

        tracing::info!(technology_id = technology.id, name = %technology.name, "Technology created");
        Ok(technology)
    }

    pub async fn list_technologies(&self) -> Result<Vec<Technology>, AppError> {
        self.technology_repo.list_technologies().await
    }

    /// Deletes a technology; projects that used it simply lose the link
    pub async fn delete_technology(&self, technology_id: &str) -> Result<(), AppError> {
        let id = valid_id(technology_id, "Technology")?;
        self.technology_repo.delete_technology(id).await
    }
}
