use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::{
        pagination::LimitOffset,
        project::{NewProjectRequest, Project},
    },
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::valid_id::valid_id,
};

/// A project listing, either the whole catalog or one window of it.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectList {
    All(Vec<Project>),
    Page {
        count: i64,
        page: LimitOffset,
        projects: Vec<Project>,
    },
}

pub struct ProjectHandler<R>
where
    R: ProjectRepository + ?Sized,
{
    pub project_repo: Arc<R>,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository + ?Sized,
{
    pub fn new(project_repo: Arc<R>) -> Self {
        ProjectHandler { project_repo }
    }

    /// Lists projects newest first, windowed when `page` is given
    pub async fn list_projects(&self, page: Option<LimitOffset>) -> Result<ProjectList, AppError> {
        match page {
            None => Ok(ProjectList::All(self.project_repo.list_projects(None).await?)),
            Some(page) => {
                let count = self.project_repo.count_projects().await?;
                let projects = self.project_repo.list_projects(Some(page)).await?;
                Ok(ProjectList::Page { count, page, projects })
            }
        }
    }

    /// Retrieves a project by its path id
    pub async fn get_project(&self, project_id: &str) -> Result<Project, AppError> {
        let id = valid_id(project_id, "Project")?;
        self.project_repo.get_project_by_id(id).await
    }

    /// Creates a project and links it to existing technologies
    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        let request = request.normalized();
        request.validate()?;

        let id = self.project_repo.create_project(&request.prepare_for_insert()).await?;

        tracing::info!(project_id = id, "Project created");
        self.project_repo.get_project_by_id(id).await
    }

    pub async fn check_connection(&self) -> Result<(), AppError> {
        self.project_repo.check_connection().await
    }
}
