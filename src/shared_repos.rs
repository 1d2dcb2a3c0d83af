use std::sync::Arc;

use crate::repositories::{
    contact::ContactRepository,
    project::ProjectRepository,
    sqlx_repo::{SqlxContactRepo, SqlxProjectRepo, SqlxTechnologyRepo},
    technology::TechnologyRepository,
};

/// One handle per store, all sharing the same pool.
#[derive(Clone)]
pub struct SharedRepositories {
    pub technology_repo: Arc<dyn TechnologyRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        let technology_repo = Arc::new(SqlxTechnologyRepo::new(pool.clone()));
        let project_repo = Arc::new(SqlxProjectRepo::new(pool.clone()));
        let contact_repo = Arc::new(SqlxContactRepo::new(pool));

        SharedRepositories {
            technology_repo,
            project_repo,
            contact_repo,
        }
    }
}
