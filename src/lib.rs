mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;
pub mod telemetry;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, mail, utils, web};

use std::sync::Arc;

use mail::mailer::{mailer_from_settings, Mailer};
use repositories::{contact::ContactRepository, project::ProjectRepository};
use settings::{AppConfig, MailSettings};
use shared_repos::SharedRepositories;
use use_cases::{contact::ContactHandler, projects::ProjectHandler};

pub type AppProjectHandler = ProjectHandler<dyn ProjectRepository>;
pub type AppContactHandler = ContactHandler<dyn ContactRepository, dyn Mailer>;

pub struct AppState {
    pub project_handler: AppProjectHandler,
    pub contact_handler: AppContactHandler,
    pub media_url: String,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Self {
        let repos = SharedRepositories::new(pool);
        let mail_settings = MailSettings::from(config);
        let mailer = mailer_from_settings(&mail_settings);

        Self::from_parts(
            repos.project_repo,
            repos.contact_repo,
            mailer,
            &mail_settings,
            &config.media_url,
        )
    }

    /// Wires the handlers from already-built stores and mailer.
    pub fn from_parts(
        project_repo: Arc<dyn ProjectRepository>,
        contact_repo: Arc<dyn ContactRepository>,
        mailer: Arc<dyn Mailer>,
        mail_settings: &MailSettings,
        media_url: &str,
    ) -> Self {
        AppState {
            project_handler: ProjectHandler::new(project_repo),
            contact_handler: ContactHandler::new(contact_repo, mailer, mail_settings),
            media_url: media_url.to_string(),
        }
    }
}
