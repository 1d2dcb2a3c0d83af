use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use portfolio_api::{
    db::postgres::{create_pool, run_migrations},
    entities::{project::NewProjectRequest, technology::NewTechnologyRequest},
    errors::AppError,
    settings::AppConfig,
    shared_repos::SharedRepositories,
    telemetry::init_tracing,
    use_cases::{projects::ProjectHandler, technologies::TechnologyHandler},
};

/// Administrative tooling for the project catalog.
#[derive(Parser, Debug)]
#[command(name = "catalog", version)]
struct Cli {
    /// Apply pending migrations before running the command
    #[arg(long)]
    migrate: bool,

    #[command(subcommand)]
    command: CatalogCommands,
}

#[derive(Subcommand, Debug)]
enum CatalogCommands {
    /// Add a technology
    AddTechnology {
        name: String,
    },
    /// List technologies by id
    ListTechnologies,
    /// Delete a technology; projects using it are kept
    DeleteTechnology {
        id: String,
    },
    /// Add a project
    AddProject(AddProjectArgs),
}

#[derive(Parser, Debug)]
struct AddProjectArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    description: String,

    #[arg(long)]
    url: String,

    /// available or unavailable
    #[arg(long, default_value = "available")]
    status: String,

    /// Technology id, repeatable
    #[arg(long = "technology", short = 't')]
    technologies: Vec<i64>,

    /// Image path relative to the media root
    #[arg(long)]
    image: Option<String>,
}

#[derive(Serialize)]
struct ProjectSummary {
    id: i64,
    name: String,
    technologies: Vec<String>,
    project_status: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::new().context("loading configuration")?;
    init_tracing(&config.log_level, config.log_json);

    let pool = create_pool(&config.database_url)
        .await
        .context("connecting to the database")?;

    if cli.migrate || config.run_migrations {
        run_migrations(&pool).await.context("running migrations")?;
    }

    let repos = SharedRepositories::new(pool);
    let technologies = TechnologyHandler::new(Arc::clone(&repos.technology_repo));
    let projects = ProjectHandler::new(Arc::clone(&repos.project_repo));

    match cli.command {
        CatalogCommands::AddTechnology { name } => {
            let technology = technologies
                .create_technology(NewTechnologyRequest::new(name))
                .await
                .map_err(report)?;
            print_json(&technology)?;
        }
        CatalogCommands::ListTechnologies => {
            let all = technologies.list_technologies().await.map_err(report)?;
            print_json(&all)?;
        }
        CatalogCommands::DeleteTechnology { id } => {
            technologies.delete_technology(&id).await.map_err(report)?;
            println!("deleted technology {id}");
        }
        CatalogCommands::AddProject(args) => {
            let request = NewProjectRequest {
                name: Some(args.name),
                description: Some(args.description),
                url: Some(args.url),
                technologies: args.technologies,
                project_status: Some(args.status),
                project_image: args.image,
            };

            let project = projects.create_project(request).await.map_err(report)?;
            print_json(&ProjectSummary {
                id: project.id,
                name: project.name,
                technologies: project.technologies,
                project_status: project.project_status.to_string(),
            })?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Validation failures print the same field map the HTTP API returns.
fn report(err: AppError) -> anyhow::Error {
    match &err {
        AppError::ValidationError(errors) => {
            let grouped = portfolio_api::errors::group_by_field(errors);
            anyhow::anyhow!(
                "{}",
                serde_json::to_string_pretty(&grouped).unwrap_or_else(|_| err.to_string())
            )
        }
        _ => anyhow::anyhow!("{}", err),
    }
}
