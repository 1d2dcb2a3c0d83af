use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use tracing::instrument;

use crate::{
    entities::{
        pagination::{LimitOffset, Paginated},
        project::ProjectResponse,
    },
    errors::AppError,
    use_cases::projects::ProjectList,
    utils::request_url::{absolute_url, media_base_url},
    AppState,
};

/// The listing body: a bare array unless the caller asked for a page.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProjectListing {
    All(Vec<ProjectResponse>),
    Page(Paginated<ProjectResponse>),
}

#[instrument(skip(state, req))]
pub async fn list_projects(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let page = LimitOffset::from_query(&query);
    let media_base = media_base_url(&req, &state.media_url);

    let listing = match state.project_handler.list_projects(page).await? {
        ProjectList::All(projects) => ProjectListing::All(
            projects
                .into_iter()
                .map(|project| ProjectResponse::new(project, &media_base))
                .collect(),
        ),
        ProjectList::Page { count, page, projects } => {
            let results = projects
                .into_iter()
                .map(|project| ProjectResponse::new(project, &media_base))
                .collect();
            ProjectListing::Page(Paginated::new(results, count, page, &absolute_url(&req)?))
        }
    };

    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(skip(state, req))]
pub async fn get_project(
    state: web::Data<AppState>,
    req: HttpRequest,
    project_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;
    let media_base = media_base_url(&req, &state.media_url);

    Ok(HttpResponse::Ok().json(ProjectResponse::new(project, &media_base)))
}
