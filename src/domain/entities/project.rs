use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    constants::{MAX_IMAGE_PATH_LENGTH, MAX_NAME_LENGTH, MAX_URL_LENGTH},
    entities::validators::{not_blank, trimmed, web_url},
};

// ───── Status ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Available,
    Unavailable,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Available => "available",
            ProjectStatus::Unavailable => "unavailable",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(ProjectStatus::Available),
            "unavailable" => Ok(ProjectStatus::Unavailable),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub project_status: ProjectStatus,
    pub project_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A project together with the names of its technologies, ordered by
/// technology id.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub technologies: Vec<String>,
    pub project_status: ProjectStatus,
    pub project_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn from_row(row: ProjectRow, technologies: Vec<String>) -> Self {
        Project {
            id: row.id,
            name: row.name,
            description: row.description,
            url: row.url,
            technologies,
            project_status: row.project_status,
            project_image: row.project_image,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInsert {
    pub name: String,
    pub description: String,
    pub url: String,
    pub technology_ids: Vec<i64>,
    pub project_status: ProjectStatus,
    pub project_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub technologies: Vec<String>,
    pub project_status: ProjectStatus,
    pub project_image: Option<String>,
}

impl ProjectResponse {
    /// `media_base` is the absolute media prefix, e.g. `http://host/media/`.
    pub fn new(project: Project, media_base: &str) -> Self {
        ProjectResponse {
            id: project.id,
            name: project.name,
            description: project.description,
            url: project.url,
            technologies: project.technologies,
            project_status: project.project_status,
            project_image: project
                .project_image
                .map(|path| media_link(&path, media_base)),
        }
    }
}

fn media_link(path: &str, media_base: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}{}", media_base, path.trim_start_matches('/'))
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewProjectRequest {
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = MAX_NAME_LENGTH, message = "Ensure this field has no more than 255 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub description: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "web_url"),
        length(max = MAX_URL_LENGTH, message = "Ensure this field has no more than 200 characters.")
    )]
    pub url: Option<String>,

    pub technologies: Vec<i64>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_project_status")
    )]
    pub project_status: Option<String>,

    #[validate(length(max = MAX_IMAGE_PATH_LENGTH, message = "Ensure this field has no more than 100 characters."))]
    pub project_image: Option<String>,
}

fn validate_project_status(value: &str) -> Result<(), ValidationError> {
    ProjectStatus::from_str(value).map(|_| ()).map_err(|message| {
        let mut err = ValidationError::new("invalid_choice");
        err.message = Some(message.into());
        err
    })
}

impl NewProjectRequest {
    pub fn normalized(self) -> Self {
        let mut technologies = self.technologies;
        technologies.sort_unstable();
        technologies.dedup();

        Self {
            name: trimmed(self.name),
            description: trimmed(self.description),
            url: trimmed(self.url),
            technologies,
            project_status: trimmed(self.project_status),
            project_image: trimmed(self.project_image).filter(|path| !path.is_empty()),
        }
    }

    /// Call only after `validate()` succeeded.
    pub fn prepare_for_insert(self) -> ProjectInsert {
        let project_status = self
            .project_status
            .as_deref()
            .and_then(|s| ProjectStatus::from_str(s).ok())
            .unwrap_or(ProjectStatus::Available);

        ProjectInsert {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            technology_ids: self.technologies,
            project_status,
            project_image: self.project_image,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{group_by_field, AppError};

    fn valid_request() -> NewProjectRequest {
        NewProjectRequest {
            name: Some("Mi Proyecto".into()),
            description: Some("Descripción del proyecto.".into()),
            url: Some("https://example.com".into()),
            technologies: vec![2, 1, 2],
            project_status: Some("available".into()),
            project_image: None,
        }
    }

    fn error_fields(request: NewProjectRequest) -> Vec<String> {
        match request.normalized().validate().map_err(AppError::from) {
            Err(AppError::ValidationError(errors)) => group_by_field(&errors)
                .keys()
                .map(|k| k.to_string())
                .collect(),
            _ => vec![],
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(error_fields(valid_request()).is_empty());
    }

    #[test]
    fn unknown_status_is_rejected_with_choice_message() {
        let mut request = valid_request();
        request.project_status = Some("pending".into());

        let err = request.normalized().validate().map_err(AppError::from).unwrap_err();
        match err {
            AppError::ValidationError(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "project_status");
                assert_eq!(errors[0].message, "\"pending\" is not a valid choice.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_match_is_exact() {
        let mut request = valid_request();
        request.project_status = Some("Available".into());
        assert_eq!(error_fields(request), vec!["project_status"]);
    }

    #[test]
    fn every_offending_field_is_reported() {
        let request = NewProjectRequest {
            name: Some("A".repeat(256)),
            description: Some("".into()),
            url: Some("not a url".into()),
            technologies: vec![],
            project_status: Some("invalid_status".into()),
            project_image: Some(format!("{}.png", "x".repeat(100))),
        };

        assert_eq!(
            error_fields(request),
            vec!["description", "name", "project_image", "project_status", "url"]
        );
    }

    #[test]
    fn missing_fields_are_required() {
        assert_eq!(
            error_fields(NewProjectRequest::default()),
            vec!["description", "name", "project_status", "url"]
        );
    }

    #[test]
    fn insert_dedups_technologies_and_drops_empty_image() {
        let mut request = valid_request();
        request.project_image = Some("   ".into());

        let insert = request.normalized().prepare_for_insert();
        assert_eq!(insert.technology_ids, vec![1, 2]);
        assert_eq!(insert.project_image, None);
        assert_eq!(insert.project_status, ProjectStatus::Available);
    }

    #[test]
    fn response_links_images_under_media_base() {
        let project = Project {
            id: 7,
            name: "Portfolio".into(),
            description: "Site".into(),
            url: "https://example.com".into(),
            technologies: vec!["Python".into(), "Django".into()],
            project_status: ProjectStatus::Unavailable,
            project_image: Some("projects/cover.png".into()),
            created_at: Utc::now(),
        };

        let response = ProjectResponse::new(project, "http://testserver/media/");
        assert_eq!(
            response.project_image.as_deref(),
            Some("http://testserver/media/projects/cover.png")
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["project_status"], "unavailable");
        assert_eq!(json["technologies"], serde_json::json!(["Python", "Django"]));
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn response_keeps_absolute_image_urls() {
        assert_eq!(
            media_link("https://cdn.example.com/a.png", "http://testserver/media/"),
            "https://cdn.example.com/a.png"
        );
    }
}
