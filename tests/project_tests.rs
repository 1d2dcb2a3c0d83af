
use portfolio_api::{entities::project::NewProjectRequest, errors::AppError};
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn empty_catalog_lists_as_empty_array() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/projects/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!([]));
}

#[actix_rt::test]
async fn newest_project_is_listed_first() {
    let app = TestApp::spawn().await;
    app.add_project("Primero", vec![]).await;
    app.add_project_later("Segundo").await;

    let projects: Value = app.get("/api/projects").await.json().await.unwrap();
    let names: Vec<&str> = projects
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();

    assert_eq!(names, vec!["Segundo", "Primero"]);
}

#[actix_rt::test]
async fn limit_returns_an_envelope_with_total_count() {
    let app = TestApp::spawn().await;
    for name in ["A", "B", "C"] {
        app.add_project_later(name).await;
    }

    let response = app.get("/api/projects/?limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = response.json().await.unwrap();

    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert_eq!(page["results"][0]["name"], "C");
    assert_eq!(page["previous"], Value::Null);
    assert_eq!(
        page["next"],
        json!(app.url("/api/projects?limit=2&offset=2"))
    );
}

#[actix_rt::test]
async fn last_page_links_back_to_the_first() {
    let app = TestApp::spawn().await;
    for name in ["A", "B", "C"] {
        app.add_project_later(name).await;
    }

    let page: Value = app
        .get("/api/projects?limit=2&offset=2")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(page["results"].as_array().unwrap().len(), 1);
    assert_eq!(page["results"][0]["name"], "A");
    assert_eq!(page["next"], Value::Null);
    assert_eq!(page["previous"], json!(app.url("/api/projects?limit=2")));
}

#[actix_rt::test]
async fn project_renders_technology_names() {
    let app = TestApp::spawn().await;
    let python = app.add_technology("Python").await;
    let django = app.add_technology("Django").await;
    let project = app.add_project("Portfolio", vec![django.id, python.id]).await;

    let response = app.get(&format!("/api/projects/{}/", project.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body, json!({
        "id": project.id,
        "name": "Portfolio",
        "description": "Descripción de Portfolio",
        "url": "https://example.com",
        "technologies": ["Python", "Django"],
        "project_status": "available",
        "project_image": null
    }));
}

#[actix_rt::test]
async fn project_image_is_an_absolute_media_url() {
    let app = TestApp::spawn().await;
    let project = app
        .create_project(NewProjectRequest {
            name: Some("Con imagen".into()),
            description: Some("Proyecto con portada".into()),
            url: Some("https://example.com".into()),
            technologies: vec![],
            project_status: Some("unavailable".into()),
            project_image: Some("projects/cover.png".into()),
        })
        .await
        .unwrap();

    let body: Value = app
        .get(&format!("/api/projects/{}", project.id))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["project_image"], json!(app.url("/media/projects/cover.png")));
    assert_eq!(body["project_status"], "unavailable");
}

#[actix_rt::test]
async fn missing_project_is_404() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/api/projects/999/").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/projects/abc").await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn repeated_reads_are_byte_identical() {
    let app = TestApp::spawn().await;
    let python = app.add_technology("Python").await;
    let project = app.add_project("Estable", vec![python.id]).await;
    let path = format!("/api/projects/{}/", project.id);

    let first = app.get(&path).await.bytes().await.unwrap();
    let second = app.get(&path).await.bytes().await.unwrap();

    assert_eq!(first, second);
}

#[actix_rt::test]
async fn invalid_status_is_rejected_before_storage() {
    let app = TestApp::spawn().await;

    let result = app
        .create_project(NewProjectRequest {
            name: Some("Pendiente".into()),
            description: Some("Descripción".into()),
            url: Some("https://example.com".into()),
            technologies: vec![],
            project_status: Some("pending".into()),
            project_image: None,
        })
        .await;

    match result {
        Err(AppError::ValidationError(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "project_status");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(app.get("/api/projects").await.json::<Value>().await.unwrap(), json!([]));
}

#[actix_rt::test]
async fn unknown_technology_id_is_a_field_error() {
    let app = TestApp::spawn().await;

    let result = app
        .create_project(NewProjectRequest {
            name: Some("Huérfano".into()),
            description: Some("Descripción".into()),
            url: Some("https://example.com".into()),
            technologies: vec![42],
            project_status: Some("available".into()),
            project_image: None,
        })
        .await;

    match result {
        Err(AppError::ValidationError(errors)) => {
            assert_eq!(errors[0].field, "technologies");
            assert_eq!(errors[0].message, "Invalid pk \"42\" - object does not exist.");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[actix_rt::test]
async fn health_reports_database_status() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "OK");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
