mod common;

use axum::http::StatusCode;
use common::{json_request, spawn_app};
use hr_portal_backend::models::account::Role;
use serde_json::json;

#[tokio::test]
async fn hr_manages_jobs_and_employees_can_read() {
    let app = spawn_app();
    let hr = app.login_as(Role::HrManager).await;
    let employee = app.login_as(Role::Employee).await;

    let job = app.create_job(&hr).await;
    let id = job["id"].as_str().unwrap();
    assert_eq!(job["status"], "OPEN");

    let (status, body) = app
        .send(json_request(
            "PATCH",
            &format!("/api/jobs/{}", id),
            Some(&hr),
            Some(json!({ "status": "PAUSED", "location": "Berlin" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "PAUSED");
    assert_eq!(body["location"], "Berlin");
    assert_eq!(body["title"], "Backend Engineer");

    let (status, body) = app
        .send(json_request("GET", "/api/jobs?status=PAUSED", Some(&employee), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], id);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/jobs",
            Some(&employee),
            Some(json!({
                "title": "Nope",
                "description": "d",
                "department": "d",
                "location": "l",
                "employment_type": "CONTRACT"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn candidates_cannot_see_internal_job_listing() {
    let app = spawn_app();
    let candidate = app.login_as(Role::Candidate).await;
    let (status, _) = app
        .send(json_request("GET", "/api/jobs", Some(&candidate), None))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn job_with_applications_cannot_be_deleted() {
    let app = spawn_app();
    let hr = app.login_as(Role::HrManager).await;

    let empty = app.create_job(&hr).await;
    let (status, _) = app
        .send(json_request(
            "DELETE",
            &format!("/api/jobs/{}", empty["id"].as_str().unwrap()),
            Some(&hr),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let job = app.create_job(&hr).await;
    let job_id = job["id"].as_str().unwrap();
    let (status, _) = app.apply(job_id, "a@x.com").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(json_request("DELETE", &format!("/api/jobs/{}", job_id), Some(&hr), None))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_operation");

    let (status, _) = app
        .send(json_request("GET", &format!("/api/jobs/{}", job_id), Some(&hr), None))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn salary_range_must_be_ordered() {
    let app = spawn_app();
    let hr = app.login_as(Role::HrManager).await;
    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/jobs",
            Some(&hr),
            Some(json!({
                "title": "Designer",
                "description": "Design things",
                "department": "Product",
                "location": "Remote",
                "employment_type": "PART_TIME",
                "salary_min": "5000",
                "salary_max": "1000"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("salary_min").is_some());
}

#[tokio::test]
async fn public_listing_shows_only_open_unexpired_jobs() {
    let app = spawn_app();
    let hr = app.login_as(Role::HrManager).await;

    let open = app.create_job(&hr).await;
    let closed = app.create_job(&hr).await;
    let expired = app.create_job(&hr).await;

    app.send(json_request(
        "PATCH",
        &format!("/api/jobs/{}", closed["id"].as_str().unwrap()),
        Some(&hr),
        Some(json!({ "status": "CLOSED" })),
    ))
    .await;
    app.send(json_request(
        "PATCH",
        &format!("/api/jobs/{}", expired["id"].as_str().unwrap()),
        Some(&hr),
        Some(json!({ "closing_date": "2001-01-01T00:00:00Z" })),
    ))
    .await;

    let (status, body) = app
        .send(json_request("GET", "/api/public/jobs", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], open["id"]);

    let (status, _) = app
        .send(json_request(
            "GET",
            &format!("/api/public/jobs/{}", closed["id"].as_str().unwrap()),
            None,
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.apply(expired["id"].as_str().unwrap(), "late@x.com").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
}

#[tokio::test]
async fn paging_far_past_the_end_is_empty() {
    let app = spawn_app();
    let hr = app.login_as(Role::HrManager).await;
    app.create_job(&hr).await;

    let (status, body) = app
        .send(json_request(
            "GET",
            "/api/jobs?page=9223372036854775807&per_page=100",
            Some(&hr),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["total"], 1);
    assert!(body["items"].as_array().unwrap().is_empty());
}
