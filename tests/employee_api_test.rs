mod common;

use axum::http::StatusCode;
use common::{json_request, spawn_app, TestApp, PASSWORD};
use hr_portal_backend::models::account::Role;
use serde_json::{json, Value as JsonValue};

fn employee_payload(email: &str, role: Option<&str>, department: &str) -> JsonValue {
    let mut body = json!({
        "email": email,
        "password": PASSWORD,
        "full_name": "Grace Hopper",
        "department": department,
        "position": "Engineer",
        "hire_date": "2029-09-01",
        "salary": "80000"
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    body
}

async fn provision(app: &TestApp, token: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    app.send(json_request("POST", "/api/employees", Some(token), Some(body)))
        .await
}

#[tokio::test]
async fn hr_provisions_employees_who_can_log_in() {
    let app = spawn_app();
    let hr = app.login_as(Role::HrManager).await;

    let (status, body) = provision(&app, &hr, employee_payload("Grace@Corp.com", None, "Engineering")).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["email"], "grace@corp.com");
    assert_eq!(body["role"], "EMPLOYEE");
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["is_active"], true);

    let (status, login) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "grace@corp.com", "password": PASSWORD })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", login);
    assert_eq!(login["account"]["role"], "EMPLOYEE");

    let (status, _) = provision(&app, &hr, employee_payload("grace@corp.com", None, "Sales")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn privileged_roles_need_an_admin() {
    let app = spawn_app();
    let hr = app.login_as(Role::HrManager).await;
    let admin = app.login_as(Role::Admin).await;

    let (status, _) = provision(&app, &hr, employee_payload("lead@corp.com", Some("HR_MANAGER"), "People")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = provision(&app, &admin, employee_payload("lead@corp.com", Some("HR_MANAGER"), "People")).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["role"], "HR_MANAGER");

    let (status, body) = provision(&app, &admin, employee_payload("cand@corp.com", Some("CANDIDATE"), "People")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("role").is_some());

    let employee = app.login_as(Role::Employee).await;
    let (status, _) = provision(&app, &employee, employee_payload("peer@corp.com", None, "People")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_filter_and_update() {
    let app = spawn_app();
    let hr = app.login_as(Role::HrManager).await;
    let (_, engineer) = provision(&app, &hr, employee_payload("eng@corp.com", None, "Engineering")).await;
    provision(&app, &hr, employee_payload("ops@corp.com", None, "Operations")).await;

    let (status, body) = app
        .send(json_request("GET", "/api/employees?department=engineering", Some(&hr), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["email"], "eng@corp.com");

    let uri = format!("/api/employees/{}", engineer["id"].as_str().unwrap());
    let (status, body) = app
        .send(json_request(
            "PATCH",
            &uri,
            Some(&hr),
            Some(json!({ "position": "Staff Engineer", "status": "ON_LEAVE" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["position"], "Staff Engineer");
    assert_eq!(body["status"], "ON_LEAVE");
    assert_eq!(body["department"], "Engineering");

    let (status, body) = app
        .send(json_request("GET", "/api/employees?status=ON_LEAVE", Some(&hr), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let candidate = app.login_as(Role::Candidate).await;
    let (status, _) = app.send(json_request("GET", &uri, Some(&candidate), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(json_request(
            "GET",
            &format!("/api/employees/{}", uuid::Uuid::new_v4()),
            Some(&hr),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_admins_deactivate_accounts() {
    let app = spawn_app();
    let hr_account = app.create_account("hr@corp.com", Role::HrManager).await;
    let hr = app.token_for(&hr_account);
    let admin_account = app.create_account("root@corp.com", Role::Admin).await;
    let admin = app.token_for(&admin_account);
    let (_, employee) = provision(&app, &hr, employee_payload("leaver@corp.com", None, "Sales")).await;
    let account_id = employee["account_id"].as_str().unwrap();

    let uri = format!("/api/accounts/{}/deactivate", account_id);
    let (status, _) = app.send(json_request("POST", &uri, Some(&hr), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send(json_request("POST", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["is_active"], false);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "leaver@corp.com", "password": PASSWORD })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "account_deactivated");

    let (status, _) = app
        .send(json_request(
            "POST",
            &format!("/api/accounts/{}/deactivate", admin_account.id),
            Some(&admin),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn deactivation_revokes_existing_tokens() {
    let app = spawn_app();
    let admin = app.login_as(Role::Admin).await;
    let hr_account = app.create_account("gone@corp.com", Role::HrManager).await;
    let hr = app.token_for(&hr_account);
    app.create_job(&hr).await;

    let (status, _) = app
        .send(json_request(
            "POST",
            &format!("/api/accounts/{}/deactivate", hr_account.id),
            Some(&admin),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/jobs",
            Some(&hr),
            Some(json!({
                "title": "Ghost role",
                "description": "Should never be created.",
                "department": "People",
                "location": "Remote",
                "employment_type": "FULL_TIME"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "account_deactivated");

    let (status, _) = app
        .send(json_request("GET", "/api/jobs", Some(&hr), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
